#![allow(dead_code)]

use async_trait::async_trait;
use draw_engine::core::rendezvous::Submitter;
use draw_engine::domain::model::{Pool, Round, SubjectId, SubmissionValue, Team, TeamId, ValueKind};
use draw_engine::domain::ports::DrawHooks;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub fn ids(names: &[&str]) -> Vec<TeamId> {
    names.iter().map(|name| TeamId::from(*name)).collect()
}

pub fn subjects(names: &[&str]) -> Vec<SubjectId> {
    names.iter().map(|name| SubjectId::from(*name)).collect()
}

/// 把每個 hook 呼叫記成一行字串，方便檢查順序
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.starts_with(prefix))
            .collect()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

fn join(teams: &[TeamId]) -> String {
    teams.iter().map(TeamId::as_str).collect::<Vec<_>>().join(",")
}

#[async_trait]
impl DrawHooks for Recorder {
    async fn warn_unwanted(&self, team: &TeamId, _wanted: ValueKind, got: &SubmissionValue) {
        self.push(format!("unwanted:{}:{}", team, got));
    }

    async fn warn_wrong_team(&self, expected: Option<&TeamId>, got: &TeamId) {
        let expected = expected.map(TeamId::as_str).unwrap_or("-");
        self.push(format!("wrong_team:{}:{}", expected, got));
    }

    async fn warn_collisions(&self, teams: &[TeamId]) {
        self.push(format!("collisions:{}", join(teams)));
    }

    async fn warn_twice(&self, team: &TeamId, _kind: ValueKind) {
        self.push(format!("twice:{}", team));
    }

    async fn notify_start(&self, teams: &[TeamId]) {
        self.push(format!("start:{}", teams.len()));
    }

    async fn notify_pool_round_start(&self, round: Round) {
        self.push(format!("pool_round:{}", round));
    }

    async fn notify_pools_formed(&self, pools: &BTreeMap<Pool, Vec<TeamId>>) {
        self.push(format!("pools_formed:{}", pools.len()));
    }

    async fn notify_order_start(&self, pool: &Pool, _members: &[TeamId]) {
        self.push(format!("order_start:{}", pool));
    }

    async fn notify_order_formed(&self, pool: &Pool, order: &[TeamId]) {
        self.push(format!("order:{}:{}", pool, join(order)));
    }

    async fn notify_turn(&self, team: &TeamId, _pool: &Pool) {
        self.push(format!("turn:{}", team));
    }

    async fn notify_drawn(&self, team: &Team, subject: &SubjectId, _round: Round) {
        self.push(format!("drawn:{}:{}", team.id, subject));
    }

    async fn notify_accepted(&self, team: &Team, subject: &SubjectId, _round: Round) {
        self.push(format!("accepted:{}:{}", team.id, subject));
    }

    async fn notify_rejected(&self, team: &Team, subject: &SubjectId, _round: Round, repeated: bool) {
        self.push(format!("rejected:{}:{}:{}", team.id, subject, repeated));
    }

    async fn notify_pool_resolved(&self, pool: &Pool, teams: &[Team]) {
        let order: Vec<TeamId> = teams.iter().map(|team| team.id.clone()).collect();
        self.push(format!("resolved:{}:{}", pool, join(&order)));
    }

    async fn notify_finish(&self, pools: &BTreeMap<Pool, Vec<TeamId>>) {
        self.push(format!("finish:{}", pools.len()));
    }
}

/// Captains that request on their turn and accept everything, except
/// `picky`, which keeps rejecting until it has refused `rejections`
/// distinct subjects.
pub struct PickyCaptains {
    pub submitter: Submitter,
    pub picky: TeamId,
    pub rejections: usize,
}

#[async_trait]
impl DrawHooks for PickyCaptains {
    async fn notify_turn(&self, team: &TeamId, _pool: &Pool) {
        let submitter = self.submitter.clone();
        let team = team.clone();
        tokio::spawn(async move { submitter.request_subject(team).await });
    }

    async fn notify_drawn(&self, team: &Team, _subject: &SubjectId, round: Round) {
        let rejected = team.rejected(round);
        let accept = team.id != self.picky || rejected.len() >= self.rejections;

        let submitter = self.submitter.clone();
        let id = team.id.clone();
        tokio::spawn(async move { submitter.decide(id, accept).await });
    }
}
