use crate::core::rendezvous::Submitter;
use crate::domain::model::{Pool, Round, SubjectId, Team, TeamId};
use crate::domain::ports::DrawHooks;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::Future;
use std::sync::{Mutex, PoisonError};

/// 模擬各隊隊長：擲骰、要題、決定接受或拒絕
///
/// Every submission is spawned, since the engine waits for the hook to
/// return before it reads the queue.
pub struct AutoPilot {
    submitter: Submitter,
    roster: Vec<TeamId>,
    faces: u32,
    accept_rate: f64,
    max_refuse: usize,
    rng: Mutex<StdRng>,
}

impl AutoPilot {
    pub fn new(
        submitter: Submitter,
        roster: Vec<TeamId>,
        faces: u32,
        accept_rate: f64,
        max_refuse: usize,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            submitter,
            roster,
            faces,
            accept_rate: accept_rate.clamp(0.0, 1.0),
            max_refuse,
            rng: Mutex::new(rng),
        }
    }

    fn roll(&self) -> u32 {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(1..=self.faces)
    }

    fn wants_to_accept(&self, team: &Team, subject: &SubjectId, round: Round) -> bool {
        // 免罰拒絕用完、或再次抽到拒絕過的題目就接受
        if team.free_refusals_left(round, self.max_refuse) == 0
            || team.rejected(round).contains(subject)
        {
            return true;
        }
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_bool(self.accept_rate)
    }

    fn roll_for(&self, teams: &[TeamId]) {
        for team in teams {
            let roll = self.roll();
            let submitter = self.submitter.clone();
            let team = team.clone();
            spawn_logged("roll", async move { submitter.submit_roll(team, roll).await.map(|_| ()) });
        }
    }
}

fn spawn_logged<F>(action: &'static str, task: F)
where
    F: Future<Output = crate::utils::error::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = task.await {
            tracing::debug!("🤖 autopilot {} dropped: {}", action, e);
        }
    });
}

#[async_trait]
impl DrawHooks for AutoPilot {
    async fn warn_collisions(&self, teams: &[TeamId]) {
        self.roll_for(teams);
    }

    async fn notify_pool_round_start(&self, _round: Round) {
        self.roll_for(&self.roster);
    }

    async fn notify_order_start(&self, _pool: &Pool, members: &[TeamId]) {
        self.roll_for(members);
    }

    async fn notify_turn(&self, team: &TeamId, _pool: &Pool) {
        let submitter = self.submitter.clone();
        let team = team.clone();
        spawn_logged("subject request", async move {
            submitter.request_subject(team).await.map(|_| ())
        });
    }

    async fn notify_drawn(&self, team: &Team, subject: &SubjectId, round: Round) {
        let accept = self.wants_to_accept(team, subject, round);
        tracing::debug!(team = %team.id, subject = %subject, accept, "🤖 autopilot decision");

        let submitter = self.submitter.clone();
        let id = team.id.clone();
        spawn_logged("decision", async move { submitter.decide(id, accept).await.map(|_| ()) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rendezvous;

    #[tokio::test]
    async fn test_out_of_refusals_always_accepts() {
        let (submitter, _inbox) = rendezvous::channel();
        let pilot = AutoPilot::new(submitter, vec![], 100, 0.0, 1, Some(3));

        let mut team = Team::new(TeamId::from("AAA"));
        let p2 = SubjectId::from("P2");
        assert!(!pilot.wants_to_accept(&team, &p2, Round::First));

        team.reject(Round::First, SubjectId::from("P1"));
        assert!(pilot.wants_to_accept(&team, &p2, Round::First));
    }

    #[tokio::test]
    async fn test_redrawn_rejected_subject_is_accepted() {
        let (submitter, _inbox) = rendezvous::channel();
        let pilot = AutoPilot::new(submitter, vec![], 100, 0.0, 5, Some(3));

        let mut team = Team::new(TeamId::from("AAA"));
        team.reject(Round::Second, SubjectId::from("P1"));
        assert!(pilot.wants_to_accept(&team, &SubjectId::from("P1"), Round::Second));
        assert!(!pilot.wants_to_accept(&team, &SubjectId::from("P2"), Round::Second));
    }

    #[tokio::test]
    async fn test_rolls_stay_on_the_die() {
        let (submitter, _inbox) = rendezvous::channel();
        let pilot = AutoPilot::new(submitter, vec![], 6, 0.5, 0, Some(11));
        for _ in 0..100 {
            let roll = pilot.roll();
            assert!((1..=6).contains(&roll));
        }
    }
}
