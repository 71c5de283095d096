use crate::domain::model::{Pool, Round, SubjectId, SubmissionValue, Team, TeamId, ValueKind};
use crate::domain::ports::DrawHooks;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Narrates a draw through `tracing`, one event per hook.
#[derive(Debug, Clone)]
pub struct LoggingHooks {
    max_refuse: usize,
}

impl LoggingHooks {
    pub fn new(max_refuse: usize) -> Self {
        Self { max_refuse }
    }
}

#[async_trait]
impl DrawHooks for LoggingHooks {
    async fn warn_unwanted(&self, team: &TeamId, wanted: ValueKind, got: &SubmissionValue) {
        tracing::warn!(team = %team, wanted = %wanted, got = %got, "⚠️ unexpected submission discarded");
    }

    async fn warn_wrong_team(&self, expected: Option<&TeamId>, got: &TeamId) {
        match expected {
            Some(expected) => {
                tracing::warn!(team = %got, expected = %expected, "⚠️ played out of turn")
            }
            None => tracing::warn!(team = %got, "⚠️ not part of this roll"),
        }
    }

    async fn warn_collisions(&self, teams: &[TeamId]) {
        tracing::warn!(teams = ?teams, "🔁 same value rolled, these teams roll again");
    }

    async fn warn_twice(&self, team: &TeamId, kind: ValueKind) {
        tracing::warn!(team = %team, kind = %kind, "⚠️ already submitted");
    }

    async fn notify_start(&self, teams: &[TeamId]) {
        tracing::info!(teams = teams.len(), "🚀 Draw started");
    }

    async fn notify_pool_round_start(&self, round: Round) {
        tracing::info!(round = %round, "🎲 Every team rolls a die for the pools");
    }

    async fn notify_pools_formed(&self, pools: &BTreeMap<Pool, Vec<TeamId>>) {
        for (pool, members) in pools {
            tracing::info!(pool = %pool, members = ?members, "📋 Pool formed");
        }
    }

    async fn notify_order_start(&self, pool: &Pool, members: &[TeamId]) {
        tracing::info!(pool = %pool, teams = members.len(), "🎲 Rolling for the draw order");
    }

    async fn notify_order_formed(&self, pool: &Pool, order: &[TeamId]) {
        tracing::info!(pool = %pool, order = ?order, "📋 Draw order set");
    }

    async fn notify_turn(&self, team: &TeamId, pool: &Pool) {
        tracing::info!(pool = %pool, team = %team, "👉 Team to draw");
    }

    async fn notify_drawn(&self, team: &Team, subject: &SubjectId, round: Round) {
        if team.rejected(round).contains(subject) {
            tracing::info!(
                team = %team.id,
                subject = %subject,
                round = %round,
                "🎯 Drew an already rejected subject, rejecting it again costs nothing"
            );
        } else {
            tracing::info!(
                team = %team.id,
                subject = %subject,
                round = %round,
                free_refusals_left = team.free_refusals_left(round, self.max_refuse),
                "🎯 Subject drawn"
            );
        }
    }

    async fn notify_accepted(&self, team: &Team, subject: &SubjectId, round: Round) {
        tracing::info!(team = %team.id, subject = %subject, round = %round, "✅ Subject accepted");
    }

    async fn notify_rejected(&self, team: &Team, subject: &SubjectId, round: Round, repeated: bool) {
        tracing::info!(
            team = %team.id,
            subject = %subject,
            round = %round,
            repeated,
            coeff = team.coeff(round, self.max_refuse),
            "❌ Subject rejected"
        );
    }

    async fn notify_pool_resolved(&self, pool: &Pool, teams: &[Team]) {
        for team in teams {
            tracing::info!(
                pool = %pool,
                team = %team.id,
                subject = team.accepted(pool.round).map(SubjectId::as_str).unwrap_or("-"),
                "🏁 Presentation slot"
            );
        }
    }

    async fn notify_finish(&self, pools: &BTreeMap<Pool, Vec<TeamId>>) {
        tracing::info!(pools = pools.len(), "🎉 Draw finished");
    }
}
