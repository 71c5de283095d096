use crate::domain::model::{
    Pool, PresentationPolicy, Round, SubjectId, SubmissionValue, Team, TeamId, ValueKind,
};
use async_trait::async_trait;
use std::collections::BTreeMap;

pub trait ConfigProvider: Send + Sync {
    fn subjects(&self) -> &[SubjectId];
    fn max_refuse(&self) -> usize;
    fn format(&self) -> &[usize];
    fn dice_faces(&self) -> u32;
    fn presentation(&self) -> PresentationPolicy;
    fn seed(&self) -> Option<u64>;
}

/// Notification points of a draw.
///
/// The engine awaits each call before consuming the next submission, so an
/// implementation that needs to submit on behalf of a team must spawn that
/// work instead of awaiting it inline. Every method defaults to a no-op; an
/// implementation handles its own failures.
#[async_trait]
pub trait DrawHooks: Send + Sync {
    /// A submission of the wrong kind arrived and was discarded.
    async fn warn_unwanted(&self, _team: &TeamId, _wanted: ValueKind, _got: &SubmissionValue) {}

    /// A submission from a team that may not play now was discarded.
    /// `expected` is `None` while collecting dice from a set of teams.
    async fn warn_wrong_team(&self, _expected: Option<&TeamId>, _got: &TeamId) {}

    /// These teams rolled the same value and must roll again.
    async fn warn_collisions(&self, _teams: &[TeamId]) {}

    /// A team submitted again while its previous submission still counts.
    async fn warn_twice(&self, _team: &TeamId, _kind: ValueKind) {}

    async fn notify_start(&self, _teams: &[TeamId]) {}

    /// Dice for the pools of `round` are about to be collected.
    async fn notify_pool_round_start(&self, _round: Round) {}

    async fn notify_pools_formed(&self, _pools: &BTreeMap<Pool, Vec<TeamId>>) {}

    /// Dice for the draw order of `pool` are about to be collected.
    async fn notify_order_start(&self, _pool: &Pool, _members: &[TeamId]) {}

    async fn notify_order_formed(&self, _pool: &Pool, _order: &[TeamId]) {}

    /// `team` must now request a subject.
    async fn notify_turn(&self, _team: &TeamId, _pool: &Pool) {}

    async fn notify_drawn(&self, _team: &Team, _subject: &SubjectId, _round: Round) {}

    async fn notify_accepted(&self, _team: &Team, _subject: &SubjectId, _round: Round) {}

    /// `repeated` is `true` when the team had already rejected this subject in
    /// this round, in which case no extra penalty applies.
    async fn notify_rejected(
        &self,
        _team: &Team,
        _subject: &SubjectId,
        _round: Round,
        _repeated: bool,
    ) {
    }

    /// Every member of `pool` holds a subject; `teams` is in presentation order.
    async fn notify_pool_resolved(&self, _pool: &Pool, _teams: &[Team]) {}

    async fn notify_finish(&self, _pools: &BTreeMap<Pool, Vec<TeamId>>) {}
}
