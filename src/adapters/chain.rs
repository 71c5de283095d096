use crate::domain::model::{Pool, Round, SubjectId, SubmissionValue, Team, TeamId, ValueKind};
use crate::domain::ports::DrawHooks;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Forwards every notification to each hook in registration order.
#[derive(Default, Clone)]
pub struct HookChain {
    hooks: Vec<Arc<dyn DrawHooks>>, // 使用 trait object 支持多種輸出
}

impl HookChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hook: Arc<dyn DrawHooks>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[async_trait]
impl DrawHooks for HookChain {
    async fn warn_unwanted(&self, team: &TeamId, wanted: ValueKind, got: &SubmissionValue) {
        for hook in &self.hooks {
            hook.warn_unwanted(team, wanted, got).await;
        }
    }

    async fn warn_wrong_team(&self, expected: Option<&TeamId>, got: &TeamId) {
        for hook in &self.hooks {
            hook.warn_wrong_team(expected, got).await;
        }
    }

    async fn warn_collisions(&self, teams: &[TeamId]) {
        for hook in &self.hooks {
            hook.warn_collisions(teams).await;
        }
    }

    async fn warn_twice(&self, team: &TeamId, kind: ValueKind) {
        for hook in &self.hooks {
            hook.warn_twice(team, kind).await;
        }
    }

    async fn notify_start(&self, teams: &[TeamId]) {
        for hook in &self.hooks {
            hook.notify_start(teams).await;
        }
    }

    async fn notify_pool_round_start(&self, round: Round) {
        for hook in &self.hooks {
            hook.notify_pool_round_start(round).await;
        }
    }

    async fn notify_pools_formed(&self, pools: &BTreeMap<Pool, Vec<TeamId>>) {
        for hook in &self.hooks {
            hook.notify_pools_formed(pools).await;
        }
    }

    async fn notify_order_start(&self, pool: &Pool, members: &[TeamId]) {
        for hook in &self.hooks {
            hook.notify_order_start(pool, members).await;
        }
    }

    async fn notify_order_formed(&self, pool: &Pool, order: &[TeamId]) {
        for hook in &self.hooks {
            hook.notify_order_formed(pool, order).await;
        }
    }

    async fn notify_turn(&self, team: &TeamId, pool: &Pool) {
        for hook in &self.hooks {
            hook.notify_turn(team, pool).await;
        }
    }

    async fn notify_drawn(&self, team: &Team, subject: &SubjectId, round: Round) {
        for hook in &self.hooks {
            hook.notify_drawn(team, subject, round).await;
        }
    }

    async fn notify_accepted(&self, team: &Team, subject: &SubjectId, round: Round) {
        for hook in &self.hooks {
            hook.notify_accepted(team, subject, round).await;
        }
    }

    async fn notify_rejected(&self, team: &Team, subject: &SubjectId, round: Round, repeated: bool) {
        for hook in &self.hooks {
            hook.notify_rejected(team, subject, round, repeated).await;
        }
    }

    async fn notify_pool_resolved(&self, pool: &Pool, teams: &[Team]) {
        for hook in &self.hooks {
            hook.notify_pool_resolved(pool, teams).await;
        }
    }

    async fn notify_finish(&self, pools: &BTreeMap<Pool, Vec<TeamId>>) {
        for hook in &self.hooks {
            hook.notify_finish(pools).await;
        }
    }
}
