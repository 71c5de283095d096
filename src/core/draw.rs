use crate::config::DrawConfig;
use crate::core::allocation::PoolAllocator;
use crate::core::order::draw_order;
use crate::core::pools::make_pools;
use crate::core::rendezvous::{self, Inbox, Submitter};
use crate::core::session::Session;
use crate::domain::model::{Pool, TeamId};
use crate::domain::ports::DrawHooks;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Orchestrates one draw: pools for both rounds, then draw order and subject
/// allocation for every pool.
pub struct DrawEngine {
    session: Session,
    config: DrawConfig,
    inbox: Inbox,
    hooks: Arc<dyn DrawHooks>,
    rng: StdRng,
}

impl DrawEngine {
    pub fn new(
        roster: &[TeamId],
        config: DrawConfig,
        inbox: Inbox,
        hooks: Arc<dyn DrawHooks>,
    ) -> Result<Self> {
        config.validate()?;
        let session = Session::new(roster, &config.format)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            session,
            config,
            inbox,
            hooks,
            rng,
        })
    }

    /// Builds an engine together with the submitter of its channel.
    pub fn start(
        roster: &[TeamId],
        config: DrawConfig,
        hooks: Arc<dyn DrawHooks>,
    ) -> Result<(Submitter, Self)> {
        let (submitter, inbox) = rendezvous::channel();
        let engine = Self::new(roster, config, inbox, hooks)?;
        Ok((submitter, engine))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn run(mut self) -> Result<Session> {
        let hooks = Arc::clone(&self.hooks);
        let faces = self.config.dice_faces;

        tracing::info!(
            teams = self.session.roster.len(),
            format = ?self.session.format,
            "🚀 starting draw"
        );
        hooks.notify_start(&self.session.roster).await;

        self.session.pools = make_pools(
            &mut self.inbox,
            hooks.as_ref(),
            &self.session.roster,
            &self.session.format,
            faces,
        )
        .await?;

        let pools: Vec<Pool> = self.session.pools.keys().copied().collect();
        for pool in pools {
            let members = self.session.pools[&pool].clone();
            let order = draw_order(&mut self.inbox, hooks.as_ref(), &pool, &members, faces).await?;
            self.session.pools.insert(pool, order.clone());

            let mut allocator = PoolAllocator {
                inbox: &mut self.inbox,
                hooks: hooks.as_ref(),
                teams: &mut self.session.teams,
                subjects: &self.config.subjects,
                presentation: self.config.presentation,
                rng: &mut self.rng,
            };
            let presentation = allocator.run_pool(&pool, &order).await?;
            self.session.pools.insert(pool, presentation);
        }

        self.session.finished_at = Some(Utc::now());
        tracing::info!("🏁 draw finished");
        hooks.notify_finish(&self.session.pools).await;

        Ok(self.session)
    }
}
