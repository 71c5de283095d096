use crate::config::DrawConfig;
use crate::core::draw::DrawEngine;
use crate::core::rendezvous::{self, Submitter};
use crate::domain::model::{Pool, Round, SubjectId, Team, TeamId};
use crate::domain::ports::DrawHooks;
use crate::utils::error::{DrawError, Result};
use crate::utils::validation::{validate_format, validate_non_empty_string, validate_unique};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 一場抽籤的完整狀態：隊伍、分組格式、兩輪的分組
#[derive(Debug, Clone)]
pub struct Session {
    pub roster: Vec<TeamId>,
    pub teams: BTreeMap<TeamId, Team>,
    pub format: Vec<usize>,
    pub pools: BTreeMap<Pool, Vec<TeamId>>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(roster: &[TeamId], format: &[usize]) -> Result<Self> {
        for team in roster {
            validate_non_empty_string("teams.roster", team.as_str())?;
        }
        validate_unique("teams.roster", roster)?;
        validate_format("draw.format", format, roster.len())?;

        Ok(Self {
            roster: roster.to_vec(),
            teams: roster
                .iter()
                .map(|id| (id.clone(), Team::new(id.clone())))
                .collect(),
            format: format.to_vec(),
            pools: BTreeMap::new(),
            started_at: Utc::now(),
            finished_at: None,
        })
    }

    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.get(id)
    }

    /// Pool of `team` in `round`, once pools are formed.
    pub fn pool_of(&self, team: &TeamId, round: Round) -> Option<Pool> {
        self.pools
            .iter()
            .find(|(pool, members)| pool.round == round && members.contains(team))
            .map(|(pool, _)| *pool)
    }

    pub fn is_complete(&self) -> bool {
        !self.pools.is_empty()
            && self
                .teams
                .values()
                .all(|team| Round::ALL.iter().all(|round| team.has_accepted(*round)))
    }

    pub fn report(&self, max_refuse: usize) -> SessionReport {
        let pools = self
            .pools
            .iter()
            .map(|(pool, members)| PoolReport {
                pool: pool.to_string(),
                round: pool.round,
                teams: members
                    .iter()
                    .filter_map(|id| self.teams.get(id))
                    .map(|team| TeamReport {
                        team: team.id.clone(),
                        accepted: team.accepted(pool.round).cloned(),
                        rejected: team.rejected(pool.round).iter().cloned().collect(),
                        coeff: team.coeff(pool.round, max_refuse),
                    })
                    .collect(),
            })
            .collect();

        SessionReport {
            started_at: self.started_at,
            finished_at: self.finished_at,
            max_refuse,
            pools,
        }
    }
}

/// 抽籤結果摘要，交給外部保存或顯示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub max_refuse: usize,
    pub pools: Vec<PoolReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolReport {
    pub pool: String,
    pub round: Round,
    /// Teams in presentation order.
    pub teams: Vec<TeamReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub team: TeamId,
    pub accepted: Option<SubjectId>,
    pub rejected: Vec<SubjectId>,
    pub coeff: f64,
}

struct SessionHandle {
    submitter: Submitter,
    task: JoinHandle<Result<Session>>,
}

/// Owns every running draw, keyed by the transport's own identifier
/// (a chat channel, a room name, ...). Sessions never share state.
#[derive(Default)]
pub struct SessionManager {
    sessions: HashMap<String, SessionHandle>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a draw under `key` and returns a submitter bound to it.
    pub fn create(
        &mut self,
        key: &str,
        roster: &[TeamId],
        config: DrawConfig,
        hooks: Arc<dyn DrawHooks>,
    ) -> Result<Submitter> {
        let (submitter, inbox) = rendezvous::channel();
        self.create_with_channel(key, roster, config, hooks, submitter, inbox)
    }

    /// Like [`SessionManager::create`], for hooks that already hold a
    /// submitter of the same channel.
    pub fn create_with_channel(
        &mut self,
        key: &str,
        roster: &[TeamId],
        config: DrawConfig,
        hooks: Arc<dyn DrawHooks>,
        submitter: Submitter,
        inbox: rendezvous::Inbox,
    ) -> Result<Submitter> {
        if self.sessions.contains_key(key) {
            return Err(DrawError::SessionExists {
                key: key.to_string(),
            });
        }

        let engine = DrawEngine::new(roster, config, inbox, hooks)?;
        let task = tokio::spawn(engine.run());

        tracing::info!(session = key, teams = roster.len(), "🚀 draw session created");
        self.sessions.insert(
            key.to_string(),
            SessionHandle {
                submitter: submitter.clone(),
                task,
            },
        );
        Ok(submitter)
    }

    pub fn submitter(&self, key: &str) -> Result<Submitter> {
        self.sessions
            .get(key)
            .map(|handle| handle.submitter.clone())
            .ok_or_else(|| DrawError::UnknownSession {
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sessions.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.sessions.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Stops the draw under `key`. Its queue is dropped and any submitter
    /// still waiting gets [`DrawError::SessionClosed`].
    pub fn abort(&mut self, key: &str) -> Result<()> {
        let handle = self
            .sessions
            .remove(key)
            .ok_or_else(|| DrawError::UnknownSession {
                key: key.to_string(),
            })?;
        handle.task.abort();
        tracing::warn!(session = key, "🛑 draw session aborted");
        Ok(())
    }

    /// Waits for the draw under `key` to end and unregisters it.
    pub async fn finish(&mut self, key: &str) -> Result<Session> {
        let handle = self
            .sessions
            .remove(key)
            .ok_or_else(|| DrawError::UnknownSession {
                key: key.to_string(),
            })?;

        match handle.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(DrawError::SessionAborted {
                key: key.to_string(),
            }),
            // engine 內部 panic 代表不變量被破壞，原樣拋出
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}
