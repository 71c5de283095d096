//! Single-slot request/response handshake between submitters and the
//! orchestrator.
//!
//! Every submission travels on one FIFO queue together with its own oneshot
//! completion channel. The submitter awaits that channel, so only the
//! submitter of a processed item is woken up.

use crate::domain::model::{Response, SubjectId, SubmissionValue, TeamId, ValueKind};
use crate::domain::ports::DrawHooks;
use crate::utils::error::{DrawError, Result};
use rand::Rng;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
struct Submission {
    team: TeamId,
    value: SubmissionValue,
    response_tx: oneshot::Sender<Response>,
}

/// Creates the two ends of a session's rendezvous channel.
pub fn channel() -> (Submitter, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Submitter { tx }, Inbox { rx })
}

/// Submitting end, cloned once per transport / per team.
#[derive(Debug, Clone)]
pub struct Submitter {
    tx: mpsc::UnboundedSender<Submission>,
}

impl Submitter {
    /// Queues `value` for `team` and waits until the orchestrator releases it.
    pub async fn submit(&self, team: TeamId, value: SubmissionValue) -> Result<Response> {
        let (response_tx, response_rx) = oneshot::channel();

        self.tx
            .send(Submission {
                team,
                value,
                response_tx,
            })
            .map_err(|_| DrawError::SessionClosed)?;

        response_rx.await.map_err(|_| DrawError::SessionClosed)
    }

    pub async fn submit_roll(&self, team: TeamId, roll: u32) -> Result<Response> {
        self.submit(team, SubmissionValue::Roll(roll)).await
    }

    /// Rolls a fair `faces`-sided die for `team` and submits the result.
    pub async fn roll_dice(&self, team: TeamId, faces: u32) -> Result<Response> {
        let roll = rand::thread_rng().gen_range(1..=faces);
        tracing::debug!(team = %team, roll, "🎲 rolling dice");
        self.submit_roll(team, roll).await
    }

    /// Asks for a subject. Returns the drawn subject, or `None` when the
    /// request was not expected at this point of the draw.
    pub async fn request_subject(&self, team: TeamId) -> Result<Option<SubjectId>> {
        match self.submit(team, SubmissionValue::SubjectRequest).await? {
            Response::Drawn(subject) => Ok(Some(subject)),
            Response::Processed | Response::Discarded => Ok(None),
        }
    }

    pub async fn decide(&self, team: TeamId, accept: bool) -> Result<Response> {
        self.submit(team, SubmissionValue::Decision(accept)).await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consuming end, owned by the orchestrator.
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::UnboundedReceiver<Submission>,
}

/// A matching submission whose submitter is still waiting.
#[derive(Debug)]
pub struct Pending {
    team: TeamId,
    value: SubmissionValue,
    response_tx: oneshot::Sender<Response>,
}

impl Pending {
    pub fn team(&self) -> &TeamId {
        &self.team
    }

    pub fn value(&self) -> &SubmissionValue {
        &self.value
    }

    /// Unblocks the submitter with `response`.
    pub fn release(self, response: Response) {
        // 送出端可能已經放棄等待，忽略即可
        let _ = self.response_tx.send(response);
    }
}

impl Inbox {
    /// Pops submissions until one of kind `kind` (and from `team`, if given)
    /// arrives. Everything else is released as `Discarded` after the matching
    /// warning hook fires.
    pub async fn next(
        &mut self,
        kind: ValueKind,
        team: Option<&TeamId>,
        hooks: &dyn DrawHooks,
    ) -> Result<Pending> {
        loop {
            let submission = self.rx.recv().await.ok_or(DrawError::InboxClosed)?;

            if let Some(expected) = team {
                if submission.team != *expected {
                    tracing::warn!(
                        expected = %expected,
                        got = %submission.team,
                        "⚠️ submission from a team that is not playing now"
                    );
                    hooks.warn_wrong_team(Some(expected), &submission.team).await;
                    let _ = submission.response_tx.send(Response::Discarded);
                    continue;
                }
            }

            if submission.value.kind() != kind {
                tracing::warn!(
                    team = %submission.team,
                    wanted = %kind,
                    got = %submission.value,
                    "⚠️ unexpected submission"
                );
                hooks
                    .warn_unwanted(&submission.team, kind, &submission.value)
                    .await;
                let _ = submission.response_tx.send(Response::Discarded);
                continue;
            }

            tracing::debug!(team = %submission.team, value = %submission.value, "📥 submission consumed");
            return Ok(Pending {
                team: submission.team,
                value: submission.value,
                response_tx: submission.response_tx,
            });
        }
    }
}
