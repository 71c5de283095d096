use crate::core::rendezvous::Inbox;
use crate::domain::model::{
    Pool, PresentationPolicy, Response, Round, SubjectId, SubmissionValue, Team, TeamId,
    ValueKind,
};
use crate::domain::ports::DrawHooks;
use crate::utils::error::{DrawError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Size from which a pool lets two teams share one subject.
pub const SHARED_SUBJECT_POOL_SIZE: usize = 5;

/// 分組內輪流抽題、接受或拒絕，直到每隊都有題目。
pub struct PoolAllocator<'a, R: Rng> {
    pub inbox: &'a mut Inbox,
    pub hooks: &'a dyn DrawHooks,
    pub teams: &'a mut BTreeMap<TeamId, Team>,
    pub subjects: &'a [SubjectId],
    pub presentation: PresentationPolicy,
    pub rng: &'a mut R,
}

impl<'a, R: Rng + Send> PoolAllocator<'a, R> {
    /// Runs the round-robin for `pool` with members in draw `order` and
    /// returns the presentation order.
    pub async fn run_pool(&mut self, pool: &Pool, order: &[TeamId]) -> Result<Vec<TeamId>> {
        let round = pool.round;
        let mut cursor = 0;

        while !order.iter().all(|id| self.team(id).has_accepted(round)) {
            let team_id = &order[cursor];
            if self.team(team_id).has_accepted(round) {
                cursor = (cursor + 1) % order.len();
                continue;
            }

            self.hooks.notify_turn(team_id, pool).await;
            let request = self
                .inbox
                .next(ValueKind::SubjectRequest, Some(team_id), self.hooks)
                .await?;

            let accepted_in_pool = accepted_subjects(self.teams, order, round);
            let available = candidates(
                self.subjects,
                self.team(team_id),
                &accepted_in_pool,
                order.len(),
                round,
            );
            let Some(subject) = available.choose(&mut *self.rng).cloned() else {
                request.release(Response::Discarded);
                return Err(DrawError::NoSubjectAvailable {
                    team: team_id.clone(),
                    round,
                });
            };

            tracing::debug!(pool = %pool, team = %team_id, subject = %subject, "🎯 subject drawn");
            request.release(Response::Drawn(subject.clone()));
            self.hooks
                .notify_drawn(self.team(team_id), &subject, round)
                .await;

            let decision = self
                .inbox
                .next(ValueKind::Decision, Some(team_id), self.hooks)
                .await?;
            let accept = matches!(decision.value(), SubmissionValue::Decision(true));
            decision.release(Response::Processed);

            let team = self.team_mut(team_id);
            if accept {
                team.accept(round, subject.clone());
                tracing::debug!(pool = %pool, team = %team_id, subject = %subject, "✅ subject accepted");
                self.hooks
                    .notify_accepted(self.team(team_id), &subject, round)
                    .await;
            } else {
                let repeated = !team.reject(round, subject.clone());
                tracing::debug!(
                    pool = %pool,
                    team = %team_id,
                    subject = %subject,
                    repeated,
                    "❌ subject rejected"
                );
                self.hooks
                    .notify_rejected(self.team(team_id), &subject, round, repeated)
                    .await;
            }

            // 拒絕的隊伍不會立即重抽，等下一輪輪到它
            cursor = (cursor + 1) % order.len();
        }

        let presentation = match self.presentation {
            PresentationPolicy::DoublesFirst if order.len() == SHARED_SUBJECT_POOL_SIZE => {
                presentation_order(order, self.teams, round)
            }
            _ => order.to_vec(),
        };

        let resolved: Vec<Team> = presentation
            .iter()
            .map(|id| self.team(id).clone())
            .collect();
        tracing::info!(pool = %pool, order = ?presentation, "🏁 pool resolved");
        self.hooks.notify_pool_resolved(pool, &resolved).await;

        Ok(presentation)
    }

    fn team(&self, id: &TeamId) -> &Team {
        self.teams
            .get(id)
            .unwrap_or_else(|| panic!("team {} is not part of this session", id))
    }

    fn team_mut(&mut self, id: &TeamId) -> &mut Team {
        self.teams
            .get_mut(id)
            .unwrap_or_else(|| panic!("team {} is not part of this session", id))
    }
}

/// Subjects already accepted in `round` by the `members` of a pool.
pub fn accepted_subjects(
    teams: &BTreeMap<TeamId, Team>,
    members: &[TeamId],
    round: Round,
) -> Vec<SubjectId> {
    members
        .iter()
        .filter_map(|id| teams.get(id).and_then(|team| team.accepted(round)).cloned())
        .collect()
}

/// 小於五隊的分組題目不可重複；五隊分組同一題最多兩隊。
pub fn is_available(subject: &SubjectId, accepted_in_pool: &[SubjectId], pool_size: usize) -> bool {
    let taken = accepted_in_pool.iter().filter(|s| *s == subject).count();
    if pool_size < SHARED_SUBJECT_POOL_SIZE {
        taken == 0
    } else {
        taken < 2
    }
}

/// Subjects `team` may draw in `round`: available in its pool and not the
/// subject it accepted in the other round.
pub fn candidates(
    subjects: &[SubjectId],
    team: &Team,
    accepted_in_pool: &[SubjectId],
    pool_size: usize,
    round: Round,
) -> Vec<SubjectId> {
    let own_other_round = team.accepted(round.other());
    subjects
        .iter()
        .filter(|subject| Some(*subject) != own_other_round)
        .filter(|subject| is_available(subject, accepted_in_pool, pool_size))
        .cloned()
        .collect()
}

/// Moves each pair of teams sharing a subject to the front, in the order the
/// pairs are met while scanning `order`; the rest keep their relative order.
pub fn presentation_order(
    order: &[TeamId],
    teams: &BTreeMap<TeamId, Team>,
    round: Round,
) -> Vec<TeamId> {
    let subject_of = |id: &TeamId| teams.get(id).and_then(|team| team.accepted(round)).cloned();

    let mut remaining: Vec<TeamId> = order.to_vec();
    let mut doubles = Vec::new();
    let mut i = 0;
    while i < remaining.len() {
        let subject = subject_of(&remaining[i]);
        let partner = (i + 1..remaining.len())
            .find(|&j| subject.is_some() && subject_of(&remaining[j]) == subject);

        match partner {
            Some(j) => {
                let second = remaining.remove(j);
                let first = remaining.remove(i);
                doubles.push(first);
                doubles.push(second);
            }
            None => i += 1,
        }
    }

    doubles.extend(remaining);
    doubles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects(names: &[&str]) -> Vec<SubjectId> {
        names.iter().map(|name| SubjectId::from(*name)).collect()
    }

    fn ids(names: &[&str]) -> Vec<TeamId> {
        names.iter().map(|name| TeamId::from(*name)).collect()
    }

    fn teams_with(accepted: &[(&str, &str)], round: Round) -> BTreeMap<TeamId, Team> {
        accepted
            .iter()
            .map(|(id, subject)| {
                let mut team = Team::new(TeamId::from(*id));
                team.accept(round, SubjectId::from(*subject));
                (team.id.clone(), team)
            })
            .collect()
    }

    #[test]
    fn test_small_pool_forbids_duplicates() {
        let taken = subjects(&["P1"]);
        assert!(!is_available(&SubjectId::from("P1"), &taken, 4));
        assert!(is_available(&SubjectId::from("P2"), &taken, 4));
    }

    #[test]
    fn test_five_team_pool_allows_two_per_subject() {
        let once = subjects(&["P1"]);
        let twice = subjects(&["P1", "P1"]);
        assert!(is_available(&SubjectId::from("P1"), &once, 5));
        assert!(!is_available(&SubjectId::from("P1"), &twice, 5));
    }

    #[test]
    fn test_candidates_exclude_other_round_subject() {
        let catalog = subjects(&["P1", "P2", "P3", "P4"]);
        let mut team = Team::new(TeamId::from("AAA"));
        team.accept(Round::First, SubjectId::from("P2"));

        let found = candidates(&catalog, &team, &subjects(&["P3"]), 3, Round::Second);
        assert_eq!(found, subjects(&["P1", "P4"]));
    }

    #[test]
    fn test_candidates_keep_previously_rejected_subjects() {
        let catalog = subjects(&["P1", "P2"]);
        let mut team = Team::new(TeamId::from("AAA"));
        team.reject(Round::First, SubjectId::from("P1"));

        let found = candidates(&catalog, &team, &[], 3, Round::First);
        assert_eq!(found, catalog);
    }

    #[test]
    fn test_presentation_order_moves_pair_first() {
        let teams = teams_with(
            &[("T1", "P3"), ("T2", "P1"), ("T3", "P2"), ("T4", "P3"), ("T5", "P4")],
            Round::First,
        );
        let order = ids(&["T1", "T2", "T3", "T4", "T5"]);

        assert_eq!(
            presentation_order(&order, &teams, Round::First),
            ids(&["T1", "T4", "T2", "T3", "T5"])
        );
    }

    #[test]
    fn test_presentation_order_two_pairs_in_encounter_order() {
        let teams = teams_with(
            &[("T1", "P1"), ("T2", "P2"), ("T3", "P9"), ("T4", "P2"), ("T5", "P1")],
            Round::First,
        );
        let order = ids(&["T3", "T2", "T1", "T4", "T5"]);

        assert_eq!(
            presentation_order(&order, &teams, Round::First),
            ids(&["T2", "T4", "T1", "T5", "T3"])
        );
    }

    #[test]
    fn test_presentation_order_without_pairs_is_unchanged() {
        let teams = teams_with(
            &[("T1", "P1"), ("T2", "P2"), ("T3", "P3"), ("T4", "P4"), ("T5", "P5")],
            Round::First,
        );
        let order = ids(&["T5", "T4", "T3", "T2", "T1"]);
        assert_eq!(presentation_order(&order, &teams, Round::First), order);
    }
}
