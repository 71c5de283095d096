use crate::core::rendezvous::Inbox;
use crate::domain::model::{Response, SubmissionValue, TeamId, ValueKind};
use crate::domain::ports::DrawHooks;
use crate::utils::error::Result;
use std::collections::{BTreeMap, BTreeSet};

/// 向每支隊伍收集一次骰子，直到所有點數都不同為止。
///
/// Only the teams rolling in the current pass can collide: with each other,
/// or with a value some other team already holds. A team whose value was
/// unique when it rolled keeps that value until the end.
pub async fn collect_rolls(
    inbox: &mut Inbox,
    hooks: &dyn DrawHooks,
    teams: &[TeamId],
    faces: u32,
) -> Result<BTreeMap<TeamId, u32>> {
    let members: BTreeSet<&TeamId> = teams.iter().collect();
    let mut settled: BTreeMap<TeamId, u32> = BTreeMap::new();
    let mut waiting: BTreeSet<TeamId> = teams.iter().cloned().collect();

    while !waiting.is_empty() {
        let mut fresh: BTreeMap<TeamId, u32> = BTreeMap::new();

        while !waiting.is_empty() {
            let pending = inbox.next(ValueKind::Roll, None, hooks).await?;
            let team = pending.team().clone();
            let roll = match pending.value() {
                SubmissionValue::Roll(roll) => *roll,
                _ => unreachable!("inbox only yields rolls here"),
            };

            if !members.contains(&team) {
                tracing::warn!(team = %team, "⚠️ roll from a team outside this draw");
                hooks.warn_wrong_team(None, &team).await;
                pending.release(Response::Discarded);
            } else if !waiting.contains(&team) {
                tracing::warn!(team = %team, "⚠️ team already rolled");
                hooks.warn_twice(&team, ValueKind::Roll).await;
                pending.release(Response::Discarded);
            } else if roll == 0 || roll > faces {
                tracing::warn!(team = %team, roll, faces, "⚠️ roll out of range");
                hooks
                    .warn_unwanted(&team, ValueKind::Roll, &SubmissionValue::Roll(roll))
                    .await;
                pending.release(Response::Discarded);
            } else {
                tracing::debug!(team = %team, roll, "🎲 roll recorded");
                waiting.remove(&team);
                fresh.insert(team, roll);
                pending.release(Response::Processed);
            }
        }

        let collisions = find_collisions(&settled, &fresh);
        for team in &collisions {
            fresh.remove(team);
        }
        settled.extend(fresh);

        if !collisions.is_empty() {
            tracing::info!(teams = ?collisions, "🔁 dice collision, rolling again");
            hooks.warn_collisions(&collisions).await;
            waiting.extend(collisions);
        }
    }

    Ok(settled)
}

/// Teams of `fresh` whose value is shared with another fresh team or is
/// already held in `settled`, in team order.
pub fn find_collisions(
    settled: &BTreeMap<TeamId, u32>,
    fresh: &BTreeMap<TeamId, u32>,
) -> Vec<TeamId> {
    let taken: BTreeSet<u32> = settled.values().copied().collect();
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for roll in fresh.values() {
        *counts.entry(*roll).or_default() += 1;
    }

    // BTreeMap 迭代已依隊伍排序
    fresh
        .iter()
        .filter(|(_, roll)| taken.contains(*roll) || counts[*roll] > 1)
        .map(|(team, _)| team.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolls(values: &[(&str, u32)]) -> BTreeMap<TeamId, u32> {
        values
            .iter()
            .map(|(team, roll)| (TeamId::from(*team), *roll))
            .collect()
    }

    #[test]
    fn test_find_collisions_none() {
        let none = BTreeMap::new();
        assert!(find_collisions(&none, &rolls(&[("T1", 50), ("T2", 10), ("T3", 90)])).is_empty());
    }

    #[test]
    fn test_find_collisions_reports_every_tied_team() {
        let found = find_collisions(&BTreeMap::new(), &rolls(&[
            ("T1", 42),
            ("T2", 42),
            ("T3", 7),
            ("T4", 13),
            ("T5", 13),
        ]));
        assert_eq!(
            found,
            vec![
                TeamId::from("T1"),
                TeamId::from("T2"),
                TeamId::from("T4"),
                TeamId::from("T5")
            ]
        );
    }

    #[test]
    fn test_settled_values_are_never_flagged() {
        let settled = rolls(&[("T3", 7)]);
        let found = find_collisions(&settled, &rolls(&[("T1", 7), ("T2", 99)]));
        assert_eq!(found, vec![TeamId::from("T1")]);
    }

    #[test]
    fn test_rerollers_tied_with_each_other_and_settled() {
        let settled = rolls(&[("T3", 7)]);
        let found = find_collisions(&settled, &rolls(&[("T1", 7), ("T2", 7), ("T4", 20)]));
        assert_eq!(found, vec![TeamId::from("T1"), TeamId::from("T2")]);
    }
}
