use crate::core::dice::collect_rolls;
use crate::core::rendezvous::Inbox;
use crate::domain::model::{Pool, Round, TeamId};
use crate::domain::ports::DrawHooks;
use crate::utils::error::Result;
use std::collections::BTreeMap;

/// 兩輪各擲一次骰子，依點數由小到大切成 `format` 指定大小的分組。
pub async fn make_pools(
    inbox: &mut Inbox,
    hooks: &dyn DrawHooks,
    teams: &[TeamId],
    format: &[usize],
    faces: u32,
) -> Result<BTreeMap<Pool, Vec<TeamId>>> {
    assert_eq!(
        format.iter().sum::<usize>(),
        teams.len(),
        "pool format must cover every team"
    );

    let mut pools = BTreeMap::new();
    for round in Round::ALL {
        hooks.notify_pool_round_start(round).await;
        tracing::info!(round = %round, "🎲 collecting dice for pools");

        let rolls = collect_rolls(inbox, hooks, teams, faces).await?;
        pools.extend(partition(&sort_by_roll(&rolls), format, round));
    }

    tracing::info!(pools = pools.len(), "✅ pools formed");
    hooks.notify_pools_formed(&pools).await;
    Ok(pools)
}

/// Teams in ascending roll order.
pub fn sort_by_roll(rolls: &BTreeMap<TeamId, u32>) -> Vec<TeamId> {
    let mut teams: Vec<(&TeamId, u32)> = rolls.iter().map(|(team, roll)| (team, *roll)).collect();
    teams.sort_by_key(|(_, roll)| *roll);
    teams.into_iter().map(|(team, _)| team.clone()).collect()
}

/// Slices `sorted` into consecutive groups labelled A, B, ... for `round`.
pub fn partition(sorted: &[TeamId], format: &[usize], round: Round) -> BTreeMap<Pool, Vec<TeamId>> {
    let mut pools = BTreeMap::new();
    let mut start = 0;
    for (index, &size) in format.iter().enumerate() {
        pools.insert(Pool::nth(index, round), sorted[start..start + size].to_vec());
        start += size;
    }
    pools
}
