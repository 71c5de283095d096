use crate::core::dice::collect_rolls;
use crate::core::rendezvous::Inbox;
use crate::domain::model::{Pool, TeamId};
use crate::domain::ports::DrawHooks;
use crate::utils::error::Result;
use std::collections::BTreeMap;

/// 分組內擲骰決定選題順序，點數大的先選。
pub async fn draw_order(
    inbox: &mut Inbox,
    hooks: &dyn DrawHooks,
    pool: &Pool,
    members: &[TeamId],
    faces: u32,
) -> Result<Vec<TeamId>> {
    hooks.notify_order_start(pool, members).await;
    tracing::info!(pool = %pool, "🎲 collecting dice for draw order");

    let rolls = collect_rolls(inbox, hooks, members, faces).await?;
    let order = sort_by_roll_desc(&rolls);

    tracing::info!(pool = %pool, order = ?order, "✅ draw order formed");
    hooks.notify_order_formed(pool, &order).await;
    Ok(order)
}

pub fn sort_by_roll_desc(rolls: &BTreeMap<TeamId, u32>) -> Vec<TeamId> {
    let mut teams: Vec<(&TeamId, u32)> = rolls.iter().map(|(team, roll)| (team, *roll)).collect();
    teams.sort_by(|a, b| b.1.cmp(&a.1));
    teams.into_iter().map(|(team, _)| team.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_largest_roll_draws_first() {
        let rolls: BTreeMap<TeamId, u32> = [("T2", 80), ("T1", 5), ("T3", 40)]
            .iter()
            .map(|(team, roll)| (TeamId::from(*team), *roll))
            .collect();
        let order = sort_by_roll_desc(&rolls);
        assert_eq!(
            order,
            vec![TeamId::from("T2"), TeamId::from("T3"), TeamId::from("T1")]
        );
    }
}
