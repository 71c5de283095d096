use crate::adapters::{AutoPilot, HookChain, LoggingHooks};
use crate::config::toml_config::TomlConfig;
use crate::core::rendezvous;
use crate::core::session::{SessionManager, SessionReport};
use crate::core::ConfigProvider;
use crate::domain::ports::DrawHooks;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::fmt::Write;
use std::sync::Arc;

pub const SIMULATION_SESSION: &str = "simulation";

/// 以模擬隊長跑完整場抽籤，回傳結果摘要
pub async fn run_simulation(config: &TomlConfig) -> Result<SessionReport> {
    config.validate()?;
    let draw_config = config.to_draw_config()?;
    let max_refuse = draw_config.max_refuse();

    let (submitter, inbox) = rendezvous::channel();
    let pilot = AutoPilot::new(
        submitter.clone(),
        config.roster().to_vec(),
        config.dice_faces(),
        config.accept_rate(),
        max_refuse,
        config.seed(),
    );

    // 先記錄再行動，log 的順序才會跟事件一致
    let hooks: Arc<dyn DrawHooks> = Arc::new(
        HookChain::new()
            .with(Arc::new(LoggingHooks::new(max_refuse)))
            .with(Arc::new(pilot)),
    );

    let mut manager = SessionManager::new();
    manager.create_with_channel(
        SIMULATION_SESSION,
        config.roster(),
        draw_config,
        hooks,
        submitter,
        inbox,
    )?;

    let session = manager.finish(SIMULATION_SESSION).await?;
    tracing::info!(
        pools = session.pools.len(),
        complete = session.is_complete(),
        "✅ simulation finished"
    );

    Ok(session.report(max_refuse))
}

/// Plain-text rendering of a report, one block per pool.
pub fn format_report(report: &SessionReport) -> String {
    let mut out = String::new();

    for pool in &report.pools {
        let _ = writeln!(out, "Pool {}", pool.pool);
        for team in &pool.teams {
            let _ = writeln!(
                out,
                "  {:<8} {:<24} coeff {:.1}  rejected [{}]",
                team.team.as_str(),
                team.accepted.as_ref().map(|s| s.as_str()).unwrap_or("-"),
                team.coeff,
                team.rejected
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Round;
    use std::collections::HashSet;
    use std::time::Duration;

    fn config(accept_rate: f64) -> TomlConfig {
        TomlConfig::from_toml_str(&format!(
            r#"
[draw]
subjects = ["P1", "P2", "P3", "P4", "P5", "P6", "P7", "P8", "P9"]
format = [3, 4, 5]
seed = 2024

[teams]
roster = ["T01", "T02", "T03", "T04", "T05", "T06", "T07", "T08", "T09", "T10", "T11", "T12"]

[simulation]
accept_rate = {:?}
"#,
            accept_rate
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_simulation_assigns_every_team_twice() {
        let report = tokio::time::timeout(Duration::from_secs(10), run_simulation(&config(0.4)))
            .await
            .expect("simulation should not hang")
            .unwrap();

        assert_eq!(report.pools.len(), 6);
        assert!(report.finished_at.is_some());
        assert_eq!(report.max_refuse, 4);

        for round in Round::ALL {
            let mut seen = HashSet::new();
            for pool in report.pools.iter().filter(|p| p.round == round) {
                for team in &pool.teams {
                    assert!(team.accepted.is_some(), "{} has no subject", team.team);
                    assert!(seen.insert(team.team.clone()), "{} in two pools", team.team);
                }
            }
            assert_eq!(seen.len(), 12);
        }
    }

    #[tokio::test]
    async fn test_always_accepting_captains_never_lose_coefficient() {
        let report = tokio::time::timeout(Duration::from_secs(10), run_simulation(&config(1.0)))
            .await
            .expect("simulation should not hang")
            .unwrap();

        for pool in &report.pools {
            for team in &pool.teams {
                assert!(team.rejected.is_empty());
                assert_eq!(team.coeff, 2.0);
            }
        }

        let text = format_report(&report);
        assert!(text.contains("Pool A1"));
        assert!(text.contains("Pool C2"));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected_before_start() {
        let mut bad = config(0.5);
        bad.draw.format = vec![3, 3];
        assert!(run_simulation(&bad).await.is_err());
    }
}
