use crate::config::toml_config::TomlConfig;
use crate::domain::model::TeamId;
use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "draw-engine")]
#[command(about = "Runs a simulated two-round subject draw")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "draw.toml")]
    pub config: String,

    /// Override the team roster (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub teams: Vec<String>,

    /// Override the subject draw seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Probability that a simulated captain accepts a drawn subject
    #[arg(long)]
    pub accept_rate: Option<f64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Print the final report as JSON")]
    pub json: bool,

    /// Validate the configuration without running the draw
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// 將命令列覆蓋套用到設定檔
    pub fn apply_overrides(&self, config: &mut TomlConfig) -> Result<()> {
        if !self.teams.is_empty() {
            config.teams.roster = self.teams.iter().map(|t| TeamId::new(t.trim())).collect();
            tracing::info!("🔧 Roster overridden: {:?}", config.teams.roster);
        }

        if let Some(seed) = self.seed {
            config.draw.seed = Some(seed);
            tracing::info!("🔧 Seed overridden to: {}", seed);
        }

        if let Some(rate) = self.accept_rate {
            validate_range("accept_rate", rate, 0.0, 1.0)?;
            config
                .simulation
                .get_or_insert(crate::config::toml_config::SimulationConfig { accept_rate: None })
                .accept_rate = Some(rate);
            tracing::info!("🔧 Accept rate overridden to: {}", rate);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_roster_and_seed() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[draw]
subjects = ["P1", "P2", "P3", "P4"]
format = [3]

[teams]
roster = ["AAA", "BBB", "CCC"]
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "draw-engine",
            "--teams",
            "XXX,YYY,ZZZ",
            "--seed",
            "9",
            "--accept-rate",
            "0.8",
        ]);
        cli.apply_overrides(&mut config).unwrap();

        assert_eq!(config.roster()[0], TeamId::from("XXX"));
        assert_eq!(config.draw.seed, Some(9));
        assert_eq!(config.accept_rate(), 0.8);
    }

    #[test]
    fn test_accept_rate_out_of_range() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[draw]
subjects = ["P1", "P2", "P3", "P4"]
format = [3]

[teams]
roster = ["AAA", "BBB", "CCC"]
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from(["draw-engine", "--accept-rate", "2"]);
        assert!(cli.apply_overrides(&mut config).is_err());
    }
}
