use anyhow::Context;
use clap::Parser;
use draw_engine::app::simulation::format_report;
use draw_engine::utils::error::{DrawError, ErrorSeverity};
use draw_engine::utils::{logger, validation::Validate};
use draw_engine::{run_simulation, CliConfig, TomlConfig};

fn exit_with(e: &DrawError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Draw failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0, // 警告，但成功
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting draw-engine CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let mut config = match TomlConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = cli.apply_overrides(&mut config) {
        exit_with(&e);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    if cli.dry_run {
        tracing::info!("🔍 Dry run, configuration is valid");
        println!(
            "✅ {} teams, {} subjects, pools {:?}",
            config.roster().len(),
            config.draw.subjects.as_ref().map(Vec::len).unwrap_or(0),
            config.draw.format
        );
        return Ok(());
    }

    let report = match run_simulation(&config).await {
        Ok(report) => report,
        Err(e) => exit_with(&e),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", format_report(&report));
        println!("✅ Draw completed successfully!");
    }

    Ok(())
}
