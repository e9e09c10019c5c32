use clap::Parser;
use sle_import::core::report::QualityGate;
use sle_import::core::ConfigProvider;
use sle_import::utils::{logger, validation::Validate};
use sle_import::{CliConfig, ImportEngine, JsonlImportPipeline, LocalStorage};

const BANNER_WIDTH: usize = 62;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    if settings.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Resolved settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    print_banner(settings.dry_run());

    let monitor_enabled = settings.monitor();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::default();
    let pipeline = JsonlImportPipeline::new(storage, settings);
    let engine = ImportEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            for collection in &report.reports {
                println!("── {} ──", collection.collection);
                println!("{}", collection.render());
                println!();
            }
            println!("{}", report.render_summary());
            println!(
                "\n  Report saved: {}",
                engine.pipeline().config().report_path()
            );

            if report.status() == QualityGate::Fail {
                tracing::error!("Quality gate failed");
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("IMPORT FAILED: {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    }
}

fn print_banner(dry_run: bool) {
    let mode = if dry_run {
        "DRY RUN (validate only)"
    } else {
        "IMPORT (validate + write)"
    };
    let rule = "═".repeat(BANNER_WIDTH);
    println!("╔{}╗", rule);
    println!("║  {:<width$}║", "SLE AI Companion: JSONL Import Pipeline", width = BANNER_WIDTH - 2);
    println!("║  {:<width$}║", format!("Mode: {}", mode), width = BANNER_WIDTH - 2);
    println!("╚{}╝", rule);
    println!();
}
