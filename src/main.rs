use clap::Parser;
use qbank::core::report::{render_bank_summary, render_input_summary, render_merge_report};
use qbank::core::summary::{summarize_banks, summarize_input};
use qbank::utils::{logger, validation::Validate};
use qbank::{
    BankStore, CliConfig, LocalStorage, MergeEngine, MergeOptions, Mode, QbankError,
    ReportOptions,
};
use std::path::Path;

async fn read_input(path: &Path) -> qbank::Result<serde_json::Value> {
    let data = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&data)?)
}

async fn run(config: &CliConfig) -> qbank::Result<()> {
    let settings = config.settings()?;
    settings.validate()?;
    tracing::debug!("Settings: {:?}", settings);

    let storage = LocalStorage::new(settings.data_dir.clone());
    let store = BankStore::new(storage, settings);
    let report_options = ReportOptions::from_config(config.report_duplicates, store.config());

    match config.mode() {
        Mode::SummarizeBanks => {
            let summary = summarize_banks(&store).await?;
            print!("{}", render_bank_summary(&summary));
        }
        Mode::SummarizeInput(path) => {
            let payload = read_input(&path).await?;
            let summary = summarize_input(&payload)?;
            print!("{}", render_input_summary(&summary));
        }
        Mode::Merge(path) => {
            tracing::info!("Merging {}", path.display());
            let payload = read_input(&path).await?;
            let engine = MergeEngine::new(
                store,
                MergeOptions {
                    report_duplicates: config.report_duplicates,
                    dry_run: config.dry_run,
                },
            );
            let report = engine.run(&payload).await?;
            tracing::info!(
                "✅ Merge finished: {} added, {} total",
                report.total_added(),
                report.total_questions()
            );
            print!("{}", render_merge_report(&report, &report_options));
        }
    }

    Ok(())
}

fn report_failure(e: &QbankError) {
    tracing::error!("❌ Run failed: {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    match e {
        QbankError::Validation(_) => eprintln!("{}", e.user_friendly_message()),
        _ => eprintln!("❌ {}", e.user_friendly_message()),
    }
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(&config).await {
        report_failure(&e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}
