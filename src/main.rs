use clap::Parser;
use watchlist_config::utils::logger;
use watchlist_config::{config::loader, inspect, CliConfig, ConfigError, LocalFileSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.log_format(), config.verbose);

    tracing::info!("🚀 Starting watchlist-config");
    tracing::debug!("CLI config: {:?}", config);

    let format = config.document_format();
    tracing::info!("📁 Loading {} configuration from: {}", format, config.config);

    let source = LocalFileSource::new(&config.config);
    let as_of = config
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let result = loader::load(&source, format)
        .await
        .and_then(|document| inspect(&document, as_of, config.strict));

    match result {
        Ok(report) => {
            tracing::info!(
                "✅ Configuration is valid: {} instruments, {} months",
                report.instrument_count,
                report.months
            );
            print!("{}", report);
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

fn exit_with(e: &ConfigError) -> ! {
    tracing::error!("❌ Configuration check failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
