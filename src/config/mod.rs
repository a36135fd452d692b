pub mod cli;
pub mod loader;
pub mod schema;

pub use loader::DocumentFormat;

#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::Parser;

/// 預設讀取資料收集腳本使用的設定檔位置
pub const DEFAULT_CONFIG_PATH: &str = "config/target-stocks.json";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "watchlist-config")]
#[command(about = "Validate and summarise a stock watchlist configuration")]
pub struct CliConfig {
    /// Path to the configuration document (JSON or TOML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override format detection from the file extension
    #[arg(long, value_enum)]
    pub format: Option<DocumentFormat>,

    /// End date of the collection window (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Treat duplicate tickers as an error
    #[arg(long)]
    pub strict: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn document_format(&self) -> DocumentFormat {
        self.format
            .unwrap_or_else(|| DocumentFormat::from_path(&self.config))
    }

    pub fn log_format(&self) -> LogFormat {
        if self.json_logs {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["watchlist-config"]);
        assert_eq!(config.config, DEFAULT_CONFIG_PATH);
        assert_eq!(config.document_format(), DocumentFormat::Json);
        assert!(config.as_of.is_none());
        assert!(!config.strict);
        assert_eq!(config.log_format(), LogFormat::Compact);
    }

    #[test]
    fn test_cli_overrides() {
        let config = CliConfig::parse_from([
            "watchlist-config",
            "--config",
            "watchlist.json",
            "--format",
            "toml",
            "--as-of",
            "2024-06-30",
            "--strict",
            "--json-logs",
        ]);
        assert_eq!(config.document_format(), DocumentFormat::Toml);
        assert_eq!(config.as_of, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert!(config.strict);
        assert_eq!(config.log_format(), LogFormat::Json);
    }
}
