use crate::domain::model::{CollectionWindow, ConfigurationDocument};
use crate::utils::error::{ConfigError, Result};
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct SectorSummary {
    pub sector: String,
    pub tickers: Vec<String>,
}

/// 設定文件的摘要，供 CLI 顯示
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistReport {
    pub description: String,
    pub months: u32,
    pub window: CollectionWindow,
    pub instrument_count: usize,
    pub sectors: Vec<SectorSummary>,
    pub duplicate_tickers: Vec<String>,
}

pub fn inspect(document: &ConfigurationDocument, as_of: NaiveDate, strict: bool) -> Result<WatchlistReport> {
    let window = document.settings.collection_window(as_of)?;

    let duplicates = document.duplicate_tickers();
    for ticker in &duplicates {
        tracing::warn!("⚠️ Ticker '{}' is listed more than once", ticker);
    }
    if strict {
        if let Some(ticker) = duplicates.first() {
            return Err(ConfigError::DuplicateTicker {
                ticker: ticker.to_string(),
            });
        }
    }

    let sectors = document
        .by_sector()
        .into_iter()
        .map(|(sector, instruments)| SectorSummary {
            sector: sector.to_string(),
            tickers: instruments.iter().map(|i| i.ticker.clone()).collect(),
        })
        .collect();

    Ok(WatchlistReport {
        description: document.settings.description.clone(),
        months: document.settings.data_collection_months,
        window,
        instrument_count: document.instruments.len(),
        sectors,
        duplicate_tickers: duplicates.into_iter().map(String::from).collect(),
    })
}

impl fmt::Display for WatchlistReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📋 {}", self.description)?;
        writeln!(
            f,
            "📅 {} months: {} ~ {} ({} days)",
            self.months,
            self.window.start,
            self.window.end,
            self.window.days()
        )?;
        writeln!(f, "📈 {} instruments", self.instrument_count)?;
        for sector in &self.sectors {
            writeln!(f, "   {}: {}", sector.sector, sector.tickers.join(", "))?;
        }
        if !self.duplicate_tickers.is_empty() {
            writeln!(f, "⚠️ duplicate tickers: {}", self.duplicate_tickers.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Instrument, Settings};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }

    fn document() -> ConfigurationDocument {
        ConfigurationDocument::new(
            Settings::new(3, "Q4 review"),
            vec![
                Instrument::new("TSLA", "Tesla Inc.", "Consumer Discretionary"),
                Instrument::new("AAPL", "Apple Inc.", "Information Technology"),
                Instrument::new("AMZN", "Amazon.com Inc.", "Consumer Discretionary"),
            ],
        )
    }

    #[test]
    fn test_inspect_summary() {
        let report = inspect(&document(), as_of(), true).unwrap();
        assert_eq!(report.instrument_count, 3);
        assert_eq!(report.window.start, NaiveDate::from_ymd_opt(2024, 9, 30).unwrap());
        assert_eq!(report.sectors[0].sector, "Consumer Discretionary");
        assert_eq!(report.sectors[0].tickers, vec!["TSLA", "AMZN"]);

        let text = report.to_string();
        assert!(text.contains("Q4 review"));
        assert!(text.contains("Information Technology: AAPL"));
    }

    #[test]
    fn test_duplicates_warn_unless_strict() {
        let mut doc = document();
        doc.instruments.push(Instrument::new("AAPL", "Apple", "Information Technology"));

        let report = inspect(&doc, as_of(), false).unwrap();
        assert_eq!(report.duplicate_tickers, vec!["AAPL"]);

        let err = inspect(&doc, as_of(), true).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTicker { ref ticker } if ticker == "AAPL"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_empty_watchlist() {
        let doc = ConfigurationDocument::new(Settings::new(1, ""), vec![]);
        let report = inspect(&doc, as_of(), true).unwrap();
        assert_eq!(report.instrument_count, 0);
        assert!(report.sectors.is_empty());
    }
}
