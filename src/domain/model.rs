use crate::utils::error::ValidationError;
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const MONTHS_PATH: &str = "settings.dataCollectionMonths";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// 資料收集期間 (月)
    pub data_collection_months: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub ticker: String,
    pub name: String,
    pub sector: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    #[serde(rename = "config", alias = "settings")]
    pub settings: Settings,
    #[serde(rename = "Stocks", alias = "stocks", alias = "instruments")]
    pub instruments: Vec<Instrument>,
}

/// 以 `end` 為終點往回推 `data_collection_months` 個月的收集區間 (含兩端)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CollectionWindow {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl Settings {
    pub fn new(data_collection_months: u32, description: impl Into<String>) -> Self {
        Self {
            data_collection_months,
            description: description.into(),
        }
    }

    /// 月份相減依日曆計算；月底日期會收斂到目標月份的最後一天 (3/31 - 1 個月 = 2/28 或 2/29)
    pub fn collection_window(&self, end: NaiveDate) -> Result<CollectionWindow, ValidationError> {
        self.validate()?;
        let start = end
            .checked_sub_months(Months::new(self.data_collection_months))
            .ok_or_else(|| {
                ValidationError::invalid_range(
                    MONTHS_PATH,
                    format!(
                        "{} months before {} is outside the supported date range",
                        self.data_collection_months, end
                    ),
                )
            })?;
        Ok(CollectionWindow { start, end })
    }
}

impl Instrument {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            sector: sector.into(),
        }
    }

    /// `index` 為清單中的位置；單獨驗證時使用欄位名稱作為路徑
    fn validate_at(&self, index: Option<usize>) -> Result<(), ValidationError> {
        let path = |field: &str| match index {
            Some(index) => instrument_path(index, field),
            None => field.to_string(),
        };
        validate_non_empty_string(&path("ticker"), &self.ticker)?;
        validate_non_empty_string(&path("name"), &self.name)?;
        validate_non_empty_string(&path("sector"), &self.sector)?;
        Ok(())
    }
}

pub(crate) fn instrument_path(index: usize, field: &str) -> String {
    format!("instruments[{}].{}", index, field)
}

impl ConfigurationDocument {
    pub fn new(settings: Settings, instruments: Vec<Instrument>) -> Self {
        Self {
            settings,
            instruments,
        }
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.instruments.iter().map(|i| i.ticker.as_str())
    }

    /// 精確比對 ticker，重複時回傳第一筆
    pub fn instrument(&self, ticker: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.ticker == ticker)
    }

    pub fn ticker_names(&self) -> Vec<(&str, &str)> {
        self.instruments
            .iter()
            .map(|i| (i.ticker.as_str(), i.name.as_str()))
            .collect()
    }

    pub fn by_sector(&self) -> BTreeMap<&str, Vec<&Instrument>> {
        let mut groups: BTreeMap<&str, Vec<&Instrument>> = BTreeMap::new();
        for instrument in &self.instruments {
            groups
                .entry(instrument.sector.as_str())
                .or_default()
                .push(instrument);
        }
        groups
    }

    /// 每個重複的 ticker 只列一次，依第一次重複出現的順序
    pub fn duplicate_tickers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();

        for ticker in self.tickers() {
            if !seen.insert(ticker) && reported.insert(ticker) {
                duplicates.push(ticker);
            }
        }

        duplicates
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_positive_number(MONTHS_PATH, i64::from(self.data_collection_months), 1)
    }
}

impl Validate for Instrument {
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_at(None)
    }
}

impl Validate for ConfigurationDocument {
    fn validate(&self) -> Result<(), ValidationError> {
        self.settings.validate()?;
        for (index, instrument) in self.instruments.iter().enumerate() {
            instrument.validate_at(Some(index))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ValidationErrorKind;

    fn watchlist() -> ConfigurationDocument {
        ConfigurationDocument::new(
            Settings::new(6, "Q1 watchlist"),
            vec![
                Instrument::new("005930", "삼성전자", "Semiconductors"),
                Instrument::new("035420", "NAVER", "Internet"),
                Instrument::new("000660", "SK하이닉스", "Semiconductors"),
            ],
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_collection_window() {
        let window = Settings::new(12, "").collection_window(date(2024, 6, 15)).unwrap();
        assert_eq!(window.start, date(2023, 6, 15));
        assert_eq!(window.end, date(2024, 6, 15));
        assert_eq!(window.days(), 366);
    }

    #[test]
    fn test_collection_window_clamps_month_end() {
        let window = Settings::new(1, "").collection_window(date(2024, 3, 31)).unwrap();
        assert_eq!(window.start, date(2024, 2, 29));
    }

    #[test]
    fn test_collection_window_rejects_zero_months() {
        let err = Settings::new(0, "").collection_window(date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidRange);
        assert_eq!(err.path, MONTHS_PATH);
    }

    #[test]
    fn test_collection_window_out_of_range() {
        let err = Settings::new(u32::MAX, "").collection_window(date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidRange);
    }

    #[test]
    fn test_lookup_helpers() {
        let doc = watchlist();
        assert_eq!(doc.tickers().collect::<Vec<_>>(), vec!["005930", "035420", "000660"]);
        assert_eq!(doc.instrument("035420").map(|i| i.name.as_str()), Some("NAVER"));
        assert!(doc.instrument("035720").is_none());
        assert_eq!(doc.ticker_names()[0], ("005930", "삼성전자"));
    }

    #[test]
    fn test_by_sector_keeps_order_within_group() {
        let doc = watchlist();
        let groups = doc.by_sector();
        assert_eq!(groups.len(), 2);
        let semis: Vec<&str> = groups["Semiconductors"].iter().map(|i| i.ticker.as_str()).collect();
        assert_eq!(semis, vec!["005930", "000660"]);
    }

    #[test]
    fn test_duplicate_tickers() {
        let mut doc = watchlist();
        assert!(doc.duplicate_tickers().is_empty());

        doc.instruments.push(Instrument::new("035420", "NAVER Corp", "Internet"));
        doc.instruments.push(Instrument::new("005930", "Samsung", "Semiconductors"));
        doc.instruments.push(Instrument::new("035420", "NAVER", "Internet"));
        assert_eq!(doc.duplicate_tickers(), vec!["035420", "005930"]);
    }

    #[test]
    fn test_typed_validation_reports_index() {
        let mut doc = watchlist();
        assert!(doc.validate().is_ok());

        doc.instruments[2].sector = " ".to_string();
        let err = doc.validate().unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert_eq!(err.path, "instruments[2].sector");
    }

    #[test]
    fn test_standalone_instrument_uses_field_path() {
        assert!(Instrument::new("TSLA", "Tesla Inc.", "Consumer Discretionary").validate().is_ok());

        let err = Instrument::new("TSLA", "", "Consumer Discretionary").validate().unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert_eq!(err.path, "name");

        let err = Instrument::new(" ", "Tesla Inc.", "").validate().unwrap_err();
        assert_eq!(err.path, "ticker");
    }

    #[test]
    fn test_serialized_keys() {
        let value = serde_json::to_value(watchlist()).unwrap();
        assert_eq!(value["config"]["dataCollectionMonths"], 6);
        assert_eq!(value["Stocks"][1]["ticker"], "035420");
    }
}
