//! Validation of an untyped document into a [`ConfigurationDocument`].
//!
//! Checks run settings first, then instruments in order, and stop at the
//! first violation. Field values are copied verbatim.

use crate::domain::model::{instrument_path, ConfigurationDocument, Instrument, Settings, MONTHS_PATH};
use crate::utils::error::ValidationError;
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_required_field};
use serde_json::{Map, Value};

pub const ROOT_PATH: &str = "<root>";
pub const SETTINGS_PATH: &str = "settings";
pub const DESCRIPTION_PATH: &str = "settings.description";
pub const INSTRUMENTS_PATH: &str = "instruments";

/// 設定區塊可接受的鍵名，第一個為序列化時使用的名稱
pub const SETTINGS_KEYS: &[&str] = &["config", "settings"];
/// `stocks` 為舊版資料收集腳本讀取的鍵名
pub const INSTRUMENTS_KEYS: &[&str] = &["Stocks", "stocks", "instruments"];

pub fn validate(raw: &Value) -> Result<ConfigurationDocument, ValidationError> {
    let root = raw
        .as_object()
        .ok_or_else(|| ValidationError::wrong_type(ROOT_PATH, "an object"))?;

    let settings = validate_settings(lookup(root, SETTINGS_KEYS))?;
    let instruments = validate_instruments(lookup(root, INSTRUMENTS_KEYS))?;

    Ok(ConfigurationDocument {
        settings,
        instruments,
    })
}

/// null 與缺少欄位同樣視為缺漏
fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn validate_settings(value: Option<&Value>) -> Result<Settings, ValidationError> {
    let value = validate_required_field(SETTINGS_PATH, &value)?;
    let block = value
        .as_object()
        .ok_or_else(|| ValidationError::wrong_type(SETTINGS_PATH, "an object"))?;

    let months = block.get("dataCollectionMonths").filter(|v| !v.is_null());
    let months = validate_months(validate_required_field(MONTHS_PATH, &months)?)?;

    let description = block.get("description").filter(|v| !v.is_null());
    let description = validate_required_field(DESCRIPTION_PATH, &description)?
        .as_str()
        .ok_or_else(|| ValidationError::wrong_type(DESCRIPTION_PATH, "text"))?;

    Ok(Settings {
        data_collection_months: months,
        description: description.to_string(),
    })
}

fn validate_months(value: &Value) -> Result<u32, ValidationError> {
    let number = match value {
        Value::Number(n) => n,
        _ => return Err(ValidationError::wrong_type(MONTHS_PATH, "an integer")),
    };

    if let Some(months) = number.as_i64() {
        validate_range(MONTHS_PATH, months, 1, i64::from(u32::MAX))?;
        return Ok(months as u32);
    }

    if number.is_u64() {
        // 超過 i64 的正整數
        return Err(ValidationError::invalid_range(
            MONTHS_PATH,
            format!("value {} must be between 1 and {}", number, u32::MAX),
        ));
    }

    Err(ValidationError::wrong_type(MONTHS_PATH, "an integer"))
}

fn validate_instruments(value: Option<&Value>) -> Result<Vec<Instrument>, ValidationError> {
    let value = validate_required_field(INSTRUMENTS_PATH, &value)?;
    let entries = value
        .as_array()
        .ok_or_else(|| ValidationError::wrong_type(INSTRUMENTS_PATH, "an array"))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| validate_instrument(index, entry))
        .collect()
}

fn validate_instrument(index: usize, entry: &Value) -> Result<Instrument, ValidationError> {
    let object = entry
        .as_object()
        .ok_or_else(|| ValidationError::wrong_type(format!("instruments[{}]", index), "an object"))?;

    Ok(Instrument {
        ticker: required_text(object, index, "ticker")?,
        name: required_text(object, index, "name")?,
        sector: required_text(object, index, "sector")?,
    })
}

fn required_text(object: &Map<String, Value>, index: usize, field: &str) -> Result<String, ValidationError> {
    let path = instrument_path(index, field);
    match object.get(field) {
        None | Some(Value::Null) => Err(ValidationError::missing(path)),
        Some(Value::String(text)) => {
            validate_non_empty_string(&path, text)?;
            Ok(text.clone())
        }
        Some(_) => Err(ValidationError::wrong_type(path, "text")),
    }
}
