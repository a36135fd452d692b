use crate::config::schema;
use crate::domain::model::ConfigurationDocument;
use crate::domain::ports::ConfigSource;
use crate::utils::error::{ConfigError, Result};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DocumentFormat {
    #[default]
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` 以外的副檔名一律當作 JSON
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => f.write_str("JSON"),
            DocumentFormat::Toml => f.write_str("TOML"),
        }
    }
}

fn env_var_pattern() -> Result<Regex> {
    Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::parse("template", e.to_string()))
}

fn expand_env_vars(re: &Regex, text: &str) -> String {
    re.replace_all(text, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

/// 替換環境變數 (例如 ${API_KEY})，未定義的變數保持原樣
pub fn substitute_env_vars(content: &str) -> Result<String> {
    Ok(expand_env_vars(&env_var_pattern()?, content))
}

/// 只替換已解析文件中的字串值，鍵名與文件結構不受環境變數內容影響
pub fn substitute_in_value(value: &mut Value) -> Result<()> {
    let re = env_var_pattern()?;
    substitute_leaves(&re, value);
    Ok(())
}

fn substitute_leaves(re: &Regex, value: &mut Value) {
    match value {
        Value::String(text) => {
            if re.is_match(text) {
                *text = expand_env_vars(re, text);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|item| substitute_leaves(re, item)),
        Value::Object(map) => map.values_mut().for_each(|item| substitute_leaves(re, item)),
        _ => {}
    }
}

pub fn parse_raw(content: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content)
            .map_err(|e| ConfigError::parse(format.to_string(), e.to_string())),
        DocumentFormat::Toml => toml::from_str(content)
            .map_err(|e| ConfigError::parse(format.to_string(), e.to_string())),
    }
}

/// 解析並驗證設定文件字串
pub fn from_str(content: &str, format: DocumentFormat) -> Result<ConfigurationDocument> {
    let mut raw = parse_raw(content, format)?;
    substitute_in_value(&mut raw)?;
    let document = schema::validate(&raw)?;

    tracing::debug!(
        "Parsed {} document with {} instruments",
        format,
        document.instruments.len()
    );

    Ok(document)
}

pub async fn load<S: ConfigSource + ?Sized>(source: &S, format: DocumentFormat) -> Result<ConfigurationDocument> {
    tracing::debug!("Reading configuration from {}", source.describe());

    let bytes = source.read_raw().await?;
    let content = String::from_utf8(bytes).map_err(|e| {
        ConfigError::parse(format.to_string(), format!("{} is not valid UTF-8: {}", source.describe(), e))
    })?;

    from_str(&content, format)
}

/// 從檔案載入，格式依副檔名判斷
pub async fn load_file<P: AsRef<Path>>(path: P) -> Result<ConfigurationDocument> {
    let format = DocumentFormat::from_path(&path);
    let source = crate::config::cli::LocalFileSource::new(path.as_ref());
    load(&source, format).await
}
