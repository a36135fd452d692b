use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    MissingField,
    WrongType,
    InvalidRange,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValidationErrorKind::MissingField => "missing field",
            ValidationErrorKind::WrongType => "wrong type",
            ValidationErrorKind::InvalidRange => "invalid range",
        };
        f.write_str(label)
    }
}

/// 第一個未通過檢查的欄位，`path` 為文件內的點路徑 (例如 `settings.dataCollectionMonths`)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {path}: {message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::MissingField, path, "field is required")
    }

    pub fn wrong_type(path: impl Into<String>, expected: &str) -> Self {
        Self::new(
            ValidationErrorKind::WrongType,
            path,
            format!("expected {}", expected),
        )
    }

    pub fn invalid_range(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::InvalidRange, path, reason)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{format} parsing error: {message}")]
    ParseError { format: String, message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Duplicate ticker in instrument list: {ticker}")]
    DuplicateTicker { ticker: String },
}

impl ConfigError {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }

    /// 回傳驗證錯誤的種類 (非驗證錯誤時為 None)
    pub fn validation_kind(&self) -> Option<ValidationErrorKind> {
        match self {
            ConfigError::Validation(e) => Some(e.kind),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::IoError(e) => format!("Could not read the configuration file: {}", e),
            ConfigError::ParseError { format, message } => {
                format!("The configuration is not valid {}: {}", format, message)
            }
            ConfigError::Validation(e) => match e.kind {
                ValidationErrorKind::MissingField => {
                    format!("Required field '{}' is missing or empty", e.path)
                }
                ValidationErrorKind::WrongType => {
                    format!("Field '{}' has the wrong type ({})", e.path, e.message)
                }
                ValidationErrorKind::InvalidRange => {
                    format!("Field '{}' is out of range: {}", e.path, e.message)
                }
            },
            ConfigError::DuplicateTicker { ticker } => {
                format!("Ticker '{}' appears more than once in the watchlist", ticker)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConfigError::IoError(_) => "Check that the path exists and is readable",
            ConfigError::ParseError { .. } => {
                "Fix the syntax error, or pass --format if the file extension is misleading"
            }
            ConfigError::Validation(e) => match e.kind {
                ValidationErrorKind::MissingField => {
                    "Add the field with a non-empty value; see config/target-stocks.json"
                }
                ValidationErrorKind::WrongType => "Use a number for dataCollectionMonths and text elsewhere",
                ValidationErrorKind::InvalidRange => "dataCollectionMonths must be a positive whole number",
            },
            ConfigError::DuplicateTicker { .. } => {
                "Remove the repeated entry, or run without --strict to only warn"
            }
        }
    }

    /// 依錯誤類型決定 CLI 退出碼
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::Validation(_) | ConfigError::DuplicateTicker { .. } => 1,
            ConfigError::IoError(_) | ConfigError::ParseError { .. } => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
