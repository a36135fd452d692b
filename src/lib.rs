pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalFileSource;
pub use config::loader::{load, load_file, DocumentFormat};
pub use config::schema::validate;
pub use core::report::{inspect, WatchlistReport};
pub use domain::{CollectionWindow, ConfigSource, ConfigurationDocument, Instrument, Settings};
pub use utils::error::{ConfigError, Result, ValidationError, ValidationErrorKind};
