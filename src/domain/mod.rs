// Domain layer: the watchlist document model and the source port.

pub mod model;
pub mod ports;

pub use model::{CollectionWindow, ConfigurationDocument, Instrument, Settings};
pub use ports::ConfigSource;
