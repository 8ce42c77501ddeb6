pub mod config;
pub mod config_loader;
pub mod traits;

pub use config::{AppConfig, HaokanConfig, IngestionConfig, ServerConfig, StorageConfig};
pub use config_loader::ConfigLoader;
pub use traits::{Clock, FixedClock, SystemClock};
