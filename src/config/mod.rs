pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{AppConfig, DatabaseConfig, GeneralConfig, LoggingConfig, PaginationConfig};
pub use envconfig::{CONFIG_FILE_VAR, EnvConfig};
