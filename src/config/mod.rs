pub mod application_settings;

pub use application_settings::{ApiConfig, ApiVariant, LoggingConfig, ModelConfig, ServerConfig, Settings};
