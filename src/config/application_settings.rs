use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

/// Which request/response envelope the prediction routes speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVariant {
    /// Flat body with base64 encoded `document` and `typeSystem`; base64 XMI response.
    Base64,
    /// `metadata` + `document.xmi` body with raw XMI and type system; raw XMI response.
    Inception,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted JSON body size in bytes.
    pub payload_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            payload_limit: 32 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub variant: ApiVariant,
    /// Where the inception variant drops the last NER training body.
    pub train_dump_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            variant: ApiVariant::Base64,
            train_dump_path: "ner_train.json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to a lexicon model file (JSON, or YAML by extension). The bundled English model is used when unset.
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Loads `path` if present, then applies `APP_` environment overrides such as
    /// `APP_SERVER__PORT=8080`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(env) = std::env::var("APP_ENV") {
            builder = builder.add_source(File::with_name(&format!("config.{}", env)).required(false));
        }

        builder.build()?.try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
