use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub bridge: BridgeSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

/// Settings for the external recommendation process.
///
/// One process is launched per request; `interpreter` is the executable
/// (e.g. `python3`) and `script` is passed to it as its first argument.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeSettings {
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    pub script: String,
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
    pub workdir: Option<String>,
}

fn default_interpreter() -> String { "python3".to_string() }
fn default_max_output_bytes() -> usize { 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with FUNDSCOPE_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with FUNDSCOPE_)
            // e.g., FUNDSCOPE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("FUNDSCOPE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FUNDSCOPE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment overrides on top of the file-based config.
///
/// `DATABASE_URL` takes precedence over both the config file and the
/// prefixed `FUNDSCOPE__DATABASE__URL` form, so the service picks up the
/// conventional variable that deployment platforms inject.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(script) = env::var("RECOMMEND_SCRIPT") {
        builder = builder.set_override("bridge.script", script)?;
    }
    if let Ok(interpreter) = env::var("RECOMMEND_INTERPRETER") {
        builder = builder.set_override("bridge.interpreter", interpreter)?;
    }

    builder.build()
}
