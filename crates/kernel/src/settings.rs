use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "PRATKI_ENV";
const CONFIG_DIR_ENV: &str = "PRATKI_CONFIG_DIR";
const ENV_PREFIX: &str = "PRATKI";

/// Deployment environment the tool is running against.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Explicit inputs that take precedence over `PRATKI_ENV` / `PRATKI_CONFIG_DIR`.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub environment: Option<String>,
    pub config_dir: Option<PathBuf>,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub schema: SchemaSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(LoadOptions::default())
    }

    /// Same as [`Settings::load`], with the environment name and config
    /// directory optionally pinned by the caller.
    pub fn load_with(options: LoadOptions) -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = match options.environment {
            Some(environment) => environment,
            None => std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string()),
        };
        let parsed_environment = Environment::parse(&environment)?;

        let config_dir = match options.config_dir {
            Some(dir) => dir,
            None => match std::env::var(CONFIG_DIR_ENV) {
                Ok(dir) => PathBuf::from(dir),
                Err(_) => std::env::current_dir()
                    .with_context(|| "unable to resolve current directory")?
                    .join("config"),
            },
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parsed_environment;

        tracing::debug!(
            environment = ?settings.environment,
            config_dir = %config_dir.display(),
            "settings loaded"
        );

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_uri")]
    pub uri: String,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_app_name")]
    pub app_name: String,
    #[serde(default = "DatabaseSettings::default_server_selection_timeout_ms")]
    pub server_selection_timeout_ms: u64,
}

impl DatabaseSettings {
    fn default_uri() -> String {
        "mongodb://localhost:27017".to_string()
    }

    fn default_name() -> String {
        "pratki".to_string()
    }

    fn default_app_name() -> String {
        "pratki-schema".to_string()
    }

    fn default_server_selection_timeout_ms() -> u64 {
        5000
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: Self::default_uri(),
            name: Self::default_name(),
            app_name: Self::default_app_name(),
            server_selection_timeout_ms: Self::default_server_selection_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default = "TelemetrySettings::default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl TelemetrySettings {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Controls how schema provisioning reacts to a failed statement.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SchemaSettings {
    /// Stop at the first failed statement instead of attempting the rest.
    #[serde(default)]
    pub fail_fast: bool,
}
