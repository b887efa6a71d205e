//! Application configuration: per-environment profiles, environment variable
//! overrides and JSON persistence.

use std::{
    env, fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::currency::{CurrencyCode, LocaleConfig};
use crate::utils::app_data_dir;

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid value for {key}: `{value}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Deployment profile the configuration was built for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Testing => "testing",
        };
        f.write_str(label)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "testing" | "test" => Ok(Environment::Testing),
            _ => Err(ConfigError::InvalidValue {
                key: "APP_ENV",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "Config::default_graphiql_enabled")]
    pub graphiql_enabled: bool,
    #[serde(default = "Config::default_host")]
    pub host: String,
    #[serde(default = "Config::default_port")]
    pub port: u16,
    #[serde(default = "Config::default_log_level")]
    pub log_level: String,
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            debug: false,
            graphiql_enabled: Self::default_graphiql_enabled(),
            host: Self::default_host(),
            port: Self::default_port(),
            log_level: Self::default_log_level(),
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            plain_output: false,
        }
    }
}

impl Config {
    fn default_graphiql_enabled() -> bool {
        true
    }

    fn default_host() -> String {
        "0.0.0.0".into()
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_log_level() -> String {
        "INFO".into()
    }

    fn default_locale() -> String {
        "en-US".into()
    }

    fn default_currency() -> String {
        "USD".into()
    }

    /// Base defaults with the profile's debug and GraphiQL switches applied.
    pub fn for_environment(environment: Environment) -> Self {
        Self::default().with_profile(environment)
    }

    /// Replaces the debug and GraphiQL switches with the profile's fixed
    /// values. Every profile pins both, so environment switches only survive
    /// on the base configuration.
    pub fn with_profile(self, environment: Environment) -> Self {
        let (debug, graphiql_enabled) = match environment {
            Environment::Development => (true, true),
            Environment::Production => (false, false),
            Environment::Testing => (true, false),
        };
        Self {
            environment,
            debug,
            graphiql_enabled,
            ..self
        }
    }

    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Base configuration before any profile: `FLASK_DEBUG` and
    /// `GRAPHIQL_ENABLED` set the switches, then the server overrides apply.
    pub fn base_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup("FLASK_DEBUG") {
            config.debug = is_true(&value);
        }
        if let Some(value) = lookup("GRAPHIQL_ENABLED") {
            config.graphiql_enabled = is_true(&value);
        }
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Base configuration with the `APP_ENV` profile on top.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV") {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };
        Ok(Self::base_from_lookup(lookup)?.with_profile(environment))
    }

    /// Applies the `HOST`, `PORT` and `LOG_LEVEL` overrides.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("HOST") {
            self.host = value;
        }
        if let Some(value) = lookup("PORT") {
            self.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value })?;
        }
        if let Some(value) = lookup("LOG_LEVEL") {
            self.log_level = value;
        }
        Ok(())
    }

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::from_tag(&self.locale)
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.as_str())
    }

    /// `tracing` filter directive for the configured level.
    pub fn log_directive(&self) -> String {
        let level = match self.log_level.trim().to_ascii_lowercase().as_str() {
            "critical" | "error" => "error",
            "warning" | "warn" => "warn",
            "debug" => "debug",
            "trace" => "trace",
            _ => "info",
        };
        format!("loan_tracker={level}")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Loads and saves [`Config`] as JSON under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the stored configuration, or defaults when nothing is stored.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config = serde_json::from_str(&data)?;
            tracing::info!(path = %self.path.display(), "Loaded configuration");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_all(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/a/config.json")),
            PathBuf::from("/a/config.json.tmp")
        );
    }

    #[test]
    fn log_directive_maps_python_style_levels() {
        let mut config = Config::default();
        assert_eq!(config.log_directive(), "loan_tracker=info");
        config.log_level = "WARNING".into();
        assert_eq!(config.log_directive(), "loan_tracker=warn");
        config.log_level = "nonsense".into();
        assert_eq!(config.log_directive(), "loan_tracker=info");
    }
}
