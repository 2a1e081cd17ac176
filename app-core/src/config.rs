use history_map::{ClusterConfig, DEFAULT_EVENT_COUNT, FAVOURITES_KEY};
use serde::Deserialize;

/// Path of an optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "HISTORY_MAP_CONFIG";
/// Access token for the map surface. Read at build time on the web.
pub const ACCESS_TOKEN_VAR: &str = "HISTORY_MAP_ACCESS_TOKEN";
pub const EVENT_COUNT_VAR: &str = "HISTORY_MAP_EVENT_COUNT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },
}

/// Application configuration.
///
/// Example file:
/// ```toml
/// event_count = 20000
/// access_token = "pk.xxxx"
///
/// [cluster]
/// max_zoom = 12
/// radius = 40.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Number of synthetic events generated at startup
    pub event_count: usize,
    pub access_token: Option<String>,
    /// Storage key of the favourites list
    pub favourites_key: String,
    pub cluster: ClusterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            event_count: DEFAULT_EVENT_COUNT,
            access_token: None,
            favourites_key: FAVOURITES_KEY.to_string(),
            cluster: ClusterConfig::default(),
        }
    }
}

impl AppConfig {
    /// # Errors
    /// Returns the TOML error for malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads the file named by [`CONFIG_PATH_VAR`], if any, then applies
    /// environment overrides.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read or parsed or an
    /// override is malformed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                let config = Self::from_toml_str(&text)
                    .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
                log::info!("loaded config from {path}");
                config
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Defaults plus the access token baked in at build time.
    ///
    /// # Errors
    /// Never fails on the web; the signature matches the native loader.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.access_token = option_env!("HISTORY_MAP_ACCESS_TOKEN").map(str::to_string);
        Ok(config)
    }

    /// Like [`AppConfig::load`] but falls back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            log::warn!("using default config: {err}");
            Self::default()
        })
    }

    /// Applies [`ACCESS_TOKEN_VAR`] and [`EVENT_COUNT_VAR`] from `get`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Env`] if the event count is not a number.
    pub fn apply_overrides(
        &mut self,
        get: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(token) = get(ACCESS_TOKEN_VAR) {
            self.access_token = Some(token);
        }
        if let Some(raw) = get(EVENT_COUNT_VAR) {
            self.event_count = raw.trim().parse().map_err(|_| ConfigError::Env {
                var: EVENT_COUNT_VAR,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }
}
