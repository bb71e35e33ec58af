//! Configuration for the opponent: LLM access and training environment.
//!
//! The credential only ever comes from the environment. Everything else may
//! come from a TOML file, with environment variables taking precedence.
//! Invalid environment values never error; they fall back to defaults.

use crate::training_env::EnvConfig;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_minimax::Player;
use tracing::{debug, info, instrument, warn};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Chat-completion endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Request timeout used when none (or an invalid one) is configured.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Environment variable holding the model name.
pub const MODEL_VAR: &str = "OPENAI_MODEL";
/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the timeout in seconds.
pub const TIMEOUT_VAR: &str = "OPENAI_TIMEOUT";
/// Environment variable overriding the endpoint URL.
pub const ENDPOINT_VAR: &str = "OPENAI_ENDPOINT";

/// Configuration for the remote suggestion client.
#[derive(Clone, Getters, Setters)]
#[setters(prefix = "with_", into)]
pub struct LlmConfig {
    /// Full URL of the chat-completion endpoint.
    service_endpoint: String,

    /// Bearer credential; `None` disables remote suggestions.
    #[getter(skip)]
    #[setters(skip)]
    credential: Option<String>,

    /// Model identifier sent with every request.
    model: String,

    /// Upper bound on a single request, connect to last body byte.
    request_timeout: Duration,
}

impl LlmConfig {
    /// Creates a configuration with defaults and no credential.
    pub fn new() -> Self {
        Self {
            service_endpoint: DEFAULT_ENDPOINT.to_string(),
            credential: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: default_timeout(),
        }
    }

    /// Reads configuration from the process environment.
    #[instrument]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to values.
    ///
    /// Lets tests supply variables without mutating the process environment.
    #[instrument(skip(lookup))]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        LlmSettings::default().resolve(lookup)
    }

    /// Sets the credential. Blank strings count as no credential.
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = non_blank(Some(credential.into()));
        self
    }

    /// Removes the credential, disabling remote suggestions.
    pub fn without_credential(mut self) -> Self {
        self.credential = None;
        self
    }

    /// The credential, if one is configured.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// True when a credential is configured.
    pub fn is_enabled(&self) -> bool {
        self.credential.is_some()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("service_endpoint", &self.service_endpoint)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// The `[llm]` table of a config file.
#[derive(Debug, Clone, Default, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier.
    model: Option<String>,
    /// Endpoint URL.
    endpoint: Option<String>,
    /// Request timeout in seconds.
    timeout_secs: Option<f64>,
}

impl LlmSettings {
    /// Merges these settings with environment values into an [`LlmConfig`].
    ///
    /// Environment values win over file values; invalid or blank values at
    /// either level are skipped.
    #[instrument(skip(self, lookup))]
    pub fn resolve<F>(&self, lookup: F) -> LlmConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = non_blank(lookup(MODEL_VAR))
            .or_else(|| non_blank(self.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let service_endpoint = non_blank(lookup(ENDPOINT_VAR))
            .or_else(|| non_blank(self.endpoint.clone()))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let request_timeout = lookup(TIMEOUT_VAR)
            .and_then(|raw| parse_timeout(&raw))
            .or_else(|| self.timeout_secs.and_then(timeout_from_secs))
            .unwrap_or_else(default_timeout);

        let credential = non_blank(lookup(API_KEY_VAR));
        if credential.is_none() {
            info!("{} not set; remote suggestions disabled", API_KEY_VAR);
        }

        debug!(%model, %service_endpoint, ?request_timeout, "Resolved LLM config");
        LlmConfig {
            service_endpoint,
            credential,
            model,
            request_timeout,
        }
    }
}

/// Top-level configuration file.
///
/// ```toml
/// mark = "O"
///
/// [llm]
/// model = "gpt-4o-mini"
/// timeout_secs = 10.0
///
/// [env]
/// step_penalty = -0.01
/// opponent = "heuristic"
/// ```
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct OpponentConfig {
    /// Side the resolver plays.
    #[serde(default = "default_mark")]
    mark: Player,

    /// Remote suggestion settings.
    #[serde(default)]
    llm: LlmSettings,

    /// Training environment settings.
    #[serde(default)]
    env: EnvConfig,
}

fn default_mark() -> Player {
    Player::O
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            mark: default_mark(),
            llm: LlmSettings::default(),
            env: EnvConfig::default(),
        }
    }
}

impl OpponentConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(mark = %config.mark, "Config loaded successfully");
        Ok(config)
    }

    /// Creates LLM configuration from this config and the process environment.
    #[instrument(skip(self))]
    pub fn create_llm_config(&self) -> LlmConfig {
        self.llm.resolve(|key| std::env::var(key).ok())
    }
}

/// Parses a timeout in seconds; only positive finite values are accepted.
pub fn parse_timeout(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<f64>() {
        Ok(secs) => timeout_from_secs(secs),
        Err(_) => {
            if !raw.trim().is_empty() {
                warn!(value = %raw, "Ignoring unparseable timeout");
            }
            None
        }
    }
}

fn timeout_from_secs(secs: f64) -> Option<Duration> {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        warn!(secs, "Ignoring non-positive timeout");
        None
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
