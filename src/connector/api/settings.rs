use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::connector::adapter::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::{
    DomainError, SessionConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE, DEFAULT_USER_LABEL,
};

/// Value shipped in the sample `.env`; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

/// Process-wide settings read from the environment (and an optional `.env` file).
///
/// | Variable               | Default                     |
/// |------------------------|-----------------------------|
/// | `OPENAI_API_KEY`       | required unless `--mock`    |
/// | `OPENAI_BASE_URL`      | `https://api.openai.com/v1` |
/// | `MODEL_NAME`           | `gpt-5`                     |
/// | `MAX_TOKENS`           | `2000`                      |
/// | `TEMPERATURE`          | `0.7`                       |
/// | `VERBOSITY`            | `medium`                    |
/// | `TEXT_FORMAT`          | `text`                      |
/// | `REASONING_EFFORT`     | `medium`                    |
/// | `RENDER_MODE`          | `messages`                  |
/// | `USER_NAME`            | `User`                      |
/// | `SYSTEM_PROMPT`        | built-in instruction        |
/// | `DEBUG`                | `false`                     |
/// | `REQUEST_TIMEOUT_SECS` | `120`                       |
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub debug: bool,
    pub session: SessionConfig,
}

impl Settings {
    /// Load a `.env` file into the process environment, then read it.
    ///
    /// With an explicit path the file must exist; otherwise a `.env` in the
    /// working directory (or a parent) is used when present.
    pub fn load(env_file: Option<&Path>) -> Result<Self, DomainError> {
        let loaded = load_env_file(env_file)?;
        if let Some(path) = loaded {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let model = get("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let session = SessionConfig::new(model.trim())
            .with_max_tokens(parse_var(&get, "MAX_TOKENS", DEFAULT_MAX_TOKENS)?)
            .with_temperature(parse_var(&get, "TEMPERATURE", DEFAULT_TEMPERATURE)?)
            .with_verbosity(parse_var(&get, "VERBOSITY", Default::default())?)
            .with_text_format(parse_var(&get, "TEXT_FORMAT", Default::default())?)
            .with_reasoning_effort(parse_var(&get, "REASONING_EFFORT", Default::default())?)
            .with_render_mode(parse_var(&get, "RENDER_MODE", Default::default())?)
            .with_user_label(get("USER_NAME").unwrap_or_else(|| DEFAULT_USER_LABEL.to_string()))
            .with_system_prompt(
                get("SYSTEM_PROMPT").unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            );

        Ok(Self {
            api_key: get("OPENAI_API_KEY").map(|k| k.trim().to_string()),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: parse_var(&get, "REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            debug: get("DEBUG").map(|v| parse_flag(&v)).unwrap_or(false),
            session,
        })
    }

    /// The credential, or a configuration error when it is missing or still the placeholder.
    pub fn require_api_key(&self) -> Result<&str, DomainError> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
            _ => Err(DomainError::configuration(
                "Please set your OpenAI API key (OPENAI_API_KEY) in the environment or the .env file",
            )),
        }
    }
}

fn load_env_file(env_file: Option<&Path>) -> Result<Option<PathBuf>, DomainError> {
    match env_file {
        Some(path) => dotenvy::from_path(path)
            .map(|_| Some(path.to_path_buf()))
            .map_err(|e| {
                DomainError::configuration(format!("cannot load {}: {e}", path.display()))
            }),
        None => Ok(dotenvy::dotenv().ok()),
    }
}

fn parse_var<T, G>(get: &G, name: &str, default: T) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            DomainError::configuration(format!("invalid value '{raw}' for {name}: {e}"))
        }),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
