use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MAX_REQUEST_BYTES: usize = 50 * 1024 * 1024;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Key/value lookup the configuration is read from.
/// The process uses `EnvSource`; tests hand in a plain map.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads configuration from process environment variables.
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// What to do with a file whose MIME type the extractor does not accept and
/// whose bytes do not decode to substantive plain text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnsupportedTypePolicy {
    /// Send the bytes anyway, labelled as `application/pdf`.
    #[default]
    CoerceToPdf,
    /// Record a placeholder for the file without calling the extractor.
    Reject,
}

impl std::str::FromStr for UnsupportedTypePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coerce-to-pdf" | "pdf" => Ok(Self::CoerceToPdf),
            "reject" => Ok(Self::Reject),
            other => bail!("unknown unsupported-type policy '{other}' (expected 'coerce-to-pdf' or 'reject')"),
        }
    }
}

/// Application configuration, loaded once at startup and shared through `AppState`.
///
/// The Gemini key is optional here: a missing key does not stop the server,
/// but every processing request answers with a configuration error until it is set.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_timeout: Duration,
    pub max_request_bytes: usize,
    pub unsupported_type_policy: UnsupportedTypePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_source(&EnvSource)
    }

    pub fn from_source(source: &dyn ConfigSource) -> Result<Self> {
        let read = |key: &str| source.get(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            gemini_api_key: read("GEMINI_API_KEY"),
            gemini_api_base: read("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            port: read("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: read("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            llm_timeout: Duration::from_secs(
                read("LLM_TIMEOUT_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            max_request_bytes: read("MAX_REQUEST_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_REQUEST_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_REQUEST_BYTES),
            unsupported_type_policy: read("UNSUPPORTED_TYPE_POLICY")
                .map(|v| v.parse::<UnsupportedTypePolicy>())
                .transpose()?
                .unwrap_or_default(),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}
