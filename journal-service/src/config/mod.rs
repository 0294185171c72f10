use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::retry::RetryConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Gemini API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 200;

#[derive(Debug, Clone)]
pub struct JournalConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub upstream: UpstreamConfig,
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: Secret<String>,
    /// Overridable so tests can point the client at a stub server.
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model for entry analysis and trend reports (e.g., gemini-2.0-flash)
    pub text_model: String,
    /// Model for image grounding checks (e.g., gemini-1.5-pro)
    pub vision_model: String,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl UpstreamConfig {
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            initial_backoff: self.initial_backoff,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyConfig {
    pub professional_help: ProfessionalHelpPolicy,
    pub upstream_failure: UpstreamFailurePolicy,
}

/// Whether the trend report always recommends professional help or only when
/// the entries show distress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfessionalHelpPolicy {
    #[default]
    Always,
    WhenDistressed,
}

impl FromStr for ProfessionalHelpPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "when_distressed" => Ok(Self::WhenDistressed),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown professional help policy '{}'",
                other
            ))),
        }
    }
}

/// How a handler answers when the completion call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpstreamFailurePolicy {
    /// 500 with `{error, details}`.
    #[default]
    Error,
    /// 200 carrying the handler's fallback literal.
    Fallback,
}

impl FromStr for UpstreamFailurePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "fallback" => Ok(Self::Fallback),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown upstream failure policy '{}'",
                other
            ))),
        }
    }
}

impl JournalConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(JournalConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: Secret::new(get_env("GEMINI_API_KEY", None, is_prod)?),
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_API_BASE), false)?,
            },
            models: ModelConfig {
                text_model: get_env("JOURNAL_TEXT_MODEL", Some("gemini-2.0-flash"), false)?,
                vision_model: get_env("JOURNAL_VISION_MODEL", Some("gemini-1.5-pro"), false)?,
            },
            upstream: UpstreamConfig {
                timeout: Duration::from_secs(get_parsed(
                    "UPSTREAM_TIMEOUT_SECS",
                    DEFAULT_TIMEOUT_SECS,
                )?),
                max_retries: get_parsed("UPSTREAM_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
                initial_backoff: Duration::from_millis(get_parsed(
                    "UPSTREAM_INITIAL_BACKOFF_MS",
                    DEFAULT_INITIAL_BACKOFF_MS,
                )?),
            },
            policy: PolicyConfig {
                professional_help: get_env("PROFESSIONAL_HELP_POLICY", Some("always"), false)?
                    .parse()?,
                upstream_failure: get_env("UPSTREAM_FAILURE_POLICY", Some("error"), false)?
                    .parse()?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn get_parsed<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, val, e))
        }),
        Err(_) => Ok(default),
    }
}
