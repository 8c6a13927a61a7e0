use anyhow::{bail, Context, Result};

use crate::intel::config::PipelineConfig;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub pipeline: PipelineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            linkedin_boost: optional_env("LINKEDIN_BOOST", defaults.linkedin_boost)?,
            min_relevance: optional_env("MIN_RELEVANCE", defaults.min_relevance)?,
            wedge_post_lookback: optional_env("WEDGE_POST_LOOKBACK", defaults.wedge_post_lookback)?,
            playbook_post_limit: optional_env("PLAYBOOK_POST_LIMIT", defaults.playbook_post_limit)?,
            playbook_top_signals: optional_env(
                "PLAYBOOK_TOP_SIGNALS",
                defaults.playbook_top_signals,
            )?,
        };
        validate_pipeline(&pipeline)?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: optional_env("PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            pipeline,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Rejects tunables that would break the scoring invariants.
pub fn validate_pipeline(pipeline: &PipelineConfig) -> Result<()> {
    if !(0.0..=1.0).contains(&pipeline.linkedin_boost) {
        bail!("LINKEDIN_BOOST must be within [0, 1], got {}", pipeline.linkedin_boost);
    }
    if !(0.0..=1.0).contains(&pipeline.min_relevance) {
        bail!("MIN_RELEVANCE must be within [0, 1], got {}", pipeline.min_relevance);
    }
    if pipeline.wedge_post_lookback == 0
        || pipeline.playbook_post_limit == 0
        || pipeline.playbook_top_signals == 0
    {
        bail!("post and signal limits must be greater than zero");
    }
    Ok(())
}
