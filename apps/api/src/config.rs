use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Passed through to the tailoring script; never logged.
    pub openai_api_key: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub python_bin: String,
    pub keyword_script: PathBuf,
    pub tailor_script: PathBuf,
    pub max_upload_bytes: usize,
    /// Unset means one child process per request with no cap.
    pub max_concurrent_scripts: Option<usize>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            upload_dir: env_or("UPLOAD_DIR", "uploads").into(),
            python_bin: env_or("PYTHON_BIN", "python3"),
            keyword_script: env_or("KEYWORD_SCRIPT", "keyword_extraction.py").into(),
            tailor_script: env_or("TAILOR_SCRIPT", "resume_tailor.py").into(),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            max_concurrent_scripts: parse_concurrency_cap(
                std::env::var("MAX_CONCURRENT_SCRIPTS").ok().as_deref(),
            )?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Empty or `0` disables the cap.
fn parse_concurrency_cap(raw: Option<&str>) -> Result<Option<usize>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let cap = raw
        .parse::<usize>()
        .context("MAX_CONCURRENT_SCRIPTS must be a non-negative integer")?;
    Ok((cap > 0).then_some(cap))
}
