use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use products_hr::source::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub source_url: String,
    pub page_size: usize,
    pub storage_dir: PathBuf,
    pub rng_seed: Option<u64>,
    pub promote_delay: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let source_url = lookup("HR_SOURCE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let page_size = parse_or(&lookup, "HR_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let storage_dir = lookup("HR_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".hr-dashboard"));
        let rng_seed = match lookup("HR_RNG_SEED") {
            Some(raw) => Some(raw.trim().parse().context("invalid HR_RNG_SEED")?),
            None => None,
        };
        let promote_delay =
            Duration::from_millis(parse_or(&lookup, "HR_PROMOTE_DELAY_MS", 2000u64)?);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            source_url,
            page_size,
            storage_dir,
            rng_seed,
            promote_delay,
            cors_allowed_origins,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}
