use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::fs;
use std::str::FromStr;

use crate::error::{Result, ScrapeError};
use crate::schema::Schema;

/// Numeric tunables of the scoring and inference heuristics. These are the
/// constants the pipeline stages take as data instead of inlining, so tests
/// can tighten or loosen them and deployments can override them from a TOML
/// file (`STANDINGS_HEURISTICS`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Discovery score for a rank/`#` token.
    pub rank_weight: u32,
    /// Discovery score for a name/player/team token.
    pub name_weight: u32,
    /// Discovery score for a wins token.
    pub wins_weight: u32,
    /// Discovery score for a losses token.
    pub losses_weight: u32,
    /// Discovery score for a points/pts/score token.
    pub points_weight: u32,
    /// Discovery score for a ties/draw token (tie-tracking schemas only).
    pub ties_weight: u32,
    /// Discovery score for a digit-dash-digit token (tie-tracking schemas only).
    pub record_hint_weight: u32,
    /// Fraction of data rows that must match the combined-record pattern.
    pub record_hit_rate: f64,
    /// Fraction of adjacent +1 steps a rank-like column must show.
    pub rank_step_rate: f64,
    /// Ceiling for the small-integer signal on win/loss candidate columns.
    pub small_int_max: i64,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            rank_weight: 2,
            name_weight: 2,
            wins_weight: 1,
            losses_weight: 1,
            points_weight: 1,
            ties_weight: 1,
            record_hint_weight: 1,
            record_hit_rate: 0.6,
            rank_step_rate: 0.6,
            small_int_max: 50,
        }
    }
}

impl Heuristics {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("Failed to read heuristics file '{}': {}", path, e))
        })?;
        let heuristics: Heuristics = toml::from_str(&content)?;
        Ok(heuristics)
    }
}

/// Runtime configuration, read from the environment (`.env` supported).
/// CLI flags override individual fields in main.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub page_url: Option<String>,
    pub webhook_url: Option<String>,
    pub schema: Schema,
    pub max_rows: Option<usize>,
    pub max_pages: usize,
    pub max_frame_depth: u8,
    pub request_timeout_secs: u64,
    pub heuristics: Heuristics,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let schema = match env::var("STANDINGS_SCHEMA") {
            Ok(raw) => raw.parse()?,
            Err(_) => Schema::default(),
        };

        let heuristics = match env::var("STANDINGS_HEURISTICS") {
            Ok(path) => Heuristics::load(&path)?,
            Err(_) => Heuristics::default(),
        };

        let max_rows: Option<usize> = parse_env_var("STANDINGS_MAX_ROWS")?;
        if max_rows == Some(0) {
            return Err(ScrapeError::Config(
                "STANDINGS_MAX_ROWS must be a positive integer".to_string(),
            ));
        }

        Ok(Self {
            page_url: env::var("STANDINGS_URL").ok(),
            webhook_url: env::var("SLACK_WEBHOOK_URL").ok(),
            schema,
            max_rows,
            max_pages: parse_env_var("STANDINGS_MAX_PAGES")?.unwrap_or(10),
            max_frame_depth: parse_env_var("STANDINGS_MAX_FRAME_DEPTH")?.unwrap_or(3),
            request_timeout_secs: parse_env_var("STANDINGS_TIMEOUT_SECS")?.unwrap_or(20),
            heuristics,
        })
    }

    /// The row cap normalization applies: explicit override first, then the
    /// schema default (`None` keeps every row).
    pub fn effective_max_rows(&self) -> Option<usize> {
        self.max_rows.or(self.schema.default_max_rows())
    }
}

fn parse_env_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ScrapeError::Config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}
