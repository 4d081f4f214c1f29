// ABOUTME: Environment-driven configuration for generation, analytics, and insight policy
// ABOUTME: Replaces magic numbers with validated, overridable policy constants
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Engine configuration.
//!
//! Environment-only configuration: every tunable policy constant has a
//! validated default and a `MILO_*` environment override. The duration
//! estimate formula, trend thresholds, and insight windows are policy, not
//! hard-coded values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Program generation policy constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Fixed warm-up allowance added to every session estimate (minutes).
    pub warmup_minutes: u32,
    /// Seconds of work attributed to one repetition in the estimate.
    pub seconds_per_rep: u32,
    /// Hard cap on exercises per session, before time trimming.
    pub max_exercises_per_session: usize,
    /// Weeks between progression steps in a multi-week program.
    pub progression_interval_weeks: u32,
    /// Maximum sets added on top of the baseline scheme. Weeks that reach the
    /// cap are themed as peak weeks.
    pub max_progression_sets: u32,
    /// Trailing window of logs consulted for least-recently-used exercise
    /// selection (days).
    pub history_window_days: i64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            warmup_minutes: 10,
            seconds_per_rep: 4,
            max_exercises_per_session: 7,
            progression_interval_weeks: 2,
            max_progression_sets: 2,
            history_window_days: 30,
        }
    }
}

/// Activity analytics policy constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Default trailing window for frequency buckets (ISO weeks).
    pub frequency_weeks: u32,
    /// Relative change between the earliest and most recent third of the
    /// window required to call a trend (0.15 = 15%).
    pub trend_threshold: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            frequency_weeks: 12,
            trend_threshold: 0.15,
        }
    }
}

/// Insight synthesis policy constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Trailing window insights are derived from (weeks).
    pub window_weeks: u32,
    /// Minimum logs an exercise needs inside the window before it is
    /// analyzed for plateaus.
    pub min_logs_per_exercise: usize,
    /// Trailing window for the overtraining frequency check (weeks).
    pub overtraining_window_weeks: u32,
    /// Recent weekly rate must exceed the window average by this factor to
    /// flag recovery risk.
    pub overtraining_factor: f64,
    /// Streak length that earns a consistency insight (days).
    pub consistency_streak_days: u32,
    /// Maximum insights returned when the caller gives no limit.
    pub default_limit: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            window_weeks: 8,
            min_logs_per_exercise: 3,
            overtraining_window_weeks: 2,
            overtraining_factor: 1.5,
            consistency_streak_days: 7,
            default_limit: 10,
        }
    }
}

/// HTTP server settings for the `milo-engine` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub http_port: u16,
    pub database_url: String,
    /// Per-request deadline applied by the HTTP layer (seconds).
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8081,
            database_url: "sqlite:milo.db".into(),
            request_timeout_secs: 30,
        }
    }
}

/// Root engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub generation: GenerationConfig,
    pub analytics: AnalyticsConfig,
    pub insights: InsightConfig,
    pub server: ServerConfig,
    /// Deadline for individual storage and catalog calls (milliseconds).
    /// Timeouts surface as retryable failures; the engine never retries.
    pub storage_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            analytics: AnalyticsConfig::default(),
            insights: InsightConfig::default(),
            server: ServerConfig::default(),
            storage_timeout_ms: 5_000,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when an override is present but unparseable, or the
    /// resulting configuration fails validation.
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            storage_timeout_ms: parse_env("MILO_STORAGE_TIMEOUT_MS", 5_000)?,
            ..Self::default()
        };

        config.generation.warmup_minutes =
            parse_env("MILO_WARMUP_MINUTES", config.generation.warmup_minutes)?;
        config.generation.seconds_per_rep =
            parse_env("MILO_SECONDS_PER_REP", config.generation.seconds_per_rep)?;
        config.generation.max_exercises_per_session = parse_env(
            "MILO_MAX_EXERCISES_PER_SESSION",
            config.generation.max_exercises_per_session,
        )?;
        config.generation.progression_interval_weeks = parse_env(
            "MILO_PROGRESSION_INTERVAL_WEEKS",
            config.generation.progression_interval_weeks,
        )?;
        config.generation.max_progression_sets = parse_env(
            "MILO_MAX_PROGRESSION_SETS",
            config.generation.max_progression_sets,
        )?;
        config.generation.history_window_days = parse_env(
            "MILO_HISTORY_WINDOW_DAYS",
            config.generation.history_window_days,
        )?;

        config.analytics.frequency_weeks =
            parse_env("MILO_FREQUENCY_WEEKS", config.analytics.frequency_weeks)?;
        config.analytics.trend_threshold =
            parse_env("MILO_TREND_THRESHOLD", config.analytics.trend_threshold)?;

        config.insights.window_weeks =
            parse_env("MILO_INSIGHT_WINDOW_WEEKS", config.insights.window_weeks)?;
        config.insights.min_logs_per_exercise = parse_env(
            "MILO_INSIGHT_MIN_LOGS",
            config.insights.min_logs_per_exercise,
        )?;
        config.insights.overtraining_window_weeks = parse_env(
            "MILO_OVERTRAINING_WINDOW_WEEKS",
            config.insights.overtraining_window_weeks,
        )?;
        config.insights.overtraining_factor = parse_env(
            "MILO_OVERTRAINING_FACTOR",
            config.insights.overtraining_factor,
        )?;
        config.insights.consistency_streak_days = parse_env(
            "MILO_CONSISTENCY_STREAK_DAYS",
            config.insights.consistency_streak_days,
        )?;

        config.server.http_port = parse_env("MILO_HTTP_PORT", config.server.http_port)?;
        if let Ok(url) = env::var("MILO_DATABASE_URL") {
            config.server.database_url = url;
        }
        config.server.request_timeout_secs = parse_env(
            "MILO_REQUEST_TIMEOUT_SECS",
            config.server.request_timeout_secs,
        )?;

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.generation.seconds_per_rep == 0 {
            bail!("MILO_SECONDS_PER_REP must be positive");
        }
        if self.generation.max_exercises_per_session == 0 {
            bail!("MILO_MAX_EXERCISES_PER_SESSION must be positive");
        }
        if self.generation.progression_interval_weeks == 0 {
            bail!("MILO_PROGRESSION_INTERVAL_WEEKS must be positive");
        }
        if !(0.0..1.0).contains(&self.analytics.trend_threshold) {
            bail!("MILO_TREND_THRESHOLD must be in [0.0, 1.0)");
        }
        if self.insights.overtraining_factor <= 1.0 {
            bail!("MILO_OVERTRAINING_FACTOR must exceed 1.0");
        }
        if self.insights.window_weeks < self.insights.overtraining_window_weeks {
            bail!("MILO_INSIGHT_WINDOW_WEEKS must cover MILO_OVERTRAINING_WINDOW_WEEKS");
        }
        Ok(())
    }

    /// Storage call deadline as a [`Duration`].
    #[must_use]
    pub const fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("invalid value for {name}: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn trend_threshold_bounds() {
        let mut config = EngineConfig::default();
        config.analytics.trend_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn overtraining_factor_must_exceed_one() {
        let mut config = EngineConfig::default();
        config.insights.overtraining_factor = 0.9;
        assert!(config.validate().is_err());
    }
}
