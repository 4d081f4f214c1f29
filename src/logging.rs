// ABOUTME: Structured logging setup with env-filter and selectable output format
// ABOUTME: Initialized once by binaries; tests use their own quiet subscriber
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Logging configuration.

use anyhow::Result;
use std::env;
use tracing_subscriber::{fmt, EnvFilter};

/// Log output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging.
    Json,
    /// Pretty format for development.
    Pretty,
    /// Compact format for space-constrained environments.
    Compact,
}

impl LogFormat {
    /// Read the format from `LOG_FORMAT`, defaulting to pretty.
    #[must_use]
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => Self::Json,
            Ok("compact") => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Initialize the global subscriber from `RUST_LOG` and `LOG_FORMAT`.
///
/// # Errors
///
/// Returns an error when a subscriber is already installed.
pub fn init_from_env() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);

    match LogFormat::from_env() {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    }
    .map_err(|error| anyhow::anyhow!("failed to initialize logging: {error}"))?;
    Ok(())
}
