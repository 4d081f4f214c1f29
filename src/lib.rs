// ABOUTME: Main library entry point for the Milo adaptive training engine
// ABOUTME: Rule-based workout program generation, lifecycle, analytics, and insights
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Milo Training Engine
//!
//! The adaptive training engine behind the Milo fitness dashboard: it turns a
//! user's constraints and history into a structured workout program, keeps a
//! "today's workout" pointer, derives streak and frequency analytics from
//! logged activity, and synthesizes plateau, recovery, and consistency
//! insights from the log history.
//!
//! Everything is deterministic and rule-based: identical inputs produce
//! identical programs and identical rationale text. There is no model call
//! and no hidden randomness.
//!
//! ## Architecture
//!
//! - **Constraint resolution**: a generation request becomes a concrete
//!   selection policy (split, rep scheme, equipment filter).
//! - **Composition**: the policy plus the exercise catalog becomes a draft
//!   program, periodized across weeks for multi-week requests.
//! - **Lifecycle**: draft → active → superseded, with at most one active
//!   program per user enforced by an atomic storage transition.
//! - **Resolution**: "today" maps onto the active program's schedule; rest
//!   days and completion are explicit outcomes.
//! - **Intelligence**: streaks, the weekly grid, frequency trends, week
//!   comparisons, and ranked insights, recomputed on read from the log
//!   stream.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use milo_training_engine::config::EngineConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::from_env()?;
//!     println!("engine configured on port {}", config.server.http_port);
//!     Ok(())
//! }
//! ```

/// Read-only exercise catalog access.
pub mod catalog;

/// Environment-driven configuration and policy constants.
pub mod config;

/// The engine facade exposing every public operation.
pub mod engine;

/// Unified error taxonomy with HTTP status mapping.
pub mod errors;

/// Activity analytics and insight synthesis.
pub mod intelligence;

/// Structured logging setup.
pub mod logging;

/// Core domain types.
pub mod models;

/// HTTP routes for the engine operations.
pub mod routes;

/// Storage abstraction with SQLite and in-memory backends.
pub mod storage;

/// Program generation, lifecycle, and daily resolution.
pub mod trainer;
