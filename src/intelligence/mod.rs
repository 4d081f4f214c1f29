// ABOUTME: Activity analytics and insight synthesis over the workout log stream
// ABOUTME: All outputs are derived on read; nothing here is persisted as ground truth
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Training intelligence.
//!
//! Streaks, the weekly activity grid, frequency trends, week-over-week
//! comparisons, and synthesized insights. Every function is a pure
//! computation over logs fetched at call time.

pub mod frequency;
pub mod insights;
pub mod streaks;

pub use frequency::{
    frequency_report, week_comparison, FrequencyReport, MetricChange, TrendDirection, WeekBucket,
    WeekComparison, WeekStats,
};
pub use insights::synthesize_insights;
pub use streaks::{
    compute_streaks, weekly_grid, GridDay, StreakStatus, StreakSummary, WeeklyGrid,
};
