// ABOUTME: Weekly frequency buckets with trend classification and week-over-week comparison
// ABOUTME: Zero-count weeks are kept so the trailing window never has gaps
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::streaks::week_start;
use crate::models::WorkoutLog;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Direction of the workout-frequency trend across the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// One ISO week in the trailing window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekBucket {
    pub week_start: NaiveDate,
    /// Chart label, e.g. "Jun 09".
    pub week_label: String,
    pub workout_count: u32,
    pub workout_days: u32,
}

/// Trailing-window frequency report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyReport {
    pub weeks: Vec<WeekBucket>,
    pub period_weeks: u32,
    pub trend: TrendDirection,
}

/// Bucket logs into the trailing `weeks` Monday-start weeks ending with the
/// current one, then classify the trend.
///
/// Trend compares the mean of the most recent third of buckets against the
/// earliest third; a relative difference beyond `threshold` (e.g. 0.15) calls
/// the direction, anything else is stable.
#[must_use]
pub fn frequency_report(
    logs: &[WorkoutLog],
    today: NaiveDate,
    weeks: u32,
    threshold: f64,
) -> FrequencyReport {
    let current_monday = week_start(today);
    let first_monday = current_monday - Days::new(7 * u64::from(weeks.saturating_sub(1)));

    let mut buckets: Vec<WeekBucket> = (0..weeks)
        .map(|index| {
            let monday = first_monday + Days::new(7 * u64::from(index));
            WeekBucket {
                week_start: monday,
                week_label: monday.format("%b %d").to_string(),
                workout_count: 0,
                workout_days: 0,
            }
        })
        .collect();

    let mut day_sets: Vec<HashSet<NaiveDate>> = vec![HashSet::new(); weeks as usize];
    for log in logs {
        let log_monday = week_start(log.day());
        if log_monday < first_monday || log_monday > current_monday {
            continue;
        }
        let index = ((log_monday - first_monday).num_days() / 7) as usize;
        buckets[index].workout_count += 1;
        day_sets[index].insert(log.day());
    }
    for (bucket, days) in buckets.iter_mut().zip(&day_sets) {
        bucket.workout_days = days.len() as u32;
    }

    let counts: Vec<f64> = buckets.iter().map(|b| f64::from(b.workout_count)).collect();
    FrequencyReport {
        weeks: buckets,
        period_weeks: weeks,
        trend: classify_trend(&counts, threshold),
    }
}

/// Compare the mean of the most recent third against the earliest third.
fn classify_trend(counts: &[f64], threshold: f64) -> TrendDirection {
    if counts.len() < 2 {
        return TrendDirection::Stable;
    }
    let third = (counts.len() / 3).max(1);
    let earliest: f64 = counts[..third].iter().sum::<f64>() / third as f64;
    let recent: f64 = counts[counts.len() - third..].iter().sum::<f64>() / third as f64;

    if earliest == 0.0 {
        return if recent > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Stable
        };
    }
    let relative = (recent - earliest) / earliest;
    if relative > threshold {
        TrendDirection::Increasing
    } else if relative < -threshold {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Aggregates for one calendar week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekStats {
    pub start_date: NaiveDate,
    pub total_workouts: u32,
    pub total_sets: u32,
    pub total_volume_kg: f64,
    pub workout_days: u32,
    pub unique_exercises: u32,
}

impl WeekStats {
    /// Aggregate one week's logs.
    #[must_use]
    pub fn from_logs(logs: &[WorkoutLog], start_date: NaiveDate) -> Self {
        let days: HashSet<NaiveDate> = logs.iter().map(WorkoutLog::day).collect();
        let exercises: HashSet<Uuid> = logs.iter().map(|log| log.exercise_id).collect();
        Self {
            start_date,
            total_workouts: logs.len() as u32,
            total_sets: logs.iter().map(|log| log.sets_completed).sum(),
            total_volume_kg: logs.iter().map(WorkoutLog::volume_kg).sum(),
            workout_days: days.len() as u32,
            unique_exercises: exercises.len() as u32,
        }
    }
}

/// Absolute and relative change of one metric between two weeks.
///
/// `percent` is absent when the previous value is zero; the UI shows the
/// change without a percentage rather than dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricChange {
    pub change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

impl MetricChange {
    fn between(current: f64, previous: f64) -> Self {
        let change = current - previous;
        let percent = if previous > 0.0 {
            Some((change / previous * 100.0 * 10.0).round() / 10.0)
        } else {
            None
        };
        Self { change, percent }
    }
}

/// Current vs. previous calendar week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekComparison {
    pub current_week: WeekStats,
    pub previous_week: WeekStats,
    pub workouts: MetricChange,
    pub sets: MetricChange,
    pub volume: MetricChange,
    pub workout_days: MetricChange,
}

/// Compare the week containing `today` with the week before it.
///
/// `current_logs` and `previous_logs` must already be restricted to their
/// respective Monday-start weeks.
#[must_use]
pub fn week_comparison(
    current_logs: &[WorkoutLog],
    previous_logs: &[WorkoutLog],
    today: NaiveDate,
) -> WeekComparison {
    let current_monday = week_start(today);
    let previous_monday = current_monday - Days::new(7);
    let current = WeekStats::from_logs(current_logs, current_monday);
    let previous = WeekStats::from_logs(previous_logs, previous_monday);

    WeekComparison {
        workouts: MetricChange::between(
            f64::from(current.total_workouts),
            f64::from(previous.total_workouts),
        ),
        sets: MetricChange::between(
            f64::from(current.total_sets),
            f64::from(previous.total_sets),
        ),
        volume: MetricChange::between(current.total_volume_kg, previous.total_volume_kg),
        workout_days: MetricChange::between(
            f64::from(current.workout_days),
            f64::from(previous.workout_days),
        ),
        current_week: current,
        previous_week: previous,
    }
}
