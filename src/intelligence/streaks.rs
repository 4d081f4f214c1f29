// ABOUTME: Streak computation and the Monday-start weekly activity grid
// ABOUTME: Recomputed on read from distinct workout log dates; never stored
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::models::WorkoutLog;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether the current streak is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakStatus {
    /// The streak includes today or yesterday.
    Active,
    /// History exists but the run has lapsed.
    Broken,
    /// No logged workouts at all.
    None,
}

/// Derived streak state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_workout_date: Option<NaiveDate>,
    pub streak_status: StreakStatus,
}

/// Compute streaks from distinct log dates (ascending).
///
/// The current streak is the run of consecutive dates ending today or
/// yesterday; a missed "today" does not break it until the day elapses. The
/// longest streak scans all history, independent of the current date.
#[must_use]
pub fn compute_streaks(dates: &[NaiveDate], today: NaiveDate) -> StreakSummary {
    let Some(&last) = dates.last() else {
        return StreakSummary {
            current_streak: 0,
            longest_streak: 0,
            last_workout_date: None,
            streak_status: StreakStatus::None,
        };
    };

    let mut current_streak = 0u32;
    let yesterday = today.pred_opt().unwrap_or(today);
    if last == today || last == yesterday {
        current_streak = 1;
        for pair in dates.windows(2).rev() {
            if (pair[1] - pair[0]).num_days() == 1 {
                current_streak += 1;
            } else {
                break;
            }
        }
    }

    let mut longest_streak = current_streak.max(1);
    let mut run = 1u32;
    for pair in dates.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            longest_streak = longest_streak.max(run);
        } else {
            run = 1;
        }
    }

    StreakSummary {
        current_streak,
        longest_streak,
        last_workout_date: Some(last),
        streak_status: if current_streak > 0 {
            StreakStatus::Active
        } else {
            StreakStatus::Broken
        },
    }
}

/// One day in the weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDay {
    pub date: NaiveDate,
    /// Full weekday name, e.g. "Monday".
    pub day_name: String,
    pub has_workout: bool,
    pub workout_count: u32,
}

/// Workout status for the current Monday-start week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyGrid {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<GridDay>,
    pub total_workout_days: u32,
    pub total_workouts: u32,
}

/// Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Build the 7-day grid for the week containing `today` from that week's
/// logs.
#[must_use]
pub fn weekly_grid(logs: &[WorkoutLog], today: NaiveDate) -> WeeklyGrid {
    let monday = week_start(today);
    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for log in logs {
        *counts.entry(log.day()).or_insert(0) += 1;
    }

    let days: Vec<GridDay> = (0..7)
        .map(|offset| {
            let date = monday + Days::new(offset);
            let workout_count = counts.get(&date).copied().unwrap_or(0);
            GridDay {
                date,
                day_name: date.format("%A").to_string(),
                has_workout: workout_count > 0,
                workout_count,
            }
        })
        .collect();

    WeeklyGrid {
        week_start: monday,
        week_end: monday + Days::new(6),
        total_workout_days: days.iter().filter(|d| d.has_workout).count() as u32,
        total_workouts: days.iter().map(|d| d.workout_count).sum(),
        days,
    }
}
