// ABOUTME: Daily workout resolution: maps "today" onto the active program's schedule
// ABOUTME: Rest days and program completion are explicit outcomes, not errors
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::models::{DailyWorkout, ProgramSchedule, TrainingProgram};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of resolving "today's workout".
///
/// Each program week occupies one 7-day calendar cycle: the first
/// `days_per_week` slots are training days, the rest are rest days.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DailyResolution {
    /// A training day with its session.
    Workout { workout: DailyWorkout },
    /// A planned rest day inside the program.
    RestDay,
    /// The program's schedule is exhausted; prompt regeneration.
    ProgramComplete,
    /// The user has no active program.
    NoActiveProgram,
}

/// Resolve today's workout from the active program.
///
/// Daily programs return their single session unconditionally. Multi-week
/// programs index by whole days elapsed since the activation date; the
/// creation date anchors programs that predate activation timestamps.
#[must_use]
pub fn resolve_daily_workout(program: &TrainingProgram, today: NaiveDate) -> DailyResolution {
    match &program.schedule {
        ProgramSchedule::Daily { workout } => DailyResolution::Workout {
            workout: workout.clone(),
        },
        ProgramSchedule::MultiWeek { weeks } => {
            let anchor = program
                .activated_at
                .unwrap_or(program.created_at)
                .date_naive();
            let offset = (today - anchor).num_days().max(0);
            let week_index = offset / 7;
            let day_offset = offset % 7;

            if week_index >= weeks.len() as i64 {
                return DailyResolution::ProgramComplete;
            }
            if day_offset >= i64::from(program.days_per_week) {
                return DailyResolution::RestDay;
            }

            // Day slots are 0-based offsets into the week's ordered workouts.
            weeks[week_index as usize]
                .daily_workouts
                .get(day_offset as usize)
                .map_or(DailyResolution::RestDay, |workout| {
                    DailyResolution::Workout {
                        workout: workout.clone(),
                    }
                })
        }
    }
}
