// ABOUTME: Training program tree: program, weekly plans, daily workouts, prescribed exercises
// ABOUTME: Written only by the composer at creation and the lifecycle manager on transitions
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{FitnessLevel, Goal, MuscleGroup};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Requested program shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    /// A single training session for today.
    Daily,
    /// A periodized multi-week schedule.
    MultiWeek,
}

/// Program lifecycle state. `Superseded` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
    Draft,
    Active,
    Superseded,
}

impl fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Superseded => "superseded",
        };
        f.write_str(name)
    }
}

/// Periodization theme of one program week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekTheme {
    /// Baseline volume, establishing form.
    Foundation,
    /// Progressive overload applied on top of the baseline.
    Build,
    /// Maximum planned working volume.
    Peak,
    /// Reduced volume and intensity to absorb the training stress.
    Deload,
}

impl WeekTheme {
    /// Human-readable theme label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Foundation => "Foundation",
            Self::Build => "Build",
            Self::Peak => "Peak",
            Self::Deload => "Deload",
        }
    }
}

impl fmt::Display for WeekTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Working intensity prescribed for an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityLevel {
    Light,
    Working,
    Peak,
}

/// Prescribed repetitions: a single target for every set, or one target per
/// set. A per-set sequence must have exactly `sets` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
    Uniform(u32),
    PerSet(Vec<u32>),
}

impl Reps {
    /// Representative rep count, used for duration estimation.
    #[must_use]
    pub fn representative(&self) -> u32 {
        match self {
            Self::Uniform(reps) => *reps,
            Self::PerSet(reps) => {
                if reps.is_empty() {
                    0
                } else {
                    reps.iter().sum::<u32>() / reps.len() as u32
                }
            }
        }
    }

    /// Check the sequence-length invariant against the prescribed set count.
    #[must_use]
    pub fn matches_sets(&self, sets: u32) -> bool {
        match self {
            Self::Uniform(_) => true,
            Self::PerSet(reps) => reps.len() as u32 == sets,
        }
    }
}

/// One exercise prescription inside a daily workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub exercise_id: Uuid,
    /// Denormalized so rendered plans need no catalog join.
    pub exercise_name: String,
    pub sets: u32,
    pub reps: Reps,
    pub rest_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity_level: Option<IntensityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyWorkout {
    /// 1-based position within the training week.
    pub day_number: u32,
    pub workout_name: String,
    /// Targeted muscle groups, in training order. Never empty.
    pub focus_areas: Vec<MuscleGroup>,
    pub estimated_duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub exercises: Vec<WorkoutExercise>,
}

/// One week of a multi-week program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlan {
    /// 1-based, unique and strictly increasing within a program.
    pub week_number: u32,
    pub theme: WeekTheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Exactly `days_per_week` workouts, ordered by day number.
    pub daily_workouts: Vec<DailyWorkout>,
}

/// Program schedule: either a single session or an ordered list of weeks.
///
/// The enum makes the daily/multi-week shape invariant unrepresentable to
/// violate: a daily program cannot carry weekly plans and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgramSchedule {
    Daily { workout: DailyWorkout },
    MultiWeek { weeks: Vec<WeeklyPlan> },
}

impl ProgramSchedule {
    /// Program type implied by the schedule shape.
    #[must_use]
    pub const fn program_type(&self) -> ProgramType {
        match self {
            Self::Daily { .. } => ProgramType::Daily,
            Self::MultiWeek { .. } => ProgramType::MultiWeek,
        }
    }
}

/// A generated training plan and its lifecycle metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingProgram {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProgramStatus,
    pub fitness_level: FitnessLevel,
    pub goals: Vec<Goal>,
    /// Equipment tags the program was generated against.
    pub equipment: Vec<String>,
    pub days_per_week: u32,
    /// Present for multi-week programs only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<u32>,
    pub time_per_session_minutes: u32,
    /// Deterministic generation summary; identical inputs yield identical
    /// text.
    pub ai_rationale: String,
    pub schedule: ProgramSchedule,
    pub created_at: DateTime<Utc>,
    /// Set when the program is accepted; anchors daily-workout resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
}

impl TrainingProgram {
    /// Program type implied by the schedule.
    #[must_use]
    pub const fn program_type(&self) -> ProgramType {
        self.schedule.program_type()
    }

    /// Weekly plans for a multi-week program, empty slice for daily.
    #[must_use]
    pub fn weeks(&self) -> &[WeeklyPlan] {
        match &self.schedule {
            ProgramSchedule::MultiWeek { weeks } => weeks,
            ProgramSchedule::Daily { .. } => &[],
        }
    }
}
