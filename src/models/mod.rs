// ABOUTME: Domain model types shared across the training engine
// ABOUTME: Re-exports exercise catalog, program tree, workout log, and insight types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Core domain types.
//!
//! Programs and their weekly-plan/daily-workout tree are written only by the
//! composer (creation) and the lifecycle manager (status transitions).
//! Workout logs are owned by the logging collaborator; the engine reads them.

mod exercise;
mod insight;
mod program;
mod workout_log;

pub use exercise::{Exercise, ExerciseCategory, FitnessLevel, Goal, MuscleGroup};
pub use insight::{EvidenceWindow, Insight, InsightScope, InsightType};
pub use program::{
    DailyWorkout, IntensityLevel, ProgramSchedule, ProgramStatus, ProgramType, Reps,
    TrainingProgram, WeekTheme, WeeklyPlan, WorkoutExercise,
};
pub use workout_log::WorkoutLog;
