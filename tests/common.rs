// ABOUTME: Shared test utilities: fixture catalog, log builders, and engine setup
// ABOUTME: Provides common helpers to reduce duplication across integration tests
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `milo_training_engine` integration tests.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use milo_training_engine::{
    config::EngineConfig,
    engine::TrainingEngine,
    models::{Exercise, ExerciseCategory, FitnessLevel, MuscleGroup, WorkoutLog},
    storage::memory::MemoryStore,
};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process).
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// A deterministic catalog: beginner-friendly barbell/bench coverage for a
/// push/pull/legs split, bodyweight fallbacks, and some equipment the tests
/// deliberately exclude.
pub fn test_catalog() -> Vec<Exercise> {
    use FitnessLevel::{Beginner, Intermediate};
    use MuscleGroup::{
        Back, Biceps, Chest, Core, Glutes, Hamstrings, Quads, Shoulders, Triceps,
    };

    let entries: Vec<(&str, FitnessLevel, Vec<MuscleGroup>, Vec<&str>)> = vec![
        ("Barbell Bench Press", Beginner, vec![Chest, Triceps], vec!["barbell", "bench"]),
        ("Floor Press", Beginner, vec![Chest, Triceps], vec!["barbell"]),
        ("Push-Up", Beginner, vec![Chest, Triceps, Core], vec![]),
        ("Overhead Press", Beginner, vec![Shoulders, Triceps], vec!["barbell"]),
        ("Barbell Row", Beginner, vec![Back, Biceps], vec!["barbell"]),
        ("Pendlay Row", Intermediate, vec![Back], vec!["barbell"]),
        ("Barbell Curl", Beginner, vec![Biceps], vec!["barbell"]),
        ("Back Squat", Beginner, vec![Quads, Glutes, Core], vec!["barbell"]),
        ("Bodyweight Squat", Beginner, vec![Quads, Glutes], vec![]),
        ("Romanian Deadlift", Beginner, vec![Hamstrings, Glutes], vec!["barbell"]),
        ("Hip Thrust", Beginner, vec![Glutes, Hamstrings], vec!["barbell", "bench"]),
        ("Plank", Beginner, vec![Core], vec![]),
        ("Dumbbell Lateral Raise", Beginner, vec![Shoulders], vec!["dumbbell"]),
        ("Leg Curl", Beginner, vec![Hamstrings], vec!["machine"]),
    ];

    entries
        .into_iter()
        .map(|(name, difficulty, muscle_groups, equipment)| Exercise {
            id: Uuid::new_v4(),
            name: name.into(),
            category: ExerciseCategory::Strength,
            difficulty,
            muscle_groups,
            equipment: equipment.into_iter().map(str::to_owned).collect(),
            instructions: None,
        })
        .collect()
}

/// Engine over a fresh in-memory store preloaded with the fixture catalog.
pub fn test_engine() -> (TrainingEngine, MemoryStore) {
    init_test_logging();
    let store = MemoryStore::with_catalog(test_catalog());
    let engine = engine_over(store.clone());
    (engine, store)
}

/// Engine over an existing store.
pub fn engine_over(store: MemoryStore) -> TrainingEngine {
    let shared = Arc::new(store);
    TrainingEngine::new(
        shared.clone(),
        shared.clone(),
        shared,
        EngineConfig::default(),
    )
}

/// Fixed "today" used across tests: Thursday, 2025-06-12.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
}

/// Fixed instant within `today`.
pub fn now() -> DateTime<Utc> {
    Utc.from_utc_datetime(&today().and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()))
}

/// `today` minus whole days.
pub fn days_ago(days: u64) -> NaiveDate {
    today() - Days::new(days)
}

/// A strength log row: three sets at the given uniform weight.
pub fn strength_log(
    user_id: Uuid,
    exercise_id: Uuid,
    date: NaiveDate,
    weight: f64,
    difficulty: u8,
) -> WorkoutLog {
    WorkoutLog {
        id: Uuid::new_v4(),
        user_id,
        exercise_id,
        date: Utc.from_utc_datetime(&date.and_time(NaiveTime::from_hms_opt(18, 0, 0).unwrap())),
        sets_completed: 3,
        reps: vec![10, 9, 8],
        weight_kg: Some(vec![weight, weight, weight]),
        duration_seconds: None,
        distance_km: None,
        difficulty_rating: Some(difficulty),
        notes: None,
    }
}

/// A bodyweight log row with no recorded weight.
pub fn bodyweight_log(user_id: Uuid, exercise_id: Uuid, date: NaiveDate) -> WorkoutLog {
    WorkoutLog {
        id: Uuid::new_v4(),
        user_id,
        exercise_id,
        date: Utc.from_utc_datetime(&date.and_time(NaiveTime::from_hms_opt(7, 30, 0).unwrap())),
        sets_completed: 3,
        reps: vec![15, 15, 12],
        weight_kg: None,
        duration_seconds: None,
        distance_km: None,
        difficulty_rating: Some(4),
        notes: None,
    }
}
