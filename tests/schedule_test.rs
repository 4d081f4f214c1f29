// ABOUTME: Integration tests for daily workout resolution over active programs
// ABOUTME: Covers cyclic indexing, rest days, completion, and the no-active-program outcome
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{days_ago, now, test_engine, today};
use milo_training_engine::{
    models::{FitnessLevel, Goal, ProgramType},
    trainer::constraints::GenerationRequest,
    trainer::schedule::DailyResolution,
};
use uuid::Uuid;

fn multi_week_request() -> GenerationRequest {
    GenerationRequest {
        program_type: ProgramType::MultiWeek,
        fitness_level: FitnessLevel::Beginner,
        goals: vec![Goal::GeneralFitness],
        equipment: vec!["barbell".into(), "bench".into()],
        days_per_week: 3,
        duration_weeks: Some(2),
        time_per_session_minutes: 60,
    }
}

#[tokio::test]
async fn no_active_program_is_an_explicit_outcome() {
    let (engine, _store) = test_engine();
    let resolution = engine
        .get_daily_workout(Uuid::new_v4(), today())
        .await
        .unwrap();
    assert!(matches!(resolution, DailyResolution::NoActiveProgram));
}

#[tokio::test]
async fn activation_day_serves_day_one() {
    let (engine, _store) = test_engine();
    let user_id = Uuid::new_v4();
    let program = engine
        .generate_program(user_id, &multi_week_request(), now())
        .await
        .unwrap();
    engine
        .accept_program(user_id, program.id, now())
        .await
        .unwrap();

    match engine.get_daily_workout(user_id, today()).await.unwrap() {
        DailyResolution::Workout { workout } => assert_eq!(workout.day_number, 1),
        other => panic!("expected a workout, got {other:?}"),
    }
}

#[tokio::test]
async fn training_days_then_rest_days_within_the_cycle() {
    let (engine, _store) = test_engine();
    let user_id = Uuid::new_v4();
    let program = engine
        .generate_program(user_id, &multi_week_request(), now())
        .await
        .unwrap();
    engine
        .accept_program(user_id, program.id, now())
        .await
        .unwrap();

    // Three training days, then four rest days before the next week starts.
    for offset in 0..3u64 {
        let date = today() + chrono::Days::new(offset);
        match engine.get_daily_workout(user_id, date).await.unwrap() {
            DailyResolution::Workout { workout } => {
                assert_eq!(u64::from(workout.day_number), offset + 1);
            }
            other => panic!("expected workout on offset {offset}, got {other:?}"),
        }
    }
    for offset in 3..7u64 {
        let date = today() + chrono::Days::new(offset);
        assert!(matches!(
            engine.get_daily_workout(user_id, date).await.unwrap(),
            DailyResolution::RestDay
        ));
    }
}

#[tokio::test]
async fn exhausted_program_reports_complete() {
    let (engine, _store) = test_engine();
    let user_id = Uuid::new_v4();
    let program = engine
        .generate_program(user_id, &multi_week_request(), now())
        .await
        .unwrap();
    engine
        .accept_program(user_id, program.id, now())
        .await
        .unwrap();

    // Two weeks of schedule; day 14 is past the end.
    let date = today() + chrono::Days::new(14);
    assert!(matches!(
        engine.get_daily_workout(user_id, date).await.unwrap(),
        DailyResolution::ProgramComplete
    ));
}

#[tokio::test]
async fn daily_programs_always_serve_their_session() {
    let (engine, _store) = test_engine();
    let user_id = Uuid::new_v4();
    let request = GenerationRequest {
        program_type: ProgramType::Daily,
        fitness_level: FitnessLevel::Beginner,
        goals: vec![Goal::GeneralFitness],
        equipment: vec!["barbell".into()],
        days_per_week: 1,
        duration_weeks: None,
        time_per_session_minutes: 45,
    };
    let program = engine
        .generate_program(user_id, &request, now())
        .await
        .unwrap();
    engine
        .accept_program(user_id, program.id, now())
        .await
        .unwrap();

    // Even weeks later, a daily program still serves its single session.
    let date = today() + chrono::Days::new(30);
    assert!(matches!(
        engine.get_daily_workout(user_id, date).await.unwrap(),
        DailyResolution::Workout { .. }
    ));

    // Dates before activation resolve to day one rather than erroring.
    assert!(matches!(
        engine.get_daily_workout(user_id, days_ago(5)).await.unwrap(),
        DailyResolution::Workout { .. }
    ));
}
