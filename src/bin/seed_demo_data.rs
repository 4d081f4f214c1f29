// ABOUTME: Seeds the starter exercise catalog and demo workout logs for local development
// ABOUTME: Demo logs follow a deterministic Mon/Wed/Fri pattern with slowly rising loads
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Demo data seeder

use anyhow::Result;
use chrono::{Datelike, Days, NaiveTime, TimeZone, Utc, Weekday};
use clap::Parser;
use milo_training_engine::{
    catalog::starter_catalog,
    logging,
    storage::{sqlite::SqliteDatabase, LogStore},
};
use milo_training_engine::models::{Exercise, WorkoutLog};
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "seed-demo-data")]
#[command(about = "Seed the Milo database with a starter catalog and demo workout logs")]
struct Args {
    /// Database URL to seed
    #[arg(long, default_value = "sqlite:milo.db")]
    database_url: String,

    /// User to attach demo logs to (a fresh id is generated when omitted)
    #[arg(long)]
    user_id: Option<Uuid>,

    /// Weeks of demo history to generate
    #[arg(long, default_value_t = 8)]
    weeks: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let database = SqliteDatabase::new(&args.database_url).await?;
    database.migrate().await?;

    let catalog = starter_catalog();
    for exercise in &catalog {
        database.insert_exercise(exercise).await?;
    }
    info!(count = catalog.len(), "catalog seeded");

    let user_id = args.user_id.unwrap_or_else(Uuid::new_v4);
    let count = seed_logs(&database, &catalog, user_id, args.weeks).await?;
    info!(user_id = %user_id, count, "demo logs seeded");
    println!("seeded demo data for user {user_id}");
    Ok(())
}

/// Three sessions a week (Mon/Wed/Fri), three lifts each, loads creeping up
/// week over week so the analytics have something to chew on.
async fn seed_logs(
    database: &SqliteDatabase,
    catalog: &[Exercise],
    user_id: Uuid,
    weeks: u64,
) -> Result<usize> {
    let lifts: Vec<&Exercise> = ["Barbell Bench Press", "Barbell Row", "Back Squat"]
        .iter()
        .filter_map(|name| catalog.iter().find(|e| e.name == *name))
        .collect();

    let today = Utc::now().date_naive();
    let mut inserted = 0usize;
    let mut day = today - Days::new(weeks * 7);
    while day <= today {
        let trains = matches!(day.weekday(), Weekday::Mon | Weekday::Wed | Weekday::Fri);
        if trains {
            let week_index = (today - day).num_days() / 7;
            let base_weight = 60.0 + (weeks as f64 - week_index as f64) * 1.25;
            for (slot, lift) in lifts.iter().enumerate() {
                let weight = base_weight + slot as f64 * 10.0;
                let log = WorkoutLog {
                    id: Uuid::new_v4(),
                    user_id,
                    exercise_id: lift.id,
                    date: Utc.from_utc_datetime(
                        &day.and_time(NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN)),
                    ),
                    sets_completed: 3,
                    reps: vec![10, 9, 8],
                    weight_kg: Some(vec![weight, weight, weight + 2.5]),
                    duration_seconds: None,
                    distance_km: None,
                    difficulty_rating: Some(6),
                    notes: None,
                };
                database.insert_log(&log).await?;
                inserted += 1;
            }
        }
        day = day + Days::new(1);
    }
    Ok(inserted)
}
