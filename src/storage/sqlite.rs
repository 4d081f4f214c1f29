// ABOUTME: SQLite storage backend using sqlx with idempotent schema migration
// ABOUTME: Program trees are stored as JSON documents; activation runs inside one transaction
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{ActivationOutcome, LogStore, ProgramStore};
use crate::catalog::{CatalogProvider, ExerciseFilter};
use crate::models::{Exercise, ProgramStatus, TrainingProgram, WorkoutLog};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeSet;
use uuid::Uuid;

/// SQLite-backed storage for programs, logs, and the exercise catalog.
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (and create, for file URLs) the database.
    ///
    /// # Errors
    ///
    /// Returns an error when the pool cannot be established.
    pub async fn new(database_url: &str) -> Result<Self> {
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };
        let pool = SqlitePool::connect(&connection_options)
            .await
            .with_context(|| format!("failed to open database at {database_url}"))?;
        Ok(Self { pool })
    }

    /// Create tables and indices if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when a DDL statement fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS training_programs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                activated_at TEXT,
                document TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_programs_user_status
            ON training_programs (user_id, status)
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                exercise_id TEXT NOT NULL,
                date TEXT NOT NULL,
                sets_completed INTEGER NOT NULL,
                reps TEXT NOT NULL,
                weight_kg TEXT,
                duration_seconds INTEGER,
                distance_km REAL,
                difficulty_rating INTEGER,
                notes TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_logs_user_date
            ON workout_logs (user_id, date)
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                document TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a catalog exercise. Used by the seeding binary; the catalog is
    /// otherwise read-only from the engine's perspective.
    ///
    /// # Errors
    ///
    /// Returns an error on serialization or storage failure.
    pub async fn insert_exercise(&self, exercise: &Exercise) -> Result<()> {
        let document = serde_json::to_string(exercise)?;
        sqlx::query(
            "INSERT OR REPLACE INTO exercises (id, name, document) VALUES (?, ?, ?)",
        )
        .bind(exercise.id.to_string())
        .bind(&exercise.name)
        .bind(document)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn program_from_document(document: &str) -> Result<TrainingProgram> {
        serde_json::from_str(document).context("corrupt training program document")
    }
}

#[async_trait]
impl ProgramStore for SqliteDatabase {
    async fn insert_program(&self, program: &TrainingProgram) -> Result<()> {
        let document = serde_json::to_string(program)?;
        sqlx::query(
            r"
            INSERT INTO training_programs (id, user_id, status, created_at, activated_at, document)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(program.id.to_string())
        .bind(program.user_id.to_string())
        .bind(program.status.to_string())
        .bind(program.created_at.to_rfc3339())
        .bind(program.activated_at.map(|ts| ts.to_rfc3339()))
        .bind(document)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_program(&self, program_id: Uuid) -> Result<Option<TrainingProgram>> {
        let row = sqlx::query("SELECT document FROM training_programs WHERE id = ?")
            .bind(program_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| Self::program_from_document(row.try_get::<String, _>("document")?.as_str()))
            .transpose()
    }

    async fn list_programs(
        &self,
        user_id: Uuid,
        status: Option<ProgramStatus>,
    ) -> Result<Vec<TrainingProgram>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    r"
                    SELECT document FROM training_programs
                    WHERE user_id = ? AND status = ?
                    ORDER BY created_at DESC
                    ",
                )
                .bind(user_id.to_string())
                .bind(status.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r"
                    SELECT document FROM training_programs
                    WHERE user_id = ?
                    ORDER BY created_at DESC
                    ",
                )
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter()
            .map(|row| Self::program_from_document(row.try_get::<String, _>("document")?.as_str()))
            .collect()
    }

    async fn get_active_program(&self, user_id: Uuid) -> Result<Option<TrainingProgram>> {
        let row = sqlx::query(
            "SELECT document FROM training_programs WHERE user_id = ? AND status = 'active'",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| Self::program_from_document(row.try_get::<String, _>("document")?.as_str()))
            .transpose()
    }

    async fn activate_program(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        activated_at: DateTime<Utc>,
    ) -> Result<ActivationOutcome> {
        // The no-op write upgrades the deferred transaction to SQLite's
        // write lock up front, so the status check and both updates form one
        // isolated unit and concurrent accepts serialize.
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE training_programs SET status = status WHERE 0")
            .execute(&mut *tx)
            .await?;

        let target = sqlx::query(
            "SELECT status, document FROM training_programs WHERE id = ? AND user_id = ?",
        )
        .bind(program_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(target) = target else {
            return Ok(ActivationOutcome::NotFound);
        };
        let status: String = target.try_get("status")?;
        let document: String = target.try_get("document")?;
        match status.as_str() {
            "active" => {
                return Ok(ActivationOutcome::AlreadyActive(
                    Self::program_from_document(&document)?,
                ));
            }
            "superseded" => return Ok(ActivationOutcome::Superseded),
            _ => {}
        }

        let active_rows = sqlx::query(
            "SELECT id, document FROM training_programs WHERE user_id = ? AND status = 'active'",
        )
        .bind(user_id.to_string())
        .fetch_all(&mut *tx)
        .await?;
        for row in active_rows {
            let id: String = row.try_get("id")?;
            let mut program = Self::program_from_document(row.try_get::<String, _>("document")?.as_str())?;
            program.status = ProgramStatus::Superseded;
            sqlx::query("UPDATE training_programs SET status = 'superseded', document = ? WHERE id = ?")
                .bind(serde_json::to_string(&program)?)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let mut program = Self::program_from_document(&document)?;
        program.status = ProgramStatus::Active;
        program.activated_at = Some(activated_at);
        sqlx::query(
            r"
            UPDATE training_programs
            SET status = 'active', activated_at = ?, document = ?
            WHERE id = ? AND status = 'draft'
            ",
        )
        .bind(activated_at.to_rfc3339())
        .bind(serde_json::to_string(&program)?)
        .bind(program_id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ActivationOutcome::Activated(program))
    }
}

#[async_trait]
impl LogStore for SqliteDatabase {
    async fn logs_in_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, exercise_id, date, sets_completed, reps, weight_kg,
                   duration_seconds, distance_km, difficulty_rating, notes
            FROM workout_logs
            WHERE user_id = ? AND date >= ? AND date < ?
            ORDER BY date ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(start.to_rfc3339())
        .bind(end.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| log_from_row(&row)).collect()
    }

    async fn distinct_log_dates(&self, user_id: Uuid) -> Result<Vec<NaiveDate>> {
        let rows = sqlx::query("SELECT date FROM workout_logs WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        let dates: BTreeSet<NaiveDate> = rows
            .into_iter()
            .map(|row| {
                let raw: String = row.try_get("date")?;
                Ok(parse_timestamp(&raw)?.date_naive())
            })
            .collect::<Result<_>>()?;
        Ok(dates.into_iter().collect())
    }

    async fn insert_log(&self, log: &WorkoutLog) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO workout_logs
                (id, user_id, exercise_id, date, sets_completed, reps, weight_kg,
                 duration_seconds, distance_km, difficulty_rating, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(log.id.to_string())
        .bind(log.user_id.to_string())
        .bind(log.exercise_id.to_string())
        .bind(log.date.to_rfc3339())
        .bind(i64::from(log.sets_completed))
        .bind(serde_json::to_string(&log.reps)?)
        .bind(
            log.weight_kg
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
        )
        .bind(log.duration_seconds.map(i64::from))
        .bind(log.distance_km)
        .bind(log.difficulty_rating.map(i64::from))
        .bind(&log.notes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogProvider for SqliteDatabase {
    async fn get_exercise(&self, id: Uuid) -> Result<Option<Exercise>> {
        let row = sqlx::query("SELECT document FROM exercises WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| {
            serde_json::from_str(row.try_get::<String, _>("document")?.as_str())
                .context("corrupt exercise document")
        })
        .transpose()
    }

    async fn find_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        // The catalog is small; equipment and muscle-group matching against
        // JSON columns is done in process, matching the collaborator's own
        // filter semantics.
        let rows = sqlx::query("SELECT document FROM exercises ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        let mut exercises = Vec::new();
        for row in rows {
            let exercise: Exercise =
                serde_json::from_str(row.try_get::<String, _>("document")?.as_str())
                    .context("corrupt exercise document")?;
            if filter.matches(&exercise) {
                exercises.push(exercise);
            }
        }
        Ok(exercises)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("invalid timestamp in storage: {raw}"))?
        .with_timezone(&Utc))
}

fn log_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<WorkoutLog> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let exercise_id: String = row.try_get("exercise_id")?;
    let date: String = row.try_get("date")?;
    let reps: String = row.try_get("reps")?;
    let weight_kg: Option<String> = row.try_get("weight_kg")?;
    let sets_completed: i64 = row.try_get("sets_completed")?;
    let duration_seconds: Option<i64> = row.try_get("duration_seconds")?;
    let difficulty_rating: Option<i64> = row.try_get("difficulty_rating")?;

    Ok(WorkoutLog {
        id: Uuid::parse_str(&id)?,
        user_id: Uuid::parse_str(&user_id)?,
        exercise_id: Uuid::parse_str(&exercise_id)?,
        date: parse_timestamp(&date)?,
        sets_completed: u32::try_from(sets_completed)?,
        reps: serde_json::from_str(&reps)?,
        weight_kg: weight_kg.as_deref().map(serde_json::from_str).transpose()?,
        duration_seconds: duration_seconds.map(u32::try_from).transpose()?,
        distance_km: row.try_get("distance_km")?,
        difficulty_rating: difficulty_rating.map(u8::try_from).transpose()?,
        notes: row.try_get("notes")?,
    })
}
