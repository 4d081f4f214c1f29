// ABOUTME: Storage abstraction for program persistence and workout log reads
// ABOUTME: The activate operation is the single atomic write upholding one-active-program-per-user
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Storage abstraction layer.
//!
//! Two backends implement these traits: [`sqlite::SqliteDatabase`] for
//! production and [`memory::MemoryStore`] for tests and ephemeral runs.
//! Program generation is effect-free until [`ProgramStore::insert_program`];
//! the accept flow is effect-free until [`ProgramStore::activate_program`].

pub mod memory;
pub mod sqlite;

use crate::models::{ProgramStatus, TrainingProgram, WorkoutLog};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Result of the atomic activate operation.
///
/// The storage layer reports what it found under isolation; interpreting the
/// outcome (idempotent success vs. lifecycle violation) belongs to the
/// lifecycle manager.
#[derive(Debug, Clone)]
pub enum ActivationOutcome {
    /// The draft was promoted; any previously active program was superseded
    /// in the same transaction.
    Activated(TrainingProgram),
    /// The target was already the user's active program. No writes occurred.
    AlreadyActive(TrainingProgram),
    /// The target is superseded, which is terminal. No writes occurred.
    Superseded,
    /// No program with this id belongs to this user.
    NotFound,
}

/// Persistence for training programs and their plan trees.
#[async_trait]
pub trait ProgramStore: Send + Sync {
    /// Persist a freshly composed draft program.
    async fn insert_program(&self, program: &TrainingProgram) -> Result<()>;

    /// Fetch one program by id, regardless of owner.
    async fn get_program(&self, program_id: Uuid) -> Result<Option<TrainingProgram>>;

    /// List a user's programs, newest first, optionally filtered by status.
    async fn list_programs(
        &self,
        user_id: Uuid,
        status: Option<ProgramStatus>,
    ) -> Result<Vec<TrainingProgram>>;

    /// The user's active program, if any.
    async fn get_active_program(&self, user_id: Uuid) -> Result<Option<TrainingProgram>>;

    /// Atomically promote `program_id` from draft to active for `user_id`,
    /// superseding any currently active program in the same transaction.
    ///
    /// The status check and both writes happen under isolation so two
    /// concurrent accepts cannot both succeed.
    async fn activate_program(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        activated_at: DateTime<Utc>,
    ) -> Result<ActivationOutcome>;
}

/// Read access to the workout log stream, plus inserts for seeding.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Logs for a user within `[start, end)`, ordered by date ascending.
    async fn logs_in_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutLog>>;

    /// Distinct calendar dates with at least one log, ascending.
    async fn distinct_log_dates(&self, user_id: Uuid) -> Result<Vec<NaiveDate>>;

    /// Insert a log row. Log writes normally belong to the logging
    /// collaborator; the engine uses this only for seeding demo data.
    async fn insert_log(&self, log: &WorkoutLog) -> Result<()>;
}
