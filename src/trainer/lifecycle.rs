// ABOUTME: Program lifecycle transitions: draft to active to superseded (terminal)
// ABOUTME: Accept is idempotent and delegates the one-active-per-user flip to atomic storage
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::errors::{EngineError, EngineResult};
use crate::models::{ProgramStatus, TrainingProgram};
use crate::storage::{ActivationOutcome, ProgramStore};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

/// Enforces ownership and the single-active-program invariant.
///
/// The manager itself holds no state; the invariant lives in the storage
/// layer's atomic [`ProgramStore::activate_program`]. Nothing here has side
/// effects until that single write.
pub struct LifecycleManager<'a> {
    store: &'a dyn ProgramStore,
}

impl<'a> LifecycleManager<'a> {
    /// Manager over the given program store.
    #[must_use]
    pub const fn new(store: &'a dyn ProgramStore) -> Self {
        Self { store }
    }

    /// Accept a draft program, superseding any currently active one.
    ///
    /// Accepting the already-active program is a no-op that returns it.
    ///
    /// # Errors
    ///
    /// `NotFound` when the program does not exist, `Forbidden` when the
    /// caller does not own it, `InvalidTransition` when it is superseded.
    pub async fn accept(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<TrainingProgram> {
        // Distinguish Forbidden from NotFound before the conditional write;
        // the write itself re-checks ownership under isolation.
        match self.store.get_program(program_id).await? {
            None => return Err(EngineError::not_found("program")),
            Some(program) if program.user_id != user_id => {
                return Err(EngineError::forbidden("program"));
            }
            Some(_) => {}
        }

        match self.store.activate_program(user_id, program_id, now).await? {
            ActivationOutcome::Activated(program) => {
                info!(user_id = %user_id, program_id = %program_id, "program activated");
                Ok(program)
            }
            ActivationOutcome::AlreadyActive(program) => Ok(program),
            ActivationOutcome::Superseded => Err(EngineError::InvalidTransition {
                from: ProgramStatus::Superseded,
            }),
            ActivationOutcome::NotFound => Err(EngineError::not_found("program")),
        }
    }

    /// Fetch a program the caller owns.
    ///
    /// # Errors
    ///
    /// `NotFound` when absent, `Forbidden` when owned by someone else.
    pub async fn get_owned(
        &self,
        user_id: Uuid,
        program_id: Uuid,
    ) -> EngineResult<TrainingProgram> {
        match self.store.get_program(program_id).await? {
            None => Err(EngineError::not_found("program")),
            Some(program) if program.user_id != user_id => {
                Err(EngineError::forbidden("program"))
            }
            Some(program) => Ok(program),
        }
    }
}
