// ABOUTME: In-memory storage backend for tests and ephemeral runs
// ABOUTME: A single mutex per store makes the activate transition trivially atomic
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{ActivationOutcome, LogStore, ProgramStore};
use crate::catalog::{CatalogProvider, ExerciseFilter};
use crate::models::{Exercise, ProgramStatus, TrainingProgram, WorkoutLog};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    programs: HashMap<Uuid, TrainingProgram>,
    logs: Vec<WorkoutLog>,
    exercises: Vec<Exercise>,
}

/// In-memory store implementing every storage trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with a catalog, for test setups.
    #[must_use]
    pub fn with_catalog(exercises: Vec<Exercise>) -> Self {
        let store = Self::new();
        store.lock().exercises = exercises;
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens when a holder panicked; propagating the
        // panic is the right behavior in tests.
        #[allow(clippy::unwrap_used)]
        self.inner.lock().unwrap()
    }
}

#[async_trait]
impl ProgramStore for MemoryStore {
    async fn insert_program(&self, program: &TrainingProgram) -> Result<()> {
        self.lock().programs.insert(program.id, program.clone());
        Ok(())
    }

    async fn get_program(&self, program_id: Uuid) -> Result<Option<TrainingProgram>> {
        Ok(self.lock().programs.get(&program_id).cloned())
    }

    async fn list_programs(
        &self,
        user_id: Uuid,
        status: Option<ProgramStatus>,
    ) -> Result<Vec<TrainingProgram>> {
        let mut programs: Vec<TrainingProgram> = self
            .lock()
            .programs
            .values()
            .filter(|p| p.user_id == user_id && status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        programs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(programs)
    }

    async fn get_active_program(&self, user_id: Uuid) -> Result<Option<TrainingProgram>> {
        Ok(self
            .lock()
            .programs
            .values()
            .find(|p| p.user_id == user_id && p.status == ProgramStatus::Active)
            .cloned())
    }

    async fn activate_program(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        activated_at: DateTime<Utc>,
    ) -> Result<ActivationOutcome> {
        let mut inner = self.lock();

        let Some(target) = inner.programs.get(&program_id) else {
            return Ok(ActivationOutcome::NotFound);
        };
        if target.user_id != user_id {
            return Ok(ActivationOutcome::NotFound);
        }
        match target.status {
            ProgramStatus::Active => {
                return Ok(ActivationOutcome::AlreadyActive(target.clone()));
            }
            ProgramStatus::Superseded => return Ok(ActivationOutcome::Superseded),
            ProgramStatus::Draft => {}
        }

        for program in inner.programs.values_mut() {
            if program.user_id == user_id && program.status == ProgramStatus::Active {
                program.status = ProgramStatus::Superseded;
            }
        }

        // Checked above that the entry exists; the lock is still held.
        #[allow(clippy::unwrap_used)]
        let target = inner.programs.get_mut(&program_id).unwrap();
        target.status = ProgramStatus::Active;
        target.activated_at = Some(activated_at);
        Ok(ActivationOutcome::Activated(target.clone()))
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn logs_in_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkoutLog>> {
        let mut logs: Vec<WorkoutLog> = self
            .lock()
            .logs
            .iter()
            .filter(|log| log.user_id == user_id && log.date >= start && log.date < end)
            .cloned()
            .collect();
        logs.sort_by_key(|log| log.date);
        Ok(logs)
    }

    async fn distinct_log_dates(&self, user_id: Uuid) -> Result<Vec<NaiveDate>> {
        let dates: BTreeSet<NaiveDate> = self
            .lock()
            .logs
            .iter()
            .filter(|log| log.user_id == user_id)
            .map(WorkoutLog::day)
            .collect();
        Ok(dates.into_iter().collect())
    }

    async fn insert_log(&self, log: &WorkoutLog) -> Result<()> {
        self.lock().logs.push(log.clone());
        Ok(())
    }
}

#[async_trait]
impl CatalogProvider for MemoryStore {
    async fn get_exercise(&self, id: Uuid) -> Result<Option<Exercise>> {
        Ok(self.lock().exercises.iter().find(|e| e.id == id).cloned())
    }

    async fn find_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        let mut exercises: Vec<Exercise> = self
            .lock()
            .exercises
            .iter()
            .filter(|exercise| filter.matches(exercise))
            .cloned()
            .collect();
        exercises.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(exercises)
    }
}
