// ABOUTME: Engine facade wiring catalog, stores, and components behind the public operations
// ABOUTME: Every storage call carries an explicit deadline; timeouts surface as retryable failures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! The Adaptive Training Engine.
//!
//! All operations are stateless computations over data fetched at call time;
//! there is no background scheduling. Callers pass the clock explicitly, so
//! every operation is reproducible in tests.

use crate::catalog::CatalogProvider;
use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::intelligence::{
    compute_streaks, frequency_report, synthesize_insights, week_comparison, weekly_grid,
    FrequencyReport, StreakSummary, WeekComparison, WeeklyGrid,
};
use crate::intelligence::streaks::week_start;
use crate::models::{Insight, ProgramStatus, TrainingProgram, WorkoutLog};
use crate::storage::{LogStore, ProgramStore};
use crate::trainer::composer::{ExerciseHistory, ProgramComposer};
use crate::trainer::constraints::{self, GenerationRequest};
use crate::trainer::lifecycle::LifecycleManager;
use crate::trainer::schedule::{resolve_daily_workout, DailyResolution};
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Upper bound accepted for the frequency window query parameter.
const MAX_FREQUENCY_WEEKS: u32 = 52;

/// The engine facade: one instance serves every user.
#[derive(Clone)]
pub struct TrainingEngine {
    catalog: Arc<dyn CatalogProvider>,
    programs: Arc<dyn ProgramStore>,
    logs: Arc<dyn LogStore>,
    config: EngineConfig,
}

impl TrainingEngine {
    /// Build an engine over the given collaborators.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        programs: Arc<dyn ProgramStore>,
        logs: Arc<dyn LogStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            programs,
            logs,
            config,
        }
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a draft program from the request.
    ///
    /// Effect-free until the final insert: a failed composition writes
    /// nothing.
    ///
    /// # Errors
    ///
    /// `InvalidConstraint`, `InsufficientCatalogCoverage`, or storage
    /// failures.
    pub async fn generate_program(
        &self,
        user_id: Uuid,
        request: &GenerationRequest,
        now: DateTime<Utc>,
    ) -> EngineResult<TrainingProgram> {
        let policy = constraints::resolve(request)?;

        let history_start = now - Duration::days(self.config.generation.history_window_days);
        let history_logs = self
            .timed("load exercise history", async {
                self.logs
                    .logs_in_range(user_id, history_start, now)
                    .await
                    .map_err(EngineError::from)
            })
            .await?;
        let history = ExerciseHistory::from_logs(&history_logs);

        let composer = ProgramComposer::new(self.catalog.as_ref(), &self.config.generation);
        let program = self
            .timed(
                "compose program",
                composer.compose(user_id, &policy, &history, now),
            )
            .await?;

        self.timed("persist draft program", async {
            self.programs
                .insert_program(&program)
                .await
                .map_err(EngineError::from)
        })
        .await?;
        Ok(program)
    }

    /// Accept a draft program, superseding any active one.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Forbidden`, `InvalidTransition`, or storage failures.
    pub async fn accept_program(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<TrainingProgram> {
        let lifecycle = LifecycleManager::new(self.programs.as_ref());
        self.timed("accept program", lifecycle.accept(user_id, program_id, now))
            .await
    }

    /// Fetch one owned program.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Forbidden`, or storage failures.
    pub async fn get_program(
        &self,
        user_id: Uuid,
        program_id: Uuid,
    ) -> EngineResult<TrainingProgram> {
        let lifecycle = LifecycleManager::new(self.programs.as_ref());
        self.timed("load program", lifecycle.get_owned(user_id, program_id))
            .await
    }

    /// List the user's programs, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn list_programs(
        &self,
        user_id: Uuid,
        status: Option<ProgramStatus>,
    ) -> EngineResult<Vec<TrainingProgram>> {
        self.timed("list programs", async {
            self.programs
                .list_programs(user_id, status)
                .await
                .map_err(EngineError::from)
        })
        .await
    }

    /// The user's active program, if any.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn get_active_program(
        &self,
        user_id: Uuid,
    ) -> EngineResult<Option<TrainingProgram>> {
        self.timed("load active program", async {
            self.programs
                .get_active_program(user_id)
                .await
                .map_err(EngineError::from)
        })
        .await
    }

    /// Resolve today's workout from the active program.
    ///
    /// # Errors
    ///
    /// Storage failures. Rest days, completion, and "no active program" are
    /// outcomes, not errors.
    pub async fn get_daily_workout(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> EngineResult<DailyResolution> {
        match self.get_active_program(user_id).await? {
            Some(program) => Ok(resolve_daily_workout(&program, today)),
            None => Ok(DailyResolution::NoActiveProgram),
        }
    }

    /// Current and longest streak from the full log history.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn get_streak(&self, user_id: Uuid, today: NaiveDate) -> EngineResult<StreakSummary> {
        let dates = self
            .timed("load log dates", async {
                self.logs
                    .distinct_log_dates(user_id)
                    .await
                    .map_err(EngineError::from)
            })
            .await?;
        Ok(compute_streaks(&dates, today))
    }

    /// The current Monday-start week's activity grid.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn get_weekly_grid(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> EngineResult<WeeklyGrid> {
        let monday = week_start(today);
        let logs = self
            .logs_between(user_id, monday, monday + Days::new(7))
            .await?;
        Ok(weekly_grid(&logs, today))
    }

    /// Trailing weekly frequency buckets with a trend classification.
    ///
    /// # Errors
    ///
    /// `InvalidConstraint` when `weeks` is out of `[1, 52]`; storage
    /// failures.
    pub async fn get_frequency_trend(
        &self,
        user_id: Uuid,
        today: NaiveDate,
        weeks: Option<u32>,
    ) -> EngineResult<FrequencyReport> {
        let weeks = weeks.unwrap_or(self.config.analytics.frequency_weeks);
        if !(1..=MAX_FREQUENCY_WEEKS).contains(&weeks) {
            return Err(EngineError::invalid_constraint(format!(
                "weeks must be between 1 and {MAX_FREQUENCY_WEEKS}, got {weeks}"
            )));
        }

        let first_monday = week_start(today) - Days::new(7 * u64::from(weeks - 1));
        let logs = self
            .logs_between(user_id, first_monday, today + Days::new(1))
            .await?;
        Ok(frequency_report(
            &logs,
            today,
            weeks,
            self.config.analytics.trend_threshold,
        ))
    }

    /// Current vs. previous calendar week aggregates.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn get_week_comparison(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> EngineResult<WeekComparison> {
        let current_monday = week_start(today);
        let previous_monday = current_monday - Days::new(7);
        let current_logs = self
            .logs_between(user_id, current_monday, current_monday + Days::new(7))
            .await?;
        let previous_logs = self
            .logs_between(user_id, previous_monday, current_monday)
            .await?;
        Ok(week_comparison(&current_logs, &previous_logs, today))
    }

    /// Ranked, deduplicated insights over the trailing window.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn get_insights(
        &self,
        user_id: Uuid,
        today: NaiveDate,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> EngineResult<Vec<Insight>> {
        let window_start = today - Days::new(7 * u64::from(self.config.insights.window_weeks));
        let logs = self
            .logs_between(user_id, window_start, today + Days::new(1))
            .await?;

        let dates = self
            .timed("load log dates", async {
                self.logs
                    .distinct_log_dates(user_id)
                    .await
                    .map_err(EngineError::from)
            })
            .await?;
        let streak = compute_streaks(&dates, today);

        let exercise_names = self
            .timed("resolve exercise names", async {
                let mut names: HashMap<Uuid, String> = HashMap::new();
                for log in &logs {
                    if names.contains_key(&log.exercise_id) {
                        continue;
                    }
                    match self.catalog.get_exercise(log.exercise_id).await {
                        Ok(Some(exercise)) => {
                            names.insert(log.exercise_id, exercise.name);
                        }
                        Ok(None) => {}
                        Err(error) => {
                            // Names only decorate insight text; a catalog
                            // hiccup should not sink the whole read.
                            warn!(exercise_id = %log.exercise_id, %error, "catalog lookup failed");
                        }
                    }
                }
                Ok(names)
            })
            .await?;

        let mut insights = synthesize_insights(
            &logs,
            &streak,
            &exercise_names,
            today,
            now,
            &self.config.insights,
        );
        insights.truncate(limit.unwrap_or(self.config.insights.default_limit));
        Ok(insights)
    }

    /// Logs between two dates, `[start, end)`, via the timed storage path.
    async fn logs_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<WorkoutLog>> {
        let start = Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN));
        let end = Utc.from_utc_datetime(&end.and_time(NaiveTime::MIN));
        self.timed("load logs", async {
            self.logs
                .logs_in_range(user_id, start, end)
                .await
                .map_err(EngineError::from)
        })
        .await
    }

    /// Apply the storage deadline to one operation. The engine never retries;
    /// a timeout is reported to the caller as retryable.
    async fn timed<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = EngineResult<T>>,
    ) -> EngineResult<T> {
        match tokio::time::timeout(self.config.storage_timeout(), fut).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout {
                operation: operation.to_owned(),
                timeout_ms: self.config.storage_timeout_ms,
            }),
        }
    }
}
