// ABOUTME: Program composition: exercise selection, set/rep assignment, periodization, rationale
// ABOUTME: Deterministic given the same policy, catalog, and history; effect-free until persisted
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::catalog::{CatalogProvider, ExerciseFilter};
use crate::config::GenerationConfig;
use crate::errors::{EngineError, EngineResult};
use crate::models::{
    DailyWorkout, Exercise, IntensityLevel, MuscleGroup, ProgramSchedule, ProgramStatus,
    ProgramType, Reps, TrainingProgram, WeekTheme, WeeklyPlan, WorkoutExercise, WorkoutLog,
};
use crate::trainer::constraints::{RepScheme, SelectionPolicy, TrainingSplit};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Last-use dates per exercise, distilled from the trailing log window.
/// Drives least-recently-used selection: unseen exercises first, then the
/// longest-rested ones.
#[derive(Debug, Clone, Default)]
pub struct ExerciseHistory {
    last_used: HashMap<Uuid, NaiveDate>,
}

impl ExerciseHistory {
    /// Build history from raw logs.
    #[must_use]
    pub fn from_logs(logs: &[WorkoutLog]) -> Self {
        let mut last_used: HashMap<Uuid, NaiveDate> = HashMap::new();
        for log in logs {
            let day = log.day();
            last_used
                .entry(log.exercise_id)
                .and_modify(|existing| {
                    if day > *existing {
                        *existing = day;
                    }
                })
                .or_insert(day);
        }
        Self { last_used }
    }

    fn last_used(&self, exercise_id: Uuid) -> Option<NaiveDate> {
        self.last_used.get(&exercise_id).copied()
    }
}

/// The scheduling core: turns a resolved policy plus the catalog into one
/// training program.
pub struct ProgramComposer<'a> {
    catalog: &'a dyn CatalogProvider,
    config: &'a GenerationConfig,
}

impl<'a> ProgramComposer<'a> {
    /// Composer over a catalog with the given generation policy constants.
    #[must_use]
    pub const fn new(catalog: &'a dyn CatalogProvider, config: &'a GenerationConfig) -> Self {
        Self { catalog, config }
    }

    /// Compose a draft program for the user.
    ///
    /// # Errors
    ///
    /// [`EngineError::InsufficientCatalogCoverage`] when a targeted muscle
    /// group has no candidates under the equipment filter; storage errors
    /// from catalog queries pass through.
    pub async fn compose(
        &self,
        user_id: Uuid,
        policy: &SelectionPolicy,
        history: &ExerciseHistory,
        now: DateTime<Utc>,
    ) -> EngineResult<TrainingProgram> {
        let candidates = self.gather_candidates(policy, history).await?;

        let schedule = match policy.program_type {
            ProgramType::Daily => ProgramSchedule::Daily {
                workout: self.compose_day(policy, policy.rep_scheme, 0, 1, 0, &candidates, None),
            },
            ProgramType::MultiWeek => ProgramSchedule::MultiWeek {
                weeks: self.compose_weeks(policy, &candidates),
            },
        };

        debug!(
            user_id = %user_id,
            split = policy.split.display_name(),
            days_per_week = policy.days_per_week,
            "composed {} program",
            match policy.program_type {
                ProgramType::Daily => "daily",
                ProgramType::MultiWeek => "multi-week",
            }
        );

        Ok(TrainingProgram {
            id: Uuid::new_v4(),
            user_id,
            name: program_name(policy),
            description: Some(format!(
                "Rule-based training program for {}",
                join_goals(policy)
            )),
            status: ProgramStatus::Draft,
            fitness_level: policy.fitness_level,
            goals: policy.goals.clone(),
            equipment: policy.equipment.clone(),
            days_per_week: policy.days_per_week,
            duration_weeks: policy.duration_weeks,
            time_per_session_minutes: policy.time_per_session_minutes,
            ai_rationale: build_rationale(policy, self.config),
            schedule,
            created_at: now,
            activated_at: None,
        })
    }

    /// Candidate exercises per targeted muscle group, ordered
    /// least-recently-used first with a stable (name, id) tiebreak.
    async fn gather_candidates(
        &self,
        policy: &SelectionPolicy,
        history: &ExerciseHistory,
    ) -> EngineResult<HashMap<MuscleGroup, Vec<Exercise>>> {
        let mut groups: Vec<MuscleGroup> = Vec::new();
        for day_index in 0..policy.days_per_week {
            for group in policy.day_targets(day_index) {
                if !groups.contains(&group) {
                    groups.push(group);
                }
            }
        }

        let mut candidates = HashMap::new();
        for group in groups {
            let filter = ExerciseFilter::default()
                .with_difficulty(policy.fitness_level)
                .with_muscle_group(group)
                .with_equipment(policy.equipment.clone());
            let mut found = self.catalog.find_exercises(&filter).await?;
            if found.is_empty() {
                // Relax the difficulty before giving up: an adjacent-level
                // exercise beats an uncovered muscle group.
                let relaxed = ExerciseFilter::default()
                    .with_muscle_group(group)
                    .with_equipment(policy.equipment.clone());
                found = self.catalog.find_exercises(&relaxed).await?;
            }
            if found.is_empty() {
                return Err(EngineError::InsufficientCatalogCoverage {
                    muscle_group: group,
                    equipment: policy.equipment.clone(),
                });
            }
            found.sort_by(|a, b| {
                let a_key = (history.last_used(a.id).is_some(), history.last_used(a.id));
                let b_key = (history.last_used(b.id).is_some(), history.last_used(b.id));
                a_key
                    .cmp(&b_key)
                    .then_with(|| a.name.cmp(&b.name))
                    .then_with(|| a.id.cmp(&b.id))
            });
            candidates.insert(group, found);
        }
        Ok(candidates)
    }

    fn compose_weeks(
        &self,
        policy: &SelectionPolicy,
        candidates: &HashMap<MuscleGroup, Vec<Exercise>>,
    ) -> Vec<WeeklyPlan> {
        let duration = policy.duration_weeks.unwrap_or(1);
        (0..duration)
            .map(|week_index| {
                let theme = self.week_theme(week_index, duration);
                let scheme = self.scheme_for_week(policy.rep_scheme, theme, week_index);
                let daily_workouts = (0..policy.days_per_week)
                    .map(|day_index| {
                        self.compose_day(
                            policy,
                            scheme,
                            day_index,
                            day_index + 1,
                            week_index,
                            candidates,
                            None,
                        )
                    })
                    .collect();
                WeeklyPlan {
                    week_number: week_index + 1,
                    theme,
                    notes: Some(week_note(theme).to_owned()),
                    daily_workouts,
                }
            })
            .collect()
    }

    /// Linear periodization themes: Foundation first, Deload last for
    /// programs of four weeks or more, Build in between until the
    /// progression cap is reached, then Peak.
    fn week_theme(&self, week_index: u32, duration: u32) -> WeekTheme {
        if week_index == 0 {
            return WeekTheme::Foundation;
        }
        if duration >= 4 && week_index == duration - 1 {
            return WeekTheme::Deload;
        }
        if self.progression_sets(week_index) >= self.config.max_progression_sets {
            WeekTheme::Peak
        } else {
            WeekTheme::Build
        }
    }

    /// Extra sets earned by the given week, before capping.
    fn progression_sets(&self, week_index: u32) -> u32 {
        (week_index / self.config.progression_interval_weeks)
            .min(self.config.max_progression_sets)
    }

    fn scheme_for_week(&self, base: RepScheme, theme: WeekTheme, week_index: u32) -> RepScheme {
        match theme {
            WeekTheme::Foundation => base,
            WeekTheme::Build | WeekTheme::Peak => RepScheme {
                sets: base.sets + self.progression_sets(week_index),
                ..base
            },
            WeekTheme::Deload => RepScheme {
                sets: base.sets.saturating_sub(1).max(2),
                rest_seconds: base.rest_seconds + 30,
                intensity: IntensityLevel::Light,
                ..base
            },
        }
    }

    /// Compose one session: one exercise per targeted group, then secondary
    /// volume round-robin while the session estimate fits, trimming the most
    /// recently added extras first.
    #[allow(clippy::too_many_arguments)]
    fn compose_day(
        &self,
        policy: &SelectionPolicy,
        scheme: RepScheme,
        day_index: u32,
        day_number: u32,
        rotation: u32,
        candidates: &HashMap<MuscleGroup, Vec<Exercise>>,
        notes: Option<String>,
    ) -> DailyWorkout {
        let targets = policy.day_targets(day_index);
        let mut picked: Vec<Exercise> = Vec::new();

        // One exercise per targeted group. A group whose every candidate is
        // already picked stays covered by the earlier pick.
        for group in &targets {
            if let Some(exercise) = next_candidate(candidates, *group, rotation, &picked) {
                picked.push(exercise);
            }
        }
        let primary_count = picked.len();

        // Secondary volume, round-robin across the day's groups.
        let budget = policy.time_per_session_minutes;
        'fill: while picked.len() < self.config.max_exercises_per_session {
            let mut added = false;
            for group in &targets {
                if picked.len() >= self.config.max_exercises_per_session {
                    break;
                }
                if let Some(exercise) = next_candidate(candidates, *group, rotation, &picked) {
                    picked.push(exercise);
                    if self.estimate_minutes(picked.len(), scheme) > budget {
                        picked.pop();
                        break 'fill;
                    }
                    added = true;
                }
            }
            if !added {
                break;
            }
        }

        // Guard: trim extras until the estimate fits, never below one
        // exercise per covered group.
        while self.estimate_minutes(picked.len(), scheme) > budget && picked.len() > primary_count {
            picked.pop();
        }

        let exercises = picked
            .iter()
            .map(|exercise| WorkoutExercise {
                exercise_id: exercise.id,
                exercise_name: exercise.name.clone(),
                sets: scheme.sets,
                reps: Reps::Uniform(scheme.target_reps()),
                rest_seconds: scheme.rest_seconds,
                intensity_level: Some(scheme.intensity),
                notes: None,
            })
            .collect();

        DailyWorkout {
            day_number,
            workout_name: workout_name(policy.split, day_index),
            focus_areas: targets,
            estimated_duration_minutes: self.estimate_minutes(picked.len(), scheme),
            notes,
            exercises,
        }
    }

    /// Session estimate: warm-up plus per-exercise working time. Every
    /// exercise in a session shares the week's scheme, so the estimate is a
    /// pure function of the exercise count.
    fn estimate_minutes(&self, exercise_count: usize, scheme: RepScheme) -> u32 {
        let per_set_seconds = scheme.target_reps() * self.config.seconds_per_rep
            + scheme.rest_seconds;
        let work_seconds = exercise_count as u32 * scheme.sets * per_set_seconds;
        self.config.warmup_minutes + work_seconds.div_ceil(60)
    }
}

/// Next unused candidate for the group, in week-rotated LRU order.
fn next_candidate(
    candidates: &HashMap<MuscleGroup, Vec<Exercise>>,
    group: MuscleGroup,
    rotation: u32,
    picked: &[Exercise],
) -> Option<Exercise> {
    let list = candidates.get(&group)?;
    (0..list.len())
        .map(|i| &list[(i + rotation as usize) % list.len()])
        .find(|candidate| picked.iter().all(|chosen| chosen.id != candidate.id))
        .cloned()
}

fn workout_name(split: TrainingSplit, day_index: u32) -> String {
    match split {
        TrainingSplit::FullBody => "Full Body".to_owned(),
        TrainingSplit::PushPullLegs => match day_index % 3 {
            0 => "Push Day".to_owned(),
            1 => "Pull Day".to_owned(),
            _ => "Leg Day".to_owned(),
        },
        TrainingSplit::UpperLower => {
            if day_index % 2 == 0 {
                "Upper Body".to_owned()
            } else {
                "Lower Body".to_owned()
            }
        }
        TrainingSplit::BodyPart => {
            let parts: Vec<String> = split
                .day_targets(day_index)
                .iter()
                .map(|group| title_case(group.display_name()))
                .collect();
            parts.join(" & ")
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn program_name(policy: &SelectionPolicy) -> String {
    match policy.program_type {
        ProgramType::Daily => format!("Daily {} Workout", title_case(&policy.primary_goal().to_string())),
        ProgramType::MultiWeek => format!(
            "{}-Week {} {} Program",
            policy.duration_weeks.unwrap_or(1),
            title_case(&policy.fitness_level.to_string()),
            title_case(&policy.primary_goal().to_string()),
        ),
    }
}

fn join_goals(policy: &SelectionPolicy) -> String {
    policy
        .goals
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Deterministic generation summary. A pure function of the resolved policy
/// and the generation constants: identical inputs yield identical text.
fn build_rationale(policy: &SelectionPolicy, config: &GenerationConfig) -> String {
    let scheme = policy.rep_scheme;
    let mut rationale = format!(
        "Targets {} for a {} athlete training {} days/week on a {} split. \
         Working sets prescribe {}x{}-{} with {}s rest.",
        join_goals(policy),
        policy.fitness_level,
        policy.days_per_week,
        policy.split.display_name(),
        scheme.sets,
        scheme.rep_range.0,
        scheme.rep_range.1,
        scheme.rest_seconds,
    );
    if policy.program_type == ProgramType::MultiWeek {
        let duration = policy.duration_weeks.unwrap_or(1);
        rationale.push_str(&format!(
            " Volume adds one set every {} weeks up to {} extra sets.",
            config.progression_interval_weeks, config.max_progression_sets,
        ));
        if duration >= 4 {
            rationale.push_str(" The final week deloads to absorb the training stress.");
        }
    }
    rationale
}

fn week_note(theme: WeekTheme) -> &'static str {
    match theme {
        WeekTheme::Foundation => "Establish baseline loads and groove technique.",
        WeekTheme::Build => "Add a little load or a rep relative to last week.",
        WeekTheme::Peak => "Heaviest planned week. Keep rest honest.",
        WeekTheme::Deload => "Reduced volume and intensity. Move well and recover.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_is_monotonic_in_exercise_count() {
        let config = GenerationConfig::default();
        let catalog = crate::catalog::StaticCatalog::default();
        let composer = ProgramComposer::new(&catalog, &config);
        let scheme = RepScheme::for_goal(crate::models::Goal::Strength);
        let four = composer.estimate_minutes(4, scheme);
        let five = composer.estimate_minutes(5, scheme);
        assert!(five > four);
        assert_eq!(composer.estimate_minutes(0, scheme), config.warmup_minutes);
    }

    #[test]
    fn theme_sequence_for_four_weeks() {
        let config = GenerationConfig::default();
        let catalog = crate::catalog::StaticCatalog::default();
        let composer = ProgramComposer::new(&catalog, &config);
        let themes: Vec<WeekTheme> = (0..4).map(|w| composer.week_theme(w, 4)).collect();
        assert_eq!(
            themes,
            vec![
                WeekTheme::Foundation,
                WeekTheme::Build,
                WeekTheme::Build,
                WeekTheme::Deload
            ]
        );
    }

    #[test]
    fn short_programs_have_no_deload() {
        let config = GenerationConfig::default();
        let catalog = crate::catalog::StaticCatalog::default();
        let composer = ProgramComposer::new(&catalog, &config);
        let themes: Vec<WeekTheme> = (0..3).map(|w| composer.week_theme(w, 3)).collect();
        assert!(!themes.contains(&WeekTheme::Deload));
    }

    #[test]
    fn long_programs_reach_peak() {
        let config = GenerationConfig::default();
        let catalog = crate::catalog::StaticCatalog::default();
        let composer = ProgramComposer::new(&catalog, &config);
        let themes: Vec<WeekTheme> = (0..8).map(|w| composer.week_theme(w, 8)).collect();
        assert!(themes.contains(&WeekTheme::Peak));
        assert_eq!(themes[7], WeekTheme::Deload);
    }

    #[test]
    fn deload_cuts_volume_and_extends_rest() {
        let config = GenerationConfig::default();
        let catalog = crate::catalog::StaticCatalog::default();
        let composer = ProgramComposer::new(&catalog, &config);
        let base = RepScheme::for_goal(crate::models::Goal::Strength);
        let deload = composer.scheme_for_week(base, WeekTheme::Deload, 3);
        assert!(deload.sets < base.sets);
        assert!(deload.rest_seconds > base.rest_seconds);
        assert_eq!(deload.intensity, IntensityLevel::Light);
    }
}
