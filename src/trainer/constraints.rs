// ABOUTME: Generation request validation and resolution into a concrete selection policy
// ABOUTME: Maps days/week to a training split and the primary goal to a rep scheme
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::errors::{EngineError, EngineResult};
use crate::models::{FitnessLevel, Goal, IntensityLevel, MuscleGroup, ProgramType};
use serde::{Deserialize, Serialize};

/// Bounds enforced on generation requests.
pub const DAYS_PER_WEEK_RANGE: (u32, u32) = (1, 7);
pub const DURATION_WEEKS_RANGE: (u32, u32) = (1, 16);
pub const SESSION_MINUTES_RANGE: (u32, u32) = (15, 120);

/// One user ask for a program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub program_type: ProgramType,
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    /// Ordered; the first goal is primary and drives the rep scheme.
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Available equipment tags. Empty means bodyweight only.
    #[serde(default)]
    pub equipment: Vec<String>,
    pub days_per_week: u32,
    /// Required iff `program_type` is multi-week.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<u32>,
    pub time_per_session_minutes: u32,
}

/// Training split derived from weekly frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingSplit {
    FullBody,
    PushPullLegs,
    UpperLower,
    BodyPart,
}

impl TrainingSplit {
    /// Split implied by training frequency.
    #[must_use]
    pub const fn for_days_per_week(days: u32) -> Self {
        match days {
            0..=2 => Self::FullBody,
            3 => Self::PushPullLegs,
            4 | 5 => Self::UpperLower,
            _ => Self::BodyPart,
        }
    }

    /// Name used in workout names and rationale text.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::FullBody => "full body",
            Self::PushPullLegs => "push/pull/legs",
            Self::UpperLower => "upper/lower",
            Self::BodyPart => "body-part split",
        }
    }

    /// Targeted muscle groups for the given day slot (0-based).
    ///
    /// Every slot has at least one target; the body-part split cycles and
    /// ends the week on a core/recovery emphasis day.
    #[must_use]
    pub fn day_targets(self, day_index: u32) -> Vec<MuscleGroup> {
        use MuscleGroup::{
            Back, Biceps, Calves, Chest, Core, Glutes, Hamstrings, Quads, Shoulders, Triceps,
        };
        match self {
            Self::FullBody => vec![Chest, Back, Quads, Shoulders, Core],
            Self::PushPullLegs => match day_index % 3 {
                0 => vec![Chest, Shoulders, Triceps],
                1 => vec![Back, Biceps],
                _ => vec![Quads, Hamstrings, Glutes],
            },
            Self::UpperLower => {
                if day_index % 2 == 0 {
                    vec![Chest, Back, Shoulders]
                } else {
                    vec![Quads, Hamstrings, Glutes, Core]
                }
            }
            Self::BodyPart => match day_index % 7 {
                0 => vec![Chest, Triceps],
                1 => vec![Back, Biceps],
                2 => vec![Quads, Glutes],
                3 => vec![Shoulders, Core],
                4 => vec![Hamstrings, Calves],
                5 => vec![Biceps, Triceps],
                _ => vec![Core],
            },
        }
    }
}

/// Baseline set/rep/rest prescription for one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepScheme {
    pub sets: u32,
    pub rep_range: (u32, u32),
    pub rest_seconds: u32,
    pub intensity: IntensityLevel,
}

impl RepScheme {
    /// Scheme for the primary training goal.
    #[must_use]
    pub const fn for_goal(goal: Goal) -> Self {
        match goal {
            Goal::Strength => Self {
                sets: 4,
                rep_range: (3, 6),
                rest_seconds: 150,
                intensity: IntensityLevel::Working,
            },
            Goal::MuscleGain | Goal::Hypertrophy => Self {
                sets: 3,
                rep_range: (8, 12),
                rest_seconds: 90,
                intensity: IntensityLevel::Working,
            },
            Goal::Endurance | Goal::WeightLoss => Self {
                sets: 3,
                rep_range: (12, 20),
                rest_seconds: 45,
                intensity: IntensityLevel::Working,
            },
            Goal::GeneralFitness => Self {
                sets: 3,
                rep_range: (8, 15),
                rest_seconds: 75,
                intensity: IntensityLevel::Working,
            },
        }
    }

    /// Target rep count: the midpoint of the range.
    #[must_use]
    pub const fn target_reps(&self) -> u32 {
        (self.rep_range.0 + self.rep_range.1) / 2
    }
}

/// A validated, concrete exercise-selection policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionPolicy {
    pub program_type: ProgramType,
    pub fitness_level: FitnessLevel,
    pub goals: Vec<Goal>,
    pub equipment: Vec<String>,
    pub days_per_week: u32,
    pub duration_weeks: Option<u32>,
    pub time_per_session_minutes: u32,
    pub split: TrainingSplit,
    pub rep_scheme: RepScheme,
}

impl SelectionPolicy {
    /// Primary goal (first listed).
    #[must_use]
    pub fn primary_goal(&self) -> Goal {
        self.goals.first().copied().unwrap_or(Goal::GeneralFitness)
    }

    /// Targeted muscle groups for the given 0-based day slot.
    #[must_use]
    pub fn day_targets(&self, day_index: u32) -> Vec<MuscleGroup> {
        self.split.day_targets(day_index)
    }
}

/// Validate a generation request and resolve it into a selection policy.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConstraint`] naming the offending field when
/// a range or shape constraint is violated.
pub fn resolve(request: &GenerationRequest) -> EngineResult<SelectionPolicy> {
    let (days_min, days_max) = DAYS_PER_WEEK_RANGE;
    if !(days_min..=days_max).contains(&request.days_per_week) {
        return Err(EngineError::invalid_constraint(format!(
            "days_per_week must be between {days_min} and {days_max}, got {}",
            request.days_per_week
        )));
    }

    let (minutes_min, minutes_max) = SESSION_MINUTES_RANGE;
    if !(minutes_min..=minutes_max).contains(&request.time_per_session_minutes) {
        return Err(EngineError::invalid_constraint(format!(
            "time_per_session_minutes must be between {minutes_min} and {minutes_max}, got {}",
            request.time_per_session_minutes
        )));
    }

    match (request.program_type, request.duration_weeks) {
        (ProgramType::MultiWeek, None) => {
            return Err(EngineError::invalid_constraint(
                "duration_weeks is required for multi-week programs",
            ));
        }
        (ProgramType::Daily, Some(_)) => {
            return Err(EngineError::invalid_constraint(
                "duration_weeks is not accepted for daily programs",
            ));
        }
        (ProgramType::MultiWeek, Some(weeks)) => {
            let (weeks_min, weeks_max) = DURATION_WEEKS_RANGE;
            if !(weeks_min..=weeks_max).contains(&weeks) {
                return Err(EngineError::invalid_constraint(format!(
                    "duration_weeks must be between {weeks_min} and {weeks_max}, got {weeks}"
                )));
            }
        }
        (ProgramType::Daily, None) => {}
    }

    let goals = if request.goals.is_empty() {
        vec![Goal::GeneralFitness]
    } else {
        request.goals.clone()
    };
    let primary = goals[0];

    Ok(SelectionPolicy {
        program_type: request.program_type,
        fitness_level: request.fitness_level,
        goals,
        equipment: request.equipment.clone(),
        days_per_week: request.days_per_week,
        duration_weeks: request.duration_weeks,
        time_per_session_minutes: request.time_per_session_minutes,
        split: TrainingSplit::for_days_per_week(request.days_per_week),
        rep_scheme: RepScheme::for_goal(primary),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            program_type: ProgramType::MultiWeek,
            fitness_level: FitnessLevel::Beginner,
            goals: vec![Goal::Strength],
            equipment: vec!["barbell".into()],
            days_per_week: 3,
            duration_weeks: Some(4),
            time_per_session_minutes: 60,
        }
    }

    #[test]
    fn three_days_resolves_to_push_pull_legs() {
        let policy = resolve(&request()).unwrap();
        assert_eq!(policy.split, TrainingSplit::PushPullLegs);
        assert_eq!(policy.rep_scheme.rep_range, (3, 6));
    }

    #[test]
    fn split_selection_by_frequency() {
        assert_eq!(TrainingSplit::for_days_per_week(1), TrainingSplit::FullBody);
        assert_eq!(TrainingSplit::for_days_per_week(2), TrainingSplit::FullBody);
        assert_eq!(
            TrainingSplit::for_days_per_week(4),
            TrainingSplit::UpperLower
        );
        assert_eq!(TrainingSplit::for_days_per_week(6), TrainingSplit::BodyPart);
    }

    #[test]
    fn duration_weeks_required_for_multi_week() {
        let mut request = request();
        request.duration_weeks = None;
        let error = resolve(&request).unwrap_err();
        assert!(error.to_string().contains("duration_weeks"));
    }

    #[test]
    fn duration_weeks_rejected_for_daily() {
        let mut request = request();
        request.program_type = ProgramType::Daily;
        assert!(resolve(&request).is_err());
        request.duration_weeks = None;
        assert!(resolve(&request).is_ok());
    }

    #[test]
    fn out_of_range_days_rejected() {
        let mut request = request();
        request.days_per_week = 9;
        let error = resolve(&request).unwrap_err();
        assert!(error.to_string().contains("days_per_week"));
    }

    #[test]
    fn out_of_range_session_minutes_rejected() {
        let mut request = request();
        request.time_per_session_minutes = 10;
        assert!(resolve(&request).is_err());
        request.time_per_session_minutes = 121;
        assert!(resolve(&request).is_err());
    }

    #[test]
    fn empty_goals_default_to_general_fitness() {
        let mut request = request();
        request.goals.clear();
        let policy = resolve(&request).unwrap();
        assert_eq!(policy.primary_goal(), Goal::GeneralFitness);
    }

    #[test]
    fn every_split_slot_has_targets() {
        for days in 1..=7 {
            let split = TrainingSplit::for_days_per_week(days);
            for day in 0..days {
                assert!(!split.day_targets(day).is_empty());
            }
        }
    }
}
