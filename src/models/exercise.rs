// ABOUTME: Exercise catalog item model with muscle group, equipment, and difficulty taxonomy
// ABOUTME: Catalog entries are immutable from the engine's perspective
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Muscle groups the engine plans around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Core,
}

impl MuscleGroup {
    /// Display name used in workout names and rationale text.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Biceps => "biceps",
            Self::Triceps => "triceps",
            Self::Quads => "quads",
            Self::Hamstrings => "hamstrings",
            Self::Glutes => "glutes",
            Self::Calves => "calves",
            Self::Core => "core",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Broad exercise category from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Strength,
    Cardio,
    Flexibility,
    Sports,
}

/// User fitness level, doubling as exercise difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.write_str(name)
    }
}

/// Training goals a generation request may carry.
///
/// The first listed goal is the primary one and drives the rep scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Strength,
    MuscleGain,
    Hypertrophy,
    Endurance,
    WeightLoss,
    GeneralFitness,
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Strength => "strength",
            Self::MuscleGain => "muscle gain",
            Self::Hypertrophy => "hypertrophy",
            Self::Endurance => "endurance",
            Self::WeightLoss => "weight loss",
            Self::GeneralFitness => "general fitness",
        };
        f.write_str(name)
    }
}

/// One exercise catalog item.
///
/// An empty `equipment` list means the exercise needs no equipment and passes
/// every equipment filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub category: ExerciseCategory,
    pub difficulty: FitnessLevel,
    /// Muscle groups the exercise trains, primary first.
    pub muscle_groups: Vec<MuscleGroup>,
    /// Equipment tags required to perform the exercise.
    pub equipment: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Exercise {
    /// Whether this exercise can be performed with the given equipment tags.
    #[must_use]
    pub fn performable_with(&self, available: &[String]) -> bool {
        self.equipment.is_empty() || self.equipment.iter().any(|tag| available.contains(tag))
    }

    /// Whether this exercise trains the given muscle group.
    #[must_use]
    pub fn targets(&self, group: MuscleGroup) -> bool {
        self.muscle_groups.contains(&group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench_press() -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            name: "Barbell Bench Press".into(),
            category: ExerciseCategory::Strength,
            difficulty: FitnessLevel::Intermediate,
            muscle_groups: vec![MuscleGroup::Chest, MuscleGroup::Triceps],
            equipment: vec!["barbell".into(), "bench".into()],
            instructions: None,
        }
    }

    #[test]
    fn equipment_filter_intersects() {
        let exercise = bench_press();
        assert!(exercise.performable_with(&["barbell".into()]));
        assert!(!exercise.performable_with(&["dumbbell".into()]));
    }

    #[test]
    fn bodyweight_always_passes() {
        let mut exercise = bench_press();
        exercise.equipment.clear();
        assert!(exercise.performable_with(&[]));
        assert!(exercise.performable_with(&["kettlebell".into()]));
    }
}
