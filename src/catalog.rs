// ABOUTME: Read-only exercise catalog abstraction and in-memory implementation
// ABOUTME: The engine queries the catalog by muscle group, difficulty, and equipment; it never owns exercise data
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Exercise catalog access.
//!
//! The catalog is a collaborator: CRUD, search, and media live elsewhere. The
//! engine needs lookup by id and filtered listing, nothing more.

use crate::models::{Exercise, ExerciseCategory, FitnessLevel, MuscleGroup};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Filter for catalog queries. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    pub category: Option<ExerciseCategory>,
    pub difficulty: Option<FitnessLevel>,
    pub muscle_group: Option<MuscleGroup>,
    /// When set, only exercises performable with these equipment tags pass.
    /// Exercises that need no equipment always pass.
    pub equipment: Option<Vec<String>>,
}

impl ExerciseFilter {
    /// Filter by difficulty.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: FitnessLevel) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Filter by targeted muscle group.
    #[must_use]
    pub const fn with_muscle_group(mut self, group: MuscleGroup) -> Self {
        self.muscle_group = Some(group);
        self
    }

    /// Filter by available equipment tags.
    #[must_use]
    pub fn with_equipment(mut self, equipment: Vec<String>) -> Self {
        self.equipment = Some(equipment);
        self
    }

    /// Whether an exercise passes this filter.
    #[must_use]
    pub fn matches(&self, exercise: &Exercise) -> bool {
        if let Some(category) = self.category {
            if exercise.category != category {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if exercise.difficulty != difficulty {
                return false;
            }
        }
        if let Some(group) = self.muscle_group {
            if !exercise.targets(group) {
                return false;
            }
        }
        if let Some(equipment) = &self.equipment {
            if !exercise.performable_with(equipment) {
                return false;
            }
        }
        true
    }
}

/// Read-only catalog lookup used by the composer.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch one exercise by id.
    async fn get_exercise(&self, id: Uuid) -> Result<Option<Exercise>>;

    /// List exercises matching the filter, in stable (name, id) order.
    async fn find_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>>;
}

/// In-memory catalog, used by tests and the demo seeding path.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    exercises: Vec<Exercise>,
}

impl StaticCatalog {
    /// Build a catalog from a fixed exercise list.
    #[must_use]
    pub fn new(mut exercises: Vec<Exercise>) -> Self {
        exercises.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Self { exercises }
    }

    /// Number of exercises in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn get_exercise(&self, id: Uuid) -> Result<Option<Exercise>> {
        Ok(self.exercises.iter().find(|e| e.id == id).cloned())
    }

    async fn find_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        Ok(self
            .exercises
            .iter()
            .filter(|exercise| filter.matches(exercise))
            .cloned()
            .collect())
    }
}

/// Starter catalog used by `seed-demo-data` and the test fixtures: a compact
/// spread of strength movements covering every muscle group across free
/// weights, machines, and bodyweight.
#[must_use]
pub fn starter_catalog() -> Vec<Exercise> {
    use ExerciseCategory::Strength;
    use FitnessLevel::{Advanced, Beginner, Intermediate};
    use MuscleGroup::{
        Back, Biceps, Calves, Chest, Core, Glutes, Hamstrings, Quads, Shoulders, Triceps,
    };

    let entries: Vec<(&str, FitnessLevel, Vec<MuscleGroup>, Vec<&str>)> = vec![
        ("Barbell Bench Press", Intermediate, vec![Chest, Triceps], vec!["barbell", "bench"]),
        ("Push-Up", Beginner, vec![Chest, Triceps, Core], vec![]),
        ("Incline Dumbbell Press", Intermediate, vec![Chest, Shoulders], vec!["dumbbell", "bench"]),
        ("Barbell Row", Intermediate, vec![Back, Biceps], vec!["barbell"]),
        ("Pull-Up", Intermediate, vec![Back, Biceps], vec!["pull-up bar"]),
        ("Lat Pulldown", Beginner, vec![Back], vec!["cable machine"]),
        ("Overhead Press", Intermediate, vec![Shoulders, Triceps], vec!["barbell"]),
        ("Lateral Raise", Beginner, vec![Shoulders], vec!["dumbbell"]),
        ("Barbell Curl", Beginner, vec![Biceps], vec!["barbell"]),
        ("Hammer Curl", Beginner, vec![Biceps], vec!["dumbbell"]),
        ("Triceps Dip", Intermediate, vec![Triceps, Chest], vec![]),
        ("Close-Grip Bench Press", Intermediate, vec![Triceps, Chest], vec!["barbell", "bench"]),
        ("Back Squat", Intermediate, vec![Quads, Glutes, Core], vec!["barbell", "squat rack"]),
        ("Goblet Squat", Beginner, vec![Quads, Glutes], vec!["dumbbell"]),
        ("Bodyweight Squat", Beginner, vec![Quads, Glutes], vec![]),
        ("Romanian Deadlift", Intermediate, vec![Hamstrings, Glutes, Back], vec!["barbell"]),
        ("Deadlift", Advanced, vec![Hamstrings, Glutes, Back], vec!["barbell"]),
        ("Leg Curl", Beginner, vec![Hamstrings], vec!["machine"]),
        ("Hip Thrust", Intermediate, vec![Glutes, Hamstrings], vec!["barbell", "bench"]),
        ("Walking Lunge", Beginner, vec![Quads, Glutes, Calves], vec![]),
        ("Standing Calf Raise", Beginner, vec![Calves], vec![]),
        ("Plank", Beginner, vec![Core], vec![]),
        ("Hanging Leg Raise", Intermediate, vec![Core], vec!["pull-up bar"]),
        ("Cable Crunch", Beginner, vec![Core], vec!["cable machine"]),
    ];

    entries
        .into_iter()
        .map(|(name, difficulty, muscle_groups, equipment)| Exercise {
            id: Uuid::new_v4(),
            name: name.into(),
            category: Strength,
            difficulty,
            muscle_groups,
            equipment: equipment.into_iter().map(str::to_owned).collect(),
            instructions: None,
        })
        .collect()
}
