// ABOUTME: Workout log model: one completed set-group for one exercise on one date
// ABOUTME: Logs are owned by the logging collaborator; the engine only reads them
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Historical record of a completed set-group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_id: Uuid,
    pub date: DateTime<Utc>,
    pub sets_completed: u32,
    /// Reps per completed set; length equals `sets_completed`.
    pub reps: Vec<u32>,
    /// Weight per completed set in kilograms; length equals `sets_completed`
    /// when present. Absent for bodyweight and cardio work.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<Vec<f64>>,
    /// Cardio session length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// Cardio distance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Perceived difficulty, 1 (trivial) to 10 (maximal).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkoutLog {
    /// Calendar date of the log in UTC.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Total lifted volume for the set-group, reps × weight summed per set.
    /// Missing weight contributes zero.
    #[must_use]
    pub fn volume_kg(&self) -> f64 {
        match &self.weight_kg {
            Some(weights) => self
                .reps
                .iter()
                .zip(weights.iter())
                .map(|(reps, weight)| f64::from(*reps) * weight)
                .sum(),
            None => 0.0,
        }
    }

    /// Best single-set load (weight × reps), used for plateau detection.
    /// `None` when no weight was recorded.
    #[must_use]
    pub fn best_set_load(&self) -> Option<f64> {
        let weights = self.weight_kg.as_ref()?;
        self.reps
            .iter()
            .zip(weights.iter())
            .map(|(reps, weight)| f64::from(*reps) * weight)
            .fold(None, |best, load| match best {
                Some(current) if current >= load => Some(current),
                _ => Some(load),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn log(reps: Vec<u32>, weight_kg: Option<Vec<f64>>) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            exercise_id: Uuid::new_v4(),
            date: Utc.with_ymd_and_hms(2025, 6, 2, 18, 30, 0).unwrap(),
            sets_completed: reps.len() as u32,
            reps,
            weight_kg,
            duration_seconds: None,
            distance_km: None,
            difficulty_rating: Some(6),
            notes: None,
        }
    }

    #[test]
    fn volume_sums_per_set() {
        let log = log(vec![10, 8], Some(vec![50.0, 55.0]));
        assert!((log.volume_kg() - (500.0 + 440.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_weight_is_zero_volume() {
        let log = log(vec![15, 15], None);
        assert!(log.volume_kg().abs() < f64::EPSILON);
        assert!(log.best_set_load().is_none());
    }

    #[test]
    fn best_set_load_picks_heaviest() {
        let log = log(vec![10, 5], Some(vec![40.0, 100.0]));
        assert!((log.best_set_load().unwrap() - 500.0).abs() < f64::EPSILON);
    }
}
