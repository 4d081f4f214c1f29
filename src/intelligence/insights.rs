// ABOUTME: Insight synthesis: plateau, recovery-risk, and consistency detection over recent logs
// ABOUTME: Output is ranked, deduplicated per (type, subject, ISO week), and recomputed on read
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::streaks::StreakSummary;
use crate::config::InsightConfig;
use crate::models::{
    EvidenceWindow, Insight, InsightScope, InsightType, WorkoutLog,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Synthesize insights from the trailing log window.
///
/// `logs` must already be restricted to the configured window and sorted by
/// date ascending. `exercise_names` resolves ids for insight text; unknown
/// ids fall back to a generic label.
#[must_use]
pub fn synthesize_insights(
    logs: &[WorkoutLog],
    streak: &StreakSummary,
    exercise_names: &HashMap<Uuid, String>,
    today: NaiveDate,
    now: DateTime<Utc>,
    config: &InsightConfig,
) -> Vec<Insight> {
    let window = EvidenceWindow {
        start: today - Days::new(7 * u64::from(config.window_weeks)),
        end: today,
    };

    let mut insights = Vec::new();
    insights.extend(detect_plateaus(logs, exercise_names, window, now, config));
    insights.extend(detect_recovery_risk(logs, window, today, now, config));
    insights.extend(detect_consistency(streak, window, now, config));

    // One insight per (type, subject, ISO week), most actionable first.
    let mut seen = HashSet::new();
    insights.retain(|insight| seen.insert(insight.dedup_key()));
    insights.sort_by_key(rank);
    insights
}

/// Ranking: recovery warnings outrank plateaus, plateaus outrank praise;
/// ties break on subject for a stable order.
fn rank(insight: &Insight) -> (u8, String) {
    let priority = match insight.insight_type {
        InsightType::RecoveryRisk => 0,
        InsightType::Plateau => 1,
        InsightType::Consistency => 2,
    };
    let subject = match &insight.subject {
        InsightScope::Exercise { name, .. } => name.clone(),
        InsightScope::Overall => String::new(),
    };
    (priority, subject)
}

/// Per-exercise plateau detection: the best single-set load in the most
/// recent third of the window must beat the earliest third, or the exercise
/// is flagged.
fn detect_plateaus(
    logs: &[WorkoutLog],
    exercise_names: &HashMap<Uuid, String>,
    window: EvidenceWindow,
    now: DateTime<Utc>,
    config: &InsightConfig,
) -> Vec<Insight> {
    let mut by_exercise: HashMap<Uuid, Vec<&WorkoutLog>> = HashMap::new();
    for log in logs {
        by_exercise.entry(log.exercise_id).or_default().push(log);
    }

    let mut exercise_ids: Vec<Uuid> = by_exercise.keys().copied().collect();
    exercise_ids.sort_unstable();

    let mut insights = Vec::new();
    for exercise_id in exercise_ids {
        let entries = &by_exercise[&exercise_id];
        if entries.len() < config.min_logs_per_exercise {
            continue;
        }
        let third = (entries.len() / 3).max(1);
        let earliest_best = best_load(&entries[..third]);
        let recent_best = best_load(&entries[entries.len() - third..]);
        let (Some(earliest_best), Some(recent_best)) = (earliest_best, recent_best) else {
            continue;
        };
        if recent_best > earliest_best {
            continue;
        }

        let name = exercise_names
            .get(&exercise_id)
            .cloned()
            .unwrap_or_else(|| "this exercise".to_owned());
        insights.push(Insight {
            insight_type: InsightType::Plateau,
            insight_text: format!(
                "Your best {name} set hasn't improved over the last {} weeks.",
                config.window_weeks
            ),
            recommendation: Some(
                "Change the stimulus: add a small amount of weight, an extra rep, \
                 or swap in a close variation for a few weeks."
                    .to_owned(),
            ),
            subject: InsightScope::Exercise {
                exercise_id,
                name,
            },
            created_at: now,
            evidence_window: window,
        });
    }
    insights
}

fn best_load(entries: &[&WorkoutLog]) -> Option<f64> {
    entries
        .iter()
        .filter_map(|log| log.best_set_load())
        .fold(None, |best, load| match best {
            Some(current) if current >= load => Some(current),
            _ => Some(load),
        })
}

/// Overtraining signal: the trailing two-week session rate well above the
/// window average, while perceived difficulty climbs.
fn detect_recovery_risk(
    logs: &[WorkoutLog],
    window: EvidenceWindow,
    today: NaiveDate,
    now: DateTime<Utc>,
    config: &InsightConfig,
) -> Vec<Insight> {
    if logs.is_empty() || config.window_weeks == 0 {
        return Vec::new();
    }

    let recent_start = today - Days::new(7 * u64::from(config.overtraining_window_weeks));
    let recent_count = logs.iter().filter(|log| log.day() >= recent_start).count();
    let recent_rate = recent_count as f64 / f64::from(config.overtraining_window_weeks);
    let average_rate = logs.len() as f64 / f64::from(config.window_weeks);

    if recent_rate <= average_rate * config.overtraining_factor {
        return Vec::new();
    }

    // Difficulty must be trending upward too; frequency alone can just be
    // enthusiasm.
    let ratings: Vec<f64> = logs
        .iter()
        .filter_map(|log| log.difficulty_rating.map(f64::from))
        .collect();
    if ratings.len() < 2 {
        return Vec::new();
    }
    let third = (ratings.len() / 3).max(1);
    let earliest_mean: f64 = ratings[..third].iter().sum::<f64>() / third as f64;
    let recent_mean: f64 = ratings[ratings.len() - third..].iter().sum::<f64>() / third as f64;
    if recent_mean <= earliest_mean {
        return Vec::new();
    }

    vec![Insight {
        insight_type: InsightType::RecoveryRisk,
        subject: InsightScope::Overall,
        insight_text: format!(
            "You've logged {recent_count} sessions in the last {} weeks, well above \
             your {average_rate:.1}/week average, and your sessions keep feeling harder.",
            config.overtraining_window_weeks
        ),
        recommendation: Some(
            "Schedule a full rest day before your next session, or drop volume \
             for a few days."
                .to_owned(),
        ),
        created_at: now,
        evidence_window: window,
    }]
}

/// Praise a streak once it clears the configured threshold.
fn detect_consistency(
    streak: &StreakSummary,
    window: EvidenceWindow,
    now: DateTime<Utc>,
    config: &InsightConfig,
) -> Vec<Insight> {
    if streak.current_streak < config.consistency_streak_days {
        return Vec::new();
    }
    vec![Insight {
        insight_type: InsightType::Consistency,
        subject: InsightScope::Overall,
        insight_text: format!(
            "You're on a {}-day training streak. Consistency is what moves the needle.",
            streak.current_streak
        ),
        recommendation: Some(
            "Keep the rhythm, and lean on progressive overload: gradually \
             increase weight or reps."
                .to_owned(),
        ),
        created_at: now,
        evidence_window: window,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::streaks::StreakStatus;
    use chrono::TimeZone;

    fn day(offset_from_start: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 7).unwrap() + Days::new(offset_from_start)
    }

    fn log(exercise_id: Uuid, date: NaiveDate, weight: f64, difficulty: u8) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            exercise_id,
            date: Utc
                .from_utc_datetime(&date.and_hms_opt(18, 0, 0).unwrap()),
            sets_completed: 3,
            reps: vec![10, 10, 10],
            weight_kg: Some(vec![weight, weight, weight]),
            duration_seconds: None,
            distance_km: None,
            difficulty_rating: Some(difficulty),
            notes: None,
        }
    }

    fn no_streak() -> StreakSummary {
        StreakSummary {
            current_streak: 0,
            longest_streak: 0,
            last_workout_date: None,
            streak_status: StreakStatus::None,
        }
    }

    #[test]
    fn stalled_best_load_is_a_plateau() {
        let exercise_id = Uuid::new_v4();
        let logs: Vec<WorkoutLog> = (0..6)
            .map(|i| log(exercise_id, day(i * 7), 60.0, 6))
            .collect();
        let mut names = HashMap::new();
        names.insert(exercise_id, "Bench Press".to_owned());

        let insights = synthesize_insights(
            &logs,
            &no_streak(),
            &names,
            day(42),
            Utc::now(),
            &InsightConfig::default(),
        );
        assert!(insights
            .iter()
            .any(|i| i.insight_type == InsightType::Plateau));
        assert!(insights[0].insight_text.contains("Bench Press"));
    }

    #[test]
    fn improving_load_is_not_a_plateau() {
        let exercise_id = Uuid::new_v4();
        let logs: Vec<WorkoutLog> = (0..6)
            .map(|i| log(exercise_id, day(i * 7), 60.0 + i as f64 * 2.5, 6))
            .collect();

        let insights = synthesize_insights(
            &logs,
            &no_streak(),
            &HashMap::new(),
            day(42),
            Utc::now(),
            &InsightConfig::default(),
        );
        assert!(!insights
            .iter()
            .any(|i| i.insight_type == InsightType::Plateau));
    }

    #[test]
    fn frequency_spike_with_rising_difficulty_flags_recovery() {
        let exercise_id = Uuid::new_v4();
        // Sparse early weeks, then a dense hard fortnight.
        let mut logs: Vec<WorkoutLog> = (0..4)
            .map(|i| log(exercise_id, day(i * 7), 60.0, 5))
            .collect();
        for i in 0..10 {
            logs.push(log(exercise_id, day(42 + i), 60.0, 9));
        }

        let insights = synthesize_insights(
            &logs,
            &no_streak(),
            &HashMap::new(),
            day(55),
            Utc::now(),
            &InsightConfig::default(),
        );
        assert!(insights
            .iter()
            .any(|i| i.insight_type == InsightType::RecoveryRisk));
        // Recovery warnings outrank everything else.
        assert_eq!(insights[0].insight_type, InsightType::RecoveryRisk);
    }

    #[test]
    fn streak_earns_consistency_praise() {
        let streak = StreakSummary {
            current_streak: 8,
            longest_streak: 8,
            last_workout_date: Some(day(55)),
            streak_status: StreakStatus::Active,
        };
        let insights = synthesize_insights(
            &[],
            &streak,
            &HashMap::new(),
            day(55),
            Utc::now(),
            &InsightConfig::default(),
        );
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].insight_type, InsightType::Consistency);
        assert!(insights[0].insight_text.contains("8-day"));
    }

    #[test]
    fn duplicate_detections_collapse() {
        let streak = StreakSummary {
            current_streak: 10,
            longest_streak: 10,
            last_workout_date: Some(day(55)),
            streak_status: StreakStatus::Active,
        };
        let now = Utc::now();
        let config = InsightConfig::default();
        let first = synthesize_insights(&[], &streak, &HashMap::new(), day(55), now, &config);
        let mut doubled = first.clone();
        doubled.extend(first.clone());
        let mut seen = HashSet::new();
        doubled.retain(|insight| seen.insert(insight.dedup_key()));
        assert_eq!(doubled.len(), first.len());
    }
}
