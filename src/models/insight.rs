// ABOUTME: Synthesized training insight model with type, scope, and evidence window
// ABOUTME: Insights are ephemeral derivations, recomputed on read and never mutated
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categories of synthesized insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Best set load stopped improving for an exercise.
    Plateau,
    /// Training frequency and perceived difficulty both climbing.
    RecoveryRisk,
    /// Streak milestone worth reinforcing.
    Consistency,
}

/// What an insight is about: one exercise, or the whole training picture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum InsightScope {
    Exercise { exercise_id: Uuid, name: String },
    Overall,
}

/// The span of log history an insight was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A synthesized observation with an optional recommendation.
///
/// Deduplication key is `(insight_type, subject, ISO week of created_at)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub insight_type: InsightType,
    pub subject: InsightScope,
    pub insight_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub evidence_window: EvidenceWindow,
}

impl Insight {
    /// Deduplication key: one insight per type, subject, and ISO week.
    #[must_use]
    pub fn dedup_key(&self) -> (InsightType, InsightScope, i32, u32) {
        let iso = self.created_at.date_naive().iso_week();
        (
            self.insight_type,
            self.subject.clone(),
            iso.year(),
            iso.week(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn dedup_key_uses_iso_week() {
        let insight = Insight {
            insight_type: InsightType::Consistency,
            subject: InsightScope::Overall,
            insight_text: "7-day streak".into(),
            recommendation: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
            evidence_window: EvidenceWindow {
                start: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            },
        };
        // 2025-01-01 falls in ISO week 1 of 2025.
        let (_, _, year, week) = insight.dedup_key();
        assert_eq!(year, insight.created_at.date_naive().iso_week().year());
        assert_eq!(week, 1);
    }
}
