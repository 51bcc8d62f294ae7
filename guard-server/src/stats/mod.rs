//! Statistics Aggregation
//!
//! Read-only rollup over a trailing window of the attempt log. Pure: the
//! handler fetches the window, this module only counts.

use std::collections::HashSet;

use serde::Serialize;

use crate::db::models::AttemptRecord;

/// How many recent violations to surface alongside the counters
const RECENT_VIOLATION_LIMIT: usize = 10;

/// Trailing-window access statistics
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub window_days: u32,
    pub total_attempts: u64,
    pub valid_attempts: u64,
    pub invalid_attempts: u64,
    pub unique_actors: u64,
    /// Rounded mean of verdict distances across the window (0 when empty)
    pub average_distance_meters: i64,
    /// Up to 10 most recent invalid records
    pub recent_violations: Vec<AttemptRecord>,
}

/// Aggregate a window of attempt records (expected newest first)
pub fn aggregate(records: &[AttemptRecord], window_days: u32) -> Stats {
    let total = records.len() as u64;
    let valid = records.iter().filter(|r| r.verdict.is_valid).count() as u64;

    let unique: HashSet<&str> = records.iter().map(|r| r.actor_id.as_str()).collect();

    // f64 accumulation: the defensive i64::MAX sentinel must not overflow a sum
    let average = if records.is_empty() {
        0
    } else {
        let sum: f64 = records
            .iter()
            .map(|r| r.verdict.distance_meters as f64)
            .sum();
        (sum / records.len() as f64).round() as i64
    };

    let mut violations: Vec<AttemptRecord> = records
        .iter()
        .filter(|r| !r.verdict.is_valid)
        .cloned()
        .collect();
    violations.sort_by_key(|r| std::cmp::Reverse(r.captured_at));
    violations.truncate(RECENT_VIOLATION_LIMIT);

    Stats {
        window_days,
        total_attempts: total,
        valid_attempts: valid,
        invalid_attempts: total - valid,
        unique_actors: unique.len() as u64,
        average_distance_meters: average,
        recent_violations: violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{AttemptStatus, LocationSample, Verdict};

    fn record(actor: &str, valid: bool, distance: i64, captured_at: i64) -> AttemptRecord {
        AttemptRecord {
            id: None,
            actor_id: actor.to_string(),
            actor_name: actor.to_string(),
            actor_role: "operator".into(),
            sample: LocationSample {
                latitude: 27.0,
                longitude: 85.0,
                accuracy_meters: 10.0,
                captured_at,
                speed: None,
                heading: None,
            },
            verdict: Verdict {
                is_valid: valid,
                distance_meters: distance,
                nearest_zone_id: Some(1),
                allowed_radius: 500,
                is_accurate: true,
                considered_zone_count: 1,
            },
            captured_at,
            status: if valid {
                AttemptStatus::Approved
            } else {
                AttemptStatus::Denied
            },
        }
    }

    #[test]
    fn empty_window_yields_zeros() {
        // Scenario E
        let stats = aggregate(&[], 30);
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.valid_attempts, 0);
        assert_eq!(stats.invalid_attempts, 0);
        assert_eq!(stats.unique_actors, 0);
        assert_eq!(stats.average_distance_meters, 0);
        assert!(stats.recent_violations.is_empty());
    }

    #[test]
    fn mixed_window_counts_and_average() {
        let records = vec![
            record("a", true, 0, 3_000),
            record("a", false, 2_000, 2_000),
            record("b", true, 100, 1_000),
        ];
        let stats = aggregate(&records, 7);
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.valid_attempts, 2);
        assert_eq!(stats.invalid_attempts, 1);
        assert_eq!(stats.unique_actors, 2);
        assert_eq!(stats.average_distance_meters, 700);
        assert_eq!(stats.recent_violations.len(), 1);
        assert_eq!(stats.recent_violations[0].actor_id, "a");
    }

    #[test]
    fn recent_violations_capped_at_ten_newest() {
        let records: Vec<_> = (0..15)
            .map(|i| record("a", false, 1_000, i as i64))
            .collect();
        let stats = aggregate(&records, 30);
        assert_eq!(stats.recent_violations.len(), 10);
        assert_eq!(stats.recent_violations[0].captured_at, 14);
        assert_eq!(stats.recent_violations[9].captured_at, 5);
    }

    #[test]
    fn sentinel_distance_does_not_overflow() {
        let records = vec![record("a", false, i64::MAX, 0), record("b", true, 0, 1)];
        let stats = aggregate(&records, 1);
        assert!(stats.average_distance_meters > 0);
    }
}
