//! Series Aggregator
//!
//! Stateless: recomputes distribution and timeline series from the full
//! alert collection on every call.
//!
//! The timeline is a fixed-count histogram over ordered, non-uniform-width
//! time spans: alerts are sorted by timestamp and split into contiguous,
//! roughly equal-size chunks. It is NOT fixed-width time-window bucketing,
//! and the chart surface depends on it staying this way.

use crate::backend::types::{Alert, ThreatLabel};

/// Tally of alerts by label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Distribution {
    pub attack: usize,
    pub suspicious: usize,
    pub normal: usize,
}

/// One timeline bucket, labeled by its first member's HH:MM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineBucket {
    pub label: String,
    pub attack_count: usize,
    pub suspicious_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertSeries {
    pub distribution: Distribution,
    pub timeline: Vec<TimelineBucket>,
}

/// Aggregate the full alert collection into chartable series
pub fn aggregate(alerts: &[Alert]) -> AlertSeries {
    let mut distribution = Distribution::default();
    for alert in alerts {
        match alert.threat_label {
            ThreatLabel::Attack => distribution.attack += 1,
            ThreatLabel::Suspicious => distribution.suspicious += 1,
            ThreatLabel::Normal => distribution.normal += 1,
        }
    }

    AlertSeries {
        distribution,
        timeline: build_timeline(alerts),
    }
}

fn build_timeline(alerts: &[Alert]) -> Vec<TimelineBucket> {
    let n = alerts.len();
    if n == 0 {
        return vec![];
    }

    let mut sorted: Vec<&Alert> = alerts.iter().collect();
    sorted.sort_by_key(|a| a.timestamp);

    // bucket_count = min(10, ceil(n / 5)); bucket_size = ceil(n / bucket_count).
    // `chunks` never yields an empty chunk, which drops zero-width buckets
    // produced by the rounding.
    let bucket_count = 10.min(n.div_ceil(5));
    let bucket_size = n.div_ceil(bucket_count);

    sorted
        .chunks(bucket_size)
        .map(|chunk| TimelineBucket {
            label: chunk[0].timestamp.format("%H:%M").to_string(),
            attack_count: chunk
                .iter()
                .filter(|a| a.threat_label == ThreatLabel::Attack)
                .count(),
            suspicious_count: chunk
                .iter()
                .filter(|a| a.threat_label == ThreatLabel::Suspicious)
                .count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn alert_at(minute: i64, label: ThreatLabel) -> Alert {
        let base = Utc.with_ymd_and_hms(2026, 8, 29, 9, 0, 0).unwrap();
        Alert {
            log_id: format!("t{}-{}", minute, label),
            source_ip: "10.0.0.1".to_string(),
            threat_label: label,
            threat_score: 0.5,
            action_taken: String::new(),
            timestamp: base + Duration::minutes(minute),
        }
    }

    #[test]
    fn empty_collection_yields_no_buckets() {
        let series = aggregate(&[]);
        assert!(series.timeline.is_empty());
        assert_eq!(series.distribution, Distribution::default());
    }

    #[test]
    fn distribution_tallies_by_label() {
        let mut alerts = Vec::new();
        for i in 0..3 {
            alerts.push(alert_at(i, ThreatLabel::Attack));
        }
        for i in 3..5 {
            alerts.push(alert_at(i, ThreatLabel::Suspicious));
        }
        for i in 5..10 {
            alerts.push(alert_at(i, ThreatLabel::Normal));
        }

        let series = aggregate(&alerts);
        assert_eq!(
            series.distribution,
            Distribution {
                attack: 3,
                suspicious: 2,
                normal: 5
            }
        );
    }

    #[test]
    fn seven_alerts_yield_two_buckets() {
        let alerts: Vec<Alert> = (0..7).map(|i| alert_at(i, ThreatLabel::Attack)).collect();

        let series = aggregate(&alerts);
        assert_eq!(series.timeline.len(), 2);
        // bucket_size = ceil(7/2) = 4
        assert_eq!(series.timeline[0].attack_count, 4);
        assert_eq!(series.timeline[1].attack_count, 3);
    }

    #[test]
    fn bucket_labels_come_from_first_member() {
        let alerts = vec![
            alert_at(30, ThreatLabel::Suspicious),
            alert_at(0, ThreatLabel::Attack),
            alert_at(15, ThreatLabel::Normal),
        ];

        let series = aggregate(&alerts);
        // n=3 -> one bucket; sorted ascending, so the label is 09:00
        assert_eq!(series.timeline.len(), 1);
        assert_eq!(series.timeline[0].label, "09:00");
        assert_eq!(series.timeline[0].attack_count, 1);
        assert_eq!(series.timeline[0].suspicious_count, 1);
    }

    #[test]
    fn rounding_skips_zero_width_buckets() {
        // n=51: bucket_count = 10, bucket_size = 6 -> 8 full chunks + one of
        // 3; the would-be tenth bucket is never emitted
        let alerts: Vec<Alert> = (0..51).map(|i| alert_at(i, ThreatLabel::Normal)).collect();

        let series = aggregate(&alerts);
        assert_eq!(series.timeline.len(), 9);
    }

    #[test]
    fn bucket_count_caps_at_ten() {
        let alerts: Vec<Alert> = (0..200).map(|i| alert_at(i, ThreatLabel::Normal)).collect();

        let series = aggregate(&alerts);
        assert_eq!(series.timeline.len(), 10);
    }
}
