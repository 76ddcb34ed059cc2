//! Canonical wire types
//!
//! One schema per logical record. The historical backend spells some fields
//! several ways (`source_ip`, `Source IP`, `Src IP`) and may answer `/detect`
//! with a bare array of analyzed events; the serde aliases and
//! [`DetectRunWire`] decoder below absorb that so no call site has to.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// THREAT CLASSIFICATION
// ============================================================================

/// Threat classification assigned by the backend's model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatLabel {
    Attack,
    Suspicious,
    Normal,
}

impl ThreatLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLabel::Attack => "Attack",
            ThreatLabel::Suspicious => "Suspicious",
            ThreatLabel::Normal => "Normal",
        }
    }
}

impl std::fmt::Display for ThreatLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ALERT
// ============================================================================

/// One flagged log record, created by the backend during a detection run.
/// Immutable; identified by `log_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(alias = "logId")]
    pub log_id: String,

    #[serde(alias = "sourceIp", alias = "Source IP", alias = "Src IP")]
    pub source_ip: String,

    pub threat_label: ThreatLabel,

    /// Model score in [0, 1]
    pub threat_score: f64,

    #[serde(default)]
    pub action_taken: String,

    #[serde(deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Parse a backend timestamp. Accepts RFC 3339 and the backend's naive
/// ISO forms; naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }
    Err(format!("unrecognized timestamp: {}", raw))
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

// ============================================================================
// LOG RECORD
// ============================================================================

/// One traffic log record as submitted by the console. Stored logs imported
/// from other sources may miss fields; numeric fields default to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(alias = "sourceIp", alias = "Source IP", alias = "Src IP")]
    pub source_ip: String,
    #[serde(default)]
    pub bytes_sent: u64,
    #[serde(default)]
    pub bytes_received: u64,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub packet_count: u64,
}

// ============================================================================
// DETECTION RUN RESULT
// ============================================================================

/// Output of one detection run. Replaces the previous run's result wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRunResult {
    pub analyzed_events: Vec<Alert>,
    pub analyzed_count: usize,
    pub total_logs: usize,
    pub cancelled: bool,
}

/// Wire shape of a `/detect` response: either the full result object or a
/// bare array of analyzed events (older backends).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DetectRunWire {
    Result(DetectionRunResult),
    Events(Vec<Alert>),
}

impl From<DetectRunWire> for DetectionRunResult {
    fn from(wire: DetectRunWire) -> Self {
        match wire {
            DetectRunWire::Result(result) => result,
            DetectRunWire::Events(events) => {
                let n = events.len();
                DetectionRunResult {
                    analyzed_events: events,
                    analyzed_count: n,
                    total_logs: n,
                    cancelled: false,
                }
            }
        }
    }
}

// ============================================================================
// AGGREGATE STATS
// ============================================================================

/// Backend-computed dashboard counters. `health_score` is displayed, never
/// recomputed client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub blocked: u64,
    pub suspicious: u64,
    pub normal: u64,
    pub attacks: u64,
    pub health_score: u64,
    #[serde(default)]
    pub total_alerts: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_deserializes_canonical_fields() {
        let raw = r#"{
            "log_id": "a1",
            "source_ip": "10.0.0.9",
            "threat_label": "Attack",
            "threat_score": 0.93,
            "action_taken": "IP Blocked",
            "timestamp": "2026-08-29T10:15:00Z"
        }"#;

        let alert: Alert = serde_json::from_str(raw).unwrap();
        assert_eq!(alert.log_id, "a1");
        assert_eq!(alert.threat_label, ThreatLabel::Attack);
        assert_eq!(alert.timestamp.to_rfc3339(), "2026-08-29T10:15:00+00:00");
    }

    #[test]
    fn alert_accepts_legacy_source_ip_alias() {
        let raw = r#"{
            "log_id": "a2",
            "Src IP": "192.168.1.4",
            "threat_label": "Normal",
            "threat_score": 0.05,
            "timestamp": "2026-08-29 10:15:00"
        }"#;

        let alert: Alert = serde_json::from_str(raw).unwrap();
        assert_eq!(alert.source_ip, "192.168.1.4");
        assert_eq!(alert.action_taken, "");
    }

    #[test]
    fn naive_timestamps_are_taken_as_utc() {
        let parsed = parse_timestamp("2026-08-29T10:15:30").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-08-29T10:15:30+00:00");

        assert!(parse_timestamp("not-a-date").is_err());
    }

    #[test]
    fn bare_array_detect_response_normalizes() {
        let raw = r#"[
            {"log_id": "e1", "source_ip": "1.2.3.4", "threat_label": "Suspicious",
             "threat_score": 0.5, "timestamp": "2026-08-29T09:00:00Z"}
        ]"#;

        let wire: DetectRunWire = serde_json::from_str(raw).unwrap();
        let result = DetectionRunResult::from(wire);
        assert_eq!(result.analyzed_count, 1);
        assert_eq!(result.total_logs, 1);
        assert!(!result.cancelled);
    }

    #[test]
    fn result_object_detect_response_passes_through() {
        let raw = r#"{
            "analyzed_events": [],
            "analyzed_count": 40,
            "total_logs": 100,
            "cancelled": true
        }"#;

        let wire: DetectRunWire = serde_json::from_str(raw).unwrap();
        let result = DetectionRunResult::from(wire);
        assert_eq!(result.analyzed_count, 40);
        assert_eq!(result.total_logs, 100);
        assert!(result.cancelled);
    }

    #[test]
    fn stats_tolerate_missing_total_alerts() {
        let raw = r#"{"blocked": 1, "suspicious": 2, "normal": 3, "attacks": 1, "health_score": 88}"#;
        let stats: StatsSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.health_score, 88);
        assert_eq!(stats.total_alerts, None);
    }
}
