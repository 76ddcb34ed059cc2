//! Text rendering
//!
//! Pure functions from component output to printable text. The command loop
//! never formats anything itself, so every view stays testable.

use crate::backend::types::{Alert, StatsSummary};
use crate::monitor::filter::{FilteredView, ViewReason};
use crate::monitor::series::AlertSeries;

const BAR_WIDTH: usize = 30;

pub fn render_stats(stats: &StatsSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Health score : {}%\n", stats.health_score));
    out.push_str(&format!("  Attacks      : {}\n", stats.attacks));
    out.push_str(&format!("  Suspicious   : {}\n", stats.suspicious));
    out.push_str(&format!("  Normal       : {}\n", stats.normal));
    out.push_str(&format!("  IPs blocked  : {}\n", stats.blocked));
    if let Some(total) = stats.total_alerts {
        out.push_str(&format!("  Total alerts : {}\n", total));
    }
    out
}

pub fn render_alert_row(alert: &Alert) -> String {
    format!(
        "  {}  {:<10}  {:.2}  {:<15}  {}",
        alert.timestamp.format("%H:%M:%S"),
        alert.threat_label.as_str(),
        alert.threat_score,
        alert.source_ip,
        alert.action_taken
    )
}

pub fn render_feed<'a>(alerts: impl Iterator<Item = &'a Alert>) -> String {
    let rows: Vec<String> = alerts.map(|a| render_alert_row(a)).collect();
    if rows.is_empty() {
        return "  (no alerts yet - waiting for the next poll)\n".to_string();
    }
    let mut out = rows.join("\n");
    out.push('\n');
    out
}

pub fn render_view(view: &FilteredView) -> String {
    match view.reason {
        ViewReason::NothingToAnalyze => {
            "  No detection results yet. Submit logs and use `run` first.\n".to_string()
        }
        ViewReason::NoMatches => {
            "  Current filters exclude every analyzed event.\n".to_string()
        }
        ViewReason::Matches => {
            let mut out = format!("  {} matching event(s):\n", view.match_count);
            for alert in &view.alerts {
                out.push_str(&render_alert_row(alert));
                out.push('\n');
            }
            out
        }
    }
}

pub fn render_series(series: &AlertSeries) -> String {
    let d = &series.distribution;
    let mut out = format!(
        "  Distribution: {} attack / {} suspicious / {} normal\n",
        d.attack, d.suspicious, d.normal
    );

    if series.timeline.is_empty() {
        out.push_str("  (no alerts to chart)\n");
        return out;
    }

    // One '#' per attack and '+' per suspicious, scaled to fit BAR_WIDTH
    let max = series
        .timeline
        .iter()
        .map(|b| b.attack_count + b.suspicious_count)
        .max()
        .unwrap_or(1)
        .max(1);
    let scale = |count: usize| count * BAR_WIDTH / max;

    out.push_str("  Timeline (# attack, + suspicious):\n");
    for bucket in &series.timeline {
        out.push_str(&format!(
            "  {:>5} |{}{}\n",
            bucket.label,
            "#".repeat(scale(bucket.attack_count)),
            "+".repeat(scale(bucket.suspicious_count)),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::ThreatLabel;
    use crate::monitor::series::aggregate;
    use chrono::{TimeZone, Utc};

    fn alert(id: &str, label: ThreatLabel) -> Alert {
        Alert {
            log_id: id.to_string(),
            source_ip: "10.0.0.1".to_string(),
            threat_label: label,
            threat_score: 0.87,
            action_taken: "IP Blocked".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 8, 29, 14, 30, 5).unwrap(),
        }
    }

    #[test]
    fn stats_render_all_counters() {
        let rendered = render_stats(&StatsSummary {
            blocked: 4,
            suspicious: 2,
            normal: 10,
            attacks: 3,
            health_score: 79,
            total_alerts: Some(15),
        });

        assert!(rendered.contains("79%"));
        assert!(rendered.contains("Total alerts : 15"));
    }

    #[test]
    fn alert_row_shows_time_label_and_action() {
        let row = render_alert_row(&alert("a1", ThreatLabel::Attack));
        assert!(row.contains("14:30:05"));
        assert!(row.contains("Attack"));
        assert!(row.contains("IP Blocked"));
    }

    #[test]
    fn empty_feed_has_placeholder() {
        let rendered = render_feed(std::iter::empty());
        assert!(rendered.contains("no alerts yet"));
    }

    #[test]
    fn view_reasons_render_distinct_guidance() {
        let nothing = FilteredView {
            alerts: vec![],
            match_count: 0,
            reason: ViewReason::NothingToAnalyze,
        };
        let excluded = FilteredView {
            alerts: vec![],
            match_count: 0,
            reason: ViewReason::NoMatches,
        };

        assert!(render_view(&nothing).contains("No detection results yet"));
        assert!(render_view(&excluded).contains("exclude every analyzed event"));
    }

    #[test]
    fn series_render_bars_per_bucket() {
        let alerts = vec![alert("a1", ThreatLabel::Attack), alert("a2", ThreatLabel::Suspicious)];
        let rendered = render_series(&aggregate(&alerts));

        assert!(rendered.contains("1 attack / 1 suspicious / 0 normal"));
        assert!(rendered.contains("14:30 |"));
    }
}
