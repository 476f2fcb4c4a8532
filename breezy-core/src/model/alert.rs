use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    #[default]
    Unknown = 0,
    Minor = 1,
    Moderate = 2,
    Severe = 3,
    Extreme = 4,
}

impl AlertSeverity {
    /// Fixed ARGB colour for this severity.
    pub const fn color(self) -> u32 {
        match self {
            Self::Extreme => 0xFFD3_2F2F,
            Self::Severe => 0xFFF5_7C00,
            Self::Moderate => 0xFFFB_C02D,
            Self::Minor => 0xFF1E_88E5,
            Self::Unknown => 0xFF75_7575,
        }
    }

    /// CAP severity words (`Extreme`, `Severe`, ...), case-insensitive.
    pub fn from_cap(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "extreme" => Self::Extreme,
            "severe" => Self::Severe,
            "moderate" => Self::Moderate,
            "minor" => Self::Minor,
            _ => Self::Unknown,
        }
    }

    /// Colour-coded warning levels used by many national services.
    pub fn from_color_word(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "red" => Self::Extreme,
            "orange" => Self::Severe,
            "yellow" => Self::Moderate,
            "blue" | "green" => Self::Minor,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Extreme => "extreme",
            Self::Severe => "severe",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Provider id, or [`synthesize_alert_id`] when the provider has none.
    pub alert_id: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
    pub source: Option<String>,
    pub severity: AlertSeverity,
    /// ARGB. Provider-supplied when available, otherwise the severity colour.
    pub color: u32,
}

impl Alert {
    pub fn new(alert_id: impl Into<String>, severity: AlertSeverity) -> Self {
        Self {
            alert_id: alert_id.into(),
            start_date: None,
            end_date: None,
            headline: None,
            description: None,
            instruction: None,
            source: None,
            severity,
            color: severity.color(),
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date.is_none_or(|s| s <= now) && self.end_date.is_none_or(|e| now < e)
    }
}

/// Id for alerts that arrive without one: event, area and onset joined.
///
/// Two distinct alerts with the same event, area and onset get the same id
/// and will collide downstream.
pub fn synthesize_alert_id(event: &str, area: &str, onset: Option<DateTime<Utc>>) -> String {
    let onset = onset.map(|o| o.timestamp().to_string()).unwrap_or_default();
    format!("{event}{area}{onset}")
}

/// Most severe first, then earliest start.
pub fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.start_date.cmp(&b.start_date))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn severity_color_is_deterministic() {
        for severity in [
            AlertSeverity::Extreme,
            AlertSeverity::Severe,
            AlertSeverity::Moderate,
            AlertSeverity::Minor,
            AlertSeverity::Unknown,
        ] {
            assert_eq!(severity.color(), severity.color());
            assert_eq!(Alert::new("x", severity).color, severity.color());
        }
        assert_ne!(AlertSeverity::Extreme.color(), AlertSeverity::Minor.color());
    }

    #[test]
    fn parses_cap_and_color_words() {
        assert_eq!(AlertSeverity::from_cap("Severe"), AlertSeverity::Severe);
        assert_eq!(AlertSeverity::from_cap("whatever"), AlertSeverity::Unknown);
        assert_eq!(AlertSeverity::from_color_word("Orange"), AlertSeverity::Severe);
    }

    #[test]
    fn synthesized_ids_collide_on_identical_inputs() {
        let onset = Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).single();
        let a = synthesize_alert_id("Wind", "Reykjavik", onset);
        let b = synthesize_alert_id("Wind", "Reykjavik", onset);
        assert_eq!(a, b);
        assert_eq!(a, "WindReykjavik1740808800");
        assert_ne!(a, synthesize_alert_id("Wind", "Akureyri", onset));
    }

    #[test]
    fn sorts_by_severity_then_start() {
        let at = |h| Utc.with_ymd_and_hms(2025, 3, 1, h, 0, 0).single();
        let mut minor = Alert::new("minor", AlertSeverity::Minor);
        minor.start_date = at(1);
        let mut severe_late = Alert::new("severe-late", AlertSeverity::Severe);
        severe_late.start_date = at(9);
        let mut severe_early = Alert::new("severe-early", AlertSeverity::Severe);
        severe_early.start_date = at(3);

        let mut alerts = vec![minor, severe_late, severe_early];
        sort_alerts(&mut alerts);
        let ids: Vec<_> = alerts.iter().map(|a| a.alert_id.as_str()).collect();
        assert_eq!(ids, ["severe-early", "severe-late", "minor"]);
    }
}
