//! Core types for the alert rules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of alerts the built-in rules produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Last 7 entries vs the 7 before
    WeekOverWeek,
    /// One category takes most of the spend
    CategoryDominance,
    /// Weekend days cost more than weekdays
    WeekendSkew,
    /// Single expense far above the rest
    Outlier,
    /// Category used again and again
    Frequency,
    /// Average spend per calendar day
    DailyAverage,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::WeekOverWeek => "week_over_week",
            AlertKind::CategoryDominance => "category_dominance",
            AlertKind::WeekendSkew => "weekend_skew",
            AlertKind::Outlier => "outlier",
            AlertKind::Frequency => "frequency",
            AlertKind::DailyAverage => "daily_average",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week_over_week" => Ok(AlertKind::WeekOverWeek),
            "category_dominance" => Ok(AlertKind::CategoryDominance),
            "weekend_skew" => Ok(AlertKind::WeekendSkew),
            "outlier" => Ok(AlertKind::Outlier),
            "frequency" => Ok(AlertKind::Frequency),
            "daily_average" => Ok(AlertKind::DailyAverage),
            _ => Err(format!("Unknown alert kind: {}", s)),
        }
    }
}

/// How an alert should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }

    /// Marker used by text frontends
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ️",
            Severity::Warning => "⚠️",
            Severity::Success => "✅",
            Severity::Error => "🚨",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "success" => Ok(Severity::Success),
            "error" => Ok(Severity::Error),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// A message produced by one rule for one evaluation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    /// Short title (e.g., "Spending Up")
    pub title: String,
    /// Formatted one-line message
    pub message: String,
    /// Rule-specific number behind the message (percent change, share, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Alert {
    pub fn new(
        kind: AlertKind,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            title: title.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Attach the number the rule measured
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity.icon(), self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [
            AlertKind::WeekOverWeek,
            AlertKind::CategoryDominance,
            AlertKind::WeekendSkew,
            AlertKind::Outlier,
            AlertKind::Frequency,
            AlertKind::DailyAverage,
        ] {
            assert_eq!(kind.as_str().parse::<AlertKind>().unwrap(), kind);
        }
        assert!("nope".parse::<AlertKind>().is_err());
    }

    #[test]
    fn test_severity_serializes_snake_case() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn test_alert_display() {
        let alert = Alert::new(
            AlertKind::Frequency,
            Severity::Info,
            "Frequent Category",
            "Food appears 4 times",
        );
        assert_eq!(alert.to_string(), "ℹ️ Frequent Category: Food appears 4 times");
    }
}
