//! Unified notification schema definitions.

use serde::{Deserialize, Serialize};

/// Report subtype carried by a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReportType {
    /// 震度速報 (quick intensity report).
    ScalePrompt,
    /// 震源速報 (epicenter report).
    Destination,
    /// 地震情報 (detailed report). Also the default for unrecognized tags.
    DetailScale,
    /// 遠地地震情報 (distant earthquake report).
    Foreign,
    /// 緊急地震速報 from the Wolfx EEW feed.
    #[serde(rename = "WolfxEEW")]
    WolfxEew,
}

impl ReportType {
    /// Wire tag of this subtype, as used in notification ids.
    pub fn tag(self) -> &'static str {
        match self {
            ReportType::ScalePrompt => "ScalePrompt",
            ReportType::Destination => "Destination",
            ReportType::DetailScale => "DetailScale",
            ReportType::Foreign => "Foreign",
            ReportType::WolfxEew => "WolfxEEW",
        }
    }
}

/// Intensity observation point from the quake feed.
///
/// Passed through to map consumers unmodified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservationPoint {
    /// Prefecture name.
    #[serde(default)]
    pub pref: Option<String>,
    /// City or area name.
    pub addr: String,
    /// Reported intensity scale code.
    #[serde(default)]
    pub scale: Option<i32>,
    /// Whether the point is an area aggregate rather than a single station.
    #[serde(rename = "isArea", default)]
    pub is_area: Option<bool>,
}

/// Source-agnostic fields for downstream map/alerting consumers.
///
/// The first four fields are populated for every source; the rest are
/// source-specific extensions (observation points for quake reports,
/// event/serial data for EEW reports).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredData {
    /// Maximum intensity label (e.g., "5強", "不明").
    pub max_intensity: String,
    /// Magnitude, `None` when absent or non-numeric upstream.
    pub magnitude: Option<f64>,
    /// Hypocenter display name.
    pub hypocenter: String,
    /// Depth in km, `None` when absent or non-numeric upstream.
    pub depth_km: Option<f64>,
    /// Raw observation points (only populated for quake reports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<ObservationPoint>>,
    /// Source event identifier (only populated for EEW reports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Per-event serial number (only populated for EEW reports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<i64>,
    /// Whether this is the final report (only populated for EEW reports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_final: Option<bool>,
    /// Whether the estimate is assumption-based (only populated for EEW reports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_assumption: Option<bool>,
    /// Warned-area display names (only populated for EEW reports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warn_areas: Option<Vec<String>>,
}

/// Unified notification record.
///
/// Value object: created once per adapter invocation, never mutated after
/// return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Stable identifier for this specific report revision.
    pub id: String,
    /// Report subtype.
    pub report_type: ReportType,
    /// Local wall-clock time of the report as `HH:mm`.
    pub report_time: String,
    /// Whether the source canceled this report.
    pub is_canceled: bool,
    /// Single-line digest for list views.
    pub list_summary: String,
    /// Multi-line human-readable report, trimmed of surrounding whitespace.
    /// Always ends with the source attribution line.
    pub full_text: String,
    /// Fields for map/alerting consumers.
    pub structured_data: StructuredData,
}

/// Deserialize a value that could be either a string or a number into a String.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Ok(String::new()),
    }
}

/// Deserialize an optional string-or-number field; empty strings become None.
pub(crate) fn string_or_number_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Deserialize a numeric field leniently: numbers pass through, numeric
/// strings parse, anything else becomes None.
pub(crate) fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
