//! Wolfx EEW feed adapter implementation.
//!
//! Handles parsing and transformation of `jma_eew` messages to the unified
//! notification format. The report body is composed from fixed segments,
//! each conditionally included; a cancellation ends the body early.

use crate::error::Result;
use crate::format;
use crate::schema::{
    number_or_none, string_or_number, string_or_number_opt, Notification, ReportType,
    StructuredData,
};
use crate::traits::FeedAdapter;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// Message type for early warnings on the multiplexed websocket feed.
const EEW_MESSAGE_TYPE: &str = "jma_eew";

/// Attribution line closing every EEW report.
const ATTRIBUTION: &str = "出典：Wolfx EEW API";

/// Title used when the source omits one.
const DEFAULT_TITLE: &str = "緊急地震速報";

/// Wolfx EEW feed adapter.
#[derive(Debug, Default, Clone)]
pub struct WolfxEewAdapter;

impl WolfxEewAdapter {
    /// Create a new Wolfx EEW adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FeedAdapter for WolfxEewAdapter {
    const NAME: &'static str = "wolfx";

    fn parse_and_transform(&self, payload: &str) -> Result<Vec<Notification>> {
        let raw: RawEewItem = serde_json::from_str(payload)?;

        // The websocket multiplexes heartbeats and other frames; only
        // `jma_eew` messages become notifications. Frames without a type
        // are accepted as early warnings.
        match raw.kind.as_deref() {
            Some(EEW_MESSAGE_TYPE) | None => {}
            Some(_) => return Ok(vec![]),
        }

        let formatted_origin = format_origin_time(&raw.origin_time);
        Ok(vec![normalize(&raw, &formatted_origin)])
    }
}

// ============================================================================
// Raw Message Types
// ============================================================================

/// One early-warning message as delivered by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEewItem {
    /// Frame type on the multiplexed feed.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Report title.
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    /// Source event identifier, string or number upstream.
    #[serde(rename = "EventID", default, deserialize_with = "string_or_number")]
    pub event_id: String,
    /// Per-event serial number.
    #[serde(rename = "Serial", default)]
    pub serial: i64,
    /// Whether this is the final report for the event.
    #[serde(rename = "isFinal", default)]
    pub is_final: bool,
    /// Whether this report cancels the event.
    #[serde(rename = "isCancel", default)]
    pub is_cancel: bool,
    /// Whether the estimate comes from the simplified (PLUM) method.
    #[serde(rename = "isAssumption", default)]
    pub is_assumption: bool,
    /// Origin timestamp, `yyyy-MM-dd HH:mm:ss` in JST.
    #[serde(rename = "OriginTime", default)]
    pub origin_time: String,
    /// Hypocenter region name.
    #[serde(rename = "Hypocenter", default)]
    pub hypocenter: Option<String>,
    /// Magnitude. The upstream key spelling is the feed's own.
    #[serde(rename = "Magunitude", default, deserialize_with = "number_or_none")]
    pub magnitude: Option<f64>,
    /// Estimated maximum intensity, free-form string upstream.
    #[serde(
        rename = "MaxIntensity",
        default,
        deserialize_with = "string_or_number_opt"
    )]
    pub max_intensity: Option<String>,
    /// Depth in km.
    #[serde(rename = "Depth", default, deserialize_with = "number_or_none")]
    pub depth: Option<f64>,
    /// Warned areas.
    #[serde(rename = "WarnArea", default)]
    pub warn_areas: Vec<RawWarnArea>,
}

/// Warned area entry. The feed spells the area-name key two ways.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWarnArea {
    #[serde(rename = "Chiiki", default)]
    chiiki: Option<String>,
    #[serde(rename = "chiiki", default)]
    chiiki_lower: Option<String>,
}

impl RawWarnArea {
    /// Display name under either accepted key spelling, first non-null wins.
    pub fn display_name(&self) -> Option<&str> {
        self.chiiki.as_deref().or(self.chiiki_lower.as_deref())
    }
}

// ============================================================================
// Transformation
// ============================================================================

/// Normalize one early-warning message into a unified notification.
///
/// `formatted_origin` is the caller-formatted display form of the origin
/// timestamp; the core treats it as opaque and its trailing `HH:mm`
/// becomes `report_time`.
pub fn normalize(item: &RawEewItem, formatted_origin: &str) -> Notification {
    let title = item
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);
    let serial_text = if item.is_final {
        "最終報".to_string()
    } else {
        format!("第{}報", item.serial)
    };
    let max_intensity = item.max_intensity.as_deref().unwrap_or(format::UNKNOWN);
    let hypocenter = item
        .hypocenter
        .as_deref()
        .filter(|h| !h.is_empty())
        .unwrap_or("震源地不明");
    let magnitude = item.magnitude.filter(|m| *m >= 0.0);
    let magnitude_text = match magnitude {
        Some(m) => m.to_string(),
        None => format::UNKNOWN.to_string(),
    };
    let depth = item.depth.filter(|d| *d >= 0.0);
    let depth_text = format::depth_text(item.depth);
    let warn_names: Vec<&str> = item
        .warn_areas
        .iter()
        .filter_map(|a| a.display_name())
        .collect();

    let mut message = format!("◆{}◆", title);
    message.push_str(&format!("\n#{}", serial_text));

    if item.is_cancel {
        // A cancellation ends the body; no hypocenter or warned-area
        // segments follow.
        message.push_str("\nこの緊急地震速報はキャンセルされました。");
    } else {
        if item.is_assumption {
            message.push_str("\nPLUM法による緊急地震速報");
        }

        message.push_str(&format!("\n\n発生時刻:{}", formatted_origin));
        message.push_str(&format!("\n{} で地震が発生した模様です。", hypocenter));
        message.push_str(&format!(
            "\n推定最大震度は{}で、マグニチュードは{}、震源の深さは{}と推定されます。",
            max_intensity, magnitude_text, depth_text
        ));

        if !warn_names.is_empty() {
            message.push_str(&format!("\n\n【対象地域】\n{}", warn_names.join("、")));
        }
    }

    message.push_str(&format!("\n\n{}", ATTRIBUTION));

    let list_summary = if item.is_cancel {
        "【EEW】取消報".to_string()
    } else {
        format!("【EEW {}】{} {}", serial_text, max_intensity, hypocenter)
    };

    Notification {
        id: format!("{}_{}", item.event_id, item.serial),
        report_type: ReportType::WolfxEew,
        report_time: format::clock_suffix(formatted_origin),
        is_canceled: item.is_cancel,
        list_summary,
        full_text: message.trim().to_string(),
        structured_data: StructuredData {
            max_intensity: max_intensity.to_string(),
            magnitude,
            hypocenter: hypocenter.to_string(),
            depth_km: depth,
            points: None,
            event_id: Some(item.event_id.clone()),
            serial: Some(item.serial),
            is_final: Some(item.is_final),
            is_assumption: Some(item.is_assumption),
            warn_areas: Some(warn_names.iter().map(|n| n.to_string()).collect()),
        },
    }
}

/// Display form of the feed's origin timestamp (`yyyy-MM-dd HH:mm:ss`, JST).
/// Falls back to the raw string when the feed deviates from its documented
/// format.
fn format_origin_time(raw: &str) -> String {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y/%m/%d %H:%M:%S"))
        .map(|t| t.format("%m月%d日 %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(json: &str) -> Notification {
        let adapter = WolfxEewAdapter::new();
        let mut result = adapter.parse_and_transform(json).unwrap();
        assert_eq!(result.len(), 1);
        result.remove(0)
    }

    #[test]
    fn test_warning_report() {
        let json = r#"{
            "type": "jma_eew",
            "Title": "緊急地震速報(警報)",
            "EventID": 20260123012301,
            "Serial": 2,
            "OriginTime": "2026-01-23 01:23:00",
            "Hypocenter": "石川県能登地方",
            "Magunitude": 5.8,
            "MaxIntensity": "5強",
            "Depth": 10,
            "isFinal": false,
            "isCancel": false,
            "isAssumption": false,
            "WarnArea": [
                {"Chiiki": "石川県能登", "Shindo1": "5強", "Type": "警報"},
                {"Chiiki": "新潟県上越", "Shindo1": "4", "Type": "警報"}
            ]
        }"#;

        let notification = parse_one(json);
        assert_eq!(notification.report_type, ReportType::WolfxEew);
        assert_eq!(notification.id, "20260123012301_2");
        assert_eq!(notification.report_time, "01:23");
        assert!(!notification.is_canceled);
        assert_eq!(
            notification.list_summary,
            "【EEW 第2報】5強 石川県能登地方"
        );
        assert!(notification.full_text.contains("◆緊急地震速報(警報)◆"));
        assert!(notification.full_text.contains("#第2報"));
        assert!(notification.full_text.contains("発生時刻:01月23日 01:23"));
        assert!(notification
            .full_text
            .contains("石川県能登地方 で地震が発生した模様です。"));
        assert!(notification.full_text.contains(
            "推定最大震度は5強で、マグニチュードは5.8、震源の深さは10kmと推定されます。"
        ));
        assert!(notification
            .full_text
            .contains("【対象地域】\n石川県能登、新潟県上越"));
        assert_eq!(notification.structured_data.magnitude, Some(5.8));
        assert_eq!(notification.structured_data.depth_km, Some(10.0));
        assert_eq!(notification.structured_data.serial, Some(2));
        assert_eq!(notification.structured_data.is_final, Some(false));
    }

    #[test]
    fn test_cancellation_report() {
        let json = r#"{
            "type": "jma_eew",
            "Title": "緊急地震速報(取消)",
            "EventID": "20260123012301",
            "Serial": 4,
            "OriginTime": "2026-01-23 01:23:00",
            "Hypocenter": "石川県能登地方",
            "isFinal": true,
            "isCancel": true
        }"#;

        let notification = parse_one(json);
        assert!(notification.is_canceled);
        assert_eq!(notification.list_summary, "【EEW】取消報");
        assert!(notification
            .full_text
            .contains("この緊急地震速報はキャンセルされました。"));
        // No body segments follow a cancellation.
        assert!(!notification.full_text.contains("発生時刻"));
        assert!(!notification.full_text.contains("で地震が発生した模様です"));
        assert!(!notification.full_text.contains("【対象地域】"));
        assert!(notification.full_text.ends_with(ATTRIBUTION));
    }

    #[test]
    fn test_serial_and_alternate_key_spelling() {
        let json = r#"{
            "type": "jma_eew",
            "EventID": "evt1",
            "Serial": 3,
            "OriginTime": "2026-01-23 01:23:00",
            "Hypocenter": "石川県能登地方",
            "MaxIntensity": "4",
            "isFinal": false,
            "WarnArea": [{"chiiki": "石川県能登"}]
        }"#;

        let notification = parse_one(json);
        assert!(notification.full_text.contains("#第3報"));
        assert!(notification.full_text.contains("【対象地域】\n石川県能登"));
        assert_eq!(
            notification.structured_data.warn_areas,
            Some(vec!["石川県能登".to_string()])
        );
    }

    #[test]
    fn test_upper_key_spelling_wins_when_both_present() {
        let area: RawWarnArea =
            serde_json::from_str(r#"{"Chiiki": "正式表記", "chiiki": "別表記"}"#).unwrap();
        assert_eq!(area.display_name(), Some("正式表記"));
    }

    #[test]
    fn test_warn_area_without_name_is_skipped() {
        let json = r#"{
            "type": "jma_eew",
            "EventID": "evt2",
            "Serial": 1,
            "OriginTime": "2026-01-23 01:23:00",
            "WarnArea": [{"Shindo1": "4"}, {"Chiiki": "新潟県上越"}]
        }"#;

        let notification = parse_one(json);
        assert_eq!(
            notification.structured_data.warn_areas,
            Some(vec!["新潟県上越".to_string()])
        );
    }

    #[test]
    fn test_final_report_indicator() {
        let json = r#"{
            "type": "jma_eew",
            "EventID": "evt3",
            "Serial": 5,
            "OriginTime": "2026-01-23 01:23:00",
            "Hypocenter": "石川県能登地方",
            "MaxIntensity": "5強",
            "isFinal": true
        }"#;

        let notification = parse_one(json);
        assert!(notification.full_text.contains("#最終報"));
        assert!(!notification.full_text.contains("第5報"));
        assert_eq!(
            notification.list_summary,
            "【EEW 最終報】5強 石川県能登地方"
        );
    }

    #[test]
    fn test_assumption_note() {
        let json = r#"{
            "type": "jma_eew",
            "EventID": "evt4",
            "Serial": 1,
            "OriginTime": "2026-01-23 01:23:00",
            "isAssumption": true
        }"#;

        let notification = parse_one(json);
        assert!(notification.full_text.contains("PLUM法による緊急地震速報"));
        assert_eq!(notification.structured_data.is_assumption, Some(true));
    }

    #[test]
    fn test_missing_fields_fall_back_to_unknown() {
        let json = r#"{
            "type": "jma_eew",
            "EventID": "evt5",
            "Serial": 1,
            "OriginTime": "2026-01-23 01:23:00"
        }"#;

        let notification = parse_one(json);
        assert!(notification.full_text.contains("◆緊急地震速報◆"));
        assert!(notification
            .full_text
            .contains("震源地不明 で地震が発生した模様です。"));
        assert!(notification.full_text.contains(
            "推定最大震度は不明で、マグニチュードは不明、震源の深さは不明と推定されます。"
        ));
        assert_eq!(notification.structured_data.magnitude, None);
        assert_eq!(notification.structured_data.depth_km, None);
        assert_eq!(notification.structured_data.max_intensity, "不明");
    }

    #[test]
    fn test_non_numeric_magnitude_becomes_null() {
        let json = r#"{
            "type": "jma_eew",
            "EventID": "evt6",
            "Serial": 1,
            "OriginTime": "2026-01-23 01:23:00",
            "Magunitude": "調査中",
            "Depth": "10"
        }"#;

        let notification = parse_one(json);
        assert_eq!(notification.structured_data.magnitude, None);
        // Numeric strings still parse.
        assert_eq!(notification.structured_data.depth_km, Some(10.0));
    }

    #[test]
    fn test_skips_heartbeat_frames() {
        let adapter = WolfxEewAdapter::new();
        let json = r#"{"type": "heartbeat", "ver": "1.1", "timestamp": 1774200000000}"#;

        let result = adapter.parse_and_transform(json).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_full_text_trimmed_and_attributed() {
        let json = r#"{
            "type": "jma_eew",
            "EventID": "evt7",
            "Serial": 1,
            "OriginTime": "2026-01-23 01:23:00"
        }"#;

        let notification = parse_one(json);
        assert!(notification.full_text.ends_with(ATTRIBUTION));
        assert_eq!(notification.full_text, notification.full_text.trim());
    }

    #[test]
    fn test_origin_time_formatting() {
        assert_eq!(format_origin_time("2026-01-23 01:23:00"), "01月23日 01:23");
        assert_eq!(format_origin_time("2026/01/23 01:23:00"), "01月23日 01:23");
        assert_eq!(format_origin_time("unknown"), "unknown");
    }

    #[test]
    fn test_structured_data_omits_quake_fields() {
        let json = r#"{
            "type": "jma_eew",
            "EventID": "evt8",
            "Serial": 1,
            "OriginTime": "2026-01-23 01:23:00"
        }"#;

        let notification = parse_one(json);
        let serialized = serde_json::to_string(&notification.structured_data).unwrap();
        assert!(serialized.contains("event_id"));
        assert!(serialized.contains("warn_areas"));
        assert!(!serialized.contains("points"));
    }
}
