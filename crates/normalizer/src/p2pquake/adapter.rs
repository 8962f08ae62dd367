//! P2P地震情報 feed adapter implementation.
//!
//! Handles parsing and transformation of quake-information messages
//! (code 551) to the unified notification format. The feed delivers four
//! report subtypes which differ in which fields their body carries.

use crate::error::Result;
use crate::format;
use crate::format::TsunamiStatus;
use crate::schema::{number_or_none, Notification, ObservationPoint, ReportType, StructuredData};
use crate::traits::FeedAdapter;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// Message code for quake information on the multiplexed feed.
const QUAKE_INFORMATION_CODE: i64 = 551;

/// Attribution line closing every quake report.
const ATTRIBUTION: &str = "出典：P2P地震情報API(気象庁)";

/// Placeholder rendered when an item carries zero observation points.
const AREA_UNAVAILABLE: &str = "◁震度情報不明▷";

/// P2P地震情報 feed adapter.
#[derive(Debug, Default, Clone)]
pub struct P2pQuakeAdapter;

impl P2pQuakeAdapter {
    /// Create a new P2P地震情報 adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FeedAdapter for P2pQuakeAdapter {
    const NAME: &'static str = "p2pquake";

    fn parse_and_transform(&self, payload: &str) -> Result<Vec<Notification>> {
        let value: serde_json::Value = serde_json::from_str(payload)?;

        // The feed delivers either a single item or an array of items.
        let items = match value {
            serde_json::Value::Array(items) => items,
            other => vec![other],
        };

        let mut notifications = Vec::new();
        for item in items {
            // The feed multiplexes message codes; only quake information
            // becomes a notification. Items without a code are accepted as
            // quake information.
            let code = item
                .get("code")
                .and_then(|v| v.as_i64())
                .unwrap_or(QUAKE_INFORMATION_CODE);
            if code != QUAKE_INFORMATION_CODE {
                continue;
            }

            let raw: RawQuakeItem = serde_json::from_value(item)?;
            let formatted_time = format_event_time(&raw.earthquake.time);
            notifications.push(normalize(&raw, &formatted_time));
        }

        Ok(notifications)
    }
}

// ============================================================================
// Raw Message Types
// ============================================================================

/// One quake-information item as delivered by the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuakeItem {
    /// Source-assigned item identifier.
    #[serde(default)]
    pub id: String,
    /// Report issue metadata.
    #[serde(default)]
    pub issue: Option<RawIssue>,
    /// Earthquake body.
    pub earthquake: RawEarthquake,
    /// Ordered intensity observation points.
    #[serde(default)]
    pub points: Vec<ObservationPoint>,
    /// Long-period ground motion class, negative or absent when not observed.
    #[serde(rename = "lfeClass", default)]
    pub lfe_class: Option<i32>,
    /// Free-form comment block.
    #[serde(default)]
    pub comments: Option<RawComments>,
}

/// Issue metadata of a quake-information item.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    /// Report subtype tag (e.g., "ScalePrompt").
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Earthquake body of a quake-information item.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEarthquake {
    /// Event timestamp, `yyyy/MM/dd HH:mm:ss` in JST.
    #[serde(default)]
    pub time: String,
    /// Hypocenter, absent for quick intensity reports.
    #[serde(default)]
    pub hypocenter: Option<RawHypocenter>,
    /// Maximum intensity scale code, negative sentinel when unknown.
    #[serde(rename = "maxScale", default)]
    pub max_scale: Option<i32>,
    /// Domestic tsunami status.
    #[serde(
        rename = "domesticTsunami",
        default,
        deserialize_with = "tsunami_status_opt"
    )]
    pub domestic_tsunami: Option<TsunamiStatus>,
    /// Foreign tsunami status.
    #[serde(
        rename = "foreignTsunami",
        default,
        deserialize_with = "tsunami_status_opt"
    )]
    pub foreign_tsunami: Option<TsunamiStatus>,
}

/// Deserialize an optional tsunami status code, degrading codes outside the
/// documented set to `TsunamiStatus::Other` instead of failing.
fn tsunami_status_opt<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<TsunamiStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().map(TsunamiStatus::from_code))
}

/// Hypocenter of a quake-information item. Negative magnitude or depth are
/// the feed's "unknown" sentinels.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHypocenter {
    /// Hypocenter region name.
    #[serde(default)]
    pub name: Option<String>,
    /// Magnitude.
    #[serde(default, deserialize_with = "number_or_none")]
    pub magnitude: Option<f64>,
    /// Depth in km.
    #[serde(default, deserialize_with = "number_or_none")]
    pub depth: Option<f64>,
}

/// Comment block of a quake-information item.
#[derive(Debug, Clone, Deserialize)]
pub struct RawComments {
    /// Free-form remark appended to detailed reports.
    #[serde(rename = "freeFormComment", default)]
    pub free_form_comment: Option<String>,
}

// ============================================================================
// Report Subtypes
// ============================================================================

/// Quake report subtype. Each variant owns its title, list prefix, and body
/// template, so adding a subtype stays local to this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuakeReportKind {
    /// 震度速報: intensity only, no hypocenter data yet.
    ScalePrompt,
    /// 震源速報: hypocenter data only, no area breakdown.
    Destination,
    /// 地震情報: the full detailed report. Default for unrecognized tags.
    DetailScale,
    /// 遠地地震情報: distant earthquake report.
    Foreign,
}

/// Field values a subtype template draws from.
struct ReportContext<'a> {
    time: &'a str,
    place: &'a str,
    max_scale: &'a str,
    magnitude: &'a str,
    depth: &'a str,
    tsunami: &'a str,
    lfe_note: &'a str,
    comment_note: &'a str,
    area_block: &'a str,
}

impl QuakeReportKind {
    /// Select the subtype for an issue-type tag. Absent or unrecognized
    /// tags fall back to the detailed report.
    fn from_issue_type(kind: Option<&str>) -> Self {
        match kind {
            Some("ScalePrompt") => QuakeReportKind::ScalePrompt,
            Some("Destination") => QuakeReportKind::Destination,
            Some("Foreign") => QuakeReportKind::Foreign,
            _ => QuakeReportKind::DetailScale,
        }
    }

    fn report_type(self) -> ReportType {
        match self {
            QuakeReportKind::ScalePrompt => ReportType::ScalePrompt,
            QuakeReportKind::Destination => ReportType::Destination,
            QuakeReportKind::DetailScale => ReportType::DetailScale,
            QuakeReportKind::Foreign => ReportType::Foreign,
        }
    }

    fn title(self) -> &'static str {
        match self {
            QuakeReportKind::ScalePrompt => "《震度速報》",
            QuakeReportKind::Destination => "《震源速報》",
            QuakeReportKind::DetailScale => "《地震情報》",
            QuakeReportKind::Foreign => "《遠地地震情報》",
        }
    }

    fn summary_prefix(self) -> &'static str {
        match self {
            QuakeReportKind::ScalePrompt => "【速報】",
            QuakeReportKind::Destination => "【震源】",
            QuakeReportKind::DetailScale => "【詳細】",
            QuakeReportKind::Foreign => "【遠地】",
        }
    }

    /// Assemble the full report body for this subtype.
    fn render(self, ctx: &ReportContext) -> String {
        match self {
            QuakeReportKind::ScalePrompt => format!(
                "{}\n{}\n最大震度 {}\n{}\n\n◆各地の震度(速報値)◆\n{}\n\n{}",
                self.title(),
                ctx.time,
                ctx.max_scale,
                ctx.tsunami,
                ctx.area_block,
                ATTRIBUTION,
            ),
            QuakeReportKind::Destination => format!(
                "{}\n{}\n震源地 {}\nマグニチュード {}\n深さ {}\n{}\n\n{}",
                self.title(),
                ctx.time,
                ctx.place,
                ctx.magnitude,
                ctx.depth,
                ctx.tsunami,
                ATTRIBUTION,
            ),
            QuakeReportKind::DetailScale => format!(
                "{}\n{}\n震源地 {}\n最大震度 {}\nマグニチュード {}\n深さ {}\n{}{}{}\n\n◆各地の震度◆\n{}\n\n{}",
                self.title(),
                ctx.time,
                ctx.place,
                ctx.max_scale,
                ctx.magnitude,
                ctx.depth,
                ctx.tsunami,
                ctx.lfe_note,
                ctx.comment_note,
                ctx.area_block,
                ATTRIBUTION,
            ),
            QuakeReportKind::Foreign => format!(
                "{}\n{}\n震源地 {}\n最大震度 {}\nマグニチュード {}\n深さ {}\n{}\n\n◆各地の震度◆\n{}\n\n{}",
                self.title(),
                ctx.time,
                ctx.place,
                ctx.max_scale,
                ctx.magnitude,
                ctx.depth,
                ctx.tsunami,
                ctx.area_block,
                ATTRIBUTION,
            ),
        }
    }
}

// ============================================================================
// Transformation
// ============================================================================

/// Normalize one quake-information item into a unified notification.
///
/// `formatted_time` is the caller-formatted display form of the item's
/// event timestamp; the core treats it as opaque and its trailing `HH:mm`
/// becomes `report_time`.
pub fn normalize(item: &RawQuakeItem, formatted_time: &str) -> Notification {
    let eq = &item.earthquake;
    let hypocenter = eq.hypocenter.as_ref();
    let kind =
        QuakeReportKind::from_issue_type(item.issue.as_ref().and_then(|i| i.kind.as_deref()));

    let place = hypocenter
        .and_then(|h| h.name.as_deref())
        .filter(|name| !name.is_empty())
        .unwrap_or("(発生地点不明)");
    let max_scale = format::scale_to_label(eq.max_scale);

    // Negative magnitude/depth are the feed's "unknown" sentinels and must
    // not leak into the numeric fields.
    let magnitude = hypocenter.and_then(|h| h.magnitude).filter(|m| *m >= 0.0);
    let magnitude_text = match magnitude {
        Some(m) => format!("{:.1}", m),
        None => format::UNKNOWN.to_string(),
    };
    let raw_depth = hypocenter.and_then(|h| h.depth);
    let depth = raw_depth.filter(|d| *d >= 0.0);
    let depth_text = format::depth_text(raw_depth);

    let tsunami = format::tsunami_text(eq.domestic_tsunami, eq.foreign_tsunami);

    let lfe_note = match item.lfe_class {
        Some(class) if class >= 0 => format!(
            "\nまた、この地震について長周期地震動階級{}を観測しています",
            class
        ),
        _ => String::new(),
    };
    let comment_note = item
        .comments
        .as_ref()
        .and_then(|c| c.free_form_comment.as_deref())
        .map(|c| format!("\n備考：{}", c.trim()))
        .unwrap_or_default();

    let area_block = if item.points.is_empty() {
        AREA_UNAVAILABLE.to_string()
    } else {
        format::area_text(&item.points)
    };

    let full_text = kind.render(&ReportContext {
        time: formatted_time,
        place,
        max_scale,
        magnitude: &magnitude_text,
        depth: &depth_text,
        tsunami,
        lfe_note: &lfe_note,
        comment_note: &comment_note,
        area_block: &area_block,
    });

    let report_type = kind.report_type();

    Notification {
        id: format!("{}_{}", item.id, report_type.tag()),
        report_type,
        report_time: format::clock_suffix(formatted_time),
        is_canceled: false,
        list_summary: format!(
            "{} 震度{} {} M{}",
            kind.summary_prefix(),
            max_scale,
            place,
            magnitude_text
        ),
        full_text: full_text.trim().to_string(),
        structured_data: StructuredData {
            max_intensity: max_scale.to_string(),
            magnitude,
            hypocenter: place.to_string(),
            depth_km: depth,
            points: Some(item.points.clone()),
            event_id: None,
            serial: None,
            is_final: None,
            is_assumption: None,
            warn_areas: None,
        },
    }
}

/// Display form of the feed's event timestamp (`yyyy/MM/dd HH:mm:ss`, JST).
/// Falls back to the raw string when the feed deviates from its documented
/// format.
fn format_event_time(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y/%m/%d %H:%M:%S%.f")
        .map(|t| t.format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

// ============================================================================
// Tests
// ============================================================================
