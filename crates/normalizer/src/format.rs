//! Shared rendering helpers.
//!
//! Both feed adapters go through these so the same semantic input (a scale
//! code, a tsunami status pair, a depth) always renders identically
//! regardless of which feed delivered it.

use tracing::warn;

use crate::schema::ObservationPoint;

/// Label used whenever a value is absent or unrecognized.
pub const UNKNOWN: &str = "不明";

/// Sentence returned for a tsunami status pair the decision table does not
/// cover. Seeing it in output is a logic defect (incomplete table), not a
/// valid steady state; selection is logged at warn level.
pub const TSUNAMI_FALLBACK: &str = "津波情報：エラー！";

/// Map a quake-feed intensity scale code to its display label.
pub fn scale_to_label(scale: Option<i32>) -> &'static str {
    match scale {
        Some(10) => "1",
        Some(20) => "2",
        Some(30) => "3",
        Some(40) => "4",
        Some(45) => "5弱",
        Some(50) => "5強",
        Some(55) => "6弱",
        Some(60) => "6強",
        Some(70) => "7",
        _ => UNKNOWN,
    }
}

/// Numeric rank of an intensity label, for ordering observation points by
/// severity. Unrecognized labels rank lowest.
pub fn scale_rank(label: &str) -> i32 {
    match label {
        "1" => 10,
        "2" => 20,
        "3" => 30,
        "4" => 40,
        "5弱" => 45,
        "5強" => 50,
        "6弱" => 55,
        "6強" => 60,
        "7" => 70,
        _ => 0,
    }
}

/// Tsunami status reported by the quake feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsunamiStatus {
    Warning,
    Watch,
    NonEffective,
    None,
    Checking,
    Unknown,
    /// Upstream value outside the documented set.
    Other,
}

impl TsunamiStatus {
    /// Map an upstream status code to its variant. Codes outside the
    /// documented set degrade to `Other` instead of failing.
    pub fn from_code(code: &str) -> Self {
        match code {
            "Warning" => TsunamiStatus::Warning,
            "Watch" => TsunamiStatus::Watch,
            "NonEffective" => TsunamiStatus::NonEffective,
            "None" => TsunamiStatus::None,
            "Checking" => TsunamiStatus::Checking,
            "Unknown" => TsunamiStatus::Unknown,
            _ => TsunamiStatus::Other,
        }
    }
}

/// Render the advisory sentence for a domestic/foreign tsunami status pair.
///
/// An absent domestic status counts as `Unknown`; an absent foreign status
/// counts as no foreign signal.
pub fn tsunami_text(
    domestic: Option<TsunamiStatus>,
    foreign: Option<TsunamiStatus>,
) -> &'static str {
    match domestic.unwrap_or(TsunamiStatus::Unknown) {
        TsunamiStatus::Warning | TsunamiStatus::Watch => "津波に関する情報を発表しています。",
        TsunamiStatus::NonEffective => {
            "津波予報(若干の海面変動)を発表していますが、被害の心配はありません。"
        }
        TsunamiStatus::None => match foreign {
            Some(TsunamiStatus::Warning) | Some(TsunamiStatus::Watch) => {
                "この地震による国内での津波の心配はありません。"
            }
            _ => "この地震による津波の心配はありません。",
        },
        TsunamiStatus::Checking => "この地震による津波の有無を現在調査中です。",
        TsunamiStatus::Unknown => "この地震による津波の有無は不明です。",
        TsunamiStatus::Other => {
            warn!(
                ?domestic,
                ?foreign,
                "tsunami status pair outside the mapping table"
            );
            TSUNAMI_FALLBACK
        }
    }
}

/// Render a hypocenter depth for display.
pub fn depth_text(depth: Option<f64>) -> String {
    match depth {
        None => UNKNOWN.to_string(),
        Some(d) if d < 0.0 => UNKNOWN.to_string(),
        Some(d) if d == 0.0 => "ごく浅い".to_string(),
        Some(d) => format!("{}km", d),
    }
}

/// Render the per-area intensity breakdown.
///
/// Points are grouped by intensity label and groups are ordered from the
/// strongest down (unknown last); input order is preserved within a group.
/// Every input point appears exactly once.
pub fn area_text(points: &[ObservationPoint]) -> String {
    let mut groups: Vec<(i32, &'static str, Vec<&str>)> = Vec::new();
    for point in points {
        let label = scale_to_label(point.scale);
        let rank = scale_rank(label);
        match groups.iter_mut().find(|(r, _, _)| *r == rank) {
            Some((_, _, names)) => names.push(&point.addr),
            None => groups.push((rank, label, vec![&point.addr])),
        }
    }
    groups.sort_by(|a, b| b.0.cmp(&a.0));

    groups
        .iter()
        .map(|(_, label, names)| format!("【震度{}】{}", label, names.join("、")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trailing `HH:mm` of a caller-formatted display string.
///
/// Both feed display formats end with the clock; strings too short to carry
/// one pass through unchanged.
pub fn clock_suffix(formatted: &str) -> String {
    let chars: Vec<char> = formatted.chars().collect();
    if chars.len() <= 5 {
        formatted.to_string()
    } else {
        chars[chars.len() - 5..].iter().collect()
    }
}
