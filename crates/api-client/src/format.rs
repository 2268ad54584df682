//! Display formatting shared by the loaders and terminal output

use crate::models::{MonitorStatus, TimelinePoint};
use chrono::{DateTime, Datelike, Utc};

/// Placeholder for values that are missing or unparsable
pub const PLACEHOLDER: &str = "—";

/// Visual weight of a status or timeline cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Success,
    Destructive,
}

#[derive(Clone, Copy)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    fn name(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Idiomatic wording for -1, 0 and 1 of this unit
    fn phrase(self, value: i64) -> Option<&'static str> {
        Some(match (self, value) {
            (Self::Second, 0) => "now",
            (Self::Minute, 0) => "this minute",
            (Self::Hour, 0) => "this hour",
            (Self::Day, -1) => "yesterday",
            (Self::Day, 0) => "today",
            (Self::Day, 1) => "tomorrow",
            (Self::Week, -1) => "last week",
            (Self::Week, 0) => "this week",
            (Self::Week, 1) => "next week",
            (Self::Month, -1) => "last month",
            (Self::Month, 0) => "this month",
            (Self::Month, 1) => "next month",
            (Self::Year, -1) => "last year",
            (Self::Year, 0) => "this year",
            (Self::Year, 1) => "next year",
            _ => return None,
        })
    }
}

const DIVISIONS: [(f64, Unit); 7] = [
    (60.0, Unit::Second),
    (60.0, Unit::Minute),
    (24.0, Unit::Hour),
    (7.0, Unit::Day),
    (4.34524, Unit::Week),
    (12.0, Unit::Month),
    (f64::INFINITY, Unit::Year),
];

/// English relative time of `timestamp` as seen from `now`, e.g. "in 5
/// minutes", "3 days ago", "yesterday".
///
/// Missing timestamps, and the zero time the API reports for "never", give
/// [`PLACEHOLDER`].
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn relative_time(timestamp: Option<&DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(timestamp) = timestamp.filter(|t| t.year() > 1) else {
        return PLACEHOLDER.to_string();
    };

    let mut duration = (*timestamp - now).num_milliseconds() as f64 / 1000.0;
    for (amount, unit) in DIVISIONS {
        if duration.abs() < amount {
            // half-way values round towards positive infinity
            let value = (duration + 0.5).floor() as i64;
            return phrase(value, unit);
        }
        duration /= amount;
    }
    PLACEHOLDER.to_string()
}

/// [`relative_time`] for an RFC 3339 string
#[must_use]
pub fn relative_time_str(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let parsed = timestamp
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc));
    relative_time(parsed.as_ref(), now)
}

fn phrase(value: i64, unit: Unit) -> String {
    if let Some(words) = unit.phrase(value) {
        return words.to_string();
    }

    let count = value.unsigned_abs();
    let plural = if count == 1 { "" } else { "s" };
    if value < 0 {
        format!("{count} {}{plural} ago", unit.name())
    } else {
        format!("in {count} {}{plural}", unit.name())
    }
}

/// Check frequency for an interval in seconds
///
/// ```
/// use knocker_api_client::format::format_frequency;
///
/// assert_eq!(format_frequency(Some(30)), "Every 30s");
/// assert_eq!(format_frequency(Some(300)), "Every 5m");
/// assert_eq!(format_frequency(Some(7200)), "Every 2h");
/// assert_eq!(format_frequency(Some(5400)), "Every 1.5h");
/// assert_eq!(format_frequency(None), "Paused");
/// ```
#[must_use]
pub fn format_frequency(interval: Option<i64>) -> String {
    let interval = match interval {
        Some(seconds) if seconds > 0 => seconds,
        _ => return "Paused".to_string(),
    };

    if interval < 60 {
        return format!("Every {interval}s");
    }
    if interval % 3600 == 0 {
        return format!("Every {}h", interval / 3600);
    }

    #[allow(clippy::cast_precision_loss)]
    let minutes = interval as f64 / 60.0;
    if minutes < 90.0 {
        return format!("Every {}m", minutes.round());
    }

    let hours = format!("{:.1}", minutes / 60.0);
    format!("Every {}h", hours.strip_suffix(".0").unwrap_or(&hours))
}

/// Label for a monitor status
#[must_use]
pub fn status_label(status: MonitorStatus) -> &'static str {
    match status {
        MonitorStatus::Up => "Operational",
        MonitorStatus::Down => "Degraded",
        MonitorStatus::Unknown => "Unknown",
    }
}

#[must_use]
pub fn status_tone(status: MonitorStatus) -> Tone {
    match status {
        MonitorStatus::Up => Tone::Success,
        MonitorStatus::Down => Tone::Destructive,
        MonitorStatus::Unknown => Tone::Muted,
    }
}

/// SLI percentage with two decimals, e.g. "99.95%"
#[must_use]
pub fn format_sli(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{v:.2}%"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Short month and day, e.g. "Jan 5"
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d").to_string()
}

/// Tone of one day on a status timeline
#[must_use]
pub fn timeline_tone(point: &TimelinePoint) -> Tone {
    if point.total() == 0 {
        Tone::Muted
    } else if point.fail == 0 {
        Tone::Success
    } else {
        Tone::Destructive
    }
}

/// At most two decimals with trailing zeros removed: `1.5`, `99.95`, `100`
#[must_use]
pub fn format_up_to_2_decimals(n: f64) -> String {
    let rounded = ((n + f64::EPSILON) * 1000.0).round() / 1000.0;
    let fixed = format!("{rounded:.2}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Country code of a region name such as `us-east-1`
fn country_code(region_name: &str) -> &str {
    region_name.split('-').next().unwrap_or_default().trim()
}

/// Flag emoji for a region named `<cc>-...`; `None` unless `cc` is two
/// ASCII letters
#[must_use]
pub fn region_flag_emoji(region_name: &str) -> Option<String> {
    const REGIONAL_INDICATOR_A: u32 = 0x1F1E6;

    let code = country_code(region_name);
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    code.to_ascii_uppercase()
        .bytes()
        .map(|b| char::from_u32(REGIONAL_INDICATOR_A + u32::from(b - b'A')))
        .collect()
}

/// Icon id for a region's flag, e.g. `cif:us`
#[must_use]
pub fn region_flag_icon(region_name: &str) -> Option<String> {
    let code = country_code(region_name);
    (!code.is_empty()).then(|| format!("cif:{}", code.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn ago(seconds: i64) -> String {
        let at = now() - Duration::seconds(seconds);
        relative_time(Some(&at), now())
    }

    #[test]
    fn test_relative_time_divisions() {
        assert_eq!(ago(0), "now");
        assert_eq!(ago(1), "1 second ago");
        assert_eq!(ago(45), "45 seconds ago");
        assert_eq!(ago(5 * 60), "5 minutes ago");
        assert_eq!(ago(3 * 3600), "3 hours ago");
        assert_eq!(ago(86_400), "yesterday");
        assert_eq!(ago(3 * 86_400), "3 days ago");
        assert_eq!(ago(14 * 86_400), "2 weeks ago");
        assert_eq!(ago(-5 * 60), "in 5 minutes");
        assert_eq!(ago(-86_400), "tomorrow");
    }

    #[test]
    fn test_relative_time_missing() {
        assert_eq!(relative_time(None, now()), PLACEHOLDER);
        assert_eq!(relative_time_str(Some("not a date"), now()), PLACEHOLDER);
        assert_eq!(relative_time_str(Some("0001-01-01T00:00:00Z"), now()), PLACEHOLDER);
        assert_eq!(
            relative_time_str(Some("2025-03-10T11:58:00Z"), now()),
            "2 minutes ago"
        );
    }

    #[test]
    fn test_frequency() {
        assert_eq!(format_frequency(Some(0)), "Paused");
        assert_eq!(format_frequency(Some(-5)), "Paused");
        assert_eq!(format_frequency(Some(59)), "Every 59s");
        assert_eq!(format_frequency(Some(60)), "Every 1m");
        assert_eq!(format_frequency(Some(3600)), "Every 1h");
        assert_eq!(format_frequency(Some(5_340)), "Every 89m");
        assert_eq!(format_frequency(Some(7_260)), "Every 2h");
        assert_eq!(format_frequency(Some(9_000)), "Every 2.5h");
    }

    #[test]
    fn test_sli_and_decimals() {
        assert_eq!(format_sli(Some(99.951)), "99.95%");
        assert_eq!(format_sli(None), PLACEHOLDER);
        assert_eq!(format_sli(Some(f64::NAN)), PLACEHOLDER);

        assert_eq!(format_up_to_2_decimals(100.0), "100");
        assert_eq!(format_up_to_2_decimals(1.5), "1.5");
        assert_eq!(format_up_to_2_decimals(99.954_1), "99.95");
        assert_eq!(format_up_to_2_decimals(0.0), "0");
    }

    #[test]
    fn test_dates() {
        let date = Utc.with_ymd_and_hms(2025, 1, 5, 8, 0, 0).unwrap();
        assert_eq!(format_date(&date), "Jan 5");
    }

    #[test]
    fn test_timeline_tone() {
        let point = |success, fail| TimelinePoint {
            day: now(),
            success,
            fail,
        };
        assert_eq!(timeline_tone(&point(0, 0)), Tone::Muted);
        assert_eq!(timeline_tone(&point(10, 0)), Tone::Success);
        assert_eq!(timeline_tone(&point(10, 1)), Tone::Destructive);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(MonitorStatus::Up), "Operational");
        assert_eq!(status_label(MonitorStatus::Down), "Degraded");
        assert_eq!(status_tone(MonitorStatus::Down), Tone::Destructive);
    }

    #[test]
    fn test_region_flags() {
        assert_eq!(region_flag_emoji("us-east-1").as_deref(), Some("🇺🇸"));
        assert_eq!(region_flag_emoji("sg-sin-1").as_deref(), Some("🇸🇬"));
        assert_eq!(region_flag_emoji("global"), None);
        assert_eq!(region_flag_emoji("1a-x"), None);
        assert_eq!(region_flag_icon("DE-fra").as_deref(), Some("cif:de"));
        assert_eq!(region_flag_icon(""), None);
    }
}
