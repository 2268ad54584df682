//! Monitor settings catalogue
//!
//! Option lists offered by the monitor create/edit forms and the helpers
//! that turn raw form input into the shapes the API expects:
//! accepted status code selections (`"2xx"`, `"404"`) and multi-line header
//! text (`"Key: Value"` per line).

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

static STATUS_RANGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([1-5])xx$").expect("range regex"));

/// A registered HTTP status code with its reason phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCodeEntry {
    /// Numeric status code
    pub code: u16,
    /// Reason phrase
    pub label: &'static str,
}

/// A selectable option in a form list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    /// Text shown to the user
    pub label: &'static str,
    /// Value submitted with the form
    pub value: &'static str,
}

/// Check interval option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalOption {
    /// Short label ("30s", "1h")
    pub label: &'static str,
    /// Interval in seconds
    pub seconds: i32,
}

/// Failure/recovery threshold option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdOption {
    /// Human label
    pub label: &'static str,
    /// Consecutive checks
    pub value: i32,
}

/// Registered status codes (HTTP/1.1 plus common extensions), ascending.
pub const STATUS_CODES: &[StatusCodeEntry] = &[
    StatusCodeEntry { code: 100, label: "Continue" },
    StatusCodeEntry { code: 101, label: "Switching Protocols" },
    StatusCodeEntry { code: 102, label: "Processing" },
    StatusCodeEntry { code: 103, label: "Early Hints" },
    StatusCodeEntry { code: 200, label: "OK" },
    StatusCodeEntry { code: 201, label: "Created" },
    StatusCodeEntry { code: 202, label: "Accepted" },
    StatusCodeEntry { code: 203, label: "Non-Authoritative Information" },
    StatusCodeEntry { code: 204, label: "No Content" },
    StatusCodeEntry { code: 205, label: "Reset Content" },
    StatusCodeEntry { code: 206, label: "Partial Content" },
    StatusCodeEntry { code: 207, label: "Multi-Status" },
    StatusCodeEntry { code: 208, label: "Already Reported" },
    StatusCodeEntry { code: 226, label: "IM Used" },
    StatusCodeEntry { code: 300, label: "Multiple Choices" },
    StatusCodeEntry { code: 301, label: "Moved Permanently" },
    StatusCodeEntry { code: 302, label: "Found" },
    StatusCodeEntry { code: 303, label: "See Other" },
    StatusCodeEntry { code: 304, label: "Not Modified" },
    StatusCodeEntry { code: 305, label: "Use Proxy" },
    StatusCodeEntry { code: 306, label: "Switch Proxy" },
    StatusCodeEntry { code: 307, label: "Temporary Redirect" },
    StatusCodeEntry { code: 308, label: "Permanent Redirect" },
    StatusCodeEntry { code: 400, label: "Bad Request" },
    StatusCodeEntry { code: 401, label: "Unauthorized" },
    StatusCodeEntry { code: 402, label: "Payment Required" },
    StatusCodeEntry { code: 403, label: "Forbidden" },
    StatusCodeEntry { code: 404, label: "Not Found" },
    StatusCodeEntry { code: 405, label: "Method Not Allowed" },
    StatusCodeEntry { code: 406, label: "Not Acceptable" },
    StatusCodeEntry { code: 407, label: "Proxy Authentication Required" },
    StatusCodeEntry { code: 408, label: "Request Timeout" },
    StatusCodeEntry { code: 409, label: "Conflict" },
    StatusCodeEntry { code: 410, label: "Gone" },
    StatusCodeEntry { code: 411, label: "Length Required" },
    StatusCodeEntry { code: 412, label: "Precondition Failed" },
    StatusCodeEntry { code: 413, label: "Payload Too Large" },
    StatusCodeEntry { code: 414, label: "URI Too Long" },
    StatusCodeEntry { code: 415, label: "Unsupported Media Type" },
    StatusCodeEntry { code: 416, label: "Range Not Satisfiable" },
    StatusCodeEntry { code: 417, label: "Expectation Failed" },
    StatusCodeEntry { code: 418, label: "I'm a teapot" },
    StatusCodeEntry { code: 421, label: "Misdirected Request" },
    StatusCodeEntry { code: 422, label: "Unprocessable Content" },
    StatusCodeEntry { code: 423, label: "Locked" },
    StatusCodeEntry { code: 424, label: "Failed Dependency" },
    StatusCodeEntry { code: 425, label: "Too Early" },
    StatusCodeEntry { code: 426, label: "Upgrade Required" },
    StatusCodeEntry { code: 428, label: "Precondition Required" },
    StatusCodeEntry { code: 429, label: "Too Many Requests" },
    StatusCodeEntry { code: 431, label: "Request Header Fields Too Large" },
    StatusCodeEntry { code: 451, label: "Unavailable For Legal Reasons" },
    StatusCodeEntry { code: 500, label: "Internal Server Error" },
    StatusCodeEntry { code: 501, label: "Not Implemented" },
    StatusCodeEntry { code: 502, label: "Bad Gateway" },
    StatusCodeEntry { code: 503, label: "Service Unavailable" },
    StatusCodeEntry { code: 504, label: "Gateway Timeout" },
    StatusCodeEntry { code: 505, label: "HTTP Version Not Supported" },
    StatusCodeEntry { code: 506, label: "Variant Also Negotiates" },
    StatusCodeEntry { code: 507, label: "Insufficient Storage" },
    StatusCodeEntry { code: 508, label: "Loop Detected" },
    StatusCodeEntry { code: 510, label: "Not Extended" },
    StatusCodeEntry { code: 511, label: "Network Authentication Required" },
];

/// Status class shorthands accepted alongside explicit codes
pub const STATUS_RANGE_OPTIONS: &[SelectOption] = &[
    SelectOption { label: "Any 1xx", value: "1xx" },
    SelectOption { label: "Any 2xx", value: "2xx" },
    SelectOption { label: "Any 3xx", value: "3xx" },
    SelectOption { label: "Any 4xx", value: "4xx" },
    SelectOption { label: "Any 5xx", value: "5xx" },
];

/// Check interval presets
pub const INTERVAL_OPTIONS: &[IntervalOption] = &[
    IntervalOption { label: "30s", seconds: 30 },
    IntervalOption { label: "45s", seconds: 45 },
    IntervalOption { label: "1m", seconds: 60 },
    IntervalOption { label: "3m", seconds: 180 },
    IntervalOption { label: "5m", seconds: 300 },
    IntervalOption { label: "10m", seconds: 600 },
    IntervalOption { label: "15m", seconds: 900 },
    IntervalOption { label: "30m", seconds: 1800 },
    IntervalOption { label: "1h", seconds: 3600 },
    IntervalOption { label: "2h", seconds: 7200 },
];

/// Threshold presets
pub const THRESHOLD_OPTIONS: &[ThresholdOption] = &[
    ThresholdOption { label: "Immediate (after 1 check)", value: 1 },
    ThresholdOption { label: "After 2 checks", value: 2 },
    ThresholdOption { label: "After 3 checks", value: 3 },
    ThresholdOption { label: "After 4 checks", value: 4 },
    ThresholdOption { label: "After 5 checks", value: 5 },
];

/// HTTP verbs an HTTP monitor may use
pub const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Request body encodings; the empty value means no body
pub const BODY_ENCODINGS: &[SelectOption] = &[
    SelectOption { label: "None", value: "" },
    SelectOption { label: "JSON", value: "json" },
    SelectOption { label: "XML", value: "xml" },
];

/// Look up the reason phrase for a registered code
#[must_use]
pub fn status_label(code: u16) -> Option<&'static str> {
    STATUS_CODES
        .binary_search_by_key(&code, |e| e.code)
        .ok()
        .map(|idx| STATUS_CODES[idx].label)
}

/// Whether `code` is in the registry
#[must_use]
pub fn is_registered(code: u16) -> bool {
    status_label(code).is_some()
}

/// Registered 2xx codes, the default accepted set for new HTTP monitors
#[must_use]
pub fn success_status_codes() -> Vec<u16> {
    STATUS_CODES
        .iter()
        .map(|e| e.code)
        .filter(|c| (200..300).contains(c))
        .collect()
}

/// Expand accepted status code selections into unique registered codes.
///
/// `"2xx"`-style shorthands expand to every registered code of that class.
/// Numeric entries are kept only when registered; anything else is dropped.
/// The result is ascending and free of duplicates.
#[must_use]
pub fn normalize_status_codes<S: AsRef<str>>(selections: &[S]) -> Vec<u16> {
    let mut result = BTreeSet::new();

    for selection in selections {
        let selection = selection.as_ref();
        if let Some(caps) = STATUS_RANGE_RE.captures(selection) {
            let class: u16 = caps[1].parse().unwrap_or_default();
            result.extend(STATUS_CODES.iter().map(|e| e.code).filter(|c| c / 100 == class));
            continue;
        }

        if let Ok(code) = selection.parse::<u16>() {
            if is_registered(code) {
                result.insert(code);
            }
        }
    }

    result.into_iter().collect()
}

/// Parse multi-line `"Key: Value"` header text.
///
/// Lines without a colon, or with an empty key or value, are skipped.
/// Returns `None` when nothing usable remains.
#[must_use]
pub fn parse_headers(raw: Option<&str>) -> Option<BTreeMap<String, String>> {
    let raw = raw?;
    let headers: BTreeMap<String, String> = raw
        .lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once(':')?;
            let (key, value) = (key.trim(), value.trim());
            (!key.is_empty() && !value.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect();

    (!headers.is_empty()).then_some(headers)
}

/// Render a header map back into the multi-line form text
#[must_use]
pub fn format_headers(headers: &BTreeMap<String, String>) -> String {
    headers
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_registry_is_sorted() {
        assert!(STATUS_CODES.windows(2).all(|w| w[0].code < w[1].code));
        assert_eq!(status_label(418), Some("I'm a teapot"));
        assert_eq!(status_label(299), None);
    }

    #[test]
    fn test_expand_range_and_explicit_code() {
        let codes = normalize_status_codes(&["2xx", "404"]);
        let mut expected = success_status_codes();
        expected.push(404);
        assert_eq!(codes, expected);
        assert_eq!(codes.first(), Some(&200));
        assert_eq!(codes.last(), Some(&404));
    }

    #[test]
    fn test_unregistered_and_garbage_dropped() {
        assert_eq!(normalize_status_codes(&["299", "6xx", "abc", "", "200"]), vec![200]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(normalize_status_codes(&["200", "2xx", "200"]), success_status_codes());
    }

    #[test]
    fn test_parse_headers() {
        let raw = "Authorization: Bearer abc\n\nX-Trace:  42 \nnot-a-header\n: empty\nX-Empty:";
        let headers = parse_headers(Some(raw)).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["Authorization"], "Bearer abc");
        assert_eq!(headers["X-Trace"], "42");
    }

    #[test]
    fn test_parse_headers_keeps_colons_in_value() {
        let headers = parse_headers(Some("Referer: https://example.com")).unwrap();
        assert_eq!(headers["Referer"], "https://example.com");
    }

    #[test]
    fn test_parse_headers_empty() {
        assert_eq!(parse_headers(None), None);
        assert_eq!(parse_headers(Some("  \n\n")), None);
        assert_eq!(parse_headers(Some("garbage")), None);
    }

    #[test]
    fn test_format_headers() {
        let headers = parse_headers(Some("B: 2\nA: 1")).unwrap();
        assert_eq!(format_headers(&headers), "A: 1\nB: 2");
    }

    proptest! {
        #[test]
        fn normalized_codes_are_sorted_unique_and_registered(
            picks in prop::collection::vec(
                prop_oneof![
                    (1u16..=5).prop_map(|c| format!("{c}xx")),
                    (0u16..700).prop_map(|c| c.to_string()),
                ],
                0..12,
            )
        ) {
            let codes = normalize_status_codes(&picks);
            prop_assert!(codes.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(codes.iter().all(|c| is_registered(*c)));
        }
    }
}
