//! Validation of create/edit form input before it is sent
//!
//! Monitor errors use the wire field names (`config.max_redirects`); status
//! page errors use the camelCase names of the page editor
//! (`elements.0.monitorId`).

use crate::models::{
    ElementType, HttpMonitorConfig, MonitorConfig, MonitorUpsertRequest, PingMonitorConfig,
    StatusPageElementInput, StatusPageMonitorInput, StatusPageUpsertRequest,
};
use knocker_core::validation::{ValidationResult, Validator};

const NAME_MAX: usize = 255;
const ELEMENT_TYPES: &[&str] = &["historical_timeline", "current_status_indicator"];

/// Validate a monitor create/update body
#[must_use]
pub fn validate_monitor(monitor: &MonitorUpsertRequest) -> ValidationResult {
    let config = match &monitor.config {
        MonitorConfig::Http(http) => validate_http_config(http),
        MonitorConfig::Ping(ping) => validate_ping_config(ping),
    };

    let mut validator = Validator::new()
        .required_msg("name", &monitor.name, "Monitor name is required")
        .max_length("name", &monitor.name, NAME_MAX)
        .at_least(
            "interval",
            monitor.interval,
            10,
            "Interval must be at least 10 seconds",
        )
        .range("failure_threshold", monitor.failure_threshold, 1, 10)
        .range("recovery_threshold", monitor.recovery_threshold, 1, 10)
        .non_empty("regions", &monitor.regions, "Select at least one region");

    for (i, id) in monitor.regions.iter().enumerate() {
        validator = validator.int64_string(&format!("regions.{i}"), id);
    }
    for (i, id) in monitor.notification.iter().enumerate() {
        validator = validator.int64_string(&format!("notification.{i}"), id);
    }

    validator.nested("config", config).validate()
}

/// Validate HTTP check settings; field paths are relative to the config
#[must_use]
pub fn validate_http_config(config: &HttpMonitorConfig) -> ValidationResult {
    let mut validator = Validator::new()
        .required_msg("url", &config.url, "URL is required")
        .url("url", &config.url)
        .range("max_redirects", config.max_redirects, 0, 1000)
        .range("request_timeout", config.request_timeout, 0, 120)
        .non_empty(
            "accepted_status_codes",
            &config.accepted_status_codes,
            "At least one status code required",
        );

    for (i, code) in config.accepted_status_codes.iter().enumerate() {
        validator = validator.range(&format!("accepted_status_codes.{i}"), *code, 100, 599);
    }
    validator.validate()
}

/// Validate ping check settings; field paths are relative to the config
#[must_use]
pub fn validate_ping_config(config: &PingMonitorConfig) -> ValidationResult {
    let mut validator = Validator::new()
        .required_msg("host", &config.host, "Host is required")
        .range("timeout_seconds", config.timeout_seconds, 0, 120);

    if let Some(size) = config.packet_size {
        validator = validator.range("packet_size", size, 1, 65_000);
    }
    validator.validate()
}

/// Validate a status page create/update body
#[must_use]
pub fn validate_status_page(page: &StatusPageUpsertRequest) -> ValidationResult {
    let mut validator = Validator::new()
        .min_length("title", &page.title, 1)
        .max_length("title", &page.title, NAME_MAX)
        .min_length("slug", &page.slug, 3)
        .max_length("slug", &page.slug, NAME_MAX);

    for (i, element) in page.elements.iter().enumerate() {
        validator = validator.nested(&format!("elements.{i}"), validate_element(element));
    }
    validator.validate()
}

fn validate_element(element: &StatusPageElementInput) -> ValidationResult {
    let mut validator = entry_rules(
        Validator::new(),
        element.id.as_deref(),
        &element.name,
        element.kind,
        element.sort_order,
    );

    match element.monitor_id.as_deref() {
        Some(id) => validator = validator.int64_string("monitorId", id),
        None if element.monitor => {
            validator = validator.custom("monitorId", || {
                Some("monitorId is required for monitor elements".to_string())
            });
        }
        None => {}
    }

    for (j, monitor) in element.monitors.iter().enumerate() {
        validator = validator.nested(&format!("monitors.{j}"), validate_placed_monitor(monitor));
    }
    validator.validate()
}

fn validate_placed_monitor(monitor: &StatusPageMonitorInput) -> ValidationResult {
    let mut validator = entry_rules(
        Validator::new(),
        monitor.id.as_deref(),
        &monitor.name,
        monitor.kind,
        monitor.sort_order,
    )
    .int64_string("monitorId", &monitor.monitor_id);

    if let Some(group_id) = monitor.group_id.as_deref() {
        validator = validator.int64_string("groupId", group_id);
    }
    validator.validate()
}

/// Rules shared by elements and the monitors placed in them
fn entry_rules(
    mut validator: Validator,
    id: Option<&str>,
    name: &str,
    kind: ElementType,
    sort_order: i32,
) -> Validator {
    if let Some(id) = id {
        validator = validator.int64_string("id", id);
    }
    validator
        .min_length("name", name, 1)
        .max_length("name", name, NAME_MAX)
        .one_of("type", kind.as_str(), ELEMENT_TYPES)
        .at_least("sortOrder", sort_order, 1, "Must be at least 1")
}

/// Validate sign-in input
#[must_use]
pub fn validate_login(email: &str, password: &str) -> ValidationResult {
    credential_rules(Validator::new(), email, password).validate()
}

/// Validate sign-up input
#[must_use]
pub fn validate_register(display_name: &str, email: &str, password: &str) -> ValidationResult {
    let validator = Validator::new()
        .min_length("display_name", display_name.trim(), 3)
        .max_length("display_name", display_name, NAME_MAX);
    credential_rules(validator, email, password).validate()
}

fn credential_rules(validator: Validator, email: &str, password: &str) -> Validator {
    validator
        .email("email", email.trim())
        .min_length("password", password, 8)
        .max_length("password", password, NAME_MAX)
}
