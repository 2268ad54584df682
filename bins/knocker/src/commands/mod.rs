//! Command implementations
//!
//! Each command fetches through the API client or a page loader, then
//! renders either a table or the JSON of the same view model.

pub mod auth;
pub mod incidents;
pub mod monitors;
pub mod notifications;
pub mod regions;
pub mod status_pages;
pub mod teams;

use crate::context::Context;
use anyhow::Result;
use knocker_core::validation::ValidationResult;
use serde::Serialize;

/// Print `value` as JSON, or hand it to `text` for terminal rendering
pub fn emit<T: Serialize + ?Sized>(ctx: &Context, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if ctx.is_json() {
        knocker_cli::output::print_json(value)?;
    } else {
        text(value);
    }
    Ok(())
}

/// Fail with every field message when validation did not pass
pub fn ensure_valid(result: ValidationResult) -> Result<()> {
    result.to_result().map_err(Into::into)
}
