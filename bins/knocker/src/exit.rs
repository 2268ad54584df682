//! Process exit codes for failed commands

use knocker_api_client::{ApiError, LoadError};
use knocker_core::error::exit_codes;

fn for_api(err: &ApiError) -> i32 {
    match err {
        ApiError::AuthExpired => exit_codes::AUTH_ERROR,
        ApiError::Config(_) | ApiError::MissingEnvVar(_) | ApiError::InvalidUrl(_) => {
            exit_codes::CONFIG_ERROR
        }
        e if e.is_not_found() => exit_codes::NOT_FOUND,
        _ => exit_codes::FAILURE,
    }
}

/// Exit code for the first recognised error in the chain
pub fn code_for(err: &anyhow::Error) -> u8 {
    let code = err
        .chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<ApiError>() {
                Some(for_api(e))
            } else if let Some(e) = cause.downcast_ref::<LoadError>() {
                Some(match e {
                    LoadError::Api(api) => for_api(api),
                    LoadError::Redirect(_) => exit_codes::AUTH_ERROR,
                    LoadError::Page { status: 404, .. } => exit_codes::NOT_FOUND,
                    LoadError::Page { status: 400, .. } => exit_codes::VALIDATION_ERROR,
                    LoadError::Page { .. } => exit_codes::FAILURE,
                })
            } else {
                cause
                    .downcast_ref::<knocker_core::Error>()
                    .map(|e| e.code.exit_code())
            }
        })
        .unwrap_or(exit_codes::FAILURE);

    u8::try_from(code).unwrap_or(1)
}
