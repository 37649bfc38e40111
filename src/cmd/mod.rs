pub mod config;
pub mod input;
pub mod parse;
pub mod ticket;

use crate::error::AppError;

/// Prints an error for the user; the diagnostic detail only when debugging.
pub fn report_error(error: &AppError, debug: bool) {
    eprintln!("Error: {error}");
    if let Some(detail) = error.diagnostic() {
        if debug {
            eprintln!("Details: {detail}");
        } else {
            eprintln!("Rerun with --debug for the full response.");
        }
    }
}
