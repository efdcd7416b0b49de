//! Command handlers grouped by concern.

pub(crate) mod access;
pub(crate) mod projects;
pub(crate) mod salary;
pub(crate) mod sheets;
pub(crate) mod tasks;

use crate::client::{CliError, CliResult};

/// Reject identifiers that would produce an empty path segment.
pub(crate) fn require_id<'a>(label: &str, value: &'a str) -> CliResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation(format!("{label} must not be empty")));
    }
    Ok(trimmed)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_id_trims_and_rejects_blank() {
        assert!(matches!(require_id("project id", " p1 "), Ok("p1")));
        let err = require_id("project id", "  ").expect_err("blank ids are rejected");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "project id must not be empty");
    }
}
