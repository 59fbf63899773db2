//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the sumdedup binary.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (bad arguments, unreadable root, strict-mode failure)
/// - 2: No duplicates found (completed normally, no duplicates)
/// - 3: Partial success (completed, but a root, file or removal failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and duplicates were found.
    Success = 0,
    /// General error: The run could not complete.
    GeneralError = 1,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Partial success: Scan completed but encountered some non-fatal errors.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Exit code of a run that completed.
    ///
    /// Any failure outranks the duplicate outcome.
    #[must_use]
    pub fn for_completed_run(found_duplicates: bool, had_failures: bool) -> Self {
        if had_failures {
            Self::PartialSuccess
        } else if found_duplicates {
            Self::Success
        } else {
            Self::NoDuplicates
        }
    }

    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "SD000",
            Self::GeneralError => "SD001",
            Self::NoDuplicates => "SD002",
            Self::PartialSuccess => "SD003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::NoDuplicates.as_i32(), 2);
        assert_eq!(ExitCode::PartialSuccess.as_i32(), 3);
    }

    #[test]
    fn test_code_prefix() {
        assert_eq!(ExitCode::Success.code_prefix(), "SD000");
        assert_eq!(ExitCode::PartialSuccess.code_prefix(), "SD003");
    }

    #[test]
    fn test_completed_run_codes() {
        assert_eq!(ExitCode::for_completed_run(true, false), ExitCode::Success);
        assert_eq!(ExitCode::for_completed_run(false, false), ExitCode::NoDuplicates);
        assert_eq!(ExitCode::for_completed_run(true, true), ExitCode::PartialSuccess);
        assert_eq!(ExitCode::for_completed_run(false, true), ExitCode::PartialSuccess);
    }

    #[test]
    fn test_structured_error_includes_context() {
        let err = anyhow::anyhow!("Path not found: /nope").context("Scan failed");
        let structured = StructuredError::new(&err, ExitCode::GeneralError);
        assert_eq!(structured.code, "SD001");
        assert_eq!(structured.exit_code, 1);
        assert!(structured.message.contains("Scan failed"));
        assert!(structured.message.contains("/nope"));

        let json = serde_json::to_string(&structured).unwrap();
        assert!(json.contains("\"code\":\"SD001\""));
    }
}
