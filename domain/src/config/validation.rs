//! Structured configuration issues.
//!
//! Config sections parse their string fields into domain types and report
//! anything they could not interpret as a [`ConfigIssue`] instead of failing.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a default was substituted.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field did not parse into its enum.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric field is outside its usable range.
    OutOfRange { field: String, value: String },
    /// A size that must be positive is zero.
    ZeroSize { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    /// Check whether any issue in the slice is fatal.
    pub fn any_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_errors() {
        let warn = ConfigIssue::warning(
            ConfigIssueCode::ZeroSize {
                field: "ranking.alternates_size".to_string(),
            },
            "no alternates",
        );
        assert!(!ConfigIssue::any_errors(std::slice::from_ref(&warn)));

        let err = ConfigIssue::error(
            ConfigIssueCode::ZeroSize {
                field: "ranking.shortlist_size".to_string(),
            },
            "empty shortlist",
        );
        assert!(ConfigIssue::any_errors(&[warn, err]));
    }
}
