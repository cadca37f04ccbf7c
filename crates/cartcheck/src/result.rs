//! Result and error types for cartcheck.

use thiserror::Error;

/// Result type for cartcheck operations
pub type CheckResult<T> = Result<T, CheckError>;

/// Errors that terminate a scenario.
///
/// `ElementNotFound`, `FormatMismatch` and `AssertionMismatch` are the
/// suite's own failure signals; the rest are infrastructure failures
/// surfaced from the browser, the filesystem or configuration.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Selector matched nothing within the wait timeout
    #[error("Element not found: {selector} (waited {timeout_ms}ms)")]
    ElementNotFound {
        /// Selector that was waited on
        selector: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Scraped text did not match the expected pattern
    #[error("Format mismatch: expected {expected}, got {input:?}")]
    FormatMismatch {
        /// Description of the expected pattern
        expected: String,
        /// The offending input
        input: String,
    },

    /// Expected and displayed values disagree
    #[error("Assertion mismatch for {what}: expected {expected}, got {actual}")]
    AssertionMismatch {
        /// What was being compared
        what: String,
        /// Independently computed value
        expected: String,
        /// Value read from the storefront
        actual: String,
    },

    /// A condition other than presence did not hold in time
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Description of the awaited condition
        waited_for: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Element exists but lacks the requested attribute
    #[error("Element {selector} has no attribute {name:?}")]
    AttributeMissing {
        /// Selector of the element
        selector: String,
        /// Attribute name
        name: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Driver or page-level error
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CheckError {
    /// Create a format mismatch error
    #[must_use]
    pub fn format_mismatch(expected: impl Into<String>, input: impl Into<String>) -> Self {
        Self::FormatMismatch {
            expected: expected.into(),
            input: input.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is an expected-vs-actual disagreement
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::AssertionMismatch { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_message() {
        let err = CheckError::ElementNotFound {
            selector: "//*[@id=\"cart-total\"]".to_string(),
            timeout_ms: 10_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("cart-total"));
        assert!(msg.contains("10000ms"));
    }

    #[test]
    fn test_assertion_mismatch_reports_both_values() {
        let err = CheckError::AssertionMismatch {
            what: "cart value".to_string(),
            expected: "45.99".to_string(),
            actual: "45.98".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 45.99"));
        assert!(msg.contains("got 45.98"));
        assert!(err.is_assertion());
    }

    #[test]
    fn test_format_mismatch_quotes_input() {
        let err = CheckError::format_mismatch("a price", "N/A");
        assert_eq!(err.to_string(), "Format mismatch: expected a price, got \"N/A\"");
        assert!(!err.is_assertion());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CheckError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
