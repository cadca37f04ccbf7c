//! Expected-vs-actual checks.
//!
//! A failed check is an error, not a log line: it terminates the scenario
//! with [`CheckError::AssertionMismatch`].

use crate::result::{CheckError, CheckResult};
use std::fmt::Display;

/// Fail unless `expected == actual`
pub fn check_equal<T>(what: &str, expected: &T, actual: &T) -> CheckResult<()>
where
    T: PartialEq + Display + ?Sized,
{
    if expected == actual {
        tracing::debug!(what, %expected, "check passed");
        Ok(())
    } else {
        Err(mismatch(what, expected, actual))
    }
}

/// Fail unless `haystack` contains `needle`
pub fn check_contains(what: &str, haystack: &str, needle: &str) -> CheckResult<()> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(CheckError::AssertionMismatch {
            what: what.to_string(),
            expected: format!("text containing {needle:?}"),
            actual: format!("{haystack:?}"),
        })
    }
}

/// Fail unless `condition` holds
pub fn check_true(what: &str, condition: bool) -> CheckResult<()> {
    if condition {
        Ok(())
    } else {
        Err(mismatch(what, &true, &false))
    }
}

/// Build a mismatch error from two displayable values
#[must_use]
pub fn mismatch<T: Display + ?Sized>(what: &str, expected: &T, actual: &T) -> CheckError {
    CheckError::AssertionMismatch {
        what: what.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}
