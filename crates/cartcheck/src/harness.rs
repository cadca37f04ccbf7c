//! Test harness for running scenario suites.

use crate::driver::StoreDriver;
use crate::fixture::Fixture;
use crate::scenario::{self, Scenario};
use crate::session::StoreSession;
use serde::{Deserialize, Serialize, Serializer};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// A named, ordered list of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    /// Suite name
    pub name: String,
    /// Scenarios in run order
    pub scenarios: Vec<Scenario>,
}

impl TestSuite {
    /// Create an empty suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenarios: Vec::new(),
        }
    }

    /// Create a suite from a run list
    #[must_use]
    pub fn from_scenarios(name: impl Into<String>, scenarios: Vec<Scenario>) -> Self {
        Self {
            name: name.into(),
            scenarios,
        }
    }

    /// Add a scenario
    pub fn add(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    /// Keep only scenarios whose name contains `pattern`
    #[must_use]
    pub fn filter(mut self, pattern: &str) -> Self {
        self.scenarios.retain(|s| s.name().contains(pattern));
        self
    }

    /// Number of scenarios
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the suite is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Where a failing scenario stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Fixture setup
    Setup,
    /// The scenario body
    Scenario,
    /// Fixture teardown
    Teardown,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Scenario name
    pub name: String,
    /// Whether the scenario passed
    pub passed: bool,
    /// Phase that failed
    pub phase: Option<Phase>,
    /// Error message if failed
    pub error: Option<String>,
    /// Whether the failure was an expected-vs-actual mismatch
    pub assertion: bool,
    /// Scenario duration
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl TestResult {
    /// Create a passing result
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            phase: None,
            error: None,
            assertion: false,
            duration: Duration::ZERO,
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn fail(name: impl Into<String>, phase: Phase, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            phase: Some(phase),
            error: Some(error.into()),
            assertion: false,
            duration: Duration::ZERO,
        }
    }

    /// Mark the failure as an assertion mismatch
    #[must_use]
    pub const fn with_assertion(mut self, assertion: bool) -> Self {
        self.assertion = assertion;
        self
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Results from running a suite
#[derive(Debug, Clone, Serialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual results
    pub results: Vec<TestResult>,
    /// Scenarios not run because of fail-fast
    pub skipped: usize,
    /// Total duration
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl SuiteResults {
    /// Check if all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.skipped == 0 && self.results.iter().all(|r| r.passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Get total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Test harness for running suites
#[derive(Debug, Default)]
pub struct TestHarness {
    /// Whether to stop on first failure
    pub fail_fast: bool,
}

impl TestHarness {
    /// Create a new test harness
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Run a suite
    pub async fn run<D, F>(
        &self,
        session: &mut StoreSession<D>,
        fixture: &mut F,
        suite: &TestSuite,
    ) -> SuiteResults
    where
        D: StoreDriver,
        F: Fixture<D>,
    {
        self.run_with(session, fixture, suite, |_| {}).await
    }

    /// Run a suite, reporting each result as it completes
    pub async fn run_with<D, F, R>(
        &self,
        session: &mut StoreSession<D>,
        fixture: &mut F,
        suite: &TestSuite,
        mut on_result: R,
    ) -> SuiteResults
    where
        D: StoreDriver,
        F: Fixture<D>,
        R: FnMut(&TestResult),
    {
        let start = Instant::now();
        let mut results = Vec::with_capacity(suite.len());
        info!(suite = %suite.name, scenarios = suite.len(), fixture = fixture.name(), "suite started");

        for scenario in &suite.scenarios {
            let result = Self::run_one(session, fixture, scenario).await;
            on_result(&result);
            let stop = self.fail_fast && !result.passed;
            results.push(result);
            if stop {
                warn!("fail-fast: stopping after first failure");
                break;
            }
        }

        let skipped = suite.len() - results.len();
        let summary = SuiteResults {
            suite_name: suite.name.clone(),
            results,
            skipped,
            duration: start.elapsed(),
        };
        info!(
            passed = summary.passed_count(),
            failed = summary.failed_count(),
            skipped,
            "suite finished"
        );
        summary
    }

    async fn run_one<D, F>(
        session: &mut StoreSession<D>,
        fixture: &mut F,
        scenario: &Scenario,
    ) -> TestResult
    where
        D: StoreDriver,
        F: Fixture<D>,
    {
        let name = scenario.name();
        let start = Instant::now();

        if let Err(e) = fixture.setup(session).await {
            error!(scenario = %name, error = %e, "setup failed");
            return TestResult::fail(name, Phase::Setup, e.to_string())
                .with_assertion(e.is_assertion())
                .with_duration(start.elapsed());
        }

        let outcome = scenario::run(session, scenario).await;
        let teardown = fixture.teardown(session).await;

        let result = match (outcome, teardown) {
            (Ok(()), Ok(())) => TestResult::pass(&name),
            (Ok(()), Err(e)) => TestResult::fail(&name, Phase::Teardown, e.to_string()),
            (Err(e), teardown) => {
                if let Err(t) = teardown {
                    warn!(scenario = %name, error = %t, "teardown failed after scenario failure");
                }
                TestResult::fail(&name, Phase::Scenario, e.to_string())
                    .with_assertion(e.is_assertion())
            }
        }
        .with_duration(start.elapsed());

        if result.passed {
            info!(scenario = %name, ?result.duration, "passed");
        } else {
            error!(scenario = %name, error = result.error.as_deref().unwrap_or_default(), "failed");
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::catalog::ProductId;
    use crate::scenario::ScenarioId;

    mod suite_tests {
        use super::*;

        #[test]
        fn test_filter_by_name() {
            let suite = TestSuite::from_scenarios("all", Scenario::all()).filter("product=3");
            assert_eq!(suite.len(), 8);
            assert!(suite.scenarios.iter().all(|s| s.product == Some(ProductId::ALL[2])));
        }

        #[test]
        fn test_add() {
            let mut suite = TestSuite::new("one");
            assert!(suite.is_empty());
            suite.add(Scenario::catalog(ScenarioId::QuantityAndValueAddition));
            assert_eq!(suite.len(), 1);
        }
    }

    mod results_tests {
        use super::*;

        fn results() -> SuiteResults {
            SuiteResults {
                suite_name: "s".to_string(),
                results: vec![
                    TestResult::pass("a").with_duration(Duration::from_millis(1500)),
                    TestResult::fail("b", Phase::Scenario, "expected 1, got 2").with_assertion(true),
                ],
                skipped: 0,
                duration: Duration::from_secs(2),
            }
        }

        #[test]
        fn test_counts() {
            let results = results();
            assert!(!results.all_passed());
            assert_eq!(results.passed_count(), 1);
            assert_eq!(results.failed_count(), 1);
            assert_eq!(results.total(), 2);
            assert_eq!(results.failures()[0].name, "b");
        }

        #[test]
        fn test_skipped_is_not_a_pass() {
            let results = SuiteResults {
                suite_name: "s".to_string(),
                results: vec![TestResult::pass("a")],
                skipped: 3,
                duration: Duration::ZERO,
            };
            assert!(!results.all_passed());
        }

        #[test]
        fn test_json_report() {
            let json: serde_json::Value =
                serde_json::from_str(&results().to_json().unwrap()).unwrap();
            assert_eq!(json["duration_ms"], 2000);
            assert_eq!(json["results"][0]["duration_ms"], 1500);
            assert_eq!(json["results"][1]["phase"], "scenario");
            assert_eq!(json["results"][1]["assertion"], true);
        }
    }
}
