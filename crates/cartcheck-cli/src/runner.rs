//! The `run`, `list` and `config` commands.

use crate::commands::{ConfigArgs, DriverArg, ListArgs, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_list_json, render_list_text, OutputFormat, ProgressReporter};
use cartcheck::{
    MockStorefront, ProductId, Scenario, ScenarioId, StoreConfig, StoreDriver, StoreSession,
    StorefrontFixture, SuiteResults, TestHarness, TestSuite,
};
use std::path::Path;
use tracing::{info, warn};

/// Resolve the store configuration: file, then environment, then flags
pub fn resolve_store_config(
    path: Option<&Path>,
    use_env: bool,
    base_url: Option<&str>,
    timeout_ms: Option<u64>,
    headed: bool,
) -> CliResult<StoreConfig> {
    let mut config = match path {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if use_env {
        config = config.with_env_overrides()?;
    }
    if let Some(url) = base_url {
        config.base_url = url.to_string();
    }
    if let Some(ms) = timeout_ms {
        config.element_timeout_ms = ms;
    }
    if headed {
        config.browser.headless = false;
    }
    Ok(config.validate()?)
}

/// Build the suite the arguments select
pub fn select_suite(args: &RunArgs) -> CliResult<TestSuite> {
    let ids: &[ScenarioId] = if args.scenarios.is_empty() {
        &ScenarioId::ALL
    } else {
        &args.scenarios
    };
    let products: &[ProductId] = if args.products.is_empty() {
        &ProductId::ALL
    } else {
        &args.products
    };

    let mut suite = TestSuite::from_scenarios("storefront", Scenario::expand(ids, products));
    if let Some(ref pattern) = args.filter {
        suite = suite.filter(pattern);
    }
    if suite.is_empty() {
        return Err(CliError::invalid_argument("no scenario matches the selection"));
    }
    Ok(suite)
}

/// Run the selected scenarios and report them
pub fn run_scenarios(cli: &CliConfig, args: &RunArgs) -> CliResult<SuiteResults> {
    let store = resolve_store_config(
        args.config.as_deref(),
        true,
        args.base_url.as_deref(),
        args.timeout,
        args.headed,
    )?;
    let suite = select_suite(args)?;
    let mut harness = TestHarness::new();
    if args.fail_fast {
        harness = harness.with_fail_fast();
    }

    let format = OutputFormat::from(args.format);
    let mut reporter = ProgressReporter::new(
        cli.color.should_color(),
        cli.verbosity.is_quiet() || format == OutputFormat::Json,
    );
    reporter.header(&format!("{} scenarios against {}", suite.len(), store.base_url));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let results = runtime.block_on(async {
        match args.driver {
            DriverArg::Mock => {
                let driver = MockStorefront::new(&store);
                drive(driver, store, &suite, &harness, &mut reporter).await
            }
            DriverArg::Chromium => launch_chromium(store, &suite, &harness, &mut reporter).await,
        }
    })?;

    reporter.finish();
    match format {
        OutputFormat::Text => reporter.summary(&results),
        OutputFormat::Json => println!("{}", json_report(&results)?),
    }
    if let Some(ref path) = args.report {
        std::fs::write(path, json_report(&results)?)?;
        info!(path = %path.display(), "report written");
    }
    Ok(results)
}

#[cfg(feature = "browser")]
async fn launch_chromium(
    store: StoreConfig,
    suite: &TestSuite,
    harness: &TestHarness,
    reporter: &mut ProgressReporter,
) -> CliResult<SuiteResults> {
    let driver = cartcheck::ChromiumDriver::launch(&store.browser).await?;
    drive(driver, store, suite, harness, reporter).await
}

#[cfg(not(feature = "browser"))]
async fn launch_chromium(
    _store: StoreConfig,
    _suite: &TestSuite,
    _harness: &TestHarness,
    _reporter: &mut ProgressReporter,
) -> CliResult<SuiteResults> {
    Err(CliError::config(
        "browser support not enabled. Rebuild with --features browser or use --driver mock",
    ))
}

async fn drive<D: StoreDriver>(
    driver: D,
    store: StoreConfig,
    suite: &TestSuite,
    harness: &TestHarness,
    reporter: &mut ProgressReporter,
) -> CliResult<SuiteResults> {
    let mut session = StoreSession::new(driver, store);
    session.navigate_home().await?;

    reporter.start_progress(suite.len() as u64, &suite.name);
    let results = harness
        .run_with(
            &mut session,
            &mut StorefrontFixture::new(),
            suite,
            |result| reporter.on_result(result),
        )
        .await;

    if let Err(e) = session.close().await {
        warn!(error = %e, "closing the browser failed");
    }
    Ok(results)
}

fn json_report(results: &SuiteResults) -> CliResult<String> {
    results
        .to_json()
        .map_err(|e| CliError::report_generation(e.to_string()))
}

/// Print the scenario catalog
pub fn list_scenarios(args: &ListArgs) -> CliResult<()> {
    let products: &[ProductId] = if args.products.is_empty() {
        &ProductId::ALL
    } else {
        &args.products
    };
    let scenarios = Scenario::expand(&ScenarioId::ALL, products);
    match OutputFormat::from(args.format) {
        OutputFormat::Text => print!("{}", render_list_text(&scenarios)),
        OutputFormat::Json => println!(
            "{}",
            render_list_json(&scenarios).map_err(|e| CliError::report_generation(e.to_string()))?
        ),
    }
    Ok(())
}

/// Print the resolved configuration
pub fn show_config(args: &ConfigArgs) -> CliResult<()> {
    let store = resolve_store_config(args.config.as_deref(), !args.no_env, None, None, false)?;
    print!("{}", store.to_yaml()?);
    Ok(())
}
