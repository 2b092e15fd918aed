//! Suite orchestration: session lifecycle and fixed-order scenario execution

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::browser::{BrowserConfig, Session};
use crate::error::HarnessResult;
use crate::scenario::{Scenario, ScenarioResult};
use crate::webapp;

/// Result of running the whole suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl SuiteResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub browser: BrowserConfig,

    /// How long to wait for the webapp to come up
    pub app_startup_timeout: Duration,

    /// Output directory for the results file
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            app_startup_timeout: Duration::from_secs(30),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Drives the fixed scenario sequence against one browser session
pub struct TestRunner {
    config: RunnerConfig,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run every scenario in order. A session startup failure aborts
    /// the suite; a scenario failure is recorded and the suite moves
    /// on. The browser session is closed unconditionally.
    pub async fn run_all(&self) -> HarnessResult<SuiteResult> {
        let start = Instant::now();

        webapp::wait_until_ready(&self.config.browser.base_url, self.config.app_startup_timeout)
            .await?;
        let session = Session::connect(&self.config.browser).await?;

        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        info!("Running {} scenario(s)...", Scenario::ALL.len());

        for scenario in Scenario::ALL {
            let result = run_scenario(&session, scenario).await;
            if result.passed {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        // Teardown runs whether scenarios passed or failed
        if let Err(e) = session.close().await {
            error!("Failed to close browser session: {}", e);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(SuiteResult {
            total: Scenario::ALL.len(),
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    /// Write the machine-readable suite results to JSON.
    pub fn write_results(&self, results: &SuiteResult) -> HarnessResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("e2e-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_scenario(session: &Session, scenario: Scenario) -> ScenarioResult {
    let start = Instant::now();
    info!("=== Running {} ===", scenario.name());

    // Per-scenario setup: a fresh navigation to the home page
    let outcome = match session.open_home().await {
        Ok(()) => scenario.run(session).await,
        Err(e) => Err(e),
    };

    ScenarioResult {
        name: scenario.name().to_string(),
        passed: outcome.is_ok(),
        duration_ms: start.elapsed().as_millis() as u64,
        error: outcome.err().map(|e| e.to_string()),
    }
}
