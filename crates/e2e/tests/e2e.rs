//! E2E harness entry point
//!
//! Standalone test binary (no libtest harness) that runs the fixed
//! scenario suite against a live webapp and chromedriver.
//! Run with: cargo test --package expense-e2e --test e2e

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use expense_e2e::browser::BrowserConfig;
use expense_e2e::runner::{RunnerConfig, TestRunner};
use expense_e2e::HarnessResult;

#[derive(Parser, Debug)]
#[command(name = "expense-e2e")]
#[command(about = "E2E test harness for the Expense Tracker webapp")]
struct Args {
    /// WebDriver endpoint (chromedriver)
    #[arg(long, default_value = "http://localhost:9515")]
    webdriver: String,

    /// Base URL of the webapp under test
    #[arg(long, default_value = "http://webapp:8080")]
    base_url: String,

    /// Run the browser headless
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    headless: bool,

    /// Browser window width
    #[arg(long, default_value_t = 1920)]
    window_width: u32,

    /// Browser window height
    #[arg(long, default_value_t = 1080)]
    window_height: u32,

    /// Global implicit wait, in seconds
    #[arg(long, default_value_t = 20)]
    implicit_wait_secs: u64,

    /// Pause after navigation or form submission, in seconds
    #[arg(long, default_value_t = 2)]
    settle_secs: u64,

    /// How long to wait for the webapp to come up, in seconds
    #[arg(long, default_value_t = 30)]
    app_timeout_secs: u64,

    /// Directory for diagnostic screenshots
    #[arg(long, default_value = "test-results/screenshots")]
    screenshot_dir: PathBuf,

    /// Output directory for the results file
    #[arg(short, long, default_value = "test-results")]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    match rt.block_on(async_main(args)) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn async_main(args: Args) -> HarnessResult<bool> {
    let config = RunnerConfig {
        browser: BrowserConfig {
            webdriver_url: args.webdriver,
            base_url: args.base_url,
            headless: args.headless,
            window_width: args.window_width,
            window_height: args.window_height,
            implicit_wait: Duration::from_secs(args.implicit_wait_secs),
            page_settle: Duration::from_secs(args.settle_secs),
            screenshot_dir: args.screenshot_dir,
        },
        app_startup_timeout: Duration::from_secs(args.app_timeout_secs),
        output_dir: args.output,
    };

    let runner = TestRunner::with_config(config);

    let results = runner.run_all().await?;
    runner.write_results(&results)?;

    Ok(results.all_passed())
}
