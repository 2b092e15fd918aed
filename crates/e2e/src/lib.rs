//! Expense Tracker E2E Harness
//!
//! This crate drives a headless Chromium browser over the WebDriver
//! protocol against the live Expense Tracker webapp:
//! - Polls the webapp over HTTP until it answers
//! - Opens one configured browser session for the whole suite
//! - Runs the fixed scenarios in order
//! - Closes the session unconditionally and reports per-scenario results
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  E2E Harness (Rust)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── webapp::wait_until_ready(base_url)                   │
//! │    ├── Session::connect(BrowserConfig) -> Session           │
//! │    ├── Scenario::ALL, run in lexical-name order             │
//! │    │     ├── 01_page_structure                              │
//! │    │     └── 02_add_expense (screenshot on failure)         │
//! │    └── Session::close() -- always, pass or fail             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  chromedriver ── headless Chromium ── http://webapp:8080    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod browser;
pub mod error;
pub mod runner;
pub mod scenario;
pub mod webapp;

pub use browser::{BrowserConfig, Session};
pub use error::{HarnessError, HarnessResult};
pub use runner::TestRunner;
