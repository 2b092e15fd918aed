//! The fixed scenarios run against the live application

use std::time::Duration;

use chrono::Local;
use fantoccini::Locator;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::browser::Session;
use crate::error::{HarnessError, HarnessResult};

const PAGE_HEADING: &str = "Expense Tracker";
const ADD_LABEL: &str = "Add";

/// Bounded wait for the first expense row to appear after submission.
const ROW_WAIT: Duration = Duration::from_secs(10);

/// Ids of the form fields the page must expose, in form order.
pub const FORM_FIELD_IDS: [&str; 4] = ["title", "amount", "category", "date"];

/// The suite's scenarios. `ALL` lists them in execution order, which
/// equals lexical order of their names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    PageStructure,
    AddExpense,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::PageStructure, Scenario::AddExpense];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::PageStructure => "01_page_structure",
            Scenario::AddExpense => "02_add_expense",
        }
    }

    pub async fn run(self, session: &Session) -> HarnessResult<()> {
        match self {
            Scenario::PageStructure => page_structure(session).await,
            Scenario::AddExpense => add_expense(session).await,
        }
    }
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub passed: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Today's date the way the date input expects it.
pub fn today_iso() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

fn ensure(cond: bool, expected: &str) -> HarnessResult<()> {
    if cond {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed(expected.to_string()))
    }
}

/// Scenario 1: the page loads with its title, heading, form fields,
/// add button, and expense table all present.
async fn page_structure(session: &Session) -> HarnessResult<()> {
    let title = session.page_title().await?;
    ensure(
        title.contains(PAGE_HEADING),
        &format!("page title to contain {PAGE_HEADING:?}, got {title:?}"),
    )?;
    info!("✓ page title verified");

    let heading = session.find_css("h1").await?.text().await?;
    ensure(
        heading == PAGE_HEADING,
        &format!("heading text to equal {PAGE_HEADING:?}, got {heading:?}"),
    )?;
    info!("✓ main heading found");

    for id in FORM_FIELD_IDS {
        session.find_id(id).await?;
        info!("✓ {} input field found", id);
    }

    let label = session.find_id("addBtn").await?.text().await?;
    ensure(
        label == ADD_LABEL,
        &format!("add button label to equal {ADD_LABEL:?}, got {label:?}"),
    )?;
    info!("✓ add button found");

    session.find_css("table").await?;
    info!("✓ expense table found");

    Ok(())
}

/// Scenario 2: submitting the form adds a row to the expense table and
/// updates the stats region.
async fn add_expense(session: &Session) -> HarnessResult<()> {
    session.fill("title", "Test Coffee").await?;
    info!("✓ entered title: Test Coffee");

    session.fill("amount", "5.50").await?;
    info!("✓ entered amount: 5.50");

    session.fill("category", "Food").await?;
    info!("✓ entered category: Food");

    let today = today_iso();
    session.fill("date", &today).await?;
    info!("✓ entered date: {}", today);

    session.find_id("addBtn").await?.click().await?;
    info!("✓ clicked add button");

    tokio::time::sleep(session.settle()).await;

    // Any failure past this point gets a diagnostic screenshot before
    // the error propagates.
    match verify_expense_added(session).await {
        Ok(()) => Ok(()),
        Err(err) => {
            if let Err(shot_err) = session.capture("add_expense_failure").await {
                warn!("Could not capture diagnostic screenshot: {}", shot_err);
            }
            Err(err)
        }
    }
}

async fn verify_expense_added(session: &Session) -> HarnessResult<()> {
    session.wait_for_css("#tbody tr", ROW_WAIT).await?;

    let tbody = session.find_id("tbody").await?;
    let rows = tbody.find_all(Locator::Css("tr")).await?;
    ensure(!rows.is_empty(), "at least one expense row in the table")?;
    info!("✓ found {} expense row(s)", rows.len());

    let cells = rows[0].find_all(Locator::Css("td")).await?;
    ensure(
        cells.len() >= 3,
        &format!("first row to have at least 3 cells, got {}", cells.len()),
    )?;

    let expectations = [
        ("title", "Test Coffee"),
        ("amount", "5.50"),
        ("category", "Food"),
    ];
    for (idx, (what, needle)) in expectations.iter().enumerate() {
        let text = cells[idx].text().await?;
        ensure(
            text.contains(needle),
            &format!("first row {what} cell to contain {needle:?}, got {text:?}"),
        )?;
        info!("✓ {} verified: {}", what, text);
    }

    let stats = session.find_id("stats").await?.text().await?;
    ensure(
        stats.contains("Total:"),
        &format!("stats text to contain \"Total:\", got {stats:?}"),
    )?;
    info!("✓ stats section updated: {}", stats);

    Ok(())
}
