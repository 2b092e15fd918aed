//! Browser session management over the WebDriver protocol

use std::path::PathBuf;
use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, map::Map, Value};
use tracing::{debug, info};

use crate::error::{HarnessError, HarnessResult};

/// Chromium stability flags applied to every session. These match what
/// the Docker deployment runs with.
const CHROME_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-software-rasterizer",
    "--disable-extensions",
    "--disable-setuid-sandbox",
    "--disable-dev-tools",
    "--disable-background-networking",
    "--disable-default-apps",
    "--disable-sync",
    "--metrics-recording-only",
    "--mute-audio",
];

/// Configuration for the browser session
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// WebDriver endpoint (chromedriver)
    pub webdriver_url: String,

    /// Base URL of the webapp under test
    pub base_url: String,

    /// Browser window dimensions
    pub window_width: u32,
    pub window_height: u32,

    /// Run the browser headless
    pub headless: bool,

    /// Global implicit wait applied to element lookups
    pub implicit_wait: Duration,

    /// Fixed pause after navigation or form submission
    pub page_settle: Duration,

    /// Directory for diagnostic screenshots
    pub screenshot_dir: PathBuf,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            base_url: "http://webapp:8080".to_string(),
            window_width: 1920,
            window_height: 1080,
            headless: true,
            implicit_wait: Duration::from_secs(20),
            page_settle: Duration::from_secs(2),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
        }
    }
}

/// Build the W3C capabilities for a session: the fixed Chromium flag
/// set, the automation-extension opt-outs, and the implicit wait.
pub fn chrome_capabilities(config: &BrowserConfig) -> Map<String, Value> {
    let mut args: Vec<String> = Vec::new();
    if config.headless {
        args.push("--headless=new".to_string());
    }
    args.extend(CHROME_ARGS.iter().map(|arg| (*arg).to_string()));
    args.push(format!(
        "--window-size={},{}",
        config.window_width, config.window_height
    ));

    let mut caps = Map::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "args": args,
            "excludeSwitches": ["enable-logging"],
            "useAutomationExtension": false,
        }),
    );
    caps.insert(
        "timeouts".to_string(),
        json!({ "implicit": config.implicit_wait.as_millis() as u64 }),
    );
    caps
}

/// A live browser session, shared by every scenario in the suite
pub struct Session {
    client: Client,
    base_url: String,
    page_settle: Duration,
    screenshot_dir: PathBuf,
}

impl Session {
    /// Establish the WebDriver session. Failure here is fatal to the
    /// whole suite: there is no retry.
    pub async fn connect(config: &BrowserConfig) -> HarnessResult<Self> {
        std::fs::create_dir_all(&config.screenshot_dir)?;

        info!("Connecting to WebDriver at {}", config.webdriver_url);

        let client = ClientBuilder::native()
            .capabilities(chrome_capabilities(config))
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| {
                HarnessError::SessionStartup(format!(
                    "Failed to connect to {}: {}",
                    config.webdriver_url, e
                ))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            page_settle: config.page_settle,
            screenshot_dir: config.screenshot_dir.clone(),
        })
    }

    /// Navigate to the app home page, then let it settle.
    pub async fn open_home(&self) -> HarnessResult<()> {
        debug!("Navigating to {}", self.base_url);
        self.client.goto(&self.base_url).await?;
        tokio::time::sleep(self.page_settle).await;
        Ok(())
    }

    /// The configured settle pause, for scenarios that submit forms.
    pub fn settle(&self) -> Duration {
        self.page_settle
    }

    pub async fn page_title(&self) -> HarnessResult<String> {
        Ok(self.client.title().await?)
    }

    /// Find an element by id. A missing element is an assertion
    /// failure, not a transport error.
    pub async fn find_id(&self, id: &str) -> HarnessResult<Element> {
        match self.client.find(Locator::Id(id)).await {
            Ok(element) => Ok(element),
            Err(e) if e.is_no_such_element() => Err(HarnessError::AssertionFailed(format!(
                "element #{id} to be present"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Find an element by CSS selector.
    pub async fn find_css(&self, selector: &str) -> HarnessResult<Element> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(element) => Ok(element),
            Err(e) if e.is_no_such_element() => Err(HarnessError::AssertionFailed(format!(
                "element matching {selector:?} to be present"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Bounded polling wait for a selector to appear.
    pub async fn wait_for_css(&self, selector: &str, timeout: Duration) -> HarnessResult<Element> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .every(Duration::from_millis(250))
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(element) => Ok(element),
            Err(CmdError::WaitTimeout) => Err(HarnessError::WaitTimeout {
                what: format!("selector {selector:?}"),
                timeout_ms: timeout.as_millis() as u64,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Clear a form field and type a value into it.
    pub async fn fill(&self, id: &str, value: &str) -> HarnessResult<()> {
        let field = self.find_id(id).await?;
        field.clear().await?;
        field.send_keys(value).await?;
        Ok(())
    }

    /// Full-page screenshot written to the screenshot directory.
    pub async fn capture(&self, name: &str) -> HarnessResult<PathBuf> {
        let png = self.client.screenshot().await?;
        let path = self.screenshot_dir.join(format!("{name}.png"));
        std::fs::write(&path, png)?;
        info!("Screenshot saved to {}", path.display());
        Ok(path)
    }

    /// Terminate the browser session. The runner calls this
    /// unconditionally, whether scenarios passed or failed.
    pub async fn close(self) -> HarnessResult<()> {
        info!("Closing browser session");
        self.client.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn args_for(config: &BrowserConfig) -> Vec<String> {
        let caps = chrome_capabilities(config);
        caps["goog:chromeOptions"]["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test_case("--no-sandbox")]
    #[test_case("--disable-dev-shm-usage")]
    #[test_case("--disable-gpu")]
    #[test_case("--disable-extensions")]
    #[test_case("--disable-background-networking")]
    #[test_case("--mute-audio")]
    fn stability_flag_present(flag: &str) {
        let args = args_for(&BrowserConfig::default());
        assert!(args.iter().any(|a| a == flag), "missing {flag}");
    }

    #[test]
    fn headless_flag_follows_config() {
        let mut config = BrowserConfig::default();
        assert!(args_for(&config).iter().any(|a| a == "--headless=new"));

        config.headless = false;
        assert!(!args_for(&config).iter().any(|a| a == "--headless=new"));
    }

    #[test]
    fn window_size_comes_from_config() {
        let args = args_for(&BrowserConfig::default());
        assert!(args.iter().any(|a| a == "--window-size=1920,1080"));
    }

    #[test]
    fn implicit_wait_lands_in_timeouts() {
        let caps = chrome_capabilities(&BrowserConfig::default());
        assert_eq!(caps["timeouts"]["implicit"], 20_000);
    }

    #[test]
    fn automation_extension_disabled() {
        let caps = chrome_capabilities(&BrowserConfig::default());
        let opts = &caps["goog:chromeOptions"];
        assert_eq!(opts["useAutomationExtension"], false);
        assert_eq!(opts["excludeSwitches"][0], "enable-logging");
    }
}
