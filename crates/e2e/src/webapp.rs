//! Target application readiness - polling the webapp until it answers

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{HarnessError, HarnessResult};

/// Poll the webapp base URL until it responds with a success status,
/// so the browser never races app startup.
pub async fn wait_until_ready(base_url: &str, timeout_duration: Duration) -> HarnessResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let start = std::time::Instant::now();
    let mut attempts = 0;

    while start.elapsed() < timeout_duration {
        attempts += 1;

        match client.get(base_url).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("Webapp is ready at {}", base_url);
                return Ok(());
            }
            Ok(resp) => {
                warn!("Readiness probe returned {}", resp.status());
            }
            Err(e) => {
                if attempts == 1 {
                    info!("Waiting for webapp at {}...", base_url);
                }
                // Connection refused is expected while the app is starting
                if !e.is_connect() {
                    warn!("Readiness probe error: {}", e);
                }
            }
        }

        sleep(Duration::from_millis(100)).await;
    }

    Err(HarnessError::AppHealthCheck(attempts))
}
