//! Fleet registry HTTP client.

use std::time::Duration;

use medfleet_core::Drone;
use reqwest::Client;

/// HTTP client for the fleet capability registry.
///
/// The registry is an availability-first dependency: any transport or decode
/// failure degrades to an empty fleet so planning and selection proceed on
/// that basis instead of erroring out.
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    fn drones_url(&self) -> String {
        format!("{}/drones", self.base_url.trim_end_matches('/'))
    }

    /// Fetch the drone capability list, or an empty fleet on any failure.
    pub async fn fetch_drones(&self) -> Vec<Drone> {
        let url = self.drones_url();
        match self.try_fetch(&url).await {
            Ok(drones) => {
                tracing::debug!("Registry returned {} drones", drones.len());
                drones
            }
            Err(err) => {
                tracing::warn!("Fleet registry fetch failed ({}): {}", url, err);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<Drone>, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Drone>>()
            .await
    }
}
