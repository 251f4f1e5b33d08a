//! Service health polling.
//!
//! An administrator-only view: consumers must pass
//! [`crate::guard::require_elevated`] before wiring a poller up. The poller
//! itself is deliberately simple - a fixed-interval read-only query with a
//! "log and keep polling" posture. There is no retry logic beyond the next
//! tick and no cancellation beyond teardown of the shutdown channel.

use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, warn};
use url::Url;

use crate::error::ClientError;

use super::auth::{check, endpoint};

/// Reported state of one microservice.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    /// Service name.
    pub name: String,
    /// Reported status string (e.g. `"running"`).
    pub status: String,
    /// Exposed port.
    pub port: String,
    /// Container id or name.
    pub container: String,
    /// Container image.
    #[serde(default)]
    pub image: String,
}

/// One health snapshot across all portal services.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthReport {
    /// Per-service states.
    pub services: Vec<ServiceStatus>,
    /// Server-side timestamp of the snapshot.
    #[serde(default)]
    pub timestamp: String,
}

/// Repeating health poller over the users service.
pub struct HealthPoller {
    http: reqwest::Client,
    users_url: Url,
    interval: std::time::Duration,
    latest: watch::Sender<Option<HealthReport>>,
}

impl HealthPoller {
    /// Create a poller with the given interval.
    #[must_use]
    pub fn new(http: reqwest::Client, users_url: Url, interval: std::time::Duration) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            http,
            users_url,
            interval,
            latest,
        }
    }

    /// Observer handle over the latest report.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<HealthReport>> {
        self.latest.subscribe()
    }

    /// Fetch one health snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`]/[`ClientError::Api`] on failure.
    pub async fn fetch(&self) -> Result<HealthReport, ClientError> {
        let url = endpoint(&self.users_url, "health")?;
        let response = self.http.get(url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Poll until the shutdown channel fires.
    ///
    /// The first tick is immediate. A failed poll is logged and the loop
    /// keeps going; the latest successful report stays published for
    /// subscribers until a newer one lands.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.fetch().await {
                        Ok(report) => {
                            debug!(services = report.services.len(), "health snapshot");
                            self.latest.send_replace(Some(report));
                        }
                        Err(e) => {
                            warn!(error = %e, "health poll failed; will retry on next tick");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    debug!("health poller shutting down");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_wire_shape() {
        let json = serde_json::json!({
            "services": [
                {
                    "name": "users-api",
                    "status": "running",
                    "port": "8083",
                    "container": "campus-users",
                    "image": "campus/users:latest",
                },
            ],
            "timestamp": "2026-08-30T12:00:00Z",
        });
        let report: HealthReport = serde_json::from_value(json).expect("deserialize");
        assert_eq!(report.services.len(), 1);
        let first = report.services.first().expect("one service");
        assert_eq!(first.name, "users-api");
        assert_eq!(first.status, "running");
    }

    #[tokio::test]
    async fn test_poller_stops_on_shutdown() {
        let poller = HealthPoller::new(
            reqwest::Client::new(),
            Url::parse("http://localhost:1").expect("url"),
            std::time::Duration::from_secs(3600),
        );
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { poller.run(rx).await });
        tx.send(true).expect("signal shutdown");
        handle.await.expect("poller task ends");
    }
}
