use async_trait::async_trait;
use healthdeck_api::{HealthClient, HealthError};
use healthdeck_types::HealthStatus;

/// Anything that can produce one health report per call.
///
/// The production implementation is [`HealthClient`]; tests substitute
/// scripted sources to control latency and outcomes.
#[async_trait]
pub trait HealthSource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<HealthStatus, HealthError>;
}

#[async_trait]
impl HealthSource for HealthClient {
    async fn fetch(&self) -> Result<HealthStatus, HealthError> {
        self.fetch_health().await
    }
}
