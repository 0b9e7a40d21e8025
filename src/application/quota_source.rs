// Port for live quota lookups
use crate::domain::quota::QuotaValue;
use async_trait::async_trait;

#[async_trait]
pub trait QuotaSource: Send + Sync {
    /// Fetch the current value of a single quota by its provider-assigned code
    async fn get_quota(&self, code: &str) -> anyhow::Result<QuotaValue>;
}
