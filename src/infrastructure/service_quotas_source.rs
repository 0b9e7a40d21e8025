// Service Quotas adapter for live quota lookups
use crate::application::quota_source::QuotaSource;
use crate::domain::error::MonitorError;
use crate::domain::quota::QuotaValue;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_servicequotas::types::ServiceQuota;
use aws_sdk_servicequotas::Client;

#[derive(Debug, Clone)]
pub struct ServiceQuotasSource {
    client: Client,
    service_code: String,
}

impl ServiceQuotasSource {
    pub fn new(client: Client, service_code: String) -> Self {
        Self {
            client,
            service_code,
        }
    }
}

/// The code echoed back by the provider wins over the requested one,
/// so a mismatch surfaces as an unregistered quota during resolution.
fn to_quota_value(requested: &str, quota: &ServiceQuota) -> Result<QuotaValue, MonitorError> {
    let value = quota.value().ok_or_else(|| MonitorError::MissingQuotaField {
        code: requested.to_string(),
        field: "value",
    })?;

    let code = quota.quota_code().unwrap_or(requested);
    let name = quota.quota_name().unwrap_or(code);

    Ok(QuotaValue::new(code, name, value))
}

#[async_trait]
impl QuotaSource for ServiceQuotasSource {
    async fn get_quota(&self, code: &str) -> Result<QuotaValue> {
        tracing::debug!("Fetching quota {} for service {}", code, self.service_code);

        let output = self
            .client
            .get_service_quota()
            .service_code(&self.service_code)
            .quota_code(code)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to fetch quota {} for service {}",
                    code, self.service_code
                )
            })?;

        let quota = output.quota().ok_or_else(|| MonitorError::MissingQuotaField {
            code: code.to_string(),
            field: "quota",
        })?;

        Ok(to_quota_value(code, quota)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_quota_value() {
        let quota = ServiceQuota::builder()
            .quota_code("L-616A3F5B")
            .quota_name("On-demand model inference requests per minute for Anthropic Claude 3 Haiku")
            .value(1000.0)
            .build();

        let value = to_quota_value("L-616A3F5B", &quota).unwrap();
        assert_eq!(value.code, "L-616A3F5B");
        assert_eq!(value.value, 1000.0);
        assert!(value.name.starts_with("On-demand"));
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let quota = ServiceQuota::builder().quota_code("L-616A3F5B").build();

        assert_eq!(
            to_quota_value("L-616A3F5B", &quota),
            Err(MonitorError::MissingQuotaField {
                code: "L-616A3F5B".to_string(),
                field: "value",
            })
        );
    }

    #[test]
    fn test_echoed_code_wins() {
        let quota = ServiceQuota::builder().quota_code("L-OTHER").value(5.0).build();

        let value = to_quota_value("L-616A3F5B", &quota).unwrap();
        assert_eq!(value.code, "L-OTHER");
        assert_eq!(value.name, "L-OTHER");
    }
}
