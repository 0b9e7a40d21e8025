// Results of one generation pass and of applying it
use super::alarm::AlarmDefinition;
use super::dashboard::DashboardBody;
use super::quota::ResolvedQuota;
use serde::Serialize;

/// Everything a pass produces before any resource is touched.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringPlan {
    pub dashboard_name: String,
    pub dashboard_url: String,
    pub dashboard: DashboardBody,
    pub alarms: Vec<AlarmDefinition>,
    pub quota_values: Vec<ResolvedQuota>,
}

impl MonitoringPlan {
    pub fn alarm_names(&self) -> Vec<String> {
        self.alarms.iter().map(|a| a.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringOutputs {
    pub dashboard_url: String,
    pub quota_values: Vec<ResolvedQuota>,
    pub alarm_names: Vec<String>,
    pub topic_arn: String,
    pub subscriptions: Vec<String>,
}

pub fn dashboard_url(region: &str, dashboard_name: &str) -> String {
    format!(
        "https://{region}.console.aws.amazon.com/cloudwatch/home?region={region}#dashboards:name={}",
        urlencoding::encode(dashboard_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_url() {
        assert_eq!(
            dashboard_url("us-west-2", "BedrockQuotaDash"),
            "https://us-west-2.console.aws.amazon.com/cloudwatch/home?region=us-west-2#dashboards:name=BedrockQuotaDash"
        );
        assert!(dashboard_url("us-east-1", "Quota Dash").ends_with("name=Quota%20Dash"));
    }
}
