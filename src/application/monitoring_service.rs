// Monitoring service - Fetch quotas, generate the dashboard and alarms, push them
use crate::application::alarm_generator::AlarmGenerator;
use crate::application::dashboard_generator::DashboardGenerator;
use crate::application::monitoring_sink::MonitoringSink;
use crate::application::quota_source::QuotaSource;
use crate::domain::error::MonitorError;
use crate::domain::plan::{dashboard_url, MonitoringOutputs, MonitoringPlan};
use crate::domain::quota::{group_by_model, QuotaRegistry, ResolvedQuota};
use anyhow::Context;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub topic_name: String,
    pub display_name: String,
    pub emails: Vec<String>,
}

#[derive(Clone)]
pub struct MonitoringService {
    registry: QuotaRegistry,
    quota_source: Arc<dyn QuotaSource>,
    dashboards: DashboardGenerator,
    alarms: AlarmGenerator,
    dashboard_name: String,
    region: String,
    notifications: NotificationSettings,
}

impl MonitoringService {
    pub fn new(
        registry: QuotaRegistry,
        quota_source: Arc<dyn QuotaSource>,
        dashboards: DashboardGenerator,
        alarms: AlarmGenerator,
        dashboard_name: String,
        region: String,
        notifications: NotificationSettings,
    ) -> Self {
        Self {
            registry,
            quota_source,
            dashboards,
            alarms,
            dashboard_name,
            region,
            notifications,
        }
    }

    /// Fetch every registered quota and derive the complete plan.
    /// Any failure aborts the pass; a partial plan is never returned.
    pub async fn plan(&self) -> anyhow::Result<MonitoringPlan> {
        let quota_values = self.fetch_quotas().await?;
        let groups = group_by_model(&quota_values);

        let dashboard = self.dashboards.generate(&groups)?;
        let alarms = self.alarms.generate(&quota_values);

        tracing::info!(
            "Generated {} widgets for {} models and {} alarms",
            dashboard.widgets.len(),
            groups.len(),
            alarms.len()
        );

        Ok(MonitoringPlan {
            dashboard_name: self.dashboard_name.clone(),
            dashboard_url: dashboard_url(&self.region, &self.dashboard_name),
            dashboard,
            alarms,
            quota_values,
        })
    }

    /// Generate the plan, then create or update the topic, dashboard and alarms.
    pub async fn apply(&self, sink: &dyn MonitoringSink) -> anyhow::Result<MonitoringOutputs> {
        let plan = self.plan().await?;
        let body = plan
            .dashboard
            .to_json()
            .context("Failed to serialize dashboard body")?;

        let topic_arn = sink
            .ensure_topic(&self.notifications.topic_name, &self.notifications.display_name)
            .await?;
        tracing::info!("Using notification topic {}", topic_arn);

        let mut subscriptions = Vec::with_capacity(self.notifications.emails.len());
        for email in &self.notifications.emails {
            subscriptions.push(sink.subscribe_email(&topic_arn, email).await?);
        }

        sink.put_dashboard(&plan.dashboard_name, &body).await?;
        tracing::info!("Dashboard {} updated", plan.dashboard_name);

        try_join_all(plan.alarms.iter().map(|alarm| sink.put_alarm(alarm, &topic_arn))).await?;
        tracing::info!("{} alarms updated", plan.alarms.len());

        Ok(MonitoringOutputs {
            dashboard_url: plan.dashboard_url.clone(),
            alarm_names: plan.alarm_names(),
            quota_values: plan.quota_values,
            topic_arn,
            subscriptions,
        })
    }

    async fn fetch_quotas(&self) -> anyhow::Result<Vec<ResolvedQuota>> {
        let lookups = self
            .registry
            .codes()
            .map(|code| self.quota_source.get_quota(code));
        let values = try_join_all(lookups).await?;

        let mut resolved = Vec::with_capacity(values.len());
        for value in values {
            tracing::debug!("Quota {} ({}) = {}", value.code, value.name, value.value);
            resolved.push(self.registry.resolve(value)?);
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for quota in &resolved {
            *seen.entry(quota.quota_code.as_str()).or_default() += 1;
        }
        for code in self.registry.codes() {
            if seen.get(code) != Some(&1) {
                return Err(MonitorError::UnresolvedQuota {
                    code: code.to_string(),
                }
                .into());
            }
        }

        Ok(resolved)
    }
}
