use crate::application::dashboard_generator::DashboardLayout;
use crate::application::monitoring_service::NotificationSettings;
use crate::domain::alarm::ThresholdTier;
use crate::domain::error::MonitorError;
use crate::domain::metric::MetricSource;
use crate::domain::quota::{QuotaDefinition, QuotaRegistry};
use serde::Deserialize;

pub const DEFAULT_CONFIG: &str = "config/monitoring";
const ENV_PREFIX: &str = "QUOTA_MONITOR";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MonitorConfig {
    #[serde(default)]
    pub aws: AwsSettings,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub alarms: AlarmsConfig,
    #[serde(default)]
    pub quotas: Vec<QuotaConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub service_code: String,
    pub namespace: String,
    pub dimension: String,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            region: None,
            service_code: "bedrock".to_string(),
            namespace: "AWS/Bedrock".to_string(),
            dimension: "ModelId".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationConfig {
    pub topic_name: String,
    pub display_name: String,
    pub emails: Vec<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            topic_name: "bedrock-quota-alarm-topic".to_string(),
            display_name: "Bedrock Quota Alarm Notifications".to_string(),
            emails: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub name: String,
    pub widget_width: u32,
    pub widget_height: u32,
    pub time_series_period: u32,
    pub peak_stat: String,
    pub peak_period: u32,
    pub daily_period: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let layout = DashboardLayout::default();
        Self {
            name: "BedrockQuotaDash".to_string(),
            widget_width: layout.widget_width,
            widget_height: layout.widget_height,
            time_series_period: layout.time_series_period,
            peak_stat: layout.peak_stat,
            peak_period: layout.peak_period,
            daily_period: layout.daily_period,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AlarmsConfig {
    pub tiers: Vec<TierConfig>,
}

impl Default for AlarmsConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                TierConfig::from(ThresholdTier::warning()),
                TierConfig::from(ThresholdTier::critical()),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TierConfig {
    pub severity: String,
    pub percentage: f64,
    pub period_seconds: u32,
}

impl From<ThresholdTier> for TierConfig {
    fn from(tier: ThresholdTier) -> Self {
        Self {
            severity: tier.severity,
            percentage: tier.percentage,
            period_seconds: tier.period_seconds,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuotaConfig {
    pub code: String,
    pub model_id: String,
    pub metrics: Vec<String>,
}

impl MonitorConfig {
    pub fn registry(&self) -> Result<QuotaRegistry, MonitorError> {
        QuotaRegistry::new(
            self.quotas
                .iter()
                .map(|q| QuotaDefinition::new(q.code.clone(), q.model_id.clone(), q.metrics.clone()))
                .collect(),
        )
    }

    pub fn tiers(&self) -> Vec<ThresholdTier> {
        self.alarms
            .tiers
            .iter()
            .map(|t| ThresholdTier::new(t.severity.clone(), t.percentage, t.period_seconds))
            .collect()
    }

    pub fn layout(&self) -> DashboardLayout {
        DashboardLayout {
            widget_width: self.dashboard.widget_width,
            widget_height: self.dashboard.widget_height,
            time_series_period: self.dashboard.time_series_period,
            peak_stat: self.dashboard.peak_stat.clone(),
            peak_period: self.dashboard.peak_period,
            daily_period: self.dashboard.daily_period,
        }
    }

    pub fn metric_source(&self) -> MetricSource {
        MetricSource::new(self.aws.namespace.clone(), self.aws.dimension.clone())
    }

    pub fn notification_settings(&self) -> NotificationSettings {
        NotificationSettings {
            topic_name: self.notifications.topic_name.clone(),
            display_name: self.notifications.display_name.clone(),
            emails: self.notifications.emails.clone(),
        }
    }
}

/// Load `path` (extension optional), then overlay `QUOTA_MONITOR__SECTION__KEY` variables.
pub fn load_monitor_config(path: &str) -> anyhow::Result<MonitorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("notifications.emails"),
        )
        .build()?;

    let config: MonitorConfig = settings.try_deserialize()?;
    if config.quotas.is_empty() {
        anyhow::bail!("No quotas configured in {}", path);
    }

    Ok(config)
}
