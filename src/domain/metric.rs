// Metric namespace and dimension shared by widgets and alarms
use super::alarm::MetricSpec;
use super::dashboard::MetricLine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSource {
    pub namespace: String,
    pub dimension_name: String,
}

impl MetricSource {
    pub fn new(namespace: impl Into<String>, dimension_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            dimension_name: dimension_name.into(),
        }
    }

    pub fn line(&self, metric_name: &str, model_id: &str, id: String) -> MetricLine {
        MetricLine::Metric {
            namespace: self.namespace.clone(),
            metric_name: metric_name.to_string(),
            dimension_name: self.dimension_name.clone(),
            dimension_value: model_id.to_string(),
            id,
        }
    }

    pub fn spec(&self, metric_name: &str, model_id: &str, period: u32, statistic: &str) -> MetricSpec {
        MetricSpec {
            namespace: self.namespace.clone(),
            metric_name: metric_name.to_string(),
            dimension_name: self.dimension_name.clone(),
            dimension_value: model_id.to_string(),
            period,
            statistic: statistic.to_string(),
        }
    }
}

impl Default for MetricSource {
    fn default() -> Self {
        Self::new("AWS/Bedrock", "ModelId")
    }
}
