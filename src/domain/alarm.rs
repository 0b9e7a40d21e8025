// Alarm domain model
use super::error::MonitorError;
use serde::Serialize;

pub const TREAT_MISSING_DATA: &str = "notBreaching";

/// A (percentage, aggregation period) pair that defines when an alarm fires.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdTier {
    pub severity: String,
    /// Fraction of the quota value, e.g. `0.8` for 80%.
    pub percentage: f64,
    pub period_seconds: u32,
}

impl ThresholdTier {
    pub fn new(severity: impl Into<String>, percentage: f64, period_seconds: u32) -> Self {
        Self {
            severity: severity.into(),
            percentage,
            period_seconds,
        }
    }

    /// Slow-burn warning at 80% over 30 minutes.
    pub fn warning() -> Self {
        Self::new("warning", 0.8, 1800)
    }

    /// Fast-spike alarm at 95% over one minute.
    pub fn critical() -> Self {
        Self::new("critical", 0.95, 60)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        let invalid = |reason: &str| MonitorError::InvalidTier {
            severity: self.severity.clone(),
            reason: reason.to_string(),
        };

        if self.severity.trim().is_empty() {
            return Err(invalid("severity must not be empty"));
        }
        if !(self.percentage > 0.0 && self.percentage <= 1.0) {
            return Err(invalid("percentage must be in (0, 1]"));
        }
        // CloudWatch accepts 10, 30 or any multiple of 60 seconds
        if !(self.period_seconds == 10 || self.period_seconds == 30 || (self.period_seconds > 0 && self.period_seconds % 60 == 0)) {
            return Err(invalid("period must be 10, 30 or a multiple of 60 seconds"));
        }
        Ok(())
    }

    pub fn threshold_for(&self, quota_value: f64) -> f64 {
        quota_value * self.percentage
    }

    /// Whole-number percentage for descriptions, e.g. `80`.
    pub fn percent_label(&self) -> String {
        let percent = self.percentage * 100.0;
        if (percent - percent.round()).abs() < 1e-9 {
            format!("{}", percent.round() as i64)
        } else {
            format!("{}", percent)
        }
    }
}

#[cfg(test)]
impl ThresholdTier {
    /// Single-tier policy: 90% over one minute.
    pub fn single() -> Self {
        Self::new("threshold", 0.9, 60)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSpec {
    pub namespace: String,
    pub metric_name: String,
    pub dimension_name: String,
    pub dimension_value: String,
    pub period: u32,
    pub statistic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricQuery {
    pub id: String,
    pub metric: MetricSpec,
    pub return_data: bool,
}

/// Where an alarm reads its data from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AlarmSource {
    Metric(MetricSpec),
    #[serde(rename_all = "camelCase")]
    Expression {
        id: String,
        expression: String,
        label: String,
        queries: Vec<MetricQuery>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmDefinition {
    pub name: String,
    pub quota_code: String,
    pub severity: String,
    pub description: String,
    pub comparison_operator: &'static str,
    pub evaluation_periods: u32,
    pub threshold: f64,
    pub treat_missing_data: &'static str,
    pub source: AlarmSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let warning = ThresholdTier::warning();
        assert_eq!(warning.percentage, 0.8);
        assert_eq!(warning.period_seconds, 1800);

        let critical = ThresholdTier::critical();
        assert_eq!(critical.percentage, 0.95);
        assert_eq!(critical.period_seconds, 60);
    }

    #[test]
    fn test_threshold_is_value_times_percentage() {
        let tier = ThresholdTier::critical();
        assert_eq!(tier.threshold_for(400_000.0), 400_000.0 * 0.95);
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(ThresholdTier::warning().percent_label(), "80");
        assert_eq!(ThresholdTier::critical().percent_label(), "95");
        assert_eq!(ThresholdTier::new("odd", 0.875, 60).percent_label(), "87.5");
    }

    #[test]
    fn test_validate_rejects_bad_tiers() {
        assert!(ThresholdTier::warning().validate().is_ok());
        assert!(ThresholdTier::new("zero", 0.0, 60).validate().is_err());
        assert!(ThresholdTier::new("over", 1.5, 60).validate().is_err());
        assert!(ThresholdTier::new("odd-period", 0.5, 45).validate().is_err());
        assert!(ThresholdTier::new("", 0.5, 60).validate().is_err());
    }
}
