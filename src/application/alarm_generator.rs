// Alarm generator - One alarm per quota per threshold tier
use crate::domain::alarm::{
    AlarmDefinition, AlarmSource, MetricQuery, ThresholdTier, TREAT_MISSING_DATA,
};
use crate::domain::error::MonitorError;
use crate::domain::metric::MetricSource;
use crate::domain::quota::ResolvedQuota;

const ALARM_PREFIX: &str = "bedrock-quota-alarm";
const EXPRESSION_ID: &str = "e1";
const EXPRESSION_LABEL: &str = "Combined Metrics";
const STATISTIC: &str = "Sum";

#[derive(Debug, Clone)]
pub struct AlarmGenerator {
    tiers: Vec<ThresholdTier>,
    source: MetricSource,
}

impl AlarmGenerator {
    pub fn new(tiers: Vec<ThresholdTier>, source: MetricSource) -> Result<Self, MonitorError> {
        if tiers.is_empty() {
            return Err(MonitorError::InvalidTier {
                severity: "none".to_string(),
                reason: "at least one threshold tier is required".to_string(),
            });
        }
        for tier in &tiers {
            tier.validate()?;
        }
        for (i, tier) in tiers.iter().enumerate() {
            if tiers[..i].iter().any(|t| t.severity == tier.severity) {
                return Err(MonitorError::InvalidTier {
                    severity: tier.severity.clone(),
                    reason: "severity is used by more than one tier".to_string(),
                });
            }
        }
        Ok(Self { tiers, source })
    }

    pub fn tiers(&self) -> &[ThresholdTier] {
        &self.tiers
    }

    pub fn generate(&self, quotas: &[ResolvedQuota]) -> Vec<AlarmDefinition> {
        quotas
            .iter()
            .flat_map(|quota| self.tiers.iter().map(move |tier| self.alarm(quota, tier)))
            .collect()
    }

    fn alarm(&self, quota: &ResolvedQuota, tier: &ThresholdTier) -> AlarmDefinition {
        let definition = &quota.model_info;
        let threshold = tier.threshold_for(quota.value);

        tracing::debug!(
            "Alarm {} for {} at {} ({} x {})",
            tier.severity,
            quota.quota_code,
            threshold,
            quota.value,
            tier.percentage
        );

        AlarmDefinition {
            name: format!("{}-{}-{}", ALARM_PREFIX, quota.quota_code, tier.severity),
            quota_code: quota.quota_code.clone(),
            severity: tier.severity.clone(),
            description: format!(
                "Alarm when Bedrock metrics exceed {}% of quota {} ({})",
                tier.percent_label(),
                quota.quota_name,
                definition.model_id
            ),
            comparison_operator: "GreaterThanThreshold",
            evaluation_periods: 1,
            threshold,
            treat_missing_data: TREAT_MISSING_DATA,
            source: self.source_for(quota, tier),
        }
    }

    fn source_for(&self, quota: &ResolvedQuota, tier: &ThresholdTier) -> AlarmSource {
        let definition = &quota.model_info;

        if !definition.is_combined() {
            return AlarmSource::Metric(self.source.spec(
                &definition.metrics[0],
                &definition.model_id,
                tier.period_seconds,
                STATISTIC,
            ));
        }

        let queries = definition
            .metrics
            .iter()
            .zip(definition.metric_ids())
            .map(|(metric, id)| MetricQuery {
                id,
                metric: self.source.spec(
                    metric,
                    &definition.model_id,
                    tier.period_seconds,
                    STATISTIC,
                ),
                return_data: false,
            })
            .collect();

        AlarmSource::Expression {
            id: EXPRESSION_ID.to_string(),
            expression: definition.sum_expression(),
            label: EXPRESSION_LABEL.to_string(),
            queries,
        }
    }
}
