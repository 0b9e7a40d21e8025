// CloudWatch + SNS adapter for dashboards, alarms and notifications
use crate::application::monitoring_sink::MonitoringSink;
use crate::domain::alarm::{AlarmDefinition, AlarmSource, MetricQuery, MetricSpec};
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_cloudwatch::types::{
    ComparisonOperator, Dimension, Metric, MetricDataQuery, MetricStat, Statistic,
};

const PENDING_CONFIRMATION: &str = "pending confirmation";

#[derive(Debug, Clone)]
pub struct AwsMonitoringSink {
    cloudwatch: aws_sdk_cloudwatch::Client,
    sns: aws_sdk_sns::Client,
}

impl AwsMonitoringSink {
    pub fn new(cloudwatch: aws_sdk_cloudwatch::Client, sns: aws_sdk_sns::Client) -> Self {
        Self { cloudwatch, sns }
    }
}

fn dimension(spec: &MetricSpec) -> Dimension {
    Dimension::builder()
        .name(&spec.dimension_name)
        .value(&spec.dimension_value)
        .build()
}

/// CloudWatch takes periods as `i32`.
fn period(spec: &MetricSpec) -> Result<i32> {
    i32::try_from(spec.period).with_context(|| {
        format!(
            "Period {}s for {} does not fit a CloudWatch period",
            spec.period, spec.metric_name
        )
    })
}

fn metric_stat(spec: &MetricSpec) -> Result<MetricStat> {
    let metric = Metric::builder()
        .namespace(&spec.namespace)
        .metric_name(&spec.metric_name)
        .dimensions(dimension(spec))
        .build();

    Ok(MetricStat::builder()
        .metric(metric)
        .period(period(spec)?)
        .stat(&spec.statistic)
        .build())
}

/// The returned expression query first, then one hidden query per metric.
fn metric_queries(
    id: &str,
    expression: &str,
    label: &str,
    queries: &[MetricQuery],
) -> Result<Vec<MetricDataQuery>> {
    let mut data_queries = Vec::with_capacity(queries.len() + 1);
    data_queries.push(
        MetricDataQuery::builder()
            .id(id)
            .expression(expression)
            .label(label)
            .return_data(true)
            .build(),
    );

    for query in queries {
        data_queries.push(
            MetricDataQuery::builder()
                .id(&query.id)
                .metric_stat(metric_stat(&query.metric)?)
                .return_data(query.return_data)
                .build(),
        );
    }

    Ok(data_queries)
}

#[async_trait]
impl MonitoringSink for AwsMonitoringSink {
    async fn ensure_topic(&self, name: &str, display_name: &str) -> Result<String> {
        let output = self
            .sns
            .create_topic()
            .name(name)
            .attributes("DisplayName", display_name)
            .send()
            .await
            .with_context(|| format!("Failed to create SNS topic {}", name))?;

        output
            .topic_arn()
            .map(str::to_string)
            .with_context(|| format!("SNS returned no ARN for topic {}", name))
    }

    async fn subscribe_email(&self, topic_arn: &str, email: &str) -> Result<String> {
        let output = self
            .sns
            .subscribe()
            .topic_arn(topic_arn)
            .protocol("email")
            .endpoint(email)
            .send()
            .await
            .with_context(|| format!("Failed to subscribe {} to {}", email, topic_arn))?;

        tracing::debug!("Subscribed {} to {}", email, topic_arn);
        Ok(output
            .subscription_arn()
            .unwrap_or(PENDING_CONFIRMATION)
            .to_string())
    }

    async fn put_dashboard(&self, name: &str, body: &str) -> Result<()> {
        let output = self
            .cloudwatch
            .put_dashboard()
            .dashboard_name(name)
            .dashboard_body(body)
            .send()
            .await
            .with_context(|| format!("Failed to put dashboard {}", name))?;

        for message in output.dashboard_validation_messages() {
            tracing::warn!(
                "Dashboard {} validation: {} at {}",
                name,
                message.message().unwrap_or_default(),
                message.data_path().unwrap_or_default()
            );
        }

        Ok(())
    }

    async fn put_alarm(&self, alarm: &AlarmDefinition, topic_arn: &str) -> Result<()> {
        let mut request = self
            .cloudwatch
            .put_metric_alarm()
            .alarm_name(&alarm.name)
            .alarm_description(&alarm.description)
            .comparison_operator(ComparisonOperator::from(alarm.comparison_operator))
            .evaluation_periods(
                i32::try_from(alarm.evaluation_periods)
                    .with_context(|| format!("Too many evaluation periods for {}", alarm.name))?,
            )
            .threshold(alarm.threshold)
            .treat_missing_data(alarm.treat_missing_data)
            .alarm_actions(topic_arn);

        request = match &alarm.source {
            AlarmSource::Metric(spec) => request
                .namespace(&spec.namespace)
                .metric_name(&spec.metric_name)
                .dimensions(dimension(spec))
                .period(period(spec)?)
                .statistic(Statistic::from(spec.statistic.as_str())),
            AlarmSource::Expression {
                id,
                expression,
                label,
                queries,
            } => {
                let mut request = request;
                for query in metric_queries(id, expression, label, queries)? {
                    request = request.metrics(query);
                }
                request
            }
        };

        request
            .send()
            .await
            .with_context(|| format!("Failed to put alarm {}", alarm.name))?;

        tracing::debug!("Alarm {} set at {}", alarm.name, alarm.threshold);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(metric_name: &str) -> MetricSpec {
        MetricSpec {
            namespace: "AWS/Bedrock".to_string(),
            metric_name: metric_name.to_string(),
            dimension_name: "ModelId".to_string(),
            dimension_value: "us.anthropic.claude-3-haiku-20240307-v1:0".to_string(),
            period: 1800,
            statistic: "Sum".to_string(),
        }
    }

    #[test]
    fn test_metric_queries_lead_with_expression() {
        let queries = vec![
            MetricQuery {
                id: "m0".to_string(),
                metric: spec("InputTokenCount"),
                return_data: false,
            },
            MetricQuery {
                id: "m1".to_string(),
                metric: spec("OutputTokenCount"),
                return_data: false,
            },
        ];

        let built = metric_queries("e1", "m0+m1", "Combined Metrics", &queries).unwrap();
        assert_eq!(built.len(), 3);
        assert_eq!(built[0].expression(), Some("m0+m1"));
        assert_eq!(built[0].return_data(), Some(true));
        assert_eq!(built[1].return_data(), Some(false));
        assert!(built[1].expression().is_none());
    }

    #[test]
    fn test_period_beyond_i32_is_an_error() {
        let mut oversized = spec("Invocations");
        oversized.period = u32::MAX;

        assert_eq!(period(&spec("Invocations")).unwrap(), 1800);
        assert!(period(&oversized).is_err());
        assert!(metric_stat(&oversized).is_err());

        let queries = vec![MetricQuery {
            id: "m0".to_string(),
            metric: oversized,
            return_data: false,
        }];
        assert!(metric_queries("e1", "m0", "Combined Metrics", &queries).is_err());
    }
}
