// JSON rendering for plan and apply results
use serde::Serialize;
use std::io::Write;

pub fn render<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Write to stdout; logs go to stderr so the output stays machine-readable.
pub fn print<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = render(value, pretty)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::MonitoringOutputs;
    use crate::domain::quota::{QuotaDefinition, QuotaRegistry, QuotaValue};

    #[test]
    fn test_outputs_use_camel_case() {
        let registry = QuotaRegistry::new(vec![QuotaDefinition::new(
            "L-616A3F5B",
            "us.anthropic.claude-3-haiku-20240307-v1:0",
            vec!["Invocations".to_string()],
        )])
        .unwrap();
        let outputs = MonitoringOutputs {
            dashboard_url: "https://example".to_string(),
            quota_values: vec![registry
                .resolve(QuotaValue::new("L-616A3F5B", "Requests per minute", 1000.0))
                .unwrap()],
            alarm_names: vec!["bedrock-quota-alarm-L-616A3F5B-critical".to_string()],
            topic_arn: "arn:aws:sns:us-east-1:123456789012:bedrock-quota-alarm-topic".to_string(),
            subscriptions: Vec::new(),
        };

        let json: serde_json::Value = serde_json::from_str(&render(&outputs, false).unwrap()).unwrap();
        assert_eq!(json["dashboardUrl"], "https://example");
        assert_eq!(json["quotaValues"][0]["quotaCode"], "L-616A3F5B");
        assert_eq!(json["quotaValues"][0]["modelInfo"]["modelId"], "us.anthropic.claude-3-haiku-20240307-v1:0");
        assert_eq!(json["alarmNames"][0], "bedrock-quota-alarm-L-616A3F5B-critical");
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let value = serde_json::json!({ "a": 1 });
        assert!(!render(&value, false).unwrap().contains('\n'));
        assert!(render(&value, true).unwrap().contains('\n'));
    }
}
