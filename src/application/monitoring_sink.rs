// Port for the provider resources the monitor creates or updates
use crate::domain::alarm::AlarmDefinition;
use async_trait::async_trait;

#[async_trait]
pub trait MonitoringSink: Send + Sync {
    /// Create the notification topic (or return the existing one) and give back its ARN
    async fn ensure_topic(&self, name: &str, display_name: &str) -> anyhow::Result<String>;

    /// Subscribe an email address to the topic, returning the subscription identifier
    async fn subscribe_email(&self, topic_arn: &str, email: &str) -> anyhow::Result<String>;

    /// Create or replace the dashboard with the given JSON body
    async fn put_dashboard(&self, name: &str, body: &str) -> anyhow::Result<()>;

    /// Create or replace an alarm that notifies `topic_arn`
    async fn put_alarm(&self, alarm: &AlarmDefinition, topic_arn: &str) -> anyhow::Result<()>;
}
