// Infrastructure layer - External dependencies and adapters
pub mod aws;
pub mod aws_monitoring_sink;
pub mod config;
pub mod service_quotas_source;
