// Main entry point - Dependency injection and command dispatch
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::application::alarm_generator::AlarmGenerator;
use crate::application::dashboard_generator::DashboardGenerator;
use crate::application::monitoring_service::MonitoringService;
use crate::infrastructure::aws::load_sdk_config;
use crate::infrastructure::aws_monitoring_sink::AwsMonitoringSink;
use crate::infrastructure::config::load_monitor_config;
use crate::infrastructure::service_quotas_source::ServiceQuotasSource;
use crate::presentation::cli::{Cli, Command};
use crate::presentation::output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing on stderr; stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = load_monitor_config(&cli.config)?;
    let registry = config.registry()?;
    let source = config.metric_source();
    tracing::info!(
        "Loaded {} quota definitions from {}",
        registry.len(),
        cli.config
    );

    // AWS clients (infrastructure layer)
    let region = cli.region.clone().or_else(|| config.aws.region.clone());
    let (sdk_config, region) = load_sdk_config(region).await?;
    let quota_source = Arc::new(ServiceQuotasSource::new(
        aws_sdk_servicequotas::Client::new(&sdk_config),
        config.aws.service_code.clone(),
    ));

    // Generators and service (application layer)
    let dashboards = DashboardGenerator::new(config.layout(), source.clone(), region.clone())?;
    let alarms = AlarmGenerator::new(config.tiers(), source)?;
    tracing::debug!("Using {} threshold tiers", alarms.tiers().len());
    let service = MonitoringService::new(
        registry,
        quota_source,
        dashboards,
        alarms,
        config.dashboard.name.clone(),
        region,
        config.notification_settings(),
    );

    match cli.command {
        Command::Plan => {
            let plan = service.plan().await?;
            output::print(&plan, cli.pretty)?;
        }
        Command::Apply => {
            let sink = AwsMonitoringSink::new(
                aws_sdk_cloudwatch::Client::new(&sdk_config),
                aws_sdk_sns::Client::new(&sdk_config),
            );
            let outputs = service.apply(&sink).await?;
            output::print(&outputs, cli.pretty)?;
        }
    }

    Ok(())
}
