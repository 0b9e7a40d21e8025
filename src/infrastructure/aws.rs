// Shared AWS SDK configuration
use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load credentials and region from the default provider chain.
/// An explicit region overrides the environment and profile.
pub async fn load_sdk_config(region: Option<String>) -> Result<(SdkConfig, String)> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }

    let sdk_config = loader.load().await;
    let region = sdk_config
        .region()
        .map(|r| r.to_string())
        .context("No AWS region configured; set AWS_REGION, aws.region or --region")?;

    tracing::debug!("Using AWS region {}", region);
    Ok((sdk_config, region))
}
