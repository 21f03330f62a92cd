//! Shared AWS SDK configuration

use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::config::Settings;

/// Resolve credentials and the default region for every service client.
pub async fn load_sdk_config(settings: &Settings) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.aws.region.clone()));

    let profile = settings.aws.profile.trim();
    if !profile.is_empty() {
        tracing::debug!(profile, "using named AWS profile");
        loader = loader.profile_name(profile);
    }

    loader.load().await
}
