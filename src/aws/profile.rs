use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use tracing::{debug, info};

use super::shared_config::{self, ProfileRole};
use super::{format_expiration, sts};
use crate::constants::DEFAULT_ASSUME_ROLE_DURATION;
use crate::provider::{AssumeRoleRequest, Credentials, ProfileRequest};

/// Resolve credentials and region for a profile of the shared AWS config.
///
/// A profile that assumes a role from a `source_profile` is assumed here, so
/// the requested duration and the profile's `mfa_serial` are honored. SSO,
/// credential processes and `credential_source` roles are handled by
/// `aws-config`.
pub async fn load_profile(request: &ProfileRequest<'_>) -> Result<Credentials> {
    info!("Resolving credentials for profile: {}", request.name);

    match shared_config::find_profile_role(request.name)? {
        Some(role) => assume_profile_role(request, &role).await.with_context(|| {
            format!("Failed to resolve credentials for profile '{}'", request.name)
        }),
        None => {
            if request.duration.is_some() {
                debug!("Profile '{}' assumes no role, ignoring duration", request.name);
            }
            load_profile_credentials(request.name).await
        }
    }
}

async fn assume_profile_role(
    request: &ProfileRequest<'_>,
    role: &ProfileRole,
) -> Result<Credentials> {
    info!(
        "Profile '{}' assumes {} from profile '{}'",
        request.name, role.role_arn, role.source_profile
    );

    let source = load_profile_credentials(&role.source_profile).await?;
    let assume = AssumeRoleRequest {
        role_arn: &role.role_arn,
        duration: request
            .duration
            .or(role.duration)
            .unwrap_or(DEFAULT_ASSUME_ROLE_DURATION),
        mfa_serial: role.mfa_serial.as_deref(),
        mfa_code: request.mfa_code,
    };

    let credentials = sts::assume_role_with(&assume, Some(&source)).await?;

    let region = profile_region(&load_config(request.name).await, request.name);
    Ok(credentials.with_region(region))
}

async fn load_profile_credentials(profile: &str) -> Result<Credentials> {
    let config = load_config(profile).await;

    let provider = config
        .credentials_provider()
        .context("No credentials provider configured")?;

    let creds = provider
        .provide_credentials()
        .await
        .with_context(|| format!("Failed to resolve credentials for profile '{profile}'"))?;

    debug!("Credentials expire at: {}", format_expiration(creds.expiry()));

    Ok(Credentials::new(
        creds.access_key_id(),
        creds.secret_access_key(),
        creds.session_token().map(str::to_string),
    )
    .with_region(profile_region(&config, profile))
    .with_expiration(creds.expiry()))
}

async fn load_config(profile: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .profile_name(profile)
        .load()
        .await
}

fn profile_region(config: &SdkConfig, profile: &str) -> Option<String> {
    let region = config.region().map(|region| region.to_string());
    match &region {
        Some(region) => debug!("Profile region: {}", region),
        None => debug!("No region configured for profile '{}'", profile),
    }
    region
}
