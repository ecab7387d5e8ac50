use std::time::SystemTime;

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, ConfigLoader, Region};
use aws_credential_types::Credentials as SdkCredentials;
use aws_sdk_sts::Client as StsClient;
use chrono::Utc;
use tracing::{debug, info};

use super::{format_expiration, mfa};
use crate::constants::{DEFAULT_AWS_REGION, ROLE_SESSION_NAME_PREFIX};
use crate::provider::{AssumeRoleRequest, Credentials};

/// Assume a role, signing with `source` or else the default provider chain
pub async fn assume_role_with(
    request: &AssumeRoleRequest<'_>,
    source: Option<&Credentials>,
) -> Result<Credentials> {
    info!("Calling AWS STS AssumeRole");
    debug!("Role ARN: {}", request.role_arn);
    debug!("Duration: {} seconds", request.duration.as_secs());

    let duration_seconds = i32::try_from(request.duration.as_secs())
        .context("Requested duration is out of range")?;

    // Priority: ENV vars -> Config file -> EC2 metadata -> DEFAULT_AWS_REGION
    let config = {
        let loaded = config_loader(source).load().await;

        match loaded.region() {
            Some(region) => {
                info!("Using region: {}", region);
                loaded
            }
            None => {
                info!(
                    "No region configured, using default {} for STS",
                    DEFAULT_AWS_REGION
                );
                config_loader(source)
                    .region(Region::new(DEFAULT_AWS_REGION))
                    .load()
                    .await
            }
        }
    };

    let client = StsClient::new(&config);

    let token_code =
        mfa::token_code(request.mfa_serial, request.mfa_code, mfa::prompt_token_code)?;

    let response = client
        .assume_role()
        .role_arn(request.role_arn)
        .role_session_name(role_session_name())
        .duration_seconds(duration_seconds)
        .set_serial_number(request.mfa_serial.map(str::to_string))
        .set_token_code(token_code)
        .send()
        .await
        .with_context(|| format!("Failed to assume role {}", request.role_arn))?;

    let sts_creds = response
        .credentials()
        .context("AWS STS returned no credentials")?;

    let expiration = SystemTime::try_from(*sts_creds.expiration()).ok();
    let credentials = Credentials::new(
        sts_creds.access_key_id(),
        sts_creds.secret_access_key(),
        Some(sts_creds.session_token().to_string()),
    )
    .with_expiration(expiration);

    info!("Successfully obtained AWS credentials");
    debug!("Credentials expire at: {}", format_expiration(expiration));
    Ok(credentials)
}

fn config_loader(source: Option<&Credentials>) -> ConfigLoader {
    let loader = aws_config::defaults(BehaviorVersion::latest());
    match source {
        Some(source) => loader.credentials_provider(SdkCredentials::new(
            source.access_key_id.clone(),
            source.secret_access_key.clone(),
            source.session_token.clone(),
            source.expiration,
            "SourceProfile",
        )),
        None => loader,
    }
}

fn role_session_name() -> String {
    format!(
        "{}-{}",
        ROLE_SESSION_NAME_PREFIX,
        Utc::now().timestamp_millis()
    )
}
