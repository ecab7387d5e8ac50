use std::time::SystemTime;

use anyhow::Result;
use aws_smithy_types::{DateTime, date_time::Format};

use crate::provider::{AssumeRoleRequest, CredentialProvider, Credentials, ProfileRequest};

pub mod mfa;
pub mod profile;
pub mod shared_config;
pub mod sts;

/// [`CredentialProvider`] backed by the shared AWS config files and AWS STS
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsProvider;

impl CredentialProvider for AwsProvider {
    async fn resolve_profile(&self, request: &ProfileRequest<'_>) -> Result<Credentials> {
        profile::load_profile(request).await
    }

    async fn assume_role(&self, request: &AssumeRoleRequest<'_>) -> Result<Credentials> {
        sts::assume_role_with(request, None).await
    }
}

/// Human readable expiration for log output
pub(crate) fn format_expiration(expiration: Option<SystemTime>) -> String {
    expiration
        .map(DateTime::from)
        .and_then(|dt| dt.fmt(Format::DateTime).ok())
        .unwrap_or_else(|| "never".to_string())
}
