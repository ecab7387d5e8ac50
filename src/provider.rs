use std::fmt;
use std::time::{Duration, SystemTime};

use anyhow::Result;

/// Temporary AWS credentials as resolved by a [`CredentialProvider`].
///
/// The `Debug` implementation redacts the secret key and session token to
/// prevent accidental leakage in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    /// Region configured alongside the credentials, if any
    pub region: Option<String>,
    pub expiration: Option<SystemTime>,
}

impl Credentials {
    /// An empty session token is treated as no session token.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.filter(|token| !token.is_empty()),
            region: None,
            expiration: None,
        }
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region.filter(|region| !region.is_empty());
        self
    }

    pub fn with_expiration(mut self, expiration: Option<SystemTime>) -> Self {
        self.expiration = expiration;
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"****")
            .field("session_token", &self.session_token.as_ref().map(|_| "****"))
            .field("region", &self.region)
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Parameters of a profile resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRequest<'a> {
    pub name: &'a str,
    /// Validity window for the role the profile assumes, if it assumes one
    pub duration: Option<Duration>,
    /// One-time code for a profile configured with `mfa_serial`
    pub mfa_code: Option<&'a str>,
}

/// Parameters of a direct role assumption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest<'a> {
    pub role_arn: &'a str,
    pub duration: Duration,
    /// MFA device serial number or ARN
    pub mfa_serial: Option<&'a str>,
    /// One-time code; prompted for when a serial is given without one
    pub mfa_code: Option<&'a str>,
}

/// Source of temporary credentials.
///
/// This is the only boundary that talks to the outside world; everything
/// behind it (signing, caching, retries, prompting) is the implementor's concern.
#[allow(async_fn_in_trait)]
pub trait CredentialProvider {
    /// Resolve a named profile, including any role chaining it configures.
    /// The returned credentials carry the profile's region when one is set.
    async fn resolve_profile(&self, request: &ProfileRequest<'_>) -> Result<Credentials>;

    /// Assume a role directly. No region is produced.
    async fn assume_role(&self, request: &AssumeRoleRequest<'_>) -> Result<Credentials>;
}

/// Provides the same credentials for every request
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct StaticProvider {
    credentials: Credentials,
}

#[cfg(test)]
impl StaticProvider {
    pub(crate) fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[cfg(test)]
impl CredentialProvider for StaticProvider {
    async fn resolve_profile(&self, _request: &ProfileRequest<'_>) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }

    async fn assume_role(&self, _request: &AssumeRoleRequest<'_>) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}
