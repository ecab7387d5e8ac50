use std::env;
use std::time::Duration;

use tracing::{debug, info};

use crate::constants::{AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, DEFAULT_ASSUME_ROLE_DURATION};
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::provider::{AssumeRoleRequest, CredentialProvider, Credentials, ProfileRequest};

/// Caller supplied knobs for a resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionOptions {
    /// `--region`, wins over the profile's region
    pub region: Option<String>,
    /// `--duration`, applies to every role assumed on the way
    pub duration: Option<Duration>,
    /// `--token`, MFA device serial for direct role assumption
    pub mfa_token: Option<String>,
    /// `--token-code`, inline one-time code, also used for a profile's `mfa_serial`
    pub mfa_code: Option<String>,
}

/// Credentials and the region they should be used in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub identity: Identity,
    pub credentials: Credentials,
    pub region: Option<String>,
}

/// Turn an identity into credentials using the matching provider strategy.
pub async fn resolve<P: CredentialProvider>(
    provider: &P,
    identity: Identity,
    options: &ResolutionOptions,
) -> Result<ResolvedSession> {
    let credentials = match &identity {
        Identity::Role(role) => {
            info!("Assuming role {} directly", role.arn);
            let request = AssumeRoleRequest {
                role_arn: &role.arn,
                duration: options.duration.unwrap_or(DEFAULT_ASSUME_ROLE_DURATION),
                mfa_serial: options.mfa_token.as_deref().filter(|s| !s.is_empty()),
                mfa_code: options.mfa_code.as_deref().filter(|s| !s.is_empty()),
            };
            // role assumption carries no region of its own
            provider
                .assume_role(&request)
                .await
                .map_err(Error::Resolution)?
                .with_region(None)
        }
        Identity::Profile { name } => {
            clear_ambient_credentials();
            let request = ProfileRequest {
                name,
                duration: options.duration,
                mfa_code: options.mfa_code.as_deref().filter(|s| !s.is_empty()),
            };
            provider
                .resolve_profile(&request)
                .await
                .map_err(Error::Resolution)?
        }
    };

    let region = options
        .region
        .clone()
        .filter(|region| !region.is_empty())
        .or_else(|| credentials.region.clone());
    debug!("Resolved region: {:?}", region);

    Ok(ResolvedSession {
        identity,
        credentials,
        region,
    })
}

/// Drop an inherited key pair so it cannot short-circuit profile resolution.
fn clear_ambient_credentials() {
    for var in [AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY] {
        if env::var_os(var).is_some() {
            debug!("Clearing ambient {}", var);
            // SAFETY: called once before any credential lookup; nothing else reads
            // or writes the environment concurrently in this single-shot process.
            unsafe { env::remove_var(var) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Profile {
            name: String,
            duration: Option<Duration>,
            mfa_code: Option<String>,
        },
        Role {
            arn: String,
            duration: Duration,
            mfa_serial: Option<String>,
            mfa_code: Option<String>,
        },
    }

    /// Canned provider recording what it was asked for
    struct FakeProvider {
        result: std::result::Result<Credentials, String>,
        calls: RefCell<Vec<Call>>,
        ambient_key_seen: RefCell<Option<bool>>,
    }

    impl FakeProvider {
        fn returning(credentials: Credentials) -> Self {
            Self {
                result: Ok(credentials),
                calls: RefCell::new(Vec::new()),
                ambient_key_seen: RefCell::new(None),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                result: Err(message.to_string()),
                calls: RefCell::new(Vec::new()),
                ambient_key_seen: RefCell::new(None),
            }
        }

        fn respond(&self) -> anyhow::Result<Credentials> {
            self.result.clone().map_err(anyhow::Error::msg)
        }
    }

    impl CredentialProvider for FakeProvider {
        async fn resolve_profile(
            &self,
            request: &ProfileRequest<'_>,
        ) -> anyhow::Result<Credentials> {
            self.calls.borrow_mut().push(Call::Profile {
                name: request.name.to_string(),
                duration: request.duration,
                mfa_code: request.mfa_code.map(str::to_string),
            });
            *self.ambient_key_seen.borrow_mut() = Some(env::var_os(AWS_ACCESS_KEY_ID).is_some());
            self.respond()
        }

        async fn assume_role(&self, request: &AssumeRoleRequest<'_>) -> anyhow::Result<Credentials> {
            self.calls.borrow_mut().push(Call::Role {
                arn: request.role_arn.to_string(),
                duration: request.duration,
                mfa_serial: request.mfa_serial.map(str::to_string),
                mfa_code: request.mfa_code.map(str::to_string),
            });
            self.respond()
        }
    }

    fn static_credentials() -> Credentials {
        Credentials::new("AKIDEXAMPLE", "SECRETEXAMPLE", None)
    }

    fn session_credentials() -> Credentials {
        Credentials::new("ASIAEXAMPLE", "SECRETEXAMPLE", Some("TOKENEXAMPLE".to_string()))
    }

    #[tokio::test]
    #[serial]
    async fn test_profile_uses_profile_strategy_and_region() {
        let provider = FakeProvider::returning(
            static_credentials().with_region(Some("us-east-1".to_string())),
        );

        let session = resolve(
            &provider,
            Identity::classify("default"),
            &ResolutionOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            provider.calls.borrow().as_slice(),
            &[Call::Profile {
                name: "default".to_string(),
                duration: None,
                mfa_code: None,
            }]
        );
        assert_eq!(session.region.as_deref(), Some("us-east-1"));
        assert_eq!(session.credentials.access_key_id, "AKIDEXAMPLE");
        assert_eq!(session.identity.as_str(), "default");
    }

    #[tokio::test]
    #[serial]
    async fn test_explicit_region_wins_over_profile_region() {
        let provider = FakeProvider::returning(
            static_credentials().with_region(Some("us-east-1".to_string())),
        );
        let options = ResolutionOptions {
            region: Some("eu-west-1".to_string()),
            ..Default::default()
        };

        let session = resolve(&provider, Identity::classify("production"), &options)
            .await
            .unwrap();

        assert_eq!(session.region.as_deref(), Some("eu-west-1"));
    }

    #[tokio::test]
    #[serial]
    async fn test_no_region_anywhere() {
        let provider = FakeProvider::returning(static_credentials());

        let session = resolve(
            &provider,
            Identity::classify("default"),
            &ResolutionOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(session.region, None);
    }

    #[tokio::test]
    #[serial]
    async fn test_profile_receives_duration_and_token_code() {
        let provider = FakeProvider::returning(session_credentials());
        let options = ResolutionOptions {
            duration: Some(Duration::from_secs(3600)),
            mfa_code: Some("123456".to_string()),
            ..Default::default()
        };

        resolve(&provider, Identity::classify("chained"), &options)
            .await
            .unwrap();

        assert_eq!(
            provider.calls.borrow().as_slice(),
            &[Call::Profile {
                name: "chained".to_string(),
                duration: Some(Duration::from_secs(3600)),
                mfa_code: Some("123456".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_role_uses_assume_role_strategy_with_mfa() {
        let provider = FakeProvider::returning(session_credentials());
        let options = ResolutionOptions {
            duration: Some(Duration::from_secs(3600)),
            mfa_token: Some("arn:aws:iam::123456789012:mfa/alice".to_string()),
            mfa_code: Some("123456".to_string()),
            ..Default::default()
        };

        let session = resolve(
            &provider,
            Identity::classify("arn:aws:iam::123456789012:role/Deployer"),
            &options,
        )
        .await
        .unwrap();

        assert_eq!(
            provider.calls.borrow().as_slice(),
            &[Call::Role {
                arn: "arn:aws:iam::123456789012:role/Deployer".to_string(),
                duration: Duration::from_secs(3600),
                mfa_serial: Some("arn:aws:iam::123456789012:mfa/alice".to_string()),
                mfa_code: Some("123456".to_string()),
            }]
        );
        assert_eq!(
            session.credentials.session_token.as_deref(),
            Some("TOKENEXAMPLE")
        );
    }

    #[tokio::test]
    async fn test_role_defaults_duration_and_has_no_region() {
        let provider = FakeProvider::returning(
            session_credentials().with_region(Some("ap-northeast-1".to_string())),
        );

        let session = resolve(
            &provider,
            Identity::classify("arn:aws:iam::123456789012:role/Deployer"),
            &ResolutionOptions::default(),
        )
        .await
        .unwrap();

        match provider.calls.borrow().as_slice() {
            [Call::Role { duration, mfa_serial, mfa_code, .. }] => {
                assert_eq!(*duration, DEFAULT_ASSUME_ROLE_DURATION);
                assert_eq!(*mfa_serial, None);
                assert_eq!(*mfa_code, None);
            }
            other => panic!("Expected one assume role call, got {other:?}"),
        }
        assert_eq!(session.region, None);
    }

    #[tokio::test]
    async fn test_role_with_explicit_region() {
        let provider = FakeProvider::returning(session_credentials());
        let options = ResolutionOptions {
            region: Some("eu-central-1".to_string()),
            ..Default::default()
        };

        let session = resolve(
            &provider,
            Identity::classify("arn:aws:iam::123456789012:role/Deployer"),
            &options,
        )
        .await
        .unwrap();

        assert_eq!(session.region.as_deref(), Some("eu-central-1"));
    }

    #[tokio::test]
    #[serial]
    async fn test_provider_failure_is_resolution_error() {
        let provider = FakeProvider::failing("The config profile (nope) could not be found");

        let err = resolve(
            &provider,
            Identity::classify("nope"),
            &ResolutionOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Resolution(_)));
        assert_eq!(err.to_string(), "The config profile (nope) could not be found");
        assert_eq!(provider.calls.borrow().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_ambient_credentials_cleared_before_profile_resolution() {
        let original_id = env::var(AWS_ACCESS_KEY_ID).ok();
        let original_secret = env::var(AWS_SECRET_ACCESS_KEY).ok();

        unsafe {
            env::set_var(AWS_ACCESS_KEY_ID, "AKIDSTALE");
            env::set_var(AWS_SECRET_ACCESS_KEY, "SECRETSTALE");
        }

        let provider = FakeProvider::returning(static_credentials());
        resolve(
            &provider,
            Identity::classify("default"),
            &ResolutionOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(*provider.ambient_key_seen.borrow(), Some(false));
        assert!(env::var_os(AWS_SECRET_ACCESS_KEY).is_none());

        unsafe {
            match original_id {
                Some(val) => env::set_var(AWS_ACCESS_KEY_ID, val),
                None => env::remove_var(AWS_ACCESS_KEY_ID),
            }
            match original_secret {
                Some(val) => env::set_var(AWS_SECRET_ACCESS_KEY, val),
                None => env::remove_var(AWS_SECRET_ACCESS_KEY),
            }
        }
    }
}
