use std::time::Duration;

/// Environment variable holding the access key id
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";

/// Environment variable holding the secret access key
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Environment variable holding the session token
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Legacy alias of `AWS_SESSION_TOKEN` still read by older tools (boto2 and friends)
pub const AWS_SECURITY_TOKEN: &str = "AWS_SECURITY_TOKEN";

/// Environment variable holding the default region
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";

/// Environment variable holding the region (newer SDKs)
pub const AWS_REGION: &str = "AWS_REGION";

/// Raw identity string exported to child processes
pub const AWS_IDENTITY: &str = "AWS_IDENTITY";

/// Prefix of the generated STS role session name
pub const ROLE_SESSION_NAME_PREFIX: &str = "awsenv";

/// Default validity window of directly assumed role credentials
pub const DEFAULT_ASSUME_ROLE_DURATION: Duration = Duration::from_secs(15 * 60);

/// Default AWS region for STS operations when no region is configured
pub const DEFAULT_AWS_REGION: &str = "us-east-1";
