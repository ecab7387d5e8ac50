use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static ROLE_ARN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^arn:aws:iam::([^/]+):role/([^/]+)(/.+)?$").expect("role ARN pattern is valid")
});

/// IAM role given directly on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleArn {
    pub arn: String,
    pub account_id: String,
    pub role_name: String,
    /// Trailing `/...` after the role name, kept verbatim
    pub path_suffix: Option<String>,
}

/// What the positional `<profile/role_arn>` argument refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Named profile from the shared AWS config
    Profile { name: String },
    /// Role to assume directly, no profile entry needed
    Role(RoleArn),
}

impl Identity {
    /// Classify a raw identity string. Anything that is not a role ARN is a profile name.
    pub fn classify(raw: &str) -> Self {
        match ROLE_ARN_REGEX.captures(raw) {
            Some(caps) => Identity::Role(RoleArn {
                arn: raw.to_string(),
                account_id: caps[1].to_string(),
                role_name: caps[2].to_string(),
                path_suffix: caps.get(3).map(|m| m.as_str().to_string()),
            }),
            None => Identity::Profile {
                name: raw.to_string(),
            },
        }
    }

    /// The identity exactly as the caller wrote it
    pub fn as_str(&self) -> &str {
        match self {
            Identity::Profile { name } => name,
            Identity::Role(role) => &role.arn,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
