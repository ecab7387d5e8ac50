use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use ini::{Ini, Properties};
use tracing::debug;

/// Role assumption configured on a profile of the shared config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRole {
    pub role_arn: String,
    /// Profile whose credentials call `AssumeRole`
    pub source_profile: String,
    pub mfa_serial: Option<String>,
    /// `duration_seconds` from the profile
    pub duration: Option<Duration>,
}

/// Get the AWS config file path
/// Respects AWS_CONFIG_FILE environment variable if set
fn get_aws_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("AWS_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|home| home.join(".aws").join("config"))
}

/// Look up the role `profile` assumes, if it assumes one via `source_profile`.
///
/// Profiles without a role, or whose credentials come from a
/// `credential_source`, are left to the SDK's own provider chain.
pub fn find_profile_role(profile: &str) -> Result<Option<ProfileRole>> {
    let Some(path) = get_aws_config_path().filter(|path| path.exists()) else {
        debug!("No AWS config file found");
        return Ok(None);
    };

    let ini = Ini::load_from_file(&path)
        .with_context(|| format!("Failed to read AWS config file: {}", path.display()))?;

    Ok(profile_role(&ini, profile))
}

fn profile_section<'a>(ini: &'a Ini, profile: &str) -> Option<&'a Properties> {
    ini.section(Some(format!("profile {profile}")))
        .or_else(|| match profile {
            "default" => ini.section(Some("default")),
            _ => None,
        })
}

fn profile_role(ini: &Ini, profile: &str) -> Option<ProfileRole> {
    let section = profile_section(ini, profile)?;
    let role_arn = section.get("role_arn")?;

    let Some(source_profile) = section.get("source_profile") else {
        debug!("Profile '{}' has no source_profile", profile);
        return None;
    };
    // a profile sourcing itself holds static keys next to role_arn, the SDK handles that
    if source_profile == profile {
        return None;
    }

    Some(ProfileRole {
        role_arn: role_arn.to_string(),
        source_profile: source_profile.to_string(),
        mfa_serial: section
            .get("mfa_serial")
            .filter(|serial| !serial.is_empty())
            .map(str::to_string),
        duration: section
            .get("duration_seconds")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs),
    })
}
