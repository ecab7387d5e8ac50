use std::env;
use std::io::{self, Write};
use std::sync::LazyLock;
use std::time::Duration;

use clap::{ArgAction, Parser};
use regex::Regex;
use tracing::info;

use crate::aws::AwsProvider;
use crate::commands::{CompletionsCommand, ExecutionMode};
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::provider::CredentialProvider;
use crate::resolve::{self, ResolutionOptions};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "awsenv",
    version,
    about = "Run a command, or configure your shell, with temporary AWS credentials",
    long_about = None
)]
pub struct Cli {
    #[arg(
        value_name = "PROFILE|ROLE_ARN",
        help = "AWS profile name, or the ARN of a role to assume directly"
    )]
    pub identity: Option<String>,

    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Command to run with the credentials; prints shell exports when omitted"
    )]
    pub command: Vec<String>,

    #[arg(long, help = "The AWS default region, overrides the profile's region")]
    pub region: Option<String>,

    #[arg(
        long,
        value_parser = parse_duration,
        help = "How long assumed role credentials stay valid, e.g. 1h, 1.5h, 15m or 900 (seconds)"
    )]
    pub duration: Option<Duration>,

    #[arg(
        long,
        value_name = "SERIAL",
        help = "The MFA device serial to use [only considered if assume by <role_arn>]"
    )]
    pub token: Option<String>,

    #[arg(
        long,
        value_name = "CODE",
        help = "One-time MFA code; prompted for when --token is set without it"
    )]
    pub token_code: Option<String>,

    #[arg(
        long,
        env = "AWSENV_FORMAT",
        help = "Shell syntax to print: sh, bash, zsh, fish or powershell [only considered if no <command> is provided]"
    )]
    pub format: Option<String>,

    #[arg(short = 'v', long, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[arg(
        long,
        value_enum,
        value_name = "SHELL",
        help = "Print a completion script for SHELL and exit"
    )]
    pub completions: Option<clap_complete::Shell>,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut stdout = io::stdout().lock();
        self.execute_with(&AwsProvider, &mut stdout).await
    }

    /// Run the invocation against `provider`, printing to `out`.
    pub async fn execute_with<P: CredentialProvider>(
        self,
        provider: &P,
        out: &mut impl Write,
    ) -> Result<()> {
        if let Some(shell) = self.completions {
            return CompletionsCommand { shell }.execute(out);
        }

        let raw_identity = self
            .identity
            .filter(|identity| !identity.is_empty())
            .ok_or(Error::Usage)?;

        let mode = ExecutionMode::select(self.command, self.format.as_deref(), invocation())?;

        let identity = Identity::classify(&raw_identity);
        info!("Resolving credentials for {}", identity);

        let options = ResolutionOptions {
            region: self.region,
            duration: self.duration,
            mfa_token: self.token,
            mfa_code: self.token_code,
        };
        let session = resolve::resolve(provider, identity, &options).await?;

        mode.execute(&session, out)
    }
}

/// The command line as typed, for the eval hint
fn invocation() -> String {
    env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

static DURATION_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d*)(?:\.(\d*))?(ns|us|µs|ms|s|m|h)").expect("duration pattern is valid")
});

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parse Go-style spans such as `1h30m`, `1.5h`, `15m`, `500ms`, or bare seconds
fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let invalid = || format!("invalid duration '{s}', expected e.g. 1h, 1.5h, 15m, 900s");

    let nanos = match s.parse::<u64>() {
        Ok(seconds) => u128::from(seconds) * NANOS_PER_SEC,
        Err(_) => {
            let mut total: u128 = 0;
            let mut consumed = 0;

            for caps in DURATION_PART.captures_iter(s) {
                let Some(whole) = caps.get(0) else { continue };
                if whole.start() != consumed {
                    return Err(invalid());
                }
                consumed = whole.end();

                let int_part = &caps[1];
                let frac_part = caps.get(2).map_or("", |m| m.as_str());
                if int_part.is_empty() && frac_part.is_empty() {
                    return Err(invalid());
                }

                let unit: u128 = match &caps[3] {
                    "h" => 3600 * NANOS_PER_SEC,
                    "m" => 60 * NANOS_PER_SEC,
                    "s" => NANOS_PER_SEC,
                    "ms" => 1_000_000,
                    "us" | "µs" => 1_000,
                    _ => 1,
                };
                total = span_nanos(int_part, frac_part, unit)
                    .and_then(|part| total.checked_add(part))
                    .ok_or_else(invalid)?;
            }

            if consumed == 0 || consumed != s.len() {
                return Err(invalid());
            }
            total
        }
    };

    if nanos == 0 {
        return Err("duration must be greater than zero".to_string());
    }
    let seconds = u64::try_from(nanos / NANOS_PER_SEC).map_err(|_| invalid())?;
    // remainder of a division by 1e9 always fits
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Ok(Duration::new(seconds, subsec))
}

/// `int.frac` units in nanoseconds, `None` on overflow
fn span_nanos(int_part: &str, frac_part: &str, unit: u128) -> Option<u128> {
    let int: u128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };
    let mut nanos = int.checked_mul(unit)?;

    // digits past nanosecond precision cannot contribute
    let frac_part = &frac_part[..frac_part.len().min(18)];
    if !frac_part.is_empty() {
        let frac: u128 = frac_part.parse().ok()?;
        let scale = 10u128.pow(frac_part.len() as u32);
        nanos = nanos.checked_add(frac.checked_mul(unit)? / scale)?;
    }
    Some(nanos)
}
