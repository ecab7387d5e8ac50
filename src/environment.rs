//! Materialize a resolved session as environment variables, either for a
//! child process or as shell commands for the caller to evaluate.

use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::constants::{
    AWS_ACCESS_KEY_ID, AWS_DEFAULT_REGION, AWS_IDENTITY, AWS_REGION, AWS_SECRET_ACCESS_KEY,
    AWS_SECURITY_TOKEN, AWS_SESSION_TOKEN,
};
use crate::resolve::ResolvedSession;
use crate::shell::Shell;

/// Variables describing the session, in emission order.
pub fn session_variables(session: &ResolvedSession) -> Vec<(&'static str, &str)> {
    let credentials = &session.credentials;
    let mut vars = vec![
        (AWS_ACCESS_KEY_ID, credentials.access_key_id.as_str()),
        (AWS_SECRET_ACCESS_KEY, credentials.secret_access_key.as_str()),
    ];

    if let Some(token) = &credentials.session_token {
        vars.push((AWS_SESSION_TOKEN, token.as_str()));
        vars.push((AWS_SECURITY_TOKEN, token.as_str()));
    }

    if let Some(region) = &session.region {
        vars.push((AWS_DEFAULT_REGION, region.as_str()));
        vars.push((AWS_REGION, region.as_str()));
    }

    vars
}

/// Environment for a child process: `base` plus the session variables and
/// `AWS_IDENTITY`. Unrelated variables are left alone.
pub fn build_child_environment<I>(session: &ResolvedSession, base: I) -> BTreeMap<OsString, OsString>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut env: BTreeMap<OsString, OsString> = base.into_iter().collect();

    env.insert(AWS_IDENTITY.into(), session.identity.as_str().into());
    for (name, value) in session_variables(session) {
        env.insert(name.into(), value.into());
    }

    env
}

/// Shell commands exporting the session, followed by a hint on how to
/// evaluate them. `invocation` is the command line shown in the hint.
pub fn format_env(session: &ResolvedSession, shell: Shell, invocation: &str) -> Vec<String> {
    let mut lines: Vec<String> = session_variables(session)
        .into_iter()
        .map(|(name, value)| export_line(shell, name, value))
        .collect();

    lines.push(String::new());
    lines.push("# Run this to configure your shell:".to_string());
    lines.push(eval_hint(shell, invocation));
    lines
}

fn export_line(shell: Shell, name: &str, value: &str) -> String {
    let value = escape(shell, value);
    match shell {
        Shell::Fish => format!("set -gx {name} \"{value}\";"),
        Shell::PowerShell => format!("$env:{name}=\"{value}\""),
        _ => format!("export {name}=\"{value}\";"),
    }
}

fn eval_hint(shell: Shell, invocation: &str) -> String {
    match shell {
        Shell::Fish => format!("# eval ({invocation})"),
        Shell::PowerShell => format!("# {invocation} | Invoke-Expression"),
        _ => format!("# eval $({invocation})"),
    }
}

/// Escape `value` for a double-quoted string of the given shell
fn escape(shell: Shell, value: &str) -> String {
    let escape_char = if shell == Shell::PowerShell { '`' } else { '\\' };
    let special: &[char] = match shell {
        Shell::Fish => &['\\', '"', '$'],
        Shell::PowerShell => &['`', '"', '$'],
        _ => &['\\', '"', '$', '`'],
    };

    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push(escape_char);
        }
        escaped.push(c);
    }
    escaped
}
