//! Shell dialects understood by print mode.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Shell syntax used to export variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shell {
    Sh,
    #[default]
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl Shell {
    /// Guess the caller's shell from `$SHELL`.
    pub fn detect() -> Self {
        Self::from_shell_var(env::var("SHELL").ok().as_deref())
    }

    fn from_shell_var(shell: Option<&str>) -> Self {
        match shell.filter(|s| !s.is_empty()) {
            Some(shell) if shell.ends_with("fish") => Shell::Fish,
            Some(_) => Shell::default(),
            None if cfg!(windows) => Shell::PowerShell,
            None => Shell::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shell::Sh => "sh",
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
        }
    }
}

impl FromStr for Shell {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sh" => Ok(Shell::Sh),
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            "powershell" | "pwsh" => Ok(Shell::PowerShell),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
