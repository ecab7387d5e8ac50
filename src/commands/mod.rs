pub mod completions;
pub mod print;
pub mod run;

pub use completions::CompletionsCommand;
pub use print::PrintCommand;
pub use run::RunCommand;

use std::io::Write;

use crate::error::Result;
use crate::resolve::ResolvedSession;
use crate::shell::Shell;

/// What to do with the resolved session. Chosen by whether a command was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    Run(RunCommand),
    Print(PrintCommand),
}

impl ExecutionMode {
    /// Pick the mode up front so a bad `--format` fails before any credentials are fetched.
    pub fn select(command: Vec<String>, format: Option<&str>, invocation: String) -> Result<Self> {
        if !command.is_empty() {
            return Ok(Self::Run(RunCommand { argv: command }));
        }

        let shell = match format {
            Some(format) => format.parse()?,
            None => Shell::detect(),
        };
        Ok(Self::Print(PrintCommand { shell, invocation }))
    }

    pub fn execute(&self, session: &ResolvedSession, out: &mut impl Write) -> Result<()> {
        match self {
            Self::Run(cmd) => cmd.execute(session),
            Self::Print(cmd) => cmd.execute(session, out),
        }
    }
}
