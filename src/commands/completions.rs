use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

use crate::cli::Cli;
use crate::error::Result;

/// Print a completion script for `shell`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionsCommand {
    pub shell: Shell,
}

impl CompletionsCommand {
    pub fn execute(self, out: &mut impl Write) -> Result<()> {
        let mut cmd = Cli::command();
        let app_name = cmd.get_name().to_string();
        clap_complete::generate(self.shell, &mut cmd, app_name, out);
        out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn generate_to_string(&self) -> String {
        let mut buffer = Vec::new();
        self.execute(&mut buffer).unwrap_or_default();
        String::from_utf8(buffer).unwrap_or_default()
    }
}
