use std::io::Write;

use tracing::debug;

use crate::environment;
use crate::error::Result;
use crate::resolve::ResolvedSession;
use crate::shell::Shell;

/// Print shell commands exporting the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintCommand {
    pub shell: Shell,
    /// Command line echoed in the eval hint
    pub invocation: String,
}

impl PrintCommand {
    pub fn execute(&self, session: &ResolvedSession, out: &mut impl Write) -> Result<()> {
        debug!("Printing {} commands", self.shell);

        let mut text = environment::format_env(session, self.shell, &self.invocation).join("\n");
        text.push('\n');

        // one write, so a failure never leaves half a block behind
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
