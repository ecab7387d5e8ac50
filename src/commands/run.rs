use std::env;

use crate::environment;
use crate::error::Result;
use crate::exec;
use crate::resolve::ResolvedSession;

/// Run a command with the session in its environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    /// Program followed by its arguments, never empty
    pub argv: Vec<String>,
}

impl RunCommand {
    pub fn execute(&self, session: &ResolvedSession) -> Result<()> {
        let child_env = environment::build_child_environment(session, env::vars_os());
        exec::run_command(&self.argv, &child_env)
    }
}
