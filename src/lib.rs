pub mod aws;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod environment;
pub mod error;
pub mod exec;
pub mod identity;
pub mod provider;
pub mod resolve;
pub mod shell;

pub use error::{Error, Result};
pub use identity::{Identity, RoleArn};
pub use provider::{AssumeRoleRequest, CredentialProvider, Credentials, ProfileRequest};
pub use resolve::{ResolutionOptions, ResolvedSession, resolve};
