use std::fmt;
use std::io::{self, BufRead, IsTerminal};

use clap::Args;

use common::submission::ResourceSubmission;

use crate::cli::op::ContextError;

#[derive(Args, Clone)]
pub struct Add {
    /// Resource type slug
    #[arg(long = "type", default_value = "password-string")]
    pub resource_type: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub uri: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// The secret to store. Read from the first line of stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AddError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("Failed to read password: {0}")]
    Password(#[from] io::Error),
    #[error("Failed to add resource: {0}")]
    Vault(#[from] common::error::Error),
}

impl fmt::Debug for Add {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Add")
            .field("resource_type", &self.resource_type)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("uri", &self.uri)
            .field("description", &self.description)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Add {
    fn submission(&self, password: String) -> ResourceSubmission {
        let mut submission =
            ResourceSubmission::new(self.resource_type.clone(), self.name.clone(), password);
        submission.username = self.username.clone();
        submission.uri = self.uri.clone();
        submission.description = self.description.clone();
        submission
    }

    fn password(&self) -> io::Result<String> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }

        let stdin = io::stdin();
        if stdin.is_terminal() {
            eprint!("Password for {}: ", self.name);
        }
        read_password(&mut stdin.lock())
    }
}

/// The first line of `input` without its line ending.
fn read_password(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(len);
    Ok(line)
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Add {
    type Error = AddError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let password = self.password()?;

        let mut vault = ctx.login().await?;
        let result = vault.add_resource(self.submission(password)).await;
        ctx.logout(&mut vault).await;

        let id = result?;
        Ok(format!("Created {}", id))
    }
}
