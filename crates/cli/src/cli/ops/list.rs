use clap::Args;

use crate::cli::op::ContextError;

#[derive(Args, Debug, Clone)]
pub struct List;

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("Failed to list resources: {0}")]
    Vault(#[from] common::error::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for List {
    type Error = ListError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut vault = ctx.login().await?;
        let result = vault.list_resources().await;
        ctx.logout(&mut vault).await;

        let resources = result?;
        let mut lines = vec![format!("{} resources", resources.len())];
        for resource in &resources {
            match &resource.username {
                Some(username) => {
                    lines.push(format!("  {}  {} ({})", resource.id, resource.name, username))
                }
                None => lines.push(format!("  {}  {}", resource.id, resource.name)),
            }
        }
        Ok(lines.join("\n"))
    }
}
