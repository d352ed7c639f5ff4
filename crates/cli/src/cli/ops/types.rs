use clap::Args;

use crate::cli::op::ContextError;

#[derive(Args, Debug, Clone)]
pub struct Types;

#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("Failed to load resource types: {0}")]
    Vault(#[from] common::error::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Types {
    type Error = TypesError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut vault = ctx.login().await?;
        let result = vault.refresh_resource_types().await;
        ctx.logout(&mut vault).await;

        let catalog = result?;
        if catalog.is_empty() {
            return Ok("No resource types".to_string());
        }
        Ok(catalog
            .iter()
            .map(|(slug, id)| format!("{} -> {}", slug, id))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
