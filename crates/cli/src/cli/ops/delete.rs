use clap::Args;
use uuid::Uuid;

use crate::cli::op::ContextError;

#[derive(Args, Debug, Clone)]
pub struct Delete {
    /// Id of the resource to delete
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("Failed to delete resource: {0}")]
    Vault(#[from] common::error::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Delete {
    type Error = DeleteError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut vault = ctx.login().await?;
        let result = vault.delete_resource(self.id).await;
        ctx.logout(&mut vault).await;

        result?;
        Ok(format!("Deleted {}", self.id))
    }
}
