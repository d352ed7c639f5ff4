use clap::Args;

use crate::cli::op::ContextError;

#[derive(Args, Debug, Clone)]
pub struct Verify;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error("Failed to fetch server key: {0}")]
    Vault(#[from] common::error::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Verify {
    type Error = VerifyError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut vault = ctx.vault()?;
        let identity = vault.server_identity().await?;

        let mut lines = vec![format!("Server: {}", vault.config().domain())];
        lines.push(format!(
            "Fingerprint: {}",
            identity.fingerprint().unwrap_or("(not reported)")
        ));
        lines.push(identity.armored().trim_end().to_string());

        Ok(lines.join("\n"))
    }
}
