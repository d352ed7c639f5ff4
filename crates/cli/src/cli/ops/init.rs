use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use common::crypto::CryptoError;

use crate::state::{AppConfig, AppState, StateError};

pub const KEY_FILE_NAME: &str = "key.asc";

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Overwrite an existing config.toml and key
    #[arg(long)]
    pub force: bool,

    /// Copy this armored private key into the config directory and use it instead of --key
    #[arg(long, value_name = "PATH")]
    pub import_key: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to initialize: {0}")]
    State(#[from] StateError),
    #[error("Refusing to import key: {0}")]
    Key(#[from] CryptoError),
    #[error("Failed to import key: {0}")]
    Io(#[from] io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig {
            remote: ctx.remote.clone(),
            user_id: ctx.user_id,
            key_path: ctx.key_path.clone(),
            timeout_secs: Some(ctx.timeout.as_secs()),
        };

        if let Some(source) = &self.import_key {
            let armored = fs::read_to_string(source)?;
            // the key must unlock with the configured passphrase
            ctx.unlock(&armored)?;

            let dir = AppState::pbolt_dir(ctx.config_path.clone())?;
            fs::create_dir_all(&dir)?;

            let key_path = dir.join(KEY_FILE_NAME);
            if key_path.exists() && !self.force {
                return Err(StateError::AlreadyInitialized.into());
            }
            write_private_key(&key_path, &armored)?;
            tracing::info!(path = %key_path.display(), "imported private key");
            config.key_path = Some(key_path);
        }

        let state = AppState::init(ctx.config_path.clone(), config, self.force)?;

        let mut output = format!("Initialized pbolt at {}", state.pbolt_dir.display());
        if let Some(key_path) = &state.config.key_path {
            output.push_str(&format!("\nPrivate key: {}", key_path.display()));
        }
        Ok(output)
    }
}

/// Write `contents` to `path`, readable and writable by the owner only.
fn write_private_key(path: &Path, contents: &str) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // mode() only applies when the file is created
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
