use std::error::Error;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;
use uuid::Uuid;

use common::config::{ClientConfig, DEFAULT_REQUEST_TIMEOUT};
use common::crypto::{CryptoError, SecretKey};
use common::key_directory::ClientIdentity;
use common::VaultClient;

use crate::cli::args::Args;
use crate::state::{AppConfig, AppState, StateError};

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("no vault URL: pass --remote or run 'pbolt init'")]
    MissingRemote,
    #[error("no user id: pass --user-id or run 'pbolt init'")]
    MissingUserId,
    #[error("no private key: pass --key or run 'pbolt init'")]
    MissingKey,
    #[error("failed to read key {0}: {1}")]
    ReadKey(PathBuf, std::io::Error),
    #[error("invalid private key: {0}")]
    InvalidKey(#[from] CryptoError),
    #[error(transparent)]
    Vault(#[from] common::error::Error),
}

/// Settings resolved from flags and config.toml.
///
/// Priority: explicit flag > config file > built-in default. The passphrase
/// only ever comes from the flag or its environment variable.
#[derive(Clone)]
pub struct OpContext {
    pub remote: Option<Url>,
    pub user_id: Option<Uuid>,
    pub key_path: Option<PathBuf>,
    pub passphrase: Option<String>,
    pub timeout: Duration,
    /// Optional custom config path (defaults to ~/.pbolt)
    pub config_path: Option<PathBuf>,
}

impl fmt::Debug for OpContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpContext")
            .field("remote", &self.remote)
            .field("user_id", &self.user_id)
            .field("key_path", &self.key_path)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("config_path", &self.config_path)
            .finish()
    }
}

impl OpContext {
    pub fn from_args(args: &Args) -> Self {
        let config = match AppState::load(args.config_path.clone()) {
            Ok(state) => state.config,
            Err(StateError::NotInitialized) => AppConfig::default(),
            Err(e) => {
                tracing::warn!("ignoring config file: {}", e);
                AppConfig::default()
            }
        };
        Self::resolve(args, config)
    }

    fn resolve(args: &Args, config: AppConfig) -> Self {
        let timeout = args
            .timeout
            .or(config.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Self {
            remote: args.remote.clone().or(config.remote),
            user_id: args.user_id.or(config.user_id),
            key_path: args.key_path.clone().or(config.key_path),
            passphrase: args.passphrase.clone(),
            timeout,
            config_path: args.config_path.clone(),
        }
    }

    /// A client for the configured vault, not yet logged in.
    pub fn vault(&self) -> Result<VaultClient, ContextError> {
        let remote = self.remote.clone().ok_or(ContextError::MissingRemote)?;
        let config = ClientConfig::new(remote).with_request_timeout(self.timeout);
        Ok(VaultClient::new(config)?)
    }

    pub fn identity(&self) -> Result<(Uuid, Arc<ClientIdentity<SecretKey>>), ContextError> {
        let user_id = self.user_id.ok_or(ContextError::MissingUserId)?;
        let key_path = self.key_path.as_ref().ok_or(ContextError::MissingKey)?;

        let armored = fs::read_to_string(key_path)
            .map_err(|e| ContextError::ReadKey(key_path.clone(), e))?;
        let key = self.unlock(&armored)?;

        Ok((user_id, Arc::new(ClientIdentity::new(key))))
    }

    /// Parse an armored private key and unlock it with the passphrase, if any.
    pub fn unlock(&self, armored: &str) -> Result<SecretKey, CryptoError> {
        SecretKey::from_armored(armored, self.passphrase.clone().unwrap_or_default())
    }

    /// A logged-in client. Callers must pass it to [`Self::logout`] when done.
    pub async fn login(&self) -> Result<VaultClient, ContextError> {
        let (user_id, identity) = self.identity()?;
        let mut vault = self.vault()?;
        vault.login(user_id, identity).await?;
        Ok(vault)
    }

    /// Best effort: a failed logout is logged by the client and otherwise ignored.
    pub async fn logout(&self, vault: &mut VaultClient) {
        let _ = vault.logout().await;
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["pbolt"];
        argv.extend_from_slice(extra);
        argv.push("version");
        <Args as clap::Parser>::parse_from(argv)
    }

    const CLIENT_SECRET: &str = include_str!("../../../common/tests/fixtures/client.sec.asc");
    const CLIENT_PASSPHRASE: &str = "correct horse battery staple";

    fn file_config() -> AppConfig {
        AppConfig {
            remote: Some(Url::parse("https://config.example.com").unwrap()),
            user_id: Some(Uuid::nil()),
            key_path: Some(PathBuf::from("/config/key.asc")),
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn test_explicit_flags_win() {
        let user = Uuid::new_v4();
        let user_arg = user.to_string();
        let args = args(&[
            "--remote",
            "https://flag.example.com",
            "--user-id",
            &user_arg,
            "--key",
            "/flag/key.asc",
            "--timeout",
            "60",
            "--passphrase",
            "hunter2",
        ]);

        let ctx = OpContext::resolve(&args, file_config());

        assert_eq!(ctx.remote.as_ref().unwrap().host_str(), Some("flag.example.com"));
        assert_eq!(ctx.user_id, Some(user));
        assert_eq!(ctx.key_path, Some(PathBuf::from("/flag/key.asc")));
        assert_eq!(ctx.timeout, Duration::from_secs(60));
        assert_eq!(ctx.passphrase.as_deref(), Some("hunter2"));
        assert!(!format!("{:?}", ctx).contains("hunter2"));
    }

    #[test]
    fn test_config_fills_gaps() {
        let ctx = OpContext::resolve(&args(&[]), file_config());

        assert_eq!(ctx.remote.unwrap().host_str(), Some("config.example.com"));
        assert_eq!(ctx.user_id, Some(Uuid::nil()));
        assert_eq!(ctx.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_defaults_without_config() {
        let ctx = OpContext::resolve(&args(&[]), AppConfig::default());

        assert!(ctx.remote.is_none());
        assert_eq!(ctx.timeout, DEFAULT_REQUEST_TIMEOUT);
        assert!(matches!(ctx.vault(), Err(ContextError::MissingRemote)));
        assert!(matches!(ctx.identity(), Err(ContextError::MissingUserId)));
    }

    fn key_context(dir: &tempfile::TempDir, armored: &str, passphrase: &str) -> OpContext {
        let key_path = dir.path().join("key.asc");
        fs::write(&key_path, armored).unwrap();

        let mut ctx = OpContext::resolve(&args(&[]), AppConfig::default());
        ctx.user_id = Some(Uuid::new_v4());
        ctx.key_path = Some(key_path);
        ctx.passphrase = Some(passphrase.to_string());
        ctx
    }

    #[test]
    fn test_identity_unlocks_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = key_context(&dir, CLIENT_SECRET, CLIENT_PASSPHRASE);

        let (user_id, _identity) = ctx.identity().unwrap();
        assert_eq!(Some(user_id), ctx.user_id);
    }

    #[test]
    fn test_identity_rejects_wrong_passphrase() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = key_context(&dir, CLIENT_SECRET, "not the passphrase");

        assert!(matches!(
            ctx.identity(),
            Err(ContextError::InvalidKey(CryptoError::Unlock(_)))
        ));
    }

    #[test]
    fn test_identity_rejects_bad_key() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = key_context(&dir, "not a key", "");

        assert!(matches!(
            ctx.identity(),
            Err(ContextError::InvalidKey(CryptoError::KeyParse(_)))
        ));
    }

    #[test]
    fn test_missing_key_file() {
        let mut ctx = OpContext::resolve(&args(&[]), AppConfig::default());
        ctx.user_id = Some(Uuid::new_v4());
        ctx.key_path = Some(PathBuf::from("/nonexistent/key.asc"));

        assert!(matches!(ctx.identity(), Err(ContextError::ReadKey(_, _))));
    }
}
