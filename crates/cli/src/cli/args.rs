pub use clap::Parser;

use std::path::PathBuf;
use url::Url;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pbolt")]
#[command(about = "Log in to a vault and manage its secrets", version)]
pub struct Args {
    /// Base URL of the vault (defaults to `remote` in config.toml)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Your user id on the vault
    #[arg(long, global = true)]
    pub user_id: Option<Uuid>,

    /// Path to your armored OpenPGP private key
    #[arg(long = "key", global = true)]
    pub key_path: Option<PathBuf>,

    /// Passphrase that unlocks the private key
    #[arg(long, global = true, env = "PBOLT_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// Path to the pbolt config directory (defaults to ~/.pbolt)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Default log level; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: crate::Command,
}
