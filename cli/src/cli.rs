//! # CLI Interface
//!
//! Defines the command-line argument structure for `rubix` using `clap`
//! derive. Secrets (passphrases, mnemonics, raw keys) can come from the
//! environment so they stay out of shell history; their values are never
//! echoed in `--help`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Rubix identity and signing client.
///
/// Derives keys from a 24-word mnemonic, keeps them encrypted on disk, and
/// signs DID registrations and transactions through a Rubix node.
#[derive(Parser, Debug)]
#[command(name = "rubix", about = "Rubix identity and signing client", version, propagate_version = true)]
pub struct RubixCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Base URL of the Rubix node.
    #[arg(long, global = true, env = "RUBIX_NODE_URL", default_value = rubix_core::config::DEFAULT_NODE_URL)]
    pub node_url: String,

    /// API key sent as `X-API-Key`.
    #[arg(long, global = true, env = "RUBIX_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory holding `<alias>/<did>/` key containers.
    #[arg(long, global = true, env = "RUBIX_ACCOUNT_DIR", default_value = "rubix-accounts")]
    pub account_dir: PathBuf,

    /// Maximum signatures submitted in one signing session.
    #[arg(long, global = true, env = "RUBIX_MAX_ROUNDS", default_value_t = rubix_core::config::DEFAULT_MAX_ROUNDS)]
    pub max_rounds: u32,

    /// Seconds before one signing session is abandoned.
    #[arg(long, global = true, env = "RUBIX_QUORUM_DEADLINE", default_value_t = 600)]
    pub deadline_secs: u64,

    /// Seconds before a single HTTP request times out.
    #[arg(long, global = true, env = "RUBIX_REQUEST_TIMEOUT", default_value_t = 300)]
    pub request_timeout_secs: u64,

    /// Log output format.
    #[arg(long, global = true, env = "RUBIX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh 24-word mnemonic and print it.
    Mnemonic,
    /// Create, import, and inspect stored accounts.
    #[command(subcommand)]
    Account(AccountCommand),
    /// Sign a message with a stored account.
    Sign(SignArgs),
    /// Verify a signature, locally against a public key or through the node.
    Verify(VerifyArgs),
    /// Transfer RBT tokens.
    SendRbt(SendRbtArgs),
    /// Transfer fungible tokens.
    SendFt(SendFtArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Derive a key from a mnemonic, register its DID, and store it.
    Create(CreateArgs),
    /// Register an existing raw private key and store it.
    Import(ImportArgs),
    /// Print the DID and public key stored under an alias.
    Show(ShowArgs),
    /// List every alias in the account directory.
    List,
}

/// Alias and the passphrase that unlocks it.
#[derive(Args, Debug)]
pub struct Unlock {
    /// Account alias.
    #[arg(long, short = 'a')]
    pub alias: String,

    /// Passphrase for the private key container.
    #[arg(long, env = "RUBIX_PASSPHRASE", hide_env_values = true)]
    pub passphrase: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub unlock: Unlock,

    /// 24-word mnemonic. A new one is generated and printed when omitted.
    #[arg(long, env = "RUBIX_MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Optional BIP-39 passphrase mixed into the seed.
    #[arg(long, env = "RUBIX_MNEMONIC_PASSPHRASE", hide_env_values = true, default_value = "")]
    pub mnemonic_passphrase: String,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub unlock: Unlock,

    /// Hex-encoded 32-byte secp256k1 private key.
    #[arg(long, env = "RUBIX_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Account alias.
    #[arg(long, short = 'a')]
    pub alias: String,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub unlock: Unlock,

    /// Message to sign.
    #[arg(long, short = 'm')]
    pub message: String,

    /// Treat the message as hex-encoded bytes.
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Message that was signed.
    #[arg(long, short = 'm')]
    pub message: String,

    /// Hex-encoded DER signature.
    #[arg(long, short = 's')]
    pub signature: String,

    /// Hex-encoded public key (33 or 65 bytes). Verifies locally.
    #[arg(long, conflicts_with = "did", required_unless_present = "did")]
    pub public_key: Option<String>,

    /// Signer DID. Asks the node to verify.
    #[arg(long)]
    pub did: Option<String>,

    /// Treat the message as hex-encoded bytes. Local verification only.
    #[arg(long, conflicts_with = "did")]
    pub hex: bool,
}

#[derive(Args, Debug)]
pub struct SendRbtArgs {
    #[command(flatten)]
    pub unlock: Unlock,

    /// Receiver DID.
    #[arg(long)]
    pub to: String,

    /// Amount of RBT.
    #[arg(long)]
    pub amount: f64,

    #[arg(long, default_value = "")]
    pub comment: String,
}

#[derive(Args, Debug)]
pub struct SendFtArgs {
    #[command(flatten)]
    pub unlock: Unlock,

    /// Receiver DID.
    #[arg(long)]
    pub to: String,

    /// FT name.
    #[arg(long)]
    pub name: String,

    /// Number of tokens.
    #[arg(long)]
    pub count: u64,

    /// DID of the FT's creator.
    #[arg(long)]
    pub creator: String,

    #[arg(long, default_value = "")]
    pub comment: String,
}
