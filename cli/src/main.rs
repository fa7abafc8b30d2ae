// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Rubix CLI
//!
//! Entry point for the `rubix` binary. Parses CLI arguments, initializes
//! logging, and dispatches to the identity core.
//!
//! - `mnemonic` : generate a 24-word phrase
//! - `account`  : create, import, show, list stored identities
//! - `sign`     : sign a message with a stored identity
//! - `verify`   : check a signature locally or through the node
//! - `send-rbt` : RBT transfer
//! - `send-ft`  : FT transfer
//! - `version`  : print build version information

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use zeroize::Zeroizing;

use rubix_core::config::{ClientConfig, QuorumConfig};
use rubix_core::crypto::{generate_mnemonic, Mnemonic, RubixKeypair, RubixPublicKey, RubixSignature};
use rubix_core::identity::{register_account, verify_signature_online, Account, Did};
use rubix_core::transaction::Signer;
use rubix_core::transport::{HttpTransport, Transport};
use rubix_core::vault::KeyStore;

use cli::{AccountCommand, Commands, GlobalArgs, RubixCli, Unlock};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = RubixCli::parse();
    logging::init_logging(logging::DEFAULT_FILTER, cli.global.log_format);

    let global = &cli.global;
    match cli.command {
        Commands::Mnemonic => new_mnemonic(),
        Commands::Account(AccountCommand::Create(args)) => create_account(global, args).await,
        Commands::Account(AccountCommand::Import(args)) => import_account(global, args).await,
        Commands::Account(AccountCommand::Show(args)) => show_account(global, &args.alias),
        Commands::Account(AccountCommand::List) => list_accounts(global),
        Commands::Sign(args) => sign_message(global, args),
        Commands::Verify(args) => verify_message(global, args).await,
        Commands::SendRbt(args) => send_rbt(global, args).await,
        Commands::SendFt(args) => send_ft(global, args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn client_config(global: &GlobalArgs) -> ClientConfig {
    ClientConfig {
        node_url: global.node_url.clone(),
        request_timeout: Duration::from_secs(global.request_timeout_secs),
        api_key: global.api_key.clone(),
        quorum: QuorumConfig {
            max_rounds: global.max_rounds,
            deadline: Duration::from_secs(global.deadline_secs),
        },
    }
}

fn transport(config: &ClientConfig) -> Result<Arc<dyn Transport>> {
    let transport = HttpTransport::new(config)
        .with_context(|| format!("failed to configure transport for {}", config.node_url))?;
    Ok(Arc::new(transport))
}

fn unlock(global: &GlobalArgs, unlock: &Unlock) -> Result<Account> {
    KeyStore::new(&global.account_dir)
        .load(&unlock.alias, &unlock.passphrase)
        .with_context(|| format!("failed to unlock account '{}'", unlock.alias))
}

fn message_bytes(message: &str, is_hex: bool) -> Result<Vec<u8>> {
    if is_hex {
        hex::decode(message.trim()).context("message is not valid hex")
    } else {
        Ok(message.as_bytes().to_vec())
    }
}

fn new_mnemonic() -> Result<()> {
    let mnemonic = generate_mnemonic().context("failed to generate mnemonic")?;
    println!("{}", mnemonic.phrase());
    Ok(())
}

/// Registers `keypair` with the node and stores it under the alias.
///
/// The alias is checked first so a bound alias never costs a registration.
async fn register_and_store(global: &GlobalArgs, unlock: &Unlock, keypair: RubixKeypair) -> Result<()> {
    let store = KeyStore::new(&global.account_dir);
    if store.is_bound(&unlock.alias)? {
        bail!("alias '{}' is already bound to an identity", unlock.alias);
    }
    if unlock.passphrase.is_empty() {
        bail!("a passphrase is required to store the account");
    }

    let config = client_config(global);
    let transport = transport(&config)?;
    tracing::info!(alias = %unlock.alias, node = %config.node_url, "registering account");
    let account = register_account(transport.as_ref(), keypair, config.quorum)
        .await
        .context("DID registration failed")?;

    let path = store
        .save(&unlock.alias, &account, &unlock.passphrase)
        .with_context(|| format!("failed to store account '{}'", unlock.alias))?;
    tracing::info!(path = %path.display(), "account stored");

    println!("{}", account.did());
    Ok(())
}

async fn create_account(global: &GlobalArgs, args: cli::CreateArgs) -> Result<()> {
    let mnemonic = match args.mnemonic.as_deref() {
        Some(phrase) => Mnemonic::parse(phrase).context("invalid mnemonic")?,
        None => {
            let mnemonic = generate_mnemonic().context("failed to generate mnemonic")?;
            eprintln!("Generated mnemonic. Write it down; it is the only way to recover this account:");
            eprintln!("{}", mnemonic.phrase());
            mnemonic
        }
    };
    let seed = mnemonic.to_seed(&args.mnemonic_passphrase)?;
    let keypair = RubixKeypair::from_seed(&seed).context("key derivation failed")?;
    register_and_store(global, &args.unlock, keypair).await
}

async fn import_account(global: &GlobalArgs, args: cli::ImportArgs) -> Result<()> {
    let private_key = Zeroizing::new(args.private_key);
    let keypair = RubixKeypair::from_hex(private_key.trim()).context("invalid private key")?;
    register_and_store(global, &args.unlock, keypair).await
}

fn show_account(global: &GlobalArgs, alias: &str) -> Result<()> {
    let (did, public_key) = KeyStore::new(&global.account_dir)
        .public_key(alias)
        .with_context(|| format!("failed to read account '{alias}'"))?;
    println!("alias      : {alias}");
    println!("did        : {did}");
    println!("public key : {public_key}");
    Ok(())
}

fn list_accounts(global: &GlobalArgs) -> Result<()> {
    let store = KeyStore::new(&global.account_dir);
    for alias in store.aliases()? {
        match store.did_for(&alias) {
            Ok(did) => println!("{alias}\t{did}"),
            Err(e) => println!("{alias}\t<{e}>"),
        }
    }
    Ok(())
}

fn sign_message(global: &GlobalArgs, args: cli::SignArgs) -> Result<()> {
    let account = unlock(global, &args.unlock)?;
    let message = message_bytes(&args.message, args.hex)?;
    let signature = account.sign(&message).context("signing failed")?;
    println!("{}", signature.to_hex());
    Ok(())
}

async fn verify_message(global: &GlobalArgs, args: cli::VerifyArgs) -> Result<()> {
    let signature = RubixSignature::from_hex(&args.signature).context("signature is not valid hex")?;

    let valid = match (&args.public_key, &args.did) {
        (Some(public_key), _) => {
            let public_key = RubixPublicKey::from_hex(public_key).context("invalid public key")?;
            let message = message_bytes(&args.message, args.hex)?;
            public_key.verify(&message, &signature)
        }
        (None, Some(did)) => {
            let did = Did::parse(did).context("invalid DID")?;
            let config = client_config(global);
            let transport = transport(&config)?;
            verify_signature_online(transport.as_ref(), &did, &args.message, &signature)
                .await
                .context("node verification failed")?
        }
        (None, None) => bail!("either --public-key or --did is required"),
    };

    report_verdict(valid)
}

/// Prints the verdict. An invalid signature is an error so the process
/// exits non-zero through the normal error path.
fn report_verdict(valid: bool) -> Result<()> {
    println!("{}", if valid { "valid" } else { "invalid" });
    if !valid {
        bail!("signature does not verify");
    }
    Ok(())
}

async fn send_rbt(global: &GlobalArgs, args: cli::SendRbtArgs) -> Result<()> {
    let account = unlock(global, &args.unlock)?;
    let receiver = Did::parse(&args.to).context("invalid receiver DID")?;
    let config = client_config(global);
    let signer = Signer::new(account, transport(&config)?, config.quorum);

    let outcome = signer
        .send_rbt_tokens(&receiver, args.amount, &args.comment)
        .await
        .context("RBT transfer failed")?;
    println!("{}", outcome.message.unwrap_or_else(|| "transfer complete".into()));
    Ok(())
}

async fn send_ft(global: &GlobalArgs, args: cli::SendFtArgs) -> Result<()> {
    let account = unlock(global, &args.unlock)?;
    let receiver = Did::parse(&args.to).context("invalid receiver DID")?;
    let creator = Did::parse(&args.creator).context("invalid creator DID")?;
    let config = client_config(global);
    let signer = Signer::new(account, transport(&config)?, config.quorum);

    let outcome = signer
        .send_ft(&receiver, &args.name, args.count, &creator, &args.comment)
        .await
        .context("FT transfer failed")?;
    println!("{}", outcome.message.unwrap_or_else(|| "transfer complete".into()));
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("rubix      {}", env!("CARGO_PKG_VERSION"));
    println!("signatures secp256k1 ECDSA, mode {}", rubix_core::config::SIGNATURE_MODE);
    println!("rustc      {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
