//! # Identity Module
//!
//! Rubix identities: a DID minted by the node, bound one-to-one to the
//! secp256k1 keypair derived from the account's mnemonic.
//!
//! 1. **did**: the opaque identifier and the checks that make it safe to
//!    use as a vault directory name.
//! 2. **account**: a DID together with its keypair.
//! 3. **registrar**: minting and registering a DID through the quorum
//!    signing protocol, and asking the node to verify signatures.

pub mod account;
pub mod did;
pub mod registrar;

pub use account::Account;
pub use did::{Did, DidError};
pub use registrar::{register_account, register_did, verify_signature_online, RegistrationError};
