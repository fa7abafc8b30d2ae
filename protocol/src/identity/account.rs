//! # Accounts
//!
//! An [`Account`] is a DID together with the keypair it was minted for. It is
//! what the key vault stores and what the transaction signer operates as.

use std::fmt;

use super::did::Did;
use crate::crypto::keys::{RubixKeypair, RubixPublicKey, RubixSignature};
use crate::crypto::signatures::SignatureError;

pub struct Account {
    did: Did,
    keypair: RubixKeypair,
}

impl Account {
    pub fn new(did: Did, keypair: RubixKeypair) -> Self {
        Self { did, keypair }
    }

    pub fn did(&self) -> &Did {
        &self.did
    }

    pub fn keypair(&self) -> &RubixKeypair {
        &self.keypair
    }

    pub fn public_key(&self) -> &RubixPublicKey {
        self.keypair.public_key()
    }

    pub fn sign(&self, message: &[u8]) -> Result<RubixSignature, SignatureError> {
        self.keypair.sign(message)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("did", &self.did)
            .field("public_key", self.keypair.public_key())
            .finish()
    }
}
