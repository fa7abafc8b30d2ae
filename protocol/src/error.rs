//! Crate-level error type.
//!
//! Each module keeps its own error enum. [`Error`] wraps all of them for
//! callers that drive several modules at once, and [`Error::kind`] sorts
//! any failure into one of a small set of categories.

use thiserror::Error;

use crate::crypto::encryption::EncryptionError;
use crate::crypto::keys::KeyError;
use crate::crypto::mnemonic::MnemonicError;
use crate::crypto::signatures::SignatureError;
use crate::identity::did::DidError;
use crate::identity::registrar::RegistrationError;
use crate::quorum::QuorumError;
use crate::transaction::SignerError;
use crate::transport::TransportError;
use crate::vault::VaultError;

/// Broad failure categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input rejected before any work: bad mnemonic, key length, alias, amount.
    Validation,
    /// Wrong passphrase or tampered container.
    Authentication,
    /// A key container that cannot be parsed.
    ContainerFormat,
    /// An alias that is already bound, missing, or holds several identities.
    FilesystemConflict,
    /// The node could not be reached or answered with garbage.
    Transport,
    /// The node answered, but refused or broke the protocol.
    Protocol,
    /// A signing session hit its round limit or deadline.
    ProtocolExceeded,
    /// A cryptographic primitive failed.
    Crypto,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error(transparent)]
    Did(#[from] DidError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Quorum(#[from] QuorumError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Signer(#[from] SignerError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Mnemonic(e) => mnemonic_kind(e),
            Error::Key(e) => key_kind(e),
            Error::Signature(e) => signature_kind(e),
            Error::Encryption(e) => encryption_kind(e),
            Error::Did(_) => ErrorKind::Validation,
            Error::Vault(e) => vault_kind(e),
            Error::Transport(e) => transport_kind(e),
            Error::Quorum(e) => quorum_kind(e),
            Error::Registration(e) => registration_kind(e),
            Error::Signer(e) => signer_kind(e),
        }
    }
}

fn mnemonic_kind(e: &MnemonicError) -> ErrorKind {
    match e {
        MnemonicError::EmptyInput | MnemonicError::InvalidMnemonic(_) => ErrorKind::Validation,
        MnemonicError::GenerationFailed => ErrorKind::Crypto,
    }
}

fn key_kind(e: &KeyError) -> ErrorKind {
    match e {
        KeyError::DerivationFailure => ErrorKind::Crypto,
        KeyError::Mnemonic(inner) => mnemonic_kind(inner),
        KeyError::InvalidKeyLength { .. } | KeyError::InvalidPublicKey | KeyError::InvalidHex => {
            ErrorKind::Validation
        }
    }
}

fn signature_kind(e: &SignatureError) -> ErrorKind {
    match e {
        SignatureError::SigningFailure => ErrorKind::Crypto,
        SignatureError::InvalidPublicKeyLength(_) | SignatureError::InvalidPublicKey => {
            ErrorKind::Validation
        }
    }
}

fn encryption_kind(e: &EncryptionError) -> ErrorKind {
    match e {
        EncryptionError::EncryptFailed => ErrorKind::Crypto,
        EncryptionError::DecryptFailed => ErrorKind::Authentication,
        EncryptionError::CiphertextTooShort(_) => ErrorKind::ContainerFormat,
    }
}

fn vault_kind(e: &VaultError) -> ErrorKind {
    match e {
        VaultError::EmptyPassphrase
        | VaultError::InvalidAlias(_)
        | VaultError::InvalidDid(_) => ErrorKind::Validation,
        VaultError::AuthenticationFailure | VaultError::KeyMismatch => ErrorKind::Authentication,
        VaultError::MalformedContainer(_)
        | VaultError::InvalidBase64
        | VaultError::TruncatedContainer(_)
        | VaultError::InvalidKeyLength(_)
        | VaultError::InvalidPublicKey => ErrorKind::ContainerFormat,
        VaultError::AliasAlreadyBound { .. }
        | VaultError::CorruptedAlias { .. }
        | VaultError::AliasNotFound(_) => ErrorKind::FilesystemConflict,
        VaultError::SealFailed => ErrorKind::Crypto,
        VaultError::Io { .. } => ErrorKind::Io,
    }
}

fn transport_kind(e: &TransportError) -> ErrorKind {
    match e {
        TransportError::File { .. } => ErrorKind::Io,
        TransportError::InvalidConfig(_) => ErrorKind::Validation,
        TransportError::Request { .. }
        | TransportError::Timeout { .. }
        | TransportError::Status { .. }
        | TransportError::Decode { .. } => ErrorKind::Transport,
    }
}

fn quorum_kind(e: &QuorumError) -> ErrorKind {
    match e {
        QuorumError::Transport(inner) => transport_kind(inner),
        QuorumError::Signing(inner) => signature_kind(inner),
        QuorumError::Exceeded { .. } => ErrorKind::ProtocolExceeded,
        QuorumError::Rejected { .. }
        | QuorumError::InvalidChallenge { .. }
        | QuorumError::UnexpectedShape { .. }
        | QuorumError::SessionFinished => ErrorKind::Protocol,
    }
}

fn registration_kind(e: &RegistrationError) -> ErrorKind {
    match e {
        RegistrationError::Transport(inner) => transport_kind(inner),
        RegistrationError::Quorum(inner) => quorum_kind(inner),
        RegistrationError::DidRequestRejected(_)
        | RegistrationError::MissingDid { .. }
        | RegistrationError::InvalidDid(_) => ErrorKind::Protocol,
    }
}

fn signer_kind(e: &SignerError) -> ErrorKind {
    match e {
        SignerError::InvalidInput { .. } | SignerError::Encode(_) => ErrorKind::Validation,
        SignerError::Transport(inner) => transport_kind(inner),
        SignerError::Quorum(inner) => quorum_kind(inner),
        SignerError::AddressGeneration { .. } => ErrorKind::Protocol,
    }
}
