//! # On-Disk Key Store
//!
//! Layout:
//!
//! ```text
//! <root>/<alias>/<did>/pubKey.pem
//! <root>/<alias>/<did>/privKey.pem
//! ```
//!
//! Invariants:
//! - An alias holds at most one identity. A second save into a bound alias
//!   fails with [`VaultError::AliasAlreadyBound`] and leaves the existing
//!   files byte-for-byte untouched.
//! - More than one identity directory under an alias is corruption. It is
//!   reported, never resolved automatically.
//! - Both envelopes are encoded in memory, written into a hidden staging
//!   directory, then renamed into place. A failed save leaves no partial
//!   identity behind. Hidden entries never count as identities.
//!
//! Concurrent saves from separate processes are not coordinated.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::envelope::{
    decode_private_key, decode_public_key, encode_private_key, encode_public_key,
};
use super::error::VaultError;
use crate::config::{PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use crate::crypto::keys::RubixPublicKey;
use crate::identity::account::Account;
use crate::identity::did::Did;

/// A directory of account key containers.
#[derive(Clone, Debug)]
pub struct KeyStore {
    root: PathBuf,
}

impl KeyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist `account` under `alias`. Returns the identity directory.
    pub fn save(
        &self,
        alias: &str,
        account: &Account,
        passphrase: &str,
    ) -> Result<PathBuf, VaultError> {
        validate_alias(alias)?;
        let alias_dir = self.root.join(alias);

        if alias_dir.is_dir() {
            match identity_dirs(&alias_dir)?.len() {
                0 => {}
                1 => {
                    warn!(alias, "refusing to overwrite bound alias");
                    return Err(VaultError::AliasAlreadyBound {
                        alias: alias.to_string(),
                    });
                }
                n => {
                    return Err(VaultError::CorruptedAlias {
                        alias: alias.to_string(),
                        identities: n,
                    })
                }
            }
        }

        // Encode first; nothing touches the disk if this fails.
        let private_pem = encode_private_key(account.keypair(), passphrase)?;
        let public_pem = encode_public_key(account.public_key());

        fs::create_dir_all(&alias_dir).map_err(|e| VaultError::io(&alias_dir, e))?;
        let target = alias_dir.join(account.did().as_str());
        let staging = alias_dir.join(format!(
            ".{}.tmp-{}",
            account.did(),
            uuid::Uuid::new_v4().simple()
        ));

        let result = write_identity(&staging, &public_pem, &private_pem)
            .and_then(|()| fs::rename(&staging, &target).map_err(|e| VaultError::io(&target, e)));
        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_dir_all(&staging) {
                debug!(path = %staging.display(), error = %cleanup, "staging cleanup failed");
            }
            return Err(e);
        }

        info!(alias, did = %account.did(), "identity saved");
        Ok(target)
    }

    /// Decrypt the identity bound to `alias`.
    pub fn load(&self, alias: &str, passphrase: &str) -> Result<Account, VaultError> {
        let (did, dir) = self.identity_dir(alias)?;
        let private_path = dir.join(PRIVATE_KEY_FILE);
        let stored_public = read_public_key(&dir)?;
        let private_pem =
            fs::read_to_string(&private_path).map_err(|e| VaultError::io(&private_path, e))?;

        let keypair = decode_private_key(&private_pem, passphrase)?;
        if keypair.public_key() != &stored_public {
            return Err(VaultError::KeyMismatch);
        }

        debug!(alias, did = %did, "identity loaded");
        Ok(Account::new(did, keypair))
    }

    /// The DID bound to `alias`, without decrypting anything.
    pub fn did_for(&self, alias: &str) -> Result<Did, VaultError> {
        self.identity_dir(alias).map(|(did, _)| did)
    }

    /// The DID and public key bound to `alias`. No passphrase needed.
    pub fn public_key(&self, alias: &str) -> Result<(Did, RubixPublicKey), VaultError> {
        let (did, dir) = self.identity_dir(alias)?;
        Ok((did, read_public_key(&dir)?))
    }

    /// True when `alias` already holds exactly one identity.
    pub fn is_bound(&self, alias: &str) -> Result<bool, VaultError> {
        validate_alias(alias)?;
        let alias_dir = self.root.join(alias);
        if !alias_dir.is_dir() {
            return Ok(false);
        }
        Ok(identity_dirs(&alias_dir)?.len() == 1)
    }

    fn identity_dir(&self, alias: &str) -> Result<(Did, PathBuf), VaultError> {
        validate_alias(alias)?;
        let alias_dir = self.root.join(alias);
        if !alias_dir.is_dir() {
            return Err(VaultError::AliasNotFound(alias.to_string()));
        }
        let dirs = identity_dirs(&alias_dir)?;
        let corrupted = || VaultError::CorruptedAlias {
            alias: alias.to_string(),
            identities: dirs.len(),
        };
        let [dir] = dirs.as_slice() else {
            return Err(corrupted());
        };
        let name = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let did = Did::parse(name).map_err(|_| corrupted())?;
        Ok((did, dir.clone()))
    }

    /// Every alias directory under the root, sorted.
    pub fn aliases(&self) -> Result<Vec<String>, VaultError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut out: Vec<String> = visible_subdirs(&self.root)?
            .into_iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        out.sort();
        Ok(out)
    }
}

fn validate_alias(alias: &str) -> Result<(), VaultError> {
    let ok = !alias.is_empty()
        && !alias.starts_with('.')
        && !alias.contains(['/', '\\', '\0'])
        && Path::new(alias).components().count() == 1;
    if ok {
        Ok(())
    } else {
        Err(VaultError::InvalidAlias(alias.to_string()))
    }
}

fn read_public_key(dir: &Path) -> Result<RubixPublicKey, VaultError> {
    let path = dir.join(PUBLIC_KEY_FILE);
    let pem = fs::read_to_string(&path).map_err(|e| VaultError::io(&path, e))?;
    decode_public_key(&pem)
}

fn identity_dirs(alias_dir: &Path) -> Result<Vec<PathBuf>, VaultError> {
    visible_subdirs(alias_dir)
}

fn visible_subdirs(dir: &Path) -> Result<Vec<PathBuf>, VaultError> {
    let entries = fs::read_dir(dir).map_err(|e| VaultError::io(dir, e))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| VaultError::io(dir, e))?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let is_dir = entry
            .file_type()
            .map_err(|e| VaultError::io(entry.path(), e))?
            .is_dir();
        if is_dir && !hidden {
            out.push(entry.path());
        }
    }
    Ok(out)
}

fn write_identity(dir: &Path, public_pem: &str, private_pem: &str) -> Result<(), VaultError> {
    fs::create_dir(dir).map_err(|e| VaultError::io(dir, e))?;
    write_synced(&dir.join(PUBLIC_KEY_FILE), public_pem.as_bytes())?;
    write_synced(&dir.join(PRIVATE_KEY_FILE), private_pem.as_bytes())
}

fn write_synced(path: &Path, content: &[u8]) -> Result<(), VaultError> {
    let mut file = fs::File::create(path).map_err(|e| VaultError::io(path, e))?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| VaultError::io(path, e))
}
