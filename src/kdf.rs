//! Passphrase to key derivation
//!
//! The key is `scrypt(passphrase, salt, N, r, p, 32)` where the salt is
//! `SHA256(SHA256(passphrase))`. Deriving the salt from the passphrase means
//! nothing but the passphrase and the tuning needs to travel with the
//! ciphertext, at the cost of salt independence: equal passphrases always
//! share a salt. Existing artifacts depend on this, so it must not change.

use std::fmt;

use scrypt::{Params, scrypt};
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::EngineConfig;
use crate::error::{ErrorCategory, ErrorKind, Result, TryteCryptError};
use crate::params::TuningParams;

/// Length of derived key in bytes
pub const KEY_LEN: usize = 32;

/// Length of the passphrase-derived salt in bytes
pub const SALT_LEN: usize = 32;

/// A derived symmetric key, wiped from memory on drop.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

/// `SHA256(SHA256(passphrase))`
pub fn passphrase_salt(passphrase: &[u8]) -> [u8; SALT_LEN] {
    Sha256::digest(Sha256::digest(passphrase)).into()
}

/// Estimated bytes of working memory scrypt needs for `tuning`: the `V`
/// array (`128 * r * N`) plus the `B` buffer (`128 * r * p`).
///
/// Returns `None` if the estimate does not fit in a `u64`.
pub fn memory_estimate(tuning: &TuningParams) -> Option<u64> {
    let n = 1u64.checked_shl(tuning.log_iterations)?;
    let block = 128u64.checked_mul(u64::from(tuning.memory_cost))?;
    block.checked_mul(n.checked_add(u64::from(tuning.parallelism))?)
}

/// Derives keys under a memory ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDerivation {
    max_memory_bytes: u64,
}

impl KeyDerivation {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_memory_bytes: config.max_memory_bytes,
        }
    }

    /// Validates `tuning` and converts it to scrypt parameters, without doing
    /// any expensive work.
    pub fn check(&self, tuning: &TuningParams) -> Result<Params> {
        tuning.validate()?;

        let estimate = memory_estimate(tuning).filter(|&m| m <= self.max_memory_bytes);
        if estimate.is_none() {
            return Err(TryteCryptError::with_kind(
                ErrorCategory::User,
                ErrorKind::ResourceExhausted,
                format!(
                    "scrypt tuning {} needs more than the configured {} bytes of memory",
                    tuning, self.max_memory_bytes
                ),
            ));
        }

        let log_n = u8::try_from(tuning.log_iterations).map_err(|e| {
            TryteCryptError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::InvalidParams,
                format!("log_iterations {} out of range", tuning.log_iterations),
                e,
            )
        })?;

        Params::new(log_n, tuning.memory_cost, tuning.parallelism, KEY_LEN).map_err(|e| {
            TryteCryptError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::InvalidParams,
                format!("scrypt rejected tuning {}: {}", tuning, e),
                e,
            )
        })
    }

    /// Derive the key for `passphrase` under `tuning`.
    ///
    /// Deterministic, and deliberately expensive: cost scales with `2^N * r * p`.
    pub fn derive_key(&self, passphrase: &str, tuning: &TuningParams) -> Result<DerivedKey> {
        let params = self.check(tuning)?;
        let salt = passphrase_salt(passphrase.as_bytes());
        derive_with_salt(passphrase.as_bytes(), &salt, &params, tuning)
    }

    /// Same as [`KeyDerivation::derive_key`], run on tokio's blocking pool.
    ///
    /// Parameters are checked before anything is spawned. Dropping the
    /// returned future does not stop a derivation already running; its result
    /// is discarded.
    pub async fn derive_key_async(
        &self,
        passphrase: &str,
        tuning: &TuningParams,
    ) -> Result<DerivedKey> {
        let params = self.check(tuning)?;
        let passphrase = Zeroizing::new(passphrase.to_owned());
        let tuning = *tuning;

        tokio::task::spawn_blocking(move || {
            let salt = passphrase_salt(passphrase.as_bytes());
            derive_with_salt(passphrase.as_bytes(), &salt, &params, &tuning)
        })
        .await
        .map_err(|e| {
            TryteCryptError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::InternalInvariant,
                "key derivation task did not complete",
                e,
            )
        })?
    }
}

impl Default for KeyDerivation {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

fn derive_with_salt(
    passphrase: &[u8],
    salt: &[u8],
    params: &Params,
    tuning: &TuningParams,
) -> Result<DerivedKey> {
    debug!(
        log_iterations = tuning.log_iterations,
        memory_cost = tuning.memory_cost,
        parallelism = tuning.parallelism,
        "deriving key"
    );

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    scrypt(passphrase, salt, params, &mut key[..]).map_err(|e| {
        TryteCryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::ScryptFailure,
            "scrypt key derivation failed",
            e,
        )
    })?;

    Ok(DerivedKey(key))
}
