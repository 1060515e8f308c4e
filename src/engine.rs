//! Seed encryption and decryption
//!
//! [`CryptoEngine`] ties the pieces together:
//!
//! ```text
//! encrypt: seed --trytes::decode--> bytes --AES-CTR(scrypt(passphrase))--> bytes
//!               --trytes::encode--> ciphertext [":" suffix]
//! decrypt: the same pipeline in reverse, with tuning taken from the suffix
//! ```
//!
//! Everything that can reject input (alphabet, suffix, tuning limits) runs
//! before key derivation, which is the only expensive step and the only
//! point where the async variants suspend.

use tracing::debug;

use crate::artifact;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::kdf::{DerivedKey, KeyDerivation};
use crate::params::{TuningOptions, TuningParams};
use crate::secretcrypt;
use crate::suffix::ParameterCodec;
use crate::trytes;

/// Encrypts and decrypts tryte strings. Stateless and cheap to clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoEngine {
    codec: ParameterCodec,
    kdf: KeyDerivation,
}

/// Everything needed to run the cipher once the key is known.
struct Pending {
    tuning: TuningParams,
    suffix: String,
    input: Vec<u8>,
}

impl CryptoEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            codec: ParameterCodec::new(config.defaults),
            kdf: KeyDerivation::new(&config),
        }
    }

    /// The reference tuning: no suffix is written for it.
    pub fn defaults(&self) -> &TuningParams {
        self.codec.defaults()
    }

    pub fn codec(&self) -> &ParameterCodec {
        &self.codec
    }

    /// Encrypt `seed` with `passphrase`, returning a self-describing artifact.
    ///
    /// Fields missing from `options` take the engine defaults. Identical
    /// arguments always produce identical output.
    pub async fn encrypt(
        &self,
        seed: &str,
        passphrase: &str,
        options: &TuningOptions,
    ) -> Result<String> {
        let pending = self.prepare_encrypt(seed, options)?;
        let key = self
            .kdf
            .derive_key_async(passphrase, &pending.tuning)
            .await?;
        Ok(finish_encrypt(&key, pending))
    }

    /// Blocking variant of [`CryptoEngine::encrypt`].
    pub fn encrypt_blocking(
        &self,
        seed: &str,
        passphrase: &str,
        options: &TuningOptions,
    ) -> Result<String> {
        let pending = self.prepare_encrypt(seed, options)?;
        let key = self.kdf.derive_key(passphrase, &pending.tuning)?;
        Ok(finish_encrypt(&key, pending))
    }

    /// Decrypt an artifact produced by [`CryptoEngine::encrypt`].
    ///
    /// Tuning comes from the artifact's suffix first, then `options`, then the
    /// engine defaults.
    ///
    /// There is no integrity check. A wrong passphrase, or `options` that
    /// disagree with what was used to encrypt a suffix-less artifact, yields a
    /// valid but meaningless tryte string, not an error.
    pub async fn decrypt(
        &self,
        artifact: &str,
        passphrase: &str,
        options: &TuningOptions,
    ) -> Result<String> {
        let pending = self.prepare_decrypt(artifact, options)?;
        let key = self
            .kdf
            .derive_key_async(passphrase, &pending.tuning)
            .await?;
        Ok(finish_decrypt(&key, pending))
    }

    /// Blocking variant of [`CryptoEngine::decrypt`].
    pub fn decrypt_blocking(
        &self,
        artifact: &str,
        passphrase: &str,
        options: &TuningOptions,
    ) -> Result<String> {
        let pending = self.prepare_decrypt(artifact, options)?;
        let key = self.kdf.derive_key(passphrase, &pending.tuning)?;
        Ok(finish_decrypt(&key, pending))
    }

    fn prepare_encrypt(&self, seed: &str, options: &TuningOptions) -> Result<Pending> {
        let tuning = options.resolve(self.defaults())?;
        let suffix = self.codec.encode(&tuning);
        let input = trytes::decode(seed).map_err(|e| e.with_context("invalid seed"))?;
        self.kdf.check(&tuning)?;

        debug!(%tuning, suffix = %suffix, bytes = input.len(), "encrypting");
        Ok(Pending {
            tuning,
            suffix,
            input,
        })
    }

    fn prepare_decrypt(&self, artifact: &str, options: &TuningOptions) -> Result<Pending> {
        let (cipher_trytes, suffix) = artifact::unwrap(artifact);
        let tuning = self
            .codec
            .decode(suffix, options)
            .map_err(|e| e.with_context("invalid artifact suffix"))?;
        let input = trytes::decode(cipher_trytes)
            .map_err(|e| e.with_context("invalid artifact ciphertext"))?;
        self.kdf.check(&tuning)?;

        debug!(%tuning, bytes = input.len(), "decrypting");
        Ok(Pending {
            tuning,
            suffix: suffix.unwrap_or_default().to_owned(),
            input,
        })
    }
}

impl Default for CryptoEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn finish_encrypt(key: &DerivedKey, pending: Pending) -> String {
    let ciphertext = secretcrypt::encrypt(key, &pending.input);
    artifact::wrap(&trytes::encode(&ciphertext), &pending.suffix)
}

fn finish_decrypt(key: &DerivedKey, pending: Pending) -> String {
    let plaintext = secretcrypt::decrypt(key, &pending.input);
    trytes::encode(&plaintext)
}
