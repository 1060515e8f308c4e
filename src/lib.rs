//! tryte-encrypt - passphrase encryption for tryte strings (IOTA seeds)
//!
//! A seed is encrypted with AES-256-CTR under a key derived by scrypt from the
//! passphrase. The result is a tryte string itself, followed by a short suffix
//! such as `:T1` or `:N16P2` whenever non-default scrypt tuning was used, so
//! the passphrase is all a decrypting party needs to know.
//!
//! ```no_run
//! # async fn demo() -> tryte_encrypt::Result<()> {
//! use tryte_encrypt::TuningOptions;
//!
//! let seed = "A9TEST9SEED99RMDKUTQVGFMYPYGAQVOTGJCEFIEELKHRBCZYKAOQQWFRYNGYDAEIKTHQJINZDPYNYOS9";
//! let options = TuningOptions::parallelism_only(4);
//! let encrypted = tryte_encrypt::encrypt(seed, "Ƥāssφräsę", &options).await?;
//! assert!(encrypted.ends_with(":P4"));
//!
//! let decrypted = tryte_encrypt::decrypt(&encrypted, "Ƥāssφräsę", &TuningOptions::none()).await?;
//! assert_eq!(decrypted, seed);
//! # Ok(())
//! # }
//! ```
//!
//! Artifacts are not authenticated: decrypting with the wrong passphrase
//! returns a different, valid-looking tryte string rather than an error.

#![forbid(unsafe_code)]

pub mod artifact;
pub mod config;
pub mod engine;
pub mod error;
pub mod file_ops;
pub mod kdf;
pub mod params;
pub mod passphrase;
pub mod secretcrypt;
pub mod suffix;
pub mod trytes;

pub use config::EngineConfig;
pub use engine::CryptoEngine;
pub use error::{ErrorCategory, ErrorKind, Result, TryteCryptError};
pub use params::{TuningOptions, TuningParams};
pub use suffix::ParameterCodec;

/// Encrypt `seed` using an engine with the canonical defaults.
pub async fn encrypt(seed: &str, passphrase: &str, options: &TuningOptions) -> Result<String> {
    CryptoEngine::default()
        .encrypt(seed, passphrase, options)
        .await
}

/// Decrypt `artifact` using an engine with the canonical defaults.
pub async fn decrypt(artifact: &str, passphrase: &str, options: &TuningOptions) -> Result<String> {
    CryptoEngine::default()
        .decrypt(artifact, passphrase, options)
        .await
}
