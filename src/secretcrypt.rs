//! AES-256 in counter mode
//!
//! The keystream always starts from the all-zero counter block. There is no
//! nonce: keys are unique per (passphrase, tuning) pair and the same inputs
//! are meant to produce the same ciphertext. There is also no MAC, so
//! decrypting with the wrong key silently yields garbage.

use aes::Aes256;
use ctr::Ctr128BE;
use ctr::cipher::{KeyIvInit, StreamCipher};

use crate::kdf::{DerivedKey, KEY_LEN};

type Aes256Ctr = Ctr128BE<Aes256>;

/// Length of the AES counter block in bytes
pub const BLOCK_LEN: usize = 16;

/// The fixed initial counter block.
const INITIAL_COUNTER: [u8; BLOCK_LEN] = [0u8; BLOCK_LEN];

/// XOR `data` in place with the keystream for `key`. Encryption and
/// decryption are the same operation.
pub fn apply_keystream(key: &DerivedKey, data: &mut [u8]) {
    apply_keystream_from(key.as_bytes(), &INITIAL_COUNTER, data);
}

/// Encrypt `plaintext`, returning the ciphertext.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> Vec<u8> {
    let mut buf = plaintext.to_vec();
    apply_keystream(key, &mut buf);
    buf
}

/// Decrypt `ciphertext`, returning the plaintext.
pub fn decrypt(key: &DerivedKey, ciphertext: &[u8]) -> Vec<u8> {
    encrypt(key, ciphertext)
}

fn apply_keystream_from(key: &[u8; KEY_LEN], counter: &[u8; BLOCK_LEN], data: &mut [u8]) {
    let mut cipher = Aes256Ctr::new(key.into(), counter.into());
    cipher.apply_keystream(data);
}
