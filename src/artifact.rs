//! Encrypted artifact framing
//!
//! An artifact is the ciphertext as a tryte string, optionally followed by
//! the tuning suffix:
//!
//! ```text
//! CIPHERTRYTES            default tuning
//! CIPHERTRYTES:SUFFIX     anything else, e.g. "KXWQ9TB:P1"
//! ```
//!
//! Trytes never contain `:`, so the first `:` always ends the ciphertext.

/// Separates ciphertext from the tuning suffix.
pub const DELIMITER: char = ':';

/// Join ciphertext and suffix. An empty suffix adds no delimiter.
pub fn wrap(cipher_trytes: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        cipher_trytes.to_owned()
    } else {
        format!("{}{}{}", cipher_trytes, DELIMITER, suffix)
    }
}

/// Split an artifact on its first delimiter into ciphertext and suffix.
///
/// Nothing is validated here; the tryte codec and suffix parser reject
/// malformed parts.
pub fn unwrap(artifact: &str) -> (&str, Option<&str>) {
    match artifact.split_once(DELIMITER) {
        Some((cipher_trytes, suffix)) => (cipher_trytes, Some(suffix)),
        None => (artifact, None),
    }
}
