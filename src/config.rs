//! Engine configuration

use crate::params::TuningParams;

/// Default ceiling on scrypt working memory (2 GiB).
pub const DEFAULT_MAX_MEMORY_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Immutable configuration injected into [`crate::engine::CryptoEngine`].
///
/// `defaults` is the reference triple: parameters equal to it produce no
/// suffix, and toughness offsets are measured from it. Changing it changes
/// the meaning of every suffix, so engines that exchange artifacts must agree
/// on it. Almost everyone wants [`TuningParams::CANONICAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub defaults: TuningParams,
    /// Derivations whose estimated working memory exceeds this fail with
    /// [`crate::error::ErrorKind::ResourceExhausted`].
    pub max_memory_bytes: u64,
}

impl EngineConfig {
    pub fn new(defaults: TuningParams) -> Self {
        Self {
            defaults,
            max_memory_bytes: DEFAULT_MAX_MEMORY_BYTES,
        }
    }

    pub fn with_max_memory_bytes(mut self, max_memory_bytes: u64) -> Self {
        self.max_memory_bytes = max_memory_bytes;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(TuningParams::CANONICAL)
    }
}
