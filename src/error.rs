use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// In particular this means that use of Internal is never a guarantee
    /// the error is not, for example due to a user error - merely that it
    /// cannot be confidently determined by the code.
    Internal,

    /// The user provided invalid input or performed an action that is
    /// unsupported or impossible to complete.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
///
/// Note that a wrong passphrase is deliberately absent: artifacts carry no
/// authentication tag, so decrypting with the wrong passphrase or tuning
/// produces a valid but meaningless tryte string rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A seed or ciphertext contained a character outside the tryte alphabet.
    InvalidTryte,
    /// The tuning suffix of an artifact could not be parsed.
    SuffixMalformed,
    /// Tuning parameters are out of range (non-positive, or rejected by scrypt).
    InvalidParams,
    /// Key derivation would need more memory than the configured ceiling.
    ResourceExhausted,
    /// Low-level scrypt key derivation failed.
    ScryptFailure,
    /// Passphrase could not be obtained from the configured reader.
    PassphraseUnavailable,
    /// Unexpected state reached within tryte-encrypt logic.
    InternalInvariant,
    /// Interaction with the filesystem, stdin/stdout, or other I/O failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct TryteCryptError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

/// Details of a character rejected by the tryte codec.
///
/// Attached as the source of [`ErrorKind::InvalidTryte`] errors so callers can
/// recover the exact offending character and its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("character {character:?} at position {position} is not a tryte (expected '9' or 'A'-'Z')")]
pub struct InvalidTryteError {
    pub character: char,
    /// Zero-based character (not byte) index into the input.
    pub position: usize,
}

impl TryteCryptError {
    /// Creates a new error with a required category and display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Returns the rejected character details for [`ErrorKind::InvalidTryte`] errors.
    pub fn invalid_tryte(&self) -> Option<&InvalidTryteError> {
        let mut current = Some(self as &(dyn StdError + 'static));
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<InvalidTryteError>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TryteCryptError>;
