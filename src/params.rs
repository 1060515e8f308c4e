//! scrypt tuning parameters
//!
//! [`TuningParams`] is a complete, validated triple. [`TuningOptions`] is the
//! partial form callers supply and suffixes decode to; missing fields are
//! filled by [`TuningOptions::resolve`] and [`TuningOptions::or`].

use std::fmt;

use crate::error::{ErrorCategory, ErrorKind, Result, TryteCryptError};

/// Complete scrypt tuning: `N = 2^log_iterations`, `r = memory_cost`,
/// `p = parallelism`. All fields are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TuningParams {
    pub log_iterations: u32,
    pub memory_cost: u32,
    pub parallelism: u32,
}

impl TuningParams {
    /// The canonical defaults (N = 2^14 = 16384, r = 8, p = 8).
    pub const CANONICAL: TuningParams = TuningParams {
        log_iterations: 14,
        memory_cost: 8,
        parallelism: 8,
    };

    /// Builds a triple, rejecting non-positive fields.
    pub fn new(log_iterations: u32, memory_cost: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            log_iterations,
            memory_cost,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("log_iterations", self.log_iterations),
            ("memory_cost", self.memory_cost),
            ("parallelism", self.parallelism),
        ] {
            if value == 0 {
                return Err(TryteCryptError::with_kind(
                    ErrorCategory::User,
                    ErrorKind::InvalidParams,
                    format!("{} must be positive", name),
                ));
            }
        }
        Ok(())
    }

    /// Returns `t` if every field equals the matching field of `defaults`
    /// plus the same offset `t`.
    pub fn toughness_relative_to(&self, defaults: &TuningParams) -> Option<i64> {
        let t = i64::from(self.log_iterations) - i64::from(defaults.log_iterations);
        let r = i64::from(self.memory_cost) - i64::from(defaults.memory_cost);
        let p = i64::from(self.parallelism) - i64::from(defaults.parallelism);
        (t == r && t == p).then_some(t)
    }

    /// Applies a toughness offset uniformly to all three fields of `self`.
    pub fn offset_by(&self, toughness: i64) -> Result<Self> {
        let shift = |value: u32| -> Result<u32> {
            i64::from(value)
                .checked_add(toughness)
                .and_then(|shifted| u32::try_from(shifted).ok())
                .filter(|&v| v > 0)
                .ok_or_else(|| {
                    TryteCryptError::with_kind(
                        ErrorCategory::User,
                        ErrorKind::InvalidParams,
                        format!(
                            "toughness {} moves tuning parameter {} out of range",
                            toughness, value
                        ),
                    )
                })
        };
        Ok(Self {
            log_iterations: shift(self.log_iterations)?,
            memory_cost: shift(self.memory_cost)?,
            parallelism: shift(self.parallelism)?,
        })
    }
}

impl Default for TuningParams {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl fmt::Display for TuningParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "logN={} r={} p={}",
            self.log_iterations, self.memory_cost, self.parallelism
        )
    }
}

/// Partial tuning supplied by a caller or decoded from a suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TuningOptions {
    pub log_iterations: Option<u32>,
    pub memory_cost: Option<u32>,
    pub parallelism: Option<u32>,
}

impl TuningOptions {
    /// No overrides; resolves to whatever the defaults are.
    pub fn none() -> Self {
        Self::default()
    }

    /// Only the parallelism knob, the single-field tuning of older releases.
    pub fn parallelism_only(parallelism: u32) -> Self {
        Self {
            parallelism: Some(parallelism),
            ..Self::default()
        }
    }

    /// Offsets all three fields of `defaults` by `toughness`.
    pub fn toughness(toughness: i64, defaults: &TuningParams) -> Result<Self> {
        Ok(defaults.offset_by(toughness)?.into())
    }

    pub fn with_log_iterations(mut self, log_iterations: u32) -> Self {
        self.log_iterations = Some(log_iterations);
        self
    }

    pub fn with_memory_cost(mut self, memory_cost: u32) -> Self {
        self.memory_cost = Some(memory_cost);
        self
    }

    pub fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.log_iterations.is_none() && self.memory_cost.is_none() && self.parallelism.is_none()
    }

    /// Field-wise fallback: fields set on `self` win, the rest come from `fallback`.
    pub fn or(self, fallback: TuningOptions) -> TuningOptions {
        TuningOptions {
            log_iterations: self.log_iterations.or(fallback.log_iterations),
            memory_cost: self.memory_cost.or(fallback.memory_cost),
            parallelism: self.parallelism.or(fallback.parallelism),
        }
    }

    /// Fills missing fields from `defaults` and validates the result.
    pub fn resolve(&self, defaults: &TuningParams) -> Result<TuningParams> {
        TuningParams::new(
            self.log_iterations.unwrap_or(defaults.log_iterations),
            self.memory_cost.unwrap_or(defaults.memory_cost),
            self.parallelism.unwrap_or(defaults.parallelism),
        )
    }
}

impl From<TuningParams> for TuningOptions {
    fn from(params: TuningParams) -> Self {
        Self {
            log_iterations: Some(params.log_iterations),
            memory_cost: Some(params.memory_cost),
            parallelism: Some(params.parallelism),
        }
    }
}

/// Three-tier resolution: `primary` over `secondary` over `defaults`.
///
/// For decryption `primary` is what the artifact's suffix specifies and
/// `secondary` is whatever the caller passed in.
pub fn resolve(
    primary: &TuningOptions,
    secondary: &TuningOptions,
    defaults: &TuningParams,
) -> Result<TuningParams> {
    primary.or(*secondary).resolve(defaults)
}
