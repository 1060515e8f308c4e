//! Tuning suffix codec
//!
//! An artifact may end in `:` followed by a suffix describing the scrypt
//! tuning used to produce it. The suffix is a run of tagged decimal fields
//! with no separators, emitted in the order:
//!
//! - `T<int>`: toughness, a (possibly negative) offset applied to all three
//!   default parameters at once
//! - `N<int>`: log2 of the scrypt iteration count
//! - `R<int>`: scrypt memory cost (block size)
//! - `P<int>`: scrypt parallelism
//!
//! Only fields that differ from the defaults are written, so default tuning
//! has an empty suffix and no `:` at all.
//!
//! Parsing is strict about numbers and lenient about tags: any ASCII letter
//! followed by a number is a field, fields with unknown tags are skipped, and
//! anything else fails with [`ErrorKind::SuffixMalformed`].

use crate::error::{ErrorCategory, ErrorKind, Result, TryteCryptError};
use crate::params::{self, TuningOptions, TuningParams};

/// One `<tag><number>` field of a suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub tag: char,
    pub value: i64,
    /// Byte offset of the tag within the suffix.
    pub position: usize,
}

/// Splits a suffix into fields without interpreting tags.
pub fn tokenize(suffix: &str) -> Result<Vec<Field>> {
    let bytes = suffix.as_bytes();
    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let tag = bytes[pos];
        if !tag.is_ascii_alphabetic() {
            return Err(malformed(suffix, pos, "expected a tag letter"));
        }
        let start = pos;
        pos += 1;

        let negative = tag == b'T' && bytes.get(pos) == Some(&b'-');
        if negative {
            pos += 1;
        }

        let digits_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == digits_start {
            return Err(malformed(suffix, digits_start, "expected a decimal number"));
        }

        // Slicing is safe: everything between start and pos is ASCII.
        let digits = &suffix[digits_start..pos];
        let magnitude: i64 = digits
            .parse()
            .map_err(|_| malformed(suffix, digits_start, "number out of range"))?;

        fields.push(Field {
            tag: char::from(tag),
            value: if negative { -magnitude } else { magnitude },
            position: start,
        });
    }

    Ok(fields)
}

fn malformed(suffix: &str, position: usize, what: &str) -> TryteCryptError {
    TryteCryptError::with_kind(
        ErrorCategory::User,
        ErrorKind::SuffixMalformed,
        format!("malformed tuning suffix {:?} at offset {}: {}", suffix, position, what),
    )
}

/// Encodes and decodes tuning suffixes relative to a fixed set of defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterCodec {
    defaults: TuningParams,
}

impl ParameterCodec {
    pub fn new(defaults: TuningParams) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &TuningParams {
        &self.defaults
    }

    /// Encode `params` as a suffix. Returns an empty string for the defaults.
    ///
    /// A triple offset uniformly from the defaults collapses to a single
    /// `T` field.
    pub fn encode(&self, params: &TuningParams) -> String {
        let defaults = &self.defaults;

        if let Some(toughness) = params.toughness_relative_to(defaults) {
            return if toughness == 0 {
                String::new()
            } else {
                format!("T{}", toughness)
            };
        }

        let mut suffix = String::new();
        if params.log_iterations != defaults.log_iterations {
            suffix.push_str(&format!("N{}", params.log_iterations));
        }
        if params.memory_cost != defaults.memory_cost {
            suffix.push_str(&format!("R{}", params.memory_cost));
        }
        if params.parallelism != defaults.parallelism {
            suffix.push_str(&format!("P{}", params.parallelism));
        }
        suffix
    }

    /// Parse a suffix into the fields it sets.
    ///
    /// Fields apply in order of appearance: `T` sets all three parameters
    /// from the defaults, and a later `N`, `R` or `P` overrides just its own.
    pub fn parse(&self, suffix: &str) -> Result<TuningOptions> {
        let mut options = TuningOptions::none();

        for field in tokenize(suffix)? {
            let explicit = || {
                u32::try_from(field.value).map_err(|_| {
                    malformed(suffix, field.position, "parameter does not fit in 32 bits")
                })
            };
            match field.tag {
                'T' => options = self.defaults.offset_by(field.value)?.into(),
                'N' => options.log_iterations = Some(explicit()?),
                'R' => options.memory_cost = Some(explicit()?),
                'P' => options.parallelism = Some(explicit()?),
                _ => {}
            }
        }

        Ok(options)
    }

    /// Resolve the tuning for an artifact: fields from `suffix`, then
    /// `fallback` (typically caller-supplied options), then the defaults.
    ///
    /// A missing or empty suffix resolves to `fallback` over the defaults.
    pub fn decode(&self, suffix: Option<&str>, fallback: &TuningOptions) -> Result<TuningParams> {
        let from_suffix = match suffix {
            Some(s) => self.parse(s)?,
            None => TuningOptions::none(),
        };
        params::resolve(&from_suffix, fallback, &self.defaults)
    }
}

impl Default for ParameterCodec {
    fn default() -> Self {
        Self::new(TuningParams::CANONICAL)
    }
}
