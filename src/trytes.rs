//! Tryte alphabet codec
//!
//! Maps tryte strings (alphabet `9`, `A`-`Z`) to byte strings and back.
//!
//! The mapping is a bijection between *all* tryte strings and *all* byte
//! strings: the input is read as a number in bijective base-27, which is then
//! written out in bijective base-256 (and vice versa). Two properties follow:
//! - any valid seed survives `encode(decode(seed))` unchanged, including
//!   leading `9`s and odd lengths;
//! - any byte string, such as the result of decrypting with the wrong key,
//!   encodes to a valid tryte string.
//!
//! Conversion is quadratic in the input length, which is irrelevant at seed
//! sizes (81 trytes) but makes this unsuitable for bulk data.

use crate::error::{ErrorCategory, ErrorKind, InvalidTryteError, Result, TryteCryptError};

/// The tryte alphabet, indexed by tryte value.
pub const ALPHABET: &[u8; 27] = b"9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const TRYTE_RADIX: u32 = 27;
const BYTE_RADIX: u32 = 256;

/// Returns the value (0..27) of a tryte character.
fn tryte_value(c: char) -> Option<u32> {
    match c {
        '9' => Some(0),
        'A'..='Z' => Some(c as u32 - 'A' as u32 + 1),
        _ => None,
    }
}

/// Checks that every character of `trytes` belongs to the alphabet.
pub fn validate(trytes: &str) -> Result<()> {
    match trytes
        .chars()
        .enumerate()
        .find(|(_, c)| tryte_value(*c).is_none())
    {
        Some((position, character)) => {
            let detail = InvalidTryteError {
                character,
                position,
            };
            Err(TryteCryptError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::InvalidTryte,
                "not a valid tryte string",
                detail,
            ))
        }
        None => Ok(()),
    }
}

/// Decode a tryte string into bytes.
///
/// Fails with [`ErrorKind::InvalidTryte`] naming the first offending
/// character and its position.
pub fn decode(trytes: &str) -> Result<Vec<u8>> {
    validate(trytes)?;

    let digits: Vec<u32> = trytes
        .chars()
        .filter_map(|c| tryte_value(c).map(|v| v + 1))
        .collect();
    let out = convert(&digits, TRYTE_RADIX, BYTE_RADIX);

    // Digits of a bijective base-256 numeral are 1..=256.
    Ok(out.into_iter().map(|d| (d - 1) as u8).collect())
}

/// Encode bytes as a tryte string. Never fails.
pub fn encode(bytes: &[u8]) -> String {
    let digits: Vec<u32> = bytes.iter().map(|&b| u32::from(b) + 1).collect();
    convert(&digits, BYTE_RADIX, TRYTE_RADIX)
        .into_iter()
        .map(|d| char::from(ALPHABET[(d - 1) as usize]))
        .collect()
}

/// Re-expresses a bijective base-`from` numeral (most significant digit
/// first, digits in `1..=from`) in bijective base-`to`.
fn convert(digits: &[u32], from: u32, to: u32) -> Vec<u32> {
    let mut n = Natural::default();
    for &d in digits {
        n.mul_add(from, d);
    }

    let mut out = Vec::new();
    while !n.is_zero() {
        let r = n.div_rem(to);
        if r == 0 {
            // n was a multiple of `to`: emit digit `to` and borrow one from the quotient
            n.decrement();
            out.push(to);
        } else {
            out.push(r);
        }
    }
    out.reverse();
    out
}

/// Minimal arbitrary-precision natural number (little-endian u32 limbs),
/// supporting only what radix conversion needs.
#[derive(Debug, Default)]
struct Natural {
    limbs: Vec<u32>,
}

impl Natural {
    fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    /// self = self * m + a
    fn mul_add(&mut self, m: u32, a: u32) {
        let mut carry = u64::from(a);
        for limb in self.limbs.iter_mut() {
            let v = u64::from(*limb) * u64::from(m) + carry;
            *limb = v as u32;
            carry = v >> 32;
        }
        if carry > 0 {
            self.limbs.push(carry as u32);
        }
    }

    /// self = self / d, returning self % d.
    fn div_rem(&mut self, d: u32) -> u32 {
        let mut rem = 0u64;
        for limb in self.limbs.iter_mut().rev() {
            let v = (rem << 32) | u64::from(*limb);
            *limb = (v / u64::from(d)) as u32;
            rem = v % u64::from(d);
        }
        while self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
        rem as u32
    }

    /// self = self - 1. Caller guarantees self > 0.
    fn decrement(&mut self) {
        for limb in self.limbs.iter_mut() {
            let (v, borrow) = limb.overflowing_sub(1);
            *limb = v;
            if !borrow {
                break;
            }
        }
        while self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
    }
}
