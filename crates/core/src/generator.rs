//! Pseudo-random key generation
//!
//! String keys are built from code points drawn uniformly over the whole
//! Unicode range, redrawing anything in a private-use band, the surrogate
//! range, or a noncharacter. Some containers under test hash or compare
//! text in ways that break on ill-formed input, so every generated string
//! is composed solely of well-formed, non-private-use scalar values.
//!
//! Integer keys are drawn uniformly from `[min_value, i64::MAX)`.
//!
//! The generator is seeded from OS entropy unless a seed is supplied.
//! Reproducibility across runs is opt-in; reuse within a run is what the
//! matrix relies on.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result};
use crate::keys::KeySet;

/// Smallest code point drawn (inclusive)
pub const MIN_CODE_POINT: u32 = 0;

/// Largest code point drawn (exclusive)
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// True if `code_point` may appear in a generated key.
pub fn is_valid_code_point(code_point: u32) -> bool {
    match code_point {
        // BMP private use area
        0xE000..=0xF8FF => false,
        // Supplementary Private Use Area-A
        0xF0000..=0xFFFFF => false,
        // Supplementary Private Use Area-B
        0x100000..=0x10FFFF => false,
        // UTF-16 surrogates
        0xD800..=0xDFFF => false,
        // noncharacters
        0xFDD0..=0xFDEF | 0xFFFE | 0xFFFF => false,
        _ => true,
    }
}

/// Source of every key sequence in a run.
pub struct KeyGenerator {
    rng: StdRng,
    code_points: Uniform<u32>,
}

impl KeyGenerator {
    /// Create a generator, seeded from `seed` if given, else from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            code_points: Uniform::new(MIN_CODE_POINT, MAX_CODE_POINT),
        }
    }

    /// Deterministic generator for reproducible runs and tests
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    /// `count` strings of exactly `length` code points each.
    pub fn generate_string_keys(&mut self, length: usize, count: usize) -> KeySet<String> {
        let mut keys = Vec::with_capacity(count);
        for _ in 0..count {
            let mut key = String::with_capacity(length * 4);
            let mut produced = 0;
            while produced < length {
                let code_point = self.code_points.sample(&mut self.rng);
                if !is_valid_code_point(code_point) {
                    continue;
                }
                if let Some(c) = char::from_u32(code_point) {
                    key.push(c);
                    produced += 1;
                }
            }
            keys.push(key);
        }
        debug!(count, length, "generated string keys");
        KeySet::new(keys)
    }

    /// `count` integers drawn uniformly from `[min_value, i64::MAX)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `min_value` is `i64::MAX`, which leaves
    /// an empty range.
    pub fn generate_integer_keys(&mut self, min_value: i64, count: usize) -> Result<KeySet<i64>> {
        if min_value == i64::MAX {
            return Err(Error::invalid_config(
                "integer key range [i64::MAX, i64::MAX) is empty",
            ));
        }
        let range = Uniform::new(min_value, i64::MAX);
        let keys: Vec<i64> = (&mut self.rng).sample_iter(range).take(count).collect();
        debug!(count, min_value, "generated integer keys");
        Ok(KeySet::new(keys))
    }

    /// An independent RNG for a single case's setup shuffles.
    pub fn shuffle_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.gen())
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}
