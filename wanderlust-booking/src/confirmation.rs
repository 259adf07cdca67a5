use serde::{Deserialize, Serialize};
use chrono::Utc;
use rand::Rng;
use std::fmt;

/// Fixed prefix of every confirmation code
pub const CODE_PREFIX: &str = "WL";

const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 4;

/// Booking reference shown on the confirmation step, e.g. `WL12345678AB3Z`.
/// Uniqueness is probabilistic only; codes are never looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Generate a code from the current clock and the thread RNG
    pub fn generate() -> Self {
        Self::compose(Utc::now().timestamp_millis(), &mut rand::thread_rng())
    }

    /// Format: prefix, the low 8 decimal digits of `timestamp_ms` (zero
    /// padded), then 4 characters from `[0-9A-Z]`.
    pub fn compose<R: Rng + ?Sized>(timestamp_ms: i64, rng: &mut R) -> Self {
        let digits = timestamp_ms.rem_euclid(100_000_000);
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        Self(format!("{}{:08}{}", CODE_PREFIX, digits, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
