//! Request fingerprints used as cache keys and request identifiers.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

use crate::options::CanonicalOptions;

/// Number of bytes in a fingerprint digest.
const FINGERPRINT_LEN: usize = 20;

/// A 160-bit SHA-1 digest identifying a normalized synthesis request.
///
/// The digest is computed over the option pairs sorted by key, so two option
/// sets with the same pairs always produce the same fingerprint no matter how
/// the map that held them was ordered. The hex rendering is used both as the
/// cache file name and as the `request_id` returned to callers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Computes the fingerprint of a canonical option set.
    pub fn of_options(options: &CanonicalOptions) -> Self {
        Self::of_pairs(options.iter())
    }

    /// Computes the fingerprint of arbitrary key/value pairs.
    ///
    /// Pairs are sorted by key (then value) before hashing. Each key and value
    /// is fed to the digest with a little-endian `u64` length prefix so that
    /// `("ab", "c")` and `("a", "bc")` cannot collide.
    pub fn of_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut sorted: Vec<(&str, &str)> = pairs.into_iter().collect();
        sorted.sort_unstable();

        let mut hasher = Sha1::new();
        for (key, value) in sorted {
            hasher.update((key.len() as u64).to_le_bytes());
            hasher.update(key.as_bytes());
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value.as_bytes());
        }

        let digest = hasher.finalize();
        let mut bytes = [0u8; FINGERPRINT_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:02x}{:02x}{:02x}..)", self.0[0], self.0[1], self.0[2])
    }
}

/// Error returned when a string is not a 40-character hex fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fingerprint: '{input}'")]
pub struct ParseFingerprintError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFingerprintError {
            input: s.to_string(),
        };
        // Only the lowercase `Display` form round-trips to a file name.
        if s.len() != FINGERPRINT_LEN * 2
            || !s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(err());
        }
        let mut bytes = [0u8; FINGERPRINT_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| err())?;
        Ok(Self(bytes))
    }
}
