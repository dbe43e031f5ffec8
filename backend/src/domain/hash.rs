//! SHA-256 digests used for tamper evidence.
//!
//! Document uploads and approved transfers are both attested with a SHA-256
//! digest stored as lowercase hex. Digests are computed once and immutable
//! thereafter.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error as ThisError;

/// Lowercase hexadecimal SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Digest(String);

/// Validation errors returned when parsing a digest from its hex form.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum DigestParseError {
    /// The value is not exactly 64 characters long.
    #[error("digest must be 64 hex characters, got {length}")]
    WrongLength {
        /// Observed character count.
        length: usize,
    },
    /// The value contains a non-hexadecimal character.
    #[error("digest must contain only lowercase hex characters")]
    NotHex,
}

impl Sha256Digest {
    /// Digest raw bytes.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Digest a UTF-8 string.
    #[must_use]
    pub fn of_str(value: &str) -> Self {
        Self::of_bytes(value.as_bytes())
    }

    /// Parse a digest from its 64-character hex rendering.
    ///
    /// Uppercase input is accepted and normalised to lowercase so digests
    /// copied out of other systems compare equal.
    pub fn parse(value: &str) -> Result<Self, DigestParseError> {
        if value.len() != 64 {
            return Err(DigestParseError::WrongLength {
                length: value.len(),
            });
        }
        if !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DigestParseError::NotHex);
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// Borrow the hex rendering.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = DigestParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Sha256Digest> for String {
    fn from(value: Sha256Digest) -> Self {
        value.0
    }
}
