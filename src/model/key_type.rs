//! Key algorithm identifier handed to the key generation utility

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Key algorithm identifier
///
/// Known identifiers get their own variant. Anything else is kept verbatim
/// in `Other` so new algorithms still pass through to the utility.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Ed25519 (EdDSA with Curve25519)
    Ed25519,
    /// ECDSA over a NIST curve
    Ecdsa,
    /// RSA
    Rsa,
    /// DSA
    Dsa,
    /// Ed25519 held on a FIDO authenticator
    Ed25519Sk,
    /// ECDSA held on a FIDO authenticator
    EcdsaSk,
    /// Any other identifier the utility understands
    Other(String),
}

impl KeyType {
    pub fn as_str(&self) -> &str {
        match self {
            KeyType::Ed25519 => "ed25519",
            KeyType::Ecdsa => "ecdsa",
            KeyType::Rsa => "rsa",
            KeyType::Dsa => "dsa",
            KeyType::Ed25519Sk => "ed25519-sk",
            KeyType::EcdsaSk => "ecdsa-sk",
            KeyType::Other(s) => s,
        }
    }
}

impl FromStr for KeyType {
    type Err = KeyTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(KeyTypeError::Empty);
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(KeyTypeError::InvalidCharacter {
                identifier: s.escape_debug().to_string(),
            });
        }

        Ok(match s {
            "ed25519" => KeyType::Ed25519,
            "ecdsa" => KeyType::Ecdsa,
            "rsa" => KeyType::Rsa,
            "dsa" => KeyType::Dsa,
            "ed25519-sk" => KeyType::Ed25519Sk,
            "ecdsa-sk" => KeyType::EcdsaSk,
            other => KeyType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyTypeError {
    #[error("key type must not be empty")]
    Empty,

    #[error("key type contains whitespace or control characters: {identifier}")]
    InvalidCharacter { identifier: String },
}
