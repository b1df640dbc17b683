//! Algorand account addresses.
//!
//! An address is the 32-byte Ed25519 public key. Its text form is the
//! base32 (no padding) encoding of the key followed by the last four bytes
//! of its SHA-512/256 digest, 58 characters in total.

use data_encoding::BASE32_NOPAD;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha512_256};
use std::fmt;
use std::str::FromStr;

use crate::blockchain::wallet::{WalletError, WalletResult};

const CHECKSUM_LEN: usize = 4;

/// Length of the textual address.
pub const ADDRESS_LEN: usize = 58;

/// A 32-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zero address, encoded as "no address" on the wire.
    pub const ZERO: Address = Address([0u8; 32]);

    pub fn from_public_key(key: [u8; 32]) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let digest = Sha512_256::digest(self.0);
        let mut out = [0u8; CHECKSUM_LEN];
        out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
        out
    }

    /// Encode to the 58-character checksummed form.
    pub fn encode(&self) -> String {
        let mut buf = Vec::with_capacity(32 + CHECKSUM_LEN);
        buf.extend_from_slice(&self.0);
        buf.extend_from_slice(&self.checksum());
        BASE32_NOPAD.encode(&buf)
    }

    /// Decode a checksummed address string.
    pub fn decode(s: &str) -> WalletResult<Self> {
        if s.len() != ADDRESS_LEN {
            return Err(WalletError::InvalidAddress(format!(
                "expected {} characters, got {}",
                ADDRESS_LEN,
                s.len()
            )));
        }

        let raw = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
        if raw.len() != 32 + CHECKSUM_LEN {
            return Err(WalletError::InvalidAddress(format!(
                "decoded to {} bytes",
                raw.len()
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&raw[..32]);
        let address = Address(key);

        if raw[32..] != address.checksum() {
            return Err(WalletError::InvalidAddress("checksum mismatch".to_string()));
        }
        Ok(address)
    }
}

impl FromStr for Address {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::decode(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

// Addresses travel as raw 32-byte binaries in transaction encoding.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}
