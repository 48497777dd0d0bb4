// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use bincode::{Decode, Encode};
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sha3::Keccak256;
use std::fmt;
use std::hash::Hash as HashTrait;

/// 256 bit hash in internal byte order.
///
/// Displayed hex is byte reversed, the same way block and transaction ids are
/// shown to users.
#[derive(PartialEq, Eq, Clone, Copy, HashTrait, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn zero() -> Self {
        Self([0; 32])
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 32]
    }

    /// Double SHA-256 of the slice.
    #[inline]
    pub fn hash_from_slice<T: AsRef<[u8]>>(slice: T) -> Self {
        let first = Sha256::digest(slice.as_ref());
        let second = Sha256::digest(first);
        let mut out = Self::zero();
        out.0.copy_from_slice(&second);
        out
    }

    /// Keccak-256 of the slice, kept in digest order.
    #[inline]
    pub fn keccak_from_slice<T: AsRef<[u8]>>(slice: T) -> Self {
        let mut out = Self::zero();
        out.0.copy_from_slice(&Keccak256::digest(slice.as_ref()));
        out
    }

    /// Hex in display order (reversed).
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        hex::encode(bytes)
    }

    /// Parses display order hex. An optional `0x` prefix is accepted.
    pub fn from_hex(hexstr: &str) -> Result<Self, &'static str> {
        let mut out = Self::from_raw_hex(hexstr)?;
        out.0.reverse();
        Ok(out)
    }

    /// Parses hex whose bytes are already in internal order.
    pub fn from_raw_hex(hexstr: &str) -> Result<Self, &'static str> {
        let hexstr = hexstr.strip_prefix("0x").unwrap_or(hexstr);
        let bytes = hex::decode(hexstr).map_err(|_| "invalid hex")?;

        if bytes.len() != 32 {
            return Err("invalid hash length");
        }

        let mut out = Self::zero();
        out.0.copy_from_slice(&bytes);
        Ok(out)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hash256").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Encode for Hash256 {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        crate::codec::encode_raw(&self.0, encoder)
    }
}

impl Decode for Hash256 {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        Ok(Self(crate::codec::decode_raw_32(decoder)?))
    }
}

/// RIPEMD-160 of SHA-256. Used for key ids.
#[derive(PartialEq, Eq, Clone, Copy, HashTrait, PartialOrd, Ord, Default)]
pub struct Hash160(pub [u8; 20]);

impl Hash160 {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn zero() -> Self {
        Self([0; 20])
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    #[inline]
    pub fn hash_from_slice<T: AsRef<[u8]>>(slice: T) -> Self {
        let sha = Sha256::digest(slice.as_ref());
        let mut out = Self::zero();
        out.0.copy_from_slice(&Ripemd160::digest(sha));
        out
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, &'static str> {
        if bytes.len() != 20 {
            return Err("invalid hash160 length");
        }

        let mut out = Self::zero();
        out.0.copy_from_slice(bytes);
        Ok(out)
    }
}

impl fmt::Debug for Hash160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hash160").field(&self.to_hex()).finish()
    }
}

/// Computes the Bitcoin merkle root of the given leaves.
///
/// The second value is set when two identical siblings were hashed together,
/// which allows a different transaction list to produce the same root.
#[must_use]
pub fn compute_merkle_root(leaves: &[Hash256]) -> (Hash256, bool) {
    if leaves.is_empty() {
        return (Hash256::zero(), false);
    }

    let mut mutated = false;
    let mut level = leaves.to_vec();

    while level.len() > 1 {
        for pair in level.chunks_exact(2) {
            if pair[0] == pair[1] {
                mutated = true;
            }
        }

        if level.len() % 2 == 1 {
            let last = level[level.len() - 1];
            level.push(last);
        }

        level = level
            .chunks_exact(2)
            .map(|pair| {
                let mut buf = [0; 64];
                buf[..32].copy_from_slice(&pair[0].0);
                buf[32..].copy_from_slice(&pair[1].0);
                Hash256::hash_from_slice(buf)
            })
            .collect();
    }

    (level[0], mutated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_double_hashes_with_sha256() {
        let hash = Hash256::hash_from_slice(b"");
        assert_eq!(
            hex::encode(hash.0),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn it_displays_reversed_hex() {
        let mut bytes = [0; 32];
        bytes[0] = 0xab;
        let hash = Hash256(bytes);
        assert!(hash.to_hex().ends_with("ab"));
        assert_eq!(Hash256::from_hex(&hash.to_hex()).unwrap(), hash);
        assert_eq!(Hash256::from_hex(&format!("0x{}", hash.to_hex())).unwrap(), hash);
        assert!(Hash256::from_hex("abcd").is_err());
    }

    #[test]
    fn it_computes_keccak_of_empty_rlp() {
        let root = Hash256::keccak_from_slice([0x80]);
        assert_eq!(
            hex::encode(root.0),
            "56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421"
        );
    }

    #[test]
    fn it_computes_hash160() {
        let hash = Hash160::hash_from_slice(b"");
        assert_eq!(hash.to_hex(), "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb");
    }

    #[test]
    fn it_computes_merkle_root() {
        let a = Hash256::hash_from_slice(b"a");
        let b = Hash256::hash_from_slice(b"b");
        let c = Hash256::hash_from_slice(b"c");

        assert_eq!(compute_merkle_root(&[a]), (a, false));

        let (root3, mutated) = compute_merkle_root(&[a, b, c]);
        assert!(!mutated);

        // Duplicating the odd leaf yields the same root but is flagged
        let (root4, mutated) = compute_merkle_root(&[a, b, c, c]);
        assert_eq!(root3, root4);
        assert!(mutated);
    }
}
