// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::primitives::{Hash160, Hash256};
use bincode::{Decode, Encode};
use lazy_static::lazy_static;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId, Signature};
use secp256k1::{Message, PublicKey as SecpPublicKey, Secp256k1, VerifyOnly};
use std::fmt;
use std::hash::Hash as HashTrait;

pub const COMPRESSED_PUBKEY_BYTES: usize = 33;
pub const UNCOMPRESSED_PUBKEY_BYTES: usize = 65;
pub const COMPACT_SIGNATURE_BYTES: usize = 65;

lazy_static! {
    static ref SECP_VERIFY: Secp256k1<VerifyOnly> = Secp256k1::verification_only();
}

/// Key id, the HASH160 of a serialized public key.
pub type KeyId = Hash160;

/// Serialized secp256k1 public key, compressed or uncompressed.
#[derive(Clone, PartialEq, Eq, HashTrait, PartialOrd, Ord, Default)]
pub struct PubKey(Vec<u8>);

impl PubKey {
    /// Checks the length implied by the header byte.
    #[must_use]
    pub fn is_valid_size(bytes: &[u8]) -> bool {
        match bytes.first() {
            Some(0x02 | 0x03) => bytes.len() == COMPRESSED_PUBKEY_BYTES,
            Some(0x04 | 0x06 | 0x07) => bytes.len() == UNCOMPRESSED_PUBKEY_BYTES,
            _ => false,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
        if !Self::is_valid_size(bytes) {
            return Err("invalid public key");
        }

        Ok(Self(bytes.to_vec()))
    }

    pub fn from_hex(hexstr: &str) -> Result<Self, &'static str> {
        let bytes = hex::decode(hexstr).map_err(|_| "invalid hex")?;
        Self::from_bytes(&bytes)
    }

    #[must_use]
    pub fn from_secp(key: &SecpPublicKey) -> Self {
        Self(key.serialize().to_vec())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.0.len() == COMPRESSED_PUBKEY_BYTES
    }

    #[must_use]
    pub fn key_id(&self) -> KeyId {
        Hash160::hash_from_slice(&self.0)
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Verifies a DER encoded ECDSA signature over `hash`. Lax DER is
    /// accepted and high S values are normalized.
    pub fn verify_der(&self, hash: &Hash256, sig: &[u8]) -> Result<(), SignatureErr> {
        let key = SecpPublicKey::from_slice(&self.0).map_err(|_| SignatureErr::InvalidPubKey)?;
        let mut sig = Signature::from_der_lax(sig).map_err(|_| SignatureErr::InvalidEncoding)?;
        sig.normalize_s();
        let msg = Message::from_digest_slice(hash.as_bytes())
            .map_err(|_| SignatureErr::InvalidEncoding)?;

        SECP_VERIFY
            .verify_ecdsa(&msg, &sig, &key)
            .map_err(|_| SignatureErr::KeyMismatch)
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PubKey").field(&self.to_hex()).finish()
    }
}

impl Encode for PubKey {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        crate::codec::encode_bytes(&self.0, encoder)
    }
}

impl Decode for PubKey {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        // Malformed keys are kept as is and rejected at verification time.
        Ok(Self(crate::codec::decode_bytes(decoder)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureErr {
    /// Signature is not 65 bytes long
    InvalidLength,

    /// Header byte is outside of the valid range
    InvalidHeader,

    /// No public key could be recovered
    RecoveryFailed,

    /// Recovered key does not match the expected key
    KeyMismatch,

    /// Signature is not valid DER
    InvalidEncoding,

    /// Public key does not parse
    InvalidPubKey,
}

/// Compact recoverable signature: one header byte followed by `r || s`.
///
/// The header encodes the recovery id plus 27, and another 4 when the
/// signing key is compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactSignature<'a>(pub &'a [u8]);

impl<'a> CompactSignature<'a> {
    /// Recovers the public key that produced this signature over `hash`.
    pub fn recover(&self, hash: &Hash256) -> Result<PubKey, SignatureErr> {
        if self.0.len() != COMPACT_SIGNATURE_BYTES {
            return Err(SignatureErr::InvalidLength);
        }

        let header = self.0[0];
        if !(27..=34).contains(&header) {
            return Err(SignatureErr::InvalidHeader);
        }

        let compressed = header >= 31;
        let rec_id = ((header - 27) & 3) as i32;
        let rec_id = RecoveryId::from_i32(rec_id).map_err(|_| SignatureErr::InvalidHeader)?;
        let sig = RecoverableSignature::from_compact(&self.0[1..], rec_id)
            .map_err(|_| SignatureErr::RecoveryFailed)?;
        let msg = Message::from_digest_slice(hash.as_bytes())
            .map_err(|_| SignatureErr::RecoveryFailed)?;
        let key = SECP_VERIFY
            .recover_ecdsa(&msg, &sig)
            .map_err(|_| SignatureErr::RecoveryFailed)?;

        if compressed {
            Ok(PubKey(key.serialize().to_vec()))
        } else {
            Ok(PubKey(key.serialize_uncompressed().to_vec()))
        }
    }

    /// Verifies by recovering the signer and comparing key ids.
    pub fn verify(&self, hash: &Hash256, key_id: &KeyId) -> Result<(), SignatureErr> {
        let recovered = self.recover(hash)?;

        if &recovered.key_id() != key_id {
            return Err(SignatureErr::KeyMismatch);
        }

        Ok(())
    }
}
