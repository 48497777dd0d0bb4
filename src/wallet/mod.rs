// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::primitives::{Hash256, KeyId, PubKey};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use secp256k1::{All, Message, PublicKey as SecpPublicKey, Secp256k1, SecretKey};
use std::collections::HashMap;
use std::fmt;

lazy_static! {
    static ref SECP: Secp256k1<All> = Secp256k1::new();
}

/// Key lookups needed when building coinstake outputs.
pub trait KeyStore: Send + Sync {
    /// Returns true if the private key for `key_id` is held
    fn have_key(&self, key_id: &KeyId) -> bool;

    /// Returns the public key for `key_id`, if known
    fn get_pubkey(&self, key_id: &KeyId) -> Option<PubKey>;
}

/// Unencrypted in memory key store.
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<KeyId, (SecretKey, PubKey)>>,
}

impl MemoryKeyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a secret key, returning its compressed public key.
    pub fn add_key(&self, secret: SecretKey) -> PubKey {
        let pubkey = PubKey::from_secp(&SecpPublicKey::from_secret_key(&SECP, &secret));
        self.keys
            .write()
            .insert(pubkey.key_id(), (secret, pubkey.clone()));
        pubkey
    }

    /// Produces a compact recoverable signature over `hash`.
    pub fn sign_compact(&self, key_id: &KeyId, hash: &Hash256) -> Option<Vec<u8>> {
        let keys = self.keys.read();
        let (secret, pubkey) = keys.get(key_id)?;
        let msg = Message::from_digest_slice(hash.as_bytes()).ok()?;
        let sig = SECP.sign_ecdsa_recoverable(&msg, secret);
        let (rec_id, bytes) = sig.serialize_compact();
        let compressed_flag = if pubkey.is_compressed() { 4 } else { 0 };

        let mut out = Vec::with_capacity(65);
        out.push(27 + compressed_flag + rec_id.to_i32() as u8);
        out.extend_from_slice(&bytes);
        Some(out)
    }

    /// Produces a DER encoded signature over `hash`.
    pub fn sign_der(&self, key_id: &KeyId, hash: &Hash256) -> Option<Vec<u8>> {
        let keys = self.keys.read();
        let (secret, _) = keys.get(key_id)?;
        let msg = Message::from_digest_slice(hash.as_bytes()).ok()?;
        Some(SECP.sign_ecdsa(&msg, secret).serialize_der().to_vec())
    }
}

impl KeyStore for MemoryKeyStore {
    fn have_key(&self, key_id: &KeyId) -> bool {
        self.keys.read().contains_key(key_id)
    }

    fn get_pubkey(&self, key_id: &KeyId) -> Option<PubKey> {
        self.keys.read().get(key_id).map(|(_, pk)| pk.clone())
    }
}

impl fmt::Debug for MemoryKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryKeyStore")
            .field("keys", &self.keys.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::CompactSignature;

    #[test]
    fn it_stores_and_finds_keys() {
        let store = MemoryKeyStore::new();
        let pubkey = store.add_key(SecretKey::from_slice(&[3; 32]).unwrap());

        assert!(store.have_key(&pubkey.key_id()));
        assert_eq!(store.get_pubkey(&pubkey.key_id()), Some(pubkey));
        assert!(!store.have_key(&KeyId::zero()));
        assert_eq!(store.get_pubkey(&KeyId::zero()), None);
    }

    #[test]
    fn it_signs_recoverable() {
        let store = MemoryKeyStore::new();
        let pubkey = store.add_key(SecretKey::from_slice(&[4; 32]).unwrap());
        let hash = Hash256::hash_from_slice(b"stake");
        let sig = store.sign_compact(&pubkey.key_id(), &hash).unwrap();

        assert!(CompactSignature(&sig).verify(&hash, &pubkey.key_id()).is_ok());
        assert!(store.sign_compact(&KeyId::zero(), &hash).is_none());
    }
}
