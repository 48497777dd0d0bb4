// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::primitives::Hash256;
use crate::script::Script;
use bincode::{Decode, Encode};
use std::fmt;

/// Reference to a transaction output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct OutPoint {
    pub hash: Hash256,
    pub n: u32,
}

impl OutPoint {
    #[must_use]
    pub fn new(hash: Hash256, n: u32) -> Self {
        Self { hash, n }
    }

    /// The outpoint spent by coinbase inputs.
    #[must_use]
    pub fn null() -> Self {
        Self {
            hash: Hash256::zero(),
            n: u32::MAX,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.hash.is_zero() && self.n == u32::MAX
    }
}

impl fmt::Debug for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutPoint({}, {})", self.hash.to_hex(), self.n)
    }
}

impl Encode for OutPoint {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.hash, encoder)?;
        bincode::Encode::encode(&self.n, encoder)?;
        Ok(())
    }
}

impl Decode for OutPoint {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        let hash = bincode::Decode::decode(decoder)?;
        let n = bincode::Decode::decode(decoder)?;
        Ok(Self { hash, n })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxIn {
    pub prevout: OutPoint,
    pub script_sig: Script,
    pub sequence: u32,
}

impl TxIn {
    #[must_use]
    pub fn new(prevout: OutPoint) -> Self {
        Self {
            prevout,
            script_sig: Script::new(),
            sequence: u32::MAX,
        }
    }

    #[must_use]
    pub fn with_script(prevout: OutPoint, script_sig: Script) -> Self {
        Self {
            prevout,
            script_sig,
            sequence: u32::MAX,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        crate::codec::encode_to_vec(self).unwrap()
    }
}

impl Default for TxIn {
    fn default() -> Self {
        Self::new(OutPoint::null())
    }
}

impl Encode for TxIn {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.prevout, encoder)?;
        bincode::Encode::encode(&self.script_sig, encoder)?;
        bincode::Encode::encode(&self.sequence, encoder)?;
        Ok(())
    }
}

impl Decode for TxIn {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        let prevout = bincode::Decode::decode(decoder)?;
        let script_sig = bincode::Decode::decode(decoder)?;
        let sequence = bincode::Decode::decode(decoder)?;
        Ok(Self {
            prevout,
            script_sig,
            sequence,
        })
    }
}
