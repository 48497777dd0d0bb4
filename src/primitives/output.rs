// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::consensus::{money_range, Money};
use crate::primitives::TxVerifyErr;
use crate::script::Script;
use bincode::{Decode, Encode};

#[derive(PartialEq, Debug, Eq, Clone, Hash)]
pub struct TxOut {
    pub value: Money,
    pub script_pubkey: Script,
}

impl TxOut {
    #[must_use]
    pub fn new(value: Money, script_pubkey: Script) -> Self {
        Self {
            value,
            script_pubkey,
        }
    }

    /// An output with value `-1` and an empty script.
    #[must_use]
    pub fn null() -> Self {
        Self {
            value: -1,
            script_pubkey: Script::new(),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value == -1
    }

    /// The first output of a coinstake is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value == 0 && self.script_pubkey.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        crate::codec::encode_to_vec(self).unwrap()
    }

    pub fn verify(&self) -> Result<(), TxVerifyErr> {
        if !money_range(self.value) {
            return Err(TxVerifyErr::FailedMoneyCheck);
        }

        Ok(())
    }
}

impl Encode for TxOut {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.value, encoder)?;
        bincode::Encode::encode(&self.script_pubkey, encoder)?;
        Ok(())
    }
}

impl Decode for TxOut {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        let value = bincode::Decode::decode(decoder)?;
        let script_pubkey = bincode::Decode::decode(decoder)?;
        Ok(Self {
            value,
            script_pubkey,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{COIN, MAX_MONEY};

    #[test]
    fn it_encodes_value_then_script() {
        let out = TxOut::new(250 * COIN, Script(vec![0xac]));
        let bytes = out.to_bytes();
        assert_eq!(&bytes[..8], &(250 * COIN).to_le_bytes());
        assert_eq!(&bytes[8..], &[0x01, 0xac]);
    }

    #[test]
    fn it_verifies_money_range() {
        assert!(TxOut::new(0, Script::new()).verify().is_ok());
        assert!(TxOut::new(MAX_MONEY, Script::new()).verify().is_ok());
        assert_eq!(
            TxOut::new(-5, Script::new()).verify(),
            Err(TxVerifyErr::FailedMoneyCheck)
        );
        assert!(TxOut::new(0, Script::new()).is_empty());
        assert!(TxOut::null().is_null());
    }
}
