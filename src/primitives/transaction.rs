// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::consensus::{money_range, Money};
use crate::primitives::{Hash256, TxIn, TxOut, ValidatorRegister, ValidatorVote};
use bincode::{Decode, Encode};

/// First version that carries validator payloads after the lock time.
pub const TX_VERSION_VALIDATORS: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transaction {
    pub version: i32,
    pub vin: Vec<TxIn>,
    pub vout: Vec<TxOut>,
    pub lock_time: u32,
    pub validator_register: Vec<ValidatorRegister>,
    pub validator_vote: Vec<ValidatorVote>,
}

impl Transaction {
    pub fn to_bytes(&self) -> Vec<u8> {
        crate::codec::encode_to_vec(self).unwrap()
    }

    #[must_use]
    pub fn hash(&self) -> Hash256 {
        Hash256::hash_from_slice(self.to_bytes())
    }

    #[must_use]
    pub fn is_coinbase(&self) -> bool {
        self.vin.len() == 1 && self.vin[0].prevout.is_null()
    }

    /// A coinstake spends at least one real input and starts with an empty
    /// marker output.
    #[must_use]
    pub fn is_coinstake(&self) -> bool {
        !self.vin.is_empty()
            && !self.vin[0].prevout.is_null()
            && self.vout.len() >= 2
            && self.vout[0].is_empty()
    }

    #[must_use]
    pub fn is_validator_register(&self) -> bool {
        !self.validator_register.is_empty()
    }

    #[must_use]
    pub fn is_validator_vote(&self) -> bool {
        !self.validator_vote.is_empty()
    }

    #[must_use]
    pub fn value_out(&self) -> Money {
        self.vout.iter().map(|o| o.value).sum()
    }

    /// Context free checks.
    pub fn verify(&self) -> Result<(), TxVerifyErr> {
        if self.vin.is_empty() {
            return Err(TxVerifyErr::NoInputs);
        }

        if self.vout.is_empty() {
            return Err(TxVerifyErr::NoOutputs);
        }

        let mut sum: Money = 0;
        for out in &self.vout {
            out.verify()?;
            sum = sum
                .checked_add(out.value)
                .ok_or(TxVerifyErr::FailedMoneyCheck)?;

            if !money_range(sum) {
                return Err(TxVerifyErr::FailedMoneyCheck);
            }
        }

        let mut seen = std::collections::HashSet::with_capacity(self.vin.len());
        for input in &self.vin {
            if !seen.insert(input.prevout) {
                return Err(TxVerifyErr::DuplicateInputs);
            }
        }

        if self.version < TX_VERSION_VALIDATORS
            && (self.is_validator_register() || self.is_validator_vote())
        {
            return Err(TxVerifyErr::InvalidVersion);
        }

        Ok(())
    }
}

impl Encode for Transaction {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.version, encoder)?;
        crate::codec::encode_vec(&self.vin, encoder)?;
        crate::codec::encode_vec(&self.vout, encoder)?;
        bincode::Encode::encode(&self.lock_time, encoder)?;

        if self.version >= TX_VERSION_VALIDATORS {
            crate::codec::encode_vec(&self.validator_register, encoder)?;
            crate::codec::encode_vec(&self.validator_vote, encoder)?;
        }

        Ok(())
    }
}

impl Decode for Transaction {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        let version: i32 = bincode::Decode::decode(decoder)?;
        let vin = crate::codec::decode_vec(decoder)?;
        let vout = crate::codec::decode_vec(decoder)?;
        let lock_time = bincode::Decode::decode(decoder)?;
        let (validator_register, validator_vote) = if version >= TX_VERSION_VALIDATORS {
            (
                crate::codec::decode_vec(decoder)?,
                crate::codec::decode_vec(decoder)?,
            )
        } else {
            (vec![], vec![])
        };

        Ok(Self {
            version,
            vin,
            vout,
            lock_time,
            validator_register,
            validator_vote,
        })
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TxVerifyErr {
    NoInputs,
    NoOutputs,
    DuplicateInputs,
    FailedMoneyCheck,
    InvalidVersion,
}
