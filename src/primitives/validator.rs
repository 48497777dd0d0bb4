// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! Validator registration and voting payloads carried by transactions.

use crate::primitives::{CompactSignature, Hash256, PubKey, SignatureErr, TxIn};
use bincode::{Decode, Encode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteValue {
    No,
    Abstain,
    Yes,
}

impl VoteValue {
    #[must_use]
    pub fn score(self) -> i32 {
        match self {
            Self::No => -1,
            Self::Abstain => 0,
            Self::Yes => 1,
        }
    }
}

impl TryFrom<i32> for VoteValue {
    type Error = &'static str;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            -1 => Ok(Self::No),
            0 => Ok(Self::Abstain),
            1 => Ok(Self::Yes),
            _ => Err("invalid vote value"),
        }
    }
}

/// A vote for or against a registered candidate, identified by its vin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MnVote {
    pub vin: TxIn,
    pub vote: VoteValue,
}

impl Encode for MnVote {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.vin, encoder)?;
        bincode::Encode::encode(&self.vote.score(), encoder)?;
        Ok(())
    }
}

impl Decode for MnVote {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        let vin = bincode::Decode::decode(decoder)?;
        let vote: i32 = bincode::Decode::decode(decoder)?;
        let vote = VoteValue::try_from(vote).map_err(bincode::error::DecodeError::Other)?;
        Ok(Self { vin, vote })
    }
}

/// Entry of the active validator list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorInfo {
    pub vin: TxIn,
    pub pubkey: PubKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorRegister {
    pub vin: TxIn,
    pub pubkey: PubKey,
    pub time: i64,
    pub signature: Vec<u8>,
}

impl ValidatorRegister {
    #[must_use]
    pub fn new(vin: TxIn, pubkey: PubKey, time: i64) -> Self {
        Self {
            vin,
            pubkey,
            time,
            signature: vec![],
        }
    }

    /// Hash committed to by the signature: `vin || pubkey || time`.
    #[must_use]
    pub fn signature_hash(&self) -> Hash256 {
        let mut buf = self.vin.to_bytes();
        buf.extend(crate::codec::encode_to_vec(&self.pubkey).unwrap());
        buf.extend_from_slice(&self.time.to_le_bytes());
        Hash256::hash_from_slice(buf)
    }

    pub fn verify(&self) -> Result<(), SignatureErr> {
        CompactSignature(&self.signature).verify(&self.signature_hash(), &self.pubkey.key_id())
    }
}

impl Encode for ValidatorRegister {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.vin, encoder)?;
        bincode::Encode::encode(&self.pubkey, encoder)?;
        bincode::Encode::encode(&self.time, encoder)?;
        crate::codec::encode_bytes(&self.signature, encoder)?;
        Ok(())
    }
}

impl Decode for ValidatorRegister {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        let vin = bincode::Decode::decode(decoder)?;
        let pubkey = bincode::Decode::decode(decoder)?;
        let time = bincode::Decode::decode(decoder)?;
        let signature = crate::codec::decode_bytes(decoder)?;
        Ok(Self {
            vin,
            pubkey,
            time,
            signature,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorVote {
    pub vin: TxIn,
    pub pubkey: PubKey,
    pub time: i64,
    pub votes: Vec<MnVote>,
    pub signature: Vec<u8>,
}

impl ValidatorVote {
    #[must_use]
    pub fn new(vin: TxIn, pubkey: PubKey, time: i64, votes: Vec<MnVote>) -> Self {
        Self {
            vin,
            pubkey,
            time,
            votes,
            signature: vec![],
        }
    }

    /// Hash committed to by the signature: `vin || pubkey || time || votes`.
    #[must_use]
    pub fn signature_hash(&self) -> Hash256 {
        let mut buf = self.vin.to_bytes();
        buf.extend(crate::codec::encode_to_vec(&self.pubkey).unwrap());
        buf.extend_from_slice(&self.time.to_le_bytes());
        buf.extend(crate::codec::encode_to_vec(&VotesRef(&self.votes)).unwrap());
        Hash256::hash_from_slice(buf)
    }

    pub fn verify(&self) -> Result<(), SignatureErr> {
        CompactSignature(&self.signature).verify(&self.signature_hash(), &self.pubkey.key_id())
    }
}

struct VotesRef<'a>(&'a [MnVote]);

impl<'a> Encode for VotesRef<'a> {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        crate::codec::encode_vec(self.0, encoder)
    }
}

impl Encode for ValidatorVote {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.vin, encoder)?;
        bincode::Encode::encode(&self.pubkey, encoder)?;
        bincode::Encode::encode(&self.time, encoder)?;
        crate::codec::encode_vec(&self.votes, encoder)?;
        crate::codec::encode_bytes(&self.signature, encoder)?;
        Ok(())
    }
}

impl Decode for ValidatorVote {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        let vin = bincode::Decode::decode(decoder)?;
        let pubkey = bincode::Decode::decode(decoder)?;
        let time = bincode::Decode::decode(decoder)?;
        let votes = crate::codec::decode_vec(decoder)?;
        let signature = crate::codec::decode_bytes(decoder)?;
        Ok(Self {
            vin,
            pubkey,
            time,
            votes,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::test_keys::*;
    use crate::primitives::OutPoint;

    fn signed_register(seed: u8) -> ValidatorRegister {
        let vin = TxIn::new(OutPoint::new(Hash256::hash_from_slice([seed]), 0));
        let mut register = ValidatorRegister::new(vin, pubkey(seed), 1_600_000_000);
        register.signature = sign_compact(seed, &register.signature_hash());
        register
    }

    #[test]
    fn it_verifies_register_signature() {
        let mut register = signed_register(3);
        assert!(register.verify().is_ok());

        register.time += 1;
        assert!(register.verify().is_err());
    }

    #[test]
    fn it_verifies_vote_signature_over_votes() {
        let candidate = signed_register(4);
        let vin = TxIn::new(OutPoint::new(Hash256::hash_from_slice([5]), 1));
        let votes = vec![MnVote {
            vin: candidate.vin.clone(),
            vote: VoteValue::Yes,
        }];
        let mut vote = ValidatorVote::new(vin, pubkey(5), 1_600_000_100, votes);
        vote.signature = sign_compact(5, &vote.signature_hash());
        assert!(vote.verify().is_ok());

        vote.votes[0].vote = VoteValue::No;
        assert!(vote.verify().is_err());
    }

    #[test]
    fn it_decodes_encoded_payloads() {
        let register = signed_register(6);
        let bytes = crate::codec::encode_to_vec(&register).unwrap();
        assert_eq!(
            crate::codec::decode::<ValidatorRegister>(&bytes).unwrap(),
            register
        );

        let bad_vote = {
            let mut bytes = crate::codec::encode_to_vec(&MnVote {
                vin: TxIn::default(),
                vote: VoteValue::Abstain,
            })
            .unwrap();
            let len = bytes.len();
            bytes[len - 4] = 7;
            bytes
        };
        assert!(crate::codec::decode::<MnVote>(&bad_vote).is_err());
    }
}
