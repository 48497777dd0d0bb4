// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::primitives::{compute_merkle_root, Hash256, Transaction, TxIn, TxVerifyErr};
use bincode::{Decode, Encode};

/// First header version carrying the chainstate and EVM roots.
pub const BLOCK_VERSION_VALIDATORS: i32 = 8;

pub const CURRENT_BLOCK_VERSION: i32 = BLOCK_VERSION_VALIDATORS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_hash: Hash256,
    pub merkle_root: Hash256,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,

    /// Serialized for versions 4 to 6 only
    pub accumulator_checkpoint: Hash256,

    /// Serialized from version 8
    pub chainstate_hash: Hash256,
    pub state_root: Hash256,
    pub utxo_root: Hash256,
}

impl Default for BlockHeader {
    fn default() -> Self {
        Self {
            version: CURRENT_BLOCK_VERSION,
            prev_hash: Hash256::zero(),
            merkle_root: Hash256::zero(),
            time: 0,
            bits: 0,
            nonce: 0,
            accumulator_checkpoint: Hash256::zero(),
            chainstate_hash: Hash256::zero(),
            state_root: Hash256::zero(),
            utxo_root: Hash256::zero(),
        }
    }
}

impl BlockHeader {
    pub fn to_bytes(&self) -> Vec<u8> {
        crate::codec::encode_to_vec(self).unwrap()
    }

    #[must_use]
    pub fn hash(&self) -> Hash256 {
        Hash256::hash_from_slice(self.to_bytes())
    }

    #[must_use]
    pub fn block_time(&self) -> i64 {
        self.time as i64
    }

    fn has_accumulator_checkpoint(&self) -> bool {
        self.version > 3 && self.version < 7
    }

    fn has_evm_roots(&self) -> bool {
        self.version == BLOCK_VERSION_VALIDATORS
    }
}

impl Encode for BlockHeader {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.version, encoder)?;
        bincode::Encode::encode(&self.prev_hash, encoder)?;
        bincode::Encode::encode(&self.merkle_root, encoder)?;
        bincode::Encode::encode(&self.time, encoder)?;
        bincode::Encode::encode(&self.bits, encoder)?;
        bincode::Encode::encode(&self.nonce, encoder)?;

        if self.has_accumulator_checkpoint() {
            bincode::Encode::encode(&self.accumulator_checkpoint, encoder)?;
        }

        if self.has_evm_roots() {
            bincode::Encode::encode(&self.chainstate_hash, encoder)?;
            bincode::Encode::encode(&self.state_root, encoder)?;
            bincode::Encode::encode(&self.utxo_root, encoder)?;
        }

        Ok(())
    }
}

impl Decode for BlockHeader {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        let mut header = BlockHeader {
            version: bincode::Decode::decode(decoder)?,
            prev_hash: bincode::Decode::decode(decoder)?,
            merkle_root: bincode::Decode::decode(decoder)?,
            time: bincode::Decode::decode(decoder)?,
            bits: bincode::Decode::decode(decoder)?,
            nonce: bincode::Decode::decode(decoder)?,
            ..Default::default()
        };

        if header.has_accumulator_checkpoint() {
            header.accumulator_checkpoint = bincode::Decode::decode(decoder)?;
        }

        if header.has_evm_roots() {
            header.chainstate_hash = bincode::Decode::decode(decoder)?;
            header.state_root = bincode::Decode::decode(decoder)?;
            header.utxo_root = bincode::Decode::decode(decoder)?;
        }

        Ok(header)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub header: BlockHeader,
    pub vtx: Vec<Transaction>,

    /// Signature by the owner of the staked output
    pub block_sig: Vec<u8>,

    /// Validator that countersigned the block
    pub validator_vin: TxIn,

    /// Signature by the validator over `hash_for_validator`
    pub validator_sig: Vec<u8>,
}

impl Block {
    #[must_use]
    pub fn hash(&self) -> Hash256 {
        self.header.hash()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        crate::codec::encode_to_vec(self).unwrap()
    }

    /// A block is proof of stake when its second transaction is a coinstake.
    #[must_use]
    pub fn is_proof_of_stake(&self) -> bool {
        self.vtx.len() > 1 && self.vtx[1].is_coinstake()
    }

    #[must_use]
    pub fn is_proof_of_work(&self) -> bool {
        !self.is_proof_of_stake()
    }

    /// The outpoint being staked and the block time, if proof of stake.
    #[must_use]
    pub fn proof_of_stake(&self) -> Option<(crate::primitives::OutPoint, u32)> {
        if !self.is_proof_of_stake() {
            return None;
        }

        Some((self.vtx[1].vin[0].prevout, self.header.time))
    }

    /// Merkle root of the transaction ids and whether the tree was mutated.
    #[must_use]
    pub fn compute_merkle_root(&self) -> (Hash256, bool) {
        let leaves: Vec<_> = self.vtx.iter().map(Transaction::hash).collect();
        compute_merkle_root(&leaves)
    }

    /// Hash signed by the validator: the block without its validator signature.
    #[must_use]
    pub fn hash_for_validator(&self) -> Hash256 {
        let mut buf = self.header.to_bytes();
        buf.extend(crate::codec::encode_to_vec(&ValidatorView(self)).unwrap());
        Hash256::hash_from_slice(buf)
    }

    /// Context free checks.
    pub fn verify(&self) -> Result<(), BlockVerifyErr> {
        if self.vtx.is_empty() {
            return Err(BlockVerifyErr::NoTransactions);
        }

        let (root, mutated) = self.compute_merkle_root();
        if root != self.header.merkle_root {
            return Err(BlockVerifyErr::InvalidMerkleRoot);
        }

        if mutated {
            return Err(BlockVerifyErr::DuplicateTransaction);
        }

        if !self.vtx[0].is_coinbase() {
            return Err(BlockVerifyErr::InvalidCoinbase);
        }

        if self.vtx.iter().skip(1).any(Transaction::is_coinbase) {
            return Err(BlockVerifyErr::InvalidCoinbase);
        }

        if self.vtx.iter().skip(2).any(Transaction::is_coinstake) {
            return Err(BlockVerifyErr::InvalidCoinstake);
        }

        for tx in &self.vtx {
            tx.verify()?;
        }

        Ok(())
    }
}

/// Transactions plus the staking fields, shared by the full encoding and
/// the validator hash.
struct ValidatorView<'a>(&'a Block);

impl<'a> Encode for ValidatorView<'a> {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        let block = self.0;
        crate::codec::encode_vec(&block.vtx, encoder)?;

        if block.is_proof_of_stake() {
            crate::codec::encode_bytes(&block.block_sig, encoder)?;

            if block.header.version >= BLOCK_VERSION_VALIDATORS {
                bincode::Encode::encode(&block.validator_vin, encoder)?;
            }
        }

        Ok(())
    }
}

impl Encode for Block {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.header, encoder)?;
        bincode::Encode::encode(&ValidatorView(self), encoder)?;

        if self.is_proof_of_stake() && self.header.version >= BLOCK_VERSION_VALIDATORS {
            crate::codec::encode_bytes(&self.validator_sig, encoder)?;
        }

        Ok(())
    }
}

impl Decode for Block {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        let mut block = Block {
            header: bincode::Decode::decode(decoder)?,
            vtx: crate::codec::decode_vec(decoder)?,
            ..Default::default()
        };

        if block.is_proof_of_stake() {
            block.block_sig = crate::codec::decode_bytes(decoder)?;

            if block.header.version >= BLOCK_VERSION_VALIDATORS {
                block.validator_vin = bincode::Decode::decode(decoder)?;
                block.validator_sig = crate::codec::decode_bytes(decoder)?;
            }
        }

        Ok(block)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BlockVerifyErr {
    NoTransactions,
    InvalidMerkleRoot,
    DuplicateTransaction,
    InvalidCoinbase,
    InvalidCoinstake,
    Tx(TxVerifyErr),
}

impl From<TxVerifyErr> for BlockVerifyErr {
    fn from(other: TxVerifyErr) -> Self {
        Self::Tx(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::COIN;
    use crate::primitives::{OutPoint, TxOut};
    use crate::script::Script;

    pub(crate) fn pos_block() -> Block {
        let coinbase = Transaction {
            version: 1,
            vin: vec![TxIn::default()],
            vout: vec![TxOut::new(0, Script::new())],
            ..Default::default()
        };
        let coinstake = Transaction {
            version: 1,
            vin: vec![TxIn::new(OutPoint::new(Hash256([1; 32]), 0))],
            vout: vec![
                TxOut::new(0, Script::new()),
                TxOut::new(10 * COIN, Script(vec![0xac])),
            ],
            ..Default::default()
        };
        let mut block = Block {
            vtx: vec![coinbase, coinstake],
            block_sig: vec![1, 2, 3],
            validator_vin: TxIn::new(OutPoint::new(Hash256::zero(), 0)),
            validator_sig: vec![4, 5],
            ..Default::default()
        };
        block.header.merkle_root = block.compute_merkle_root().0;
        block
    }

    #[test]
    fn it_detects_proof_of_stake() {
        let mut block = pos_block();
        assert!(block.is_proof_of_stake());
        assert_eq!(
            block.proof_of_stake(),
            Some((OutPoint::new(Hash256([1; 32]), 0), 0))
        );

        block.vtx.pop();
        assert!(block.is_proof_of_work());
        assert_eq!(block.proof_of_stake(), None);
    }

    #[test]
    fn it_serializes_staking_fields_for_pos_blocks() {
        let block = pos_block();
        let bytes = block.to_bytes();
        assert_eq!(crate::codec::decode::<Block>(&bytes).unwrap(), block);
        assert_eq!(&bytes[bytes.len() - 3..], &[2, 4, 5]);

        let mut pow = block.clone();
        pow.vtx.pop();
        let pow_bytes = pow.to_bytes();
        let decoded = crate::codec::decode::<Block>(&pow_bytes).unwrap();
        assert!(decoded.block_sig.is_empty());
        assert!(decoded.validator_sig.is_empty());
    }

    #[test]
    fn it_excludes_validator_sig_from_validator_hash() {
        let mut block = pos_block();
        let hash = block.hash_for_validator();
        block.validator_sig = vec![9; 70];
        assert_eq!(block.hash_for_validator(), hash);

        block.block_sig = vec![9; 70];
        assert_ne!(block.hash_for_validator(), hash);
    }

    #[test]
    fn it_serializes_header_fields_by_version() {
        let mut header = BlockHeader::default();
        assert_eq!(header.to_bytes().len(), 80 + 96);

        header.version = 5;
        assert_eq!(header.to_bytes().len(), 80 + 32);

        header.version = 7;
        assert_eq!(header.to_bytes().len(), 80);
    }

    #[test]
    fn it_verifies_merkle_root_and_coinbase() {
        let mut block = pos_block();
        assert!(block.verify().is_ok());

        block.header.merkle_root = Hash256::zero();
        assert_eq!(block.verify(), Err(BlockVerifyErr::InvalidMerkleRoot));

        let mut block = pos_block();
        block.vtx.swap(0, 1);
        block.header.merkle_root = block.compute_merkle_root().0;
        assert_eq!(block.verify(), Err(BlockVerifyErr::InvalidCoinbase));
    }
}
