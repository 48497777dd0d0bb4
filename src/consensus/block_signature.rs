// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::chain::{ChainBackendErr, ChainParams, ChainView};
use crate::consensus::{genesis_validator_pubkey, vin_is_genesis, ValidatorsState};
use crate::primitives::{
    Block, Hash160, KeyId, PubKey, SignatureErr, TxIn, TxOut, BLOCK_VERSION_VALIDATORS,
};
use crate::script::opcodes::OP_ZEROCOINSPEND;
use crate::script::{solver, Instruction, TxOutType};
use log::*;

#[derive(Debug)]
pub enum BlockSignatureErr {
    /// Proof of work blocks carry no signature
    UnexpectedSignature,

    /// Proof of stake block is not signed
    MissingSignature,

    /// No public key could be derived from the staked output
    NoPubKey,

    /// Legacy zerocoin stakes are signed by the coin spend key
    ZerocoinStake,

    /// Validator is neither a genesis validator nor in the current list
    UnknownValidator,

    /// Validator vin is spent
    SpentValidatorVin,

    /// Signature verification failed
    InvalidSignature(SignatureErr),

    /// Chain backend failure
    Backend(ChainBackendErr),
}

impl From<SignatureErr> for BlockSignatureErr {
    fn from(other: SignatureErr) -> Self {
        Self::InvalidSignature(other)
    }
}

impl From<ChainBackendErr> for BlockSignatureErr {
    fn from(other: ChainBackendErr) -> Self {
        Self::Backend(other)
    }
}

/// Key id able to sign for `out`.
#[must_use]
pub fn key_id_from_txout(out: &TxOut) -> Option<KeyId> {
    let (kind, solutions) = solver(&out.script_pubkey);

    match kind {
        TxOutType::PubKey => Some(PubKey::from_bytes(&solutions[0]).ok()?.key_id()),
        TxOutType::PubKeyHash | TxOutType::ColdStake => Hash160::from_slice(&solutions[0]).ok(),
        _ => None,
    }
}

/// Public key pushed last by a cold staking scriptSig: `<sig> <flag> <pubkey>`.
fn cold_stake_pubkey(input: &TxIn) -> Option<PubKey> {
    let last = input.script_sig.instructions().last()?.ok()?;

    match last {
        Instruction::Push(bytes) => PubKey::from_bytes(bytes).ok(),
        Instruction::Op(_) => None,
    }
}

/// Checks the staker signature of a block.
///
/// Proof of work blocks must be unsigned. Proof of stake blocks are signed
/// over the block hash by the key of the second coinstake output, or for
/// cold stakes by the staker key revealed in the first coinstake input.
pub fn check_block_signature(block: &Block) -> Result<(), BlockSignatureErr> {
    if block.is_proof_of_work() {
        if !block.block_sig.is_empty() {
            return Err(BlockSignatureErr::UnexpectedSignature);
        }

        return Ok(());
    }

    if block.block_sig.is_empty() {
        return Err(BlockSignatureErr::MissingSignature);
    }

    let coinstake = &block.vtx[1];
    let input = &coinstake.vin[0];

    if input.script_sig.as_bytes().first() == Some(&OP_ZEROCOINSPEND) {
        return Err(BlockSignatureErr::ZerocoinStake);
    }

    let (kind, solutions) = solver(&coinstake.vout[1].script_pubkey);
    let pubkey = match kind {
        TxOutType::PubKey => PubKey::from_bytes(&solutions[0]).ok(),
        TxOutType::ColdStake => cold_stake_pubkey(input),
        _ => None,
    };

    let Some(pubkey) = pubkey else {
        debug!("no staker key for block {}", block.hash());
        return Err(BlockSignatureErr::NoPubKey);
    };

    pubkey.verify_der(&block.hash(), &block.block_sig)?;
    Ok(())
}

/// Checks the validator countersignature over [`Block::hash_for_validator`].
///
/// Genesis validators are looked up in the genesis block, every other
/// validator must be in the current validator list.
pub fn check_validator_signature(
    params: &ChainParams,
    block: &Block,
    state: &ValidatorsState,
) -> Result<(), BlockSignatureErr> {
    let pubkey = match genesis_validator_pubkey(params, &block.validator_vin) {
        Some(pubkey) => {
            trace!("checking block {} as a genesis validator", block.hash());
            pubkey
        }
        None => {
            let pubkey = state
                .validator_pubkey(&block.validator_vin)
                .ok_or(BlockSignatureErr::UnknownValidator)?;
            trace!("checking block {} as a regular validator", block.hash());
            pubkey
        }
    };

    pubkey.verify_der(&block.hash_for_validator(), &block.validator_sig)?;
    Ok(())
}

/// Validator checks of a block: the validator vin must be unspent unless it
/// is a genesis vin, and the countersignature must verify. Blocks older than
/// [`BLOCK_VERSION_VALIDATORS`] have no validator.
pub fn check_validator(
    params: &ChainParams,
    block: &Block,
    chain: &dyn ChainView,
    state: &ValidatorsState,
) -> Result<(), BlockSignatureErr> {
    if block.header.version < BLOCK_VERSION_VALIDATORS {
        return Ok(());
    }

    let vin = &block.validator_vin;
    if !vin_is_genesis(vin) && !chain.is_unspent(&vin.prevout)? {
        return Err(BlockSignatureErr::SpentValidatorVin);
    }

    check_validator_signature(params, block, state)
}
