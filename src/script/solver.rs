// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::primitives::PubKey;
use crate::script::opcodes::*;
use crate::script::{Instruction, Script};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutType {
    NonStandard,
    PubKey,
    PubKeyHash,
    ScriptHash,
    ColdStake,
    NullData,
}

/// Classifies a script against the standard templates and returns the
/// extracted solutions.
///
/// * `PubKey`: `[pubkey]`
/// * `PubKeyHash`, `ScriptHash`: `[hash160]`
/// * `ColdStake`: `[staker key id, owner key id]`
#[must_use]
pub fn solver(script: &Script) -> (TxOutType, Vec<Vec<u8>>) {
    let bytes = script.as_bytes();

    if script.is_pay_to_script_hash() {
        return (TxOutType::ScriptHash, vec![bytes[2..22].to_vec()]);
    }

    if script.is_pay_to_cold_staking() {
        return (
            TxOutType::ColdStake,
            vec![bytes[6..26].to_vec(), bytes[28..48].to_vec()],
        );
    }

    if script.is_unspendable() {
        let only_pushes = script
            .instructions()
            .skip(1)
            .all(|i| matches!(i, Ok(Instruction::Push(_))));

        if only_pushes {
            return (TxOutType::NullData, vec![]);
        }

        return (TxOutType::NonStandard, vec![]);
    }

    let instructions: Result<Vec<_>, _> = script.instructions().collect();
    let Ok(instructions) = instructions else {
        return (TxOutType::NonStandard, vec![]);
    };

    match instructions.as_slice() {
        [Instruction::Push(key), Instruction::Op(OP_CHECKSIG)] if PubKey::is_valid_size(key) => {
            (TxOutType::PubKey, vec![key.to_vec()])
        }
        [Instruction::Op(OP_DUP), Instruction::Op(OP_HASH160), Instruction::Push(hash), Instruction::Op(OP_EQUALVERIFY), Instruction::Op(OP_CHECKSIG)]
            if hash.len() == 20 =>
        {
            (TxOutType::PubKeyHash, vec![hash.to_vec()])
        }
        _ => (TxOutType::NonStandard, vec![]),
    }
}
