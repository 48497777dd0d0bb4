// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! Registration and voting windows of the validator election period.
//!
//! Every period spans [`VALIDATORS_PERIOD`] blocks. Positions
//! `0..=VALIDATORS_REGISTER_END` accept registrations, the remaining
//! positions accept votes, and the validator list is recomputed at the last
//! position.

use crate::chain::{ChainBackendErr, ChainView};
use crate::consensus::{
    vin_is_genesis, VALIDATORS_PERIOD, VALIDATORS_REGISTER_END, VALIDATORS_UPDATE_POSITION,
    VALIDATORS_VOTING_START,
};
use crate::primitives::{SignatureErr, Transaction, TxIn};
use log::*;

#[derive(Debug)]
pub enum ValidatorTxErr {
    /// Transaction carries both registrations and votes
    MixedPayload,

    /// More than one registration or vote in a transaction
    TooManyEntries,

    /// Registration outside of the registration window
    OutsideRegistrationWindow,

    /// Vote outside of the voting window
    OutsideVotingWindow,

    /// Payload signature does not match its public key
    InvalidSignature(SignatureErr),

    /// The vin is not in the coin set
    SpentVin,

    /// The vin already registered or voted in this block
    DuplicateVin,

    /// Chain backend failure
    Backend(ChainBackendErr),
}

impl From<SignatureErr> for ValidatorTxErr {
    fn from(other: SignatureErr) -> Self {
        Self::InvalidSignature(other)
    }
}

impl From<ChainBackendErr> for ValidatorTxErr {
    fn from(other: ChainBackendErr) -> Self {
        Self::Backend(other)
    }
}

/// Position of `height` inside its election period.
#[must_use]
pub fn period_position(height: i32) -> i32 {
    height.rem_euclid(VALIDATORS_PERIOD)
}

#[must_use]
pub fn is_registration_window(height: i32) -> bool {
    period_position(height) <= VALIDATORS_REGISTER_END
}

#[must_use]
pub fn is_voting_window(height: i32) -> bool {
    period_position(height) >= VALIDATORS_VOTING_START
}

/// The validator list is recomputed when connecting a block at this position.
#[must_use]
pub fn is_update_position(height: i32) -> bool {
    period_position(height) == VALIDATORS_UPDATE_POSITION
}

/// Contextual checks of a validator registration or vote transaction
/// included in a block at `height`.
///
/// `block_validator_txs` holds the validator transactions of the same block
/// that were accepted before `tx`. Transactions without a validator payload
/// pass unchanged.
pub fn check_validator_transaction(
    tx: &Transaction,
    height: i32,
    block_validator_txs: &[Transaction],
    chain: &dyn ChainView,
) -> Result<(), ValidatorTxErr> {
    let register = tx.is_validator_register();
    let vote = tx.is_validator_vote();

    if !register && !vote {
        return Ok(());
    }

    if register && vote {
        return Err(ValidatorTxErr::MixedPayload);
    }

    let vin = if register {
        if tx.validator_register.len() > 1 {
            return Err(ValidatorTxErr::TooManyEntries);
        }

        if !is_registration_window(height) {
            debug!("validator registration at height {} outside window", height);
            return Err(ValidatorTxErr::OutsideRegistrationWindow);
        }

        let entry = &tx.validator_register[0];
        entry.verify()?;
        &entry.vin
    } else {
        if tx.validator_vote.len() > 1 {
            return Err(ValidatorTxErr::TooManyEntries);
        }

        if !is_voting_window(height) {
            debug!("validator vote at height {} outside window", height);
            return Err(ValidatorTxErr::OutsideVotingWindow);
        }

        let entry = &tx.validator_vote[0];
        entry.verify()?;
        &entry.vin
    };

    if !vin_is_genesis(vin) && !chain.is_unspent(&vin.prevout)? {
        return Err(ValidatorTxErr::SpentVin);
    }

    let duplicate = block_validator_txs.iter().any(|other| {
        if register {
            other.validator_register.iter().any(|r| &r.vin == vin)
        } else {
            other.validator_vote.iter().any(|v| &v.vin == vin)
        }
    });

    if duplicate {
        warn!("validator vin {:?} used twice in block {}", vin.prevout, height);
        return Err(ValidatorTxErr::DuplicateVin);
    }

    Ok(())
}

/// Payload vin of a validator transaction, if any.
pub(crate) fn validator_tx_vin(tx: &Transaction) -> Option<&TxIn> {
    tx.validator_register
        .first()
        .map(|r| &r.vin)
        .or_else(|| tx.validator_vote.first().map(|v| &v.vin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MemoryChain;
    use crate::primitives::test_keys::*;
    use crate::primitives::{
        Hash256, MnVote, OutPoint, TxOut, ValidatorRegister, ValidatorVote, VoteValue,
        TX_VERSION_VALIDATORS,
    };
    use crate::script::Script;

    fn vin(seed: u8) -> TxIn {
        TxIn::new(OutPoint::new(Hash256::hash_from_slice([seed]), 0))
    }

    fn register_tx(seed: u8, vin: TxIn) -> Transaction {
        let mut register = ValidatorRegister::new(vin, pubkey(seed), 1_600_000_000);
        register.signature = sign_compact(seed, &register.signature_hash());

        Transaction {
            version: TX_VERSION_VALIDATORS,
            vin: vec![TxIn::new(OutPoint::new(Hash256([9; 32]), seed as u32))],
            vout: vec![TxOut::new(0, Script(vec![0x6a]))],
            validator_register: vec![register],
            ..Default::default()
        }
    }

    fn vote_tx(seed: u8, vin: TxIn, candidate: TxIn) -> Transaction {
        let votes = vec![MnVote {
            vin: candidate,
            vote: VoteValue::Yes,
        }];
        let mut vote = ValidatorVote::new(vin, pubkey(seed), 1_600_000_000, votes);
        vote.signature = sign_compact(seed, &vote.signature_hash());

        Transaction {
            version: TX_VERSION_VALIDATORS,
            vin: vec![TxIn::new(OutPoint::new(Hash256([8; 32]), seed as u32))],
            vout: vec![TxOut::new(0, Script(vec![0x6a]))],
            validator_vote: vec![vote],
            ..Default::default()
        }
    }

    /// A chain whose coin set holds the outputs referenced by `vin(seed)`.
    fn chain_with_coins(seeds: &[u8]) -> MemoryChain {
        let chain = MemoryChain::new();
        for seed in seeds {
            chain.add_coin(vin(*seed).prevout);
        }
        chain
    }

    #[test]
    fn it_maps_heights_to_windows() {
        assert!(is_registration_window(0));
        assert!(is_registration_window(9));
        assert!(!is_registration_window(10));
        assert!(is_voting_window(10));
        assert!(is_voting_window(19));
        assert!(!is_voting_window(20));
        assert!(is_registration_window(20));
        assert!(is_update_position(19));
        assert!(is_update_position(39));
        assert!(!is_update_position(20));
    }

    #[test]
    fn it_accepts_registration_in_window() {
        let chain = chain_with_coins(&[1]);
        let tx = register_tx(1, vin(1));

        assert!(check_validator_transaction(&tx, 9, &[], &chain).is_ok());
        assert!(matches!(
            check_validator_transaction(&tx, 10, &[], &chain),
            Err(ValidatorTxErr::OutsideRegistrationWindow)
        ));
    }

    #[test]
    fn it_accepts_vote_in_window() {
        let chain = chain_with_coins(&[2]);
        let tx = vote_tx(2, vin(2), vin(1));

        assert!(check_validator_transaction(&tx, 10, &[], &chain).is_ok());
        assert!(check_validator_transaction(&tx, 19, &[], &chain).is_ok());
        assert!(matches!(
            check_validator_transaction(&tx, 20, &[], &chain),
            Err(ValidatorTxErr::OutsideVotingWindow)
        ));
    }

    #[test]
    fn it_rejects_mixed_and_multiple_entries() {
        let chain = chain_with_coins(&[1, 2]);

        let mut mixed = register_tx(1, vin(1));
        mixed.validator_vote = vote_tx(2, vin(2), vin(1)).validator_vote;
        assert!(matches!(
            check_validator_transaction(&mixed, 5, &[], &chain),
            Err(ValidatorTxErr::MixedPayload)
        ));

        let mut multiple = register_tx(1, vin(1));
        multiple
            .validator_register
            .extend(register_tx(2, vin(2)).validator_register);
        assert!(matches!(
            check_validator_transaction(&multiple, 5, &[], &chain),
            Err(ValidatorTxErr::TooManyEntries)
        ));
    }

    #[test]
    fn it_rejects_bad_signature() {
        let chain = chain_with_coins(&[1]);
        let mut tx = register_tx(1, vin(1));
        tx.validator_register[0].time += 1;

        assert!(matches!(
            check_validator_transaction(&tx, 0, &[], &chain),
            Err(ValidatorTxErr::InvalidSignature(_))
        ));
    }

    #[test]
    fn it_requires_unspent_vin_unless_genesis() {
        let chain = MemoryChain::new();
        let tx = register_tx(1, vin(1));
        assert!(matches!(
            check_validator_transaction(&tx, 0, &[], &chain),
            Err(ValidatorTxErr::SpentVin)
        ));

        let genesis_vin = TxIn::new(OutPoint::new(Hash256::zero(), 0));
        let tx = register_tx(1, genesis_vin);
        assert!(check_validator_transaction(&tx, 0, &[], &chain).is_ok());
    }

    #[test]
    fn it_rejects_duplicate_vin_in_block() {
        let chain = chain_with_coins(&[1, 2]);
        let first = register_tx(1, vin(1));
        let again = register_tx(1, vin(1));
        let other = register_tx(2, vin(2));

        assert!(check_validator_transaction(&other, 0, &[first.clone()], &chain).is_ok());
        assert!(matches!(
            check_validator_transaction(&again, 0, &[first], &chain),
            Err(ValidatorTxErr::DuplicateVin)
        ));
    }

    #[test]
    fn it_ignores_plain_transactions() {
        let chain = MemoryChain::new();
        let tx = Transaction {
            version: 1,
            vin: vec![vin(1)],
            vout: vec![TxOut::new(1, Script(vec![0xac]))],
            ..Default::default()
        };

        assert!(check_validator_transaction(&tx, 15, &[], &chain).is_ok());
        assert_eq!(validator_tx_vin(&tx), None);
        assert_eq!(validator_tx_vin(&register_tx(1, vin(1))), Some(&vin(1)));
    }
}
