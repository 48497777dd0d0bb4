// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::chain::{BlockIndexRef, ChainParams};
use crate::consensus::{is_update_position, MAX_VALIDATORS_DEFAULT};
use crate::primitives::{
    Hash256, PubKey, Transaction, TxIn, ValidatorInfo, ValidatorRegister, ValidatorVote,
};
use log::*;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VotingErr {
    /// No snapshot was taken when the block was connected
    MissingSnapshot(Hash256),
}

/// Registrations and votes of the running period plus the validator list
/// elected in the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VotingSnapshot {
    pub registrations: Vec<ValidatorRegister>,
    pub votes: Vec<ValidatorVote>,
    pub validators: Vec<ValidatorInfo>,
}

/// Validator election state, updated as blocks are connected and
/// disconnected.
///
/// A snapshot is taken at every period end so the election can be undone
/// on reorganization.
#[derive(Debug)]
pub struct ValidatorsState {
    current: RwLock<VotingSnapshot>,
    snapshots: RwLock<HashMap<Hash256, VotingSnapshot>>,
    max_validators: usize,
}

impl Default for ValidatorsState {
    fn default() -> Self {
        Self::new(MAX_VALIDATORS_DEFAULT)
    }
}

impl ValidatorsState {
    /// A zero `max_validators` falls back to [`MAX_VALIDATORS_DEFAULT`].
    #[must_use]
    pub fn new(max_validators: usize) -> Self {
        let max_validators = if max_validators > 0 {
            max_validators
        } else {
            MAX_VALIDATORS_DEFAULT
        };

        Self {
            current: RwLock::new(VotingSnapshot::default()),
            snapshots: RwLock::new(HashMap::new()),
            max_validators,
        }
    }

    #[must_use]
    pub fn max_validators(&self) -> usize {
        self.max_validators
    }

    #[must_use]
    pub fn validators(&self) -> Vec<ValidatorInfo> {
        self.current.read().validators.clone()
    }

    #[must_use]
    pub fn registrations(&self) -> Vec<ValidatorRegister> {
        self.current.read().registrations.clone()
    }

    #[must_use]
    pub fn votes(&self) -> Vec<ValidatorVote> {
        self.current.read().votes.clone()
    }

    pub fn set_validators(&self, validators: Vec<ValidatorInfo>) {
        self.current.write().validators = validators;
    }

    #[must_use]
    pub fn validator_info(&self, vin: &TxIn) -> Option<ValidatorInfo> {
        self.current
            .read()
            .validators
            .iter()
            .find(|v| &v.vin == vin)
            .cloned()
    }

    #[must_use]
    pub fn validator_pubkey(&self, vin: &TxIn) -> Option<PubKey> {
        self.validator_info(vin).map(|v| v.pubkey)
    }

    /// Applies the validator payload of a connected transaction.
    pub fn connect_transaction(&self, tx: &Transaction) {
        let mut current = self.current.write();

        if let Some(register) = tx.validator_register.first() {
            current.registrations.push(register.clone());
        } else if let Some(vote) = tx.validator_vote.first() {
            current.votes.push(vote.clone());
        }
    }

    /// Reverts [`Self::connect_transaction`]. Returns false if the payload
    /// was not recorded.
    pub fn disconnect_transaction(&self, tx: &Transaction) -> bool {
        let mut current = self.current.write();

        if let Some(register) = tx.validator_register.first() {
            return remove_first(&mut current.registrations, register);
        }

        if let Some(vote) = tx.validator_vote.first() {
            return remove_first(&mut current.votes, vote);
        }

        false
    }

    /// Called after every transaction of `index` has been connected. At the
    /// last position of a period the votes are counted, the new validator
    /// list installed and the period state cleared.
    pub fn connect_block(&self, index: &BlockIndexRef) {
        if !is_update_position(index.height) {
            return;
        }

        let mut current = self.current.write();
        self.snapshots.write().insert(index.hash, current.clone());

        let count = count_votes(&current.votes);
        current.validators =
            compose_validators_list(count, &current.registrations, self.max_validators);
        current.registrations.clear();
        current.votes.clear();

        info!(
            "elected {} validators at height {}",
            current.validators.len(),
            index.height
        );
    }

    /// Called before the transactions of `index` are disconnected. Restores
    /// the state saved when the block was connected.
    pub fn disconnect_block(&self, index: &BlockIndexRef) -> Result<(), VotingErr> {
        if !is_update_position(index.height) {
            return Ok(());
        }

        let snapshot = self
            .snapshots
            .write()
            .remove(&index.hash)
            .ok_or(VotingErr::MissingSnapshot(index.hash))?;

        *self.current.write() = snapshot;
        debug!("restored validator state of height {}", index.height);
        Ok(())
    }
}

fn remove_first<T: PartialEq>(items: &mut Vec<T>, item: &T) -> bool {
    match items.iter().position(|i| i == item) {
        Some(pos) => {
            items.remove(pos);
            true
        }
        None => false,
    }
}

/// Tallies the votes of the running period.
///
/// An entry is matched against the candidate of each vote but is created
/// under the vin of the voter, so a candidate only accumulates score once
/// some voter with its vin has already been tallied.
#[must_use]
pub fn count_votes(votes: &[ValidatorVote]) -> Vec<(i32, TxIn)> {
    let mut count: Vec<(i32, TxIn)> = vec![];

    for vote in votes {
        for v in &vote.votes {
            match count.iter_mut().find(|(_, vin)| vin == &v.vin) {
                Some((score, _)) => *score += v.vote.score(),
                None => count.push((v.vote.score(), vote.vin.clone())),
            }
        }
    }

    count
}

/// Picks the first `max` registered entries of the tally ordered by score
/// ascending, then by prevout hash. Entries with equal score and hash keep
/// their tally order.
#[must_use]
pub fn compose_validators_list(
    mut count: Vec<(i32, TxIn)>,
    registrations: &[ValidatorRegister],
    max: usize,
) -> Vec<ValidatorInfo> {
    count.sort_by(|(a_score, a_vin), (b_score, b_vin)| {
        a_score
            .cmp(b_score)
            .then_with(|| a_vin.prevout.hash.cmp(&b_vin.prevout.hash))
    });

    count
        .into_iter()
        .filter_map(|(_, vin)| {
            let Some(register) = registrations.iter().find(|r| r.vin == vin) else {
                warn!("tallied vin {:?} is not registered", vin.prevout);
                return None;
            };

            Some(ValidatorInfo {
                vin,
                pubkey: register.pubkey.clone(),
            })
        })
        .take(max)
        .collect()
}

/// Genesis validators are registered with vins that spend nothing.
#[must_use]
pub fn vin_is_genesis(vin: &TxIn) -> bool {
    vin.prevout.hash.is_zero()
}

/// Public key of the genesis validator registered with `vin`.
#[must_use]
pub fn genesis_validator_pubkey(params: &ChainParams, vin: &TxIn) -> Option<PubKey> {
    if !vin_is_genesis(vin) {
        return None;
    }

    params
        .genesis()
        .vtx
        .first()?
        .validator_register
        .iter()
        .find(|r| &r.vin == vin)
        .map(|r| r.pubkey.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Network;
    use crate::primitives::test_keys::*;
    use crate::primitives::{MnVote, OutPoint, VoteValue, TX_VERSION_VALIDATORS};

    fn vin(seed: u8) -> TxIn {
        TxIn::new(OutPoint::new(Hash256([seed; 32]), 0))
    }

    fn register(seed: u8) -> ValidatorRegister {
        ValidatorRegister::new(vin(seed), pubkey(seed), 0)
    }

    fn vote(voter: u8, votes: &[(u8, VoteValue)]) -> ValidatorVote {
        let votes = votes
            .iter()
            .map(|(candidate, value)| MnVote {
                vin: vin(*candidate),
                vote: *value,
            })
            .collect();
        ValidatorVote::new(vin(voter), pubkey(voter), 0, votes)
    }

    fn index(height: i32, tag: u8) -> BlockIndexRef {
        BlockIndexRef {
            hash: Hash256([tag; 32]),
            height,
            time: 0,
            prev_hash: Hash256::zero(),
        }
    }

    #[test]
    fn it_tallies_under_voter_vin() {
        let votes = vec![vote(1, &[(2, VoteValue::Yes), (3, VoteValue::No)])];
        assert_eq!(count_votes(&votes), vec![(1, vin(1)), (-1, vin(1))]);
    }

    #[test]
    fn it_accumulates_when_candidate_matches_a_tallied_voter() {
        let votes = vec![
            vote(1, &[(2, VoteValue::Yes)]),
            vote(2, &[(1, VoteValue::Yes), (1, VoteValue::Abstain)]),
            vote(3, &[(1, VoteValue::Yes), (4, VoteValue::No)]),
        ];

        // The first vote creates an entry for voter 1, later votes for
        // candidate 1 add to it.
        assert_eq!(count_votes(&votes), vec![(3, vin(1)), (-1, vin(3))]);
    }

    #[test]
    fn it_composes_lowest_scores_first() {
        let registrations: Vec<_> = (1..=4).map(register).collect();
        let count = vec![(1, vin(3)), (5, vin(2)), (1, vin(1)), (-2, vin(4)), (-9, vin(7))];

        let list = compose_validators_list(count, &registrations, 3);
        let vins: Vec<_> = list.iter().map(|v| v.vin.clone()).collect();

        // vin 7 never registered.
        assert_eq!(vins, vec![vin(4), vin(1), vin(3)]);
        assert_eq!(list[0].pubkey, pubkey(4));
    }

    #[test]
    fn it_keeps_tally_order_on_equal_hash() {
        let registrations = vec![
            ValidatorRegister::new(TxIn::new(OutPoint::new(Hash256([5; 32]), 1)), pubkey(1), 0),
            ValidatorRegister::new(TxIn::new(OutPoint::new(Hash256([5; 32]), 0)), pubkey(2), 0),
        ];
        let count = registrations.iter().map(|r| (0, r.vin.clone())).collect();

        let list = compose_validators_list(count, &registrations, 10);
        assert_eq!(list[0].vin.prevout.n, 1);
        assert_eq!(list[1].vin.prevout.n, 0);
    }

    #[test]
    fn it_elects_at_period_end_and_restores_on_disconnect() {
        let state = ValidatorsState::new(0);
        assert_eq!(state.max_validators(), MAX_VALIDATORS_DEFAULT);

        let reg_tx = Transaction {
            version: TX_VERSION_VALIDATORS,
            validator_register: vec![register(1)],
            ..Default::default()
        };
        let vote_tx = Transaction {
            version: TX_VERSION_VALIDATORS,
            validator_vote: vec![vote(1, &[(2, VoteValue::Yes)])],
            ..Default::default()
        };

        state.connect_transaction(&reg_tx);
        state.connect_block(&index(5, 1));
        state.connect_transaction(&vote_tx);
        assert_eq!(state.registrations().len(), 1);
        assert_eq!(state.votes().len(), 1);

        let period_end = index(19, 2);
        state.connect_block(&period_end);
        assert!(state.registrations().is_empty());
        assert!(state.votes().is_empty());
        assert_eq!(state.validator_pubkey(&vin(1)), Some(pubkey(1)));
        assert_eq!(state.validator_info(&vin(2)), None);
        assert_eq!(state.validators().len(), 1);

        state.disconnect_block(&period_end).unwrap();
        assert!(state.validators().is_empty());
        assert_eq!(state.votes().len(), 1);

        assert!(state.disconnect_transaction(&vote_tx));
        assert!(!state.disconnect_transaction(&vote_tx));
        assert!(state.disconnect_transaction(&reg_tx));
        assert_eq!(
            state.disconnect_block(&period_end),
            Err(VotingErr::MissingSnapshot(period_end.hash))
        );
        assert!(state.disconnect_block(&index(18, 3)).is_ok());
    }

    #[test]
    fn it_finds_genesis_validator_keys() {
        let params = ChainParams::new(Network::Regtest).unwrap();
        let registered = &params.genesis().vtx[0].validator_register[0];

        assert!(vin_is_genesis(&registered.vin));
        assert_eq!(
            genesis_validator_pubkey(&params, &registered.vin),
            Some(registered.pubkey.clone())
        );
        assert_eq!(genesis_validator_pubkey(&params, &vin(1)), None);

        let unknown = TxIn::new(OutPoint::new(Hash256::zero(), 99));
        assert_eq!(genesis_validator_pubkey(&params, &unknown), None);
    }
}
