// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::chain::{BlockIndexRef, ChainParams, ChainView};
use crate::consensus::{Money, COIN, MAX_STAKE_SPLIT_OUTPUTS};
use crate::primitives::{Hash256, KeyId, OutPoint, Transaction, TxIn, TxOut};
use crate::script::{solver, Script, TxOutType};
use crate::stake::{IndexFromCache, SpendableStake, StakeErr, StakeInput, StakeKind};
use crate::wallet::KeyStore;
use log::*;

/// Stake backed by a transparent transaction output.
#[derive(Debug, Clone)]
pub struct UtxoStake {
    tx_from: Transaction,
    tx_hash: Hash256,
    position: u32,
    index_from: IndexFromCache,
}

impl UtxoStake {
    pub fn new(tx_from: Transaction, position: u32) -> Result<Self, StakeErr> {
        if position as usize >= tx_from.vout.len() {
            return Err(StakeErr::InvalidOutputIndex);
        }

        let tx_hash = tx_from.hash();
        Ok(Self {
            tx_from,
            tx_hash,
            position,
            index_from: IndexFromCache::new(),
        })
    }

    #[must_use]
    pub fn outpoint(&self) -> OutPoint {
        OutPoint::new(self.tx_hash, self.position)
    }

    fn kernel(&self) -> &TxOut {
        &self.tx_from.vout[self.position as usize]
    }

    fn staking_key(
        keystore: &dyn KeyStore,
        kind: TxOutType,
        solution: &[u8],
    ) -> Result<KeyId, StakeErr> {
        let key_id = KeyId::from_slice(solution).map_err(|_| StakeErr::UnsupportedScript(kind))?;

        if !keystore.have_key(&key_id) {
            debug!("missing staking key {:?}", key_id);
            return Err(StakeErr::MissingStakingKey(key_id));
        }

        Ok(key_id)
    }
}

impl StakeInput for UtxoStake {
    fn kind(&self) -> StakeKind {
        StakeKind::Utxo
    }

    fn value(&self) -> Result<Money, StakeErr> {
        Ok(self.kernel().value)
    }

    /// `position (u32 LE) || tx hash`
    fn uniqueness(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(36);
        out.extend_from_slice(&self.position.to_le_bytes());
        out.extend_from_slice(self.tx_hash.as_bytes());
        out
    }

    fn index_from(
        &self,
        _params: &ChainParams,
        chain: &dyn ChainView,
    ) -> Result<Option<BlockIndexRef>, StakeErr> {
        self.index_from.get_or_try_resolve(|| {
            let Some((_, block_hash)) = chain.get_transaction(&self.tx_hash)? else {
                debug!("failed to find tx {}", self.tx_hash);
                return Ok(None);
            };

            let Some(block_hash) = block_hash else {
                return Ok(None);
            };

            match chain.find_block_index(&block_hash)? {
                Some(index) if chain.is_in_active_chain(&index)? => Ok(Some(index)),
                _ => Ok(None),
            }
        })
    }

    fn tx_from(&self) -> Result<&Transaction, StakeErr> {
        Ok(&self.tx_from)
    }
}

impl SpendableStake for UtxoStake {
    fn create_tx_in(&self) -> TxIn {
        TxIn::new(self.outpoint())
    }

    fn create_tx_outs(
        &self,
        keystore: &dyn KeyStore,
        split_threshold: Money,
        total: Money,
    ) -> Result<Vec<TxOut>, StakeErr> {
        let kernel = &self.kernel().script_pubkey;
        let (kind, solutions) = solver(kernel);

        let script = match kind {
            TxOutType::PubKey => kernel.clone(),
            TxOutType::PubKeyHash => {
                let key_id = Self::staking_key(keystore, kind, &solutions[0])?;
                let pubkey = keystore
                    .get_pubkey(&key_id)
                    .ok_or(StakeErr::MissingStakingKey(key_id))?;
                Script::new_p2pk(&pubkey)
            }
            TxOutType::ColdStake => {
                Self::staking_key(keystore, kind, &solutions[0])?;
                kernel.clone()
            }
            other => return Err(StakeErr::UnsupportedScript(other)),
        };

        let splits = split_threshold
            .checked_mul(COIN)
            .filter(|threshold| *threshold > 0)
            .map_or(0, |threshold| total / threshold);

        let outputs = if splits > 1 {
            (splits as usize).min(MAX_STAKE_SPLIT_OUTPUTS)
        } else {
            1
        };

        if outputs > 1 {
            debug!("stake split: total {} into {} outputs", total, outputs);
        }

        Ok(vec![TxOut::new(0, script); outputs])
    }
}
