// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::chain::{BlockIndexRef, ChainParams, ChainView};
use crate::consensus::{Money, COIN};
use crate::primitives::{Hash256, Transaction};
use crate::stake::{IndexFromCache, StakeErr, StakeInput, StakeKind, StakeOp};
use log::*;

/// Denominations, in whole coins, a zerocoin could be minted with.
pub const ZEROCOIN_DENOMINATIONS: [i64; 8] = [1, 5, 10, 50, 100, 500, 1000, 5000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpendType {
    Spend,
    Stake,
    MnCollateral,
    SignMessage,
}

/// The fields of a zerocoin spend that stake validation looks at. The proof
/// itself is verified elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyZerocoinSpend {
    /// Serialized coin serial number
    pub serial: [u8; 32],
    pub denomination: i64,
    pub accumulator_checksum: u32,
    pub spend_type: SpendType,
}

/// Stake backed by a legacy zerocoin spend. Validation only: these stakes
/// cannot be created any more.
#[derive(Debug, Clone)]
pub struct LegacyZerocoinStake {
    checksum: u32,
    denomination: i64,
    hash_serial: Hash256,
    spend_type: SpendType,
    index_from: IndexFromCache,
}

impl LegacyZerocoinStake {
    pub fn new(spend: &LegacyZerocoinSpend) -> Result<Self, StakeErr> {
        if !ZEROCOIN_DENOMINATIONS.contains(&spend.denomination) {
            return Err(StakeErr::InvalidDenomination);
        }

        Ok(Self {
            checksum: spend.accumulator_checksum,
            denomination: spend.denomination,
            hash_serial: Hash256::hash_from_slice(spend.serial),
            spend_type: spend.spend_type,
            index_from: IndexFromCache::new(),
        })
    }

    #[must_use]
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    #[must_use]
    pub fn denomination(&self) -> i64 {
        self.denomination
    }

    #[must_use]
    pub fn hash_serial(&self) -> Hash256 {
        self.hash_serial
    }

    #[must_use]
    pub fn spend_type(&self) -> SpendType {
        self.spend_type
    }
}

impl StakeInput for LegacyZerocoinStake {
    fn kind(&self) -> StakeKind {
        StakeKind::LegacyZerocoin
    }

    fn value(&self) -> Result<Money, StakeErr> {
        Ok(self.denomination * COIN)
    }

    fn uniqueness(&self) -> Vec<u8> {
        self.hash_serial.as_bytes().to_vec()
    }

    /// Active block at the height where the accumulator checksum first
    /// appeared. Checksums outside of the zerocoin era resolve to nothing.
    fn index_from(
        &self,
        params: &ChainParams,
        chain: &dyn ChainView,
    ) -> Result<Option<BlockIndexRef>, StakeErr> {
        self.index_from.get_or_try_resolve(|| {
            let Some(height) = chain.accumulator_checksum_height(self.checksum, self.denomination)?
            else {
                warn!(
                    "accumulator checksum {:08x} for denomination {} not found",
                    self.checksum, self.denomination
                );
                return Ok(None);
            };

            if height < params.zerocoin_start_height
                || height > params.block_last_accumulator_checkpoint
            {
                return Ok(None);
            }

            Ok(chain.active_block_at_height(height)?)
        })
    }

    fn tx_from(&self) -> Result<&Transaction, StakeErr> {
        Err(self.unsupported(StakeOp::TxFrom))
    }

    fn is_zerocoin(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{MemoryChain, Network};
    use crate::primitives::{Block, OutPoint, TxIn, TxOut};
    use crate::script::Script;
    use crate::stake::{Stake, StakeOp, UnsupportedOperation};
    use crate::wallet::MemoryKeyStore;

    fn spend(spend_type: SpendType) -> LegacyZerocoinSpend {
        LegacyZerocoinSpend {
            serial: [7; 32],
            denomination: 10,
            accumulator_checksum: 0xdead_beef,
            spend_type,
        }
    }

    fn extend(chain: &MemoryChain, blocks: usize) {
        for i in 0..blocks {
            let tip = chain.tip().unwrap().unwrap();
            let coinbase = Transaction {
                version: 1,
                vin: vec![TxIn::with_script(
                    OutPoint::null(),
                    Script((tip.height + 1).to_le_bytes().to_vec()),
                )],
                vout: vec![TxOut::new(0, Script(vec![0xac]))],
                ..Default::default()
            };
            let mut block = Block {
                vtx: vec![coinbase],
                ..Default::default()
            };
            block.header.prev_hash = tip.hash;
            block.header.time = 1_600_000_000 + i as u32 * 60;
            block.header.merkle_root = block.compute_merkle_root().0;
            chain.connect_block(&block).unwrap();
        }
    }

    #[test]
    fn it_values_and_fingerprints_by_serial() {
        let stake = LegacyZerocoinStake::new(&spend(SpendType::Stake)).unwrap();
        assert_eq!(stake.value().unwrap(), 10 * COIN);
        assert_eq!(stake.uniqueness(), Hash256::hash_from_slice([7; 32]).0.to_vec());
        assert!(stake.is_zerocoin());

        let mut bad = spend(SpendType::Stake);
        bad.denomination = 3;
        assert!(matches!(
            LegacyZerocoinStake::new(&bad),
            Err(StakeErr::InvalidDenomination)
        ));
    }

    #[test]
    fn it_refuses_creation_operations() {
        let stake: Stake = LegacyZerocoinStake::new(&spend(SpendType::Stake))
            .unwrap()
            .into();
        let store = MemoryKeyStore::new();

        for (res, op) in [
            (stake.create_tx_in().err(), StakeOp::CreateTxIn),
            (
                stake.create_tx_outs(&store, 0, COIN).err(),
                StakeOp::CreateTxOuts,
            ),
            (stake.tx_from().err(), StakeOp::TxFrom),
        ] {
            assert!(matches!(
                res,
                Some(StakeErr::Unsupported(UnsupportedOperation {
                    kind: StakeKind::LegacyZerocoin,
                    op: o,
                })) if o == op
            ));
        }

        assert_eq!(stake.value().unwrap(), 10 * COIN);
    }

    #[test]
    fn it_resolves_index_within_zerocoin_era() {
        // Regtest accumulates from height 1 up to the checkpoint at 301.
        let params = ChainParams::new(Network::Regtest).unwrap();
        let chain = MemoryChain::with_genesis(params.genesis()).unwrap();
        extend(&chain, 5);

        let stake = LegacyZerocoinStake::new(&spend(SpendType::Stake)).unwrap();
        assert_eq!(stake.index_from(&params, &chain).unwrap(), None);

        chain.add_accumulator_checksum(0xdead_beef, 10, 3);
        let index = stake.index_from(&params, &chain).unwrap().unwrap();
        assert_eq!(index.height, 3);

        let outside = LegacyZerocoinStake::new(&LegacyZerocoinSpend {
            accumulator_checksum: 1,
            ..spend(SpendType::Stake)
        })
        .unwrap();
        chain.add_accumulator_checksum(1, 10, 0);
        assert_eq!(outside.index_from(&params, &chain).unwrap(), None);
    }
}
