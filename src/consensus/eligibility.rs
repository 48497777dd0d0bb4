// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::chain::{BlockIndexRef, ChainParams, ChainView};
use crate::stake::{SpendType, Stake, StakeErr, StakeInput};
use log::*;

/// Checks that `stake` may mint a block at `(context_height, context_time)`.
///
/// Returns the block the stake originates from.
pub fn check_stake(
    params: &ChainParams,
    chain: &dyn ChainView,
    stake: &Stake,
    context_height: i32,
    context_time: i64,
) -> Result<BlockIndexRef, StakeErr> {
    let from = stake
        .index_from(params, chain)?
        .ok_or(StakeErr::IndexFromNotFound)?;

    if let Stake::LegacyZerocoin(zerocoin) = stake {
        if zerocoin.spend_type() != SpendType::Stake {
            return Err(StakeErr::WrongSpendType);
        }

        let depth = context_height as i64 - from.height as i64;
        if depth < params.zerocoin.required_stake_depth as i64 {
            debug!(
                "zerocoin stake depth {} below {}",
                depth, params.zerocoin.required_stake_depth
            );
            return Err(StakeErr::ZerocoinDepth);
        }
    }

    if !params.has_stake_min_age_or_depth(context_height, context_time, from.height, from.time) {
        debug!(
            "stake from height {} time {} not eligible at height {} time {}",
            from.height, from.time, context_height, context_time
        );
        return Err(StakeErr::MinAgeOrDepth);
    }

    Ok(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{MemoryChain, Network};
    use crate::consensus::COIN;
    use crate::primitives::{Block, OutPoint, Transaction, TxIn, TxOut};
    use crate::script::Script;
    use crate::stake::{GenesisStake, LegacyZerocoinSpend, LegacyZerocoinStake, UtxoStake};

    fn coinbase(height: i32) -> Transaction {
        Transaction {
            version: 1,
            vin: vec![TxIn::with_script(
                OutPoint::null(),
                Script(height.to_le_bytes().to_vec()),
            )],
            vout: vec![TxOut::new(0, Script(vec![0xac]))],
            ..Default::default()
        }
    }

    /// Extends the chain to `height`, placing `extra` in the block at `at`.
    fn build_chain(params: &ChainParams, height: i32, at: i32, extra: &Transaction) -> MemoryChain {
        let chain = MemoryChain::with_genesis(params.genesis()).unwrap();

        for h in 1..=height {
            let tip = chain.tip().unwrap().unwrap();
            let mut vtx = vec![coinbase(h)];
            if h == at {
                vtx.push(extra.clone());
            }

            let mut block = Block {
                vtx,
                ..Default::default()
            };
            block.header.prev_hash = tip.hash;
            block.header.time = 1_600_000_000 + h as u32 * 60;
            block.header.merkle_root = block.compute_merkle_root().0;
            chain.connect_block(&block).unwrap();
        }

        chain
    }

    fn funding_tx() -> Transaction {
        Transaction {
            version: 1,
            vin: vec![TxIn::new(OutPoint::new(crate::primitives::Hash256([3; 32]), 0))],
            vout: vec![TxOut::new(100 * COIN, Script(vec![0xac]))],
            ..Default::default()
        }
    }

    #[test]
    fn it_requires_depth_after_modifier_v2() {
        let params = ChainParams::new(Network::Main).unwrap();
        let tx = funding_tx();
        let chain = build_chain(&params, 12, 3, &tx);
        let stake: Stake = UtxoStake::new(tx, 0).unwrap().into();

        let from = check_stake(&params, &chain, &stake, 12, 0).unwrap();
        assert_eq!(from.height, 3);
        assert!(matches!(
            check_stake(&params, &chain, &stake, 11, i64::MAX),
            Err(StakeErr::MinAgeOrDepth)
        ));
    }

    #[test]
    fn it_matures_mainnet_output_at_depth_boundary() {
        let params = ChainParams::new(Network::Main).unwrap();
        let tx = funding_tx();
        let chain = build_chain(&params, 10, 1, &tx);
        let stake: Stake = UtxoStake::new(tx, 0).unwrap().into();

        assert_eq!(check_stake(&params, &chain, &stake, 10, 0).unwrap().height, 1);
        assert!(matches!(
            check_stake(&params, &chain, &stake, 9, i64::MAX),
            Err(StakeErr::MinAgeOrDepth)
        ));
    }

    #[test]
    fn it_requires_age_before_modifier_v2() {
        let mut params = ChainParams::new(Network::Test).unwrap();
        params.block_stake_modifier_v2 = 1000;
        let tx = funding_tx();
        let chain = build_chain(&params, 5, 2, &tx);
        let stake: Stake = UtxoStake::new(tx, 0).unwrap().into();
        let from_time = 1_600_000_000 + 2 * 60;

        assert!(check_stake(&params, &chain, &stake, 6, from_time + 3600).is_ok());
        assert!(matches!(
            check_stake(&params, &chain, &stake, 6, from_time + 3599),
            Err(StakeErr::MinAgeOrDepth)
        ));
    }

    #[test]
    fn it_fails_without_index_from() {
        let params = ChainParams::new(Network::Main).unwrap();
        let chain = MemoryChain::with_genesis(params.genesis()).unwrap();
        let stake: Stake = UtxoStake::new(funding_tx(), 0).unwrap().into();

        assert!(matches!(
            check_stake(&params, &chain, &stake, 100, 0),
            Err(StakeErr::IndexFromNotFound)
        ));
    }

    #[test]
    fn it_exempts_genesis_stakes() {
        let params = ChainParams::new(Network::Main).unwrap();
        let chain = MemoryChain::with_genesis(params.genesis()).unwrap();
        let stake: Stake = GenesisStake::new(&params, 0).into();

        let from = check_stake(&params, &chain, &stake, 1, 0).unwrap();
        assert_eq!(from.height, 0);
    }

    #[test]
    fn it_checks_zerocoin_spend_type_and_depth() {
        let params = ChainParams::new(Network::Regtest).unwrap();
        let chain = build_chain(&params, 6, 0, &funding_tx());
        chain.add_accumulator_checksum(42, 5, 4);

        let spend = |spend_type| LegacyZerocoinSpend {
            serial: [1; 32],
            denomination: 5,
            accumulator_checksum: 42,
            spend_type,
        };

        let wrong: Stake = LegacyZerocoinStake::new(&spend(SpendType::Spend))
            .unwrap()
            .into();
        assert!(matches!(
            check_stake(&params, &chain, &wrong, 6, 0),
            Err(StakeErr::WrongSpendType)
        ));

        let stake: Stake = LegacyZerocoinStake::new(&spend(SpendType::Stake))
            .unwrap()
            .into();
        assert!(matches!(
            check_stake(&params, &chain, &stake, 4, 0),
            Err(StakeErr::ZerocoinDepth)
        ));

        // Depth is met, but regtest still uses the age rule below height 251.
        assert!(check_stake(&params, &chain, &stake, 5, 1_600_000_000 + 4 * 60).is_ok());
        assert!(matches!(
            check_stake(&params, &chain, &stake, 5, 0),
            Err(StakeErr::MinAgeOrDepth)
        ));
    }
}
