// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::chain::{BlockIndexRef, ChainParams, ChainView};
use crate::consensus::Money;
use crate::primitives::{Hash256, Transaction};
use crate::stake::{IndexFromCache, StakeErr, StakeInput, StakeKind, StakeOp};

/// Stake backed by an allocation of the genesis block.
///
/// Genesis allocations do not exist in the coin set, so everything except
/// the uniqueness and the block of origin is unavailable.
#[derive(Debug, Clone)]
pub struct GenesisStake {
    tx_hash: Hash256,
    position: u32,
    genesis_hash: Hash256,
    index_from: IndexFromCache,
}

impl GenesisStake {
    #[must_use]
    pub fn new(params: &ChainParams, position: u32) -> Self {
        Self {
            tx_hash: params.genesis().vtx[0].hash(),
            position,
            genesis_hash: params.genesis_hash(),
            index_from: IndexFromCache::new(),
        }
    }
}

impl StakeInput for GenesisStake {
    fn kind(&self) -> StakeKind {
        StakeKind::Genesis
    }

    fn value(&self) -> Result<Money, StakeErr> {
        Err(self.unsupported(StakeOp::Value))
    }

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
        self.index_from
            .get_or_try_resolve(|| match chain.find_block_index(&self.genesis_hash)? {
                Some(index) if chain.is_in_active_chain(&index)? => Ok(Some(index)),
                _ => Ok(None),
            })
    }

    fn tx_from(&self) -> Result<&Transaction, StakeErr> {
        Err(self.unsupported(StakeOp::TxFrom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{MemoryChain, Network};
    use crate::stake::{Stake, UnsupportedOperation};
    use crate::wallet::MemoryKeyStore;

    #[test]
    fn it_resolves_genesis_once_connected() {
        let params = ChainParams::new(Network::Regtest).unwrap();
        let stake = GenesisStake::new(&params, 0);

        let empty = MemoryChain::new();
        assert_eq!(stake.index_from(&params, &empty).unwrap(), None);

        let chain = MemoryChain::with_genesis(params.genesis()).unwrap();
        let index = stake.index_from(&params, &chain).unwrap().unwrap();
        assert_eq!(index.height, 0);
        assert_eq!(index.hash, params.genesis_hash());
    }

    #[test]
    fn it_refuses_value_and_creation() {
        let params = ChainParams::new(Network::Regtest).unwrap();
        let stake: Stake = GenesisStake::new(&params, 2).into();
        let store = MemoryKeyStore::new();
        let unsupported = |op| {
            StakeErr::Unsupported(UnsupportedOperation {
                kind: StakeKind::Genesis,
                op,
            })
        };

        assert_eq!(
            format!("{:?}", stake.value().unwrap_err()),
            format!("{:?}", unsupported(StakeOp::Value))
        );
        assert!(matches!(stake.create_tx_in(), Err(StakeErr::Unsupported(_))));
        assert!(matches!(
            stake.create_tx_outs(&store, 0, 0),
            Err(StakeErr::Unsupported(_))
        ));
        assert!(matches!(stake.tx_from(), Err(StakeErr::Unsupported(_))));
    }

    #[test]
    fn it_fingerprints_position_and_coinbase() {
        let params = ChainParams::new(Network::Regtest).unwrap();
        let uniqueness = GenesisStake::new(&params, 2).uniqueness();

        assert_eq!(&uniqueness[..4], &[2, 0, 0, 0]);
        assert_eq!(&uniqueness[4..], params.genesis().vtx[0].hash().as_bytes());
    }
}
