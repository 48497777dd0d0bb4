// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::chain::{BlockIndexRef, ChainBackendErr, ChainView};
use crate::primitives::{Block, Hash256, OutPoint, Transaction};
use log::*;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct Inner {
    index: HashMap<Hash256, BlockIndexRef>,
    active: Vec<Hash256>,
    txs: HashMap<Hash256, (Transaction, Option<Hash256>)>,
    coins: HashSet<OutPoint>,
    spent_by_block: HashMap<Hash256, Vec<OutPoint>>,
    checksums: HashMap<(u32, i64), i32>,
}

/// In memory chain backend. One writer appends or disconnects blocks while
/// any number of readers query it.
#[derive(Debug, Default)]
pub struct MemoryChain {
    inner: RwLock<Inner>,
}

impl MemoryChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain holding only the given genesis block.
    pub fn with_genesis(genesis: &Block) -> Result<Self, ChainBackendErr> {
        let chain = Self::new();
        chain.connect_block(genesis)?;
        Ok(chain)
    }

    /// Appends a block to the active chain, indexing its transactions and
    /// updating the coin set.
    pub fn connect_block(&self, block: &Block) -> Result<BlockIndexRef, ChainBackendErr> {
        let mut inner = self.inner.write();
        let height = inner.active.len() as i32;

        if let Some(tip) = inner.active.last() {
            if &block.header.prev_hash != tip {
                return Err(ChainBackendErr::InvalidPrevHash);
            }
        }

        let hash = block.hash();
        let index = BlockIndexRef {
            hash,
            height,
            time: block.header.block_time(),
            prev_hash: block.header.prev_hash,
        };

        let mut spent = vec![];
        for tx in &block.vtx {
            let txid = tx.hash();

            if !tx.is_coinbase() {
                for input in &tx.vin {
                    if inner.coins.remove(&input.prevout) {
                        spent.push(input.prevout);
                    }
                }
            }

            for (i, out) in tx.vout.iter().enumerate() {
                if !out.is_empty() && !out.script_pubkey.is_unspendable() {
                    inner.coins.insert(OutPoint::new(txid, i as u32));
                }
            }

            inner.txs.insert(txid, (tx.clone(), Some(hash)));
        }

        inner.spent_by_block.insert(hash, spent);
        inner.index.insert(hash, index);
        inner.active.push(hash);
        trace!("connected block {} at height {}", hash, height);

        Ok(index)
    }

    /// Removes the tip from the active chain. The block stays in the index.
    pub fn disconnect_tip(&self) -> Result<Option<BlockIndexRef>, ChainBackendErr> {
        let mut inner = self.inner.write();
        let Some(hash) = inner.active.pop() else {
            return Ok(None);
        };

        let index = *inner.index.get(&hash).ok_or(ChainBackendErr::CorruptData)?;
        let txids: Vec<_> = inner
            .txs
            .iter()
            .filter(|(_, (_, block))| block == &Some(hash))
            .map(|(txid, (tx, _))| (*txid, tx.vout.len()))
            .collect();

        for (txid, outputs) in txids {
            for i in 0..outputs {
                inner.coins.remove(&OutPoint::new(txid, i as u32));
            }

            if let Some(entry) = inner.txs.get_mut(&txid) {
                entry.1 = None;
            }
        }

        let spent = inner.spent_by_block.remove(&hash).unwrap_or_default();
        inner.coins.extend(spent);
        trace!("disconnected block {} at height {}", hash, index.height);

        Ok(Some(index))
    }

    /// Indexes a block outside of the active chain.
    pub fn insert_stale_block(
        &self,
        block: &Block,
        height: i32,
    ) -> Result<BlockIndexRef, ChainBackendErr> {
        if height < 0 {
            return Err(ChainBackendErr::InvalidHeight);
        }

        let mut inner = self.inner.write();
        let hash = block.hash();
        let index = BlockIndexRef {
            hash,
            height,
            time: block.header.block_time(),
            prev_hash: block.header.prev_hash,
        };

        for tx in &block.vtx {
            inner
                .txs
                .entry(tx.hash())
                .or_insert_with(|| (tx.clone(), Some(hash)));
        }

        inner.index.insert(hash, index);
        Ok(index)
    }

    /// Adds an outpoint to the coin set without a backing block.
    pub fn add_coin(&self, outpoint: OutPoint) {
        self.inner.write().coins.insert(outpoint);
    }

    /// Records the height at which an accumulator checksum first appeared.
    pub fn add_accumulator_checksum(&self, checksum: u32, denomination: i64, height: i32) {
        self.inner
            .write()
            .checksums
            .entry((checksum, denomination))
            .or_insert(height);
    }
}

impl ChainView for MemoryChain {
    fn find_block_index(&self, hash: &Hash256) -> Result<Option<BlockIndexRef>, ChainBackendErr> {
        Ok(self.inner.read().index.get(hash).copied())
    }

    fn is_in_active_chain(&self, index: &BlockIndexRef) -> Result<bool, ChainBackendErr> {
        let inner = self.inner.read();

        if index.height < 0 {
            return Ok(false);
        }

        Ok(inner.active.get(index.height as usize) == Some(&index.hash))
    }

    fn active_block_at_height(
        &self,
        height: i32,
    ) -> Result<Option<BlockIndexRef>, ChainBackendErr> {
        if height < 0 {
            return Ok(None);
        }

        let inner = self.inner.read();
        match inner.active.get(height as usize) {
            Some(hash) => Ok(Some(
                *inner.index.get(hash).ok_or(ChainBackendErr::CorruptData)?,
            )),
            None => Ok(None),
        }
    }

    fn get_transaction(
        &self,
        hash: &Hash256,
    ) -> Result<Option<(Transaction, Option<Hash256>)>, ChainBackendErr> {
        Ok(self.inner.read().txs.get(hash).cloned())
    }

    fn accumulator_checksum_height(
        &self,
        checksum: u32,
        denomination: i64,
    ) -> Result<Option<i32>, ChainBackendErr> {
        Ok(self
            .inner
            .read()
            .checksums
            .get(&(checksum, denomination))
            .copied())
    }

    fn is_unspent(&self, outpoint: &OutPoint) -> Result<bool, ChainBackendErr> {
        Ok(self.inner.read().coins.contains(outpoint))
    }

    fn height(&self) -> Result<i32, ChainBackendErr> {
        Ok(self.inner.read().active.len() as i32 - 1)
    }
}
