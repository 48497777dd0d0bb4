// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

pub mod memory;

pub use memory::*;

use crate::primitives::{Hash256, OutPoint, Transaction};

/// Owned handle to an entry of the block index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockIndexRef {
    pub hash: Hash256,
    pub height: i32,
    pub time: i64,
    pub prev_hash: Hash256,
}

impl BlockIndexRef {
    #[must_use]
    pub fn block_time(&self) -> i64 {
        self.time
    }
}

/// Read access to the block index, the active chain and the coin set.
///
/// Implementations must be safe to query from several threads at once.
pub trait ChainView: Send + Sync {
    /// Looks up a block, active or not, by hash
    fn find_block_index(&self, hash: &Hash256) -> Result<Option<BlockIndexRef>, ChainBackendErr>;

    /// Returns true if the block is part of the active chain
    fn is_in_active_chain(&self, index: &BlockIndexRef) -> Result<bool, ChainBackendErr>;

    /// Returns the active block at the given height
    fn active_block_at_height(&self, height: i32)
        -> Result<Option<BlockIndexRef>, ChainBackendErr>;

    /// Returns a transaction and the hash of the block containing it, if any
    fn get_transaction(
        &self,
        hash: &Hash256,
    ) -> Result<Option<(Transaction, Option<Hash256>)>, ChainBackendErr>;

    /// Height at which the given accumulator checksum first appeared for the denomination
    fn accumulator_checksum_height(
        &self,
        checksum: u32,
        denomination: i64,
    ) -> Result<Option<i32>, ChainBackendErr>;

    /// Returns true if the outpoint is in the coin set
    fn is_unspent(&self, outpoint: &OutPoint) -> Result<bool, ChainBackendErr>;

    /// Height of the active tip, `-1` for an empty chain
    fn height(&self) -> Result<i32, ChainBackendErr>;

    /// Returns the active tip
    fn tip(&self) -> Result<Option<BlockIndexRef>, ChainBackendErr> {
        let height = self.height()?;

        if height < 0 {
            return Ok(None);
        }

        self.active_block_at_height(height)
    }

    /// Returns the parent of the given block
    fn prev(&self, index: &BlockIndexRef) -> Result<Option<BlockIndexRef>, ChainBackendErr> {
        if index.height == 0 {
            return Ok(None);
        }

        self.find_block_index(&index.prev_hash)
    }
}

#[derive(Debug)]
pub enum ChainBackendErr {
    /// Block does not extend the active tip
    InvalidPrevHash,

    /// Given height is invalid
    InvalidHeight,

    /// Backend data is corrupted
    CorruptData,

    /// Generic error
    Error(&'static str),
}
