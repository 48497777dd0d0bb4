// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::primitives::Hash256;
use log::*;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoubleStakeErr {
    /// The same coin already staked a block on the same parent
    AlreadySeen { parent: Hash256 },
}

#[derive(Debug, Default)]
struct SeenOnParent {
    height: i32,
    stakes: HashSet<Vec<u8>>,
}

/// Stakes already used to sign a block, keyed by parent block.
///
/// A coin may stake at most one block on top of a given parent. Parents
/// are remembered with their height so old ones can be pruned.
#[derive(Debug, Default)]
pub struct StakeSeen {
    inner: RwLock<HashMap<Hash256, SeenOnParent>>,
}

impl StakeSeen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, uniqueness: &[u8], parent: &Hash256) -> bool {
        self.inner
            .read()
            .get(parent)
            .map_or(false, |seen| seen.stakes.contains(uniqueness))
    }

    /// Records a stake on `parent` at `parent_height`, failing if it was
    /// already recorded.
    pub fn insert(
        &self,
        uniqueness: &[u8],
        parent: Hash256,
        parent_height: i32,
    ) -> Result<(), DoubleStakeErr> {
        let mut inner = self.inner.write();
        let seen = inner.entry(parent).or_insert_with(|| SeenOnParent {
            height: parent_height,
            stakes: HashSet::new(),
        });

        if !seen.stakes.insert(uniqueness.to_vec()) {
            warn!(
                "double stake of {} on parent {}",
                hex::encode(uniqueness),
                parent
            );
            return Err(DoubleStakeErr::AlreadySeen { parent });
        }

        Ok(())
    }

    /// Forgets every stake recorded on `parent`.
    pub fn remove_parent(&self, parent: &Hash256) {
        self.inner.write().remove(parent);
    }

    /// Forgets the stakes of every parent below `height`. Returns the number
    /// of parents removed.
    pub fn prune_below(&self, height: i32) -> usize {
        let mut inner = self.inner.write();
        let before = inner.len();
        inner.retain(|_, seen| seen.height >= height);
        let pruned = before - inner.len();

        if pruned > 0 {
            debug!("pruned seen stakes of {} parents below {}", pruned, height);
        }

        pruned
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().values().map(|seen| seen.stakes.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
