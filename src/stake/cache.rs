// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::chain::BlockIndexRef;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};

/// Lazily resolved block of origin of a stake.
///
/// Only successful lookups are cached. A stake whose block is not in the
/// active chain yet is looked up again on the next call.
#[derive(Debug, Default)]
pub struct IndexFromCache {
    inner: RwLock<Option<BlockIndexRef>>,
}

impl IndexFromCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Option<BlockIndexRef> {
        *self.inner.read()
    }

    /// Returns the cached index or runs `resolve` and caches a found index.
    ///
    /// Only one caller at a time may hold the upgradable lock, so concurrent
    /// first lookups run `resolve` once.
    pub fn get_or_try_resolve<F, E>(&self, resolve: F) -> Result<Option<BlockIndexRef>, E>
    where
        F: FnOnce() -> Result<Option<BlockIndexRef>, E>,
    {
        let guard = self.inner.upgradable_read();

        if let Some(index) = *guard {
            return Ok(Some(index));
        }

        let resolved = resolve()?;

        if let Some(index) = resolved {
            let mut guard = RwLockUpgradableReadGuard::upgrade(guard);
            *guard = Some(index);
        }

        Ok(resolved)
    }
}

impl Clone for IndexFromCache {
    fn clone(&self) -> Self {
        Self {
            inner: RwLock::new(self.get()),
        }
    }
}
