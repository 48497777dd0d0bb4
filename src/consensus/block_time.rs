// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::chain::{BlockIndexRef, ChainBackendErr, ChainParams, ChainView};
use crate::consensus::MEDIAN_TIME_SPAN;
use log::*;

#[derive(Debug)]
pub enum BlockTimeErr {
    /// Timestamp is past the allowed drift
    TooNew { time: i64, max: i64 },

    /// Timestamp is not after the minimum past block time
    TooOld { time: i64, min: i64 },

    /// Timestamp is not aligned to a time slot
    InvalidSlot(i64),

    /// Chain backend failure
    Backend(ChainBackendErr),
}

impl From<ChainBackendErr> for BlockTimeErr {
    fn from(other: ChainBackendErr) -> Self {
        Self::Backend(other)
    }
}

/// Median of the timestamps of `index` and up to ten of its ancestors.
pub fn median_time_past(
    chain: &dyn ChainView,
    index: &BlockIndexRef,
) -> Result<i64, ChainBackendErr> {
    let mut times = Vec::with_capacity(MEDIAN_TIME_SPAN);
    let mut cur = Some(*index);

    while let Some(index) = cur {
        times.push(index.time);

        if times.len() == MEDIAN_TIME_SPAN {
            break;
        }

        cur = chain.prev(&index)?;
    }

    times.sort_unstable();
    Ok(times[times.len() / 2])
}

/// Latest timestamp a block on top of `prev` may carry.
#[must_use]
pub fn max_future_block_time(
    params: &ChainParams,
    prev: &BlockIndexRef,
    adjusted_time: i64,
) -> i64 {
    adjusted_time + params.future_block_time_drift(prev.height + 1)
}

/// A block on top of `prev` must be strictly later than this.
///
/// Under the first time protocol this is the median time past of `prev`,
/// under the second the time of `prev`. The first block of the second
/// protocol may be earlier than `prev` by the difference of the two drifts.
pub fn min_past_block_time(
    params: &ChainParams,
    chain: &dyn ChainView,
    prev: &BlockIndexRef,
) -> Result<i64, ChainBackendErr> {
    let height = prev.height + 1;

    if !params.is_time_protocol_v2(height) {
        return median_time_past(chain, prev);
    }

    if height == params.block_time_protocol_v2 {
        return Ok(prev.time - params.future_block_time_drift(prev.height)
            + params.future_block_time_drift(height));
    }

    Ok(prev.time)
}

/// Contextual timestamp checks for a block on top of `prev`.
pub fn check_block_time(
    params: &ChainParams,
    chain: &dyn ChainView,
    time: i64,
    prev: &BlockIndexRef,
    adjusted_time: i64,
) -> Result<(), BlockTimeErr> {
    let height = prev.height + 1;
    let max = max_future_block_time(params, prev, adjusted_time);

    if time > max {
        debug!("block {} timestamp {} too far in the future", height, time);
        return Err(BlockTimeErr::TooNew { time, max });
    }

    let min = min_past_block_time(params, chain, prev)?;

    if time <= min {
        debug!("block {} timestamp {} too old", height, time);
        return Err(BlockTimeErr::TooOld { time, min });
    }

    if !params.is_valid_block_timestamp(time, height) {
        debug!("block {} timestamp {} is not slot aligned", height, time);
        return Err(BlockTimeErr::InvalidSlot(time));
    }

    Ok(())
}
