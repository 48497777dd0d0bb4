// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use static_assertions::*;

/// Money type
pub type Money = i64;

/// Satoshis per coin
pub const COIN: Money = 100_000_000;

/// A hundredth of a coin
pub const CENT: Money = 1_000_000;

/// No amount larger than this is valid
pub const MAX_MONEY: Money = 21_000_000 * COIN;

/// Largest standard transaction in bytes. Bounds the number of stake split outputs.
pub const MAX_STANDARD_TX_SIZE: usize = 100_000;

/// Upper bound of coinstake outputs produced by a split
pub const MAX_STAKE_SPLIT_OUTPUTS: usize = MAX_STANDARD_TX_SIZE >> 11;

/// Number of blocks used for the median time past
pub const MEDIAN_TIME_SPAN: usize = 11;

/// Blocks per validator election period
pub const VALIDATORS_PERIOD: i32 = 20;

/// Last position of the registration window inside a period
pub const VALIDATORS_REGISTER_END: i32 = 9;

/// First position of the voting window inside a period
pub const VALIDATORS_VOTING_START: i32 = 10;

/// Position at which the validator list is recomputed
pub const VALIDATORS_UPDATE_POSITION: i32 = VALIDATORS_PERIOD - 1;

/// Default size of the active validator list
pub const MAX_VALIDATORS_DEFAULT: usize = 10;

/// Money check
#[must_use]
pub fn money_range(amount: Money) -> bool {
    (0..=MAX_MONEY).contains(&amount)
}

const_assert!(COIN > 0);
const_assert!(MAX_MONEY > 0);
const_assert_eq!(MAX_STAKE_SPLIT_OUTPUTS, 48);
const_assert!(VALIDATORS_REGISTER_END < VALIDATORS_VOTING_START);
const_assert!(VALIDATORS_VOTING_START < VALIDATORS_PERIOD);
const_assert_eq!(VALIDATORS_REGISTER_END + 1, VALIDATORS_VOTING_START);
const_assert!(MAX_VALIDATORS_DEFAULT > 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_money_checks() {
        assert!(!money_range(-1));
        assert!(money_range(0));
        assert!(money_range(1));
        assert!(money_range(MAX_MONEY));
        assert!(!money_range(MAX_MONEY + 1));
    }
}
