// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use crate::chain::{create_genesis, GenesisErr};
use crate::consensus::{Money, CENT, COIN};
use crate::primitives::{Block, Hash256};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Main,
    Test,
    Regtest,
}

impl Network {
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
            Self::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Network {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" | "mainnet" => Ok(Self::Main),
            "test" | "testnet" => Ok(Self::Test),
            "regtest" => Ok(Self::Regtest),
            _ => Err("unknown network"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base58Prefixes {
    pub pubkey_address: u8,
    pub script_address: u8,
    pub secret_key: u8,
    pub staking_address: u8,
}

/// Legacy zerocoin parameters. Only the values consulted by stake
/// validation carry consensus weight here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZerocoinParams {
    pub max_spends_per_tx: i32,
    pub max_public_spends_per_tx: i32,
    pub min_mint_fee: Money,
    pub mint_required_confirmations: i32,
    pub required_accumulation: i32,
    pub default_security_level: i32,
    pub header_version: i32,
    pub required_stake_depth: i32,
    pub invalid_amount_filtered: Money,
    pub supply_before_fake_serial: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeasingParams {
    /// Blocks before a leasing reward can be spent
    pub reward_maturity: i32,

    /// Blocks between leasing reward payouts
    pub reward_period: i32,
    pub max_rewards: i32,
}

/// Consensus parameters of a network. Immutable once built.
///
/// Every activation gate is "at and after": a feature activated at height `h`
/// is active for `h` and every later height.
#[derive(Debug, Clone)]
pub struct ChainParams {
    pub network: Network,
    pub message_start: [u8; 4],
    pub default_port: u16,
    pub base58_prefixes: Base58Prefixes,
    pub bech32_hrp: &'static str,

    pub subsidy_halving_interval: i32,
    pub max_reorganization_depth: i32,
    pub enforce_block_upgrade_majority: i32,
    pub reject_block_outdated_majority: i32,
    pub to_check_block_upgrade_majority: i32,
    pub target_spacing: i64,
    pub target_timespan: i64,
    pub target_timespan_v2: i64,
    pub time_slot_length: i64,
    pub coinbase_maturity: i32,
    pub stake_min_age: i64,
    pub stake_min_depth: i32,
    pub future_time_drift_pow: i64,
    pub future_time_drift_pos: i64,
    pub masternode_count_drift: i32,
    pub min_cold_staking_amount: Money,
    pub min_leasing_amount: Money,

    pub last_pow_block: i32,
    pub modifier_update_block: i32,
    pub zerocoin_start_height: i32,
    pub zerocoin_start_time: i64,
    pub block_enforce_serial_range: i32,
    pub block_recalculate_accumulators: i32,
    pub block_first_fraudulent: i32,
    pub block_last_good_checkpoint: i32,
    pub block_enforce_invalid_utxo: i32,
    pub block_zerocoin_v2: i32,
    pub block_double_accumulated: i32,
    pub enforce_new_spork_key: i64,
    pub reject_old_spork_key: i64,
    pub block_stake_modifier_v2: i32,
    pub bip65_activation_height: i32,
    pub block_time_protocol_v2: i32,
    pub public_zc_spends: i32,
    pub block_enforce_new_message_signatures: i32,
    pub block_last_accumulator_checkpoint: i32,
    pub block_v7_start_height: i32,
    pub fake_serial_blockheight_end: i32,

    pub zerocoin: ZerocoinParams,
    pub leasing: LeasingParams,

    genesis: Block,
    genesis_hash: Hash256,
}

impl ChainParams {
    /// Builds the parameters of `network`, failing if the genesis block does
    /// not match its pinned hash.
    pub fn new(network: Network) -> Result<Self, GenesisErr> {
        let genesis = create_genesis(network)?;
        let genesis_hash = genesis.hash();

        let main = Self {
            network: Network::Main,
            message_start: [0x25, 0x7a, 0xf3, 0x11],
            default_port: 3666,
            base58_prefixes: Base58Prefixes {
                pubkey_address: 0,
                script_address: 5,
                secret_key: 128,
                staking_address: 66,
            },
            bech32_hrp: "bc",

            subsidy_halving_interval: 210_000,
            max_reorganization_depth: 100,
            enforce_block_upgrade_majority: 8100,
            reject_block_outdated_majority: 10_260,
            to_check_block_upgrade_majority: 10_800,
            target_spacing: 60,
            target_timespan: 40 * 60,
            target_timespan_v2: 2 * 15 * 60,
            time_slot_length: 15,
            coinbase_maturity: 9,
            stake_min_age: 60 * 60,
            stake_min_depth: 9,
            future_time_drift_pow: 7200,
            future_time_drift_pos: 180,
            masternode_count_drift: 20,
            min_cold_staking_amount: COIN,
            min_leasing_amount: COIN,

            last_pow_block: 0,
            modifier_update_block: 0,
            zerocoin_start_height: 1,
            zerocoin_start_time: 1_583_491_266 - 1,
            block_enforce_serial_range: 0,
            block_recalculate_accumulators: 1,
            block_first_fraudulent: 0,
            block_last_good_checkpoint: 0,
            block_enforce_invalid_utxo: 0,
            block_zerocoin_v2: 0,
            block_double_accumulated: 0,
            enforce_new_spork_key: 1_583_491_266,
            reject_old_spork_key: 1_583_491_266 - 1,
            block_stake_modifier_v2: 1,
            bip65_activation_height: 0,
            block_time_protocol_v2: 1,
            public_zc_spends: 0,
            block_enforce_new_message_signatures: 1,
            block_last_accumulator_checkpoint: 0,
            block_v7_start_height: 1,
            fake_serial_blockheight_end: 0,

            zerocoin: ZerocoinParams {
                max_spends_per_tx: 7,
                max_public_spends_per_tx: 637,
                min_mint_fee: CENT,
                mint_required_confirmations: 1,
                required_accumulation: 1,
                default_security_level: 100,
                header_version: 4,
                required_stake_depth: 999_999_999,
                invalid_amount_filtered: 268_200 * COIN,
                supply_before_fake_serial: 0,
            },
            leasing: LeasingParams {
                reward_maturity: 30,
                reward_period: 7 * 24 * 60,
                max_rewards: 100,
            },

            genesis,
            genesis_hash,
        };

        if network == Network::Main {
            return Ok(main);
        }

        let test = Self {
            network: Network::Test,
            message_start: [0x45, 0x76, 0x65, 0xba],
            default_port: 13666,
            base58_prefixes: Base58Prefixes {
                pubkey_address: 111,
                script_address: 196,
                secret_key: 239,
                staking_address: 53,
            },
            bech32_hrp: "tb",

            enforce_block_upgrade_majority: 4320,
            reject_block_outdated_majority: 5472,
            to_check_block_upgrade_majority: 5760,
            coinbase_maturity: 5,
            stake_min_depth: 20,
            masternode_count_drift: 4,

            modifier_update_block: 51_197,
            zerocoin_start_time: 1_501_776_000,
            block_enforce_serial_range: 1,
            block_first_fraudulent: 9_891_737,
            block_last_good_checkpoint: 9_891_730,
            block_enforce_invalid_utxo: 9_902_850,
            block_zerocoin_v2: 444_020,
            enforce_new_spork_key: 1_566_860_400,
            reject_old_spork_key: 1_569_538_800,
            bip65_activation_height: 851_019,
            block_time_protocol_v2: 1_347_000,
            block_enforce_new_message_signatures: 1_347_000,
            block_last_accumulator_checkpoint: -10,
            block_v7_start_height: 1_347_000,
            fake_serial_blockheight_end: -1,

            zerocoin: ZerocoinParams {
                invalid_amount_filtered: 0,
                ..main.zerocoin
            },
            leasing: LeasingParams {
                reward_maturity: 3,
                reward_period: 10,
                max_rewards: 10,
            },
            ..main
        };

        if network == Network::Test {
            return Ok(test);
        }

        Ok(Self {
            network: Network::Regtest,
            message_start: [0xa1, 0xcf, 0x7e, 0xac],
            default_port: 23666,
            bech32_hrp: "bcrt",

            subsidy_halving_interval: 150,
            enforce_block_upgrade_majority: 750,
            reject_block_outdated_majority: 950,
            to_check_block_upgrade_majority: 1000,
            coinbase_maturity: 10,
            stake_min_age: 0,
            stake_min_depth: 10,

            last_pow_block: 250,
            modifier_update_block: 0,
            block_first_fraudulent: 999_999_999,
            block_last_good_checkpoint: 999_999_999,
            block_zerocoin_v2: 300,
            block_stake_modifier_v2: 251,
            block_time_protocol_v2: 999_999_999,
            public_zc_spends: 400,
            block_enforce_new_message_signatures: 1,
            block_last_accumulator_checkpoint: 301,
            block_v7_start_height: 300,

            zerocoin: ZerocoinParams {
                mint_required_confirmations: 1,
                required_stake_depth: 1,
                ..test.zerocoin
            },
            ..test
        })
    }

    #[must_use]
    pub fn network_id(&self) -> &'static str {
        self.network.id()
    }

    #[must_use]
    pub fn genesis(&self) -> &Block {
        &self.genesis
    }

    #[must_use]
    pub fn genesis_hash(&self) -> Hash256 {
        self.genesis_hash
    }

    #[must_use]
    pub fn is_stake_modifier_v2(&self, height: i32) -> bool {
        height >= self.block_stake_modifier_v2
    }

    #[must_use]
    pub fn is_time_protocol_v2(&self, height: i32) -> bool {
        height >= self.block_time_protocol_v2
    }

    #[must_use]
    pub fn is_message_sig_v2(&self, height: i32) -> bool {
        height >= self.block_enforce_new_message_signatures
    }

    #[must_use]
    pub fn is_block_v7(&self, height: i32) -> bool {
        height >= self.block_v7_start_height
    }

    #[must_use]
    pub fn is_zerocoin_active(&self, height: i32) -> bool {
        height >= self.zerocoin_start_height
    }

    #[must_use]
    pub fn is_zerocoin_v2(&self, height: i32) -> bool {
        height >= self.block_zerocoin_v2
    }

    #[must_use]
    pub fn is_public_zc_spends(&self, height: i32) -> bool {
        height >= self.public_zc_spends
    }

    #[must_use]
    pub fn is_bip65_active(&self, height: i32) -> bool {
        height >= self.bip65_activation_height
    }

    /// Blocks after the last proof of work block are proof of stake.
    #[must_use]
    pub fn is_pos_height(&self, height: i32) -> bool {
        height > self.last_pow_block
    }

    #[must_use]
    pub fn time_slot_length(&self) -> i64 {
        self.time_slot_length
    }

    #[must_use]
    pub fn target_timespan(&self, height: i32) -> i64 {
        if self.is_time_protocol_v2(height) {
            self.target_timespan_v2
        } else {
            self.target_timespan
        }
    }

    /// Start of the time slot containing `time`.
    #[must_use]
    pub fn time_slot_start(&self, time: i64) -> i64 {
        time - time.rem_euclid(self.time_slot_length)
    }

    /// Maximum number of seconds a block at `height` may be ahead of
    /// adjusted time.
    #[must_use]
    pub fn future_block_time_drift(&self, height: i32) -> i64 {
        if self.is_time_protocol_v2(height) {
            return self.time_slot_length - 1;
        }

        if self.is_pos_height(height) {
            self.future_time_drift_pos
        } else {
            self.future_time_drift_pow
        }
    }

    /// Under the second time protocol timestamps must fall on a slot boundary.
    #[must_use]
    pub fn is_valid_block_timestamp(&self, time: i64, height: i32) -> bool {
        if !self.is_time_protocol_v2(height) {
            return true;
        }

        time % self.time_slot_length == 0
    }

    /// Returns true if an output created at `(from_height, from_time)` is old
    /// or deep enough to stake at `(context_height, context_time)`.
    ///
    /// The rule in force is chosen by `context_height`. Outputs from the
    /// genesis block are always eligible.
    #[must_use]
    pub fn has_stake_min_age_or_depth(
        &self,
        context_height: i32,
        context_time: i64,
        from_height: i32,
        from_time: i64,
    ) -> bool {
        if from_height == 0 {
            return true;
        }

        if !self.is_stake_modifier_v2(context_height) {
            return from_time.saturating_add(self.stake_min_age) <= context_time;
        }

        context_height as i64 - from_height as i64 >= self.stake_min_depth as i64
    }
}
