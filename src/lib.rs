// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! # BTCU
//! Staking core of BTCU, a proof of stake cryptocurrency derived from PIVX and Bitcoin.
//!
//! ## Features
//! * **Stake inputs**: UTXO, legacy zerocoin and genesis stakes behind one
//!   [`stake::StakeInput`] interface. Operations a kind cannot perform fail with a
//!   typed [`stake::UnsupportedOperation`] instead of aborting.
//! * **Eligibility**: coin age before the stake modifier upgrade, coin depth after it,
//!   with outputs of the genesis block always eligible.
//! * **Time protocol**: future drift bounds and time slot alignment per network and
//!   height, plus the minimum past block time.
//! * **Validators**: registration and voting windows of the 20 block election period,
//!   vote tallying and validator countersignatures.
//! * **Chain parameters**: main, test and regtest tables with pinned genesis blocks.
//!
//! All consensus decisions are pure functions of the height, the time, the
//! [`chain::ChainParams`] and the stake. The chain and the wallet are consumed
//! through the [`chain::ChainView`] and [`wallet::KeyStore`] traits.

pub mod chain;
pub mod codec;
pub mod consensus;
pub mod global;
pub mod primitives;
pub mod script;
pub mod settings;
pub mod stake;
pub mod wallet;
