// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use anyhow::{anyhow, ensure};
use btcu::chain::*;
use btcu::consensus::*;
use btcu::global::*;
use btcu::settings::Settings;
use btcu::stake::{GenesisStake, Stake};
use log::*;
use mimalloc::MiMalloc;
use tracing_subscriber::prelude::*;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let settings = Settings::new()?;
    let network = settings.chain_network()?;
    let params = match select_params(network) {
        Ok(params) => params,
        Err(err) => {
            error!("Could not select network {}: {}", network, err);
            return Err(err.into());
        }
    };

    info!(
        "Running BTCU Core v{} on {}",
        env!("CARGO_PKG_VERSION"),
        params.network_id()
    );

    perform_sanity_checks(&params, &settings)?;

    let chain = MemoryChain::with_genesis(params.genesis())
        .map_err(|err| anyhow!("could not connect genesis: {err:?}"))?;
    let validators = ValidatorsState::new(settings.staking.max_validators as usize);
    let tip = chain
        .tip()
        .map_err(|err| anyhow!("{err:?}"))?
        .ok_or_else(|| anyhow!("empty chain"))?;
    let next = tip.height + 1;
    let now = chrono::Utc::now().timestamp();

    info!("Genesis block {}", params.genesis_hash());
    info!(
        "Next block {}: {} protocol, drift {}s, earliest slot {}",
        next,
        if params.is_time_protocol_v2(next) {
            "v2 time"
        } else {
            "v1 time"
        },
        params.future_block_time_drift(next),
        params.time_slot_start(now) + params.time_slot_length()
    );
    info!(
        "Stake rule at height {}: {}",
        next,
        if params.is_stake_modifier_v2(next) {
            format!("min depth {}", params.stake_min_depth)
        } else {
            format!("min age {}s", params.stake_min_age)
        }
    );
    info!(
        "Validator window at height {}: {}, up to {} validators",
        next,
        if is_registration_window(next) {
            "registration"
        } else {
            "voting"
        },
        validators.max_validators()
    );

    if settings.staking.staking_enabled {
        info!(
            "Staking enabled, splitting stakes above {} coins",
            settings.staking.stake_split_threshold
        );
    }

    Ok(())
}

/// Initializes a tracing subscriber configured from `RUST_LOG`.
fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}

fn perform_sanity_checks(params: &ChainParams, settings: &Settings) -> anyhow::Result<()> {
    // Validate settings
    settings.validate()?;

    // Drift must stay inside a slot once slots are enforced
    let v2 = params.block_time_protocol_v2;
    ensure!(
        params.future_block_time_drift(v2) < params.time_slot_length(),
        "time protocol v2 drift exceeds the slot length"
    );

    // Genesis validators must be registered
    ensure!(
        !params.genesis().vtx[0].validator_register.is_empty(),
        "genesis block registers no validators"
    );

    // Genesis allocations must be able to stake right away
    let chain = MemoryChain::with_genesis(params.genesis())
        .map_err(|err| anyhow!("could not connect genesis: {err:?}"))?;
    let stake: Stake = GenesisStake::new(params, 0).into();
    check_stake(params, &chain, &stake, 1, params.genesis().header.block_time())
        .map_err(|err| anyhow!("genesis stake is not eligible: {err:?}"))?;

    // Add here more sanity checks

    Ok(())
}
