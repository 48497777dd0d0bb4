// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! Process wide network selection used by the binary. Library code takes
//! `&ChainParams` explicitly.

use crate::chain::{ChainParams, GenesisErr, Network};
use lazy_static::*;
use log::*;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use triomphe::Arc;

lazy_static! {
    /// Parameters of the selected network
    static ref SELECTED_PARAMS: RwLock<Option<Arc<ChainParams>>> = RwLock::new(None);
}

#[derive(Debug)]
pub enum ParamsErr {
    /// No network has been selected yet
    NotSelected,

    /// A network was already selected
    AlreadySelected(Network),

    /// Genesis block of the network failed its checks
    Genesis(GenesisErr),
}

impl From<GenesisErr> for ParamsErr {
    fn from(other: GenesisErr) -> Self {
        Self::Genesis(other)
    }
}

impl std::fmt::Display for ParamsErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSelected => write!(f, "no network selected"),
            Self::AlreadySelected(network) => write!(f, "network {network} already selected"),
            Self::Genesis(err) => write!(f, "invalid genesis block: {err:?}"),
        }
    }
}

impl std::error::Error for ParamsErr {}

/// Builds and installs the parameters of `network`. Can only succeed once.
pub fn select_params(network: Network) -> Result<Arc<ChainParams>, ParamsErr> {
    let selected = SELECTED_PARAMS.upgradable_read();

    if let Some(params) = selected.as_ref() {
        return Err(ParamsErr::AlreadySelected(params.network));
    }

    let params = Arc::new(ChainParams::new(network)?);
    let mut selected = RwLockUpgradableReadGuard::upgrade(selected);
    *selected = Some(params.clone());
    info!(
        "selected network {} with genesis {}",
        network,
        params.genesis_hash()
    );

    Ok(params)
}

/// Parameters of the selected network.
pub fn params() -> Result<Arc<ChainParams>, ParamsErr> {
    SELECTED_PARAMS.read().clone().ok_or(ParamsErr::NotSelected)
}

#[must_use]
pub fn is_selected() -> bool {
    SELECTED_PARAMS.read().is_some()
}

#[cfg(test)]
pub(crate) fn reset() {
    *SELECTED_PARAMS.write() = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn it_fails_before_selection() {
        reset();
        assert!(!is_selected());
        assert!(matches!(params(), Err(ParamsErr::NotSelected)));
    }

    #[test]
    #[serial]
    fn it_selects_once() {
        reset();
        let selected = select_params(Network::Regtest).unwrap();
        assert_eq!(selected.network, Network::Regtest);
        assert_eq!(params().unwrap().genesis_hash(), selected.genesis_hash());

        assert!(matches!(
            select_params(Network::Main),
            Err(ParamsErr::AlreadySelected(Network::Regtest))
        ));
        assert_eq!(params().unwrap().network, Network::Regtest);
        reset();
    }
}
