// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! Inputs that can be used to mint a proof of stake block.
//!
//! A stake is one of three kinds:
//! * a regular transaction output
//! * a legacy zerocoin spend, kept for validating historical blocks
//! * an allocation of the genesis block
//!
//! Only regular outputs can build coinstake inputs and outputs. The other
//! kinds report [`UnsupportedOperation`] for those calls.

mod cache;
mod genesis;
mod seen;
mod utxo;
mod zerocoin;

pub use cache::*;
pub use genesis::*;
pub use seen::*;
pub use utxo::*;
pub use zerocoin::*;

use crate::chain::{BlockIndexRef, ChainBackendErr, ChainParams, ChainView};
use crate::consensus::Money;
use crate::primitives::{KeyId, Transaction, TxIn, TxOut};
use crate::script::TxOutType;
use crate::wallet::KeyStore;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Operations a stake kind supports.
    pub struct StakeCapabilities: u8 {
        const VALUE = 0b0001;
        const TX_FROM = 0b0010;
        const CREATE_TX_IN = 0b0100;
        const CREATE_TX_OUTS = 0b1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StakeKind {
    Utxo,
    LegacyZerocoin,
    Genesis,
}

impl StakeKind {
    #[must_use]
    pub fn capabilities(self) -> StakeCapabilities {
        match self {
            Self::Utxo => StakeCapabilities::all(),
            Self::LegacyZerocoin => StakeCapabilities::VALUE,
            Self::Genesis => StakeCapabilities::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StakeOp {
    Value,
    TxFrom,
    CreateTxIn,
    CreateTxOuts,
}

impl StakeOp {
    fn capability(self) -> StakeCapabilities {
        match self {
            Self::Value => StakeCapabilities::VALUE,
            Self::TxFrom => StakeCapabilities::TX_FROM,
            Self::CreateTxIn => StakeCapabilities::CREATE_TX_IN,
            Self::CreateTxOuts => StakeCapabilities::CREATE_TX_OUTS,
        }
    }
}

/// An operation was called on a stake kind that does not support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedOperation {
    pub kind: StakeKind,
    pub op: StakeOp,
}

impl fmt::Display for UnsupportedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not supported by {:?} stakes", self.op, self.kind)
    }
}

#[derive(Debug)]
pub enum StakeErr {
    /// Operation not available for this stake kind
    Unsupported(UnsupportedOperation),

    /// Kernel script is not P2PK, P2PKH or P2CS
    UnsupportedScript(TxOutType),

    /// The key store does not hold the staking key
    MissingStakingKey(KeyId),

    /// Position is past the outputs of the source transaction
    InvalidOutputIndex,

    /// Zerocoin denomination is not one of the known denominations
    InvalidDenomination,

    /// The block containing the stake is not in the active chain
    IndexFromNotFound,

    /// The stake is not old or deep enough
    MinAgeOrDepth,

    /// Zerocoin stake is not deep enough
    ZerocoinDepth,

    /// Zerocoin spend is not marked as a stake
    WrongSpendType,

    /// Chain backend failure
    Backend(ChainBackendErr),
}

impl From<UnsupportedOperation> for StakeErr {
    fn from(other: UnsupportedOperation) -> Self {
        Self::Unsupported(other)
    }
}

impl From<ChainBackendErr> for StakeErr {
    fn from(other: ChainBackendErr) -> Self {
        Self::Backend(other)
    }
}

/// Surface shared by all stake kinds.
pub trait StakeInput {
    fn kind(&self) -> StakeKind;

    /// Value in satoshis
    fn value(&self) -> Result<Money, StakeErr>;

    /// Bytes identifying the staked coin, used to detect double stakes
    fn uniqueness(&self) -> Vec<u8>;

    /// Block containing the staked coin. Cached once resolved.
    fn index_from(
        &self,
        params: &ChainParams,
        chain: &dyn ChainView,
    ) -> Result<Option<BlockIndexRef>, StakeErr>;

    /// Transaction the staked coin originates from
    fn tx_from(&self) -> Result<&Transaction, StakeErr>;

    fn is_zerocoin(&self) -> bool {
        false
    }

    fn capabilities(&self) -> StakeCapabilities {
        self.kind().capabilities()
    }

    fn unsupported(&self, op: StakeOp) -> StakeErr {
        StakeErr::Unsupported(UnsupportedOperation {
            kind: self.kind(),
            op,
        })
    }
}

/// Stakes that can be spent by a coinstake built by this node.
pub trait SpendableStake: StakeInput {
    /// Input spending the staked coin
    fn create_tx_in(&self) -> TxIn;

    /// Coinstake outputs paying back to the kernel script. Values are left
    /// at zero.
    fn create_tx_outs(
        &self,
        keystore: &dyn KeyStore,
        split_threshold: Money,
        total: Money,
    ) -> Result<Vec<TxOut>, StakeErr>;
}

#[derive(Debug, Clone)]
pub enum Stake {
    Utxo(UtxoStake),
    LegacyZerocoin(LegacyZerocoinStake),
    Genesis(GenesisStake),
}

impl Stake {
    fn input(&self) -> &dyn StakeInput {
        match self {
            Self::Utxo(s) => s,
            Self::LegacyZerocoin(s) => s,
            Self::Genesis(s) => s,
        }
    }

    fn require(&self, op: StakeOp) -> Result<(), StakeErr> {
        if self.capabilities().contains(op.capability()) {
            Ok(())
        } else {
            Err(self.unsupported(op))
        }
    }

    pub fn create_tx_in(&self) -> Result<TxIn, StakeErr> {
        self.require(StakeOp::CreateTxIn)?;

        match self {
            Self::Utxo(s) => Ok(s.create_tx_in()),
            _ => Err(self.unsupported(StakeOp::CreateTxIn)),
        }
    }

    pub fn create_tx_outs(
        &self,
        keystore: &dyn KeyStore,
        split_threshold: Money,
        total: Money,
    ) -> Result<Vec<TxOut>, StakeErr> {
        self.require(StakeOp::CreateTxOuts)?;

        match self {
            Self::Utxo(s) => s.create_tx_outs(keystore, split_threshold, total),
            _ => Err(self.unsupported(StakeOp::CreateTxOuts)),
        }
    }
}

impl StakeInput for Stake {
    fn kind(&self) -> StakeKind {
        self.input().kind()
    }

    fn value(&self) -> Result<Money, StakeErr> {
        self.require(StakeOp::Value)?;
        self.input().value()
    }

    fn uniqueness(&self) -> Vec<u8> {
        self.input().uniqueness()
    }

    fn index_from(
        &self,
        params: &ChainParams,
        chain: &dyn ChainView,
    ) -> Result<Option<BlockIndexRef>, StakeErr> {
        self.input().index_from(params, chain)
    }

    fn tx_from(&self) -> Result<&Transaction, StakeErr> {
        self.require(StakeOp::TxFrom)?;
        self.input().tx_from()
    }

    fn is_zerocoin(&self) -> bool {
        self.input().is_zerocoin()
    }
}

impl From<UtxoStake> for Stake {
    fn from(other: UtxoStake) -> Self {
        Self::Utxo(other)
    }
}

impl From<LegacyZerocoinStake> for Stake {
    fn from(other: LegacyZerocoinStake) -> Self {
        Self::LegacyZerocoin(other)
    }
}

impl From<GenesisStake> for Stake {
    fn from(other: GenesisStake) -> Self {
        Self::Genesis(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_kinds_to_capabilities() {
        assert_eq!(StakeKind::Utxo.capabilities(), StakeCapabilities::all());
        assert!(StakeKind::LegacyZerocoin
            .capabilities()
            .contains(StakeCapabilities::VALUE));
        assert!(!StakeKind::LegacyZerocoin
            .capabilities()
            .contains(StakeCapabilities::CREATE_TX_IN));
        assert!(StakeKind::Genesis.capabilities().is_empty());
    }

    #[test]
    fn it_formats_unsupported_operations() {
        let err = UnsupportedOperation {
            kind: StakeKind::Genesis,
            op: StakeOp::Value,
        };
        assert_eq!(err.to_string(), "Value is not supported by Genesis stakes");
    }
}
