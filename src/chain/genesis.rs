// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! Genesis block construction.
//!
//! All networks share the coinbase and header template and differ in the
//! nonce and the set of validators registered at genesis.

use crate::chain::Network;
use crate::consensus::COIN;
use crate::primitives::{
    Block, BlockHeader, Hash256, OutPoint, PubKey, Transaction, TxIn, TxOut, ValidatorRegister,
    BLOCK_VERSION_VALIDATORS, TX_VERSION_VALIDATORS,
};
use crate::script::Script;
use log::*;

const GENESIS_TIMESTAMP: &str =
    "BBC News March 06 2020 Brexit preparations cost UK more than £4bn";
const GENESIS_OUTPUT_PUBKEY: &str = "04c10e83b2703ccf322f7dbd62dd5855ac7c10bd055814ce121ba32607d573b8810c02c0582aed05b4deb9c4b77b26d92428c61256cd42774babea0a073b2ed0c9";
const GENESIS_TIME: u32 = 1_583_491_266;
const GENESIS_BITS: u32 = 0x1e0f_fff0;
const GENESIS_CHAINSTATE: &str =
    "0x12ecf5df211cbae201ceafcfc46392b39539409b0e6a89a3f7498af0e6ebd320";
const GENESIS_STATE_ROOT: &str =
    "e965ffd002cd6ad0e2dc402b8044de833e06b23127ea8c3d80aec91410771495";

/// RLP encoding of the empty string
const RLP_EMPTY: [u8; 1] = [0x80];

const MAIN_VALIDATORS: &[&str] = &[
    "035a3bd03cc490f708b7f2b6f59e8bdfd6710e3062fe3f463010209d5a88051949",
    "035f34d50ab22176a1cf77fddd6fd8899580a2b3ea494a46af9561f1ad50f8e292",
    "02f62678b04d51346456e8729d06de164e2ea51942d36032f8aab109abeb232b02",
    "0216d358a5884b30dfafced60db969704d684d8d9f2fac11bafb1c232878f8aceb",
    "032eb0a80fcf000ba5cb0bac4c4ebf20db392e413c647171293b1972f165122887",
    "02d85311e86ec25d2e14609a3dd68eb8efd2447c421e54d284ba09c7598639f892",
    "031240ccf07831d70e4e473b861e6811843cfd709a2b417ab2a25df876b25e226f",
    "020cb70524c81d14d669160cb4014317c4e897ba1458e6db1387f60980db990098",
    "02a61b8dfde0cfa01196e8793382d417f8f772e2e6c2baf456432212dce63defe2",
    "033a799fd8496643269b9fa259e8b9edff36754945db5173262469a6f89563ab80",
];

const TEST_VALIDATORS: &[&str] = &[
    "020077312c8d4f517cf7ad93f2ad2e79c89c3b49a96a43d792d5b64156decb2f73",
    "03fad77a35592c335b077351570e26540e90935f39b54c98df9bdb135a43f24b57",
    "037eae6f15d3494148b521fa19a66c55e959d176465ee0f5543f380d1f15bc6247",
];

const REGTEST_VALIDATORS: &[&str] =
    &["0268cd814b0b32555741fdb586110e48f9ce100e5805296907d89a179358be6d47"];

/// Pinned genesis values: `(nonce, block hash, merkle root)`
fn pins(network: Network) -> (u32, &'static str, &'static str) {
    match network {
        Network::Main => (
            4_860_171,
            "000004ea22f3e20f9ee1b90d2a684fbad997fa19d852ab74c39634b74f49f91f",
            "858d38eb69842a10816427748c0cd8f60211113a5f62f669891aae88b0c85884",
        ),
        Network::Test => (
            3_293_335,
            "000008ad321726fc2c3780ef0f4f25c5bcd569a106d6f27a49e1148dd7bdbbb1",
            "2448ef7f9f8b082f386a37c3ef0c3df28a769f343e74350651557ff134e4cd76",
        ),
        Network::Regtest => (
            2_507_949,
            "00000e1654727693d67050f2ef94fdf32f00126fedf76af89b5a89739c21a34b",
            "b9be21a01c32bf8e047072b223584f9c42946e128d8c69f75b2512df319c95f0",
        ),
    }
}

/// Public keys of the validators registered in the genesis block.
#[must_use]
pub fn genesis_validator_pubkeys(network: Network) -> &'static [&'static str] {
    match network {
        Network::Main => MAIN_VALIDATORS,
        Network::Test => TEST_VALIDATORS,
        Network::Regtest => REGTEST_VALIDATORS,
    }
}

fn genesis_coinbase(network: Network) -> Result<Transaction, GenesisErr> {
    let mut script_sig = Script::new();
    script_sig
        .push_num(486_604_799)
        .push_num(4)
        .push_slice(GENESIS_TIMESTAMP.as_bytes());

    let output_key = PubKey::from_hex(GENESIS_OUTPUT_PUBKEY).map_err(GenesisErr::InvalidData)?;
    let mut validator_register = vec![];

    for (i, hex) in genesis_validator_pubkeys(network).iter().enumerate() {
        let pubkey = PubKey::from_hex(hex).map_err(GenesisErr::InvalidData)?;
        let vin = TxIn::new(OutPoint::new(Hash256::zero(), i as u32));
        validator_register.push(ValidatorRegister::new(vin, pubkey, 0));
    }

    Ok(Transaction {
        version: TX_VERSION_VALIDATORS,
        vin: vec![TxIn::with_script(OutPoint::null(), script_sig)],
        vout: vec![TxOut::new(250 * COIN, Script::new_p2pk(&output_key))],
        lock_time: 0,
        validator_register,
        validator_vote: vec![],
    })
}

/// Builds the genesis block of the network without checking the pins.
pub fn build_genesis(network: Network) -> Result<Block, GenesisErr> {
    let (nonce, _, _) = pins(network);
    let coinbase = genesis_coinbase(network)?;

    let mut block = Block {
        header: BlockHeader {
            version: BLOCK_VERSION_VALIDATORS,
            prev_hash: Hash256::zero(),
            merkle_root: Hash256::zero(),
            time: GENESIS_TIME,
            bits: GENESIS_BITS,
            nonce,
            accumulator_checkpoint: Hash256::zero(),
            chainstate_hash: Hash256::from_hex(GENESIS_CHAINSTATE)
                .map_err(GenesisErr::InvalidData)?,
            state_root: Hash256::from_raw_hex(GENESIS_STATE_ROOT)
                .map_err(GenesisErr::InvalidData)?,
            utxo_root: Hash256::keccak_from_slice(RLP_EMPTY),
        },
        vtx: vec![coinbase],
        ..Default::default()
    };

    block.header.merkle_root = block.compute_merkle_root().0;
    Ok(block)
}

/// Builds the genesis block and checks its hash and merkle root against the
/// pinned values.
pub fn create_genesis(network: Network) -> Result<Block, GenesisErr> {
    let (_, hash, merkle_root) = pins(network);
    let expected_hash = Hash256::from_hex(hash).map_err(GenesisErr::InvalidData)?;
    let expected_root = Hash256::from_hex(merkle_root).map_err(GenesisErr::InvalidData)?;
    let block = build_genesis(network)?;

    if block.header.merkle_root != expected_root {
        error!(
            "{} genesis merkle root mismatch: expected {}, got {}",
            network, expected_root, block.header.merkle_root
        );
        return Err(GenesisErr::MerkleRootMismatch {
            expected: expected_root,
            computed: block.header.merkle_root,
        });
    }

    let computed = block.hash();
    if computed != expected_hash {
        error!(
            "{} genesis hash mismatch: expected {}, got {}",
            network, expected_hash, computed
        );
        return Err(GenesisErr::HashMismatch {
            expected: expected_hash,
            computed,
        });
    }

    debug!("{} genesis block {}", network, computed);
    Ok(block)
}

/// Genesis construction failure. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenesisErr {
    /// Computed block hash differs from the pinned hash
    HashMismatch { expected: Hash256, computed: Hash256 },

    /// Computed merkle root differs from the pinned root
    MerkleRootMismatch { expected: Hash256, computed: Hash256 },

    /// Embedded constant failed to parse
    InvalidData(&'static str),
}
