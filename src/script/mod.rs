// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

pub mod opcodes;
pub mod solver;

pub use solver::*;

use crate::primitives::{Hash160, PubKey};
use bincode::{Decode, Encode};
use opcodes::*;
use std::fmt;

/// Serialized script bytes.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Script(pub Vec<u8>);

impl Script {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push_opcode(&mut self, opcode: u8) -> &mut Self {
        self.0.push(opcode);
        self
    }

    /// Pushes data using the smallest push opcode that fits.
    pub fn push_slice(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len < OP_PUSHDATA1 as usize {
            self.0.push(len as u8);
        } else if len <= 0xff {
            self.0.push(OP_PUSHDATA1);
            self.0.push(len as u8);
        } else if len <= 0xffff {
            self.0.push(OP_PUSHDATA2);
            self.0.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.0.push(OP_PUSHDATA4);
            self.0.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.0.extend_from_slice(data);
        self
    }

    /// Pushes an integer, using the small integer opcodes where possible.
    pub fn push_int(&mut self, n: i64) -> &mut Self {
        if n == -1 || (1..=16).contains(&n) {
            self.0.push((n + (OP_1 as i64 - 1)) as u8);
        } else if n == 0 {
            self.0.push(OP_0);
        } else {
            self.push_slice(&serialize_script_num(n));
        }
        self
    }

    /// Pushes an integer as script number data, never as a small integer opcode.
    pub fn push_num(&mut self, n: i64) -> &mut Self {
        self.push_slice(&serialize_script_num(n))
    }

    #[must_use]
    pub fn new_p2pk(pubkey: &PubKey) -> Self {
        let mut script = Self::new();
        script.push_slice(pubkey.as_bytes()).push_opcode(OP_CHECKSIG);
        script
    }

    #[must_use]
    pub fn new_p2pkh(key_id: &Hash160) -> Self {
        let mut script = Self::new();
        script
            .push_opcode(OP_DUP)
            .push_opcode(OP_HASH160)
            .push_slice(key_id.as_bytes())
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_CHECKSIG);
        script
    }

    #[must_use]
    pub fn new_p2cs(staker: &Hash160, owner: &Hash160) -> Self {
        let mut script = Self::new();
        script
            .push_opcode(OP_DUP)
            .push_opcode(OP_HASH160)
            .push_opcode(OP_ROT)
            .push_opcode(OP_IF)
            .push_opcode(OP_CHECKCOLDSTAKEVERIFY)
            .push_slice(staker.as_bytes())
            .push_opcode(OP_ELSE)
            .push_slice(owner.as_bytes())
            .push_opcode(OP_ENDIF)
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_CHECKSIG);
        script
    }

    #[must_use]
    pub fn is_pay_to_script_hash(&self) -> bool {
        self.0.len() == 23 && self.0[0] == OP_HASH160 && self.0[1] == 0x14 && self.0[22] == OP_EQUAL
    }

    #[must_use]
    pub fn is_pay_to_cold_staking(&self) -> bool {
        self.0.len() == 51
            && self.0[2] == OP_ROT
            && self.0[4] == OP_CHECKCOLDSTAKEVERIFY
            && self.0[5] == 0x14
            && self.0[27] == 0x14
    }

    #[must_use]
    pub fn is_unspendable(&self) -> bool {
        self.0.first() == Some(&OP_RETURN)
    }

    /// Iterates over the script's instructions. Iteration stops at the first
    /// malformed push, which is reported as an `Err` item.
    #[must_use]
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            bytes: &self.0,
            pos: 0,
        }
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Script").field(&hex::encode(&self.0)).finish()
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Encode for Script {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> core::result::Result<(), bincode::error::EncodeError> {
        crate::codec::encode_bytes(&self.0, encoder)
    }
}

impl Decode for Script {
    fn decode<D: bincode::de::Decoder>(
        decoder: &mut D,
    ) -> core::result::Result<Self, bincode::error::DecodeError> {
        Ok(Self(crate::codec::decode_bytes(decoder)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction<'a> {
    Op(u8),
    Push(&'a [u8]),
}

pub struct Instructions<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction<'a>, &'static str>;

    fn next(&mut self) -> Option<Self::Item> {
        let opcode = *self.bytes.get(self.pos)?;
        self.pos += 1;

        let len = match opcode {
            n if n < OP_PUSHDATA1 => n as usize,
            OP_PUSHDATA1 => match self.read_len(1) {
                Ok(len) => len,
                Err(err) => return Some(Err(err)),
            },
            OP_PUSHDATA2 => match self.read_len(2) {
                Ok(len) => len,
                Err(err) => return Some(Err(err)),
            },
            OP_PUSHDATA4 => match self.read_len(4) {
                Ok(len) => len,
                Err(err) => return Some(Err(err)),
            },
            op => return Some(Ok(Instruction::Op(op))),
        };

        let end = self.pos + len;
        if end > self.bytes.len() {
            self.pos = self.bytes.len();
            return Some(Err("push past end of script"));
        }

        let data = &self.bytes[self.pos..end];
        self.pos = end;
        Some(Ok(Instruction::Push(data)))
    }
}

impl<'a> Instructions<'a> {
    fn read_len(&mut self, width: usize) -> Result<usize, &'static str> {
        let end = self.pos + width;
        if end > self.bytes.len() {
            self.pos = self.bytes.len();
            return Err("truncated push length");
        }

        let mut buf = [0; 4];
        buf[..width].copy_from_slice(&self.bytes[self.pos..end]);
        self.pos = end;
        Ok(u32::from_le_bytes(buf) as usize)
    }
}

/// Minimal little endian sign-magnitude encoding used for script numbers.
#[must_use]
pub fn serialize_script_num(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }

    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut out = Vec::with_capacity(9);

    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_serializes_script_nums() {
        assert_eq!(serialize_script_num(0), Vec::<u8>::new());
        assert_eq!(serialize_script_num(4), vec![0x04]);
        assert_eq!(serialize_script_num(-1), vec![0x81]);
        assert_eq!(serialize_script_num(0x80), vec![0x80, 0x00]);
        assert_eq!(serialize_script_num(486_604_799), vec![0xff, 0xff, 0x00, 0x1d]);
    }

    #[test]
    fn it_pushes_small_ints_as_opcodes() {
        let mut script = Script::new();
        script.push_int(0).push_int(1).push_int(16).push_int(-1).push_int(17);
        assert_eq!(script.0, vec![OP_0, OP_1, OP_16, OP_1NEGATE, 0x01, 0x11]);

        let mut script = Script::new();
        script.push_num(4);
        assert_eq!(script.0, vec![0x01, 0x04]);
    }

    #[test]
    fn it_uses_pushdata_for_long_slices() {
        let mut script = Script::new();
        script.push_slice(&[0xaa; 80]);
        assert_eq!(&script.0[..2], &[OP_PUSHDATA1, 80]);
        assert_eq!(script.len(), 82);
    }

    #[test]
    fn it_iterates_instructions() {
        let key_id = Hash160([7; 20]);
        let script = Script::new_p2pkh(&key_id);
        let ins: Vec<_> = script.instructions().collect::<Result<_, _>>().unwrap();
        assert_eq!(
            ins,
            vec![
                Instruction::Op(OP_DUP),
                Instruction::Op(OP_HASH160),
                Instruction::Push(&[7; 20]),
                Instruction::Op(OP_EQUALVERIFY),
                Instruction::Op(OP_CHECKSIG),
            ]
        );

        let truncated = Script(vec![0x05, 0x01]);
        assert!(truncated.instructions().any(|i| i.is_err()));
    }

    #[test]
    fn it_builds_cold_staking_scripts() {
        let script = Script::new_p2cs(&Hash160([1; 20]), &Hash160([2; 20]));
        assert!(script.is_pay_to_cold_staking());
        assert!(!script.is_pay_to_script_hash());
    }
}
