// Copyright (c) 2022 Octavian Oncescu
// Copyright (c) 2022-2023 The Purplecoin Core developers
// Copyright (c) 2026 The BTCU Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! Consensus serialization.
//!
//! Integers are written as fixed width little endian values and vectors are
//! prefixed with a Bitcoin style compact size, so the encoded bytes are the
//! ones that get hashed into transaction and block ids.

use bincode::de::read::Reader;
use bincode::enc::write::Writer;
use bincode::error::{DecodeError, EncodeError};
use bincode::{Decode, Encode};

pub const CODEC_BYTES_LIMIT: usize = 4_000_000;

/// Largest length accepted for a compact size prefixed vector.
pub const MAX_COMPACT_SIZE: u64 = 0x0200_0000;

pub fn encode_to_vec<T: bincode::Encode>(val: &T) -> Result<Vec<u8>, EncodeError> {
    let config = bincode::config::standard()
        .with_little_endian()
        .with_fixed_int_encoding();

    bincode::encode_to_vec(val, config)
}

pub fn encode<W: Writer, T: bincode::Encode>(writer: W, val: &T) -> Result<(), EncodeError> {
    let config = bincode::config::standard()
        .with_little_endian()
        .with_fixed_int_encoding();

    bincode::encode_into_writer(val, writer, config)
}

pub fn decode<T: bincode::Decode>(bytes: &[u8]) -> Result<T, DecodeError> {
    let config = bincode::config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
        .with_limit::<CODEC_BYTES_LIMIT>();

    bincode::decode_from_slice(bytes, config).map(|r| r.0)
}

#[inline]
pub fn encode_compact_size<E: bincode::enc::Encoder>(
    size: u64,
    encoder: &mut E,
) -> Result<(), EncodeError> {
    match size {
        0..=0xfc => encoder.writer().write(&[size as u8]),
        0xfd..=0xffff => {
            encoder.writer().write(&[0xfd])?;
            encoder.writer().write(&(size as u16).to_le_bytes())
        }
        0x1_0000..=0xffff_ffff => {
            encoder.writer().write(&[0xfe])?;
            encoder.writer().write(&(size as u32).to_le_bytes())
        }
        _ => {
            encoder.writer().write(&[0xff])?;
            encoder.writer().write(&size.to_le_bytes())
        }
    }
}

#[inline]
pub fn decode_compact_size<D: bincode::de::Decoder>(decoder: &mut D) -> Result<u64, DecodeError> {
    let first: u8 = Decode::decode(decoder)?;
    let (size, min) = match first {
        0xfd => (u16::decode(decoder)? as u64, 0xfd),
        0xfe => (u32::decode(decoder)? as u64, 0x1_0000),
        0xff => (u64::decode(decoder)?, 0x1_0000_0000),
        n => return Ok(n as u64),
    };

    if size < min {
        return Err(DecodeError::Other("non-canonical compact size"));
    }

    if size > MAX_COMPACT_SIZE {
        return Err(DecodeError::Other("compact size too large"));
    }

    Ok(size)
}

/// Writes a compact size prefixed byte vector.
#[inline]
pub fn encode_bytes<E: bincode::enc::Encoder>(
    bytes: &[u8],
    encoder: &mut E,
) -> Result<(), EncodeError> {
    encode_compact_size(bytes.len() as u64, encoder)?;
    encoder.writer().write(bytes)
}

#[inline]
pub fn decode_bytes<D: bincode::de::Decoder>(decoder: &mut D) -> Result<Vec<u8>, DecodeError> {
    let len = decode_compact_size(decoder)? as usize;
    decoder.claim_bytes_read(len)?;
    let mut out = vec![0; len];
    decoder.reader().read(&mut out)?;
    Ok(out)
}

/// Writes a compact size prefixed vector of encodable items.
#[inline]
pub fn encode_vec<E: bincode::enc::Encoder, T: Encode>(
    items: &[T],
    encoder: &mut E,
) -> Result<(), EncodeError> {
    encode_compact_size(items.len() as u64, encoder)?;
    for item in items {
        item.encode(encoder)?;
    }
    Ok(())
}

#[inline]
pub fn decode_vec<D: bincode::de::Decoder, T: Decode>(
    decoder: &mut D,
) -> Result<Vec<T>, DecodeError> {
    let len = decode_compact_size(decoder)? as usize;
    let mut out = Vec::with_capacity(len.min(1024));
    for _ in 0..len {
        out.push(T::decode(decoder)?);
    }
    Ok(out)
}

#[inline]
pub fn encode_raw<E: bincode::enc::Encoder>(
    bytes: &[u8],
    encoder: &mut E,
) -> Result<(), EncodeError> {
    encoder.writer().write(bytes)
}

#[inline]
pub fn decode_raw_32<D: bincode::de::Decoder>(decoder: &mut D) -> Result<[u8; 32], DecodeError> {
    decoder.claim_bytes_read(32)?;
    let mut out = [0; 32];
    decoder.reader().read(&mut out)?;
    Ok(out)
}
