//! Encodes a sequence of [`Value`]s into a `$LIST` buffer

use bytes::{BufMut, BytesMut};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::config::Config;
use crate::decimal::{normalize_for_wire, Decimal};
use crate::error::{Error, Result};
use crate::tag::{encode_tag_byte, Tag};
use crate::value::{StringKind, Value};

const INITIAL_CAPACITY: usize = 256;

/// Encode a sequence of values into their canonical `$LIST` byte form.
pub fn encode(values: &[Value], config: &Config) -> Result<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(INITIAL_CAPACITY);
    for value in values {
        encode_value(&mut buf, value, config)?;
    }
    Ok(buf.to_vec())
}

fn encode_value(buf: &mut BytesMut, value: &Value, config: &Config) -> Result<()> {
    match value {
        Value::Undef => {
            buf.put_u8(1);
            Ok(())
        }
        Value::Null { by_reference } => write_header(buf, 0, Tag::Ascii, *by_reference),
        Value::Bytes { bytes, by_reference } => {
            write_header(buf, bytes.len(), Tag::Ascii, *by_reference)?;
            buf.put_slice(bytes);
            Ok(())
        }
        Value::String {
            text,
            kind,
            by_reference,
        } => encode_string(buf, text, *by_reference, config, *kind),
        Value::Integer { value, by_reference } => encode_integer(buf, value, *by_reference, config),
        Value::Decimal { value, by_reference } => encode_decimal(buf, value, *by_reference, config),
        Value::Float { value, by_reference } => encode_float(buf, value.into_inner(), *by_reference, config),
        Value::List { items, by_reference } => {
            let inner = encode(items, config)?;
            write_header(buf, inner.len(), Tag::Ascii, *by_reference)?;
            buf.put_slice(&inner);
            Ok(())
        }
    }
}

/// Write the length-and-type header for a payload of `payload_len` bytes.
///
/// Mirrors the reference implementation's header writer exactly: the
/// length field stored on the wire is `payload_len + 2` for the short form
/// but `payload_len + 1` for the medium/long forms.
fn write_header(buf: &mut BytesMut, payload_len: usize, tag: Tag, by_reference: bool) -> Result<()> {
    let raw_tag = encode_tag_byte(tag, by_reference);
    let stored = payload_len
        .checked_add(1)
        .ok_or_else(|| Error::range("payload too large to frame"))?;

    if stored < 0xFF {
        buf.put_u8((stored + 1) as u8);
        buf.put_u8(raw_tag);
    } else if stored <= 0xFFFF {
        buf.put_u8(0);
        buf.put_u8((stored & 0xFF) as u8);
        buf.put_u8(((stored >> 8) & 0xFF) as u8);
        buf.put_u8(raw_tag);
    } else if stored <= 0xFFFF_FFFF {
        buf.put_u8(0);
        buf.put_u8(0);
        buf.put_u8(0);
        buf.put_u8((stored & 0xFF) as u8);
        buf.put_u8(((stored >> 8) & 0xFF) as u8);
        buf.put_u8(((stored >> 16) & 0xFF) as u8);
        buf.put_u8(((stored >> 24) & 0xFF) as u8);
        buf.put_u8(raw_tag);
    } else {
        return Err(Error::range("payload too large to frame"));
    }
    Ok(())
}

fn pos_int_length(value: u64) -> usize {
    match value {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        0x100_0000..=0xFFFF_FFFF => 4,
        0x1_0000_0000..=0xFF_FFFF_FFFF => 5,
        0x100_0000_0000..=0xFFFF_FFFF_FFFF => 6,
        0x1_0000_0000_0000..=0xFF_FFFF_FFFF_FFFF => 7,
        _ => 8,
    }
}

fn neg_int_length(value: i64) -> usize {
    let v = value as i128;
    if v == -1 {
        0
    } else if v >= -0x100 {
        1
    } else if v >= -0x1_0000 {
        2
    } else if v >= -0x100_0000 {
        3
    } else if v >= -0x1_0000_0000 {
        4
    } else if v >= -0x100_0000_0000 {
        5
    } else if v >= -0x1_0000_0000_0000 {
        6
    } else if v >= -0x100_0000_0000_0000 {
        7
    } else {
        8
    }
}

fn write_raw_int(buf: &mut BytesMut, value: i128, length: usize) {
    let mut v = value;
    for _ in 0..length {
        buf.put_u8((v & 0xFF) as u8);
        v >>= 8;
    }
}

fn encode_integer(buf: &mut BytesMut, value: &BigInt, by_reference: bool, config: &Config) -> Result<()> {
    let Some(v) = value.to_i64() else {
        return encode_string(buf, &value.to_string(), by_reference, config, StringKind::Text);
    };

    if v == 0 {
        write_header(buf, 0, Tag::PosInt, by_reference)
    } else if v > 0 {
        let len = pos_int_length(v as u64);
        write_header(buf, len, Tag::PosInt, by_reference)?;
        write_raw_int(buf, v as i128, len);
        Ok(())
    } else if v == -1 {
        write_header(buf, 0, Tag::NegInt, by_reference)
    } else {
        let len = neg_int_length(v);
        write_header(buf, len, Tag::NegInt, by_reference)?;
        write_raw_int(buf, v as i128, len);
        Ok(())
    }
}

fn encode_float(buf: &mut BytesMut, value: f64, by_reference: bool, config: &Config) -> Result<()> {
    if !config.compact_double {
        write_header(buf, 8, Tag::Double, by_reference)?;
        buf.put_slice(&value.to_le_bytes());
        return Ok(());
    }

    if value == 0.0 && value.is_sign_positive() {
        return write_header(buf, 0, Tag::Double, by_reference);
    }

    let as_f32 = value as f32;
    if as_f32 as f64 == value {
        let bytes = as_f32.to_le_bytes();
        let skip = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        write_header(buf, bytes.len() - skip, Tag::Double, by_reference)?;
        buf.put_slice(&bytes[skip..]);
    } else {
        let bytes = value.to_le_bytes();
        let skip = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        write_header(buf, bytes.len() - skip, Tag::CompactDouble, by_reference)?;
        buf.put_slice(&bytes[skip..]);
    }
    Ok(())
}

fn encode_decimal(buf: &mut BytesMut, value: &Decimal, by_reference: bool, config: &Config) -> Result<()> {
    match value {
        Decimal::Nan => encode_float(buf, f64::NAN, by_reference, config),
        Decimal::Infinity { negative } => {
            let f = if *negative { f64::NEG_INFINITY } else { f64::INFINITY };
            encode_float(buf, f, by_reference, config)
        }
        Decimal::Finite { unscaled, scale } => match normalize_for_wire(unscaled, *scale)? {
            Some(wire) => {
                let (tag, len) = if wire.unscaled >= 0 {
                    (Tag::PosNum, pos_int_length(wire.unscaled as u64))
                } else if wire.unscaled == -1 {
                    (Tag::NegNum, 0)
                } else {
                    (Tag::NegNum, neg_int_length(wire.unscaled))
                };
                write_header(buf, len + 1, tag, by_reference)?;
                buf.put_u8(wire.scale as u8);
                write_raw_int(buf, wire.unscaled as i128, len);
                Ok(())
            }
            None => encode_float(buf, value.to_f64(), by_reference, config),
        },
    }
}

fn tag_for(kind: StringKind, unicode: bool) -> Tag {
    match (kind, unicode) {
        (StringKind::Text, false) => Tag::Ascii,
        (StringKind::Text, true) => Tag::Unicode,
        (StringKind::ObjectReference, false) => Tag::OrefAscii,
        (StringKind::ObjectReference, true) => Tag::OrefUnicode,
    }
}

fn try_latin1(text: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let codepoint = ch as u32;
        if codepoint > 0xFF {
            return None;
        }
        out.push(codepoint as u8);
    }
    Some(out)
}

fn encode_utf16le(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

fn encode_string(
    buf: &mut BytesMut,
    text: &str,
    by_reference: bool,
    config: &Config,
    kind: StringKind,
) -> Result<()> {
    if text.is_empty() {
        return if config.retain_empty_string {
            write_header(buf, 0, tag_for(kind, false), by_reference)
        } else {
            write_header(buf, 1, tag_for(kind, false), by_reference)?;
            buf.put_u8(0);
            Ok(())
        };
    }

    if let Some(latin1) = try_latin1(text) {
        write_header(buf, latin1.len(), tag_for(kind, false), by_reference)?;
        buf.put_slice(&latin1);
        return Ok(());
    }

    if config.is_unicode {
        let utf16 = encode_utf16le(text);
        write_header(buf, utf16.len(), tag_for(kind, true), by_reference)?;
        buf.put_slice(&utf16);
        Ok(())
    } else {
        let encoded = config.locale.encode(text)?;
        write_header(buf, encoded.len(), tag_for(kind, false), by_reference)?;
        buf.put_slice(&encoded);
        Ok(())
    }
}
