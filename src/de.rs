//! Decodes a `$LIST` buffer into a sequence of [`Item`]s

use num_bigint::{BigInt, Sign};
use ordered_float::OrderedFloat;

use crate::config::Config;
use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::read::{Read, SliceReader};
use crate::tag::{decode_tag_byte, Tag};
use crate::value::{Item, List, StringKind};

/// Caps speculative nested-list re-parse recursion so an adversarial,
/// deeply-nested ASCII payload cannot exhaust the stack.
const MAX_NESTING_DEPTH: usize = 64;

/// Decode a `$LIST` buffer into its top-level sequence of items.
pub fn decode<'de>(bytes: &'de [u8], config: &Config) -> Result<List<'de>> {
    decode_items(bytes, config, 0).map(List::new)
}

fn decode_items<'de>(bytes: &'de [u8], config: &Config, depth: usize) -> Result<Vec<Item<'de>>> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::format(0, "maximum nested $LIST depth exceeded"));
    }
    let mut reader = SliceReader::new(bytes);
    let mut items = Vec::new();
    while reader.remaining() > 0 {
        items.push(decode_one(&mut reader, config, depth)?);
    }
    Ok(items)
}

/// One payload length + tag byte header, and where the next item starts.
struct Header {
    tag: Tag,
    by_reference: bool,
    payload_len: usize,
}

fn read_header<'de>(reader: &mut SliceReader<'de>) -> Result<Header> {
    let start = reader.offset();
    let lead = reader
        .peek_bytes(1)
        .ok_or_else(|| Error::format(start, "truncated $LIST header"))?[0];

    if lead == 1 {
        reader.take_bytes(1);
        return Ok(Header {
            tag: Tag::Undef,
            by_reference: false,
            payload_len: 0,
        });
    }

    if lead == 0 {
        let short_prefix = reader
            .peek_bytes(3)
            .ok_or_else(|| Error::format(start, "truncated medium $LIST header"))?;
        let mut stored = (short_prefix[1] as usize) | ((short_prefix[2] as usize) << 8);
        let header_len = if stored == 0 {
            let long_prefix = reader
                .peek_bytes(7)
                .ok_or_else(|| Error::format(start, "truncated long $LIST header"))?;
            stored = (long_prefix[3] as usize)
                | ((long_prefix[4] as usize) << 8)
                | ((long_prefix[5] as usize) << 16)
                | ((long_prefix[6] as usize) << 24);
            8
        } else {
            4
        };
        let header = reader
            .take_bytes(header_len)
            .ok_or_else(|| Error::format(start, "truncated $LIST header"))?;
        let raw_tag = header[header_len - 1];
        let (tag, by_reference) = decode_tag_byte(raw_tag, start)?;
        let payload_len = stored
            .checked_sub(1)
            .ok_or_else(|| Error::format(start, "zero-length $LIST header"))?;
        return Ok(Header {
            tag,
            by_reference,
            payload_len,
        });
    }

    let header = reader
        .take_bytes(2)
        .ok_or_else(|| Error::format(start, "truncated $LIST header"))?;
    let raw_tag = header[1];
    let (tag, by_reference) = decode_tag_byte(raw_tag, start)?;
    let payload_len = (header[0] as usize) - 2;
    Ok(Header {
        tag,
        by_reference,
        payload_len,
    })
}

fn decode_one<'de>(reader: &mut SliceReader<'de>, config: &Config, depth: usize) -> Result<Item<'de>> {
    let header_offset = reader.offset();
    let header = read_header(reader)?;

    if header.tag == Tag::Undef {
        tracing::trace!(offset = header_offset, tag = %header.tag, "parsed $LIST header");
        return Ok(Item::Undef);
    }

    let payload = reader.take_bytes(header.payload_len).ok_or_else(|| {
        Error::format(
            header_offset,
            format!("payload of {} bytes exceeds buffer", header.payload_len),
        )
    })?;
    tracing::trace!(
        offset = header_offset,
        next_offset = reader.offset(),
        tag = %header.tag,
        payload_len = header.payload_len,
        "parsed $LIST header"
    );

    if header.tag == Tag::Placeholder || (header.tag == Tag::Ascii && payload.is_empty()) {
        return Ok(Item::Null {
            by_reference: header.by_reference,
        });
    }

    decode_payload(header.tag, header.by_reference, payload, config, depth, header_offset)
}

fn decode_payload<'de>(
    tag: Tag,
    by_reference: bool,
    payload: &'de [u8],
    config: &Config,
    depth: usize,
    offset: usize,
) -> Result<Item<'de>> {
    match tag {
        Tag::Undef => unreachable!("UNDEF is handled before payload decoding"),
        Tag::Placeholder => Ok(Item::Null { by_reference }),
        Tag::Ascii => decode_ascii_like(payload, by_reference, config, depth, StringKind::Text),
        Tag::OrefAscii => decode_ascii_like(payload, by_reference, config, depth, StringKind::ObjectReference),
        Tag::Unicode => decode_unicode(payload, by_reference, StringKind::Text, offset),
        Tag::OrefUnicode => decode_unicode(payload, by_reference, StringKind::ObjectReference, offset),
        Tag::PosInt => Ok(Item::Integer {
            value: decode_pos_int(payload),
            by_reference,
        }),
        Tag::NegInt => Ok(Item::Integer {
            value: decode_neg_int(payload),
            by_reference,
        }),
        Tag::PosNum => decode_number(payload, by_reference, false, offset),
        Tag::NegNum => decode_number(payload, by_reference, true, offset),
        Tag::Double => Ok(Item::Float {
            value: OrderedFloat(decode_double(payload, offset)?),
            by_reference,
        }),
        Tag::CompactDouble => Ok(Item::Float {
            value: OrderedFloat(decode_compact_double(payload, offset)?),
            by_reference,
        }),
    }
}

fn decode_ascii_like<'de>(
    payload: &'de [u8],
    by_reference: bool,
    config: &Config,
    depth: usize,
    kind: StringKind,
) -> Result<Item<'de>> {
    if payload == [0u8] {
        return Ok(Item::String {
            text: String::new(),
            kind,
            by_reference,
        });
    }

    if kind == StringKind::Text {
        match decode_items(payload, config, depth + 1) {
            Ok(items) => {
                tracing::debug!(len = payload.len(), depth, "accepted nested $LIST payload");
                return Ok(Item::List { items, by_reference });
            }
            Err(error) => {
                tracing::debug!(len = payload.len(), depth, %error, "rejected nested $LIST payload, decoding as text");
            }
        }
    }

    match decode_locale_string(payload, config) {
        Ok(text) => Ok(Item::String { text, kind, by_reference }),
        Err(_) => Ok(Item::Bytes { bytes: payload, by_reference }),
    }
}

fn decode_locale_string(payload: &[u8], config: &Config) -> Result<String> {
    config.locale.decode(payload)
}

fn decode_unicode<'de>(
    payload: &'de [u8],
    by_reference: bool,
    kind: StringKind,
    offset: usize,
) -> Result<Item<'de>> {
    if !payload.len().is_multiple_of(2) {
        return Err(Error::format(offset, "UTF-16LE payload has odd length"));
    }
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();
    let text = String::from_utf16(&units).map_err(|_| Error::format(offset, "invalid UTF-16LE payload"))?;
    Ok(Item::String { text, kind, by_reference })
}

/// POSINT/NEGINT payloads are at most 8 bytes by convention, but the decoder
/// also runs this over arbitrary-length payloads while speculatively
/// re-parsing an ASCII payload as a nested `$LIST` (src/de.rs:184-194), so it
/// must not assume any particular width; `BigInt` handles payloads of any
/// length without overflow.
fn decode_pos_int(payload: &[u8]) -> BigInt {
    BigInt::from_bytes_le(Sign::Plus, payload)
}

fn decode_neg_int(payload: &[u8]) -> BigInt {
    if payload.is_empty() {
        return BigInt::from(-1);
    }
    let raw = BigInt::from_bytes_le(Sign::Plus, payload);
    let modulus = BigInt::from(1u8) << (8 * payload.len());
    raw - modulus
}

fn decode_number<'de>(
    payload: &'de [u8],
    by_reference: bool,
    negative: bool,
    offset: usize,
) -> Result<Item<'de>> {
    let scale_byte = *payload
        .first()
        .ok_or_else(|| Error::format(offset, "POSNUM/NEGNUM payload missing scale byte"))? as i32;
    let scale = if scale_byte > 127 { scale_byte - 256 } else { scale_byte };
    let body = &payload[1..];
    let unscaled = if negative { decode_neg_int(body) } else { decode_pos_int(body) };
    Ok(Item::Decimal {
        value: Decimal::new(unscaled, scale),
        by_reference,
    })
}

fn decode_double(payload: &[u8], offset: usize) -> Result<f64> {
    if payload.len() == 8 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(payload);
        return Ok(f64::from_le_bytes(buf));
    }
    if payload.len() > 4 {
        return Err(Error::format(offset, "DOUBLE payload longer than 4 bytes but not 8"));
    }
    let mut buf = [0u8; 4];
    let pad = 4 - payload.len();
    buf[pad..].copy_from_slice(payload);
    Ok(f32::from_le_bytes(buf) as f64)
}

fn decode_compact_double(payload: &[u8], offset: usize) -> Result<f64> {
    if payload.len() > 8 {
        return Err(Error::format(offset, "COMPACT_DOUBLE payload longer than 8 bytes"));
    }
    let mut buf = [0u8; 8];
    let pad = 8 - payload.len();
    buf[pad..].copy_from_slice(payload);
    Ok(f64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_string() {
        let list = decode(b"\x03\x01t", &Config::default()).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.get(0),
            Some(&Item::String {
                text: "t".into(),
                kind: StringKind::Text,
                by_reference: false
            })
        );
    }

    #[test]
    fn decodes_nested_list() {
        let list = decode(b"\x06\x01test\x05\x01\x03\x04\x04", &Config::default()).unwrap();
        assert_eq!(format!("{list}"), "$lb(\"test\",$lb(4))");
    }

    #[test]
    fn decodes_negative_integer_width_one() {
        let list = decode(b"\x03\x05\xfe", &Config::default()).unwrap();
        assert_eq!(
            list.get(0),
            Some(&Item::Integer {
                value: BigInt::from(-2),
                by_reference: false
            })
        );
    }

    #[test]
    fn empty_posint_is_zero() {
        let list = decode(b"\x02\x04", &Config::default()).unwrap();
        assert_eq!(
            list.get(0),
            Some(&Item::Integer {
                value: BigInt::from(0),
                by_reference: false
            })
        );
    }

    #[test]
    fn null_form_pretty_prints_as_empty_string() {
        let list = decode(b"\x02\x01", &Config::default()).unwrap();
        assert_eq!(format!("{list}"), "$lb(\"\")");
    }

    #[test]
    fn medium_header_decodes_long_ascii_payload() {
        let mut bytes = vec![0x00, 0x00, 0x01, 0x01];
        bytes.extend(std::iter::repeat_n(b'A', 255));
        let list = decode(&bytes, &Config::default()).unwrap();
        match list.get(0).unwrap() {
            Item::String { text, .. } => assert_eq!(text.len(), 255),
            other => panic!("expected a string item, got {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_tag() {
        let err = decode(b"\x03\x03t", &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn truncated_payload_is_format_error() {
        let err = decode(b"\x05\x01ab", &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn wide_neg_int_payload_does_not_panic() {
        // POSINT/NEGINT payloads are at most 8 bytes by convention, but the
        // speculative nested-list re-parse can hand decode_pos_int/
        // decode_neg_int a much wider payload; neither may assume the
        // convention holds.
        let mut payload = vec![0u8; 20];
        payload[19] = 0xFF;
        let value = decode_neg_int(&payload);
        assert!(value.magnitude().bits() > 128);
    }
}
