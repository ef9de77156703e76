//! Item type tags

use std::{convert::TryFrom, fmt::Display};

use crate::error::Error;

/// Added to a tag byte on the wire to mark an item as held by reference.
///
/// The codec round-trips this bit faithfully but assigns it no further
/// meaning; what "by reference" means to a caller is a host-platform concern.
pub(crate) const BY_REFERENCE_OFFSET: i8 = 32;

/// One-byte type discriminator that precedes every item's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
#[repr(i8)]
pub enum Tag {
    Undef = -1,
    Placeholder = 0,
    Ascii = 1,
    Unicode = 2,
    PosInt = 4,
    NegInt = 5,
    PosNum = 6,
    NegNum = 7,
    Double = 8,
    CompactDouble = 9,
    OrefAscii = 25,
    OrefUnicode = 26,
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}:{}", self, *self as i8)
    }
}

impl TryFrom<i8> for Tag {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        let tag = match value {
            -1 => Tag::Undef,
            0 => Tag::Placeholder,
            1 => Tag::Ascii,
            2 => Tag::Unicode,
            4 => Tag::PosInt,
            5 => Tag::NegInt,
            6 => Tag::PosNum,
            7 => Tag::NegNum,
            8 => Tag::Double,
            9 => Tag::CompactDouble,
            25 => Tag::OrefAscii,
            26 => Tag::OrefUnicode,
            _ => return Err(Error::format(0, format!("invalid type tag {value}"))),
        };
        Ok(tag)
    }
}

/// Split a raw tag byte into its base [`Tag`] and by-reference bit.
///
/// `raw` is read as a two's-complement `i8` wire byte: tags in `32..64`
/// (as unsigned bytes) carry the by-reference flag and decode to `raw - 32`.
pub(crate) fn decode_tag_byte(raw: u8, offset: usize) -> Result<(Tag, bool), Error> {
    let by_reference = (32..64).contains(&raw);
    let base = if by_reference { raw - 32 } else { raw };
    let tag = Tag::try_from(base as i8).map_err(|_| {
        Error::format(offset, format!("invalid type tag {raw}"))
    })?;
    Ok((tag, by_reference))
}

/// Encode a [`Tag`] and by-reference bit back into a wire byte.
pub(crate) fn encode_tag_byte(tag: Tag, by_reference: bool) -> u8 {
    let base = tag as i8 as u8;
    if by_reference {
        base.wrapping_add(BY_REFERENCE_OFFSET as u8)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_defined_tag() {
        for &tag in &[
            Tag::Placeholder,
            Tag::Ascii,
            Tag::Unicode,
            Tag::PosInt,
            Tag::NegInt,
            Tag::PosNum,
            Tag::NegNum,
            Tag::Double,
            Tag::CompactDouble,
            Tag::OrefAscii,
            Tag::OrefUnicode,
        ] {
            let byte = encode_tag_byte(tag, false);
            let (decoded, by_reference) = decode_tag_byte(byte, 0).unwrap();
            assert_eq!(decoded, tag);
            assert!(!by_reference);
        }
    }

    #[test]
    fn by_reference_bit_round_trips() {
        let byte = encode_tag_byte(Tag::Ascii, true);
        assert_eq!(byte, 1 + 32);
        let (tag, by_reference) = decode_tag_byte(byte, 0).unwrap();
        assert_eq!(tag, Tag::Ascii);
        assert!(by_reference);
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(decode_tag_byte(3, 0).is_err());
        assert!(decode_tag_byte(10, 0).is_err());
    }

    #[test]
    fn displays_name_and_code() {
        assert_eq!(format!("{}", Tag::Ascii), "Ascii:1");
    }
}
