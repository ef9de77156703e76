//! Runtime configuration for [`crate::decode`] and [`crate::encode`]

use crate::error::{Error, Result};

/// The decoder's and encoder's shared fallback for ASCII-tagged string
/// payloads: either true `ISO-8859-1` (byte value equals code point,
/// lossless and infallible both ways — the reference implementation's
/// default) or a multibyte charset resolved through `encoding_rs`.
///
/// `encoding_rs` has no standalone `ISO-8859-1` label (its `"latin1"` label
/// resolves to `windows-1252`, which remaps the C1 control range), so the
/// identity mapping is implemented directly here rather than borrowed from
/// that crate.
#[derive(Debug, Clone, Copy)]
pub enum Locale {
    /// True `ISO-8859-1`: byte value ≡ Unicode code point.
    Latin1,
    /// A multibyte charset, looked up by `encoding_rs` label.
    Multibyte(&'static encoding_rs::Encoding),
}

impl Locale {
    pub(crate) fn decode(&self, payload: &[u8]) -> Result<String> {
        match self {
            Locale::Latin1 => Ok(payload.iter().map(|&b| b as char).collect()),
            Locale::Multibyte(encoding) => {
                let (text, _, had_errors) = encoding.decode(payload);
                if had_errors {
                    return Err(Error::encoding("payload is not valid under the configured locale"));
                }
                Ok(text.into_owned())
            }
        }
    }

    pub(crate) fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Locale::Latin1 => text
                .chars()
                .map(|ch| {
                    u8::try_from(ch as u32)
                        .map_err(|_| Error::encoding(format!("{text:?} is not representable in ISO-8859-1")))
                })
                .collect(),
            Locale::Multibyte(encoding) => {
                let (bytes, _, had_errors) = encoding.encode(text);
                if had_errors {
                    return Err(Error::encoding(format!("{text:?} does not encode under the configured locale")));
                }
                Ok(bytes.into_owned())
            }
        }
    }
}

/// Knobs that control the lossy parts of the codec: the string-encoding
/// ladder and the decimal/float compaction rules.
///
/// `Config::default()` matches the defaults of the reference implementation.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub(crate) locale: Locale,
    pub(crate) is_unicode: bool,
    pub(crate) compact_double: bool,
    pub(crate) retain_empty_string: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::Latin1,
            is_unicode: true,
            compact_double: false,
            retain_empty_string: false,
        }
    }
}

impl Config {
    /// Fallback encoding used for ASCII-tagged strings that are not 7-bit
    /// clean. Defaults to `Locale::Latin1`, matching the reference
    /// implementation's default.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// When `true` (the default), non-`latin-1` strings escalate to the
    /// UNICODE tag. When `false`, they are run through the configured
    /// locale instead, still under the ASCII tag.
    pub fn with_unicode(mut self, is_unicode: bool) -> Self {
        self.is_unicode = is_unicode;
        self
    }

    /// When `true`, DOUBLE values are truncated to the smallest exact
    /// float32/float64 representation per the compact-double rule.
    pub fn with_compact_double(mut self, compact_double: bool) -> Self {
        self.compact_double = compact_double;
        self
    }

    /// When `true`, an empty host string encodes to the null two-byte form
    /// instead of the explicit three-byte empty-string form.
    pub fn with_retain_empty_string(mut self, retain_empty_string: bool) -> Self {
        self.retain_empty_string = retain_empty_string;
        self
    }
}
