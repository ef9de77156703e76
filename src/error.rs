//! Errors produced by decoding and encoding `$LIST` buffers

use std::fmt::Display;

/// Errors surfaced by [`crate::decode`] and [`crate::encode`]
///
/// The decoder never attempts partial recovery: the first malformed header or
/// out-of-range value aborts the whole call. The encoder is lenient in exactly
/// two places (the string ladder and the decimal-to-float fallback); everywhere
/// else an out-of-range host value is reported through one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A header declared a next-offset beyond the end of the buffer, a tag byte
    /// outside the defined set, or a decimal scale that could not be normalized.
    #[error("malformed $LIST buffer at offset {offset}: {message}")]
    Format {
        /// Byte offset at which the malformed header or tag was encountered
        offset: usize,
        /// Human readable detail
        message: String,
    },

    /// An integer or decimal whose magnitude exceeds 8 bytes / 63 bits after
    /// all normalization passes.
    #[error("value out of range: {0}")]
    Range(String),

    /// A string could not be encoded under the configured locale while
    /// Unicode escalation was disabled.
    #[error("string does not encode under the configured locale: {0}")]
    Encoding(String),

    /// A host value whose kind is not one of the variants [`crate::Value`]
    /// defines.
    ///
    /// `Value` is a closed enum and [`crate::encode`]'s dispatch over it is
    /// exhaustive, so this crate never constructs this variant itself; it is
    /// carried for hosts that build a `Value` through a fallible, dynamically
    /// typed adapter (e.g. from a schemaless host representation) ahead of
    /// calling [`crate::encode`].
    #[error("unsupported host value kind: {0}")]
    Type(String),
}

impl Error {
    pub(crate) fn format(offset: usize, message: impl Into<String>) -> Self {
        Self::Format {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn range(message: impl Display) -> Self {
        Self::Range(message.to_string())
    }

    pub(crate) fn encoding(message: impl Display) -> Self {
        Self::Encoding(message.to_string())
    }

    /// Construct a [`Error::Type`] for a host value kind this crate's
    /// [`crate::Value`] has no variant for. Exposed for dynamically typed
    /// adapters that build a `Value` outside of this crate.
    pub fn type_error(message: impl Display) -> Self {
        Self::Type(message.to_string())
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
