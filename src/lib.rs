#![deny(missing_docs, missing_debug_implementations)]

//! A codec for the IRIS/Caché `$LIST` (`$LB`) binary container format.
//!
//! `$LIST` is a self-describing, variable-width framed sequence of typed
//! scalar values (and nested sub-lists). This crate decodes a byte buffer
//! into a [`List`] of [`Item`]s and encodes a slice of [`Value`]s back into
//! the exact canonical bytes.
//!
//! ```
//! use dollar_list::{decode, encode, Config, Value};
//!
//! let bytes = encode(&[Value::text("t"), Value::int(3)], &Config::default()).unwrap();
//! assert_eq!(bytes, b"\x03\x01t\x03\x04\x03");
//!
//! let list = decode(&bytes, &Config::default()).unwrap();
//! assert_eq!(format!("{list}"), "$lb(\"t\",3)");
//! ```
//!
//! # Wire format
//!
//! See the per-tag table in [`Tag`] for the supported type tags and
//! [`de`]/[`ser`] for the exact framing and payload rules.
//!
//! # Configuration
//!
//! [`Config`] controls the lossy parts of the codec: the string-encoding
//! ladder (`latin-1` → locale multibyte → UTF-16LE) and the decimal/float
//! compaction rules. `Config::default()` matches the reference
//! implementation's defaults.

mod config;
mod de;
mod decimal;
mod error;
mod read;
mod ser;
mod tag;
mod value;

pub use config::{Config, Locale};
pub use de::decode;
pub use decimal::Decimal;
pub use error::{Error, Result};
pub use ser::encode;
pub use tag::Tag;
pub use value::{Item, List, StringKind, Value};
