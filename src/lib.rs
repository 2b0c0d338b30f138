//! BER/DER codec for ASN.1 values.
//!
//! `asn1-ber` turns a tree of [`Value`]s into BER bytes and back. It
//! handles every structural form X.690 defines: the four tag classes,
//! primitive and constructed encodings, tag numbers in single-octet and
//! high-number form, definite lengths in short and long form, and
//! indefinite lengths terminated by End-of-Contents.
//!
//! Content of primitive values is treated as opaque octets. A few helpers
//! ([`Value::integer`], [`Value::boolean`], [`Value::octet_string`]) build
//! the common universal scalars.
//!
//! # Encoding
//!
//! ```
//! use asn1_ber::Value;
//!
//! let set = Value::set([
//!     Value::octet_string("hello"),
//!     Value::integer(42),
//!     Value::octet_string("world"),
//! ]);
//! assert_eq!(
//!     &set.encode()?[..],
//!     b"\x31\x11\x04\x05hello\x02\x01\x2A\x04\x05world"
//! );
//!
//! // Streaming into any io::Write
//! let mut out = Vec::new();
//! set.encode_to(&mut out)?;
//! # Ok::<(), asn1_ber::Error>(())
//! ```
//!
//! # Decoding
//!
//! ```
//! use asn1_ber::{Kind, decode};
//!
//! let value = decode(&b"\x31\x80\x02\x01\x2A\x00\x00"[..])?;
//! assert_eq!(value.kind(), Kind::Set);
//! assert!(value.infinite_length());
//!
//! // The End-of-Contents marker stays visible as the last child.
//! let last = value.iter().last().unwrap();
//! assert!(last.is_end_of_contents());
//! # Ok::<(), asn1_ber::Error>(())
//! ```
//!
//! # Logging
//!
//! The decoder emits `tracing` events at `trace` level for each TLV header
//! and at `debug` level when it rejects input. No subscriber is installed.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod ber;
pub mod error;
pub mod prelude;
pub mod value;

#[cfg(feature = "cli")]
#[cfg_attr(docsrs, doc(cfg(feature = "cli")))]
pub mod cli;

pub use ber::{DecodeOptions, Decoder, Length, Tag, TagClass, decode, decode_all, decode_from};
pub use error::{ContentProblem, DecodeErrorKind, EncodeErrorKind, Error, Result};
pub use value::{Content, Kind, Truthy, Value};
