//! Prelude module for convenient imports.
//!
//! This module provides a convenient set of commonly-used types and traits
//! for working with the asn1-ber library.
//!
//! # Usage
//!
//! ```rust
//! use asn1_ber::prelude::*;
//!
//! let value = Value::sequence([Value::null()]);
//! assert_eq!(decode(value.encode()?)?, value);
//! # Ok::<(), Error>(())
//! ```
//!
//! This imports:
//! - Core types: [`Value`], [`Kind`], [`Content`], [`Tag`], [`TagClass`]
//! - Entry points: [`decode`], [`decode_from`], [`Decoder`], [`DecodeOptions`]
//! - Error handling: [`Error`], [`Result`]

pub use crate::ber::{DecodeOptions, Decoder, Tag, TagClass, decode, decode_from};
pub use crate::error::{Error, Result};
pub use crate::value::{Content, Kind, Truthy, Value};
