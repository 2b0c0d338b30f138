//! BER (Basic Encoding Rules) codec.
//!
//! This module provides encoding and decoding of BER-encoded data per X.690:
//! tags in short and high-number form, definite lengths in short and long
//! form, and indefinite lengths terminated by End-of-Contents. Decoding is
//! permissive (non-minimal tag and length octets are accepted); encoding
//! always produces minimal tag and length octets.

mod decode;
mod encode;
mod length;
pub mod tag;

pub use decode::*;
pub use encode::*;
pub use length::*;
pub use tag::*;
