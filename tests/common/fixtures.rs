//! Common test fixtures and constants.

use asn1_ber::Value;

// =============================================================================
// Scalar shorthands
// =============================================================================

/// OCTET STRING
pub fn s(content: &'static str) -> Value {
    Value::octet_string(content)
}

/// INTEGER
pub fn i(value: i64) -> Value {
    Value::integer(value)
}

pub fn eoc() -> Value {
    Value::end_of_contents()
}

/// The three-element SET used throughout: "hello", 42, "world".
pub fn hello_children() -> Vec<Value> {
    vec![s("hello"), i(42), s("world")]
}

/// Three empty OCTET STRINGs.
pub fn empty_strings() -> Vec<Value> {
    vec![s(""), s(""), s("")]
}

// =============================================================================
// Wire fixtures
// =============================================================================

/// SET { "hello", 42, "world" }
pub const HELLO_SET: &[u8] = b"\x31\x11\x04\x05hello\x02\x01\x2A\x04\x05world";

/// Same content with indefinite length.
pub const HELLO_SET_INDEFINITE: &[u8] = b"\x31\x80\x04\x05hello\x02\x01\x2A\x04\x05world\x00\x00";

/// SET { "", "", "" }
pub const EMPTY_STRINGS_SET: &[u8] = b"\x31\x06\x04\x00\x04\x00\x04\x00";

/// SET OF INTEGER with a non-minimal four-octet -1.
pub const INTEGER_SET: &[u8] = b"\x31\x0C\x02\x04\xFF\xFF\xFF\xFF\x02\x01\x00\x02\x01\x01";

/// SET of 1000 INTEGER 0.
pub fn thousand_zeros() -> Vec<u8> {
    let mut der = vec![0x31, 0x82, 0x0B, 0xB8];
    for _ in 0..1000 {
        der.extend_from_slice(&[0x02, 0x01, 0x00]);
    }
    der
}

/// Replace the first octet of `der` (the tag) with `tag`.
pub fn with_tag_octet(der: &[u8], tag: u8) -> Vec<u8> {
    let mut out = der.to_vec();
    out[0] = tag;
    out
}
