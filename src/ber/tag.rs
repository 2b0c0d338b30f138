//! BER tag definitions and codec.
//!
//! Tag encoding follows X.690 Section 8.1.2:
//! - Bits 7-6: Class (00=Universal, 01=Application, 10=Context-specific, 11=Private)
//! - Bit 5: Primitive (0) or Constructed (1)
//! - Bits 4-0: Tag number (0-30, or 31 for long form)
//!
//! In long form the tag number follows the first octet in base 128, most
//! significant group first, with bit 7 set on every octet but the last.

use std::str::FromStr;

use smallvec::SmallVec;

use super::decode::Source;
use crate::error::{DecodeErrorKind, Error, Result};

/// Tag class bits (bits 7-6)
pub mod class {
    pub const UNIVERSAL: u8 = 0x00;
    pub const APPLICATION: u8 = 0x40;
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
    pub const PRIVATE: u8 = 0xC0;
}

/// Constructed bit (bit 5)
pub const CONSTRUCTED: u8 = 0x20;

/// Low five bits of the first octet when the tag number uses long form.
pub const HIGH_TAG_NUMBER: u8 = 0x1F;

/// Universal tag numbers with a dedicated [`Kind`](crate::Kind).
pub mod universal {
    pub const END_OF_CONTENTS: u32 = 0;
    pub const BOOLEAN: u32 = 1;
    pub const INTEGER: u32 = 2;
    pub const OCTET_STRING: u32 = 4;
    pub const NULL: u32 = 5;
    pub const SEQUENCE: u32 = 16;
    pub const SET: u32 = 17;
}

/// ASN.1 tag class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    /// Class bits as they appear in the first tag octet.
    pub const fn bits(self) -> u8 {
        match self {
            TagClass::Universal => class::UNIVERSAL,
            TagClass::Application => class::APPLICATION,
            TagClass::ContextSpecific => class::CONTEXT_SPECIFIC,
            TagClass::Private => class::PRIVATE,
        }
    }

    /// Parse the class from the top two bits of a tag octet.
    pub const fn from_bits(octet: u8) -> Self {
        match octet & 0xC0 {
            class::UNIVERSAL => TagClass::Universal,
            class::APPLICATION => TagClass::Application,
            class::CONTEXT_SPECIFIC => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    /// Canonical upper-case name, e.g. `CONTEXT_SPECIFIC`.
    pub const fn name(self) -> &'static str {
        match self {
            TagClass::Universal => "UNIVERSAL",
            TagClass::Application => "APPLICATION",
            TagClass::ContextSpecific => "CONTEXT_SPECIFIC",
            TagClass::Private => "PRIVATE",
        }
    }
}

impl std::fmt::Display for TagClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TagClass {
    type Err = Error;

    /// Accepts the four class names case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        [
            TagClass::Universal,
            TagClass::Application,
            TagClass::ContextSpecific,
            TagClass::Private,
        ]
        .into_iter()
        .find(|class| class.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| Error::invalid_tag_class(s))
    }
}

/// A fully parsed identifier: class, primitive/constructed and tag number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub class: TagClass,
    pub constructed: bool,
    pub number: u32,
}

impl Tag {
    /// The End-of-Contents identifier (single octet 0x00).
    pub const END_OF_CONTENTS: Tag = Tag::new(TagClass::Universal, false, universal::END_OF_CONTENTS);

    pub const fn new(class: TagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    pub const fn is_end_of_contents(&self) -> bool {
        matches!(self.class, TagClass::Universal)
            && !self.constructed
            && self.number == universal::END_OF_CONTENTS
    }

    /// Number of octets this tag occupies on the wire.
    pub const fn encoded_len(&self) -> usize {
        if self.number < HIGH_TAG_NUMBER as u32 {
            1
        } else {
            1 + base128_len(self.number)
        }
    }

    /// First identifier octet.
    pub const fn leading_octet(&self) -> u8 {
        let constructed = if self.constructed { CONSTRUCTED } else { 0 };
        let low = if self.number < HIGH_TAG_NUMBER as u32 {
            self.number as u8
        } else {
            HIGH_TAG_NUMBER
        };
        self.class.bits() | constructed | low
    }

    /// Encode this tag in wire order.
    pub fn to_bytes(&self) -> SmallVec<[u8; 6]> {
        let mut out = SmallVec::new();
        out.push(self.leading_octet());
        if self.number >= HIGH_TAG_NUMBER as u32 {
            let groups = base128_len(self.number);
            for i in (0..groups).rev() {
                let group = ((self.number >> (7 * i)) & 0x7F) as u8;
                out.push(if i == 0 { group } else { group | 0x80 });
            }
        }
        out
    }

    /// Read a tag from `source`.
    ///
    /// Long-form numbers with redundant leading 0x80 groups are accepted.
    pub fn decode<S: Source + ?Sized>(source: &mut S) -> Result<Self> {
        let first = source.read_byte()?;
        let class = TagClass::from_bits(first);
        let constructed = first & CONSTRUCTED != 0;
        let low = first & HIGH_TAG_NUMBER;

        if low < HIGH_TAG_NUMBER {
            return Ok(Tag::new(class, constructed, low as u32));
        }

        let mut number: u32 = 0;
        loop {
            let offset = source.offset();
            let byte = source.read_byte()?;
            if number > u32::MAX >> 7 {
                return Err(Error::decode(offset, DecodeErrorKind::TagNumberOverflow));
            }
            number = (number << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                break;
            }
        }
        Ok(Tag::new(class, constructed, number))
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}]", self.class, self.number)?;
        if self.constructed {
            write!(f, " constructed")?;
        }
        Ok(())
    }
}

/// Number of base-128 groups needed for `number` (at least one).
const fn base128_len(number: u32) -> usize {
    let bits = 32 - number.leading_zeros() as usize;
    if bits == 0 { 1 } else { bits.div_ceil(7) }
}
