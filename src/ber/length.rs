//! BER length encoding and decoding.
//!
//! X.690 Section 8.1.3: short form for lengths below 128, long form
//! (`0x80 | n` followed by `n` big-endian octets) otherwise, and the
//! single octet `0x80` for indefinite length.

use smallvec::SmallVec;

use super::decode::Source;
use crate::error::{DecodeErrorKind, Error, Result};

/// Length octet announcing indefinite length.
pub const INDEFINITE: u8 = 0x80;

/// Reserved length octet (X.690 8.1.3.5 c).
pub const RESERVED: u8 = 0xFF;

/// Wire form of End-of-Contents: tag 0, length 0.
pub const END_OF_CONTENTS: [u8; 2] = [0x00, 0x00];

/// Length of a TLV's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// Content is exactly this many octets.
    Definite(usize),
    /// Content runs until an End-of-Contents marker.
    Indefinite,
}

impl Length {
    pub const fn is_indefinite(&self) -> bool {
        matches!(self, Length::Indefinite)
    }

    /// Number of octets this length occupies on the wire.
    pub const fn encoded_len(&self) -> usize {
        match self {
            Length::Definite(len) => length_len(*len),
            Length::Indefinite => 1,
        }
    }

    /// Encode in wire order.
    pub fn to_bytes(&self) -> SmallVec<[u8; 9]> {
        match self {
            Length::Definite(len) => {
                let (bytes, count) = encode_length(*len);
                bytes[..count].iter().rev().copied().collect()
            }
            Length::Indefinite => SmallVec::from_slice(&[INDEFINITE]),
        }
    }

    /// Read a length from `source`.
    ///
    /// Long-form lengths with leading zero octets are accepted.
    pub fn decode<S: Source + ?Sized>(source: &mut S) -> Result<Self> {
        let start = source.offset();
        let first = source.read_byte()?;

        if first & 0x80 == 0 {
            return Ok(Length::Definite(first as usize));
        }
        if first == INDEFINITE {
            return Ok(Length::Indefinite);
        }
        if first == RESERVED {
            return Err(Error::decode(start, DecodeErrorKind::MalformedLength));
        }

        let octets = (first & 0x7F) as usize;
        let mut len: usize = 0;
        for _ in 0..octets {
            let byte = source.read_byte()?;
            if len > usize::MAX >> 8 {
                return Err(Error::decode(start, DecodeErrorKind::LengthTooLong { octets }));
            }
            len = (len << 8) | byte as usize;
        }
        Ok(Length::Definite(len))
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Length::Definite(len) => write!(f, "{}", len),
            Length::Indefinite => write!(f, "indefinite"),
        }
    }
}

/// Encode a definite length.
///
/// Returns the octets in reverse order (for prepending into an
/// [`EncodeBuf`](super::EncodeBuf)) and the number of valid octets.
pub fn encode_length(len: usize) -> ([u8; 9], usize) {
    let mut out = [0u8; 9];
    if len < 0x80 {
        out[0] = len as u8;
        return (out, 1);
    }

    let mut remaining = len;
    let mut count = 0;
    while remaining > 0 {
        out[count] = remaining as u8;
        remaining >>= 8;
        count += 1;
    }
    out[count] = 0x80 | count as u8;
    (out, count + 1)
}

/// Number of octets a definite length of `len` occupies.
pub const fn length_len(len: usize) -> usize {
    if len < 0x80 {
        1
    } else {
        let bits = usize::BITS - len.leading_zeros();
        1 + bits.div_ceil(8) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::decode::SliceSource;
    use bytes::Bytes;

    fn parse(data: &'static [u8]) -> Result<Length> {
        let mut source = SliceSource::new(Bytes::from_static(data));
        Length::decode(&mut source)
    }

    fn wire(len: usize) -> Vec<u8> {
        Length::Definite(len).to_bytes().to_vec()
    }

    #[test]
    fn test_short_form() {
        assert_eq!(wire(0), vec![0x00]);
        assert_eq!(wire(0x11), vec![0x11]);
        assert_eq!(wire(127), vec![0x7F]);
        assert_eq!(length_len(127), 1);
    }

    #[test]
    fn test_long_form() {
        assert_eq!(wire(128), vec![0x81, 0x80]);
        assert_eq!(wire(255), vec![0x81, 0xFF]);
        assert_eq!(wire(256), vec![0x82, 0x01, 0x00]);
        assert_eq!(wire(3000), vec![0x82, 0x0B, 0xB8]);
        assert_eq!(wire(0x01_00_00), vec![0x83, 0x01, 0x00, 0x00]);
        assert_eq!(length_len(128), 2);
        assert_eq!(length_len(3000), 3);
    }

    #[test]
    fn test_max_length() {
        let bytes = wire(usize::MAX);
        assert_eq!(bytes.len(), 1 + std::mem::size_of::<usize>());
        assert_eq!(bytes[0], 0x80 | std::mem::size_of::<usize>() as u8);
        assert_eq!(length_len(usize::MAX), bytes.len());
    }

    #[test]
    fn test_indefinite() {
        assert_eq!(Length::Indefinite.to_bytes().as_slice(), &[0x80]);
        assert_eq!(parse(&[0x80]).unwrap(), Length::Indefinite);
    }

    #[test]
    fn test_decode_forms() {
        assert_eq!(parse(&[0x7F]).unwrap(), Length::Definite(127));
        assert_eq!(parse(&[0x81, 0x80]).unwrap(), Length::Definite(128));
        assert_eq!(parse(&[0x82, 0x0B, 0xB8]).unwrap(), Length::Definite(3000));
        // non-minimal but permitted in BER
        assert_eq!(parse(&[0x82, 0x00, 0x05]).unwrap(), Length::Definite(5));
    }

    #[test]
    fn test_decode_reserved() {
        let err = parse(&[0xFF]).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::MalformedLength));
    }

    #[test]
    fn test_decode_truncated_long_form() {
        let err = parse(&[0x82, 0x0B]).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::TruncatedInput));
    }

    #[test]
    fn test_decode_too_long() {
        let mut data = vec![0x80 | 9];
        data.extend([0x01; 9]);
        let mut source = SliceSource::new(Bytes::from(data));
        let err = Length::decode(&mut source).unwrap_err();
        assert_eq!(
            err.decode_kind(),
            Some(DecodeErrorKind::LengthTooLong { octets: 9 })
        );
    }
}
