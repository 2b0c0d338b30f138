//! BER decoding.
//!
//! A [`Decoder`] reads TLVs from any [`Source`]. Two sources are provided:
//! [`SliceSource`] over in-memory [`Bytes`] (zero-copy for primitive
//! content) and [`ReaderSource`] over an [`io::Read`] stream.
//!
//! Definite-length constructed values are read as a window of exactly
//! `length` octets and their children decoded from that window.
//! Indefinite-length values read children from the enclosing source until
//! an End-of-Contents marker, which is kept as the final child.

use std::io::{self, Read};

use bytes::Bytes;

use super::length::Length;
use super::tag::Tag;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::value::{Content, Value};

/// Default limit on nested constructed values.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// A byte source the decoder reads from.
pub trait Source {
    /// Octets consumed so far, used for error offsets.
    fn offset(&self) -> usize;

    /// Read one octet, or `None` at the end of input.
    fn next_byte(&mut self) -> Result<Option<u8>>;

    /// Whether the input is exhausted.
    fn is_exhausted(&mut self) -> Result<bool>;

    /// Take exactly `len` octets.
    fn take_bytes(&mut self, len: usize) -> Result<Bytes>;

    /// Read one octet, failing with `TruncatedInput` at the end of input.
    fn read_byte(&mut self) -> Result<u8> {
        match self.next_byte()? {
            Some(byte) => Ok(byte),
            None => Err(Error::decode(self.offset(), DecodeErrorKind::TruncatedInput)),
        }
    }
}

/// In-memory source.
#[derive(Debug, Clone)]
pub struct SliceSource {
    data: Bytes,
    pos: usize,
    base: usize,
}

impl SliceSource {
    pub fn new(data: Bytes) -> Self {
        Self::with_base(data, 0)
    }

    /// Source whose offsets start at `base`, for windows cut from a larger input.
    pub fn with_base(data: Bytes, base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    /// Unread octets.
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }
}

impl Source for SliceSource {
    fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.data.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    fn is_exhausted(&mut self) -> Result<bool> {
        Ok(self.pos >= self.data.len())
    }

    fn take_bytes(&mut self, len: usize) -> Result<Bytes> {
        let available = self.data.len() - self.pos;
        if len > available {
            return Err(Error::decode(
                self.offset() + available,
                DecodeErrorKind::TruncatedInput,
            ));
        }
        let out = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(out)
    }
}

/// Streaming source over an [`io::Read`].
///
/// Read errors are returned as [`Error::Io`] unchanged. A reader that
/// reports end of stream in the middle of a TLV yields `TruncatedInput`.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    peeked: Option<u8>,
    pos: usize,
}

impl<R: io::Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            peeked: None,
            pos: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill_peek(&mut self) -> Result<Option<u8>> {
        if self.peeked.is_none() {
            let mut byte = [0u8; 1];
            loop {
                match self.reader.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => break,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            self.peeked = Some(byte[0]);
        }
        Ok(self.peeked)
    }
}

impl<R: io::Read> Source for ReaderSource<R> {
    fn offset(&self) -> usize {
        self.pos
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.fill_peek()?;
        if byte.is_some() {
            self.peeked = None;
            self.pos += 1;
        }
        Ok(byte)
    }

    fn is_exhausted(&mut self) -> Result<bool> {
        Ok(self.fill_peek()?.is_none())
    }

    fn take_bytes(&mut self, len: usize) -> Result<Bytes> {
        let mut out = Vec::new();
        let mut wanted = len;
        if wanted > 0
            && let Some(byte) = self.peeked.take()
        {
            out.push(byte);
            wanted -= 1;
        }
        // Grow with the data actually delivered rather than trusting `len`.
        (&mut self.reader).take(wanted as u64).read_to_end(&mut out)?;

        self.pos += out.len();
        if out.len() < len {
            return Err(Error::decode(self.pos, DecodeErrorKind::TruncatedInput));
        }
        Ok(Bytes::from(out))
    }
}

/// Decoder limits.
///
/// # Examples
///
/// ```
/// use asn1_ber::ber::{DecodeOptions, Decoder};
///
/// let options = DecodeOptions::new().max_depth(16).max_length(1 << 20);
/// let mut decoder = Decoder::new(&b"\x31\x00"[..]).with_options(options);
/// assert!(decoder.read_value().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    max_depth: usize,
    max_length: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: usize::MAX,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting of constructed values.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the maximum accepted definite length of a single TLV.
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = length;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }

    pub fn length_limit(&self) -> usize {
        self.max_length
    }
}

/// BER decoder producing [`Value`] trees.
pub struct Decoder<S> {
    source: S,
    options: DecodeOptions,
}

impl Decoder<SliceSource> {
    /// Create a decoder over in-memory data.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self::from_source(SliceSource::new(data.into()))
    }

    /// Unread octets.
    pub fn remaining(&self) -> &[u8] {
        self.source.remaining()
    }
}

impl<R: io::Read> Decoder<ReaderSource<R>> {
    /// Create a decoder over a reader.
    pub fn from_reader(reader: R) -> Self {
        Self::from_source(ReaderSource::new(reader))
    }
}

impl<S: Source> Decoder<S> {
    pub fn from_source(source: S) -> Self {
        Self {
            source,
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Octets consumed so far.
    pub fn offset(&self) -> usize {
        self.source.offset()
    }

    /// Whether all input has been consumed.
    pub fn is_empty(&mut self) -> Result<bool> {
        self.source.is_exhausted()
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Decode the next TLV and everything nested in it.
    pub fn read_value(&mut self) -> Result<Value> {
        self.read_value_at(0)
    }

    fn read_value_at(&mut self, depth: usize) -> Result<Value> {
        let start = self.source.offset();
        let tag = Tag::decode(&mut self.source)?;
        let length = Length::decode(&mut self.source)?;
        tracing::trace!(offset = start, %tag, %length, depth, "decoded TLV header");

        if let Length::Definite(len) = length
            && len > self.options.max_length
        {
            tracing::debug!(offset = start, len, max = self.options.max_length, "length over limit");
            return Err(Error::decode(
                start,
                DecodeErrorKind::LengthExceedsMax {
                    length: len,
                    max: self.options.max_length,
                },
            ));
        }

        if tag.is_end_of_contents() && length == Length::Definite(0) {
            return Ok(Value::end_of_contents());
        }

        if !tag.constructed {
            let Length::Definite(len) = length else {
                tracing::debug!(offset = start, %tag, "indefinite length on primitive");
                return Err(Error::decode(start, DecodeErrorKind::IndefinitePrimitive));
            };
            let data = self.source.take_bytes(len)?;
            return Ok(Value::from_decoded(tag, false, Content::Bytes(data)));
        }

        if depth >= self.options.max_depth {
            tracing::debug!(offset = start, depth, "nesting too deep");
            return Err(Error::decode(
                start,
                DecodeErrorKind::DepthExceeded {
                    max: self.options.max_depth,
                },
            ));
        }

        let children = match length {
            Length::Definite(len) => {
                let window_start = self.source.offset();
                let window = self.source.take_bytes(len)?;
                let mut inner = Decoder {
                    source: SliceSource::with_base(window, window_start),
                    options: self.options,
                };
                let mut children = Vec::new();
                while !inner.is_empty()? {
                    let child_start = inner.offset();
                    let child = inner.read_value_at(depth + 1)?;
                    if child.is_end_of_contents() {
                        tracing::debug!(
                            offset = child_start,
                            "End-of-Contents in definite-length value"
                        );
                        return Err(Error::decode(
                            child_start,
                            DecodeErrorKind::MisplacedEndOfContents,
                        ));
                    }
                    children.push(child);
                }
                children
            }
            Length::Indefinite => self.read_until_end_of_contents(depth)?,
        };

        Ok(Value::from_decoded(
            tag,
            length.is_indefinite(),
            Content::Children(children),
        ))
    }

    fn read_until_end_of_contents(&mut self, depth: usize) -> Result<Vec<Value>> {
        let mut children = Vec::new();
        loop {
            if self.source.is_exhausted()? {
                let offset = self.source.offset();
                tracing::debug!(offset, "input ended before End-of-Contents");
                return Err(Error::decode(offset, DecodeErrorKind::UnterminatedIndefinite));
            }
            let child = self.read_value_at(depth + 1)?;
            let done = child.is_end_of_contents();
            children.push(child);
            if done {
                return Ok(children);
            }
        }
    }
}

/// Decode one value from in-memory data.
///
/// Octets after the first complete TLV are left unread; use [`Decoder`]
/// or [`decode_all`] for concatenated values.
pub fn decode(data: impl Into<Bytes>) -> Result<Value> {
    Decoder::new(data).read_value()
}

/// Decode one value from a reader, consuming exactly its octets.
pub fn decode_from<R: io::Read>(reader: R) -> Result<Value> {
    Decoder::from_reader(reader).read_value()
}

/// Decode every concatenated top-level value in `data`.
pub fn decode_all(data: impl Into<Bytes>) -> Result<Vec<Value>> {
    let mut decoder = Decoder::new(data);
    let mut values = Vec::new();
    while !decoder.is_empty()? {
        values.push(decoder.read_value()?);
    }
    Ok(values)
}

/// Interpret two's-complement content as an `i64`.
///
/// Returns `None` for empty content or values wider than 64 bits.
pub(crate) fn decode_integer(content: &[u8]) -> Option<i64> {
    let first = *content.first()?;
    // Strip redundant sign octets so non-minimal encodings still fit.
    let mut bytes = content;
    while bytes.len() > 1
        && ((bytes[0] == 0x00 && bytes[1] & 0x80 == 0) || (bytes[0] == 0xFF && bytes[1] & 0x80 != 0))
    {
        bytes = &bytes[1..];
    }
    if bytes.len() > 8 {
        return None;
    }
    let mut value: i64 = if first & 0x80 != 0 { -1 } else { 0 };
    for &byte in bytes {
        value = (value << 8) | byte as i64;
    }
    Some(value)
}
