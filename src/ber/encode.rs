//! BER encoding.
//!
//! Two paths produce identical bytes:
//! - [`EncodeBuf`] uses a reverse buffer: writes from end backwards to avoid
//!   needing to pre-calculate lengths.
//! - [`encode_to`] streams into an [`io::Write`] sink. Content lengths are
//!   computed up front by a validating size pass, so a structural error is
//!   reported before anything reaches the sink.

use std::io;

use bytes::Bytes;

use super::length::{self, Length, encode_length};
use super::tag::Tag;
use crate::error::{ContentProblem, EncodeErrorKind, Error, Result};
use crate::value::{Content, Value};

/// Buffer for BER encoding that writes backwards.
///
/// This approach avoids needing to pre-calculate content lengths:
/// we write the content first, then prepend the length and tag.
pub struct EncodeBuf {
    buf: Vec<u8>,
}

impl EncodeBuf {
    /// Create a new encode buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    /// Create a new encode buffer with specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Push multiple bytes (prepends to front, reversed).
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    /// Push a definite BER length encoding.
    pub fn push_length(&mut self, len: usize) {
        let (bytes, count) = encode_length(len);
        // The encode_length returns bytes in reverse order for prepending
        for byte in bytes.iter().take(count) {
            self.buf.push(*byte);
        }
    }

    /// Push the indefinite length marker.
    pub fn push_indefinite_length(&mut self) {
        self.buf.push(length::INDEFINITE);
    }

    /// Push an End-of-Contents marker (tag 0, length 0).
    pub fn push_end_of_contents(&mut self) {
        self.push_bytes(&length::END_OF_CONTENTS);
    }

    /// Push a BER tag.
    pub fn push_tag(&mut self, tag: &Tag) {
        self.push_bytes(&tag.to_bytes());
    }

    /// Get the current length of encoded data.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Encode a definite-length constructed type.
    ///
    /// Calls the closure to encode contents, then wraps with length and tag.
    pub fn push_constructed<F>(&mut self, tag: &Tag, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let start_len = self.len();
        f(self)?;
        let content_len = self.len() - start_len;
        self.push_length(content_len);
        self.push_tag(tag);
        Ok(())
    }

    /// Encode an indefinite-length constructed type.
    ///
    /// The closure pushes the children, including the terminating
    /// End-of-Contents (which, in a reverse buffer, is pushed first).
    pub fn push_indefinite<F>(&mut self, tag: &Tag, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        f(self)?;
        self.push_indefinite_length();
        self.push_tag(tag);
        Ok(())
    }

    /// Encode a primitive TLV.
    pub fn push_primitive(&mut self, tag: &Tag, content: &[u8]) {
        self.push_bytes(content);
        self.push_length(content.len());
        self.push_tag(tag);
    }

    /// Encode a value tree.
    pub fn push_value(&mut self, value: &Value) -> Result<()> {
        let tag = header_tag(value)?;
        match value.content() {
            Content::Bytes(data) => {
                self.push_primitive(&tag, data);
                Ok(())
            }
            Content::Children(children) if value.infinite_length() => {
                self.push_indefinite(&tag, |buf| {
                    if !ends_with_end_of_contents(children) {
                        buf.push_end_of_contents();
                    }
                    // Reverse buffer: push in reverse order for forward output
                    for child in children.iter().rev() {
                        buf.push_value(child)?;
                    }
                    Ok(())
                })
            }
            Content::Children(children) => self.push_constructed(&tag, |buf| {
                for child in children.iter().rev() {
                    buf.push_value(child)?;
                }
                Ok(())
            }),
            Content::Unset => Err(invalid_content(ContentProblem::Unset)),
        }
    }

    /// Finalize and return the encoded bytes.
    ///
    /// The buffer is reversed to produce the correct order.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}

impl Default for EncodeBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a value tree into a fresh buffer.
pub fn encode(value: &Value) -> Result<Bytes> {
    let mut buf = EncodeBuf::new();
    buf.push_value(value)?;
    Ok(buf.finish())
}

/// Exact number of octets `value` encodes to.
///
/// Walks and validates the whole tree.
pub fn encoded_len(value: &Value) -> Result<usize> {
    measure(value, &mut Vec::new())
}

/// Stream the encoding of `value` into `sink`.
///
/// Errors from the sink are returned as [`Error::Io`] carrying the sink's
/// own error unchanged.
pub fn encode_to<W: io::Write + ?Sized>(value: &Value, sink: &mut W) -> Result<()> {
    let mut lengths = Vec::new();
    let total = measure(value, &mut lengths)?;
    tracing::trace!(total, tag = ?value.tag(), "streaming BER value to sink");
    write_value(value, &mut lengths.iter().copied(), sink)
}

/// Validate `value` and return its encoded size.
///
/// The content length of every node is pushed onto `lengths` in pre-order,
/// End-of-Contents included for indefinite-length values.
fn measure(value: &Value, lengths: &mut Vec<usize>) -> Result<usize> {
    let tag = header_tag(value)?;
    let slot = lengths.len();
    lengths.push(0);

    let content = match value.content() {
        Content::Bytes(data) => data.len(),
        Content::Children(children) => {
            let mut total = 0;
            for child in children {
                total += measure(child, lengths)?;
            }
            if value.infinite_length() && !ends_with_end_of_contents(children) {
                total += length::END_OF_CONTENTS.len();
            }
            total
        }
        Content::Unset => return Err(invalid_content(ContentProblem::Unset)),
    };
    lengths[slot] = content;

    let length = if value.infinite_length() {
        Length::Indefinite
    } else {
        Length::Definite(content)
    };
    Ok(tag.encoded_len() + length.encoded_len() + content)
}

/// Write `value` using the content lengths recorded by [`measure`].
fn write_value<W, I>(value: &Value, lengths: &mut I, sink: &mut W) -> Result<()>
where
    W: io::Write + ?Sized,
    I: Iterator<Item = usize>,
{
    let tag = header_tag(value)?;
    let content_len = lengths.next().unwrap_or_default();
    let length = if value.infinite_length() {
        Length::Indefinite
    } else {
        Length::Definite(content_len)
    };
    sink.write_all(&tag.to_bytes())?;
    sink.write_all(&length.to_bytes())?;

    match value.content() {
        Content::Bytes(data) => sink.write_all(data)?,
        Content::Children(children) => {
            for child in children {
                write_value(child, lengths, sink)?;
            }
            if length.is_indefinite() && !ends_with_end_of_contents(children) {
                sink.write_all(&length::END_OF_CONTENTS)?;
            }
        }
        Content::Unset => return Err(invalid_content(ContentProblem::Unset)),
    }
    Ok(())
}

/// Validate the encode-time invariants and build the identifier.
fn header_tag(value: &Value) -> Result<Tag> {
    let number = value
        .tag()
        .ok_or_else(|| Error::encode(EncodeErrorKind::MissingTag))?;
    let class = value.tag_class().ok_or_else(Error::missing_tag_class)?;
    let constructed = value.kind().is_constructed();

    match (constructed, value.content()) {
        (true, Content::Children(_)) | (false, Content::Bytes(_)) => {}
        (_, Content::Unset) => return Err(invalid_content(ContentProblem::Unset)),
        (true, Content::Bytes(_)) => {
            return Err(invalid_content(ContentProblem::BytesInConstructed));
        }
        (false, Content::Children(_)) => {
            return Err(invalid_content(ContentProblem::ChildrenInPrimitive));
        }
    }
    if value.infinite_length() && !constructed {
        return Err(Error::encode(EncodeErrorKind::IndefinitePrimitive));
    }
    if let Content::Children(children) = value.content() {
        // End-of-Contents may only close an indefinite-length value.
        let allowed = if value.infinite_length() {
            children.len().saturating_sub(1)
        } else {
            children.len()
        };
        if children[..allowed].iter().any(Value::is_end_of_contents) {
            return Err(invalid_content(ContentProblem::MisplacedEndOfContents));
        }
    }

    Ok(Tag::new(class, constructed, number))
}

fn ends_with_end_of_contents(children: &[Value]) -> bool {
    children.last().is_some_and(Value::is_end_of_contents)
}

fn invalid_content(reason: ContentProblem) -> Error {
    Error::encode(EncodeErrorKind::InvalidContent { reason })
}

/// Encode a signed 64-bit integer in minimal two's-complement form.
///
/// Returns a stack-allocated array and the number of valid bytes.
/// The valid bytes are at the END of the array.
#[inline]
pub(crate) fn encode_integer_stack(value: i64) -> ([u8; 8], usize) {
    let bytes = value.to_be_bytes();

    // Find first significant byte
    let mut start = 0;
    if value >= 0 {
        // For positive/zero, skip leading 0x00 bytes (but keep one if needed for sign)
        while start < 7 && bytes[start] == 0 && bytes[start + 1] & 0x80 == 0 {
            start += 1;
        }
    } else {
        // For negative, skip leading 0xFF bytes (but keep one if needed for sign)
        while start < 7 && bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0 {
            start += 1;
        }
    }

    (bytes, 8 - start)
}
