//! ASN.1 value model.
//!
//! A [`Value`] is one TLV: a [`Kind`] naming its ASN.1 type, the tag
//! number and class it is encoded with, an indefinite-length flag, and
//! [`Content`] that is either opaque octets (primitive kinds) or an ordered
//! list of owned children (constructed kinds).
//!
//! # Tag defaults
//!
//! There are two construction paths and they default the tag class
//! differently:
//!
//! - **Value only** ([`Value::set`], [`Value::integer`], ...): the kind's
//!   universal tag number with class [`TagClass::Universal`].
//! - **Implicit tagging** ([`Value::implicit`]): the caller supplies the
//!   tag number and the class becomes [`TagClass::ContextSpecific`] unless
//!   set explicitly afterwards with [`Value::with_class`].
//!
//! ```
//! use asn1_ber::{TagClass, Value};
//!
//! let plain = Value::set([Value::integer(1)]);
//! assert_eq!(plain.tag_class(), Some(TagClass::Universal));
//!
//! let tagged = Value::set([Value::integer(1)]).implicit(3);
//! assert_eq!(tagged.tag(), Some(3));
//! assert_eq!(tagged.tag_class(), Some(TagClass::ContextSpecific));
//!
//! let private = Value::set([Value::integer(1)]).implicit(14).with_class(TagClass::Private);
//! assert_eq!(private.encode().unwrap()[0], 0xEE);
//! ```
//!
//! Tag numbers are not validated against the kind: a SET may carry any
//! number, including one reserved for another universal type.

use std::io;

use bytes::Bytes;

use crate::ber::{self, Tag, TagClass, universal};
use crate::error::Result;

/// The ASN.1 type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    /// Terminator of an indefinite-length value.
    EndOfContents,
    Boolean,
    Integer,
    OctetString,
    Null,
    Sequence,
    Set,
    /// Any other primitive encoding; content is opaque.
    Primitive,
    /// Any other constructed encoding.
    Constructed,
}

impl Kind {
    /// Universal tag number used when no tag is supplied.
    pub const fn default_tag(self) -> Option<u32> {
        match self {
            Kind::EndOfContents => Some(universal::END_OF_CONTENTS),
            Kind::Boolean => Some(universal::BOOLEAN),
            Kind::Integer => Some(universal::INTEGER),
            Kind::OctetString => Some(universal::OCTET_STRING),
            Kind::Null => Some(universal::NULL),
            Kind::Sequence => Some(universal::SEQUENCE),
            Kind::Set => Some(universal::SET),
            Kind::Primitive | Kind::Constructed => None,
        }
    }

    /// Whether values of this kind hold children.
    pub const fn is_constructed(self) -> bool {
        matches!(self, Kind::Sequence | Kind::Set | Kind::Constructed)
    }

    /// Kind for a decoded universal tag.
    pub const fn from_universal(number: u32, constructed: bool) -> Self {
        match (number, constructed) {
            (universal::BOOLEAN, false) => Kind::Boolean,
            (universal::INTEGER, false) => Kind::Integer,
            (universal::OCTET_STRING, false) => Kind::OctetString,
            (universal::NULL, false) => Kind::Null,
            (universal::SEQUENCE, true) => Kind::Sequence,
            (universal::SET, true) => Kind::Set,
            (_, true) => Kind::Constructed,
            (_, false) => Kind::Primitive,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Kind::EndOfContents => "END OF CONTENTS",
            Kind::Boolean => "BOOLEAN",
            Kind::Integer => "INTEGER",
            Kind::OctetString => "OCTET STRING",
            Kind::Null => "NULL",
            Kind::Sequence => "SEQUENCE",
            Kind::Set => "SET",
            Kind::Primitive => "PRIMITIVE",
            Kind::Constructed => "CONSTRUCTED",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Content {
    /// Nothing assigned yet. Encoding fails until content is set.
    #[default]
    Unset,
    /// Primitive content octets.
    Bytes(Bytes),
    /// Constructed content, in encoding order.
    Children(Vec<Value>),
}

/// Truthiness used when assigning the indefinite-length flag.
///
/// Only `false` and `None` are false. Numbers, strings and values count as
/// present and therefore true, zero and the empty string included.
///
/// ```
/// use asn1_ber::{Kind, Value};
///
/// let mut value = Value::new(Kind::Set);
/// value.set_infinite_length("yes");
/// assert!(value.infinite_length());
/// value.set_infinite_length(None::<u8>);
/// assert!(!value.infinite_length());
/// value.set_infinite_length(0);
/// assert!(value.infinite_length());
/// ```
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

macro_rules! always_truthy {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Truthy for $ty {
                fn is_truthy(&self) -> bool {
                    true
                }
            }
        )*
    };
}

always_truthy!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char, str, String, Value,
);

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

/// An ASN.1 value: one TLV and, for constructed kinds, its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    kind: Kind,
    tag: Option<u32>,
    tag_class: Option<TagClass>,
    infinite_length: bool,
    content: Content,
}

impl Value {
    /// A value of `kind` with its default tag and no content.
    ///
    /// NULL and End-of-Contents start with empty content; every other kind
    /// must be given content before it can be encoded.
    pub fn new(kind: Kind) -> Self {
        let content = match kind {
            Kind::Null | Kind::EndOfContents => Content::Bytes(Bytes::new()),
            _ => Content::Unset,
        };
        Self {
            kind,
            tag: kind.default_tag(),
            tag_class: Some(TagClass::Universal),
            infinite_length: false,
            content,
        }
    }

    fn with_children<I>(kind: Kind, children: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut value = Self::new(kind);
        value.set_children(children);
        value
    }

    fn with_bytes(kind: Kind, content: impl Into<Bytes>) -> Self {
        let mut value = Self::new(kind);
        value.set_bytes(content);
        value
    }

    /// SEQUENCE of the given children.
    ///
    /// Any iterator is accepted and collected, preserving order.
    pub fn sequence<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::with_children(Kind::Sequence, children)
    }

    /// SET of the given children.
    ///
    /// Children keep their source order; no sorting or de-duplication
    /// takes place.
    pub fn set<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::with_children(Kind::Set, children)
    }

    pub fn octet_string(content: impl Into<Bytes>) -> Self {
        Self::with_bytes(Kind::OctetString, content)
    }

    /// INTEGER in minimal two's-complement form.
    pub fn integer(value: i64) -> Self {
        let (arr, len) = ber::encode_integer_stack(value);
        Self::with_bytes(Kind::Integer, Bytes::copy_from_slice(&arr[8 - len..]))
    }

    /// BOOLEAN in DER form (0xFF for true).
    pub fn boolean(value: bool) -> Self {
        Self::with_bytes(Kind::Boolean, Bytes::from_static(if value { &[0xFF] } else { &[0x00] }))
    }

    pub fn null() -> Self {
        Self::new(Kind::Null)
    }

    pub fn end_of_contents() -> Self {
        Self::new(Kind::EndOfContents)
    }

    /// Primitive value with an explicit tag and opaque content.
    pub fn primitive(tag: u32, class: TagClass, content: impl Into<Bytes>) -> Self {
        Self::with_bytes(Kind::Primitive, content)
            .implicit(tag)
            .with_class(class)
    }

    /// Constructed value with an explicit tag.
    pub fn constructed<I>(tag: u32, class: TagClass, children: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::with_children(Kind::Constructed, children)
            .implicit(tag)
            .with_class(class)
    }

    pub(crate) fn from_decoded(tag: Tag, infinite_length: bool, content: Content) -> Self {
        let kind = match tag.class {
            TagClass::Universal => Kind::from_universal(tag.number, tag.constructed),
            _ if tag.constructed => Kind::Constructed,
            _ => Kind::Primitive,
        };
        Self {
            kind,
            tag: Some(tag.number),
            tag_class: Some(tag.class),
            infinite_length,
            content,
        }
    }

    /// Implicitly tag this value: replace the tag number and make the class
    /// context-specific.
    pub fn implicit(mut self, tag: u32) -> Self {
        self.tag = Some(tag);
        self.tag_class = Some(TagClass::ContextSpecific);
        self
    }

    /// Replace the tag class.
    pub fn with_class(mut self, class: TagClass) -> Self {
        self.tag_class = Some(class);
        self
    }

    /// Use indefinite-length encoding.
    pub fn indefinite(mut self) -> Self {
        self.infinite_length = true;
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn tag(&self) -> Option<u32> {
        self.tag
    }

    pub fn tag_class(&self) -> Option<TagClass> {
        self.tag_class
    }

    pub fn infinite_length(&self) -> bool {
        self.infinite_length
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn is_constructed(&self) -> bool {
        self.kind.is_constructed()
    }

    /// Whether this value encodes as the End-of-Contents octets `00 00`.
    ///
    /// Decided by the identifier and content, not the kind: a retagged
    /// End-of-Contents value is an ordinary value, and any universal
    /// primitive with tag 0 and no content is a terminator.
    pub fn is_end_of_contents(&self) -> bool {
        self.tag == Some(universal::END_OF_CONTENTS)
            && self.tag_class == Some(TagClass::Universal)
            && !self.kind.is_constructed()
            && !self.infinite_length
            && matches!(&self.content, Content::Bytes(bytes) if bytes.is_empty())
    }

    /// Children, if the content is a child list.
    pub fn children(&self) -> Option<&[Value]> {
        match &self.content {
            Content::Children(children) => Some(children),
            _ => None,
        }
    }

    /// Primitive content octets.
    pub fn bytes(&self) -> Option<&Bytes> {
        match &self.content {
            Content::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Content of an OCTET STRING.
    pub fn as_octets(&self) -> Option<&[u8]> {
        match self.kind {
            Kind::OctetString => self.bytes().map(|b| &b[..]),
            _ => None,
        }
    }

    /// Content of an INTEGER that fits in 64 bits.
    pub fn as_integer(&self) -> Option<i64> {
        match self.kind {
            Kind::Integer => self.bytes().and_then(|b| ber::decode_integer(b)),
            _ => None,
        }
    }

    /// Content of a one-octet BOOLEAN (any non-zero octet is true).
    pub fn as_bool(&self) -> Option<bool> {
        match (self.kind, self.bytes().map(|b| &b[..])) {
            (Kind::Boolean, Some([octet])) => Some(*octet != 0),
            _ => None,
        }
    }

    pub fn set_tag(&mut self, tag: impl Into<Option<u32>>) {
        self.tag = tag.into();
    }

    pub fn set_tag_class(&mut self, class: impl Into<Option<TagClass>>) {
        self.tag_class = class.into();
    }

    /// Set the tag class from its name, e.g. `"APPLICATION"`.
    ///
    /// Unknown names fail with [`Error::InvalidTagClass`](crate::Error::InvalidTagClass)
    /// and leave the class unchanged.
    pub fn set_tag_class_name(&mut self, name: &str) -> Result<()> {
        self.tag_class = Some(name.parse()?);
        Ok(())
    }

    pub fn set_infinite_length(&mut self, flag: impl Truthy) {
        self.infinite_length = flag.is_truthy();
    }

    /// Replace the content with the given children.
    ///
    /// The iterator is drained once and its items stored in order.
    pub fn set_children<I>(&mut self, children: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.content = Content::Children(children.into_iter().collect());
    }

    /// Replace the content with raw octets.
    pub fn set_bytes(&mut self, content: impl Into<Bytes>) {
        self.content = Content::Bytes(content.into());
    }

    pub fn set_content(&mut self, content: Content) {
        self.content = content;
    }

    /// Iterate over children in order. Primitive and unset values yield nothing.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.children().unwrap_or(&[]).iter()
    }

    /// Encode to a new buffer.
    pub fn encode(&self) -> Result<Bytes> {
        ber::encode(self)
    }

    /// Encode into `sink`, returning `self` for chaining.
    ///
    /// Errors raised by the sink are returned unchanged as
    /// [`Error::Io`](crate::Error::Io).
    pub fn encode_to<W: io::Write + ?Sized>(&self, sink: &mut W) -> Result<&Self> {
        ber::encode_to(self, sink)?;
        Ok(self)
    }

    /// Exact encoded size in octets.
    pub fn encoded_len(&self) -> Result<usize> {
        ber::encoded_len(self)
    }
}

impl<'a> IntoIterator for &'a Value {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [", self.kind)?;
        match self.tag_class {
            Some(class) => write!(f, "{} ", class)?,
            None => write!(f, "? ")?,
        }
        match self.tag {
            Some(tag) => write!(f, "{}]", tag)?,
            None => write!(f, "?]")?,
        }
        match &self.content {
            Content::Unset => write!(f, " (unset)"),
            Content::Bytes(bytes) => write!(f, " ({} bytes)", bytes.len()),
            Content::Children(children) => {
                let form = if self.infinite_length { ", indefinite" } else { "" };
                write!(f, " ({} elem{})", children.len(), form)
            }
        }
    }
}
