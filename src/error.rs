//! Error types for asn1-ber.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// Input ended in the middle of a tag, length or content.
    TruncatedInput,
    /// Reserved length octet (0xFF).
    MalformedLength,
    /// Indefinite length on a primitive encoding.
    IndefinitePrimitive,
    /// Input ended inside an indefinite-length value before End-of-Contents.
    UnterminatedIndefinite,
    /// High tag number does not fit in 32 bits.
    TagNumberOverflow,
    /// Length field does not fit in a machine word.
    LengthTooLong { octets: usize },
    /// Length exceeds the configured maximum.
    LengthExceedsMax { length: usize, max: usize },
    /// Constructed values nested deeper than the configured maximum.
    DepthExceeded { max: usize },
    /// End-of-Contents inside a definite-length value.
    MisplacedEndOfContents,
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TruncatedInput => write!(f, "unexpected end of data"),
            Self::MalformedLength => write!(f, "reserved length octet 0xFF"),
            Self::IndefinitePrimitive => {
                write!(f, "indefinite length on a primitive encoding")
            }
            Self::UnterminatedIndefinite => {
                write!(f, "indefinite-length value not terminated by End-of-Contents")
            }
            Self::TagNumberOverflow => write!(f, "tag number exceeds 32 bits"),
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::DepthExceeded { max } => {
                write!(f, "nesting depth exceeds maximum {}", max)
            }
            Self::MisplacedEndOfContents => {
                write!(f, "End-of-Contents inside a definite-length value")
            }
        }
    }
}

/// BER encode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeErrorKind {
    /// Value has no tag number.
    MissingTag,
    /// Content does not match the value's structure.
    InvalidContent { reason: ContentProblem },
    /// Indefinite length requested for a primitive value.
    IndefinitePrimitive,
}

impl std::fmt::Display for EncodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTag => write!(f, "tag is not set"),
            Self::InvalidContent { reason } => write!(f, "invalid content: {}", reason),
            Self::IndefinitePrimitive => {
                write!(f, "indefinite length is only allowed on constructed values")
            }
        }
    }
}

/// Why a value's content could not be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentProblem {
    /// No content was ever assigned.
    Unset,
    /// A constructed value holds raw bytes instead of child values.
    BytesInConstructed,
    /// A primitive value holds child values instead of raw bytes.
    ChildrenInPrimitive,
    /// End-of-Contents anywhere but last in an indefinite-length value.
    MisplacedEndOfContents,
}

impl std::fmt::Display for ContentProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, "content is not set"),
            Self::BytesInConstructed => write!(f, "constructed value holds raw bytes"),
            Self::ChildrenInPrimitive => write!(f, "primitive value holds child values"),
            Self::MisplacedEndOfContents => {
                write!(f, "End-of-Contents is only allowed last in an indefinite-length value")
            }
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error raised by the caller's sink or source.
    ///
    /// The underlying error is passed through as-is.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Tag class is unset or not a recognized class name.
    #[error("invalid tag class{}", input.as_ref().map(|s| format!(": {:?}", s)).unwrap_or_default())]
    InvalidTagClass {
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// BER decoding error.
    #[error("decode error at offset {offset}: {kind}")]
    Decode {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// BER encoding error.
    #[error("encode error: {kind}")]
    Encode { kind: EncodeErrorKind },
}

impl Error {
    /// Create a decode error.
    pub fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::Decode { offset, kind }
    }

    /// Create an encode error.
    pub fn encode(kind: EncodeErrorKind) -> Self {
        Self::Encode { kind }
    }

    /// Create an invalid tag class error for an unset class.
    pub fn missing_tag_class() -> Self {
        Self::InvalidTagClass { input: None }
    }

    /// Create an invalid tag class error with the input string that failed.
    pub fn invalid_tag_class(input: impl Into<Box<str>>) -> Self {
        Self::InvalidTagClass {
            input: Some(input.into()),
        }
    }

    /// The decode error kind, if this is a decode error.
    pub fn decode_kind(&self) -> Option<DecodeErrorKind> {
        match self {
            Self::Decode { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The encode error kind, if this is an encode error.
    pub fn encode_kind(&self) -> Option<EncodeErrorKind> {
        match self {
            Self::Encode { kind } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = Error::decode(4, DecodeErrorKind::TruncatedInput);
        assert_eq!(err.to_string(), "decode error at offset 4: unexpected end of data");

        let err = Error::decode(
            1,
            DecodeErrorKind::LengthExceedsMax {
                length: 4096,
                max: 1024,
            },
        );
        assert_eq!(
            err.to_string(),
            "decode error at offset 1: length 4096 exceeds maximum 1024"
        );
    }

    #[test]
    fn test_encode_error_display() {
        let err = Error::encode(EncodeErrorKind::InvalidContent {
            reason: ContentProblem::Unset,
        });
        assert_eq!(err.to_string(), "encode error: invalid content: content is not set");
    }

    #[test]
    fn test_invalid_tag_class_display() {
        assert_eq!(Error::missing_tag_class().to_string(), "invalid tag class");
        assert_eq!(
            Error::invalid_tag_class("no_such_class").to_string(),
            "invalid tag class: \"no_such_class\""
        );
    }

    #[test]
    fn test_io_error_is_passed_through() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "sink closed");
        let err = Error::from(io);
        match err {
            Error::Io { source } => {
                assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
                assert_eq!(source.to_string(), "sink closed");
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_kind_accessors() {
        let err = Error::encode(EncodeErrorKind::MissingTag);
        assert_eq!(err.encode_kind(), Some(EncodeErrorKind::MissingTag));
        assert_eq!(err.decode_kind(), None);
    }
}
