use std::fmt::{Display, Formatter, self};

/// A `DecodeError` annotated with the number of bytes consumed before it occurred.
#[derive(Debug)]
pub struct DecoderError {
    inner: DecodeError,
    at: usize,
}

impl DecoderError {
    pub fn into_inner(self) -> DecodeError {
        self.inner
    }

    pub fn position(&self) -> usize {
        self.at
    }
}

impl std::error::Error for DecoderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
       Some(&self.inner)
    }
}

impl Display for DecoderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} at input position {}", self.inner, self.at)
    }
}

#[derive(Debug)]
pub enum DecodeError {
    /// The stream returned zero bytes before the requested width was satisfied.
    Eof { read: usize, left: usize },
    Io(std::io::Error),
    Utf8(std::str::Utf8Error),
    /// A length prefix was negative.
    Length(i32),
    /// A UTF-16 code unit was a lone surrogate.
    InvalidChar(u16),
    DuplicateKey,
    Allocation,
    Trailing(usize),
    /// A decoded value has no meaning for its field, such as an unknown enum discriminant. Raised
    /// by record code; the name identifies the field or kind.
    Invalid(&'static str),
}

impl DecodeError {
    pub fn at(self, at: usize) -> DecoderError {
        DecoderError { inner: self, at }
    }

    /// Whether this error signals truncated input rather than malformed input.
    pub fn is_eof(&self) -> bool {
        matches!(self, DecodeError::Eof { .. })
    }
}

impl From<std::str::Utf8Error> for DecodeError {
    fn from(e: std::str::Utf8Error) -> DecodeError {
        DecodeError::Utf8(e)
    }
}

impl From<std::string::FromUtf8Error> for DecodeError {
    fn from(e: std::string::FromUtf8Error) -> DecodeError {
        DecodeError::Utf8(e.utf8_error())
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> DecodeError {
        DecodeError::Io(e)
    }
}

impl From<std::collections::TryReserveError> for DecodeError {
    fn from(_e: std::collections::TryReserveError) -> DecodeError {
        DecodeError::Allocation
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Io(e) => Some(e),
            DecodeError::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            DecodeError::Eof { read, left } => write!(f, "Unexpected end of stream: 0x{:X} bytes read, 0x{:X} left", read, left),
            DecodeError::Io(e) => write!(f, "IO error {}", e),
            DecodeError::Utf8(e) => write!(f, "String bytes were not valid Utf-8: {}", e),
            DecodeError::Length(value) => write!(f, "Length prefix {} is negative", value),
            DecodeError::InvalidChar(unit) => write!(f, "Code unit 0x{:04X} is not a scalar value", unit),
            DecodeError::DuplicateKey => f.write_str("Duplicate key in map"),
            DecodeError::Allocation => f.write_str("An allocation failed"),
            DecodeError::Trailing(count) => write!(f, "{} trailing bytes after value", count),
            DecodeError::Invalid(what) => write!(f, "Invalid value for {}", what),
        }
    }
}

#[derive(Debug)]
pub enum EncodeError {
    Io(std::io::Error),
    /// A string or container is too long for an int32 length prefix.
    Length(usize),
    /// The char needs a surrogate pair and has no single UTF-16 code unit.
    CharRange(char),
}

impl From<std::io::Error> for EncodeError {
    fn from(e: std::io::Error) -> EncodeError {
        EncodeError::Io(e)
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            EncodeError::Io(e) => write!(f, "IO error {}", e),
            EncodeError::Length(value) => write!(f, "Length {} exceeds maximum {}", value, i32::MAX),
            EncodeError::CharRange(c) => write!(f, "Char {:?} does not fit into one UTF-16 code unit", c),
        }
    }
}
