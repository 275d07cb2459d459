use std::error::Error;
use std::fmt;

/// Failure while decoding the binary container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A read ran past the end of the buffer.
    Truncated { offset: usize, needed: usize },
    /// A fixed tag was not where it should be.
    BadMagic {
        offset: usize,
        expected: String,
        found: String,
    },
    /// A top-level chunk failed to decode; fatal for the whole file.
    BadChunk { chunk: usize, message: String },
    /// The header itself is inconsistent (offset table shorter than it claims).
    BadHeader { message: String },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated { offset, needed } => {
                write!(f, "truncated at offset {offset}: {needed} more bytes needed")
            }
            DecodeError::BadMagic {
                offset,
                expected,
                found,
            } => {
                write!(f, "bad magic at offset {offset}: expected {expected:?}, found {found:?}")
            }
            DecodeError::BadChunk { chunk, message } => {
                write!(f, "chunk {chunk}: {message}")
            }
            DecodeError::BadHeader { message } => write!(f, "bad header: {message}"),
        }
    }
}

impl Error for DecodeError {}

impl DecodeError {
    /// Wrap a chunk-local failure with the logical chunk index.
    pub fn in_chunk(self, chunk: usize) -> Self {
        DecodeError::BadChunk {
            chunk,
            message: self.to_string(),
        }
    }
}

/// Failure while re-encoding a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError {
    pub message: String,
}

impl EncodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encode: {}", self.message)
    }
}

impl Error for EncodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorCode {
    /// The field name itself did not resolve against the field table.
    NoSuchField,
    /// The field exists but its record is absent and cannot be synthesized.
    FieldNotFound,
    /// A fuzzy lookup matched more than one candidate.
    AmbiguousMatch,
    /// The value cannot be parsed or is out of range for the field.
    BadValue,
    /// A string value does not fit its fixed slot.
    TooLong,
}

/// Failure in the named-field accessor layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub code: FieldErrorCode,
    pub message: String,
}

impl FieldError {
    pub fn new(code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for FieldError {}

/// Failure inside a single achievement rule. Never fatal: the evaluator
/// downgrades it to "not unlocked" and keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleError {
    pub message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule: {}", self.message)
    }
}

impl Error for RuleError {}
