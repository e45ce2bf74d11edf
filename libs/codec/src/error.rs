//! Decode errors for reply processing
//!
//! Every variant carries enough context (offset, sizes, xid) to log a useful
//! line for a skipped message. None of them is fatal to the caller: a failed
//! decode drops one payload and the stream carries on.

use thiserror::Error;
use zk_types::OpCode;

/// Failure to decode a single reply payload
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Outer length prefix is non-positive, or larger than an opt-in frame bound
    #[error("Bad reply length {length}{}", limit_hint(.limit))]
    Framing { length: i32, limit: Option<usize> },

    /// No pending request is recorded for this xid, so the reply shape is unknown
    #[error("No pending request for xid={xid}{}", opcode_hint(.opcode))]
    UnresolvedRequest { xid: i32, opcode: Option<OpCode> },

    /// Length-prefixed field declares more bytes than its configured bound
    ///
    /// `resume_offset` is where the next field starts if the offending field is
    /// skipped, clamped to the end of the buffer.
    #[error("Field '{field}' at offset {offset} declares {declared} bytes, limit is {limit}")]
    FieldBounds {
        field: &'static str,
        offset: usize,
        declared: usize,
        limit: usize,
        resume_offset: usize,
    },

    /// Structurally invalid payload: truncated fields, bad encodings
    #[error("Deserialization failed at byte {offset}: {description} (buffer: {buffer_size} bytes)")]
    Deserialization {
        offset: usize,
        description: String,
        buffer_size: usize,
    },
}

fn limit_hint(limit: &Option<usize>) -> String {
    match limit {
        Some(limit) => format!(" (limit {})", limit),
        None => String::new(),
    }
}

fn opcode_hint(opcode: &Option<OpCode>) -> String {
    match opcode {
        Some(op) => format!(" (request opcode {} has no reply shape)", op),
        None => String::new(),
    }
}

impl DecodeError {
    /// Non-positive length prefix
    pub fn framing(length: i32) -> Self {
        Self::Framing {
            length,
            limit: None,
        }
    }

    /// Length prefix above the configured `max_frame_len`
    pub fn frame_too_large(length: i32, limit: usize) -> Self {
        Self::Framing {
            length,
            limit: Some(limit),
        }
    }

    /// Xid was never recorded, or was already consumed by an earlier reply
    pub fn unresolved(xid: i32) -> Self {
        Self::UnresolvedRequest { xid, opcode: None }
    }

    /// Xid was recorded, but its request opcode has no registered reply shape
    pub fn unhandled_opcode(xid: i32, opcode: OpCode) -> Self {
        Self::UnresolvedRequest {
            xid,
            opcode: Some(opcode),
        }
    }

    /// Read of `need` bytes at `offset` runs past the end of the buffer
    pub fn truncated(offset: usize, need: usize, buffer_size: usize, field: &str) -> Self {
        Self::Deserialization {
            offset,
            description: format!(
                "need {} bytes for {}, {} available",
                need,
                field,
                buffer_size.saturating_sub(offset)
            ),
            buffer_size,
        }
    }

    pub fn malformed(offset: usize, description: impl Into<String>, buffer_size: usize) -> Self {
        Self::Deserialization {
            offset,
            description: description.into(),
            buffer_size,
        }
    }

    /// Short stable name for counting failures by kind
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::Framing { .. } => "framing",
            DecodeError::UnresolvedRequest { .. } => "unresolved_request",
            DecodeError::FieldBounds { .. } => "field_bounds",
            DecodeError::Deserialization { .. } => "deserialization",
        }
    }
}

/// Failure while assembling the opcode registry at startup
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate reply shape for opcode {opcode}: {existing} already registered, {rejected} rejected")]
    DuplicateOpcode {
        opcode: OpCode,
        existing: &'static str,
        rejected: &'static str,
    },
}

/// Invalid decoder configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for decode operations
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
