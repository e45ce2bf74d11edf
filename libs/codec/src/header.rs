//! # Reply Framing
//!
//! Every server-to-client payload starts with an `i32` length prefix. Ordinary
//! replies follow it with a fixed 16-byte header:
//!
//! ```text
//! +--------+--------+------------+--------+---------
//! | length |  xid   |    zxid    |  err   | body...
//! |  i32   |  i32   |    i64     |  i32   |
//! +--------+--------+------------+--------+---------
//! ```
//!
//! The handshake reply is the exception: it has no header, and its body starts
//! right after the length prefix. The decoder still reads the header bytes
//! speculatively because the xid slot is what it uses to resolve the shape.
//! The connect decoder then rewinds to [`BODY_OFFSET`].

use crate::error::{DecodeError, DecodeResult};
use crate::reader::{read_i32, read_i64, INT_SIZE};
use tracing::trace;

/// Offset of the first byte after the length prefix
pub const BODY_OFFSET: usize = INT_SIZE;

/// Size of the standard reply header
pub const REPLY_HEADER_SIZE: usize = 16;

/// Standard reply header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyHeader {
    pub xid: i32,
    pub zxid: i64,
    pub error: i32,
}

/// Validate the outer length prefix and return the offset after it
///
/// Only a non-positive prefix is a framing error unless `max_frame_len` is
/// set. A prefix larger than the captured bytes is accepted. Capture may have
/// cut the tail off, and fields that run past the end fail on their own.
pub fn parse_frame(data: &[u8], max_frame_len: Option<usize>) -> DecodeResult<usize> {
    let (length, offset) = read_i32(data, 0)?;
    if length <= 0 {
        return Err(DecodeError::framing(length));
    }
    if let Some(limit) = max_frame_len {
        if length as usize > limit {
            return Err(DecodeError::frame_too_large(length, limit));
        }
    }
    Ok(offset)
}

/// Parse the standard reply header starting at `offset`
pub fn parse_reply_header(data: &[u8], offset: usize) -> DecodeResult<(ReplyHeader, usize)> {
    let (xid, offset) = read_i32(data, offset)?;
    let (zxid, offset) = read_i64(data, offset)?;
    let (error, offset) = read_i32(data, offset)?;
    trace!(xid, zxid, error, "parsed reply header");
    Ok((ReplyHeader { xid, zxid, error }, offset))
}
