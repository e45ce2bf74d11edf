//! # Reply Payload Builder
//!
//! Assembles server-to-client payloads byte for byte, length prefix included.
//! Used by tests and by tooling that needs synthetic captures; the decoder
//! itself never builds payloads.
//!
//! ```
//! use zk_codec::ReplyBuilder;
//!
//! let payload = ReplyBuilder::reply(5, 0x100, 0).string("/foo").build();
//! assert_eq!(&payload[..4], &24i32.to_be_bytes());
//! ```

use zk_types::MultiHeader;

/// Builder for a single framed reply payload
#[derive(Debug, Clone, Default)]
pub struct ReplyBuilder {
    body: Vec<u8>,
    length_override: Option<i32>,
}

impl ReplyBuilder {
    /// Payload with no header; callers add every field themselves
    pub fn empty() -> Self {
        Self::default()
    }

    /// Payload starting with a standard reply header
    pub fn reply(xid: i32, zxid: i64, error: i32) -> Self {
        Self::empty().int(xid).long(zxid).int(error)
    }

    /// Handshake reply body (no reply header)
    pub fn connect(protocol: i32, timeout: i32, session: i64, passwd: &[u8], read_only: bool) -> Self {
        Self::empty()
            .int(protocol)
            .int(timeout)
            .long(session)
            .buffer(passwd)
            .bool(read_only)
    }

    pub fn int(mut self, value: i32) -> Self {
        self.body.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn long(mut self, value: i64) -> Self {
        self.body.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn bool(mut self, value: bool) -> Self {
        self.body.push(u8::from(value));
        self
    }

    pub fn string(self, value: &str) -> Self {
        self.buffer(value.as_bytes())
    }

    /// Length-prefixed byte buffer
    pub fn buffer(self, value: &[u8]) -> Self {
        self.int(value.len() as i32).raw(value)
    }

    /// Length prefix claiming `declared` bytes, followed by `value` as-is
    pub fn declared_buffer(self, declared: i32, value: &[u8]) -> Self {
        self.int(declared).raw(value)
    }

    pub fn multi_header(self, opcode: i32, done: bool, error: i32) -> Self {
        self.int(opcode).bool(done).int(error)
    }

    pub fn multi(self, header: MultiHeader) -> Self {
        self.multi_header(header.opcode, header.done, header.error)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    /// Write `length` as the prefix instead of the real body length
    pub fn with_length(mut self, length: i32) -> Self {
        self.length_override = Some(length);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let length = self
            .length_override
            .unwrap_or_else(|| self.body.len() as i32);
        let mut out = Vec::with_capacity(4 + self.body.len());
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&self.body);
        out
    }
}
