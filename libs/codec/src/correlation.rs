//! # Reply Correlation
//!
//! Replies do not say what they are. The only link back to the request is the
//! xid, so the request side records `xid → opcode` for every outstanding
//! request and the reply side consumes that entry when the answer arrives.
//!
//! The table belongs to the caller, one per monitored stream. The decoder only
//! needs an atomic take-and-remove on it.

use crate::error::{DecodeError, DecodeResult};
use crate::message::ReplyKind;
use crate::registry::ReplyRegistry;
use dashmap::DashMap;
use std::collections::HashMap;
use tracing::trace;
use zk_types::{OpCode, PING_XID, WATCH_XID};

/// Pending requests of one stream, keyed by xid
pub trait CorrelationTable {
    /// Remember that request `xid` was an `opcode` request
    fn record(&mut self, xid: i32, opcode: OpCode);

    /// Remove and return the pending opcode for `xid`
    ///
    /// After this returns `Some`, the same xid resolves to nothing until the
    /// request side records it again.
    fn take(&mut self, xid: i32) -> Option<OpCode>;

    fn pending(&self) -> usize;
}

impl CorrelationTable for HashMap<i32, OpCode> {
    fn record(&mut self, xid: i32, opcode: OpCode) {
        self.insert(xid, opcode);
    }

    fn take(&mut self, xid: i32) -> Option<OpCode> {
        self.remove(&xid)
    }

    fn pending(&self) -> usize {
        self.len()
    }
}

impl CorrelationTable for DashMap<i32, OpCode> {
    fn record(&mut self, xid: i32, opcode: OpCode) {
        self.insert(xid, opcode);
    }

    fn take(&mut self, xid: i32) -> Option<OpCode> {
        self.remove(&xid).map(|(_, opcode)| opcode)
    }

    fn pending(&self) -> usize {
        self.len()
    }
}

/// Shared handle: `DashMap::remove` is atomic per key, so two threads racing on
/// the same xid cannot both get the entry.
impl CorrelationTable for &DashMap<i32, OpCode> {
    fn record(&mut self, xid: i32, opcode: OpCode) {
        self.insert(xid, opcode);
    }

    fn take(&mut self, xid: i32) -> Option<OpCode> {
        self.remove(&xid).map(|(_, opcode)| opcode)
    }

    fn pending(&self) -> usize {
        self.len()
    }
}

/// Work out which reply shape decodes the message carrying `xid`
///
/// Watch notifications and pings are never recorded by the request side, so
/// their sentinels short-circuit the table. Anything else consumes its entry,
/// even if the recorded opcode turns out to have no reply shape.
pub fn resolve<T: CorrelationTable + ?Sized>(
    xid: i32,
    table: &mut T,
    registry: &ReplyRegistry,
) -> DecodeResult<ReplyKind> {
    match xid {
        WATCH_XID => Ok(ReplyKind::WatchEvent),
        PING_XID => Ok(ReplyKind::Ping),
        _ => {
            let opcode = table.take(xid).ok_or_else(|| DecodeError::unresolved(xid))?;
            trace!(xid, opcode = %opcode, "matched pending request");
            registry
                .lookup(opcode)
                .ok_or_else(|| DecodeError::unhandled_opcode(xid, opcode))
        }
    }
}
