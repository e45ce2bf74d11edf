//! # Coordination-Service Wire Types
//!
//! Wire-level enumerations shared by the request and reply sides of the
//! coordination-service protocol decoder.
//!
//! ## What This Crate Contains
//! - [`OpCode`]: operation codes with their on-wire `i32` values
//! - Reserved transaction ids ([`WATCH_XID`], [`PING_XID`], ...)
//! - Watch notification enums ([`EventType`], [`KeeperState`])
//! - Server error codes ([`ErrorCode`])
//! - [`MultiHeader`], the sub-operation header of a multi reply
//!
//! ## What This Crate Does NOT Contain
//! - Byte-level parsing (belongs in the codec crate)
//! - Correlation state or capture plumbing

pub mod protocol;

pub use protocol::{
    error_code::ErrorCode,
    multi::MultiHeader,
    opcode::OpCode,
    watch::{EventType, KeeperState},
    xid::{AUTH_XID, NO_XID, NO_ZXID, PING_XID, SET_WATCHES_XID, WATCH_XID},
};
