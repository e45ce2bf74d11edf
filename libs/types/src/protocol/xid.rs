//! Reserved transaction ids
//!
//! Client-assigned xids are positive and increase per session. The server and
//! client libraries reserve a few negative values for exchanges that are not
//! ordinary request/reply pairs.

/// Xid carried by server-pushed watch notifications
pub const WATCH_XID: i32 = -1;

/// Xid carried by keepalive pings and their replies
pub const PING_XID: i32 = -2;

/// Xid carried by auth packets
pub const AUTH_XID: i32 = -4;

/// Xid carried by the set-watches packet sent on reconnect
pub const SET_WATCHES_XID: i32 = -8;

/// Xid reported for messages that never carry a real transaction id
pub const NO_XID: i32 = -1;

/// Zxid reported for messages that never carry a server transaction id
pub const NO_ZXID: i64 = -1;
