//! Decoded reply records
//!
//! [`Message`] holds the fields every server-to-client message has. [`Reply`]
//! holds the variant-specific payload, one tag per shape. [`ReplyKind`] is the
//! fieldless tag, which is what the opcode registry stores.

use serde::Serialize;
use std::fmt;
use std::net::SocketAddr;
use zk_types::{MultiHeader, OpCode};

/// Shape of a server-to-client message
///
/// Every kind except `WatchEvent` answers exactly one request opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReplyKind {
    WatchEvent,
    Connect,
    Ping,
    SetAuth,
    GetData,
    Exists,
    Sync,
    SetData,
    Delete,
    Close,
    SetWatches,
    RemoveWatches,
    GetChildren,
    GetChildren2,
    Create,
    Create2,
    Multi,
}

impl ReplyKind {
    /// Every declared kind, server-pushed event included
    pub const ALL: [ReplyKind; 17] = [
        ReplyKind::WatchEvent,
        ReplyKind::Connect,
        ReplyKind::Ping,
        ReplyKind::SetAuth,
        ReplyKind::GetData,
        ReplyKind::Exists,
        ReplyKind::Sync,
        ReplyKind::SetData,
        ReplyKind::Delete,
        ReplyKind::Close,
        ReplyKind::SetWatches,
        ReplyKind::RemoveWatches,
        ReplyKind::GetChildren,
        ReplyKind::GetChildren2,
        ReplyKind::Create,
        ReplyKind::Create2,
        ReplyKind::Multi,
    ];

    /// Request opcode this kind answers; `None` for server-pushed events
    pub fn opcode(self) -> Option<OpCode> {
        let op = match self {
            ReplyKind::WatchEvent => return None,
            ReplyKind::Connect => OpCode::Connect,
            ReplyKind::Ping => OpCode::Ping,
            ReplyKind::SetAuth => OpCode::SetAuth,
            ReplyKind::GetData => OpCode::GetData,
            ReplyKind::Exists => OpCode::Exists,
            ReplyKind::Sync => OpCode::Sync,
            ReplyKind::SetData => OpCode::SetData,
            ReplyKind::Delete => OpCode::Delete,
            ReplyKind::Close => OpCode::Close,
            ReplyKind::SetWatches => OpCode::SetWatches,
            ReplyKind::RemoveWatches => OpCode::RemoveWatches,
            ReplyKind::GetChildren => OpCode::GetChildren,
            ReplyKind::GetChildren2 => OpCode::GetChildren2,
            ReplyKind::Create => OpCode::Create,
            ReplyKind::Create2 => OpCode::Create2,
            ReplyKind::Multi => OpCode::Multi,
        };
        Some(op)
    }

    /// Type name used as the default display label
    pub fn type_name(self) -> &'static str {
        match self {
            ReplyKind::WatchEvent => "WatchEvent",
            ReplyKind::Connect => "ConnectReply",
            ReplyKind::Ping => "PingReply",
            ReplyKind::SetAuth => "AuthReply",
            ReplyKind::GetData => "GetDataReply",
            ReplyKind::Exists => "ExistsReply",
            ReplyKind::Sync => "SyncReply",
            ReplyKind::SetData => "SetDataReply",
            ReplyKind::Delete => "DeleteReply",
            ReplyKind::Close => "CloseReply",
            ReplyKind::SetWatches => "SetWatchesReply",
            ReplyKind::RemoveWatches => "RemoveWatchesReply",
            ReplyKind::GetChildren => "GetChildrenReply",
            ReplyKind::GetChildren2 => "GetChildren2Reply",
            ReplyKind::Create => "CreateReply",
            ReplyKind::Create2 => "Create2Reply",
            ReplyKind::Multi => "MultiReply",
        }
    }

    /// Whether decoding this kind reads the standard reply header
    pub fn has_reply_header(self) -> bool {
        self != ReplyKind::Connect
    }
}

/// Variant-specific payload of a decoded message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Reply {
    WatchEvent {
        event_type: i32,
        state: i32,
    },
    Connect {
        protocol: i32,
        timeout: i32,
        session: i64,
        #[serde(serialize_with = "hex_bytes")]
        passwd: Vec<u8>,
        read_only: bool,
    },
    Ping,
    SetAuth,
    GetData,
    Exists,
    Sync,
    SetData,
    Delete,
    Close,
    SetWatches,
    RemoveWatches,
    GetChildren {
        count: i32,
    },
    GetChildren2 {
        count: i32,
    },
    Create,
    Create2,
    Multi {
        first: MultiHeader,
    },
}

fn hex_bytes<S: serde::Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

impl Reply {
    pub fn kind(&self) -> ReplyKind {
        match self {
            Reply::WatchEvent { .. } => ReplyKind::WatchEvent,
            Reply::Connect { .. } => ReplyKind::Connect,
            Reply::Ping => ReplyKind::Ping,
            Reply::SetAuth => ReplyKind::SetAuth,
            Reply::GetData => ReplyKind::GetData,
            Reply::Exists => ReplyKind::Exists,
            Reply::Sync => ReplyKind::Sync,
            Reply::SetData => ReplyKind::SetData,
            Reply::Delete => ReplyKind::Delete,
            Reply::Close => ReplyKind::Close,
            Reply::SetWatches => ReplyKind::SetWatches,
            Reply::RemoveWatches => ReplyKind::RemoveWatches,
            Reply::GetChildren { .. } => ReplyKind::GetChildren,
            Reply::GetChildren2 { .. } => ReplyKind::GetChildren2,
            Reply::Create => ReplyKind::Create,
            Reply::Create2 => ReplyKind::Create2,
            Reply::Multi { .. } => ReplyKind::Multi,
        }
    }
}

/// One decoded server-to-client message
///
/// Immutable once decoded, except for the capture-time metadata (`timestamp`,
/// `auth`) which the caller fills in afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    xid: i32,
    zxid: i64,
    error: i32,
    path: String,
    client: SocketAddr,
    server: SocketAddr,
    timestamp: u64,
    auth: String,
    reply: Reply,
}

impl Message {
    pub(crate) fn new(
        xid: i32,
        zxid: i64,
        error: i32,
        path: String,
        client: SocketAddr,
        server: SocketAddr,
        reply: Reply,
    ) -> Self {
        Self {
            xid,
            zxid,
            error,
            path,
            client,
            server,
            timestamp: 0,
            auth: String::new(),
            reply,
        }
    }

    pub fn xid(&self) -> i32 {
        self.xid
    }

    pub fn zxid(&self) -> i64 {
        self.zxid
    }

    pub fn error(&self) -> i32 {
        self.error
    }

    pub fn is_error(&self) -> bool {
        self.error != 0
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn client(&self) -> SocketAddr {
        self.client
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// Arrival time in nanoseconds; 0 until the caller stamps it
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn auth(&self) -> &str {
        &self.auth
    }

    pub fn reply(&self) -> &Reply {
        &self.reply
    }

    pub fn kind(&self) -> ReplyKind {
        self.reply.kind()
    }

    /// Request opcode this message answers; `None` for watch events
    pub fn opcode(&self) -> Option<OpCode> {
        self.kind().opcode()
    }

    pub fn stamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub fn set_auth(&mut self, auth: impl Into<String>) {
        self.auth = auth.into();
    }

    /// Ancestor of `path` at `level` components deep (`/a/b/c` at 2 is `/a/b`)
    pub fn parent_path(&self, level: usize) -> &str {
        parent_path(&self.path, level)
    }
}

/// Prefix of `path` holding its first `level` components
///
/// Returns the whole path when it is shallower than `level`, and `/` for level 0.
pub fn parent_path(path: &str, level: usize) -> &str {
    if level == 0 {
        return "/";
    }
    match path.match_indices('/').nth(level) {
        Some((idx, _)) => &path[..idx],
        None => path,
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = crate::naming::display_name(self);
        match &self.reply {
            Reply::WatchEvent { state, .. } => write!(
                f,
                "Event{}(state={}, path={}, client={}, server={})",
                name, state, self.path, self.client, self.server
            ),
            Reply::Connect {
                protocol,
                timeout,
                session,
                read_only,
                ..
            } => write!(
                f,
                "{}(ver={}, timeout={}, session={:#x}, readonly={}, server={})",
                name, protocol, timeout, session, read_only, self.server
            ),
            Reply::GetChildren { count } | Reply::GetChildren2 { count } => write!(
                f,
                "{}(xid={}, zxid={}, error={}, count={}, server={})",
                name, self.xid, self.zxid, self.error, count, self.server
            ),
            Reply::Create | Reply::Create2 => write!(
                f,
                "{}(xid={}, zxid={}, error={}, path={}, server={})",
                name, self.xid, self.zxid, self.error, self.path, self.server
            ),
            Reply::Multi { first } => write!(
                f,
                "{}(xid={}, zxid={}, error={}, header={}, server={})",
                name, self.xid, self.zxid, self.error, first, self.server
            ),
            _ => write!(
                f,
                "{}(xid={}, zxid={}, error={}, server={})",
                name, self.xid, self.zxid, self.error, self.server
            ),
        }
    }
}
