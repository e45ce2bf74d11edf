//! # Reply Decoder
//!
//! ## Purpose
//!
//! Turns one captured server-to-client payload into a [`Message`]. The flow is
//! fixed:
//!
//! ```text
//! payload → frame check → reply header → shape resolution → variant body
//!              ↓               ↓              ↓                 ↓
//!          FramingError   xid/zxid/err   registry + table   Message
//! ```
//!
//! Each call is independent and synchronous. A failure drops the current
//! payload only, and never yields a partially built message. Oversized string
//! and buffer fields are not failures: they are replaced with a placeholder
//! and decoding carries on.

use crate::config::DecoderConfig;
use crate::correlation::{resolve, CorrelationTable};
use crate::error::{DecodeError, DecodeResult, RegistryError};
use crate::header::{parse_frame, parse_reply_header, ReplyHeader, BODY_OFFSET};
use crate::message::{Message, Reply, ReplyKind};
use crate::reader::{read_bool, read_buffer, read_i32, read_i64, read_string};
use crate::registry::ReplyRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};
use zk_types::{MultiHeader, NO_XID, NO_ZXID};

/// Stateless reply decoder
///
/// Cheap to clone; the registry and config are shared. One decoder can serve
/// any number of streams as long as each stream brings its own correlation
/// table.
#[derive(Debug, Clone)]
pub struct ReplyDecoder {
    registry: Arc<ReplyRegistry>,
    config: Arc<DecoderConfig>,
}

/// Payload bytes and endpoints for one decode call
struct Payload<'a> {
    data: &'a [u8],
    client: SocketAddr,
    server: SocketAddr,
}

impl ReplyDecoder {
    /// Decoder over the standard registry
    ///
    /// Fails only if the built-in reply kinds claim the same opcode twice.
    pub fn new(config: DecoderConfig) -> Result<Self, RegistryError> {
        Ok(Self::with_registry(ReplyRegistry::standard()?, config))
    }

    pub fn with_registry(registry: ReplyRegistry, config: DecoderConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &ReplyRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one complete reply payload
    ///
    /// Consumes the matching entry from `table` when the xid is not a sentinel.
    /// The entry is consumed even if the body then fails to decode.
    pub fn decode<T: CorrelationTable + ?Sized>(
        &self,
        data: &[u8],
        client: SocketAddr,
        server: SocketAddr,
        table: &mut T,
    ) -> DecodeResult<Message> {
        let offset = parse_frame(data, self.config.max_frame_len)?;
        let (header, offset) = parse_reply_header(data, offset)?;
        let kind = resolve(header.xid, table, &self.registry)?;

        let payload = Payload {
            data,
            client,
            server,
        };
        let msg = self.decode_body(kind, header, &payload, offset)?;
        debug!(
            kind = kind.type_name(),
            xid = msg.xid(),
            zxid = msg.zxid(),
            error = msg.error(),
            server = %msg.server(),
            "decoded reply"
        );
        Ok(msg)
    }

    fn decode_body(
        &self,
        kind: ReplyKind,
        header: ReplyHeader,
        payload: &Payload<'_>,
        offset: usize,
    ) -> DecodeResult<Message> {
        // The handshake body starts right after the length prefix
        if !kind.has_reply_header() {
            return self.decode_connect(payload);
        }

        match kind {
            ReplyKind::WatchEvent => self.decode_watch_event(payload, offset),
            ReplyKind::Connect => self.decode_connect(payload),
            ReplyKind::GetChildren | ReplyKind::GetChildren2 => {
                let count = if header.error == 0 {
                    read_i32(payload.data, offset)?.0
                } else {
                    0
                };
                let reply = if kind == ReplyKind::GetChildren {
                    Reply::GetChildren { count }
                } else {
                    Reply::GetChildren2 { count }
                };
                Ok(reply_message(header, String::new(), payload, reply))
            }
            ReplyKind::Create | ReplyKind::Create2 => {
                let path = if header.error == 0 {
                    self.read_bounded_string(payload.data, offset, "path")?.0
                } else {
                    String::new()
                };
                let reply = if kind == ReplyKind::Create {
                    Reply::Create
                } else {
                    Reply::Create2
                };
                Ok(reply_message(header, path, payload, reply))
            }
            ReplyKind::Multi => {
                // Only the first sub-header of the chain is decoded
                let (opcode, offset) = read_i32(payload.data, offset)?;
                let (done, offset) = read_bool(payload.data, offset)?;
                let (error, _) = read_i32(payload.data, offset)?;
                let first = MultiHeader::new(opcode, done, error);
                Ok(reply_message(header, String::new(), payload, Reply::Multi { first }))
            }
            ReplyKind::Ping => Ok(ack(header, payload, Reply::Ping)),
            ReplyKind::SetAuth => Ok(ack(header, payload, Reply::SetAuth)),
            ReplyKind::GetData => Ok(ack(header, payload, Reply::GetData)),
            ReplyKind::Exists => Ok(ack(header, payload, Reply::Exists)),
            ReplyKind::Sync => Ok(ack(header, payload, Reply::Sync)),
            ReplyKind::SetData => Ok(ack(header, payload, Reply::SetData)),
            ReplyKind::Delete => Ok(ack(header, payload, Reply::Delete)),
            ReplyKind::Close => Ok(ack(header, payload, Reply::Close)),
            ReplyKind::SetWatches => Ok(ack(header, payload, Reply::SetWatches)),
            ReplyKind::RemoveWatches => Ok(ack(header, payload, Reply::RemoveWatches)),
        }
    }

    /// Watch notification: event type, keeper state, path
    ///
    /// Not a reply to anything, so xid and zxid are reported as sentinels and
    /// the error is always 0.
    fn decode_watch_event(&self, payload: &Payload<'_>, offset: usize) -> DecodeResult<Message> {
        let (event_type, offset) = read_i32(payload.data, offset)?;
        let (state, offset) = read_i32(payload.data, offset)?;
        let (path, _) = self.read_bounded_string(payload.data, offset, "path")?;

        Ok(Message::new(
            NO_XID,
            NO_ZXID,
            0,
            path,
            payload.client,
            payload.server,
            Reply::WatchEvent { event_type, state },
        ))
    }

    /// Handshake reply: no reply header, body starts after the length prefix
    ///
    /// Servers that predate read-only mode omit the trailing flag, so a payload
    /// that ends right before it decodes as `read_only = false`.
    fn decode_connect(&self, payload: &Payload<'_>) -> DecodeResult<Message> {
        let data = payload.data;
        let (protocol, offset) = read_i32(data, BODY_OFFSET)?;
        let (timeout, offset) = read_i32(data, offset)?;
        let (session, offset) = read_i64(data, offset)?;
        let (passwd, offset) = self.read_bounded_buffer(data, offset, "passwd")?;
        let read_only = if offset == data.len() {
            false
        } else {
            read_bool(data, offset)?.0
        };

        Ok(Message::new(
            NO_XID,
            NO_ZXID,
            0,
            String::new(),
            payload.client,
            payload.server,
            Reply::Connect {
                protocol,
                timeout,
                session,
                passwd,
                read_only,
            },
        ))
    }

    /// Read a string field, substituting the placeholder when it is oversized
    fn read_bounded_string(
        &self,
        data: &[u8],
        offset: usize,
        field: &'static str,
    ) -> DecodeResult<(String, usize)> {
        match read_string(data, offset, self.config.max_string_len) {
            Err(DecodeError::FieldBounds {
                declared,
                limit,
                resume_offset,
                ..
            }) => {
                warn!(field, declared, limit, "string field over bound, using placeholder");
                Ok((self.config.placeholder.clone(), resume_offset))
            }
            other => other,
        }
    }

    /// Read an opaque buffer, substituting an empty one when it is oversized
    fn read_bounded_buffer(
        &self,
        data: &[u8],
        offset: usize,
        field: &'static str,
    ) -> DecodeResult<(Vec<u8>, usize)> {
        match read_buffer(data, offset, self.config.max_buffer_len) {
            Err(DecodeError::FieldBounds {
                declared,
                limit,
                resume_offset,
                ..
            }) => {
                warn!(field, declared, limit, "buffer field over bound, dropping contents");
                Ok((Vec::new(), resume_offset))
            }
            other => other,
        }
    }
}

fn reply_message(header: ReplyHeader, path: String, payload: &Payload<'_>, reply: Reply) -> Message {
    Message::new(
        header.xid,
        header.zxid,
        header.error,
        path,
        payload.client,
        payload.server,
        reply,
    )
}

/// Reply that carries nothing beyond its header (or whose body is not decoded)
fn ack(header: ReplyHeader, payload: &Payload<'_>, reply: Reply) -> Message {
    reply_message(header, String::new(), payload, reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ReplyBuilder;
    use crate::naming::display_name;
    use std::collections::HashMap;
    use zk_types::{OpCode, PING_XID, WATCH_XID};

    fn endpoints() -> (SocketAddr, SocketAddr) {
        (
            "10.0.0.1:50000".parse().unwrap(),
            "10.0.0.2:2181".parse().unwrap(),
        )
    }

    fn decoder() -> ReplyDecoder {
        ReplyDecoder::new(DecoderConfig::default()).unwrap()
    }

    fn decode(data: &[u8], table: &mut HashMap<i32, OpCode>) -> DecodeResult<Message> {
        let (client, server) = endpoints();
        decoder().decode(data, client, server, table)
    }

    #[test]
    fn test_ack_replies() {
        let cases = [
            (OpCode::SetAuth, ReplyKind::SetAuth),
            (OpCode::Sync, ReplyKind::Sync),
            (OpCode::SetData, ReplyKind::SetData),
            (OpCode::Delete, ReplyKind::Delete),
            (OpCode::SetWatches, ReplyKind::SetWatches),
            (OpCode::GetData, ReplyKind::GetData),
            (OpCode::Exists, ReplyKind::Exists),
            (OpCode::Close, ReplyKind::Close),
            (OpCode::RemoveWatches, ReplyKind::RemoveWatches),
        ];

        for (opcode, kind) in cases {
            let mut table = HashMap::from([(21, opcode)]);
            // Node data / stat bytes after the header are left alone
            let data = ReplyBuilder::reply(21, 300, 0).raw(&[0xAB; 12]).build();

            let msg = decode(&data, &mut table).unwrap();
            assert_eq!(msg.kind(), kind);
            assert_eq!((msg.xid(), msg.zxid(), msg.error()), (21, 300, 0));
            assert_eq!(msg.path(), "");
        }
    }

    #[test]
    fn test_ping_reply_needs_no_table_entry() {
        let mut table = HashMap::new();
        let data = ReplyBuilder::reply(PING_XID, 55, 0).build();

        let msg = decode(&data, &mut table).unwrap();
        assert_eq!(msg.kind(), ReplyKind::Ping);
        assert_eq!(msg.xid(), PING_XID);
        assert_eq!(display_name(&msg), "PingReply");
    }

    #[test]
    fn test_children_count() {
        let mut table = HashMap::from([(3, OpCode::GetChildren)]);
        let data = ReplyBuilder::reply(3, 9, 0).int(4).build();

        let msg = decode(&data, &mut table).unwrap();
        assert_eq!(msg.reply(), &Reply::GetChildren { count: 4 });
    }

    #[test]
    fn test_create_with_error_has_empty_path() {
        let mut table = HashMap::from([(8, OpCode::Create2)]);
        let data = ReplyBuilder::reply(8, 9, -110).string("/ignored").build();

        let msg = decode(&data, &mut table).unwrap();
        assert_eq!(msg.kind(), ReplyKind::Create2);
        assert_eq!(msg.path(), "");
        assert_eq!(display_name(&msg), "FailedCreate2Reply");
    }

    #[test]
    fn test_multi_first_header_only() {
        let mut table = HashMap::from([(12, OpCode::Multi)]);
        let data = ReplyBuilder::reply(12, 77, 0)
            .multi_header(OpCode::Create.code(), false, 0)
            .string("/a")
            .multi_header(-1, true, -1)
            .build();

        let msg = decode(&data, &mut table).unwrap();
        assert_eq!(
            msg.reply(),
            &Reply::Multi {
                first: MultiHeader::new(1, false, 0)
            }
        );
    }

    #[test]
    fn test_watch_event() {
        let mut table = HashMap::new();
        let data = ReplyBuilder::reply(WATCH_XID, -1, 0)
            .int(3)
            .int(3)
            .string("/config")
            .build();

        let msg = decode(&data, &mut table).unwrap();
        assert_eq!(msg.path(), "/config");
        assert_eq!((msg.xid(), msg.zxid(), msg.error()), (-1, -1, 0));
        assert_eq!(
            msg.reply(),
            &Reply::WatchEvent {
                event_type: 3,
                state: 3
            }
        );
        assert_eq!(display_name(&msg), "NodeDataChanged");
    }

    #[test]
    fn test_connect_reply() {
        let mut table = HashMap::from([(0, OpCode::Connect)]);
        let data = ReplyBuilder::connect(0, 30_000, 0x1234_5678_9abc, &[7u8; 16], true).build();

        let msg = decode(&data, &mut table).unwrap();
        match msg.reply() {
            Reply::Connect {
                protocol,
                timeout,
                session,
                passwd,
                read_only,
            } => {
                assert_eq!(*protocol, 0);
                assert_eq!(*timeout, 30_000);
                assert_eq!(*session, 0x1234_5678_9abc);
                assert_eq!(passwd, &vec![7u8; 16]);
                assert!(*read_only);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
        assert_eq!((msg.xid(), msg.zxid(), msg.error()), (NO_XID, NO_ZXID, 0));
        assert_eq!(display_name(&msg), "ConnectReply");
    }

    #[test]
    fn test_connect_reply_without_read_only_flag() {
        let mut table = HashMap::from([(0, OpCode::Connect)]);
        let mut data = ReplyBuilder::connect(0, 4000, 1, &[1u8; 16], true).build();
        data.pop();

        let msg = decode(&data, &mut table).unwrap();
        assert!(matches!(msg.reply(), Reply::Connect { read_only: false, .. }));
    }

    #[test]
    fn test_oversized_password_is_dropped() {
        let config = DecoderConfig {
            max_buffer_len: 8,
            ..DecoderConfig::default()
        };
        let decoder = ReplyDecoder::new(config).unwrap();
        let (client, server) = endpoints();
        let mut table = HashMap::from([(0, OpCode::Connect)]);
        let data = ReplyBuilder::connect(0, 4000, 1, &[1u8; 16], true).build();

        let msg = decoder.decode(&data, client, server, &mut table).unwrap();
        assert!(matches!(
            msg.reply(),
            Reply::Connect { passwd, read_only: true, .. } if passwd.is_empty()
        ));
    }

    #[test]
    fn test_truncated_body_fails_without_partial_message() {
        let mut table = HashMap::from([(4, OpCode::Multi)]);
        let data = ReplyBuilder::reply(4, 1, 0).int(1).build();

        assert!(matches!(
            decode(&data, &mut table),
            Err(DecodeError::Deserialization { .. })
        ));
    }
}
