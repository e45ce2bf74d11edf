//! Replay of capture records through the decoder
//!
//! Each `(client, server)` connection gets its own correlation table, so xids
//! reused across connections never collide.

use crate::capture::CaptureRecord;
use crate::stats::Stats;
use std::collections::HashMap;
use std::net::SocketAddr;
use tracing::{debug, trace, warn};
use zk_codec::{CorrelationTable, DecodeError, Message, ReplyDecoder};
use zk_types::OpCode;

type StreamKey = (SocketAddr, SocketAddr);

/// What happened to one capture record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Request recorded in its connection's table
    Recorded,
    /// Record ignored: pings and unknown request opcodes
    Ignored,
    Decoded(Box<Message>),
    Failed(DecodeError),
}

pub struct Inspector {
    decoder: ReplyDecoder,
    streams: HashMap<StreamKey, HashMap<i32, OpCode>>,
    stats: Stats,
}

impl Inspector {
    pub fn new(decoder: ReplyDecoder) -> Self {
        Self {
            decoder,
            streams: HashMap::new(),
            stats: Stats::new(),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Requests still waiting for a reply across all connections
    pub fn pending(&self) -> usize {
        self.streams.values().map(|table| table.pending()).sum()
    }

    /// Count a capture line that could not be parsed
    pub fn skip_unreadable(&mut self) {
        self.stats.record_skip();
    }

    pub fn handle(&mut self, record: CaptureRecord) -> Outcome {
        let stream = record.stream();
        match record {
            CaptureRecord::Request { xid, opcode, .. } => self.handle_request(stream, xid, opcode),
            CaptureRecord::Reply {
                payload,
                timestamp,
                auth,
                ..
            } => self.handle_reply(stream, &payload, timestamp, auth),
        }
    }

    fn handle_request(&mut self, stream: StreamKey, xid: i32, opcode: i32) -> Outcome {
        let opcode = match OpCode::try_from(opcode) {
            Ok(op) => op,
            Err(_) => {
                warn!(xid, opcode, client = %stream.0, "unknown request opcode, not recorded");
                self.stats.record_skip();
                return Outcome::Ignored;
            }
        };

        self.stats.record_request();
        // Ping replies resolve through the reserved xid, never the table
        if opcode == OpCode::Ping {
            trace!(xid, client = %stream.0, "ping request");
            return Outcome::Ignored;
        }

        self.streams.entry(stream).or_default().record(xid, opcode);
        Outcome::Recorded
    }

    fn handle_reply(
        &mut self,
        stream: StreamKey,
        payload: &[u8],
        timestamp: u64,
        auth: String,
    ) -> Outcome {
        let (client, server) = stream;
        let table = self.streams.entry(stream).or_default();

        match self.decoder.decode(payload, client, server, table) {
            Ok(mut msg) => {
                msg.stamp(timestamp);
                msg.set_auth(auth);
                self.stats.record_message(&msg);
                Outcome::Decoded(Box::new(msg))
            }
            Err(err) => {
                warn!(
                    error = %err,
                    kind = err.kind(),
                    %client,
                    %server,
                    bytes = payload.len(),
                    "skipping reply"
                );
                self.stats.record_failure(&err);
                Outcome::Failed(err)
            }
        }
    }

    /// Drop correlation state for connections with nothing pending
    pub fn prune(&mut self) {
        let before = self.streams.len();
        self.streams.retain(|_, table| table.pending() > 0);
        debug!(removed = before - self.streams.len(), "pruned idle streams");
    }
}
