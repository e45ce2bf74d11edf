//! Capture file records
//!
//! The sniffer side writes one JSON object per captured payload. Reply
//! payloads are the raw bytes off the wire, length prefix included, hex
//! encoded.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::io::BufRead;
use std::net::SocketAddr;
use thiserror::Error;

/// One captured event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureRecord {
    /// Client request header as seen on the wire
    Request {
        client: SocketAddr,
        server: SocketAddr,
        xid: i32,
        opcode: i32,
        #[serde(default)]
        timestamp: u64,
    },
    /// Complete server-to-client payload
    Reply {
        client: SocketAddr,
        server: SocketAddr,
        #[serde(with = "hex_payload")]
        payload: Vec<u8>,
        #[serde(default)]
        timestamp: u64,
        #[serde(default)]
        auth: String,
    },
}

impl CaptureRecord {
    /// Connection this record belongs to
    pub fn stream(&self) -> (SocketAddr, SocketAddr) {
        match self {
            CaptureRecord::Request { client, server, .. }
            | CaptureRecord::Reply { client, server, .. } => (*client, *server),
        }
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to read capture: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed capture record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Iterate over the records of a JSON-lines capture
///
/// Blank lines are skipped. Each item carries its own error so a single bad
/// line does not end the replay.
pub fn read_capture<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<CaptureRecord, CaptureError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Err(err) => Some(Err(CaptureError::Io(err))),
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str(&line).map_err(|source| {
                CaptureError::Parse {
                    line: index + 1,
                    source,
                }
            })),
        })
}

mod hex_payload {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded.trim()).map_err(serde::de::Error::custom)
    }
}
