//! # Coordination-Service Reply Codec
//!
//! ## Purpose
//!
//! Decodes server-to-client payloads of the coordination-service wire protocol
//! into typed [`Message`] records for passive traffic inspection:
//! - opcode registry mapping request opcodes to reply shapes
//! - xid correlation against a caller-owned table of pending requests
//! - framing and reply-header parsing
//! - one decode routine per reply shape, plus server-pushed watch events
//! - display labels, kept apart from decoding
//!
//! ## Architecture Role
//!
//! ```text
//! capture/reassembly → [zk-codec] → inspector / aggregation
//!        ↑                  ↓                 ↓
//!   framed payloads    Message records    logs, stats
//!   request xids       typed errors
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Packet capture or TCP reassembly
//! - Request decoding (the caller records `xid → opcode` itself)
//! - Node data, stat, or ACL bodies; read replies stop after the header
//!
//! ## Usage
//!
//! ```
//! use std::collections::HashMap;
//! use zk_codec::{CorrelationTable, DecoderConfig, ReplyBuilder, ReplyDecoder, display_name};
//! use zk_types::OpCode;
//!
//! let decoder = ReplyDecoder::new(DecoderConfig::default()).unwrap();
//! let mut pending: HashMap<i32, OpCode> = HashMap::new();
//! pending.record(5, OpCode::Create);
//!
//! let payload = ReplyBuilder::reply(5, 0x100, 0).string("/foo").build();
//! let msg = decoder
//!     .decode(&payload, "10.0.0.1:50000".parse().unwrap(), "10.0.0.2:2181".parse().unwrap(), &mut pending)
//!     .unwrap();
//! assert_eq!(msg.path(), "/foo");
//! assert_eq!(display_name(&msg), "CreateReply");
//! ```

pub mod builder;
pub mod config;
pub mod correlation;
pub mod decoder;
pub mod error;
pub mod header;
pub mod message;
pub mod naming;
pub mod reader;
pub mod registry;

pub use builder::ReplyBuilder;
pub use config::{DecoderConfig, DEFAULT_PLACEHOLDER};
pub use correlation::{resolve, CorrelationTable};
pub use decoder::ReplyDecoder;
pub use error::{ConfigError, DecodeError, DecodeResult, RegistryError};
pub use header::{parse_frame, parse_reply_header, ReplyHeader};
pub use message::{parent_path, Message, Reply, ReplyKind};
pub use naming::{display_name, event_label, SESSION_EXPIRED_LABEL, UNKNOWN_EVENT_LABEL};
pub use registry::ReplyRegistry;
