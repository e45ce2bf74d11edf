//! # Opcode Registry
//!
//! Maps a request opcode to the reply shape that answers it. Built once when
//! the decoder is constructed and never mutated afterwards, so lookups need no
//! locking and the registry can be shared across threads behind an `Arc`.

use crate::error::RegistryError;
use crate::message::ReplyKind;
use std::collections::HashMap;
use tracing::debug;
use zk_types::OpCode;

/// Read-only opcode → reply shape table
#[derive(Debug, Clone, Default)]
pub struct ReplyRegistry {
    kinds: HashMap<OpCode, ReplyKind>,
}

impl ReplyRegistry {
    /// Empty registry, for assembling a custom table
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every reply kind that answers an opcode
    pub fn standard() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for kind in ReplyKind::ALL {
            if let Some(opcode) = kind.opcode() {
                registry.register(opcode, kind)?;
            }
        }
        debug!("Opcode registry built with {} reply shapes", registry.len());
        Ok(registry)
    }

    /// Claim `opcode` for `kind`; an opcode can be claimed only once
    pub fn register(&mut self, opcode: OpCode, kind: ReplyKind) -> Result<(), RegistryError> {
        if let Some(existing) = self.kinds.get(&opcode) {
            return Err(RegistryError::DuplicateOpcode {
                opcode,
                existing: existing.type_name(),
                rejected: kind.type_name(),
            });
        }
        self.kinds.insert(opcode, kind);
        Ok(())
    }

    pub fn lookup(&self, opcode: OpCode) -> Option<ReplyKind> {
        self.kinds.get(&opcode).copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Registered opcodes, sorted by wire value
    pub fn opcodes(&self) -> Vec<OpCode> {
        let mut opcodes: Vec<OpCode> = self.kinds.keys().copied().collect();
        opcodes.sort_by_key(|op| op.code());
        opcodes
    }
}
