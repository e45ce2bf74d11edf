//! Sub-operation header of a multi (transaction) reply

/// Header preceding each sub-result inside a multi reply
///
/// `done` marks the terminating header of the chain. `opcode` is kept raw
/// because a failed sub-operation reports `-1` here, which is not an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiHeader {
    pub opcode: i32,
    pub done: bool,
    pub error: i32,
}

impl MultiHeader {
    pub fn new(opcode: i32, done: bool, error: i32) -> Self {
        Self {
            opcode,
            done,
            error,
        }
    }
}

impl std::fmt::Display for MultiHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MultiHeader(opcode={}, done={}, error={})",
            self.opcode, self.done, self.error
        )
    }
}
