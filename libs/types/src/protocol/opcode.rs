//! Operation codes for the coordination-service wire protocol
//!
//! Every request carries one of these codes in its header. Replies do not;
//! their shape is recovered by remembering the opcode of the request that
//! carried the same transaction id.

use num_enum::TryFromPrimitive;

/// Operation codes shared by request and reply decoding
///
/// Discriminants are the on-wire `i32` values. `Connect` is not a real
/// request-header opcode: the handshake has no header, and connect requests
/// are recorded under this code by the request side so the handshake reply
/// can be resolved like any other.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpCode {
    Connect = 0,
    Create = 1,
    Delete = 2,
    Exists = 3,
    GetData = 4,
    SetData = 5,
    GetAcl = 6,
    SetAcl = 7,
    GetChildren = 8,
    Sync = 9,
    Ping = 11,
    GetChildren2 = 12,
    Check = 13,
    Multi = 14,
    Create2 = 15,
    Reconfig = 16,
    CheckWatches = 17,
    RemoveWatches = 18,
    CreateContainer = 19,
    DeleteContainer = 20,
    CreateTtl = 21,
    Close = -11,
    SetAuth = 100,
    SetWatches = 101,
    Sasl = 102,
}

impl OpCode {
    /// All known operation codes, in wire order
    pub const ALL: [OpCode; 25] = [
        OpCode::Close,
        OpCode::Connect,
        OpCode::Create,
        OpCode::Delete,
        OpCode::Exists,
        OpCode::GetData,
        OpCode::SetData,
        OpCode::GetAcl,
        OpCode::SetAcl,
        OpCode::GetChildren,
        OpCode::Sync,
        OpCode::Ping,
        OpCode::GetChildren2,
        OpCode::Check,
        OpCode::Multi,
        OpCode::Create2,
        OpCode::Reconfig,
        OpCode::CheckWatches,
        OpCode::RemoveWatches,
        OpCode::CreateContainer,
        OpCode::DeleteContainer,
        OpCode::CreateTtl,
        OpCode::SetAuth,
        OpCode::SetWatches,
        OpCode::Sasl,
    ];

    /// Raw wire value
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Human-readable operation name used in logs and summaries
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Connect => "Connect",
            OpCode::Create => "Create",
            OpCode::Delete => "Delete",
            OpCode::Exists => "Exists",
            OpCode::GetData => "GetData",
            OpCode::SetData => "SetData",
            OpCode::GetAcl => "GetAcl",
            OpCode::SetAcl => "SetAcl",
            OpCode::GetChildren => "GetChildren",
            OpCode::Sync => "Sync",
            OpCode::Ping => "Ping",
            OpCode::GetChildren2 => "GetChildren2",
            OpCode::Check => "Check",
            OpCode::Multi => "Multi",
            OpCode::Create2 => "Create2",
            OpCode::Reconfig => "Reconfig",
            OpCode::CheckWatches => "CheckWatches",
            OpCode::RemoveWatches => "RemoveWatches",
            OpCode::CreateContainer => "CreateContainer",
            OpCode::DeleteContainer => "DeleteContainer",
            OpCode::CreateTtl => "CreateTtl",
            OpCode::Close => "Close",
            OpCode::SetAuth => "SetAuth",
            OpCode::SetWatches => "SetWatches",
            OpCode::Sasl => "Sasl",
        }
    }

    /// Whether a successful request with this opcode bumps the server zxid
    pub fn is_write(self) -> bool {
        matches!(
            self,
            OpCode::Create
                | OpCode::Create2
                | OpCode::CreateContainer
                | OpCode::CreateTtl
                | OpCode::Delete
                | OpCode::DeleteContainer
                | OpCode::SetData
                | OpCode::SetAcl
                | OpCode::Multi
                | OpCode::Reconfig
        )
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_primitive() {
        assert_eq!(OpCode::try_from(1i32).unwrap(), OpCode::Create);
        assert_eq!(OpCode::try_from(-11i32).unwrap(), OpCode::Close);
        assert_eq!(OpCode::try_from(101i32).unwrap(), OpCode::SetWatches);

        // 10 is unassigned on the wire
        assert!(OpCode::try_from(10i32).is_err());
        assert!(OpCode::try_from(999i32).is_err());
    }

    #[test]
    fn test_all_round_trips_through_code() {
        for op in OpCode::ALL {
            assert_eq!(OpCode::try_from(op.code()).unwrap(), op);
        }
    }

    #[test]
    fn test_write_classification() {
        assert!(OpCode::Create.is_write());
        assert!(OpCode::Multi.is_write());
        assert!(!OpCode::GetData.is_write());
        assert!(!OpCode::Ping.is_write());
    }
}
