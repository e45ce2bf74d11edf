//! Protocol enumerations and reserved values

pub mod error_code;
pub mod multi;
pub mod opcode;
pub mod watch;
pub mod xid;
