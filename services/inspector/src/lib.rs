//! # Capture Inspector
//!
//! Replays a capture of client/server traffic through the reply decoder.
//! Requests populate one correlation table per connection, replies are decoded
//! against it, and every outcome is tallied in [`Stats`].
//!
//! Captures are JSON lines, one [`CaptureRecord`] per line:
//!
//! ```text
//! {"kind":"request","client":"10.0.0.1:50000","server":"10.0.0.2:2181","xid":5,"opcode":1}
//! {"kind":"reply","client":"10.0.0.1:50000","server":"10.0.0.2:2181","payload":"0000..."}
//! ```

pub mod capture;
pub mod session;
pub mod stats;

pub use capture::{read_capture, CaptureError, CaptureRecord};
pub use session::{Inspector, Outcome};
pub use stats::Stats;
