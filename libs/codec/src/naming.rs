//! Display labels for decoded messages
//!
//! Presentation only. Nothing here feeds back into decoding.

use crate::message::{Message, Reply};
use std::borrow::Cow;
use zk_types::EventType;

pub const FAILED_PREFIX: &str = "Failed";
pub const UNKNOWN_EVENT_LABEL: &str = "unknown event";
pub const SESSION_EXPIRED_LABEL: &str = "session expired";

/// Human-readable label for a decoded message
///
/// Watch events are named by their event type. A connect reply with a
/// non-positive timeout is a session expiration, whatever its error code says.
/// Everything else uses the reply type name, prefixed with `Failed` when the
/// server reported an error.
pub fn display_name(msg: &Message) -> Cow<'static, str> {
    match msg.reply() {
        Reply::WatchEvent { event_type, .. } => Cow::Borrowed(event_label(*event_type)),
        Reply::Connect { timeout, .. } if *timeout <= 0 => Cow::Borrowed(SESSION_EXPIRED_LABEL),
        reply => {
            let name = reply.kind().type_name();
            if msg.is_error() {
                Cow::Owned(format!("{}{}", FAILED_PREFIX, name))
            } else {
                Cow::Borrowed(name)
            }
        }
    }
}

/// Label for a raw watch event type
pub fn event_label(event_type: i32) -> &'static str {
    EventType::try_from(event_type)
        .map(EventType::label)
        .unwrap_or(UNKNOWN_EVENT_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_labels() {
        assert_eq!(event_label(1), "NodeCreated");
        assert_eq!(event_label(4), "NodeChildrenChanged");
        assert_eq!(event_label(-1), "None");
        assert_eq!(event_label(999), UNKNOWN_EVENT_LABEL);
    }
}
