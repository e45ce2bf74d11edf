//! Replay statistics

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use zk_codec::{display_name, DecodeError, Message, Reply};
use zk_types::{ErrorCode, KeeperState, OpCode};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub requests: u64,
    pub replies: u64,
    pub decoded: u64,
    /// Records that could not be parsed or used at all
    pub skipped: u64,
    /// Decoded replies to requests that modify the tree
    pub writes: u64,
    failures: BTreeMap<&'static str, u64>,
    labels: HashMap<String, u64>,
    server_errors: BTreeMap<String, u64>,
    watch_states: BTreeMap<String, u64>,
}

/// Name for a raw code, falling back to the number itself
fn code_name(name: Option<&'static str>, code: i32) -> String {
    name.map_or_else(|| code.to_string(), str::to_string)
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&mut self) {
        self.requests += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn record_message(&mut self, msg: &Message) {
        self.replies += 1;
        self.decoded += 1;
        *self.labels.entry(display_name(msg).into_owned()).or_insert(0) += 1;

        if msg.opcode().is_some_and(OpCode::is_write) {
            self.writes += 1;
        }
        if msg.is_error() {
            let name = code_name(ErrorCode::describe(msg.error()), msg.error());
            *self.server_errors.entry(name).or_insert(0) += 1;
        }
        if let Reply::WatchEvent { state, .. } = msg.reply() {
            let label = KeeperState::try_from(*state).ok().map(KeeperState::label);
            *self.watch_states.entry(code_name(label, *state)).or_insert(0) += 1;
        }
    }

    pub fn record_failure(&mut self, err: &DecodeError) {
        self.replies += 1;
        *self.failures.entry(err.kind()).or_insert(0) += 1;
    }

    pub fn failed(&self) -> u64 {
        self.failures.values().sum()
    }

    /// Failure count for one [`DecodeError::kind`]
    pub fn failures(&self, kind: &str) -> u64 {
        self.failures.get(kind).copied().unwrap_or(0)
    }

    pub fn label_count(&self, label: &str) -> u64 {
        self.labels.get(label).copied().unwrap_or(0)
    }

    /// Replies carrying the named server error (or raw code when unknown)
    pub fn server_error_count(&self, name: &str) -> u64 {
        self.server_errors.get(name).copied().unwrap_or(0)
    }

    pub fn watch_state_count(&self, state: &str) -> u64 {
        self.watch_states.get(state).copied().unwrap_or(0)
    }

    /// Most frequent labels, highest count first, ties broken by name
    pub fn top_labels(&self, n: usize) -> Vec<(&str, u64)> {
        let mut labels: Vec<_> = self
            .labels
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        labels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        labels.truncate(n);
        labels
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "requests={} replies={} decoded={} failed={} skipped={} writes={}",
            self.requests,
            self.replies,
            self.decoded,
            self.failed(),
            self.skipped,
            self.writes
        )?;
        for (kind, count) in &self.failures {
            writeln!(f, "  failure {:<20} {}", kind, count)?;
        }
        for (name, count) in &self.server_errors {
            writeln!(f, "  error   {:<20} {}", name, count)?;
        }
        for (state, count) in &self.watch_states {
            writeln!(f, "  state   {:<20} {}", state, count)?;
        }
        for (label, count) in self.top_labels(10) {
            writeln!(f, "  {:<28} {}", label, count)?;
        }
        Ok(())
    }
}
