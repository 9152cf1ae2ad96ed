//! Accumulator for non-fatal problems found while building the document.
//!
//! Malformed directive lines, unknown keys and invalid values never abort a run. Each builder
//! receives a `&mut Warnings` and appends a message instead; the CLI flushes the collected
//! messages once, after the document has been written.

use log::{debug, warn};

/// Ordered, append-only collection of warning messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    messages: Vec<String>,
}

impl Warnings {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a warning message.
    pub fn add(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("Recorded warning: {}", message);
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Number of messages containing `needle`.
    pub fn count_matching(&self, needle: &str) -> usize {
        self.messages.iter().filter(|m| m.contains(needle)).count()
    }

    /// Emits every collected message through the logger.
    pub fn flush(&self) {
        for message in &self.messages {
            warn!("{}", message);
        }
    }
}
