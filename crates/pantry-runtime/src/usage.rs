//! Oracle usage accounting.
//!
//! Counts every oracle round-trip and the tokens it consumed so a session
//! can log how much advice it actually used.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::providers::TokenUsage;

/// Accumulated oracle usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleUsage {
    /// Round-trips that returned a reply
    pub replies: u32,

    /// Round-trips absorbed as unavailable
    pub failures: u32,

    /// Prompt tokens consumed
    pub prompt_tokens: u64,

    /// Completion tokens consumed
    pub completion_tokens: u64,
}

impl OracleUsage {
    /// Total round-trips attempted.
    pub fn calls(&self) -> u32 {
        self.replies + self.failures
    }

    /// Total tokens consumed.
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Thread-safe usage tracker.
#[derive(Debug, Default)]
pub struct UsageTracker {
    usage: Mutex<OracleUsage>,
}

impl UsageTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful completion.
    pub fn record_reply(&self, tokens: TokenUsage) {
        let mut usage = self.usage.lock();
        usage.replies += 1;
        usage.prompt_tokens += u64::from(tokens.prompt_tokens);
        usage.completion_tokens += u64::from(tokens.completion_tokens);
    }

    /// Record a transport failure.
    pub fn record_failure(&self) {
        self.usage.lock().failures += 1;
    }

    /// Current totals.
    pub fn snapshot(&self) -> OracleUsage {
        *self.usage.lock()
    }
}
