//! Validation-then-fallback combinator.
//!
//! Every agent follows the same routine: send one decision request, validate
//! the reply, and either accept it or compute the deterministic fallback.
//! [`consult`] is that routine; agents supply only the request, a validator
//! and a fallback.

use std::fmt;

use crate::oracle::{AdvisoryOracle, DecisionRequest, OracleResult};

/// Why a decision fell back to the local formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No reply: credential missing or transport failure
    OracleUnavailable,
    /// A reply arrived but failed validation
    ReplyInvalid,
}

/// Which path produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    Oracle,
    Fallback(FallbackReason),
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionSource::Oracle => write!(f, "oracle"),
            DecisionSource::Fallback(FallbackReason::OracleUnavailable) => {
                write!(f, "fallback (oracle unavailable)")
            }
            DecisionSource::Fallback(FallbackReason::ReplyInvalid) => {
                write!(f, "fallback (invalid reply)")
            }
        }
    }
}

/// A decided value and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision<T> {
    pub value: T,
    pub source: DecisionSource,
}

impl<T> Decision<T> {
    /// Whether the oracle's reply was accepted.
    pub fn is_from_oracle(&self) -> bool {
        self.source == DecisionSource::Oracle
    }
}

/// Consult the oracle once and route the outcome.
///
/// `validate` turns reply text into a value or rejects it; `fallback` is only
/// evaluated when the oracle is unavailable or the reply is rejected.
pub fn consult<T, V, F>(
    oracle: &dyn AdvisoryOracle,
    request: &DecisionRequest,
    validate: V,
    fallback: F,
) -> Decision<T>
where
    V: FnOnce(&str) -> Option<T>,
    F: FnOnce() -> T,
{
    let reason = match oracle.advise(request) {
        OracleResult::Text(reply) => match validate(&reply) {
            Some(value) => {
                return Decision {
                    value,
                    source: DecisionSource::Oracle,
                };
            }
            None => {
                tracing::info!(agent = %request.agent, reply = %reply, "Oracle reply rejected, using fallback logic");
                FallbackReason::ReplyInvalid
            }
        },
        OracleResult::Unavailable => {
            tracing::debug!(agent = %request.agent, "Oracle unavailable, using fallback logic");
            FallbackReason::OracleUnavailable
        }
    };

    Decision {
        value: fallback(),
        source: DecisionSource::Fallback(reason),
    }
}

/// Accept a reply that is exactly one integer, surrounding whitespace and an
/// optional sign allowed.
pub fn parse_integer(reply: &str) -> Option<i64> {
    reply.trim().parse::<i64>().ok()
}

/// Classify a yes/no reply: affirmative when it starts with `y` in either
/// case. Every reply classifies, so this never triggers the fallback.
pub fn parse_affirmative(reply: &str) -> Option<bool> {
    Some(reply.trim_start().starts_with(['y', 'Y']))
}
