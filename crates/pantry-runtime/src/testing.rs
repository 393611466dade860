//! Test doubles shared by the unit tests in this crate.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::oracle::{AdvisoryOracle, DecisionRequest, OracleResult};

/// Oracle that plays back a fixed script of results and records every
/// request it receives. Once the script is exhausted it is unavailable.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    script: Mutex<VecDeque<OracleResult>>,
    requests: Mutex<Vec<DecisionRequest>>,
}

impl ScriptedOracle {
    pub fn new(script: impl IntoIterator<Item = OracleResult>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Oracle that answers successive requests with the given texts.
    pub fn replies(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| OracleResult::Text(r.to_string())))
    }

    pub fn requests(&self) -> Vec<DecisionRequest> {
        self.requests.lock().clone()
    }
}

impl AdvisoryOracle for ScriptedOracle {
    fn advise(&self, request: &DecisionRequest) -> OracleResult {
        self.requests.lock().push(request.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or(OracleResult::Unavailable)
    }
}
