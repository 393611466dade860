//! The advisory oracle capability.
//!
//! # Core Principle
//! "The oracle advises; it does not decide."
//!
//! An oracle takes one natural-language [`DecisionRequest`] and returns
//! either the raw reply text or [`OracleResult::Unavailable`]. Nothing
//! escapes this boundary: a missing credential, a timeout, an HTTP error
//! and a malformed response body all collapse into `Unavailable`. Callers
//! must still validate `Text` before trusting it.

use std::fmt;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::config::RuntimeConfig;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderRegistry};
use crate::usage::{OracleUsage, UsageTracker};

/// Which decision a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// Stock level after a restock or sale
    StockUpdate,
    /// Demand over a horizon
    Forecast,
    /// Units to reorder
    Reorder,
    /// Low-stock yes/no
    LowStock,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::StockUpdate => write!(f, "stock_update"),
            AgentKind::Forecast => write!(f, "forecast"),
            AgentKind::Reorder => write!(f, "reorder"),
            AgentKind::LowStock => write!(f, "low_stock"),
        }
    }
}

/// One natural-language decision request.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRequest {
    /// Agent asking
    pub agent: AgentKind,

    /// Role-setting instruction
    pub system: String,

    /// The data and the question
    pub prompt: String,
}

impl DecisionRequest {
    /// Render as chat messages.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::user(self.prompt.clone()),
        ]
    }
}

/// Outcome of one oracle round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleResult {
    /// Raw, untrusted reply
    Text(String),
    /// No reply could be obtained
    Unavailable,
}

/// Capability consulted by every decision agent.
///
/// One synchronous call per decision. Implementations must not panic or
/// propagate errors; failure is `Unavailable`.
pub trait AdvisoryOracle: Send + Sync {
    fn advise(&self, request: &DecisionRequest) -> OracleResult;
}

impl<F> AdvisoryOracle for F
where
    F: Fn(&DecisionRequest) -> OracleResult + Send + Sync,
{
    fn advise(&self, request: &DecisionRequest) -> OracleResult {
        self(request)
    }
}

/// Oracle used when no credential or provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineOracle;

impl AdvisoryOracle for OfflineOracle {
    fn advise(&self, request: &DecisionRequest) -> OracleResult {
        tracing::debug!(agent = %request.agent, "Oracle offline");
        OracleResult::Unavailable
    }
}

/// Oracle backed by an [`LlmProvider`].
///
/// Owns a current-thread tokio runtime and blocks on each completion, so it
/// must not be called from inside another tokio runtime.
pub struct ProviderOracle {
    provider: Arc<dyn LlmProvider>,
    config: CompletionConfig,
    runtime: Runtime,
    usage: UsageTracker,
}

impl ProviderOracle {
    /// Wrap a provider.
    pub fn new(provider: Arc<dyn LlmProvider>, config: CompletionConfig) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            provider,
            config,
            runtime,
            usage: UsageTracker::new(),
        })
    }

    /// Usage accumulated so far.
    pub fn usage(&self) -> OracleUsage {
        self.usage.snapshot()
    }
}

impl fmt::Debug for ProviderOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderOracle")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Drop for ProviderOracle {
    fn drop(&mut self) {
        let usage = self.usage.snapshot();
        if usage.calls() > 0 {
            tracing::debug!(
                provider = self.provider.name(),
                calls = usage.calls(),
                failures = usage.failures,
                tokens = usage.total_tokens(),
                "Oracle session usage"
            );
        }
    }
}

impl AdvisoryOracle for ProviderOracle {
    fn advise(&self, request: &DecisionRequest) -> OracleResult {
        let completion = self.provider.complete(request.to_messages(), &self.config);
        let outcome = self
            .runtime
            .block_on(async { tokio::time::timeout(self.config.timeout, completion).await });

        match outcome {
            Ok(Ok(response)) => {
                self.usage.record_reply(response.usage);
                let reply = response.content.trim().to_string();
                tracing::debug!(
                    agent = %request.agent,
                    provider = self.provider.name(),
                    reply = %reply,
                    "Oracle replied"
                );
                OracleResult::Text(reply)
            }
            Ok(Err(e)) => {
                self.usage.record_failure();
                tracing::warn!(agent = %request.agent, error = %e, "Oracle call failed, using fallback logic");
                OracleResult::Unavailable
            }
            Err(_) => {
                self.usage.record_failure();
                tracing::warn!(
                    agent = %request.agent,
                    timeout = ?self.config.timeout,
                    "Oracle call timed out, using fallback logic"
                );
                OracleResult::Unavailable
            }
        }
    }
}

/// Build the oracle described by `config`.
///
/// An absent credential or unknown provider is not an error: the result is
/// an [`OfflineOracle`] and every agent runs on its fallback formula.
pub fn oracle_from_config(config: &RuntimeConfig) -> std::io::Result<Arc<dyn AdvisoryOracle>> {
    if !config.oracle.enabled {
        tracing::info!("Oracle disabled, using fallback logic");
        return Ok(Arc::new(OfflineOracle));
    }

    let registry = ProviderRegistry::with_defaults();
    match registry.create(&config.oracle.provider, &config.oracle.provider_config()) {
        Ok(provider) => {
            tracing::info!(provider = provider.name(), model = %config.oracle.model, "Oracle configured");
            Ok(Arc::new(ProviderOracle::new(
                provider,
                config.oracle.completion_config(),
            )?))
        }
        Err(e) => {
            tracing::info!(reason = %e, "Oracle unavailable, using fallback logic");
            Ok(Arc::new(OfflineOracle))
        }
    }
}
