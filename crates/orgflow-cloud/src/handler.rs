//! Handler traits
//!
//! A handler is a pair of stateless functions. `on_event` begins a lifecycle
//! action and assigns the physical resource id; `is_complete` is polled by the
//! driver until it reports completion or fails. Everything `is_complete`
//! needs is reconstructed from its query, never from handler memory.

use crate::error::Result;
use crate::lifecycle::{CompletionOutcome, CompletionQuery, LifecycleOutcome, LifecycleRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Begin operation of a provisioning handler
#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    /// Handler name used in logs and by the entry process (e.g. "account")
    fn name(&self) -> &str;

    async fn on_event(&self, request: &LifecycleRequest) -> Result<LifecycleOutcome>;
}

/// Poll operation of an asynchronous provisioning handler
#[async_trait]
pub trait CompletionHandler: LifecycleHandler {
    /// `Ok` with `is_complete = false` means "still pending".
    /// `Err` is terminal.
    async fn is_complete(&self, query: &CompletionQuery) -> Result<CompletionOutcome>;
}

/// Tunables shared by the handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSettings {
    /// TTL of delegation records when the resource does not set one
    pub record_ttl_secs: u64,

    /// Verification timeout when the resource does not set one
    pub verification_timeout_secs: u64,

    /// Session name used when assuming the cross-account DNS role
    pub role_session_name: String,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            record_ttl_secs: 172_800,
            verification_timeout_secs: 600,
            role_session_name: "orgflow-delegation".to_string(),
        }
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
