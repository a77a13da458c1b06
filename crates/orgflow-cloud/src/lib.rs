//! orgflow provisioning core
//!
//! This crate implements the begin/poll protocol a provisioning driver uses
//! to manage account-level resources, and the three handlers built on it.
//!
//! # Handlers
//!
//! - **account**: creates an account in the organization, polls the creation request
//! - **delegation**: upserts/deletes an NS record in another account's hosted zone
//! - **email**: sends a root-address verification email, polls until verified or expired
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Provisioning Driver                 │
//! │          (onEvent / isComplete calls)            │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                orgflow-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │   LifecycleHandler / CompletionHandler   │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │  Lifecycle   │  │   Status     │            │
//! │  │    types     │  │  variants    │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │  OrganizationApi / RoleAssumer / DnsZoneApi /
//!         │  EmailVerificationApi / AccountDirectory
//! ┌───────▼───────┐
//! │  orgflow-     │
//! │  cloud-aws    │
//! └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use orgflow_cloud::{AccountLifecycleHandler, CompletionHandler, CompletionQuery, LifecycleHandler};
//!
//! let handler = AccountLifecycleHandler::new(organizations);
//! let outcome = handler.on_event(&request).await?;
//!
//! // later, from the driver's poll loop
//! let polled = handler.is_complete(&CompletionQuery::for_outcome(&request, &outcome)).await?;
//! ```

pub mod directory;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod lifecycle;
pub mod properties;
pub mod provider;
pub mod status;

#[cfg(test)]
mod testing;

// Re-exports
pub use directory::{AccountDirectory, AccountRecord, AccountStatus};
pub use error::{ProvisionError, Result};
pub use handler::{Clock, CompletionHandler, HandlerSettings, LifecycleHandler, SystemClock};
pub use handlers::{AccountLifecycleHandler, DelegationRecordHandler, EmailValidationHandler};
pub use lifecycle::{
    CompletionOutcome, CompletionQuery, LifecycleOutcome, LifecycleRequest, Properties,
    RequestKind,
};
pub use provider::{
    DnsZoneApi, EmailVerificationApi, OrganizationApi, RecordSet, RoleAssumer, RoleTarget,
};
pub use status::{CompletionState, CreateAccountState, CreateAccountStatus, VerificationStatus};
