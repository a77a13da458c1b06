//! Provisioning error types
//!
//! Every variant is terminal: returning one from a begin or poll operation
//! tells the driver to fail the resource and run its rollback path.
//! "Still pending" is never an error, it is `CompletionOutcome::pending()`.

use thiserror::Error;

/// Provisioning errors
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Invalid resource properties: {0}")]
    InvalidProperties(String),

    #[error("Missing required property: {0}")]
    MissingProperty(String),

    #[error("{0} request is missing PhysicalResourceId")]
    MissingPhysicalResourceId(String),

    #[error("Account creation {request_id} failed: {reason}")]
    AccountCreationFailed { request_id: String, reason: String },

    #[error("DNS record {name} not found in hosted zone {zone}")]
    RecordNotFound { zone: String, name: String },

    #[error(
        "Verification of {email} expired: not verified after {elapsed_secs}s (timeout {timeout_secs}s)"
    )]
    VerificationExpired {
        email: String,
        elapsed_secs: i64,
        timeout_secs: u64,
    },

    #[error("Role assumption failed: {0}")]
    RoleAssumption(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("{0} handler has no poll phase")]
    PollNotSupported(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
