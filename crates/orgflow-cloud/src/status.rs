//! Provider status variants
//!
//! External APIs report progress as strings. They are parsed into closed
//! enums here and folded into [`CompletionState`] right away, so handler code
//! never matches on provider strings.

use crate::error::{ProvisionError, Result};
use crate::lifecycle::{CompletionOutcome, Properties};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Three-way completion state of an in-flight operation
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionState {
    /// Not finished yet; poll again
    Pending,
    /// Finished, with data for downstream consumers
    Complete(Properties),
    /// Finished unsuccessfully, with the provider's reason
    Failed(String),
}

impl CompletionState {
    /// Convert into a poll result. `Failed` becomes the terminal error built
    /// by `on_failure`.
    pub fn into_outcome<F>(self, on_failure: F) -> Result<CompletionOutcome>
    where
        F: FnOnce(String) -> ProvisionError,
    {
        match self {
            CompletionState::Pending => Ok(CompletionOutcome::pending()),
            CompletionState::Complete(data) if data.is_empty() => Ok(CompletionOutcome::complete()),
            CompletionState::Complete(data) => Ok(CompletionOutcome::complete_with(data)),
            CompletionState::Failed(reason) => Err(on_failure(reason)),
        }
    }
}

/// State of an account-creation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateAccountState {
    InProgress,
    Succeeded,
    Failed,
}

impl FromStr for CreateAccountState {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "IN_PROGRESS" => Ok(CreateAccountState::InProgress),
            "SUCCEEDED" => Ok(CreateAccountState::Succeeded),
            "FAILED" => Ok(CreateAccountState::Failed),
            other => Err(ProvisionError::Api(format!(
                "unknown create-account state: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for CreateAccountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateAccountState::InProgress => write!(f, "IN_PROGRESS"),
            CreateAccountState::Succeeded => write!(f, "SUCCEEDED"),
            CreateAccountState::Failed => write!(f, "FAILED"),
        }
    }
}

/// Status of an account-creation request as reported by the organization API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountStatus {
    pub request_id: String,
    pub state: CreateAccountState,
    /// Set once the state is `SUCCEEDED`
    pub account_id: Option<String>,
    /// Set when the state is `FAILED` (e.g. `EMAIL_ALREADY_EXISTS`)
    pub failure_reason: Option<String>,
}

impl CreateAccountStatus {
    pub fn in_progress(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            state: CreateAccountState::InProgress,
            account_id: None,
            failure_reason: None,
        }
    }

    pub fn succeeded(request_id: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            state: CreateAccountState::Succeeded,
            account_id: Some(account_id.into()),
            failure_reason: None,
        }
    }

    pub fn failed(request_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            state: CreateAccountState::Failed,
            account_id: None,
            failure_reason: Some(reason.into()),
        }
    }

    pub fn completion(&self) -> CompletionState {
        match self.state {
            CreateAccountState::InProgress => CompletionState::Pending,
            CreateAccountState::Succeeded => match &self.account_id {
                Some(account_id) => {
                    let mut data = Properties::new();
                    data.insert("AccountId".to_string(), account_id.clone().into());
                    CompletionState::Complete(data)
                }
                None => CompletionState::Failed(
                    "request reported SUCCEEDED without an account id".to_string(),
                ),
            },
            CreateAccountState::Failed => CompletionState::Failed(
                self.failure_reason
                    .clone()
                    .unwrap_or_else(|| "UNKNOWN".to_string()),
            ),
        }
    }
}

/// Verification status of an email identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Success,
    Pending,
    Failed,
    TemporaryFailure,
    NotStarted,
}

impl VerificationStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationStatus::Success)
    }
}

impl FromStr for VerificationStatus {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Success" => Ok(VerificationStatus::Success),
            "Pending" => Ok(VerificationStatus::Pending),
            "Failed" => Ok(VerificationStatus::Failed),
            "TemporaryFailure" => Ok(VerificationStatus::TemporaryFailure),
            "NotStarted" => Ok(VerificationStatus::NotStarted),
            other => Err(ProvisionError::Api(format!(
                "unknown verification status: {}",
                other
            ))),
        }
    }
}
