//! Account directory
//!
//! Read-only listing of the accounts in an organization. The handlers do not
//! use it; the entry process exposes it as `--list-accounts`, and wiring code
//! uses the lookups to map account names or emails to ids.

use crate::error::{ProvisionError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lists accounts in an organization, in the order the API returns them
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>>;

    /// Find an account by its root email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>> {
        Ok(self
            .list_accounts()
            .await?
            .into_iter()
            .find(|a| a.email.eq_ignore_ascii_case(email.trim())))
    }

    /// Find an account by its exact name
    async fn find_by_name(&self, name: &str) -> Result<Option<AccountRecord>> {
        Ok(self
            .list_accounts()
            .await?
            .into_iter()
            .find(|a| a.name == name))
    }
}

/// An account in the organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub arn: String,
    pub name: String,
    pub email: String,
    pub status: AccountStatus,
    pub joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Suspended,
    PendingClosure,
}

impl FromStr for AccountStatus {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ACTIVE" => Ok(AccountStatus::Active),
            "SUSPENDED" => Ok(AccountStatus::Suspended),
            "PENDING_CLOSURE" => Ok(AccountStatus::PendingClosure),
            other => Err(ProvisionError::Api(format!("unknown account status: {}", other))),
        }
    }
}
