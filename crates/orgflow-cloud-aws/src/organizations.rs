//! AWS Organizations client
//!
//! Implements account creation / creation-status lookup and the account
//! directory listing.

use crate::error::{AwsError, sdk_error};
use async_trait::async_trait;
use aws_sdk_organizations::Client;
use aws_sdk_organizations::types::Account;
use chrono::{DateTime, Utc};
use orgflow_cloud::{AccountDirectory, AccountRecord, CreateAccountStatus, OrganizationApi};

/// Organizations API bound to the invocation's credentials
pub struct AwsOrganizations {
    client: Client,
}

impl AwsOrganizations {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrganizationApi for AwsOrganizations {
    async fn create_account(
        &self,
        account_name: &str,
        email: &str,
    ) -> orgflow_cloud::Result<String> {
        let response = self
            .client
            .create_account()
            .account_name(account_name)
            .email(email)
            .send()
            .await
            .map_err(|e| sdk_error("CreateAccount", e))?;

        let request_id = response
            .create_account_status()
            .and_then(|s| s.id())
            .ok_or(AwsError::MissingField {
                operation: "CreateAccount",
                field: "CreateAccountStatus.Id",
            })?;

        tracing::debug!("CreateAccount accepted as {}", request_id);
        Ok(request_id.to_string())
    }

    async fn describe_create_account_status(
        &self,
        request_id: &str,
    ) -> orgflow_cloud::Result<CreateAccountStatus> {
        let response = self
            .client
            .describe_create_account_status()
            .create_account_request_id(request_id)
            .send()
            .await
            .map_err(|e| sdk_error("DescribeCreateAccountStatus", e))?;

        let status = response
            .create_account_status()
            .ok_or(AwsError::MissingField {
                operation: "DescribeCreateAccountStatus",
                field: "CreateAccountStatus",
            })?;

        to_create_account_status(
            request_id,
            status.state().map(|s| s.as_str()),
            status.account_id(),
            status.failure_reason().map(|r| r.as_str()),
        )
    }
}

#[async_trait]
impl AccountDirectory for AwsOrganizations {
    async fn list_accounts(&self) -> orgflow_cloud::Result<Vec<AccountRecord>> {
        let mut accounts = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_accounts()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| sdk_error("ListAccounts", e))?;

            for account in response.accounts() {
                accounts.push(to_account_record(account)?);
            }

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        tracing::debug!("Listed {} accounts", accounts.len());
        Ok(accounts)
    }
}

/// Fold the raw creation-status fields into the closed status type
pub fn to_create_account_status(
    request_id: &str,
    state: Option<&str>,
    account_id: Option<&str>,
    failure_reason: Option<&str>,
) -> orgflow_cloud::Result<CreateAccountStatus> {
    let state = state.ok_or(AwsError::MissingField {
        operation: "DescribeCreateAccountStatus",
        field: "CreateAccountStatus.State",
    })?;

    Ok(CreateAccountStatus {
        request_id: request_id.to_string(),
        state: state.parse()?,
        account_id: account_id.map(str::to_string),
        failure_reason: failure_reason.map(str::to_string),
    })
}

pub fn to_account_record(account: &Account) -> orgflow_cloud::Result<AccountRecord> {
    let missing = |field| AwsError::MissingField {
        operation: "ListAccounts",
        field,
    };

    let status = account
        .status()
        .map(|s| s.as_str())
        .ok_or_else(|| missing("Account.Status"))?
        .parse()?;
    let joined_at = account
        .joined_timestamp()
        .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()));

    Ok(AccountRecord {
        id: account.id().ok_or_else(|| missing("Account.Id"))?.to_string(),
        arn: account.arn().unwrap_or_default().to_string(),
        name: account.name().unwrap_or_default().to_string(),
        email: account.email().unwrap_or_default().to_string(),
        status,
        joined_at,
    })
}
