//! Organization account lifecycle
//!
//! Create submits an account-creation request and uses the request id as the
//! physical resource id; the poll phase follows that request until the
//! organization reports the new account id. Accounts are immutable once
//! created, so Update only re-validates. Delete is a deliberate no-op: closing
//! an account is a manual organizational action and nothing here removes it.

use crate::error::{ProvisionError, Result};
use crate::handler::{CompletionHandler, LifecycleHandler};
use crate::lifecycle::{
    CompletionOutcome, CompletionQuery, LifecycleOutcome, LifecycleRequest, Properties,
    RequestKind,
};
use crate::properties::{PropertyReader, validate_email};
use crate::provider::OrganizationApi;
use async_trait::async_trait;

const MAX_ACCOUNT_NAME_LEN: usize = 50;

/// Validated account properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProperties {
    pub account_name: String,
    pub email: String,
}

impl AccountProperties {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let reader = PropertyReader::new(props);
        let account_name = reader.required_str("AccountName")?;
        let email = reader.required_str("Email")?;

        if account_name.chars().count() > MAX_ACCOUNT_NAME_LEN {
            return Err(ProvisionError::InvalidProperties(format!(
                "AccountName must be at most {} characters: {}",
                MAX_ACCOUNT_NAME_LEN, account_name
            )));
        }
        validate_email(email)?;

        Ok(Self {
            account_name: account_name.to_string(),
            email: email.to_string(),
        })
    }
}

/// Handler for `Custom::Account` resources
pub struct AccountLifecycleHandler<O> {
    organizations: O,
}

impl<O: OrganizationApi> AccountLifecycleHandler<O> {
    pub fn new(organizations: O) -> Self {
        Self { organizations }
    }
}

#[async_trait]
impl<O: OrganizationApi> LifecycleHandler for AccountLifecycleHandler<O> {
    fn name(&self) -> &str {
        "account"
    }

    async fn on_event(&self, request: &LifecycleRequest) -> Result<LifecycleOutcome> {
        match request.request_type {
            RequestKind::Create => {
                let props = AccountProperties::from_properties(&request.resource_properties)?;
                tracing::info!(
                    "Requesting account {} <{}>",
                    props.account_name,
                    props.email
                );
                let request_id = self
                    .organizations
                    .create_account(&props.account_name, &props.email)
                    .await?;
                tracing::info!("Account creation request submitted: {}", request_id);
                Ok(LifecycleOutcome::new(request_id))
            }
            RequestKind::Update => {
                let props = AccountProperties::from_properties(&request.resource_properties)?;
                let physical_id = request.existing_physical_id()?;
                if let Some(old) = &request.old_resource_properties {
                    let previous = AccountProperties::from_properties(old).ok();
                    if previous.as_ref() != Some(&props) {
                        tracing::warn!(
                            "Account {} is immutable; ignoring property changes",
                            physical_id
                        );
                    }
                }
                Ok(LifecycleOutcome::new(physical_id))
            }
            RequestKind::Delete => {
                let physical_id = request.existing_physical_id()?;
                tracing::info!(
                    "Account creation {} is left in the organization; close the account manually if needed",
                    physical_id
                );
                Ok(LifecycleOutcome::new(physical_id))
            }
        }
    }
}

#[async_trait]
impl<O: OrganizationApi> CompletionHandler for AccountLifecycleHandler<O> {
    async fn is_complete(&self, query: &CompletionQuery) -> Result<CompletionOutcome> {
        if query.request_type == RequestKind::Delete {
            return Ok(CompletionOutcome::complete());
        }

        let request_id = query.physical_resource_id.as_str();
        let status = self
            .organizations
            .describe_create_account_status(request_id)
            .await?;
        tracing::debug!("Account creation {} is {}", request_id, status.state);

        status
            .completion()
            .into_outcome(|reason| ProvisionError::AccountCreationFailed {
                request_id: request_id.to_string(),
                reason,
            })
    }
}
