//! Routing one event to one handler phase

use anyhow::{Context, Result};
use clap::ValueEnum;
use orgflow_cloud::{
    AccountDirectory, AccountLifecycleHandler, CompletionHandler, CompletionQuery,
    DelegationRecordHandler, EmailValidationHandler, EmailVerificationApi, HandlerSettings,
    LifecycleHandler, LifecycleRequest, OrganizationApi, ProvisionError, RoleAssumer,
};
use orgflow_cloud_aws::{AwsContext, AwsOrganizations, SesEmailVerification, StsRoleAssumer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HandlerKind {
    Account,
    Delegation,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Phase {
    OnEvent,
    IsComplete,
}

/// Collaborators available to one invocation
pub trait Backend {
    type Organizations: OrganizationApi + AccountDirectory;
    type Roles: RoleAssumer;
    type Email: EmailVerificationApi;

    fn organizations(&self) -> Self::Organizations;
    fn role_assumer(&self, session_name: &str) -> Self::Roles;
    fn email_verification(&self) -> Self::Email;
}

impl Backend for AwsContext {
    type Organizations = AwsOrganizations;
    type Roles = StsRoleAssumer;
    type Email = SesEmailVerification;

    fn organizations(&self) -> AwsOrganizations {
        AwsContext::organizations(self)
    }

    fn role_assumer(&self, session_name: &str) -> StsRoleAssumer {
        AwsContext::role_assumer(self, session_name)
    }

    fn email_verification(&self) -> SesEmailVerification {
        AwsContext::email_verification(self)
    }
}

/// Run `phase` of the `kind` handler against a raw JSON event and return the
/// response JSON
pub async fn dispatch<B: Backend>(
    backend: &B,
    kind: HandlerKind,
    phase: Phase,
    settings: &HandlerSettings,
    event: &str,
) -> Result<String> {
    match kind {
        HandlerKind::Account => {
            let handler = AccountLifecycleHandler::new(backend.organizations());
            run_phase(&handler, phase, event).await
        }
        HandlerKind::Delegation => {
            let roles = backend.role_assumer(&settings.role_session_name);
            let handler = DelegationRecordHandler::new(roles, settings.clone());
            match phase {
                Phase::OnEvent => on_event(&handler, event).await,
                // 同期ハンドラなので poll は受け付けない
                Phase::IsComplete => {
                    Err(ProvisionError::PollNotSupported(handler.name().to_string()).into())
                }
            }
        }
        HandlerKind::Email => {
            let handler =
                EmailValidationHandler::new(backend.email_verification(), settings.clone());
            run_phase(&handler, phase, event).await
        }
    }
}

async fn run_phase<H: CompletionHandler>(
    handler: &H,
    phase: Phase,
    event: &str,
) -> Result<String> {
    match phase {
        Phase::OnEvent => on_event(handler, event).await,
        Phase::IsComplete => is_complete(handler, event).await,
    }
}

pub async fn on_event<H: LifecycleHandler>(handler: &H, event: &str) -> Result<String> {
    let request: LifecycleRequest =
        serde_json::from_str(event).context("Failed to parse lifecycle event")?;
    tracing::info!(
        "{} on_event: {} ({})",
        handler.name(),
        request.request_type,
        request.physical_resource_id.as_deref().unwrap_or("new resource")
    );

    let outcome = handler.on_event(&request).await?;
    tracing::info!("{} assigned {}", handler.name(), outcome.physical_resource_id);
    Ok(serde_json::to_string(&outcome)?)
}

pub async fn is_complete<H: CompletionHandler>(handler: &H, event: &str) -> Result<String> {
    let query: CompletionQuery =
        serde_json::from_str(event).context("Failed to parse completion query")?;
    tracing::info!(
        "{} is_complete: {} {}",
        handler.name(),
        query.request_type,
        query.physical_resource_id
    );

    let outcome = handler.is_complete(&query).await?;
    if outcome.is_complete {
        tracing::info!("{} {} complete", handler.name(), query.physical_resource_id);
    } else {
        tracing::debug!("{} {} still pending", handler.name(), query.physical_resource_id);
    }
    Ok(serde_json::to_string(&outcome)?)
}

/// Dump the organization's accounts as JSON, in listing order
pub async fn list_accounts<B: Backend>(backend: &B) -> Result<String> {
    let accounts = backend.organizations().list_accounts().await?;
    Ok(serde_json::to_string_pretty(&accounts)?)
}
