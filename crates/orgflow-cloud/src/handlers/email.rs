//! Root email verification
//!
//! Create sends a verification email and stamps the start time and timeout
//! into the outcome data. Polls recompute the elapsed time from that stamp and
//! fail once the timeout passes without the address being verified.

use crate::error::{ProvisionError, Result};
use crate::handler::{Clock, CompletionHandler, HandlerSettings, LifecycleHandler, SystemClock};
use crate::lifecycle::{
    CompletionOutcome, CompletionQuery, LifecycleOutcome, LifecycleRequest, Properties,
    RequestKind,
};
use crate::properties::{PropertyReader, validate_email};
use crate::provider::EmailVerificationApi;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

const STARTED_AT: &str = "StartedAt";
const TIMEOUT_SECONDS: &str = "TimeoutSeconds";

/// Validated email-validation properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailProperties {
    /// Trimmed and lower-cased
    pub email: String,
    pub timeout_secs: u64,
}

impl EmailProperties {
    pub fn from_properties(props: &Properties, settings: &HandlerSettings) -> Result<Self> {
        let reader = PropertyReader::new(props);
        let email = reader.required_str("Email")?.to_ascii_lowercase();
        validate_email(&email)?;
        let timeout_secs = reader
            .optional_duration_secs("Timeout")?
            .unwrap_or(settings.verification_timeout_secs);

        Ok(Self {
            email,
            timeout_secs,
        })
    }

    /// The address itself, so re-creating the same address maps to the same
    /// resource
    pub fn physical_id(&self) -> String {
        self.email.clone()
    }
}

/// Handler for `Custom::EmailValidation` resources
pub struct EmailValidationHandler<E> {
    email_api: E,
    settings: HandlerSettings,
    clock: Arc<dyn Clock>,
}

impl<E: EmailVerificationApi> EmailValidationHandler<E> {
    pub fn new(email_api: E, settings: HandlerSettings) -> Self {
        Self {
            email_api,
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn started_at(query: &CompletionQuery) -> Result<DateTime<Utc>> {
        let raw = query
            .data_value(STARTED_AT)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ProvisionError::InvalidProperties(format!(
                    "poll data for {} is missing {}",
                    query.physical_resource_id, STARTED_AT
                ))
            })?;

        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                ProvisionError::InvalidProperties(format!(
                    "invalid {} {:?}: {}",
                    STARTED_AT, raw, e
                ))
            })
    }
}

#[async_trait]
impl<E: EmailVerificationApi> LifecycleHandler for EmailValidationHandler<E> {
    fn name(&self) -> &str {
        "email"
    }

    async fn on_event(&self, request: &LifecycleRequest) -> Result<LifecycleOutcome> {
        if request.request_type != RequestKind::Create {
            // Verification cannot be revoked; keep the existing identity.
            let physical_id = match request.physical_resource_id.as_deref() {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    EmailProperties::from_properties(&request.resource_properties, &self.settings)?
                        .physical_id()
                }
            };
            tracing::debug!(
                "{} of {} needs no verification call",
                request.request_type,
                physical_id
            );
            return Ok(LifecycleOutcome::new(physical_id));
        }

        let props =
            EmailProperties::from_properties(&request.resource_properties, &self.settings)?;
        let started_at = self.clock.now();

        let status = self.email_api.verification_status(&props.email).await?;
        if status.is_verified() {
            tracing::info!(
                "{} is already verified; not sending another email",
                props.email
            );
        } else {
            tracing::info!("Sending verification email to {}", props.email);
            self.email_api.send_verification(&props.email).await?;
        }

        Ok(LifecycleOutcome::new(props.physical_id())
            .with_data(STARTED_AT, started_at.to_rfc3339().into())
            .with_data(TIMEOUT_SECONDS, props.timeout_secs.into()))
    }
}

#[async_trait]
impl<E: EmailVerificationApi> CompletionHandler for EmailValidationHandler<E> {
    async fn is_complete(&self, query: &CompletionQuery) -> Result<CompletionOutcome> {
        if query.request_type != RequestKind::Create {
            return Ok(CompletionOutcome::complete());
        }

        let props = EmailProperties::from_properties(&query.resource_properties, &self.settings)?;
        let started_at = Self::started_at(query)?;
        let timeout_secs = query
            .data_value(TIMEOUT_SECONDS)
            .and_then(|v| v.as_u64())
            .unwrap_or(props.timeout_secs);

        let status = self.email_api.verification_status(&props.email).await?;
        if status.is_verified() {
            tracing::info!("{} verified", props.email);
            let mut data = Properties::new();
            data.insert("Email".to_string(), props.email.into());
            return Ok(CompletionOutcome::complete_with(data));
        }

        let elapsed_secs = (self.clock.now() - started_at).num_seconds();
        if elapsed_secs >= 0 && elapsed_secs as u64 >= timeout_secs {
            return Err(ProvisionError::VerificationExpired {
                email: props.email,
                elapsed_secs,
                timeout_secs,
            });
        }

        tracing::debug!(
            "{} is {:?} after {}s of {}s",
            props.email,
            status,
            elapsed_secs,
            timeout_secs
        );
        Ok(CompletionOutcome::pending())
    }
}
