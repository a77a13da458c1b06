//! SES email identity verification

use crate::error::sdk_error;
use async_trait::async_trait;
use aws_sdk_ses::Client;
use aws_sdk_ses::types::IdentityVerificationAttributes;
use orgflow_cloud::{EmailVerificationApi, VerificationStatus};
use std::collections::HashMap;

pub struct SesEmailVerification {
    client: Client,
}

impl SesEmailVerification {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmailVerificationApi for SesEmailVerification {
    async fn send_verification(&self, email: &str) -> orgflow_cloud::Result<()> {
        self.client
            .verify_email_identity()
            .email_address(email)
            .send()
            .await
            .map_err(|e| sdk_error("VerifyEmailIdentity", e))?;

        tracing::info!("Sent verification mail to {}", email);
        Ok(())
    }

    async fn verification_status(&self, email: &str) -> orgflow_cloud::Result<VerificationStatus> {
        let response = self
            .client
            .get_identity_verification_attributes()
            .identities(email)
            .send()
            .await
            .map_err(|e| sdk_error("GetIdentityVerificationAttributes", e))?;

        lookup_status(response.verification_attributes(), email)
    }
}

/// An identity SES has never seen is absent from the map rather than
/// reported with a status
pub fn lookup_status(
    attributes: &HashMap<String, IdentityVerificationAttributes>,
    email: &str,
) -> orgflow_cloud::Result<VerificationStatus> {
    match attributes.get(email) {
        Some(attr) => attr.verification_status().as_str().parse(),
        None => Ok(VerificationStatus::NotStarted),
    }
}
