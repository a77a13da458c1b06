//! Cross-account role assumption for DNS changes

use crate::context::AwsContext;
use crate::error::{AwsError, sdk_error};
use crate::route53::Route53Zone;
use async_trait::async_trait;
use aws_sdk_route53::config::Credentials;
use orgflow_cloud::{DnsZoneApi, ProvisionError, RoleAssumer, RoleTarget};
use std::time::{Duration, UNIX_EPOCH};

/// Session length requested from STS. One delegation change fits well inside it.
const SESSION_DURATION_SECS: i32 = 900;

pub struct StsRoleAssumer {
    context: AwsContext,
    session_name: String,
}

impl StsRoleAssumer {
    pub fn new(context: AwsContext, session_name: impl Into<String>) -> Self {
        Self {
            context,
            session_name: session_name.into(),
        }
    }

    async fn assume(&self, role_arn: &str) -> Result<Credentials, AwsError> {
        let client = aws_sdk_sts::Client::new(self.context.sdk_config());
        let response = client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(&self.session_name)
            .duration_seconds(SESSION_DURATION_SECS)
            .send()
            .await
            .map_err(|e| sdk_error("AssumeRole", e))?;

        let creds = response.credentials().ok_or(AwsError::MissingField {
            operation: "AssumeRole",
            field: "Credentials",
        })?;
        let expiry = creds.expiration();
        let expires_at = u64::try_from(expiry.secs())
            .ok()
            .map(|secs| UNIX_EPOCH + Duration::from_secs(secs));

        Ok(Credentials::new(
            creds.access_key_id(),
            creds.secret_access_key(),
            Some(creds.session_token().to_string()),
            expires_at,
            "orgflow-assume-role",
        ))
    }
}

#[async_trait]
impl RoleAssumer for StsRoleAssumer {
    async fn assume_dns_role(
        &self,
        target: &RoleTarget,
    ) -> orgflow_cloud::Result<Box<dyn DnsZoneApi>> {
        let role_arn = target.role_arn(self.context.partition());
        tracing::info!("Assuming {} as {}", role_arn, self.session_name);

        let credentials = self
            .assume(&role_arn)
            .await
            .map_err(|e| ProvisionError::RoleAssumption(format!("{}: {}", role_arn, e)))?;

        let config = aws_sdk_route53::config::Builder::from(self.context.sdk_config())
            .credentials_provider(credentials)
            .build();
        Ok(Box::new(Route53Zone::new(aws_sdk_route53::Client::from_conf(
            config,
        ))))
    }
}
