//! Per-invocation AWS configuration
//!
//! An `AwsContext` is loaded at the start of an invocation and dropped at its
//! end. Nothing here is cached process-wide.

use crate::email::SesEmailVerification;
use crate::organizations::AwsOrganizations;
use crate::sts::StsRoleAssumer;
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Shared SDK configuration for one invocation
#[derive(Clone, Debug)]
pub struct AwsContext {
    config: SdkConfig,
}

impl AwsContext {
    /// Load credentials and region from the environment. An explicit region
    /// overrides the environment's.
    pub async fn load(region: Option<&str>) -> Self {
        let loader = aws_config::defaults(BehaviorVersion::latest());
        let config = match region {
            Some(region) => loader.region(Region::new(region.to_string())).load().await,
            None => loader.load().await,
        };
        tracing::debug!(
            "Loaded AWS config (region: {})",
            config
                .region()
                .map(|r| r.as_ref().to_string())
                .unwrap_or_else(|| "unset".to_string())
        );
        Self { config }
    }

    pub fn from_sdk_config(config: SdkConfig) -> Self {
        Self { config }
    }

    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// ARN partition of the configured region
    pub fn partition(&self) -> &'static str {
        partition_for_region(self.config.region().map(|r| r.as_ref()).unwrap_or_default())
    }

    pub fn organizations(&self) -> AwsOrganizations {
        AwsOrganizations::new(aws_sdk_organizations::Client::new(&self.config))
    }

    pub fn role_assumer(&self, session_name: impl Into<String>) -> StsRoleAssumer {
        StsRoleAssumer::new(self.clone(), session_name)
    }

    pub fn email_verification(&self) -> SesEmailVerification {
        SesEmailVerification::new(aws_sdk_ses::Client::new(&self.config))
    }
}

pub fn partition_for_region(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else if region.starts_with("us-iso-") {
        "aws-iso"
    } else if region.starts_with("us-isob-") {
        "aws-iso-b"
    } else {
        "aws"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_for_region() {
        assert_eq!(partition_for_region("us-east-1"), "aws");
        assert_eq!(partition_for_region("ap-northeast-1"), "aws");
        assert_eq!(partition_for_region("cn-north-1"), "aws-cn");
        assert_eq!(partition_for_region("us-gov-west-1"), "aws-us-gov");
        assert_eq!(partition_for_region("us-isob-east-1"), "aws-iso-b");
        assert_eq!(partition_for_region(""), "aws");
    }

    #[test]
    fn test_partition_from_config() {
        let config = SdkConfig::builder()
            .region(Region::new("cn-northwest-1"))
            .behavior_version(BehaviorVersion::latest())
            .build();
        let context = AwsContext::from_sdk_config(config);
        assert_eq!(context.partition(), "aws-cn");
    }
}
