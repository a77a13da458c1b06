//! External control-plane interfaces
//!
//! Handlers talk to the cloud only through these traits. `orgflow-cloud-aws`
//! implements them on the AWS SDK; tests implement them in memory.
//! Implementations are built per invocation and must not cache sessions
//! across invocations.

use crate::error::Result;
use crate::status::{CreateAccountStatus, VerificationStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Organization-management API
#[async_trait]
pub trait OrganizationApi: Send + Sync {
    /// Submit an account-creation request and return its request id
    async fn create_account(&self, account_name: &str, email: &str) -> Result<String>;

    /// Current status of a creation request
    async fn describe_create_account_status(&self, request_id: &str)
    -> Result<CreateAccountStatus>;
}

/// DNS hosted-zone API
#[async_trait]
pub trait DnsZoneApi: Send + Sync {
    /// Create the record set, or overwrite it if a set with the same name and
    /// type already exists
    async fn upsert_record(&self, hosted_zone_id: &str, record: &RecordSet) -> Result<()>;

    /// Delete the record set. Fails with `ProvisionError::RecordNotFound` if
    /// it does not exist.
    async fn delete_record(&self, hosted_zone_id: &str, record: &RecordSet) -> Result<()>;
}

/// Cross-account role assumption
///
/// The returned session is owned by the caller and dropped at the end of the
/// invocation that acquired it.
#[async_trait]
pub trait RoleAssumer: Send + Sync {
    async fn assume_dns_role(&self, target: &RoleTarget) -> Result<Box<dyn DnsZoneApi>>;
}

/// Email verification API
#[async_trait]
pub trait EmailVerificationApi: Send + Sync {
    async fn send_verification(&self, email: &str) -> Result<()>;

    async fn verification_status(&self, email: &str) -> Result<VerificationStatus>;
}

/// Role to assume in another account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTarget {
    pub account_id: String,
    pub role_name: String,
}

impl RoleTarget {
    pub fn new(account_id: impl Into<String>, role_name: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            role_name: role_name.into(),
        }
    }

    /// IAM role ARN in the given partition (`aws`, `aws-cn`, ...)
    pub fn role_arn(&self, partition: &str) -> String {
        format!(
            "arn:{}:iam::{}:role/{}",
            partition, self.account_id, self.role_name
        )
    }
}

/// A DNS resource record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Fully-qualified name, with trailing dot
    pub name: String,

    /// Record type (e.g. "NS")
    pub record_type: String,

    pub ttl: u64,

    pub values: Vec<String>,
}

impl RecordSet {
    /// NS record delegating `name` to `name_servers`
    pub fn ns(name: impl Into<String>, ttl: u64, name_servers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            record_type: "NS".to_string(),
            ttl,
            values: name_servers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_arn() {
        let target = RoleTarget::new("111122223333", "DnsDelegationRole");
        assert_eq!(
            target.role_arn("aws"),
            "arn:aws:iam::111122223333:role/DnsDelegationRole"
        );
        assert_eq!(
            target.role_arn("aws-cn"),
            "arn:aws-cn:iam::111122223333:role/DnsDelegationRole"
        );
    }

    #[test]
    fn test_ns_record() {
        let record = RecordSet::ns("sub.example.com.", 300, vec!["ns1.example.com".into()]);
        assert_eq!(record.record_type, "NS");
        assert_eq!(record.ttl, 300);
        assert_eq!(record.values, vec!["ns1.example.com"]);
    }
}
