//! Cross-account NS delegation records
//!
//! The record lives in a hosted zone owned by another account. Each
//! invocation assumes a role in that account, performs exactly one DNS change
//! and drops the session. The change is synchronous, so there is no poll
//! phase.

use crate::error::{ProvisionError, Result};
use crate::handler::{HandlerSettings, LifecycleHandler};
use crate::lifecycle::{LifecycleOutcome, LifecycleRequest, Properties, RequestKind};
use crate::properties::PropertyReader;
use crate::provider::{RecordSet, RoleAssumer, RoleTarget};
use async_trait::async_trait;

/// Validated delegation properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationProperties {
    pub target: RoleTarget,
    pub hosted_zone_id: String,
    /// Lower-case, without trailing dot
    pub record_name: String,
    pub name_servers: Vec<String>,
    pub ttl: u64,
}

impl DelegationProperties {
    pub fn from_properties(props: &Properties, settings: &HandlerSettings) -> Result<Self> {
        let reader = PropertyReader::new(props);

        let account_id = reader.required_str("TargetAccount")?;
        if account_id.len() != 12 || !account_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProvisionError::InvalidProperties(format!(
                "TargetAccount must be a 12-digit account id: {}",
                account_id
            )));
        }
        let role_name = reader.required_str("TargetRoleToAssume")?;
        let hosted_zone_id = reader
            .required_str("TargetHostedZoneId")?
            .trim_start_matches("/hostedzone/")
            .to_string();
        let record_name = normalize_record_name(reader.required_str("RecordName")?);
        if record_name.is_empty() {
            return Err(ProvisionError::InvalidProperties(
                "RecordName must not be the root".to_string(),
            ));
        }
        let name_servers = reader.string_list("ToDelegateNameServers")?;
        let ttl = reader
            .optional_u64("TTL")?
            .unwrap_or(settings.record_ttl_secs);

        Ok(Self {
            target: RoleTarget::new(account_id, role_name),
            hosted_zone_id,
            record_name,
            name_servers,
            ttl,
        })
    }

    /// `<zone>/<record name>`; changes only when the record moves
    pub fn physical_id(&self) -> String {
        format!("{}/{}", self.hosted_zone_id, self.record_name)
    }

    pub fn record(&self) -> RecordSet {
        RecordSet::ns(
            format!("{}.", self.record_name),
            self.ttl,
            self.name_servers.clone(),
        )
    }
}

fn normalize_record_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Handler for `Custom::DelegationRecord` resources
pub struct DelegationRecordHandler<R> {
    roles: R,
    settings: HandlerSettings,
}

impl<R: RoleAssumer> DelegationRecordHandler<R> {
    pub fn new(roles: R, settings: HandlerSettings) -> Self {
        Self { roles, settings }
    }
}

#[async_trait]
impl<R: RoleAssumer> LifecycleHandler for DelegationRecordHandler<R> {
    fn name(&self) -> &str {
        "delegation"
    }

    async fn on_event(&self, request: &LifecycleRequest) -> Result<LifecycleOutcome> {
        let props =
            DelegationProperties::from_properties(&request.resource_properties, &self.settings)?;
        let record = props.record();

        tracing::debug!(
            "Assuming {} in {} for zone {}",
            props.target.role_name,
            props.target.account_id,
            props.hosted_zone_id
        );
        let dns = self.roles.assume_dns_role(&props.target).await?;

        match request.request_type {
            RequestKind::Create | RequestKind::Update => {
                tracing::info!(
                    "Upserting NS {} -> [{}] in {}",
                    record.name,
                    record.values.join(", "),
                    props.hosted_zone_id
                );
                dns.upsert_record(&props.hosted_zone_id, &record).await?;
                Ok(LifecycleOutcome::new(props.physical_id()))
            }
            RequestKind::Delete => {
                tracing::info!("Deleting NS {} in {}", record.name, props.hosted_zone_id);
                dns.delete_record(&props.hosted_zone_id, &record).await?;
                let physical_id = request
                    .physical_resource_id
                    .clone()
                    .unwrap_or_else(|| props.physical_id());
                Ok(LifecycleOutcome::new(physical_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeZones, props};
    use serde_json::json;
    use tokio_test::assert_err;

    fn delegation_props() -> Properties {
        props(json!({
            "TargetAccount": "111122223333",
            "TargetRoleToAssume": "DnsDelegationRole",
            "TargetHostedZoneId": "Z0123456789ABC",
            "RecordName": "sub.example.com",
            "ToDelegateNameServers": ["ns1.example.com", "ns2.example.com"]
        }))
    }

    fn handler(zones: &FakeZones) -> DelegationRecordHandler<FakeZones> {
        DelegationRecordHandler::new(zones.clone(), HandlerSettings::default())
    }

    #[tokio::test]
    async fn test_create_upserts_ns_record() {
        let zones = FakeZones::default();
        let outcome = handler(&zones)
            .on_event(&LifecycleRequest::create(delegation_props()))
            .await
            .unwrap();

        assert_eq!(outcome.physical_resource_id, "Z0123456789ABC/sub.example.com");
        let record = zones.record("Z0123456789ABC", "sub.example.com.").unwrap();
        assert_eq!(record.record_type, "NS");
        assert_eq!(record.values, vec!["ns1.example.com", "ns2.example.com"]);
        assert_eq!(record.ttl, 172_800);
        assert_eq!(
            zones.assumed(),
            vec![RoleTarget::new("111122223333", "DnsDelegationRole")]
        );
    }

    #[tokio::test]
    async fn test_rerunning_create_is_idempotent() {
        let zones = FakeZones::default();
        let handler = handler(&zones);

        let first = handler
            .on_event(&LifecycleRequest::create(delegation_props()))
            .await
            .unwrap();
        let before = zones.record("Z0123456789ABC", "sub.example.com.");

        let second = handler
            .on_event(&LifecycleRequest::create(delegation_props()))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(zones.record("Z0123456789ABC", "sub.example.com."), before);
        assert_eq!(zones.record_count(), 1);
    }

    #[tokio::test]
    async fn test_create_overwrites_existing_record() {
        let zones = FakeZones::default();
        let handler = handler(&zones);

        let mut stale = delegation_props();
        stale.insert("ToDelegateNameServers".to_string(), json!(["old.example.net"]));
        handler
            .on_event(&LifecycleRequest::create(stale))
            .await
            .unwrap();

        handler
            .on_event(&LifecycleRequest::create(delegation_props()))
            .await
            .unwrap();

        let record = zones.record("Z0123456789ABC", "sub.example.com.").unwrap();
        assert_eq!(record.values, vec!["ns1.example.com", "ns2.example.com"]);
    }

    #[tokio::test]
    async fn test_update_with_same_properties_keeps_physical_id() {
        let zones = FakeZones::default();
        let handler = handler(&zones);

        let created = handler
            .on_event(&LifecycleRequest::create(delegation_props()))
            .await
            .unwrap();
        let updated = handler
            .on_event(&LifecycleRequest::update(
                created.physical_resource_id.clone(),
                delegation_props(),
            ))
            .await
            .unwrap();

        assert_eq!(updated.physical_resource_id, created.physical_resource_id);
    }

    #[tokio::test]
    async fn test_update_moving_record_changes_physical_id() {
        let zones = FakeZones::default();
        let handler = handler(&zones);

        let created = handler
            .on_event(&LifecycleRequest::create(delegation_props()))
            .await
            .unwrap();

        let mut moved = delegation_props();
        moved.insert("RecordName".to_string(), json!("Other.Example.com."));
        let updated = handler
            .on_event(&LifecycleRequest::update(
                created.physical_resource_id.clone(),
                moved,
            ))
            .await
            .unwrap();

        assert_eq!(updated.physical_resource_id, "Z0123456789ABC/other.example.com");
        assert!(zones.record("Z0123456789ABC", "other.example.com.").is_some());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let zones = FakeZones::default();
        let handler = handler(&zones);

        let created = handler
            .on_event(&LifecycleRequest::create(delegation_props()))
            .await
            .unwrap();
        let deleted = handler
            .on_event(&LifecycleRequest::delete(
                created.physical_resource_id.clone(),
                delegation_props(),
            ))
            .await
            .unwrap();

        assert_eq!(deleted.physical_resource_id, created.physical_resource_id);
        assert_eq!(zones.record_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_of_missing_record_fails() {
        let zones = FakeZones::default();
        let err = handler(&zones)
            .on_event(&LifecycleRequest::delete(
                "Z0123456789ABC/sub.example.com",
                delegation_props(),
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProvisionError::RecordNotFound { zone, name }
                if zone == "Z0123456789ABC" && name == "sub.example.com."
        ));
    }

    #[tokio::test]
    async fn test_role_assumption_failure_is_terminal() {
        let zones = FakeZones::default();
        zones.deny_role("AccessDenied: not authorized to perform sts:AssumeRole");

        let result = handler(&zones)
            .on_event(&LifecycleRequest::create(delegation_props()))
            .await;
        let err = assert_err!(result);

        assert!(err.to_string().contains("AccessDenied"));
        assert_eq!(zones.record_count(), 0);
    }

    #[test]
    fn test_properties_normalization() {
        let mut p = delegation_props();
        p.insert("TargetHostedZoneId".to_string(), json!("/hostedzone/Z0123456789ABC"));
        p.insert("RecordName".to_string(), json!("Sub.Example.COM."));
        p.insert("TTL".to_string(), json!("300"));

        let parsed =
            DelegationProperties::from_properties(&p, &HandlerSettings::default()).unwrap();
        assert_eq!(parsed.hosted_zone_id, "Z0123456789ABC");
        assert_eq!(parsed.record_name, "sub.example.com");
        assert_eq!(parsed.ttl, 300);
        assert_eq!(parsed.record().name, "sub.example.com.");
    }

    #[test]
    fn test_properties_validation() {
        let settings = HandlerSettings::default();

        let mut bad_account = delegation_props();
        bad_account.insert("TargetAccount".to_string(), json!("1234"));
        assert!(DelegationProperties::from_properties(&bad_account, &settings).is_err());

        let mut no_servers = delegation_props();
        no_servers.insert("ToDelegateNameServers".to_string(), json!([]));
        assert!(DelegationProperties::from_properties(&no_servers, &settings).is_err());

        let mut root = delegation_props();
        root.insert("RecordName".to_string(), json!("."));
        assert!(DelegationProperties::from_properties(&root, &settings).is_err());

        let mut no_role = delegation_props();
        no_role.remove("TargetRoleToAssume");
        assert!(matches!(
            DelegationProperties::from_properties(&no_role, &settings),
            Err(ProvisionError::MissingProperty(key)) if key == "TargetRoleToAssume"
        ));
    }
}
