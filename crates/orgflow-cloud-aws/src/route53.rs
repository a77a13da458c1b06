//! Route 53 record changes

use crate::error::{AwsError, Result, sdk_error};
use async_trait::async_trait;
use aws_sdk_route53::Client;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use orgflow_cloud::{DnsZoneApi, ProvisionError, RecordSet};

/// Route 53 client bound to one assumed-role session
pub struct Route53Zone {
    client: Client,
}

impl Route53Zone {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn change(
        &self,
        hosted_zone_id: &str,
        action: ChangeAction,
        record: &RecordSet,
    ) -> Result<()> {
        let batch = change_batch(action.clone(), record)?;
        self.client
            .change_resource_record_sets()
            .hosted_zone_id(hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| sdk_error("ChangeResourceRecordSets", e))?;

        tracing::debug!(
            "Route 53 {} of {} {} in {} submitted",
            action.as_str(),
            record.record_type,
            record.name,
            hosted_zone_id
        );
        Ok(())
    }
}

#[async_trait]
impl DnsZoneApi for Route53Zone {
    async fn upsert_record(
        &self,
        hosted_zone_id: &str,
        record: &RecordSet,
    ) -> orgflow_cloud::Result<()> {
        self.change(hosted_zone_id, ChangeAction::Upsert, record)
            .await
            .map_err(Into::into)
    }

    async fn delete_record(
        &self,
        hosted_zone_id: &str,
        record: &RecordSet,
    ) -> orgflow_cloud::Result<()> {
        self.change(hosted_zone_id, ChangeAction::Delete, record)
            .await
            .map_err(|err| {
                if is_missing_record(&err) {
                    ProvisionError::RecordNotFound {
                        zone: hosted_zone_id.to_string(),
                        name: record.name.clone(),
                    }
                } else {
                    err.into()
                }
            })
    }
}

/// Route 53 rejects a DELETE of a nonexistent set with `InvalidChangeBatch`
/// and a message like "Tried to delete resource record set [...] but it was
/// not found"
pub fn is_missing_record(err: &AwsError) -> bool {
    err.code() == Some("InvalidChangeBatch")
        && err
            .message()
            .is_some_and(|m| m.to_ascii_lowercase().contains("not found"))
}

pub fn change_batch(action: ChangeAction, record: &RecordSet) -> Result<ChangeBatch> {
    let build = |e: aws_sdk_route53::error::BuildError| AwsError::Build(e.to_string());

    let ttl = i64::try_from(record.ttl)
        .map_err(|_| AwsError::Build(format!("TTL out of range: {}", record.ttl)))?;
    let values = record
        .values
        .iter()
        .map(|v| ResourceRecord::builder().value(v).build().map_err(build))
        .collect::<Result<Vec<_>>>()?;

    let record_set = ResourceRecordSet::builder()
        .name(&record.name)
        .r#type(RrType::from(record.record_type.as_str()))
        .ttl(ttl)
        .set_resource_records(Some(values))
        .build()
        .map_err(build)?;
    let change = Change::builder()
        .action(action)
        .resource_record_set(record_set)
        .build()
        .map_err(build)?;

    ChangeBatch::builder()
        .comment(format!("orgflow delegation for {}", record.name))
        .changes(change)
        .build()
        .map_err(build)
}
