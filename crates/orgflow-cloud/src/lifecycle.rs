//! Begin/poll protocol types
//!
//! These are the shapes exchanged with the provisioning driver. Field names
//! serialize in the custom-resource provider framework's PascalCase, so an
//! event emitted by the driver deserializes straight into these types.

use crate::error::{ProvisionError, Result};
use serde::{Deserialize, Serialize};

/// Resource properties / outcome data as delivered by the driver
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Lifecycle action requested by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// Provision a new resource
    Create,
    /// Reconcile an existing resource with new properties
    Update,
    /// Remove a resource
    Delete,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Create => write!(f, "Create"),
            RequestKind::Update => write!(f, "Update"),
            RequestKind::Delete => write!(f, "Delete"),
        }
    }
}

/// Input to a begin (`onEvent`) operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleRequest {
    /// Lifecycle action
    pub request_type: RequestKind,

    /// Handler-specific properties
    #[serde(default)]
    pub resource_properties: Properties,

    /// Identifier returned by the prior Create (Update/Delete only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,

    /// Properties before an Update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Properties>,

    /// Template-level name of the resource, used for logging only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_resource_id: Option<String>,

    /// Template-level type of the resource, used for logging only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl LifecycleRequest {
    pub fn create(resource_properties: Properties) -> Self {
        Self::new(RequestKind::Create, None, resource_properties)
    }

    pub fn update(physical_resource_id: impl Into<String>, resource_properties: Properties) -> Self {
        Self::new(
            RequestKind::Update,
            Some(physical_resource_id.into()),
            resource_properties,
        )
    }

    pub fn delete(physical_resource_id: impl Into<String>, resource_properties: Properties) -> Self {
        Self::new(
            RequestKind::Delete,
            Some(physical_resource_id.into()),
            resource_properties,
        )
    }

    fn new(
        request_type: RequestKind,
        physical_resource_id: Option<String>,
        resource_properties: Properties,
    ) -> Self {
        Self {
            request_type,
            resource_properties,
            physical_resource_id,
            old_resource_properties: None,
            logical_resource_id: None,
            resource_type: None,
        }
    }

    /// The identifier an Update/Delete refers to.
    ///
    /// The driver always supplies it for Update/Delete; its absence means the
    /// event is malformed.
    pub fn existing_physical_id(&self) -> Result<&str> {
        self.physical_resource_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProvisionError::MissingPhysicalResourceId(self.request_type.to_string()))
    }
}

/// Result of a begin operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleOutcome {
    pub physical_resource_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Properties>,
}

impl LifecycleOutcome {
    pub fn new(physical_resource_id: impl Into<String>) -> Self {
        Self {
            physical_resource_id: physical_resource_id.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data
            .get_or_insert_with(Properties::new)
            .insert(key.into(), value);
        self
    }
}

/// Input to a poll (`isComplete`) operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompletionQuery {
    pub request_type: RequestKind,

    #[serde(default)]
    pub resource_properties: Properties,

    pub physical_resource_id: String,

    /// Data returned by the begin operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Properties>,
}

impl CompletionQuery {
    /// Build the query the driver issues after `request` produced `outcome`.
    pub fn for_outcome(request: &LifecycleRequest, outcome: &LifecycleOutcome) -> Self {
        Self {
            request_type: request.request_type,
            resource_properties: request.resource_properties.clone(),
            physical_resource_id: outcome.physical_resource_id.clone(),
            data: outcome.data.clone(),
        }
    }

    /// Look up a value carried over from the begin operation
    pub fn data_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.as_ref().and_then(|d| d.get(key))
    }
}

/// Result of a poll operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompletionOutcome {
    pub is_complete: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Properties>,
}

impl CompletionOutcome {
    /// Still pending; the driver should poll again later
    pub fn pending() -> Self {
        Self {
            is_complete: false,
            data: None,
        }
    }

    pub fn complete() -> Self {
        Self {
            is_complete: true,
            data: None,
        }
    }

    pub fn complete_with(data: Properties) -> Self {
        Self {
            is_complete: true,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_from_driver_event() {
        let event = json!({
            "RequestType": "Update",
            "ServiceToken": "arn:aws:lambda:us-east-1:111122223333:function:provider",
            "LogicalResourceId": "Workload",
            "PhysicalResourceId": "car-123",
            "ResourceProperties": {"AccountName": "workload", "Email": "root@example.com"},
            "OldResourceProperties": {"AccountName": "workload", "Email": "root@example.com"}
        });

        let request: LifecycleRequest = serde_json::from_value(event).unwrap();
        assert_eq!(request.request_type, RequestKind::Update);
        assert_eq!(request.existing_physical_id().unwrap(), "car-123");
        assert_eq!(request.logical_resource_id.as_deref(), Some("Workload"));
        assert_eq!(request.resource_properties["AccountName"], json!("workload"));
    }

    #[test]
    fn test_missing_physical_id_is_rejected() {
        let request = LifecycleRequest {
            physical_resource_id: Some(String::new()),
            ..LifecycleRequest::delete("x", Properties::new())
        };
        let err = request.existing_physical_id().unwrap_err();
        assert!(matches!(err, ProvisionError::MissingPhysicalResourceId(kind) if kind == "Delete"));
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = LifecycleOutcome::new("car-123");
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"PhysicalResourceId": "car-123"})
        );

        let outcome = outcome.with_data("StartedAt", json!("2026-10-15T00:00:00Z"));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"PhysicalResourceId": "car-123", "Data": {"StartedAt": "2026-10-15T00:00:00Z"}})
        );

        assert_eq!(
            serde_json::to_value(CompletionOutcome::pending()).unwrap(),
            json!({"IsComplete": false})
        );
    }

    #[test]
    fn test_query_for_outcome_carries_data() {
        let request = LifecycleRequest::create(Properties::new());
        let outcome = LifecycleOutcome::new("id-1").with_data("TimeoutSeconds", json!(30));
        let query = CompletionQuery::for_outcome(&request, &outcome);

        assert_eq!(query.request_type, RequestKind::Create);
        assert_eq!(query.physical_resource_id, "id-1");
        assert_eq!(query.data_value("TimeoutSeconds"), Some(&json!(30)));
        assert_eq!(query.data_value("Missing"), None);
    }
}
