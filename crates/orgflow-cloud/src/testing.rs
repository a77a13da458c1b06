//! In-memory collaborators for handler tests

use crate::error::{ProvisionError, Result};
use crate::handler::Clock;
use crate::lifecycle::Properties;
use crate::provider::{
    DnsZoneApi, EmailVerificationApi, OrganizationApi, RecordSet, RoleAssumer, RoleTarget,
};
use crate::status::{CreateAccountStatus, VerificationStatus};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn props(value: serde_json::Value) -> Properties {
    value.as_object().cloned().expect("properties must be an object")
}

#[derive(Default)]
struct OrgState {
    next_request: u32,
    created: Vec<(String, String)>,
    statuses: HashMap<String, CreateAccountStatus>,
    describe_calls: usize,
}

/// Organization API whose request statuses are set by the test
#[derive(Clone, Default)]
pub struct FakeOrganizations {
    state: Arc<Mutex<OrgState>>,
}

impl FakeOrganizations {
    pub fn set_status(&self, status: CreateAccountStatus) {
        let mut state = self.state.lock().unwrap();
        state.statuses.insert(status.request_id.clone(), status);
    }

    pub fn created(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn describe_calls(&self) -> usize {
        self.state.lock().unwrap().describe_calls
    }
}

#[async_trait]
impl OrganizationApi for FakeOrganizations {
    async fn create_account(&self, account_name: &str, email: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.next_request += 1;
        let request_id = format!("car-{}", state.next_request);
        state
            .created
            .push((account_name.to_string(), email.to_string()));
        state.statuses.insert(
            request_id.clone(),
            CreateAccountStatus::in_progress(&request_id),
        );
        Ok(request_id)
    }

    async fn describe_create_account_status(
        &self,
        request_id: &str,
    ) -> Result<CreateAccountStatus> {
        let mut state = self.state.lock().unwrap();
        state.describe_calls += 1;
        state.statuses.get(request_id).cloned().ok_or_else(|| {
            ProvisionError::Api(format!(
                "CreateAccountStatusNotFoundException: {}",
                request_id
            ))
        })
    }
}

#[derive(Default)]
struct ZoneState {
    records: HashMap<(String, String, String), RecordSet>,
    assumed: Vec<RoleTarget>,
    deny_role: Option<String>,
}

/// Hosted zones reachable through an assumed role
#[derive(Clone, Default)]
pub struct FakeZones {
    state: Arc<Mutex<ZoneState>>,
}

impl FakeZones {
    pub fn record(&self, zone: &str, name: &str) -> Option<RecordSet> {
        let state = self.state.lock().unwrap();
        state
            .records
            .get(&(zone.to_string(), name.to_string(), "NS".to_string()))
            .cloned()
    }

    pub fn record_count(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    pub fn assumed(&self) -> Vec<RoleTarget> {
        self.state.lock().unwrap().assumed.clone()
    }

    pub fn deny_role(&self, reason: &str) {
        self.state.lock().unwrap().deny_role = Some(reason.to_string());
    }
}

#[async_trait]
impl RoleAssumer for FakeZones {
    async fn assume_dns_role(&self, target: &RoleTarget) -> Result<Box<dyn DnsZoneApi>> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = &state.deny_role {
            return Err(ProvisionError::RoleAssumption(reason.clone()));
        }
        state.assumed.push(target.clone());
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl DnsZoneApi for FakeZones {
    async fn upsert_record(&self, hosted_zone_id: &str, record: &RecordSet) -> Result<()> {
        let key = (
            hosted_zone_id.to_string(),
            record.name.clone(),
            record.record_type.clone(),
        );
        self.state.lock().unwrap().records.insert(key, record.clone());
        Ok(())
    }

    async fn delete_record(&self, hosted_zone_id: &str, record: &RecordSet) -> Result<()> {
        let key = (
            hosted_zone_id.to_string(),
            record.name.clone(),
            record.record_type.clone(),
        );
        match self.state.lock().unwrap().records.remove(&key) {
            Some(_) => Ok(()),
            None => Err(ProvisionError::RecordNotFound {
                zone: hosted_zone_id.to_string(),
                name: record.name.clone(),
            }),
        }
    }
}

#[derive(Default)]
struct MailboxState {
    sent: Vec<String>,
    statuses: HashMap<String, VerificationStatus>,
}

/// Verification API where the test decides when an address is verified
#[derive(Clone, Default)]
pub struct FakeMailbox {
    state: Arc<Mutex<MailboxState>>,
}

impl FakeMailbox {
    pub fn verify(&self, email: &str) {
        self.state
            .lock()
            .unwrap()
            .statuses
            .insert(email.to_string(), VerificationStatus::Success);
    }

    pub fn sent(&self) -> Vec<String> {
        self.state.lock().unwrap().sent.clone()
    }
}

#[async_trait]
impl EmailVerificationApi for FakeMailbox {
    async fn send_verification(&self, email: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.sent.push(email.to_string());
        state
            .statuses
            .entry(email.to_string())
            .or_insert(VerificationStatus::Pending);
        Ok(())
    }

    async fn verification_status(&self, email: &str) -> Result<VerificationStatus> {
        let state = self.state.lock().unwrap();
        Ok(state
            .statuses
            .get(email)
            .copied()
            .unwrap_or(VerificationStatus::NotStarted))
    }
}

/// Clock advanced explicitly by the test
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap()),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        *self.now.lock().unwrap() += Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
