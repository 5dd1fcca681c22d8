// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use geoprocessing::models::{JobStatusResponse, SubmitJobResponse};
use geoprocessing::GpError;
use sqlx::types::Json;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{
    BaseExtractJobStore, BaseGeoprocessingService, BaseHistoryStore, BaseNotifier, MailError,
    ServerDeps, StoreError,
};
use crate::domains::extracts::models::{AreaOfInterest, ExtractJob, Geom, STATUS_PENDING};
use crate::domains::extracts::notifications::NotificationTemplate;

// =============================================================================
// Mock Geoprocessing Service
// =============================================================================

/// A scripted service failure. Converted into a `GpError` when the call happens.
#[derive(Debug, Clone, PartialEq)]
pub enum MockGpFailure {
    /// The request never reached the service
    Unreachable,
    /// Non-2xx HTTP response
    HttpStatus(u16),
    /// 200 response carrying an `error` envelope
    Service { code: i64, message: String },
}

impl MockGpFailure {
    async fn into_error(self) -> GpError {
        match self {
            MockGpFailure::Unreachable => {
                // A relative URL fails inside reqwest before any I/O
                match reqwest::Client::new().get("not a url").send().await {
                    Err(e) => GpError::Transport(e),
                    Ok(_) => GpError::Status {
                        status: 0,
                        body: "unreachable".to_string(),
                    },
                }
            }
            MockGpFailure::HttpStatus(status) => GpError::Status {
                status,
                body: String::new(),
            },
            MockGpFailure::Service { code, message } => GpError::Service { code, message },
        }
    }
}

/// Scripted answer to a submit call
#[derive(Debug, Clone, PartialEq)]
pub enum MockSubmit {
    Accepted(String),
    /// Answered with a job id but the given (non-submitted) status
    Status(String),
    Fail(MockGpFailure),
}

/// Scripted answer to a status poll
#[derive(Debug, Clone, PartialEq)]
pub enum MockPoll {
    Status(String),
    Fail(MockGpFailure),
}

impl MockPoll {
    pub fn status(status: &str) -> Self {
        MockPoll::Status(status.to_string())
    }
}

/// The URL handed out for succeeded jobs without a scripted result
pub fn default_result_url(job_id: &str) -> String {
    format!("https://gp.example.org/jobs/{}/Output_Zip_File.zip", job_id)
}

pub struct MockGeoprocessingService {
    submits: Arc<Mutex<VecDeque<MockSubmit>>>,
    polls: Arc<Mutex<HashMap<String, VecDeque<MockPoll>>>>,
    results: Arc<Mutex<HashMap<String, MockGpFailure>>>,
    submit_calls: Arc<Mutex<Vec<String>>>,
    poll_calls: Arc<Mutex<Vec<String>>>,
    result_calls: Arc<Mutex<Vec<String>>>,
}

impl MockGeoprocessingService {
    pub fn new() -> Self {
        Self {
            submits: Arc::new(Mutex::new(VecDeque::new())),
            polls: Arc::new(Mutex::new(HashMap::new())),
            results: Arc::new(Mutex::new(HashMap::new())),
            submit_calls: Arc::new(Mutex::new(Vec::new())),
            poll_calls: Arc::new(Mutex::new(Vec::new())),
            result_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue the answer to the next submit call.
    /// With nothing queued, submits are accepted as `job-<n>`.
    pub fn with_submit(self, submit: MockSubmit) -> Self {
        self.submits.lock().unwrap().push_back(submit);
        self
    }

    /// Script the statuses a job reports, one per poll. The last entry repeats.
    pub fn with_polls(self, job_id: &str, polls: Vec<MockPoll>) -> Self {
        self.polls
            .lock()
            .unwrap()
            .insert(job_id.to_string(), polls.into_iter().collect());
        self
    }

    /// Shorthand for a job that always reports `status`
    pub fn with_status(self, job_id: &str, status: &str) -> Self {
        self.with_polls(job_id, vec![MockPoll::status(status)])
    }

    /// Make the result lookup for a job fail
    pub fn with_result_failure(self, job_id: &str, failure: MockGpFailure) -> Self {
        self.results
            .lock()
            .unwrap()
            .insert(job_id.to_string(), failure);
        self
    }

    /// Replace the script of a job after construction
    pub fn set_polls(&self, job_id: &str, polls: Vec<MockPoll>) {
        self.polls
            .lock()
            .unwrap()
            .insert(job_id.to_string(), polls.into_iter().collect());
    }

    /// Area-of-interest payloads that were submitted
    pub fn submit_calls(&self) -> Vec<String> {
        self.submit_calls.lock().unwrap().clone()
    }

    pub fn poll_calls(&self) -> Vec<String> {
        self.poll_calls.lock().unwrap().clone()
    }

    pub fn poll_count(&self, job_id: &str) -> usize {
        self.poll_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == job_id)
            .count()
    }

    pub fn result_calls(&self) -> Vec<String> {
        self.result_calls.lock().unwrap().clone()
    }

    fn next_poll(&self, job_id: &str) -> Option<MockPoll> {
        let mut polls = self.polls.lock().unwrap();
        let script = polls.get_mut(job_id)?;
        if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        }
    }
}

#[async_trait]
impl BaseGeoprocessingService for MockGeoprocessingService {
    async fn submit_job(&self, area_of_interest: &str) -> Result<SubmitJobResponse, GpError> {
        let call_number = {
            let mut calls = self.submit_calls.lock().unwrap();
            calls.push(area_of_interest.to_string());
            calls.len()
        };

        let next = self.submits.lock().unwrap().pop_front();
        match next {
            Some(MockSubmit::Fail(failure)) => Err(failure.into_error().await),
            Some(MockSubmit::Accepted(job_id)) => Ok(SubmitJobResponse {
                job_id: Some(job_id),
                job_status: Some("esriJobSubmitted".to_string()),
            }),
            Some(MockSubmit::Status(status)) => Ok(SubmitJobResponse {
                job_id: Some(format!("job-{}", call_number)),
                job_status: Some(status),
            }),
            None => Ok(SubmitJobResponse {
                job_id: Some(format!("job-{}", call_number)),
                job_status: Some("esriJobSubmitted".to_string()),
            }),
        }
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, GpError> {
        self.poll_calls.lock().unwrap().push(job_id.to_string());

        match self.next_poll(job_id) {
            Some(MockPoll::Status(status)) => Ok(JobStatusResponse {
                job_id: Some(job_id.to_string()),
                job_status: Some(status),
                results: HashMap::new(),
            }),
            Some(MockPoll::Fail(failure)) => Err(failure.into_error().await),
            None => Err(GpError::Service {
                code: 400,
                message: format!("Invalid job id {}", job_id),
            }),
        }
    }

    async fn job_result_url(&self, job_id: &str) -> Result<String, GpError> {
        self.result_calls.lock().unwrap().push(job_id.to_string());

        let failure = self.results.lock().unwrap().get(job_id).cloned();
        match failure {
            Some(failure) => Err(failure.into_error().await),
            None => Ok(default_result_url(job_id)),
        }
    }
}

impl Default for MockGeoprocessingService {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Mock Notifier
// =============================================================================

/// A notification captured by the mock notifier
#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub recipient: String,
    pub template: NotificationTemplate,
}

pub struct MockNotifier {
    sent: Arc<Mutex<Vec<SentNotification>>>,
    attempts: Arc<AtomicUsize>,
    fail_all: Arc<AtomicBool>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(AtomicUsize::new(0)),
            fail_all: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reject every send until `set_failing(false)`
    pub fn failing(self) -> Self {
        self.set_failing(true);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_all.store(failing, Ordering::SeqCst);
    }

    /// Successfully delivered notifications
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<NotificationTemplate> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.recipient == recipient)
            .map(|n| n.template.clone())
            .collect()
    }

    /// Send attempts, including rejected ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn send(&self, recipient: &str, template: &NotificationTemplate) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail_all.load(Ordering::SeqCst) {
            return Err(MailError::Rejected(format!(
                "mock relay refused mail to {}",
                recipient
            )));
        }

        self.sent.lock().unwrap().push(SentNotification {
            recipient: recipient.to_string(),
            template: template.clone(),
        });
        Ok(())
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// In-memory Extract Job Store
// =============================================================================

pub struct InMemoryExtractJobStore {
    jobs: Arc<Mutex<BTreeMap<String, ExtractJob>>>,
    fail_insert: Arc<AtomicBool>,
    fail_list: Arc<AtomicBool>,
    fail_delete: Arc<AtomicBool>,
    delete_calls: Arc<Mutex<Vec<String>>>,
}

impl InMemoryExtractJobStore {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(BTreeMap::new())),
            fail_insert: Arc::new(AtomicBool::new(false)),
            fail_list: Arc::new(AtomicBool::new(false)),
            fail_delete: Arc::new(AtomicBool::new(false)),
            delete_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Seed a job created now
    pub fn with_job(self, job_id: &str, email: &str) -> Self {
        self.with_job_created_at(job_id, email, Utc::now())
    }

    /// Seed a job with an explicit creation time
    pub fn with_job_created_at(self, job_id: &str, email: &str, created_at: DateTime<Utc>) -> Self {
        self.jobs.lock().unwrap().insert(
            job_id.to_string(),
            ExtractJob {
                job_id: job_id.to_string(),
                email: email.to_string(),
                status: STATUS_PENDING.to_string(),
                created_at,
            },
        );
        self
    }

    pub fn set_fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn jobs(&self) -> Vec<ExtractJob> {
        self.jobs.lock().unwrap().values().cloned().collect()
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.jobs.lock().unwrap().contains_key(job_id)
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseExtractJobStore for InMemoryExtractJobStore {
    async fn insert(&self, job_id: &str, owner_email: &str) -> Result<(), StoreError> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("insert failed".to_string()));
        }

        self.jobs
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_insert_with(|| ExtractJob {
                job_id: job_id.to_string(),
                email: owner_email.to_string(),
                status: STATUS_PENDING.to_string(),
                created_at: Utc::now(),
            });
        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<ExtractJob>, StoreError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("list failed".to_string()));
        }
        Ok(self.jobs())
    }

    async fn delete(&self, job_id: &str) -> Result<(), StoreError> {
        self.delete_calls.lock().unwrap().push(job_id.to_string());

        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("delete failed".to_string()));
        }

        self.jobs.lock().unwrap().remove(job_id);
        Ok(())
    }
}

impl Default for InMemoryExtractJobStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// In-memory History Store
// =============================================================================

pub struct InMemoryHistoryStore {
    areas: Arc<Mutex<Vec<AreaOfInterest>>>,
    next_id: Arc<AtomicUsize>,
    fail_insert: Arc<AtomicBool>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            areas: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(1)),
            fail_insert: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    pub fn areas(&self) -> Vec<AreaOfInterest> {
        self.areas.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseHistoryStore for InMemoryHistoryStore {
    async fn insert(&self, user_id: &str, geom: &Geom, title: &str) -> Result<i64, StoreError> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("history insert failed".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        self.areas.lock().unwrap().push(AreaOfInterest {
            id,
            user_id: user_id.to_string(),
            geom: Json(geom.clone()),
            title: title.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<AreaOfInterest>, StoreError> {
        let mut areas: Vec<AreaOfInterest> = self
            .areas
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        areas.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(areas)
    }

    async fn delete_for_user(&self, id: i64, user_id: &str) -> Result<bool, StoreError> {
        let mut areas = self.areas.lock().unwrap();
        let before = areas.len();
        areas.retain(|a| !(a.id == id && a.user_id == user_id));
        Ok(areas.len() < before)
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub job_store: Arc<InMemoryExtractJobStore>,
    pub history_store: Arc<InMemoryHistoryStore>,
    pub geoprocessing: Arc<MockGeoprocessingService>,
    pub notifier: Arc<MockNotifier>,
    pub admin_email: Option<String>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            job_store: Arc::new(InMemoryExtractJobStore::new()),
            history_store: Arc::new(InMemoryHistoryStore::new()),
            geoprocessing: Arc::new(MockGeoprocessingService::new()),
            notifier: Arc::new(MockNotifier::new()),
            admin_email: None,
        }
    }

    /// Set a seeded job store
    pub fn mock_job_store(mut self, store: InMemoryExtractJobStore) -> Self {
        self.job_store = Arc::new(store);
        self
    }

    /// Set a mock geoprocessing service
    pub fn mock_geoprocessing(mut self, service: MockGeoprocessingService) -> Self {
        self.geoprocessing = Arc::new(service);
        self
    }

    /// Set a mock notifier
    pub fn mock_notifier(mut self, notifier: MockNotifier) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Enable internal-error alerts to `email`
    pub fn admin_email(mut self, email: &str) -> Self {
        self.admin_email = Some(email.to_string());
        self
    }

    /// Convert into ServerDeps for testing. The mocks stay shared with `self`.
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.job_store.clone(),
            self.history_store.clone(),
            self.geoprocessing.clone(),
            self.notifier.clone(),
            self.admin_email.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
