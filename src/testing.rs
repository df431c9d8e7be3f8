//! Test doubles shared by the unit tests.

use crate::api::{ApiClient, Method, Request, Response, Transport};
use crate::error::{ApiError, StoreError};
use crate::project::{Project, ProjectStatus};
use crate::task::{Task, TaskStatus};
use crate::token_store::TokenStore;
use chrono::{Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Records every request and answers from a queue of canned responses.
/// An empty queue answers 500.
#[derive(Default)]
pub struct RecordingTransport {
    requests: RefCell<Vec<Request>>,
    responses: RefCell<VecDeque<Response>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: serde_json::Value) {
        self.respond_text(status, &body.to_string());
    }

    pub fn respond_text(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(Response {
            status,
            body: body.to_string(),
        });
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn count_method(&self, method: Method) -> usize {
        self.requests.borrow().iter().filter(|r| r.method == method).count()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &Request) -> Result<Response, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self.responses.borrow_mut().pop_front().unwrap_or(Response {
            status: 500,
            body: "no response queued".to_string(),
        }))
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.token.borrow_mut().take();
        Ok(())
    }
}

pub fn harness() -> (Rc<RecordingTransport>, Rc<MemoryTokenStore>, ApiClient) {
    let transport = Rc::new(RecordingTransport::new());
    let tokens = Rc::new(MemoryTokenStore::new());
    let api = ApiClient::new(transport.clone(), tokens.clone());
    (transport, tokens, api)
}

pub fn project(id: i64, name: &str) -> Project {
    Project {
        project_id: id,
        name: name.to_string(),
        chain: Some("Ethereum".to_string()),
        source: Some("Twitter".to_string()),
        status: ProjectStatus::Active,
        created_at: "2026-03-01T10:00:00".to_string(),
        created_by: 1,
    }
}

pub fn task(id: i64, project_id: i64, title: &str) -> Task {
    Task {
        task_id: id,
        project_id,
        title: title.to_string(),
        description: Some("Test Description".to_string()),
        deadline: Some("2026-05-20T08:30:00.000Z".to_string()),
        status: TaskStatus::Pending,
        link: Some("http://test.com".to_string()),
        created_at: "2026-03-01T10:00:00".to_string(),
    }
}

/// A zone at +01:00 that moves to +02:00 at 2026-03-29 01:00 UTC, so local
/// 02:00..03:00 on that day never happens.
#[derive(Debug, Clone, Copy)]
pub struct SpringForward;

impl SpringForward {
    fn switch_utc() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 29)
            .and_then(|d| d.and_hms_opt(1, 0, 0))
            .unwrap()
    }

    fn winter() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn summer() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }
}

impl TimeZone for SpringForward {
    type Offset = FixedOffset;

    fn from_offset(_: &FixedOffset) -> Self {
        SpringForward
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let gap_start = Self::switch_utc() + Duration::hours(1);
        if *local < gap_start {
            LocalResult::Single(Self::winter())
        } else if *local < gap_start + Duration::hours(1) {
            LocalResult::None
        } else {
            LocalResult::Single(Self::summer())
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        if *utc < Self::switch_utc() {
            Self::winter()
        } else {
            Self::summer()
        }
    }
}
