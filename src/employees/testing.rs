//! Scripted in-memory store for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::employees::types::{CreateRequest, EmployeeRecord};
use crate::upstream::{EmployeeStore, UpstreamError};

pub(crate) fn record(name: &str, salary: u32) -> EmployeeRecord {
    EmployeeRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        salary,
        age: 30,
        title: "Engineer".to_string(),
        email: format!("{}@company.com", name.to_lowercase().replace(' ', ".")),
    }
}

/// Store backed by a vector, with scripted list answers and call counters.
#[derive(Default)]
pub(crate) struct FakeStore {
    records: Mutex<Vec<EmployeeRecord>>,
    scripted_lists: Mutex<VecDeque<Result<Vec<EmployeeRecord>, UpstreamError>>>,
    get_error: Mutex<Option<UpstreamError>>,
    delete_answer: Mutex<Option<Result<bool, UpstreamError>>>,
    deleted_names: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl FakeStore {
    pub(crate) fn new(records: Vec<EmployeeRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Answers consumed by the next `list_all` calls before falling back to the records.
    pub(crate) fn script_list(&self, answers: Vec<Result<Vec<EmployeeRecord>, UpstreamError>>) {
        self.scripted_lists.lock().unwrap().extend(answers);
    }

    pub(crate) fn fail_get(&self, error: UpstreamError) {
        *self.get_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn answer_delete(&self, answer: Result<bool, UpstreamError>) {
        *self.delete_answer.lock().unwrap() = Some(answer);
    }

    pub(crate) fn deleted_names(&self) -> Vec<String> {
        self.deleted_names.lock().unwrap().clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.list_calls() + self.get_calls() + self.create_calls() + self.deleted_names().len()
    }
}

#[async_trait]
impl EmployeeStore for FakeStore {
    async fn list_all(&self) -> Result<Vec<EmployeeRecord>, UpstreamError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(answer) = self.scripted_lists.lock().unwrap().pop_front() {
            return answer;
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<EmployeeRecord>, UpstreamError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.get_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.records.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, request: &CreateRequest) -> Result<EmployeeRecord, UpstreamError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let created = EmployeeRecord {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            salary: request.salary,
            age: request.age,
            title: request.title.clone(),
            email: String::new(),
        };
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool, UpstreamError> {
        self.deleted_names.lock().unwrap().push(name.to_string());
        if let Some(answer) = self.delete_answer.lock().unwrap().clone() {
            return answer;
        }
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.name != name);
        Ok(records.len() < before)
    }
}
