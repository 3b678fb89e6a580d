//! Employee source adapter.
//!
//! Pulls one fixed-size page of users from the remote directory and decorates
//! each record with synthetic department, rating, project and feedback data.

pub mod synth;

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::{debug, info};

use crate::model::Employee;

pub use synth::{RawCompany, RawUser, Synthesizer, UsersPage};

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("employee request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("employee directory returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("employee directory payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait EmployeeSource: Send + Sync {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, SourceError>;
}

/// Reads the dummyjson-style `/users` listing.
pub struct DummyJsonSource {
    client: reqwest::Client,
    base_url: String,
    page_size: usize,
    rng: Mutex<StdRng>,
}

impl DummyJsonSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// A fixed seed makes decoration reproducible; `None` keeps it random.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if let Some(seed) = seed {
            self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        }
        self
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }
}

#[async_trait]
impl EmployeeSource for DummyJsonSource {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, SourceError> {
        let url = self.users_url();
        debug!(%url, limit = self.page_size, "requesting employee page");
        let response = self
            .client
            .get(&url)
            .query(&[("limit", self.page_size)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let page: UsersPage = serde_json::from_str(&body)?;

        let today = Utc::now().date_naive();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut synth = Synthesizer::new(&mut *rng, today);
        let employees: Vec<Employee> = page.users.into_iter().map(|raw| synth.decorate(raw)).collect();
        info!(count = employees.len(), "fetched employees");
        Ok(employees)
    }
}

/// Serves a fixed collection; used by tests and offline runs.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    employees: Vec<Employee>,
}

impl StaticSource {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }
}

#[async_trait]
impl EmployeeSource for StaticSource {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, SourceError> {
        Ok(self.employees.clone())
    }
}
