use std::{sync::Arc, time::Duration};

use serde::Serialize;
use thiserror::Error;
use tokio::{sync::Mutex, task::JoinError};
use tracing::{info, warn};

use crate::{
    analytics::AnalyticsReport,
    model::{Employee, EmployeeId},
    source::{EmployeeSource, SourceError},
    store::EmployeeStore,
};

#[derive(Debug, Error)]
pub enum HrError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("employee {0} not found")]
    NotFound(EmployeeId),
    #[error("store update did not complete: {0}")]
    Task(#[from] JoinError),
}

pub type HrResult<T> = Result<T, HrError>;

/// Confirmation returned by the simulated promote action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct PromotionNotice {
    pub count: usize,
    pub message: String,
}

/// The HR directory: one store behind one lock, plus the source that feeds it.
pub struct HrModule {
    store: Arc<Mutex<EmployeeStore>>,
    source: Arc<dyn EmployeeSource>,
    load_error: Mutex<Option<String>>,
    promote_delay: Duration,
}

impl HrModule {
    pub fn new(store: EmployeeStore, source: Arc<dyn EmployeeSource>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            source,
            load_error: Mutex::new(None),
            promote_delay: Duration::from_secs(2),
        }
    }

    pub fn with_promote_delay(mut self, delay: Duration) -> Self {
        self.promote_delay = delay;
        self
    }

    /// Fetches a fresh page and replaces the collection. On failure the
    /// previous collection stays and the message is kept for [`Self::load_error`].
    ///
    /// In-flight fetches are not cancelled: whichever resolves last wins.
    pub async fn refresh(&self) -> HrResult<usize> {
        match self.source.fetch_employees().await {
            Ok(employees) => {
                let count = employees.len();
                self.with_store_mut(move |store| store.set_employees(employees))
                    .await?;
                *self.load_error.lock().await = None;
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "failed to load employees");
                *self.load_error.lock().await =
                    Some("Failed to load employees. Please try again later.".to_string());
                Err(err.into())
            }
        }
    }

    /// Fetches only when nothing has been loaded yet.
    pub async fn ensure_loaded(&self) -> HrResult<()> {
        if self.store.lock().await.employees().is_empty() {
            self.refresh().await?;
        }
        Ok(())
    }

    pub async fn load_error(&self) -> Option<String> {
        self.load_error.lock().await.clone()
    }

    pub async fn employee(&self, id: EmployeeId) -> HrResult<Employee> {
        self.store
            .lock()
            .await
            .employee(id)
            .cloned()
            .ok_or(HrError::NotFound(id))
    }

    pub async fn analytics(&self) -> AnalyticsReport {
        let store = self.store.lock().await;
        AnalyticsReport::from_employees(store.employees(), store.bookmarked_ids().len())
    }

    /// Simulated promotion: waits, then confirms. Nothing in the store changes.
    pub async fn promote(&self, ids: &[EmployeeId]) -> PromotionNotice {
        tokio::time::sleep(self.promote_delay).await;
        let count = ids.len();
        info!(count, "promotion review requested");
        let plural = if count == 1 { "" } else { "s" };
        PromotionNotice {
            count,
            message: format!("{count} employee{plural} marked for promotion review."),
        }
    }

    pub async fn with_store<T>(&self, f: impl FnOnce(&EmployeeStore) -> T) -> T {
        let store = self.store.lock().await;
        f(&store)
    }

    /// Runs `f` on the blocking pool: every store mutation writes the
    /// persisted bookmark set to disk while the lock is held.
    pub async fn with_store_mut<T, F>(&self, f: F) -> HrResult<T>
    where
        F: FnOnce(&mut EmployeeStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let output = tokio::task::spawn_blocking(move || {
            let mut store = store.blocking_lock();
            f(&mut store)
        })
        .await?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Department, fixtures::employee},
        persist::{FileStorage, MemoryStorage},
        source::StaticSource,
    };
    use async_trait::async_trait;

    struct FailingSource;

    #[async_trait]
    impl EmployeeSource for FailingSource {
        async fn fetch_employees(&self) -> Result<Vec<Employee>, SourceError> {
            Err(SourceError::Status {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }

    fn module(source: Arc<dyn EmployeeSource>) -> HrModule {
        let store = EmployeeStore::hydrate(Arc::new(MemoryStorage::default()));
        HrModule::new(store, source).with_promote_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn refresh_hydrates_store() {
        let hr = module(Arc::new(StaticSource::new(vec![
            employee(1, Department::Engineering, 5),
            employee(2, Department::Sales, 2),
        ])));
        assert_eq!(hr.refresh().await.unwrap(), 2);
        assert!(hr.load_error().await.is_none());
        assert_eq!(hr.employee(2).await.unwrap().rating, 2);
        assert_eq!(hr.analytics().await.avg_rating, 3.5);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_collection() {
        let hr = module(Arc::new(FailingSource));
        hr.with_store_mut(|store| store.set_employees(vec![employee(9, Department::Legal, 3)]))
            .await
            .unwrap();
        assert!(matches!(hr.refresh().await, Err(HrError::Source(_))));
        assert!(hr.load_error().await.is_some());
        assert_eq!(hr.with_store(|store| store.employees().len()).await, 1);
    }

    #[tokio::test]
    async fn missing_employee_is_not_found() {
        let hr = module(Arc::new(StaticSource::default()));
        hr.ensure_loaded().await.unwrap();
        assert!(matches!(hr.employee(4).await, Err(HrError::NotFound(4))));
    }

    #[tokio::test]
    async fn detail_lookup_on_empty_store_loads_first() {
        let hr = module(Arc::new(StaticSource::new(vec![
            employee(5, Department::Product, 3),
            employee(6, Department::Support, 4),
        ])));
        assert!(hr.with_store(|store| store.employees().is_empty()).await);
        hr.ensure_loaded().await.unwrap();
        let found = hr.employee(6).await.unwrap();
        assert_eq!(found.company.department, Department::Support);
        assert_eq!(hr.with_store(|store| store.employees().len()).await, 2);
    }

    #[tokio::test]
    async fn mutations_persist_from_the_blocking_pool() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileStorage::in_dir(dir.path()));
        let hr = HrModule::new(
            EmployeeStore::hydrate(storage.clone()),
            Arc::new(StaticSource::default()),
        );
        assert!(hr.with_store_mut(|store| store.toggle_bookmark(11)).await.unwrap());
        hr.with_store_mut(|store| store.set_search_query("ops"))
            .await
            .unwrap();

        let reopened = EmployeeStore::hydrate(storage);
        assert_eq!(reopened.bookmarked_ids(), &[11]);
    }

    #[tokio::test]
    async fn panicking_mutation_surfaces_as_task_error() {
        let hr = module(Arc::new(StaticSource::default()));
        let result = hr
            .with_store_mut(|_store| -> usize { panic!("mutation aborted") })
            .await;
        assert!(matches!(result, Err(HrError::Task(_))));
        assert!(hr.with_store(|store| store.bookmarked_ids().is_empty()).await);
    }

    #[tokio::test]
    async fn promote_does_not_touch_state() {
        let hr = module(Arc::new(StaticSource::new(vec![employee(1, Department::Hr, 4)])));
        hr.refresh().await.unwrap();
        let notice = hr.promote(&[1]).await;
        assert_eq!(notice.count, 1);
        assert_eq!(notice.message, "1 employee marked for promotion review.");
        assert!(hr.with_store(|store| store.bookmarked_ids().is_empty()).await);
        assert_eq!(hr.with_store(|store| store.employees().len()).await, 1);
    }
}
