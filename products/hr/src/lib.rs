//! HR vertical slice: the employee directory store and its derivations.

pub mod analytics;
pub mod filter;
pub mod model;
pub mod persist;
pub mod service;
pub mod source;
pub mod store;

pub use analytics::{AnalyticsReport, DepartmentStats, RatingBucket};
pub use filter::{FilterCriteria, filter_employees};
pub use model::{Address, Company, Department, Employee, EmployeeId, FeedbackEntry};
pub use persist::{FileStorage, MemoryStorage, PersistedState, STORAGE_KEY, StateStorage, StorageError};
pub use service::{HrError, HrModule, HrResult, PromotionNotice};
pub use source::{DummyJsonSource, EmployeeSource, SourceError, StaticSource};
pub use store::{BookmarkSelection, EmployeeStore};
