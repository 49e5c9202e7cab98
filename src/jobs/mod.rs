pub mod form;
pub mod models;
pub mod tags;

// Re-export commonly used types
pub use form::JobForm;
pub use models::{Job, JobPayload, JobType, JobsPage, PageMeta, SortOrder};
