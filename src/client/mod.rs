pub mod error;
pub mod http;

use async_trait::async_trait;

use crate::jobs::{Job, JobForm, JobType, JobsPage, SortOrder};

// Re-export commonly used types
pub use error::{ClientError, ClientResult};
pub use http::{ClientConfig, HttpJobsClient};

/// Sentinel for "no job type filter"
pub const ALL_JOB_TYPES: &str = "All Job Types";
/// Sentinel for "no location filter"
pub const ALL_LOCATIONS: &str = "All Locations";

/// Parameters of a `GET /jobs` request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub job_type: Option<JobType>,
    pub location: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<SortOrder>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListParams {
    /// Query pairs, skipping empty values and filter sentinels
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(job_type) = self.job_type {
            pairs.push(("job_type", job_type.as_str().to_string()));
        }
        if let Some(location) = non_empty(&self.location) {
            if location != ALL_LOCATIONS {
                pairs.push(("location", location.to_string()));
            }
        }
        if let Some(tag) = non_empty(&self.tag) {
            pairs.push(("tag", tag.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page.filter(|p| *p > 0) {
            pairs.push(("per_page", per_page.to_string()));
        }

        pairs
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Operations the board needs from the job service
#[async_trait]
pub trait JobsApi: Send + Sync {
    /// `GET /jobs`
    async fn get_jobs(&self, params: &ListParams) -> ClientResult<JobsPage>;

    /// `GET /jobs/{id}`
    async fn get_job(&self, id: i32) -> ClientResult<Job>;

    /// `POST /jobs`, tags normalised from the form's comma string
    async fn create_job(&self, form: &JobForm) -> ClientResult<Job>;

    /// `PUT /jobs/{id}`, tags normalised from the form's comma string
    async fn update_job(&self, id: i32, form: &JobForm) -> ClientResult<Job>;

    /// `DELETE /jobs/{id}`
    async fn delete_job(&self, id: i32) -> ClientResult<()>;
}
