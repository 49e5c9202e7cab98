use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;

use crate::jobs::{tags, Job, JobPayload, JobType, SortOrder};

/// Database representation of a job with all fields
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub city: String,
    pub country: String,
    pub posting_date: Option<NaiveDate>,
    pub job_type: String,
    pub tags: String,
    pub link: Option<String>,
    pub job_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            title: row.title,
            company: row.company,
            city: row.city,
            country: row.country,
            // The column is CHECK-constrained to the known names
            job_type: row.job_type.parse().unwrap_or_default(),
            posting_date: row.posting_date,
            tags: tags::parse(&row.tags),
            link: row.link,
            job_id: Some(row.job_id),
        }
    }
}

/// Column values for an insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub city: String,
    pub country: String,
    pub posting_date: Option<NaiveDate>,
    pub job_type: JobType,
    pub tags: String,
    pub link: Option<String>,
}

impl From<&JobPayload> for NewJob {
    fn from(payload: &JobPayload) -> Self {
        NewJob {
            title: payload.title.trim().to_string(),
            company: payload.company.trim().to_string(),
            city: payload.city.trim().to_string(),
            country: payload.country.trim().to_string(),
            posting_date: payload.posting_date,
            job_type: payload.job_type.unwrap_or_default(),
            tags: tags::to_column(&payload.tags),
            link: payload.link.clone(),
        }
    }
}

/// Column values for an update; `None` leaves the column untouched
///
/// The nullable columns take `Some(None)` to be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobChanges {
    pub title: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub posting_date: Option<Option<NaiveDate>>,
    pub job_type: Option<JobType>,
    pub tags: Option<String>,
    pub link: Option<Option<String>>,
}

impl From<&JobPayload> for JobChanges {
    fn from(payload: &JobPayload) -> Self {
        let new_job = NewJob::from(payload);
        JobChanges {
            title: Some(new_job.title),
            company: Some(new_job.company),
            city: Some(new_job.city),
            country: Some(new_job.country),
            posting_date: new_job.posting_date.map(Some),
            job_type: payload.job_type,
            tags: Some(new_job.tags),
            link: new_job.link.map(Some),
        }
    }
}

/// Resolved list filters, pagination and ordering
#[derive(Debug, Clone, PartialEq)]
pub struct JobFilter {
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub tag: Option<String>,
    pub sort: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl JobFilter {
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }
}
