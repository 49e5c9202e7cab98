use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::service::ServiceError;
use crate::db::models::{JobChanges, JobFilter};
use crate::jobs::{tags, JobType, SortOrder};

const DEFAULT_PER_PAGE: i64 = 10;
const MAX_PER_PAGE: i64 = 100;

/// Query string of `GET /jobs`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListQuery {
    /// Validate the sort key and clamp paging into range
    pub fn resolve(&self) -> Result<JobFilter, ServiceError> {
        let sort = match self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => SortOrder::default(),
            Some(raw @ ("posting_date_desc" | "posting_date_asc")) => {
                raw.parse::<SortOrder>().map_err(ServiceError::InvalidQuery)?
            }
            Some(_) => {
                return Err(ServiceError::InvalidQuery(
                    "Invalid sort parameter. Supported: posting_date_desc, posting_date_asc"
                        .to_string(),
                ))
            }
        };

        let page = self.page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE) as u32;

        Ok(JobFilter {
            job_type: non_empty(&self.job_type),
            location: non_empty(&self.location),
            tag: non_empty(&self.tag),
            sort,
            page,
            per_page,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Body of `PATCH /jobs/{id}`; every field is optional
#[derive(Debug, Default, Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub job_type: Option<JobType>,
    #[serde(default, deserialize_with = "present")]
    pub posting_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "tags::deserialize_optional")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub link: Option<Option<String>>,
}

// An explicit `null` becomes `Some(None)`; only an absent field stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl JobPatch {
    /// Provided text fields must not be blank
    pub fn into_changes(self) -> Result<JobChanges, ServiceError> {
        let mut problems = Vec::new();
        let mut checked = |value: Option<String>, label: &str| {
            value.map(|v| {
                let v = v.trim().to_string();
                if v.is_empty() {
                    problems.push(format!("{} cannot be empty", label));
                }
                v
            })
        };

        let changes = JobChanges {
            title: checked(self.title, "Title"),
            company: checked(self.company, "Company"),
            city: checked(self.city, "City"),
            country: checked(self.country, "Country"),
            posting_date: self.posting_date,
            job_type: self.job_type,
            tags: self.tags.map(|t| tags::to_column(&t)),
            link: self.link,
        };

        if problems.is_empty() {
            Ok(changes)
        } else {
            Err(ServiceError::ValidationError(problems.join("; ")))
        }
    }
}
