use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;
use validator::{Validate, ValidationError};

use super::tags;

/// Employment type of a posting, serialized with its display name
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
    #[serde(rename = "Internship")]
    Internship,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-Time",
            JobType::PartTime => "Part-Time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|job_type| job_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Invalid job_type. Must be one of: {}",
                    JobType::ALL.map(|t| t.as_str()).join(", ")
                )
            })
    }
}

/// Ordering of the job list by posting date
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    PostingDateDesc,
    PostingDateAsc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::PostingDateDesc => "posting_date_desc",
            SortOrder::PostingDateAsc => "posting_date_asc",
        }
    }

    /// Label shown in the sort selector
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::PostingDateDesc => "Newest First",
            SortOrder::PostingDateAsc => "Oldest First",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "posting_date_desc" | "newest" => Ok(SortOrder::PostingDateDesc),
            "posting_date_asc" | "oldest" => Ok(SortOrder::PostingDateAsc),
            _ => Err(
                "Invalid sort parameter. Supported: posting_date_desc, posting_date_asc"
                    .to_string(),
            ),
        }
    }
}

/// A job posting as exchanged over the wire
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub city: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub posting_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "tags::deserialize")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl Job {
    /// `"City, Country"` as shown in the table and the location filter
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Request body for creating or replacing a job
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
pub struct JobPayload {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Company is required"))]
    pub company: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "City is required"))]
    pub city: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Country is required"))]
    pub country: String,

    #[serde(default)]
    pub job_type: Option<JobType>,

    #[serde(default)]
    pub posting_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "tags::deserialize")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Pagination metadata returned next to a page of jobs
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_jobs: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl PageMeta {
    pub fn new(page: u32, per_page: u32, total_jobs: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total_jobs.div_ceil(u64::from(per_page)) as u32
        };
        Self {
            page,
            per_page,
            total_jobs,
            total_pages,
        }
    }
}

/// Response body of `GET /jobs`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct JobsPage {
    #[serde(default, deserialize_with = "lenient_jobs")]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub meta: PageMeta,
}

// A list payload that is not an array renders as an empty page instead of failing.
fn lenient_jobs<'de, D>(deserializer: D) -> Result<Vec<Job>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        if !value.is_null() {
            warn!("Job list payload is not an array, treating it as empty");
        }
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Job>(item) {
            Ok(job) => Some(job),
            Err(e) => {
                warn!("Skipping malformed job in list payload: {}", e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_type_uses_display_names_on_the_wire() {
        assert_eq!(serde_json::to_value(JobType::PartTime).unwrap(), json!("Part-Time"));
        let parsed: JobType = serde_json::from_value(json!("Internship")).unwrap();
        assert_eq!(parsed, JobType::Internship);
        assert!(serde_json::from_value::<JobType>(json!("Freelance")).is_err());
        assert_eq!("full-time".parse::<JobType>().unwrap(), JobType::FullTime);
    }

    #[test]
    fn sort_order_accepts_wire_names_and_aliases() {
        assert_eq!("posting_date_asc".parse::<SortOrder>().unwrap(), SortOrder::PostingDateAsc);
        assert_eq!("newest".parse::<SortOrder>().unwrap(), SortOrder::PostingDateDesc);
        assert!("title".parse::<SortOrder>().is_err());
    }

    #[test]
    fn job_accepts_string_tags_and_null_country() {
        let job: Job = serde_json::from_value(json!({
            "id": 7,
            "title": "Actuary",
            "company": "MetLife",
            "city": "London",
            "country": null,
            "job_type": "Contract",
            "posting_date": "2025-03-01",
            "tags": "Life, Pricing,,",
            "job_id": "33794"
        }))
        .unwrap();

        assert_eq!(job.country, "");
        assert_eq!(job.tags, vec!["Life", "Pricing"]);
        assert_eq!(job.posting_date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(job.location(), "London, ");
    }

    #[test]
    fn page_meta_rounds_total_pages_up() {
        assert_eq!(PageMeta::new(1, 10, 0).total_pages, 0);
        assert_eq!(PageMeta::new(1, 10, 10).total_pages, 1);
        assert_eq!(PageMeta::new(1, 10, 11).total_pages, 2);
        assert_eq!(PageMeta::new(1, 0, 11).total_pages, 0);
    }

    #[test]
    fn non_array_job_list_becomes_empty() {
        let page: JobsPage =
            serde_json::from_value(json!({"jobs": {"oops": true}, "meta": {"total_jobs": 3, "total_pages": 1}}))
                .unwrap();
        assert!(page.jobs.is_empty());
        assert_eq!(page.meta.total_jobs, 3);

        let page: JobsPage = serde_json::from_value(json!({"jobs": null})).unwrap();
        assert!(page.jobs.is_empty());
        assert_eq!(page.meta, PageMeta::default());
    }

    #[test]
    fn malformed_list_entries_are_skipped() {
        let page: JobsPage = serde_json::from_value(json!({
            "jobs": [
                {"id": 1, "title": "A", "company": "B", "city": "C", "country": "D"},
                {"title": "missing id"}
            ],
            "meta": {"total_jobs": 2, "total_pages": 1}
        }))
        .unwrap();
        assert_eq!(page.jobs.len(), 1);
        assert_eq!(page.jobs[0].id, 1);
    }

    #[test]
    fn payload_requires_text_fields() {
        let payload: JobPayload =
            serde_json::from_value(json!({"title": "  ", "company": "Acme", "city": "Oslo"})).unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("country"));
        assert!(!fields.contains_key("company"));
        assert_eq!(
            fields["title"][0].message.as_deref(),
            Some("Title is required")
        );
    }
}
