use std::fmt;
use std::str::FromStr;

use crate::client::{ListParams, ALL_JOB_TYPES, ALL_LOCATIONS};
use crate::jobs::{Job, JobType, SortOrder};

/// Job type selection, `All` being the "All Job Types" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobTypeFilter {
    #[default]
    All,
    Only(JobType),
}

impl fmt::Display for JobTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobTypeFilter::All => f.write_str(ALL_JOB_TYPES),
            JobTypeFilter::Only(job_type) => write!(f, "{}", job_type),
        }
    }
}

impl FromStr for JobTypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim() == ALL_JOB_TYPES {
            return Ok(JobTypeFilter::All);
        }
        s.parse().map(JobTypeFilter::Only)
    }
}

/// Location selection, `All` being the "All Locations" sentinel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocationFilter {
    #[default]
    All,
    Only(String),
}

impl fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationFilter::All => f.write_str(ALL_LOCATIONS),
            LocationFilter::Only(location) => f.write_str(location),
        }
    }
}

impl From<&str> for LocationFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_LOCATIONS {
            LocationFilter::All
        } else {
            LocationFilter::Only(value.to_string())
        }
    }
}

/// Filter, sort and search selections
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filters {
    pub job_type: JobTypeFilter,
    pub location: LocationFilter,
    pub sort: SortOrder,
    /// Server-side tag filter; the board itself never sets it
    pub tag: Option<String>,
    /// Applied locally to the loaded page only
    pub search_term: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total_jobs: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            total_jobs: 0,
            total_pages: 0,
        }
    }

    pub fn accepts(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Everything the board shows, owned by the controller
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Last successfully fetched page
    pub jobs: Vec<Job>,
    /// `jobs` narrowed by the search term
    pub filtered_jobs: Vec<Job>,
    pub filters: Filters,
    pub pagination: Pagination,
    pub is_loading: bool,
    pub error: Option<String>,
    pub show_add_form: bool,
    pub editing: Option<Job>,
    pub deleting: Option<Job>,
}

impl AppState {
    pub fn new(filters: Filters, pagination: Pagination) -> Self {
        Self {
            jobs: Vec::new(),
            filtered_jobs: Vec::new(),
            filters,
            pagination,
            is_loading: false,
            error: None,
            show_add_form: false,
            editing: None,
            deleting: None,
        }
    }

    /// Request parameters for the current filters and page
    pub fn list_params(&self) -> ListParams {
        ListParams {
            job_type: match self.filters.job_type {
                JobTypeFilter::All => None,
                JobTypeFilter::Only(job_type) => Some(job_type),
            },
            location: match &self.filters.location {
                LocationFilter::All => None,
                LocationFilter::Only(location) => Some(location.clone()),
            },
            tag: self.filters.tag.clone(),
            sort: Some(self.filters.sort),
            page: Some(self.pagination.page),
            per_page: Some(self.pagination.per_page),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Filters::default(), Pagination::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_parse_to_all() {
        assert_eq!("All Job Types".parse::<JobTypeFilter>().unwrap(), JobTypeFilter::All);
        assert_eq!(
            "Contract".parse::<JobTypeFilter>().unwrap(),
            JobTypeFilter::Only(JobType::Contract)
        );
        assert!("Gig".parse::<JobTypeFilter>().is_err());
        assert_eq!(LocationFilter::from("All Locations"), LocationFilter::All);
        assert_eq!(
            LocationFilter::from(" Paris, France "),
            LocationFilter::Only("Paris, France".into())
        );
    }

    #[test]
    fn list_params_drop_sentinels() {
        let state = AppState::default();
        let params = state.list_params();
        assert_eq!(params.job_type, None);
        assert_eq!(params.location, None);
        assert_eq!(params.sort, Some(SortOrder::PostingDateDesc));
        assert_eq!(params.page, Some(1));
        assert_eq!(params.per_page, Some(10));
    }

    #[test]
    fn page_bounds() {
        let mut pagination = Pagination::new(10);
        assert!(!pagination.accepts(1));
        pagination.total_pages = 3;
        assert!(pagination.accepts(1));
        assert!(pagination.accepts(3));
        assert!(!pagination.accepts(0));
        assert!(!pagination.accepts(4));
    }
}
