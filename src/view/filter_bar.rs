use crate::client::{ALL_JOB_TYPES, ALL_LOCATIONS};
use crate::controller::AppState;
use crate::jobs::{Job, JobType, SortOrder};

/// Location choices: the sentinel, then each distinct "city, country" on the loaded page
pub fn location_options(jobs: &[Job]) -> Vec<String> {
    let mut options = vec![ALL_LOCATIONS.to_string()];
    for location in jobs.iter().map(Job::location) {
        if !options.contains(&location) {
            options.push(location);
        }
    }
    options
}

pub fn job_type_options() -> Vec<String> {
    std::iter::once(ALL_JOB_TYPES.to_string())
        .chain(JobType::ALL.iter().map(|t| t.to_string()))
        .collect()
}

/// `(value, label)` pairs for the sort selector
pub fn sort_options() -> [(SortOrder, &'static str); 2] {
    [
        (SortOrder::PostingDateDesc, SortOrder::PostingDateDesc.label()),
        (SortOrder::PostingDateAsc, SortOrder::PostingDateAsc.label()),
    ]
}

pub fn render(state: &AppState) -> String {
    let filters = &state.filters;
    let search = if filters.search_term.trim().is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", filters.search_term.trim())
    };
    let locations = location_options(&state.jobs);
    let on_page = if locations.len() > 1 {
        locations[1..].join("; ")
    } else {
        "-".to_string()
    };

    format!(
        "Search: {}  |  Type: {}  |  Location: {}  |  Sort: {}\nLocations on this page: {}\n",
        search,
        filters.job_type,
        filters.location,
        filters.sort.label(),
        on_page,
    )
}
