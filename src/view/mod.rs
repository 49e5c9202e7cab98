//! Text rendering of the board
//!
//! Every function here is pure: it reads a snapshot and returns a string.

pub mod delete;
pub mod filter_bar;
pub mod form;
pub mod pagination;
pub mod table;

use crate::controller::AppState;
use crate::jobs::{tags, Job};

pub use delete::DeleteConfirmation;
pub use pagination::{page_numbers, PageItem, PaginationView};

/// Full board: error banner, filter bar, table and page selector
pub fn render_board(state: &AppState) -> String {
    if state.is_loading {
        return "Loading jobs...\n".to_string();
    }

    let mut out = String::new();
    if let Some(error) = &state.error {
        out.push_str(&format!("Error: {}\n\n", error));
    }
    out.push_str(&filter_bar::render(state));
    out.push('\n');
    out.push_str(&table::render_table(&state.filtered_jobs));

    let pagination = PaginationView::new(state.pagination.page, state.pagination.total_pages);
    if pagination.is_visible() {
        out.push('\n');
        out.push_str(&pagination.render());
        out.push('\n');
    }
    out.push_str(&format!(
        "{} job(s) in total, page {} of {}\n",
        state.pagination.total_jobs,
        state.pagination.page,
        state.pagination.total_pages.max(1)
    ));
    out
}

/// Every field of a single posting, one per line
pub fn render_job(job: &Job) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: &str| {
        out.push_str(&format!("{:<15}{}\n", format!("{}:", label), value));
    };
    line("ID", &job.id.to_string());
    line("Title", &job.title);
    line("Company", &job.company);
    line("Location", &job.location());
    line("Job Type", job.job_type.as_str());
    line(
        "Posting Date",
        &job.posting_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
    );
    line("Tags", &tags::display(&job.tags));
    if let Some(link) = &job.link {
        line("Link", link);
    }
    if let Some(job_id) = &job.job_id {
        line("Job ID", job_id);
    }
    out
}
