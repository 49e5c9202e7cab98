//! Application controller
//!
//! Owns the whole board state and is the only place that talks to the job
//! service. Views receive `&AppState` and report user intent back through the
//! command methods here.

pub mod search;
pub mod state;

use tracing::{debug, error, info};

use crate::client::{ClientError, ClientResult, JobsApi, ListParams};
use crate::jobs::{Job, JobForm, JobsPage, SortOrder};

// Re-export commonly used types
pub use state::{AppState, Filters, JobTypeFilter, LocationFilter, Pagination};

pub const FETCH_FAILED: &str = "Failed to load jobs. Please try again.";
pub const ADD_FAILED: &str = "Failed to add job. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update job. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete job. Please try again.";

/// A list request that has been issued but not yet applied
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub seq: u64,
    pub params: ListParams,
}

pub struct AppController<A: JobsApi> {
    api: A,
    state: AppState,
    issued: u64,
}

impl<A: JobsApi> AppController<A> {
    pub fn new(api: A, filters: Filters, per_page: u32) -> Self {
        Self::with_state(api, AppState::new(filters, Pagination::new(per_page)))
    }

    /// Board that opens on `page`; the first fetch clamps it if the page does not exist
    pub fn starting_at(api: A, filters: Filters, per_page: u32, page: u32) -> Self {
        let mut pagination = Pagination::new(per_page);
        pagination.page = page.max(1);
        Self::with_state(api, AppState::new(filters, pagination))
    }

    pub fn with_state(api: A, state: AppState) -> Self {
        Self {
            api,
            state,
            issued: 0,
        }
    }

    /// Read-only snapshot for the views
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Mark a list request as in flight and hand out its sequence number
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.state.is_loading = true;
        self.state.error = None;
        FetchTicket {
            seq: self.issued,
            params: self.state.list_params(),
        }
    }

    /// Apply a list response if it belongs to the newest request
    ///
    /// Returns `false` when the response was stale and has been dropped.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: ClientResult<JobsPage>) -> bool {
        if ticket.seq != self.issued {
            debug!(
                "Dropping stale job list response seq={} (latest={})",
                ticket.seq, self.issued
            );
            return false;
        }

        match result {
            Ok(page) => {
                debug!(
                    "Loaded {} jobs (total={}, pages={})",
                    page.jobs.len(),
                    page.meta.total_jobs,
                    page.meta.total_pages
                );
                self.state.jobs = page.jobs;
                self.state.pagination.total_jobs = page.meta.total_jobs;
                self.state.pagination.total_pages = page.meta.total_pages;
            }
            Err(e) => {
                error!("Error fetching jobs: {}", e);
                self.state.error = Some(FETCH_FAILED.to_string());
                self.state.jobs.clear();
            }
        }

        self.state.is_loading = false;
        self.refresh_filtered();
        true
    }

    /// Fetch the current page with the current filters
    pub async fn fetch_jobs(&mut self) {
        loop {
            let ticket = self.begin_fetch();
            let result = self.api.get_jobs(&ticket.params).await;
            self.apply_fetch(ticket, result);

            if !self.clamp_page() {
                break;
            }
        }
    }

    // Keeps page within [1, total_pages] after the result set shrank.
    fn clamp_page(&mut self) -> bool {
        let pagination = &mut self.state.pagination;
        if self.state.error.is_none()
            && pagination.total_pages > 0
            && pagination.page > pagination.total_pages
        {
            debug!(
                "Page {} is past the last page {}, refetching",
                pagination.page, pagination.total_pages
            );
            pagination.page = pagination.total_pages;
            return true;
        }
        false
    }

    fn refresh_filtered(&mut self) {
        self.state.filtered_jobs = search::filter_jobs(&self.state.jobs, &self.state.filters.search_term);
    }

    pub async fn set_job_type_filter(&mut self, job_type: JobTypeFilter) {
        if self.state.filters.job_type == job_type {
            return;
        }
        self.state.filters.job_type = job_type;
        self.state.pagination.page = 1;
        self.fetch_jobs().await;
    }

    pub async fn set_location_filter(&mut self, location: LocationFilter) {
        if self.state.filters.location == location {
            return;
        }
        self.state.filters.location = location;
        self.state.pagination.page = 1;
        self.fetch_jobs().await;
    }

    pub async fn set_sort(&mut self, sort: SortOrder) {
        if self.state.filters.sort == sort {
            return;
        }
        self.state.filters.sort = sort;
        self.state.pagination.page = 1;
        self.fetch_jobs().await;
    }

    /// Update the local search; never refetches
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.filters.search_term = term.into();
        self.refresh_filtered();
    }

    /// Move to page `page` if it exists; returns whether it was accepted
    pub async fn handle_page_change(&mut self, page: u32) -> bool {
        if !self.state.pagination.accepts(page) {
            debug!(
                "Ignoring page change to {} (total_pages={})",
                page, self.state.pagination.total_pages
            );
            return false;
        }
        if self.state.pagination.page != page {
            self.state.pagination.page = page;
            self.fetch_jobs().await;
        }
        true
    }

    pub fn open_add_form(&mut self) {
        self.state.show_add_form = true;
    }

    pub fn close_add_form(&mut self) {
        self.state.show_add_form = false;
    }

    pub fn open_edit(&mut self, job: Job) {
        self.state.editing = Some(job);
    }

    pub fn close_edit(&mut self) {
        self.state.editing = None;
    }

    pub fn open_delete(&mut self, job: Job) {
        self.state.deleting = Some(job);
    }

    pub fn close_delete(&mut self) {
        self.state.deleting = None;
    }

    /// Create a job from the form; returns whether the server accepted it
    pub async fn create_job(&mut self, form: &JobForm) -> bool {
        self.state.error = None;
        match self.api.create_job(form).await {
            Ok(job) => {
                info!("Created job id={} title={}", job.id, job.title);
                self.state.show_add_form = false;
                self.fetch_jobs().await;
                true
            }
            Err(e) => {
                error!("Error adding job: {}", e);
                self.state.error = Some(user_message(&e, ADD_FAILED));
                false
            }
        }
    }

    pub async fn update_job(&mut self, id: i32, form: &JobForm) -> bool {
        self.state.error = None;
        match self.api.update_job(id, form).await {
            Ok(job) => {
                info!("Updated job id={}", job.id);
                self.state.editing = None;
                self.fetch_jobs().await;
                true
            }
            Err(e) => {
                error!("Error updating job {}: {}", id, e);
                self.state.error = Some(user_message(&e, UPDATE_FAILED));
                false
            }
        }
    }

    /// Submit the edit form against the job currently being edited
    pub async fn submit_edit(&mut self, form: &JobForm) -> bool {
        match self.state.editing.as_ref().map(|job| job.id) {
            Some(id) => self.update_job(id, form).await,
            None => false,
        }
    }

    /// Delete a job; the confirmation is closed whatever the outcome
    pub async fn delete_job(&mut self, id: i32) -> bool {
        self.state.error = None;
        let result = self.api.delete_job(id).await;
        self.state.deleting = None;

        match result {
            Ok(()) => {
                info!("Deleted job id={}", id);
                self.fetch_jobs().await;
                true
            }
            Err(e) => {
                error!("Error deleting job {}: {}", id, e);
                self.state.error = Some(user_message(&e, DELETE_FAILED));
                false
            }
        }
    }

    /// Delete exactly the job the confirmation was opened with
    pub async fn confirm_delete(&mut self) -> bool {
        match self.state.deleting.as_ref().map(|job| job.id) {
            Some(id) => self.delete_job(id).await,
            None => false,
        }
    }
}

fn user_message(err: &ClientError, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobType, PageMeta};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockApi {
        pages: Mutex<VecDeque<ClientResult<JobsPage>>>,
        mutations: Mutex<VecDeque<ClientResult<()>>>,
        list_requests: Mutex<Vec<ListParams>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn with_pages(pages: Vec<ClientResult<JobsPage>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                ..Default::default()
            }
        }

        fn push_mutation(&self, result: ClientResult<()>) {
            self.mutations.lock().unwrap().push_back(result);
        }

        fn list_requests(&self) -> Vec<ListParams> {
            self.list_requests.lock().unwrap().clone()
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn next_mutation(&self, call: String) -> ClientResult<()> {
            self.calls.lock().unwrap().push(call);
            self.mutations.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }

    #[async_trait]
    impl JobsApi for MockApi {
        async fn get_jobs(&self, params: &ListParams) -> ClientResult<JobsPage> {
            self.list_requests.lock().unwrap().push(params.clone());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(JobsPage::default()))
        }

        async fn get_job(&self, id: i32) -> ClientResult<Job> {
            Err(ClientError::api_error(404, &format!(r#"{{"error":"Job {} not found"}}"#, id)))
        }

        async fn create_job(&self, form: &JobForm) -> ClientResult<Job> {
            self.next_mutation(format!("create {}", form.title))?;
            Ok(job(100, &form.title))
        }

        async fn update_job(&self, id: i32, form: &JobForm) -> ClientResult<Job> {
            self.next_mutation(format!("update {} {}", id, form.title))?;
            Ok(job(id, &form.title))
        }

        async fn delete_job(&self, id: i32) -> ClientResult<()> {
            self.next_mutation(format!("delete {}", id))
        }
    }

    fn job(id: i32, title: &str) -> Job {
        Job {
            id,
            title: title.into(),
            company: "Acme".into(),
            city: "Paris".into(),
            country: "France".into(),
            job_type: JobType::FullTime,
            posting_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            tags: vec!["go".into(), "rust".into()],
            link: None,
            job_id: None,
        }
    }

    fn page(jobs: Vec<Job>, total_jobs: u64, total_pages: u32) -> ClientResult<JobsPage> {
        Ok(JobsPage {
            jobs,
            meta: PageMeta {
                page: 1,
                per_page: 10,
                total_jobs,
                total_pages,
            },
        })
    }

    fn form(title: &str) -> JobForm {
        let mut form = JobForm::new(NaiveDate::from_ymd_opt(2025, 2, 2).unwrap());
        form.title = title.into();
        form.company = "Acme".into();
        form.city = "Paris".into();
        form.country = "France".into();
        form
    }

    fn controller(pages: Vec<ClientResult<JobsPage>>) -> AppController<MockApi> {
        AppController::new(MockApi::with_pages(pages), Filters::default(), 10)
    }

    async fn loaded(pages: Vec<ClientResult<JobsPage>>) -> AppController<MockApi> {
        let mut controller = controller(pages);
        controller.fetch_jobs().await;
        controller
    }

    #[tokio::test]
    async fn fetch_replaces_jobs_and_totals() {
        let controller = loaded(vec![page(vec![job(1, "A"), job(2, "B")], 25, 3)]).await;
        let state = controller.state();

        assert_eq!(state.jobs.len(), 2);
        assert_eq!(state.filtered_jobs.len(), 2);
        assert_eq!(state.pagination.total_jobs, 25);
        assert_eq!(state.pagination.total_pages, 3);
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn failed_fetch_sets_error_and_empties_list() {
        let mut controller = loaded(vec![page(vec![job(1, "A")], 1, 1)]).await;
        controller
            .api()
            .pages
            .lock()
            .unwrap()
            .push_back(Err(ClientError::api_error(500, "")));

        controller.fetch_jobs().await;

        let state = controller.state();
        assert!(state.jobs.is_empty());
        assert!(state.filtered_jobs.is_empty());
        assert_eq!(state.error.as_deref(), Some(FETCH_FAILED));
        assert!(!state.is_loading);
    }

    #[test]
    fn only_the_newest_request_is_applied() {
        let mut controller = controller(vec![]);
        let first = controller.begin_fetch();
        let second = controller.begin_fetch();
        assert!(second.seq > first.seq);

        assert!(controller.apply_fetch(second, page(vec![job(2, "newest")], 1, 1)));
        assert!(!controller.apply_fetch(first, page(vec![job(1, "stale")], 1, 1)));

        assert_eq!(controller.state().jobs[0].title, "newest");
        assert!(!controller.state().is_loading);
    }

    #[test]
    fn stale_response_does_not_clear_loading() {
        let mut controller = controller(vec![]);
        let first = controller.begin_fetch();
        let second = controller.begin_fetch();

        assert!(!controller.apply_fetch(first, page(vec![job(1, "stale")], 1, 1)));
        assert!(controller.state().is_loading);
        assert!(controller.state().jobs.is_empty());

        assert!(controller.apply_fetch(second, page(vec![], 0, 0)));
        assert!(!controller.state().is_loading);
    }

    #[tokio::test]
    async fn page_change_outside_range_is_ignored() {
        let mut controller = loaded(vec![page(vec![job(1, "A")], 30, 3)]).await;

        assert!(!controller.handle_page_change(0).await);
        assert!(!controller.handle_page_change(4).await);
        assert_eq!(controller.state().pagination.page, 1);
        assert_eq!(controller.api().list_requests().len(), 1);

        assert!(controller.handle_page_change(3).await);
        assert_eq!(controller.state().pagination.page, 3);
        let requests = controller.api().list_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].page, Some(3));
    }

    #[tokio::test]
    async fn filter_change_refetches_from_first_page() {
        let mut controller = loaded(vec![page(vec![], 30, 3), page(vec![], 30, 3)]).await;
        controller.handle_page_change(2).await;

        controller
            .set_job_type_filter(JobTypeFilter::Only(JobType::Contract))
            .await;
        controller
            .set_location_filter(LocationFilter::from("Paris, France"))
            .await;
        controller.set_sort(SortOrder::PostingDateAsc).await;
        // Same value again does not refetch
        controller.set_sort(SortOrder::PostingDateAsc).await;

        let requests = controller.api().list_requests();
        assert_eq!(requests.len(), 5);
        let last = requests.last().unwrap();
        assert_eq!(last.page, Some(1));
        assert_eq!(last.job_type, Some(JobType::Contract));
        assert_eq!(last.location.as_deref(), Some("Paris, France"));
        assert_eq!(last.sort, Some(SortOrder::PostingDateAsc));
    }

    #[tokio::test]
    async fn search_is_local_only() {
        let mut controller = loaded(vec![page(
            vec![job(1, "Backend Engineer"), {
                let mut designer = job(2, "Designer");
                designer.company = "Pixel".into();
                designer.tags = vec!["figma".into()];
                designer
            }],
            2,
            1,
        )])
        .await;

        controller.set_search_term("figma");

        assert_eq!(controller.state().filtered_jobs.len(), 1);
        assert_eq!(controller.state().filtered_jobs[0].id, 2);
        assert_eq!(controller.state().jobs.len(), 2);
        assert_eq!(controller.api().list_requests().len(), 1);
    }

    #[tokio::test]
    async fn page_past_the_end_is_clamped_and_refetched() {
        let mut controller = loaded(vec![page(vec![], 30, 3), page(vec![], 30, 3)]).await;
        controller.handle_page_change(3).await;
        controller
            .api()
            .pages
            .lock()
            .unwrap()
            .extend([page(vec![], 15, 2), page(vec![job(11, "K")], 15, 2)]);

        controller.fetch_jobs().await;

        let requests = controller.api().list_requests();
        assert_eq!(requests.last().unwrap().page, Some(2));
        assert_eq!(controller.state().pagination.page, 2);
        assert_eq!(controller.state().jobs[0].id, 11);
    }

    #[tokio::test]
    async fn starting_page_is_requested_directly() {
        let api = MockApi::with_pages(vec![page(vec![job(21, "U")], 30, 3)]);
        let mut controller = AppController::starting_at(api, Filters::default(), 10, 3);

        controller.fetch_jobs().await;

        let requests = controller.api().list_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].page, Some(3));
        assert_eq!(controller.state().pagination.page, 3);
    }

    #[tokio::test]
    async fn starting_page_past_the_end_lands_on_the_last_page() {
        let api = MockApi::with_pages(vec![page(vec![], 30, 3), page(vec![job(21, "U")], 30, 3)]);
        let mut controller = AppController::starting_at(api, Filters::default(), 10, 9);

        controller.fetch_jobs().await;

        let pages: Vec<_> = controller.api().list_requests().iter().map(|r| r.page).collect();
        assert_eq!(pages, vec![Some(9), Some(3)]);
        assert_eq!(controller.state().pagination.page, 3);
        assert_eq!(controller.state().jobs[0].id, 21);
    }

    #[tokio::test]
    async fn create_closes_form_and_refetches() {
        let mut controller = loaded(vec![page(vec![], 0, 0)]).await;
        controller.open_add_form();

        assert!(controller.create_job(&form("Analyst")).await);

        assert!(!controller.state().show_add_form);
        assert_eq!(controller.api().calls(), vec!["create Analyst"]);
        assert_eq!(controller.api().list_requests().len(), 2);
    }

    #[tokio::test]
    async fn failed_create_surfaces_server_message() {
        let mut controller = loaded(vec![page(vec![job(1, "A")], 1, 1)]).await;
        controller.open_add_form();
        controller.api().push_mutation(Err(ClientError::api_error(
            400,
            r#"{"error":"Validation failed","fields":{"title":{"errors":["Title is required"]}}}"#,
        )));

        assert!(!controller.create_job(&form("")).await);

        let state = controller.state();
        assert_eq!(state.error.as_deref(), Some("Validation failed: Title is required"));
        assert!(state.show_add_form);
        assert_eq!(state.jobs.len(), 1);
        assert_eq!(controller.api().list_requests().len(), 1);
    }

    #[tokio::test]
    async fn failed_update_falls_back_to_generic_message() {
        let mut controller = loaded(vec![page(vec![job(1, "A")], 1, 1)]).await;
        controller.open_edit(job(1, "A"));
        controller
            .api()
            .push_mutation(Err(ClientError::api_error(502, "Bad Gateway")));

        assert!(!controller.submit_edit(&form("B")).await);

        assert_eq!(controller.state().error.as_deref(), Some(UPDATE_FAILED));
        assert!(controller.state().editing.is_some());
    }

    #[tokio::test]
    async fn edit_targets_the_job_being_edited() {
        let mut controller = loaded(vec![page(vec![job(4, "A")], 1, 1)]).await;
        controller.open_edit(job(4, "A"));

        assert!(controller.submit_edit(&form("Renamed")).await);

        assert_eq!(controller.api().calls(), vec!["update 4 Renamed"]);
        assert!(controller.state().editing.is_none());
        assert_eq!(controller.api().list_requests().len(), 2);
    }

    #[tokio::test]
    async fn failed_delete_keeps_jobs_and_closes_confirmation() {
        let mut controller = loaded(vec![page(vec![job(1, "A"), job(2, "B")], 2, 1)]).await;
        controller.open_delete(job(2, "B"));
        controller
            .api()
            .push_mutation(Err(ClientError::api_error(500, "")));

        assert!(!controller.confirm_delete().await);

        let state = controller.state();
        assert_eq!(state.jobs.len(), 2);
        assert_eq!(state.error.as_deref(), Some(DELETE_FAILED));
        assert!(state.deleting.is_none());
        assert_eq!(controller.api().calls(), vec!["delete 2"]);
    }

    #[tokio::test]
    async fn confirm_without_open_dialog_does_nothing() {
        let mut controller = loaded(vec![page(vec![], 0, 0)]).await;
        assert!(!controller.confirm_delete().await);
        assert!(controller.api().calls().is_empty());
    }
}
