use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sqlx::{Pool, Postgres};
use std::fmt;
use tracing::{error, info, warn};

use super::dto::{JobPatch, ListQuery};
use crate::api::validation::ErrorResponse;
use crate::db::job_repository::JobRepository;
use crate::db::models::{JobChanges, NewJob};
use crate::jobs::{Job, JobPayload, JobsPage, PageMeta};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(sqlx::Error),

    /// Body failed a business rule
    ValidationError(String),

    /// Query string carried an unsupported value
    InvalidQuery(String),

    /// Job not found
    NotFound(i32),

    /// Unique constraint violated
    Conflict,
}

impl ServiceError {
    fn from_db(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => ServiceError::Conflict,
            _ => ServiceError::DatabaseError(err),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
            ServiceError::NotFound(id) => write!(f, "Job not found: {}", id),
            ServiceError::Conflict => write!(f, "Duplicate job_id or other integrity violation"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::ValidationError(_) | ServiceError::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                }
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                }
            }
            ServiceError::InvalidQuery(msg) => {
                warn!("Invalid query: {}", msg);
                ErrorResponse {
                    error: msg.clone(),
                    fields: serde_json::json!({}),
                }
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                ErrorResponse {
                    error: "Job not found".to_string(),
                    fields: serde_json::json!({"message": format!("Job with id {} not found", id)}),
                }
            }
            ServiceError::Conflict => {
                warn!("Integrity violation");
                ErrorResponse {
                    error: self.to_string(),
                    fields: serde_json::json!({}),
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Job service containing business logic
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// One filtered, sorted page plus its pagination meta
    pub async fn list_jobs(&self, query: &ListQuery) -> Result<JobsPage, ServiceError> {
        let filter = query.resolve()?;

        let (rows, total) = JobRepository::list(&self.pool, &filter)
            .await
            .map_err(ServiceError::from_db)?;

        info!(
            "Service: Listed page {} ({} jobs, {} total)",
            filter.page,
            rows.len(),
            total
        );

        Ok(JobsPage {
            jobs: rows.into_iter().map(Job::from).collect(),
            meta: PageMeta::new(filter.page, filter.per_page, total.max(0) as u64),
        })
    }

    pub async fn get_job(&self, id: i32) -> Result<Job, ServiceError> {
        JobRepository::get(&self.pool, id)
            .await
            .map_err(ServiceError::from_db)?
            .map(Job::from)
            .ok_or(ServiceError::NotFound(id))
    }

    /// Insert a validated payload
    pub async fn create_job(&self, payload: &JobPayload) -> Result<Job, ServiceError> {
        info!("Service: Creating job with title={}", payload.title.trim());

        let row = JobRepository::create(&self.pool, &NewJob::from(payload))
            .await
            .map_err(ServiceError::from_db)?;

        info!("Service: Job created successfully with id={}", row.id);
        Ok(Job::from(row))
    }

    /// Full update from a validated payload
    pub async fn replace_job(&self, id: i32, payload: &JobPayload) -> Result<Job, ServiceError> {
        self.apply_changes(id, &JobChanges::from(payload)).await
    }

    /// Partial update; only provided fields change
    pub async fn patch_job(&self, id: i32, patch: JobPatch) -> Result<Job, ServiceError> {
        let changes = patch.into_changes()?;
        self.apply_changes(id, &changes).await
    }

    async fn apply_changes(&self, id: i32, changes: &JobChanges) -> Result<Job, ServiceError> {
        let row = JobRepository::update(&self.pool, id, changes)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or(ServiceError::NotFound(id))?;

        info!("Service: Job {} updated", id);
        Ok(Job::from(row))
    }

    pub async fn delete_job(&self, id: i32) -> Result<(), ServiceError> {
        if JobRepository::delete(&self.pool, id)
            .await
            .map_err(ServiceError::from_db)?
        {
            info!("Service: Job {} deleted", id);
            Ok(())
        } else {
            Err(ServiceError::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: ServiceError) -> (StatusCode, ErrorResponse) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn not_found_uses_fixed_message() {
        let (status, body) = body_of(ServiceError::NotFound(42)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Job not found");
        assert_eq!(body.fields["message"], "Job with id 42 not found");
    }

    #[actix_web::test]
    async fn invalid_query_surfaces_its_message() {
        let (status, body) =
            body_of(ServiceError::InvalidQuery("Invalid sort parameter".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid sort parameter");
    }

    #[actix_web::test]
    async fn conflict_and_database_errors() {
        let (status, body) = body_of(ServiceError::Conflict).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error, "Duplicate job_id or other integrity violation");

        let (status, body) = body_of(ServiceError::DatabaseError(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to process request");
    }

    #[test]
    fn non_unique_database_errors_stay_internal() {
        assert!(matches!(
            ServiceError::from_db(sqlx::Error::RowNotFound),
            ServiceError::DatabaseError(_)
        ));
    }
}
