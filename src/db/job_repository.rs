use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;

use crate::db::models::{JobChanges, JobFilter, JobRow, NewJob};
use crate::jobs::SortOrder;

/// Repository for Job database operations
pub struct JobRepository;

impl JobRepository {
    /// One page of jobs matching `filter`, plus the total match count
    pub async fn list(
        pool: &Pool<Postgres>,
        filter: &JobFilter,
    ) -> Result<(Vec<JobRow>, i64), sqlx::Error> {
        debug!("Listing jobs: {:?}", filter);

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM jobs");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query.build_query_scalar::<i64>().fetch_one(pool).await?;

        let mut list_query = list_query(filter);
        let rows = list_query.build_query_as::<JobRow>().fetch_all(pool).await?;

        debug!("Listed {} of {} matching jobs", rows.len(), total);
        Ok((rows, total))
    }

    pub async fn get(pool: &Pool<Postgres>, id: i32) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, title, company, city, country, posting_date, job_type, tags, link, job_id,
                   created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Insert a job and return the full record, including the generated `job_id`
    pub async fn create(pool: &Pool<Postgres>, job: &NewJob) -> Result<JobRow, sqlx::Error> {
        debug!("Creating job: title={}, company={}", job.title, job.company);

        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (title, company, city, country, posting_date, job_type, tags, link)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, company, city, country, posting_date, job_type, tags, link, job_id,
                      created_at, updated_at
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.city)
        .bind(&job.country)
        .bind(job.posting_date)
        .bind(job.job_type.as_str())
        .bind(&job.tags)
        .bind(&job.link)
        .fetch_one(pool)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    /// Apply `changes` to job `id`; `None` when the job does not exist
    pub async fn update(
        pool: &Pool<Postgres>,
        id: i32,
        changes: &JobChanges,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Updating job id={}", id);

        sqlx::query_as::<_, JobRow>(UPDATE_JOB_SQL)
            .bind(&changes.title)
            .bind(&changes.company)
            .bind(&changes.city)
            .bind(&changes.country)
            .bind(changes.posting_date.is_some())
            .bind(changes.posting_date.flatten())
            .bind(changes.job_type.map(|t| t.as_str()))
            .bind(&changes.tags)
            .bind(changes.link.is_some())
            .bind(changes.link.clone().flatten())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Returns whether a row was deleted
    pub async fn delete(pool: &Pool<Postgres>, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        debug!("Delete job id={}: {} rows affected", id, result.rows_affected());
        Ok(result.rows_affected() > 0)
    }
}

const UPDATE_JOB_SQL: &str = r#"
    UPDATE jobs
    SET title = COALESCE($1, title),
        company = COALESCE($2, company),
        city = COALESCE($3, city),
        country = COALESCE($4, country),
        posting_date = CASE WHEN $5::boolean THEN $6::date ELSE posting_date END,
        job_type = COALESCE($7, job_type),
        tags = COALESCE($8, tags),
        link = CASE WHEN $9::boolean THEN $10::varchar ELSE link END,
        updated_at = NOW()
    WHERE id = $11
    RETURNING id, title, company, city, country, posting_date, job_type, tags, link, job_id,
              created_at, updated_at
"#;

fn list_query(filter: &JobFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(
        "SELECT id, title, company, city, country, posting_date, job_type, tags, link, job_id, \
         created_at, updated_at FROM jobs",
    );
    push_filters(&mut query, filter);

    query.push(match filter.sort {
        SortOrder::PostingDateDesc => " ORDER BY posting_date DESC NULLS LAST, id DESC",
        SortOrder::PostingDateAsc => " ORDER BY posting_date ASC NULLS LAST, id ASC",
    });
    query.push(" LIMIT ").push_bind(i64::from(filter.per_page));
    query.push(" OFFSET ").push_bind(filter.offset());
    query
}

fn push_filters(query: &mut QueryBuilder<'static, Postgres>, filter: &JobFilter) {
    query.push(" WHERE TRUE");

    if let Some(job_type) = &filter.job_type {
        query.push(" AND job_type = ").push_bind(job_type.clone());
    }

    // Matches a bare city or country as well as the "City, Country" label the board offers
    if let Some(location) = &filter.location {
        let pattern = format!("%{}%", location);
        query
            .push(" AND (city ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR country ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR (city || ', ' || country) ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(tag) = &filter.tag {
        query.push(" AND tags ILIKE ").push_bind(format!("%{}%", tag));
    }
}
