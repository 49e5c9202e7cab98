use actix_web::{
    delete, get, patch, post, put,
    web::{self, Data, Path, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use super::dto::{JobPatch, ListQuery};
use super::service::{JobService, ServiceError};
use crate::jobs::JobPayload;

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    query: Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let page = service.list_jobs(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/{id}")]
async fn get_job(service: Data<JobService>, id: Path<i32>) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[post("")]
async fn create_job(
    service: Data<JobService>,
    payload: Json<JobPayload>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.create_job(&payload).await?;
    Ok(HttpResponse::Created().json(job))
}

#[put("/{id}")]
async fn replace_job(
    service: Data<JobService>,
    id: Path<i32>,
    payload: Json<JobPayload>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.replace_job(id.into_inner(), &payload).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[patch("/{id}")]
async fn patch_job(
    service: Data<JobService>,
    id: Path<i32>,
    patch: web::Json<JobPatch>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.patch_job(id.into_inner(), patch.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    service.delete_job(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        web::scope("/jobs")
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(replace_job)
            .service(patch_job)
            .service(delete_job),
    );
}
