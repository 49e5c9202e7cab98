/// HTTP implementation of [`JobsApi`] on top of reqwest
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::error::{ClientError, ClientResult};
use super::{JobsApi, ListParams};
use crate::jobs::{Job, JobForm, JobsPage};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the job service, e.g. `http://localhost:5000`
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// Job service client speaking JSON over HTTP
#[derive(Clone)]
pub struct HttpJobsClient {
    client: Client,
    base_url: String,
}

impl HttpJobsClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if reqwest::Url::parse(&base_url).is_err() {
            return Err(ClientError::Configuration(format!(
                "'{}' is not a valid base URL",
                config.base_url
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(|e| {
            error!("Request failed: {}", e);
            ClientError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("Request successful: {}", status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("Request failed with status {}: {}", status.as_u16(), body);
        Err(ClientError::api_error(status.as_u16(), &body))
    }

    async fn send_json<T>(&self, request: RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!("Failed to deserialize response: {}", e);
            ClientError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl JobsApi for HttpJobsClient {
    async fn get_jobs(&self, params: &ListParams) -> ClientResult<JobsPage> {
        let pairs = params.query_pairs();
        let mut request = self.request(Method::GET, "/jobs");
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }
        self.send_json(request).await
    }

    async fn get_job(&self, id: i32) -> ClientResult<Job> {
        self.send_json(self.request(Method::GET, &format!("/jobs/{}", id)))
            .await
    }

    async fn create_job(&self, form: &JobForm) -> ClientResult<Job> {
        let request = self.request(Method::POST, "/jobs").json(&form.to_payload());
        self.send_json(request).await
    }

    async fn update_job(&self, id: i32, form: &JobForm) -> ClientResult<Job> {
        let request = self
            .request(Method::PUT, &format!("/jobs/{}", id))
            .json(&form.to_payload());
        self.send_json(request).await
    }

    async fn delete_job(&self, id: i32) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, &format!("/jobs/{}", id)))
            .await?;
        Ok(())
    }
}
