use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::{
    client::ClientError,
    entities::{contact::ContactForm, project::Project, skill::Skill},
};

const DEVELOPMENT_API_URL: &str = "http://localhost:5000/api/";
const PRODUCTION_API_URL: &str = "https://portfolio-backend-otxk.onrender.com/api/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Static choice of backend, fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTarget {
    Development,
    Production,
}

impl ApiTarget {
    /// Debug builds talk to the local server, release builds to the
    /// deployed one.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            ApiTarget::Development
        } else {
            ApiTarget::Production
        }
    }

    pub fn base_url(&self) -> Result<Url, ClientError> {
        let raw = match self {
            ApiTarget::Development => DEVELOPMENT_API_URL,
            ApiTarget::Production => PRODUCTION_API_URL,
        };
        Url::parse(raw).map_err(|e| ClientError::Transport(format!("invalid base url {raw}: {e}")))
    }
}

/// Server acknowledgement of a contact submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortfolioClient: Send + Sync {
    async fn fetch_projects(&self) -> Result<Vec<Project>, ClientError>;
    async fn fetch_skills(&self) -> Result<Vec<Skill>, ClientError>;
    async fn submit_contact(&self, form: &ContactForm) -> Result<ContactAck, ClientError>;
}

/// List endpoints are expected to return arrays. Any other JSON value is
/// read as an empty list, but every element of an array must decode.
fn decode_list<T: DeserializeOwned>(path: &str, body: Value) -> Result<Vec<T>, ClientError> {
    if !body.is_array() {
        warn!("Expected a list from /{}, got {}", path, body);
        return Ok(Vec::new());
    }
    serde_json::from_value(body)
        .map_err(|e| ClientError::Decode(format!("/{path}: {e}")))
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct PortfolioApi {
    http: reqwest::Client,
    base: Url,
}

impl PortfolioApi {
    pub fn new(target: ApiTarget) -> Result<Self, ClientError> {
        Self::with_base_url(target.base_url()?, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(mut base: Url, timeout: Duration) -> Result<Self, ClientError> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(PortfolioApi { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let response = self.http.get(self.endpoint(path)?).send().await?;
        let response = check_status(response).await?;

        let body = response.json::<Value>().await?;
        decode_list(path, body)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorPayload>()
        .await
        .ok()
        .and_then(|body| body.error.or(body.message))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    Err(ClientError::Status { status: status.as_u16(), message })
}

#[async_trait]
impl PortfolioClient for PortfolioApi {
    async fn fetch_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.fetch_list("projects").await
    }

    async fn fetch_skills(&self) -> Result<Vec<Skill>, ClientError> {
        self.fetch_list("skills").await
    }

    async fn submit_contact(&self, form: &ContactForm) -> Result<ContactAck, ClientError> {
        let response = self.http
            .post(self.endpoint("contact")?)
            .json(form)
            .send()
            .await?;
        let response = check_status(response).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(ContactAck { success: true, message: None });
        }
        Ok(response.json::<ContactAck>().await?)
    }
}
