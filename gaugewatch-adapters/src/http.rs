//! Shared HTTP plumbing for the upstream JSON APIs.

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::{AdapterError, Credentials, Session};

/// JSON-over-HTTP client bound to one backend endpoint.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Created {
    #[serde(deserialize_with = "crate::wire::id")]
    pub id: String,
}

impl HttpClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// POST credentials to `path` and read back `{"token": ...}`.
    pub async fn login(&self, path: &str, credentials: &Credentials) -> Result<Session, AdapterError> {
        let response = self
            .client
            .post(self.url(path))
            .json(&serde_json::json!({
                "username": credentials.username,
                "password": credentials.password,
            }))
            .send()
            .await?;

        let response = check_status(response, path).await?;
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;

        if body.token.is_empty() {
            return Err(AdapterError::Auth("Login returned an empty token".to_string()));
        }
        Ok(Session::new(body.token))
    }

    /// Authenticated GET, decoding the JSON body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> Result<T, AdapterError> {
        let response = self.send(Method::GET, session, path, None).await?;
        response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))
    }

    /// Authenticated request with an optional JSON body.
    pub async fn send(
        &self,
        method: Method,
        session: &Session,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, AdapterError> {
        debug!(%method, path, "Backend request");

        let mut request = self
            .client
            .request(method, self.url(path))
            .header(reqwest::header::AUTHORIZATION, session.bearer());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        check_status(response, path).await
    }

    /// Authenticated request whose response carries `{"id": ...}`.
    pub async fn create(
        &self,
        session: &Session,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<String, AdapterError> {
        let response = self.send(Method::POST, session, path, Some(body)).await?;
        let created: Created = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;
        Ok(created.id)
    }
}

/// Map non-success statuses onto adapter errors.
async fn check_status(response: Response, path: &str) -> Result<Response, AdapterError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(AdapterError::Auth(format!("{} rejected the session", path)))
        }
        StatusCode::NOT_FOUND => Err(AdapterError::NotFound(path.to_string())),
        StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED => {
            Err(AdapterError::Unsupported(path.to_string()))
        }
        _ => {
            let detail = response.text().await.unwrap_or_default();
            let detail = detail.trim();
            if detail.is_empty() {
                Err(AdapterError::Http(format!("API returned status {}", status)))
            } else {
                Err(AdapterError::Http(format!(
                    "API returned status {}: {}",
                    status, detail
                )))
            }
        }
    }
}
