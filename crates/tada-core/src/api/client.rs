//! Todo service client implementation

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ApiError, SessionError};
use crate::models::{LoginResponse, Todo, TodoId, TodoPatch};
use crate::session::SessionStore;

/// Message used when a failed login carries no usable `message`
const LOGIN_FAILED: &str = "Login failed";

/// The four collection operations, for logging and failure messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::List => "Failed to fetch todos",
            Operation::Create => "Failed to create todo",
            Operation::Update => "Failed to update todo",
            Operation::Delete => "Failed to delete todo",
        }
    }
}

/// Error body returned by the service on a failed login
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the todo service
///
/// Cheap to clone; clones share the HTTP connection pool and session store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            session,
        }
    }

    /// Create a client using the configured service URL
    pub fn from_config(config: &Config, session: Arc<SessionStore>) -> Self {
        Self::new(&config.api_url, session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session store this client reads the credential from
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Exchange credentials for an access token and store it
    ///
    /// Never returns `Unauthorized`: there is no session to invalidate yet.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = self.url("/login");
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| ApiError::transport(LOGIN_FAILED, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(LOGIN_FAILED, e))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| LOGIN_FAILED.to_string());
            warn!("Login rejected with {}: {}", status, message);
            return Err(ApiError::status(message, status.as_u16()));
        }

        let login: LoginResponse = serde_json::from_slice(&body)
            .map_err(|e| ApiError::transport(LOGIN_FAILED, e))?;

        self.session
            .set_credential(login.access_token.clone())
            .map_err(|e| {
                let message = format!("Failed to save session to '{}'", e.path().display());
                ApiError::transport(message, e)
            })?;

        info!("Logged in as {}", email);
        Ok(login)
    }

    /// Drop the session locally; the service is not contacted
    pub fn logout(&self) -> Result<(), SessionError> {
        self.session.clear_credential()
    }

    /// Fetch the whole collection
    pub async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let request = self.http.get(self.url("/todos"));
        let response = self.send(Operation::List, request).await?;
        decode(Operation::List, response).await
    }

    /// Create a todo; returns the record as stored by the service
    ///
    /// `text` is sent as given. Callers are expected to reject blank text.
    pub async fn create(&self, text: &str) -> Result<Todo, ApiError> {
        let request = self
            .http
            .post(self.url("/todos"))
            .json(&serde_json::json!({ "text": text }));
        let response = self.send(Operation::Create, request).await?;
        decode(Operation::Create, response).await
    }

    /// Apply a partial update; returns the full record the service confirmed
    pub async fn update(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/todos/{}", id)))
            .json(patch);
        let response = self.send(Operation::Update, request).await?;
        decode(Operation::Update, response).await
    }

    /// Delete a todo. The response body is not inspected.
    pub async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        let request = self.http.delete(self.url(&format!("/todos/{}", id)));
        self.send(Operation::Delete, request).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the credential, send, and classify the status
    async fn send(&self, op: Operation, request: RequestBuilder) -> Result<Response, ApiError> {
        // Snapshot: a concurrent logout must not change this request's header
        let token = self.session.credential().unwrap_or_default();

        debug!(?op, "Sending request");
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!(?op, "Request failed: {}", e);
                ApiError::transport(op.failure_message(), e)
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(self.reject(op, status))
    }

    fn reject(&self, op: Operation, status: StatusCode) -> ApiError {
        if is_auth_failure(status) {
            warn!(?op, "Credential rejected ({}), clearing session", status);
            if let Err(e) = self.session.clear_credential() {
                warn!("Could not remove persisted session: {}", e);
            }
            return ApiError::Unauthorized;
        }

        warn!(?op, "Service returned {}", status);
        ApiError::status(op.failure_message(), status.as_u16())
    }
}

/// 401 and 422 both end the session
fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY
}

async fn decode<T: DeserializeOwned>(op: Operation, response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| {
        warn!(?op, "Could not decode response: {}", e);
        ApiError::transport(op.failure_message(), e)
    })
}
