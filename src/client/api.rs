use reqwest::{Response, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::client::error::ClientError;
use crate::models::{Task, TaskInput, TaskUpdate, User};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin typed wrapper over the backend REST surface. One round trip per
/// call, no retries; failures map onto [`ClientError`] kinds by status.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());

        Err(match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            StatusCode::CONFLICT => ClientError::DuplicateEmail(message),
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        // For login, a 401 means the credentials were wrong, and the server
        // deliberately does not say which part.
        match Self::check(response).await {
            Err(ClientError::Unauthorized(_)) => Err(ClientError::InvalidCredentials),
            other => Ok(other?.json().await?),
        }
    }

    pub async fn me(&self, token: &str) -> Result<User, ClientError> {
        let response = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn update_profile(
        &self,
        token: &str,
        updates: &UpdateProfileRequest,
    ) -> Result<User, ClientError> {
        let response = self
            .http
            .put(self.url("/auth/profile"))
            .bearer_auth(token)
            .json(updates)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn tasks(&self, token: &str) -> Result<Vec<Task>, ClientError> {
        let response = self
            .http
            .get(self.url("/tasks"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create_task(&self, token: &str, task: &TaskInput) -> Result<Task, ClientError> {
        let response = self
            .http
            .post(self.url("/tasks"))
            .bearer_auth(token)
            .json(task)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn update_task(
        &self,
        token: &str,
        task_id: Uuid,
        updates: &TaskUpdate,
    ) -> Result<Task, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/tasks/{}", task_id)))
            .bearer_auth(token)
            .json(updates)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete_task(&self, token: &str, task_id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/tasks/{}", task_id)))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
