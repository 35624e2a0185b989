use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::error::ClientError;
use crate::session::company::ActiveCompany;
use crate::session::{Role, UserProfile};

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Who-am-I response: profile plus the role embedded by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct WhoAmI {
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

impl WhoAmI {
    pub fn into_parts(self) -> (UserProfile, Role) {
        let role = self.role;
        let profile = UserProfile {
            id: self.id,
            username: self.username,
            email: self.email,
        };
        (profile, role)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Seam between the login flows and the remote REST API, so flows can be
/// exercised against a stub in tests.
#[async_trait]
pub trait AuthApi {
    /// Exchanges credentials for an opaque bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, ClientError>;

    /// Looks up the profile and role behind a bearer token.
    async fn whoami(&self, token: &str) -> Result<WhoAmI, ClientError>;

    /// Resolves the company the authenticated account operates under.
    async fn active_company(&self, token: &str) -> Result<ActiveCompany, ClientError>;
}

/// reqwest-backed API client. The bearer token is always sent as an
/// `Authorization: Bearer` header; the legacy `x-admin-token` scheme is
/// not emitted.
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn from_config() -> Result<Self, ClientError> {
        let cfg = config::config();
        Self::new(
            cfg.api.base_url.clone(),
            std::time::Duration::from_secs(cfg.api.request_timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<String, ClientError> {
        let res = self
            .http
            .post(self.endpoint("/auth/token"))
            .json(credentials)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::warn!("credential exchange rejected with status {}", res.status());
            return Err(ClientError::RejectedCredentials {
                status: res.status().as_u16(),
            });
        }

        let body: TokenResponse = res
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(body.access_token)
    }

    async fn whoami(&self, token: &str) -> Result<WhoAmI, ClientError> {
        let res = self
            .http
            .get(self.endpoint("/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;

        match res.status() {
            s if s.is_success() => res
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string())),
            s if s == reqwest::StatusCode::UNAUTHORIZED => Err(ClientError::Unauthenticated),
            s => Err(ClientError::InvalidResponse(format!(
                "unexpected status {} from /auth/me",
                s
            ))),
        }
    }

    async fn active_company(&self, token: &str) -> Result<ActiveCompany, ClientError> {
        let res = self
            .http
            .get(self.endpoint("/companies/active"))
            .bearer_auth(token)
            .send()
            .await?;

        match res.status() {
            s if s.is_success() => res
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string())),
            s if s == reqwest::StatusCode::UNAUTHORIZED => Err(ClientError::Unauthenticated),
            s => Err(ClientError::InvalidResponse(format!(
                "unexpected status {} from /companies/active",
                s
            ))),
        }
    }
}
