//! Password sign-in and role lookup.

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use cardapio_core::providers::{AuthIdentity, AuthProvider};
use cardapio_core::{AppRole, ProviderError, UserId};

use crate::client::SupabaseClient;
use crate::error::BackendError;

pub const USER_ROLES_TABLE: &str = "user_roles";

/// A signed-in session as returned by the token endpoint.
#[derive(Clone)]
pub struct AuthSession {
    pub identity: AuthIdentity,
    pub refresh_token: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.identity.user_id)
            .field("email", &self.identity.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Whether the access token has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    expires_in: i64,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str, now: DateTime<Utc>) -> AuthSession {
        AuthSession {
            identity: AuthIdentity {
                user_id: UserId::new(self.user.id),
                email: self.user.email.unwrap_or_else(|| fallback_email.to_string()),
                access_token: self.access_token,
            },
            refresh_token: SecretString::from(self.refresh_token),
            expires_at: now + Duration::seconds(self.expires_in),
        }
    }
}

impl SupabaseClient {
    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` with status 400 for wrong credentials.
    #[instrument(skip(self, password))]
    pub async fn sign_in_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let url = self.endpoint("auth/v1/token", &[("grant_type", "password")])?;
        let body = serde_json::json!({ "email": email, "password": password });
        let token: TokenResponse = self
            .send_json(self.request(Method::POST, url).json(&body))
            .await?;

        let session = token.into_session(email, Utc::now());
        info!(user_id = %session.identity.user_id, expires_at = %session.expires_at, "Signed in");
        Ok(session)
    }
}

/// The token endpoint answers 400 for bad credentials.
fn sign_in_error(err: BackendError) -> ProviderError {
    match err {
        BackendError::Api {
            status: 400 | 401,
            message,
        } => ProviderError::Unauthorized(message),
        other => other.into_provider("auth"),
    }
}

impl AuthProvider for SupabaseClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, ProviderError> {
        self.sign_in_session(email, password)
            .await
            .map(|session| session.identity)
            .map_err(sign_in_error)
    }

    #[instrument(skip(self, password))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        let url = self
            .endpoint("auth/v1/signup", &[])
            .map_err(|e| e.into_provider("auth"))?;
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(self.request(Method::POST, url).json(&body))
            .await
            .map_err(|e| e.into_provider("auth"))?;
        info!("Sign-up requested");
        Ok(())
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    async fn sign_out(&self, identity: &AuthIdentity) -> Result<(), ProviderError> {
        let url = self
            .endpoint("auth/v1/logout", &[])
            .map_err(|e| e.into_provider("auth"))?;
        let user = self.with_access_token(&identity.access_token);
        if let Err(e) = user.send(user.request(Method::POST, url)).await {
            // An expired token is already signed out
            if e.is_unauthorized() {
                warn!(error = %e, "Sign-out with stale token");
                return Ok(());
            }
            return Err(e.into_provider("auth"));
        }
        Ok(())
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.user_id, role = %role))]
    async fn has_role(
        &self,
        identity: &AuthIdentity,
        role: AppRole,
    ) -> Result<bool, ProviderError> {
        let user_filter = format!("eq.{}", identity.user_id);
        let role_filter = format!("eq.{role}");
        let rows: Vec<serde_json::Value> = self
            .with_access_token(&identity.access_token)
            .select(
                USER_ROLES_TABLE,
                &[
                    ("user_id", user_filter.as_str()),
                    ("role", role_filter.as_str()),
                    ("limit", "1"),
                ],
            )
            .await
            .map_err(|e| e.into_provider(USER_ROLES_TABLE))?;
        Ok(!rows.is_empty())
    }
}
