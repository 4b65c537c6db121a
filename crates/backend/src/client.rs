//! HTTP client for the hosted backend.
//!
//! One `reqwest` client is shared by the REST (`/rest/v1`), auth (`/auth/v1`)
//! and storage (`/storage/v1`) endpoints. Every request carries the anon key
//! as `apikey`; the `Authorization` bearer is the signed-in user's access
//! token when one is attached, the anon key otherwise.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::BackendConfig;
use crate::error::BackendError;

/// Characters of an error body kept in logs and error messages.
const ERROR_BODY_PREVIEW: usize = 200;

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for the hosted database, auth and storage APIs.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
    access_token: Option<Arc<SecretString>>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: Url,
    anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the anon key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(config.anon_key.expose_secret())
                .map_err(|e| BackendError::InvalidHeader(format!("anon key: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        // `Url::join` replaces the last segment unless the path ends in '/'
        let mut base_url = config.url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                base_url,
                anon_key: config.anon_key.clone(),
            }),
            access_token: None,
        })
    }

    /// A client that authenticates as the signed-in user.
    #[must_use]
    pub fn with_access_token(&self, access_token: &str) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            access_token: Some(Arc::new(SecretString::from(access_token.to_string()))),
        }
    }

    /// Whether a user access token is attached.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Project base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // URLs
    // =========================================================================

    /// Resolve `path` against the base URL and append `query`.
    ///
    /// # Errors
    ///
    /// Returns error if `path` does not form a valid URL.
    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// URL of a PostgREST table.
    ///
    /// # Errors
    ///
    /// Returns error if the table name does not form a valid URL.
    pub fn rest_url(&self, table: &str, query: &[(&str, &str)]) -> Result<Url, BackendError> {
        self.endpoint(&format!("rest/v1/{table}"), query)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Start a request with the auth headers set.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self
            .access_token
            .as_deref()
            .unwrap_or(&self.inner.anon_key)
            .expose_secret();
        self.inner
            .client
            .request(method, url)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    /// Send a request and return the body of a successful response.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            tracing::error!(
                status = %status,
                body = %preview,
                "Backend returned non-success status"
            );
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: api_error_message(&body).unwrap_or(preview),
            });
        }

        Ok(body)
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(ERROR_BODY_PREVIEW).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    // =========================================================================
    // PostgREST
    // =========================================================================

    /// `GET /rest/v1/{table}?select=*&...`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or rows do not decode as `T`.
    #[instrument(skip(self, query), fields(table = %table))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, BackendError> {
        let mut params = vec![("select", "*")];
        params.extend_from_slice(query);
        let url = self.rest_url(table, &params)?;

        let rows: Vec<T> = self.send_json(self.request(Method::GET, url)).await?;
        debug!(rows = rows.len(), "Selected rows");
        Ok(rows)
    }

    /// Like [`select`](Self::select) but requires at least one row.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when no row matches.
    pub async fn select_first<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BackendError> {
        self.select(table, query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(table.to_string()))
    }

    /// `POST /rest/v1/{table}` returning the inserted row.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the row does not decode.
    #[instrument(skip(self, body), fields(table = %table))]
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.rest_url(table, &[])?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(body);
        first_row(self.send_json(request).await?, table)
    }

    /// `PATCH /rest/v1/{table}?id=eq.{id}` returning the updated row.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when no row has `id`.
    #[instrument(skip(self, body), fields(table = %table, id = %id))]
    pub async fn update<B, T>(&self, table: &str, id: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let filter = format!("eq.{id}");
        let url = self.rest_url(table, &[("id", filter.as_str())])?;
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(body);
        first_row(self.send_json(request).await?, table)
    }

    /// `DELETE /rest/v1/{table}?id=eq.{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(table = %table, id = %id))]
    pub async fn delete(&self, table: &str, id: &str) -> Result<(), BackendError> {
        let filter = format!("eq.{id}");
        let url = self.rest_url(table, &[("id", filter.as_str())])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

fn first_row<T>(rows: Vec<T>, table: &str) -> Result<T, BackendError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| BackendError::NotFound(table.to_string()))
}

/// Pull the human-readable message out of a JSON error body.
///
/// PostgREST uses `message`, the auth API `msg` or `error_description`.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .map(str::to_string)
}
