//! API client for the clinic REST backend.
//!
//! Fetches the student roster and the physiotherapist list. The roster is
//! returned as-is; projecting it onto a calendar is done by
//! [`crate::schedule`].

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{Physiotherapist, Student};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

const STUDENTS_PATH: &str = "/api/students/";
const PHYSIOTHERAPISTS_PATH: &str = "/api/physiotherapists/";

/// API client for the clinic backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`
    /// (e.g. `https://clinica.example.com`).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(response: reqwest::Response) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .headers(self.auth_headers()?)
                .query(query)
                .send()
                .await
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    // ===== Data Fetching Methods =====

    /// Fetch the student roster, optionally only the students of one
    /// physiotherapist. Each student carries its weekly schedules.
    pub async fn fetch_students(&self, physiotherapist: Option<i64>) -> Result<Vec<Student>> {
        let url = self.endpoint(STUDENTS_PATH);
        let students: Vec<Student> = self
            .get(&url, &Self::roster_query(physiotherapist))
            .await
            .context("Failed to fetch students")?;

        debug!(
            count = students.len(),
            physiotherapist = ?physiotherapist,
            slots = students.iter().map(|s| s.slots.len()).sum::<usize>(),
            "Students fetched"
        );
        Ok(students)
    }

    /// Fetch all physiotherapists (used to build the roster filter).
    pub async fn fetch_physiotherapists(&self) -> Result<Vec<Physiotherapist>> {
        let url = self.endpoint(PHYSIOTHERAPISTS_PATH);
        let physiotherapists: Vec<Physiotherapist> = self
            .get(&url, &[])
            .await
            .context("Failed to fetch physiotherapists")?;

        debug!(count = physiotherapists.len(), "Physiotherapists fetched");
        Ok(physiotherapists)
    }

    fn roster_query(physiotherapist: Option<i64>) -> Vec<(&'static str, String)> {
        physiotherapist
            .map(|id| vec![("physiotherapist", id.to_string())])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let api = ApiClient::new("https://clinica.example.com/").unwrap();
        assert_eq!(api.base_url(), "https://clinica.example.com");
        assert_eq!(
            api.endpoint(STUDENTS_PATH),
            "https://clinica.example.com/api/students/"
        );
    }

    #[test]
    fn test_roster_query() {
        assert!(ApiClient::roster_query(None).is_empty());
        assert_eq!(
            ApiClient::roster_query(Some(7)),
            vec![("physiotherapist", "7".to_string())]
        );
    }

    #[test]
    fn test_auth_headers() {
        let api = ApiClient::new("http://localhost:8000").unwrap();
        let headers = api.auth_headers().unwrap();
        assert!(headers.get(header::AUTHORIZATION).is_none());

        let authed = api.with_token("abc123".to_string());
        let headers = authed.auth_headers().unwrap();
        assert_eq!(
            headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer abc123")
        );
        assert_eq!(authed.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_parse_roster_response() {
        let json = r#"[
            {"id": 1, "name": "Ana", "active": true, "physiotherapist": 2,
             "modality_details": {"id": 1, "name": "Pilates", "price": "250.00", "payment_type": "MONTHLY"},
             "schedules": [{"id": 9, "student": 1, "weekday": 0, "hour": 8}]},
            {"id": 2, "name": "Bruno", "active": false, "physiotherapist": null,
             "modality_details": null, "schedules": []}
        ]"#;

        let students: Vec<Student> = serde_json::from_str(json).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].slots.len(), 1);
        assert!(!students[1].active);
        assert_eq!(students[1].modality_label(), "Sem modalidade");
    }
}
