//! LinkedIn job search client
//!
//! Thin wrapper around the LinkedIn Job Search API served through RapidAPI.
//! Filters become query parameters, the JSON answer becomes a list of
//! [`JobRecord`]s, and every failure is classified as an [`ApiError`].
//!
//! # Example
//!
//! ```no_run
//! use client::JobSearchClient;
//! use common::{Credentials, SearchFilters};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = JobSearchClient::new();
//! let credentials = Credentials::new("my-key", "linkedin-job-search-api.p.rapidapi.com");
//! let filters = SearchFilters::new(Some("Germany".to_string()), false, 7, 10, 0)?;
//!
//! let jobs = client.search(&filters, &credentials).await?;
//! println!("Found {} SAP jobs", jobs.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
mod parse;
pub mod transport;

pub use error::{ApiError, Result};
pub use parse::parse_jobs;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

use chrono::{NaiveDate, Utc};
use common::{Credentials, JobRecord, SearchFilters};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Endpoint returning jobs that were active during the last week.
pub const DEFAULT_ENDPOINT_PATH: &str = "/active-jb-7d";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Client for the job search endpoint.
///
/// Holds no credentials itself; they are passed to every call.
#[derive(Clone)]
pub struct JobSearchClient {
    transport: Arc<dyn Transport>,
    endpoint_path: String,
    timeout: Duration,
}

impl Default for JobSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl JobSearchClient {
    /// Client using reqwest, the default endpoint and a 30 second timeout.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Client sending requests through the given transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.endpoint_path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full endpoint URL for the given API host.
    pub fn endpoint_url(&self, api_host: &str) -> String {
        format!(
            "https://{}{}",
            api_host.trim().trim_end_matches('/'),
            self.endpoint_path
        )
    }

    /// Searches for jobs posted within the filter's window, counted back
    /// from today (UTC).
    pub async fn search(
        &self,
        filters: &SearchFilters,
        credentials: &Credentials,
    ) -> Result<Vec<JobRecord>> {
        self.search_as_of(filters, credentials, Utc::now().date_naive())
            .await
    }

    /// Same as [`JobSearchClient::search`] with an explicit reference date.
    pub async fn search_as_of(
        &self,
        filters: &SearchFilters,
        credentials: &Credentials,
        today: NaiveDate,
    ) -> Result<Vec<JobRecord>> {
        let request = self.build_request(filters, credentials, today)?;

        debug!(
            url = %request.url,
            offset = filters.page_offset(),
            limit = filters.page_size(),
            "Searching jobs"
        );

        let response = self.transport.get(request).await.map_err(|err| {
            warn!("Job search request failed: {}", err);
            match err {
                TransportError::Timeout => ApiError::Timeout,
                TransportError::Failed(msg) => ApiError::Network(msg),
            }
        })?;

        if !(200..300).contains(&response.status) {
            warn!(status = response.status, "Job search API returned an error");
            return Err(ApiError::status(response.status, response.body));
        }

        let jobs = parse_jobs(&response.body)?;
        debug!("Received {} jobs", jobs.len());
        Ok(jobs)
    }

    /// Builds the outbound request without sending it.
    pub fn build_request(
        &self,
        filters: &SearchFilters,
        credentials: &Credentials,
        today: NaiveDate,
    ) -> Result<HttpRequest> {
        if !credentials.is_present() {
            return Err(ApiError::CredentialsMissing);
        }

        Ok(HttpRequest {
            url: self.endpoint_url(&credentials.api_host),
            headers: vec![
                (API_KEY_HEADER, credentials.api_key.trim().to_string()),
                (API_HOST_HEADER, credentials.api_host.trim().to_string()),
            ],
            query: filters.to_query(today),
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every request and answers with a canned result.
    struct StubTransport {
        requests: Mutex<Vec<HttpRequest>>,
        reply: fn() -> std::result::Result<HttpResponse, TransportError>,
    }

    impl StubTransport {
        fn new(reply: fn() -> std::result::Result<HttpResponse, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                reply,
            })
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(
            &self,
            request: HttpRequest,
        ) -> std::result::Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            (self.reply)()
        }
    }

    fn ok(body: &str) -> std::result::Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn three_jobs() -> std::result::Result<HttpResponse, TransportError> {
        ok(r#"[
            {"title": "SAP MM Consultant", "organization": "A"},
            {"title": "SAP SD Consultant", "organization": "B"},
            {"title": "SAP BTP Developer", "organization": "C"}
        ]"#)
    }

    fn credentials() -> Credentials {
        Credentials::new("test-key", "linkedin-job-search-api.p.rapidapi.com")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn germany() -> SearchFilters {
        SearchFilters::new(Some("Germany".to_string()), false, 7, 10, 0).unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_filters_and_headers() {
        let transport = StubTransport::new(three_jobs);
        let client = JobSearchClient::with_transport(transport.clone());

        let jobs = client
            .search_as_of(&germany(), &credentials(), today())
            .await
            .unwrap();
        assert_eq!(jobs.len(), 3);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);

        let request = &requests[0];
        assert_eq!(
            request.url,
            "https://linkedin-job-search-api.p.rapidapi.com/active-jb-7d"
        );
        assert_eq!(request.header("X-RapidAPI-Key"), Some("test-key"));
        assert_eq!(
            request.header("X-RapidAPI-Host"),
            Some("linkedin-job-search-api.p.rapidapi.com")
        );
        assert_eq!(request.timeout, DEFAULT_TIMEOUT);
        assert_eq!(
            SearchFilters::from_query(&request.query, today()).unwrap(),
            germany()
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_never_hit_network() {
        let transport = StubTransport::new(three_jobs);
        let client = JobSearchClient::with_transport(transport.clone());

        let result = client
            .search_as_of(&germany(), &Credentials::default(), today())
            .await;

        assert_eq!(result, Err(ApiError::CredentialsMissing));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_list_is_not_an_error() {
        let client = JobSearchClient::with_transport(StubTransport::new(|| ok("[]")));
        let jobs = client
            .search_as_of(&germany(), &credentials(), today())
            .await
            .unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let client = JobSearchClient::with_transport(StubTransport::new(|| {
            Ok(HttpResponse {
                status: 429,
                body: "Too many requests".to_string(),
            })
        }));

        let err = client
            .search_as_of(&germany(), &credentials(), today())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::status(429, "Too many requests"));
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_transport_failures_are_classified() {
        let timeout = JobSearchClient::with_transport(StubTransport::new(|| {
            Err(TransportError::Timeout)
        }));
        assert_eq!(
            timeout.search_as_of(&germany(), &credentials(), today()).await,
            Err(ApiError::Timeout)
        );

        let refused = JobSearchClient::with_transport(StubTransport::new(|| {
            Err(TransportError::Failed("connection refused".to_string()))
        }));
        assert_eq!(
            refused.search_as_of(&germany(), &credentials(), today()).await,
            Err(ApiError::Network("connection refused".to_string()))
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let client =
            JobSearchClient::with_transport(StubTransport::new(|| ok(r#"{"error": null}"#)));
        assert!(matches!(
            client.search_as_of(&germany(), &credentials(), today()).await,
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_custom_endpoint_and_timeout() {
        let transport = StubTransport::new(|| ok("[]"));
        let client = JobSearchClient::with_transport(transport.clone())
            .endpoint_path("active-jb-24h")
            .timeout(Duration::from_secs(5));

        client
            .search_as_of(&germany(), &credentials(), today())
            .await
            .unwrap();

        let requests = transport.requests();
        let request = &requests[0];
        assert_eq!(
            request.url,
            "https://linkedin-job-search-api.p.rapidapi.com/active-jb-24h"
        );
        assert_eq!(request.timeout, Duration::from_secs(5));
    }
}
