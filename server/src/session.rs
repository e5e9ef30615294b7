//! Per-browser search state.
//!
//! A session moves between three visible states: idle (nothing searched
//! yet), showing results (possibly none) and showing an error. The search
//! itself runs while the session lock is held, which serializes actions
//! coming from the same browser.

use client::{ApiError, JobSearchClient};
use common::{Credentials, FilterError, JobRecord, SearchFilters};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// What the last successful search produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Idle,
    Results(Vec<JobRecord>),
    NoResults,
}

#[derive(Debug)]
pub struct Session {
    filters: SearchFilters,
    page: u32,
    outcome: Outcome,
    error: Option<String>,
    expanded: HashSet<usize>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            filters: SearchFilters::default(),
            page: 0,
            outcome: Outcome::Idle,
            error: None,
            expanded: HashSet::new(),
        }
    }
}

impl Session {
    /// Filters currently selected in the form.
    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    /// Zero-based index of the page on display.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    /// Any page after the first can step back, even one that came back empty.
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// A full page suggests there may be more results.
    pub fn has_next(&self) -> bool {
        match &self.outcome {
            Outcome::Results(jobs) => jobs.len() == self.filters.page_size() as usize,
            _ => false,
        }
    }

    /// Starts a new search from the first page.
    pub async fn search(
        &mut self,
        client: &JobSearchClient,
        credentials: &Credentials,
        filters: SearchFilters,
    ) {
        self.filters = filters.at_offset(0);
        self.page = 0;
        self.expanded.clear();

        match client.search(&self.filters, credentials).await {
            Ok(jobs) => {
                info!("🔍 Search returned {} jobs", jobs.len());
                self.show(jobs);
            }
            Err(err) => {
                self.outcome = Outcome::Idle;
                self.fail(err);
            }
        }
    }

    /// Records filter input that could not be turned into a search.
    pub fn reject(&mut self, err: FilterError) {
        warn!("Rejected search filters: {}", err);
        self.error = Some(format!("Invalid filters: {}", err));
    }

    pub async fn next_page(&mut self, client: &JobSearchClient, credentials: &Credentials) {
        if !self.has_next() {
            debug!("No next page to load");
            return;
        }
        if let Some(page) = self.page.checked_add(1) {
            self.go_to(client, credentials, page).await;
        }
    }

    /// Going back from the first page does nothing.
    pub async fn previous_page(&mut self, client: &JobSearchClient, credentials: &Credentials) {
        if !self.has_previous() {
            debug!("Already on the first page");
            return;
        }
        self.go_to(client, credentials, self.page - 1).await;
    }

    /// Flips the "full description" flag of one card.
    pub fn toggle_description(&mut self, index: usize) {
        let shown = match &self.outcome {
            Outcome::Results(jobs) => jobs.len(),
            _ => 0,
        };
        if index >= shown {
            return;
        }
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
    }

    /// Loads another page; page and results stay as they were if it fails.
    async fn go_to(&mut self, client: &JobSearchClient, credentials: &Credentials, page: u32) {
        let Some(offset) = page.checked_mul(self.filters.page_size()) else {
            warn!("Page {} is out of range", page);
            return;
        };

        let filters = self.filters.at_offset(offset);
        match client.search(&filters, credentials).await {
            Ok(jobs) => {
                info!("📄 Page {} returned {} jobs", page + 1, jobs.len());
                self.filters = filters;
                self.page = page;
                self.expanded.clear();
                self.show(jobs);
            }
            Err(err) => self.fail(err),
        }
    }

    fn show(&mut self, jobs: Vec<JobRecord>) {
        self.error = None;
        self.outcome = if jobs.is_empty() {
            Outcome::NoResults
        } else {
            Outcome::Results(jobs)
        };
    }

    fn fail(&mut self, err: ApiError) {
        warn!("Job search failed: {}", err);
        self.error = Some(err.user_message());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use client::{HttpRequest, HttpResponse, Transport, TransportError};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays queued responses and keeps every request it saw.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        replies: Mutex<VecDeque<HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(replies: Vec<HttpResponse>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn offsets(&self) -> Vec<u32> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.query_param("offset").unwrap().parse().unwrap())
                .collect()
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| TransportError::Failed("no scripted reply".to_string()))
        }
    }

    pub(crate) fn jobs_reply(count: usize) -> HttpResponse {
        let jobs: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "title": format!("SAP Consultant {}", i + 1),
                    "organization": "Acme",
                    "locations_derived": ["Berlin, Germany"],
                    "date_posted": "2026-10-12",
                    "description_text": "S/4HANA rollout",
                    "url": format!("https://www.linkedin.com/jobs/view/{}", i + 1),
                })
            })
            .collect();

        HttpResponse {
            status: 200,
            body: serde_json::Value::Array(jobs).to_string(),
        }
    }

    pub(crate) fn status_reply(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            body: "Too many requests".to_string(),
        }
    }

    pub(crate) fn credentials() -> Credentials {
        Credentials::new("test-key", "linkedin-job-search-api.p.rapidapi.com")
    }

    fn filters(page_size: u32) -> SearchFilters {
        SearchFilters::new(Some("Germany".to_string()), false, 7, page_size, 0).unwrap()
    }

    fn client(transport: &Arc<ScriptedTransport>) -> JobSearchClient {
        JobSearchClient::with_transport(transport.clone())
    }

    #[tokio::test]
    async fn test_search_shows_results() {
        let transport = ScriptedTransport::new(vec![jobs_reply(3)]);
        let mut session = Session::default();

        session
            .search(&client(&transport), &credentials(), filters(10))
            .await;

        assert!(matches!(session.outcome(), Outcome::Results(jobs) if jobs.len() == 3));
        assert_eq!(session.page(), 0);
        assert_eq!(session.error(), None);
        assert!(!session.has_next());
        assert_eq!(transport.offsets(), vec![0]);
    }

    #[tokio::test]
    async fn test_empty_result_is_no_results() {
        let transport = ScriptedTransport::new(vec![jobs_reply(0)]);
        let mut session = Session::default();

        session
            .search(&client(&transport), &credentials(), filters(10))
            .await;

        assert_eq!(session.outcome(), &Outcome::NoResults);
        assert_eq!(session.error(), None);
    }

    #[tokio::test]
    async fn test_paging_uses_increasing_offsets() {
        let transport =
            ScriptedTransport::new(vec![jobs_reply(10), jobs_reply(10), jobs_reply(10)]);
        let client = client(&transport);
        let mut session = Session::default();

        session.search(&client, &credentials(), filters(10)).await;
        session.next_page(&client, &credentials()).await;
        assert_eq!(session.page(), 1);
        session.previous_page(&client, &credentials()).await;
        assert_eq!(session.page(), 0);

        assert_eq!(transport.offsets(), vec![0, 10, 0]);
    }

    #[tokio::test]
    async fn test_previous_on_first_page_is_noop() {
        let transport = ScriptedTransport::new(vec![jobs_reply(10)]);
        let client = client(&transport);
        let mut session = Session::default();

        session.search(&client, &credentials(), filters(10)).await;
        session.previous_page(&client, &credentials()).await;

        assert_eq!(session.page(), 0);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_next_requires_full_page() {
        let transport = ScriptedTransport::new(vec![jobs_reply(4)]);
        let client = client(&transport);
        let mut session = Session::default();

        session.search(&client, &credentials(), filters(10)).await;
        session.next_page(&client, &credentials()).await;

        assert_eq!(session.page(), 0);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_keeps_previous_page() {
        let transport = ScriptedTransport::new(vec![jobs_reply(10), status_reply(429)]);
        let client = client(&transport);
        let mut session = Session::default();

        session.search(&client, &credentials(), filters(10)).await;
        session.next_page(&client, &credentials()).await;

        assert_eq!(session.page(), 0);
        assert_eq!(
            session.error(),
            Some("Rate limit exceeded. Please wait a moment and try again.")
        );
        assert!(matches!(session.outcome(), Outcome::Results(jobs) if jobs.len() == 10));
        assert_eq!(session.filters().page_offset(), 0);
    }

    #[tokio::test]
    async fn test_new_search_resets_page() {
        let transport =
            ScriptedTransport::new(vec![jobs_reply(10), jobs_reply(10), jobs_reply(2)]);
        let client = client(&transport);
        let mut session = Session::default();

        session.search(&client, &credentials(), filters(10)).await;
        session.next_page(&client, &credentials()).await;
        session.search(&client, &credentials(), filters(10)).await;

        assert_eq!(session.page(), 0);
        assert_eq!(transport.offsets(), vec![0, 10, 0]);
    }

    #[tokio::test]
    async fn test_missing_credentials_surface_message() {
        let transport = ScriptedTransport::new(vec![]);
        let mut session = Session::default();

        session
            .search(&client(&transport), &Credentials::default(), filters(10))
            .await;

        assert_eq!(session.error(), Some("API credentials not configured"));
        assert_eq!(session.outcome(), &Outcome::Idle);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_description() {
        let transport = ScriptedTransport::new(vec![jobs_reply(2)]);
        let mut session = Session::default();
        session
            .search(&client(&transport), &credentials(), filters(10))
            .await;

        session.toggle_description(1);
        assert!(session.is_expanded(1));
        assert!(!session.is_expanded(0));

        session.toggle_description(1);
        assert!(!session.is_expanded(1));

        session.toggle_description(5);
        assert!(!session.is_expanded(5));
    }

    #[tokio::test]
    async fn test_previous_after_empty_page() {
        let transport =
            ScriptedTransport::new(vec![jobs_reply(10), jobs_reply(0), jobs_reply(10)]);
        let client = client(&transport);
        let mut session = Session::default();

        session.search(&client, &credentials(), filters(10)).await;
        session.next_page(&client, &credentials()).await;
        assert_eq!(session.page(), 1);
        assert_eq!(session.outcome(), &Outcome::NoResults);
        assert!(session.has_previous());
        assert!(!session.has_next());

        session.previous_page(&client, &credentials()).await;
        assert_eq!(session.page(), 0);
        assert!(matches!(session.outcome(), Outcome::Results(jobs) if jobs.len() == 10));
        assert_eq!(transport.offsets(), vec![0, 10, 0]);
    }

    #[test]
    fn test_reject_sets_error() {
        let mut session = Session::default();
        session.reject(FilterError::DaysOutOfRange(45));
        assert_eq!(
            session.error(),
            Some("Invalid filters: days posted must be between 1 and 30, got 45")
        );
    }
}
