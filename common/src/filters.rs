//! Search filters and their query-string form.
//!
//! Filters map one-to-one onto the query parameters of the job search API.
//! The posting window is sent as an absolute `date_filter` date, so encoding
//! and decoding both take the reference date the window is counted back from.

use chrono::{Days, NaiveDate};
use thiserror::Error;

/// Keyword every search is restricted to.
pub const DEFAULT_KEYWORD: &str = "SAP";

/// Page sizes offered by the front-end.
pub const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 25;

pub const MIN_DAYS_POSTED: u32 = 1;
pub const MAX_DAYS_POSTED: u32 = 30;
pub const DEFAULT_DAYS_POSTED: u32 = 7;

/// Dropdown entry meaning "no location filter".
pub const ALL_LOCATIONS: &str = "All Locations";

/// Locations offered in the dropdown, in display order.
pub const LOCATIONS: [&str; 15] = [
    ALL_LOCATIONS,
    "India",
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Hyderabad",
    "Chennai",
    "Pune",
    "Kolkata",
    "Ahmedabad",
    "Gurugram",
    "Noida",
    "Chandigarh",
    "Jaipur",
    "Remote",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

mod param {
    pub const KEYWORD: &str = "title_filter";
    pub const LIMIT: &str = "limit";
    pub const OFFSET: &str = "offset";
    pub const DESCRIPTION_TYPE: &str = "description_type";
    pub const LOCATION: &str = "location_filter";
    pub const REMOTE: &str = "remote";
    pub const DATE: &str = "date_filter";
}

const DESCRIPTION_TYPE_TEXT: &str = "text";

/// Rejected filter values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("keyword must not be empty")]
    EmptyKeyword,

    #[error("days posted must be between 1 and 30, got {0}")]
    DaysOutOfRange(u32),

    #[error("unsupported page size {0}")]
    PageSize(u32),

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("{field} is not a number: {value}")]
    NotANumber { field: &'static str, value: String },
}

/// Query strings that do not describe a valid set of filters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("missing query parameter `{0}`")]
    Missing(&'static str),

    #[error("invalid value `{value}` for query parameter `{name}`")]
    Invalid { name: String, value: String },

    #[error("unknown query parameter `{0}`")]
    Unknown(String),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Snapshot of the user's search constraints for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilters {
    keyword: String,
    location: Option<String>,
    remote_only: bool,
    days_posted: u32,
    page_size: u32,
    page_offset: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD.to_string(),
            location: None,
            remote_only: false,
            days_posted: DEFAULT_DAYS_POSTED,
            page_size: DEFAULT_PAGE_SIZE,
            page_offset: 0,
        }
    }
}

impl SearchFilters {
    /// Builds a validated filter set for the default keyword.
    ///
    /// A blank location or the "All Locations" entry means no location filter.
    pub fn new(
        location: Option<String>,
        remote_only: bool,
        days_posted: u32,
        page_size: u32,
        page_offset: u32,
    ) -> Result<Self, FilterError> {
        Self::with_keyword(
            DEFAULT_KEYWORD,
            location,
            remote_only,
            days_posted,
            page_size,
            page_offset,
        )
    }

    fn with_keyword(
        keyword: &str,
        location: Option<String>,
        remote_only: bool,
        days_posted: u32,
        page_size: u32,
        page_offset: u32,
    ) -> Result<Self, FilterError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(FilterError::EmptyKeyword);
        }
        if !(MIN_DAYS_POSTED..=MAX_DAYS_POSTED).contains(&days_posted) {
            return Err(FilterError::DaysOutOfRange(days_posted));
        }
        if !PAGE_SIZES.contains(&page_size) {
            return Err(FilterError::PageSize(page_size));
        }

        Ok(Self {
            keyword: keyword.to_string(),
            location: normalize_location(location),
            remote_only,
            days_posted,
            page_size,
            page_offset,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn remote_only(&self) -> bool {
        self.remote_only
    }

    pub fn days_posted(&self) -> u32 {
        self.days_posted
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_offset(&self) -> u32 {
        self.page_offset
    }

    /// Same filters, pointed at another slice of the result set.
    pub fn at_offset(&self, page_offset: u32) -> Self {
        Self {
            page_offset,
            ..self.clone()
        }
    }

    /// Earliest posting date included by the window, counted back from `today`.
    pub fn posted_after(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.days_posted)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Encodes the filters as query parameters, in a fixed order.
    pub fn to_query(&self, today: NaiveDate) -> Vec<(&'static str, String)> {
        let mut params = vec![
            (param::KEYWORD, self.keyword.clone()),
            (param::LIMIT, self.page_size.to_string()),
            (param::OFFSET, self.page_offset.to_string()),
            (param::DESCRIPTION_TYPE, DESCRIPTION_TYPE_TEXT.to_string()),
            (
                param::DATE,
                self.posted_after(today).format(DATE_FORMAT).to_string(),
            ),
        ];

        if let Some(location) = &self.location {
            params.push((param::LOCATION, location.clone()));
        }
        if self.remote_only {
            params.push((param::REMOTE, "true".to_string()));
        }

        params
    }

    /// Rebuilds filters from query parameters produced by [`SearchFilters::to_query`].
    pub fn from_query<K, V>(pairs: &[(K, V)], today: NaiveDate) -> Result<Self, QueryError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut keyword = None;
        let mut limit = None;
        let mut offset = None;
        let mut date = None;
        let mut location = None;
        let mut remote_only = false;

        for (name, value) in pairs {
            let (name, value) = (name.as_ref(), value.as_ref());
            match name {
                param::KEYWORD => keyword = Some(value),
                param::LIMIT => limit = Some(parse_number(name, value)?),
                param::OFFSET => offset = Some(parse_number(name, value)?),
                param::DESCRIPTION_TYPE if value == DESCRIPTION_TYPE_TEXT => {}
                param::DATE => date = Some(parse_date(name, value)?),
                param::LOCATION => location = Some(value.to_string()),
                param::REMOTE if value == "true" => remote_only = true,
                param::DESCRIPTION_TYPE | param::REMOTE => return Err(invalid(name, value)),
                other => return Err(QueryError::Unknown(other.to_string())),
            }
        }

        let keyword = keyword.ok_or(QueryError::Missing(param::KEYWORD))?;
        let page_size = limit.ok_or(QueryError::Missing(param::LIMIT))?;
        let page_offset = offset.ok_or(QueryError::Missing(param::OFFSET))?;
        let posted_after = date.ok_or(QueryError::Missing(param::DATE))?;

        let days = (today - posted_after).num_days();
        let days_posted = u32::try_from(days)
            .map_err(|_| invalid(param::DATE, &posted_after.format(DATE_FORMAT).to_string()))?;

        Ok(Self::with_keyword(
            keyword,
            location,
            remote_only,
            days_posted,
            page_size,
            page_offset,
        )?)
    }
}

fn normalize_location(location: Option<String>) -> Option<String> {
    location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty() && l != ALL_LOCATIONS)
}

fn parse_number(name: &str, value: &str) -> Result<u32, QueryError> {
    value.parse().map_err(|_| invalid(name, value))
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid(name, value))
}

fn invalid(name: &str, value: &str) -> QueryError {
    QueryError::Invalid {
        name: name.to_string(),
        value: value.to_string(),
    }
}
