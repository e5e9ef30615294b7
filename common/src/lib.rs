//! Shared types for the SAP job finder: search filters, job records and
//! API credentials.

pub mod credentials;
pub mod filters;
pub mod job;

pub use credentials::Credentials;
pub use filters::{FilterError, QueryError, SearchFilters};
pub use job::JobRecord;
