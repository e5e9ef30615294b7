//! Projection of raw API payloads onto [`JobRecord`].

use crate::error::{ApiError, Result};
use common::JobRecord;
use serde_json::{Map, Value};
use tracing::warn;

const NOT_AVAILABLE: &str = "N/A";

/// Parses a response body into job records.
///
/// The API answers with either a bare array of jobs or an object wrapping
/// them in a `jobs` field. Entries that are not objects are skipped.
pub fn parse_jobs(body: &str) -> Result<Vec<JobRecord>> {
    let data: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let entries = match data {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("jobs") {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(ApiError::MalformedResponse(
                    "`jobs` field is not a list".to_string(),
                ));
            }
            None => {
                return Err(ApiError::MalformedResponse(
                    "response has no job list".to_string(),
                ));
            }
        },
        other => {
            return Err(ApiError::MalformedResponse(format!(
                "expected a job list, got {}",
                type_name(&other)
            )));
        }
    };

    let mut jobs = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match entry.as_object() {
            Some(job) => jobs.push(project(job)),
            None => warn!("Skipping job entry {} ({})", index, type_name(entry)),
        }
    }

    Ok(jobs)
}

fn project(job: &Map<String, Value>) -> JobRecord {
    JobRecord {
        title: text(job, &["title"]).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        company: text(job, &["organization", "company"])
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        location: location(job),
        posted_date: text(job, &["date_posted", "posted_at"])
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        description_text: text(job, &["description_text", "description"])
            .unwrap_or_else(|| "No description available".to_string()),
        apply_url: text(job, &["url", "apply_url"])
            .unwrap_or_else(|| JobRecord::NO_APPLY_URL.to_string()),
        remote: ["remote_derived", "remote"]
            .iter()
            .find_map(|key| job.get(*key).and_then(Value::as_bool))
            .unwrap_or(false),
        employment_type: joined(job.get("employment_type"), usize::MAX)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        salary: job
            .get("salary_raw")
            .and_then(|value| match value {
                Value::Null => None,
                Value::String(s) if s.trim().is_empty() => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| "Not specified".to_string()),
        industry: text(job, &["linkedin_org_industry"])
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

/// First two derived locations, falling back to the raw location string.
fn location(job: &Map<String, Value>) -> String {
    joined(job.get("locations_derived"), 2)
        .or_else(|| text(job, &["location"]))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// First non-empty string found under any of `keys`.
fn text(job: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        job.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn joined(value: Option<&Value>, limit: usize) -> Option<String> {
    let items: Vec<&str> = value?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .take(limit)
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items.join(", "))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
