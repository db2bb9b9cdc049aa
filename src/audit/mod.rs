//! Audit trail query: change-log records for an inclusive date range, newest
//! first.

pub mod types;

pub use self::types::{AuditLogEntry, AuditStatus};

use crate::api::{decode, unwrap_list, with_query, ApiClient, Auth, ClientError};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{instrument, warn};

pub const AUDIT_TRAIL_PATH: &str = "/api/admin/audit-trail";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of [`AuditTrailQuery::load`]: entries, or an empty list and the error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuditTrailView {
    pub entries: Vec<AuditLogEntry>,
    pub error: Option<ClientError>,
}

#[derive(Debug, Clone)]
pub struct AuditTrailQuery {
    api: ApiClient,
}

impl AuditTrailQuery {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches entries between `start_date` and `end_date` (inclusive,
    /// `YYYY-MM-DD`). `search` is passed through for the backend to apply.
    ///
    /// # Errors
    /// `Validation` for a missing, malformed or inverted range (no request is
    /// sent), otherwise gateway errors.
    #[instrument(skip(self, search))]
    pub async fn fetch(
        &self,
        start_date: &str,
        end_date: &str,
        search: Option<&str>,
    ) -> Result<Vec<AuditLogEntry>, ClientError> {
        let start = parse_bound(start_date, "Start date")?;
        let end = parse_bound(end_date, "End date")?;
        if start > end {
            return Err(ClientError::validation(
                "Start date must not be after end date.",
            ));
        }

        let start = start.format(DATE_FORMAT).to_string();
        let end = end.format(DATE_FORMAT).to_string();
        let path = with_query(
            AUDIT_TRAIL_PATH,
            &[
                ("startDate", start.as_str()),
                ("endDate", end.as_str()),
                ("search", search.unwrap_or_default().trim()),
            ],
        );

        let value: Value = self.api.get_json(&path, Auth::Required).await?;
        let mut entries: Vec<AuditLogEntry> =
            decode(unwrap_list(value, &["logs", "data", "auditTrail"]))?;
        types::sort_newest_first(&mut entries);
        Ok(entries)
    }

    /// Same as [`AuditTrailQuery::fetch`] but never fails: errors come back in
    /// the view next to an empty list.
    pub async fn load(
        &self,
        start_date: &str,
        end_date: &str,
        search: Option<&str>,
    ) -> AuditTrailView {
        match self.fetch(start_date, end_date, search).await {
            Ok(entries) => AuditTrailView {
                entries,
                error: None,
            },
            Err(err) => {
                warn!("audit trail load failed: {err}");
                AuditTrailView {
                    entries: Vec::new(),
                    error: Some(err),
                }
            }
        }
    }
}

fn parse_bound(raw: &str, label: &str) -> Result<NaiveDate, ClientError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClientError::validation(format!("{label} is required.")));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ClientError::validation(format!("{label} must be YYYY-MM-DD.")))
}
