use crate::users::types::id_as_string;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Outcome recorded with an audit entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuditStatus {
    Success,
    Failure,
    Other(String),
}

impl AuditStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" | "succeeded" | "ok" => Self::Success,
            "failure" | "failed" | "fail" | "error" => Self::Failure,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Marker used in rendered lines.
    #[must_use]
    pub fn marker(&self) -> &str {
        match self {
            Self::Success => "OK",
            Self::Failure => "FAIL",
            Self::Other(raw) if raw.is_empty() => "-",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for AuditStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("SUCCESS"),
            Self::Failure => f.write_str("FAILURE"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for AuditStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AuditStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(raw)) => Self::parse(&raw),
            Some(Value::Bool(true)) => Self::Success,
            Some(Value::Bool(false)) => Self::Failure,
            Some(other) => Self::Other(other.to_string()),
            None => Self::default(),
        })
    }
}

/// One change-log record. Read-only; produced by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAuditLogEntry")]
pub struct AuditLogEntry {
    pub timestamp: Option<String>,
    pub actor_id: Option<String>,
    pub actor_email: Option<String>,
    pub action: String,
    pub status: AuditStatus,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub table: Option<String>,
    pub field: Option<String>,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// Wire shape. A row may carry several spellings of the same column, so each
/// spelling gets its own slot and the first present one wins.
#[derive(Deserialize)]
struct RawAuditLogEntry {
    #[serde(default)]
    changed_at: Option<String>,
    #[serde(default, rename = "changedAt")]
    changed_at_camel: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Option<String>,
    #[serde(default, deserialize_with = "id_as_string")]
    actor_id: Option<String>,
    #[serde(default, rename = "actorId", deserialize_with = "id_as_string")]
    actor_id_camel: Option<String>,
    #[serde(default, deserialize_with = "id_as_string")]
    user_id: Option<String>,
    #[serde(default, rename = "userId", deserialize_with = "id_as_string")]
    user_id_camel: Option<String>,
    #[serde(default)]
    actor_email: Option<String>,
    #[serde(default, rename = "actorEmail")]
    actor_email_camel: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    status: AuditStatus,
    #[serde(default)]
    ip_address: Option<String>,
    #[serde(default, rename = "ipAddress")]
    ip_address_camel: Option<String>,
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default, rename = "userAgent")]
    user_agent_camel: Option<String>,
    #[serde(default)]
    table: Option<String>,
    #[serde(default)]
    table_name: Option<String>,
    #[serde(default, rename = "tableName")]
    table_name_camel: Option<String>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    field_name: Option<String>,
    #[serde(default, rename = "fieldName")]
    field_name_camel: Option<String>,
    #[serde(default)]
    old_value: Option<Value>,
    #[serde(default, rename = "oldValue")]
    old_value_camel: Option<Value>,
    #[serde(default)]
    new_value: Option<Value>,
    #[serde(default, rename = "newValue")]
    new_value_camel: Option<Value>,
}

impl From<RawAuditLogEntry> for AuditLogEntry {
    fn from(raw: RawAuditLogEntry) -> Self {
        Self {
            timestamp: raw
                .changed_at
                .or(raw.changed_at_camel)
                .or(raw.timestamp)
                .or(raw.created_at)
                .or(raw.created_at_camel),
            actor_id: raw
                .actor_id
                .or(raw.actor_id_camel)
                .or(raw.user_id)
                .or(raw.user_id_camel),
            actor_email: raw.actor_email.or(raw.actor_email_camel).or(raw.email),
            action: raw.action.unwrap_or_default(),
            status: raw.status,
            ip_address: raw.ip_address.or(raw.ip_address_camel),
            user_agent: raw.user_agent.or(raw.user_agent_camel),
            table: raw.table.or(raw.table_name).or(raw.table_name_camel),
            field: raw.field.or(raw.field_name).or(raw.field_name_camel),
            old_value: raw.old_value.or(raw.old_value_camel),
            new_value: raw.new_value.or(raw.new_value_camel),
        }
    }
}

impl AuditLogEntry {
    /// Timestamp as UTC. Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (taken as UTC)
    /// and bare dates.
    #[must_use]
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(parsed.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|parsed| parsed.and_utc())
    }

    /// Single-line rendering. Success and failure carry distinct markers.
    #[must_use]
    pub fn render_line(&self) -> String {
        let when = self.timestamp.as_deref().unwrap_or("-");
        let actor = self
            .actor_email
            .as_deref()
            .or(self.actor_id.as_deref())
            .unwrap_or("-");
        let mut line = format!(
            "{when} [{}] {} by {actor}",
            self.status.marker(),
            self.action
        );

        if let Some(ip) = &self.ip_address {
            line.push_str(&format!(" from {ip}"));
        }
        match (&self.table, &self.field) {
            (Some(table), Some(field)) => line.push_str(&format!(" {table}.{field}")),
            (Some(table), None) => line.push_str(&format!(" {table}")),
            _ => {}
        }
        if self.old_value.is_some() || self.new_value.is_some() {
            line.push_str(&format!(
                ": {} -> {}",
                render_value(self.old_value.as_ref()),
                render_value(self.new_value.as_ref())
            ));
        }
        line
    }
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Newest first; entries without a readable timestamp go last.
pub fn sort_newest_first(entries: &mut [AuditLogEntry]) {
    entries.sort_by(|a, b| b.occurred_at().cmp(&a.occurred_at()));
}
