use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Accepts ids sent either as JSON numbers or strings.
///
/// # Errors
/// Fails when the value is neither a number, a string nor null.
pub fn id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(id)) => Some(id.to_string()),
        Some(RawId::Text(id)) if !id.trim().is_empty() => Some(id),
        _ => None,
    })
}

fn required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    id_as_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing id"))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUserSummary")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub is_verified: Option<bool>,
    pub created_at: Option<String>,
}

// Each spelling has its own slot; snake_case wins.
#[derive(Deserialize)]
struct RawUserSummary {
    #[serde(deserialize_with = "required_id")]
    id: String,
    email: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default, rename = "firstName")]
    first_name_camel: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default, rename = "lastName")]
    last_name_camel: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    is_verified: Option<bool>,
    #[serde(default, rename = "isVerified")]
    is_verified_camel: Option<bool>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Option<String>,
}

impl From<RawUserSummary> for UserSummary {
    fn from(raw: RawUserSummary) -> Self {
        Self {
            id: raw.id,
            email: raw.email,
            first_name: raw.first_name.or(raw.first_name_camel),
            last_name: raw.last_name.or(raw.last_name_camel),
            role: raw.role,
            is_verified: raw.is_verified.or(raw.is_verified_camel),
            created_at: raw.created_at.or(raw.created_at_camel),
        }
    }
}

/// One page of the user listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserPage {
    pub users: Vec<UserSummary>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl UserPage {
    /// Normalizes the listing body. The backend may answer with a bare array or an
    /// object carrying `users` (or `data`) plus `total`.
    ///
    /// # Errors
    /// Returns the serde error when user records do not decode.
    pub fn from_value(value: Value, page: u32, limit: u32) -> Result<Self, serde_json::Error> {
        let (users, total) = match value {
            Value::Array(items) => (items, None),
            Value::Object(mut object) => {
                let users = ["users", "data"]
                    .iter()
                    .find_map(|key| match object.remove(*key) {
                        Some(Value::Array(items)) => Some(items),
                        _ => None,
                    })
                    .unwrap_or_default();
                let total = ["total", "totalCount", "count"]
                    .iter()
                    .find_map(|key| object.get(*key).and_then(Value::as_u64));
                (users, total)
            }
            _ => (Vec::new(), None),
        };

        let users: Vec<UserSummary> = serde_json::from_value(Value::Array(users))?;
        let total = total.unwrap_or(users.len() as u64);
        Ok(Self {
            users,
            total,
            page,
            limit,
        })
    }
}

/// Partial change applied by an admin to a user record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

impl UserUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawScan")]
pub struct Scan {
    pub id: String,
    pub user_id: Option<String>,
    pub created_at: Option<String>,
    pub result: Option<Value>,
    /// Fields the client does not model, kept for display.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawScan {
    #[serde(deserialize_with = "required_id")]
    id: String,
    #[serde(default, deserialize_with = "id_as_string")]
    user_id: Option<String>,
    #[serde(default, rename = "userId", deserialize_with = "id_as_string")]
    user_id_camel: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Option<String>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawScan> for Scan {
    fn from(raw: RawScan) -> Self {
        Self {
            id: raw.id,
            user_id: raw.user_id.or(raw.user_id_camel),
            created_at: raw.created_at.or(raw.created_at_camel),
            result: raw.result,
            extra: raw.extra,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawUserActivity")]
pub struct UserActivity {
    pub id: Option<String>,
    pub action: String,
    pub created_at: Option<String>,
    pub ip_address: Option<String>,
    pub details: Option<Value>,
}

#[derive(Deserialize)]
struct RawUserActivity {
    #[serde(default, deserialize_with = "id_as_string")]
    id: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    ip_address: Option<String>,
    #[serde(default, rename = "ipAddress")]
    ip_address_camel: Option<String>,
    #[serde(default)]
    details: Option<Value>,
}

impl From<RawUserActivity> for UserActivity {
    fn from(raw: RawUserActivity) -> Self {
        Self {
            id: raw.id,
            action: raw.action.unwrap_or_default(),
            created_at: raw.created_at.or(raw.created_at_camel).or(raw.timestamp),
            ip_address: raw.ip_address.or(raw.ip_address_camel),
            details: raw.details,
        }
    }
}
