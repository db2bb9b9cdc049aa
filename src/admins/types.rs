use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Admin account as seen by the client. Password material never lives here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawAdminAccount")]
pub struct AdminAccount {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAdminAccount {
    id: u64,
    email: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default, rename = "first_name")]
    first_name_snake: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default, rename = "last_name")]
    last_name_snake: Option<String>,
}

impl From<RawAdminAccount> for AdminAccount {
    fn from(raw: RawAdminAccount) -> Self {
        Self {
            id: raw.id,
            email: raw.email,
            first_name: raw.first_name.or(raw.first_name_snake).unwrap_or_default(),
            last_name: raw.last_name.or(raw.last_name_snake).unwrap_or_default(),
        }
    }
}

impl AdminAccount {
    /// Case-insensitive substring match over email, first name and last name.
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        [&self.email, &self.first_name, &self.last_name]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    pub(crate) fn apply(&mut self, update: &AdminUpdate) {
        if let Some(email) = &update.email {
            email.trim().clone_into(&mut self.email);
        }
        if let Some(first_name) = &update.first_name {
            first_name.trim().clone_into(&mut self.first_name);
        }
        if let Some(last_name) = &update.last_name {
            last_name.trim().clone_into(&mut self.last_name);
        }
    }
}

/// Input for creating an admin. The password pair is compared before anything
/// is stored.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// Partial update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AdminUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<SecretString>,
    pub confirm_password: Option<SecretString>,
}

impl AdminUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.password.is_none()
    }
}
