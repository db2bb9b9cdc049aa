//! Request and response payloads for auth endpoints. Passwords, codes and
//! credentials travel in these types, so none of them derive `Debug` output that
//! would expose a secret.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

// Field types are `&SecretString`, hence the double reference.
fn expose<S: Serializer>(secret: &&SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    #[serde(serialize_with = "expose")]
    pub password: &'a SecretString,
}

#[derive(Debug, Serialize)]
pub struct VerifyLoginRequest<'a> {
    pub email: &'a str,
    #[serde(serialize_with = "expose")]
    pub otp: &'a SecretString,
}

/// Credential returned once the OTP is accepted. Each spelling has its own slot
/// so a body carrying more than one still decodes.
#[derive(Deserialize)]
pub struct VerifyLoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "accessToken")]
    access_token_camel: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

impl VerifyLoginResponse {
    /// First non-blank of `token`, `accessToken`, `access_token`.
    #[must_use]
    pub fn into_credential(self) -> Option<String> {
        [self.token, self.access_token_camel, self.access_token]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    #[serde(serialize_with = "expose")]
    pub code: &'a SecretString,
    #[serde(serialize_with = "expose")]
    pub new_password: &'a SecretString,
}

/// Profile of the signed-in operator, as returned by `/api/user/profile`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUserProfile")]
pub struct UserProfile {
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

// Each name spelling has its own slot; snake_case wins.
#[derive(Deserialize)]
struct RawUserProfile {
    #[serde(default, deserialize_with = "crate::users::types::id_as_string")]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
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
}

impl From<RawUserProfile> for UserProfile {
    fn from(raw: RawUserProfile) -> Self {
        Self {
            id: raw.id,
            email: raw.email,
            first_name: raw.first_name.or(raw.first_name_camel),
            last_name: raw.last_name.or(raw.last_name_camel),
            role: raw.role,
        }
    }
}

impl UserProfile {
    /// Name for display, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full.is_empty() {
            self.email.clone().unwrap_or_else(|| "unknown".to_string())
        } else {
            full
        }
    }
}
