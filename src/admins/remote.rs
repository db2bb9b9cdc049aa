//! Admin repository backed by `/api/admin/admins`. The backend assigns ids,
//! hashes passwords and enforces email uniqueness.

use crate::{
    admins::{
        types::{AdminAccount, AdminUpdate, NewAdmin},
        AdminRepository,
    },
    api::{decode, unwrap_list, with_query, ApiClient, Auth, ClientError},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

pub const ADMINS_PATH: &str = "/api/admin/admins";

fn expose<S: Serializer>(secret: &&SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn expose_optional<S: Serializer>(
    secret: &Option<&SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAdminBody<'a> {
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    #[serde(serialize_with = "expose")]
    password: &'a SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAdminBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_optional"
    )]
    password: Option<&'a SecretString>,
}

#[derive(Debug, Clone)]
pub struct RemoteAdminRepository {
    api: ApiClient,
}

impl RemoteAdminRepository {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn fetch(&self, path: &str) -> Result<Vec<AdminAccount>, ClientError> {
        let value: Value = self.api.get_json(path, Auth::Required).await?;
        decode(unwrap_list(value, &["admins", "data"]))
    }
}

/// Single records may come back wrapped under `admin` or `data`.
fn unwrap_record(value: Value) -> Value {
    match value {
        Value::Object(mut object) => {
            for key in ["admin", "data"] {
                if let Some(inner @ Value::Object(_)) = object.remove(key) {
                    return inner;
                }
            }
            Value::Object(object)
        }
        other => other,
    }
}

#[async_trait]
impl AdminRepository for RemoteAdminRepository {
    async fn list(&self) -> Result<Vec<AdminAccount>, ClientError> {
        self.fetch(ADMINS_PATH).await
    }

    async fn search(&self, needle: &str) -> Result<Vec<AdminAccount>, ClientError> {
        self.fetch(&with_query(ADMINS_PATH, &[("search", needle)]))
            .await
    }

    async fn create(&self, admin: &NewAdmin) -> Result<AdminAccount, ClientError> {
        let body = CreateAdminBody {
            email: &admin.email,
            first_name: &admin.first_name,
            last_name: &admin.last_name,
            password: &admin.password,
        };
        let value = self.api.post_json(ADMINS_PATH, &body, Auth::Required).await?;
        decode(unwrap_record(value))
    }

    async fn update(
        &self,
        id: u64,
        update: &AdminUpdate,
    ) -> Result<Option<AdminAccount>, ClientError> {
        let body = UpdateAdminBody {
            email: update.email.as_deref().map(str::trim),
            first_name: update.first_name.as_deref().map(str::trim),
            last_name: update.last_name.as_deref().map(str::trim),
            password: update.password.as_ref(),
        };

        match self
            .api
            .put_json(&format!("{ADMINS_PATH}/{id}"), &body, Auth::Required)
            .await
        {
            Ok(value) => decode(unwrap_record(value)).map(Some),
            Err(err) if err.is_not_found() => {
                debug!(admin_id = id, "admin not found for update");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn delete(&self, id: u64) -> Result<(), ClientError> {
        match self
            .api
            .delete(&format!("{ADMINS_PATH}/{id}"), Auth::Required)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => {
                debug!(admin_id = id, "admin already absent");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        admins::AdminDirectory,
        api::ApiConfig,
        session::{MemoryTokenStore, TokenStore},
    };
    use serde_json::json;
    use std::{net::TcpListener, sync::Arc};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn directory_for(server: &MockServer) -> AdminDirectory<RemoteAdminRepository> {
        let store = Arc::new(MemoryTokenStore::new());
        store.set(SecretString::from("admin-token")).unwrap();
        let config = ApiConfig::new(&server.uri()).unwrap();
        AdminDirectory::new(RemoteAdminRepository::new(
            ApiClient::new(config, store).unwrap(),
        ))
    }

    #[test]
    fn unwrap_record_accepts_wrapped_and_bare() {
        assert_eq!(unwrap_record(json!({"admin": {"id": 1}})), json!({"id": 1}));
        assert_eq!(unwrap_record(json!({"id": 2})), json!({"id": 2}));
    }

    #[tokio::test]
    async fn create_posts_camel_case_body() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ADMINS_PATH))
            .and(header("Authorization", "Bearer admin-token"))
            .and(body_json(json!({
                "email": "new@example.com",
                "firstName": "New",
                "lastName": "Admin",
                "password": "pw"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "admin": {
                    "id": 7,
                    "email": "new@example.com",
                    "firstName": "New",
                    "lastName": "Admin"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = directory_for(&server)
            .create(NewAdmin {
                email: " new@example.com ".to_string(),
                first_name: "New".to_string(),
                last_name: "Admin".to_string(),
                password: SecretString::from("pw"),
                confirm_password: SecretString::from("pw"),
            })
            .await?;
        assert_eq!(created.id, 7);
        Ok(())
    }

    #[tokio::test]
    async fn mismatched_create_never_reaches_backend() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let err = directory_for(&server)
            .create(NewAdmin {
                email: "new@example.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                password: SecretString::from("one"),
                confirm_password: SecretString::from("two"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(server
            .received_requests()
            .await
            .unwrap_or_default()
            .is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn search_passes_query_to_backend() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ADMINS_PATH))
            .and(query_param("search", "ops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "admins": [{"id": 2, "email": "ops@example.com", "firstName": "O", "lastName": "P"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let found = directory_for(&server).search(" ops ").await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "ops@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn not_found_maps_to_none_and_noop() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/admin/admins/9"))
            .and(body_json(json!({"lastName": "Gone"})))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Admin not found"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/admin/admins/9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let directory = directory_for(&server);
        let updated = directory
            .update(
                9,
                AdminUpdate {
                    last_name: Some("Gone".to_string()),
                    ..AdminUpdate::default()
                },
            )
            .await?;
        assert!(updated.is_none());
        directory.delete(9).await?;
        Ok(())
    }

    #[tokio::test]
    async fn server_errors_propagate() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/admin/admins/3"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({"message": "Cannot delete yourself"})),
            )
            .mount(&server)
            .await;

        let err = directory_for(&server).delete(3).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot delete yourself");
        Ok(())
    }
}
