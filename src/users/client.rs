//! Client helpers for the user moderation endpoints. Paths stay centralized here
//! and the backend enforces authorization.

use crate::{
    api::{decode, unwrap_list, with_query, ApiClient, Auth, ClientError},
    users::types::{Scan, UserActivity, UserPage, UserUpdate},
};
use serde_json::Value;
use tracing::instrument;

pub const USERS_PATH: &str = "/api/admin/users";
pub const SCANS_PATH: &str = "/api/admin/scans";

#[derive(Debug, Clone)]
pub struct UsersClient {
    api: ApiClient,
}

impl UsersClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches one page of users, optionally filtered by `search`.
    ///
    /// # Errors
    /// `Validation` when `page` or `limit` is zero, otherwise gateway errors.
    #[instrument(skip(self, search))]
    pub async fn list(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<UserPage, ClientError> {
        if page == 0 {
            return Err(ClientError::validation("Page must be at least 1."));
        }
        if limit == 0 {
            return Err(ClientError::validation("Limit must be at least 1."));
        }

        let page_param = page.to_string();
        let limit_param = limit.to_string();
        let path = with_query(
            USERS_PATH,
            &[
                ("page", page_param.as_str()),
                ("limit", limit_param.as_str()),
                ("search", search.unwrap_or_default().trim()),
            ],
        );

        let value: Value = self.api.get_json(&path, Auth::Required).await?;
        UserPage::from_value(value, page, limit)
            .map_err(|err| ClientError::Parse(format!("Failed to decode users: {err}")))
    }

    /// # Errors
    /// `Validation` for an empty id or an update with no fields.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<Value, ClientError> {
        let id = required_id(id, "User id is required.")?;
        if update.is_empty() {
            return Err(ClientError::validation("Nothing to update."));
        }
        self.api
            .put_json(&format!("{USERS_PATH}/{id}"), update, Auth::Required)
            .await
    }

    /// # Errors
    /// `Validation` for an empty id, otherwise gateway errors.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let id = required_id(id, "User id is required.")?;
        self.api
            .delete(&format!("{USERS_PATH}/{id}"), Auth::Required)
            .await?;
        Ok(())
    }

    /// # Errors
    /// `Validation` for an empty id, otherwise gateway errors.
    #[instrument(skip(self))]
    pub async fn scans(&self, user_id: &str) -> Result<Vec<Scan>, ClientError> {
        let user_id = required_id(user_id, "User id is required.")?;
        let path = format!("{USERS_PATH}/{user_id}/scans");
        let value: Value = self.api.get_json(&path, Auth::Required).await?;
        decode(unwrap_list(value, &["scans", "data"]))
    }

    /// # Errors
    /// `Validation` for an empty id, otherwise gateway errors.
    #[instrument(skip(self))]
    pub async fn delete_scan(&self, scan_id: &str) -> Result<(), ClientError> {
        let scan_id = required_id(scan_id, "Scan id is required.")?;
        self.api
            .delete(&format!("{SCANS_PATH}/{scan_id}"), Auth::Required)
            .await?;
        Ok(())
    }

    /// # Errors
    /// `Validation` for an empty id, otherwise gateway errors.
    #[instrument(skip(self))]
    pub async fn activity(&self, user_id: &str) -> Result<Vec<UserActivity>, ClientError> {
        let user_id = required_id(user_id, "User id is required.")?;
        let path = format!("{USERS_PATH}/{user_id}/logs");
        let value: Value = self.api.get_json(&path, Auth::Required).await?;
        decode(unwrap_list(value, &["logs", "data"]))
    }
}

fn required_id<'a>(id: &'a str, message: &str) -> Result<&'a str, ClientError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ClientError::validation(message));
    }
    Ok(trimmed)
}
