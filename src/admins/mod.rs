//! Admin directory: CRUD and search over admin accounts.
//!
//! `AdminDirectory` owns input validation and delegates storage to an injected
//! `AdminRepository`. `memory` keeps accounts for the life of the process and
//! `remote` goes through the admin backend.

pub mod memory;
pub mod remote;
pub mod types;

pub use self::memory::InMemoryAdminRepository;
pub use self::remote::RemoteAdminRepository;
pub use self::types::{AdminAccount, AdminUpdate, NewAdmin};

use crate::{api::ClientError, auth::flow::valid_email};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use tracing::{info, instrument};

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<AdminAccount>, ClientError>;

    /// `needle` is trimmed and non-empty.
    async fn search(&self, needle: &str) -> Result<Vec<AdminAccount>, ClientError>;

    /// Stores a validated account and returns it with its assigned id.
    async fn create(&self, admin: &NewAdmin) -> Result<AdminAccount, ClientError>;

    /// Returns `None` when no account has `id`.
    async fn update(
        &self,
        id: u64,
        update: &AdminUpdate,
    ) -> Result<Option<AdminAccount>, ClientError>;

    /// Removing an unknown id is not an error.
    async fn delete(&self, id: u64) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct AdminDirectory<R> {
    repository: R,
}

impl<R: AdminRepository> AdminDirectory<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// # Errors
    /// Propagates repository errors.
    pub async fn list(&self) -> Result<Vec<AdminAccount>, ClientError> {
        self.repository.list().await
    }

    /// Creates an account after checking the password pair and the email.
    ///
    /// # Errors
    /// `Validation` when input is rejected; the repository is not touched.
    #[instrument(skip_all)]
    pub async fn create(&self, admin: NewAdmin) -> Result<AdminAccount, ClientError> {
        let email = admin.email.trim();
        if !valid_email(email) {
            return Err(ClientError::validation("Enter a valid email address."));
        }
        if admin.password.expose_secret().is_empty() {
            return Err(ClientError::validation("Password is required."));
        }
        if admin.password.expose_secret() != admin.confirm_password.expose_secret() {
            return Err(ClientError::validation("Passwords do not match."));
        }

        let admin = NewAdmin {
            email: email.to_string(),
            first_name: admin.first_name.trim().to_string(),
            last_name: admin.last_name.trim().to_string(),
            ..admin
        };
        let created = self.repository.create(&admin).await?;
        info!(admin_id = created.id, "admin created");
        Ok(created)
    }

    /// Merges the set fields of `update` into the account with `id`.
    ///
    /// # Errors
    /// `Validation` for a malformed email, an empty update or a password change
    /// whose confirmation differs.
    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: u64,
        update: AdminUpdate,
    ) -> Result<Option<AdminAccount>, ClientError> {
        if update.is_empty() {
            return Err(ClientError::validation("Nothing to update."));
        }
        if let Some(email) = &update.email {
            if !valid_email(email.trim()) {
                return Err(ClientError::validation("Enter a valid email address."));
            }
        }
        if let Some(password) = &update.password {
            let confirm = update
                .confirm_password
                .as_ref()
                .map(|confirm| confirm.expose_secret());
            if password.expose_secret().is_empty() {
                return Err(ClientError::validation("Password is required."));
            }
            if confirm != Some(password.expose_secret()) {
                return Err(ClientError::validation("Passwords do not match."));
            }
        }

        let updated = self.repository.update(id, &update).await?;
        if updated.is_some() {
            info!("admin updated");
        }
        Ok(updated)
    }

    /// # Errors
    /// Propagates repository errors.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), ClientError> {
        self.repository.delete(id).await?;
        info!("admin deleted");
        Ok(())
    }

    /// Case-insensitive substring search over email and names. An empty query
    /// returns every account.
    ///
    /// # Errors
    /// Propagates repository errors.
    pub async fn search(&self, query: &str) -> Result<Vec<AdminAccount>, ClientError> {
        let needle = query.trim();
        if needle.is_empty() {
            return self.repository.list().await;
        }
        self.repository.search(needle).await
    }
}
