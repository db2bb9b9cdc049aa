//! Process-lifetime admin store. Passwords are kept only as Argon2id hashes.

use crate::{
    admins::{
        types::{AdminAccount, AdminUpdate, NewAdmin},
        AdminRepository,
    },
    api::ClientError,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::{sync::RwLock, task};
use tracing::debug;

#[derive(Debug)]
struct StoredAdmin {
    account: AdminAccount,
    password_hash: String,
}

#[derive(Debug, Default)]
pub struct InMemoryAdminRepository {
    admins: RwLock<Vec<StoredAdmin>>,
}

impl InMemoryAdminRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks `password` against the stored hash for `id`.
    #[cfg(test)]
    pub(crate) async fn verify_password(
        &self,
        id: u64,
        password: &SecretString,
    ) -> Result<bool, ClientError> {
        use argon2::password_hash::{PasswordHash, PasswordVerifier};

        let hash = {
            let admins = self.admins.read().await;
            match admins.iter().find(|admin| admin.account.id == id) {
                Some(admin) => admin.password_hash.clone(),
                None => return Ok(false),
            }
        };

        let password = password.clone();
        task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|err| ClientError::Storage(format!("Invalid password hash: {err}")))?;
            Ok::<bool, ClientError>(
                Argon2::default()
                    .verify_password(password.expose_secret().as_bytes(), &parsed)
                    .is_ok(),
            )
        })
        .await
        .map_err(|err| ClientError::Storage(format!("Password verification task failed: {err}")))?
    }
}

/// Hashing runs on the blocking pool.
async fn hash_password(password: &SecretString) -> Result<String, ClientError> {
    let password = password.clone();
    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| ClientError::Storage(format!("Failed to hash password: {err}")))
    })
    .await
    .map_err(|err| ClientError::Storage(format!("Password hashing task failed: {err}")))?
}

#[async_trait]
impl AdminRepository for InMemoryAdminRepository {
    async fn list(&self) -> Result<Vec<AdminAccount>, ClientError> {
        let admins = self.admins.read().await;
        Ok(admins.iter().map(|admin| admin.account.clone()).collect())
    }

    async fn search(&self, needle: &str) -> Result<Vec<AdminAccount>, ClientError> {
        let needle = needle.to_lowercase();
        let admins = self.admins.read().await;
        Ok(admins
            .iter()
            .filter(|admin| admin.account.matches(&needle))
            .map(|admin| admin.account.clone())
            .collect())
    }

    async fn create(&self, admin: &NewAdmin) -> Result<AdminAccount, ClientError> {
        let password_hash = hash_password(&admin.password).await?;

        let mut admins = self.admins.write().await;
        let id = admins
            .iter()
            .map(|stored| stored.account.id)
            .max()
            .unwrap_or(0)
            + 1;
        let account = AdminAccount {
            id,
            email: admin.email.clone(),
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
        };
        admins.push(StoredAdmin {
            account: account.clone(),
            password_hash,
        });
        debug!(admin_id = id, "admin stored");
        Ok(account)
    }

    async fn update(
        &self,
        id: u64,
        update: &AdminUpdate,
    ) -> Result<Option<AdminAccount>, ClientError> {
        let password_hash = match &update.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let mut admins = self.admins.write().await;
        let Some(stored) = admins.iter_mut().find(|admin| admin.account.id == id) else {
            return Ok(None);
        };
        stored.account.apply(update);
        if let Some(hash) = password_hash {
            stored.password_hash = hash;
        }
        Ok(Some(stored.account.clone()))
    }

    async fn delete(&self, id: u64) -> Result<(), ClientError> {
        self.admins.write().await.retain(|admin| admin.account.id != id);
        Ok(())
    }
}
