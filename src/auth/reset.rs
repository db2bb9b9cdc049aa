//! Forgotten-password flow: request a reset code by email, then submit the code
//! with the new password. Passwords are compared locally only to catch typos;
//! the backend hashes and stores them.

use crate::{
    api::{ApiClient, ClientError},
    auth::{client, flow::valid_email, pending::PendingFlag},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

#[derive(Debug)]
pub struct PasswordReset {
    api: ApiClient,
    pending: PendingFlag,
}

impl PasswordReset {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            pending: PendingFlag::new(),
        }
    }

    /// Asks the backend to email a reset code.
    ///
    /// # Errors
    /// `Validation` for a malformed email, `Busy` while a submission is pending,
    /// otherwise the backend error.
    #[instrument(skip_all)]
    pub async fn request_code(&self, email: &str) -> Result<(), ClientError> {
        let email = email.trim();
        if !valid_email(email) {
            return Err(ClientError::validation("Enter a valid email address."));
        }

        let _pending = self.pending.begin()?;
        client::forgot_password(&self.api, email).await?;
        info!("password reset code requested");
        Ok(())
    }

    /// Submits the reset code together with the new password.
    ///
    /// # Errors
    /// `Validation` when input is missing or the passwords differ (no request is
    /// sent), `Busy` while a submission is pending, otherwise the backend error.
    #[instrument(skip_all)]
    pub async fn reset(
        &self,
        email: &str,
        code: &SecretString,
        new_password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<(), ClientError> {
        let email = email.trim();
        if !valid_email(email) {
            return Err(ClientError::validation("Enter a valid email address."));
        }
        if code.expose_secret().trim().is_empty() {
            return Err(ClientError::validation("Reset code is required."));
        }
        if new_password.expose_secret().is_empty() {
            return Err(ClientError::validation("New password is required."));
        }
        if new_password.expose_secret() != confirm_password.expose_secret() {
            return Err(ClientError::validation("Passwords do not match."));
        }

        let _pending = self.pending.begin()?;
        client::reset_password(&self.api, email, code, new_password).await?;
        info!("password reset completed");
        Ok(())
    }
}
