//! Two-step login state machine: credentials first, then the one-time passcode.
//!
//! The flow never retries on its own; each submission is one network attempt.
//! A credential reaches the token store only after the OTP is accepted, and a
//! rejected OTP leaves the store empty.

use crate::{
    api::{errors::INVALID_OTP_MESSAGE, ApiClient, ClientError},
    auth::{client, pending::PendingFlag},
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{info, instrument, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginStep {
    AwaitingCredentials,
    AwaitingOtp { email: String },
    Authenticated,
}

/// Returned when the OTP is accepted: the caller should leave the login screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Navigate,
}

#[derive(Debug)]
pub struct LoginFlow {
    api: ApiClient,
    step: Mutex<LoginStep>,
    pending: PendingFlag,
}

/// Loose shape check; the backend owns real address validation.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

impl LoginFlow {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            step: Mutex::new(LoginStep::AwaitingCredentials),
            pending: PendingFlag::new(),
        }
    }

    #[must_use]
    pub fn step(&self) -> LoginStep {
        self.lock_step().clone()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// Sends email and password. On success the flow waits for the OTP.
    ///
    /// # Errors
    /// `Validation` for empty input or when not awaiting credentials, `Busy` while
    /// another submission is in flight, otherwise the backend error verbatim.
    #[instrument(skip_all)]
    pub async fn submit_credentials(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), ClientError> {
        let email = email.trim();
        if email.is_empty() || password.expose_secret().trim().is_empty() {
            return Err(ClientError::validation("Email and password are required."));
        }
        if !valid_email(email) {
            return Err(ClientError::validation("Enter a valid email address."));
        }
        if *self.lock_step() != LoginStep::AwaitingCredentials {
            return Err(ClientError::validation(
                "Credentials were already accepted; enter the OTP or go back.",
            ));
        }

        let _pending = self.pending.begin()?;
        client::login(&self.api, email, password).await?;

        info!("credentials accepted, awaiting OTP");
        *self.lock_step() = LoginStep::AwaitingOtp {
            email: email.to_string(),
        };
        Ok(())
    }

    /// Sends the OTP. On success the credential is stored and the caller is told
    /// to navigate away from the login flow.
    ///
    /// # Errors
    /// `Validation` for an empty code or when no OTP is expected, `Busy` while
    /// another submission is in flight, otherwise the backend error, with
    /// "Invalid or expired OTP" when the backend gave no message.
    #[instrument(skip_all)]
    pub async fn submit_otp(
        &self,
        email: &str,
        code: &SecretString,
    ) -> Result<LoginOutcome, ClientError> {
        let pending_email = match &*self.lock_step() {
            LoginStep::AwaitingOtp { email } => email.clone(),
            _ => return Err(ClientError::validation("No OTP challenge is pending.")),
        };
        if code.expose_secret().trim().is_empty() {
            return Err(ClientError::validation("Enter the code you received."));
        }
        let email = match email.trim() {
            "" => pending_email,
            value => value.to_string(),
        };

        let _pending = self.pending.begin()?;
        match client::verify_login(&self.api, &email, code).await {
            Ok(credential) => {
                self.api.tokens().set(credential)?;
                *self.lock_step() = LoginStep::Authenticated;
                info!("OTP accepted, session stored");
                Ok(LoginOutcome::Navigate)
            }
            Err(err) => {
                if let Err(clear_err) = self.api.tokens().clear() {
                    warn!("failed to clear credential after OTP rejection: {clear_err}");
                }
                Err(otp_error(err))
            }
        }
    }

    /// Returns to the credentials step, discarding the pending OTP challenge.
    pub fn back_to_credentials(&self) {
        let mut step = self.lock_step();
        if matches!(*step, LoginStep::AwaitingOtp { .. }) {
            *step = LoginStep::AwaitingCredentials;
        }
    }

    fn lock_step(&self) -> MutexGuard<'_, LoginStep> {
        self.step.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn otp_error(err: ClientError) -> ClientError {
    match err {
        ClientError::Request {
            status,
            message: None,
        } => ClientError::Request {
            status,
            message: Some(INVALID_OTP_MESSAGE.to_string()),
        },
        other => other,
    }
}
