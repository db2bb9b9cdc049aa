//! # Guardian Admin (admin console client)
//!
//! `guardian_admin` is the client side of the admin console: it authenticates an
//! operator against the backend, keeps the resulting bearer credential, and issues
//! the admin calls (admin directory, audit trail, user and scan moderation).
//!
//! ## Authentication (password + OTP)
//!
//! Login is a two-step exchange. The operator first submits email and password to
//! `/api/auth/login`; the backend answers by sending a one-time passcode out of
//! band. The code is then submitted to `/api/auth/verify-login`, which returns the
//! bearer credential stored by the [`session::TokenStore`].
//!
//! ## Session validity
//!
//! The client never inspects the credential. Validity is decided by the backend:
//! the [`session::SessionGuard`] asks `/api/user/profile` and drops the stored
//! credential on any failure.
//!
//! ## Errors
//!
//! Every operation returns [`api::ClientError`]. Validation errors are raised
//! before any network call; request errors carry the backend `error`/`message`
//! field or fall back to `HTTP <status>`.

pub mod admins;
pub mod api;
pub mod audit;
pub mod auth;
pub mod cli;
pub mod session;
pub mod users;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
