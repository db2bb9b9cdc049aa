//! Operator authentication: password step, OTP step and password reset.
//!
//! Flow overview: `LoginFlow::submit_credentials` posts email and password, the
//! backend sends an OTP out of band, and `LoginFlow::submit_otp` exchanges it for
//! the bearer credential kept by the token store. Nothing in this module logs
//! passwords, codes or credentials.

pub mod client;
pub mod flow;
pub mod pending;
pub mod reset;
pub mod types;

pub use self::flow::{LoginFlow, LoginOutcome, LoginStep};
pub use self::reset::PasswordReset;
pub use self::types::UserProfile;
