//! User moderation: listing, editing and removing users, and their scans and
//! activity logs.

pub mod client;
pub mod types;

pub use self::client::UsersClient;
pub use self::types::{Scan, UserActivity, UserPage, UserSummary, UserUpdate};
