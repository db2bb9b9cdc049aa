pub mod admins;
pub mod audit;
pub mod password;
pub mod prompt;
pub mod session;
pub mod users;

// Internal "interpreter" for `Action`; the match lives in `run`.
mod run;

use crate::cli::globals::GlobalArgs;
use serde::Serialize;

#[derive(Debug)]
pub enum Action {
    Login(session::LoginArgs),
    Logout(GlobalArgs),
    Whoami(GlobalArgs),
    Password(password::Args),
    Admins(admins::Args),
    Audit(audit::Args),
    Users(users::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
