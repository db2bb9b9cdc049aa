use crate::{
    api::{CancelHandle, CancelSignal},
    cli::actions::{admins, audit, password, prompt::Prompter, session, users, Action},
};
use anyhow::Result;
use tracing::warn;

/// Execute the provided action.
// Single dispatch point for all CLI actions. Ctrl-C cancels in-flight requests.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    let handle = CancelHandle::new();
    let signal = handle.signal();

    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling pending requests");
            handle.cancel();
        }
    });

    let result = run(action, signal).await;
    watcher.abort();
    result
}

async fn run(action: Action, cancel: CancelSignal) -> Result<()> {
    let mut prompt = Prompter::stdio();

    match action {
        Action::Login(args) => session::login(args, cancel, &mut prompt).await,
        Action::Logout(globals) => session::logout(&globals),
        Action::Whoami(globals) => session::whoami(&globals, cancel).await,
        Action::Password(args) => password::execute(args, cancel, &mut prompt).await,
        Action::Admins(args) => admins::execute(args, cancel, &mut prompt).await,
        Action::Audit(args) => audit::execute(args, cancel).await,
        Action::Users(args) => users::execute(args, cancel).await,
    }
}
