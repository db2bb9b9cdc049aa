use crate::{
    api::{ApiClient, CancelSignal},
    auth::{LoginFlow, LoginOutcome, UserProfile},
    cli::{
        actions::{print_json, prompt::Prompter},
        globals::GlobalArgs,
    },
    session::{self, SessionGuard, SessionState},
};
use anyhow::{bail, Result};
use secrecy::SecretString;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::debug;

#[derive(Debug)]
pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub otp: Option<SecretString>,
}

/// Runs the session guard and returns the signed-in operator.
///
/// # Errors
/// Fails when there is no valid session.
pub async fn require_session(api: &ApiClient) -> Result<UserProfile> {
    match SessionGuard::new(api.clone()).check().await {
        SessionState::Authenticated(profile) => Ok(profile),
        SessionState::Unauthenticated => {
            bail!("not signed in or the session expired; run `guardian-admin login`")
        }
    }
}

/// Password step, then OTP step. A rejected code can be retried until the
/// operator gives up with an empty line.
///
/// # Errors
/// Returns the first rejected step.
pub async fn login<R, W>(
    args: LoginArgs,
    cancel: CancelSignal,
    prompt: &mut Prompter<R, W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let api = args.globals.api_client(cancel)?;

    if let SessionState::Authenticated(profile) = SessionGuard::new(api.clone()).check().await {
        println!("Already signed in as {}", profile.display_name());
        return Ok(());
    }

    let flow = LoginFlow::new(api);
    let email = prompt.or_line(args.email, "Email: ").await?;
    let password = prompt.or_secret(args.password, "Password: ").await?;

    flow.submit_credentials(&email, &password).await?;
    eprintln!("A one-time code was sent to {}", email.trim());

    let scripted = args.otp.is_some();
    let mut otp = prompt.or_secret(args.otp, "Code: ").await?;
    loop {
        match flow.submit_otp(&email, &otp).await {
            Ok(LoginOutcome::Navigate) => break,
            Err(err) if !scripted => {
                eprintln!("{err}");
                let retry = prompt.line("Code (empty to give up): ").await?;
                if retry.trim().is_empty() {
                    return Err(err.into());
                }
                otp = SecretString::from(retry);
            }
            Err(err) => return Err(err.into()),
        }
    }

    debug!("login flow completed");
    println!("Signed in as {}", email.trim());
    Ok(())
}

/// # Errors
/// Fails when the token file cannot be removed.
pub fn logout(globals: &GlobalArgs) -> Result<()> {
    session::logout(globals.token_store().as_ref())?;
    println!("Signed out");
    Ok(())
}

/// # Errors
/// Fails when there is no valid session.
pub async fn whoami(globals: &GlobalArgs, cancel: CancelSignal) -> Result<()> {
    let api = globals.api_client(cancel)?;
    let profile = require_session(&api).await?;

    if globals.json {
        return print_json(&profile);
    }

    println!("{}", profile.display_name());
    if let Some(email) = &profile.email {
        println!("email: {email}");
    }
    if let Some(role) = &profile.role {
        println!("role:  {role}");
    }
    Ok(())
}
