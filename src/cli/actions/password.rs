use crate::{
    api::CancelSignal,
    auth::PasswordReset,
    cli::{actions::prompt::Prompter, globals::GlobalArgs},
};
use anyhow::Result;
use secrecy::SecretString;
use tokio::io::{AsyncBufRead, AsyncWrite};

#[derive(Debug)]
pub enum Op {
    Forgot { email: String },
    Reset { email: String, code: SecretString },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub op: Op,
}

/// # Errors
/// Returns validation or backend errors from the reset flow.
pub async fn execute<R, W>(
    args: Args,
    cancel: CancelSignal,
    prompt: &mut Prompter<R, W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let reset = PasswordReset::new(args.globals.api_client(cancel)?);

    match args.op {
        Op::Forgot { email } => {
            reset.request_code(&email).await?;
            println!("If the address is registered, a reset code is on its way.");
        }
        Op::Reset { email, code } => {
            let new_password = prompt.secret("New password: ").await?;
            let confirm_password = prompt.secret("Repeat new password: ").await?;
            reset
                .reset(&email, &code, &new_password, &confirm_password)
                .await?;
            println!("Password updated; sign in with `guardian-admin login`.");
        }
    }

    Ok(())
}
