use clap::{Arg, Command};

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_OTP: &str = "otp";
pub const ARG_CODE: &str = "code";

#[must_use]
pub fn login() -> Command {
    Command::new("login")
        .about("Sign in with email, password and the emailed one-time code")
        .arg(
            Arg::new(ARG_EMAIL)
                .long(ARG_EMAIL)
                .help("Operator email (prompted when omitted)")
                .env("GUARDIAN_ADMIN_EMAIL"),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long(ARG_PASSWORD)
                .help("Operator password (prompted when omitted)")
                .env("GUARDIAN_ADMIN_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_OTP)
                .long(ARG_OTP)
                .help("One-time code, for scripted logins (prompted when omitted)"),
        )
}

#[must_use]
pub fn logout() -> Command {
    Command::new("logout").about("Forget the stored session")
}

#[must_use]
pub fn whoami() -> Command {
    Command::new("whoami").about("Validate the stored session and show the signed-in operator")
}

#[must_use]
pub fn password() -> Command {
    Command::new("password")
        .about("Recover a forgotten password")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("forgot")
                .about("Email a reset code")
                .arg(Arg::new(ARG_EMAIL).long(ARG_EMAIL).required(true)),
        )
        .subcommand(
            Command::new("reset")
                .about("Set a new password using the emailed code")
                .arg(Arg::new(ARG_EMAIL).long(ARG_EMAIL).required(true))
                .arg(Arg::new(ARG_CODE).long(ARG_CODE).required(true)),
        )
}
