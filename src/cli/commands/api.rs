use clap::{Arg, ArgAction, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TOKEN_FILE: &str = "token-file";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_JSON: &str = "json";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Admin backend base URL")
                .env("GUARDIAN_ADMIN_API_URL")
                .default_value("http://localhost:3000")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_FILE)
                .long(ARG_TOKEN_FILE)
                .help(
                    "Where the session credential is kept \
                     (default: <config dir>/guardian-admin/session.json)",
                )
                .env("GUARDIAN_ADMIN_TOKEN_FILE")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .env("GUARDIAN_ADMIN_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..=300))
                .global(true),
        )
        .arg(
            Arg::new(ARG_JSON)
                .long(ARG_JSON)
                .help("Print results as JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
}
