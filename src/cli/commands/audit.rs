use clap::{Arg, Command};

pub const ARG_FROM: &str = "from";
pub const ARG_TO: &str = "to";
pub const ARG_SEARCH: &str = "search";

#[must_use]
pub fn command() -> Command {
    Command::new("audit")
        .about("Show the audit trail for a date range, newest first")
        .arg(
            Arg::new(ARG_FROM)
                .long(ARG_FROM)
                .help("First day, YYYY-MM-DD")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TO)
                .long(ARG_TO)
                .help("Last day (inclusive), YYYY-MM-DD")
                .required(true),
        )
        .arg(
            Arg::new(ARG_SEARCH)
                .long(ARG_SEARCH)
                .short('s')
                .help("Free-text filter applied by the backend"),
        )
}
