use clap::{Arg, ArgAction, Command};

pub const ARG_ID: &str = "id";
pub const ARG_PAGE: &str = "page";
pub const ARG_LIMIT: &str = "limit";
pub const ARG_SEARCH: &str = "search";
pub const ARG_EMAIL: &str = "email";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_ROLE: &str = "role";
pub const ARG_VERIFIED: &str = "verified";

fn id_arg(help: &'static str) -> Arg {
    Arg::new(ARG_ID).help(help).required(true)
}

#[must_use]
pub fn command() -> Command {
    Command::new("users")
        .about("Moderate end-user accounts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List users one page at a time")
                .arg(
                    Arg::new(ARG_PAGE)
                        .long(ARG_PAGE)
                        .default_value("1")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                )
                .arg(
                    Arg::new(ARG_LIMIT)
                        .long(ARG_LIMIT)
                        .default_value("20")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                )
                .arg(Arg::new(ARG_SEARCH).long(ARG_SEARCH).short('s')),
        )
        .subcommand(
            Command::new("update")
                .about("Change fields of a user")
                .arg(id_arg("User id"))
                .arg(Arg::new(ARG_EMAIL).long(ARG_EMAIL))
                .arg(Arg::new(ARG_FIRST_NAME).long(ARG_FIRST_NAME))
                .arg(Arg::new(ARG_LAST_NAME).long(ARG_LAST_NAME))
                .arg(Arg::new(ARG_ROLE).long(ARG_ROLE))
                .arg(
                    Arg::new(ARG_VERIFIED)
                        .long(ARG_VERIFIED)
                        .value_parser(clap::value_parser!(bool))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a user")
                .arg(id_arg("User id")),
        )
        .subcommand(
            Command::new("scans")
                .about("List the scans of a user")
                .arg(id_arg("User id")),
        )
        .subcommand(
            Command::new("logs")
                .about("Show the activity log of a user")
                .arg(id_arg("User id")),
        )
}

#[must_use]
pub fn scans() -> Command {
    Command::new("scans")
        .about("Manage scans")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("delete")
                .about("Delete a scan")
                .arg(id_arg("Scan id")),
        )
}
