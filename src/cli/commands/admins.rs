use clap::{Arg, Command};

pub const ARG_ID: &str = "id";
pub const ARG_QUERY: &str = "query";
pub const ARG_EMAIL: &str = "email";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_CHANGE_PASSWORD: &str = "change-password";

fn id_arg() -> Arg {
    Arg::new(ARG_ID)
        .help("Admin id")
        .required(true)
        .value_parser(clap::value_parser!(u64).range(1..))
}

#[must_use]
pub fn command() -> Command {
    Command::new("admins")
        .about("Manage admin accounts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List admin accounts"))
        .subcommand(
            Command::new("search")
                .about("Search by email, first or last name (case-insensitive)")
                .arg(Arg::new(ARG_QUERY).required(true)),
        )
        .subcommand(
            Command::new("create")
                .about("Create an admin; the password is prompted twice")
                .arg(Arg::new(ARG_EMAIL).long(ARG_EMAIL).required(true))
                .arg(Arg::new(ARG_FIRST_NAME).long(ARG_FIRST_NAME).default_value(""))
                .arg(Arg::new(ARG_LAST_NAME).long(ARG_LAST_NAME).default_value("")),
        )
        .subcommand(
            Command::new("update")
                .about("Change fields of an admin")
                .arg(id_arg())
                .arg(Arg::new(ARG_EMAIL).long(ARG_EMAIL))
                .arg(Arg::new(ARG_FIRST_NAME).long(ARG_FIRST_NAME))
                .arg(Arg::new(ARG_LAST_NAME).long(ARG_LAST_NAME))
                .arg(
                    Arg::new(ARG_CHANGE_PASSWORD)
                        .long(ARG_CHANGE_PASSWORD)
                        .help("Prompt for a new password")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete an admin")
                .arg(id_arg()),
        )
}
