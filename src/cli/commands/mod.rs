pub mod admins;
pub mod api;
pub mod audit;
pub mod logging;
pub mod session;
pub mod users;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("guardian-admin")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(session::login())
        .subcommand(session::logout())
        .subcommand(session::whoami())
        .subcommand(session::password())
        .subcommand(admins::command())
        .subcommand(audit::command())
        .subcommand(users::command())
        .subcommand(users::scans());

    let command = api::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "guardian-admin");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_command_is_consistent() {
        new().debug_assert();
    }

    #[test]
    fn test_global_args_after_subcommand() {
        temp_env::with_vars(
            [
                ("GUARDIAN_ADMIN_API_URL", None::<&str>),
                ("GUARDIAN_ADMIN_TIMEOUT", None::<&str>),
                ("GUARDIAN_ADMIN_LOG_LEVEL", None::<&str>),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "guardian-admin",
                    "audit",
                    "--from",
                    "2024-01-01",
                    "--to",
                    "2024-01-07",
                    "--api-url",
                    "https://admin.example.com",
                    "--timeout",
                    "30",
                    "--json",
                ]);
                assert_eq!(
                    matches.get_one::<String>(api::ARG_API_URL).cloned(),
                    Some("https://admin.example.com".to_string())
                );
                assert_eq!(matches.get_one::<u64>(api::ARG_TIMEOUT).copied(), Some(30));
                assert!(matches.get_flag(api::ARG_JSON));

                let (name, sub) = matches.subcommand().unwrap();
                assert_eq!(name, "audit");
                assert_eq!(
                    sub.get_one::<String>(audit::ARG_FROM).cloned(),
                    Some("2024-01-01".to_string())
                );
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("GUARDIAN_ADMIN_API_URL", Some("https://admin.example.com")),
                ("GUARDIAN_ADMIN_TOKEN_FILE", Some("/tmp/guardian-session.json")),
                ("GUARDIAN_ADMIN_TIMEOUT", Some("5")),
                ("GUARDIAN_ADMIN_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["guardian-admin", "whoami"]);
                assert_eq!(
                    matches.get_one::<String>(api::ARG_API_URL).cloned(),
                    Some("https://admin.example.com".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(api::ARG_TOKEN_FILE).cloned(),
                    Some("/tmp/guardian-session.json".to_string())
                );
                assert_eq!(matches.get_one::<u64>(api::ARG_TIMEOUT).copied(), Some(5));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("GUARDIAN_ADMIN_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["guardian-admin", "logout"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5usize {
            temp_env::with_vars([("GUARDIAN_ADMIN_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["guardian-admin".to_string(), "logout".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_invalid_log_level_env() {
        temp_env::with_vars([("GUARDIAN_ADMIN_LOG_LEVEL", Some("loud"))], || {
            let result = new().try_get_matches_from(vec!["guardian-admin", "logout"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_users_list_rejects_zero_page() {
        let result =
            new().try_get_matches_from(vec!["guardian-admin", "users", "list", "--page", "0"]);
        assert_eq!(
            result.map(|_| ()).map_err(|e| e.kind()),
            Err(clap::error::ErrorKind::ValueValidation)
        );
    }

    #[test]
    fn test_subcommand_required() {
        let result = new().try_get_matches_from(vec!["guardian-admin"]);
        assert!(result.is_err());
    }
}
