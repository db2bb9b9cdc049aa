//! Maps validated CLI matches to an `Action`.

use crate::{
    cli::{
        actions::{admins, audit, password, session, users, Action},
        commands::{self, api, logging},
        globals::GlobalArgs,
    },
    users::UserUpdate,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>(api::ARG_API_URL)
        .cloned()
        .context("missing required argument: --api-url")?;
    let token_file = matches
        .get_one::<String>(api::ARG_TOKEN_FILE)
        .map(PathBuf::from);
    let timeout = matches
        .get_one::<u64>(api::ARG_TIMEOUT)
        .copied()
        .map_or(crate::api::config::DEFAULT_TIMEOUT, Duration::from_secs);

    GlobalArgs::new(api_url, token_file, timeout, matches.get_flag(api::ARG_JSON))
}

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    string(matches, id).with_context(|| format!("missing required argument: --{id}"))
}

/// Verbosity requested with `-v` or `GUARDIAN_ADMIN_LOG_LEVEL`.
#[must_use]
pub fn verbosity(matches: &ArgMatches) -> u8 {
    matches
        .get_one::<u8>(logging::ARG_VERBOSITY)
        .copied()
        .unwrap_or(0)
}

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    let Some((name, sub)) = matches.subcommand() else {
        return Err(anyhow!("no command given, see --help"));
    };

    let action = match name {
        "login" => Action::Login(session::LoginArgs {
            globals,
            email: string(sub, commands::session::ARG_EMAIL),
            password: string(sub, commands::session::ARG_PASSWORD).map(SecretString::from),
            otp: string(sub, commands::session::ARG_OTP).map(SecretString::from),
        }),
        "logout" => Action::Logout(globals),
        "whoami" => Action::Whoami(globals),
        "password" => Action::Password(password::Args {
            globals,
            op: password_op(sub)?,
        }),
        "admins" => Action::Admins(admins::Args {
            globals,
            op: admins_op(sub)?,
        }),
        "audit" => Action::Audit(audit::Args {
            globals,
            from: required(sub, commands::audit::ARG_FROM)?,
            to: required(sub, commands::audit::ARG_TO)?,
            search: string(sub, commands::audit::ARG_SEARCH),
        }),
        "users" => Action::Users(users::Args {
            globals,
            op: users_op(sub)?,
        }),
        "scans" => Action::Users(users::Args {
            globals,
            op: scans_op(sub)?,
        }),
        other => return Err(anyhow!("unknown command: {other}")),
    };

    Ok(action)
}

fn password_op(matches: &ArgMatches) -> Result<password::Op> {
    use commands::session::{ARG_CODE, ARG_EMAIL};

    match matches.subcommand() {
        Some(("forgot", sub)) => Ok(password::Op::Forgot {
            email: required(sub, ARG_EMAIL)?,
        }),
        Some(("reset", sub)) => Ok(password::Op::Reset {
            email: required(sub, ARG_EMAIL)?,
            code: SecretString::from(required(sub, ARG_CODE)?),
        }),
        _ => Err(anyhow!("expected `password forgot` or `password reset`")),
    }
}

fn admins_op(matches: &ArgMatches) -> Result<admins::Op> {
    use commands::admins::{
        ARG_CHANGE_PASSWORD, ARG_EMAIL, ARG_FIRST_NAME, ARG_ID, ARG_LAST_NAME, ARG_QUERY,
    };

    let id = |sub: &ArgMatches| {
        sub.get_one::<u64>(ARG_ID)
            .copied()
            .context("missing required argument: <id>")
    };

    match matches.subcommand() {
        Some(("list", _)) => Ok(admins::Op::List),
        Some(("search", sub)) => Ok(admins::Op::Search(required(sub, ARG_QUERY)?)),
        Some(("create", sub)) => Ok(admins::Op::Create {
            email: required(sub, ARG_EMAIL)?,
            first_name: string(sub, ARG_FIRST_NAME).unwrap_or_default(),
            last_name: string(sub, ARG_LAST_NAME).unwrap_or_default(),
        }),
        Some(("update", sub)) => Ok(admins::Op::Update {
            id: id(sub)?,
            email: string(sub, ARG_EMAIL),
            first_name: string(sub, ARG_FIRST_NAME),
            last_name: string(sub, ARG_LAST_NAME),
            change_password: sub.get_flag(ARG_CHANGE_PASSWORD),
        }),
        Some(("delete", sub)) => Ok(admins::Op::Delete(id(sub)?)),
        _ => Err(anyhow!("unknown admins command")),
    }
}

fn users_op(matches: &ArgMatches) -> Result<users::Op> {
    use commands::users::{
        ARG_EMAIL, ARG_FIRST_NAME, ARG_ID, ARG_LAST_NAME, ARG_LIMIT, ARG_PAGE, ARG_ROLE,
        ARG_SEARCH, ARG_VERIFIED,
    };

    match matches.subcommand() {
        Some(("list", sub)) => Ok(users::Op::List {
            page: sub.get_one::<u32>(ARG_PAGE).copied().unwrap_or(1),
            limit: sub.get_one::<u32>(ARG_LIMIT).copied().unwrap_or(20),
            search: string(sub, ARG_SEARCH),
        }),
        Some(("update", sub)) => Ok(users::Op::Update {
            id: required(sub, ARG_ID)?,
            update: UserUpdate {
                email: string(sub, ARG_EMAIL),
                first_name: string(sub, ARG_FIRST_NAME),
                last_name: string(sub, ARG_LAST_NAME),
                role: string(sub, ARG_ROLE),
                is_verified: sub.get_one::<bool>(ARG_VERIFIED).copied(),
            },
        }),
        Some(("delete", sub)) => Ok(users::Op::Delete(required(sub, ARG_ID)?)),
        Some(("scans", sub)) => Ok(users::Op::Scans(required(sub, ARG_ID)?)),
        Some(("logs", sub)) => Ok(users::Op::Logs(required(sub, ARG_ID)?)),
        _ => Err(anyhow!("unknown users command")),
    }
}

fn scans_op(matches: &ArgMatches) -> Result<users::Op> {
    match matches.subcommand() {
        Some(("delete", sub)) => Ok(users::Op::DeleteScan(required(
            sub,
            commands::users::ARG_ID,
        )?)),
        _ => Err(anyhow!("unknown scans command")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn dispatch(args: &[&str]) -> Result<Action> {
        let mut argv = vec!["guardian-admin", "--token-file", "/tmp/guardian-test.json"];
        argv.extend_from_slice(args);
        let matches = commands::new().try_get_matches_from(argv)?;
        handler(&matches)
    }

    #[test]
    fn login_collects_optional_credentials() {
        temp_env::with_vars(
            [
                ("GUARDIAN_ADMIN_EMAIL", None::<&str>),
                ("GUARDIAN_ADMIN_PASSWORD", Some("from-env")),
            ],
            || {
                let action = dispatch(&["login", "--email", "ops@example.com"]).unwrap();
                let Action::Login(args) = action else {
                    panic!("expected login");
                };
                assert_eq!(args.email.as_deref(), Some("ops@example.com"));
                assert_eq!(args.password.unwrap().expose_secret(), "from-env");
                assert!(args.otp.is_none());
                assert_eq!(args.globals.token_file, PathBuf::from("/tmp/guardian-test.json"));
            },
        );
    }

    #[test]
    fn admins_update_parses_id_and_fields() {
        let action = dispatch(&["admins", "update", "7", "--last-name", "Ops"]).unwrap();
        let Action::Admins(args) = action else {
            panic!("expected admins");
        };
        match args.op {
            admins::Op::Update {
                id,
                last_name,
                email,
                change_password,
                ..
            } => {
                assert_eq!(id, 7);
                assert_eq!(last_name.as_deref(), Some("Ops"));
                assert!(email.is_none());
                assert!(!change_password);
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn admins_id_must_be_positive() {
        assert!(dispatch(&["admins", "delete", "0"]).is_err());
    }

    #[test]
    fn scans_delete_maps_to_users_action() {
        let action = dispatch(&["scans", "delete", "12"]).unwrap();
        let Action::Users(args) = action else {
            panic!("expected users");
        };
        assert!(matches!(args.op, users::Op::DeleteScan(ref id) if id == "12"));
    }

    #[test]
    fn users_update_collects_partial_fields() {
        let action = dispatch(&["users", "update", "5", "--role", "admin", "--verified", "true"])
            .unwrap();
        let Action::Users(args) = action else {
            panic!("expected users");
        };
        match args.op {
            users::Op::Update { id, update } => {
                assert_eq!(id, "5");
                assert_eq!(update.role.as_deref(), Some("admin"));
                assert_eq!(update.is_verified, Some(true));
                assert!(update.email.is_none());
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn audit_requires_both_dates() {
        assert!(dispatch(&["audit", "--from", "2024-01-01"]).is_err());
        let action = dispatch(&["audit", "--from", "2024-01-01", "--to", "2024-01-07"]).unwrap();
        assert!(matches!(action, Action::Audit(_)));
    }

    #[test]
    fn verbosity_defaults_to_zero() {
        temp_env::with_vars([("GUARDIAN_ADMIN_LOG_LEVEL", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec!["guardian-admin", "logout"]);
            assert_eq!(verbosity(&matches), 0);
        });
    }
}
