use crate::cli::{
    actions::Action,
    commands::{self, api::ARG_API_URL},
    dispatch::{handler, verbosity},
    telemetry::{self, Invocation},
};
use anyhow::Result;
use clap::ArgMatches;

fn invocation(matches: &ArgMatches) -> Invocation {
    Invocation {
        command: matches.subcommand_name().unwrap_or_default().to_string(),
        api_url: matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .unwrap_or_default(),
        verbosity: verbosity(matches),
    }
}

/// Parse arguments, set up logging and resolve the action to run.
///
/// # Errors
/// Returns an error if logging cannot be initialized or the arguments do not
/// describe a runnable action.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    telemetry::init(&invocation(&matches))?;

    handler(&matches)
}
