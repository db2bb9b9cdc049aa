use crate::{
    api::CancelSignal,
    audit::AuditTrailQuery,
    cli::{
        actions::{print_json, session::require_session},
        globals::GlobalArgs,
    },
};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub from: String,
    pub to: String,
    pub search: Option<String>,
}

/// # Errors
/// Fails without a valid session, or with the error reported by the query.
pub async fn execute(args: Args, cancel: CancelSignal) -> Result<()> {
    let api = args.globals.api_client(cancel)?;
    require_session(&api).await?;

    let view = AuditTrailQuery::new(api)
        .load(&args.from, &args.to, args.search.as_deref())
        .await;
    if let Some(err) = view.error {
        return Err(err.into());
    }

    if args.globals.json {
        return print_json(&view.entries);
    }
    if view.entries.is_empty() {
        println!("No audit entries between {} and {}", args.from, args.to);
    }
    for entry in &view.entries {
        println!("{}", entry.render_line());
    }
    Ok(())
}
