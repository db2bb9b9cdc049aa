use crate::{
    api::CancelSignal,
    cli::{
        actions::{print_json, session::require_session},
        globals::GlobalArgs,
    },
    users::{UserUpdate, UsersClient},
};
use anyhow::Result;

#[derive(Debug)]
pub enum Op {
    List {
        page: u32,
        limit: u32,
        search: Option<String>,
    },
    Update {
        id: String,
        update: UserUpdate,
    },
    Delete(String),
    Scans(String),
    Logs(String),
    DeleteScan(String),
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub op: Op,
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// # Errors
/// Fails without a valid session, on validation errors or backend errors.
pub async fn execute(args: Args, cancel: CancelSignal) -> Result<()> {
    let api = args.globals.api_client(cancel)?;
    require_session(&api).await?;
    let users = UsersClient::new(api);
    let json = args.globals.json;

    match args.op {
        Op::List {
            page,
            limit,
            search,
        } => {
            let listing = users.list(page, limit, search.as_deref()).await?;
            if json {
                return print_json(&listing);
            }
            for user in &listing.users {
                println!(
                    "{:>8}  {:<32}  {:<10}  verified={}",
                    user.id,
                    user.email,
                    or_dash(user.role.as_deref()),
                    user.is_verified.map_or("-", |v| if v { "yes" } else { "no" })
                );
            }
            println!(
                "page {} ({} per page), {} users total",
                listing.page, listing.limit, listing.total
            );
        }
        Op::Update { id, update } => {
            let updated = users.update(&id, &update).await?;
            if json {
                return print_json(&updated);
            }
            println!("User {} updated", id.trim());
        }
        Op::Delete(id) => {
            users.delete(&id).await?;
            println!("User {} deleted", id.trim());
        }
        Op::Scans(id) => {
            let scans = users.scans(&id).await?;
            if json {
                return print_json(&scans);
            }
            if scans.is_empty() {
                println!("No scans");
            }
            for scan in &scans {
                println!("{:>8}  {}", scan.id, or_dash(scan.created_at.as_deref()));
            }
        }
        Op::Logs(id) => {
            let logs = users.activity(&id).await?;
            if json {
                return print_json(&logs);
            }
            if logs.is_empty() {
                println!("No activity");
            }
            for entry in &logs {
                println!(
                    "{}  {}  {}",
                    or_dash(entry.created_at.as_deref()),
                    entry.action,
                    or_dash(entry.ip_address.as_deref())
                );
            }
        }
        Op::DeleteScan(id) => {
            users.delete_scan(&id).await?;
            println!("Scan {} deleted", id.trim());
        }
    }

    Ok(())
}
