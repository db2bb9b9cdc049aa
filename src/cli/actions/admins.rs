use crate::{
    admins::{AdminAccount, AdminDirectory, AdminUpdate, NewAdmin, RemoteAdminRepository},
    api::CancelSignal,
    cli::{
        actions::{print_json, prompt::Prompter, session::require_session},
        globals::GlobalArgs,
    },
};
use anyhow::{bail, Result};
use tokio::io::{AsyncBufRead, AsyncWrite};

#[derive(Debug)]
pub enum Op {
    List,
    Search(String),
    Create {
        email: String,
        first_name: String,
        last_name: String,
    },
    Update {
        id: u64,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        change_password: bool,
    },
    Delete(u64),
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub op: Op,
}

fn print_admins(admins: &[AdminAccount], json: bool) -> Result<()> {
    if json {
        return print_json(&admins);
    }
    if admins.is_empty() {
        println!("No admins found");
        return Ok(());
    }
    for admin in admins {
        println!(
            "{:>5}  {:<32}  {} {}",
            admin.id, admin.email, admin.first_name, admin.last_name
        );
    }
    Ok(())
}

/// # Errors
/// Fails without a valid session, on validation errors or backend errors.
pub async fn execute<R, W>(
    args: Args,
    cancel: CancelSignal,
    prompt: &mut Prompter<R, W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let api = args.globals.api_client(cancel)?;
    require_session(&api).await?;
    let directory = AdminDirectory::new(RemoteAdminRepository::new(api));
    let json = args.globals.json;

    match args.op {
        Op::List => print_admins(&directory.list().await?, json)?,
        Op::Search(query) => print_admins(&directory.search(&query).await?, json)?,
        Op::Create {
            email,
            first_name,
            last_name,
        } => {
            let password = prompt.secret("Password: ").await?;
            let confirm_password = prompt.secret("Repeat password: ").await?;
            let created = directory
                .create(NewAdmin {
                    email,
                    first_name,
                    last_name,
                    password,
                    confirm_password,
                })
                .await?;
            print_admins(&[created], json)?;
        }
        Op::Update {
            id,
            email,
            first_name,
            last_name,
            change_password,
        } => {
            let (password, confirm_password) = if change_password {
                (
                    Some(prompt.secret("New password: ").await?),
                    Some(prompt.secret("Repeat new password: ").await?),
                )
            } else {
                (None, None)
            };
            let update = AdminUpdate {
                email,
                first_name,
                last_name,
                password,
                confirm_password,
            };
            match directory.update(id, update).await? {
                Some(updated) => print_admins(&[updated], json)?,
                None => bail!("no admin with id {id}"),
            }
        }
        Op::Delete(id) => {
            directory.delete(id).await?;
            println!("Admin {id} deleted");
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        admins::remote::ADMINS_PATH,
        api::CancelHandle,
        auth::client::PROFILE_PATH,
        session::{FileTokenStore, TokenStore},
    };
    use secrecy::SecretString;
    use serde_json::json;
    use std::{net::TcpListener, time::Duration};
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    async fn signed_in(server: &MockServer, dir: &TempDir) -> GlobalArgs {
        let token_file = dir.path().join("session.json");
        FileTokenStore::new(&token_file)
            .set(SecretString::from("jwt-abc"))
            .unwrap();
        Mock::given(method("GET"))
            .and(path(PROFILE_PATH))
            .and(header("authorization", "Bearer jwt-abc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"email": "root@example.com"})),
            )
            .mount(server)
            .await;
        GlobalArgs::new(server.uri(), Some(token_file), Duration::from_secs(5), false).unwrap()
    }

    #[tokio::test]
    async fn create_reads_password_and_confirmation_from_one_pipe() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir()?;
        let globals = signed_in(&server, &dir).await;
        Mock::given(method("POST"))
            .and(path(ADMINS_PATH))
            .and(body_json(json!({
                "email": "new@example.com",
                "firstName": "New",
                "lastName": "Admin",
                "password": "s3cret"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 3,
                "email": "new@example.com",
                "firstName": "New",
                "lastName": "Admin"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let handle = CancelHandle::new();
        let mut prompt = Prompter::new(&b"s3cret\ns3cret\n"[..], Vec::new());
        let args = Args {
            globals,
            op: Op::Create {
                email: "new@example.com".to_string(),
                first_name: "New".to_string(),
                last_name: "Admin".to_string(),
            },
        };

        execute(args, handle.signal(), &mut prompt).await?;

        assert_eq!(
            String::from_utf8_lossy(prompt.output()),
            "Password: Repeat password: "
        );
        Ok(())
    }

    #[tokio::test]
    async fn update_with_password_change_prompts_twice() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let dir = tempfile::tempdir()?;
        let globals = signed_in(&server, &dir).await;
        Mock::given(method("PUT"))
            .and(path(format!("{ADMINS_PATH}/2")))
            .and(body_json(json!({"password": "n3w"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 2, "email": "two@example.com"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let handle = CancelHandle::new();
        let mut prompt = Prompter::new(&b"n3w\nn3w\n"[..], Vec::new());
        let args = Args {
            globals,
            op: Op::Update {
                id: 2,
                email: None,
                first_name: None,
                last_name: None,
                change_password: true,
            },
        };

        execute(args, handle.signal(), &mut prompt).await?;
        Ok(())
    }

    #[tokio::test]
    async fn commands_without_a_session_are_refused() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ADMINS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir()?;
        let globals = GlobalArgs::new(
            server.uri(),
            Some(dir.path().join("session.json")),
            Duration::from_secs(5),
            false,
        )?;
        let handle = CancelHandle::new();
        let mut prompt = Prompter::new(&b""[..], Vec::new());
        let args = Args {
            globals,
            op: Op::List,
        };

        let err = execute(args, handle.signal(), &mut prompt)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not signed in"));
        Ok(())
    }
}
