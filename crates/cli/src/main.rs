//! `msgr`: log in, fetch the inbox sync payload, and either print the
//! interpreted snapshot or interact with a thread.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use msgr_client::{auth, discover, graphql, Credentials, Session};
use msgr_lightspeed::{extract, interpret, resolve};
use msgr_script::parse_script;

#[derive(Parser)]
#[command(name = "msgr", version, about = "Retrieve a messaging inbox without the app")]
struct Cli {
    /// Account email
    #[arg(short = 'u', long)]
    email: String,

    /// Account password
    #[arg(short, long)]
    password: String,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the inbox as JSON
    Inbox,
    /// Send a message to a thread
    Send {
        #[arg(short, long)]
        thread: u64,
        #[arg(short, long)]
        message: String,
    },
    /// Mark a thread as read
    Read {
        #[arg(short, long)]
        thread: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut session = Session::new()?;
    let creds = Credentials {
        email: cli.email,
        password: cli.password,
    };
    let chat = auth::establish(&mut session, &creds).await?;
    debug!(
        scripts = chat.scripts.len(),
        schema_version = %chat.schema_version,
        "chat page scraped"
    );
    let query_id = discover::find_query_id(&session, &chat.scripts).await?;
    debug!(%query_id, "inbox query discovered");

    match cli.cmd {
        Cmd::Inbox => {
            let payload = graphql::fetch_inbox_script(&mut session, &chat, &query_id).await?;
            let tree = parse_script(&payload).context("script payload did not parse")?;
            let log = extract(&tree)?;
            debug!(
                calls = log.len(),
                opcodes = ?log.opcode_names(),
                unrecognized = log.unrecognized_count(),
                "sync log extracted"
            );
            let mut snapshot = interpret(&log)?;
            resolve(&mut snapshot)?;
            let out = if std::io::stdout().is_terminal() {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            };
            println!("{out}");
        }
        Cmd::Send { thread, message } => {
            graphql::interact_with_thread(&mut session, &chat, &query_id, thread, Some(&message))
                .await?;
        }
        Cmd::Read { thread } => {
            graphql::interact_with_thread(&mut session, &chat, &query_id, thread, None).await?;
        }
    }
    Ok(())
}
