use anyhow::Result;
use clap::{Parser, Subcommand};
use lorescope::{ArchiveBrowser, Config, Fetcher};
use serde::Serialize;

/// Browse a lore-style mailing-list archive from the terminal.
#[derive(Parser)]
#[command(name = "lore", version)]
struct Cli {
    /// Archive root; overrides LORE_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, env = "LORE_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mailing lists on the archive index.
    Lists,
    /// Newest page of a list, optionally paging further back.
    List {
        name: String,
        /// Follow "next (older)" this many times.
        #[arg(long, default_value_t = 0)]
        older: u32,
    },
    /// Thread view of a message id or permalink.
    Thread { message_id: String },
    /// Search across all lists.
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = match cli.base_url.as_deref() {
        Some(base_url) => Config::from_env()?.with_base_url(base_url)?,
        None => Config::from_env()?,
    };
    let fetcher = Fetcher::new(&config)?;
    let browser = ArchiveBrowser::new(fetcher, config.base_url());

    match cli.command {
        Command::Lists => print_json(&browser.mailing_lists().await?),
        Command::List { name, older } => {
            let mut state = browser.open(&name).await?;
            for _ in 0..older {
                if state.end_reached {
                    break;
                }
                state = browser.older(&name).await?;
            }
            print_json(&state)
        }
        Command::Thread { message_id } => print_json(&browser.thread(&message_id).await?),
        Command::Search { query, page } => print_json(&browser.search(&query, page).await?),
    }
}
