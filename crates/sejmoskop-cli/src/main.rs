mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sejmoskop_store::BillStore;
use sejmoskop_sync::{DEFAULT_BASE_URL, SejmClient, sync_bill, sync_term};

#[derive(Parser)]
#[command(name = "sejmoskop", version, about = "Track Polish parliamentary bills")]
struct Cli {
    /// Path to the SQLite database.
    #[arg(long, global = true, default_value = "sejmoskop.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch stage trees from the Sejm API and refresh stored timelines.
    Sync {
        /// Parliamentary term to sync.
        #[arg(long)]
        term: i64,
        /// Sync only this print number instead of the whole term.
        #[arg(long)]
        bill: Option<String>,
        /// Base URL of the Sejm API.
        #[arg(long, env = "SEJM_API_URL", default_value = DEFAULT_BASE_URL)]
        api_url: String,
    },
    /// Print a stored bill's status and timeline.
    Show {
        #[arg(long)]
        term: i64,
        #[arg(long)]
        bill: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Sync {
            term,
            bill,
            api_url,
        } => {
            let client = SejmClient::new(api_url);
            let mut store = BillStore::open_persistent(&cli.db)?;
            match bill {
                Some(number) => {
                    sync_bill(&client, &mut store, term, &number).await?;
                }
                None => {
                    let report = sync_term(&client, &mut store, term).await?;
                    tracing::info!(report.synced, report.failed, "term sync finished");
                }
            }
        }
        Command::Show { term, bill } => {
            let store = BillStore::open_persistent(&cli.db)?;
            let title = store.get_title(term, &bill)?;
            let status = store.get_status(term, &bill)?;
            let events = store.get_events(term, &bill)?;
            display::print_bill_card(term, &bill, &title, status, &events);
        }
    }

    Ok(())
}
