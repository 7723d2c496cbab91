use clap::{Parser, Subcommand};

use crate::{distance::DistanceArgs, nearby::NearbyArgs, search::SearchArgs};

mod distance;
mod inputs;
mod nearby;
mod parsers;
mod render;
mod search;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Distance and ETA from the current position to listings
    #[command(visible_alias = "d")]
    Distance {
        #[command(flatten)]
        args: DistanceArgs,
    },
    /// Listings within a radius of the current position
    #[command(visible_alias = "n")]
    Nearby {
        #[command(flatten)]
        args: NearbyArgs,
    },
    /// Listings whose city matches a query
    #[command(visible_alias = "s")]
    Search {
        #[command(flatten)]
        args: SearchArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    roomnav_position::config::load_dotenv();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Distance { args }) => distance::run(args).await?,
        Some(Commands::Nearby { args }) => nearby::run(args).await?,
        Some(Commands::Search { args }) => search::run(args).await?,
        None => {
            // Nothing to do without a subcommand
        }
    }

    Ok(())
}
