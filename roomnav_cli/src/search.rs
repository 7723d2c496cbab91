use clap::Args;
use roomnav_routing::filter_by_city;
use roomnav_session::{DistanceSession, SessionConfig};

use crate::{
    inputs::{self, ListingsArgs},
    render,
};

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub listings: ListingsArgs,

    /// Case-insensitive part of the city name, empty lists everything
    #[arg(short, long, default_value = "")]
    pub city: String,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SearchArgs) -> Result<(), anyhow::Error> {
    let session = DistanceSession::new(SessionConfig::from_env()?);
    let listings = inputs::load_listings(&session, &args.listings).await?;
    let matches = filter_by_city(&listings, &args.city);

    if args.json {
        return render::print_json(&matches);
    }

    println!("{}", render::listings_table(&matches));

    Ok(())
}
