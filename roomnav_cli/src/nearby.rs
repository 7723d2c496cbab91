use clap::Args;
use roomnav_routing::{Kilometers, ListingIndex};
use roomnav_session::{DistanceSession, SessionConfig};

use crate::{
    inputs::{self, ListingsArgs, PositionArgs},
    parsers, render,
};

#[derive(Args, Debug)]
pub struct NearbyArgs {
    #[command(flatten)]
    pub listings: ListingsArgs,

    #[command(flatten)]
    pub position: PositionArgs,

    /// Search radius in kilometers
    #[arg(short, long, default_value_t = 10.0, value_parser = parsers::parse_positive)]
    pub radius: f64,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: NearbyArgs) -> Result<(), anyhow::Error> {
    let session = DistanceSession::new(SessionConfig::from_env()?);

    let origin = inputs::resolve_position(&session, &args.position).await?;
    let listings = inputs::load_listings(&session, &args.listings).await?;
    let index = ListingIndex::new(&listings);
    let nearby = index.within_radius(&origin, Kilometers::new(args.radius));

    if args.json {
        return render::print_json(&nearby);
    }

    println!(
        "{}",
        render::nearby_table(&nearby, &session.config().summary_params())
    );
    println!("{} of {} listings within {}", nearby.len(), index.len(), Kilometers::new(args.radius));

    Ok(())
}
