use clap::Args;
use roomnav_routing::{Estimate, Kmh};
use roomnav_session::{DistanceSession, SessionConfig};
use tracing::info;

use crate::{
    inputs::{self, ListingsArgs, PositionArgs},
    parsers, render,
};

#[derive(Args, Debug)]
pub struct DistanceArgs {
    #[command(flatten)]
    pub listings: ListingsArgs,

    #[command(flatten)]
    pub position: PositionArgs,

    /// Only report this listing
    #[arg(short, long)]
    pub target: Option<String>,

    /// Listings at least this far apart (km) are not connected
    #[arg(long, value_parser = parsers::parse_positive)]
    pub threshold: Option<f64>,

    /// Average travel speed (km/h) used for the ETA
    #[arg(long, value_parser = parsers::parse_positive)]
    pub speed: Option<f64>,

    /// Multiplier applied to straight-line distances (e.g. 1.2 for roads)
    #[arg(long, value_parser = parsers::parse_positive)]
    pub detour: Option<f64>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

fn session_config(args: &DistanceArgs) -> Result<SessionConfig, anyhow::Error> {
    let mut config = SessionConfig::from_env()?;

    if let Some(threshold) = args.threshold {
        config.threshold = threshold.into();
    }
    if let Some(speed) = args.speed {
        config.assumed_speed = Kmh::new(speed);
    }
    if let Some(detour) = args.detour {
        config.detour_factor = detour;
    }

    Ok(config)
}

fn sort_key(estimate: &Estimate) -> f64 {
    match estimate {
        Estimate::Reachable { distance_km, .. } => *distance_km,
        Estimate::Unreachable => f64::INFINITY,
    }
}

pub async fn run(args: DistanceArgs) -> Result<(), anyhow::Error> {
    let session = DistanceSession::new(session_config(&args)?);

    inputs::resolve_position(&session, &args.position).await?;
    inputs::load_listings(&session, &args.listings).await?;

    let computation = session
        .computation()
        .ok_or_else(|| anyhow::anyhow!("No distances computed"))?;
    let params = session.config().summary_params();

    let mut rows: Vec<_> = computation
        .listings()
        .iter()
        .filter(|listing| {
            args.target
                .as_deref()
                .is_none_or(|target| listing.id.as_str() == target)
        })
        .map(|listing| (listing, computation.summary(&listing.id, &params)))
        .collect();

    if rows.is_empty() {
        if let Some(target) = &args.target {
            anyhow::bail!("Listing {target} not found or has no coordinates");
        }
        info!("No listings with coordinates");
    }

    rows.sort_by(|(a, sa), (b, sb)| {
        sort_key(&sa.estimate)
            .total_cmp(&sort_key(&sb.estimate))
            .then_with(|| a.id.cmp(&b.id))
    });

    if args.json {
        let summaries: Vec<_> = rows.iter().map(|(_, summary)| summary).collect();
        return render::print_json(&summaries);
    }

    println!("{}", render::summaries_table(&rows));

    if let [(_, summary)] = rows.as_slice() {
        info!("{}", summary);
    }

    Ok(())
}
