use comfy_table::{Table, presets::UTF8_FULL};
use roomnav_routing::{Estimate, Listing, NearbyListing, RouteSummary, SummaryParams};
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    table
}

fn hops(summary: &RouteSummary) -> String {
    match summary.path.len() {
        0 => "-".to_string(),
        len => (len - 1).to_string(),
    }
}

pub fn summaries_table(rows: &[(&Listing, RouteSummary)]) -> Table {
    let mut table = new_table(vec!["Listing", "Id", "City", "Distance", "ETA", "Hops"]);

    for (listing, summary) in rows {
        table.add_row(vec![
            listing.display_name.clone(),
            listing.id.to_string(),
            listing.city.clone().unwrap_or_default(),
            summary.estimate.distance_badge(),
            summary.estimate.eta_badge(),
            hops(summary),
        ]);
    }

    table
}

pub fn nearby_table(nearby: &[NearbyListing<'_>], params: &SummaryParams) -> Table {
    let mut table = new_table(vec!["Listing", "Id", "City", "Distance", "ETA"]);

    for item in nearby {
        let estimate = Estimate::from_distance(item.distance, params);
        table.add_row(vec![
            item.listing.display_name.clone(),
            item.listing.id.to_string(),
            item.listing.city.clone().unwrap_or_default(),
            estimate.distance_badge(),
            estimate.eta_badge(),
        ]);
    }

    table
}

pub fn listings_table(listings: &[&Listing]) -> Table {
    let mut table = new_table(vec!["Listing", "Id", "City", "Area", "Latitude", "Longitude"]);

    for listing in listings {
        table.add_row(vec![
            listing.display_name.clone(),
            listing.id.to_string(),
            listing.city.clone().unwrap_or_default(),
            listing.area.clone().unwrap_or_default(),
            format!("{:.5}", listing.position.lat()),
            format!("{:.5}", listing.position.lng()),
        ]);
    }

    table
}
