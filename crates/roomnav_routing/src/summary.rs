use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::DEFAULT_DETOUR_FACTOR,
    geopoint::GeoPoint,
    graph::{NodeKey, WeightedGraph},
    kilometers::Kilometers,
    kmh::Kmh,
    listing::ListingId,
    routing_path::RoutingPath,
    shortest_path_algorithm::ShortestPathResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SummaryParams {
    /// Average travel speed used to derive the ETA
    pub assumed_speed: Kmh,
    /// Multiplier applied to the graph distance before display, `1.0` reports
    /// the straight-line path as is
    pub detour_factor: f64,
}

impl Default for SummaryParams {
    fn default() -> Self {
        SummaryParams {
            assumed_speed: Kmh::default(),
            detour_factor: DEFAULT_DETOUR_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimate {
    Reachable { distance_km: f64, eta_minutes: i64 },
    Unreachable,
}

impl Estimate {
    pub fn from_distance(distance: Kilometers, params: &SummaryParams) -> Estimate {
        if !distance.is_finite() {
            return Estimate::Unreachable;
        }

        let distance_km = distance.value() * params.detour_factor;
        let eta_minutes = (distance_km / params.assumed_speed.value() * 60.0).round() as i64;

        Estimate::Reachable {
            distance_km,
            eta_minutes,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, Estimate::Reachable { .. })
    }

    pub fn distance_badge(&self) -> String {
        match self {
            Estimate::Reachable { distance_km, .. } => format!("{distance_km:.1} km"),
            Estimate::Unreachable => "No path".to_string(),
        }
    }

    pub fn eta_badge(&self) -> String {
        match self {
            Estimate::Reachable { eta_minutes, .. } => format!("{eta_minutes} min"),
            Estimate::Unreachable => "unreachable".to_string(),
        }
    }
}

/// Everything a rendering surface needs for one target listing: the two
/// badges and the polyline from the current position to the listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub target: ListingId,
    pub estimate: Estimate,
    pub path: Vec<NodeKey>,
    pub polyline: Vec<GeoPoint>,
}

impl RouteSummary {
    pub fn new(
        graph: &WeightedGraph,
        result: &ShortestPathResult,
        target: &ListingId,
        params: &SummaryParams,
    ) -> RouteSummary {
        let path = RoutingPath::resolve(graph, result, &NodeKey::Listing(target.clone()));

        RouteSummary {
            target: target.clone(),
            estimate: Estimate::from_distance(path.distance(), params),
            path: path.nodes().to_vec(),
            polyline: path.points().to_vec(),
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} / {}",
            self.target,
            self.estimate.distance_badge(),
            self.estimate.eta_badge()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dijkstra::Dijkstra,
        graph::NodeIdx,
        graph_builder::GraphBuilder,
        shortest_path_algorithm::ShortestPathAlgorithm,
        test_listing_utils::{listing, origin},
    };

    #[test]
    fn eta_uses_assumed_speed() {
        let estimate = Estimate::from_distance(Kilometers::new(15.0), &SummaryParams::default());
        assert_eq!(
            estimate,
            Estimate::Reachable {
                distance_km: 15.0,
                eta_minutes: 30
            }
        );
        assert_eq!(estimate.distance_badge(), "15.0 km");
        assert_eq!(estimate.eta_badge(), "30 min");
    }

    #[test]
    fn eta_rounds_to_nearest_minute() {
        let params = SummaryParams::default();
        // 0.26 km at 30 km/h is 0.52 min
        assert_eq!(
            Estimate::from_distance(Kilometers::new(0.26), &params),
            Estimate::Reachable {
                distance_km: 0.26,
                eta_minutes: 1
            }
        );
        assert_eq!(
            Estimate::from_distance(Kilometers::new(0.2), &params),
            Estimate::Reachable {
                distance_km: 0.2,
                eta_minutes: 0
            }
        );
    }

    #[test]
    fn detour_factor_scales_distance_and_eta() {
        let params = SummaryParams {
            assumed_speed: Kmh::new(30.0),
            detour_factor: 1.2,
        };
        let Estimate::Reachable {
            distance_km,
            eta_minutes,
        } = Estimate::from_distance(Kilometers::new(10.0), &params)
        else {
            panic!("expected a reachable estimate");
        };

        assert!((distance_km - 12.0).abs() < 1e-9);
        assert_eq!(eta_minutes, 24);
    }

    #[test]
    fn unreachable_is_never_zero() {
        let estimate = Estimate::from_distance(Kilometers::INFINITY, &SummaryParams::default());
        assert_eq!(estimate, Estimate::Unreachable);
        assert_eq!(estimate.distance_badge(), "No path");
        assert_eq!(estimate.eta_badge(), "unreachable");
    }

    #[test]
    fn summary_for_reachable_listing() {
        let listings = vec![listing("pg", 0.0, 1.0)];
        let graph = GraphBuilder::default()
            .build(origin(0.0, 0.0), &listings)
            .unwrap();
        let result = Dijkstra.calc_shortest_paths(&graph, NodeIdx::new(0)).unwrap();

        let summary = RouteSummary::new(
            &graph,
            &result,
            &ListingId::from("pg"),
            &SummaryParams::default(),
        );

        assert_eq!(summary.polyline, vec![origin(0.0, 0.0), origin(0.0, 1.0)]);
        assert_eq!(summary.estimate.distance_badge(), "111.2 km");
        assert_eq!(summary.estimate.eta_badge(), "222 min");
        assert_eq!(summary.to_string(), "pg: 111.2 km / 222 min");
    }

    #[test]
    fn summary_serializes_unreachable_status() {
        let graph = GraphBuilder::default().build(origin(0.0, 0.0), &[]).unwrap();
        let result = Dijkstra.calc_shortest_paths(&graph, NodeIdx::new(0)).unwrap();
        let summary = RouteSummary::new(
            &graph,
            &result,
            &ListingId::from("missing"),
            &SummaryParams::default(),
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["estimate"]["status"], "unreachable");
        assert!(summary.polyline.is_empty());
    }
}
