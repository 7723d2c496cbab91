pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Pairs of nodes closer than this are connected in the proximity graph.
pub const DEFAULT_THRESHOLD_KM: f64 = 500.0;

pub const DEFAULT_SPEED_KMH: f64 = 30.0;

pub const DEFAULT_DETOUR_FACTOR: f64 = 1.0;
