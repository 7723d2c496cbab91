mod setup;

use std::convert::Infallible;

use roomnav_position::{
    NoSensor, PositionError, PositionResolver, PositionSource, ResolvedPosition, SensorError,
};
use roomnav_routing::{Estimate, Graph, Kilometers, ListingId, NodeKey};
use roomnav_session::{DistanceSession, Input, SessionConfig, SessionError, StaticListings, Update};
use tokio::sync::oneshot;

use setup::{DelhiGeocoder, DeniedSensor, GatedSensor, delhi, delhi_records, point, record};

fn sensor_fix(lat: f64, lng: f64) -> ResolvedPosition {
    ResolvedPosition {
        position: point(lat, lng),
        source: PositionSource::Sensor,
    }
}

async fn session_with(position: ResolvedPosition, records: Vec<roomnav_routing::ListingRecord>) -> DistanceSession {
    let session = DistanceSession::new(SessionConfig::default());

    session
        .update_position(async { Ok::<_, Infallible>(position) })
        .await
        .unwrap();
    session
        .update_listings(&StaticListings::new(records))
        .await
        .unwrap();

    let computation = session.computation().unwrap();
    assert_eq!(computation.generation(), session.generation());
    session
}

#[tokio::test]
async fn single_listing_within_threshold() {
    let session = session_with(sensor_fix(0.0, 0.0), vec![record("L1", 0.0, 1.0)]).await;

    let summary = session.summary(&ListingId::from("L1")).unwrap();

    match summary.estimate {
        Estimate::Reachable { distance_km, eta_minutes } => {
            assert!((distance_km - 111.2).abs() < 0.1);
            assert_eq!(eta_minutes, 222);
        }
        Estimate::Unreachable => panic!("listing should be reachable"),
    }
    assert_eq!(
        summary.path,
        vec![NodeKey::CurrentPosition, NodeKey::Listing(ListingId::from("L1"))]
    );
    assert_eq!(summary.polyline, vec![point(0.0, 0.0), point(0.0, 1.0)]);
}

#[tokio::test]
async fn far_listings_are_unreachable() {
    let session = session_with(
        sensor_fix(0.0, 0.0),
        vec![record("far-east", 0.0, 10.0), record("far-north", 10.0, 0.0)],
    )
    .await;

    let computation = session.computation().unwrap();
    let node = computation
        .graph()
        .node_index(&NodeKey::Listing(ListingId::from("far-east")))
        .unwrap();
    assert_eq!(computation.result().distance(node), Kilometers::INFINITY);

    let summary = session.summary(&ListingId::from("far-east")).unwrap();
    assert_eq!(summary.estimate, Estimate::Unreachable);
    assert!(summary.path.is_empty());
    assert_eq!(summary.to_string(), "far-east: No path / unreachable");
}

#[tokio::test]
async fn listing_at_current_position() {
    let session = session_with(sensor_fix(12.97, 77.59), vec![record("here", 12.97, 77.59)]).await;

    let summary = session.summary(&ListingId::from("here")).unwrap();

    assert_eq!(
        summary.estimate,
        Estimate::Reachable {
            distance_km: 0.0,
            eta_minutes: 0
        }
    );
    assert_eq!(summary.path.len(), 2);
}

#[tokio::test]
async fn denied_sensor_falls_back_to_place_name() {
    let resolver = PositionResolver::new(DeniedSensor, DelhiGeocoder::default());
    let session = DistanceSession::new(SessionConfig::default());

    let err = session
        .update_position(resolver.resolve_from_sensor())
        .await
        .unwrap_err();
    assert!(matches!(err, PositionError::Sensor(SensorError::PermissionDenied)));
    assert!(err.suggests_manual_entry());
    assert!(session.position().is_none());

    let update = session
        .update_position(resolver.resolve_from_place_name("Delhi"))
        .await
        .unwrap();
    assert!(update.is_applied());
    assert_eq!(session.position().unwrap().position, delhi());

    session
        .update_listings(&StaticListings::new(delhi_records()))
        .await
        .unwrap();

    let summaries = session
        .computation()
        .unwrap()
        .summaries(&session.config().summary_params());
    assert_eq!(summaries.len(), 3);
    assert!(summaries.iter().all(|s| s.estimate.is_reachable()));
}

#[tokio::test]
async fn unknown_target_has_no_path() {
    let session = session_with(sensor_fix(0.0, 0.0), vec![record("L1", 0.0, 1.0)]).await;

    let summary = session.summary(&ListingId::from("nope")).unwrap();

    assert_eq!(summary.estimate, Estimate::Unreachable);
    assert!(summary.path.is_empty());
}

#[tokio::test]
async fn invalid_records_are_skipped() {
    let mut records = delhi_records();
    records.push(roomnav_routing::ListingRecord {
        latitude: None,
        ..record("no-pin", 0.0, 0.0)
    });
    records.push(record("off-planet", 95.0, 0.0));

    let session = session_with(sensor_fix(28.6, 77.2), records).await;

    assert_eq!(session.listings().unwrap().len(), 3);
    assert_eq!(session.computation().unwrap().graph().node_count(), 4);
}

#[tokio::test]
async fn older_position_request_cannot_overwrite_newer_one() {
    let session = DistanceSession::new(SessionConfig::default());
    let (slow_tx, slow_rx) = oneshot::channel::<ResolvedPosition>();
    let (fast_tx, fast_rx) = oneshot::channel::<ResolvedPosition>();

    let slow = session.update_position(async move { slow_rx.await });
    let fast = session.update_position(async move { fast_rx.await });

    let (slow, fast, _) = tokio::join!(slow, fast, async move {
        fast_tx.send(sensor_fix(0.0, 2.0)).unwrap();
        tokio::task::yield_now().await;
        slow_tx.send(sensor_fix(0.0, 1.0)).unwrap();
    });

    assert_eq!(fast.unwrap(), Update::Applied { generation: 1 });
    assert_eq!(slow.unwrap(), Update::Stale);
    assert_eq!(session.position().unwrap().position, point(0.0, 2.0));
}

#[tokio::test]
async fn gated_sensor_completion_after_close_is_ignored() {
    let (sensor, release) = GatedSensor::new();
    let resolver = PositionResolver::new(sensor, DelhiGeocoder::default());
    let session = DistanceSession::new(SessionConfig::default());

    let pending = session.update_position(resolver.resolve_from_sensor());
    let (update, _) = tokio::join!(pending, async {
        session.close();
        release.send(point(1.0, 1.0)).unwrap();
    });

    assert_eq!(update.unwrap(), Update::Closed);
    assert!(session.position().is_none());
    assert!(matches!(session.recompute(), Err(SessionError::Closed)));
    // the resolver itself still saw the fix
    assert_eq!(resolver.last_position().unwrap().position, point(1.0, 1.0));
}

#[tokio::test]
async fn computation_of_outdated_inputs_is_discarded() {
    let session = session_with(sensor_fix(0.0, 0.0), vec![record("L1", 0.0, 1.0)]).await;
    let published = session.computation().unwrap();

    let input = session.snapshot().unwrap();
    let ticket = session.begin(Input::Position);
    session.apply_position(ticket, sensor_fix(0.0, 0.5));

    let computation = input.run(session.config()).unwrap();
    assert_eq!(session.publish(computation), Update::Stale);

    let current = session.computation().unwrap();
    assert!(current.generation() > published.generation());
    assert_eq!(current.generation(), session.generation());
    assert_eq!(current.origin(), point(0.0, 0.5));
}

#[tokio::test]
async fn nothing_is_computed_before_listings_arrive() {
    let session = DistanceSession::new(SessionConfig::default());

    session
        .update_position(async { Ok::<_, Infallible>(sensor_fix(0.0, 0.0)) })
        .await
        .unwrap();

    assert!(matches!(session.recompute(), Err(SessionError::NoListings)));
    assert!(session.computation().is_none());
    assert!(matches!(
        session.summary(&ListingId::from("x")),
        Err(SessionError::NotComputed)
    ));

    session
        .update_listings(&StaticListings::new(Vec::new()))
        .await
        .unwrap();

    let computation = session.computation().unwrap();
    assert!(computation.listings().is_empty());
    assert_eq!(computation.graph().node_count(), 1);
}

#[tokio::test]
async fn new_position_republishes_without_explicit_recompute() {
    let session = session_with(sensor_fix(0.0, 0.0), vec![record("L1", 0.0, 1.0)]).await;
    let before = session.computation().unwrap();

    let update = session
        .update_position(async { Ok::<_, Infallible>(sensor_fix(0.0, 2.0)) })
        .await
        .unwrap();

    let after = session.computation().unwrap();
    assert_eq!(update, Update::Applied { generation: after.generation() });
    assert!(after.generation() > before.generation());
    assert_eq!(after.origin(), point(0.0, 2.0));

    match session.summary(&ListingId::from("L1")).unwrap().estimate {
        Estimate::Reachable { distance_km, .. } => assert!((distance_km - 111.2).abs() < 0.1),
        Estimate::Unreachable => panic!("listing should be reachable"),
    }
}

#[tokio::test]
async fn listings_refresh_uses_latest_snapshot() {
    let session = session_with(sensor_fix(0.0, 0.0), vec![record("L1", 0.0, 1.0)]).await;

    let first = session.begin(Input::Listings);
    let second = session.begin(Input::Listings);

    assert!(session.apply_listings(second, vec![record("L2", 0.0, 2.0)]).is_applied());
    assert_eq!(session.apply_listings(first, vec![record("L3", 0.0, 3.0)]), Update::Stale);

    let summary = session.summary(&ListingId::from("L2")).unwrap();
    assert!(summary.estimate.is_reachable());
    assert_eq!(
        session.summary(&ListingId::from("L1")).unwrap().estimate,
        Estimate::Unreachable
    );
}

#[tokio::test]
async fn no_sensor_reports_capability_unavailable() {
    let resolver = PositionResolver::new(NoSensor, DelhiGeocoder::default());
    let session = DistanceSession::new(SessionConfig::default());

    let err = session
        .update_position(resolver.resolve_from_sensor())
        .await
        .unwrap_err();

    assert!(matches!(err, PositionError::Sensor(SensorError::CapabilityUnavailable)));
}
