use std::{future::Future, sync::Arc};

use fxhash::FxHashSet;
use parking_lot::Mutex;
use roomnav_position::ResolvedPosition;
use roomnav_routing::{
    Dijkstra, GeoPoint, Listing, ListingId, ListingRecord, RouteSummary, ShortestPathAlgorithm,
    ShortestPathResult, Stopwatch, SummaryParams, WeightedGraph,
};
use tracing::{debug, info, warn};

use crate::{config::SessionConfig, error::SessionError, listings_source::ListingsSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    Position,
    Listings,
}

/// Handed out when an input request starts. Its completion is applied only if
/// no newer request for the same input was started in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    input: Input,
    seq: u64,
}

impl Ticket {
    pub fn input(&self) -> Input {
        self.input
    }
}

/// What happened to a completion handed to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Stored, the session is now at this generation
    Applied { generation: u64 },
    /// Superseded by a newer request or a newer input
    Stale,
    /// The session was closed before the completion arrived
    Closed,
}

impl Update {
    pub fn is_applied(&self) -> bool {
        matches!(self, Update::Applied { .. })
    }
}

/// Inputs of one distance computation, captured at a given generation.
#[derive(Debug, Clone)]
pub struct ComputeInput {
    generation: u64,
    origin: GeoPoint,
    listings: Arc<Vec<Listing>>,
}

impl ComputeInput {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn listings(&self) -> &Arc<Vec<Listing>> {
        &self.listings
    }

    /// Builds the proximity graph and the shortest-path tree from the current
    /// position. Pure, the session is not touched.
    pub fn run(&self, config: &SessionConfig) -> Result<Computation, SessionError> {
        let stopwatch = Stopwatch::new("distance computation");

        let graph = config.graph_builder().build(self.origin, &self.listings)?;
        let source = graph.current_position_node().ok_or(SessionError::NoPosition)?;
        let result = Dijkstra::new().calc_shortest_paths(&graph, source)?;

        stopwatch.report();

        Ok(Computation {
            generation: self.generation,
            origin: self.origin,
            listings: Arc::clone(&self.listings),
            graph,
            result,
        })
    }
}

/// An immutable graph plus shortest-path tree, replaced wholesale on every
/// recomputation.
#[derive(Debug)]
pub struct Computation {
    generation: u64,
    origin: GeoPoint,
    listings: Arc<Vec<Listing>>,
    graph: WeightedGraph,
    result: ShortestPathResult,
}

impl Computation {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn graph(&self) -> &WeightedGraph {
        &self.graph
    }

    pub fn result(&self) -> &ShortestPathResult {
        &self.result
    }

    pub fn summary(&self, target: &ListingId, params: &SummaryParams) -> RouteSummary {
        RouteSummary::new(&self.graph, &self.result, target, params)
    }

    /// Summaries for every listing of the snapshot, in snapshot order.
    pub fn summaries(&self, params: &SummaryParams) -> Vec<RouteSummary> {
        self.listings
            .iter()
            .map(|listing| self.summary(&listing.id, params))
            .collect()
    }
}

struct SessionState {
    closed: bool,
    position: Option<ResolvedPosition>,
    listings: Option<Arc<Vec<Listing>>>,
    position_seq: u64,
    listings_seq: u64,
    generation: u64,
    computation: Option<Arc<Computation>>,
}

/// Owns the latest inputs of the distance view (current position and listings
/// snapshot) and the latest computation derived from them.
///
/// Completions are last-write-wins: every input request takes a [`Ticket`] and
/// only the newest ticket per input may store its result. Every stored input
/// bumps the generation and, once both inputs are known, triggers a full
/// recomputation. A computation is published only if the generation did not
/// move while it ran. Once [`DistanceSession::close`] is called every later
/// completion is ignored.
pub struct DistanceSession {
    config: SessionConfig,
    state: Mutex<SessionState>,
}

impl DistanceSession {
    pub fn new(config: SessionConfig) -> Self {
        DistanceSession {
            config,
            state: Mutex::new(SessionState {
                closed: false,
                position: None,
                listings: None,
                position_seq: 0,
                listings_seq: 0,
                generation: 0,
                computation: None,
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn begin(&self, input: Input) -> Ticket {
        let mut state = self.state.lock();

        let seq = match input {
            Input::Position => {
                state.position_seq += 1;
                state.position_seq
            }
            Input::Listings => {
                state.listings_seq += 1;
                state.listings_seq
            }
        };

        Ticket { input, seq }
    }

    pub fn apply_position(&self, ticket: Ticket, resolved: ResolvedPosition) -> Update {
        let update = self.apply(ticket, Input::Position, |state| state.position = Some(resolved));
        self.recompute_if_ready(update)
    }

    /// Stores a new listings snapshot. Records without usable coordinates and
    /// repeated ids are dropped with a warning.
    pub fn apply_listings(&self, ticket: Ticket, records: Vec<ListingRecord>) -> Update {
        let listings = Arc::new(validate_records(records));
        let update = self.apply(ticket, Input::Listings, |state| state.listings = Some(listings));
        self.recompute_if_ready(update)
    }

    fn recompute_if_ready(&self, update: Update) -> Update {
        if !update.is_applied() {
            return update;
        }

        match self.recompute() {
            Ok(_) | Err(SessionError::NoPosition | SessionError::NoListings | SessionError::Closed) => {}
            Err(err) => warn!("Recomputation failed: {}", err),
        }

        update
    }

    fn apply(&self, ticket: Ticket, input: Input, store: impl FnOnce(&mut SessionState)) -> Update {
        let mut state = self.state.lock();

        if state.closed {
            debug!("Ignoring {:?} completion, session closed", input);
            return Update::Closed;
        }

        let latest = match input {
            Input::Position => state.position_seq,
            Input::Listings => state.listings_seq,
        };
        if ticket.input != input || ticket.seq != latest {
            debug!("Ignoring stale {:?} completion ({} < {})", input, ticket.seq, latest);
            return Update::Stale;
        }

        store(&mut state);
        state.generation += 1;

        Update::Applied {
            generation: state.generation,
        }
    }

    /// Runs a position request under a fresh ticket. Errors are handed back
    /// untouched, the stored position stays as it was.
    pub async fn update_position<F, E>(&self, request: F) -> Result<Update, E>
    where
        F: Future<Output = Result<ResolvedPosition, E>>,
    {
        let ticket = self.begin(Input::Position);
        let resolved = request.await?;
        Ok(self.apply_position(ticket, resolved))
    }

    pub async fn update_listings<L>(&self, source: &L) -> anyhow::Result<Update>
    where
        L: ListingsSource,
    {
        let ticket = self.begin(Input::Listings);
        let records = source.fetch().await?;
        Ok(self.apply_listings(ticket, records))
    }

    pub fn snapshot(&self) -> Result<ComputeInput, SessionError> {
        let state = self.state.lock();

        if state.closed {
            return Err(SessionError::Closed);
        }

        let origin = state
            .position
            .as_ref()
            .map(|resolved| resolved.position)
            .ok_or(SessionError::NoPosition)?;
        let listings = state.listings.as_ref().ok_or(SessionError::NoListings)?;

        Ok(ComputeInput {
            generation: state.generation,
            origin,
            listings: Arc::clone(listings),
        })
    }

    pub fn publish(&self, computation: Computation) -> Update {
        let mut state = self.state.lock();

        if state.closed {
            return Update::Closed;
        }
        if computation.generation != state.generation {
            debug!(
                "Discarding computation of generation {} (now at {})",
                computation.generation, state.generation
            );
            return Update::Stale;
        }

        let generation = computation.generation;
        state.computation = Some(Arc::new(computation));

        Update::Applied { generation }
    }

    /// Snapshot, compute and publish in one go.
    pub fn recompute(&self) -> Result<Update, SessionError> {
        let input = self.snapshot()?;
        let computation = input.run(&self.config)?;

        info!(
            "Computed distances from ({}, {}) to {} listings",
            input.origin.lat(),
            input.origin.lng(),
            input.listings.len()
        );

        Ok(self.publish(computation))
    }

    pub fn summary(&self, target: &ListingId) -> Result<RouteSummary, SessionError> {
        let computation = self.computation().ok_or(SessionError::NotComputed)?;
        Ok(computation.summary(target, &self.config.summary_params()))
    }

    pub fn computation(&self) -> Option<Arc<Computation>> {
        self.state.lock().computation.clone()
    }

    pub fn position(&self) -> Option<ResolvedPosition> {
        self.state.lock().position.clone()
    }

    /// `None` until a listings snapshot was stored.
    pub fn listings(&self) -> Option<Arc<Vec<Listing>>> {
        self.state.lock().listings.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn close(&self) {
        let mut state = self.state.lock();
        if !state.closed {
            debug!("Closing distance session at generation {}", state.generation);
            state.closed = true;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

fn validate_records(records: Vec<ListingRecord>) -> Vec<Listing> {
    let total = records.len();
    let mut seen = FxHashSet::default();
    let mut listings = Vec::with_capacity(total);

    for record in records {
        match Listing::try_from(record) {
            Ok(listing) => {
                if seen.insert(listing.id.clone()) {
                    listings.push(listing);
                } else {
                    warn!("Skipping duplicate listing {}", listing.id);
                }
            }
            Err(err) => warn!("Skipping listing: {}", err),
        }
    }

    if listings.len() < total {
        info!("Kept {} of {} listings", listings.len(), total);
    }

    listings
}
