//! Seat-map loading and booking submission for a single trip session.
//!
//! The server is the sole source of truth for seat occupancy: every load and
//! every successful booking re-derives the seat map from the server rather
//! than trusting optimistic local state. Superseded in-flight loads are
//! discarded by generation token instead of racing to overwrite fresher data.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{info, warn};
use transita_booking::{build_grid, compute_seats, SeatSelection, SeatState, SelectionError};
use transita_booking::seatmap::DEFAULT_COLUMNS_PER_ROW;
use transita_core::SessionStore;
use transita_domain::{Booking, BookingRequest, EntityId, Gender, Seat, Trip};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[async_trait]
pub trait TripDirectory: Send + Sync {
    async fn trip_by_id(&self, id: &EntityId) -> ApiResult<Trip>;
}

#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn booked_seats(&self, trip_id: &EntityId) -> ApiResult<Vec<String>>;
    async fn create_booking(&self, request: &BookingRequest) -> ApiResult<Booking>;
}

#[async_trait]
impl TripDirectory for ApiClient {
    async fn trip_by_id(&self, id: &EntityId) -> ApiResult<Trip> {
        ApiClient::trip_by_id(self, id).await
    }
}

#[async_trait]
impl BookingGateway for ApiClient {
    async fn booked_seats(&self, trip_id: &EntityId) -> ApiResult<Vec<String>> {
        ApiClient::booked_seats(self, trip_id).await
    }

    async fn create_booking(&self, request: &BookingRequest) -> ApiResult<Booking> {
        ApiClient::create_booking(self, request).await
    }
}

/// Renderable snapshot of one trip's seat map.
#[derive(Debug, Clone)]
pub struct SeatMapView {
    pub trip: Trip,
    pub grid: Vec<Vec<u32>>,
    pub seats: Vec<Seat>,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Confirmed(Booking),
    /// Local precondition failed; nothing was sent.
    Rejected(SelectionError),
    /// No live session; the caller redirects to login instead of submitting.
    AuthRequired,
}

struct FlowState {
    view: Option<SeatMapView>,
    selection: SeatSelection,
}

pub struct BookingOrchestrator<A> {
    api: A,
    session: Arc<SessionStore>,
    trip_id: EntityId,
    generation: AtomicU64,
    state: Mutex<FlowState>,
}

impl<A> BookingOrchestrator<A>
where
    A: TripDirectory + BookingGateway,
{
    pub fn new(api: A, session: Arc<SessionStore>, trip_id: EntityId) -> Self {
        Self {
            api,
            session,
            trip_id: trip_id.clone(),
            generation: AtomicU64::new(0),
            state: Mutex::new(FlowState {
                view: None,
                selection: SeatSelection::new(trip_id),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetches the trip and its booked seats and rebuilds the seat map. The
    /// booked-seats lookup is authoritative over the trip record's own field;
    /// if it fails the map falls open to all-available rather than blocking
    /// selection. A load superseded by a newer one is discarded.
    pub async fn load_seat_map(&self) -> ApiResult<SeatMapView> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let trip = self.api.trip_by_id(&self.trip_id).await?;
        let seat_trip_id = trip.effective_id().unwrap_or(&self.trip_id).clone();

        let booked: HashSet<String> = match self.api.booked_seats(&seat_trip_id).await {
            Ok(seats) => seats.into_iter().collect(),
            Err(e) => {
                warn!(trip = %seat_trip_id, error = %e, "booked-seats lookup failed, showing all seats available");
                HashSet::new()
            }
        };

        let view = SeatMapView {
            grid: build_grid(trip.total_seats, DEFAULT_COLUMNS_PER_ROW),
            seats: compute_seats(trip.total_seats, &booked),
            trip,
        };

        let mut state = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            info!(trip = %self.trip_id, "discarding superseded seat-map load");
            return Ok(state.view.clone().unwrap_or(view));
        }
        state.selection.set_booked(booked);
        state.view = Some(view.clone());
        Ok(view)
    }

    pub fn view(&self) -> Option<SeatMapView> {
        self.lock().view.clone()
    }

    pub fn toggle_seat(&self, seat_number: u32) {
        self.lock().selection.toggle_seat(seat_number);
    }

    pub fn seat_state(&self, seat_number: u32) -> SeatState {
        self.lock().selection.seat_state(seat_number)
    }

    pub fn selected_seats(&self) -> Vec<String> {
        self.lock().selection.selected_seats().to_vec()
    }

    /// Fills in the passenger row for a selected seat.
    pub fn set_passenger(&self, seat_number: u32, name: &str, age: u32, gender: Gender) {
        let mut state = self.lock();
        if let Some(p) = state.selection.passenger_mut(seat_number) {
            p.name = name.to_string();
            p.age = age;
            p.gender = gender;
        }
    }

    /// Runs the submission pipeline. Preconditions in order: non-empty
    /// selection, complete passenger rows, live session. On success the
    /// selection resets and the seat map is re-fetched from the server; on
    /// rejection the selection is preserved for retry.
    pub async fn submit(&self) -> ApiResult<SubmitOutcome> {
        let request = {
            let mut state = self.lock();
            let request = match state.selection.build_request() {
                Ok(request) => request,
                Err(e) => return Ok(SubmitOutcome::Rejected(e)),
            };
            if !self.session.is_logged_in() {
                return Ok(SubmitOutcome::AuthRequired);
            }
            state.selection.begin_submit();
            request
        };

        match self.api.create_booking(&request).await {
            Ok(booking) => {
                self.lock().selection.mark_succeeded();
                if let Err(e) = self.load_seat_map().await {
                    warn!(trip = %self.trip_id, error = %e, "seat-map refresh after booking failed");
                }
                Ok(SubmitOutcome::Confirmed(booking))
            }
            Err(e) => {
                self.lock().selection.mark_failed();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    fn trip(total_seats: u32) -> Trip {
        Trip {
            id: Some(EntityId::Num(1)),
            trip_id: None,
            origin: "Austin".to_string(),
            destination: "Dallas".to_string(),
            departure_time: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            price: 35.0,
            total_seats,
            bus_number: "TX-114".to_string(),
            status: Default::default(),
            available_seats: None,
            booked_seats: Vec::new(),
        }
    }

    fn live_session() -> Arc<SessionStore> {
        let session = Arc::new(SessionStore::new());
        let token = encode(
            &Header::default(),
            &json!({ "id": 7, "role": "USER", "exp": Utc::now().timestamp() + 3600 }),
            &EncodingKey::from_secret(b"test"),
        )
        .unwrap();
        session.save_token(token);
        session
    }

    /// Gateway fake: configurable booked seats, records create calls.
    struct StubApi {
        trip: Trip,
        booked: Mutex<Vec<String>>,
        create_calls: AtomicUsize,
        seats_fail: bool,
    }

    impl StubApi {
        fn new(trip: Trip, booked: &[&str]) -> Self {
            Self {
                trip,
                booked: Mutex::new(booked.iter().map(|s| s.to_string()).collect()),
                create_calls: AtomicUsize::new(0),
                seats_fail: false,
            }
        }
    }

    #[async_trait]
    impl TripDirectory for StubApi {
        async fn trip_by_id(&self, _id: &EntityId) -> ApiResult<Trip> {
            Ok(self.trip.clone())
        }
    }

    #[async_trait]
    impl BookingGateway for StubApi {
        async fn booked_seats(&self, _trip_id: &EntityId) -> ApiResult<Vec<String>> {
            if self.seats_fail {
                return Err(crate::ApiError::Status {
                    status: 500,
                    message: String::new(),
                });
            }
            Ok(self.booked.lock().unwrap().clone())
        }

        async fn create_booking(&self, request: &BookingRequest) -> ApiResult<Booking> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.booked
                .lock()
                .unwrap()
                .extend(request.seat_numbers.iter().cloned());
            Ok(Booking {
                id: Some(EntityId::Num(99)),
                booking_id: Some("99".to_string()),
                trip_id: Some(request.trip_id.clone()),
                user_id: None,
                seat_number: None,
                seat_numbers: Some(request.seat_numbers.clone()),
                status: Default::default(),
                booking_date: None,
                total_price: None,
                passenger_details: request.passenger_details.clone(),
                trip: None,
            })
        }
    }

    fn orchestrator(api: StubApi, session: Arc<SessionStore>) -> BookingOrchestrator<StubApi> {
        BookingOrchestrator::new(api, session, EntityId::Num(1))
    }

    #[tokio::test]
    async fn test_load_builds_grid_and_seats() {
        let orch = orchestrator(StubApi::new(trip(10), &["3"]), live_session());
        let view = orch.load_seat_map().await.unwrap();

        assert_eq!(view.grid.len(), 3);
        assert_eq!(view.seats.len(), 10);
        assert!(view.seats[2].is_booked);
        assert_eq!(orch.seat_state(3), SeatState::Booked);
        assert_eq!(orch.seat_state(4), SeatState::Available);
    }

    #[tokio::test]
    async fn test_booked_seat_lookup_failure_falls_open() {
        let mut api = StubApi::new(trip(4), &["1"]);
        api.seats_fail = true;
        let orch = orchestrator(api, live_session());

        let view = orch.load_seat_map().await.unwrap();
        assert!(view.seats.iter().all(|s| !s.is_booked));
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_selection_without_network() {
        let orch = orchestrator(StubApi::new(trip(10), &[]), live_session());
        orch.load_seat_map().await.unwrap();

        let outcome = orch.submit().await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Rejected(SelectionError::NoSeatsSelected)
        ));
        assert_eq!(orch.api.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_incomplete_passengers_without_network() {
        let orch = orchestrator(StubApi::new(trip(10), &[]), live_session());
        orch.load_seat_map().await.unwrap();
        orch.toggle_seat(2);
        orch.toggle_seat(5);
        orch.set_passenger(2, "Ada", 30, Gender::Female);
        // seat 5 passenger left unnamed

        let outcome = orch.submit().await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Rejected(SelectionError::IncompletePassengers)
        ));
        assert_eq!(orch.api.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_without_session_requires_auth() {
        let orch = orchestrator(
            StubApi::new(trip(10), &[]),
            Arc::new(SessionStore::new()),
        );
        orch.load_seat_map().await.unwrap();
        orch.toggle_seat(2);
        orch.set_passenger(2, "Ada", 30, Gender::Female);

        let outcome = orch.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::AuthRequired));
        assert_eq!(orch.api.create_calls.load(Ordering::SeqCst), 0);
        // selection preserved for after login
        assert_eq!(orch.selected_seats(), vec!["2".to_string()]);
    }

    #[tokio::test]
    async fn test_successful_submit_resets_and_refreshes_from_server() {
        let orch = orchestrator(StubApi::new(trip(10), &[]), live_session());
        orch.load_seat_map().await.unwrap();
        orch.toggle_seat(3);
        orch.toggle_seat(7);
        orch.set_passenger(3, "Ada", 30, Gender::Female);
        orch.set_passenger(7, "Grace", 41, Gender::Female);

        let outcome = orch.submit().await.unwrap();
        let SubmitOutcome::Confirmed(booking) = outcome else {
            panic!("expected confirmation");
        };
        assert_eq!(booking.seats(), vec!["3", "7"]);

        assert!(orch.selected_seats().is_empty());
        // refreshed map reflects the server's view of occupancy
        let view = orch.view().unwrap();
        assert!(view.seats[2].is_booked);
        assert!(view.seats[6].is_booked);
        assert_eq!(orch.seat_state(3), SeatState::Booked);
    }

    /// Gateway whose first booked-seats call blocks until released, so an
    /// older load can finish after a newer one.
    struct SlowFirstApi {
        trip: Trip,
        gate: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TripDirectory for SlowFirstApi {
        async fn trip_by_id(&self, _id: &EntityId) -> ApiResult<Trip> {
            Ok(self.trip.clone())
        }
    }

    #[async_trait]
    impl BookingGateway for SlowFirstApi {
        async fn booked_seats(&self, _trip_id: &EntityId) -> ApiResult<Vec<String>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                let rx = self.gate.lock().await.take();
                if let Some(rx) = rx {
                    let _ = rx.await;
                }
                // stale answer from before a concurrent booking
                Ok(vec!["1".to_string()])
            } else {
                Ok(vec!["1".to_string(), "2".to_string()])
            }
        }

        async fn create_booking(&self, _request: &BookingRequest) -> ApiResult<Booking> {
            unreachable!("not exercised in this test");
        }
    }

    #[tokio::test]
    async fn test_superseded_load_does_not_overwrite_fresher_seat_map() {
        let (tx, rx) = oneshot::channel();
        let api = SlowFirstApi {
            trip: trip(4),
            gate: tokio::sync::Mutex::new(Some(rx)),
            calls: AtomicUsize::new(0),
        };
        let orch = Arc::new(BookingOrchestrator::new(
            api,
            live_session(),
            EntityId::Num(1),
        ));

        let slow = {
            let orch = Arc::clone(&orch);
            tokio::spawn(async move { orch.load_seat_map().await })
        };
        // let the slow load take its generation and park on the gate
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let fresh = orch.load_seat_map().await.unwrap();
        assert!(fresh.seats[1].is_booked);

        tx.send(()).unwrap();
        slow.await.unwrap().unwrap();

        // the stale response must not have overwritten the fresher view
        let view = orch.view().unwrap();
        assert!(view.seats[0].is_booked);
        assert!(view.seats[1].is_booked);
    }
}
