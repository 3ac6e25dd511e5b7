//! Seat-selection state machine for a single trip session.
//!
//! `Idle → SelectingSeats → Submitting → {Succeeded, Failed}`, with `Failed`
//! returning to `SelectingSeats` on the next interaction. Selection state
//! survives a failed submission so the user can retry without re-picking
//! seats.

use std::collections::HashSet;

use transita_domain::{BookingRequest, EntityId, PassengerDetail, SeatNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    SelectingSeats,
    Submitting,
    Succeeded,
    Failed,
}

/// Render state for one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    Booked,
    Selected,
    Available,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please select at least one seat")]
    NoSeatsSelected,

    #[error("Please fill passenger name for each selected seat")]
    IncompletePassengers,
}

#[derive(Debug)]
pub struct SeatSelection {
    trip_id: EntityId,
    booked: HashSet<String>,
    selected: Vec<String>,
    passengers: Vec<PassengerDetail>,
    phase: SelectionPhase,
}

impl SeatSelection {
    pub fn new(trip_id: EntityId) -> Self {
        Self {
            trip_id,
            booked: HashSet::new(),
            selected: Vec::new(),
            passengers: Vec::new(),
            phase: SelectionPhase::Idle,
        }
    }

    pub fn trip_id(&self) -> &EntityId {
        &self.trip_id
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn selected_seats(&self) -> &[String] {
        &self.selected
    }

    pub fn passengers(&self) -> &[PassengerDetail] {
        &self.passengers
    }

    /// Replaces the booked set after a (re)load. Selected seats that turned
    /// out to be booked in the meantime are dropped along with their
    /// passenger rows.
    pub fn set_booked(&mut self, booked: HashSet<String>) {
        self.selected.retain(|s| !booked.contains(s));
        self.passengers
            .retain(|p| !booked.contains(&p.seat_number.to_string()));
        self.booked = booked;
        if self.phase == SelectionPhase::Idle {
            self.phase = SelectionPhase::SelectingSeats;
        }
    }

    pub fn is_booked(&self, seat_number: u32) -> bool {
        self.booked.contains(&seat_number.to_string())
    }

    pub fn is_selected(&self, seat_number: u32) -> bool {
        self.selected.contains(&seat_number.to_string())
    }

    pub fn seat_state(&self, seat_number: u32) -> SeatState {
        if self.is_booked(seat_number) {
            SeatState::Booked
        } else if self.is_selected(seat_number) {
            SeatState::Selected
        } else {
            SeatState::Available
        }
    }

    /// Flips membership of a seat in the selected set. Booked seats are a
    /// no-op. Selecting appends a placeholder passenger for the seat;
    /// deselecting removes the matching passenger. Toggling twice restores
    /// the prior state exactly.
    pub fn toggle_seat(&mut self, seat_number: u32) {
        if self.is_booked(seat_number) {
            return;
        }
        if matches!(self.phase, SelectionPhase::Failed | SelectionPhase::Idle) {
            self.phase = SelectionPhase::SelectingSeats;
        }

        let seat = seat_number.to_string();
        if let Some(idx) = self.selected.iter().position(|s| *s == seat) {
            self.selected.remove(idx);
            self.passengers
                .retain(|p| p.seat_number.to_string() != seat);
        } else {
            self.selected.push(seat);
            self.passengers
                .push(PassengerDetail::placeholder(seat_number));
        }
    }

    /// Fill in the passenger row attached to a selected seat.
    pub fn passenger_mut(&mut self, seat_number: u32) -> Option<&mut PassengerDetail> {
        let seat = seat_number.to_string();
        self.passengers
            .iter_mut()
            .find(|p| p.seat_number.to_string() == seat)
    }

    /// Submission preconditions, checked in order; the first failure wins.
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.selected.is_empty() {
            return Err(SelectionError::NoSeatsSelected);
        }
        let complete = self
            .passengers
            .iter()
            .all(|p| !p.name.trim().is_empty() && p.seat_number.as_u32().is_some());
        if !complete || self.passengers.len() != self.selected.len() {
            return Err(SelectionError::IncompletePassengers);
        }
        Ok(())
    }

    /// Validates and assembles the atomic multi-seat request: seat numbers
    /// stringified, each passenger's seat reference normalized to an integer.
    pub fn build_request(&self) -> Result<BookingRequest, SelectionError> {
        self.validate()?;

        let passenger_details = self
            .passengers
            .iter()
            .map(|p| {
                let mut p = p.clone();
                // validate() guarantees the parse succeeds
                if let Some(n) = p.seat_number.as_u32() {
                    p.seat_number = SeatNumber::Num(n);
                }
                p
            })
            .collect();

        Ok(BookingRequest {
            trip_id: self.trip_id.clone(),
            seat_numbers: self.selected.clone(),
            passenger_details,
        })
    }

    pub fn begin_submit(&mut self) {
        self.phase = SelectionPhase::Submitting;
    }

    /// Server accepted the booking: selection resets to empty; the caller
    /// refreshes the seat map from the server rather than trusting local
    /// state.
    pub fn mark_succeeded(&mut self) {
        self.selected.clear();
        self.passengers.clear();
        self.phase = SelectionPhase::Succeeded;
    }

    /// Server rejected the booking wholesale: selection is preserved for
    /// retry.
    pub fn mark_failed(&mut self) {
        self.phase = SelectionPhase::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transita_domain::Gender;

    fn selection() -> SeatSelection {
        let mut s = SeatSelection::new(EntityId::Num(1));
        s.set_booked(["4".to_string()].into_iter().collect());
        s
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut s = selection();
        s.toggle_seat(2);
        s.passenger_mut(2).unwrap().name = "Ada".to_string();

        let before_seats = s.selected_seats().to_vec();
        let before_passengers = s.passengers().to_vec();

        s.toggle_seat(5);
        s.toggle_seat(5);

        assert_eq!(s.selected_seats(), before_seats.as_slice());
        assert_eq!(s.passengers(), before_passengers.as_slice());
    }

    #[test]
    fn test_toggle_booked_seat_is_noop() {
        let mut s = selection();
        s.toggle_seat(4);
        assert!(s.selected_seats().is_empty());
        assert!(s.passengers().is_empty());
    }

    #[test]
    fn test_selecting_appends_placeholder_passenger() {
        let mut s = selection();
        s.toggle_seat(7);
        let p = &s.passengers()[0];
        assert_eq!(p.name, "");
        assert_eq!(p.age, 0);
        assert_eq!(p.gender, Gender::Other);
        assert_eq!(p.seat_number.as_u32(), Some(7));
    }

    #[test]
    fn test_empty_selection_reported_before_passenger_issues() {
        let s = selection();
        assert_eq!(s.validate(), Err(SelectionError::NoSeatsSelected));
        assert_eq!(
            s.build_request().unwrap_err(),
            SelectionError::NoSeatsSelected
        );
    }

    #[test]
    fn test_missing_passenger_name_blocks_submission() {
        let mut s = selection();
        s.toggle_seat(2);
        s.toggle_seat(5);
        s.passenger_mut(2).unwrap().name = "Ada".to_string();
        // seat 5 passenger left unnamed

        assert_eq!(s.validate(), Err(SelectionError::IncompletePassengers));
    }

    #[test]
    fn test_build_request_normalizes_seat_references() {
        let mut s = selection();
        s.toggle_seat(2);
        s.toggle_seat(5);
        s.passenger_mut(2).unwrap().name = "Ada".to_string();
        let p = s.passenger_mut(5).unwrap();
        p.name = "Grace".to_string();
        p.seat_number = SeatNumber::Str("5".to_string());

        let req = s.build_request().unwrap();
        assert_eq!(req.seat_numbers, vec!["2", "5"]);
        assert!(req
            .passenger_details
            .iter()
            .all(|p| matches!(p.seat_number, SeatNumber::Num(_))));
    }

    #[test]
    fn test_failure_preserves_selection_and_success_resets_it() {
        let mut s = selection();
        s.toggle_seat(2);
        s.passenger_mut(2).unwrap().name = "Ada".to_string();

        s.begin_submit();
        s.mark_failed();
        assert_eq!(s.phase(), SelectionPhase::Failed);
        assert_eq!(s.selected_seats(), ["2".to_string()].as_slice());

        // Failed returns to SelectingSeats on the next interaction
        s.toggle_seat(3);
        assert_eq!(s.phase(), SelectionPhase::SelectingSeats);

        s.begin_submit();
        s.mark_succeeded();
        assert_eq!(s.phase(), SelectionPhase::Succeeded);
        assert!(s.selected_seats().is_empty());
        assert!(s.passengers().is_empty());
    }

    #[test]
    fn test_reload_drops_selection_of_newly_booked_seats() {
        let mut s = selection();
        s.toggle_seat(2);
        s.toggle_seat(3);

        s.set_booked(["2".to_string()].into_iter().collect());
        assert_eq!(s.selected_seats(), ["3".to_string()].as_slice());
        assert_eq!(s.passengers().len(), 1);
    }
}
