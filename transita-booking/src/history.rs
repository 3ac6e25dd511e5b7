//! Client-side search over the booking history.
//!
//! All matching is case-insensitive substring matching against stringified
//! field values. The list itself is server-owned; after a cancellation the
//! caller reloads the whole thing instead of patching locally.

use transita_domain::{Booking, BookingStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    All,
    Passenger,
    Id,
    Destination,
    Origin,
    Status,
    Date,
    Seats,
    Price,
}

impl SearchField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "all" => Some(SearchField::All),
            "passenger" => Some(SearchField::Passenger),
            "id" => Some(SearchField::Id),
            "destination" => Some(SearchField::Destination),
            "origin" => Some(SearchField::Origin),
            "status" => Some(SearchField::Status),
            "date" => Some(SearchField::Date),
            "seats" => Some(SearchField::Seats),
            "price" => Some(SearchField::Price),
            _ => None,
        }
    }
}

/// Filters a booking list. A blank or whitespace-only term is a no-op that
/// returns the full list.
pub fn search(bookings: &[Booking], term: &str, field: SearchField) -> Vec<Booking> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return bookings.to_vec();
    }

    bookings
        .iter()
        .filter(|b| matches_field(b, &term, field))
        .cloned()
        .collect()
}

fn matches_field(booking: &Booking, term: &str, field: SearchField) -> bool {
    match field {
        SearchField::Passenger => matches_passenger(booking, term),
        SearchField::Id => matches_id(booking, term),
        SearchField::Destination => matches_destination(booking, term),
        SearchField::Origin => matches_origin(booking, term),
        SearchField::Status => matches_status(booking, term),
        SearchField::Date => matches_date(booking, term),
        SearchField::Seats => matches_seats(booking, term),
        SearchField::Price => matches_price(booking, term),
        // OR across every single-field matcher, not AND
        SearchField::All => {
            matches_passenger(booking, term)
                || matches_id(booking, term)
                || matches_destination(booking, term)
                || matches_origin(booking, term)
                || matches_status(booking, term)
                || matches_date(booking, term)
                || matches_seats(booking, term)
                || matches_price(booking, term)
        }
    }
}

fn matches_passenger(booking: &Booking, term: &str) -> bool {
    booking.passenger_details.iter().any(|p| {
        p.name.to_lowercase().contains(term)
            || p.gender.as_str().contains(term)
            || p.age.to_string().contains(term)
    })
}

fn matches_id(booking: &Booking, term: &str) -> bool {
    booking
        .display_id()
        .map(|id| id.to_lowercase().contains(term))
        .unwrap_or(false)
}

fn matches_destination(booking: &Booking, term: &str) -> bool {
    booking
        .trip
        .as_ref()
        .map(|t| t.destination.to_lowercase().contains(term))
        .unwrap_or(false)
}

fn matches_origin(booking: &Booking, term: &str) -> bool {
    booking
        .trip
        .as_ref()
        .map(|t| t.origin.to_lowercase().contains(term))
        .unwrap_or(false)
}

fn matches_status(booking: &Booking, term: &str) -> bool {
    booking.status.as_str().to_lowercase().contains(term)
}

/// Matches against both the date and the time rendering of the booking
/// timestamp, mirroring what the history table shows.
fn matches_date(booking: &Booking, term: &str) -> bool {
    let Some(date) = booking.booking_date else {
        return false;
    };
    let date_string = date.format("%-m/%-d/%Y").to_string();
    let time_string = date.format("%-I:%M:%S %p").to_string();
    date_string.contains(term) || time_string.to_lowercase().contains(term)
}

fn matches_seats(booking: &Booking, term: &str) -> bool {
    booking.seats().iter().any(|s| s.to_lowercase().contains(term))
}

fn matches_price(booking: &Booking, term: &str) -> bool {
    booking
        .total_price
        .map(|p| p.to_string().contains(term))
        .unwrap_or(false)
}

/// A booking can be cancelled unless it already is.
pub fn can_cancel(booking: &Booking) -> bool {
    booking.status != BookingStatus::Cancelled
}
