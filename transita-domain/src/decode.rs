//! Normalization of the backend's heterogeneous response shapes.
//!
//! The API has grown several generations of payloads: bare arrays vs `{data}`
//! envelopes, scalar vs plural seat fields, `bookingStatus` vs `status`,
//! `tripDetails` vs `trip`. Each decoder enumerates the accepted legacy shapes
//! and fails with [`DomainError::MalformedResponse`] on anything outside that
//! set instead of silently defaulting.

use serde_json::Value;

use crate::models::{Booking, Trip};
use crate::{DomainError, DomainResult};

/// Accepted spellings of the booked-seats field on a trip record, in priority
/// order.
const BOOKED_SEAT_KEYS: [&str; 4] = ["bookedSeats", "bookedSeatNumbers", "seatsBooked", "booked"];

/// Unwraps a list payload: a bare array, an envelope with a `data` array, or
/// anything else (treated as an empty result, not an error).
fn unwrap_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Unwraps a single-record payload: an object with no `id` of its own but a
/// `data` member is an envelope, everything else is the record itself.
fn unwrap_record(value: Value) -> Value {
    match value {
        Value::Object(mut obj) => {
            if !obj.contains_key("id") {
                if let Some(inner) = obj.remove("data") {
                    return inner;
                }
            }
            Value::Object(obj)
        }
        other => other,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn uppercase_field(obj: &mut serde_json::Map<String, Value>, key: &str) {
    if let Some(Value::String(s)) = obj.get(key) {
        let upper = s.to_uppercase();
        if upper.is_empty() {
            obj.remove(key);
        } else {
            obj.insert(key.to_string(), Value::String(upper));
        }
    }
}

/// Rewrites whichever booked-seats spelling is present into a canonical
/// `bookedSeats` string array. A scalar becomes a one-element list; nothing
/// present becomes an empty list.
fn normalize_booked_seats(obj: &mut serde_json::Map<String, Value>) {
    let raw = BOOKED_SEAT_KEYS.iter().find_map(|key| obj.get(*key).cloned());
    for key in BOOKED_SEAT_KEYS {
        obj.remove(key);
    }

    let seats = match raw {
        Some(Value::Array(items)) => items.iter().map(stringify).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(scalar) => vec![stringify(&scalar)],
    };
    obj.insert(
        "bookedSeats".to_string(),
        Value::Array(seats.into_iter().map(Value::String).collect()),
    );
}

fn normalize_trip_value(value: Value) -> DomainResult<Value> {
    let mut obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Err(DomainError::MalformedResponse(format!(
                "expected a trip object, got {}",
                other
            )))
        }
    };
    uppercase_field(&mut obj, "status");
    normalize_booked_seats(&mut obj);
    Ok(Value::Object(obj))
}

/// Decodes a single trip payload, unwrapping the `{data}` envelope and
/// normalizing the booked-seats field.
pub fn decode_trip(value: Value) -> DomainResult<Trip> {
    let normalized = normalize_trip_value(unwrap_record(value))?;
    serde_json::from_value(normalized)
        .map_err(|e| DomainError::MalformedResponse(format!("trip: {}", e)))
}

/// Decodes a trip list; a missing array/envelope yields an empty list.
pub fn decode_trip_list(value: Value) -> DomainResult<Vec<Trip>> {
    unwrap_list(value).into_iter().map(decode_trip).collect()
}

fn normalize_booking_value(value: Value) -> DomainResult<Value> {
    let mut obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Err(DomainError::MalformedResponse(format!(
                "expected a booking object, got {}",
                other
            )))
        }
    };

    // Status arrives as `bookingStatus` or `status`; blank means the backend
    // predates the field and the booking is implicitly confirmed.
    let status = obj
        .remove("bookingStatus")
        .or_else(|| obj.remove("status"))
        .map(|v| stringify(&v).to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "CONFIRMED".to_string());
    obj.insert("status".to_string(), Value::String(status));

    // Seat entries may be numeric; a lone scalar seat becomes a one-element
    // plural list.
    match obj.get("seatNumbers").cloned() {
        Some(Value::Array(items)) => {
            let seats: Vec<Value> = items.iter().map(|v| Value::String(stringify(v))).collect();
            obj.insert("seatNumbers".to_string(), Value::Array(seats));
        }
        _ => {
            let seat = obj.get("seatNumber").filter(|v| !v.is_null()).cloned();
            if let Some(seat) = seat {
                obj.insert(
                    "seatNumbers".to_string(),
                    Value::Array(vec![Value::String(stringify(&seat))]),
                );
            }
        }
    }
    if let Some(seat @ Value::Number(_)) = obj.get("seatNumber").cloned() {
        obj.insert("seatNumber".to_string(), Value::String(stringify(&seat)));
    }

    // The richer `tripDetails` shape and the plain `trip` shape both collapse
    // into one embedded trip record.
    if let Some(details) = obj.remove("tripDetails") {
        obj.insert("trip".to_string(), details);
    }
    if let Some(trip) = obj.remove("trip") {
        if !trip.is_null() {
            obj.insert("trip".to_string(), normalize_trip_value(trip)?);
        }
    }

    // bookingId (stringified, numeric on some generations) falls back to the
    // record's own id, tripId to the embedded trip's id.
    let booking_id = obj
        .get("bookingId")
        .filter(|v| !v.is_null())
        .or_else(|| obj.get("id").filter(|v| !v.is_null()))
        .cloned();
    if let Some(id) = booking_id {
        obj.insert("bookingId".to_string(), Value::String(stringify(&id)));
    }
    if obj.get("tripId").map_or(true, Value::is_null) {
        let trip_id = obj
            .get("trip")
            .and_then(|t| t.get("id"))
            .filter(|v| !v.is_null())
            .cloned();
        if let Some(id) = trip_id {
            obj.insert("tripId".to_string(), id);
        }
    }

    Ok(Value::Object(obj))
}

/// Decodes a single booking. The create endpoint has been seen returning the
/// booking bare, inside `{data}`, or as a one-element array.
pub fn decode_booking(value: Value) -> DomainResult<Booking> {
    let record = match value {
        Value::Array(mut items) if !items.is_empty() => items.remove(0),
        other => unwrap_record(other),
    };
    let normalized = normalize_booking_value(record)?;
    serde_json::from_value(normalized)
        .map_err(|e| DomainError::MalformedResponse(format!("booking: {}", e)))
}

/// Decodes a booking list; a missing array/envelope yields an empty list.
pub fn decode_booking_list(value: Value) -> DomainResult<Vec<Booking>> {
    unwrap_list(value).into_iter().map(decode_booking).collect()
}

/// Decodes the booked-seat-numbers list for a trip, stringifying numeric
/// entries.
pub fn decode_seat_numbers(value: Value) -> Vec<String> {
    unwrap_list(value).iter().map(stringify).collect()
}
