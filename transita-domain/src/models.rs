use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier. The backend is inconsistent about whether ids
/// arrive as JSON numbers or strings, so both are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Num(i64),
    Str(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Num(n) => write!(f, "{}", n),
            EntityId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Num(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Str(s.to_string())
    }
}

/// Trip lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    #[default]
    Active,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Active => "ACTIVE",
            TripStatus::Cancelled => "CANCELLED",
        }
    }
}

/// A scheduled journey with fixed seat capacity, price, and route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<EntityId>,
    pub origin: String,
    pub destination: String,
    #[serde(with = "flex_time")]
    pub departure_time: DateTime<Utc>,
    #[serde(with = "flex_time")]
    pub arrival_time: DateTime<Utc>,
    pub price: f64,
    pub total_seats: u32,
    pub bus_number: String,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_seats: Option<u32>,
    #[serde(default)]
    pub booked_seats: Vec<String>,
}

impl Trip {
    /// Some endpoints populate `id`, others `tripId`.
    pub fn effective_id(&self) -> Option<&EntityId> {
        self.id.as_ref().or(self.trip_id.as_ref())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// A seat reference as it travels on the wire: either a number or its
/// stringified form, depending on which side produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeatNumber {
    Num(u32),
    Str(String),
}

impl SeatNumber {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            SeatNumber::Num(n) => Some(*n),
            SeatNumber::Str(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatNumber::Num(n) => write!(f, "{}", n),
            SeatNumber::Str(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerDetail {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub seat_number: SeatNumber,
}

impl PassengerDetail {
    /// Placeholder appended when a seat is first selected; filled in by the
    /// passenger form before submission.
    pub fn placeholder(seat_number: u32) -> Self {
        Self {
            name: String::new(),
            age: 0,
            gender: Gender::Other,
            seat_number: SeatNumber::Num(seat_number),
        }
    }
}

/// One atomic multi-seat booking submission. The server accepts or rejects
/// the whole request; there is no partial-seat commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub trip_id: EntityId,
    pub seat_numbers: Vec<String>,
    pub passenger_details: Vec<PassengerDetail>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Unknown => "UNKNOWN",
        }
    }
}

/// A server-confirmed reservation. The client only ever holds a read-only,
/// possibly stale copy; any mutating call invalidates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_numbers: Option<Vec<String>>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, with = "flex_time_opt", skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub passenger_details: Vec<PassengerDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip: Option<Trip>,
}

impl Booking {
    /// Identifier shown to the user: explicit bookingId, else stringified id.
    pub fn display_id(&self) -> Option<String> {
        self.booking_id
            .clone()
            .or_else(|| self.id.as_ref().map(|id| id.to_string()))
    }

    /// Seat numbers regardless of whether the server sent the singular or
    /// the plural field.
    pub fn seats(&self) -> Vec<String> {
        if let Some(seats) = &self.seat_numbers {
            if !seats.is_empty() {
                return seats.clone();
            }
        }
        self.seat_number.clone().into_iter().collect()
    }
}

/// Derived seat-map entry; never persisted, always rebuilt from
/// (totalSeats, bookedSeatSet).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub seat_number: String,
    pub is_booked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<EntityId>,
}

/// User record embedded in the sign-in response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// Timestamp codec tolerating both RFC 3339 and the backend's bare
/// `YYYY-MM-DDTHH:MM:SS` form (interpreted as UTC).
pub mod flex_time {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|n| Utc.from_utc_datetime(&n))
            })
    }

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }
}

pub mod flex_time_opt {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => super::flex_time::parse(s).map(Some).map_err(de::Error::custom),
        }
    }
}
