pub mod decode;
pub mod models;

pub use models::{
    Booking, BookingRequest, BookingStatus, EntityId, Gender, PassengerDetail, Seat, SeatNumber,
    Trip, TripStatus,
};

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
