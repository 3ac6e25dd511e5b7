pub mod auth;
pub mod bookings;
pub mod client;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod trips;

pub use auth::{Landing, PasswordResetFlow};
pub use bookings::CancelOutcome;
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use orchestrator::{BookingGateway, BookingOrchestrator, SubmitOutcome, TripDirectory};
pub use trips::{NewTrip, TripFilters};
