//! Trip directory endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use transita_domain::models::flex_time;
use transita_domain::{decode, EntityId, Trip};

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Default)]
pub struct TripFilters {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
}

impl TripFilters {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(origin) = &self.origin {
            params.push(("origin", origin.clone()));
        }
        if let Some(destination) = &self.destination {
            params.push(("destination", destination.clone()));
        }
        if let Some(date) = &self.departure_date {
            params.push(("departureDate", date.clone()));
        }
        params
    }
}

/// Payload for trip creation and update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub origin: String,
    pub destination: String,
    #[serde(with = "flex_time")]
    pub departure_time: DateTime<Utc>,
    #[serde(with = "flex_time")]
    pub arrival_time: DateTime<Utc>,
    pub price: f64,
    pub total_seats: u32,
    pub bus_number: String,
}

pub const MAX_TOTAL_SEATS: u32 = 100;
pub const MIN_BUS_NUMBER_LEN: usize = 3;

impl NewTrip {
    /// Local form validation; failures never reach the server.
    pub fn validate(&self) -> Result<(), String> {
        if self.origin.trim().is_empty() {
            return Err("origin is required".to_string());
        }
        if self.destination.trim().is_empty() {
            return Err("destination is required".to_string());
        }
        if self.price < 0.0 {
            return Err("price must not be negative".to_string());
        }
        if self.total_seats == 0 || self.total_seats > MAX_TOTAL_SEATS {
            return Err(format!("total seats must be 1..={}", MAX_TOTAL_SEATS));
        }
        if self.bus_number.trim().len() < MIN_BUS_NUMBER_LEN {
            return Err(format!(
                "bus number must be at least {} characters",
                MIN_BUS_NUMBER_LEN
            ));
        }
        Ok(())
    }
}

impl ApiClient {
    /// Lists trips, optionally filtered by origin/destination/departure date.
    pub async fn trips(&self, filters: &TripFilters) -> ApiResult<Vec<Trip>> {
        let value = self
            .send_json(self.get("/api/trips").query(&filters.query()))
            .await?;
        Ok(decode::decode_trip_list(value)?)
    }

    /// Trips that have already departed (admin view).
    pub async fn departed_trips(&self) -> ApiResult<Vec<Trip>> {
        let value = self.send_json(self.get("/api/trips/departed")).await?;
        Ok(decode::decode_trip_list(value)?)
    }

    /// Fetches one trip, bypassing any intermediary cache via a uniqueness
    /// query parameter.
    pub async fn trip_by_id(&self, id: &EntityId) -> ApiResult<Trip> {
        let cache_bust = Utc::now().timestamp_millis().to_string();
        let value = self
            .send_json(
                self.get(&format!("/api/trips/{}", id))
                    .query(&[("_", cache_bust)]),
            )
            .await?;
        Ok(decode::decode_trip(value)?)
    }

    pub async fn create_trip(&self, trip: &NewTrip) -> ApiResult<Trip> {
        trip.validate().map_err(ApiError::Validation)?;
        let value = self.send_json(self.post("/api/trips").json(trip)).await?;
        let created = decode::decode_trip(value)?;
        info!(origin = %created.origin, destination = %created.destination, "trip created");
        Ok(created)
    }

    pub async fn update_trip(&self, id: &EntityId, trip: &NewTrip) -> ApiResult<()> {
        trip.validate().map_err(ApiError::Validation)?;
        self.send_unit(self.put(&format!("/api/trips/{}", id)).json(trip))
            .await
    }

    /// Cancelling and deleting share the DELETE endpoint on this backend.
    pub async fn cancel_trip(&self, id: &EntityId) -> ApiResult<()> {
        self.delete_trip(id).await
    }

    pub async fn delete_trip(&self, id: &EntityId) -> ApiResult<()> {
        self.send_unit(self.delete(&format!("/api/trips/{}", id)))
            .await
    }
}
