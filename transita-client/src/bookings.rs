//! Booking endpoints.

use tracing::info;
use transita_domain::{decode, Booking, BookingRequest, EntityId};

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Result of a gated cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Confirmation gate declined; nothing was sent.
    Aborted,
    Cancelled,
}

impl ApiClient {
    /// Current user's bookings; the backend scopes by the bearer token.
    pub async fn my_bookings(&self) -> ApiResult<Vec<Booking>> {
        let value = self.send_json(self.get("/api/bookings")).await?;
        Ok(decode::decode_booking_list(value)?)
    }

    /// Every booking in the system (admin only).
    pub async fn all_bookings(&self) -> ApiResult<Vec<Booking>> {
        let value = self.send_json(self.get("/api/bookings/all")).await?;
        Ok(decode::decode_booking_list(value)?)
    }

    /// History load routed by role: admins see the global list.
    pub async fn booking_history(&self) -> ApiResult<Vec<Booking>> {
        if self.session().is_admin() {
            self.all_bookings().await
        } else {
            self.my_bookings().await
        }
    }

    /// Currently booked seat numbers for a trip; the backend excludes
    /// cancelled bookings.
    pub async fn booked_seats(&self, trip_id: &EntityId) -> ApiResult<Vec<String>> {
        let value = self
            .send_json(self.get(&format!("/api/bookings/trip/{}/booked-seats", trip_id)))
            .await?;
        Ok(decode::decode_seat_numbers(value))
    }

    /// Submits one atomic multi-seat booking.
    pub async fn create_booking(&self, request: &BookingRequest) -> ApiResult<Booking> {
        let value = self
            .send_json(self.post("/api/bookings").json(request))
            .await?;
        let booking = decode::decode_booking(value)?;
        info!(
            trip = %request.trip_id,
            seats = request.seat_numbers.len(),
            "booking created"
        );
        Ok(booking)
    }

    pub async fn booking_by_id(&self, id: &EntityId) -> ApiResult<Booking> {
        let value = self
            .send_json(self.get(&format!("/api/bookings/{}", id)))
            .await?;
        Ok(decode::decode_booking(value)?)
    }

    pub async fn cancel_booking(&self, id: &EntityId) -> ApiResult<()> {
        self.send_unit(self.delete(&format!("/api/bookings/{}", id)))
            .await
    }

    /// Cancellation behind an explicit confirmation gate. When the gate was
    /// declined nothing is sent; on success the caller reloads the whole
    /// history rather than patching the list locally.
    pub async fn cancel_booking_gated(
        &self,
        id: &EntityId,
        confirmed: bool,
    ) -> ApiResult<CancelOutcome> {
        if !confirmed {
            return Ok(CancelOutcome::Aborted);
        }
        self.cancel_booking(id).await?;
        info!(booking = %id, "booking cancelled");
        Ok(CancelOutcome::Cancelled)
    }
}
