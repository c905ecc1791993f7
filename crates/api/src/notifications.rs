//! Booking confirmations.
//!
//! Delivery is behind the [`Notifier`] trait so that a mail transport can be
//! plugged in without touching the handlers. Failures are reported to the
//! caller, which logs them; they never change the outcome of an admission.

use async_trait::async_trait;
use clinicbook_core::{errors::BookingResult, models::booking::Booking};
use tracing::info;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn booking_confirmed(&self, booking: &Booking, recipients: &[String]) -> BookingResult<()>;
}

/// Writes confirmations to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn booking_confirmed(&self, booking: &Booking, recipients: &[String]) -> BookingResult<()> {
        info!(
            booking_id = %booking.id,
            service = %booking.service,
            date = %booking.date,
            time = %booking.time,
            "Booking confirmation for {}",
            recipients.join(", ")
        );
        Ok(())
    }
}
