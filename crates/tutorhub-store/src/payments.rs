//! CRUD operations for [`Payment`] records, plus the checkout flow.

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    BookingPatch, BookingStatus, NewPayment, Payment, PaymentPatch, PaymentStatus,
};
use crate::store::{Record, Store};

impl Record for Payment {
    const TABLE: &'static str = "payments";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Store {
    pub fn create_payment(&self, new: NewPayment) -> Result<Payment> {
        let payment = Payment {
            id: Uuid::new_v4(),
            parent_id: new.parent_id,
            booking_id: new.booking_id,
            amount: new.amount,
            currency: new.currency,
            payment_method: new.payment_method,
            status: new.status,
            transaction_date: new.transaction_date,
            created_at: Utc::now(),
        };
        self.insert(payment)
    }

    pub fn get_payment(&self, id: Uuid) -> Option<Payment> {
        self.find(id)
    }

    /// Full table scan, insertion order.
    pub fn list_payments(&self) -> Vec<Payment> {
        self.load()
    }

    /// Payments recorded for one parent, insertion order preserved.
    pub fn payments_for_parent(&self, parent_id: Uuid) -> Vec<Payment> {
        self.load::<Payment>()
            .into_iter()
            .filter(|payment| payment.parent_id == parent_id)
            .collect()
    }

    /// Shallow-merge `patch` into the payment. Only the settlement status is
    /// patchable; the amount is immutable once recorded.
    pub fn update_payment(&self, id: Uuid, patch: PaymentPatch) -> Result<Option<Payment>> {
        self.modify(id, |payment: &mut Payment| {
            if let Some(status) = patch.status {
                payment.status = status;
            }
        })
    }

    pub fn delete_payment(&self, id: Uuid) -> Result<bool> {
        self.remove::<Payment>(id)
    }

    /// Settle a booking: flip it to confirmed and record the matching
    /// payment for the booking total.
    ///
    /// The booking update and the payment insert are two independent table
    /// writes; an interruption between them leaves a confirmed booking with
    /// no payment recorded. Single-user, single-session usage bounds that
    /// risk.
    ///
    /// Returns `None` when the booking does not exist.
    pub fn record_checkout(
        &self,
        booking_id: Uuid,
        payment_method: &str,
        currency: &str,
    ) -> Result<Option<Payment>> {
        let Some(booking) = self.get_booking(booking_id) else {
            return Ok(None);
        };

        self.update_booking(
            booking_id,
            BookingPatch {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            },
        )?;

        let payment = self.create_payment(NewPayment {
            parent_id: booking.parent_id,
            booking_id,
            amount: booking.total,
            currency: currency.to_string(),
            payment_method: payment_method.to_string(),
            status: PaymentStatus::Completed,
            transaction_date: Utc::now().date_naive(),
        })?;
        Ok(Some(payment))
    }
}
