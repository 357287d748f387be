//! Parent-facing portal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use tutorhub_store::{
    conversation_id_for, Account, AccountPatch, AccountRole, Booking, BookingPatch,
    BookingStatus, ConversationSummary, LessonType, Message, MonthlySpend, NewBooking,
    NewMessage, ParentAnnouncement, Payment, Store,
};

use crate::error::{require, Result};

/// Caller-supplied details of a lesson booking. The parent identity comes
/// from the portal itself.
#[derive(Debug, Clone)]
pub struct LessonRequest {
    pub student_name: String,
    pub subject: String,
    pub date: NaiveDate,
    pub slot: String,
    pub lesson_type: LessonType,
    pub hours: u32,
    pub rate_per_hour: Decimal,
}

/// Profile fields a parent may change about themselves.
#[derive(Debug, Clone, Default)]
pub struct ParentProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// Entry point for a signed-in parent.
///
/// Every operation is scoped to the bound parent id: records owned by other
/// parents are invisible here, and mutating one reports absence rather than
/// touching it.
#[derive(Debug)]
pub struct ParentPortal<'a> {
    store: &'a Store,
    parent_id: Uuid,
}

impl<'a> ParentPortal<'a> {
    pub fn new(store: &'a Store, parent_id: Uuid) -> Self {
        Self { store, parent_id }
    }

    // ------------------------------------------------------------------
    // Bookings & payments
    // ------------------------------------------------------------------

    /// Book a lesson. Student name, subject and slot must be non-empty.
    ///
    /// The chosen subject is not checked against any tutor's offering —
    /// referenced data is advisory.
    pub fn book_lesson(&self, request: LessonRequest) -> Result<Booking> {
        require("studentName", &request.student_name)?;
        require("subject", &request.subject)?;
        require("slot", &request.slot)?;

        let booking = self.store.create_booking(NewBooking {
            parent_id: self.parent_id,
            student_name: request.student_name,
            subject: request.subject,
            date: request.date,
            slot: request.slot,
            lesson_type: request.lesson_type,
            hours: request.hours,
            rate_per_hour: request.rate_per_hour,
        })?;
        info!(booking = %booking.id, subject = %booking.subject, "lesson booked");
        Ok(booking)
    }

    /// This parent's bookings, most recent lesson date first.
    pub fn my_bookings(&self) -> Vec<Booking> {
        self.store.bookings_for_parent(self.parent_id)
    }

    /// Cancel one of this parent's bookings. Somebody else's booking — or a
    /// missing one — comes back as `None`.
    pub fn cancel_booking(&self, booking_id: Uuid) -> Result<Option<Booking>> {
        if !self.owns_booking(booking_id) {
            return Ok(None);
        }
        Ok(self.store.update_booking(
            booking_id,
            BookingPatch {
                status: Some(BookingStatus::Cancelled),
                ..Default::default()
            },
        )?)
    }

    /// Pay for one of this parent's bookings: the booking flips to
    /// confirmed and a completed payment for its total is recorded.
    pub fn checkout(
        &self,
        booking_id: Uuid,
        payment_method: &str,
        currency: &str,
    ) -> Result<Option<Payment>> {
        require("paymentMethod", payment_method)?;
        require("currency", currency)?;
        if !self.owns_booking(booking_id) {
            return Ok(None);
        }
        let payment = self.store.record_checkout(booking_id, payment_method, currency)?;
        if let Some(ref payment) = payment {
            info!(booking = %booking_id, payment = %payment.id, "checkout recorded");
        }
        Ok(payment)
    }

    /// This parent's payments joined to their bookings; a booking deleted
    /// since paying joins to `None`.
    pub fn my_payments(&self) -> Vec<(Payment, Option<Booking>)> {
        self.store.payments_with_bookings(self.parent_id)
    }

    /// Completed spend per calendar month, most recent month first.
    pub fn monthly_spend(&self) -> Vec<MonthlySpend> {
        self.store.monthly_spend(self.parent_id)
    }

    // ------------------------------------------------------------------
    // Messaging
    // ------------------------------------------------------------------

    /// Send a message to a tutor. The tutor id is not checked against the
    /// accounts table.
    pub fn message_tutor(&self, tutor_id: Uuid, content: &str) -> Result<Message> {
        require("message", content)?;
        Ok(self.store.send_message(NewMessage {
            sender_id: self.parent_id,
            sender_role: AccountRole::Parent,
            recipient_id: tutor_id,
            content: content.to_string(),
        })?)
    }

    /// Full thread with one tutor, oldest message first.
    pub fn conversation_with(&self, tutor_id: Uuid) -> Vec<Message> {
        self.store
            .messages_for_conversation(conversation_id_for(self.parent_id, tutor_id))
    }

    /// Conversation list: latest message and unread count per tutor.
    pub fn conversations(&self) -> Vec<ConversationSummary> {
        self.store.conversation_overview(self.parent_id)
    }

    /// Mark a message addressed to this parent as read. Idempotent.
    pub fn mark_message_read(&self, message_id: Uuid) -> Result<Option<Message>> {
        match self.store.get_message(message_id) {
            Some(message) if message.recipient_id == self.parent_id => {
                Ok(self.store.mark_message_read(message_id)?)
            }
            _ => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Announcements
    // ------------------------------------------------------------------

    /// This parent's announcement inbox, synthesizing copies of any global
    /// announcements not seen before. Newest first.
    pub fn inbox(&self) -> Result<Vec<ParentAnnouncement>> {
        Ok(self.store.sync_parent_inbox(self.parent_id)?)
    }

    pub fn unread_announcements(&self) -> usize {
        self.store.unread_announcement_count(self.parent_id)
    }

    /// Mark one inbox item as read. Somebody else's item comes back `None`.
    pub fn mark_announcement_read(&self, id: Uuid) -> Result<Option<ParentAnnouncement>> {
        let owned = self
            .store
            .parent_announcements_for(self.parent_id)
            .iter()
            .any(|copy| copy.id == id);
        if !owned {
            return Ok(None);
        }
        Ok(self.store.mark_announcement_read(id)?)
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    pub fn update_profile(&self, profile: ParentProfile) -> Result<Option<Account>> {
        Ok(self.store.update_account(
            self.parent_id,
            AccountPatch {
                full_name: profile.full_name,
                phone: profile.phone,
                ..Default::default()
            },
        )?)
    }

    fn owns_booking(&self, booking_id: Uuid) -> bool {
        self.store
            .get_booking(booking_id)
            .is_some_and(|booking| booking.parent_id == self.parent_id)
    }
}
