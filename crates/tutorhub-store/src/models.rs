//! Domain model structs persisted in the local table files.
//!
//! Every struct derives `Serialize` and `Deserialize` with camelCase field
//! names so it can be handed directly to the UI layer. Creation inputs are
//! the `New*` structs; partial updates are the `*Patch` structs, whose
//! `Option` fields merge shallowly (absent means preserved).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Shared enums
// ---------------------------------------------------------------------------

/// Role of an account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Parent,
    Tutor,
}

impl AccountRole {
    /// The role on the other side of a parent/tutor conversation.
    pub fn counterpart(self) -> Self {
        match self {
            Self::Parent => Self::Tutor,
            Self::Tutor => Self::Parent,
        }
    }
}

/// Booking lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// Where the lesson takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LessonType {
    Online,
    InPerson,
}

/// Payment settlement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

/// Day of the week an availability slot repeats on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        };
        f.write_str(name)
    }
}

/// Who a global announcement is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    All,
    Tutors,
    Students,
    Parents,
}

/// Where a parent-visible announcement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementSource {
    Admin,
    Tutor,
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A parent or tutor account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Sign-in email. Unique across accounts, compared case-insensitively.
    pub email: String,
    /// Sign-in password, compared by exact match.
    pub password: String,
    pub role: AccountRole,
    /// Display name shown across the product.
    pub full_name: String,
    pub phone: Option<String>,
    /// Subjects offered (tutors only; empty for parents).
    pub subjects: Vec<String>,
    /// Advertised hourly rate (tutors only).
    pub hourly_rate: Option<Decimal>,
    pub bio: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies when registering an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub role: AccountRole,
    pub full_name: String,
    pub phone: Option<String>,
    pub subjects: Vec<String>,
    pub hourly_rate: Option<Decimal>,
}

/// Partial account update. `role`, `email` and `created_at` are immutable.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub hourly_rate: Option<Decimal>,
    pub bio: Option<String>,
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// A lesson booked by a parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique booking identifier.
    pub id: Uuid,
    /// Account of the parent who made the booking.
    pub parent_id: Uuid,
    /// Name of the student attending the lesson.
    pub student_name: String,
    pub subject: String,
    /// Calendar date of the lesson.
    pub date: NaiveDate,
    /// Display label of the chosen time slot, e.g. `"16:00-17:00"`.
    pub slot: String,
    pub lesson_type: LessonType,
    /// Booked lesson length in whole hours.
    pub hours: u32,
    pub rate_per_hour: Decimal,
    /// Total price, fixed at creation from rate and hours. Only an explicit
    /// patch changes it afterwards.
    pub total: Decimal,
    pub status: BookingStatus,
    /// Video-call link, assigned once the lesson is confirmed.
    pub meeting_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies when booking a lesson.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub parent_id: Uuid,
    pub student_name: String,
    pub subject: String,
    pub date: NaiveDate,
    pub slot: String,
    pub lesson_type: LessonType,
    pub hours: u32,
    pub rate_per_hour: Decimal,
}

/// Partial booking update.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub date: Option<NaiveDate>,
    pub slot: Option<String>,
    pub status: Option<BookingStatus>,
    pub meeting_link: Option<String>,
    pub total: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

/// A recorded payment for a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique payment identifier.
    pub id: Uuid,
    pub parent_id: Uuid,
    /// The booking this payment settles. The booking may have been deleted
    /// since; readers must treat a missing booking as absent.
    pub booking_id: Uuid,
    /// Amount charged. Immutable once recorded.
    pub amount: Decimal,
    /// ISO 4217 currency code, e.g. `"EUR"`.
    pub currency: String,
    /// Gateway label, e.g. `"card"` or `"bankTransfer"`.
    pub payment_method: String,
    pub status: PaymentStatus,
    /// Date the transaction was made.
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies when recording a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub parent_id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub status: PaymentStatus,
    pub transaction_date: NaiveDate,
}

/// Partial payment update. Only the settlement status may change; the
/// amount is immutable once recorded.
#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub status: Option<PaymentStatus>,
}

// ---------------------------------------------------------------------------
// Availability slot
// ---------------------------------------------------------------------------

/// A weekly availability window published by a tutor.
///
/// Start and end times are stored exactly as given; the store does not
/// require `start_time < end_time`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    /// Unique slot identifier.
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Whether the window repeats every week.
    pub recurring: bool,
    /// Concrete dates on which this recurring window is unavailable.
    pub blocked_dates: Vec<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies when publishing an availability window.
#[derive(Debug, Clone)]
pub struct NewAvailabilitySlot {
    pub tutor_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub recurring: bool,
}

/// Partial availability update.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityPatch {
    pub day_of_week: Option<DayOfWeek>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub recurring: Option<bool>,
    pub blocked_dates: Option<Vec<NaiveDate>>,
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// One side of a parent/tutor message thread.
///
/// Each participant owns their own row; the row id is derived from the
/// (owner, participant) pair, so there is at most one row per pair and
/// independent callers always agree on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Derived identifier, see [`crate::conversations::conversation_id_for`].
    pub id: Uuid,
    pub owner_id: Uuid,
    pub participant_id: Uuid,
    pub participant_role: AccountRole,
    /// Preview of the most recent message in the thread.
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    /// Messages addressed to the owner that have not been read yet.
    pub unread_count: u32,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single message inside a thread. Immutable once created, except for the
/// one-way `read_at` transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// Thread identifier, derived from the (parent, tutor) pair.
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub sender_role: AccountRole,
    pub recipient_id: Uuid,
    pub content: String,
    /// When the recipient read the message. `None` means unread.
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies when sending a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: Uuid,
    pub sender_role: AccountRole,
    pub recipient_id: Uuid,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Announcement
// ---------------------------------------------------------------------------

/// A global announcement authored by the admin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// Unique announcement identifier.
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub audience: Audience,
    /// Display name of the author.
    pub created_by: String,
    pub publish_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies when publishing an announcement.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub audience: Audience,
    pub created_by: String,
    pub publish_date: NaiveDate,
}

/// Partial announcement update.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub audience: Option<Audience>,
    pub publish_date: Option<NaiveDate>,
}

/// The parent-visible copy of an announcement.
///
/// Synthesized per parent, either from a global admin announcement or from a
/// tutor notice. `read_at` is the only field that changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentAnnouncement {
    /// Unique identifier of this per-parent copy.
    pub id: Uuid,
    pub parent_id: Uuid,
    /// Global announcement this copy was synthesized from, when it was.
    /// `None` for tutor notices.
    pub announcement_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub source: AnnouncementSource,
    /// Display name of whoever sent it.
    pub source_name: String,
    /// When the parent read it. `None` means unread.
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
