//! # tutorhub-store
//!
//! Embedded data store for the Tutorhub application.
//!
//! All state lives in per-table serialized payloads behind a pluggable
//! [`storage::StorageBackend`]. The crate exposes a synchronous [`Store`]
//! handle providing typed CRUD helpers for every domain model, plus derived
//! read models (unread counts, monthly spend, conversation summaries)
//! recomputed on demand.

pub mod accounts;
pub mod announcements;
pub mod availability;
pub mod bookings;
pub mod codec;
pub mod conversations;
pub mod messages;
pub mod models;
pub mod payments;
pub mod storage;
pub mod store;
pub mod views;

mod error;

pub use conversations::conversation_id_for;
pub use error::StoreError;
pub use models::*;
pub use store::Store;
pub use views::{ConversationSummary, MonthlySpend};
