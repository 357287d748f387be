//! # tutorhub-portal
//!
//! Role-scoped entry points over [`tutorhub_store::Store`]. Each portal
//! exposes only the operations its role may perform, bound to an implicit
//! caller identity, and validates required fields before anything reaches
//! the store. The store handle is constructed by the caller and passed in
//! by reference — the portals own no state of their own.

pub mod admin;
pub mod auth;
pub mod parent;
pub mod tutor;

mod error;

pub use admin::AdminPortal;
pub use error::PortalError;
pub use parent::{LessonRequest, ParentPortal};
pub use tutor::{SlotRequest, TutorPortal};
