use thiserror::Error;

use tutorhub_store::StoreError;

/// Errors reported by the role portals.
#[derive(Error, Debug)]
pub enum PortalError {
    /// A required field was empty at the portal boundary. Nothing reached
    /// the store.
    #[error("Required field is empty: {0}")]
    MissingField(&'static str),

    /// The store itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PortalError>;

/// Reject empty (or whitespace-only) required fields before they reach the
/// store.
pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PortalError::MissingField(field));
    }
    Ok(())
}
