//! Registration and sign-in.
//!
//! Credentials are compared by exact match; there is no hashing or session
//! handling in this layer.

use tutorhub_store::{Account, NewAccount, Store};

use crate::error::{require, Result};

/// Register a parent or tutor account.
///
/// Email, password and full name must be non-empty; email uniqueness is
/// enforced by the store, case-insensitively.
pub fn register(store: &Store, new: NewAccount) -> Result<Account> {
    require("email", &new.email)?;
    require("password", &new.password)?;
    require("fullName", &new.full_name)?;
    Ok(store.create_account(new)?)
}

/// Exact-match credential check. `None` covers both an unknown email and a
/// wrong password.
pub fn sign_in(store: &Store, email: &str, password: &str) -> Option<Account> {
    store.verify_credentials(email, password)
}

#[cfg(test)]
mod tests {
    use tutorhub_store::AccountRole;

    use super::*;
    use crate::PortalError;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            password: "s3cret".to_string(),
            role: AccountRole::Parent,
            full_name: "Jeanne Martin".to_string(),
            phone: None,
            subjects: Vec::new(),
            hourly_rate: None,
        }
    }

    #[test]
    fn register_then_sign_in() {
        let store = Store::in_memory();
        let account = register(&store, new_account("jeanne@example.com")).unwrap();

        let signed_in = sign_in(&store, "jeanne@example.com", "s3cret").unwrap();
        assert_eq!(signed_in.id, account.id);
        assert!(sign_in(&store, "jeanne@example.com", "wrong").is_none());
    }

    #[test]
    fn empty_email_is_rejected_before_the_store() {
        let store = Store::in_memory();
        let err = register(&store, new_account("   ")).unwrap_err();
        assert!(matches!(err, PortalError::MissingField("email")));
        assert!(store.list_accounts().is_empty());
    }
}
