//! CRUD operations for [`Account`] records.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{Account, AccountPatch, AccountRole, NewAccount};
use crate::store::{Record, Store};

impl Record for Account {
    const TABLE: &'static str = "accounts";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Store {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Register a new account.
    ///
    /// Fails with [`StoreError::EmailTaken`] when another account already
    /// uses the email, compared case-insensitively.
    pub fn create_account(&self, new: NewAccount) -> Result<Account> {
        if self.find_account_by_email(&new.email).is_some() {
            return Err(StoreError::EmailTaken(new.email));
        }

        let account = Account {
            id: Uuid::new_v4(),
            email: new.email,
            password: new.password,
            role: new.role,
            full_name: new.full_name,
            phone: new.phone,
            subjects: new.subjects,
            hourly_rate: new.hourly_rate,
            bio: None,
            created_at: Utc::now(),
        };
        self.insert(account)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_account(&self, id: Uuid) -> Option<Account> {
        self.find(id)
    }

    /// Case-insensitive email lookup.
    pub fn find_account_by_email(&self, email: &str) -> Option<Account> {
        let needle = email.trim().to_lowercase();
        self.load::<Account>()
            .into_iter()
            .find(|account| account.email.to_lowercase() == needle)
    }

    /// Exact-match credential check. Returns the account on success.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Option<Account> {
        self.find_account_by_email(email)
            .filter(|account| account.password == password)
    }

    /// Full table scan, insertion order.
    pub fn list_accounts(&self) -> Vec<Account> {
        self.load()
    }

    pub fn accounts_by_role(&self, role: AccountRole) -> Vec<Account> {
        self.load::<Account>()
            .into_iter()
            .filter(|account| account.role == role)
            .collect()
    }

    // ------------------------------------------------------------------
    // Update / delete
    // ------------------------------------------------------------------

    /// Shallow-merge `patch` into the account. Absent fields are preserved.
    pub fn update_account(&self, id: Uuid, patch: AccountPatch) -> Result<Option<Account>> {
        self.modify(id, |account: &mut Account| {
            if let Some(password) = patch.password {
                account.password = password;
            }
            if let Some(full_name) = patch.full_name {
                account.full_name = full_name;
            }
            if let Some(phone) = patch.phone {
                account.phone = Some(phone);
            }
            if let Some(subjects) = patch.subjects {
                account.subjects = subjects;
            }
            if let Some(hourly_rate) = patch.hourly_rate {
                account.hourly_rate = Some(hourly_rate);
            }
            if let Some(bio) = patch.bio {
                account.bio = Some(bio);
            }
        })
    }

    pub fn delete_account(&self, id: Uuid) -> Result<bool> {
        self.remove::<Account>(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(email: &str, role: AccountRole) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            password: "hunter2".to_string(),
            role,
            full_name: "Ada Lovelace".to_string(),
            phone: Some("+33 6 00 00 00 00".to_string()),
            subjects: Vec::new(),
            hourly_rate: None,
        }
    }

    #[test]
    fn create_then_read() {
        let store = Store::in_memory();
        let created = store
            .create_account(new_account("ada@example.com", AccountRole::Parent))
            .unwrap();

        let fetched = store.get_account(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.email, "ada@example.com");
    }

    #[test]
    fn email_uniqueness_is_case_insensitive() {
        let store = Store::in_memory();
        store
            .create_account(new_account("ada@example.com", AccountRole::Parent))
            .unwrap();

        let err = store
            .create_account(new_account("ADA@Example.COM", AccountRole::Tutor))
            .unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken(_)));
    }

    #[test]
    fn credentials_must_match_exactly() {
        let store = Store::in_memory();
        store
            .create_account(new_account("ada@example.com", AccountRole::Parent))
            .unwrap();

        assert!(store.verify_credentials("ada@example.com", "hunter2").is_some());
        assert!(store.verify_credentials("ada@example.com", "Hunter2").is_none());
        assert!(store.verify_credentials("nobody@example.com", "hunter2").is_none());
    }

    #[test]
    fn update_preserves_untouched_fields() {
        let store = Store::in_memory();
        let created = store
            .create_account(new_account("ada@example.com", AccountRole::Tutor))
            .unwrap();

        let patch = AccountPatch {
            bio: Some("Maths and physics".to_string()),
            ..Default::default()
        };
        let updated = store.update_account(created.id, patch).unwrap().unwrap();

        assert_eq!(updated.bio.as_deref(), Some("Maths and physics"));
        assert_eq!(updated.full_name, created.full_name);
        assert_eq!(updated.phone, created.phone);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn update_of_missing_account_is_none() {
        let store = Store::in_memory();
        let result = store
            .update_account(Uuid::new_v4(), AccountPatch::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn delete_is_terminal() {
        let store = Store::in_memory();
        let created = store
            .create_account(new_account("ada@example.com", AccountRole::Parent))
            .unwrap();

        assert!(store.delete_account(created.id).unwrap());
        assert!(store.get_account(created.id).is_none());
        assert!(!store.delete_account(created.id).unwrap());
    }

    #[test]
    fn accounts_by_role_filters() {
        let store = Store::in_memory();
        store
            .create_account(new_account("p@example.com", AccountRole::Parent))
            .unwrap();
        store
            .create_account(new_account("t@example.com", AccountRole::Tutor))
            .unwrap();

        let tutors = store.accounts_by_role(AccountRole::Tutor);
        assert_eq!(tutors.len(), 1);
        assert_eq!(tutors[0].email, "t@example.com");
    }
}
