//! Admin-facing portal.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use tutorhub_store::{
    Account, AccountRole, Announcement, AnnouncementPatch, Audience, Booking, BookingPatch,
    BookingStatus, NewAnnouncement, Payment, Store,
};

use crate::error::{require, Result};

/// Entry point for the back-office. Unlike the parent and tutor portals,
/// the admin sees every table unscoped.
#[derive(Debug)]
pub struct AdminPortal<'a> {
    store: &'a Store,
    admin_name: String,
}

impl<'a> AdminPortal<'a> {
    /// `admin_name` is stamped on everything the admin authors.
    pub fn new(store: &'a Store, admin_name: impl Into<String>) -> Self {
        Self {
            store,
            admin_name: admin_name.into(),
        }
    }

    // ------------------------------------------------------------------
    // Announcements
    // ------------------------------------------------------------------

    /// Publish a global announcement. Title and content must be non-empty.
    pub fn publish_announcement(
        &self,
        title: &str,
        content: &str,
        audience: Audience,
        publish_date: NaiveDate,
    ) -> Result<Announcement> {
        require("title", title)?;
        require("content", content)?;

        let announcement = self.store.create_announcement(NewAnnouncement {
            title: title.to_string(),
            content: content.to_string(),
            audience,
            created_by: self.admin_name.clone(),
            publish_date,
        })?;
        info!(announcement = %announcement.id, ?audience, "announcement published");
        Ok(announcement)
    }

    pub fn edit_announcement(
        &self,
        id: Uuid,
        patch: AnnouncementPatch,
    ) -> Result<Option<Announcement>> {
        Ok(self.store.update_announcement(id, patch)?)
    }

    pub fn retract_announcement(&self, id: Uuid) -> Result<bool> {
        Ok(self.store.delete_announcement(id)?)
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        self.store.list_announcements()
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    pub fn accounts(&self) -> Vec<Account> {
        self.store.list_accounts()
    }

    pub fn accounts_with_role(&self, role: AccountRole) -> Vec<Account> {
        self.store.accounts_by_role(role)
    }

    /// Hard-remove an account. Bookings, payments and messages referencing
    /// it are left in place; readers tolerate the dangling ids.
    pub fn remove_account(&self, id: Uuid) -> Result<bool> {
        Ok(self.store.delete_account(id)?)
    }

    // ------------------------------------------------------------------
    // Bookings & payments
    // ------------------------------------------------------------------

    pub fn bookings(&self) -> Vec<Booking> {
        self.store.list_bookings()
    }

    pub fn set_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>> {
        Ok(self.store.update_booking(
            id,
            BookingPatch {
                status: Some(status),
                ..Default::default()
            },
        )?)
    }

    /// Attach the video-call link to a booking. The link must be non-empty.
    pub fn assign_meeting_link(&self, id: Uuid, link: &str) -> Result<Option<Booking>> {
        require("meetingLink", link)?;
        Ok(self.store.update_booking(
            id,
            BookingPatch {
                meeting_link: Some(link.to_string()),
                ..Default::default()
            },
        )?)
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.store.list_payments()
    }
}
