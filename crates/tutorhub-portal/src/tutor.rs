//! Tutor-facing portal.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use tutorhub_store::{
    conversation_id_for, Account, AccountPatch, AccountRole, Announcement, AnnouncementSource,
    Audience, AvailabilityPatch, AvailabilitySlot, ConversationSummary, DayOfWeek, Message,
    NewAvailabilitySlot, NewMessage, ParentAnnouncement, Store,
};

use crate::error::{require, Result};

/// Caller-supplied details of a weekly availability window.
#[derive(Debug, Clone)]
pub struct SlotRequest {
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub recurring: bool,
}

/// Profile fields a tutor may change about themselves.
#[derive(Debug, Clone, Default)]
pub struct TutorProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub hourly_rate: Option<Decimal>,
}

/// Entry point for a signed-in tutor. Scoped to the bound tutor id the same
/// way [`crate::ParentPortal`] is scoped to its parent.
#[derive(Debug)]
pub struct TutorPortal<'a> {
    store: &'a Store,
    tutor_id: Uuid,
}

impl<'a> TutorPortal<'a> {
    pub fn new(store: &'a Store, tutor_id: Uuid) -> Self {
        Self { store, tutor_id }
    }

    // ------------------------------------------------------------------
    // Availability
    // ------------------------------------------------------------------

    /// Publish a weekly availability window. Times are accepted exactly as
    /// given, inverted windows included.
    pub fn publish_availability(&self, request: SlotRequest) -> Result<AvailabilitySlot> {
        Ok(self.store.create_availability(NewAvailabilitySlot {
            tutor_id: self.tutor_id,
            day_of_week: request.day_of_week,
            start_time: request.start_time,
            end_time: request.end_time,
            recurring: request.recurring,
        })?)
    }

    pub fn my_availability(&self) -> Vec<AvailabilitySlot> {
        self.store.availability_for_tutor(self.tutor_id)
    }

    /// Patch one of this tutor's windows. Somebody else's window — or a
    /// missing one — comes back as `None`.
    pub fn update_availability(
        &self,
        slot_id: Uuid,
        patch: AvailabilityPatch,
    ) -> Result<Option<AvailabilitySlot>> {
        if !self.owns_slot(slot_id) {
            return Ok(None);
        }
        Ok(self.store.update_availability(slot_id, patch)?)
    }

    /// Block one concrete date of a recurring window.
    pub fn block_date(&self, slot_id: Uuid, date: NaiveDate) -> Result<Option<AvailabilitySlot>> {
        if !self.owns_slot(slot_id) {
            return Ok(None);
        }
        Ok(self.store.block_availability_date(slot_id, date)?)
    }

    pub fn remove_availability(&self, slot_id: Uuid) -> Result<bool> {
        if !self.owns_slot(slot_id) {
            return Ok(false);
        }
        Ok(self.store.delete_availability(slot_id)?)
    }

    // ------------------------------------------------------------------
    // Messaging
    // ------------------------------------------------------------------

    /// Send a message to a parent. The parent id is not checked against the
    /// accounts table.
    pub fn message_parent(&self, parent_id: Uuid, content: &str) -> Result<Message> {
        require("message", content)?;
        Ok(self.store.send_message(NewMessage {
            sender_id: self.tutor_id,
            sender_role: AccountRole::Tutor,
            recipient_id: parent_id,
            content: content.to_string(),
        })?)
    }

    /// Full thread with one parent, oldest message first.
    pub fn conversation_with(&self, parent_id: Uuid) -> Vec<Message> {
        self.store
            .messages_for_conversation(conversation_id_for(parent_id, self.tutor_id))
    }

    /// Conversation list: latest message and unread count per parent.
    pub fn conversations(&self) -> Vec<ConversationSummary> {
        self.store.conversation_overview(self.tutor_id)
    }

    /// Mark a message addressed to this tutor as read. Idempotent.
    pub fn mark_message_read(&self, message_id: Uuid) -> Result<Option<Message>> {
        match self.store.get_message(message_id) {
            Some(message) if message.recipient_id == self.tutor_id => {
                Ok(self.store.mark_message_read(message_id)?)
            }
            _ => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Notices & announcements
    // ------------------------------------------------------------------

    /// Push a notice straight into one parent's announcement inbox, signed
    /// with this tutor's display name.
    pub fn post_notice(
        &self,
        parent_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<ParentAnnouncement> {
        require("title", title)?;
        require("content", content)?;

        let source_name = self
            .store
            .get_account(self.tutor_id)
            .map(|account| account.full_name)
            .unwrap_or_else(|| "Tutor".to_string());

        Ok(self.store.create_parent_notice(
            parent_id,
            title.to_string(),
            content.to_string(),
            AnnouncementSource::Tutor,
            source_name,
        )?)
    }

    /// Global announcements addressed to tutors, newest publish date first.
    pub fn announcements(&self) -> Vec<Announcement> {
        self.store.announcements_for_audience(Audience::Tutors)
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    pub fn update_profile(&self, profile: TutorProfile) -> Result<Option<Account>> {
        Ok(self.store.update_account(
            self.tutor_id,
            AccountPatch {
                full_name: profile.full_name,
                phone: profile.phone,
                bio: profile.bio,
                subjects: profile.subjects,
                hourly_rate: profile.hourly_rate,
                ..Default::default()
            },
        )?)
    }

    fn owns_slot(&self, slot_id: Uuid) -> bool {
        self.store
            .get_availability(slot_id)
            .is_some_and(|slot| slot.tutor_id == self.tutor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PortalError;

    fn wednesday_morning() -> SlotRequest {
        SlotRequest {
            day_of_week: DayOfWeek::Wednesday,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            recurring: true,
        }
    }

    #[test]
    fn availability_is_scoped_to_the_signed_in_tutor() {
        let store = Store::in_memory();
        let portal = TutorPortal::new(&store, Uuid::new_v4());

        let slot = portal.publish_availability(wednesday_morning()).unwrap();
        assert_eq!(portal.my_availability(), vec![slot]);
    }

    #[test]
    fn cannot_touch_someone_elses_slot() {
        let store = Store::in_memory();
        let owner = TutorPortal::new(&store, Uuid::new_v4());
        let intruder = TutorPortal::new(&store, Uuid::new_v4());

        let slot = owner.publish_availability(wednesday_morning()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();

        assert!(intruder.block_date(slot.id, date).unwrap().is_none());
        assert!(!intruder.remove_availability(slot.id).unwrap());
        assert!(store.get_availability(slot.id).is_some());
    }

    #[test]
    fn notice_requires_title_and_content() {
        let store = Store::in_memory();
        let portal = TutorPortal::new(&store, Uuid::new_v4());

        let err = portal.post_notice(Uuid::new_v4(), "", "content").unwrap_err();
        assert!(matches!(err, PortalError::MissingField("title")));
    }

    #[test]
    fn notice_is_signed_with_the_tutors_name() {
        let store = Store::in_memory();
        let tutor = store
            .create_account(tutorhub_store::NewAccount {
                email: "dupont@example.com".to_string(),
                password: "pw".to_string(),
                role: AccountRole::Tutor,
                full_name: "M. Dupont".to_string(),
                phone: None,
                subjects: vec!["Maths".to_string()],
                hourly_rate: Some(Decimal::from(30)),
            })
            .unwrap();
        let portal = TutorPortal::new(&store, tutor.id);
        let parent_id = Uuid::new_v4();

        let notice = portal
            .post_notice(parent_id, "Homework", "Chapter 4 please")
            .unwrap();

        assert_eq!(notice.source_name, "M. Dupont");
        assert_eq!(notice.source, AnnouncementSource::Tutor);
        assert_eq!(notice.parent_id, parent_id);
    }

    #[test]
    fn reply_reaches_the_parents_thread() {
        let store = Store::in_memory();
        let parent_id = Uuid::new_v4();
        let tutor_id = Uuid::new_v4();
        let portal = TutorPortal::new(&store, tutor_id);

        store
            .send_message(NewMessage {
                sender_id: parent_id,
                sender_role: AccountRole::Parent,
                recipient_id: tutor_id,
                content: "Bonjour".to_string(),
            })
            .unwrap();
        portal.message_parent(parent_id, "Bonjour !").unwrap();

        assert_eq!(portal.conversation_with(parent_id).len(), 2);
        assert_eq!(portal.conversations()[0].unread, 1);
    }
}
