//! CRUD operations for [`Announcement`] records and their per-parent
//! copies.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Announcement, AnnouncementPatch, AnnouncementSource, Audience, NewAnnouncement,
    ParentAnnouncement,
};
use crate::store::{Record, Store};

impl Record for Announcement {
    const TABLE: &'static str = "announcements";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for ParentAnnouncement {
    const TABLE: &'static str = "parent_announcements";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Store {
    // ------------------------------------------------------------------
    // Global announcements
    // ------------------------------------------------------------------

    pub fn create_announcement(&self, new: NewAnnouncement) -> Result<Announcement> {
        let announcement = Announcement {
            id: Uuid::new_v4(),
            title: new.title,
            content: new.content,
            audience: new.audience,
            created_by: new.created_by,
            publish_date: new.publish_date,
            created_at: Utc::now(),
        };
        self.insert(announcement)
    }

    pub fn get_announcement(&self, id: Uuid) -> Option<Announcement> {
        self.find(id)
    }

    /// Full table scan, insertion order.
    pub fn list_announcements(&self) -> Vec<Announcement> {
        self.load()
    }

    /// Announcements visible to one audience (its own plus `all`), most
    /// recent publish date first.
    pub fn announcements_for_audience(&self, audience: Audience) -> Vec<Announcement> {
        let mut announcements: Vec<Announcement> = self
            .load::<Announcement>()
            .into_iter()
            .filter(|a| a.audience == Audience::All || a.audience == audience)
            .collect();
        announcements.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
        announcements
    }

    /// Shallow-merge `patch` into the announcement.
    pub fn update_announcement(
        &self,
        id: Uuid,
        patch: AnnouncementPatch,
    ) -> Result<Option<Announcement>> {
        self.modify(id, |announcement: &mut Announcement| {
            if let Some(title) = patch.title {
                announcement.title = title;
            }
            if let Some(content) = patch.content {
                announcement.content = content;
            }
            if let Some(audience) = patch.audience {
                announcement.audience = audience;
            }
            if let Some(publish_date) = patch.publish_date {
                announcement.publish_date = publish_date;
            }
        })
    }

    pub fn delete_announcement(&self, id: Uuid) -> Result<bool> {
        self.remove::<Announcement>(id)
    }

    // ------------------------------------------------------------------
    // Per-parent copies
    // ------------------------------------------------------------------

    /// Insert a parent-visible notice directly, bypassing the global table.
    /// This is how tutor notices reach a parent's inbox.
    pub fn create_parent_notice(
        &self,
        parent_id: Uuid,
        title: String,
        content: String,
        source: AnnouncementSource,
        source_name: String,
    ) -> Result<ParentAnnouncement> {
        let notice = ParentAnnouncement {
            id: Uuid::new_v4(),
            parent_id,
            announcement_id: None,
            title,
            content,
            source,
            source_name,
            read_at: None,
            created_at: Utc::now(),
        };
        self.insert(notice)
    }

    pub fn parent_announcements_for(&self, parent_id: Uuid) -> Vec<ParentAnnouncement> {
        self.load::<ParentAnnouncement>()
            .into_iter()
            .filter(|copy| copy.parent_id == parent_id)
            .collect()
    }

    /// Synthesize the parent's inbox: every global announcement addressed to
    /// parents (or everyone) gets a per-parent copy, once. Returns the full
    /// inbox, newest first.
    pub fn sync_parent_inbox(&self, parent_id: Uuid) -> Result<Vec<ParentAnnouncement>> {
        let known: HashSet<Uuid> = self
            .parent_announcements_for(parent_id)
            .iter()
            .filter_map(|copy| copy.announcement_id)
            .collect();

        for announcement in self.list_announcements() {
            if !matches!(announcement.audience, Audience::All | Audience::Parents) {
                continue;
            }
            if known.contains(&announcement.id) {
                continue;
            }
            self.insert(ParentAnnouncement {
                id: Uuid::new_v4(),
                parent_id,
                announcement_id: Some(announcement.id),
                title: announcement.title.clone(),
                content: announcement.content.clone(),
                source: AnnouncementSource::Admin,
                source_name: announcement.created_by.clone(),
                read_at: None,
                created_at: Utc::now(),
            })?;
        }

        let mut inbox = self.parent_announcements_for(parent_id);
        inbox.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inbox)
    }

    /// Flip a per-parent copy to read. Marking an already-read copy again is
    /// a no-op. Returns `None` when the copy does not exist.
    pub fn mark_announcement_read(&self, id: Uuid) -> Result<Option<ParentAnnouncement>> {
        self.modify(id, |copy: &mut ParentAnnouncement| {
            if copy.read_at.is_none() {
                copy.read_at = Some(Utc::now());
            }
        })
    }

    pub fn delete_parent_announcement(&self, id: Uuid) -> Result<bool> {
        self.remove::<ParentAnnouncement>(id)
    }
}
