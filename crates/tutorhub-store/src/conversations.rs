//! [`Conversation`] records and derived conversation identity.
//!
//! Conversation rows are owner-scoped: each participant in a thread owns
//! their own row, carrying their unread counter and last-message preview.
//! Row ids are never generated — they are derived from the
//! (owner, participant) pair, so independent callers always agree on them
//! and a pair can never end up with two rows.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AccountRole, Conversation};
use crate::store::{Record, Store};

/// Namespace under which conversation ids are derived.
const CONVERSATION_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6b, 0x1d, 0x9e, 0x42, 0x7c, 0x55, 0x4f, 0x08, 0x9a, 0x31, 0xd4, 0x0e, 0x66, 0x21, 0x8a,
    0xc7,
]);

/// Derive the conversation id owned by `owner_id` for talks with
/// `participant_id`.
///
/// Purely a function of the ordered pair: two independent calls with the
/// same pair always yield the same id. The mirror row on the other side of
/// the thread has its own id, derived from the reversed pair.
pub fn conversation_id_for(owner_id: Uuid, participant_id: Uuid) -> Uuid {
    let mut name = [0u8; 32];
    name[..16].copy_from_slice(owner_id.as_bytes());
    name[16..].copy_from_slice(participant_id.as_bytes());
    Uuid::new_v5(&CONVERSATION_NAMESPACE, &name)
}

impl Record for Conversation {
    const TABLE: &'static str = "conversations";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Store {
    /// Fetch the owner's conversation row for a pair, creating an empty one
    /// when none exists yet.
    pub fn ensure_conversation(
        &self,
        owner_id: Uuid,
        participant_id: Uuid,
        participant_role: AccountRole,
    ) -> Result<Conversation> {
        let id = conversation_id_for(owner_id, participant_id);
        if let Some(existing) = self.find::<Conversation>(id) {
            return Ok(existing);
        }
        self.insert(Conversation {
            id,
            owner_id,
            participant_id,
            participant_role,
            last_message: None,
            last_message_at: None,
            unread_count: 0,
            created_at: Utc::now(),
        })
    }

    pub fn get_conversation(&self, id: Uuid) -> Option<Conversation> {
        self.find(id)
    }

    /// All conversation rows owned by one account, most recent activity
    /// first; rows without any message yet come last.
    pub fn conversations_for_owner(&self, owner_id: Uuid) -> Vec<Conversation> {
        let mut conversations: Vec<Conversation> = self
            .load::<Conversation>()
            .into_iter()
            .filter(|conversation| conversation.owner_id == owner_id)
            .collect();
        conversations.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        conversations
    }

    pub fn delete_conversation(&self, id: Uuid) -> Result<bool> {
        self.remove::<Conversation>(id)
    }

    /// Update one side of a thread after a message lands: refresh the
    /// preview, and bump the unread counter when the owner is the recipient.
    /// Creates the row when the pair has never talked before.
    pub(crate) fn touch_conversation(
        &self,
        owner_id: Uuid,
        participant_id: Uuid,
        participant_role: AccountRole,
        preview: &str,
        at: DateTime<Utc>,
        bump_unread: bool,
    ) -> Result<Conversation> {
        let id = conversation_id_for(owner_id, participant_id);
        let mut rows = self.load::<Conversation>();

        let conversation = match rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.last_message = Some(preview.to_string());
                row.last_message_at = Some(at);
                if bump_unread {
                    row.unread_count += 1;
                }
                row.clone()
            }
            None => {
                let row = Conversation {
                    id,
                    owner_id,
                    participant_id,
                    participant_role,
                    last_message: Some(preview.to_string()),
                    last_message_at: Some(at),
                    unread_count: u32::from(bump_unread),
                    created_at: at,
                };
                rows.push(row.clone());
                row
            }
        };
        self.save(&rows)?;
        Ok(conversation)
    }
}
