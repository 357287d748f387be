use chrono::Utc;
use uuid::Uuid;

use crate::conversations::conversation_id_for;
use crate::error::Result;
use crate::models::{AccountRole, Conversation, Message, NewMessage};
use crate::store::{Record, Store};

impl Record for Message {
    const TABLE: &'static str = "messages";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Thread id shared by both directions of a parent/tutor chat: always the
/// parent-facing derivation, parent first.
fn thread_id(sender_id: Uuid, sender_role: AccountRole, recipient_id: Uuid) -> Uuid {
    match sender_role {
        AccountRole::Parent => conversation_id_for(sender_id, recipient_id),
        AccountRole::Tutor => conversation_id_for(recipient_id, sender_id),
    }
}

impl Store {
    /// Append a message to its thread and refresh both sides' conversation
    /// rows. The recipient's unread counter goes up by one.
    ///
    /// Neither participant id is checked against the accounts table;
    /// referential integrity is advisory.
    pub fn send_message(&self, new: NewMessage) -> Result<Message> {
        let recipient_role = new.sender_role.counterpart();
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: thread_id(new.sender_id, new.sender_role, new.recipient_id),
            sender_id: new.sender_id,
            sender_role: new.sender_role,
            recipient_id: new.recipient_id,
            content: new.content,
            read_at: None,
            created_at: Utc::now(),
        };
        let message = self.insert(message)?;

        self.touch_conversation(
            message.sender_id,
            message.recipient_id,
            recipient_role,
            &message.content,
            message.created_at,
            false,
        )?;
        self.touch_conversation(
            message.recipient_id,
            message.sender_id,
            message.sender_role,
            &message.content,
            message.created_at,
            true,
        )?;
        Ok(message)
    }

    pub fn get_message(&self, id: Uuid) -> Option<Message> {
        self.find(id)
    }

    /// Messages of one thread, oldest first.
    pub fn messages_for_conversation(&self, conversation_id: Uuid) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .load::<Message>()
            .into_iter()
            .filter(|message| message.conversation_id == conversation_id)
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        messages
    }

    /// Flip a message to read and drop the reader's unread counter by one.
    /// Marking an already-read message again is a no-op.
    ///
    /// Returns `None` when the message does not exist.
    pub fn mark_message_read(&self, id: Uuid) -> Result<Option<Message>> {
        let mut rows = self.load::<Message>();
        let Some(message) = rows.iter_mut().find(|message| message.id == id) else {
            return Ok(None);
        };
        if message.read_at.is_some() {
            return Ok(Some(message.clone()));
        }

        message.read_at = Some(Utc::now());
        let updated = message.clone();
        self.save(&rows)?;

        // The reader owns the recipient-side conversation row.
        let reader_side = conversation_id_for(updated.recipient_id, updated.sender_id);
        self.modify(reader_side, |conversation: &mut Conversation| {
            conversation.unread_count = conversation.unread_count.saturating_sub(1);
        })?;

        Ok(Some(updated))
    }

    pub fn delete_message(&self, id: Uuid) -> Result<bool> {
        self.remove::<Message>(id)
    }
}
