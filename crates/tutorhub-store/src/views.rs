//! Derived read models.
//!
//! Every view here is recomputed on demand from the raw tables; nothing is
//! persisted separately. All of them tolerate dangling references — a
//! payment whose booking is gone joins to `None`, never to an error.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Booking, Message, Payment, PaymentStatus};
use crate::store::Store;

/// Completed spend of one parent in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySpend {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    pub total: Decimal,
}

/// One line of a conversation list: the latest message exchanged with a
/// counterpart plus how many of their messages are still unread.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub participant_id: Uuid,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub unread: usize,
}

impl Store {
    /// Completed payments of one parent, grouped by transaction month and
    /// summed, most recent month first. Pending and failed payments are
    /// excluded.
    pub fn monthly_spend(&self, parent_id: Uuid) -> Vec<MonthlySpend> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for payment in self.payments_for_parent(parent_id) {
            if payment.status != PaymentStatus::Completed {
                continue;
            }
            let month = payment.transaction_date.format("%Y-%m").to_string();
            *totals.entry(month).or_default() += payment.amount;
        }
        totals
            .into_iter()
            .rev()
            .map(|(month, total)| MonthlySpend { month, total })
            .collect()
    }

    /// Unread messages addressed to `reader_id` inside one thread.
    pub fn unread_message_count(&self, conversation_id: Uuid, reader_id: Uuid) -> usize {
        self.messages_for_conversation(conversation_id)
            .iter()
            .filter(|message| message.recipient_id == reader_id && message.read_at.is_none())
            .count()
    }

    /// Unread items in one parent's announcement inbox.
    pub fn unread_announcement_count(&self, parent_id: Uuid) -> usize {
        self.parent_announcements_for(parent_id)
            .iter()
            .filter(|copy| copy.read_at.is_none())
            .count()
    }

    /// Conversation list for one account, derived purely from the messages
    /// table: one entry per distinct counterpart, most recent thread first.
    pub fn conversation_overview(&self, owner_id: Uuid) -> Vec<ConversationSummary> {
        let mut by_counterpart: HashMap<Uuid, ConversationSummary> = HashMap::new();

        for message in self.load::<Message>() {
            let counterpart = if message.sender_id == owner_id {
                message.recipient_id
            } else if message.recipient_id == owner_id {
                message.sender_id
            } else {
                continue;
            };
            let unread_here =
                usize::from(message.recipient_id == owner_id && message.read_at.is_none());

            let entry = by_counterpart
                .entry(counterpart)
                .or_insert_with(|| ConversationSummary {
                    participant_id: counterpart,
                    last_message: message.content.clone(),
                    last_message_at: message.created_at,
                    unread: 0,
                });
            if message.created_at >= entry.last_message_at {
                entry.last_message = message.content.clone();
                entry.last_message_at = message.created_at;
            }
            entry.unread += unread_here;
        }

        let mut summaries: Vec<ConversationSummary> = by_counterpart.into_values().collect();
        summaries.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        summaries
    }

    /// The booking a payment settles, if it still exists.
    pub fn booking_for_payment(&self, payment: &Payment) -> Option<Booking> {
        self.get_booking(payment.booking_id)
    }

    /// One parent's payments joined to their bookings. A deleted booking
    /// joins to `None`; the payment itself is always listed.
    pub fn payments_with_bookings(&self, parent_id: Uuid) -> Vec<(Payment, Option<Booking>)> {
        self.payments_for_parent(parent_id)
            .into_iter()
            .map(|payment| {
                let booking = self.booking_for_payment(&payment);
                (payment, booking)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{AccountRole, LessonType, NewBooking, NewMessage, NewPayment};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(
        parent_id: Uuid,
        amount: i64,
        status: PaymentStatus,
        transaction_date: NaiveDate,
    ) -> NewPayment {
        NewPayment {
            parent_id,
            booking_id: Uuid::new_v4(),
            amount: Decimal::from(amount),
            currency: "EUR".to_string(),
            payment_method: "card".to_string(),
            status,
            transaction_date,
        }
    }

    #[test]
    fn monthly_spend_sums_completed_only() {
        let store = Store::in_memory();
        let parent = Uuid::new_v4();

        store
            .create_payment(payment(parent, 10, PaymentStatus::Completed, date(2024, 1, 5)))
            .unwrap();
        store
            .create_payment(payment(parent, 5, PaymentStatus::Failed, date(2024, 1, 6)))
            .unwrap();
        store
            .create_payment(payment(parent, 20, PaymentStatus::Completed, date(2024, 2, 1)))
            .unwrap();

        let spend = store.monthly_spend(parent);
        assert_eq!(
            spend,
            vec![
                MonthlySpend {
                    month: "2024-02".to_string(),
                    total: Decimal::from(20),
                },
                MonthlySpend {
                    month: "2024-01".to_string(),
                    total: Decimal::from(10),
                },
            ]
        );
    }

    #[test]
    fn monthly_spend_ignores_other_parents() {
        let store = Store::in_memory();
        let parent = Uuid::new_v4();
        store
            .create_payment(payment(
                Uuid::new_v4(),
                99,
                PaymentStatus::Completed,
                date(2024, 1, 5),
            ))
            .unwrap();

        assert!(store.monthly_spend(parent).is_empty());
    }

    #[test]
    fn overview_tracks_latest_message_and_unread() {
        let store = Store::in_memory();
        let parent = Uuid::new_v4();
        let tutor_a = Uuid::new_v4();
        let tutor_b = Uuid::new_v4();

        store
            .send_message(NewMessage {
                sender_id: tutor_a,
                sender_role: AccountRole::Tutor,
                recipient_id: parent,
                content: "premier".to_string(),
            })
            .unwrap();
        store
            .send_message(NewMessage {
                sender_id: tutor_a,
                sender_role: AccountRole::Tutor,
                recipient_id: parent,
                content: "deuxième".to_string(),
            })
            .unwrap();
        store
            .send_message(NewMessage {
                sender_id: parent,
                sender_role: AccountRole::Parent,
                recipient_id: tutor_b,
                content: "bonjour".to_string(),
            })
            .unwrap();

        let overview = store.conversation_overview(parent);
        assert_eq!(overview.len(), 2);

        // tutor_b thread is the most recent one
        assert_eq!(overview[0].participant_id, tutor_b);
        assert_eq!(overview[0].unread, 0);

        assert_eq!(overview[1].participant_id, tutor_a);
        assert_eq!(overview[1].last_message, "deuxième");
        assert_eq!(overview[1].unread, 2);
    }

    #[test]
    fn unread_count_drops_after_reading() {
        let store = Store::in_memory();
        let parent = Uuid::new_v4();
        let tutor = Uuid::new_v4();

        let sent = store
            .send_message(NewMessage {
                sender_id: tutor,
                sender_role: AccountRole::Tutor,
                recipient_id: parent,
                content: "bonjour".to_string(),
            })
            .unwrap();

        assert_eq!(store.unread_message_count(sent.conversation_id, parent), 1);
        store.mark_message_read(sent.id).unwrap();
        assert_eq!(store.unread_message_count(sent.conversation_id, parent), 0);
    }

    #[test]
    fn deleted_booking_joins_to_none() {
        let store = Store::in_memory();
        let parent = Uuid::new_v4();
        let booking = store
            .create_booking(NewBooking {
                parent_id: parent,
                student_name: "Marie".to_string(),
                subject: "Maths".to_string(),
                date: date(2024, 5, 2),
                slot: "10:00-11:00".to_string(),
                lesson_type: LessonType::Online,
                hours: 1,
                rate_per_hour: Decimal::from(30),
            })
            .unwrap();
        store.record_checkout(booking.id, "card", "EUR").unwrap();

        store.delete_booking(booking.id).unwrap();

        let joined = store.payments_with_bookings(parent);
        assert_eq!(joined.len(), 1);
        assert!(joined[0].1.is_none());
    }
}
