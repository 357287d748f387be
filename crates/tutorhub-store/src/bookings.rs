//! CRUD operations for [`Booking`] records.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Booking, BookingPatch, BookingStatus, NewBooking};
use crate::store::{Record, Store};

impl Record for Booking {
    const TABLE: &'static str = "bookings";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Store {
    /// Insert a new booking.
    ///
    /// The total is derived here, once, from rate and hours. Later rate
    /// changes never recompute it; only an explicit patch does.
    pub fn create_booking(&self, new: NewBooking) -> Result<Booking> {
        let total = new.rate_per_hour * Decimal::from(new.hours);
        let booking = Booking {
            id: Uuid::new_v4(),
            parent_id: new.parent_id,
            student_name: new.student_name,
            subject: new.subject,
            date: new.date,
            slot: new.slot,
            lesson_type: new.lesson_type,
            hours: new.hours,
            rate_per_hour: new.rate_per_hour,
            total,
            status: BookingStatus::Pending,
            meeting_link: None,
            created_at: Utc::now(),
        };
        self.insert(booking)
    }

    pub fn get_booking(&self, id: Uuid) -> Option<Booking> {
        self.find(id)
    }

    /// Full table scan, insertion order.
    pub fn list_bookings(&self) -> Vec<Booking> {
        self.load()
    }

    /// Bookings made by one parent, most recent lesson date first.
    pub fn bookings_for_parent(&self, parent_id: Uuid) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .load::<Booking>()
            .into_iter()
            .filter(|booking| booking.parent_id == parent_id)
            .collect();
        bookings.sort_by(|a, b| b.date.cmp(&a.date));
        bookings
    }

    /// Shallow-merge `patch` into the booking. Absent fields are preserved.
    pub fn update_booking(&self, id: Uuid, patch: BookingPatch) -> Result<Option<Booking>> {
        self.modify(id, |booking: &mut Booking| {
            if let Some(date) = patch.date {
                booking.date = date;
            }
            if let Some(slot) = patch.slot {
                booking.slot = slot;
            }
            if let Some(status) = patch.status {
                booking.status = status;
            }
            if let Some(meeting_link) = patch.meeting_link {
                booking.meeting_link = Some(meeting_link);
            }
            if let Some(total) = patch.total {
                booking.total = total;
            }
        })
    }

    pub fn delete_booking(&self, id: Uuid) -> Result<bool> {
        self.remove::<Booking>(id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::LessonType;

    fn new_booking(parent_id: Uuid, date: NaiveDate) -> NewBooking {
        NewBooking {
            parent_id,
            student_name: "Marie".to_string(),
            subject: "Maths".to_string(),
            date,
            slot: "16:00-17:00".to_string(),
            lesson_type: LessonType::Online,
            hours: 2,
            rate_per_hour: Decimal::from(25),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn total_is_derived_at_creation() {
        let store = Store::in_memory();
        let booking = store
            .create_booking(new_booking(Uuid::new_v4(), date(2024, 3, 12)))
            .unwrap();

        assert_eq!(booking.total, Decimal::from(50));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(booking.meeting_link.is_none());
    }

    #[test]
    fn create_then_read() {
        let store = Store::in_memory();
        let created = store
            .create_booking(new_booking(Uuid::new_v4(), date(2024, 3, 12)))
            .unwrap();

        assert_eq!(store.get_booking(created.id), Some(created));
    }

    #[test]
    fn parent_bookings_sorted_by_date_descending() {
        let store = Store::in_memory();
        let parent = Uuid::new_v4();

        store.create_booking(new_booking(parent, date(2024, 1, 10))).unwrap();
        store.create_booking(new_booking(parent, date(2024, 3, 5))).unwrap();
        store.create_booking(new_booking(parent, date(2024, 2, 20))).unwrap();
        store
            .create_booking(new_booking(Uuid::new_v4(), date(2024, 4, 1)))
            .unwrap();

        let bookings = store.bookings_for_parent(parent);
        let dates: Vec<NaiveDate> = bookings.iter().map(|b| b.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 3, 5), date(2024, 2, 20), date(2024, 1, 10)]
        );
    }

    #[test]
    fn patch_changes_only_named_fields() {
        let store = Store::in_memory();
        let created = store
            .create_booking(new_booking(Uuid::new_v4(), date(2024, 3, 12)))
            .unwrap();

        let patch = BookingPatch {
            status: Some(BookingStatus::Confirmed),
            ..Default::default()
        };
        let updated = store.update_booking(created.id, patch).unwrap().unwrap();

        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert_eq!(updated.total, created.total);
        assert_eq!(updated.slot, created.slot);
        assert_eq!(updated.date, created.date);
    }

    #[test]
    fn explicit_patch_may_change_total() {
        let store = Store::in_memory();
        let created = store
            .create_booking(new_booking(Uuid::new_v4(), date(2024, 3, 12)))
            .unwrap();

        let patch = BookingPatch {
            total: Some(Decimal::from(40)),
            ..Default::default()
        };
        let updated = store.update_booking(created.id, patch).unwrap().unwrap();
        assert_eq!(updated.total, Decimal::from(40));
        // the rate itself is untouched
        assert_eq!(updated.rate_per_hour, created.rate_per_hour);
    }

    #[test]
    fn delete_is_terminal() {
        let store = Store::in_memory();
        let created = store
            .create_booking(new_booking(Uuid::new_v4(), date(2024, 3, 12)))
            .unwrap();

        assert!(store.delete_booking(created.id).unwrap());
        assert!(store.get_booking(created.id).is_none());
        assert!(!store.delete_booking(created.id).unwrap());
    }
}
