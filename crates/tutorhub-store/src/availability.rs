//! CRUD operations for [`AvailabilitySlot`] records.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AvailabilityPatch, AvailabilitySlot, NewAvailabilitySlot};
use crate::store::{Record, Store};

impl Record for AvailabilitySlot {
    const TABLE: &'static str = "availability";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Store {
    /// Publish a new availability window.
    ///
    /// Times are stored exactly as given; a window with `start >= end` is
    /// accepted.
    pub fn create_availability(&self, new: NewAvailabilitySlot) -> Result<AvailabilitySlot> {
        let slot = AvailabilitySlot {
            id: Uuid::new_v4(),
            tutor_id: new.tutor_id,
            day_of_week: new.day_of_week,
            start_time: new.start_time,
            end_time: new.end_time,
            recurring: new.recurring,
            blocked_dates: Vec::new(),
            created_at: Utc::now(),
        };
        self.insert(slot)
    }

    pub fn get_availability(&self, id: Uuid) -> Option<AvailabilitySlot> {
        self.find(id)
    }

    /// Full table scan, insertion order.
    pub fn list_availability(&self) -> Vec<AvailabilitySlot> {
        self.load()
    }

    pub fn availability_for_tutor(&self, tutor_id: Uuid) -> Vec<AvailabilitySlot> {
        self.load::<AvailabilitySlot>()
            .into_iter()
            .filter(|slot| slot.tutor_id == tutor_id)
            .collect()
    }

    /// Shallow-merge `patch` into the slot. Absent fields are preserved.
    pub fn update_availability(
        &self,
        id: Uuid,
        patch: AvailabilityPatch,
    ) -> Result<Option<AvailabilitySlot>> {
        self.modify(id, |slot: &mut AvailabilitySlot| {
            if let Some(day_of_week) = patch.day_of_week {
                slot.day_of_week = day_of_week;
            }
            if let Some(start_time) = patch.start_time {
                slot.start_time = start_time;
            }
            if let Some(end_time) = patch.end_time {
                slot.end_time = end_time;
            }
            if let Some(recurring) = patch.recurring {
                slot.recurring = recurring;
            }
            if let Some(blocked_dates) = patch.blocked_dates {
                slot.blocked_dates = blocked_dates;
            }
        })
    }

    /// Mark one concrete date of a recurring window as unavailable.
    /// Blocking the same date twice is a no-op.
    pub fn block_availability_date(
        &self,
        id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AvailabilitySlot>> {
        self.modify(id, |slot: &mut AvailabilitySlot| {
            if !slot.blocked_dates.contains(&date) {
                slot.blocked_dates.push(date);
            }
        })
    }

    pub fn delete_availability(&self, id: Uuid) -> Result<bool> {
        self.remove::<AvailabilitySlot>(id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::models::DayOfWeek;

    fn window(tutor_id: Uuid, start: (u32, u32), end: (u32, u32)) -> NewAvailabilitySlot {
        NewAvailabilitySlot {
            tutor_id,
            day_of_week: DayOfWeek::Wednesday,
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            recurring: true,
        }
    }

    #[test]
    fn create_then_read() {
        let store = Store::in_memory();
        let tutor = Uuid::new_v4();
        let created = store.create_availability(window(tutor, (9, 0), (12, 0))).unwrap();

        assert_eq!(store.get_availability(created.id), Some(created.clone()));
        assert_eq!(store.availability_for_tutor(tutor), vec![created]);
    }

    #[test]
    fn inverted_times_are_stored_as_given() {
        let store = Store::in_memory();
        let created = store
            .create_availability(window(Uuid::new_v4(), (18, 0), (9, 0)))
            .unwrap();

        let fetched = store.get_availability(created.id).unwrap();
        assert!(fetched.start_time > fetched.end_time);
    }

    #[test]
    fn blocking_a_date_is_idempotent() {
        let store = Store::in_memory();
        let created = store
            .create_availability(window(Uuid::new_v4(), (9, 0), (12, 0)))
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();

        store.block_availability_date(created.id, date).unwrap();
        let slot = store.block_availability_date(created.id, date).unwrap().unwrap();

        assert_eq!(slot.blocked_dates, vec![date]);
    }

    #[test]
    fn patch_changes_only_named_fields() {
        let store = Store::in_memory();
        let created = store
            .create_availability(window(Uuid::new_v4(), (9, 0), (12, 0)))
            .unwrap();

        let patch = AvailabilityPatch {
            recurring: Some(false),
            ..Default::default()
        };
        let updated = store.update_availability(created.id, patch).unwrap().unwrap();

        assert!(!updated.recurring);
        assert_eq!(updated.day_of_week, created.day_of_week);
        assert_eq!(updated.start_time, created.start_time);
    }

    #[test]
    fn delete_is_terminal() {
        let store = Store::in_memory();
        let created = store
            .create_availability(window(Uuid::new_v4(), (9, 0), (12, 0)))
            .unwrap();

        assert!(store.delete_availability(created.id).unwrap());
        assert!(store.get_availability(created.id).is_none());
        assert!(!store.delete_availability(created.id).unwrap());
    }
}
