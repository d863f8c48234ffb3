use std::collections::{BTreeMap, HashMap};

use crate::world::{Axis, EntityId};

/// What a pending timer will do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Ease(Axis),
    Retarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TimerSlot {
    entity: EntityId,
    kind: TimerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    pub entity: EntityId,
    pub kind: TimerKind,
    pub due_us: u64,
}

/// One-shot timers on a virtual clock measured in whole microseconds.
///
/// Each `(entity, kind)` slot holds at most one timer. Timers fire in due order, ties in
/// scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now_us: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), TimerSlot>,
    slots: HashMap<TimerSlot, (u64, u64)>,
}

impl TimerQueue {
    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    pub fn now_ms(&self) -> f64 {
        self.now_us as f64 / 1000.0
    }

    /// Arms the slot `delay_ms` from now, replacing whatever it held. Returns the due time.
    pub fn schedule(&mut self, entity: EntityId, kind: TimerKind, delay_ms: f64) -> u64 {
        let slot = TimerSlot { entity, kind };
        self.remove_slot(slot);

        let delay_us = if delay_ms.is_finite() && delay_ms > 0.0 {
            (delay_ms * 1000.0).round() as u64
        } else {
            0
        };
        let due_us = self.now_us.saturating_add(delay_us);
        let key = (due_us, self.next_seq);
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queue.insert(key, slot);
        self.slots.insert(slot, key);
        due_us
    }

    pub fn cancel(&mut self, entity: EntityId, kind: TimerKind) -> bool {
        self.remove_slot(TimerSlot { entity, kind })
    }

    /// Cancels every timer owned by `entity`; returns how many were pending.
    pub fn cancel_entity(&mut self, entity: EntityId) -> usize {
        let owned: Vec<TimerSlot> = self
            .slots
            .keys()
            .filter(|slot| slot.entity == entity)
            .copied()
            .collect();
        owned
            .into_iter()
            .filter(|slot| self.remove_slot(*slot))
            .count()
    }

    pub fn is_armed(&self, entity: EntityId, kind: TimerKind) -> bool {
        self.slots.contains_key(&TimerSlot { entity, kind })
    }

    pub fn due_at(&self, entity: EntityId, kind: TimerKind) -> Option<u64> {
        self.slots
            .get(&TimerSlot { entity, kind })
            .map(|(due_us, _)| *due_us)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Removes the earliest timer due at or before `deadline_us` and moves the clock to it.
    pub fn pop_due(&mut self, deadline_us: u64) -> Option<DueTimer> {
        let (&key, _) = self.queue.iter().next()?;
        if key.0 > deadline_us {
            return None;
        }
        let slot = self.queue.remove(&key)?;
        self.slots.remove(&slot);
        self.now_us = self.now_us.max(key.0);
        Some(DueTimer {
            entity: slot.entity,
            kind: slot.kind,
            due_us: key.0,
        })
    }

    pub fn advance_to(&mut self, now_us: u64) {
        self.now_us = self.now_us.max(now_us);
    }

    fn remove_slot(&mut self, slot: TimerSlot) -> bool {
        match self.slots.remove(&slot) {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: EntityId = EntityId(1);
    const B: EntityId = EntityId(2);

    #[test]
    fn timers_fire_in_due_order_with_ties_by_schedule_order() {
        let mut timers = TimerQueue::default();
        timers.schedule(A, TimerKind::Retarget, 5.0);
        timers.schedule(B, TimerKind::Ease(Axis::X), 2.0);
        timers.schedule(A, TimerKind::Ease(Axis::Y), 2.0);

        let order: Vec<(EntityId, TimerKind)> =
            std::iter::from_fn(|| timers.pop_due(10_000))
                .map(|timer| (timer.entity, timer.kind))
                .collect();
        assert_eq!(
            order,
            vec![
                (B, TimerKind::Ease(Axis::X)),
                (A, TimerKind::Ease(Axis::Y)),
                (A, TimerKind::Retarget),
            ]
        );
        assert_eq!(timers.now_us(), 5_000);
    }

    #[test]
    fn rescheduling_a_slot_replaces_the_pending_timer() {
        let mut timers = TimerQueue::default();
        timers.schedule(A, TimerKind::Ease(Axis::X), 10.0);
        timers.schedule(A, TimerKind::Ease(Axis::X), 3.0);

        assert_eq!(timers.pending_count(), 1);
        assert_eq!(timers.due_at(A, TimerKind::Ease(Axis::X)), Some(3_000));
        assert!(timers.pop_due(3_000).is_some());
        assert!(timers.pop_due(20_000).is_none());
    }

    #[test]
    fn timers_after_the_deadline_stay_queued() {
        let mut timers = TimerQueue::default();
        timers.schedule(A, TimerKind::Retarget, 1.5);
        assert!(timers.pop_due(1_499).is_none());
        assert!(timers.is_armed(A, TimerKind::Retarget));
        assert!(timers.pop_due(1_500).is_some());
        assert!(!timers.is_armed(A, TimerKind::Retarget));
    }

    #[test]
    fn cancel_entity_clears_every_slot_it_owns() {
        let mut timers = TimerQueue::default();
        timers.schedule(A, TimerKind::Ease(Axis::X), 1.0);
        timers.schedule(A, TimerKind::Ease(Axis::Y), 1.0);
        timers.schedule(A, TimerKind::Retarget, 1.0);
        timers.schedule(B, TimerKind::Retarget, 1.0);

        assert_eq!(timers.cancel_entity(A), 3);
        assert_eq!(timers.pending_count(), 1);
        assert!(timers.is_armed(B, TimerKind::Retarget));
        assert!(!timers.cancel(A, TimerKind::Retarget));
    }

    #[test]
    fn scheduling_is_relative_to_the_virtual_clock() {
        let mut timers = TimerQueue::default();
        timers.advance_to(4_000);
        assert_eq!(timers.schedule(A, TimerKind::Retarget, 2.0), 6_000);
        assert_eq!(timers.now_ms(), 4.0);
        timers.advance_to(1_000);
        assert_eq!(timers.now_us(), 4_000);
    }
}
