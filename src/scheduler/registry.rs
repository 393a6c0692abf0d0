//! Ordered alarm storage.
//!
//! Alarms are addressed by their current position. Deleting an alarm
//! shifts every later alarm down by one, so callers re-list after any
//! mutation instead of holding on to indices.

use crate::types::{Alarm, AlarmEntry, Now, TimeOfDay, Weekday};

// ============================================================================
// AlarmRegistry
// ============================================================================

/// Insertion-ordered collection of alarms.
#[derive(Debug, Default, Clone)]
pub struct AlarmRegistry {
    alarms: Vec<Alarm>,
}

impl AlarmRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an active alarm and returns its index.
    pub fn add(&mut self, time: TimeOfDay, day: Weekday) -> usize {
        self.alarms.push(Alarm::new(time, day));
        self.alarms.len() - 1
    }

    /// Removes the alarm at `index`.
    ///
    /// Returns false and leaves the registry untouched when `index` is out
    /// of range.
    pub fn delete(&mut self, index: usize) -> bool {
        if index < self.alarms.len() {
            self.alarms.remove(index);
            true
        } else {
            false
        }
    }

    /// Iterates over the alarms in storage order.
    ///
    /// Calling this again restarts the listing from index 0.
    pub fn list(&self) -> impl Iterator<Item = AlarmEntry> + '_ {
        self.alarms
            .iter()
            .enumerate()
            .map(|(index, alarm)| AlarmEntry::from_alarm(index, alarm))
    }

    /// Returns the first alarm, in storage order, that is due at `now`.
    ///
    /// Only one alarm is reported per call; other alarms due at the same
    /// moment are picked up by later calls.
    pub fn find_due(&self, now: &Now) -> Option<(usize, &Alarm)> {
        self.alarms
            .iter()
            .enumerate()
            .find(|(_, alarm)| alarm.is_due(now))
    }

    /// Returns the alarm at `index`.
    pub fn get(&self, index: usize) -> Option<&Alarm> {
        self.alarms.get(index)
    }

    /// Returns the alarm at `index` for mutation.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Alarm> {
        self.alarms.get_mut(index)
    }

    /// Returns the number of alarms, active or not.
    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    /// Returns true if no alarms are registered.
    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
