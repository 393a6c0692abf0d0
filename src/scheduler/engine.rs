//! Alarm scheduler for the alarm clock.
//!
//! This module provides the state object shared by the polling loop and
//! the interactive menu:
//! - Registry operations (add, delete, list)
//! - Due-alarm evaluation guarded against overlapping handling cycles
//! - Snooze and dismiss transitions applied through an `AlarmHandle`
//! - Event firing for logging and external integrations

use tokio::sync::mpsc;

use crate::types::{AlarmConfig, AlarmEntry, Now, TimeOfDay, Weekday};

use super::registry::AlarmRegistry;

// ============================================================================
// AlarmEvent
// ============================================================================

/// Scheduler events for logging and external integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmEvent {
    /// Alarm registered
    Added {
        /// Index of the new alarm
        index: usize,
        /// Trigger time
        time: TimeOfDay,
        /// Trigger weekday
        day: Weekday,
    },
    /// Alarm removed
    Deleted {
        /// Index the alarm had before removal
        index: usize,
    },
    /// Alarm became due and a handling cycle started
    Triggered {
        /// Index of the due alarm
        index: usize,
        /// Time it was due at
        time: TimeOfDay,
        /// Weekday it was due on
        day: Weekday,
    },
    /// Alarm postponed
    Snoozed {
        /// Index of the alarm
        index: usize,
        /// New trigger time
        next: TimeOfDay,
        /// Snoozes used so far
        snooze_count: u32,
    },
    /// Snooze refused because the limit was reached
    SnoozeExhausted {
        /// Index of the alarm
        index: usize,
    },
    /// Alarm deactivated for good
    Dismissed {
        /// Index of the alarm
        index: usize,
    },
}

// ============================================================================
// AlarmHandle
// ============================================================================

/// Proof that a handling cycle is open for one due alarm.
///
/// Only `AlarmScheduler::evaluate` creates handles, and only `snooze`,
/// `dismiss` and `respond` consume them. Holding a handle means the
/// scheduler's guard is held.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a handle must be passed to snooze, dismiss or respond to end the handling cycle"]
pub struct AlarmHandle {
    index: usize,
    time: TimeOfDay,
    day: Weekday,
    snooze_count: u32,
}

impl AlarmHandle {
    /// Index of the due alarm when it was evaluated.
    ///
    /// Later deletions may shift the alarm; the scheduler tracks that itself.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Time the alarm was due at.
    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Weekday the alarm was due on.
    pub fn day(&self) -> Weekday {
        self.day
    }

    /// Snoozes used before this trigger.
    pub fn snooze_count(&self) -> u32 {
        self.snooze_count
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Result of a snooze request.
#[derive(Debug, PartialEq, Eq)]
pub enum SnoozeOutcome {
    /// Alarm postponed; the handling cycle is over.
    Snoozed {
        /// New trigger time
        next: TimeOfDay,
        /// Snoozes used so far
        snooze_count: u32,
    },
    /// Snooze limit reached. The handle is returned so the caller can
    /// dismiss; the handling cycle is still open.
    Exhausted(AlarmHandle),
}

/// Final decision applied to a triggered alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Alarm postponed to `next`
    Snoozed {
        /// New trigger time
        next: TimeOfDay,
        /// Snoozes used so far
        snooze_count: u32,
    },
    /// Alarm deactivated
    Dismissed,
}

// ============================================================================
// AlarmScheduler
// ============================================================================

/// Owns the alarms and the reentrancy guard for due-alarm handling.
pub struct AlarmScheduler {
    /// Stored alarms
    registry: AlarmRegistry,
    /// Snooze and polling configuration
    config: AlarmConfig,
    /// Current index of the alarm being handled, while a cycle is open
    handling: Option<usize>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<AlarmEvent>,
}

impl AlarmScheduler {
    /// Creates an empty scheduler with the given configuration and event channel.
    pub fn new(config: AlarmConfig, event_tx: mpsc::UnboundedSender<AlarmEvent>) -> Self {
        Self {
            registry: AlarmRegistry::new(),
            config,
            handling: None,
            event_tx,
        }
    }

    /// Registers an active alarm and returns its index.
    pub fn add(&mut self, time: TimeOfDay, day: Weekday) -> usize {
        let index = self.registry.add(time, day);
        tracing::debug!(index, %time, %day, "alarm added");
        self.emit(AlarmEvent::Added { index, time, day });
        index
    }

    /// Removes the alarm at `index`. Returns false if there is none.
    ///
    /// The alarm of an open handling cycle cannot be deleted. Deleting an
    /// earlier alarm moves the cycle along with the shifted index.
    pub fn delete(&mut self, index: usize) -> bool {
        if self.handling == Some(index) {
            tracing::debug!(index, "alarm is being handled, not deleted");
            return false;
        }

        let deleted = self.registry.delete(index);
        if deleted {
            if let Some(current) = self.handling.as_mut() {
                if *current > index {
                    *current -= 1;
                }
            }
            tracing::debug!(index, "alarm deleted");
            self.emit(AlarmEvent::Deleted { index });
        }
        deleted
    }

    /// Lists the alarms in storage order.
    pub fn list(&self) -> impl Iterator<Item = AlarmEntry> + '_ {
        self.registry.list()
    }

    /// Checks for a due alarm and opens a handling cycle for it.
    ///
    /// Returns `None` without scanning while another cycle is open.
    pub fn evaluate(&mut self, now: &Now) -> Option<AlarmHandle> {
        if self.handling.is_some() {
            tracing::trace!("evaluation skipped: alarm handling in progress");
            return None;
        }

        let (index, alarm) = self.registry.find_due(now)?;
        let handle = AlarmHandle {
            index,
            time: alarm.time(),
            day: alarm.day(),
            snooze_count: alarm.snooze_count(),
        };

        self.handling = Some(index);
        tracing::debug!(index, time = %handle.time, day = %handle.day, "alarm due");
        self.emit(AlarmEvent::Triggered {
            index,
            time: handle.time,
            day: handle.day,
        });

        Some(handle)
    }

    /// Postpones the alarm to `now` plus the configured snooze length.
    ///
    /// Ends the handling cycle on success. Once the snooze limit is
    /// reached, the handle comes back in `SnoozeOutcome::Exhausted` and
    /// the cycle stays open until it is dismissed.
    pub fn snooze(&mut self, handle: AlarmHandle, now: TimeOfDay) -> SnoozeOutcome {
        let Some(index) = self.handling else {
            tracing::warn!(index = handle.index, "snooze without an open handling cycle");
            return SnoozeOutcome::Exhausted(handle);
        };
        let config = &self.config;
        let snoozed = self.registry.get_mut(index).and_then(|alarm| {
            alarm
                .snooze(now, config)
                .then(|| (alarm.time(), alarm.snooze_count()))
        });

        match snoozed {
            Some((next, snooze_count)) => {
                self.handling = None;
                tracing::debug!(index, %next, snooze_count, "alarm snoozed");
                self.emit(AlarmEvent::Snoozed {
                    index,
                    next,
                    snooze_count,
                });
                SnoozeOutcome::Snoozed { next, snooze_count }
            }
            None => {
                tracing::debug!(index, "snooze limit reached");
                self.emit(AlarmEvent::SnoozeExhausted { index });
                SnoozeOutcome::Exhausted(handle)
            }
        }
    }

    /// Deactivates the alarm for good and ends the handling cycle.
    pub fn dismiss(&mut self, handle: AlarmHandle) {
        let Some(index) = self.handling.take() else {
            tracing::warn!(index = handle.index, "dismiss without an open handling cycle");
            return;
        };
        if let Some(alarm) = self.registry.get_mut(index) {
            alarm.dismiss();
        }
        tracing::debug!(index, "alarm dismissed");
        self.emit(AlarmEvent::Dismissed { index });
    }

    /// Applies the user's answer to a triggered alarm.
    ///
    /// Snoozes when asked and still allowed, otherwise dismisses. The
    /// handling cycle is always over afterwards.
    pub fn respond(&mut self, handle: AlarmHandle, wants_snooze: bool, now: TimeOfDay) -> Resolution {
        let handle = if wants_snooze {
            match self.snooze(handle, now) {
                SnoozeOutcome::Snoozed { next, snooze_count } => {
                    return Resolution::Snoozed { next, snooze_count };
                }
                SnoozeOutcome::Exhausted(handle) => handle,
            }
        } else {
            handle
        };

        self.dismiss(handle);
        Resolution::Dismissed
    }

    /// Returns true while a handling cycle is open.
    pub fn is_handling(&self) -> bool {
        self.handling.is_some()
    }

    /// Returns the scheduler configuration.
    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &AlarmRegistry {
        &self.registry
    }

    fn emit(&self, event: AlarmEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("alarm event receiver dropped");
        }
    }
}

/// Logs every scheduler event until the sending side is dropped.
///
/// Meant to be spawned as a separate tokio task next to the session.
pub async fn log_events(mut event_rx: mpsc::UnboundedReceiver<AlarmEvent>) -> usize {
    let mut count = 0;
    while let Some(event) = event_rx.recv().await {
        count += 1;
        match &event {
            AlarmEvent::Triggered { index, time, day } => {
                tracing::info!(index, %time, %day, "alarm triggered");
            }
            AlarmEvent::SnoozeExhausted { index } => {
                tracing::warn!(index, "alarm cannot be snoozed any more");
            }
            other => tracing::info!(event = ?other, "alarm event"),
        }
    }
    count
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn monday(time: &str) -> Now {
        Now::new(Weekday::Monday, t(time))
    }

    fn create_scheduler() -> (AlarmScheduler, mpsc::UnboundedReceiver<AlarmEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AlarmScheduler::new(AlarmConfig::default(), tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<AlarmEvent>) -> Vec<AlarmEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    // ------------------------------------------------------------------------
    // Registry Operation Tests
    // ------------------------------------------------------------------------

    mod registry_operation_tests {
        use super::*;

        #[test]
        fn test_add_list_delete_scenario() {
            let (mut scheduler, _rx) = create_scheduler();

            scheduler.add(t("07:30"), "Friday".parse().unwrap());
            let entries: Vec<_> = scheduler.list().collect();
            assert_eq!(
                entries,
                vec![AlarmEntry {
                    index: 0,
                    time: t("07:30"),
                    day: Weekday::Friday,
                    active: true,
                }]
            );
            assert_eq!(entries[0].day.as_str(), "friday");

            assert!(!scheduler.delete(5));
            assert_eq!(scheduler.list().collect::<Vec<_>>(), entries);

            assert!(scheduler.delete(0));
            assert_eq!(scheduler.list().count(), 0);
        }

        #[test]
        fn test_add_and_delete_emit_events() {
            let (mut scheduler, mut rx) = create_scheduler();

            scheduler.add(t("07:30"), Weekday::Friday);
            scheduler.delete(3);
            scheduler.delete(0);

            assert_eq!(
                drain(&mut rx),
                vec![
                    AlarmEvent::Added {
                        index: 0,
                        time: t("07:30"),
                        day: Weekday::Friday,
                    },
                    AlarmEvent::Deleted { index: 0 },
                ]
            );
        }

        #[test]
        fn test_operations_survive_dropped_receiver() {
            let (mut scheduler, rx) = create_scheduler();
            drop(rx);

            assert_eq!(scheduler.add(t("09:00"), Weekday::Monday), 0);
            let handle = scheduler.evaluate(&monday("09:00")).unwrap();
            scheduler.dismiss(handle);
            assert!(scheduler.delete(0));
        }
    }

    // ------------------------------------------------------------------------
    // Evaluation Tests
    // ------------------------------------------------------------------------

    mod evaluate_tests {
        use super::*;

        #[test]
        fn test_evaluate_returns_due_alarm() {
            let (mut scheduler, mut rx) = create_scheduler();
            scheduler.add(t("09:00"), Weekday::Monday);
            drain(&mut rx);

            let handle = scheduler.evaluate(&monday("09:05")).unwrap();
            assert_eq!(handle.index(), 0);
            assert_eq!(handle.time(), t("09:00"));
            assert_eq!(handle.day(), Weekday::Monday);
            assert_eq!(handle.snooze_count(), 0);
            assert!(scheduler.is_handling());

            assert_eq!(
                drain(&mut rx),
                vec![AlarmEvent::Triggered {
                    index: 0,
                    time: t("09:00"),
                    day: Weekday::Monday,
                }]
            );
            scheduler.dismiss(handle);
        }

        #[test]
        fn test_evaluate_none_when_nothing_due() {
            let (mut scheduler, _rx) = create_scheduler();
            scheduler.add(t("09:10"), Weekday::Monday);
            scheduler.add(t("09:00"), Weekday::Tuesday);

            assert!(scheduler.evaluate(&monday("09:05")).is_none());
            assert!(!scheduler.is_handling());
        }

        #[test]
        fn test_evaluate_is_noop_while_handling() {
            let (mut scheduler, mut rx) = create_scheduler();
            scheduler.add(t("09:00"), Weekday::Monday);
            scheduler.add(t("09:01"), Weekday::Monday);

            let handle = scheduler.evaluate(&monday("09:05")).unwrap();
            drain(&mut rx);

            // Both alarms are due, but the open cycle blocks any new one
            assert!(scheduler.evaluate(&monday("09:05")).is_none());
            assert!(scheduler.evaluate(&monday("09:06")).is_none());
            assert!(drain(&mut rx).is_empty());

            scheduler.dismiss(handle);
            assert!(!scheduler.is_handling());

            let next = scheduler.evaluate(&monday("09:06")).unwrap();
            assert_eq!(next.index(), 1);
            scheduler.dismiss(next);
        }

        #[test]
        fn test_delete_before_handled_alarm_keeps_target() {
            let (mut scheduler, _rx) = create_scheduler();
            scheduler.add(t("10:00"), Weekday::Monday);
            scheduler.add(t("09:00"), Weekday::Monday);
            scheduler.add(t("11:00"), Weekday::Monday);

            let handle = scheduler.evaluate(&monday("09:05")).unwrap();
            assert_eq!(handle.index(), 1);

            assert!(scheduler.delete(0));
            scheduler.dismiss(handle);

            let entries: Vec<_> = scheduler.list().collect();
            assert_eq!(entries[0].time, t("09:00"));
            assert!(!entries[0].active);
            assert_eq!(entries[1].time, t("11:00"));
            assert!(entries[1].active);
        }

        #[test]
        fn test_delete_before_handled_alarm_then_snooze() {
            let (mut scheduler, mut rx) = create_scheduler();
            scheduler.add(t("10:00"), Weekday::Monday);
            scheduler.add(t("09:00"), Weekday::Monday);

            let handle = scheduler.evaluate(&monday("09:05")).unwrap();
            assert!(scheduler.delete(0));
            drain(&mut rx);

            assert_eq!(
                scheduler.snooze(handle, t("09:05")),
                SnoozeOutcome::Snoozed {
                    next: t("09:10"),
                    snooze_count: 1,
                }
            );
            assert_eq!(
                drain(&mut rx),
                vec![AlarmEvent::Snoozed {
                    index: 0,
                    next: t("09:10"),
                    snooze_count: 1,
                }]
            );
            assert_eq!(scheduler.list().next().unwrap().time, t("09:10"));
        }

        #[test]
        fn test_handled_alarm_cannot_be_deleted() {
            let (mut scheduler, _rx) = create_scheduler();
            scheduler.add(t("09:00"), Weekday::Monday);
            scheduler.add(t("12:00"), Weekday::Monday);

            let handle = scheduler.evaluate(&monday("09:05")).unwrap();
            assert!(!scheduler.delete(0));
            // Later alarms do not affect the open cycle
            assert!(scheduler.delete(1));

            scheduler.dismiss(handle);
            assert_eq!(scheduler.list().count(), 1);
            assert!(!scheduler.list().next().unwrap().active);
            assert!(scheduler.delete(0));
        }

        #[test]
        fn test_dismissed_alarm_never_returns() {
            let (mut scheduler, _rx) = create_scheduler();
            scheduler.add(t("00:00"), Weekday::Monday);

            let handle = scheduler.evaluate(&monday("00:00")).unwrap();
            scheduler.dismiss(handle);

            for day in Weekday::ALL {
                assert!(scheduler.evaluate(&Now::new(day, t("23:59"))).is_none());
            }
            assert!(!scheduler.list().next().unwrap().active);
        }
    }

    // ------------------------------------------------------------------------
    // Snooze and Dismiss Tests
    // ------------------------------------------------------------------------

    mod snooze_tests {
        use super::*;

        #[test]
        fn test_snooze_releases_guard() {
            let (mut scheduler, mut rx) = create_scheduler();
            scheduler.add(t("09:00"), Weekday::Monday);

            let handle = scheduler.evaluate(&monday("09:00")).unwrap();
            drain(&mut rx);

            let outcome = scheduler.snooze(handle, t("09:01"));
            assert_eq!(
                outcome,
                SnoozeOutcome::Snoozed {
                    next: t("09:06"),
                    snooze_count: 1,
                }
            );
            assert!(!scheduler.is_handling());
            assert_eq!(
                drain(&mut rx),
                vec![AlarmEvent::Snoozed {
                    index: 0,
                    next: t("09:06"),
                    snooze_count: 1,
                }]
            );

            // Not due again until the snoozed time
            assert!(scheduler.evaluate(&monday("09:05")).is_none());
            let handle = scheduler.evaluate(&monday("09:06")).unwrap();
            assert_eq!(handle.snooze_count(), 1);
            scheduler.dismiss(handle);
        }

        #[test]
        fn test_snooze_wraps_midnight() {
            let (mut scheduler, _rx) = create_scheduler();
            scheduler.add(t("23:55"), Weekday::Sunday);

            let handle = scheduler
                .evaluate(&Now::new(Weekday::Sunday, t("23:58")))
                .unwrap();
            let outcome = scheduler.snooze(handle, t("23:58"));

            assert_eq!(
                outcome,
                SnoozeOutcome::Snoozed {
                    next: t("00:03"),
                    snooze_count: 1,
                }
            );
            assert_eq!(scheduler.list().next().unwrap().time.to_string(), "00:03");
        }

        #[test]
        fn test_at_most_three_snoozes() {
            let (mut scheduler, mut rx) = create_scheduler();
            scheduler.add(t("06:00"), Weekday::Monday);

            let mut now = t("06:00");
            for expected in 1..=3 {
                let handle = scheduler.evaluate(&Now::new(Weekday::Monday, now)).unwrap();
                match scheduler.snooze(handle, now) {
                    SnoozeOutcome::Snoozed { next, snooze_count } => {
                        assert_eq!(snooze_count, expected);
                        now = next;
                    }
                    SnoozeOutcome::Exhausted(_) => panic!("snooze {expected} should succeed"),
                }
            }
            drain(&mut rx);

            let handle = scheduler.evaluate(&Now::new(Weekday::Monday, now)).unwrap();
            let handle = match scheduler.snooze(handle, now) {
                SnoozeOutcome::Exhausted(handle) => handle,
                other => panic!("expected exhaustion, got {other:?}"),
            };
            // Guard stays held until the caller dismisses
            assert!(scheduler.is_handling());
            assert!(scheduler.evaluate(&Now::new(Weekday::Monday, now)).is_none());
            assert_eq!(scheduler.registry().get(0).unwrap().time(), t("06:15"));

            scheduler.dismiss(handle);
            assert!(!scheduler.is_handling());
            assert_eq!(
                drain(&mut rx),
                vec![
                    AlarmEvent::Triggered {
                        index: 0,
                        time: t("06:15"),
                        day: Weekday::Monday,
                    },
                    AlarmEvent::SnoozeExhausted { index: 0 },
                    AlarmEvent::Dismissed { index: 0 },
                ]
            );
        }

        #[test]
        fn test_respond_snooze() {
            let (mut scheduler, _rx) = create_scheduler();
            scheduler.add(t("09:00"), Weekday::Monday);

            let handle = scheduler.evaluate(&monday("09:00")).unwrap();
            let resolution = scheduler.respond(handle, true, t("09:02"));
            assert_eq!(
                resolution,
                Resolution::Snoozed {
                    next: t("09:07"),
                    snooze_count: 1,
                }
            );
            assert!(!scheduler.is_handling());
        }

        #[test]
        fn test_respond_decline_dismisses() {
            let (mut scheduler, _rx) = create_scheduler();
            scheduler.add(t("09:00"), Weekday::Monday);

            let handle = scheduler.evaluate(&monday("09:00")).unwrap();
            assert_eq!(scheduler.respond(handle, false, t("09:00")), Resolution::Dismissed);
            assert!(!scheduler.is_handling());
            assert!(!scheduler.list().next().unwrap().active);
        }

        #[test]
        fn test_respond_falls_back_to_dismiss_when_exhausted() {
            let (tx, _rx) = mpsc::unbounded_channel();
            let config = AlarmConfig::default().with_max_snoozes(0);
            let mut scheduler = AlarmScheduler::new(config, tx);
            scheduler.add(t("09:00"), Weekday::Monday);

            let handle = scheduler.evaluate(&monday("09:00")).unwrap();
            assert_eq!(scheduler.respond(handle, true, t("09:00")), Resolution::Dismissed);
            assert!(!scheduler.is_handling());
            assert!(!scheduler.list().next().unwrap().active);
        }

        #[tokio::test]
        async fn test_log_events_drains_until_sender_dropped() {
            let (mut scheduler, rx) = create_scheduler();
            scheduler.add(t("09:00"), Weekday::Monday);
            let handle = scheduler.evaluate(&monday("09:00")).unwrap();
            scheduler.dismiss(handle);
            drop(scheduler);

            // Added, Triggered, Dismissed
            assert_eq!(log_events(rx).await, 3);
        }

        #[test]
        fn test_custom_snooze_length() {
            let (tx, _rx) = mpsc::unbounded_channel();
            let config = AlarmConfig::default().with_snooze_minutes(15);
            let mut scheduler = AlarmScheduler::new(config, tx);
            scheduler.add(t("09:00"), Weekday::Monday);

            let handle = scheduler.evaluate(&monday("09:00")).unwrap();
            assert_eq!(
                scheduler.respond(handle, true, t("09:00")),
                Resolution::Snoozed {
                    next: t("09:15"),
                    snooze_count: 1,
                }
            );
            assert_eq!(scheduler.config().snooze_minutes, 15);
        }
    }
}
