//! Blink effect for focused selection overlays.
//!
//! The controller owns at most one timer. `start` always clears the running
//! timer before arming a new one, so two overlays can never blink at once.
//! Time is supplied by the caller through [`Flicker::tick`].

use std::time::{Duration, Instant};

use crate::dom::{Document, NodeId};

/// Default toggle period.
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);
/// Shortest accepted period; shorter ones are clamped up to it.
pub const MIN_BLINK_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
struct BlinkTimer {
    target: NodeId,
    next_toggle: Instant,
}

#[derive(Debug, Clone)]
pub struct Flicker {
    period: Duration,
    timer: Option<BlinkTimer>,
}

impl Default for Flicker {
    fn default() -> Self {
        Self::new(BLINK_PERIOD)
    }
}

impl Flicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_BLINK_PERIOD),
            timer: None,
        }
    }

    /// Start blinking `target`, replacing any running timer.
    pub fn start(&mut self, target: NodeId, now: Instant) {
        self.stop();
        self.timer = Some(BlinkTimer {
            target,
            next_toggle: now + self.period,
        });
    }

    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            log::trace!("flicker stopped on {:?}", timer.target);
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Apply every toggle due by `now`. Returns how many fired.
    ///
    /// Missed periods are counted, not replayed: an even number of due
    /// toggles leaves the target as it was.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> usize {
        let Some(timer) = self.timer.as_mut() else {
            return 0;
        };
        if now < timer.next_toggle {
            return 0;
        }
        let period = self.period.as_nanos();
        let overdue = (now - timer.next_toggle).as_nanos();
        let fired = overdue / period + 1;
        let until_next = period - overdue % period;
        let until_next = u64::try_from(until_next).unwrap_or(u64::MAX);
        timer.next_toggle = now + Duration::from_nanos(until_next);
        if fired % 2 == 1 {
            if doc.is_hidden(timer.target) {
                doc.show(timer.target);
            } else {
                doc.hide(timer.target);
            }
        }
        usize::try_from(fired).unwrap_or(usize::MAX)
    }
}
