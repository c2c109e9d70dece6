//! Deferred actions: mission outcomes that take effect after a delay.
//!
//! Stored in `SimulationEngine`, NOT as ECS entities. Due times are compared
//! against the simulation clock every tick; nothing sleeps.

/// An outcome waiting for its delay to elapse.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredAction {
    /// Resolve the mission as failed (crash sequence finished).
    ResolveFailure { reason: String },
    /// Resolve the mission as completed (last target destroyed).
    ResolveVictory,
    /// Evaluate objectives after arriving back at base.
    ResolveReturnArrival,
    /// Decide what to do after running out of ammunition.
    AmmoExhausted,
}

#[derive(Debug, Clone)]
struct Deferred {
    due_at_secs: f64,
    action: DeferredAction,
}

/// Queue of pending deferred actions, ordered by due time.
#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    pending: Vec<Deferred>,
}

impl DeferredQueue {
    /// Schedule `action` to fire `delay_secs` after `now_secs`.
    pub fn schedule(&mut self, now_secs: f64, delay_secs: f64, action: DeferredAction) {
        let due_at_secs = now_secs + delay_secs;
        let index = self
            .pending
            .iter()
            .position(|d| d.due_at_secs > due_at_secs)
            .unwrap_or(self.pending.len());
        self.pending.insert(
            index,
            Deferred {
                due_at_secs,
                action,
            },
        );
    }

    /// Remove and return every action due at or before `now_secs`, oldest first.
    pub fn take_due(&mut self, now_secs: f64) -> Vec<DeferredAction> {
        let split = self
            .pending
            .iter()
            .position(|d| d.due_at_secs > now_secs)
            .unwrap_or(self.pending.len());
        self.pending.drain(..split).map(|d| d.action).collect()
    }

    /// Cancel everything (mission reset or teardown).
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
