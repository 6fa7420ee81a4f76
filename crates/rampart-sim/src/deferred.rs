//! Delayed actions keyed by simulation time.
//!
//! Nothing here holds a reference into the world. Each action is re-checked
//! by the engine when it comes due and dropped if it no longer applies.

use rampart_core::types::SlotId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    /// A rapid-fire follow-up at a fixed target.
    FollowUpShot {
        target: SlotId,
        damage: f32,
        is_crit: bool,
    },
    /// Automatic start of the next wave after a clear.
    StartNextWave,
}

#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    entries: Vec<(f64, DeferredAction)>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, action: DeferredAction) {
        self.entries.push((due_ms, action));
    }

    /// Remove and return every action due at or before `now_ms`, earliest
    /// first. Equal due times keep scheduling order.
    pub fn pop_due(&mut self, now_ms: f64) -> Vec<DeferredAction> {
        let mut due: Vec<(f64, DeferredAction)> = Vec::new();
        self.entries.retain(|entry| {
            if entry.0 <= now_ms {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, action)| action).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop pending automatic wave starts.
    pub fn cancel_wave_starts(&mut self) {
        self.entries
            .retain(|(_, action)| *action != DeferredAction::StartNextWave);
    }

    /// Whether an automatic wave start is pending.
    pub fn has_wave_start(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, action)| *action == DeferredAction::StartNextWave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(n: u32) -> DeferredAction {
        DeferredAction::FollowUpShot {
            target: SlotId(n),
            damage: 5.0,
            is_crit: false,
        }
    }

    #[test]
    fn test_pops_only_due_actions_in_time_order() {
        let mut q = DeferredQueue::new();
        q.schedule(240.0, shot(2));
        q.schedule(120.0, shot(1));
        q.schedule(3000.0, DeferredAction::StartNextWave);

        assert!(q.pop_due(100.0).is_empty());
        assert_eq!(q.pop_due(250.0), vec![shot(1), shot(2)]);
        assert_eq!(q.len(), 1);
        assert!(q.has_wave_start());
        assert_eq!(q.pop_due(3000.0), vec![DeferredAction::StartNextWave]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_equal_due_times_keep_order() {
        let mut q = DeferredQueue::new();
        q.schedule(10.0, shot(5));
        q.schedule(10.0, shot(3));
        assert_eq!(q.pop_due(10.0), vec![shot(5), shot(3)]);
    }

    #[test]
    fn test_cancel_wave_starts_keeps_shots() {
        let mut q = DeferredQueue::new();
        q.schedule(5.0, DeferredAction::StartNextWave);
        q.schedule(6.0, shot(1));
        q.cancel_wave_starts();
        assert!(!q.has_wave_start());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut q = DeferredQueue::new();
        q.schedule(1.0, DeferredAction::StartNextWave);
        q.clear();
        assert!(q.pop_due(f64::MAX).is_empty());
    }
}
