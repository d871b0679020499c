//! Afterglow scheduler: the single deferred "settle" action.
//!
//! Turning the knob changes brightness live, but publishing every
//! intermediate value would flood the broker.  Each knob movement
//! instead (re)arms one settle action for the lamp it moved; it fires
//! once the knob has been still for the quiet period.
//!
//! ```text
//!  knob ─┬─ schedule ─┬─ schedule ─┬─ schedule ────── quiet ──────▶ fire (1×)
//!        │  (replace) │  (replace) │
//!        ▼            ▼            ▼
//!     ┌─────────────────────────────────┐
//!     │  pending: Option<PendingSettle> │   one slot, never a queue
//!     └─────────────────────────────────┘
//! ```
//!
//! The slot remembers which lamp it settles, so a selection change during
//! the quiet period does not redirect the publish.  Arming it for another
//! lamp hands the displaced lamp back to the caller to settle at once.

use log::debug;

use crate::lamp::LampId;

/// Internal bookkeeping for the armed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSettle {
    /// Monotonic ms at which the action becomes due.
    due_ms: u32,
    lamp: LampId,
}

/// Coalescing one-shot timer.
#[derive(Debug, Default)]
pub struct AfterglowScheduler {
    pending: Option<PendingSettle>,
}

impl AfterglowScheduler {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Arm the settle action for `lamp` `delay_ms` after `now_ms`,
    /// replacing any action already pending.  Returns the lamp of a
    /// replaced action when it belonged to a different lamp.
    pub fn schedule(&mut self, now_ms: u32, delay_ms: u32, lamp: LampId) -> Option<LampId> {
        let due_ms = now_ms.wrapping_add(delay_ms);
        let displaced = match self.pending {
            Some(p) if p.lamp != lamp => Some(p.lamp),
            Some(_) => {
                debug!("Afterglow: re-armed, due at {} ms", due_ms);
                None
            }
            None => None,
        };
        self.pending = Some(PendingSettle { due_ms, lamp });
        displaced
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the pending action if it is due.  Yields its lamp exactly
    /// once per armed action.
    pub fn poll(&mut self, now_ms: u32) -> Option<LampId> {
        match self.pending {
            // Wrap-safe: due if `now` is at or past `due` on the u32 circle.
            Some(p) if (now_ms.wrapping_sub(p.due_ms) as i32) >= 0 => {
                self.pending = None;
                Some(p.lamp)
            }
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
