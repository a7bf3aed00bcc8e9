//! The short-order grill
//!
//! Three fixed slots, each a tiny state machine: raw while cooking, perfect
//! inside the collect window, and an auto-discard the instant the burnt
//! mark is crossed. Burnt is never left observable; the slot resets in the
//! same grill tick that reaches it.
//!
//! The grill runs on its own wall-clock period (GRILL_DT), independent of
//! the physics tick. Both schedules share the bounded fish inventory; every
//! mutation of that counter happens here or at the cabin delivery site, with
//! the capacity check performed at the mutation, never read-then-write.

use serde::{Deserialize, Serialize};

use super::state::GameEvent;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CookState {
    #[default]
    Raw,
    Perfect,
    /// Transient: reached and consumed within a single grill tick
    Burnt,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GrillSlot {
    pub progress: f32,
    pub state: CookState,
    pub cooking: bool,
}

impl GrillSlot {
    fn clear(&mut self) {
        *self = GrillSlot::default();
    }
}

/// The session's three grill slots. Identity is stable for the whole
/// session; only contents mutate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Grill {
    pub slots: [GrillSlot; GRILL_SLOTS],
}

impl Grill {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    /// One fixed-period grill tick: advance every cooking slot, promote to
    /// perfect past the lower threshold, auto-discard past the burnt mark.
    pub fn advance(&mut self, events: &mut Vec<GameEvent>) {
        for slot in &mut self.slots {
            if !slot.cooking {
                continue;
            }
            slot.progress += GRILL_INCREMENT;
            if slot.progress >= GRILL_BURNT_AT {
                slot.clear();
                events.push(GameEvent::FishBurnt);
            } else if slot.progress >= GRILL_PERFECT_AT && slot.state == CookState::Raw {
                slot.state = CookState::Perfect;
                events.push(GameEvent::FishReady);
            }
        }
    }

    /// Place a fresh fish on the first slot that is not cooking, by slot
    /// order. Silently dropped when all three are busy (no queue).
    pub fn place_fish(&mut self) -> bool {
        for slot in &mut self.slots {
            if !slot.cooking {
                slot.progress = 0.0;
                slot.state = CookState::Raw;
                slot.cooking = true;
                return true;
            }
        }
        false
    }

    /// Tap a slot. Only a cooking slot in the perfect window collects, and
    /// only while the shared inventory has room; everything else is a no-op
    /// in the core (the too-early shake is presentation feedback).
    pub fn tap(&mut self, index: usize, inventory: &mut u8, events: &mut Vec<GameEvent>) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if !slot.cooking {
            return;
        }
        if slot.state == CookState::Perfect && *inventory < FISH_CAPACITY {
            *inventory += 1;
            slot.clear();
            events.push(GameEvent::FishCollected);
        }
    }
}
