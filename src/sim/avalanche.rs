//! The pursuing avalanche
//!
//! A single front position advancing on a piecewise-linear speed schedule
//! keyed on elapsed run time. The front never retreats and never leads the
//! player by more than AVALANCHE_LEAD_CLAMP, so a fresh run cannot end
//! before the first frame renders.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Speed schedule segments: (start second, base speed, speed gain per
/// second into the segment). Later segments flatten out, approaching a cap
/// asymptotically.
const SCHEDULE: [(f32, f32, f32); 5] = [
    (0.0, 180.0, 2.0),
    (30.0, 240.0, 1.5),
    (60.0, 285.0, 1.0),
    (120.0, 345.0, 0.5),
    (240.0, 405.0, 0.2),
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Avalanche {
    /// Leading edge of the snow front
    pub x: f32,
}

impl Avalanche {
    pub fn new(x: f32) -> Self {
        Self { x }
    }

    /// Target speed for the given elapsed run time
    pub fn target_speed(elapsed: f32) -> f32 {
        let mut segment = SCHEDULE[0];
        for candidate in SCHEDULE {
            if elapsed >= candidate.0 {
                segment = candidate;
            }
        }
        let (start, base, rate) = segment;
        base + rate * (elapsed - start)
    }

    /// Advance one tick. Invincibility slows the approach; the front is
    /// clamped to the lead limit and never moves backward.
    pub fn advance(&mut self, elapsed: f32, dt: f32, player_x: f32, player_invincible: bool) {
        let mut speed = Self::target_speed(elapsed);
        if player_invincible {
            speed -= AVALANCHE_INVINCIBLE_SLOW;
        }
        let advanced = self.x + speed.max(0.0) * dt;
        self.x = advanced.min(player_x + AVALANCHE_LEAD_CLAMP).max(self.x);
    }

    /// Loss condition: the front has passed within the kill gap
    pub fn caught(&self, player_x: f32) -> bool {
        self.x > player_x - AVALANCHE_KILL_GAP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_schedule_is_continuous_and_increasing() {
        // Each segment's base must match the previous segment's end value
        for pair in SCHEDULE.windows(2) {
            let (start_a, base_a, rate_a) = pair[0];
            let (start_b, base_b, _) = pair[1];
            let end_of_a = base_a + rate_a * (start_b - start_a);
            assert!((end_of_a - base_b).abs() < 1e-3);
        }
        // Target speed grows with elapsed time
        let mut prev = Avalanche::target_speed(0.0);
        for t in 1..600 {
            let speed = Avalanche::target_speed(t as f32);
            assert!(speed >= prev);
            prev = speed;
        }
    }

    #[test]
    fn test_later_segments_flatten() {
        for pair in SCHEDULE.windows(2) {
            assert!(pair[1].2 < pair[0].2);
        }
    }

    #[test]
    fn test_invincibility_slows_approach() {
        let mut fast = Avalanche::new(0.0);
        let mut slow = Avalanche::new(0.0);
        for _ in 0..120 {
            fast.advance(10.0, SIM_DT, 1.0e6, false);
            slow.advance(10.0, SIM_DT, 1.0e6, true);
        }
        assert!(slow.x < fast.x);
    }

    #[test]
    fn test_lead_clamp_does_not_retreat() {
        let mut avalanche = Avalanche::new(500.0);
        // Player far behind the front: clamp target is below current x
        avalanche.advance(0.0, SIM_DT, 100.0, false);
        assert_eq!(avalanche.x, 500.0);
    }

    #[test]
    fn test_caught_boundary() {
        let avalanche = Avalanche::new(70.0);
        assert!(!avalanche.caught(100.0 + 1e-3));
        assert!(avalanche.caught(99.0));
    }

    proptest! {
        #[test]
        fn prop_front_monotonic_and_clamped(
            start in -1000.0f32..0.0,
            player_x in 0.0f32..5000.0,
            steps in 1usize..500,
            invincible in proptest::bool::ANY,
        ) {
            let mut avalanche = Avalanche::new(start);
            let mut elapsed = 0.0f32;
            let mut prev = avalanche.x;
            for _ in 0..steps {
                avalanche.advance(elapsed, SIM_DT, player_x, invincible);
                prop_assert!(avalanche.x >= prev);
                prop_assert!(avalanche.x <= player_x + AVALANCHE_LEAD_CLAMP);
                prev = avalanche.x;
                elapsed += SIM_DT;
            }
        }
    }
}
