//! Procedural slope generation and ground queries
//!
//! The ground is a piecewise-linear curve sampled every SEGMENT_WIDTH
//! pixels. Each new sample drops by a constant grade plus a smooth sinusoid
//! and a bounded jitter, then rolls for decoration and gameplay spawns.
//! Collections are pruned from the front once they fall a screen behind the
//! player.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{
    Decoration, DecorationKind, GameState, Obstacle, ObstacleKind, PowerUp, PowerUpKind,
};
use crate::consts::*;

/// A single ground height sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TerrainPoint {
    pub x: f32,
    pub y: f32,
}

/// Interpolated ground info at an x position
#[derive(Debug, Clone, Copy)]
pub struct GroundSample {
    pub height: f32,
    /// Slope angle, radians. Positive means descending (y grows downward).
    pub angle: f32,
}

/// Spawns stay at least this far ahead of the player so a fresh run never
/// drops a rock on the spawn point.
const SPAWN_MARGIN: f32 = 200.0;

/// Extend the ground line until it reaches TERRAIN_LOOKAHEAD past the
/// player, one segment at a time, rolling spawns for each new sample.
pub fn ensure_ahead(state: &mut GameState) {
    if state.terrain.is_empty() {
        // Seed the curve one screen behind the spawn point
        state.terrain.push_back(TerrainPoint {
            x: state.player.pos.x - SCREEN_W,
            y: 0.0,
        });
    }

    let target = state.player.pos.x + TERRAIN_LOOKAHEAD;
    let Some(mut prev) = state.terrain.back().copied() else {
        return;
    };
    while prev.x < target {
        let x = prev.x + SEGMENT_WIDTH;

        let wave = (x * NOISE_WAVE_FREQ * std::f32::consts::TAU).sin() * NOISE_WAVE_AMP;
        let jitter = state.rng.random_range(-NOISE_JITTER..NOISE_JITTER);
        let y = prev.y + SLOPE_DROP + wave + jitter;

        prev = TerrainPoint { x, y };
        state.terrain.push_back(prev);

        if x > state.player.pos.x + SPAWN_MARGIN {
            roll_spawns(state, x, y);
        }
    }
}

/// Per-sample spawn draws.
///
/// The decoration draw is independent; the obstacle and power-up draws are
/// sequential (power-up only on the obstacle miss branch) so a sample never
/// produces both. The draw order is load-bearing for observed spawn density;
/// do not normalize into independent probabilities.
fn roll_spawns(state: &mut GameState, x: f32, ground_y: f32) {
    if state.rng.random::<f32>() < DECORATION_PROB {
        let (kind, width, height) = if state.rng.random::<f32>() < CABIN_PROB {
            (DecorationKind::Cabin, 70.0, 60.0)
        } else if state.rng.random::<f32>() < 0.5 {
            (DecorationKind::TreeTall, 26.0, 80.0)
        } else {
            (DecorationKind::TreeShort, 22.0, 50.0)
        };
        state.decorations.push_back(Decoration {
            pos: Vec2::new(x, ground_y),
            kind,
            width,
            height,
            delivered: false,
        });
    }

    if state.rng.random::<f32>() < OBSTACLE_PROB {
        let width = state.rng.random_range(28.0..46.0);
        let height = state.rng.random_range(20.0..36.0);
        state.obstacles.push_back(Obstacle {
            pos: Vec2::new(x, ground_y),
            kind: ObstacleKind::Rock,
            width,
            height,
            passed: false,
        });
    } else if state.rng.random::<f32>() < POWERUP_PROB {
        let kind = if state.rng.random::<f32>() < FISH_WEIGHT {
            PowerUpKind::Fish
        } else {
            PowerUpKind::Sunglasses
        };
        let hover = POWERUP_HOVER + state.rng.random_range(-20.0..20.0);
        state.powerups.push_back(PowerUp {
            pos: Vec2::new(x, ground_y - hover),
            kind,
            collected: false,
        });
    }
}

/// Drop everything that has scrolled a full screen behind the player.
/// Collections are x-ordered so the oldest element is always at the front.
pub fn prune(state: &mut GameState) {
    let cutoff = state.player.pos.x - SCREEN_W;

    // Keep at least one segment so ground queries stay valid
    while state.terrain.len() > 2 && state.terrain.front().is_some_and(|p| p.x < cutoff) {
        state.terrain.pop_front();
    }
    while state.obstacles.front().is_some_and(|o| o.pos.x < cutoff) {
        state.obstacles.pop_front();
    }
    while state.decorations.front().is_some_and(|d| d.pos.x < cutoff) {
        state.decorations.pop_front();
    }
    while state.powerups.front().is_some_and(|p| p.pos.x < cutoff) {
        state.powerups.pop_front();
    }
}

/// Interpolated ground height and slope angle at `x`.
///
/// Outside the generated range this reports NO_GROUND (effectively no floor).
/// Normal play never reaches that path; it exists as a defensive fallback.
pub fn ground_at(terrain: &VecDeque<TerrainPoint>, x: f32) -> GroundSample {
    for (a, b) in terrain.iter().zip(terrain.iter().skip(1)) {
        if x >= a.x && x <= b.x {
            let t = (x - a.x) / (b.x - a.x);
            let height = a.y + (b.y - a.y) * t;
            let angle = (b.y - a.y).atan2(b.x - a.x);
            return GroundSample { height, angle };
        }
    }
    GroundSample {
        height: NO_GROUND,
        angle: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_terrain(n: usize) -> VecDeque<TerrainPoint> {
        (0..n)
            .map(|i| TerrainPoint {
                x: i as f32 * SEGMENT_WIDTH,
                y: 100.0,
            })
            .collect()
    }

    #[test]
    fn test_ground_interpolation_midpoint() {
        let mut terrain = flat_terrain(2);
        terrain[1].y = 160.0;
        let mid = ground_at(&terrain, SEGMENT_WIDTH / 2.0);
        assert!((mid.height - 130.0).abs() < 1e-3);
        // Descending segment reports a positive slope angle
        assert!(mid.angle > 0.0);
    }

    #[test]
    fn test_ground_query_out_of_range_is_sentinel() {
        let terrain = flat_terrain(4);
        let sample = ground_at(&terrain, -50.0);
        assert_eq!(sample.height, NO_GROUND);
        let sample = ground_at(&terrain, 4.0 * SEGMENT_WIDTH + 1.0);
        assert_eq!(sample.height, NO_GROUND);
    }

    #[test]
    fn test_ensure_ahead_reaches_lookahead() {
        let state = GameState::new(11);
        let last = state.terrain.back().unwrap();
        assert!(last.x >= state.player.pos.x + TERRAIN_LOOKAHEAD);
    }

    #[test]
    fn test_generation_is_seed_deterministic() {
        let a = GameState::new(99);
        let b = GameState::new(99);
        assert_eq!(a.terrain.len(), b.terrain.len());
        for (pa, pb) in a.terrain.iter().zip(b.terrain.iter()) {
            assert_eq!(pa.x, pb.x);
            assert_eq!(pa.y, pb.y);
        }
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.powerups.len(), b.powerups.len());
    }

    #[test]
    fn test_prune_drops_trailing_entities() {
        let mut state = GameState::new(5);
        // Walk the player far forward and regenerate, then prune
        state.player.pos.x = 5000.0;
        ensure_ahead(&mut state);
        prune(&mut state);

        let cutoff = state.player.pos.x - SCREEN_W;
        assert!(state.terrain.front().unwrap().x >= cutoff - SEGMENT_WIDTH);
        assert!(state.obstacles.iter().all(|o| o.pos.x >= cutoff));
        assert!(state.decorations.iter().all(|d| d.pos.x >= cutoff));
        assert!(state.powerups.iter().all(|p| p.pos.x >= cutoff));
        // Ground under the player must still resolve
        let sample = ground_at(&state.terrain, state.player.pos.x);
        assert!(sample.height < NO_GROUND);
    }

    #[test]
    fn test_spawns_stay_ahead_of_player() {
        let state = GameState::new(21);
        for o in &state.obstacles {
            assert!(o.pos.x > state.player.pos.x + SPAWN_MARGIN);
        }
        for p in &state.powerups {
            assert!(p.pos.x > state.player.pos.x + SPAWN_MARGIN);
        }
    }
}
