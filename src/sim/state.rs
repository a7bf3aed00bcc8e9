//! Game state and core simulation types
//!
//! Everything the renderer needs to draw a frame lives here. Entity
//! collections are ordered by ascending x and only ever grow at the back
//! (leading edge) and shrink at the front (cleanup window).

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::avalanche::Avalanche;
use super::grill::Grill;
use super::terrain::{self, TerrainPoint};
use crate::consts::*;

/// Obstacle variants. Rocks are the only hazard the slope produces today;
/// the kind is kept explicit so the renderer can pick sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
}

/// A collidable obstacle sitting on the ground line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub kind: ObstacleKind,
    pub width: f32,
    pub height: f32,
    /// Terminal flag: hit or confirmed cleared. Stays in the collection
    /// until it scrolls out of the cleanup window.
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationKind {
    TreeTall,
    TreeShort,
    Cabin,
}

/// Scenery. Cabins double as delivery way-points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decoration {
    pub pos: Vec2,
    pub kind: DecorationKind,
    pub width: f32,
    pub height: f32,
    /// Only meaningful for cabins; terminal once true
    pub delivered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Fish,
    Sunglasses,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub collected: bool,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases over time
    pub max_life: f32,
    pub size: f32,
    pub color: u32, // palette index for the renderer
}

/// Status label surfaced to the HUD, highest priority active state only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLabel {
    Invincible,
    Flight,
    Boost,
}

/// Discrete game events for the audio/notification sink.
///
/// The simulation never calls out; it queues these and the presentation
/// layer drains them each frame against current state, so a handler can
/// never observe a stale snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    Flap,
    Crash,
    Landed { flips: u32, perfect: bool },
    FishPickedUp,
    SunglassesPickedUp,
    FishDelivered,
    FishReady,
    FishBurnt,
    FishCollected,
    GameOver { score: u64 },
}

/// The skier. Singleton for the whole session; reset between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Unbounded rotation accumulator, radians
    pub rotation: f32,
    pub grounded: bool,
    pub dead: bool,
    /// Integer meters-equivalent, refreshed every tick
    pub score: u64,
    pub boost_timer: f32,
    pub invincible_timer: f32,
    pub flight_timer: f32,
    /// Rotations completed in the current airborne phase
    pub backflip_count: u32,
    pub total_backflips: u32,
    /// Read-only snapshot of the shared inventory, synced at tick start
    pub fish_inventory: u8,
}

impl Player {
    fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rotation: 0.0,
            grounded: true,
            dead: false,
            score: 0,
            boost_timer: 0.0,
            invincible_timer: 0.0,
            flight_timer: 0.0,
            backflip_count: 0,
            total_backflips: 0,
            fish_inventory: 0,
        }
    }

    pub fn invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    pub fn flying(&self) -> bool {
        self.flight_timer > 0.0
    }

    pub fn boosting(&self) -> bool {
        self.boost_timer > 0.0
    }

    /// Status by priority: invincible > flight > boost > none
    pub fn status(&self) -> Option<StatusLabel> {
        if self.invincible() {
            Some(StatusLabel::Invincible)
        } else if self.flying() {
            Some(StatusLabel::Flight)
        } else if self.boosting() {
            Some(StatusLabel::Boost)
        } else {
            None
        }
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed (entropy in normal play, fixed in tests)
    pub seed: u64,
    pub rng: Pcg32,
    /// Seconds since run start (drives the avalanche schedule)
    pub time: f32,
    pub tick_count: u64,
    pub player: Player,
    /// Ground samples, ascending x, consecutive spacing = SEGMENT_WIDTH
    pub terrain: VecDeque<TerrainPoint>,
    pub obstacles: VecDeque<Obstacle>,
    pub decorations: VecDeque<Decoration>,
    pub powerups: VecDeque<PowerUp>,
    /// Cosmetic only; never affects simulation outcome
    pub particles: Vec<Particle>,
    pub avalanche: Avalanche,
    pub grill: Grill,
    /// The shared inventory resource, bounded 0..=FISH_CAPACITY. Mutated
    /// only by explicit collect/deliver operations.
    pub fish_inventory: u8,
    /// Score earned from landings and deliveries, on top of distance
    pub bonus_score: u64,
    /// Camera shake feedback, decays toward zero
    pub screen_shake: f32,
    /// Pending events for the notification sink, drained by the caller
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh run. Terrain is generated ahead of the spawn point and
    /// the skier is placed on the ground line.
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            tick_count: 0,
            player: Player::new(),
            terrain: VecDeque::new(),
            obstacles: VecDeque::new(),
            decorations: VecDeque::new(),
            powerups: VecDeque::new(),
            particles: Vec::new(),
            avalanche: Avalanche::new(-AVALANCHE_START_GAP),
            grill: Grill::new(),
            fish_inventory: 0,
            bonus_score: 0,
            screen_shake: 0.0,
            events: Vec::new(),
        };

        terrain::ensure_ahead(&mut state);
        let ground = terrain::ground_at(&state.terrain, 0.0);
        state.player.pos.y = ground.height - PLAYER_GROUND_OFFSET;
        state.player.rotation = ground.angle;
        state
    }

    /// Current score: distance meters plus earned bonuses
    pub fn score(&self) -> u64 {
        let meters = (self.player.pos.x.max(0.0) / DISTANCE_SCALE) as u64;
        meters + self.bonus_score
    }

    /// Hazard distance for the HUD (floor, non-negative)
    pub fn hazard_distance(&self) -> u32 {
        (self.player.pos.x - self.avalanche.x).max(0.0) as u32
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Spawn a burst of particles around a point, capped at MAX_PARTICLES
    /// by dropping the oldest first.
    pub fn spawn_burst(&mut self, pos: Vec2, count: usize, color: u32) {
        use rand::Rng;
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(60.0..220.0);
            let life = self.rng.random_range(0.5..1.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 80.0),
                life,
                max_life: life,
                size: self.rng.random_range(2.0..6.0),
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_starts_on_ground() {
        let state = GameState::new(7);
        assert!(state.player.grounded);
        assert!(!state.player.dead);
        assert!(!state.terrain.is_empty());
        // Spawn point must be inside the generated range
        let first = state.terrain.front().unwrap().x;
        let last = state.terrain.back().unwrap().x;
        assert!(first <= 0.0 && last >= TERRAIN_LOOKAHEAD);
    }

    #[test]
    fn test_terrain_spacing_invariant() {
        let state = GameState::new(42);
        let pts: Vec<_> = state.terrain.iter().collect();
        for pair in pts.windows(2) {
            let dx = pair[1].x - pair[0].x;
            assert!((dx - SEGMENT_WIDTH).abs() < 1e-3);
        }
    }

    #[test]
    fn test_status_priority() {
        let mut player = Player::new();
        assert_eq!(player.status(), None);
        player.boost_timer = 1.0;
        assert_eq!(player.status(), Some(StatusLabel::Boost));
        player.flight_timer = 1.0;
        assert_eq!(player.status(), Some(StatusLabel::Flight));
        player.invincible_timer = 1.0;
        assert_eq!(player.status(), Some(StatusLabel::Invincible));
    }

    #[test]
    fn test_score_combines_distance_and_bonus() {
        let mut state = GameState::new(1);
        state.player.pos.x = 250.0;
        state.bonus_score = 40;
        assert_eq!(state.score(), 25 + 40);
        // Distance never goes negative even if x does
        state.player.pos.x = -500.0;
        assert_eq!(state.score(), 40);
    }

    #[test]
    fn test_particle_cap() {
        let mut state = GameState::new(3);
        state.spawn_burst(Vec2::ZERO, MAX_PARTICLES + 50, 0);
        assert_eq!(state.particles.len(), MAX_PARTICLES);
    }
}
