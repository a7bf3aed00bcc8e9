//! Powder Run - an endless downhill skiing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, physics, avalanche, grill)
//! - `session`: Menu/playing/game-over state machine and tick scheduling
//! - `highscores`: Best-score leaderboard for the presentation layer
//! - `settings`: Feedback/accessibility preferences

pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use session::{HudSnapshot, Session, SessionPhase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Grill state-machine period (wall clock, independent of frame rate)
    pub const GRILL_DT: f32 = 0.1;

    /// Logical screen dimensions (generation lookahead, pruning, input bands)
    pub const SCREEN_W: f32 = 800.0;
    pub const SCREEN_H: f32 = 450.0;
    /// Bottom band reserved for the grill controls; pointer presses there
    /// never reach the jump input
    pub const GRILL_BAR_H: f32 = 90.0;

    /// Terrain sample spacing
    pub const SEGMENT_WIDTH: f32 = 60.0;
    /// Constant downhill drop per segment
    pub const SLOPE_DROP: f32 = 12.0;
    /// Smooth sinusoid component of the height noise
    pub const NOISE_WAVE_FREQ: f32 = 0.004;
    pub const NOISE_WAVE_AMP: f32 = 18.0;
    /// Bounded random jitter component
    pub const NOISE_JITTER: f32 = 14.0;
    /// Generate ground at least this far ahead of the player
    pub const TERRAIN_LOOKAHEAD: f32 = 2.0 * SCREEN_W;
    /// Ground query outside the generated range reports this depth
    pub const NO_GROUND: f32 = 1.0e6;

    /// Spawn draws per new terrain sample. The obstacle and power-up draws
    /// are sequential: the power-up roll only happens when the obstacle roll
    /// misses, so at most one gameplay entity spawns per sample.
    pub const DECORATION_PROB: f32 = 0.15;
    /// Nested inside the decoration draw
    pub const CABIN_PROB: f32 = 0.18;
    pub const OBSTACLE_PROB: f32 = 0.10;
    pub const POWERUP_PROB: f32 = 0.08;
    /// Fish vs sunglasses split within a power-up spawn
    pub const FISH_WEIGHT: f32 = 0.7;
    /// Power-ups float this far above the ground sample
    pub const POWERUP_HOVER: f32 = 120.0;

    /// Skier ride height above the interpolated ground line
    pub const PLAYER_GROUND_OFFSET: f32 = 14.0;
    /// Hover height while flight mode is active
    pub const FLIGHT_GROUND_OFFSET: f32 = 46.0;

    /// Horizontal speed targets, highest priority first
    pub const INVINCIBLE_MAX_SPEED: f32 = 560.0;
    pub const FLIGHT_MAX_SPEED: f32 = 500.0;
    pub const BOOST_MAX_SPEED: f32 = 430.0;
    pub const BASE_MAX_SPEED: f32 = 320.0;
    /// Additive acceleration below the target speed
    pub const ACCEL: f32 = 380.0;
    /// Multiplicative ease-down at/above the target speed
    pub const FRICTION: f32 = 0.985;

    /// Gravity while ascending (full) and descending (softer), px/s^2.
    /// Y grows downward, so positive vy is falling.
    pub const GRAVITY_ASCEND: f32 = 2000.0;
    pub const GRAVITY_DESCEND: f32 = 1250.0;
    /// Flight mode: heavily damped gravity with a terminal descent clamp
    pub const FLIGHT_GRAVITY_SCALE: f32 = 0.15;
    pub const FLIGHT_MAX_FALL: f32 = 90.0;

    pub const JUMP_IMPULSE: f32 = 760.0;
    /// Airborne press during flight mode
    pub const FLAP_IMPULSE: f32 = 300.0;
    /// Nudge above the ground threshold on takeoff so the same tick cannot
    /// re-collide
    pub const JUMP_CLEARANCE: f32 = 6.0;

    /// Angular rate while the input is held airborne, rad/s
    pub const ROTATION_RATE: f32 = 10.0;
    /// Minimum clearance above ground before spinning engages
    pub const SPIN_MIN_CLEARANCE: f32 = 30.0;
    /// Landing judgment thresholds (vs local ground angle)
    pub const CRASH_ANGLE: f32 = 1.15;
    pub const PERFECT_ANGLE: f32 = 0.35;
    /// Score per completed rotation on a safe/perfect landing
    pub const LANDING_BONUS: u64 = 50;
    pub const PERFECT_BONUS: u64 = 100;
    pub const BOOST_TIME: f32 = 3.0;
    /// Fraction of horizontal speed kept after a crash
    pub const CRASH_SPEED_KEEP: f32 = 0.2;

    pub const INVINCIBLE_TIME: f32 = 6.0;
    pub const FLIGHT_TIME: f32 = 4.0;

    /// Circular pickup radius around the skier
    pub const PICKUP_RADIUS: f32 = 40.0;
    /// Bounded fish inventory shared with the grill
    pub const FISH_CAPACITY: u8 = 3;
    /// Cabin delivery proximity window
    pub const CABIN_DX: f32 = 60.0;
    pub const CABIN_DY: f32 = 90.0;
    pub const DELIVERY_BONUS: u64 = 250;
    /// Upward pop when sunglasses are grabbed
    pub const SUNGLASSES_POP: f32 = 150.0;

    /// Extra horizontal slack around an obstacle's half-width
    pub const OBSTACLE_BAND: f32 = 18.0;

    /// Avalanche never leads the player by more than this
    pub const AVALANCHE_LEAD_CLAMP: f32 = 100.0;
    /// Caught when the front passes player.x minus this gap
    pub const AVALANCHE_KILL_GAP: f32 = 30.0;
    /// Starting gap behind the player
    pub const AVALANCHE_START_GAP: f32 = 600.0;
    /// Subtracted from the target speed while the player is invincible
    pub const AVALANCHE_INVINCIBLE_SLOW: f32 = 120.0;

    /// Pixels of x per meter of score
    pub const DISTANCE_SCALE: f32 = 10.0;

    pub const GRILL_SLOTS: usize = 3;
    /// Progress added per grill tick while a slot is cooking
    pub const GRILL_INCREMENT: f32 = 2.0;
    /// raw -> perfect at this progress, auto-discard at the burnt mark
    pub const GRILL_PERFECT_AT: f32 = 60.0;
    pub const GRILL_BURNT_AT: f32 = 100.0;

    pub const MAX_PARTICLES: usize = 256;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
