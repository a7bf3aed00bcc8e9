//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected RNG only (seeded from entropy in normal play, fixed in tests)
//! - Front-to-back entity order (collections are append-only in x)
//! - No rendering or platform dependencies

pub mod avalanche;
pub mod grill;
pub mod state;
pub mod terrain;
pub mod tick;

pub use avalanche::Avalanche;
pub use grill::{CookState, Grill, GrillSlot};
pub use state::{
    Decoration, DecorationKind, GameEvent, GameState, Obstacle, ObstacleKind, Particle, Player,
    PowerUp, PowerUpKind, StatusLabel,
};
pub use terrain::{GroundSample, TerrainPoint, ground_at};
pub use tick::{LandingClass, TickInput, classify_landing, tick};
