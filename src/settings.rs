//! Feedback and accessibility preferences
//!
//! Owned by the presentation layer but consulted by the session when it
//! surfaces render state (screen shake respects reduced motion). Volumes
//! are carried for the audio sink; the core never plays sound itself.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Camera shake on crashes and the avalanche catch
    pub screen_shake: bool,
    /// Particle effects (snow bursts, landing sparkles)
    pub particles: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Reduced motion (minimize shake and flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            particles: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle cap for the renderer
    pub fn max_particles(&self) -> usize {
        if self.particles {
            crate::consts::MAX_PARTICLES
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_overrides_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_particle_toggle() {
        let mut settings = Settings::default();
        assert_eq!(settings.max_particles(), crate::consts::MAX_PARTICLES);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }
}
