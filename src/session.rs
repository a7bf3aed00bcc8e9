//! Game session controller
//!
//! Owns the menu/playing/game-over state machine and both periodic
//! schedules: the fixed-step physics tick and the slower wall-clock grill
//! tick. Everything runs cooperatively on the caller's thread; stopping the
//! playing state halts both schedules, and a new run starts from a fully
//! reset `GameState` rather than patching the old one.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::consts::*;
use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::sim::{self, CookState, GameEvent, GameState, StatusLabel, TickInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Menu,
    Playing,
    GameOver,
}

/// Render view of one grill slot
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SlotView {
    pub progress: f32,
    pub state: CookState,
    pub cooking: bool,
}

/// Plain-scalar outputs for the HUD, refreshed per frame
#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub speed: f32,
    pub status: Option<StatusLabel>,
    pub hazard_distance: u32,
    pub inventory: u8,
    pub slots: [SlotView; GRILL_SLOTS],
    pub screen_shake: f32,
    pub best_score: u64,
}

pub struct Session {
    phase: SessionPhase,
    state: GameState,
    settings: Settings,
    highscores: HighScores,
    sim_accum: f32,
    grill_accum: f32,
    /// Pointer state from the presentation layer
    held: bool,
    pressed: bool,
    final_score: Option<u64>,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            phase: SessionPhase::Menu,
            state: GameState::new(rand::random()),
            settings,
            highscores: HighScores::new(),
            sim_accum: 0.0,
            grill_accum: 0.0,
            held: false,
            pressed: false,
            final_score: None,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Simulation state for the renderer (read-only)
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    /// Final score of the last run, set once at the moment of death
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Enter PLAYING with everything reset: player, terrain, entities,
    /// avalanche, grill, inventory, accumulators. Nothing from the previous
    /// run leaks into the new one.
    pub fn start(&mut self) {
        self.state = GameState::new(rand::random());
        self.sim_accum = 0.0;
        self.grill_accum = 0.0;
        self.held = false;
        self.pressed = false;
        self.final_score = None;
        self.events.clear();
        self.phase = SessionPhase::Playing;
        log::info!("run started (seed {})", self.state.seed);
    }

    /// Game over goes straight back into a fresh run; returning to the
    /// menu is the presentation layer's navigation, not ours.
    pub fn retry(&mut self) {
        self.start();
    }

    /// Advance one display frame. Runs the physics schedule at SIM_DT with
    /// a substep cap, then the independent grill schedule at GRILL_DT.
    pub fn frame(&mut self, dt: f32) {
        if self.phase != SessionPhase::Playing {
            self.pressed = false;
            return;
        }

        self.sim_accum += dt.min(0.25);
        let mut steps = 0;
        while self.sim_accum >= SIM_DT && steps < MAX_SUBSTEPS {
            let input = TickInput {
                pressed: std::mem::take(&mut self.pressed),
                held: self.held,
            };
            sim::tick(&mut self.state, &input, SIM_DT);
            self.sim_accum -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiraling
            self.sim_accum = 0.0;
        }

        // Grill schedule: fixed wall-clock period, frame-rate independent
        if !self.state.player.dead {
            self.grill_accum += dt;
            while self.grill_accum >= GRILL_DT {
                self.state.grill.advance(&mut self.state.events);
                self.grill_accum -= GRILL_DT;
            }
        }

        self.events.append(&mut self.state.events);

        if self.state.player.dead {
            let score = self.state.player.score;
            self.final_score = Some(score);
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as f64)
                .unwrap_or(0.0);
            if let Some(rank) =
                self.highscores
                    .add_score(score, self.state.player.total_backflips, timestamp)
            {
                log::info!("new high score rank {rank}: {score}");
            }
            self.phase = SessionPhase::GameOver;
        }
    }

    /// Pointer press from the presentation layer. Presses inside the
    /// reserved bottom band belong to the grill controls and never become
    /// jump input.
    pub fn pointer_press(&mut self, screen_y: f32) {
        if screen_y >= SCREEN_H - GRILL_BAR_H {
            return;
        }
        if self.phase == SessionPhase::Playing {
            self.pressed = true;
            self.held = true;
        }
    }

    pub fn pointer_release(&mut self) {
        self.held = false;
    }

    /// Tap one of the grill slots
    pub fn tap_slot(&mut self, index: usize) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.state
            .grill
            .tap(index, &mut self.state.fish_inventory, &mut self.state.events);
    }

    /// Pending events for the audio/notification sink
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud(&self) -> HudSnapshot {
        let slots = self.state.grill.slots.map(|s| SlotView {
            progress: s.progress,
            state: s.state,
            cooking: s.cooking,
        });
        HudSnapshot {
            score: self.state.score(),
            speed: self.state.player.vel.x,
            status: self.state.player.status(),
            hazard_distance: self.state.hazard_distance(),
            inventory: self.state.fish_inventory,
            slots,
            screen_shake: if self.settings.effective_screen_shake() {
                self.state.screen_shake
            } else {
                0.0
            },
            best_score: self.highscores.top_score().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_DT: f32 = 1.0 / 60.0;

    fn assert_fresh_run(session: &Session) {
        let state = session.state();
        assert_eq!(state.player.pos.x, 0.0);
        assert!(!state.player.dead);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.player.total_backflips, 0);
        assert_eq!(state.fish_inventory, 0);
        assert_eq!(state.bonus_score, 0);
        assert!(state.grill.slots.iter().all(|s| !s.cooking && s.progress == 0.0));
        assert_eq!(state.avalanche.x, -AVALANCHE_START_GAP);
        assert!(state.events.is_empty());
        assert!(!state.terrain.is_empty());
    }

    #[test]
    fn test_start_enters_playing_with_fresh_state() {
        let mut session = Session::new(Settings::default());
        assert_eq!(session.phase(), SessionPhase::Menu);
        session.start();
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_fresh_run(&session);
    }

    #[test]
    fn test_retry_round_trip_resets_everything() {
        let mut session = Session::new(Settings::default());
        session.start();

        // Dirty the run: movement, a cooking fish, a tapped inventory
        session.pointer_press(100.0);
        for _ in 0..120 {
            session.frame(FRAME_DT);
        }
        session.state_mut().grill.place_fish();
        session.state_mut().fish_inventory = 2;
        session.frame(FRAME_DT);
        assert!(session.state().player.pos.x > 0.0);

        session.retry();
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_fresh_run(&session);
        assert_eq!(session.final_score(), None);
    }

    #[test]
    fn test_press_in_grill_band_is_ignored() {
        let mut session = Session::new(Settings::default());
        session.start();

        session.pointer_press(SCREEN_H - GRILL_BAR_H / 2.0);
        session.frame(FRAME_DT);
        assert!(!session.drain_events().contains(&GameEvent::Jump));

        session.pointer_press(SCREEN_H / 3.0);
        session.frame(FRAME_DT);
        assert!(session.drain_events().contains(&GameEvent::Jump));
    }

    #[test]
    fn test_death_transitions_to_game_over_once() {
        let mut session = Session::new(Settings::default());
        session.start();
        // Late-schedule avalanche speeds guarantee a quick catch
        session.state_mut().time = 300.0;

        let mut game_overs = 0;
        for _ in 0..3000 {
            session.frame(FRAME_DT);
            game_overs += session
                .drain_events()
                .into_iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count();
            if session.phase() == SessionPhase::GameOver {
                break;
            }
        }
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert_eq!(game_overs, 1);
        let final_score = session.final_score().unwrap();
        assert_eq!(session.highscores().top_score(), Some(final_score).filter(|s| *s > 0));

        // GAME_OVER is inert: frames neither tick nor emit
        let x = session.state().player.pos.x;
        session.frame(FRAME_DT);
        assert_eq!(session.state().player.pos.x, x);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_grill_cooks_on_wall_clock_and_tap_collects() {
        let mut session = Session::new(Settings::default());
        session.start();
        session.state_mut().grill.place_fish();

        // 3.5 seconds of frames = 35 grill ticks = progress 70 (perfect)
        for _ in 0..210 {
            session.frame(FRAME_DT);
        }
        assert_eq!(session.state().grill.slots[0].state, CookState::Perfect);

        session.tap_slot(0);
        assert_eq!(session.hud().inventory, 1);
        assert!(!session.state().grill.slots[0].cooking);
    }

    #[test]
    fn test_hud_reports_plain_scalars() {
        let mut session = Session::new(Settings::default());
        session.start();
        for _ in 0..30 {
            session.frame(FRAME_DT);
        }
        let hud = session.hud();
        assert!(hud.speed > 0.0);
        assert!(hud.hazard_distance > 0);
        assert_eq!(hud.inventory, 0);
        assert_eq!(hud.slots.len(), GRILL_SLOTS);
    }
}
