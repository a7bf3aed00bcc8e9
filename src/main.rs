//! Powder Run entry point (headless demo)
//!
//! The renderer and HUD live in the excluded presentation layer; this
//! binary runs a scripted session to sanity-check balance and prints the
//! final HUD snapshot as JSON.

use powder_run::sim::GameEvent;
use powder_run::{Session, SessionPhase, Settings};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut session = Session::new(Settings::default());
    session.start();

    let frame_dt = 1.0 / 60.0;
    let mut elapsed = 0.0f32;
    let mut hop_clock = 0.0f32;

    while session.phase() == SessionPhase::Playing && elapsed < 300.0 {
        // Hop every couple of seconds like a cautious tourist
        hop_clock += frame_dt;
        if hop_clock >= 2.0 {
            session.pointer_press(100.0);
            hop_clock = 0.0;
        } else if hop_clock >= 0.4 {
            session.pointer_release();
        }

        session.frame(frame_dt);
        for event in session.drain_events() {
            match event {
                GameEvent::GameOver { score } => log::info!("game over, final score {score}"),
                GameEvent::Landed { flips, perfect } => {
                    log::info!("landed {flips} flip(s), perfect: {perfect}")
                }
                other => log::debug!("{other:?}"),
            }
        }
        elapsed += frame_dt;
    }

    match serde_json::to_string_pretty(&session.hud()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("failed to serialize HUD snapshot: {err}"),
    }
}
