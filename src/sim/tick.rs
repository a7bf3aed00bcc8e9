//! Fixed timestep simulation tick
//!
//! One tick advances the whole run: terrain generation, player physics,
//! landing judgment, entity interactions, pruning, and the avalanche. The
//! pipeline order is fixed; in particular the inventory snapshot happens
//! first and every inventory mutation later in the tick is visible to the
//! steps after it.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use super::state::{DecorationKind, GameEvent, GameState, PowerUpKind};
use super::terrain;
use crate::consts::*;
use crate::normalize_angle;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Pointer went down this tick (edge)
    pub pressed: bool,
    /// Pointer currently held (level); drives airborne rotation
    pub held: bool,
}

/// Outcome of the landing-angle judgment, a pure function of the rotation
/// accumulator and the local ground angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingClass {
    Crash,
    Safe,
    Perfect,
}

/// Classify a landing. Boundary values land on the forgiving side: a gap of
/// exactly CRASH_ANGLE is safe, exactly PERFECT_ANGLE is perfect.
pub fn classify_landing(rotation: f32, ground_angle: f32) -> LandingClass {
    let gap = normalize_angle(rotation - ground_angle).abs();
    if gap > CRASH_ANGLE {
        LandingClass::Crash
    } else if gap <= PERFECT_ANGLE {
        LandingClass::Perfect
    } else {
        LandingClass::Safe
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.player.dead {
        return;
    }

    state.tick_count += 1;
    state.time += dt;

    // Decay screen shake
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    terrain::ensure_ahead(state);

    // 1. Snapshot the shared inventory into the player mirror for this tick
    state.player.fish_inventory = state.fish_inventory;

    // 2. Timers toward zero
    {
        let p = &mut state.player;
        p.invincible_timer = (p.invincible_timer - dt).max(0.0);
        p.flight_timer = (p.flight_timer - dt).max(0.0);
        p.boost_timer = (p.boost_timer - dt).max(0.0);
    }

    // Jump / flap input
    if input.pressed {
        if state.player.grounded {
            state.player.vel.y = -JUMP_IMPULSE;
            state.player.grounded = false;
            // Nudge clear of the ground threshold so this tick's resolve
            // cannot immediately re-land
            state.player.pos.y -= JUMP_CLEARANCE;
            state.push_event(GameEvent::Jump);
        } else if state.player.flying() {
            state.player.vel.y -= FLAP_IMPULSE;
            state.push_event(GameEvent::Flap);
        }
    }

    // 3. Ease horizontal speed toward the highest-priority target
    {
        let p = &mut state.player;
        let target = if p.invincible() {
            INVINCIBLE_MAX_SPEED
        } else if p.flying() {
            FLIGHT_MAX_SPEED
        } else if p.boosting() {
            BOOST_MAX_SPEED
        } else {
            BASE_MAX_SPEED
        };
        if p.vel.x < target {
            p.vel.x += ACCEL * dt;
        } else {
            p.vel.x *= FRICTION;
        }
    }

    // 4. Integrate position
    state.player.pos += state.player.vel * dt;

    // 5. Vertical acceleration: full gravity on the way up, softer on the
    // way down, heavily damped with a terminal clamp in flight mode
    if !state.player.grounded {
        let p = &mut state.player;
        if p.flying() {
            p.vel.y += GRAVITY_ASCEND * FLIGHT_GRAVITY_SCALE * dt;
            p.vel.y = p.vel.y.min(FLIGHT_MAX_FALL);
        } else if p.vel.y < 0.0 {
            p.vel.y += GRAVITY_ASCEND * dt;
        } else {
            p.vel.y += GRAVITY_DESCEND * dt;
        }
    }

    // Deferred particle bursts; spawning mid-loop would alias the state borrow
    let mut bursts: Vec<(Vec2, usize, u32)> = Vec::new();

    // 6. Ground contact
    let ground = terrain::ground_at(&state.terrain, state.player.pos.x);
    let offset = if state.player.flying() {
        FLIGHT_GROUND_OFFSET
    } else {
        PLAYER_GROUND_OFFSET
    };
    let threshold = ground.height - offset;
    let mut crashed = false;

    if state.player.pos.y >= threshold && state.player.vel.y >= 0.0 {
        if state.player.flying() {
            // Flight hovers on the raised threshold and skips landing
            // judgment entirely
            state.player.pos.y = threshold;
            state.player.vel.y = 0.0;
        } else {
            let p = &mut state.player;
            let new_contact = !p.grounded;
            if new_contact {
                match classify_landing(p.rotation, ground.angle) {
                    LandingClass::Crash if !p.invincible() => crashed = true,
                    LandingClass::Crash | LandingClass::Safe => {
                        if p.backflip_count >= 1 {
                            let flips = p.backflip_count;
                            state.bonus_score += flips as u64 * LANDING_BONUS;
                            state.events.push(GameEvent::Landed {
                                flips,
                                perfect: false,
                            });
                        }
                    }
                    LandingClass::Perfect => {
                        // Zero-rotation landings never score: the judgment
                        // only pays out when at least one flip completed
                        if p.backflip_count >= 1 {
                            let flips = p.backflip_count;
                            state.bonus_score += flips as u64 * PERFECT_BONUS;
                            p.boost_timer = BOOST_TIME;
                            state.events.push(GameEvent::Landed {
                                flips,
                                perfect: true,
                            });
                            bursts.push((p.pos, 12, 1));
                        }
                    }
                }
            }
            let p = &mut state.player;
            p.pos.y = threshold;
            p.vel.y = 0.0;
            p.grounded = true;
            p.backflip_count = 0;
            p.rotation = ground.angle;
        }
    } else {
        state.player.grounded = false;
    }

    if crashed {
        crash(state, ground.angle, &mut bursts);
    }

    // 7. Airborne rotation while the input is held (not in flight mode)
    if !state.player.grounded && input.held && !state.player.flying() {
        let clearance = threshold - state.player.pos.y;
        if clearance > SPIN_MIN_CLEARANCE {
            let p = &mut state.player;
            p.rotation -= ROTATION_RATE * dt;
            let flips = ((p.rotation.abs() + FRAC_PI_2) / TAU).floor() as u32;
            if flips > p.backflip_count {
                p.total_backflips += flips - p.backflip_count;
                p.backflip_count = flips;
            }
        }
    }

    // 8. Obstacle collisions within a narrow horizontal band
    let immune = state.player.invincible() || state.player.flying();
    let player_pos = state.player.pos;
    let mut obstacle_hit = false;
    for obstacle in state.obstacles.iter_mut() {
        if obstacle.passed {
            continue;
        }
        let band = obstacle.width / 2.0 + OBSTACLE_BAND;
        if (obstacle.pos.x - player_pos.x).abs() < band {
            let top = obstacle.pos.y - obstacle.height;
            if player_pos.y > top && !immune {
                obstacle.passed = true;
                obstacle_hit = true;
            } else if player_pos.x > obstacle.pos.x {
                // Cleared above it (or ghosted through while immune)
                obstacle.passed = true;
            }
        }
    }
    if obstacle_hit {
        crash(state, ground.angle, &mut bursts);
    }

    // 9. Cabin deliveries. The decrement is the mutation site for the
    // shared inventory; later steps in this same tick observe the new value.
    for deco in state.decorations.iter_mut() {
        if deco.kind != DecorationKind::Cabin || deco.delivered {
            continue;
        }
        let dx = (deco.pos.x - state.player.pos.x).abs();
        let dy = (deco.pos.y - state.player.pos.y).abs();
        if dx < CABIN_DX && dy < CABIN_DY && state.fish_inventory > 0 {
            deco.delivered = true;
            state.fish_inventory -= 1;
            state.player.flight_timer = FLIGHT_TIME;
            state.bonus_score += DELIVERY_BONUS;
            state.events.push(GameEvent::FishDelivered);
            bursts.push((deco.pos, 10, 2));
        }
    }

    // 10. Power-up pickups in a circular radius
    for powerup in state.powerups.iter_mut() {
        if powerup.collected {
            continue;
        }
        if powerup.pos.distance_squared(state.player.pos) < PICKUP_RADIUS * PICKUP_RADIUS {
            powerup.collected = true;
            match powerup.kind {
                PowerUpKind::Fish => {
                    // Routed to the grill; silently dropped when all three
                    // slots are busy. The pickup itself still disappears.
                    state.grill.place_fish();
                    state.events.push(GameEvent::FishPickedUp);
                }
                PowerUpKind::Sunglasses => {
                    state.player.invincible_timer = INVINCIBLE_TIME;
                    state.player.vel.y -= SUNGLASSES_POP;
                    state.events.push(GameEvent::SunglassesPickedUp);
                }
            }
            bursts.push((powerup.pos, 8, 1));
        }
    }

    for (pos, count, color) in bursts {
        state.spawn_burst(pos, count, color);
    }

    // Update particles (cosmetic only)
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel.y += 300.0 * dt;
        particle.vel *= 0.98;
        particle.life -= dt * 1.5;
        particle.size *= 0.995;
    }
    state.particles.retain(|p| p.life > 0.0);

    terrain::prune(state);

    // 11. Avalanche pursuit and the loss condition
    state.avalanche.advance(
        state.time,
        dt,
        state.player.pos.x,
        state.player.invincible(),
    );
    if state.avalanche.caught(state.player.pos.x) {
        state.player.dead = true;
        state.screen_shake = 1.0;
        let score = state.score();
        state.player.score = score;
        state.push_event(GameEvent::GameOver { score });
        log::info!("caught by the avalanche at x={:.0}, final score {}", state.player.pos.x, score);
        return;
    }

    state.player.score = state.score();
}

/// Crash response shared by bad landings and obstacle hits: dump most
/// horizontal speed, shake the camera, kick up snow, square up to the slope.
fn crash(state: &mut GameState, ground_angle: f32, bursts: &mut Vec<(Vec2, usize, u32)>) {
    let p = &mut state.player;
    p.vel.x *= CRASH_SPEED_KEEP;
    p.rotation = ground_angle;
    state.screen_shake = (state.screen_shake + 0.6).min(1.0);
    state.events.push(GameEvent::Crash);
    bursts.push((state.player.pos, 18, 0));
}
