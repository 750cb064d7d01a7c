//! Per-tick simulation step
//!
//! One call advances the world by exactly one fixed timestep: steer, score,
//! scroll, collide, resolve effects, age timers. The function is pure with
//! respect to its inputs; all randomness comes from the RNG inside
//! `GameState`, so a session is fully determined by its seed and its input
//! trace.

use log::{debug, info};

use super::collision::Collider;
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState, Invulnerability, ShieldCause};
use crate::secs_remaining_ceil;
use crate::tuning::Tuning;

/// Input sampled for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Raw pointer y in window coordinates, if the pointer moved or is known.
    /// `None` leaves the car where it is.
    pub pointer_y: Option<f32>,
}

/// Advance the simulation by one tick and return the feedback events it
/// produced, in the order their effects were applied.
///
/// A finished session is inert: ticking it is a no-op that returns no
/// events, so the scoreboard freezes at its terminal values.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    tuning: &Tuning,
    collider: &Collider,
) -> Vec<GameEvent> {
    if state.phase == GamePhase::GameOver {
        return Vec::new();
    }

    state.tick += 1;
    let mut events = Vec::new();
    // Set when an effect writes the status line this tick, so shield expiry
    // does not wipe a message the player has not seen yet.
    let mut status_set = false;

    if let Some(pointer_y) = input.pointer_y {
        state.player.steer(pointer_y, tuning);
    }

    // Surviving the tick is worth a point on its own
    state.scoreboard.score += tuning.survival_bonus;

    // Scroll, and reapply each crossed entity's respawn policy before the
    // collision pass so nothing is tested at an off-field position
    for entity in &mut state.entities {
        if entity.active && entity.advance(tuning.reset_point) {
            spawn::reset(entity, &mut state.rng, tuning);
        }
    }

    let report = collider.test_all(&state.player, &state.entities);

    // Coins
    for &i in &report.coins {
        events.push(GameEvent::CoinCollected);
        spawn::reset(&mut state.entities[i], &mut state.rng, tuning);
        state.scoreboard.score += tuning.coin_score;
        state
            .scoreboard
            .set_status(format!("Coin! (+{} Score)", tuning.coin_score));
        status_set = true;
        debug!("coin collected, score {}", state.scoreboard.score);
    }

    // Damage. Traffic takes precedence: debris under a car pile-up does not
    // also charge its own damage that tick. A shielded player sails through
    // hazards without consuming them.
    if !state.player.is_invulnerable() {
        if !report.traffic.is_empty() {
            events.push(GameEvent::CarHit);
            state.player.hit_car += 1;
            state
                .scoreboard
                .adjust_health(-tuning.car_damage, tuning.max_health);
            state
                .scoreboard
                .set_status(format!("Hit car (-{} HP)", tuning.car_damage));
            status_set = true;
            state.player.shield = Invulnerability::Shielded {
                cause: ShieldCause::Crash,
                elapsed: 0,
                duration: tuning.hit_shield_ticks,
            };
            for &i in &report.traffic {
                spawn::reset(&mut state.entities[i], &mut state.rng, tuning);
            }
            debug!(
                "car hit, health {} (hit #{})",
                state.scoreboard.health, state.player.hit_car
            );
        } else if !report.flotsam.is_empty() {
            events.push(GameEvent::ObjectHit);
            state.player.hit_flotsam += 1;
            state
                .scoreboard
                .adjust_health(-tuning.flotsam_damage, tuning.max_health);
            state
                .scoreboard
                .set_status(format!("Hit object (-{} HP)", tuning.flotsam_damage));
            status_set = true;
            state.player.shield = Invulnerability::Shielded {
                cause: ShieldCause::Crash,
                elapsed: 0,
                duration: tuning.hit_shield_ticks,
            };
            for &i in &report.flotsam {
                spawn::reset(&mut state.entities[i], &mut state.rng, tuning);
            }
            debug!(
                "object hit, health {} (hit #{})",
                state.scoreboard.health, state.player.hit_flotsam
            );
        }

        if state.scoreboard.health <= 0 {
            state.phase = GamePhase::GameOver;
            info!(
                "game over at tick {} with score {}",
                state.tick, state.scoreboard.score
            );
        }
    }

    // Repairs apply even while shielded; health stays clamped at max
    for &i in &report.repairs {
        events.push(GameEvent::RepairCollected);
        spawn::reset(&mut state.entities[i], &mut state.rng, tuning);
        state.player.hit_powerup += 1;
        state
            .scoreboard
            .adjust_health(tuning.repair_health, tuning.max_health);
        state
            .scoreboard
            .set_status(format!("Repair! (+{} HP)", tuning.repair_health));
        status_set = true;
        debug!("repair collected, health {}", state.scoreboard.health);
    }

    // A star always wins: it replaces any running shield and restarts the
    // clock at the full star duration
    for &i in &report.stars {
        events.push(GameEvent::StarCollected);
        spawn::reset(&mut state.entities[i], &mut state.rng, tuning);
        state.player.hit_powerup += 1;
        state.player.shield = Invulnerability::Shielded {
            cause: ShieldCause::Star,
            elapsed: 0,
            duration: tuning.star_shield_ticks,
        };
        state.scoreboard.set_status(format!(
            "Star! ({} sec)",
            secs_remaining_ceil(tuning.star_shield_ticks, tuning.tick_rate)
        ));
        status_set = true;
        debug!("star collected at tick {}", state.tick);
    }

    // Rival cars stacking in a lane read as a rendering glitch; kick the
    // later one back to a fresh spawn
    for &(_, j) in &report.rivals {
        spawn::reset(&mut state.entities[j], &mut state.rng, tuning);
    }

    // Shield clock. The car flashes while shielded and expiry is the only
    // way back to vulnerable.
    if let Invulnerability::Shielded {
        elapsed, duration, ..
    } = &mut state.player.shield
    {
        *elapsed += 1;
        if *elapsed >= *duration {
            state.player.shield = Invulnerability::Vulnerable;
            state.player.visible = true;
            if !status_set {
                state.scoreboard.clear_status();
            }
        } else {
            state.player.visible = *elapsed % 2 == 0;
        }
    }

    state.scoreboard.tick_status(tuning.status_ticks);

    events
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::collision::OverlapTest;
    use crate::sim::state::EntityKind;

    fn setup() -> (GameState, Tuning, Collider) {
        let tuning = Tuning::default();
        let mut state = GameState::new(99, &tuning);
        // Park everything off to the side so nothing collides by accident
        for e in &mut state.entities {
            e.pos = Vec2::new(5000.0, 200.0);
            e.dx = 0.0;
        }
        (state, tuning, Collider::new(OverlapTest::PixelMask))
    }

    /// Move the first entity of `kind` onto the player and return its index
    fn place_on_player(state: &mut GameState, kind: EntityKind) -> usize {
        let i = state
            .entities
            .iter()
            .position(|e| e.kind == kind)
            .unwrap();
        state.entities[i].pos = state.player.pos;
        state.entities[i].dx = 0.0;
        i
    }

    #[test]
    fn quiet_tick_pays_survival_bonus_only() {
        let (mut state, tuning, collider) = setup();
        let events = tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert!(events.is_empty());
        assert_eq!(state.scoreboard.score, tuning.survival_bonus);
        assert_eq!(state.scoreboard.health, tuning.max_health);
        assert_eq!(state.tick, 1);
    }

    #[test]
    fn car_hit_costs_twenty_and_shields() {
        let (mut state, tuning, collider) = setup();
        let i = place_on_player(&mut state, EntityKind::Traffic);
        let events = tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert_eq!(events, vec![GameEvent::CarHit]);
        assert_eq!(state.scoreboard.health, 80);
        assert_eq!(state.player.hit_car, 1);
        assert!(state.player.is_invulnerable());
        assert_eq!(state.scoreboard.status, "Hit car (-20 HP)");
        // The offending car was sent back to its spawn lane
        assert_eq!(state.entities[i].pos.x, tuning.traffic_spawn_x);
    }

    #[test]
    fn shield_drops_exactly_thirty_ticks_after_a_hit() {
        let (mut state, tuning, collider) = setup();
        place_on_player(&mut state, EntityKind::Traffic);
        tick(&mut state, &TickInput::default(), &tuning, &collider);
        assert!(state.player.is_invulnerable());

        for _ in 0..28 {
            tick(&mut state, &TickInput::default(), &tuning, &collider);
            assert!(state.player.is_invulnerable());
        }
        tick(&mut state, &TickInput::default(), &tuning, &collider);
        assert!(!state.player.is_invulnerable());
        assert!(state.player.visible);
    }

    #[test]
    fn no_damage_while_shielded() {
        let (mut state, tuning, collider) = setup();
        state.player.shield = Invulnerability::Shielded {
            cause: ShieldCause::Star,
            elapsed: 0,
            duration: tuning.star_shield_ticks,
        };
        let i = place_on_player(&mut state, EntityKind::Traffic);
        let events = tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert!(events.is_empty());
        assert_eq!(state.scoreboard.health, tuning.max_health);
        assert_eq!(state.player.hit_car, 0);
        // The car passes through rather than being consumed
        assert_eq!(state.entities[i].pos, state.player.pos);
    }

    #[test]
    fn traffic_takes_precedence_over_flotsam() {
        let (mut state, tuning, collider) = setup();
        place_on_player(&mut state, EntityKind::Traffic);
        let debris = place_on_player(&mut state, EntityKind::Flotsam);
        let events = tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert_eq!(events, vec![GameEvent::CarHit]);
        assert_eq!(
            state.scoreboard.health,
            tuning.max_health - tuning.car_damage
        );
        assert_eq!(state.player.hit_flotsam, 0);
        // The debris keeps rolling; only the traffic bucket was consumed
        assert_eq!(state.entities[debris].pos, state.player.pos);
    }

    #[test]
    fn flotsam_alone_costs_ten() {
        let (mut state, tuning, collider) = setup();
        place_on_player(&mut state, EntityKind::Flotsam);
        let events = tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert_eq!(events, vec![GameEvent::ObjectHit]);
        assert_eq!(state.scoreboard.health, 90);
        assert_eq!(state.player.hit_flotsam, 1);
        assert_eq!(state.scoreboard.status, "Hit object (-10 HP)");
        assert!(state.player.is_invulnerable());
    }

    #[test]
    fn coin_pays_exactly_its_score() {
        let (mut state, tuning, collider) = setup();
        let i = place_on_player(&mut state, EntityKind::Coin);
        let events = tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert_eq!(events, vec![GameEvent::CoinCollected]);
        assert_eq!(
            state.scoreboard.score,
            tuning.coin_score + tuning.survival_bonus
        );
        assert_eq!(state.scoreboard.status, "Coin! (+500 Score)");
        // Coin rescattered somewhere ahead
        let x = state.entities[i].pos.x;
        assert!(x >= tuning.clutter_spawn.0 && x < tuning.clutter_spawn.1);
    }

    #[test]
    fn repair_clamps_at_max_health() {
        let (mut state, tuning, collider) = setup();
        state.scoreboard.health = 90;
        place_on_player(&mut state, EntityKind::Repair);
        let events = tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert_eq!(events, vec![GameEvent::RepairCollected]);
        assert_eq!(state.scoreboard.health, tuning.max_health);
        assert_eq!(state.scoreboard.status, "Repair! (+30 HP)");
        assert_eq!(state.player.hit_powerup, 1);
    }

    #[test]
    fn repair_applies_while_shielded() {
        let (mut state, tuning, collider) = setup();
        state.scoreboard.health = 40;
        state.player.shield = Invulnerability::Shielded {
            cause: ShieldCause::Crash,
            elapsed: 5,
            duration: tuning.hit_shield_ticks,
        };
        place_on_player(&mut state, EntityKind::Repair);
        tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert_eq!(state.scoreboard.health, 40 + tuning.repair_health);
    }

    #[test]
    fn star_grants_full_shield_and_status() {
        let (mut state, tuning, collider) = setup();
        let events = {
            place_on_player(&mut state, EntityKind::Star);
            tick(&mut state, &TickInput::default(), &tuning, &collider)
        };

        assert_eq!(events, vec![GameEvent::StarCollected]);
        // 210 ticks at 30 Hz reads as 7 seconds
        assert_eq!(state.scoreboard.status, "Star! (7 sec)");
        assert_eq!(
            state.player.shield.remaining(),
            tuning.star_shield_ticks - 1
        );
        assert!(matches!(
            state.player.shield,
            Invulnerability::Shielded {
                cause: ShieldCause::Star,
                ..
            }
        ));
    }

    #[test]
    fn star_replaces_a_running_crash_shield() {
        let (mut state, tuning, collider) = setup();
        state.player.shield = Invulnerability::Shielded {
            cause: ShieldCause::Crash,
            elapsed: 25,
            duration: tuning.hit_shield_ticks,
        };
        place_on_player(&mut state, EntityKind::Star);
        tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert!(state.player.shield.remaining() > tuning.hit_shield_ticks);
    }

    #[test]
    fn zero_health_freezes_the_session() {
        let (mut state, tuning, collider) = setup();
        state.scoreboard.health = tuning.car_damage;
        place_on_player(&mut state, EntityKind::Traffic);
        tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.scoreboard.health, 0);
        let frozen_score = state.scoreboard.score;
        let frozen_tick = state.tick;

        let events = tick(&mut state, &TickInput::default(), &tuning, &collider);
        assert!(events.is_empty());
        assert_eq!(state.scoreboard.score, frozen_score);
        assert_eq!(state.tick, frozen_tick);
    }

    #[test]
    fn overlapping_rivals_are_separated() {
        let (mut state, tuning, collider) = setup();
        let cars: Vec<usize> = state
            .entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind == EntityKind::Traffic)
            .map(|(i, _)| i)
            .collect();
        assert!(cars.len() >= 2);
        // Stack two rivals far from the player
        state.entities[cars[0]].pos = Vec2::new(400.0, 300.0);
        state.entities[cars[1]].pos = Vec2::new(410.0, 302.0);
        for &i in &cars[..2] {
            state.entities[i].dx = 0.0;
        }
        tick(&mut state, &TickInput::default(), &tuning, &collider);

        assert_eq!(state.entities[cars[0]].pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.entities[cars[1]].pos.x, tuning.traffic_spawn_x);
    }

    #[test]
    fn crossing_the_reset_point_respawns_before_collision() {
        let (mut state, tuning, collider) = setup();
        let i = state
            .entities
            .iter()
            .position(|e| e.kind == EntityKind::Coin)
            .unwrap();
        state.entities[i].pos = Vec2::new(tuning.reset_point + 1.0, 200.0);
        state.entities[i].dx = tuning.scroll_speed;
        tick(&mut state, &TickInput::default(), &tuning, &collider);

        let x = state.entities[i].pos.x;
        assert!(x >= tuning.clutter_spawn.0 && x < tuning.clutter_spawn.1);
    }

    #[test]
    fn pointer_input_steers_the_car() {
        let (mut state, tuning, collider) = setup();
        let input = TickInput {
            pointer_y: Some(330.0),
        };
        tick(&mut state, &input, &tuning, &collider);
        assert!((state.player.pos.y - 300.0).abs() < 1e-4);

        // No pointer sample leaves the car in place
        tick(&mut state, &TickInput::default(), &tuning, &collider);
        assert!((state.player.pos.y - 300.0).abs() < 1e-4);
    }
}
