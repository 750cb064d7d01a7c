//! Game state and core simulation types
//!
//! Everything a session needs to be replayed deterministically lives here:
//! the entity pool, the player, the scoreboard, and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn;
use crate::tuning::Tuning;

/// Behavioral class of a pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Rival cars in one of the four lanes; 20 HP on contact
    Traffic,
    /// Inanimate road debris; 10 HP on contact
    Flotsam,
    /// +500 score on pickup
    Coin,
    /// +30 HP on pickup, clamped at max health
    Repair,
    /// 7 seconds of invulnerability on pickup
    Star,
    /// Road cracks, leaves, tire marks; drawn but never collided
    Decorative,
}

/// Which sprite sheet an entity renders with. The render collaborator maps
/// `(sprite, variant)` to an image; the sim only uses it for mask lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    PlayerCar,
    /// Same-direction rival car
    EnemyCar,
    /// Oncoming rival car (lanes 0-1)
    OncomingCar,
    Flotsam,
    Coin,
    Repair,
    Star,
    RoadClutter,
}

impl SpriteKind {
    /// Number of cosmetic image variants for this sprite
    pub fn variant_count(self) -> u8 {
        match self {
            SpriteKind::EnemyCar | SpriteKind::OncomingCar => 2,
            SpriteKind::Flotsam => 5,
            SpriteKind::RoadClutter => 11,
            _ => 1,
        }
    }
}

/// A pooled, scrolling game object.
///
/// Entities are created once at session start and reused for the whole
/// session; leaving the field repositions them, it never frees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Horizontal speed in pixels per tick (subtracted from x each tick)
    pub dx: f32,
    pub sprite: SpriteKind,
    pub variant: u8,
    pub active: bool,
}

impl Entity {
    /// Advance one tick of scroll. Returns true if the entity crossed the
    /// reset boundary and must be repositioned before the collision pass.
    pub fn advance(&mut self, reset_point: f32) -> bool {
        self.pos.x -= self.dx;
        self.pos.x < reset_point
    }
}

/// Why the player currently cannot take damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldCause {
    /// Post-hit mercy window (1 second)
    Crash,
    /// Star power-up (7 seconds)
    Star,
}

/// Timed invulnerability state machine.
///
/// Transitions: `Vulnerable -> Shielded(Crash)` on a damaging hit,
/// `* -> Shielded(Star)` on a star pickup (the star always wins and restarts
/// the clock), `Shielded -> Vulnerable` only when the timer expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Invulnerability {
    Vulnerable,
    Shielded {
        cause: ShieldCause,
        elapsed: u32,
        duration: u32,
    },
}

impl Invulnerability {
    pub fn is_shielded(&self) -> bool {
        matches!(self, Invulnerability::Shielded { .. })
    }

    /// Ticks left before the shield drops (0 when vulnerable)
    pub fn remaining(&self) -> u32 {
        match *self {
            Invulnerability::Vulnerable => 0,
            Invulnerability::Shielded {
                elapsed, duration, ..
            } => duration.saturating_sub(elapsed),
        }
    }
}

/// The player's car: mouse-driven y, fixed x, hit counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Vec2,
    /// Flash flag while shielded; the renderer hides the car when false
    pub visible: bool,
    pub shield: Invulnerability,
    /// Lifetime counters for the session
    pub hit_car: u32,
    pub hit_flotsam: u32,
    pub hit_powerup: u32,
}

impl PlayerState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.player_x,
                (tuning.player_min_y + tuning.player_max_y) / 2.0,
            ),
            visible: true,
            shield: Invulnerability::Vulnerable,
            hit_car: 0,
            hit_flotsam: 0,
            hit_powerup: 0,
        }
    }

    /// Apply a pointer sample: scale y down by the sensitivity divisor and
    /// clamp to the road so the car cannot drive onto the grass. x is fixed.
    pub fn steer(&mut self, pointer_y: f32, tuning: &Tuning) {
        let y = pointer_y / tuning.pointer_sensitivity;
        self.pos.y = y.clamp(tuning.player_min_y, tuning.player_max_y);
    }

    pub fn is_invulnerable(&self) -> bool {
        self.shield.is_shielded()
    }
}

/// Health, score, and the transient status line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Single source of truth for health, clamped to `0..=max_health`
    pub health: i32,
    /// Monotonically non-decreasing
    pub score: u64,
    pub status: String,
    status_elapsed: u32,
}

impl Scoreboard {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            health: tuning.max_health,
            score: 0,
            status: String::new(),
            status_elapsed: 0,
        }
    }

    /// Replace the status line and restart its expiry clock
    pub fn set_status(&mut self, status: String) {
        self.status = status;
        self.status_elapsed = 0;
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
        self.status_elapsed = 0;
    }

    /// Age the status line; clears it once it outlives `max_ticks`
    pub fn tick_status(&mut self, max_ticks: u32) {
        if self.status.is_empty() {
            return;
        }
        if self.status_elapsed < max_ticks {
            self.status_elapsed += 1;
        } else {
            self.clear_status();
        }
    }

    /// Add (or subtract) health, clamped both directions
    pub fn adjust_health(&mut self, delta: i32, max_health: i32) {
        self.health = (self.health + delta).clamp(0, max_health);
    }

    /// The text overlay line the render collaborator draws
    pub fn line(&self) -> String {
        format!(
            "Health: {}   Score: {}    {}",
            self.health, self.score, self.status
        )
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Health hit zero; the session loop exits at its next top
    GameOver,
}

/// Discrete feedback events for the audio collaborator.
///
/// The sim fires these and forgets them; nothing ever blocks on playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CoinCollected,
    CarHit,
    ObjectHit,
    RepairCollected,
    StarCollected,
    EngineLoopStart,
    EngineLoopStop,
}

/// One sprite the render collaborator should draw this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteInstance {
    pub sprite: SpriteKind,
    pub variant: u8,
    pub pos: Vec2,
    pub visible: bool,
}

/// Complete per-session game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub tick: u64,
    pub phase: GamePhase,
    pub player: PlayerState,
    /// Fixed-order entity pool; iteration order is part of determinism
    pub entities: Vec<Entity>,
    pub scoreboard: Scoreboard,
}

impl GameState {
    /// Fresh session state: full health, zero score, pool populated and
    /// scattered per each entity's respawn policy.
    ///
    /// The tuning must already be validated; `Session::new` is the
    /// validating entry point. A malformed tuning here is a caller bug
    /// (an inverted spawn range would otherwise surface as a panic deep
    /// inside the respawn rolls).
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        debug_assert!(tuning.validate().is_ok(), "tuning not validated");
        let mut rng = Pcg32::seed_from_u64(seed);
        let entities = spawn::populate(&mut rng, tuning);
        Self {
            seed,
            rng,
            tick: 0,
            phase: GamePhase::Running,
            player: PlayerState::new(tuning),
            entities,
            scoreboard: Scoreboard::new(tuning),
        }
    }

    fn push_kind(&self, out: &mut Vec<SpriteInstance>, kind: EntityKind) {
        for e in self.entities.iter().filter(|e| e.kind == kind && e.active) {
            out.push(SpriteInstance {
                sprite: e.sprite,
                variant: e.variant,
                pos: e.pos,
                visible: true,
            });
        }
    }

    /// Back-to-front draw order for the render collaborator: road clutter,
    /// power-ups, coin, player, then hazards on top. The road background and
    /// the scoreboard text (`scoreboard.line()`) frame this list.
    pub fn draw_list(&self) -> Vec<SpriteInstance> {
        let mut out = Vec::with_capacity(self.entities.len() + 1);
        self.push_kind(&mut out, EntityKind::Decorative);
        self.push_kind(&mut out, EntityKind::Repair);
        self.push_kind(&mut out, EntityKind::Star);
        self.push_kind(&mut out, EntityKind::Coin);
        out.push(SpriteInstance {
            sprite: SpriteKind::PlayerCar,
            variant: 0,
            pos: self.player.pos,
            visible: self.player.visible,
        });
        self.push_kind(&mut out, EntityKind::Flotsam);
        self.push_kind(&mut out, EntityKind::Traffic);
        out
    }
}
