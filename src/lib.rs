//! Coin Collector - a mouse-steered arcade driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `tuning`: Data-driven game balance, validated at startup
//! - `session`: Fixed-timestep session runner with collaborator traits
//! - `audio`: Feedback hook mapping game events to sound effects
//! - `settings`: User preferences

pub mod audio;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (reference values; `Tuning` is the
/// runtime-adjustable copy)
pub mod consts {
    /// Fixed simulation tick rate (ticks per second)
    pub const TICK_RATE: u32 = 30;

    /// Play field dimensions (screen pixels)
    pub const FIELD_WIDTH: f32 = 640.0;
    pub const FIELD_HEIGHT: f32 = 480.0;

    /// Background scroll speed (pixels per tick)
    pub const SCROLL_SPEED: f32 = 20.0;

    /// Traffic lane y-coordinates. Lanes 0 and 1 are oncoming.
    pub const LANES: [f32; 4] = [90.0, 190.0, 290.0, 390.0];
    /// Number of leading lanes whose traffic approaches the player
    pub const ONCOMING_LANES: usize = 2;
    /// Base traffic speed range in pixels per tick, `[min, max)`
    pub const TRAFFIC_SPEED_MIN: f32 = 13.0;
    pub const TRAFFIC_SPEED_MAX: f32 = 15.0;
    /// Fresh traffic enters here, just off the right edge
    pub const TRAFFIC_SPAWN_X: f32 = 750.0;

    /// Entities that scroll past this x become eligible for respawn.
    /// Must be <= 0 so sprites fully exit the field before teleporting.
    pub const RESET_POINT: f32 = -50.0;

    /// Scatter spawn distance for ordinary road clutter (coin, flotsam,
    /// decorative), `[start, end)` in pixels ahead of the field
    pub const CLUTTER_SPAWN: (f32, f32) = (850.0, 1500.0);
    /// Power-ups spawn far ahead, which is what makes them rare
    pub const REPAIR_SPAWN: (f32, f32) = (15_000.0, 20_000.0);
    pub const STAR_SPAWN: (f32, f32) = (20_000.0, 30_000.0);
    /// Vertical margin kept clear at the top and bottom of the field
    /// when scattering entities
    pub const SCATTER_MARGIN: f32 = 75.0;

    /// Player car: fixed x, steerable y clamped to the road
    pub const PLAYER_X: f32 = 60.0;
    pub const PLAYER_MIN_Y: f32 = 60.0;
    pub const PLAYER_MAX_Y: f32 = 410.0;
    /// Pointer y is divided by this before clamping
    pub const POINTER_SENSITIVITY: f32 = 1.1;

    /// Health and damage
    pub const MAX_HEALTH: i32 = 100;
    pub const CAR_DAMAGE: i32 = 20;
    pub const FLOTSAM_DAMAGE: i32 = 10;
    pub const REPAIR_HEALTH: i32 = 30;

    /// Scoring
    pub const COIN_SCORE: u64 = 500;
    pub const SURVIVAL_BONUS: u64 = 1;

    /// Invulnerability durations in ticks
    pub const HIT_SHIELD_TICKS: u32 = TICK_RATE;
    pub const STAR_SHIELD_TICKS: u32 = 7 * TICK_RATE;

    /// Scoreboard status messages auto-clear after this many ticks
    pub const STATUS_TICKS: u32 = TICK_RATE;
}

/// Remaining whole seconds for a countdown, rounded up.
///
/// Used for the star status display: 209 ticks left at 30 Hz still
/// reads as 7 seconds, not 6.
#[inline]
pub fn secs_remaining_ceil(remaining_ticks: u32, tick_rate: u32) -> u32 {
    remaining_ticks.div_ceil(tick_rate.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secs_remaining_rounds_up() {
        assert_eq!(secs_remaining_ceil(210, 30), 7);
        assert_eq!(secs_remaining_ceil(209, 30), 7);
        assert_eq!(secs_remaining_ceil(181, 30), 7);
        assert_eq!(secs_remaining_ceil(180, 30), 6);
        assert_eq!(secs_remaining_ceil(1, 30), 1);
        assert_eq!(secs_remaining_ceil(0, 30), 0);
    }

    #[test]
    fn secs_remaining_survives_zero_rate() {
        assert_eq!(secs_remaining_ceil(30, 0), 30);
    }
}
