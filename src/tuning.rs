//! Data-driven game balance
//!
//! All gameplay numbers live in one `Tuning` value so the simulation has no
//! scattered magic constants and tests can bend the rules cheaply. A tuning
//! is validated once at session construction; a malformed one is a
//! configuration error, never a mid-session surprise.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Rejected tuning configurations
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("reset point must be <= 0 so entities exit the field before respawning (got {0})")]
    ResetPointNotNegative(f32),
    #[error("spawn range for {kind} is inverted or empty: [{start}, {end})")]
    InvertedSpawnRange {
        kind: &'static str,
        start: f32,
        end: f32,
    },
    #[error("traffic speed range is inverted or empty: [{0}, {1})")]
    InvertedSpeedRange(f32, f32),
    #[error("player bounds are inverted: [{0}, {1}]")]
    InvertedPlayerBounds(f32, f32),
    #[error("tick rate must be positive")]
    ZeroTickRate,
    #[error("lane table is empty")]
    NoLanes,
    #[error("oncoming lane count {0} exceeds lane table size {1}")]
    TooManyOncomingLanes(usize, usize),
    #[error("pointer sensitivity divisor must be >= 1 (got {0})")]
    SensitivityTooSmall(f32),
    #[error("scatter margins leave no vertical room on a {height}px field")]
    MarginsExceedField { height: f32 },
}

/// How many of each pooled entity kind a session starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub traffic: usize,
    pub flotsam: usize,
    pub coins: usize,
    pub repairs: usize,
    pub stars: usize,
    pub decorative: usize,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            traffic: 2,
            flotsam: 3,
            coins: 1,
            repairs: 1,
            stars: 1,
            decorative: 2,
        }
    }
}

/// Complete gameplay balance for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Play field size in pixels
    pub field_width: f32,
    pub field_height: f32,
    /// Background scroll speed, pixels per tick
    pub scroll_speed: f32,

    /// Traffic lane y-coordinates; the first `oncoming_lanes` entries are
    /// oncoming and get `scroll_speed` added to their base speed
    pub lanes: Vec<f32>,
    pub oncoming_lanes: usize,
    /// Base traffic speed, sampled uniformly from `[min, max)`
    pub traffic_speed_min: f32,
    pub traffic_speed_max: f32,
    /// x where a fresh traffic car enters
    pub traffic_spawn_x: f32,

    /// Entities past this x respawn (must be <= 0)
    pub reset_point: f32,

    /// Scatter ranges `[start, end)`: respawn distance ahead of the field
    pub clutter_spawn: (f32, f32),
    pub repair_spawn: (f32, f32),
    pub star_spawn: (f32, f32),
    /// Top/bottom margin kept clear when scattering
    pub scatter_margin: f32,

    /// Player car
    pub player_x: f32,
    pub player_min_y: f32,
    pub player_max_y: f32,
    pub pointer_sensitivity: f32,

    /// Health and damage
    pub max_health: i32,
    pub car_damage: i32,
    pub flotsam_damage: i32,
    pub repair_health: i32,

    /// Scoring
    pub coin_score: u64,
    pub survival_bonus: u64,

    /// Invulnerability windows, in ticks
    pub hit_shield_ticks: u32,
    pub star_shield_ticks: u32,

    /// Status message lifetime, in ticks
    pub status_ticks: u32,

    /// Entity pool composition
    pub roster: Roster,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_rate: consts::TICK_RATE,
            field_width: consts::FIELD_WIDTH,
            field_height: consts::FIELD_HEIGHT,
            scroll_speed: consts::SCROLL_SPEED,
            lanes: consts::LANES.to_vec(),
            oncoming_lanes: consts::ONCOMING_LANES,
            traffic_speed_min: consts::TRAFFIC_SPEED_MIN,
            traffic_speed_max: consts::TRAFFIC_SPEED_MAX,
            traffic_spawn_x: consts::TRAFFIC_SPAWN_X,
            reset_point: consts::RESET_POINT,
            clutter_spawn: consts::CLUTTER_SPAWN,
            repair_spawn: consts::REPAIR_SPAWN,
            star_spawn: consts::STAR_SPAWN,
            scatter_margin: consts::SCATTER_MARGIN,
            player_x: consts::PLAYER_X,
            player_min_y: consts::PLAYER_MIN_Y,
            player_max_y: consts::PLAYER_MAX_Y,
            pointer_sensitivity: consts::POINTER_SENSITIVITY,
            max_health: consts::MAX_HEALTH,
            car_damage: consts::CAR_DAMAGE,
            flotsam_damage: consts::FLOTSAM_DAMAGE,
            repair_health: consts::REPAIR_HEALTH,
            coin_score: consts::COIN_SCORE,
            survival_bonus: consts::SURVIVAL_BONUS,
            hit_shield_ticks: consts::HIT_SHIELD_TICKS,
            star_shield_ticks: consts::STAR_SHIELD_TICKS,
            status_ticks: consts::STATUS_TICKS,
            roster: Roster::default(),
        }
    }
}

impl Tuning {
    /// Check every structural invariant the simulation relies on.
    ///
    /// Called by `Session::new`; the sim itself assumes a valid tuning.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.tick_rate == 0 {
            return Err(TuningError::ZeroTickRate);
        }
        if self.reset_point > 0.0 {
            return Err(TuningError::ResetPointNotNegative(self.reset_point));
        }
        for (kind, &(start, end)) in [
            ("clutter", &self.clutter_spawn),
            ("repair", &self.repair_spawn),
            ("star", &self.star_spawn),
        ] {
            if start >= end {
                return Err(TuningError::InvertedSpawnRange { kind, start, end });
            }
        }
        if self.traffic_speed_min >= self.traffic_speed_max {
            return Err(TuningError::InvertedSpeedRange(
                self.traffic_speed_min,
                self.traffic_speed_max,
            ));
        }
        if self.player_min_y >= self.player_max_y {
            return Err(TuningError::InvertedPlayerBounds(
                self.player_min_y,
                self.player_max_y,
            ));
        }
        if self.lanes.is_empty() {
            return Err(TuningError::NoLanes);
        }
        if self.oncoming_lanes > self.lanes.len() {
            return Err(TuningError::TooManyOncomingLanes(
                self.oncoming_lanes,
                self.lanes.len(),
            ));
        }
        if self.pointer_sensitivity < 1.0 {
            return Err(TuningError::SensitivityTooSmall(self.pointer_sensitivity));
        }
        if self.scatter_margin * 2.0 >= self.field_height {
            return Err(TuningError::MarginsExceedField {
                height: self.field_height,
            });
        }
        Ok(())
    }

    /// Scatter y range `[top, bottom)` derived from margins
    pub fn scatter_y_range(&self) -> (f32, f32) {
        (self.scatter_margin, self.field_height - self.scatter_margin)
    }

    /// Is this lane index an oncoming lane?
    pub fn is_oncoming(&self, lane: usize) -> bool {
        lane < self.oncoming_lanes
    }
}
