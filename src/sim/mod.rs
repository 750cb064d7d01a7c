//! Deterministic game simulation
//!
//! The sim is a pure fixed-timestep core: it owns no clock, opens no window,
//! plays no sound. Feed it one `TickInput` per tick and it returns the
//! feedback events; everything else it needs is in `GameState` (including
//! the seeded RNG) and the immutable `Tuning`. Two sessions with the same
//! seed and the same input trace produce identical states tick for tick.

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Collider, CollisionReport, MaskSet, OverlapTest, SpriteMask};
pub use state::{
    Entity, EntityKind, GameEvent, GamePhase, GameState, Invulnerability, PlayerState,
    Scoreboard, ShieldCause, SpriteInstance, SpriteKind,
};
pub use tick::{TickInput, tick};
