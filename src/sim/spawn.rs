//! Respawn policy
//!
//! Per-kind rules for where an entity reappears after leaving the play
//! field. Spawn distance doubles as rarity: road clutter comes back within a
//! screen or two, power-ups respawn tens of thousands of pixels ahead, so no
//! probability roll is needed anywhere.

use rand::Rng as _;
use rand_pcg::Pcg32;

use super::state::{Entity, EntityKind, SpriteKind};
use crate::tuning::Tuning;

/// Build the session's entity pool in fixed order and scatter every member
/// through its own respawn policy. Order is part of determinism: the same
/// seed always produces the same pool.
pub fn populate(rng: &mut Pcg32, tuning: &Tuning) -> Vec<Entity> {
    let r = &tuning.roster;
    let mut pool = Vec::with_capacity(
        r.traffic + r.flotsam + r.coins + r.repairs + r.stars + r.decorative,
    );
    let roster = [
        (EntityKind::Traffic, SpriteKind::EnemyCar, r.traffic),
        (EntityKind::Flotsam, SpriteKind::Flotsam, r.flotsam),
        (EntityKind::Coin, SpriteKind::Coin, r.coins),
        (EntityKind::Repair, SpriteKind::Repair, r.repairs),
        (EntityKind::Star, SpriteKind::Star, r.stars),
        (EntityKind::Decorative, SpriteKind::RoadClutter, r.decorative),
    ];
    for (kind, sprite, count) in roster {
        for _ in 0..count {
            let mut entity = Entity {
                kind,
                pos: glam::Vec2::ZERO,
                dx: 0.0,
                sprite,
                variant: 0,
                active: true,
            };
            reset(&mut entity, rng, tuning);
            pool.push(entity);
        }
    }
    pool
}

/// Reposition an entity per its kind's policy: lane roll for traffic,
/// scatter for everything else. Also re-rolls speed and image variant where
/// the kind randomizes them. Overlap avoidance is reactive (the rival
/// collision rule), not preventive.
pub fn reset(entity: &mut Entity, rng: &mut Pcg32, tuning: &Tuning) {
    match entity.kind {
        EntityKind::Traffic => reset_traffic(entity, rng, tuning),
        _ => scatter(entity, rng, tuning),
    }
}

/// Scatter x-range for a non-traffic kind (`None` for traffic, which spawns
/// at a fixed x)
pub fn spawn_x_range(kind: EntityKind, tuning: &Tuning) -> Option<(f32, f32)> {
    match kind {
        EntityKind::Traffic => None,
        EntityKind::Repair => Some(tuning.repair_spawn),
        EntityKind::Star => Some(tuning.star_spawn),
        EntityKind::Flotsam | EntityKind::Coin | EntityKind::Decorative => {
            Some(tuning.clutter_spawn)
        }
    }
}

fn reset_traffic(entity: &mut Entity, rng: &mut Pcg32, tuning: &Tuning) {
    let lane = rng.random_range(0..tuning.lanes.len());
    let base_speed = rng.random_range(tuning.traffic_speed_min..tuning.traffic_speed_max);

    entity.pos.x = tuning.traffic_spawn_x;
    entity.pos.y = tuning.lanes[lane];
    // Oncoming lanes approach faster than the background scrolls; this is a
    // design invariant, not cosmetics.
    if tuning.is_oncoming(lane) {
        entity.dx = base_speed + tuning.scroll_speed;
        entity.sprite = SpriteKind::OncomingCar;
    } else {
        entity.dx = base_speed;
        entity.sprite = SpriteKind::EnemyCar;
    }
    entity.variant = rng.random_range(0..entity.sprite.variant_count());
}

fn scatter(entity: &mut Entity, rng: &mut Pcg32, tuning: &Tuning) {
    // The range is validated non-empty by Tuning::validate
    let (start_x, end_x) = spawn_x_range(entity.kind, tuning)
        .unwrap_or(tuning.clutter_spawn);
    let (top, bottom) = tuning.scatter_y_range();

    entity.pos.x = rng.random_range(start_x..end_x);
    entity.pos.y = rng.random_range(top..bottom);
    // These sprites are stationary on the road: they cross the field at
    // exactly the scroll speed.
    entity.dx = tuning.scroll_speed;
    if entity.sprite.variant_count() > 1 {
        entity.variant = rng.random_range(0..entity.sprite.variant_count());
    }
}
