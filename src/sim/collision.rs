//! Collision detection
//!
//! Bounding rectangles alone flag hits on the transparent padding around a
//! sprite, which reads as unfair to the player. Detection therefore runs in
//! two stages: a cheap rectangle early-out, then a pixel-mask intersection.
//! The rectangle-only mode stays available as an explicit strategy so the
//! precision/performance tradeoff is testable on its own.

use glam::Vec2;

use super::state::{Entity, EntityKind, PlayerState, SpriteKind};

/// Overlap strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapTest {
    /// Axis-aligned bounding rectangles only
    BoundingBox,
    /// Rectangle early-out, then per-pixel mask intersection
    #[default]
    PixelMask,
}

/// Opaque-pixel footprint of a sprite, centered on the entity position
#[derive(Debug, Clone)]
pub struct SpriteMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl SpriteMask {
    fn new(width: u32, height: u32, opaque: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Solid rectangle (decorative sprites; never actually collided)
    fn solid(width: u32, height: u32) -> Self {
        Self::new(width, height, |_, _| true)
    }

    /// Rectangle with quarter-circle corners cut away, like a car sprite
    /// with transparent corner padding
    fn rounded_box(width: u32, height: u32, corner: u32) -> Self {
        Self::new(width, height, move |x, y| {
            let x_edge = x.min(width - 1 - x);
            let y_edge = y.min(height - 1 - y);
            if x_edge >= corner || y_edge >= corner {
                return true;
            }
            let dx = corner - x_edge;
            let dy = corner - y_edge;
            dx * dx + dy * dy <= corner * corner
        })
    }

    /// Elliptical footprint (coin, barrel-style debris)
    fn ellipse(width: u32, height: u32) -> Self {
        let cx = (width as f32 - 1.0) / 2.0;
        let cy = (height as f32 - 1.0) / 2.0;
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        Self::new(width, height, move |x, y| {
            let nx = (x as f32 - cx) / rx;
            let ny = (y as f32 - cy) / ry;
            nx * nx + ny * ny <= 1.0
        })
    }

    /// Diamond footprint (star power-up)
    fn diamond(width: u32, height: u32) -> Self {
        let cx = (width as f32 - 1.0) / 2.0;
        let cy = (height as f32 - 1.0) / 2.0;
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        Self::new(width, height, move |x, y| {
            let nx = ((x as f32 - cx) / rx).abs();
            let ny = ((y as f32 - cy) / ry).abs();
            nx + ny <= 1.0
        })
    }

    /// Half width/height in pixels; the entity position is the center
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }
}

/// One mask per sprite kind, built procedurally at session start
#[derive(Debug, Clone)]
pub struct MaskSet {
    player_car: SpriteMask,
    enemy_car: SpriteMask,
    flotsam: SpriteMask,
    coin: SpriteMask,
    repair: SpriteMask,
    star: SpriteMask,
    clutter: SpriteMask,
}

impl MaskSet {
    pub fn new() -> Self {
        Self {
            player_car: SpriteMask::rounded_box(60, 30, 8),
            enemy_car: SpriteMask::rounded_box(60, 30, 8),
            flotsam: SpriteMask::ellipse(26, 26),
            coin: SpriteMask::ellipse(20, 20),
            repair: SpriteMask::rounded_box(26, 18, 4),
            star: SpriteMask::diamond(30, 30),
            clutter: SpriteMask::solid(40, 20),
        }
    }

    pub fn mask(&self, sprite: SpriteKind) -> &SpriteMask {
        match sprite {
            SpriteKind::PlayerCar => &self.player_car,
            SpriteKind::EnemyCar | SpriteKind::OncomingCar => &self.enemy_car,
            SpriteKind::Flotsam => &self.flotsam,
            SpriteKind::Coin => &self.coin,
            SpriteKind::Repair => &self.repair,
            SpriteKind::Star => &self.star,
            SpriteKind::RoadClutter => &self.clutter,
        }
    }
}

impl Default for MaskSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything touching the player this tick, bucketed by effect, plus any
/// rival traffic overlapping each other. Indices point into the entity pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub traffic: Vec<usize>,
    pub flotsam: Vec<usize>,
    pub coins: Vec<usize>,
    pub repairs: Vec<usize>,
    pub stars: Vec<usize>,
    /// Pairs of mutually overlapping traffic entities (visual stacking, not
    /// a damage event)
    pub rivals: Vec<(usize, usize)>,
}

impl CollisionReport {
    pub fn any_hazard(&self) -> bool {
        !self.traffic.is_empty() || !self.flotsam.is_empty()
    }
}

/// Pairwise overlap tester for the session
#[derive(Debug, Clone)]
pub struct Collider {
    test: OverlapTest,
    masks: MaskSet,
}

impl Collider {
    pub fn new(test: OverlapTest) -> Self {
        Self {
            test,
            masks: MaskSet::new(),
        }
    }

    /// Do two centered sprites overlap under the configured strategy?
    pub fn overlaps(&self, a: SpriteKind, a_pos: Vec2, b: SpriteKind, b_pos: Vec2) -> bool {
        let a_mask = self.masks.mask(a);
        let b_mask = self.masks.mask(b);
        let a_min = a_pos - a_mask.half_extents();
        let b_min = b_pos - b_mask.half_extents();
        let a_max = a_pos + a_mask.half_extents();
        let b_max = b_pos + b_mask.half_extents();

        let min = a_min.max(b_min);
        let max = a_max.min(b_max);
        if min.x >= max.x || min.y >= max.y {
            return false;
        }
        if self.test == OverlapTest::BoundingBox {
            return true;
        }

        // Walk pixel centers, keeping only those strictly inside the
        // intersection so fractional positions never probe past it
        let x0 = min.x.floor() as i32;
        let x1 = max.x.ceil() as i32;
        let y0 = min.y.floor() as i32;
        let y1 = max.y.ceil() as i32;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if p.x < min.x || p.x >= max.x || p.y < min.y || p.y >= max.y {
                    continue;
                }
                let ai = p - a_min;
                let bi = p - b_min;
                if a_mask.get(ai.x as i32, ai.y as i32) && b_mask.get(bi.x as i32, bi.y as i32) {
                    return true;
                }
            }
        }
        false
    }

    /// Evaluate every player-vs-entity pair and every rival traffic pair.
    /// Decorative entities never collide.
    pub fn test_all(&self, player: &PlayerState, entities: &[Entity]) -> CollisionReport {
        let mut report = CollisionReport::default();

        for (i, e) in entities.iter().enumerate() {
            if !e.active || e.kind == EntityKind::Decorative {
                continue;
            }
            if self.overlaps(SpriteKind::PlayerCar, player.pos, e.sprite, e.pos) {
                match e.kind {
                    EntityKind::Traffic => report.traffic.push(i),
                    EntityKind::Flotsam => report.flotsam.push(i),
                    EntityKind::Coin => report.coins.push(i),
                    EntityKind::Repair => report.repairs.push(i),
                    EntityKind::Star => report.stars.push(i),
                    EntityKind::Decorative => unreachable!(),
                }
            }
        }

        for i in 0..entities.len() {
            if entities[i].kind != EntityKind::Traffic || !entities[i].active {
                continue;
            }
            for j in (i + 1)..entities.len() {
                if entities[j].kind != EntityKind::Traffic || !entities[j].active {
                    continue;
                }
                if self.overlaps(
                    entities[i].sprite,
                    entities[i].pos,
                    entities[j].sprite,
                    entities[j].pos,
                ) {
                    report.rivals.push((i, j));
                }
            }
        }

        report
    }
}
