/// Game entities and their per-entity behaviour.
///
/// Nothing here knows about the formation or the other entities; the
/// controller in `compute` wires them together.

use crate::config::{BulletConfig, EffectConfig, GameConfig, ShipConfig};
use crate::error::GameError;
use crate::pool::Pool;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
    #[default]
    None,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box in playfield pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap on all four edges: boxes that only touch do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Source rectangle inside a sprite sheet, in sheet pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Region {
    /// Tile `(frame_x, frame_y)` of a sheet cut into `w`×`h` tiles.
    pub fn tile(frame_x: u32, frame_y: u32, w: u32, h: u32) -> Self {
        Self {
            x: frame_x * w,
            y: frame_y * h,
            w,
            h,
        }
    }
}

fn toggle(frame: u32) -> u32 {
    if frame > 0 {
        0
    } else {
        1
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub direction: Direction,
    pub frame_x: u32,
    pub frame_y: u32,
    width: u32,
    height: u32,
}

impl Projectile {
    pub fn new(x: f32, y: f32, direction: Direction, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            direction,
            frame_x: 0,
            frame_y: 0,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Vertical only; directions other than Up/Down leave it in place.
    pub fn move_by(&mut self, speed: f32) {
        match self.direction {
            Direction::Up => self.y -= speed,
            Direction::Down => self.y += speed,
            _ => {}
        }
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.width as f32, self.height as f32)
    }

    pub fn collides_with(&self, other: &Rect) -> bool {
        self.hitbox().overlaps(other)
    }

    pub fn region(&self) -> Region {
        Region::tile(self.frame_x, self.frame_y, self.width, self.height)
    }

    pub fn toggle_frame(&mut self) {
        self.frame_x = toggle(self.frame_x);
    }
}

/// Advance every bullet in `pool`, destroying those for which `keep` says
/// the next step would leave the playfield.  A removal re-examines the same
/// index, so the bullet shifted into it is not skipped.
fn advance_pool(pool: &mut Pool<Projectile>, speed: f32, keep: impl Fn(f32) -> bool) {
    let mut i = 0;
    while let Some(bullet) = pool.get_at_mut(i) {
        if keep(bullet.y) {
            bullet.move_by(speed);
            i += 1;
        } else {
            pool.extract_at(i);
        }
    }
}

/// Upward bullets survive while `y - speed` stays below `top_limit` on screen.
pub fn advance_upward(pool: &mut Pool<Projectile>, speed: f32, top_limit: f32) {
    advance_pool(pool, speed, |y| y - speed > top_limit);
}

/// Downward bullets survive while `y + speed` stays above `bottom_limit`.
pub fn advance_downward(pool: &mut Pool<Projectile>, speed: f32, bottom_limit: f32) {
    advance_pool(pool, speed, |y| y + speed < bottom_limit);
}

fn fire(
    bullets: &mut Pool<Projectile>,
    x: f32,
    y: f32,
    direction: Direction,
    cfg: &BulletConfig,
) -> Result<(), GameError> {
    // A full magazine is not an error: the shot is simply not taken.
    if bullets.is_full() {
        return Ok(());
    }
    bullets.append(Projectile::new(
        x + cfg.muzzle_offset,
        y,
        direction,
        cfg.width,
        cfg.height,
    ))
}

// ── Player ship ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub facing: Direction,
    pub lives: u32,
    pub bullets: Pool<Projectile>,
    /// Counts ticks up to the fire threshold; the ship may fire only at 0.
    pub fire_timer: u32,
    pub frame_x: u32,
    pub frame_y: u32,
    width: u32,
    height: u32,
}

impl Ship {
    pub fn new(cfg: &ShipConfig) -> Self {
        Self {
            x: cfg.start_x,
            y: cfg.start_y,
            facing: Direction::None,
            lives: cfg.lives,
            bullets: Pool::with_capacity(cfg.bullet_capacity),
            fire_timer: 0,
            frame_x: 0,
            frame_y: 0,
            width: cfg.width,
            height: cfg.height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.width as f32, self.height as f32)
    }

    pub fn region(&self) -> Region {
        Region::tile(self.frame_x, self.frame_y, self.width, self.height)
    }

    /// Fire one bullet upward from the nose.  No-op when the pool is full.
    pub fn shoot(&mut self, cfg: &BulletConfig) -> Result<(), GameError> {
        fire(&mut self.bullets, self.x, self.y, Direction::Up, cfg)
    }

    /// Step horizontally along `facing`; any other facing collapses to None.
    pub fn move_by(&mut self, speed: f32) {
        match self.facing {
            Direction::Right => self.x += speed,
            Direction::Left => self.x -= speed,
            _ => self.facing = Direction::None,
        }
    }

    pub fn move_bullets(&mut self, speed: f32, top_limit: f32) {
        advance_upward(&mut self.bullets, speed, top_limit);
    }

    pub fn decrease_life(&mut self, amount: u32) {
        self.lives = self.lives.saturating_sub(amount);
    }

    pub fn is_destroyed(&self) -> bool {
        self.lives == 0
    }

    pub fn can_fire(&self) -> bool {
        self.fire_timer == 0
    }

    /// Advance the fire timer, wrapping to 0 when it reaches `max`.
    pub fn advance_fire_timer(&mut self, max: u32) {
        self.fire_timer += 1;
        if self.fire_timer >= max {
            self.fire_timer = 0;
        }
    }
}

// ── Martians ──────────────────────────────────────────────────────────────────

/// One unit of the formation.  It does not own a direction: the controller
/// passes its single formation direction into [`Martian::step`].
#[derive(Clone, Debug)]
pub struct Martian {
    pub x: f32,
    pub y: f32,
    pub bullets: Pool<Projectile>,
    pub points: u32,
    pub frame_x: u32,
    pub frame_y: u32,
    width: u32,
    height: u32,
}

impl Martian {
    pub fn new(
        x: f32,
        y: f32,
        width: u32,
        height: u32,
        points: u32,
        bullet_capacity: usize,
    ) -> Self {
        Self {
            x,
            y,
            bullets: Pool::with_capacity(bullet_capacity),
            points,
            frame_x: 0,
            frame_y: 0,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.width as f32, self.height as f32)
    }

    pub fn region(&self) -> Region {
        Region::tile(self.frame_x, self.frame_y, self.width, self.height)
    }

    /// Fire one bullet downward.  No-op when the pool is full.
    pub fn shoot(&mut self, cfg: &BulletConfig) -> Result<(), GameError> {
        fire(&mut self.bullets, self.x, self.y, Direction::Down, cfg)
    }

    /// Move along the formation direction.  Down drops a full unit height
    /// regardless of `speed`.
    pub fn step(&mut self, direction: Direction, speed: f32) {
        match direction {
            Direction::Right => self.x += speed,
            Direction::Left => self.x -= speed,
            Direction::Down => self.y += self.height as f32,
            _ => {}
        }
    }

    pub fn move_bullets(&mut self, speed: f32, bottom_limit: f32) {
        advance_downward(&mut self.bullets, speed, bottom_limit);
    }

    pub fn toggle_frame(&mut self) {
        self.frame_x = toggle(self.frame_x);
    }
}

/// Build the starting grid, row-major with row 0 on top.
pub fn formation(cfg: &GameConfig) -> Vec<Martian> {
    let m = &cfg.martians;
    let mut units = Vec::with_capacity(m.total());
    for row in 0..m.rows {
        let (points, frame_y) = m.row_kind(row);
        for col in 0..m.columns {
            let mut unit = Martian::new(
                m.origin_x + col as f32 * m.spacing_x,
                m.origin_y + row as f32 * m.spacing_y,
                m.width,
                m.height,
                points,
                m.bullet_capacity,
            );
            unit.frame_y = frame_y;
            units.push(unit);
        }
    }
    units
}

// ── Effects ───────────────────────────────────────────────────────────────────

/// Short-lived sprite such as an explosion.
///
/// The timer counts up once per tick; the tick on which it wraps past
/// `lifetime` marks the effect expired, so an effect is shown for exactly
/// `lifetime` ticks.  Expiry is a separate flag rather than `timer == 0`,
/// which is also the freshly-spawned value.
#[derive(Clone, Debug)]
pub struct Effect {
    pub x: f32,
    pub y: f32,
    pub region: Region,
    /// Fixed effects stay where they were spawned.
    pub fixed: bool,
    lifetime: u32,
    timer: u32,
    expired: bool,
}

impl Effect {
    pub fn new(x: f32, y: f32, region: Region, lifetime: u32, fixed: bool) -> Self {
        Self {
            x,
            y,
            region,
            fixed,
            lifetime,
            timer: 0,
            expired: false,
        }
    }

    pub fn explosion(x: f32, y: f32, cfg: &EffectConfig) -> Self {
        Self::new(
            x + cfg.offset_x,
            y,
            Region::tile(0, 0, cfg.width, cfg.height),
            cfg.lifetime,
            true,
        )
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn advance(&mut self) {
        if self.expired {
            return;
        }
        self.timer += 1;
        if self.timer >= self.lifetime {
            self.timer = 0;
            self.expired = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_two_frames() {
        assert_eq!(toggle(0), 1);
        assert_eq!(toggle(1), 0);
        assert_eq!(toggle(3), 0);
    }

    #[test]
    fn advance_pool_does_not_skip_shifted_bullet() {
        let mut pool = Pool::with_capacity(4);
        for y in [100.0, 105.0, 300.0] {
            pool.append(Projectile::new(0.0, y, Direction::Up, 6, 12)).unwrap();
        }
        // The first two are past the limit; the second shifts into slot 0
        // after the first is removed and must still be removed.
        advance_upward(&mut pool, 15.0, 110.0);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get_at(0).unwrap().y, 285.0);
    }
}
