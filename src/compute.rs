/// Simulation controller.
///
/// `Game` owns the ship, the martian roster, the orphan bullets, the effects
/// and every timer.  One [`Event::Tick`] runs the phases in a fixed order:
/// ship → martians → orphan bullets → collisions → animations → next
/// shooter.  Collision resolution depends on post-movement positions and the
/// animation pass on post-collision populations, so the order is not
/// negotiable.  All randomness comes through the injected RNG so callers
/// control determinism (tests use a seeded RNG).

use log::{debug, info, warn};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    advance_downward, formation, Direction, Effect, Martian, Projectile, Rect, Ship,
};
use crate::error::GameError;
use crate::input::{Event, Key, Keyboard};
use crate::pool::Pool;

/// How the session currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    /// The ship ran out of lives.
    Defeated,
    /// The formation reached the bottom and halted.
    Invaded,
    /// Every martian was shot down.
    Cleared,
}

#[derive(Clone, Debug)]
pub struct Game {
    pub config: GameConfig,
    pub ship: Ship,
    /// Live units in formation order; removal compacts.
    pub martians: Pool<Martian>,
    /// Bullets whose martian was destroyed while they were in flight.
    pub orphan_bullets: Pool<Projectile>,
    pub effects: Pool<Effect>,
    pub score: u32,
    pub destroyed: u32,
    pub ticks: u64,
    direction: Direction,
    next_shooter: usize,
    shoot_timer: u32,
    move_timer: u32,
    animation_timer: u32,
    done: bool,
    redraw: bool,
}

impl Game {
    pub fn new(config: GameConfig, rng: &mut impl Rng) -> Result<Self, GameError> {
        config.validate()?;

        let mut martians = Pool::with_capacity(config.martians.total());
        for unit in formation(&config) {
            martians.append(unit)?;
        }
        let next_shooter = rng.gen_range(0..martians.len());

        info!(
            "new game: {} martians, {} lives, god mode {}",
            martians.len(),
            config.ship.lives,
            config.god_mode
        );

        Ok(Self {
            ship: Ship::new(&config.ship),
            martians,
            orphan_bullets: Pool::with_capacity(config.bullets.orphan_capacity),
            effects: Pool::with_capacity(config.effects.capacity),
            score: 0,
            destroyed: 0,
            ticks: 0,
            direction: Direction::Right,
            next_shooter,
            shoot_timer: 0,
            move_timer: 0,
            animation_timer: 0,
            done: false,
            redraw: false,
            config,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The one direction every unit of the formation moves along.
    pub fn current_formation_direction(&self) -> Direction {
        self.direction
    }

    /// Roster index of the unit that fires on the next shoot-timer expiry.
    pub fn next_shooter(&self) -> usize {
        self.next_shooter
    }

    pub fn alive(&self) -> usize {
        self.martians.len()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn request_quit(&mut self) {
        if !self.done {
            info!("quit requested after {} ticks", self.ticks);
            self.done = true;
        }
    }

    /// Returns whether a redraw is pending and clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn outcome(&self) -> Outcome {
        if self.ship.is_destroyed() {
            Outcome::Defeated
        } else if self.martians.is_empty() {
            Outcome::Cleared
        } else if self.direction == Direction::None {
            Outcome::Invaded
        } else {
            Outcome::Playing
        }
    }

    // ── Event dispatch ────────────────────────────────────────────────────────

    pub fn handle_event<K: Keyboard + ?Sized>(
        &mut self,
        event: Event,
        keys: &K,
        rng: &mut impl Rng,
    ) -> Result<(), GameError> {
        match event {
            Event::DisplayClose => self.request_quit(),
            Event::Tick => {
                self.update(keys, rng)?;
                self.redraw = true;
            }
        }
        Ok(())
    }

    /// Run one tick.  The first failing phase aborts the rest of the tick.
    pub fn update<K: Keyboard + ?Sized>(
        &mut self,
        keys: &K,
        rng: &mut impl Rng,
    ) -> Result<(), GameError> {
        self.ticks += 1;
        self.update_ship(keys)?;
        self.update_martians()?;
        self.move_orphan_bullets(self.config.martians.bullet_speed);
        self.resolve_collisions()?;
        self.update_animations();
        self.pick_next_shooter(rng);
        Ok(())
    }

    // ── Ship ──────────────────────────────────────────────────────────────────

    pub fn update_ship<K: Keyboard + ?Sized>(&mut self, keys: &K) -> Result<(), GameError> {
        let speed = self.config.ship.speed;
        let left_limit = self.config.display.left_limit();
        let right_limit = self.config.display.right_limit();

        if keys.is_down(Key::Left) {
            self.ship.facing = Direction::Left;
            if self.ship.x - speed >= left_limit {
                self.ship.move_by(speed);
            }
        } else if keys.is_down(Key::Right) {
            self.ship.facing = Direction::Right;
            if self.ship.x + speed <= right_limit {
                self.ship.move_by(speed);
            }
        } else {
            self.ship.facing = Direction::None;
            // A held direction key wins over fire.
            if keys.is_down(Key::Fire) && self.ship.can_fire() {
                self.ship.shoot(&self.config.bullets)?;
            }
        }

        if keys.is_down(Key::Escape) {
            self.request_quit();
        }

        self.ship.advance_fire_timer(self.config.ship.fire_timer);
        self.ship.move_bullets(
            self.config.ship.bullet_speed,
            self.config.display.top_limit(),
        );
        Ok(())
    }

    // ── Martians ──────────────────────────────────────────────────────────────

    pub fn update_martians(&mut self) -> Result<(), GameError> {
        if self.martians.is_empty() {
            return Ok(());
        }

        self.shoot_timer += 1;
        if self.shoot_timer >= self.config.martians.shoot_freq {
            self.martian_shoot(self.next_shooter)?;
            self.shoot_timer = 0;
        }

        self.move_timer += 1;
        if self.move_timer >= self.config.martians.move_timer {
            self.move_formation(self.config.martians.speed);
            self.move_timer = 0;
        }

        let speed = self.config.martians.bullet_speed;
        let bottom = self.config.display.canvas_height();
        for unit in self.martians.iter_mut() {
            unit.move_bullets(speed, bottom);
        }
        Ok(())
    }

    pub fn martian_shoot(&mut self, index: usize) -> Result<(), GameError> {
        let len = self.martians.len();
        let unit = self.martians.get_at_mut(index).ok_or_else(|| {
            GameError::InvalidArgument(format!("no martian at index {index} (alive {len})"))
        })?;
        unit.shoot(&self.config.bullets)
    }

    /// Formation state machine followed by a lockstep move of every unit.
    ///
    /// The scan stops at the first unit that triggers a transition, and the
    /// move pass uses the updated direction.  Once stopped the formation
    /// never moves again.
    pub fn move_formation(&mut self, speed: f32) {
        if self.direction == Direction::None {
            return;
        }

        let display = &self.config.display;
        let (left, right, bottom) = (
            display.left_limit(),
            display.right_limit(),
            display.bottom_limit(),
        );

        for unit in self.martians.iter() {
            let next = match self.direction {
                Direction::Down => {
                    if unit.x + speed >= right {
                        Some(Direction::Left)
                    } else if unit.x - speed <= left {
                        Some(Direction::Right)
                    } else {
                        None
                    }
                }
                _ => {
                    if unit.x + speed >= right || unit.x - speed <= left {
                        Some(Direction::Down)
                    } else if unit.y + unit.height() as f32 >= bottom {
                        Some(Direction::None)
                    } else {
                        None
                    }
                }
            };
            if let Some(next) = next {
                if next == Direction::None {
                    info!("formation reached the bottom and halted");
                }
                self.direction = next;
                break;
            }
        }

        let direction = self.direction;
        for unit in self.martians.iter_mut() {
            unit.step(direction, speed);
        }
    }

    /// Remove the unit at `index` from the roster and hand it back.
    pub fn destroy_martian(&mut self, index: usize) -> Result<Martian, GameError> {
        let len = self.martians.len();
        let unit = self
            .martians
            .extract_at(index)
            .ok_or(GameError::NotFound { index, len })?;
        self.destroyed += 1;
        Ok(unit)
    }

    // ── Orphan bullets & effects ──────────────────────────────────────────────

    pub fn move_orphan_bullets(&mut self, speed: f32) {
        let bottom = self.config.display.canvas_height();
        advance_downward(&mut self.orphan_bullets, speed, bottom);
    }

    /// Adopt the in-flight bullets of a destroyed unit.  Bullets that do not
    /// fit are dropped.
    fn adopt_bullets(&mut self, unit: &mut Martian) {
        let mut dropped = 0;
        for bullet in unit.bullets.drain() {
            if self.orphan_bullets.append(bullet).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!("orphan pool full, dropped {dropped} bullet(s)");
        }
    }

    fn spawn_explosion(&mut self, x: f32, y: f32) {
        let effect = Effect::explosion(x, y, &self.config.effects);
        if let Err(e) = self.effects.append(effect) {
            warn!("explosion at ({x}, {y}) not shown: {e}");
        }
    }

    // ── Collisions ────────────────────────────────────────────────────────────

    /// Resolve every collision for this tick.
    ///
    /// Each ship bullet is tested against martians, then martian bullets,
    /// then orphan bullets, stopping at the first hit.  After a removal the
    /// same index is tested again since it now holds the next bullet.
    pub fn resolve_collisions(&mut self) -> Result<(), GameError> {
        let mut i = 0;
        while i < self.ship.bullets.len() {
            let shot = self.ship.bullets.try_get_at(i)?.hitbox();
            if self.shot_hits_martian(i, &shot)?
                || self.shot_hits_martian_bullet(i, &shot)
                || self.shot_hits_orphan(i, &shot)
            {
                continue;
            }
            i += 1;
        }
        self.martian_bullets_hit_ship();
        Ok(())
    }

    fn shot_hits_martian(&mut self, i: usize, shot: &Rect) -> Result<bool, GameError> {
        let Some(j) = self
            .martians
            .iter()
            .position(|unit| shot.overlaps(&unit.hitbox()))
        else {
            return Ok(false);
        };

        self.ship.bullets.extract_at(i);
        let mut unit = self.destroy_martian(j)?;
        self.adopt_bullets(&mut unit);
        self.score += unit.points;
        self.spawn_explosion(unit.x, unit.y);
        debug!(
            "martian at ({}, {}) destroyed for {} points (score {})",
            unit.x, unit.y, unit.points, self.score
        );
        Ok(true)
    }

    fn shot_hits_martian_bullet(&mut self, i: usize, shot: &Rect) -> bool {
        let hit = self.martians.iter().enumerate().find_map(|(j, unit)| {
            unit.bullets
                .iter()
                .position(|b| b.collides_with(shot))
                .map(|k| (j, k))
        });
        let Some((j, k)) = hit else {
            return false;
        };

        self.ship.bullets.extract_at(i);
        let clashed = self
            .martians
            .get_at_mut(j)
            .and_then(|unit| unit.bullets.extract_at(k));
        if let Some(bullet) = clashed {
            debug!("bullets clashed at ({}, {})", bullet.x, bullet.y);
            self.spawn_explosion(bullet.x, bullet.y);
        }
        true
    }

    /// Only the ship bullet is destroyed; the orphan keeps falling.
    fn shot_hits_orphan(&mut self, i: usize, shot: &Rect) -> bool {
        let Some(orphan) = self
            .orphan_bullets
            .iter()
            .find(|b| b.collides_with(shot))
            .map(|b| (b.x, b.y))
        else {
            return false;
        };

        self.ship.bullets.extract_at(i);
        self.spawn_explosion(orphan.0, orphan.1);
        true
    }

    fn martian_bullets_hit_ship(&mut self) {
        let target = self.ship.hitbox();
        let mut hits = 0;
        for unit in self.martians.iter_mut() {
            let mut j = 0;
            while let Some(bullet) = unit.bullets.get_at(j) {
                if bullet.collides_with(&target) {
                    unit.bullets.extract_at(j);
                    hits += 1;
                } else {
                    j += 1;
                }
            }
        }

        for _ in 0..hits {
            self.damage_ship();
        }
    }

    fn damage_ship(&mut self) {
        if !self.config.god_mode {
            self.ship.decrease_life(1);
            debug!("ship hit, {} lives left", self.ship.lives);
            if self.ship.is_destroyed() && !self.done {
                info!("ship destroyed, final score {}", self.score);
                self.done = true;
            }
        }
        self.spawn_explosion(self.ship.x, self.ship.y);
    }

    // ── Animation ─────────────────────────────────────────────────────────────

    /// Toggle unit and enemy-bullet frames on the animation period, then
    /// retire expired effects and age the rest.
    pub fn update_animations(&mut self) {
        self.animation_timer += 1;
        if self.animation_timer > self.config.martians.animation_period {
            for unit in self.martians.iter_mut() {
                unit.toggle_frame();
                for bullet in unit.bullets.iter_mut() {
                    bullet.toggle_frame();
                }
            }
            for bullet in self.orphan_bullets.iter_mut() {
                bullet.toggle_frame();
            }
            self.animation_timer = 0;
        }

        let mut i = 0;
        while let Some(effect) = self.effects.get_at_mut(i) {
            if effect.is_expired() {
                self.effects.extract_at(i);
            } else {
                effect.advance();
                i += 1;
            }
        }
    }

    pub fn pick_next_shooter(&mut self, rng: &mut impl Rng) {
        if !self.martians.is_empty() {
            self.next_shooter = rng.gen_range(0..self.martians.len());
        }
    }
}
