/// Render pass.
///
/// Translates a `Game` into draw calls on a [`Surface`].  No game logic runs
/// here and the game is only read; the binary decides what a sprite sheet or
/// a line looks like on its output.

use std::io;

use crate::compute::Game;
use crate::entities::{Projectile, Region};

/// Opaque sprite-sheet handles supplied by the asset loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sheet {
    Ship,
    ShipBullet,
    Martian,
    MartianBullet,
    Explosion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const GREEN: Rgb = Rgb(0, 255, 0);

/// Drawing target.  Coordinates are playfield pixels.
pub trait Surface {
    fn draw_region(&mut self, sheet: Sheet, region: Region, x: f32, y: f32) -> io::Result<()>;
    fn draw_text(&mut self, x: f32, y: f32, colour: Rgb, text: &str) -> io::Result<()>;
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, colour: Rgb) -> io::Result<()>;
}

/// Render one complete frame.
pub fn render<S: Surface>(game: &Game, surface: &mut S) -> io::Result<()> {
    draw_ship(game, surface)?;
    draw_martians(game, surface)?;
    for bullet in &game.orphan_bullets {
        draw_bullet(surface, Sheet::MartianBullet, bullet)?;
    }
    for effect in &game.effects {
        surface.draw_region(Sheet::Explosion, effect.region, effect.x, effect.y)?;
    }
    draw_score(game, surface)?;
    draw_lives(game, surface)?;
    draw_floor(game, surface)
}

fn draw_bullet<S: Surface>(surface: &mut S, sheet: Sheet, bullet: &Projectile) -> io::Result<()> {
    surface.draw_region(sheet, bullet.region(), bullet.x, bullet.y)
}

fn draw_ship<S: Surface>(game: &Game, surface: &mut S) -> io::Result<()> {
    let ship = &game.ship;
    surface.draw_region(Sheet::Ship, ship.region(), ship.x, ship.y)?;
    for bullet in &ship.bullets {
        draw_bullet(surface, Sheet::ShipBullet, bullet)?;
    }
    Ok(())
}

fn draw_martians<S: Surface>(game: &Game, surface: &mut S) -> io::Result<()> {
    for unit in &game.martians {
        surface.draw_region(Sheet::Martian, unit.region(), unit.x, unit.y)?;
        for bullet in &unit.bullets {
            draw_bullet(surface, Sheet::MartianBullet, bullet)?;
        }
    }
    Ok(())
}

// ── HUD ───────────────────────────────────────────────────────────────────────

const HUD_Y: f32 = 120.0;

fn draw_score<S: Surface>(game: &Game, surface: &mut S) -> io::Result<()> {
    let x = game.config.display.frame_width as f32;
    surface.draw_text(x + 10.0, HUD_Y, WHITE, "SCORE")?;
    surface.draw_text(x + 90.0, HUD_Y, GREEN, &game.score.to_string())
}

/// `LIVES` followed by one ship sprite per remaining life.
fn draw_lives<S: Surface>(game: &Game, surface: &mut S) -> io::Result<()> {
    let canvas_width = game.config.display.canvas_width();
    surface.draw_text(canvas_width - 180.0, HUD_Y, WHITE, "LIVES")?;

    let ship = &game.ship;
    for i in 0..ship.lives {
        let x = canvas_width - 105.0 + (i * ship.width()) as f32;
        surface.draw_region(Sheet::Ship, ship.region(), x, HUD_Y)?;
    }
    Ok(())
}

fn draw_floor<S: Surface>(game: &Game, surface: &mut S) -> io::Result<()> {
    let display = &game.config.display;
    let y = display.canvas_height();
    surface.draw_line(
        display.frame_width as f32 + 10.0,
        y,
        display.canvas_width() - 15.0,
        y,
        GREEN,
    )
}
