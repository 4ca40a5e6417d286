/// Terminal rendering: all terminal I/O for the playfield lives here.
///
/// `TerminalSurface` implements the library's `Surface` by scaling playfield
/// pixels onto terminal cells and picking a glyph per sprite sheet.  The
/// border, controls hint and end-of-game overlay are terminal-only chrome
/// drawn around the library's render pass.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use space_invaders::entities::Region;
use space_invaders::render::{self, Rgb, Sheet, Surface};
use space_invaders::{Game, Level, Outcome};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_SHIP: Color = Color::White;
const C_SHIP_BULLET: Color = Color::Cyan;
const C_MARTIAN_TOP: Color = Color::Magenta;
const C_MARTIAN_MID: Color = Color::Green;
const C_MARTIAN_LOW: Color = Color::Yellow;
const C_MARTIAN_BULLET: Color = Color::Red;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

// ── Surface ───────────────────────────────────────────────────────────────────

pub struct TerminalSurface<'a, W: Write> {
    out: &'a mut W,
    cols: u16,
    rows: u16,
    width_px: f32,
    height_px: f32,
}

impl<'a, W: Write> TerminalSurface<'a, W> {
    /// Map a `width_px`×`height_px` playfield onto rows 1..rows-1 of a
    /// `cols`×`rows` terminal (row 0 and the last row are chrome).
    pub fn new(out: &'a mut W, cols: u16, rows: u16, width_px: f32, height_px: f32) -> Self {
        Self {
            out,
            cols,
            rows,
            width_px,
            height_px,
        }
    }

    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let inner_cols = self.cols.saturating_sub(2) as f32;
        let inner_rows = self.rows.saturating_sub(3) as f32;
        if x < 0.0 || y < 0.0 || x >= self.width_px || y >= self.height_px {
            return None;
        }
        let col = 1 + (x / self.width_px * inner_cols) as u16;
        let row = 1 + (y / self.height_px * inner_rows) as u16;
        Some((col, row))
    }

    fn put(&mut self, x: f32, y: f32, colour: Color, glyph: &str) -> io::Result<()> {
        if let Some((col, row)) = self.cell(x, y) {
            self.out.queue(cursor::MoveTo(col, row))?;
            self.out.queue(style::SetForegroundColor(colour))?;
            self.out.queue(Print(glyph))?;
        }
        Ok(())
    }
}

/// Glyph and colour for one tile of a sheet.  Rows of the martian sheet are
/// the three point classes; column 1 is the second animation frame.
fn glyph(sheet: Sheet, region: Region) -> (&'static str, Color) {
    let frame = region.x / region.w.max(1);
    let kind = region.y / region.h.max(1);
    match sheet {
        Sheet::Ship => ("/▲\\", C_SHIP),
        Sheet::ShipBullet => ("║", C_SHIP_BULLET),
        Sheet::Martian => match (kind, frame) {
            (0, 0) => ("«▼»", C_MARTIAN_TOP),
            (0, _) => ("»▼«", C_MARTIAN_TOP),
            (1, 0) => ("(◎)", C_MARTIAN_MID),
            (1, _) => (")◎(", C_MARTIAN_MID),
            (_, 0) => ("╚═╝", C_MARTIAN_LOW),
            (_, _) => ("╔═╗", C_MARTIAN_LOW),
        },
        Sheet::MartianBullet if frame == 0 => ("↓", C_MARTIAN_BULLET),
        Sheet::MartianBullet => ("⇣", C_MARTIAN_BULLET),
        Sheet::Explosion => ("✶✶", C_EXPLOSION),
    }
}

impl<W: Write> Surface for TerminalSurface<'_, W> {
    fn draw_region(&mut self, sheet: Sheet, region: Region, x: f32, y: f32) -> io::Result<()> {
        let (glyph, colour) = glyph(sheet, region);
        self.put(x, y, colour, glyph)
    }

    fn draw_text(&mut self, x: f32, y: f32, colour: Rgb, text: &str) -> io::Result<()> {
        let Rgb(r, g, b) = colour;
        self.put(x, y, Color::Rgb { r, g, b }, text)
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, colour: Rgb) -> io::Result<()> {
        let (Some((c1, r1)), Some((c2, _))) = (self.cell(x1, y1), self.cell(x2, y2)) else {
            return Ok(());
        };
        let Rgb(r, g, b) = colour;
        self.out.queue(cursor::MoveTo(c1.min(c2), r1))?;
        self.out.queue(style::SetForegroundColor(Color::Rgb { r, g, b }))?;
        self.out
            .queue(Print("─".repeat((c1.abs_diff(c2) + 1) as usize)))?;
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render_frame<W: Write>(out: &mut W, game: &Game, level: Level) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, cols, rows)?;
    draw_level(out, cols, level)?;

    let display = &game.config.display;
    let mut surface = TerminalSurface::new(
        out,
        cols,
        rows,
        display.width as f32,
        display.height as f32,
    );
    render::render(game, &mut surface)?;

    draw_controls_hint(out, rows)?;
    if game.outcome() != Outcome::Playing {
        draw_game_over(out, game, cols, rows)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

/// Frame around the playfield; the last row is left for the controls hint.
fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> io::Result<()> {
    let bottom = rows.saturating_sub(2);
    let rule = "─".repeat(cols.saturating_sub(2) as usize);

    out.queue(style::SetForegroundColor(C_BORDER))?;
    for (row, left, right) in [(0, '┌', '┐'), (bottom, '└', '┘')] {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print(format!("{left}{rule}{right}")))?;
    }
    for row in 1..bottom {
        for col in [0, cols.saturating_sub(1)] {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print('│'))?;
        }
    }
    Ok(())
}

fn draw_level<W: Write>(out: &mut W, cols: u16, level: Level) -> io::Result<()> {
    let label = format!("[ {} ]", level.as_str().to_uppercase());
    centered(out, cols, 0, level_colour(level), &label)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   ESC / Q : Quit"))?;
    Ok(())
}

// ── Menu & overlay ──────────────────────────────────────────────────────────

fn centered<W: Write>(out: &mut W, cols: u16, row: u16, colour: Color, text: &str) -> io::Result<()> {
    let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(colour))?;
    out.queue(Print(text))?;
    Ok(())
}

fn level_colour(level: Level) -> Color {
    match level {
        Level::Easy => Color::Green,
        Level::Medium => Color::Yellow,
        Level::Hard => Color::Red,
    }
}

/// Level picker with the point table of the three martian kinds.
pub fn draw_menu<W: Write>(out: &mut W) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let top = (rows / 2).saturating_sub(7);
    centered(out, cols, top, Color::Cyan, "*  SPACE  INVADERS  *")?;
    centered(out, cols, top + 3, Color::White, "Choose a level")?;

    let levels = [
        (Level::Easy, "slow march, sparse fire"),
        (Level::Medium, "arcade cadence"),
        (Level::Hard, "fast march, heavy fire"),
    ];
    for (i, (level, blurb)) in levels.into_iter().enumerate() {
        let line = format!("[{}] {:<6}  {:<24}", i + 1, level.as_str(), blurb);
        centered(out, cols, top + 5 + i as u16, level_colour(level), &line)?;
    }

    let kinds = [
        (Region::tile(0, 0, 1, 1), 30),
        (Region::tile(0, 1, 1, 1), 20),
        (Region::tile(0, 2, 1, 1), 10),
    ];
    for (i, (region, points)) in kinds.into_iter().enumerate() {
        let (sprite, colour) = glyph(Sheet::Martian, region);
        let line = format!("{sprite} = {points:>2} pts");
        centered(out, cols, top + 10 + i as u16, colour, &line)?;
    }

    centered(out, cols, top + 14, C_HINT, "Q / ESC : Quit")?;
    out.queue(style::ResetColor)?;
    out.flush()
}

fn draw_game_over<W: Write>(out: &mut W, game: &Game, cols: u16, rows: u16) -> io::Result<()> {
    let (title, colour) = match game.outcome() {
        Outcome::Cleared => ("SECTOR CLEARED", Color::Green),
        Outcome::Invaded => ("INVADED", Color::Red),
        _ => ("GAME OVER", Color::Red),
    };
    let bar = "═".repeat(22);
    let row = (rows / 2).saturating_sub(3);

    centered(out, cols, row, colour, &format!("╔{bar}╗"))?;
    centered(out, cols, row + 1, colour, &format!("║{title:^22}║"))?;
    centered(out, cols, row + 2, colour, &format!("╚{bar}╝"))?;
    centered(
        out,
        cols,
        row + 3,
        Color::Yellow,
        &format!("Score {}  ·  {} destroyed", game.score, game.destroyed),
    )?;
    centered(out, cols, row + 4, Color::White, "R : Play again   Q : Quit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playfield_corners_map_inside_the_border() {
        let mut sink = Vec::new();
        let surface = TerminalSurface::new(&mut sink, 82, 43, 600.0, 600.0);
        assert_eq!(surface.cell(0.0, 0.0), Some((1, 1)));
        assert_eq!(surface.cell(599.0, 599.0), Some((80, 40)));
        assert_eq!(surface.cell(600.0, 10.0), None);
        assert_eq!(surface.cell(-1.0, 10.0), None);
    }

    #[test]
    fn martian_glyph_follows_kind_and_frame() {
        let top = Region::tile(0, 0, 25, 20);
        let low_alt = Region::tile(1, 2, 25, 20);
        assert_eq!(glyph(Sheet::Martian, top).0, "«▼»");
        assert_eq!(glyph(Sheet::Martian, low_alt).0, "╔═╗");
    }
}
