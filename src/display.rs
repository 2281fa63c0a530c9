//! Rendering layer: all terminal output lives here.
//!
//! The logical playfield is scaled into the terminal inside a border.  Only
//! entities that are visible and overlap the playfield are drawn, so
//! destroyed enemies and spent bullets never show up on screen.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use invaders::entities::{Entity, Scene};
use invaders::game_loop::RenderSink;
use invaders::swarm::SweepDirection;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_SHIP: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Playfield interior starts at this terminal row (HUD, then top border).
const TOP: u16 = 2;
const LEFT: u16 = 1;

pub struct TerminalSink<W: Write> {
    out: W,
    playfield_width: f32,
    playfield_height: f32,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, playfield_width: f32, playfield_height: f32) -> Self {
        Self {
            out,
            playfield_width,
            playfield_height,
        }
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    type Error = io::Error;

    fn draw(&mut self, scene: &Scene<'_>) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let grid = CellGrid::new(width, height, self.playfield_width, self.playfield_height);

        let out = &mut self.out;
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        draw_border(out, &grid)?;
        draw_hud(out, scene)?;

        for enemy in scene.enemies.iter().flatten() {
            draw_entity(out, enemy, &grid, C_ENEMY, '█')?;
        }
        for bullet in scene.bullets.iter() {
            draw_entity(out, bullet, &grid, C_BULLET, '║')?;
        }
        draw_entity(out, scene.ship, &grid, C_SHIP, '▲')?;

        out.queue(cursor::MoveTo(LEFT, height.saturating_sub(1)))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print("← → : Move   SPACE : Shoot   ESC / Q : Quit"))?;

        out.queue(style::ResetColor)?;
        out.flush()
    }
}

/// Terminal cells available to the playfield and the logical → cell scale.
struct CellGrid {
    cols: u16,
    rows: u16,
    playfield_width: f32,
    playfield_height: f32,
}

impl CellGrid {
    fn new(width: u16, height: u16, playfield_width: f32, playfield_height: f32) -> Self {
        Self {
            cols: width.saturating_sub(LEFT * 2),
            rows: height.saturating_sub(TOP + 2),
            playfield_width,
            playfield_height,
        }
    }

    fn scale_x(&self) -> f32 {
        f32::from(self.cols) / self.playfield_width
    }

    fn scale_y(&self) -> f32 {
        f32::from(self.rows) / self.playfield_height
    }

    /// Cell span `[start, end)` covered by a logical interval, clipped.
    fn span(start: f32, len: f32, scale: f32, cells: u16) -> (u16, u16) {
        let first = (start * scale).floor().max(0.0);
        let last = ((start + len) * scale).ceil().max(first + 1.0);
        let clip = f32::from(cells);
        (first.min(clip) as u16, last.min(clip) as u16)
    }
}

// ── Border & HUD ──────────────────────────────────────────────────────────────

/// Frame hugging the playfield cells, one cell outside on every side.
fn draw_border<W: Write>(out: &mut W, grid: &CellGrid) -> io::Result<()> {
    let (left, right) = (LEFT - 1, LEFT + grid.cols);
    let (top, bottom) = (TOP - 1, TOP + grid.rows);
    let rule = "─".repeat(usize::from(grid.cols));

    out.queue(style::SetForegroundColor(C_BORDER))?;
    for (row, open, close) in [(top, '┌', '┐'), (bottom, '└', '┘')] {
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(Print(format!("{open}{rule}{close}")))?;
    }
    for row in TOP..bottom {
        for col in [left, right] {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print('│'))?;
        }
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, scene: &Scene<'_>) -> io::Result<()> {
    let remaining = scene.enemies.iter().flatten().filter(|e| e.visible).count();
    let arrow = match scene.swarm.direction() {
        SweepDirection::Left => '←',
        SweepDirection::Right => '→',
    };
    out.queue(cursor::MoveTo(LEFT, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Enemies:{remaining:>3}   Sweep: {arrow} {:.2}",
        scene.swarm.speed()
    )))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_entity<W: Write>(
    out: &mut W,
    entity: &Entity,
    grid: &CellGrid,
    color: Color,
    glyph: char,
) -> io::Result<()> {
    if !entity.visible || !entity.on_playfield(grid.playfield_width, grid.playfield_height) {
        return Ok(());
    }
    let size = entity.size();
    let (x0, x1) = CellGrid::span(entity.position.x, size.w, grid.scale_x(), grid.cols);
    let (y0, y1) = CellGrid::span(entity.position.y, size.h, grid.scale_y(), grid.rows);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let row_text: String = std::iter::repeat(glyph).take(usize::from(x1 - x0)).collect();
    out.queue(style::SetForegroundColor(color))?;
    for row in y0..y1 {
        out.queue(cursor::MoveTo(LEFT + x0, TOP + row))?;
        out.queue(Print(&row_text))?;
    }
    Ok(())
}
