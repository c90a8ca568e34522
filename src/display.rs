/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// simulation. No game logic is performed; this module only maps field
/// coordinates onto terminal cells and prints sprites.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;
use side_shooter::compute::Simulation;
use side_shooter::entities::{GameStatus, Level, Sprite, VisualTag};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_PLAYER: Color = Color::Green;
const C_HOSTILE: Color = Color::Blue;
const C_PROJECTILE: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

// ── Field → terminal mapping ──────────────────────────────────────────────────

/// Play area inside the border: columns 1..width-1, rows 2..height-2.
struct Viewport {
    cols: u16,
    rows: u16,
    scale: Vec2,
}

impl Viewport {
    fn new(sim: &Simulation, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2).max(1);
        let rows = height.saturating_sub(4).max(1);
        let field = sim.field();
        Self {
            cols,
            rows,
            scale: Vec2::new(cols as f32 / field.width, rows as f32 / field.height),
        }
    }

    /// Terminal cell for a field position, or `None` when it is off the board.
    fn cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        let p = pos * self.scale;
        if p.x < 0.0 || p.y < 0.0 || p.x >= self.cols as f32 || p.y >= self.rows as f32 {
            return None;
        }
        Some((p.x as u16 + 1, p.y as u16 + 2))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame. `level` is `None` when a config file replaced
/// the presets.
pub fn render<W: Write>(
    out: &mut W,
    sim: &Simulation,
    level: Option<Level>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let view = Viewport::new(sim, width, height);
    draw_border(out, width, height)?;
    draw_hud(out, sim, level, width)?;

    for sprite in sim.sprites() {
        draw_sprite(out, &view, &sprite)?;
    }

    draw_controls_hint(out, height)?;

    if sim.status() == GameStatus::GameOver {
        draw_game_over(out, sim, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let inner = "─".repeat(width.saturating_sub(2) as usize);

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", inner)))?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", inner)))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

/// HUD tag for the session; custom configs get a neutral one.
pub fn level_label(level: Option<Level>) -> (&'static str, Color) {
    match level {
        Some(Level::Easy) => ("[ EASY ]", Color::Green),
        Some(Level::Medium) => ("[ MEDIUM ]", Color::Yellow),
        Some(Level::Hard) => ("[ HARD ]", Color::Red),
        None => ("[ CUSTOM ]", Color::White),
    }
}

fn draw_hud<W: Write>(
    out: &mut W,
    sim: &Simulation,
    level: Option<Level>,
    width: u16,
) -> std::io::Result<()> {
    let stats = sim.stats();
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>6}  Shots:{:>4}",
        stats.score, stats.shots_fired
    )))?;

    let (level_str, level_color) = level_label(level);
    let lx = (width / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(level_color))?;
    out.queue(Print(level_str))?;

    let health = format!("HP:{:>4}", sim.player().health());
    let rx = width.saturating_sub(health.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_sprite<W: Write>(out: &mut W, view: &Viewport, sprite: &Sprite) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(sprite.position) else {
        return Ok(());
    };
    let (glyph, color) = match sprite.tag {
        VisualTag::Player => ("[■]", C_PLAYER),
        VisualTag::Hostile => ("<◆>", C_HOSTILE),
        VisualTag::Projectile => ("─", C_PROJECTILE),
    };
    // Three-wide glyphs are centred on the cell.
    let lx = if glyph.chars().count() > 1 {
        col.saturating_sub(1).max(1)
    } else {
        col
    };
    out.queue(cursor::MoveTo(lx, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("←↑→↓ / WASD : Move   X : Stop   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    sim: &Simulation,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", sim.stats().score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
