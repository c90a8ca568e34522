mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use side_shooter::compute::Simulation;
use side_shooter::config::SimConfig;
use side_shooter::entities::{GameStatus, Level};
use side_shooter::player::FrameInput;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// Env var naming an optional RON file that replaces the level presets.
const CONFIG_ENV: &str = "SIDE_SHOOTER_CONFIG";

/// Space counts as held if its last press/repeat arrived within this many
/// frames. Covers terminals that never report key releases.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// The session config and the level to show in the HUD. A config file wins
/// over the menu choice, so the label is dropped.
fn load_config(level: Level) -> Result<(SimConfig, Option<Level>)> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file '{path}'"))?;
            let config = SimConfig::from_ron(&text)
                .with_context(|| format!("loading config file '{path}'"))?;
            warn!(%path, ?level, "config file overrides the selected level");
            Ok((config, None))
        }
        Err(_) => Ok((SimConfig::for_level(level), Some(level))),
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum MenuResult {
    Start(Level),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "»  SIDE  SHOOTER  «";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Easy  ", Color::Green, "Slow, sparse hostiles"),
        ("2", "Medium", Color::Yellow, "One hostile a second"),
        ("3", "Hard  ", Color::Red, "Fast and relentless!"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    Ok(wait_for_choice(rx))
}

/// Block until the user makes a choice.
fn wait_for_choice(rx: &mpsc::Receiver<Event>) -> MenuResult {
    loop {
        let code = match rx.recv() {
            Ok(Event::Key(KeyEvent { code, .. })) => code,
            Ok(_) => continue,
            // Input thread is gone; nothing can answer the menu.
            Err(_) => return MenuResult::Quit,
        };
        match code {
            KeyCode::Char('1') => return MenuResult::Start(Level::Easy),
            KeyCode::Char('2') => return MenuResult::Start(Level::Medium),
            KeyCode::Char('3') => return MenuResult::Start(Level::Hard),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return MenuResult::Quit,
            _ => {}
        }
    }
}

fn direction_key(input: &mut FrameInput, code: &KeyCode) {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => input.left = true,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => input.right = true,
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => input.up = true,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => input.down = true,
        KeyCode::Char('x') | KeyCode::Char('X') => input.stop = true,
        _ => {}
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Movement is sticky, so only the keys pressed this frame matter for it.
/// Shooting is held: Space stays live for `HOLD_WINDOW` frames after its last
/// press or repeat, or until a release event on terminals that send them.
fn game_loop<W: Write>(
    out: &mut W,
    sim: &mut Simulation,
    level: Option<Level>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut input = FrameInput::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    direction_key(&mut input, &code);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(true);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if sim.status() == GameStatus::GameOver =>
                        {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }
        input.fire = is_held(&key_frame, &KeyCode::Char(' '), frame);

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        let report = sim.tick(&input, dt);
        if report.defeated {
            info!(score = sim.stats().score, "player defeated");
        }

        let (width, height) = terminal::size()?;
        display::render(out, sim, level, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // Logs go to stderr; redirect it to keep them off the play screen.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the game loop never waits.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<()> {
    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start(level) => {
                let (config, label) = load_config(level)?;
                let mut sim = Simulation::new(config)?;
                info!(?label, "session started");
                if game_loop(out, &mut sim, label, rx)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
