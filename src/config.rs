//! Tuning values for a simulation session.
//!
//! Defaults describe the classic side-scroller: an 800×800 field, one
//! hostile per second entering from the right, four shots per second.

use serde::{Deserialize, Serialize};

use crate::entities::Level;
use crate::error::{SimError, SimResult};

/// Size of a full-size actor (player, hostile) in field units.
pub const ACTOR_SIZE: f32 = 50.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ── Playfield ───────────────────────────────────────────────────────────
    pub field_width: f32,
    pub field_height: f32,
    /// How far past an edge an entity may drift before it is retired.
    pub exit_margin: f32,

    // ── Hostiles ────────────────────────────────────────────────────────────
    pub hostile_capacity: usize,
    pub hostile_size: (f32, f32),
    /// Horizontal speed in units/sec; negative moves toward the player side.
    pub hostile_speed: f32,
    pub contact_damage: i32,
    /// Seconds between spawn attempts.
    pub spawn_interval: f32,
    /// Horizontal entry edge for new hostiles.
    pub spawn_x: f32,
    /// Inclusive vertical band new hostiles are drawn from.
    pub spawn_band: (f32, f32),

    // ── Player ──────────────────────────────────────────────────────────────
    pub player_start: (f32, f32),
    pub player_size: (f32, f32),
    pub player_speed: f32,
    pub player_health: i32,
    /// Minimum seconds between two shots.
    pub attack_cooldown: f32,

    // ── Projectiles ─────────────────────────────────────────────────────────
    pub projectile_capacity: usize,
    pub projectile_size: (f32, f32),
    pub projectile_speed: f32,

    pub score_per_kill: u32,

    /// Longest simulated slice in seconds; longer frames are split.
    pub max_step: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 800.0,
            exit_margin: 50.0,

            hostile_capacity: 20,
            hostile_size: (ACTOR_SIZE, ACTOR_SIZE),
            hostile_speed: -240.0,
            contact_damage: 100,
            spawn_interval: 1.0,
            spawn_x: 810.0,
            spawn_band: (100.0, 800.0),

            player_start: (400.0, 400.0),
            player_size: (ACTOR_SIZE, ACTOR_SIZE),
            player_speed: 300.0,
            player_health: 100,
            attack_cooldown: 0.25,

            projectile_capacity: 20,
            projectile_size: (ACTOR_SIZE / 2.0, ACTOR_SIZE / 3.0),
            projectile_speed: 540.0,

            score_per_kill: 100,

            max_step: 1.0 / 32.0,
        }
    }
}

// ── Difficulty tables ────────────────────────────────────────────────────────

fn spawn_interval_for(level: &Level) -> f32 {
    match level {
        Level::Easy => 1.5,
        Level::Medium => 1.0,
        Level::Hard => 0.5,
    }
}

fn hostile_speed_for(level: &Level) -> f32 {
    match level {
        Level::Easy => -160.0,
        Level::Medium => -240.0,
        Level::Hard => -360.0,
    }
}

impl SimConfig {
    /// Preset for a difficulty level. `Medium` is the default tuning.
    pub fn for_level(level: Level) -> Self {
        Self {
            spawn_interval: spawn_interval_for(&level),
            hostile_speed: hostile_speed_for(&level),
            ..Self::default()
        }
    }

    /// Parse a RON document. Omitted fields keep their defaults.
    pub fn from_ron(text: &str) -> SimResult<Self> {
        let config: SimConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        fn finite(name: &str, value: f32) -> SimResult<()> {
            if value.is_finite() {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!("{name} must be finite, got {value}")))
            }
        }
        fn non_negative(name: &str, value: f32) -> SimResult<()> {
            finite(name, value)?;
            if value >= 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!("{name} must not be negative, got {value}")))
            }
        }
        fn positive(name: &str, value: f32) -> SimResult<()> {
            finite(name, value)?;
            if value > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!("{name} must be positive, got {value}")))
            }
        }

        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        non_negative("exit_margin", self.exit_margin)?;

        positive("hostile_size.0", self.hostile_size.0)?;
        positive("hostile_size.1", self.hostile_size.1)?;
        finite("hostile_speed", self.hostile_speed)?;
        positive("spawn_interval", self.spawn_interval)?;
        finite("spawn_x", self.spawn_x)?;
        finite("spawn_band.0", self.spawn_band.0)?;
        finite("spawn_band.1", self.spawn_band.1)?;

        finite("player_start.0", self.player_start.0)?;
        finite("player_start.1", self.player_start.1)?;
        positive("player_size.0", self.player_size.0)?;
        positive("player_size.1", self.player_size.1)?;
        non_negative("player_speed", self.player_speed)?;
        non_negative("attack_cooldown", self.attack_cooldown)?;

        positive("projectile_size.0", self.projectile_size.0)?;
        positive("projectile_size.1", self.projectile_size.1)?;
        finite("projectile_speed", self.projectile_speed)?;

        positive("max_step", self.max_step)?;

        if self.hostile_capacity == 0 || self.projectile_capacity == 0 {
            return Err(SimError::InvalidConfig("pool capacities must be at least 1".into()));
        }
        if self.spawn_band.0 > self.spawn_band.1 {
            return Err(SimError::InvalidConfig(format!(
                "spawn_band is reversed: {:?}",
                self.spawn_band
            )));
        }
        if self.player_health <= 0 {
            return Err(SimError::InvalidConfig("player_health must be positive".into()));
        }
        Ok(())
    }
}
