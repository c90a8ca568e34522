/// Per-frame orchestration.
///
/// `Simulation` owns the player, the hostile pool and the clock. Nothing
/// else mutates them: one `tick` call runs every sub-step in a fixed order
/// and reports what happened.

use tracing::{debug, info};

use crate::config::SimConfig;
use crate::entities::{GameStatus, Level, Movable, Playfield, Sprite};
use crate::error::SimResult;
use crate::player::{AttackOutcome, FrameInput, PlayerActor};
use crate::pool::{HostilePool, SpawnOutcome};

/// Upper bound on sub-steps per tick; longer frames lose the excess time.
pub const MAX_SUBSTEPS: u32 = 1024;

/// What a single tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub fired: bool,
    pub spawned: bool,
    /// Hostiles that reached the player this tick.
    pub contacts: u32,
    /// Hostiles shot down this tick.
    pub hostiles_destroyed: u32,
    /// Set on exactly one tick: the one where the player fell.
    pub defeated: bool,
}

/// Running totals over a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    pub score: u32,
    pub hostiles_destroyed: u32,
    pub hostiles_spawned: u32,
    pub shots_fired: u32,
    pub contacts: u32,
}

#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    field: Playfield,
    player: PlayerActor,
    hostiles: HostilePool,
    elapsed: f64,
    status: GameStatus,
    stats: SimStats,
}

impl Simulation {
    /// Validate `config` and seed the spawner once from entropy.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let hostiles = HostilePool::from_entropy(&config);
        Ok(Self::assemble(config, hostiles))
    }

    /// Same as [`Simulation::new`] but with a fixed spawn seed.
    pub fn with_seed(config: SimConfig, seed: u64) -> SimResult<Self> {
        config.validate()?;
        let hostiles = HostilePool::new(&config, seed);
        Ok(Self::assemble(config, hostiles))
    }

    pub fn for_level(level: Level) -> SimResult<Self> {
        Self::new(SimConfig::for_level(level))
    }

    fn assemble(config: SimConfig, hostiles: HostilePool) -> Self {
        let field = Playfield {
            width: config.field_width,
            height: config.field_height,
            margin: config.exit_margin,
        };
        Self {
            player: PlayerActor::new(&config),
            hostiles,
            field,
            config,
            elapsed: 0.0,
            status: GameStatus::Playing,
            stats: SimStats::default(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn field(&self) -> &Playfield {
        &self.field
    }

    pub fn player(&self) -> &PlayerActor {
        &self.player
    }

    pub fn hostiles(&self) -> &HostilePool {
        &self.hostiles
    }

    /// Simulation clock in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Advance the world by `dt` seconds.
    ///
    /// Input is applied once, then `dt` is cut into sub-steps no longer than
    /// `max_step` so a fast shot cannot jump over a hostile. Each sub-step runs:
    /// player (with its shots), hostiles, spawn, hostile-vs-player,
    /// shots-vs-hostiles. Spawning after movement keeps a fresh hostile from
    /// moving twice; collisions see the settled positions.
    ///
    /// Frames longer than `MAX_SUBSTEPS` steps are truncated. Once the game is
    /// over this does nothing.
    pub fn tick(&mut self, input: &FrameInput, dt: f32) -> TickReport {
        let mut report = TickReport::default();
        if self.status == GameStatus::GameOver {
            return report;
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let steps = ((dt / self.config.max_step).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let step = (dt / steps as f32).min(self.config.max_step);
        if dt > self.config.max_step * MAX_SUBSTEPS as f32 {
            debug!(dt, "long frame truncated");
        }

        // ── 1. Input ─────────────────────────────────────────────────────────
        self.player.apply_input(input);

        for i in 0..steps {
            self.elapsed += f64::from(step);
            let now = self.elapsed;

            if i == 0 && input.fire {
                if let AttackOutcome::Fired { .. } = self.player.attempt_attack(now) {
                    report.fired = true;
                    self.stats.shots_fired += 1;
                }
            }

            self.step(step, now, &mut report);
            if report.defeated {
                break;
            }
        }

        report
    }

    fn step(&mut self, dt: f32, now: f64, report: &mut TickReport) {
        // ── 2–3. Movement ────────────────────────────────────────────────────
        self.player.advance(dt, &self.field);
        self.hostiles.advance_all(dt, &self.field);

        // ── 4. Spawn ─────────────────────────────────────────────────────────
        if let SpawnOutcome::Spawned { .. } = self.hostiles.try_spawn(now) {
            report.spawned = true;
            self.stats.hostiles_spawned += 1;
        }

        // ── 5. Hostiles ↔ player ─────────────────────────────────────────────
        let contact = self.hostiles.collide_with_player(&mut self.player);
        report.contacts += contact.hits;
        self.stats.contacts += contact.hits;

        // ── 6. Projectiles ↔ hostiles ────────────────────────────────────────
        let destroyed = self.player.check_projectile_impacts(&mut self.hostiles);
        report.hostiles_destroyed += destroyed;
        self.stats.hostiles_destroyed += destroyed;
        self.stats.score += destroyed * self.config.score_per_kill;

        if contact.defeated {
            report.defeated = true;
            self.status = GameStatus::GameOver;
            info!(elapsed = now, score = self.stats.score, "session over");
        }
    }

    /// Everything the renderer should draw this frame. Inactive entities are
    /// left out.
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        self.player.sprites().chain(self.hostiles.sprites())
    }
}
