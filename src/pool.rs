/// Fixed-capacity hostile pool with timer-driven spawning.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::SimConfig;
use crate::entities::{Contact, Drawable, Entity, Hostile, Movable, Playfield, Sprite};
use crate::player::PlayerActor;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnOutcome {
    Spawned { slot: usize, position: Vec2 },
    /// Less than one interval since the previous attempt.
    NotDue,
    /// Every slot is alive; the tick is skipped but the timer still resets.
    PoolFull,
}

/// Tally of one hostile-vs-player pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactSummary {
    pub hits: u32,
    /// The pass raised the defeat signal.
    pub defeated: bool,
}

#[derive(Clone, Debug)]
pub struct HostilePool {
    slots: Box<[Hostile]>,
    last_spawn: f64,
    spawn_interval: f64,
    spawn_x: f32,
    spawn_band: (f32, f32),
    /// Seeded once here; never reseeded per spawn.
    rng: StdRng,
}

impl HostilePool {
    pub fn new(config: &SimConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: &SimConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    fn with_rng(config: &SimConfig, rng: StdRng) -> Self {
        let template = Hostile::new(
            Vec2::from(config.hostile_size),
            Vec2::new(config.hostile_speed, 0.0),
            config.contact_damage,
        );
        Self {
            slots: vec![template; config.hostile_capacity].into_boxed_slice(),
            last_spawn: 0.0,
            spawn_interval: f64::from(config.spawn_interval),
            spawn_x: config.spawn_x,
            spawn_band: config.spawn_band,
            rng,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Hostile] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Hostile] {
        &mut self.slots
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|h| h.is_active()).count()
    }

    /// Activate the first idle slot if a full interval has passed since the
    /// last attempt. Requests are rate-limited, never queued.
    pub fn try_spawn(&mut self, now: f64) -> SpawnOutcome {
        if now - self.last_spawn < self.spawn_interval {
            return SpawnOutcome::NotDue;
        }
        self.last_spawn = now;

        let Some(slot) = self.slots.iter().position(|h| !h.is_active()) else {
            trace!(now, "hostile pool full, spawn skipped");
            return SpawnOutcome::PoolFull;
        };

        let (lo, hi) = self.spawn_band;
        let position = Vec2::new(self.spawn_x, self.rng.gen_range(lo..=hi));
        if self.slots[slot].spawn_at(position).is_err() {
            return SpawnOutcome::PoolFull;
        }
        debug!(slot, ?position, "hostile spawned");
        SpawnOutcome::Spawned { slot, position }
    }

    pub fn advance_all(&mut self, dt: f32, field: &Playfield) {
        for hostile in self.slots.iter_mut() {
            hostile.advance(dt, field);
        }
    }

    pub fn collide_with_player(&mut self, player: &mut PlayerActor) -> ContactSummary {
        let mut summary = ContactSummary::default();
        for hostile in self.slots.iter_mut() {
            match hostile.check_impact(player) {
                Contact::Miss => {}
                Contact::Hit => summary.hits += 1,
                Contact::Fatal => {
                    summary.hits += 1;
                    summary.defeated = true;
                }
            }
        }
        summary
    }

    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        self.slots.iter().filter_map(Drawable::sprite)
    }
}
