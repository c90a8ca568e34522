/// The player-controlled actor and the per-frame input it reacts to.

use glam::Vec2;
use tracing::{debug, info, trace};

use crate::config::SimConfig;
use crate::entities::{
    Drawable, Entity, Movable, MoveDirection, Playfield, Projectile, Sprite, VisualTag,
};
use crate::pool::HostilePool;

/// Snapshot of the controls for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Explicit halt; wins over any direction pressed the same frame.
    pub stop: bool,
    pub fire: bool,
}

impl FrameInput {
    /// The direction this frame asks for, or `None` to keep the current one.
    /// When several are held, left beats right beats up beats down.
    pub fn direction(&self) -> Option<MoveDirection> {
        if self.stop {
            Some(MoveDirection::Stop)
        } else if self.left {
            Some(MoveDirection::Left)
        } else if self.right {
            Some(MoveDirection::Right)
        } else if self.up {
            Some(MoveDirection::Up)
        } else if self.down {
            Some(MoveDirection::Down)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    Fired { slot: usize },
    CoolingDown,
    /// Every projectile is already in flight; the shot is dropped.
    PoolExhausted,
}

#[derive(Clone, Debug)]
pub struct PlayerActor {
    position: Vec2,
    size: Vec2,
    speed: f32,
    health: i32,
    move_direction: MoveDirection,
    attack_cooldown: f64,
    last_attack: Option<f64>,
    defeated: bool,
    projectiles: Box<[Projectile]>,
}

impl PlayerActor {
    pub fn new(config: &SimConfig) -> Self {
        let shot = Projectile::new(
            Vec2::from(config.projectile_size),
            Vec2::new(config.projectile_speed, 0.0),
        );
        Self {
            position: Vec2::from(config.player_start),
            size: Vec2::from(config.player_size),
            speed: config.player_speed,
            health: config.player_health,
            move_direction: MoveDirection::Stop,
            attack_cooldown: f64::from(config.attack_cooldown),
            last_attack: None,
            defeated: false,
            projectiles: vec![shot; config.projectile_capacity].into_boxed_slice(),
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn move_direction(&self) -> MoveDirection {
        self.move_direction
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn active_projectiles(&self) -> usize {
        self.projectiles.iter().filter(|p| p.is_active()).count()
    }

    /// Update the movement state. No direction this frame keeps the last one.
    pub fn apply_input(&mut self, input: &FrameInput) {
        if let Some(direction) = input.direction() {
            self.move_direction = direction;
        }
    }

    /// Fire the first idle projectile from the current position, at most once
    /// per cooldown window.
    pub fn attempt_attack(&mut self, now: f64) -> AttackOutcome {
        if let Some(last) = self.last_attack {
            if now - last < self.attack_cooldown {
                trace!(now, last, "attack still cooling down");
                return AttackOutcome::CoolingDown;
            }
        }

        let origin = self.position;
        let Some((slot, shot)) = self
            .projectiles
            .iter_mut()
            .enumerate()
            .find(|(_, p)| !p.is_active())
        else {
            trace!("projectile pool exhausted");
            return AttackOutcome::PoolExhausted;
        };
        if shot.fire(origin).is_err() {
            return AttackOutcome::PoolExhausted;
        }

        self.last_attack = Some(now);
        debug!(slot, ?origin, "projectile fired");
        AttackOutcome::Fired { slot }
    }

    /// Subtract `amount` from health, flooring at zero. Returns `true` only for
    /// the call that defeats the player; later hits return `false`.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = self.health.saturating_sub(amount.max(0)).max(0);
        if self.health > 0 || self.defeated {
            return false;
        }
        self.defeated = true;
        info!(health = self.health, "player defeated");
        true
    }

    /// Run every owned projectile against the hostile pool. Returns the
    /// number of hostiles destroyed.
    pub fn check_projectile_impacts(&mut self, hostiles: &mut HostilePool) -> u32 {
        self.projectiles
            .iter_mut()
            .map(|p| p.check_impact(hostiles))
            .filter(|&hit| hit)
            .count() as u32
    }

    /// The player followed by each projectile in flight.
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        self.sprite()
            .into_iter()
            .chain(self.projectiles.iter().filter_map(Drawable::sprite))
    }
}

impl Entity for PlayerActor {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn size(&self) -> Vec2 {
        self.size
    }
    /// The player is always on the field.
    fn is_active(&self) -> bool {
        true
    }
}

impl Movable for PlayerActor {
    /// Step along `move_direction`, then carry the projectiles forward.
    /// Reaching a wall pins the actor to it and switches to `Stop`.
    fn advance(&mut self, dt: f32, field: &Playfield) {
        if dt <= 0.0 {
            return;
        }

        if self.move_direction != MoveDirection::Stop {
            let target = self.position + self.move_direction.unit() * self.speed * dt;
            let clamped = field.clamp_inside(target, self.size);
            if clamped != target {
                self.move_direction = MoveDirection::Stop;
            }
            self.position = clamped;
        }

        for shot in self.projectiles.iter_mut() {
            shot.advance(dt, field);
        }
    }
}

impl Drawable for PlayerActor {
    const TAG: VisualTag = VisualTag::Player;
}
