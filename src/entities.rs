/// Simulated actors and the geometry they share.
///
/// Entities never allocate after construction: a pool creates every slot
/// up front and afterwards only flips the `active` flag.

use glam::Vec2;
use tracing::warn;

use crate::error::{SimError, SimResult};
use crate::player::PlayerActor;
use crate::pool::HostilePool;

/// Where inactive entities are parked. Off-field, never drawn.
pub const PARKED: Vec2 = Vec2::new(-100.0, -100.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
    Up,
    Down,
    Stop,
}

impl MoveDirection {
    /// Unit step for this direction (y grows downward).
    pub fn unit(self) -> Vec2 {
        match self {
            MoveDirection::Left => Vec2::NEG_X,
            MoveDirection::Right => Vec2::X,
            MoveDirection::Up => Vec2::NEG_Y,
            MoveDirection::Down => Vec2::Y,
            MoveDirection::Stop => Vec2::ZERO,
        }
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap: boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// The rectangle entities live in, plus the slack allowed past its edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Playfield {
    /// True while a centre is strictly inside the field grown by `margin`.
    pub fn in_flight(&self, p: Vec2) -> bool {
        p.x > -self.margin
            && p.x < self.width + self.margin
            && p.y > -self.margin
            && p.y < self.height + self.margin
    }

    /// Clamp a centre so a box of `size` stays fully on the field.
    pub fn clamp_inside(&self, center: Vec2, size: Vec2) -> Vec2 {
        let half = size * 0.5;
        let lo = half;
        let hi = Vec2::new(self.width, self.height) - half;
        // A box larger than the field is pinned to its middle.
        Vec2::new(
            if lo.x <= hi.x { center.x.clamp(lo.x, hi.x) } else { self.width * 0.5 },
            if lo.y <= hi.y { center.y.clamp(lo.y, hi.y) } else { self.height * 0.5 },
        )
    }
}

// ── Capabilities ──────────────────────────────────────────────────────────────

/// Anything with a position, an extent and an on/off switch.
pub trait Entity {
    fn position(&self) -> Vec2;
    fn size(&self) -> Vec2;
    fn is_active(&self) -> bool;

    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position(), self.size())
    }

    fn intersects(&self, other: &Aabb) -> bool {
        self.bounds().intersects(other)
    }

    /// Collision between two live entities. Inactive ones never collide.
    fn overlaps(&self, other: &impl Entity) -> bool
    where
        Self: Sized,
    {
        self.is_active() && other.is_active() && self.intersects(&other.bounds())
    }
}

pub trait Movable {
    fn advance(&mut self, dt: f32, field: &Playfield);
}

/// What the renderer is told to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualTag {
    Player,
    Projectile,
    Hostile,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub position: Vec2,
    pub size: Vec2,
    pub tag: VisualTag,
}

pub trait Drawable: Entity {
    const TAG: VisualTag;

    /// `None` for inactive entities.
    fn sprite(&self) -> Option<Sprite> {
        self.is_active().then(|| Sprite {
            position: self.position(),
            size: self.size(),
            tag: Self::TAG,
        })
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

/// A player shot travelling in a straight line.
#[derive(Clone, Debug)]
pub struct Projectile {
    position: Vec2,
    size: Vec2,
    velocity: Vec2,
    active: bool,
}

impl Projectile {
    pub fn new(size: Vec2, velocity: Vec2) -> Self {
        Self {
            position: PARKED,
            size,
            velocity,
            active: false,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Launch from `origin`. Rejected, with no state change, if already in flight.
    pub fn fire(&mut self, origin: Vec2) -> SimResult<()> {
        if self.active {
            warn!(?origin, "fire on a projectile that is already in flight");
            return Err(SimError::ProjectileAlreadyActive);
        }
        self.position = origin;
        self.active = true;
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Test against every live hostile in slot order. The lowest-index hit
    /// wins: both it and this projectile are retired and `true` is returned.
    pub fn check_impact(&mut self, hostiles: &mut HostilePool) -> bool {
        if !self.active {
            return false;
        }
        match hostiles.slots_mut().iter_mut().find(|h| self.overlaps(&**h)) {
            Some(hostile) => {
                hostile.deactivate();
                self.active = false;
                true
            }
            None => false,
        }
    }
}

impl Entity for Projectile {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn size(&self) -> Vec2 {
        self.size
    }
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Movable for Projectile {
    fn advance(&mut self, dt: f32, field: &Playfield) {
        if !self.active || dt <= 0.0 {
            return;
        }
        self.position += self.velocity * dt;
        if !field.in_flight(self.position) {
            self.active = false;
        }
    }
}

impl Drawable for Projectile {
    const TAG: VisualTag = VisualTag::Projectile;
}

// ── Hostile ───────────────────────────────────────────────────────────────────

/// Result of a hostile touching (or not touching) the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    Miss,
    Hit,
    /// The hit that took the player's health to zero.
    Fatal,
}

/// An enemy drifting across the field toward the player's side.
#[derive(Clone, Debug)]
pub struct Hostile {
    position: Vec2,
    size: Vec2,
    velocity: Vec2,
    contact_damage: i32,
    active: bool,
}

impl Hostile {
    pub fn new(size: Vec2, velocity: Vec2, contact_damage: i32) -> Self {
        Self {
            position: PARKED,
            size,
            velocity,
            contact_damage,
            active: false,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn spawn_at(&mut self, position: Vec2) -> SimResult<()> {
        if self.active {
            warn!(?position, "spawn on a hostile that is already active");
            return Err(SimError::HostileAlreadyActive);
        }
        self.position = position;
        self.active = true;
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Damage the player on overlap and retire this hostile.
    pub fn check_impact(&mut self, player: &mut PlayerActor) -> Contact {
        if !self.overlaps(&*player) {
            return Contact::Miss;
        }
        self.active = false;
        if player.take_damage(self.contact_damage) {
            Contact::Fatal
        } else {
            Contact::Hit
        }
    }
}

impl Entity for Hostile {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn size(&self) -> Vec2 {
        self.size
    }
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Movable for Hostile {
    fn advance(&mut self, dt: f32, field: &Playfield) {
        if !self.active || dt <= 0.0 {
            return;
        }
        self.position += self.velocity * dt;
        if !field.in_flight(self.position) {
            self.active = false;
        }
    }
}

impl Drawable for Hostile {
    const TAG: VisualTag = VisualTag::Hostile;
}
