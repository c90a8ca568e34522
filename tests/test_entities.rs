use glam::Vec2;
use side_shooter::config::SimConfig;
use side_shooter::entities::*;
use side_shooter::error::SimError;
use side_shooter::pool::HostilePool;

fn field() -> Playfield {
    Playfield {
        width: 800.0,
        height: 800.0,
        margin: 50.0,
    }
}

fn shot() -> Projectile {
    Projectile::new(Vec2::new(25.0, 16.0), Vec2::new(540.0, 0.0))
}

fn hostile() -> Hostile {
    Hostile::new(Vec2::splat(50.0), Vec2::new(-240.0, 0.0), 100)
}

// ── Aabb ──────────────────────────────────────────────────────────────────────

#[test]
fn aabb_overlap_is_symmetric() {
    let a = Aabb::from_center(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
    let b = Aabb::from_center(Vec2::new(6.0, 6.0), Vec2::splat(10.0));
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn aabb_touching_edges_do_not_intersect() {
    let a = Aabb::from_center(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
    let b = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
    assert!(!a.intersects(&b));
    assert!(!b.intersects(&a));
}

#[test]
fn aabb_from_center_spans_half_size() {
    let a = Aabb::from_center(Vec2::new(100.0, 50.0), Vec2::new(20.0, 10.0));
    assert_eq!(a.min, Vec2::new(90.0, 45.0));
    assert_eq!(a.max, Vec2::new(110.0, 55.0));
}

#[test]
fn playfield_clamp_keeps_box_inside() {
    let f = field();
    let c = f.clamp_inside(Vec2::new(-30.0, 900.0), Vec2::splat(50.0));
    assert_eq!(c, Vec2::new(25.0, 775.0));
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[test]
fn projectile_starts_inactive_and_undrawn() {
    let p = shot();
    assert!(!p.is_active());
    assert!(p.sprite().is_none());
}

#[test]
fn fire_activates_at_origin() {
    let mut p = shot();
    p.fire(Vec2::new(400.0, 300.0)).unwrap();
    assert!(p.is_active());
    assert_eq!(p.position(), Vec2::new(400.0, 300.0));
    let sprite = p.sprite().unwrap();
    assert_eq!(sprite.tag, VisualTag::Projectile);
}

#[test]
fn fire_on_active_projectile_is_rejected_without_change() {
    let mut p = shot();
    p.fire(Vec2::new(400.0, 300.0)).unwrap();
    let err = p.fire(Vec2::new(10.0, 10.0)).unwrap_err();
    assert!(matches!(err, SimError::ProjectileAlreadyActive));
    assert_eq!(p.position(), Vec2::new(400.0, 300.0));
    assert!(p.is_active());
}

#[test]
fn projectile_moves_by_velocity_times_dt() {
    let mut p = shot();
    let origin = Vec2::new(100.0, 300.0);
    p.fire(origin).unwrap();
    p.advance(0.5, &field());
    assert_eq!(p.position(), origin + p.velocity() * 0.5);
    assert_eq!(p.position(), Vec2::new(370.0, 300.0));
    assert!(p.is_active());
}

#[test]
fn projectile_leaving_far_edge_deactivates() {
    let mut p = shot();
    p.fire(Vec2::new(780.0, 300.0)).unwrap();
    p.advance(0.25, &field()); // 780 + 135 = 915 > 850
    assert!(!p.is_active());
}

#[test]
fn inactive_projectile_does_not_move() {
    let mut p = shot();
    let before = p.position();
    p.advance(1.0, &field());
    assert_eq!(p.position(), before);
    assert!(!p.is_active());
}

#[test]
fn zero_dt_is_idempotent() {
    let mut p = shot();
    p.fire(Vec2::new(100.0, 300.0)).unwrap();
    let mut h = hostile();
    h.spawn_at(Vec2::new(500.0, 300.0)).unwrap();
    for _ in 0..10 {
        p.advance(0.0, &field());
        h.advance(0.0, &field());
    }
    assert_eq!(p.position(), Vec2::new(100.0, 300.0));
    assert_eq!(h.position(), Vec2::new(500.0, 300.0));
    assert!(p.is_active() && h.is_active());
}

#[test]
fn projectile_hit_retires_both() {
    let mut pool = HostilePool::new(&SimConfig::default(), 1);
    pool.slots_mut()[3].spawn_at(Vec2::new(500.0, 300.0)).unwrap();

    let mut p = shot();
    p.fire(Vec2::new(490.0, 300.0)).unwrap();
    assert!(p.check_impact(&mut pool));
    assert!(!p.is_active());
    assert!(!pool.slots()[3].is_active());
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn projectile_hit_takes_lowest_slot_only() {
    let mut pool = HostilePool::new(&SimConfig::default(), 1);
    pool.slots_mut()[2].spawn_at(Vec2::new(500.0, 300.0)).unwrap();
    pool.slots_mut()[5].spawn_at(Vec2::new(505.0, 300.0)).unwrap();

    let mut p = shot();
    p.fire(Vec2::new(500.0, 300.0)).unwrap();
    assert!(p.check_impact(&mut pool));
    assert!(!pool.slots()[2].is_active());
    assert!(pool.slots()[5].is_active());
}

#[test]
fn projectile_miss_leaves_everything_alive() {
    let mut pool = HostilePool::new(&SimConfig::default(), 1);
    pool.slots_mut()[0].spawn_at(Vec2::new(500.0, 100.0)).unwrap();

    let mut p = shot();
    p.fire(Vec2::new(500.0, 300.0)).unwrap();
    assert!(!p.check_impact(&mut pool));
    assert!(p.is_active());
    assert!(pool.slots()[0].is_active());
}

#[test]
fn inactive_projectile_never_hits() {
    let mut pool = HostilePool::new(&SimConfig::default(), 1);
    // An idle projectile sits at PARKED; put a live hostile right on it.
    pool.slots_mut()[0].spawn_at(PARKED).unwrap();
    let mut p = shot();
    assert!(!p.check_impact(&mut pool));
    assert!(pool.slots()[0].is_active());
}

// ── Hostile ───────────────────────────────────────────────────────────────────

#[test]
fn spawn_on_active_hostile_is_rejected() {
    let mut h = hostile();
    h.spawn_at(Vec2::new(810.0, 200.0)).unwrap();
    let err = h.spawn_at(Vec2::new(810.0, 600.0)).unwrap_err();
    assert!(matches!(err, SimError::HostileAlreadyActive));
    assert_eq!(h.position(), Vec2::new(810.0, 200.0));
}

#[test]
fn hostile_drifts_toward_player_side() {
    let mut h = hostile();
    h.spawn_at(Vec2::new(810.0, 200.0)).unwrap();
    h.advance(0.25, &field());
    assert_eq!(h.position(), Vec2::new(750.0, 200.0));
}

#[test]
fn hostile_exiting_near_edge_deactivates() {
    let mut h = hostile();
    h.spawn_at(Vec2::new(-40.0, 200.0)).unwrap();
    h.advance(0.25, &field());
    assert!(!h.is_active());
    assert!(h.sprite().is_none());
}

#[test]
fn hostile_at_boundary_moving_outward_deactivates_in_one_step() {
    let mut h = Hostile::new(Vec2::splat(50.0), Vec2::new(240.0, 0.0), 100);
    h.spawn_at(Vec2::new(850.0, 200.0)).unwrap();
    h.advance(0.001, &field());
    assert!(!h.is_active());
}

#[test]
fn move_direction_units() {
    assert_eq!(MoveDirection::Left.unit(), Vec2::new(-1.0, 0.0));
    assert_eq!(MoveDirection::Down.unit(), Vec2::new(0.0, 1.0));
    assert_eq!(MoveDirection::Stop.unit(), Vec2::ZERO);
}
