use glam::Vec2;
use side_shooter::config::SimConfig;
use side_shooter::entities::*;
use side_shooter::player::PlayerActor;
use side_shooter::pool::*;

fn field() -> Playfield {
    Playfield {
        width: 800.0,
        height: 800.0,
        margin: 50.0,
    }
}

fn small_pool(capacity: usize) -> HostilePool {
    let config = SimConfig {
        hostile_capacity: capacity,
        ..SimConfig::default()
    };
    HostilePool::new(&config, 42)
}

#[test]
fn new_pool_is_all_idle() {
    let pool = HostilePool::new(&SimConfig::default(), 42);
    assert_eq!(pool.capacity(), 20);
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.sprites().count(), 0);
}

#[test]
fn hostiles_take_speed_from_config() {
    let config = SimConfig::for_level(Level::Hard);
    let pool = HostilePool::new(&config, 42);
    assert!(pool
        .slots()
        .iter()
        .all(|h| h.velocity() == Vec2::new(-360.0, 0.0)));
}

#[test]
fn spawn_waits_for_interval() {
    let mut pool = small_pool(5);
    assert_eq!(pool.try_spawn(0.0), SpawnOutcome::NotDue);
    assert_eq!(pool.try_spawn(0.99), SpawnOutcome::NotDue);
    assert!(matches!(pool.try_spawn(1.0), SpawnOutcome::Spawned { slot: 0, .. }));
    assert_eq!(pool.try_spawn(1.5), SpawnOutcome::NotDue);
    assert!(matches!(pool.try_spawn(2.0), SpawnOutcome::Spawned { slot: 1, .. }));
}

#[test]
fn spawn_uses_entry_edge_and_band() {
    let mut pool = small_pool(20);
    for i in 1..=20 {
        match pool.try_spawn(i as f64) {
            SpawnOutcome::Spawned { position, .. } => {
                assert_eq!(position.x, 810.0);
                assert!((100.0..=800.0).contains(&position.y));
            }
            other => panic!("expected spawn, got {:?}", other),
        }
    }
}

#[test]
fn spawned_hostile_is_live_at_reported_position() {
    let mut pool = small_pool(5);
    let SpawnOutcome::Spawned { slot, position } = pool.try_spawn(1.0) else {
        panic!("expected spawn");
    };
    let hostile = &pool.slots()[slot];
    assert!(hostile.is_active());
    assert_eq!(hostile.position(), position);
}

#[test]
fn full_pool_skips_but_resets_timer() {
    let mut pool = small_pool(3);
    for i in 1..=3 {
        assert!(matches!(pool.try_spawn(i as f64), SpawnOutcome::Spawned { .. }));
    }
    assert_eq!(pool.try_spawn(4.0), SpawnOutcome::PoolFull);
    assert_eq!(pool.active_count(), 3);

    // Free a slot; the timer restarted at 4.0 so 4.5 is still too early.
    pool.slots_mut()[1].deactivate();
    assert_eq!(pool.try_spawn(4.5), SpawnOutcome::NotDue);
    assert!(matches!(pool.try_spawn(5.0), SpawnOutcome::Spawned { slot: 1, .. }));
}

#[test]
fn active_count_never_exceeds_capacity() {
    let mut pool = small_pool(4);
    for i in 1..=50 {
        pool.try_spawn(i as f64 * 0.5);
        assert!(pool.active_count() <= pool.capacity());
    }
    assert_eq!(pool.active_count(), 4);
}

#[test]
fn same_seed_gives_same_spawns() {
    let mut a = small_pool(10);
    let mut b = small_pool(10);
    for i in 1..=10 {
        assert_eq!(a.try_spawn(i as f64), b.try_spawn(i as f64));
    }
}

#[test]
fn successive_spawns_draw_fresh_heights() {
    let mut pool = small_pool(10);
    let heights: Vec<f32> = (1..=10)
        .filter_map(|i| match pool.try_spawn(i as f64) {
            SpawnOutcome::Spawned { position, .. } => Some(position.y),
            _ => None,
        })
        .collect();
    assert_eq!(heights.len(), 10);
    assert!(heights.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn advance_all_moves_every_live_hostile() {
    let mut pool = small_pool(5);
    pool.slots_mut()[0].spawn_at(Vec2::new(700.0, 200.0)).unwrap();
    pool.slots_mut()[3].spawn_at(Vec2::new(500.0, 600.0)).unwrap();
    pool.advance_all(0.25, &field());
    assert_eq!(pool.slots()[0].position(), Vec2::new(640.0, 200.0));
    assert_eq!(pool.slots()[3].position(), Vec2::new(440.0, 600.0));
    assert_eq!(pool.slots()[1].position(), PARKED);
}

#[test]
fn hostiles_drift_off_and_free_their_slots() {
    let mut pool = small_pool(2);
    pool.slots_mut()[0].spawn_at(Vec2::new(810.0, 200.0)).unwrap();
    for _ in 0..20 {
        pool.advance_all(0.25, &field());
    }
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn contact_damages_player_and_retires_hostile() {
    let config = SimConfig {
        contact_damage: 40,
        ..SimConfig::default()
    };
    let mut pool = HostilePool::new(&config, 7);
    let mut player = PlayerActor::new(&config);
    pool.slots_mut()[0].spawn_at(Vec2::new(420.0, 400.0)).unwrap();
    pool.slots_mut()[1].spawn_at(Vec2::new(700.0, 700.0)).unwrap();

    let summary = pool.collide_with_player(&mut player);
    assert_eq!(
        summary,
        ContactSummary {
            hits: 1,
            defeated: false,
        }
    );
    assert_eq!(player.health(), 60);
    assert!(!pool.slots()[0].is_active());
    assert!(pool.slots()[1].is_active());

    // Retired hostile does not hit again.
    let summary = pool.collide_with_player(&mut player);
    assert_eq!(summary.hits, 0);
    assert_eq!(player.health(), 60);
}

#[test]
fn lethal_contact_reports_defeat() {
    let mut pool = small_pool(5);
    let mut player = PlayerActor::new(&SimConfig::default());
    pool.slots_mut()[2].spawn_at(Vec2::new(400.0, 400.0)).unwrap();

    let summary = pool.collide_with_player(&mut player);
    assert_eq!(
        summary,
        ContactSummary {
            hits: 1,
            defeated: true,
        }
    );
    assert!(player.is_defeated());
}
