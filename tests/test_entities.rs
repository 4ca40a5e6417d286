use space_invaders::config::{BulletConfig, EffectConfig, GameConfig, ShipConfig};
use space_invaders::entities::*;

fn bullet(x: f32, y: f32, direction: Direction) -> Projectile {
    Projectile::new(x, y, direction, 6, 12)
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[test]
fn projectile_moves_vertically_only() {
    let mut up = bullet(10.0, 100.0, Direction::Up);
    up.move_by(15.0);
    assert_eq!((up.x, up.y), (10.0, 85.0));

    let mut down = bullet(10.0, 100.0, Direction::Down);
    down.move_by(5.0);
    assert_eq!((down.x, down.y), (10.0, 105.0));

    let mut sideways = bullet(10.0, 100.0, Direction::Left);
    sideways.move_by(5.0);
    assert_eq!((sideways.x, sideways.y), (10.0, 100.0));
}

#[test]
fn bullet_overlapping_martian_box_collides() {
    let shot = bullet(100.0, 100.0, Direction::Up);
    assert!(shot.collides_with(&Rect::new(98.0, 105.0, 25.0, 20.0)));
}

#[test]
fn collision_is_symmetric() {
    let a = Rect::new(100.0, 100.0, 6.0, 12.0);
    let cases = [
        Rect::new(98.0, 105.0, 25.0, 20.0),
        Rect::new(103.0, 90.0, 2.0, 40.0),
        Rect::new(200.0, 200.0, 5.0, 5.0),
        Rect::new(106.0, 100.0, 5.0, 5.0),
    ];
    for b in cases {
        assert_eq!(a.overlaps(&b), b.overlaps(&a), "{b:?}");
    }
}

#[test]
fn touching_edges_do_not_collide() {
    let a = Rect::new(100.0, 100.0, 6.0, 12.0);
    // Right edge of a == left edge of b.
    assert!(!a.overlaps(&Rect::new(106.0, 100.0, 10.0, 10.0)));
    // Bottom edge of a == top edge of b.
    assert!(!a.overlaps(&Rect::new(100.0, 112.0, 10.0, 10.0)));
    // Zero-width box sitting inside a.
    assert!(!Rect::new(103.0, 100.0, 0.0, 12.0).overlaps(&Rect::new(103.0, 100.0, 0.0, 12.0)));
}

#[test]
fn projectile_region_selects_tile() {
    let mut shot = bullet(0.0, 0.0, Direction::Down);
    assert_eq!(shot.region(), Region { x: 0, y: 0, w: 6, h: 12 });
    shot.toggle_frame();
    assert_eq!(shot.region(), Region { x: 6, y: 0, w: 6, h: 12 });
    shot.toggle_frame();
    assert_eq!(shot.frame_x, 0);
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[test]
fn ship_shoots_upward_from_nose() {
    let mut ship = Ship::new(&ShipConfig::default());
    ship.shoot(&BulletConfig::default()).unwrap();

    let shot = ship.bullets.get_at(0).unwrap();
    assert_eq!((shot.x, shot.y), (312.0, 510.0));
    assert_eq!(shot.direction, Direction::Up);
    assert_eq!((shot.width(), shot.height()), (6, 12));
}

#[test]
fn ship_shoot_with_full_pool_is_silent_no_op() {
    let cfg = ShipConfig {
        bullet_capacity: 2,
        ..ShipConfig::default()
    };
    let mut ship = Ship::new(&cfg);
    let bullets = BulletConfig::default();
    for _ in 0..5 {
        assert!(ship.shoot(&bullets).is_ok());
    }
    assert_eq!(ship.bullets.len(), 2);
}

#[test]
fn ship_moves_along_facing() {
    let mut ship = Ship::new(&ShipConfig::default());
    ship.facing = Direction::Right;
    ship.move_by(6.0);
    assert_eq!(ship.x, 306.0);

    ship.facing = Direction::Left;
    ship.move_by(6.0);
    ship.move_by(6.0);
    assert_eq!(ship.x, 294.0);
}

#[test]
fn ship_with_vertical_facing_does_not_move_and_resets() {
    let mut ship = Ship::new(&ShipConfig::default());
    ship.facing = Direction::Up;
    ship.move_by(6.0);
    assert_eq!((ship.x, ship.y), (300.0, 510.0));
    assert_eq!(ship.facing, Direction::None);
}

#[test]
fn ship_bullets_past_top_limit_are_destroyed() {
    let mut ship = Ship::new(&ShipConfig::default());
    ship.bullets.append(bullet(10.0, 124.0, Direction::Up)).unwrap();
    ship.bullets.append(bullet(10.0, 126.0, Direction::Up)).unwrap();

    // 124 - 15 = 109 is not above the 110 limit; 126 - 15 = 111 is.
    ship.move_bullets(15.0, 110.0);
    assert_eq!(ship.bullets.len(), 1);
    assert_eq!(ship.bullets.get_at(0).unwrap().y, 111.0);
}

#[test]
fn decrease_life_clamps_at_zero() {
    let mut ship = Ship::new(&ShipConfig::default());
    ship.decrease_life(1);
    assert_eq!(ship.lives, 2);
    ship.decrease_life(10);
    assert_eq!(ship.lives, 0);
    assert!(ship.is_destroyed());
}

#[test]
fn fire_timer_wraps_at_threshold() {
    let mut ship = Ship::new(&ShipConfig::default());
    let mut readings = Vec::new();
    for _ in 0..6 {
        readings.push(ship.can_fire());
        ship.advance_fire_timer(3);
    }
    assert_eq!(readings, vec![true, false, false, true, false, false]);
}

// ── Martians ──────────────────────────────────────────────────────────────────

#[test]
fn martian_step_down_drops_a_full_row() {
    let mut unit = Martian::new(100.0, 100.0, 25, 20, 10, 25);
    unit.step(Direction::Down, 5.0);
    assert_eq!((unit.x, unit.y), (100.0, 120.0));
    unit.step(Direction::Right, 5.0);
    assert_eq!((unit.x, unit.y), (105.0, 120.0));
    unit.step(Direction::Left, 5.0);
    unit.step(Direction::None, 5.0);
    assert_eq!((unit.x, unit.y), (100.0, 120.0));
}

#[test]
fn martian_shoots_downward() {
    let mut unit = Martian::new(100.0, 150.0, 25, 20, 10, 25);
    unit.shoot(&BulletConfig::default()).unwrap();
    let shot = unit.bullets.get_at(0).unwrap();
    assert_eq!((shot.x, shot.y), (112.0, 150.0));
    assert_eq!(shot.direction, Direction::Down);
}

#[test]
fn martian_shoot_at_capacity_leaves_pool_unchanged() {
    let mut unit = Martian::new(100.0, 150.0, 25, 20, 10, 25);
    let cfg = BulletConfig::default();
    for _ in 0..25 {
        unit.shoot(&cfg).unwrap();
    }
    assert_eq!(unit.bullets.len(), 25);

    assert!(unit.shoot(&cfg).is_ok());
    assert_eq!(unit.bullets.len(), 25);
}

#[test]
fn martian_bullets_stop_at_bottom_limit() {
    let mut unit = Martian::new(100.0, 150.0, 25, 20, 10, 25);
    unit.bullets.append(bullet(0.0, 536.0, Direction::Down)).unwrap();
    unit.bullets.append(bullet(0.0, 534.0, Direction::Down)).unwrap();
    unit.move_bullets(5.0, 540.0);
    assert_eq!(unit.bullets.len(), 1);
    assert_eq!(unit.bullets.get_at(0).unwrap().y, 539.0);
}

#[test]
fn formation_builds_row_major_grid() {
    let units = formation(&GameConfig::default());
    assert_eq!(units.len(), 55);

    assert_eq!((units[0].x, units[0].y), (130.0, 170.0));
    assert_eq!((units[10].x, units[10].y), (450.0, 170.0));
    assert_eq!((units[11].x, units[11].y), (130.0, 197.0));

    let points: Vec<u32> = (0..5).map(|row| units[row * 11].points).collect();
    assert_eq!(points, vec![30, 20, 20, 10, 10]);
    let frames: Vec<u32> = (0..5).map(|row| units[row * 11].frame_y).collect();
    assert_eq!(frames, vec![0, 1, 1, 2, 2]);
}

// ── Effects ───────────────────────────────────────────────────────────────────

#[test]
fn explosion_spawns_left_of_origin() {
    let effect = Effect::explosion(98.0, 105.0, &EffectConfig::default());
    assert_eq!((effect.x, effect.y), (88.0, 105.0));
    assert_eq!(effect.region, Region { x: 0, y: 0, w: 41, h: 34 });
    assert!(effect.fixed);
}

#[test]
fn effect_expires_after_lifetime_ticks() {
    let mut effect = Effect::explosion(0.0, 0.0, &EffectConfig::default());
    for tick in 1..5 {
        effect.advance();
        assert!(!effect.is_expired(), "expired early at tick {tick}");
        assert_eq!(effect.timer(), tick);
    }
    effect.advance();
    assert!(effect.is_expired());
    assert_eq!(effect.timer(), 0);
}

#[test]
fn fresh_effect_with_lifetime_one_is_not_already_expired() {
    let cfg = EffectConfig {
        lifetime: 1,
        ..EffectConfig::default()
    };
    let mut effect = Effect::explosion(0.0, 0.0, &cfg);
    assert_eq!(effect.timer(), 0);
    assert!(!effect.is_expired());

    effect.advance();
    assert!(effect.is_expired());
}
