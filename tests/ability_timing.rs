//! Timing behavior of the ability executor, driven through a headless app
//! with a manually advanced clock.

use std::time::Duration;

use avian3d::prelude::LinearVelocity;
use bevy::prelude::*;
use hero_controller::{
    AbilityPlugin, AbilityTuning, AnimatorParams, HoverSmoke, Jumped, ParticleFx, Power,
    PowerRig, PowerTriggered, Projectile, SmokePrefab,
};

fn headless_app() -> App {
    let mut app = App::new();
    app.insert_resource(Time::<()>::default());
    app.add_plugins(AbilityPlugin);
    app
}

/// Advance the clock by `seconds` and run one frame. Every frame goes
/// through here: `advance_by` also *sets* the frame delta, so an update that
/// skipped it would re-apply the previous delta.
fn advance(app: &mut App, seconds: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(seconds));
    app.update();
}

fn spawn_muzzle(app: &mut App, transform: Transform) -> Entity {
    app.world_mut()
        .spawn((transform, GlobalTransform::from(transform)))
        .id()
}

fn spawn_effect(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((Visibility::Hidden, ParticleFx::default()))
        .id()
}

fn spawn_avatar(app: &mut App, rig: PowerRig) -> Entity {
    app.world_mut()
        .spawn((
            Transform::default(),
            AbilityTuning::default(),
            rig,
            AnimatorParams::default(),
        ))
        .id()
}

fn trigger(app: &mut App, avatar: Entity, power: Power) {
    app.world_mut().send_event(PowerTriggered { avatar, power });
    advance(app, 0.0);
}

fn projectile_count(app: &mut App) -> usize {
    app.world_mut()
        .query::<&Projectile>()
        .iter(app.world())
        .count()
}

#[test]
fn projectile_spawns_after_exactly_the_shoot_delay() {
    let mut app = headless_app();
    let muzzle = spawn_muzzle(
        &mut app,
        Transform::from_xyz(0.0, 1.5, 0.0)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
    );
    let avatar = spawn_avatar(
        &mut app,
        PowerRig {
            muzzle: Some(muzzle),
            projectile: Some(Default::default()),
            ..Default::default()
        },
    );

    trigger(&mut app, avatar, Power::Projectile);
    assert_eq!(projectile_count(&mut app), 0);

    advance(&mut app, 0.29);
    assert_eq!(projectile_count(&mut app), 0, "fired before the delay");

    advance(&mut app, 0.01);
    assert_eq!(projectile_count(&mut app), 1);

    // Velocity has the configured magnitude along the muzzle's forward axis.
    let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2) * (Vec3::NEG_Z * 20.0);
    let world = app.world_mut();
    let mut velocities = world.query_filtered::<&LinearVelocity, With<Projectile>>();
    let velocity = velocities.single(world).unwrap();
    assert!((velocity.0 - expected).length() < 1e-4);
    assert!((velocity.0.length() - 20.0).abs() < 1e-4);

    // No residual pending work: nothing further ever spawns.
    advance(&mut app, 10.0);
    assert_eq!(projectile_count(&mut app), 0); // the shot itself expired at 5s
}

#[test]
fn concurrent_triggers_resolve_independently() {
    let mut app = headless_app();
    let muzzle = spawn_muzzle(&mut app, Transform::default());
    let avatar = spawn_avatar(
        &mut app,
        PowerRig {
            muzzle: Some(muzzle),
            projectile: Some(Default::default()),
            ..Default::default()
        },
    );

    trigger(&mut app, avatar, Power::Projectile);
    advance(&mut app, 0.1);
    trigger(&mut app, avatar, Power::Projectile);

    advance(&mut app, 0.2); // first reaches 0.3
    assert_eq!(projectile_count(&mut app), 1);

    advance(&mut app, 0.1); // second reaches 0.3
    assert_eq!(projectile_count(&mut app), 2);
}

#[test]
fn muzzle_pose_is_captured_at_trigger_time() {
    let mut app = headless_app();
    let muzzle = spawn_muzzle(&mut app, Transform::from_xyz(1.0, 2.0, 3.0));
    let avatar = spawn_avatar(
        &mut app,
        PowerRig {
            muzzle: Some(muzzle),
            projectile: Some(Default::default()),
            ..Default::default()
        },
    );

    trigger(&mut app, avatar, Power::Projectile);

    // The avatar keeps moving during the delay; the shot must not care.
    let moved = Transform::from_xyz(9.0, 9.0, 9.0);
    app.world_mut()
        .entity_mut(muzzle)
        .insert((moved, GlobalTransform::from(moved)));

    advance(&mut app, 0.3);
    let world = app.world_mut();
    let mut transforms = world.query_filtered::<&Transform, With<Projectile>>();
    let spawned = transforms.single(world).unwrap();
    assert_eq!(spawned.translation, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn missing_prefab_resolves_to_silence() {
    let mut app = headless_app();
    let muzzle = spawn_muzzle(&mut app, Transform::default());
    let avatar = spawn_avatar(
        &mut app,
        PowerRig {
            muzzle: Some(muzzle),
            projectile: None,
            ..Default::default()
        },
    );

    trigger(&mut app, avatar, Power::Projectile);
    advance(&mut app, 1.0);
    assert_eq!(projectile_count(&mut app), 0);
}

#[test]
fn missing_muzzle_resolves_to_silence() {
    let mut app = headless_app();
    let avatar = spawn_avatar(
        &mut app,
        PowerRig {
            muzzle: None,
            projectile: Some(Default::default()),
            ..Default::default()
        },
    );

    trigger(&mut app, avatar, Power::Projectile);
    advance(&mut app, 1.0);
    assert_eq!(projectile_count(&mut app), 0);
}

#[test]
fn trigger_queues_the_cast_animation() {
    let mut app = headless_app();
    let avatar = spawn_avatar(&mut app, PowerRig::default());

    trigger(&mut app, avatar, Power::Projectile);
    trigger(&mut app, avatar, Power::Hover);

    let mut animator = app.world_mut().get_mut::<AnimatorParams>(avatar).unwrap();
    assert_eq!(animator.take_triggers(), vec!["Power1", "Power2"]);
}

#[test]
fn hover_activates_immediately_and_tears_down_after_duration() {
    let mut app = headless_app();
    let glow_a = spawn_effect(&mut app);
    let glow_b = spawn_effect(&mut app);
    let avatar = spawn_avatar(
        &mut app,
        PowerRig {
            hover_smoke: Some(SmokePrefab),
            hover_glows: [Some(glow_a), Some(glow_b)],
            ..Default::default()
        },
    );

    trigger(&mut app, avatar, Power::Hover);

    // Same tick: both glows visible and playing, smoke attached to avatar.
    for glow in [glow_a, glow_b] {
        assert_eq!(*app.world().get::<Visibility>(glow).unwrap(), Visibility::Visible);
        assert!(app.world().get::<ParticleFx>(glow).unwrap().is_playing());
    }
    let world = app.world_mut();
    let smoke = world
        .query_filtered::<(Entity, &ChildOf), With<HoverSmoke>>()
        .single(world)
        .map(|(entity, child_of)| {
            assert_eq!(child_of.parent(), avatar);
            entity
        })
        .unwrap();

    advance(&mut app, 1.9);
    assert!(app.world().get_entity(smoke).is_ok(), "torn down early");

    advance(&mut app, 0.1);
    assert!(app.world().get_entity(smoke).is_err());
    for glow in [glow_a, glow_b] {
        assert_eq!(*app.world().get::<Visibility>(glow).unwrap(), Visibility::Hidden);
        assert!(!app.world().get::<ParticleFx>(glow).unwrap().is_playing());
    }
}

#[test]
fn hover_sub_effects_are_independently_optional() {
    let mut app = headless_app();
    let glow = spawn_effect(&mut app);
    let avatar = spawn_avatar(
        &mut app,
        PowerRig {
            hover_smoke: None,
            hover_glows: [None, Some(glow)],
            ..Default::default()
        },
    );

    trigger(&mut app, avatar, Power::Hover);
    assert!(app.world().get::<ParticleFx>(glow).unwrap().is_playing());

    advance(&mut app, 2.0);
    assert!(!app.world().get::<ParticleFx>(glow).unwrap().is_playing());
    let world = app.world_mut();
    assert_eq!(
        world
            .query::<&HoverSmoke>()
            .iter(world)
            .count(),
        0
    );
}

#[test]
fn overlapping_hovers_each_own_their_smoke() {
    let mut app = headless_app();
    let avatar = spawn_avatar(
        &mut app,
        PowerRig {
            hover_smoke: Some(SmokePrefab),
            ..Default::default()
        },
    );

    trigger(&mut app, avatar, Power::Hover);
    advance(&mut app, 1.0);
    trigger(&mut app, avatar, Power::Hover);

    let world = app.world_mut();
    let count = world.query::<&HoverSmoke>().iter(world).count();
    assert_eq!(count, 2, "second invocation starts a second effect set");

    advance(&mut app, 1.0); // first set ends
    let world = app.world_mut();
    assert_eq!(world.query::<&HoverSmoke>().iter(world).count(), 1);

    advance(&mut app, 1.0); // second set ends
    let world = app.world_mut();
    assert_eq!(world.query::<&HoverSmoke>().iter(world).count(), 0);
}

#[test]
fn jump_burst_flashes_for_its_window() {
    let mut app = headless_app();
    let burst = spawn_effect(&mut app);
    let avatar = spawn_avatar(
        &mut app,
        PowerRig {
            jump_burst: Some(burst),
            ..Default::default()
        },
    );

    app.world_mut().send_event(Jumped { avatar });
    advance(&mut app, 0.0);
    assert_eq!(*app.world().get::<Visibility>(burst).unwrap(), Visibility::Visible);
    assert!(app.world().get::<ParticleFx>(burst).unwrap().is_playing());

    advance(&mut app, 1.5);
    assert_eq!(*app.world().get::<Visibility>(burst).unwrap(), Visibility::Hidden);
}

#[test]
fn jump_without_a_burst_slot_is_silent() {
    let mut app = headless_app();
    let avatar = spawn_avatar(&mut app, PowerRig::default());

    app.world_mut().send_event(Jumped { avatar });
    advance(&mut app, 0.0);
    advance(&mut app, 2.0);
    // Nothing to assert beyond "did not panic and spawned nothing".
    let world = app.world_mut();
    assert_eq!(world.query::<&ParticleFx>().iter(world).count(), 0);
}
