//! Playable demo: WASD to move (camera-relative), Left-Shift to sprint,
//! Space to jump, E to fire the projectile power, R to hover.

use avian3d::{PhysicsPlugins, prelude::*};
use bevy::prelude::*;
use bevy_enhanced_input::prelude::Actions;
use hero_controller::{
    AnimatorParams, Hero, HeroContext, HeroControllerPlugin, HoverSmoke, ParticleFx, PowerRig,
    Projectile, SmokePrefab, ViewCamera, load_hero_tuning,
};

const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 3.0, 6.0);

fn main() -> AppExit {
    App::new()
        .add_plugins((
            DefaultPlugins,
            PhysicsPlugins::default(),
            HeroControllerPlugin,
        ))
        .add_systems(Startup, setup)
        .add_systems(PostUpdate, (follow_camera, log_animation_cues))
        .add_observer(dress_projectile)
        .add_observer(dress_smoke)
        .run()
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Level: a floor and a few crates to bump into.
    commands.spawn((
        RigidBody::Static,
        Collider::cuboid(60.0, 1.0, 60.0),
        Transform::from_xyz(0.0, -0.5, 0.0),
        Mesh3d(meshes.add(Cuboid::new(60.0, 1.0, 60.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));
    for (x, z) in [(4.0, -3.0), (-5.0, 2.0), (2.0, 6.0)] {
        commands.spawn((
            RigidBody::Dynamic,
            Collider::cuboid(1.0, 1.0, 1.0),
            Transform::from_xyz(x, 0.5, z),
            Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.6, 0.4, 0.2))),
        ));
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let camera = commands
        .spawn((
            Camera3d::default(),
            Transform::from_translation(CAMERA_OFFSET).looking_at(Vec3::ZERO, Vec3::Y),
        ))
        .id();

    let tuning = load_hero_tuning("data/hero_tuning.ron");
    let hero = commands
        .spawn((
            Hero::default(),
            tuning.motion,
            tuning.abilities,
            ViewCamera(camera),
            Actions::<HeroContext>::default(),
            AnimatorParams::default(),
            Transform::from_xyz(0.0, 2.0, 0.0),
            Mesh3d(meshes.add(Capsule3d::new(0.35, 1.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.8, 0.8, 0.9))),
        ))
        .id();

    let muzzle = commands
        .spawn((Transform::from_xyz(0.0, 0.5, -0.5), ChildOf(hero)))
        .id();
    let glow_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.4, 0.8, 1.0),
        emissive: LinearRgba::rgb(2.0, 6.0, 10.0),
        ..default()
    });
    let mut glow = |offset: Vec3| {
        commands
            .spawn((
                Transform::from_translation(offset),
                Visibility::Hidden,
                ParticleFx::default(),
                Mesh3d(meshes.add(Sphere::new(0.12))),
                MeshMaterial3d(glow_material.clone()),
                ChildOf(hero),
            ))
            .id()
    };
    let glow_left = glow(Vec3::new(-0.45, 0.3, 0.0));
    let glow_right = glow(Vec3::new(0.45, 0.3, 0.0));
    let burst = commands
        .spawn((
            Transform::from_xyz(0.0, -0.6, 0.0),
            Visibility::Hidden,
            ParticleFx::default(),
            Mesh3d(meshes.add(Torus::new(0.25, 0.45))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(1.0, 0.9, 0.5),
                emissive: LinearRgba::rgb(8.0, 6.0, 1.0),
                ..default()
            })),
            ChildOf(hero),
        ))
        .id();

    commands.entity(hero).insert(PowerRig {
        muzzle: Some(muzzle),
        projectile: Some(Default::default()),
        hover_smoke: Some(SmokePrefab),
        hover_glows: [Some(glow_left), Some(glow_right)],
        jump_burst: Some(burst),
    });
}

fn follow_camera(
    heroes: Query<&Transform, With<Hero>>,
    mut cameras: Query<&mut Transform, (With<Camera3d>, Without<Hero>)>,
) {
    let Ok(hero) = heroes.single() else {
        return;
    };
    for mut camera in &mut cameras {
        let target = hero.translation + CAMERA_OFFSET;
        camera.translation = camera.translation.lerp(target, 0.1);
        camera.look_at(hero.translation + Vec3::Y, Vec3::Y);
    }
}

fn log_animation_cues(mut animators: Query<&mut AnimatorParams>) {
    for mut animator in &mut animators {
        for cue in animator.take_triggers() {
            info!("animation cue: {cue}");
        }
    }
}

// The controller spawns bare projectile and smoke entities; the demo gives
// them something to look at.
fn dress_projectile(
    trigger: Trigger<OnAdd, Projectile>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.entity(trigger.target()).insert((
        Mesh3d(meshes.add(Sphere::new(0.15))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.3, 0.9),
            emissive: LinearRgba::rgb(9.0, 2.0, 9.0),
            ..default()
        })),
    ));
}

fn dress_smoke(
    trigger: Trigger<OnAdd, HoverSmoke>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.entity(trigger.target()).insert((
        Mesh3d(meshes.add(Sphere::new(0.5))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.7, 0.7, 0.7, 0.4),
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
    ));
}
