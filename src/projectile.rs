use avian3d::prelude::{
    Collider, CollidingEntities, CollisionEventsEnabled, ExternalImpulse, LinearVelocity,
    RigidBody, Sensor,
};
use bevy::prelude::*;

/// What a fired power spawns: collider size, knockback strength and how long
/// the projectile lives if it never hits anything.
#[derive(Debug, Clone, Copy)]
pub struct ProjectilePrefab {
    pub radius: f32,
    pub hit_force: f32,
    pub lifetime: f32,
}

impl Default for ProjectilePrefab {
    fn default() -> Self {
        Self {
            radius: 0.15,
            hit_force: 5.0,
            lifetime: 5.0,
        }
    }
}

/// An in-flight projectile. `owner` is the firing avatar, permanently exempt
/// from being hit by it.
#[derive(Component, Debug)]
pub struct Projectile {
    pub owner: Entity,
    pub hit_force: f32,
}

#[derive(Component, Debug)]
pub struct ProjectileLifetime(pub Timer);

/// Spawn a projectile travelling along the rotation's forward axis. The body
/// is a kinematic sensor: it reports contacts but never pushes physically,
/// knockback is applied as an explicit impulse on impact.
pub(crate) fn spawn(
    commands: &mut Commands,
    owner: Entity,
    origin: Vec3,
    rotation: Quat,
    speed: f32,
    prefab: &ProjectilePrefab,
) {
    commands.spawn((
        Projectile {
            owner,
            hit_force: prefab.hit_force,
        },
        Transform::from_translation(origin).with_rotation(rotation),
        RigidBody::Kinematic,
        Collider::sphere(prefab.radius),
        Sensor,
        CollisionEventsEnabled,
        CollidingEntities::default(),
        LinearVelocity(rotation * (Vec3::NEG_Z * speed)),
        ProjectileLifetime(Timer::from_seconds(prefab.lifetime, TimerMode::Once)),
    ));
}

/// Resolve projectile contacts: knock the struck body back along the travel
/// direction, then remove the projectile. Contacts with the owner are
/// ignored entirely.
pub(crate) fn projectile_impacts(
    projectiles: Query<(Entity, &Projectile, &CollidingEntities, &LinearVelocity)>,
    mut struck: Query<&mut ExternalImpulse>,
    mut commands: Commands,
) {
    for (entity, projectile, colliding, velocity) in &projectiles {
        let Some(other) = colliding.0.iter().copied().find(|&e| e != projectile.owner) else {
            continue;
        };

        if let Ok(mut impulse) = struck.get_mut(other) {
            // Sensors carry no contact manifold; the travel direction stands
            // in for the negated contact normal of a head-on hit.
            let direction = velocity.0.normalize_or_zero();
            impulse.apply_impulse(direction * projectile.hit_force);
        }

        commands.entity(entity).despawn();
    }
}

/// Despawn projectiles that outlived their flight time without hitting
/// anything.
pub(crate) fn projectile_lifetimes(
    time: Res<Time>,
    mut projectiles: Query<(Entity, &mut ProjectileLifetime)>,
    mut commands: Commands,
) {
    for (entity, mut lifetime) in &mut projectiles {
        if lifetime.0.tick(time.delta()).just_finished() {
            commands.entity(entity).try_despawn();
        }
    }
}
