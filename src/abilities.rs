//! Timed ability execution: the delayed projectile power, the hover power and
//! the jump burst effect.
//!
//! Every invocation schedules its own task entity carrying a [`Timer`];
//! service systems tick those timers each frame and emit the side effects
//! when they elapse. Nothing is ever cancelled and invocations never exclude
//! each other, so overlapping activations simply coexist, each owning its own
//! task. Unconfigured rig slots are skipped silently everywhere: an avatar
//! with only one power wired up is a supported loadout, not an error.

use bevy::prelude::*;

use crate::{
    HeroSet,
    animation::AnimatorParams,
    input::{Jumped, Power, PowerTriggered},
    projectile::{self, ProjectilePrefab},
    tuning::AbilityTuning,
    vfx::{HoverSmoke, ParticleFx, SmokePrefab},
};

/// The ability executor on its own: events plus the trigger/service systems
/// for both powers, the jump burst and the projectiles. Has no input or
/// physics dependencies, so a headless world can drive it by writing
/// [`PowerTriggered`] / [`Jumped`] events directly.
pub struct AbilityPlugin;

impl Plugin for AbilityPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PowerTriggered>()
            .add_event::<Jumped>()
            .add_systems(
                Update,
                // Servicing runs before the start systems: a task spawned in
                // the trigger frame is first ticked the frame after, so its
                // delay counts only time elapsed after the trigger.
                (
                    service_pending_shots,
                    service_hover,
                    service_one_shots,
                    projectile::projectile_impacts,
                    projectile::projectile_lifetimes,
                    start_projectile,
                    start_hover,
                    start_jump_burst,
                )
                    .chain()
                    .in_set(HeroSet::Abilities),
            );
    }
}

/// Optional effect and spawn-point wiring for one avatar. Every slot may be
/// left empty.
#[derive(Component, Default)]
pub struct PowerRig {
    /// Attachment point projectiles spawn from.
    pub muzzle: Option<Entity>,
    /// What the projectile power fires.
    pub projectile: Option<ProjectilePrefab>,
    /// Smoke spawned (and owned) per hover invocation.
    pub hover_smoke: Option<SmokePrefab>,
    /// Persistent glow effect handles toggled while hovering.
    pub hover_glows: [Option<Entity>; 2],
    /// Persistent burst effect handle flashed on jump.
    pub jump_burst: Option<Entity>,
}

/// A triggered shot waiting out its animation-sync delay. Muzzle pose and
/// tuning are captured at trigger time; the spawn consumes them exactly once.
#[derive(Component)]
pub struct PendingShot {
    shooter: Entity,
    /// Muzzle translation and (yaw-offset) rotation, if a muzzle was wired.
    origin: Option<(Vec3, Quat)>,
    prefab: Option<ProjectilePrefab>,
    speed: f32,
    timer: Timer,
}

/// One hover invocation and the effect set it owns. A single timer tears the
/// whole set down collectively.
#[derive(Component)]
pub struct HoverState {
    smoke: Option<Entity>,
    /// Only the glows this invocation actually started.
    glows: [Option<Entity>; 2],
    timer: Timer,
}

/// A one-shot effect scheduled for deactivation (the jump burst pattern).
#[derive(Component)]
pub struct OneShotFx {
    effect: Entity,
    timer: Timer,
}

/// Begin the projectile power: animation cue now, spawn after `shoot_delay`.
pub(crate) fn start_projectile(
    mut triggers: EventReader<PowerTriggered>,
    mut heroes: Query<(&AbilityTuning, &PowerRig, Option<&mut AnimatorParams>)>,
    muzzles: Query<&GlobalTransform>,
    mut commands: Commands,
) {
    for trigger in triggers.read() {
        if trigger.power != Power::Projectile {
            continue;
        }
        let Ok((tuning, rig, animator)) = heroes.get_mut(trigger.avatar) else {
            continue;
        };
        if let Some(mut animator) = animator {
            animator.set_trigger("Power1");
        }

        let origin = rig
            .muzzle
            .and_then(|muzzle| muzzles.get(muzzle).ok())
            .map(|muzzle| {
                let (_, rotation, translation) = muzzle.to_scale_rotation_translation();
                (
                    translation,
                    rotation * Quat::from_rotation_y(tuning.angle_offset.to_radians()),
                )
            });

        commands.spawn(PendingShot {
            shooter: trigger.avatar,
            origin,
            prefab: rig.projectile,
            speed: tuning.projectile_speed,
            timer: Timer::from_seconds(tuning.shoot_delay, TimerMode::Once),
        });
    }
}

/// Fire shots whose delay elapsed. A shot with no captured muzzle pose or no
/// prefab resolves to nothing.
pub(crate) fn service_pending_shots(
    time: Res<Time>,
    mut shots: Query<(Entity, &mut PendingShot)>,
    mut commands: Commands,
) {
    for (entity, mut shot) in &mut shots {
        if !shot.timer.tick(time.delta()).just_finished() {
            continue;
        }
        if let (Some((origin, rotation)), Some(prefab)) = (shot.origin, shot.prefab) {
            projectile::spawn(
                &mut commands,
                shot.shooter,
                origin,
                rotation,
                shot.speed,
                &prefab,
            );
        }
        commands.entity(entity).despawn();
    }
}

/// Begin the hover power: all configured sub-effects come up in the same
/// tick, and the invocation records exactly what it started.
pub(crate) fn start_hover(
    mut triggers: EventReader<PowerTriggered>,
    mut heroes: Query<(&AbilityTuning, &PowerRig, Option<&mut AnimatorParams>)>,
    mut effects: Query<(&mut Visibility, &mut ParticleFx)>,
    mut commands: Commands,
) {
    for trigger in triggers.read() {
        if trigger.power != Power::Hover {
            continue;
        }
        let Ok((tuning, rig, animator)) = heroes.get_mut(trigger.avatar) else {
            continue;
        };
        if let Some(mut animator) = animator {
            animator.set_trigger("Power2");
        }

        let smoke = rig.hover_smoke.map(|_smoke| {
            commands
                .spawn((
                    HoverSmoke,
                    ParticleFx { playing: true },
                    Transform::default(),
                    Visibility::Visible,
                    ChildOf(trigger.avatar),
                ))
                .id()
        });

        let mut glows = [None; 2];
        for (slot, handle) in rig.hover_glows.iter().enumerate() {
            let Some(glow) = *handle else {
                continue;
            };
            if let Ok((mut visibility, mut fx)) = effects.get_mut(glow) {
                *visibility = Visibility::Visible;
                fx.play();
                glows[slot] = Some(glow);
            }
        }

        commands.spawn(HoverState {
            smoke,
            glows,
            timer: Timer::from_seconds(tuning.hover_duration, TimerMode::Once),
        });
    }
}

/// Tear down hover invocations whose duration elapsed: destroy the smoke,
/// stop and hide each glow the invocation started. A handle that disappeared
/// in the meantime is skipped, not an error.
pub(crate) fn service_hover(
    time: Res<Time>,
    mut hovers: Query<(Entity, &mut HoverState)>,
    mut effects: Query<(&mut Visibility, &mut ParticleFx)>,
    mut commands: Commands,
) {
    for (entity, mut hover) in &mut hovers {
        if !hover.timer.tick(time.delta()).just_finished() {
            continue;
        }
        if let Some(smoke) = hover.smoke {
            commands.entity(smoke).try_despawn();
        }
        for glow in hover.glows.into_iter().flatten() {
            if let Ok((mut visibility, mut fx)) = effects.get_mut(glow) {
                fx.stop();
                *visibility = Visibility::Hidden;
            }
        }
        commands.entity(entity).despawn();
    }
}

/// Flash the jump burst effect after a successful jump; schedules its own
/// deactivation, independent of the power timers.
pub(crate) fn start_jump_burst(
    mut jumps: EventReader<Jumped>,
    heroes: Query<(&AbilityTuning, &PowerRig)>,
    mut effects: Query<(&mut Visibility, &mut ParticleFx)>,
    mut commands: Commands,
) {
    for jump in jumps.read() {
        let Ok((tuning, rig)) = heroes.get(jump.avatar) else {
            continue;
        };
        let Some(burst) = rig.jump_burst else {
            continue;
        };
        let Ok((mut visibility, mut fx)) = effects.get_mut(burst) else {
            continue;
        };
        *visibility = Visibility::Visible;
        fx.restart();
        commands.spawn(OneShotFx {
            effect: burst,
            timer: Timer::from_seconds(tuning.jump_burst_duration, TimerMode::Once),
        });
    }
}

/// Hide one-shot effects whose window elapsed.
pub(crate) fn service_one_shots(
    time: Res<Time>,
    mut one_shots: Query<(Entity, &mut OneShotFx)>,
    mut effects: Query<&mut Visibility, With<ParticleFx>>,
    mut commands: Commands,
) {
    for (entity, mut one_shot) in &mut one_shots {
        if !one_shot.timer.tick(time.delta()).just_finished() {
            continue;
        }
        if let Ok(mut visibility) = effects.get_mut(one_shot.effect) {
            *visibility = Visibility::Hidden;
        }
        commands.entity(entity).despawn();
    }
}
