use avian3d::prelude::{
    Collider, CollisionLayers, RigidBody, Sensor, SpatialQuery, SpatialQueryFilter,
};
use bevy::prelude::*;

use crate::{
    animation::AnimatorParams,
    input::{JumpRequested, Jumped, MovementIntent},
    move_and_slide::{SlideConfig, ground_sweep, move_and_slide},
    tuning::MotionTuning,
};

pub const CHARACTER_RADIUS: f32 = 0.35;
pub const CHARACTER_CAPSULE_LENGTH: f32 = 1.0;
const GROUND_CHECK_DISTANCE: f32 = 0.2;

/// Small downward velocity held while grounded. Keeps the collider pressed
/// into the floor so the ground sweep stays engaged between frames instead of
/// letting float drift accumulate unbounded fall speed.
pub const GROUND_STICK_VELOCITY: f32 = -2.0;

/// Steering input below this squared magnitude counts as "not moving".
const STEER_DEADZONE_SQ: f32 = 0.001;

/// Motion state of one avatar. Owned and mutated exclusively by the
/// locomotion tick (plus the jump request handler).
#[derive(Component)]
#[require(
    RigidBody = RigidBody::Kinematic,
    Collider = Collider::capsule(CHARACTER_RADIUS, CHARACTER_CAPSULE_LENGTH),
    MovementIntent,
    MotionTuning,
)]
pub struct Hero {
    vertical_velocity: f32,
    grounded: bool,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            vertical_velocity: 0.0,
            grounded: false,
        }
    }
}

impl Hero {
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Clamp accumulated fall speed while standing on the floor.
    fn stick_to_ground(&mut self) {
        if self.grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = GROUND_STICK_VELOCITY;
        }
    }

    fn integrate_gravity(&mut self, gravity: f32, dt: f32) {
        self.vertical_velocity += gravity * dt;
    }

    /// Launch upward if grounded. Returns whether a jump happened.
    ///
    /// The launch speed is the projectile-motion solve for reaching
    /// `jump_height` under constant gravity; `gravity` must be negative.
    pub fn try_jump(&mut self, tuning: &MotionTuning) -> bool {
        if !self.grounded {
            return false;
        }
        self.vertical_velocity = jump_velocity(tuning.jump_height, tuning.gravity);
        self.grounded = false;
        true
    }
}

/// Camera the avatar steers relative to, injected at spawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct ViewCamera(pub Entity);

/// Camera forward/right flattened onto the horizontal plane. A camera looking
/// straight up or down degenerates to zero vectors rather than NaN.
pub fn planar_basis(camera: &Transform) -> (Vec3, Vec3) {
    let forward = camera.forward();
    let right = camera.right();
    let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
    let right = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();
    (forward, right)
}

/// Combine stick input with the camera basis into a world-space direction.
pub fn steer_direction(move_axis: Vec2, forward: Vec3, right: Vec3) -> Vec3 {
    forward * move_axis.y + right * move_axis.x
}

pub fn jump_velocity(jump_height: f32, gravity: f32) -> f32 {
    (jump_height * -2.0 * gravity).sqrt()
}

/// Exponentially approach facing `desired`. The rate is scaled by frame time
/// at the call site, which biases the approach speed with the frame rate; an
/// accepted simplification, kept as-is.
pub fn face_toward(current: Quat, desired: Vec3, rate: f32) -> Quat {
    let target = Transform::default().looking_to(desired, Vec3::Y).rotation;
    current.slerp(target, rate.min(1.0))
}

/// Apply jump requests against the current grounded state and tell the
/// ability side about jumps that actually happened (it owns the burst
/// effect).
pub(crate) fn handle_jump(
    mut requests: EventReader<JumpRequested>,
    mut heroes: Query<(&mut Hero, &MotionTuning, Option<&mut AnimatorParams>)>,
    mut jumped: EventWriter<Jumped>,
) {
    for request in requests.read() {
        let Ok((mut hero, tuning, animator)) = heroes.get_mut(request.avatar) else {
            continue;
        };
        if !hero.try_jump(tuning) {
            continue;
        }
        if let Some(mut animator) = animator {
            animator.set_trigger("Jump");
        }
        jumped.write(Jumped {
            avatar: request.avatar,
        });
    }
}

/// Per-tick locomotion: grounding, camera-relative steering, rotation
/// smoothing, gravity, and displacement through the move primitive.
pub(crate) fn locomotion(
    mut heroes: Query<(
        Entity,
        &mut Transform,
        &mut Hero,
        &MovementIntent,
        &MotionTuning,
        &ViewCamera,
        &Collider,
        &CollisionLayers,
        Option<&mut AnimatorParams>,
    )>,
    cameras: Query<&Transform, Without<Hero>>,
    sensors: Query<Entity, With<Sensor>>,
    time: Res<Time>,
    spatial_query: SpatialQuery,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut hero, intent, tuning, view, collider, layers, animator) in
        &mut heroes
    {
        let Ok(camera) = cameras.get(view.0) else {
            continue;
        };

        hero.stick_to_ground();

        let (forward, right) = planar_basis(camera);
        let desired = steer_direction(intent.move_axis, forward, right);

        let target_speed = if intent.sprint_held {
            tuning.sprint_speed
        } else {
            tuning.walk_speed
        };
        let horizontal = if desired.length_squared() > STEER_DEADZONE_SQ {
            desired.normalize() * target_speed
        } else {
            Vec3::ZERO
        };

        if desired.length_squared() > STEER_DEADZONE_SQ {
            transform.rotation =
                face_toward(transform.rotation, desired, tuning.rotation_speed * dt);
        }

        hero.integrate_gravity(tuning.gravity, dt);

        let velocity = Vec3::new(horizontal.x, hero.vertical_velocity, horizontal.z);
        let rotation = transform.rotation;

        // Exclude the avatar itself plus anything outside its collision
        // filter; sensors never obstruct movement.
        let mut filter = SpatialQueryFilter::default()
            .with_excluded_entities([entity])
            .with_mask(layers.filters);
        filter.excluded_entities.extend(&sensors);

        let config = SlideConfig::default();
        let moved = move_and_slide(
            &spatial_query,
            collider,
            transform.translation,
            velocity,
            rotation,
            &config,
            &filter,
            dt,
        );
        transform.translation = moved.translation;

        // Rising means we left the floor this tick; skip the ground probe so
        // a fresh jump is not immediately re-grounded.
        hero.grounded = hero.vertical_velocity <= 0.0
            && ground_sweep(
                collider,
                config.epsilon,
                transform.translation,
                Dir3::Y,
                GROUND_CHECK_DISTANCE,
                rotation,
                &spatial_query,
                &filter,
                tuning.slope_limit(),
            )
            .is_some();

        if let Some(mut animator) = animator {
            animator.set_float("Speed", horizontal.length());
            animator.set_bool("IsGrounded", hero.grounded);
        }
    }
}
