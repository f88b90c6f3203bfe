use avian3d::prelude::*;
use bevy::prelude::*;

/// Shape-cast and sliding parameters for the move primitive.
#[derive(Clone, Copy)]
pub struct SlideConfig {
    pub max_iterations: usize,
    pub skin_width: f32,
    pub epsilon: f32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            max_iterations: 4,
            skin_width: 0.01,
            epsilon: 0.0001,
        }
    }
}

/// Result of one displacement through [`move_and_slide`].
pub struct SlideOutput {
    pub translation: Vec3,
    pub velocity: Vec3,
}

/// Cast the character shape along `direction` and return the distance it is
/// safe to translate by, plus the hit itself.
#[must_use]
pub fn sweep(
    collider: &Collider,
    epsilon: f32,
    origin: Vec3,
    direction: Dir3,
    distance: f32,
    rotation: Quat,
    spatial_query: &SpatialQuery,
    filter: &SpatialQueryFilter,
) -> Option<(f32, ShapeHitData)> {
    let hit = spatial_query.cast_shape(
        collider,
        origin,
        rotation,
        direction,
        &ShapeCastConfig {
            max_distance: distance,
            target_distance: 0.0,
            ignore_origin_penetration: true,
            compute_contact_on_penetration: true,
            ..Default::default()
        },
        filter,
    )?;

    let safe_distance = (hit.distance - epsilon).max(0.0);
    Some((safe_distance, hit))
}

/// Displace a character collider by `velocity * delta_time`, sliding along
/// whatever it hits.
///
/// Each iteration casts along the current velocity, advances up to the
/// contact (minus the skin width) and projects the velocity onto the contact
/// plane, so obstacles redirect the character instead of stopping it. The
/// scene itself is never mutated; the caller applies the returned
/// translation.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn move_and_slide(
    spatial_query: &SpatialQuery,
    collider: &Collider,
    origin: Vec3,
    velocity: Vec3,
    rotation: Quat,
    config: &SlideConfig,
    filter: &SpatialQueryFilter,
    delta_time: f32,
) -> SlideOutput {
    let mut translation = origin;
    let mut velocity = velocity;
    let mut remaining_time = delta_time;

    for _ in 0..config.max_iterations {
        let Ok(direction) = Dir3::new(velocity) else {
            break;
        };
        let max_distance = velocity.length() * remaining_time;

        let Some((safe_distance, hit)) = sweep(
            collider,
            config.epsilon,
            translation,
            direction,
            max_distance + config.skin_width,
            rotation,
            spatial_query,
            filter,
        ) else {
            // No obstruction, move the full remaining distance.
            translation += velocity * remaining_time;
            break;
        };

        let movement = (safe_distance - config.skin_width).max(0.0);
        translation += *direction * movement;

        if max_distance > 0.0 {
            let movement_ratio = (movement / max_distance).clamp(0.0, 1.0);
            remaining_time *= 1.0 - movement_ratio;
        }

        // Slide: keep only the velocity tangent to the contact plane.
        velocity = velocity.reject_from_normalized(hit.normal1);
    }

    SlideOutput {
        translation,
        velocity,
    }
}

/// Sweep straight down and report the floor normal if the character stands on
/// a walkable surface within `distance`.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn ground_sweep(
    collider: &Collider,
    epsilon: f32,
    origin: Vec3,
    up: Dir3,
    distance: f32,
    rotation: Quat,
    spatial_query: &SpatialQuery,
    filter: &SpatialQueryFilter,
    max_slope: f32,
) -> Option<Dir3> {
    let (_, hit) = sweep(
        collider,
        epsilon,
        origin,
        -up,
        distance,
        rotation,
        spatial_query,
        filter,
    )?;

    let slope_angle = up.angle_between(hit.normal1);
    if slope_angle < max_slope {
        Some(Dir3::new(hit.normal1).unwrap_or(Dir3::Y))
    } else {
        None
    }
}
