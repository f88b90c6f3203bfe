//! Per-avatar tuning values and their RON loader.
//!
//! The tuning structs are immutable once attached to an avatar: they are set
//! at spawn (from a RON file or from defaults) and never mutated at runtime.
//! Every field has a serde default so partial files work; a missing or
//! unparsable file falls back to defaults with a warning.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Locomotion tuning for one avatar.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct MotionTuning {
    #[serde(default = "MotionTuning::default_walk_speed")]
    pub walk_speed: f32, // meters/second
    #[serde(default = "MotionTuning::default_sprint_speed")]
    pub sprint_speed: f32,
    #[serde(default = "MotionTuning::default_rotation_speed")]
    pub rotation_speed: f32, // smoothing rate, 1/seconds
    #[serde(default = "MotionTuning::default_jump_height")]
    pub jump_height: f32, // apex height in meters
    #[serde(default = "MotionTuning::default_gravity")]
    pub gravity: f32, // must stay negative
    #[serde(default = "MotionTuning::default_slope_limit_deg")]
    pub slope_limit_deg: f32, // steepest walkable slope
}

impl MotionTuning {
    fn default_walk_speed() -> f32 {
        6.0
    }
    fn default_sprint_speed() -> f32 {
        12.0
    }
    fn default_rotation_speed() -> f32 {
        12.0
    }
    fn default_jump_height() -> f32 {
        1.4
    }
    fn default_gravity() -> f32 {
        -9.81
    }
    fn default_slope_limit_deg() -> f32 {
        45.0
    }

    pub fn slope_limit(&self) -> f32 {
        self.slope_limit_deg.to_radians()
    }
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            walk_speed: Self::default_walk_speed(),
            sprint_speed: Self::default_sprint_speed(),
            rotation_speed: Self::default_rotation_speed(),
            jump_height: Self::default_jump_height(),
            gravity: Self::default_gravity(),
            slope_limit_deg: Self::default_slope_limit_deg(),
        }
    }
}

/// Ability tuning for one avatar: the projectile power, the hover power and
/// the jump burst effect.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct AbilityTuning {
    #[serde(default = "AbilityTuning::default_shoot_delay")]
    pub shoot_delay: f32, // seconds between trigger and spawn, syncs with the cast animation
    #[serde(default = "AbilityTuning::default_projectile_speed")]
    pub projectile_speed: f32,
    #[serde(default = "AbilityTuning::default_angle_offset")]
    pub angle_offset: f32, // yaw offset in degrees applied to the muzzle rotation
    #[serde(default = "AbilityTuning::default_hover_duration")]
    pub hover_duration: f32,
    #[serde(default = "AbilityTuning::default_jump_burst_duration")]
    pub jump_burst_duration: f32,
}

impl AbilityTuning {
    fn default_shoot_delay() -> f32 {
        0.3
    }
    fn default_projectile_speed() -> f32 {
        20.0
    }
    fn default_angle_offset() -> f32 {
        0.0
    }
    fn default_hover_duration() -> f32 {
        2.0
    }
    fn default_jump_burst_duration() -> f32 {
        1.5
    }
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            shoot_delay: Self::default_shoot_delay(),
            projectile_speed: Self::default_projectile_speed(),
            angle_offset: Self::default_angle_offset(),
            hover_duration: Self::default_hover_duration(),
            jump_burst_duration: Self::default_jump_burst_duration(),
        }
    }
}

/// Aggregate shape of a tuning file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeroTuning {
    #[serde(default)]
    pub motion: MotionTuning,
    #[serde(default)]
    pub abilities: AbilityTuning,
}

impl HeroTuning {
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}

/// Load tuning from a RON file, falling back to defaults if the file is
/// missing or does not parse. Avatars with no tuning file are a supported
/// configuration, so this never fails.
#[must_use]
pub fn load_hero_tuning(path: &str) -> HeroTuning {
    match std::fs::read_to_string(path) {
        Ok(text) => match HeroTuning::from_ron(&text) {
            Ok(tuning) => tuning,
            Err(err) => {
                warn!("failed to parse tuning file {path}: {err}; using defaults");
                HeroTuning::default()
            }
        },
        Err(_) => HeroTuning::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_missing_fields_with_defaults() {
        let tuning = HeroTuning::from_ron(
            "(motion: (walk_speed: 3.5, sprint_speed: 6.0), abilities: (shoot_delay: 0.5))",
        )
        .unwrap();

        assert_eq!(tuning.motion.walk_speed, 3.5);
        assert_eq!(tuning.motion.sprint_speed, 6.0);
        assert_eq!(tuning.motion.gravity, -9.81);
        assert_eq!(tuning.abilities.shoot_delay, 0.5);
        assert_eq!(tuning.abilities.hover_duration, 2.0);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let tuning = HeroTuning::from_ron("()").unwrap();
        assert_eq!(tuning.motion.jump_height, 1.4);
        assert_eq!(tuning.abilities.projectile_speed, 20.0);
    }

    #[test]
    fn garbage_does_not_parse() {
        assert!(HeroTuning::from_ron("speed = very yes").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tuning = load_hero_tuning("no/such/file.ron");
        assert_eq!(tuning.motion.walk_speed, 6.0);
    }

    #[test]
    fn slope_limit_converts_to_radians() {
        let tuning = MotionTuning::default();
        assert!((tuning.slope_limit() - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }
}
