//! Third-person hero controller: camera-relative kinematic locomotion plus
//! two timed powers (a delayed projectile and a hover effect set), built on
//! avian spatial queries and enhanced-input actions.
//!
//! Spawn an avatar with [`Hero`], a [`ViewCamera`] pointing at its camera
//! entity, optionally a [`PowerRig`] / [`AnimatorParams`], and add
//! [`HeroControllerPlugin`].

pub mod abilities;
pub mod animation;
pub mod input;
pub mod move_and_slide;
pub mod movement;
pub mod projectile;
pub mod tuning;
pub mod vfx;

use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

pub use abilities::{AbilityPlugin, PowerRig};
pub use animation::AnimatorParams;
pub use input::{HeroContext, JumpRequested, Jumped, MovementIntent, Power, PowerTriggered};
pub use movement::{Hero, ViewCamera};
pub use projectile::{Projectile, ProjectilePrefab};
pub use tuning::{AbilityTuning, HeroTuning, MotionTuning, load_hero_tuning};
pub use vfx::{HoverSmoke, ParticleFx, SmokePrefab};

/// Update-schedule phases of the controller. Ability effects always run
/// after the locomotion tick of the same frame, which is what makes a timed
/// routine's post-delay effects land strictly after every tick inside its
/// delay window.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroSet {
    Input,
    Locomotion,
    Abilities,
}

pub struct HeroControllerPlugin;

impl Plugin for HeroControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((EnhancedInputPlugin, AbilityPlugin))
            .add_input_context::<input::HeroContext>()
            .add_event::<JumpRequested>()
            .configure_sets(
                Update,
                (HeroSet::Input, HeroSet::Locomotion, HeroSet::Abilities).chain(),
            )
            .add_observer(input::bind_actions)
            .add_observer(input::jump_input)
            .add_observer(input::power1_input)
            .add_observer(input::power2_input)
            .add_systems(Update, input::gather_intent.in_set(HeroSet::Input))
            .add_systems(
                Update,
                (movement::handle_jump, movement::locomotion)
                    .chain()
                    .in_set(HeroSet::Locomotion),
            );
    }
}
