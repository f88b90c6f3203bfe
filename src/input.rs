use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

/// Input context active while controlling the avatar.
#[derive(InputContext)]
pub struct HeroContext;

#[derive(Debug, Clone, Copy, InputAction)]
#[input_action(output = Vec2)]
pub struct Move;

#[derive(Debug, Clone, Copy, InputAction)]
#[input_action(output = bool)]
pub struct Sprint;

#[derive(Debug, Clone, Copy, InputAction)]
#[input_action(output = bool)]
pub struct Jump;

#[derive(Debug, Clone, Copy, InputAction)]
#[input_action(output = bool)]
pub struct Power1;

#[derive(Debug, Clone, Copy, InputAction)]
#[input_action(output = bool)]
pub struct Power2;

/// Latched movement intent, refreshed once per tick from the bound actions.
/// The locomotion system reads this instead of the raw action state, so a
/// headless world can drive an avatar by writing it directly.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct MovementIntent {
    pub move_axis: Vec2,
    pub sprint_held: bool,
}

/// A jump was requested for `avatar`. Whether it happens is decided by the
/// locomotion side (grounded gate).
#[derive(Event, Debug, Clone, Copy)]
pub struct JumpRequested {
    pub avatar: Entity,
}

/// Emitted by locomotion after a jump actually happened.
#[derive(Event, Debug, Clone, Copy)]
pub struct Jumped {
    pub avatar: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    Projectile,
    Hover,
}

/// One of the two powers was triggered for `avatar`.
#[derive(Event, Debug, Clone, Copy)]
pub struct PowerTriggered {
    pub avatar: Entity,
    pub power: Power,
}

pub(crate) fn bind_actions(
    trigger: Trigger<OnAdd, Actions<HeroContext>>,
    mut heroes: Query<&mut Actions<HeroContext>>,
) {
    let Ok(mut actions) = heroes.get_mut(trigger.target()) else {
        return;
    };
    actions.bind::<Move>().to(Cardinal::wasd_keys());
    actions.bind::<Sprint>().to(KeyCode::ShiftLeft);
    actions.bind::<Jump>().to(KeyCode::Space);
    actions.bind::<Power1>().to(KeyCode::KeyE);
    actions.bind::<Power2>().to(KeyCode::KeyR);
}

/// Latch the continuous actions into [`MovementIntent`]. A released `Move`
/// reads back as zero, which is exactly the "cleared on release" contract.
pub(crate) fn gather_intent(mut heroes: Query<(&Actions<HeroContext>, &mut MovementIntent)>) {
    for (actions, mut intent) in &mut heroes {
        intent.move_axis = actions.value::<Move>().unwrap();
        let sprint = actions.state::<Sprint>().unwrap();
        intent.sprint_held = sprint == ActionState::Fired || sprint == ActionState::Ongoing;
    }
}

pub(crate) fn jump_input(
    trigger: Trigger<Fired<Jump>>,
    mut requests: EventWriter<JumpRequested>,
) {
    requests.write(JumpRequested {
        avatar: trigger.target(),
    });
}

pub(crate) fn power1_input(
    trigger: Trigger<Fired<Power1>>,
    mut triggers: EventWriter<PowerTriggered>,
) {
    triggers.write(PowerTriggered {
        avatar: trigger.target(),
        power: Power::Projectile,
    });
}

pub(crate) fn power2_input(
    trigger: Trigger<Fired<Power2>>,
    mut triggers: EventWriter<PowerTriggered>,
) {
    triggers.write(PowerTriggered {
        avatar: trigger.target(),
        power: Power::Hover,
    });
}
