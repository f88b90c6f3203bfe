use bevy::prelude::*;

/// Playback state of an effect handle. The controller only flips this state;
/// whatever render layer sits on top decides how to draw emission.
///
/// Activation/deactivation of a handle is expressed through [`Visibility`] on
/// the same entity.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct ParticleFx {
    pub playing: bool,
}

impl ParticleFx {
    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Stop-and-clear followed by play, as a single state change.
    pub fn restart(&mut self) {
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Marker for smoke instances spawned while hovering. Each hover invocation
/// spawns its own instance as a child of the avatar and despawns it when the
/// hover ends; a render layer can observe `OnAdd` to dress the entity.
#[derive(Component, Debug)]
pub struct HoverSmoke;

/// Stand-in for the smoke prefab slot. Presence in the rig means a smoke
/// instance gets spawned per hover; absence skips it silently.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmokePrefab;
