use std::collections::HashMap;

use bevy::prelude::*;

/// Parameter sink for the animation layer.
///
/// The controller writes floats, bools and one-shot triggers here and never
/// reads them back; a playback system (or a test) consumes them. An avatar
/// without this component simply produces no animation output.
#[derive(Component, Default, Debug)]
pub struct AnimatorParams {
    floats: HashMap<&'static str, f32>,
    bools: HashMap<&'static str, bool>,
    triggers: Vec<&'static str>,
}

impl AnimatorParams {
    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    pub fn set_trigger(&mut self, name: &'static str) {
        self.triggers.push(name);
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }

    /// Drain pending triggers, oldest first. The playback layer calls this
    /// once per frame; triggers left unconsumed stay queued.
    pub fn take_triggers(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.triggers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_overwrite_and_read_back() {
        let mut animator = AnimatorParams::default();
        animator.set_float("Speed", 3.0);
        animator.set_float("Speed", 6.0);
        animator.set_bool("IsGrounded", true);

        assert_eq!(animator.float("Speed"), Some(6.0));
        assert_eq!(animator.flag("IsGrounded"), Some(true));
        assert_eq!(animator.float("Missing"), None);
    }

    #[test]
    fn triggers_drain_in_order() {
        let mut animator = AnimatorParams::default();
        animator.set_trigger("Jump");
        animator.set_trigger("Power1");

        assert_eq!(animator.take_triggers(), vec!["Jump", "Power1"]);
        assert!(animator.take_triggers().is_empty());
    }
}
