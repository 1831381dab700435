// Input dispatcher - turns key edges into fighter intents

use super::action::{Action, InputSource, Side};
use super::config::KeyBindings;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Receiver of intent calls, implemented by the match
pub trait IntentSink {
    /// -1 left, 0 idle, 1 right
    fn set_horizontal_intent(&mut self, side: Side, direction: i8);
    fn request_jump(&mut self, side: Side);
    fn request_attack(&mut self, side: Side);
    fn request_special(&mut self, side: Side);
    fn set_blocking(&mut self, side: Side, blocking: bool);
    fn request_heavy_charge_start(&mut self, side: Side);
    fn request_heavy_cancel(&mut self, side: Side);
    /// The debug key is a hold, timed by the receiver
    fn set_debug_held(&mut self, held: bool);
    fn toggle_freeze(&mut self);
}

/// Routes keyboard edges through the binding table to an `IntentSink`
pub struct InputDispatcher {
    bindings: KeyBindings,

    /// Last horizontal direction pressed per side
    held: [i8; 2],
}

impl InputDispatcher {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings, held: [0; 2] }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent, sink: &mut impl IntentSink) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = event.physical_key {
            match event.state {
                // Auto-repeat is not a new press
                ElementState::Pressed if event.repeat => {}
                ElementState::Pressed => self.key_down(key_code, sink),
                ElementState::Released => self.key_up(key_code, sink),
            }
        }
    }

    pub fn key_down(&mut self, key: KeyCode, sink: &mut impl IntentSink) {
        let Some((side, action)) = self.bindings.get(InputSource::key(key)) else {
            return;
        };
        if action.is_global() {
            match action {
                Action::ToggleDebug => sink.set_debug_held(true),
                Action::ToggleFreeze => sink.toggle_freeze(),
                _ => {}
            }
            return;
        }
        let Some(side) = side else {
            return;
        };

        match action {
            Action::MoveLeft => self.steer(side, -1, sink),
            Action::MoveRight => self.steer(side, 1, sink),
            Action::Jump => sink.request_jump(side),
            Action::Attack => sink.request_attack(side),
            Action::Special => sink.request_special(side),
            Action::Block => sink.set_blocking(side, true),
            Action::Heavy => {
                // A second press during the stream cancels it; a fresh charge
                // is refused while the heavy attack is still running
                sink.request_heavy_charge_start(side);
                sink.request_heavy_cancel(side);
            }
            Action::ToggleDebug | Action::ToggleFreeze => {}
        }
    }

    pub fn key_up(&mut self, key: KeyCode, sink: &mut impl IntentSink) {
        let Some((side, action)) = self.bindings.get(InputSource::key(key)) else {
            return;
        };
        if action == Action::ToggleDebug {
            sink.set_debug_held(false);
            return;
        }
        let Some(side) = side else {
            return;
        };

        match action {
            // Releasing a direction only stops movement in that direction
            Action::MoveLeft if self.held[side.index()] < 0 => self.steer(side, 0, sink),
            Action::MoveRight if self.held[side.index()] > 0 => self.steer(side, 0, sink),
            Action::Block => sink.set_blocking(side, false),
            Action::Heavy => sink.request_heavy_cancel(side),
            _ => {}
        }
    }

    fn steer(&mut self, side: Side, direction: i8, sink: &mut impl IntentSink) {
        self.held[side.index()] = direction;
        sink.set_horizontal_intent(side, direction);
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    /// Forget held keys, e.g. after focus loss
    pub fn reset(&mut self, sink: &mut impl IntentSink) {
        sink.set_debug_held(false);
        for side in Side::BOTH {
            if self.held[side.index()] != 0 {
                self.steer(side, 0, sink);
            }
        }
    }
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new(KeyBindings::defaults())
    }
}
