// Key binding table and remapping

use super::action::{self, Action, InputSource, Side};
use std::collections::HashMap;

/// Where a key event is routed
pub type Binding = (Option<Side>, Action);

/// Maps input sources to a fighter slot and action.
/// Global actions carry no side.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    bindings: HashMap<InputSource, Binding>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock two-player layout on one keyboard
    pub fn defaults() -> Self {
        let mut bindings = Self::new();
        for (source, action) in action::default_p1_bindings() {
            bindings.bind(source, Some(Side::P1), action);
        }
        for (source, action) in action::default_p2_bindings() {
            bindings.bind(source, Some(Side::P2), action);
        }
        for (source, action) in action::global_bindings() {
            bindings.bind(source, None, action);
        }
        bindings
    }

    /// Bind a source, replacing whatever it was bound to
    pub fn bind(&mut self, source: InputSource, side: Option<Side>, action: Action) {
        self.bindings.insert(source, (side, action));
    }

    pub fn get(&self, source: InputSource) -> Option<Binding> {
        self.bindings.get(&source).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_defaults_route_both_sides() {
        let bindings = KeyBindings::defaults();
        assert_eq!(
            bindings.get(InputSource::key(KeyCode::KeyZ)),
            Some((Some(Side::P1), Action::Attack))
        );
        assert_eq!(
            bindings.get(InputSource::key(KeyCode::Period)),
            Some((Some(Side::P2), Action::Heavy))
        );
        assert_eq!(
            bindings.get(InputSource::key(KeyCode::Digit1)),
            Some((None, Action::ToggleDebug))
        );
    }

    #[test]
    fn test_rebind_source() {
        let mut bindings = KeyBindings::new();
        let source = InputSource::key(KeyCode::KeyJ);

        bindings.bind(source, Some(Side::P1), Action::Attack);
        bindings.bind(source, Some(Side::P2), Action::Block);

        assert_eq!(bindings.get(source), Some((Some(Side::P2), Action::Block)));
        assert_eq!(bindings.len(), 1);
    }
}
