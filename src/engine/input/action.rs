// Game action definitions and mappings

use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Jump,

    // Combat
    Attack,
    Special,
    Heavy,
    Block,

    // Debug tooling
    ToggleDebug,
    ToggleFreeze,
}

impl Action {
    /// Actions that belong to the match rather than to a fighter
    pub fn is_global(&self) -> bool {
        matches!(self, Action::ToggleDebug | Action::ToggleFreeze)
    }
}

/// One of the two fighter slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    P1,
    P2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];

    pub fn index(self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }
}

/// Represents an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default keyboard bindings for player 1 (WASD cluster)
pub fn default_p1_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
        (InputSource::key(KeyCode::KeyD), Action::MoveRight),
        (InputSource::key(KeyCode::KeyW), Action::Jump),
        (InputSource::key(KeyCode::KeyZ), Action::Attack),
        (InputSource::key(KeyCode::KeyX), Action::Special),
        (InputSource::key(KeyCode::KeyC), Action::Block),
    ]
}

/// Default keyboard bindings for player 2 (arrows plus the punctuation row)
pub fn default_p2_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::ArrowLeft), Action::MoveLeft),
        (InputSource::key(KeyCode::ArrowRight), Action::MoveRight),
        (InputSource::key(KeyCode::ArrowUp), Action::Jump),
        (InputSource::key(KeyCode::Slash), Action::Attack),
        (InputSource::key(KeyCode::Period), Action::Heavy),
        (InputSource::key(KeyCode::Comma), Action::Block),
    ]
}

/// Global bindings (not player-specific)
pub fn global_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::Digit1), Action::ToggleDebug),
        (InputSource::key(KeyCode::Digit2), Action::ToggleFreeze),
    ]
}
