// Stage dimensions

/// The arena every fight takes place in, in scene pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
    pub width: i32,
    pub height: i32,
    /// Stage floor line, before each fighter's own floor offset
    pub floor_y: i32,
    /// How far past either edge a projectile may travel before it despawns
    pub offstage_margin: i32,
}

impl StageConfig {
    pub const DEFAULT: StageConfig = StageConfig {
        width: 1550,
        height: 840,
        floor_y: 802,
        offstage_margin: 50,
    };

    pub fn floor(&self) -> f32 {
        self.floor_y as f32
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
