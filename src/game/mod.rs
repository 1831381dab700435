// Game logic: fighters, projectiles, combat and the match that ties them together

pub mod characters;
pub mod combat;
pub mod match_state;
pub mod projectiles;
pub mod render;
pub mod stage;

pub use combat::{CombatResolver, HitEvent, HitKind};
pub use match_state::MatchState;
pub use projectiles::{Projectile, ProjectileId, ProjectileManager};
pub use render::{DrawCommand, DrawList, Renderer};
pub use stage::StageConfig;
