// Fighters
//
// A fighter is a capability-parameterized entity: every archetype shares
// movement, blocking, hit reactions and a standard attack, and carries one
// secondary attack picked by its configuration.
// - config: archetype presets and calibration constants
// - state: the single phase a fighter occupies each tick
// - animation: tick-based frame cursors
// - special: fireball and flameblast sub-machines
// - sprites: frame sets cut from each archetype's sheets
// - character: the combatant itself

pub mod animation;
pub mod character;
pub mod config;
pub mod special;
pub mod sprites;
pub mod state;

#[cfg(test)]
pub(crate) mod fixtures;

pub use animation::FrameCursor;
pub use character::{Combatant, EffectSprite, Launch, Weapon};
pub use config::{
    Archetype, FighterConfig, FireballConfig, FlameblastConfig, MeleeShape, ProjectileConfig,
    SpecialMove, BOWSER, MARIO,
};
pub use special::FireballTick;
pub use sprites::FighterSprites;
pub use state::{AttackPhase, FlameblastPhase, HitPhase, Phase, PhaseKind, SpecialPhase};
