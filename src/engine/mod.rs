// Engine modules: sprites, assets, input, timing

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod sprite;
