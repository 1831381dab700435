// Castle Brawl - a two-fighter 2D brawler with pixel-accurate sprite collision

pub mod core;
pub mod engine;
pub mod game;
