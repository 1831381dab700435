// Input handling system
//
// Keyboard edges are translated into fighter intents. Nothing here advances
// simulation time: intents only set flags that the next tick consumes.
//
// - `action`: game actions, fighter sides and default key bindings
// - `config`: key binding table and remapping
// - `manager`: dispatcher that turns key events into intent calls

pub mod action;
pub mod config;
pub mod manager;

pub use action::{Action, InputSource, Side};
pub use config::KeyBindings;
pub use manager::{InputDispatcher, IntentSink};
