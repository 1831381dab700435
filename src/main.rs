use anyhow::Result;
use log::{info, warn};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use castle_brawl::engine::assets::{AssetLoader, AssetManager};
use castle_brawl::engine::game_loop::GameLoop;
use castle_brawl::engine::input::InputDispatcher;
use castle_brawl::game::{DrawList, MatchState, StageConfig};

const TITLE: &str = "Castle Brawl";

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting {}...", TITLE);

    let stage = StageConfig::DEFAULT;
    let loader = AssetLoader::from_env();
    info!("Loading sprite sheets from {}", loader.base_path().display());
    match loader.list_sheets() {
        Ok(sheets) => info!("Found {} sheet files", sheets.len()),
        Err(e) => warn!("Cannot list {}: {}", loader.base_path().display(), e),
    }
    let mut assets = AssetManager::with_loader(loader);
    let mut state = MatchState::load(&mut assets, stage);

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(TITLE)
        .with_inner_size(winit::dpi::LogicalSize::new(stage.width, stage.height))
        .with_resizable(false)
        .build(&event_loop)?;

    info!("Window created successfully");

    let mut dispatcher = InputDispatcher::default();
    let mut game_loop = GameLoop::new();
    let mut frame = DrawList::new();
    let mut title = String::new();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!(
                    "Close requested after {} ticks over {} frames, shutting down...",
                    game_loop.tick_count(),
                    game_loop.frame_count()
                );
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                dispatcher.process_keyboard_event(&event, &mut state);
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(focused),
                ..
            } => {
                if focused {
                    game_loop.resume();
                } else {
                    // Key-up events are lost while unfocused
                    dispatcher.reset(&mut state);
                    game_loop.pause();
                }
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                for _ in 0..game_loop.begin_frame() {
                    state.update();
                }

                // No rasterizer yet: the HUD text goes to the title bar
                frame.clear();
                state.draw(&mut frame);
                let hud = frame.texts().collect::<Vec<_>>().join("  |  ");
                let next = format!("{}  -  {}", TITLE, hud);
                if next != title {
                    window.set_title(&next);
                    title = next;
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
