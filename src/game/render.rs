// Render collaborator
//
// The match never rasterizes anything itself. Each frame it walks its state
// and issues draw calls against a `Renderer`; `DrawList` records them.

use glam::IVec2;
use image::Rgba;

use crate::core::math::Rect;
use crate::engine::sprite::Bitmap;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const HEALTH_BACK: Rgba<u8> = Rgba([139, 69, 19, 255]);
pub const P1_HEALTH: Rgba<u8> = Rgba([255, 215, 0, 255]);
pub const P2_HEALTH: Rgba<u8> = Rgba([255, 69, 0, 255]);
pub const BODY_OUTLINE: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const HURTBOX: Rgba<u8> = Rgba([0, 160, 255, 255]);
pub const WEAPON: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const PUNCH: Rgba<u8> = Rgba([255, 128, 0, 255]);
pub const STREAM: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// Drawing primitives the match needs
pub trait Renderer {
    /// Blit a bitmap with its top-left corner at `origin`
    fn draw_sprite(&mut self, bitmap: &Bitmap, origin: IVec2);
    fn draw_rect(&mut self, rect: Rect, color: Rgba<u8>, filled: bool);
    /// Plot individual scene pixels
    fn draw_points(&mut self, points: &[IVec2], color: Rgba<u8>);
    fn draw_text(&mut self, text: &str, origin: IVec2, color: Rgba<u8>);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite { origin: IVec2, size: IVec2 },
    Rect { rect: Rect, color: Rgba<u8>, filled: bool },
    Points { points: Vec<IVec2>, color: Rgba<u8> },
    Text { text: String, origin: IVec2, color: Rgba<u8> },
}

/// Renderer that keeps every call in order
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count()
    }

    /// Every text string, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Renderer for DrawList {
    fn draw_sprite(&mut self, bitmap: &Bitmap, origin: IVec2) {
        self.commands.push(DrawCommand::Sprite {
            origin,
            size: IVec2::new(bitmap.width() as i32, bitmap.height() as i32),
        });
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgba<u8>, filled: bool) {
        self.commands.push(DrawCommand::Rect {
            rect,
            color,
            filled,
        });
    }

    fn draw_points(&mut self, points: &[IVec2], color: Rgba<u8>) {
        self.commands.push(DrawCommand::Points {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_text(&mut self, text: &str, origin: IVec2, color: Rgba<u8>) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            color,
        });
    }
}
