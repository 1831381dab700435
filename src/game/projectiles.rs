// Projectiles - launched fireballs and their lifetimes

use glam::Vec2;
use log::trace;

use crate::core::math::{to_pixel, Rect};
use crate::engine::input::Side;
use crate::engine::sprite::{AnimationFrame, Bitmap, FrameSet, Mask};
use crate::game::characters::{FrameCursor, ProjectileConfig};
use crate::game::stage::StageConfig;

pub type ProjectileId = u32;

/// A single travelling shot
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    pub owner: Side,
    position: Vec2,
    /// +1 right, -1 left
    direction: f32,
    config: ProjectileConfig,
    frames: FrameSet,
    cursor: FrameCursor,
    alive: bool,
}

impl Projectile {
    fn new(
        id: ProjectileId,
        owner: Side,
        origin: Vec2,
        direction: f32,
        frames: FrameSet,
        config: ProjectileConfig,
    ) -> Self {
        Self {
            id,
            owner,
            position: origin,
            direction: direction.signum(),
            config,
            frames,
            cursor: FrameCursor::new(config.frame_ticks),
            alive: true,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    fn frame(&self) -> Option<&AnimationFrame> {
        self.cursor.frame(&self.frames)
    }

    /// Frames are authored facing right
    fn mirror(&self) -> bool {
        self.direction < 0.0
    }

    /// Current frame, oriented along the direction of travel
    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.frame().map(|frame| frame.oriented(self.mirror()))
    }

    /// Current silhouette, aligned with `hitbox().origin()`
    pub fn mask(&self) -> Option<&Mask> {
        self.frame()?.oriented_silhouette(self.mirror())
    }

    /// Frame-sized box around the centre, or the fallback size without art
    pub fn hitbox(&self) -> Rect {
        let fallback = self.config.fallback_size;
        let (width, height) = self
            .frame()
            .map_or((fallback.x, fallback.y), |frame| {
                (frame.width() as i32, frame.height() as i32)
            });
        Rect::new(
            to_pixel(self.position.x - width as f32 / 2.0),
            to_pixel(self.position.y - height as f32 / 2.0),
            width,
            height,
        )
    }

    fn tick(&mut self, stage: &StageConfig) {
        if !self.alive {
            return;
        }
        self.position.x += self.config.speed * self.direction;
        self.cursor.cycle(self.frames.len());

        let hitbox = self.hitbox();
        let margin = stage.offstage_margin;
        if hitbox.left() >= stage.width + margin || hitbox.right() <= -margin {
            trace!("Projectile {} left the stage at x={}", self.id, self.position.x);
            self.alive = false;
        }
    }
}

/// Owns every projectile in flight
#[derive(Debug, Default)]
pub struct ProjectileManager {
    projectiles: Vec<Projectile>,
    next_id: ProjectileId,
}

impl ProjectileManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch a projectile from `origin`, travelling along `direction`
    pub fn spawn(
        &mut self,
        origin: Vec2,
        direction: f32,
        owner: Side,
        frames: FrameSet,
        config: ProjectileConfig,
    ) -> ProjectileId {
        let id = self.next_id;
        self.next_id += 1;
        self.projectiles
            .push(Projectile::new(id, owner, origin, direction, frames, config));
        id
    }

    /// Advance every live projectile one tick
    pub fn tick(&mut self, stage: &StageConfig) {
        for projectile in &mut self.projectiles {
            projectile.tick(stage);
        }
    }

    /// Drop a projectile, returning it if it was present
    pub fn remove(&mut self, id: ProjectileId) -> Option<Projectile> {
        let index = self.projectiles.iter().position(|p| p.id == id)?;
        Some(self.projectiles.remove(index))
    }

    /// Drop every projectile that has left the stage
    pub fn prune(&mut self) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(Projectile::is_alive);
        before - self.projectiles.len()
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}
