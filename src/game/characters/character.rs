// Combatant - one fighter's body, intents and phase machine

use glam::{IVec2, Vec2};
use log::debug;

use super::animation::{clamped, FrameCursor};
use super::config::{FighterConfig, MeleeShape, ProjectileConfig, FALLBACK_FRAME_SIZE};
use super::sprites::FighterSprites;
use super::state::{AttackPhase, FlameblastPhase, HitPhase, Phase, SpecialPhase};
use crate::core::math::{to_pixel, Rect};
use crate::engine::sprite::{AnimationFrame, Bitmap, FrameSet, Mask};

/// A projectile the fighter wants launched this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub origin: Vec2,
    /// +1 to the right, -1 to the left
    pub direction: f32,
}

/// Damaging region of a standard attack in its active window
#[derive(Debug, Clone, PartialEq)]
pub enum Weapon {
    /// Pixel mask with its top-left corner in scene pixels
    Mask { mask: Mask, origin: IVec2 },
    Rect(Rect),
}

/// Overlay drawn beside the body
#[derive(Debug, Clone, Copy)]
pub struct EffectSprite<'a> {
    pub bitmap: &'a Bitmap,
    pub origin: IVec2,
}

/// One fighter in a match.
///
/// Position is the sprite centre in scene pixels. Intents arrive between
/// ticks and only ever request a phase; `update` does all the advancing.
#[derive(Debug, Clone)]
pub struct Combatant {
    config: FighterConfig,
    sprites: FighterSprites,
    position: Vec2,
    velocity: Vec2,
    facing_right: bool,
    health: f32,
    phase: Phase,
    grounded: bool,
    horizontal_intent: i8,
    idle: FrameCursor,
    floor_y: f32,
}

impl Combatant {
    /// Create a fighter standing on the stage floor at its spawn x
    pub fn new(config: FighterConfig, sprites: FighterSprites, stage_floor_y: f32) -> Self {
        let floor_y = stage_floor_y + config.floor_offset;
        let mut combatant = Self {
            config,
            sprites,
            position: Vec2::new(config.spawn_x, floor_y),
            velocity: Vec2::ZERO,
            facing_right: config.art_faces_right,
            health: config.max_health,
            phase: Phase::Standing,
            grounded: true,
            horizontal_intent: 0,
            idle: FrameCursor::new(config.timing.stand),
            floor_y,
        };
        combatant.position.y = floor_y - combatant.half_size().y;
        combatant
    }

    pub fn config(&self) -> &FighterConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        self.config.name
    }

    pub fn sprites(&self) -> &FighterSprites {
        &self.sprites
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Move horizontally without touching velocity or phase
    pub fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    /// Turn to face a point on the stage
    pub fn face_towards(&mut self, x: f32) {
        self.facing_right = x >= self.position.x;
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.config.max_health
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self.phase, Phase::Blocking(_))
    }

    pub fn is_charging(&self) -> bool {
        self.phase.is_charging()
    }

    /// Lower edge of the sprite
    pub fn feet_y(&self) -> f32 {
        self.position.y + self.half_size().y
    }

    // Intents

    /// -1 left, 0 still, +1 right. Stored even while movement is locked.
    pub fn set_horizontal_intent(&mut self, direction: i8) {
        self.horizontal_intent = direction.signum();
    }

    pub fn request_jump(&mut self) {
        if self.grounded && !matches!(self.phase, Phase::PlayingHit(_)) {
            self.velocity.y = -self.config.jump_impulse;
            self.grounded = false;
        }
    }

    /// Start (or restart) the standard attack
    pub fn request_attack(&mut self) {
        if !self.phase.accepts_action() {
            return;
        }
        debug!("{} attacks", self.name());
        self.change_phase(Phase::Attacking(AttackPhase {
            cursor: FrameCursor::new(self.config.timing.attack),
            has_hit: false,
            anchor_feet_y: None,
        }));
    }

    /// Begin charging a fireball, if this fighter carries one
    pub fn request_special(&mut self) {
        let Some(fireball) = self.config.fireball() else {
            return;
        };
        if !self.phase.accepts_action() {
            return;
        }
        debug!("{} charges a fireball", self.name());
        let phase = Phase::Special(SpecialPhase::begin(fireball));
        self.change_phase(phase);
    }

    /// Begin a flameblast, if this fighter carries one
    pub fn request_heavy_charge_start(&mut self) {
        let Some(flameblast) = self.config.flameblast() else {
            return;
        };
        if !self.phase.accepts_action() {
            return;
        }
        debug!("{} charges a flameblast", self.name());
        let phase = Phase::Flameblast(FlameblastPhase::begin(flameblast));
        self.change_phase(phase);
    }

    /// Cut an active flame stream short
    pub fn request_heavy_cancel(&mut self) {
        if self.phase.is_streaming() {
            debug!("{} cancels the flame stream", self.name());
            self.end_flameblast();
        }
    }

    pub fn set_blocking(&mut self, blocking: bool) {
        if blocking {
            let refused = self.phase.is_stunned() || matches!(self.phase, Phase::Flameblast(_));
            if refused || self.is_blocking() {
                return;
            }
            let cursor = FrameCursor::new(self.config.timing.block);
            self.change_phase(Phase::Blocking(cursor));
        } else if self.is_blocking() {
            self.enter_standing();
        }
    }

    // Damage

    /// Apply a discrete hit and enter the hit reaction
    pub fn take_hit(&mut self, damage: f32, hitstun: u32) {
        self.health = (self.health - damage).max(0.0);
        let phase = Phase::PlayingHit(HitPhase {
            cursor: FrameCursor::new(self.config.timing.hit),
            stun_remaining: hitstun,
            linger_remaining: self.config.hitstun_linger,
        });
        self.change_phase(phase);
    }

    /// Apply one tick of continuous damage. A running hit reaction keeps its
    /// animation and only has its lockout topped up.
    pub fn take_stream_damage(&mut self, damage: f32, hitstun: u32) {
        if let Phase::PlayingHit(hit) = &mut self.phase {
            self.health = (self.health - damage).max(0.0);
            hit.stun_remaining = hit.stun_remaining.max(hitstun);
            hit.linger_remaining = self.config.hitstun_linger;
        } else {
            self.take_hit(damage, hitstun);
        }
    }

    /// Whether the current swing has already connected
    pub fn attack_has_hit(&self) -> bool {
        matches!(self.phase, Phase::Attacking(AttackPhase { has_hit: true, .. }))
    }

    pub fn mark_hit(&mut self) {
        if let Phase::Attacking(attack) = &mut self.phase {
            attack.has_hit = true;
        }
    }

    /// Tear down the flameblast and everything around it
    pub fn end_flameblast(&mut self) {
        self.velocity.x = 0.0;
        self.enter_standing();
    }

    // Simulation

    /// Advance one tick against an opponent standing at `opponent_x`
    pub fn update(&mut self, opponent_x: f32) -> Option<Launch> {
        if !self.phase.locks_facing() {
            self.face_towards(opponent_x);
        }

        if !self.grounded {
            self.velocity.y += self.config.gravity;
        }
        self.velocity.x = if self.phase.is_stunned() || self.phase.is_streaming() {
            0.0
        } else {
            f32::from(self.horizontal_intent) * self.config.move_speed
        };
        self.position += self.velocity;

        let half_height = self.half_size().y;
        if self.position.y + half_height >= self.floor_y {
            self.position.y = self.floor_y - half_height;
            self.velocity.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        let feet = self.feet_y();
        let launch = self.advance_phase();
        self.keep_feet(feet);
        launch
    }

    fn advance_phase(&mut self) -> Option<Launch> {
        let timing = self.config.timing;
        match self.phase {
            Phase::Standing => self.idle.cycle(self.sprites.stand.len()),
            Phase::Blocking(mut cursor) => {
                cursor.hold_last(self.sprites.block.len());
                self.phase = Phase::Blocking(cursor);
            }
            Phase::PlayingHit(mut hit) => {
                hit.cursor.hold_last(self.sprites.hit.len());
                if hit.stun_remaining > 0 {
                    hit.stun_remaining -= 1;
                } else if hit.linger_remaining > 0 {
                    hit.linger_remaining -= 1;
                } else {
                    debug!("{} recovers", self.name());
                    self.enter_standing();
                    return None;
                }
                self.phase = Phase::PlayingHit(hit);
            }
            Phase::Special(special) => {
                let Some(fireball) = self.config.fireball() else {
                    self.enter_standing();
                    return None;
                };
                let step = special.tick(fireball, &self.sprites);
                match step.next {
                    Some(next) => self.phase = Phase::Special(next),
                    None => self.enter_standing(),
                }
                if step.fire {
                    debug!("{} releases a fireball", self.name());
                    return Some(Launch {
                        origin: self.position,
                        direction: self.direction(),
                    });
                }
            }
            Phase::Flameblast(flameblast) => {
                let Some(config) = self.config.flameblast() else {
                    self.enter_standing();
                    return None;
                };
                match flameblast.tick(config, &self.sprites) {
                    Some(next) => self.phase = Phase::Flameblast(next),
                    None => self.end_flameblast(),
                }
            }
            Phase::Attacking(mut attack) => {
                if attack.cursor.play_once(self.sprites.attack.len()) {
                    self.idle = FrameCursor::new(timing.stand);
                    self.phase = Phase::Standing;
                } else {
                    self.phase = Phase::Attacking(attack);
                }
            }
        }
        None
    }

    fn enter_standing(&mut self) {
        self.idle = FrameCursor::new(self.config.timing.stand);
        self.change_phase(Phase::Standing);
    }

    /// Swap phase without moving the feet
    fn change_phase(&mut self, phase: Phase) {
        let feet = self.feet_y();
        self.phase = phase;
        self.keep_feet(feet);
    }

    /// Re-centre the current frame on a feet line. Attacks pin the feet to
    /// the line recorded on their first frame.
    fn keep_feet(&mut self, feet: f32) {
        let half_height = self.half_size().y;
        self.position.y = feet - half_height;
        if let Phase::Attacking(attack) = &mut self.phase {
            let anchor = *attack.anchor_feet_y.get_or_insert(feet);
            self.velocity.y = 0.0;
            self.position.y = anchor - half_height;
        }
    }

    fn direction(&self) -> f32 {
        if self.facing_right {
            1.0
        } else {
            -1.0
        }
    }

    // Presentation and collision surfaces

    /// Whether frames are drawn flipped from their source art
    pub fn mirror(&self) -> bool {
        self.facing_right != self.config.art_faces_right
    }

    fn phase_frame(&self) -> Option<&AnimationFrame> {
        let sprites = &self.sprites;
        match &self.phase {
            Phase::Standing => self.idle.frame(&sprites.stand),
            Phase::Blocking(cursor) => cursor.frame(&sprites.block),
            Phase::PlayingHit(hit) => hit.cursor.frame(&sprites.hit),
            Phase::Attacking(attack) => attack.cursor.frame(&sprites.attack),
            Phase::Special(SpecialPhase::Charging { cursor, .. }) => {
                cursor.frame(&sprites.special_charge)
            }
            Phase::Special(SpecialPhase::Releasing { cursor, .. }) => {
                cursor.frame(&sprites.special_release)
            }
            Phase::Flameblast(
                FlameblastPhase::Charging { cursor, .. } | FlameblastPhase::Charge { cursor },
            ) => cursor.frame(&sprites.special_charge),
            Phase::Flameblast(FlameblastPhase::Release { cursor }) => {
                cursor.frame(&sprites.special_release)
            }
            Phase::Flameblast(FlameblastPhase::Stream { .. }) => {
                let body = self.config.flameblast().map_or(0, |f| f.stream_body_frame);
                clamped(&sprites.special_release, body)
            }
        }
    }

    /// The frame for the current phase, or the idle pose when that set is empty
    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        self.phase_frame()
            .or_else(|| self.idle.frame(&self.sprites.stand))
    }

    /// Current frame as it should appear on screen
    pub fn oriented_bitmap(&self) -> Option<&Bitmap> {
        self.current_frame().map(|frame| frame.oriented(self.mirror()))
    }

    pub fn frame_size(&self) -> IVec2 {
        self.current_frame()
            .map(|frame| IVec2::new(frame.width() as i32, frame.height() as i32))
            .unwrap_or(FALLBACK_FRAME_SIZE)
    }

    fn half_size(&self) -> Vec2 {
        self.frame_size().as_vec2() / 2.0
    }

    /// Top-left of the drawn frame
    pub fn frame_origin(&self) -> IVec2 {
        let half = self.half_size();
        IVec2::new(
            to_pixel(self.position.x - half.x),
            to_pixel(self.position.y - half.y),
        )
    }

    /// Frame-sized body box, shifted forward while blocking
    pub fn hurtbox(&self) -> Rect {
        let size = self.frame_size();
        let half = size.as_vec2() / 2.0;
        let offset = self.config.box_offset.as_vec2();
        let nudge = if self.is_blocking() {
            self.config.block_nudge.for_facing(self.facing_right) as f32
        } else {
            0.0
        };
        Rect::new(
            to_pixel(self.position.x - half.x + offset.x + nudge),
            to_pixel(self.position.y - half.y + offset.y),
            size.x,
            size.y,
        )
    }

    /// Hurtbox trimmed to the visible silhouette
    pub fn tight_hurtbox(&self) -> Rect {
        let hurtbox = self.hurtbox();
        self.current_frame()
            .and_then(|frame| frame.oriented_silhouette(self.mirror()))
            .and_then(Mask::bounding_rect)
            .map_or(hurtbox, |bounds| bounds.translated(hurtbox.origin()))
    }

    /// Body silhouette placed at the hurtbox origin
    pub fn body_mask(&self) -> Option<(&Mask, IVec2)> {
        let mask = self
            .current_frame()?
            .oriented_silhouette(self.mirror())?;
        Some((mask, self.hurtbox().origin()))
    }

    /// Damaging region, present only late enough into a swing
    pub fn weapon(&self) -> Option<Weapon> {
        let Phase::Attacking(attack) = &self.phase else {
            return None;
        };
        let melee = &self.config.melee;
        let len = self.sprites.attack.len();
        if attack.cursor.index() < (melee.active_ratio * len as f32) as usize {
            return None;
        }
        match melee.shape {
            MeleeShape::WeaponMask {
                color,
                tolerance,
                offset_facing_right,
                offset_facing_left,
            } => {
                let bitmap = attack
                    .cursor
                    .frame(&self.sprites.attack)?
                    .oriented(self.mirror());
                let mask = match Mask::from_color(bitmap, color, tolerance) {
                    Ok(mask) if !mask.is_clear() => mask,
                    _ => Mask::from_alpha(bitmap).ok()?,
                };
                let offset = if self.facing_right {
                    offset_facing_right
                } else {
                    offset_facing_left
                }
                .as_vec2();
                let half = self.half_size();
                let origin = IVec2::new(
                    to_pixel(self.position.x - half.x + offset.x),
                    to_pixel(self.position.y - half.y + offset.y),
                );
                Some(Weapon::Mask { mask, origin })
            }
            MeleeShape::ForwardBox {
                width_ratio,
                height_ratio,
                forward_ratio,
                lift,
            } => {
                let half = self.half_size();
                let width = (half.x * width_ratio) as i32;
                let height = (half.y * height_ratio) as i32;
                let forward = half.x * forward_ratio * self.direction();
                Some(Weapon::Rect(Rect::new(
                    to_pixel(self.position.x + forward - width as f32 / 2.0),
                    to_pixel(self.position.y - height as f32 / 2.0) - lift,
                    width,
                    height,
                )))
            }
        }
    }

    /// Flame stream hitbox, present only while streaming
    pub fn stream_hitbox(&self) -> Option<Rect> {
        if !self.phase.is_streaming() {
            return None;
        }
        let hitbox = self.config.flameblast()?.hitbox;
        let half = self.half_size();
        let mut width = (half.x * hitbox.width_ratio) as i32;
        let height = (half.y * hitbox.height_ratio) as i32;
        let forward = (half.x * hitbox.forward_ratio - hitbox.forward_inset) * self.direction();
        let nudge = if self.facing_right {
            hitbox.nudge_facing_right
        } else {
            hitbox.nudge_facing_left
        };
        let mut x = to_pixel(self.position.x + forward - width as f32 / 2.0) + nudge;
        x -= hitbox.left_extension;
        width += hitbox.left_extension;
        Some(Rect::new(
            x,
            to_pixel(self.position.y - height as f32 / 2.0),
            width,
            height,
        ))
    }

    /// Charge glow or flame stream, when either is showing
    pub fn effect_sprite(&self) -> Option<EffectSprite<'_>> {
        match &self.phase {
            Phase::Special(SpecialPhase::Charging { cursor, glow, .. }) => {
                let fireball = self.config.fireball()?;
                let bitmap = glow.frame(&self.sprites.effect)?.oriented(self.mirror());
                let drift = fireball
                    .glow_drift
                    .get(cursor.index().min(fireball.glow_drift.len().saturating_sub(1)))
                    .copied()
                    .unwrap_or(IVec2::ZERO);
                let (offset, drift_x) = if self.facing_right {
                    (fireball.glow_offset_facing_right, drift.x)
                } else {
                    (fireball.glow_offset_facing_left, -drift.x)
                };
                let centre = IVec2::new(
                    to_pixel(self.position.x) + offset.x + drift_x,
                    to_pixel(self.position.y) + offset.y + drift.y,
                );
                let size = IVec2::new(bitmap.width() as i32, bitmap.height() as i32);
                Some(EffectSprite {
                    bitmap,
                    origin: centre - size / 2,
                })
            }
            Phase::Flameblast(FlameblastPhase::Stream { fx, .. }) => {
                let flameblast = self.config.flameblast()?;
                let bitmap = fx.frame(&self.sprites.effect)?.oriented(self.mirror());
                let body = self.current_frame()?;
                let bounds = body
                    .oriented_silhouette(self.mirror())
                    .and_then(Mask::bounding_rect)
                    .unwrap_or(Rect::new(0, 0, body.width() as i32, body.height() as i32));
                let base = self.frame_origin();
                let inset = flameblast.mouth_inset;
                let mouth_y =
                    base.y + bounds.top() + (bounds.height as f32 * flameblast.mouth_height) as i32;
                let left = if self.facing_right {
                    let mouth_x = base.x + bounds.right() - 1 - inset;
                    mouth_x + flameblast.fx_nudge_facing_right
                } else {
                    let mouth_x = base.x + bounds.left() + inset;
                    mouth_x - bitmap.width() as i32 - flameblast.fx_nudge_facing_left
                };
                let top = mouth_y - bitmap.height() as i32 / 2 - flameblast.fx_lift;
                Some(EffectSprite {
                    bitmap,
                    origin: IVec2::new(left, top),
                })
            }
            _ => None,
        }
    }

    pub fn projectile_frames(&self) -> &FrameSet {
        &self.sprites.projectile
    }

    pub fn projectile_config(&self) -> Option<&ProjectileConfig> {
        self.config.fireball().map(|fireball| &fireball.projectile)
    }
}
