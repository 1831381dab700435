// Fighter configuration - archetype presets
//
// Two archetypes share movement, blocking, hitstun and a standard melee attack.
// They differ in sprite orientation, melee shape and which secondary attack
// they carry. Pixel nudges below are hand-calibrated against the shipped
// sheets and need retuning whenever the art changes.

use glam::IVec2;
use image::Rgba;

/// Which preset sprite layout a fighter loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    Mario,
    Bowser,
}

/// Ticks each frame stays on screen, per animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTiming {
    pub stand: u32,
    pub attack: u32,
    pub block: u32,
    pub hit: u32,
}

/// Horizontal hurtbox shift while blocking, per facing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockNudge {
    pub facing_right: i32,
    pub facing_left: i32,
}

impl BlockNudge {
    pub const NONE: BlockNudge = BlockNudge {
        facing_right: 0,
        facing_left: 0,
    };

    pub fn for_facing(&self, facing_right: bool) -> i32 {
        if facing_right {
            self.facing_right
        } else {
            self.facing_left
        }
    }
}

/// Geometry of the damaging region of a standard attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeleeShape {
    /// Pixel mask of a coloured weapon head, placed relative to the frame
    WeaponMask {
        color: Rgba<u8>,
        tolerance: Rgba<u8>,
        offset_facing_right: IVec2,
        offset_facing_left: IVec2,
    },
    /// Rectangle in front of the body, sized from the current half extents
    ForwardBox {
        width_ratio: f32,
        height_ratio: f32,
        forward_ratio: f32,
        lift: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeConfig {
    pub damage: f32,
    pub hitstun: u32,
    /// Fraction of the swing before the weapon becomes dangerous
    pub active_ratio: f32,
    pub shape: MeleeShape,
}

/// Charge-then-release special that launches a projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireballConfig {
    /// Charge is forced into release after this many ticks
    pub charge_ticks: u32,
    pub frame_ticks: u32,
    /// Frames of the shared sheet used for charge, the rest up to `release_end` release
    pub charge_frames: usize,
    pub release_end: usize,
    /// Frames looped once the charge animation has played through
    pub tail_frames: usize,
    pub glow_frame_ticks: u32,
    /// Glow centre relative to the body centre, x mirrored when facing left
    pub glow_offset_facing_right: IVec2,
    pub glow_offset_facing_left: IVec2,
    /// Per charge frame drift of the glow, last entry reused past the end
    pub glow_drift: &'static [IVec2],
    pub projectile: ProjectileConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub frame_ticks: u32,
    pub damage: f32,
    pub hitstun: u32,
    /// Collision box of a shot whose sheet failed to load
    pub fallback_size: IVec2,
}

/// Placement of the flame stream hitbox relative to the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlameHitbox {
    pub width_ratio: f32,
    pub height_ratio: f32,
    pub forward_ratio: f32,
    pub forward_inset: f32,
    pub nudge_facing_right: i32,
    pub nudge_facing_left: i32,
    /// Extra reach added to the left edge only
    pub left_extension: i32,
}

/// Charge, release and sustained flame stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlameblastConfig {
    pub charge_ticks: u32,
    pub frame_ticks: u32,
    pub tail_frames: usize,
    pub stream_ticks: u32,
    /// Release frame the body holds during the stream
    pub stream_body_frame: usize,
    pub fx_frame_ticks: u32,
    pub damage_per_tick: f32,
    pub hitstun: u32,
    pub hitbox: FlameHitbox,
    /// Inset of the flame anchor from the body's leading edge
    pub mouth_inset: i32,
    /// Fraction of the body height where the flame leaves the mouth
    pub mouth_height: f32,
    /// Flame effect raised this far above the mouth line
    pub fx_lift: i32,
    /// Flame effect pushed forward from the mouth anchor, per facing
    pub fx_nudge_facing_right: i32,
    pub fx_nudge_facing_left: i32,
}

/// Secondary attack capability
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecialMove {
    Fireball(FireballConfig),
    Flameblast(FlameblastConfig),
}

/// Complete fighter tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FighterConfig {
    pub name: &'static str,
    pub archetype: Archetype,
    pub max_health: f32,
    pub spawn_x: f32,
    pub move_speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
    /// Shift of this fighter's floor line from the stage floor
    pub floor_offset: f32,
    /// Whether the source art faces right
    pub art_faces_right: bool,
    /// Calibration applied to every collision box
    pub box_offset: IVec2,
    pub block_nudge: BlockNudge,
    pub timing: AnimationTiming,
    /// Ticks the hit pose is held after hitstun runs out
    pub hitstun_linger: u32,
    pub melee: MeleeConfig,
    pub special: SpecialMove,
}

/// Size used for collision when a fighter has no frame to show
pub const FALLBACK_FRAME_SIZE: IVec2 = IVec2::new(64, 64);

const MARIO_GLOW_DRIFT: [IVec2; 8] = [
    IVec2::new(10, -1),
    IVec2::new(12, -1),
    IVec2::new(13, 0),
    IVec2::new(14, 0),
    IVec2::new(14, 1),
    IVec2::new(15, 1),
    IVec2::new(15, 1),
    IVec2::new(15, 1),
];

pub const MARIO: FighterConfig = FighterConfig {
    name: "Mario",
    archetype: Archetype::Mario,
    max_health: 500.0,
    spawn_x: 450.0,
    move_speed: 3.0,
    jump_impulse: 12.0,
    gravity: 0.6,
    floor_offset: -11.0,
    art_faces_right: true,
    box_offset: IVec2::new(-91, -10),
    block_nudge: BlockNudge {
        facing_right: 80,
        facing_left: -40,
    },
    timing: AnimationTiming {
        stand: 12,
        attack: 4,
        block: 6,
        hit: 5,
    },
    hitstun_linger: 10,
    melee: MeleeConfig {
        damage: 20.0,
        hitstun: 30,
        active_ratio: 0.5,
        shape: MeleeShape::WeaponMask {
            color: Rgba([255, 255, 0, 255]),
            tolerance: Rgba([80, 80, 80, 255]),
            offset_facing_right: IVec2::new(-81, -10),
            offset_facing_left: IVec2::new(-91, -10),
        },
    },
    special: SpecialMove::Fireball(FireballConfig {
        charge_ticks: 150,
        frame_ticks: 5,
        charge_frames: 6,
        release_end: 11,
        tail_frames: 3,
        glow_frame_ticks: 3,
        glow_offset_facing_right: IVec2::new(5, -3),
        glow_offset_facing_left: IVec2::new(0, -3),
        glow_drift: &MARIO_GLOW_DRIFT,
        projectile: ProjectileConfig {
            speed: 5.0,
            frame_ticks: 4,
            damage: 15.0,
            hitstun: 30,
            fallback_size: IVec2::new(48, 48),
        },
    }),
};

pub const BOWSER: FighterConfig = FighterConfig {
    name: "Bowser",
    archetype: Archetype::Bowser,
    max_health: 500.0,
    spawn_x: 850.0,
    move_speed: 3.0,
    jump_impulse: 9.0,
    gravity: 0.6,
    floor_offset: -11.0,
    art_faces_right: false,
    box_offset: IVec2::ZERO,
    block_nudge: BlockNudge::NONE,
    timing: AnimationTiming {
        stand: 12,
        attack: 10,
        block: 6,
        hit: 5,
    },
    hitstun_linger: 10,
    melee: MeleeConfig {
        damage: 15.0,
        hitstun: 30,
        active_ratio: 0.0,
        shape: MeleeShape::ForwardBox {
            width_ratio: 1.0,
            height_ratio: 0.8,
            forward_ratio: 0.7,
            lift: 20,
        },
    },
    special: SpecialMove::Flameblast(FlameblastConfig {
        charge_ticks: 90,
        frame_ticks: 4,
        tail_frames: 3,
        stream_ticks: 60,
        stream_body_frame: 1,
        fx_frame_ticks: 4,
        damage_per_tick: 7.5 / 60.0,
        hitstun: 45,
        hitbox: FlameHitbox {
            width_ratio: 2.0,
            height_ratio: 0.6,
            forward_ratio: 1.5,
            forward_inset: 10.0,
            nudge_facing_right: 35,
            nudge_facing_left: -20,
            left_extension: 40,
        },
        mouth_inset: 10,
        mouth_height: 0.35,
        fx_lift: 5,
        fx_nudge_facing_right: 10,
        fx_nudge_facing_left: 20,
    }),
};

impl FighterConfig {
    pub fn fireball(&self) -> Option<&FireballConfig> {
        match &self.special {
            SpecialMove::Fireball(config) => Some(config),
            SpecialMove::Flameblast(_) => None,
        }
    }

    pub fn flameblast(&self) -> Option<&FlameblastConfig> {
        match &self.special {
            SpecialMove::Flameblast(config) => Some(config),
            SpecialMove::Fireball(_) => None,
        }
    }
}
