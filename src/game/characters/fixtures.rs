// Synthetic fighters for tests
//
// Frames are flat red bodies on an explicit blue background so silhouettes
// cover the whole frame. The hammer frames carry a yellow head on the right.

use glam::IVec2;
use image::{Rgba, RgbaImage};

use super::character::Combatant;
use super::config::{BlockNudge, FighterConfig, MeleeConfig, MeleeShape, BOWSER, MARIO};
use super::sprites::FighterSprites;
use crate::engine::sprite::{Bitmap, FrameSet};

pub const FLOOR_Y: f32 = 802.0;

const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);

/// Mario moveset with every calibration nudge zeroed
pub const HAMMER: FighterConfig = FighterConfig {
    name: "Hammer",
    box_offset: IVec2::ZERO,
    block_nudge: BlockNudge::NONE,
    melee: MeleeConfig {
        shape: MeleeShape::WeaponMask {
            color: YELLOW,
            tolerance: Rgba([80, 80, 80, 255]),
            offset_facing_right: IVec2::ZERO,
            offset_facing_left: IVec2::ZERO,
        },
        ..MARIO.melee
    },
    ..MARIO
};

/// Bowser moveset, already uncalibrated
pub const BRUTE: FighterConfig = FighterConfig {
    name: "Brute",
    ..BOWSER
};

pub fn solid(width: u32, height: u32) -> Bitmap {
    Bitmap::with_background(RgbaImage::from_pixel(width, height, RED), BLUE)
}

/// Red body with a yellow weapon from `weapon_from` to the right edge
pub fn hammer_frame(width: u32, height: u32, weapon_from: u32) -> Bitmap {
    let image = RgbaImage::from_fn(width, height, |x, _| if x >= weapon_from { YELLOW } else { RED });
    Bitmap::with_background(image, BLUE)
}

pub fn repeated(bitmap: Bitmap, count: usize) -> FrameSet {
    FrameSet::from_bitmaps(std::iter::repeat(bitmap).take(count))
}

pub fn hammer_sprites() -> FighterSprites {
    FighterSprites {
        stand: repeated(solid(60, 100), 2),
        attack: repeated(hammer_frame(160, 100, 120), 4),
        hit: repeated(solid(60, 100), 3),
        block: repeated(solid(60, 100), 2),
        special_charge: repeated(solid(60, 100), 6),
        special_release: repeated(solid(60, 100), 5),
        effect: repeated(solid(20, 20), 3),
        projectile: repeated(solid(16, 16), 2),
    }
}

pub fn brute_sprites() -> FighterSprites {
    FighterSprites {
        stand: repeated(solid(60, 100), 2),
        attack: repeated(solid(80, 100), 3),
        hit: repeated(solid(60, 100), 3),
        block: repeated(solid(60, 100), 2),
        special_charge: repeated(solid(60, 100), 4),
        special_release: repeated(solid(60, 100), 2),
        effect: repeated(solid(40, 20), 3),
        projectile: FrameSet::empty(),
    }
}

/// A fighter standing on the floor at `x`
pub fn fighter(config: FighterConfig, sprites: FighterSprites, x: f32) -> Combatant {
    let mut fighter = Combatant::new(config, sprites, FLOOR_Y);
    fighter.set_x(x);
    fighter
}

pub fn hammer_at(x: f32) -> Combatant {
    fighter(HAMMER, hammer_sprites(), x)
}

pub fn brute_at(x: f32) -> Combatant {
    fighter(BRUTE, brute_sprites(), x)
}

/// Run a flameblast from standing until the stream starts
pub fn into_stream(fighter: &mut Combatant, opponent_x: f32) {
    fighter.face_towards(opponent_x);
    fighter.request_heavy_charge_start();
    for _ in 0..1000 {
        if fighter.phase().is_streaming() {
            return;
        }
        fighter.update(opponent_x);
    }
    panic!("{} never reached the flame stream", fighter.name());
}
