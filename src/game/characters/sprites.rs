// Per-fighter frame sets, cut from the archetype's contact sheets

use super::config::{Archetype, FighterConfig};
use crate::engine::assets::AssetManager;
use crate::engine::sprite::{ExtractOptions, FrameSet, Scaling};

/// Every animation a fighter can show
#[derive(Debug, Clone, Default)]
pub struct FighterSprites {
    pub stand: FrameSet,
    pub attack: FrameSet,
    pub hit: FrameSet,
    pub block: FrameSet,
    /// Windup of the secondary attack
    pub special_charge: FrameSet,
    /// Follow-through of the secondary attack
    pub special_release: FrameSet,
    /// Overlay drawn beside the body: charge glow or flame stream
    pub effect: FrameSet,
    /// Frames handed to launched projectiles
    pub projectile: FrameSet,
}

impl FighterSprites {
    pub fn load(config: &FighterConfig, assets: &mut AssetManager) -> Self {
        match config.archetype {
            Archetype::Mario => Self::mario(config, assets),
            Archetype::Bowser => Self::bowser(assets),
        }
    }

    fn mario(config: &FighterConfig, assets: &mut AssetManager) -> Self {
        let special = assets.frames("mario_special.png", ExtractOptions::tight());
        let (charge_end, release_end) = config
            .fireball()
            .map(|f| (f.charge_frames, f.release_end))
            .unwrap_or((0, 0));

        Self {
            stand: FrameSet::concat(&[
                assets.frames("mario_stand1.png", ExtractOptions::whole_image()),
                assets.frames("mario_stand2.png", ExtractOptions::whole_image()),
            ]),
            attack: assets.frames("mario_hammer_attack.png", ExtractOptions::tight()),
            hit: assets.frames("mario_hit.png", ExtractOptions::isolated()),
            block: assets.frames("mario_block.png", ExtractOptions::isolated()),
            special_charge: special.slice(0..charge_end),
            special_release: special.slice(charge_end..release_end),
            effect: assets.frames("mario_fireball_charge.png", ExtractOptions::tight()),
            projectile: assets.frames(
                "mario_fireball.png",
                ExtractOptions::tight().with_scaling(Scaling::Factor(3)),
            ),
        }
    }

    fn bowser(assets: &mut AssetManager) -> Self {
        Self {
            stand: FrameSet::concat(&[
                assets.frames("bowser_stand1.png", ExtractOptions::whole_image()),
                assets.frames("bowser_stand2.png", ExtractOptions::whole_image()),
            ]),
            attack: assets.frames("bowser_punch.png", ExtractOptions::isolated()),
            hit: assets.frames("bowser_hit.png", ExtractOptions::square_cells()),
            block: assets.frames("bowser_block.png", ExtractOptions::full_height().reversed()),
            special_charge: assets.frames("bowser_flameblast_charge.png", ExtractOptions::isolated()),
            special_release: assets.frames("bowser_flameblast_release.png", ExtractOptions::tight()),
            effect: assets.frames(
                "flameblast.png",
                ExtractOptions::alpha().with_scaling(Scaling::Height(32)),
            ),
            projectile: FrameSet::empty(),
        }
    }

    /// Check if nothing loaded at all
    pub fn is_empty(&self) -> bool {
        [
            &self.stand,
            &self.attack,
            &self.hit,
            &self.block,
            &self.special_charge,
            &self.special_release,
            &self.effect,
            &self.projectile,
        ]
        .iter()
        .all(|set| set.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::config::{BOWSER, MARIO};

    #[test]
    fn test_missing_assets_load_empty() {
        let mut assets = AssetManager::new("/nonexistent/castle-brawl");
        assert!(FighterSprites::load(&MARIO, &mut assets).is_empty());
        assert!(FighterSprites::load(&BOWSER, &mut assets).is_empty());
        assert!(assets.stats().failed_count > 0);
    }
}
