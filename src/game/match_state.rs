// Match state - both fighters, the projectiles in flight and the debug toggles

use glam::IVec2;
use log::{debug, info, warn};

use crate::core::math::Rect;
use crate::engine::assets::AssetManager;
use crate::engine::game_loop::TICK_RATE;
use crate::engine::input::{IntentSink, Side};
use crate::game::characters::{Combatant, FighterSprites, Weapon, BOWSER, MARIO};
use crate::game::combat::{CombatResolver, HitEvent};
use crate::game::projectiles::ProjectileManager;
use crate::game::render::{self, Renderer};
use crate::game::stage::StageConfig;

const HEALTH_BAR_SIZE: IVec2 = IVec2::new(160, 16);
const HEALTH_BAR_INSET: i32 = 50;
const HEALTH_BAR_TOP: i32 = 50;
const HEALTH_LABEL_TOP: i32 = 30;

/// Ticks the debug key must be held before the overlay flips
pub const DEBUG_HOLD_TICKS: u32 = 180;

/// Everything one fight owns. The tick driver calls `update` then `draw`.
#[derive(Debug)]
pub struct MatchState {
    stage: StageConfig,
    fighters: [Combatant; 2],
    projectiles: ProjectileManager,
    resolver: CombatResolver,
    debug_visible: bool,
    debug_held: bool,
    debug_hold_ticks: u32,
    frozen: bool,
    tick: u64,
    last_events: Vec<HitEvent>,
}

impl MatchState {
    /// Start a match between two fighters, P1 first
    pub fn new(stage: StageConfig, fighters: [Combatant; 2]) -> Self {
        let mut fighters = fighters;
        let xs = [fighters[0].position().x, fighters[1].position().x];
        fighters[0].face_towards(xs[1]);
        fighters[1].face_towards(xs[0]);
        Self {
            stage,
            fighters,
            projectiles: ProjectileManager::new(),
            resolver: CombatResolver::new(),
            debug_visible: false,
            debug_held: false,
            debug_hold_ticks: 0,
            frozen: false,
            tick: 0,
            last_events: Vec::new(),
        }
    }

    /// Mario against Bowser, with sprites cut from the asset directory
    pub fn load(assets: &mut AssetManager, stage: StageConfig) -> Self {
        let fighters = [MARIO, BOWSER].map(|config| {
            let sprites = FighterSprites::load(&config, assets);
            if sprites.is_empty() {
                warn!("{} has no sprites, playing with placeholder boxes", config.name);
            }
            Combatant::new(config, sprites, stage.floor())
        });
        let stats = assets.stats();
        info!(
            "Match ready: {} vs {} ({} sheets, {} missing)",
            fighters[0].name(),
            fighters[1].name(),
            stats.sheet_count,
            stats.failed_count
        );
        Self::new(stage, fighters)
    }

    pub fn stage(&self) -> &StageConfig {
        &self.stage
    }

    pub fn fighter(&self, side: Side) -> &Combatant {
        &self.fighters[side.index()]
    }

    pub fn fighter_mut(&mut self, side: Side) -> &mut Combatant {
        &mut self.fighters[side.index()]
    }

    pub fn projectiles(&self) -> &ProjectileManager {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut ProjectileManager {
        &mut self.projectiles
    }

    /// Simulation ticks run so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Contacts resolved on the most recent tick
    pub fn last_events(&self) -> &[HitEvent] {
        &self.last_events
    }

    pub fn is_debug_visible(&self) -> bool {
        self.debug_visible
    }

    /// Whether ticks are currently being skipped
    pub fn is_frozen(&self) -> bool {
        self.debug_visible && self.frozen
    }

    /// The side still standing once the other has no health left
    pub fn winner(&self) -> Option<Side> {
        let [p1, p2] = &self.fighters;
        match (p1.health() <= 0.0, p2.health() <= 0.0) {
            (false, true) => Some(Side::P1),
            (true, false) => Some(Side::P2),
            _ => None,
        }
    }

    /// Show or hide the debug overlay
    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        info!(
            "Debug overlay {}",
            if self.debug_visible { "shown" } else { "hidden" }
        );
    }

    /// Count held ticks; one flip per hold
    fn advance_debug_hold(&mut self) {
        if !self.debug_held {
            self.debug_hold_ticks = 0;
            return;
        }
        self.debug_hold_ticks = self.debug_hold_ticks.saturating_add(1);
        if self.debug_hold_ticks == DEBUG_HOLD_TICKS {
            self.toggle_debug();
        }
    }

    /// Advance one fixed tick
    pub fn update(&mut self) {
        // Runs while frozen so the overlay can still be closed
        self.advance_debug_hold();
        if self.is_frozen() {
            return;
        }
        self.tick += 1;

        let xs = [self.fighters[0].position().x, self.fighters[1].position().x];
        let mut launches = Vec::new();
        for side in Side::BOTH {
            let opponent_x = xs[side.opponent().index()];
            if let Some(launch) = self.fighters[side.index()].update(opponent_x) {
                launches.push((side, launch));
            }
        }

        self.projectiles.tick(&self.stage);
        for (side, launch) in launches {
            let fighter = &self.fighters[side.index()];
            let Some(config) = fighter.projectile_config() else {
                continue;
            };
            let id = self.projectiles.spawn(
                launch.origin,
                launch.direction,
                side,
                fighter.projectile_frames().clone(),
                *config,
            );
            debug!("{} launched projectile {}", fighter.name(), id);
        }

        let was_over = self.winner().is_some();
        self.last_events = self.resolver.resolve(&mut self.fighters, &mut self.projectiles);
        let pruned = self.projectiles.prune();
        if pruned > 0 {
            debug!("Pruned {} projectiles", pruned);
        }

        if let (false, Some(side)) = (was_over, self.winner()) {
            info!("{} wins at tick {}", self.fighter(side).name(), self.tick);
        }
    }

    /// Issue this tick's draw calls. Never mutates the match.
    pub fn draw(&self, renderer: &mut impl Renderer) {
        let mut order = Side::BOTH;
        order.sort_by(|a, b| {
            self.fighter(*a)
                .feet_y()
                .total_cmp(&self.fighter(*b).feet_y())
        });
        for side in order {
            let fighter = self.fighter(side);
            if let Some(bitmap) = fighter.oriented_bitmap() {
                renderer.draw_sprite(bitmap, fighter.frame_origin());
            }
            if let Some(effect) = fighter.effect_sprite() {
                renderer.draw_sprite(effect.bitmap, effect.origin);
            }
            if self.debug_visible {
                self.draw_fighter_debug(fighter, renderer);
            }
        }

        if self.debug_visible {
            self.draw_clock(renderer);
        }

        for projectile in self.projectiles.iter() {
            if let Some(bitmap) = projectile.bitmap() {
                renderer.draw_sprite(bitmap, projectile.hitbox().origin());
            }
        }

        for side in Side::BOTH {
            self.draw_health_bar(side, renderer);
        }
    }

    fn draw_fighter_debug(&self, fighter: &Combatant, renderer: &mut impl Renderer) {
        if let Some((mask, origin)) = fighter.body_mask() {
            let points: Vec<IVec2> = mask.outline().into_iter().map(|p| p + origin).collect();
            renderer.draw_points(&points, render::BODY_OUTLINE);
        }
        renderer.draw_rect(fighter.tight_hurtbox(), render::HURTBOX, false);
        match fighter.weapon() {
            Some(Weapon::Mask { mask, origin }) => {
                let points: Vec<IVec2> = mask.outline().into_iter().map(|p| p + origin).collect();
                renderer.draw_points(&points, render::WEAPON);
            }
            Some(Weapon::Rect(rect)) => renderer.draw_rect(rect, render::PUNCH, false),
            None => {}
        }
        if let Some(stream) = fighter.stream_hitbox() {
            renderer.draw_rect(stream, render::STREAM, false);
        }
    }

    /// Elapsed match time as mm:ss.t
    fn clock_text(&self) -> String {
        let elapsed_ms = self.tick * 1000 / u64::from(TICK_RATE);
        format!(
            "{:02}:{:02}.{}",
            elapsed_ms / 60_000,
            (elapsed_ms / 1000) % 60,
            (elapsed_ms / 100) % 10
        )
    }

    fn draw_clock(&self, renderer: &mut impl Renderer) {
        let origin = IVec2::new(self.stage.width / 2 - 40, 10);
        renderer.draw_text(&self.clock_text(), origin, render::WHITE);
    }

    fn draw_health_bar(&self, side: Side, renderer: &mut impl Renderer) {
        let fighter = self.fighter(side);
        let (left, fill) = match side {
            Side::P1 => (HEALTH_BAR_INSET, render::P1_HEALTH),
            Side::P2 => (
                self.stage.width - HEALTH_BAR_INSET - HEALTH_BAR_SIZE.x,
                render::P2_HEALTH,
            ),
        };
        let health = fighter.health().max(0.0) as i32;
        let max = fighter.max_health().max(1.0);
        let width = (health as f32 * HEALTH_BAR_SIZE.x as f32 / max) as i32;

        renderer.draw_rect(
            Rect::new(left, HEALTH_BAR_TOP, HEALTH_BAR_SIZE.x, HEALTH_BAR_SIZE.y),
            render::HEALTH_BACK,
            true,
        );
        renderer.draw_rect(
            Rect::new(left, HEALTH_BAR_TOP, width, HEALTH_BAR_SIZE.y),
            fill,
            true,
        );
        renderer.draw_text(
            &format!("{} HP: {}", fighter.name(), health),
            IVec2::new(left, HEALTH_LABEL_TOP),
            render::WHITE,
        );
    }
}

impl IntentSink for MatchState {
    fn set_horizontal_intent(&mut self, side: Side, direction: i8) {
        self.fighter_mut(side).set_horizontal_intent(direction);
    }

    fn request_jump(&mut self, side: Side) {
        self.fighter_mut(side).request_jump();
    }

    fn request_attack(&mut self, side: Side) {
        self.fighter_mut(side).request_attack();
    }

    fn request_special(&mut self, side: Side) {
        self.fighter_mut(side).request_special();
    }

    fn set_blocking(&mut self, side: Side, blocking: bool) {
        self.fighter_mut(side).set_blocking(blocking);
    }

    fn request_heavy_charge_start(&mut self, side: Side) {
        self.fighter_mut(side).request_heavy_charge_start();
    }

    fn request_heavy_cancel(&mut self, side: Side) {
        self.fighter_mut(side).request_heavy_cancel();
    }

    fn set_debug_held(&mut self, held: bool) {
        self.debug_held = held;
    }

    /// Freezing is only honoured while the overlay is up
    fn toggle_freeze(&mut self) {
        if !self.debug_visible {
            return;
        }
        self.frozen = !self.frozen;
        info!("Simulation {}", if self.frozen { "frozen" } else { "resumed" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sprite::FrameSet;
    use crate::game::characters::fixtures::{brute_at, fighter, hammer_at, hammer_sprites, HAMMER};
    use crate::game::characters::{Phase, PhaseKind, ProjectileConfig};
    use crate::game::combat::HitKind;
    use crate::game::render::{DrawCommand, DrawList};
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn duel(hammer_x: f32, brute_x: f32) -> MatchState {
        MatchState::new(StageConfig::DEFAULT, [hammer_at(hammer_x), brute_at(brute_x)])
    }

    fn run(state: &mut MatchState, ticks: u32) {
        for _ in 0..ticks {
            state.update();
        }
    }

    #[test]
    fn test_scenario_melee_hit() {
        let mut state = duel(450.0, 550.0);
        state.request_attack(Side::P1);
        run(&mut state, 7);
        assert_relative_eq!(state.fighter(Side::P2).health(), 500.0);

        state.update();
        assert_eq!(state.last_events().len(), 1);
        assert_eq!(state.last_events()[0].kind, HitKind::Melee);
        let defender = state.fighter(Side::P2);
        assert_relative_eq!(defender.health(), 500.0 - MARIO.melee.damage);
        assert_eq!(defender.phase().kind(), PhaseKind::PlayingHit);

        run(&mut state, 30);
        assert_relative_eq!(state.fighter(Side::P2).health(), 480.0);
    }

    #[test]
    fn test_scenario_interrupted_charge() {
        let mut state = duel(450.0, 550.0);
        state.request_heavy_charge_start(Side::P2);
        state.request_attack(Side::P1);
        run(&mut state, 8);

        let events = state.last_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].interrupt);
        let defender = state.fighter(Side::P2);
        assert_relative_eq!(defender.health(), 460.0);
        assert!(!defender.is_charging());
        let Phase::PlayingHit(hit) = *defender.phase() else {
            panic!("expected hit reaction");
        };
        assert_eq!(hit.stun_remaining, 60);
        assert!(state.tick() < u64::from(BOWSER.flameblast().unwrap().charge_ticks));
    }

    #[test]
    fn test_scenario_projectile_leaves_stage() {
        let mut state = duel(300.0, 1200.0);
        let config = MARIO.fireball().map(|f| f.projectile).unwrap();
        state.projectiles_mut().spawn(
            Vec2::new(450.0, 700.0),
            1.0,
            Side::P1,
            FrameSet::empty(),
            ProjectileConfig {
                fallback_size: IVec2::ZERO,
                ..config
            },
        );
        // a point-sized shot leaves exactly when its centre does
        run(&mut state, 229);
        assert_eq!(state.projectiles().len(), 1);
        state.update();
        assert!(state.projectiles().is_empty());
    }

    #[test]
    fn test_special_spawns_projectile() {
        let mut state = duel(300.0, 1200.0);
        state.request_special(Side::P1);
        let charge = MARIO.fireball().unwrap().charge_ticks;
        run(&mut state, charge);
        assert!(state.projectiles().is_empty());
        state.update();
        assert_eq!(state.projectiles().len(), 1);
        let projectile = state.projectiles().iter().next().unwrap();
        assert_eq!(projectile.owner, Side::P1);
        assert_eq!(projectile.direction(), 1.0);
        assert_relative_eq!(projectile.position().x, 300.0);
    }

    #[test]
    fn test_fireball_lands_across_stage() {
        let mut state = duel(300.0, 700.0);
        state.request_special(Side::P1);
        let mut landed = None;
        for _ in 0..400 {
            state.update();
            if let Some(event) = state.last_events().first() {
                landed = Some(*event);
                break;
            }
        }
        let event = landed.unwrap();
        assert_eq!(event.kind, HitKind::Projectile);
        assert_relative_eq!(state.fighter(Side::P2).health(), 485.0);
        assert!(state.projectiles().is_empty());
    }

    #[test]
    fn test_fireball_without_art_still_lands() {
        let sprites = FighterSprites {
            projectile: FrameSet::empty(),
            ..hammer_sprites()
        };
        let mut state =
            MatchState::new(StageConfig::DEFAULT, [fighter(HAMMER, sprites, 300.0), brute_at(700.0)]);
        state.request_special(Side::P1);
        let mut hits = 0;
        for _ in 0..600 {
            state.update();
            hits += state.last_events().len();
        }
        assert_eq!(hits, 1);
        assert_relative_eq!(state.fighter(Side::P2).health(), 485.0);
        assert!(state.projectiles().is_empty());
    }

    #[test]
    fn test_freeze_needs_debug_overlay() {
        let mut state = duel(450.0, 850.0);
        state.toggle_freeze();
        state.update();
        assert_eq!(state.tick(), 1);

        state.toggle_debug();
        state.toggle_freeze();
        assert!(state.is_frozen());
        run(&mut state, 5);
        assert_eq!(state.tick(), 1);

        // hiding the overlay releases the freeze
        state.toggle_debug();
        state.update();
        assert_eq!(state.tick(), 2);
    }

    #[test]
    fn test_debug_overlay_needs_a_long_hold() {
        let mut state = duel(450.0, 850.0);
        state.set_debug_held(true);
        run(&mut state, DEBUG_HOLD_TICKS - 1);
        assert!(!state.is_debug_visible());

        // a short release restarts the count
        state.set_debug_held(false);
        state.update();
        state.set_debug_held(true);
        run(&mut state, DEBUG_HOLD_TICKS - 1);
        assert!(!state.is_debug_visible());
        state.update();
        assert!(state.is_debug_visible());

        // holding on does not flip it back
        run(&mut state, DEBUG_HOLD_TICKS * 2);
        assert!(state.is_debug_visible());
    }

    #[test]
    fn test_overlay_closes_while_frozen() {
        let mut state = duel(450.0, 850.0);
        state.toggle_debug();
        state.toggle_freeze();
        assert!(state.is_frozen());

        state.set_debug_held(true);
        run(&mut state, DEBUG_HOLD_TICKS);
        assert!(!state.is_debug_visible());
        assert!(!state.is_frozen());
        // the releasing tick runs
        assert_eq!(state.tick(), 1);
    }

    #[test]
    fn test_draw_orders_by_feet() {
        let mut state = duel(450.0, 850.0);
        state.request_jump(Side::P2);
        state.update();

        let mut list = DrawList::new();
        state.draw(&mut list);
        assert_eq!(list.sprite_count(), 2);
        let DrawCommand::Sprite { origin, .. } = list.commands()[0] else {
            panic!("expected a sprite first");
        };
        assert_eq!(origin, state.fighter(Side::P2).frame_origin());
        let texts: Vec<_> = list.texts().collect();
        assert_eq!(texts, vec!["Hammer HP: 500", "Brute HP: 500"]);
    }

    #[test]
    fn test_debug_overlay_adds_shapes() {
        let mut state = duel(450.0, 850.0);
        let mut plain = DrawList::new();
        state.draw(&mut plain);

        state.toggle_debug();
        state.request_attack(Side::P2);
        state.update();
        let mut debug = DrawList::new();
        state.draw(&mut debug);
        assert!(debug.len() > plain.len());
        assert!(debug.texts().any(|t| t == "00:00.0"));
        assert!(debug
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Rect { color, .. } if *color == render::PUNCH)));
    }

    #[test]
    fn test_health_bar_scales() {
        let mut state = duel(450.0, 850.0);
        state.fighter_mut(Side::P2).take_hit(250.0, 1);
        let mut list = DrawList::new();
        state.draw(&mut list);
        let bars: Vec<Rect> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { rect, color, .. } if *color == render::P2_HEALTH => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(bars, vec![Rect::new(1550 - 210, 50, 80, 16)]);
    }

    #[test]
    fn test_winner_after_knockout() {
        let mut state = duel(450.0, 850.0);
        assert_eq!(state.winner(), None);
        state.fighter_mut(Side::P2).take_hit(1000.0, 1);
        assert_eq!(state.winner(), Some(Side::P1));
        assert_eq!(state.fighter(Side::P2).health(), 0.0);
    }

    /// Small deterministic generator for input soak tests
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            self.0 >> 33
        }
    }

    fn random_intent(state: &mut MatchState, side: Side, rng: &mut Lcg) {
        match rng.next() % 12 {
            0 => state.set_horizontal_intent(side, -1),
            1 => state.set_horizontal_intent(side, 1),
            2 => state.set_horizontal_intent(side, 0),
            3 => state.request_jump(side),
            4 | 5 => state.request_attack(side),
            6 => state.request_special(side),
            7 => state.set_blocking(side, true),
            8 => state.set_blocking(side, false),
            9 => state.request_heavy_charge_start(side),
            10 => state.request_heavy_cancel(side),
            _ => {}
        }
    }

    #[test]
    fn test_invariants_under_random_input() {
        let mut state = duel(500.0, 620.0);
        let mut rng = Lcg(7);
        for _ in 0..3000 {
            for side in Side::BOTH {
                if rng.next() % 4 == 0 {
                    random_intent(&mut state, side, &mut rng);
                }
            }
            let before = Side::BOTH.map(|side| state.fighter(side).health());
            state.update();

            for side in Side::BOTH {
                let fighter = state.fighter(side);
                let health = fighter.health();
                assert!(health >= 0.0);
                assert!(health <= before[side.index()]);

                let dealt: f32 = state
                    .last_events()
                    .iter()
                    .filter(|e| e.defender == side)
                    .map(|e| e.damage)
                    .sum();
                let expected = (before[side.index()] - dealt).max(0.0);
                assert_relative_eq!(health, expected, epsilon = 1e-3);

                let kind = fighter.phase().kind();
                assert_eq!(fighter.is_blocking(), kind == PhaseKind::Blocking);
                assert!(fighter.weapon().is_none() || kind == PhaseKind::Attacking);
                assert!(fighter.stream_hitbox().is_none() || fighter.phase().is_streaming());
                assert!(fighter.current_frame().is_some());
            }
        }
    }

    #[test]
    fn test_each_swing_hits_once() {
        let mut state = duel(450.0, 550.0);
        let mut hits = 0;
        for swing in 0..3 {
            state.request_attack(Side::P1);
            for _ in 0..16 {
                state.update();
                hits += state
                    .last_events()
                    .iter()
                    .filter(|e| e.kind == HitKind::Melee)
                    .count();
            }
            assert_eq!(hits, swing + 1);
            // let the defender recover before the next swing
            run(&mut state, 60);
        }
    }
}
