// Combat resolution
//
// Runs once per tick after both fighters and every projectile have moved.
// Each rule reads collision surfaces the fighters expose and applies damage
// through their hit entry points. Missing surfaces simply mean no contact.

use log::debug;

use crate::engine::input::Side;
use crate::game::characters::{Combatant, Weapon};
use crate::game::projectiles::{ProjectileId, ProjectileManager};

/// Damage and hitstun multiplier for hitting a fighter mid-charge
pub const INTERRUPT_MULTIPLIER: f32 = 2.0;

/// What landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitKind {
    Melee,
    Stream,
    Projectile,
    /// A projectile met a flame stream; both are cancelled
    Parry,
}

/// One resolved contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub attacker: Side,
    pub defender: Side,
    pub kind: HitKind,
    pub damage: f32,
    /// Landed on a charging defender
    pub interrupt: bool,
}

/// Applies the hit rules between two fighters and the projectiles in flight
#[derive(Debug, Clone, Copy)]
pub struct CombatResolver {
    interrupt_multiplier: f32,
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self {
            interrupt_multiplier: INTERRUPT_MULTIPLIER,
        }
    }
}

fn split(fighters: &mut [Combatant; 2], attacker: Side) -> (&mut Combatant, &mut Combatant) {
    let [p1, p2] = fighters;
    match attacker {
        Side::P1 => (p1, p2),
        Side::P2 => (p2, p1),
    }
}

/// Whether an active swing touches the defender's body
fn melee_connects(attacker: &Combatant, defender: &Combatant) -> bool {
    if attacker.attack_has_hit() {
        return false;
    }
    match attacker.weapon() {
        Some(Weapon::Mask { mask, origin }) => defender
            .body_mask()
            .is_some_and(|(body, body_origin)| mask.overlaps(body, body_origin - origin)),
        Some(Weapon::Rect(rect)) => rect.intersects(&defender.hurtbox()),
        None => false,
    }
}

impl CombatResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interrupt_multiplier(interrupt_multiplier: f32) -> Self {
        Self {
            interrupt_multiplier,
        }
    }

    fn multiplier(&self, interrupt: bool) -> f32 {
        if interrupt {
            self.interrupt_multiplier
        } else {
            1.0
        }
    }

    fn scaled_stun(&self, hitstun: u32, interrupt: bool) -> u32 {
        (hitstun as f32 * self.multiplier(interrupt)).round() as u32
    }

    /// Resolve every contact for this tick
    pub fn resolve(
        &self,
        fighters: &mut [Combatant; 2],
        projectiles: &mut ProjectileManager,
    ) -> Vec<HitEvent> {
        let mut events = Vec::new();
        self.resolve_melee(fighters, &mut events);
        self.resolve_streams(fighters, &mut events);
        self.resolve_projectiles(fighters, projectiles, &mut events);
        self.resolve_parries(fighters, projectiles, &mut events);

        for event in &events {
            debug!(
                "{} -> {}: {:?} for {:.3}{}",
                fighters[event.attacker.index()].name(),
                fighters[event.defender.index()].name(),
                event.kind,
                event.damage,
                if event.interrupt { " (interrupt)" } else { "" }
            );
        }
        events
    }

    /// Both swings are judged against the same snapshot so trades land together
    fn resolve_melee(&self, fighters: &mut [Combatant; 2], events: &mut Vec<HitEvent>) {
        let contacts: Vec<(Side, bool)> = Side::BOTH
            .into_iter()
            .filter_map(|attacker| {
                let a = &fighters[attacker.index()];
                let d = &fighters[attacker.opponent().index()];
                melee_connects(a, d).then(|| (attacker, d.is_charging()))
            })
            .collect();

        for &(attacker, _) in &contacts {
            fighters[attacker.index()].mark_hit();
        }
        for (attacker, interrupt) in contacts {
            let (a, d) = split(fighters, attacker);
            let melee = a.config().melee;
            let damage = melee.damage * self.multiplier(interrupt);
            d.take_hit(damage, self.scaled_stun(melee.hitstun, interrupt));
            events.push(HitEvent {
                attacker,
                defender: attacker.opponent(),
                kind: HitKind::Melee,
                damage,
                interrupt,
            });
        }
    }

    /// Continuous flame damage, stopped by a block and never multiplied
    fn resolve_streams(&self, fighters: &mut [Combatant; 2], events: &mut Vec<HitEvent>) {
        for attacker in Side::BOTH {
            let (a, d) = split(fighters, attacker);
            let (Some(hitbox), Some(flameblast)) = (a.stream_hitbox(), a.config().flameblast())
            else {
                continue;
            };
            if d.is_blocking() || !hitbox.intersects(&d.hurtbox()) {
                continue;
            }
            let damage = flameblast.damage_per_tick;
            d.take_stream_damage(damage, flameblast.hitstun);
            events.push(HitEvent {
                attacker,
                defender: attacker.opponent(),
                kind: HitKind::Stream,
                damage,
                interrupt: false,
            });
        }
    }

    /// Shots that reach the opposing body break through a block
    fn resolve_projectiles(
        &self,
        fighters: &mut [Combatant; 2],
        projectiles: &mut ProjectileManager,
        events: &mut Vec<HitEvent>,
    ) {
        let hits: Vec<(ProjectileId, Side)> = projectiles
            .iter()
            .filter(|p| p.is_alive())
            .filter_map(|p| {
                let defender = &fighters[p.owner.opponent().index()];
                let hitbox = p.hitbox();
                if !hitbox.intersects(&defender.hurtbox()) {
                    return None;
                }
                let touching = match (p.mask(), defender.body_mask()) {
                    (Some(mask), Some((body, body_origin))) => {
                        mask.overlaps(body, body_origin - hitbox.origin())
                    }
                    _ => true,
                };
                touching.then_some((p.id, p.owner))
            })
            .collect();

        for (id, owner) in hits {
            let Some(projectile) = projectiles.remove(id) else {
                continue;
            };
            let config = projectile.config();
            let defender = &mut fighters[owner.opponent().index()];
            let interrupt = defender.is_charging();
            let damage = config.damage * self.multiplier(interrupt);
            defender.take_hit(damage, self.scaled_stun(config.hitstun, interrupt));
            events.push(HitEvent {
                attacker: owner,
                defender: owner.opponent(),
                kind: HitKind::Projectile,
                damage,
                interrupt,
            });
        }
    }

    /// A shot flying into a flame stream puts both out
    fn resolve_parries(
        &self,
        fighters: &mut [Combatant; 2],
        projectiles: &mut ProjectileManager,
        events: &mut Vec<HitEvent>,
    ) {
        let parries: Vec<(ProjectileId, Side)> = projectiles
            .iter()
            .filter(|p| p.is_alive())
            .filter(|p| {
                fighters[p.owner.opponent().index()]
                    .stream_hitbox()
                    .is_some_and(|stream| stream.intersects(&p.hitbox()))
            })
            .map(|p| (p.id, p.owner))
            .collect();

        for (id, owner) in parries {
            let defender = &mut fighters[owner.opponent().index()];
            if !defender.phase().is_streaming() || projectiles.remove(id).is_none() {
                continue;
            }
            defender.end_flameblast();
            events.push(HitEvent {
                attacker: owner,
                defender: owner.opponent(),
                kind: HitKind::Parry,
                damage: 0.0,
                interrupt: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::fixtures::{brute_at, hammer_at, into_stream, repeated, solid};
    use crate::game::characters::{PhaseKind, MARIO};
    use crate::engine::sprite::FrameSet;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn step(
        fighters: &mut [Combatant; 2],
        projectiles: &mut ProjectileManager,
    ) -> Vec<HitEvent> {
        let xs = [fighters[0].position().x, fighters[1].position().x];
        fighters[0].update(xs[1]);
        fighters[1].update(xs[0]);
        CombatResolver::new().resolve(fighters, projectiles)
    }

    fn face_off(hammer_x: f32, brute_x: f32) -> [Combatant; 2] {
        let mut fighters = [hammer_at(hammer_x), brute_at(brute_x)];
        fighters[0].face_towards(brute_x);
        fighters[1].face_towards(hammer_x);
        fighters
    }

    fn shot(projectiles: &mut ProjectileManager, at: Vec2, direction: f32) -> ProjectileId {
        let config = MARIO.fireball().map(|f| f.projectile).unwrap();
        projectiles.spawn(at, direction, Side::P1, repeated(solid(16, 16), 2), config)
    }

    #[test]
    fn test_melee_hits_exactly_once() {
        let mut fighters = face_off(450.0, 550.0);
        let mut projectiles = ProjectileManager::new();
        fighters[0].request_attack();
        let mut events = Vec::new();
        for _ in 0..16 {
            events.extend(step(&mut fighters, &mut projectiles));
        }
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, HitKind::Melee);
        assert_eq!(events[0].defender, Side::P2);
        assert!(!events[0].interrupt);
        assert_relative_eq!(fighters[1].health(), 480.0);
        assert_eq!(fighters[1].phase().kind(), PhaseKind::PlayingHit);
    }

    #[test]
    fn test_melee_misses_out_of_reach() {
        let mut fighters = face_off(450.0, 700.0);
        let mut projectiles = ProjectileManager::new();
        fighters[0].request_attack();
        for _ in 0..16 {
            assert!(step(&mut fighters, &mut projectiles).is_empty());
        }
        assert_relative_eq!(fighters[1].health(), 500.0);
    }

    #[test]
    fn test_melee_breaks_block() {
        let mut fighters = face_off(450.0, 550.0);
        let mut projectiles = ProjectileManager::new();
        fighters[1].set_blocking(true);
        fighters[0].request_attack();
        for _ in 0..8 {
            step(&mut fighters, &mut projectiles);
        }
        assert!(!fighters[1].is_blocking());
        assert_eq!(fighters[1].phase().kind(), PhaseKind::PlayingHit);
        assert_relative_eq!(fighters[1].health(), 480.0);
    }

    #[test]
    fn test_forward_box_interrupts_charge() {
        let mut fighters = face_off(510.0, 550.0);
        let mut projectiles = ProjectileManager::new();
        fighters[0].request_special();
        fighters[1].request_attack();
        let events = step(&mut fighters, &mut projectiles);
        assert_eq!(events.len(), 1);
        assert!(events[0].interrupt);
        assert_relative_eq!(events[0].damage, 30.0);
        assert!(!fighters[0].is_charging());
        let crate::game::characters::Phase::PlayingHit(hit) = *fighters[0].phase() else {
            panic!("expected hit reaction");
        };
        assert_eq!(hit.stun_remaining, 60);
    }

    #[test]
    fn test_stream_damage_and_block() {
        let mut fighters = face_off(760.0, 850.0);
        let mut projectiles = ProjectileManager::new();
        into_stream(&mut fighters[1], 760.0);

        let events = CombatResolver::new().resolve(&mut fighters, &mut projectiles);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, HitKind::Stream);
        assert_relative_eq!(fighters[0].health(), 500.0 - 7.5 / 60.0);

        let mut fighters = face_off(760.0, 850.0);
        into_stream(&mut fighters[1], 760.0);
        fighters[0].set_blocking(true);
        assert!(CombatResolver::new()
            .resolve(&mut fighters, &mut projectiles)
            .is_empty());
        assert_relative_eq!(fighters[0].health(), 500.0);
    }

    #[test]
    fn test_stream_over_a_second() {
        let mut fighters = face_off(760.0, 850.0);
        let mut projectiles = ProjectileManager::new();
        into_stream(&mut fighters[1], 760.0);
        let mut total = 0.0;
        while fighters[1].phase().is_streaming() {
            for event in CombatResolver::new().resolve(&mut fighters, &mut projectiles) {
                assert!(!event.interrupt);
                total += event.damage;
            }
            fighters[1].update(760.0);
        }
        assert_relative_eq!(total, 7.5, epsilon = 1e-3);
    }

    #[test]
    fn test_projectile_hits_body_and_is_removed() {
        let mut fighters = face_off(450.0, 550.0);
        let mut projectiles = ProjectileManager::new();
        fighters[1].set_blocking(true);
        let id = shot(&mut projectiles, Vec2::new(550.0, 741.0), 1.0);
        let events = CombatResolver::new().resolve(&mut fighters, &mut projectiles);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, HitKind::Projectile);
        assert!(projectiles.get(id).is_none());
        assert_relative_eq!(fighters[1].health(), 485.0);
        assert!(!fighters[1].is_blocking());
    }

    #[test]
    fn test_projectile_interrupt_doubles() {
        let mut fighters = face_off(450.0, 550.0);
        let mut projectiles = ProjectileManager::new();
        fighters[1].request_heavy_charge_start();
        shot(&mut projectiles, Vec2::new(550.0, 741.0), 1.0);
        let events = CombatResolver::new().resolve(&mut fighters, &mut projectiles);
        assert!(events[0].interrupt);
        assert_relative_eq!(fighters[1].health(), 470.0);
        assert!(!fighters[1].is_charging());
    }

    #[test]
    fn test_projectile_without_art_still_lands() {
        let mut fighters = face_off(450.0, 550.0);
        let mut projectiles = ProjectileManager::new();
        let config = MARIO.fireball().map(|f| f.projectile).unwrap();
        projectiles.spawn(Vec2::new(550.0, 741.0), 1.0, Side::P1, FrameSet::empty(), config);
        let events = CombatResolver::new().resolve(&mut fighters, &mut projectiles);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, HitKind::Projectile);
        assert!(projectiles.is_empty());
        assert_relative_eq!(fighters[1].health(), 485.0);
    }

    #[test]
    fn test_projectile_parries_stream() {
        let mut fighters = face_off(300.0, 850.0);
        let mut projectiles = ProjectileManager::new();
        into_stream(&mut fighters[1], 300.0);
        let id = shot(&mut projectiles, Vec2::new(780.0, 741.0), 1.0);
        let events = CombatResolver::new().resolve(&mut fighters, &mut projectiles);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, HitKind::Parry);
        assert_eq!(events[0].damage, 0.0);
        assert!(projectiles.get(id).is_none());
        assert_eq!(fighters[1].phase().kind(), PhaseKind::Standing);
        assert_relative_eq!(fighters[1].health(), 500.0);
    }
}
