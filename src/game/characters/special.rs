// Secondary attack sub-machines
//
// Each archetype carries exactly one of these next to the shared base moves.
// A sub-machine consumes one tick and reports what the fighter should do next.

use super::animation::FrameCursor;
use super::config::{FireballConfig, FlameblastConfig};
use super::sprites::FighterSprites;
use super::state::{FlameblastPhase, SpecialPhase};

/// Result of one fireball tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireballTick {
    /// `None` once the special has finished
    pub next: Option<SpecialPhase>,
    /// Launch the projectile this tick
    pub fire: bool,
}

impl SpecialPhase {
    pub fn begin(config: &FireballConfig) -> Self {
        SpecialPhase::Charging {
            cursor: FrameCursor::new(config.frame_ticks),
            charge_ticks: 0,
            glow: FrameCursor::new(config.glow_frame_ticks),
        }
    }

    pub fn tick(self, config: &FireballConfig, sprites: &FighterSprites) -> FireballTick {
        match self {
            SpecialPhase::Charging {
                mut cursor,
                charge_ticks,
                mut glow,
            } => {
                cursor.cycle_tail(sprites.special_charge.len(), config.tail_frames);
                glow.hold_last(sprites.effect.len());
                let charge_ticks = charge_ticks + 1;

                let next = if charge_ticks >= config.charge_ticks {
                    SpecialPhase::Releasing {
                        cursor: FrameCursor::new(config.frame_ticks),
                        has_fired: false,
                    }
                } else {
                    SpecialPhase::Charging {
                        cursor,
                        charge_ticks,
                        glow,
                    }
                };
                FireballTick {
                    next: Some(next),
                    fire: false,
                }
            }
            SpecialPhase::Releasing {
                mut cursor,
                has_fired,
            } => {
                let fire = !has_fired;
                let finished = cursor.play_once(sprites.special_release.len());
                FireballTick {
                    next: (!finished).then_some(SpecialPhase::Releasing {
                        cursor,
                        has_fired: true,
                    }),
                    fire,
                }
            }
        }
    }
}

impl FlameblastPhase {
    pub fn begin(config: &FlameblastConfig) -> Self {
        FlameblastPhase::Charging {
            cursor: FrameCursor::new(config.frame_ticks),
            charge_ticks: 0,
        }
    }

    /// Advance one tick, `None` once the stream has run out
    pub fn tick(self, config: &FlameblastConfig, sprites: &FighterSprites) -> Option<Self> {
        let next = match self {
            FlameblastPhase::Charging {
                mut cursor,
                charge_ticks,
            } => {
                cursor.cycle_tail(sprites.special_charge.len(), config.tail_frames);
                let charge_ticks = charge_ticks + 1;
                if charge_ticks >= config.charge_ticks {
                    FlameblastPhase::Charge {
                        cursor: FrameCursor::new(config.frame_ticks),
                    }
                } else {
                    FlameblastPhase::Charging {
                        cursor,
                        charge_ticks,
                    }
                }
            }
            FlameblastPhase::Charge { mut cursor } => {
                if cursor.play_once(sprites.special_charge.len()) {
                    FlameblastPhase::Release {
                        cursor: FrameCursor::new(config.frame_ticks),
                    }
                } else {
                    FlameblastPhase::Charge { cursor }
                }
            }
            FlameblastPhase::Release { mut cursor } => {
                if cursor.play_once(sprites.special_release.len()) {
                    FlameblastPhase::Stream {
                        ticks: 0,
                        fx: FrameCursor::new(config.fx_frame_ticks),
                    }
                } else {
                    FlameblastPhase::Release { cursor }
                }
            }
            FlameblastPhase::Stream { ticks, mut fx } => {
                fx.cycle(sprites.effect.len());
                let ticks = ticks + 1;
                if ticks >= config.stream_ticks {
                    return None;
                }
                FlameblastPhase::Stream { ticks, fx }
            }
        };
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::config::{BOWSER, MARIO};

    fn empty() -> FighterSprites {
        FighterSprites::default()
    }

    #[test]
    fn test_fireball_charge_cap() {
        let fireball = *MARIO.fireball().unwrap();
        let config = &fireball;
        let sprites = empty();
        let mut phase = SpecialPhase::begin(config);
        for tick in 1..=config.charge_ticks {
            let step = phase.tick(config, &sprites);
            assert!(!step.fire);
            phase = step.next.unwrap();
            let releasing = matches!(phase, SpecialPhase::Releasing { .. });
            assert_eq!(releasing, tick == config.charge_ticks, "tick {}", tick);
        }
    }

    #[test]
    fn test_fireball_fires_once() {
        let fireball = *MARIO.fireball().unwrap();
        let config = &fireball;
        let sprites = empty();
        let mut phase = SpecialPhase::Releasing {
            cursor: FrameCursor::new(config.frame_ticks),
            has_fired: false,
        };
        let mut shots = 0;
        for _ in 0..100 {
            let step = phase.tick(config, &sprites);
            shots += usize::from(step.fire);
            match step.next {
                Some(next) => phase = next,
                None => break,
            }
        }
        assert_eq!(shots, 1);
    }

    #[test]
    fn test_flameblast_sequence() {
        let flameblast = *BOWSER.flameblast().unwrap();
        let config = &flameblast;
        let sprites = empty();
        let mut phase = FlameblastPhase::begin(config);
        let mut ticks = 0;
        let mut saw_stream = false;
        while let Some(next) = phase.tick(config, &sprites) {
            phase = next;
            ticks += 1;
            saw_stream |= matches!(phase, FlameblastPhase::Stream { .. });
            assert!(ticks < 1000);
        }
        assert!(saw_stream);
        // charge cap, one frame step each for charge and release, then the stream
        let expected = config.charge_ticks + 2 * config.frame_ticks + config.stream_ticks;
        assert_eq!(ticks + 1, expected);
    }
}
