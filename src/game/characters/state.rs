// Fighter phase - the single animation/attack state a fighter occupies

use super::animation::FrameCursor;

/// Coarse phase label, ordered by priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseKind {
    Standing,
    Attacking,
    Special,
    Flameblast,
    PlayingHit,
    Blocking,
}

impl PhaseKind {
    /// Higher ranks suppress lower ones
    pub fn rank(&self) -> u8 {
        match self {
            Self::Standing => 0,
            Self::Attacking => 1,
            Self::Special | Self::Flameblast => 2,
            Self::PlayingHit => 3,
            Self::Blocking => 4,
        }
    }
}

/// A standard attack in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackPhase {
    pub cursor: FrameCursor,
    /// Set once this swing has connected
    pub has_hit: bool,
    /// Feet line recorded on the swing's first frame
    pub anchor_feet_y: Option<f32>,
}

/// Charge-and-release special
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecialPhase {
    Charging {
        cursor: FrameCursor,
        /// Ticks spent charging, capped by the fireball config
        charge_ticks: u32,
        glow: FrameCursor,
    },
    Releasing {
        cursor: FrameCursor,
        has_fired: bool,
    },
}

/// Heavy attack sub-phases
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlameblastPhase {
    /// Held windup, loops its tail until the charge timer runs out
    Charging { cursor: FrameCursor, charge_ticks: u32 },
    /// One play of the charge frames
    Charge { cursor: FrameCursor },
    Release { cursor: FrameCursor },
    /// Body frozen, flame effect active
    Stream { ticks: u32, fx: FrameCursor },
}

/// Reaction to a hit: input lockout, then a purely visual linger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPhase {
    pub cursor: FrameCursor,
    pub stun_remaining: u32,
    pub linger_remaining: u32,
}

impl HitPhase {
    pub fn is_stunned(&self) -> bool {
        self.stun_remaining > 0
    }
}

/// Exactly one of these holds at any tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Phase {
    #[default]
    Standing,
    Attacking(AttackPhase),
    Special(SpecialPhase),
    Flameblast(FlameblastPhase),
    PlayingHit(HitPhase),
    Blocking(FrameCursor),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Standing => PhaseKind::Standing,
            Self::Attacking(_) => PhaseKind::Attacking,
            Self::Special(_) => PhaseKind::Special,
            Self::Flameblast(_) => PhaseKind::Flameblast,
            Self::PlayingHit(_) => PhaseKind::PlayingHit,
            Self::Blocking(_) => PhaseKind::Blocking,
        }
    }

    pub fn rank(&self) -> u8 {
        self.kind().rank()
    }

    /// Facing stays fixed for the whole of these phases
    pub fn locks_facing(&self) -> bool {
        matches!(
            self,
            Self::Attacking(_) | Self::Special(_) | Self::Flameblast(_) | Self::Blocking(_)
        )
    }

    /// Input lockout from a hit
    pub fn is_stunned(&self) -> bool {
        matches!(self, Self::PlayingHit(hit) if hit.is_stunned())
    }

    /// In the hit pose after the lockout has ended
    pub fn is_lingering(&self) -> bool {
        matches!(self, Self::PlayingHit(hit) if !hit.is_stunned())
    }

    /// Winding up a special or heavy attack; hits here earn the interrupt bonus
    pub fn is_charging(&self) -> bool {
        matches!(
            self,
            Self::Special(SpecialPhase::Charging { .. })
                | Self::Flameblast(FlameblastPhase::Charging { .. })
                | Self::Flameblast(FlameblastPhase::Charge { .. })
        )
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Flameblast(FlameblastPhase::Stream { .. }))
    }

    /// Whether a new attack, special or heavy may start now
    pub fn accepts_action(&self) -> bool {
        matches!(self, Self::Standing | Self::Attacking(_)) || self.is_lingering()
    }
}
