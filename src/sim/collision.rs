//! Contact resolution between two agents
//!
//! The physics layer decides *that* two agents touched; this module decides
//! what the touch means. An agent whose top edge is clearly above the other's
//! stomps it out of the match; anything closer is a side hit and both agents
//! bounce apart.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Agent, AgentId};
use crate::elapsed_ms;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BounceKind {
    /// Soft bounce while the grace period is running
    Grace,
    /// Non-stomp contact after the grace period
    Side,
}

/// The parts of an agent that contact resolution reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSnapshot {
    pub id: AgentId,
    /// Top edge (smaller is higher)
    pub top: f32,
    pub vel: Vec2,
    pub last_collision_at: Option<u64>,
}

impl ContactSnapshot {
    pub fn of(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            top: agent.top(),
            vel: agent.vel,
            last_collision_at: agent.last_collision_at,
        }
    }

    #[inline]
    fn cooling_down(&self, now: u64, cooldown_ms: u64) -> bool {
        self.last_collision_at
            .is_some_and(|at| elapsed_ms(now, at) < cooldown_ms)
    }
}

/// What a contact should do to the two agents
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Inside the cooldown window; touch nothing
    Ignored,
    Bounce {
        kind: BounceKind,
        vel_a: Vec2,
        vel_b: Vec2,
    },
    Stomp {
        winner: AgentId,
        loser: AgentId,
        winner_vel: Vec2,
    },
}

/// Result of applying a contact to the arena
#[derive(Debug, Clone, PartialEq)]
pub enum ContactOutcome {
    /// One of the handles no longer refers to an active agent
    Stale,
    Ignored,
    Bounced(BounceKind),
    Eliminated {
        winner: AgentId,
        loser: AgentId,
        winner_name: String,
        loser_name: String,
    },
}

/// Reverse and scale horizontal velocity, leaving vertical untouched
#[inline]
pub fn bounce_velocity(vel: Vec2, factor: f32) -> Vec2 {
    Vec2::new(-vel.x * factor, vel.y)
}

/// Decide the effect of a contact between `a` and `b` at `now`
pub fn resolve(
    a: &ContactSnapshot,
    b: &ContactSnapshot,
    grace_active: bool,
    now: u64,
    tuning: &Tuning,
) -> Resolution {
    // Both cooldowns are stamped together, so either one covers the pair
    if a.cooling_down(now, tuning.collision_cooldown_ms)
        || b.cooling_down(now, tuning.collision_cooldown_ms)
    {
        return Resolution::Ignored;
    }

    if grace_active {
        return Resolution::Bounce {
            kind: BounceKind::Grace,
            vel_a: bounce_velocity(a.vel, tuning.grace_bounce_factor),
            vel_b: bounce_velocity(b.vel, tuning.grace_bounce_factor),
        };
    }

    let threshold = tuning.stomp_threshold;
    let (winner, loser) = if a.top < b.top - threshold {
        (a, b)
    } else if b.top < a.top - threshold {
        (b, a)
    } else {
        return Resolution::Bounce {
            kind: BounceKind::Side,
            vel_a: bounce_velocity(a.vel, tuning.side_bounce_factor),
            vel_b: bounce_velocity(b.vel, tuning.side_bounce_factor),
        };
    };

    Resolution::Stomp {
        winner: winner.id,
        loser: loser.id,
        winner_vel: Vec2::new(winner.vel.x, tuning.stomp_impulse),
    }
}
