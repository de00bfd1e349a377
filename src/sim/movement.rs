//! Autonomous flight
//!
//! Agents turn and flap on randomized timers. With fewer agents left the
//! timers get shorter and flaps get stronger, so sparse arenas stay lively.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Agent, Direction, MovementIntent};
use crate::consts::*;
use crate::elapsed_ms;
use crate::tuning::Tuning;

/// Camera viewport in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

/// Per-tick inputs shared by every agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementContext {
    pub now: u64,
    /// Fewer agents than the boost population
    pub sparse: bool,
    pub speed_multiplier: f32,
}

impl MovementContext {
    pub fn new(now: u64, active_count: usize, speed_multiplier: f32, tuning: &Tuning) -> Self {
        Self {
            now,
            sparse: tuning.is_sparse(active_count),
            speed_multiplier,
        }
    }

    #[inline]
    pub fn flap_impulse(&self) -> f32 {
        if self.sparse {
            FLAP_IMPULSE_SPARSE
        } else {
            FLAP_IMPULSE_CROWDED
        }
    }
}

fn flap_interval<R: Rng + ?Sized>(sparse: bool, rng: &mut R) -> u64 {
    let (min, max) = if sparse {
        FLAP_INTERVAL_SPARSE
    } else {
        FLAP_INTERVAL_CROWDED
    };
    rng.random_range(min..=max)
}

fn turn_interval<R: Rng + ?Sized>(sparse: bool, rng: &mut R) -> u64 {
    let (min, max) = if sparse {
        TURN_INTERVAL_SPARSE
    } else {
        TURN_INTERVAL_CROWDED
    };
    rng.random_range(min..=max)
}

fn base_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(MIN_HORIZONTAL_SPEED..=MAX_HORIZONTAL_SPEED)
}

impl MovementIntent {
    /// Fresh flight plan for an agent spawned at `now`
    pub fn spawn<R: Rng + ?Sized>(now: u64, sparse: bool, rng: &mut R) -> Self {
        Self {
            base_speed: base_speed(rng),
            direction: Direction::random(rng),
            last_flap_at: now,
            next_flap_interval: flap_interval(sparse, rng),
            last_turn_at: now,
            next_turn_interval: turn_interval(sparse, rng),
            bounced_at: None,
        }
    }
}

/// Apply turn/flap timers and set the agent's velocity for this tick.
///
/// An agent bounced since the last call keeps its bounced horizontal velocity
/// for one more frame so physics integrates it.
pub fn update_agent<R: Rng + ?Sized>(agent: &mut Agent, ctx: &MovementContext, rng: &mut R) {
    let intent = &mut agent.intent;

    if elapsed_ms(ctx.now, intent.last_turn_at) > intent.next_turn_interval {
        intent.direction = Direction::random(rng);
        intent.base_speed = base_speed(rng);
        intent.next_turn_interval = turn_interval(ctx.sparse, rng);
        intent.last_turn_at = ctx.now;
    }

    if elapsed_ms(ctx.now, intent.last_flap_at) > intent.next_flap_interval {
        agent.vel.y = ctx.flap_impulse();
        intent.next_flap_interval = flap_interval(ctx.sparse, rng);
        intent.last_flap_at = ctx.now;
    }

    if intent.bounced_at.take().is_none() {
        agent.vel.x = intent.base_speed * ctx.speed_multiplier * intent.direction.sign();
    }
}

/// Teleport an agent that drifted half its size past a viewport edge to the
/// same distance beyond the opposite edge. Returns true if it moved.
pub fn wrap_to_viewport(agent: &mut Agent, viewport: &Viewport) -> bool {
    let margin = agent.half_size();
    let min = viewport.min - margin;
    let max = viewport.max() + margin;
    let before = agent.pos;

    if agent.pos.x < min.x {
        agent.pos.x = max.x;
    } else if agent.pos.x > max.x {
        agent.pos.x = min.x;
    }

    if agent.pos.y < min.y {
        agent.pos.y = max.y;
    } else if agent.pos.y > max.y {
        agent.pos.y = min.y;
    }

    agent.pos != before
}
