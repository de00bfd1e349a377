//! Match simulation
//!
//! Everything that decides who flies, who falls and when the next round
//! starts. This module must stay free of rendering and physics:
//! - Wall-clock milliseconds come in from the caller
//! - Seeded RNG only
//! - Stable iteration order (by agent ID)

pub mod collision;
pub mod match_state;
pub mod movement;
pub mod respawn;
pub mod speed;
pub mod state;
pub mod tick;

pub use collision::{BounceKind, ContactOutcome, ContactSnapshot, Resolution, resolve};
pub use match_state::{Banner, Banners, MatchEvent, MatchPhase, MatchState, RoundOutcome};
pub use movement::{MovementContext, Viewport, update_agent, wrap_to_viewport};
pub use respawn::{RespawnAction, evaluate, select_respawn_names};
pub use speed::{SpeedEvent, SpeedState, SpeedUpdate};
pub use state::{Agent, AgentId, Direction, GameEvent, GameState, MovementIntent};
pub use tick::{Contact, HudSnapshot, TickInput, tick};
