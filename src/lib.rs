//! Commenter Royale - a last-agent-standing arena match core
//!
//! Core modules:
//! - `sim`: Match simulation (collisions, speed scaling, rounds, respawns, movement)
//! - `roster`: Candidate agent names and the injected name source
//! - `scoreboard`: Cumulative scores and the ranked display text
//! - `settings`: Runtime configuration loading
//! - `tuning`: Data-driven gameplay balance

pub mod roster;
pub mod scoreboard;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use roster::{NameFile, NameSource, NameSourceError, Roster, StaticNames, resolve_names};
pub use scoreboard::{ScoreBoard, ScoreEntry, Standing};
pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

/// Gameplay constants (defaults for [`Tuning`] and the movement policy)
pub mod consts {
    /// Name that is always present in the roster
    pub const DEFAULT_FALLBACK_NAME: &str = "Anonymous";

    /// Round timing (wall-clock milliseconds)
    pub const GRACE_DURATION_MS: u64 = 3000;
    pub const FIGHT_CUE_MS: u64 = 1000;
    pub const WINNER_ANNOUNCE_MS: u64 = 3000;

    /// Contacts between the same agents inside this window are ignored
    pub const COLLISION_COOLDOWN_MS: u64 = 500;
    /// Top edge must be this far above the other agent's to count as a stomp
    pub const STOMP_THRESHOLD: f32 = 10.0;
    /// Horizontal bounce factors (grace contacts are softer than side hits)
    pub const GRACE_BOUNCE_FACTOR: f32 = 0.8;
    pub const SIDE_BOUNCE_FACTOR: f32 = 1.2;
    /// Upward kick given to the agent that lands a stomp
    pub const STOMP_IMPULSE: f32 = -150.0;

    /// Below this many active agents the speed boost engages
    pub const BOOST_POPULATION: usize = 8;
    pub const BOOSTED_BASE_MULTIPLIER: f32 = 1.5;
    pub const BOOST_INTERVAL_MS: u64 = 10_000;
    pub const BOOST_STEP: f32 = 0.25;
    pub const MAX_BOOSTS: u32 = 8;

    /// Agent defaults
    pub const AGENT_SIZE: f32 = 80.0;
    pub const MIN_HORIZONTAL_SPEED: f32 = 50.0;
    pub const MAX_HORIZONTAL_SPEED: f32 = 100.0;

    /// Flap impulses (negative is up)
    pub const FLAP_IMPULSE_CROWDED: f32 = -150.0;
    pub const FLAP_IMPULSE_SPARSE: f32 = -180.0;

    /// Interval ranges in milliseconds, (min, max) inclusive
    pub const FLAP_INTERVAL_SPARSE: (u64, u64) = (1000, 2500);
    pub const FLAP_INTERVAL_CROWDED: (u64, u64) = (1500, 4000);
    pub const TURN_INTERVAL_SPARSE: (u64, u64) = (2000, 5000);
    pub const TURN_INTERVAL_CROWDED: (u64, u64) = (3000, 8000);

    /// Score lines shown on the HUD
    pub const SCOREBOARD_LINES: usize = 8;
}

/// Milliseconds elapsed from `since` to `now`, zero if the clock stepped back
#[inline]
pub fn elapsed_ms(now: u64, since: u64) -> u64 {
    now.saturating_sub(since)
}
