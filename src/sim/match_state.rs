//! Round lifecycle
//!
//! A round runs GracePeriod -> Active -> WinnerAnnounced, then a respawn
//! starts the next one. Transition events come from comparing the phase and
//! banner flags before and after each update, so every edge fires once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::elapsed_ms;
use crate::roster::Roster;
use crate::scoreboard::ScoreBoard;
use crate::tuning::Tuning;

use super::speed::SpeedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Collisions bounce but never eliminate
    GracePeriod,
    Active,
    /// Last survivor shown; waiting to respawn
    WinnerAnnounced,
}

/// How a round ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Winner(String),
    NoSurvivors,
}

impl RoundOutcome {
    /// Outcome for the agents still standing
    pub fn from_survivors(names: &[&str]) -> Self {
        match names.first() {
            Some(name) => RoundOutcome::Winner(name.to_string()),
            None => RoundOutcome::NoSurvivors,
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            RoundOutcome::Winner(name) => Some(name.as_str()),
            RoundOutcome::NoSurvivors => None,
        }
    }
}

/// HUD banners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    Grace,
    Fight,
    Winner,
}

/// Banner visibility flags for the display layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banners {
    pub grace: bool,
    pub fight: bool,
    pub winner: bool,
}

impl Banners {
    fn changes(self, current: Banners) -> impl Iterator<Item = (Banner, bool)> {
        [
            (Banner::Grace, self.grace, current.grace),
            (Banner::Fight, self.fight, current.fight),
            (Banner::Winner, self.winner, current.winner),
        ]
        .into_iter()
        .filter(|(_, before, after)| before != after)
        .map(|(banner, _, after)| (banner, after))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    RoundStarted { round: u32 },
    GraceEnded { round: u32 },
    BannerChanged { banner: Banner, visible: bool },
    Eliminated { winner: String, loser: String, score: u32 },
    WinnerAnnounced { round: u32, outcome: RoundOutcome },
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchEvent::RoundStarted { round } => write!(f, "Round {} started, grace period on", round),
            MatchEvent::GraceEnded { round } => write!(f, "Round {}: grace period over, fight!", round),
            MatchEvent::BannerChanged { banner, visible } => {
                write!(f, "{:?} banner {}", banner, if *visible { "shown" } else { "hidden" })
            }
            MatchEvent::Eliminated { winner, loser, score } => {
                write!(f, "{} stomped {} (score {})", winner, loser, score)
            }
            MatchEvent::WinnerAnnounced { round, outcome } => match outcome {
                RoundOutcome::Winner(name) => write!(f, "Round {} winner: {}", round, name),
                RoundOutcome::NoSurvivors => write!(f, "Round {} ended with no survivors", round),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    phase: MatchPhase,
    round: u32,
    round_started_at: u64,
    grace_ended_at: Option<u64>,
    winner_announced_at: Option<u64>,
    outcome: Option<RoundOutcome>,
    eliminations: u32,
    grace_duration_ms: u64,
    fight_cue_ms: u64,
    winner_announce_ms: u64,
    /// Banner flags as of the last update (edge detection)
    shown: Banners,
    scores: ScoreBoard,
}

impl MatchState {
    pub fn new(tuning: &Tuning, roster: &Roster) -> Self {
        let mut scores = ScoreBoard::new();
        for name in roster.names() {
            scores.ensure(name);
        }
        Self {
            phase: MatchPhase::GracePeriod,
            round: 0,
            round_started_at: 0,
            grace_ended_at: None,
            winner_announced_at: None,
            outcome: None,
            eliminations: 0,
            grace_duration_ms: tuning.grace_duration_ms,
            fight_cue_ms: tuning.fight_cue_ms,
            winner_announce_ms: tuning.winner_announce_ms,
            shown: Banners::default(),
            scores,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn round_started_at(&self) -> u64 {
        self.round_started_at
    }

    pub fn winner_announced_at(&self) -> Option<u64> {
        self.winner_announced_at
    }

    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.outcome.as_ref()
    }

    /// Eliminations in the current round
    pub fn eliminations(&self) -> u32 {
        self.eliminations
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreBoard {
        &mut self.scores
    }

    /// Begin a new round in the grace period
    pub fn start_round(&mut self, now: u64) -> MatchEvent {
        self.phase = MatchPhase::GracePeriod;
        self.round += 1;
        self.round_started_at = now;
        self.grace_ended_at = None;
        self.winner_announced_at = None;
        self.outcome = None;
        self.eliminations = 0;
        self.shown = self.banners(now);
        MatchEvent::RoundStarted { round: self.round }
    }

    /// Whether contacts at `now` must not eliminate.
    ///
    /// Reads the clock directly so contacts arriving before this tick's
    /// update still see the exact boundary.
    pub fn is_grace_active(&self, now: u64) -> bool {
        self.phase == MatchPhase::GracePeriod
            && elapsed_ms(now, self.round_started_at) < self.grace_duration_ms
    }

    pub fn grace_remaining(&self, now: u64) -> u64 {
        if self.phase != MatchPhase::GracePeriod {
            return 0;
        }
        self.grace_duration_ms
            .saturating_sub(elapsed_ms(now, self.round_started_at))
    }

    pub fn banners(&self, now: u64) -> Banners {
        let fight = match (self.phase, self.grace_ended_at) {
            (MatchPhase::Active, Some(ended)) => elapsed_ms(now, ended) < self.fight_cue_ms,
            _ => false,
        };
        Banners {
            grace: self.phase == MatchPhase::GracePeriod,
            fight,
            winner: self.phase == MatchPhase::WinnerAnnounced,
        }
    }

    /// Advance timers and report the transitions that happened since the
    /// previous update
    pub fn tick(&mut self, now: u64) -> Vec<MatchEvent> {
        let previous = self.phase;

        if self.phase == MatchPhase::GracePeriod
            && elapsed_ms(now, self.round_started_at) >= self.grace_duration_ms
        {
            self.phase = MatchPhase::Active;
            self.grace_ended_at = Some(self.round_started_at + self.grace_duration_ms);
        }

        let mut events = Vec::new();
        if previous == MatchPhase::GracePeriod && self.phase == MatchPhase::Active {
            events.push(MatchEvent::GraceEnded { round: self.round });
        }

        let current = self.banners(now);
        events.extend(
            self.shown
                .changes(current)
                .map(|(banner, visible)| MatchEvent::BannerChanged { banner, visible }),
        );
        self.shown = current;
        events
    }

    /// Award the stomp; the arena removes the loser
    pub fn record_elimination(&mut self, winner: &str, loser: &str) -> MatchEvent {
        let score = self.scores.award(winner);
        self.eliminations += 1;
        MatchEvent::Eliminated {
            winner: winner.to_string(),
            loser: loser.to_string(),
            score,
        }
    }

    /// A lone survivor only wins when someone else could have been fighting
    pub fn winner_due(&self, active_count: usize, roster_size: usize) -> bool {
        active_count <= 1 && roster_size > 1 && self.phase != MatchPhase::WinnerAnnounced
    }

    /// Announce the round result if the population calls for it
    pub fn check_winner(
        &mut self,
        active_names: &[&str],
        roster_size: usize,
        now: u64,
    ) -> Option<RoundOutcome> {
        if !self.winner_due(active_names.len(), roster_size) {
            return None;
        }
        let outcome = RoundOutcome::from_survivors(active_names);
        self.announce(outcome.clone(), now);
        Some(outcome)
    }

    pub fn announce(&mut self, outcome: RoundOutcome, now: u64) -> MatchEvent {
        self.phase = MatchPhase::WinnerAnnounced;
        self.winner_announced_at = Some(now);
        self.outcome = Some(outcome.clone());
        MatchEvent::WinnerAnnounced {
            round: self.round,
            outcome,
        }
    }

    pub fn ready_to_respawn(&self, now: u64) -> bool {
        match (self.phase, self.winner_announced_at) {
            (MatchPhase::WinnerAnnounced, Some(at)) => elapsed_ms(now, at) >= self.winner_announce_ms,
            _ => false,
        }
    }

    /// Start the next round after respawning
    pub fn complete_respawn(&mut self, now: u64, speed: &mut SpeedState) -> MatchEvent {
        speed.reset();
        self.start_round(now)
    }
}
