//! When and whom to respawn
//!
//! After the last survivor has been on screen for the announcement window,
//! the arena is refilled with roster names that are not already flying.

use rand::Rng;
use rand::seq::SliceRandom;

use super::match_state::{MatchState, RoundOutcome};
use crate::roster::Roster;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespawnAction {
    None,
    AnnounceWinner(RoundOutcome),
    /// Spawn this many agents and start the next round
    Respawn(usize),
}

/// Decide what the population calls for this tick
pub fn evaluate(
    active_names: &[&str],
    roster_size: usize,
    match_state: &MatchState,
    now: u64,
) -> RespawnAction {
    if match_state.winner_due(active_names.len(), roster_size) {
        return RespawnAction::AnnounceWinner(RoundOutcome::from_survivors(active_names));
    }
    if match_state.ready_to_respawn(now) {
        return RespawnAction::Respawn(roster_size.saturating_sub(active_names.len()));
    }
    RespawnAction::None
}

/// Pick up to `count` distinct roster names that are not active, uniformly
/// at random
pub fn select_respawn_names<R: Rng + ?Sized>(
    roster: &Roster,
    active_names: &[&str],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut candidates: Vec<&String> = roster
        .names()
        .iter()
        .filter(|name| !active_names.contains(&name.as_str()))
        .collect();
    candidates.shuffle(rng);
    candidates.into_iter().take(count).cloned().collect()
}
