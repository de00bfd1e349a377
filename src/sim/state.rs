//! Match state and core simulation types
//!
//! Agents live in an id-sorted arena owned by [`GameState`]. Nothing else holds
//! an agent: elimination removes it outright and only its score survives.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::BounceKind;
use super::match_state::{MatchEvent, MatchState};
use super::speed::{SpeedEvent, SpeedState};
use crate::consts::AGENT_SIZE;
use crate::roster::Roster;
use crate::settings::{Settings, SettingsError};
use crate::tuning::Tuning;

/// Stable agent handle; never reused within a session
pub type AgentId = u32;

/// Horizontal heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    /// Heading implied by a horizontal velocity (`None` when stationary)
    pub fn from_velocity(vx: f32) -> Option<Self> {
        if vx > 0.0 {
            Some(Direction::Right)
        } else if vx < 0.0 {
            Some(Direction::Left)
        } else {
            None
        }
    }
}

/// Autonomous flight plan for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementIntent {
    /// Horizontal speed before the population multiplier
    pub base_speed: f32,
    pub direction: Direction,
    pub last_flap_at: u64,
    pub next_flap_interval: u64,
    pub last_turn_at: u64,
    pub next_turn_interval: u64,
    /// Set by a bounce; the next steering pass keeps the bounced `vel.x`
    #[serde(default)]
    pub bounced_at: Option<u64>,
}

/// A simulated combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    /// Center position in world space
    pub pos: Vec2,
    pub vel: Vec2,
    /// Visual size (wrap margin is half of this)
    pub size: Vec2,
    pub intent: MovementIntent,
    /// Time of the last processed contact (collision cooldown)
    pub last_collision_at: Option<u64>,
    pub spawned_at: u64,
}

impl Agent {
    pub fn new(id: AgentId, name: String, pos: Vec2, intent: MovementIntent, now: u64) -> Self {
        Self {
            id,
            name,
            pos,
            vel: Vec2::ZERO,
            size: Vec2::splat(AGENT_SIZE),
            intent,
            last_collision_at: None,
            spawned_at: now,
        }
    }

    /// Y coordinate of the top edge (screen space, smaller is higher)
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }
}

/// Everything observable that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Create a visual for this agent
    AgentSpawned { id: AgentId, name: String },
    /// Release the agent's visual resources
    AgentRemoved { id: AgentId, name: String },
    Bounced {
        a: AgentId,
        b: AgentId,
        kind: BounceKind,
    },
    Match(MatchEvent),
    Speed(SpeedEvent),
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub roster: Roster,
    pub tuning: Tuning,
    /// Spawn area corners
    pub spawn_min: Vec2,
    pub spawn_max: Vec2,
    /// Active agents (sorted by id for determinism)
    pub agents: Vec<Agent>,
    pub match_state: MatchState,
    pub speed: SpeedState,
    /// Multiplier applied on the latest tick
    pub speed_multiplier: f32,
    /// Number of begin_tick calls
    pub ticks: u64,
    events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: AgentId,
}

impl GameState {
    /// Build a match from `settings`, rejecting ones that fail validation
    pub fn new(roster: Roster, settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let seed = settings.effective_seed();
        let match_state = MatchState::new(&settings.tuning, &roster);
        Ok(Self {
            seed,
            roster,
            tuning: settings.tuning.clone(),
            spawn_min: settings.spawn_min,
            spawn_max: settings.spawn_max,
            agents: Vec::new(),
            match_state,
            speed: SpeedState::default(),
            speed_multiplier: 1.0,
            ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        })
    }

    /// Allocate a new agent ID
    pub fn next_agent_id(&mut self) -> AgentId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn active_count(&self) -> usize {
        self.agents.len()
    }

    pub fn active_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.agents.iter().any(|a| a.name == name)
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.index_of(id).map(|i| &self.agents[i])
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.index_of(id).map(move |i| &mut self.agents[i])
    }

    pub fn agent_by_name(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub(crate) fn index_of(&self, id: AgentId) -> Option<usize> {
        self.agents.binary_search_by_key(&id, |a| a.id).ok()
    }

    /// Spawn `name` at a random point in the spawn area.
    ///
    /// Returns `None` if an agent with that name is already active.
    pub fn spawn_agent(&mut self, name: &str, now: u64) -> Option<AgentId> {
        if self.is_active(name) {
            log::debug!("Skipping spawn of {}: already active", name);
            return None;
        }
        let pos = Vec2::new(
            self.rng.random_range(self.spawn_min.x..=self.spawn_max.x),
            self.rng.random_range(self.spawn_min.y..=self.spawn_max.y),
        );
        let sparse = self.tuning.is_sparse(self.agents.len() + 1);
        let intent = MovementIntent::spawn(now, sparse, &mut self.rng);
        let id = self.next_agent_id();
        self.agents.push(Agent::new(id, name.to_string(), pos, intent, now));
        self.match_state.scores_mut().ensure(name);
        self.emit(GameEvent::AgentSpawned {
            id,
            name: name.to_string(),
        });
        Some(id)
    }

    /// Remove an agent from the arena
    pub fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        let index = self.index_of(id)?;
        let agent = self.agents.remove(index);
        self.emit(GameEvent::AgentRemoved {
            id: agent.id,
            name: agent.name.clone(),
        });
        Some(agent)
    }

    /// Events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        match &event {
            GameEvent::AgentSpawned { id, name } => log::debug!("Spawned {} (#{})", name, id),
            GameEvent::AgentRemoved { id, name } => log::debug!("Removed {} (#{})", name, id),
            GameEvent::Bounced { a, b, kind } => log::debug!("{:?} bounce #{} <-> #{}", kind, a, b),
            GameEvent::Match(e) => log::info!("{}", e),
            GameEvent::Speed(SpeedEvent::BoostEngaged) => log::info!("Speed boost engaged"),
            GameEvent::Speed(SpeedEvent::BoostStacked { count, multiplier }) => {
                log::info!("Speed boost x{} (multiplier {:.3})", count, multiplier)
            }
            GameEvent::Speed(SpeedEvent::BoostReleased) => log::info!("Speed boost released"),
        }
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            seed: Some(42),
            ..Default::default()
        }
    }

    fn roster(names: &[&str]) -> Roster {
        let fetched: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        Roster::new("Host", &fetched)
    }

    #[test]
    fn test_spawn_unique_names() {
        let mut state = GameState::new(roster(&["a"]), &settings()).unwrap();
        let first = state.spawn_agent("a", 0);
        assert!(first.is_some());
        assert_eq!(state.spawn_agent("a", 0), None);
        assert_eq!(state.active_count(), 1);

        let agent = state.agent(first.unwrap()).unwrap();
        assert!(agent.pos.x >= state.spawn_min.x && agent.pos.x <= state.spawn_max.x);
        assert_eq!(agent.top(), agent.pos.y - AGENT_SIZE / 2.0);
    }

    #[test]
    fn test_ids_are_sorted_and_not_reused() {
        let mut state = GameState::new(roster(&["a", "b"]), &settings()).unwrap();
        let a = state.spawn_agent("a", 0).unwrap();
        let b = state.spawn_agent("b", 0).unwrap();
        state.remove_agent(a);
        let a2 = state.spawn_agent("a", 10).unwrap();
        assert!(a2 > b);
        let ids: Vec<AgentId> = state.agents.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![b, a2]);
        assert!(state.agent(a).is_none());
    }

    #[test]
    fn test_events_drain() {
        let mut state = GameState::new(roster(&[]), &settings()).unwrap();
        state.spawn_agent("Host", 0);
        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::AgentSpawned { .. }));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_new_rejects_inverted_spawn_area() {
        let settings = Settings {
            spawn_min: Vec2::new(500.0, 0.0),
            spawn_max: Vec2::new(100.0, 100.0),
            ..settings()
        };
        assert!(matches!(
            GameState::new(roster(&["a"]), &settings),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_direction_from_velocity() {
        assert_eq!(Direction::from_velocity(-3.0), Some(Direction::Left));
        assert_eq!(Direction::from_velocity(0.0), None);
        assert_eq!(Direction::Right.sign(), 1.0);
    }
}
