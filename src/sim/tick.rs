//! Per-frame simulation driver
//!
//! A frame is three steps: `begin_tick` steers every agent, the external
//! physics layer integrates and calls `resolve_contact` for each overlap it
//! finds, then `end_tick` advances the round and handles winners and
//! respawns. [`tick`] runs all three when contacts are already known.

use serde::{Deserialize, Serialize};

use super::collision::{ContactOutcome, ContactSnapshot, Resolution, resolve};
use super::match_state::{Banners, MatchPhase};
use super::movement::{MovementContext, Viewport, update_agent, wrap_to_viewport};
use super::respawn::{RespawnAction, evaluate, select_respawn_names};
use super::state::{AgentId, Direction, GameEvent, GameState};

/// Two agents the physics layer found overlapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: AgentId,
    pub b: AgentId,
}

/// Inputs for a single frame
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Wall-clock time in milliseconds
    pub now_ms: u64,
    pub viewport: Viewport,
    pub contacts: Vec<Contact>,
}

/// What the display layer draws
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub round: u32,
    pub phase: MatchPhase,
    pub score_text: String,
    pub banners: Banners,
    pub winner: Option<String>,
    pub speed_multiplier: f32,
    pub active_count: usize,
}

impl GameState {
    /// Spawn every roster name and open round one
    pub fn start(&mut self, now: u64) {
        let names = self.roster.names().to_vec();
        for name in &names {
            self.spawn_agent(name, now);
        }
        let event = self.match_state.start_round(now);
        self.emit(GameEvent::Match(event));
    }

    /// Update speed scaling, steer every agent and wrap them to the camera
    pub fn begin_tick(&mut self, now: u64, viewport: &Viewport) -> f32 {
        self.ticks += 1;

        let active = self.agents.len();
        let update = self.speed.compute_multiplier(active, now, &self.tuning);
        self.speed_multiplier = update.multiplier;
        if let Some(event) = update.event {
            self.emit(GameEvent::Speed(event));
        }

        let ctx = MovementContext::new(now, active, update.multiplier, &self.tuning);
        for agent in &mut self.agents {
            update_agent(agent, &ctx, &mut self.rng);
            wrap_to_viewport(agent, viewport);
        }

        update.multiplier
    }

    /// Resolve one contact reported by the physics layer
    pub fn resolve_contact(&mut self, a: AgentId, b: AgentId, now: u64) -> ContactOutcome {
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            log::debug!("Ignoring contact with stale agent #{} / #{}", a, b);
            return ContactOutcome::Stale;
        };
        if ia == ib {
            return ContactOutcome::Stale;
        }

        let snap_a = ContactSnapshot::of(&self.agents[ia]);
        let snap_b = ContactSnapshot::of(&self.agents[ib]);
        let grace = self.match_state.is_grace_active(now);

        match resolve(&snap_a, &snap_b, grace, now, &self.tuning) {
            Resolution::Ignored => ContactOutcome::Ignored,
            Resolution::Bounce { kind, vel_a, vel_b } => {
                for (index, vel) in [(ia, vel_a), (ib, vel_b)] {
                    let agent = &mut self.agents[index];
                    agent.vel = vel;
                    agent.last_collision_at = Some(now);
                    agent.intent.bounced_at = Some(now);
                    // Keep the reversal once movement reapplies the heading
                    if let Some(direction) = Direction::from_velocity(vel.x) {
                        agent.intent.direction = direction;
                    }
                }
                self.emit(GameEvent::Bounced { a, b, kind });
                ContactOutcome::Bounced(kind)
            }
            Resolution::Stomp {
                winner,
                loser,
                winner_vel,
            } => {
                let (wi, li) = if winner == a { (ia, ib) } else { (ib, ia) };
                self.agents[li].last_collision_at = Some(now);
                let winner_agent = &mut self.agents[wi];
                winner_agent.vel = winner_vel;
                winner_agent.last_collision_at = Some(now);
                let winner_name = winner_agent.name.clone();

                let loser_name = match self.remove_agent(loser) {
                    Some(agent) => agent.name,
                    None => return ContactOutcome::Stale,
                };
                let event = self.match_state.record_elimination(&winner_name, &loser_name);
                self.emit(GameEvent::Match(event));

                ContactOutcome::Eliminated {
                    winner,
                    loser,
                    winner_name,
                    loser_name,
                }
            }
        }
    }

    /// Advance the round clock, then announce winners or respawn
    pub fn end_tick(&mut self, now: u64) {
        for event in self.match_state.tick(now) {
            self.emit(GameEvent::Match(event));
        }

        let action = {
            let active = self.active_names();
            evaluate(&active, self.roster.len(), &self.match_state, now)
        };

        match action {
            RespawnAction::None => {}
            RespawnAction::AnnounceWinner(outcome) => {
                let event = self.match_state.announce(outcome, now);
                self.emit(GameEvent::Match(event));
            }
            RespawnAction::Respawn(count) => self.respawn(count, now),
        }
    }

    fn respawn(&mut self, count: usize, now: u64) {
        let names = {
            let active: Vec<&str> = self.agents.iter().map(|a| a.name.as_str()).collect();
            select_respawn_names(&self.roster, &active, count, &mut self.rng)
        };
        log::info!("Respawning {} of {} requested agents", names.len(), count);
        for name in &names {
            self.spawn_agent(name, now);
        }
        let event = self.match_state.complete_respawn(now, &mut self.speed);
        self.speed_multiplier = 1.0;
        self.emit(GameEvent::Match(event));
    }

    pub fn hud(&self, now: u64) -> HudSnapshot {
        let score_text = self
            .match_state
            .scores()
            .render_hud(|name| self.is_active(name));
        HudSnapshot {
            round: self.match_state.round(),
            phase: self.match_state.phase(),
            score_text,
            banners: self.match_state.banners(now),
            winner: self
                .match_state
                .outcome()
                .and_then(|o| o.winner())
                .map(str::to_string),
            speed_multiplier: self.speed_multiplier,
            active_count: self.agents.len(),
        }
    }
}

/// Run a whole frame: steer, resolve the reported contacts, advance the round
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<ContactOutcome> {
    state.begin_tick(input.now_ms, &input.viewport);
    let outcomes = input
        .contacts
        .iter()
        .map(|c| state.resolve_contact(c.a, c.b, input.now_ms))
        .collect();
    state.end_tick(input.now_ms);
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Roster;
    use crate::settings::Settings;
    use crate::sim::collision::BounceKind;

    fn new_state(names: &[&str]) -> GameState {
        let fetched: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let settings = Settings {
            seed: Some(12345),
            ..Default::default()
        };
        GameState::new(Roster::new("Host", &fetched), &settings).unwrap()
    }

    fn viewport() -> Viewport {
        Viewport::new(0.0, 0.0, 1280.0, 720.0)
    }

    fn id_of(state: &GameState, name: &str) -> AgentId {
        state.agent_by_name(name).map(|a| a.id).unwrap()
    }

    #[test]
    fn test_start_spawns_whole_roster() {
        let mut state = new_state(&["a", "b"]);
        state.start(0);
        assert_eq!(state.active_count(), 3);
        assert_eq!(state.match_state.round(), 1);
        assert_eq!(state.match_state.phase(), MatchPhase::GracePeriod);

        let spawned = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::AgentSpawned { .. }))
            .count();
        assert_eq!(spawned, 3);
    }

    #[test]
    fn test_grace_contact_bounces_and_flips_heading() {
        let mut state = new_state(&["a"]);
        state.start(0);
        state.begin_tick(16, &viewport());

        let (host, a) = (id_of(&state, "Host"), id_of(&state, "a"));
        let heading = state.agent(host).unwrap().intent.direction;
        assert_eq!(
            state.resolve_contact(host, a, 16),
            ContactOutcome::Bounced(BounceKind::Grace)
        );
        assert_ne!(state.agent(host).unwrap().intent.direction, heading);
        assert_eq!(state.agent(host).unwrap().last_collision_at, Some(16));
        assert_eq!(state.agent(a).unwrap().last_collision_at, Some(16));

        // Same overlap on the next substep
        assert_eq!(state.resolve_contact(a, host, 20), ContactOutcome::Ignored);
    }

    #[test]
    fn test_bounce_factor_survives_into_next_frame() {
        let mut state = new_state(&["a"]);
        state.start(0);
        state.begin_tick(16, &viewport());

        let (host, a) = (id_of(&state, "Host"), id_of(&state, "a"));
        let pre = state.agent(host).unwrap().vel.x;
        state.resolve_contact(host, a, 16);
        let bounced = state.agent(host).unwrap().vel.x;
        assert!((bounced + pre * 0.8).abs() < 1e-4);

        state.end_tick(16);
        state.begin_tick(32, &viewport());
        assert_eq!(state.agent(host).unwrap().vel.x, bounced);

        // Normal steering resumes on the frame after, in the new direction
        state.begin_tick(48, &viewport());
        let vel = state.agent(host).unwrap().vel.x;
        assert!((vel.abs() - pre.abs()).abs() < 1e-4);
        assert_eq!(vel.signum(), bounced.signum());
    }

    #[test]
    fn test_stale_and_self_contacts_are_noops() {
        let mut state = new_state(&["a"]);
        state.start(0);
        let host = id_of(&state, "Host");
        assert_eq!(state.resolve_contact(host, 999, 5_000), ContactOutcome::Stale);
        assert_eq!(state.resolve_contact(host, host, 5_000), ContactOutcome::Stale);
    }

    #[test]
    fn test_hud_lists_scores_and_banners() {
        let mut state = new_state(&["a"]);
        state.start(0);
        let hud = state.hud(100);
        assert!(hud.banners.grace);
        assert_eq!(hud.active_count, 2);
        assert_eq!(hud.score_text, "1. Host: 0\n2. a: 0");
        assert_eq!(hud.winner, None);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state(&["a", "b", "c"]);
        let mut state2 = new_state(&["a", "b", "c"]);
        state1.start(0);
        state2.start(0);

        for frame in 1..600u64 {
            let input = TickInput {
                now_ms: frame * 16,
                viewport: viewport(),
                contacts: Vec::new(),
            };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        for (x, y) in state1.agents.iter().zip(&state2.agents) {
            assert_eq!(x.intent, y.intent);
            assert_eq!(x.vel, y.vel);
        }
    }
}
