//! Commenter Royale headless runner
//!
//! Plays matches without a renderer: a toy integrator stands in for the
//! physics engine and reports box overlaps as contacts.
//!
//! Usage: `commenter-royale [names.txt] [rounds]`

use glam::Vec2;

use commenter_royale::sim::{Contact, GameEvent, GameState, MatchEvent, Viewport};
use commenter_royale::{NameFile, NameSource, Roster, Settings, StaticNames};

/// Downward acceleration of the stand-in physics (px/s^2)
const GRAVITY: f32 = 300.0;
/// Simulated time limit per run
const MAX_SIM_MS: u64 = 30 * 60 * 1000;

fn demo_names() -> StaticNames {
    StaticNames(
        [
            "pixel_pete", "CaptainComment", "lurker_42", "NightOwlNina", "firstcomment",
            "SubToMe", "the_real_dave", "VideoAppreciator", "tl;dr", "ModsAsleep",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    )
}

/// Integrate one step and report overlapping pairs
fn step_physics(state: &mut GameState, dt: f32) -> Vec<Contact> {
    for agent in &mut state.agents {
        agent.vel.y += GRAVITY * dt;
        agent.pos += agent.vel * dt;
    }

    let mut contacts = Vec::new();
    for (i, a) in state.agents.iter().enumerate() {
        for b in &state.agents[i + 1..] {
            let reach: Vec2 = a.half_size() + b.half_size();
            let gap = (a.pos - b.pos).abs();
            if gap.x < reach.x && gap.y < reach.y {
                contacts.push(Contact { a: a.id, b: b.id });
            }
        }
    }
    contacts
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Commenter Royale v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load_or_default();
    let mut args = std::env::args().skip(1);

    let mut source: Box<dyn NameSource> = match args.next() {
        Some(path) => Box::new(NameFile::new(path)),
        None => Box::new(demo_names()),
    };
    let rounds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);

    let roster = Roster::load(&settings.fallback_name, source.as_mut());
    let mut state = match GameState::new(roster, &settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start match: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Session seed: {}", state.seed);

    let frame_ms = (1000 / settings.tick_hz.max(1)).max(1) as u64;
    let dt = frame_ms as f32 / 1000.0;
    let viewport = Viewport {
        min: Vec2::ZERO,
        size: settings.viewport_size,
    };

    let mut now = 0;
    state.start(now);

    while now < MAX_SIM_MS {
        now += frame_ms;

        state.begin_tick(now, &viewport);
        for contact in step_physics(&mut state, dt) {
            state.resolve_contact(contact.a, contact.b, now);
        }
        state.end_tick(now);

        let mut round_over = false;
        for event in state.drain_events() {
            if let GameEvent::Match(MatchEvent::WinnerAnnounced { round, .. }) = event {
                log::info!("Standings after round {}:\n{}", round, state.hud(now).score_text);
                round_over = round >= rounds;
            }
        }
        if round_over {
            break;
        }
    }

    let hud = state.hud(now);
    log::info!(
        "Finished after {:.1}s simulated, round {}, {} agents active",
        now as f64 / 1000.0,
        hud.round,
        hud.active_count
    );
}
