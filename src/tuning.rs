//! Data-driven game balance
//!
//! Every timing window and collision constant the match core uses, in one
//! serializable block so settings files can override individual values.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Round timing ===
    pub grace_duration_ms: u64,
    pub fight_cue_ms: u64,
    pub winner_announce_ms: u64,

    // === Collisions ===
    pub collision_cooldown_ms: u64,
    pub stomp_threshold: f32,
    pub grace_bounce_factor: f32,
    pub side_bounce_factor: f32,
    pub stomp_impulse: f32,

    // === Speed scaling ===
    pub boost_population: usize,
    pub boosted_base_multiplier: f32,
    pub boost_interval_ms: u64,
    pub boost_step: f32,
    pub max_boosts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grace_duration_ms: GRACE_DURATION_MS,
            fight_cue_ms: FIGHT_CUE_MS,
            winner_announce_ms: WINNER_ANNOUNCE_MS,

            collision_cooldown_ms: COLLISION_COOLDOWN_MS,
            stomp_threshold: STOMP_THRESHOLD,
            grace_bounce_factor: GRACE_BOUNCE_FACTOR,
            side_bounce_factor: SIDE_BOUNCE_FACTOR,
            stomp_impulse: STOMP_IMPULSE,

            boost_population: BOOST_POPULATION,
            boosted_base_multiplier: BOOSTED_BASE_MULTIPLIER,
            boost_interval_ms: BOOST_INTERVAL_MS,
            boost_step: BOOST_STEP,
            max_boosts: MAX_BOOSTS,
        }
    }
}

impl Tuning {
    /// Highest multiplier the progressive boost can reach
    pub fn max_progressive_multiplier(&self) -> f32 {
        1.0 + self.boost_step * self.max_boosts as f32
    }

    /// Whether `active_count` agents is few enough to engage the boost
    #[inline]
    pub fn is_sparse(&self, active_count: usize) -> bool {
        active_count < self.boost_population
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.grace_duration_ms, 3000);
        assert_eq!(tuning.winner_announce_ms, 3000);
        assert_eq!(tuning.collision_cooldown_ms, 500);
        assert!((tuning.max_progressive_multiplier() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_override() {
        let tuning: Tuning = serde_json::from_str(r#"{ "grace_duration_ms": 5000 }"#).unwrap();
        assert_eq!(tuning.grace_duration_ms, 5000);
        assert_eq!(tuning.fight_cue_ms, FIGHT_CUE_MS);
        assert!(tuning.is_sparse(7));
        assert!(!tuning.is_sparse(8));
    }
}
