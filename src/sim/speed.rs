//! Population-driven speed scaling
//!
//! Once fewer than `boost_population` agents remain, everyone flies faster,
//! and the longer the population stays low the more the boost stacks.

use serde::{Deserialize, Serialize};

use crate::elapsed_ms;
use crate::tuning::Tuning;

/// Speed boost transitions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpeedEvent {
    BoostEngaged,
    BoostStacked { count: u32, multiplier: f32 },
    BoostReleased,
}

/// Multiplier for this tick plus the transition it caused, if any
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedUpdate {
    pub multiplier: f32,
    pub event: Option<SpeedEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedState {
    pub boosted: bool,
    pub progressive_multiplier: f32,
    pub boost_count: u32,
    pub last_boost_at: Option<u64>,
}

impl Default for SpeedState {
    fn default() -> Self {
        Self {
            boosted: false,
            progressive_multiplier: 1.0,
            boost_count: 0,
            last_boost_at: None,
        }
    }
}

impl SpeedState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance the boost state and return the multiplier for `active_count`
    pub fn compute_multiplier(&mut self, active_count: usize, now: u64, tuning: &Tuning) -> SpeedUpdate {
        let sparse = tuning.is_sparse(active_count);
        let mut event = None;

        if sparse && !self.boosted {
            self.boosted = true;
            self.progressive_multiplier = 1.0;
            self.boost_count = 0;
            self.last_boost_at = Some(now);
            event = Some(SpeedEvent::BoostEngaged);
        } else if !sparse && self.boosted {
            self.reset();
            event = Some(SpeedEvent::BoostReleased);
        }

        if self.boosted {
            // Catch up on every full interval so long frames stack correctly
            while self.boost_count < tuning.max_boosts {
                let Some(last) = self.last_boost_at else { break };
                if elapsed_ms(now, last) < tuning.boost_interval_ms {
                    break;
                }
                self.boost_count += 1;
                self.progressive_multiplier += tuning.boost_step;
                self.last_boost_at = Some(last + tuning.boost_interval_ms);
                event = Some(SpeedEvent::BoostStacked {
                    count: self.boost_count,
                    multiplier: tuning.boosted_base_multiplier * self.progressive_multiplier,
                });
            }
        }

        SpeedUpdate {
            multiplier: self.multiplier(tuning),
            event,
        }
    }

    /// Current multiplier without advancing any timers
    pub fn multiplier(&self, tuning: &Tuning) -> f32 {
        if self.boosted {
            tuning.boosted_base_multiplier * self.progressive_multiplier
        } else {
            1.0
        }
    }
}
