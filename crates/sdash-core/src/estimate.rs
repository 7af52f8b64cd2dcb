//! Approximation policy for reach and impressions.
//!
//! The analytics API does not always report reach or impressions for a post.
//! When it doesn't, both are approximated from interactions. The factors are
//! an approximation policy, not a validated model; swap in measured values by
//! changing [`ReachEstimate::DEFAULT`] or passing a custom policy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachEstimate {
    /// Estimated reach per interaction.
    pub reach_per_interaction: f64,
    /// Estimated impressions per unit of reach.
    pub impressions_per_reach: f64,
}

impl ReachEstimate {
    pub const DEFAULT: ReachEstimate = ReachEstimate {
        reach_per_interaction: 2.5,
        impressions_per_reach: 1.2,
    };

    /// Returns `measured` when present, otherwise `interactions × reach_per_interaction`.
    #[must_use]
    pub fn reach(&self, measured: Option<u64>, interactions: u64) -> u64 {
        measured.unwrap_or_else(|| scale(interactions, self.reach_per_interaction))
    }

    /// Returns `measured` when present, otherwise `reach × impressions_per_reach`.
    #[must_use]
    pub fn impressions(&self, measured: Option<u64>, reach: u64) -> u64 {
        measured.unwrap_or_else(|| scale(reach, self.impressions_per_reach))
    }
}

impl Default for ReachEstimate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scale(value: u64, factor: f64) -> u64 {
    (value as f64 * factor).round().max(0.0) as u64
}
