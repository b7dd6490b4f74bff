//! Rank progression.
//!
//! The three lower tiers move a 0–100 progress meter by how far a round's
//! normalized score lands from the tier's expected score. Filling the meter
//! promotes, emptying it demotes (never below the floor tier). The top tier
//! is terminal and tracks an Elo-style rating instead.

use serde::{Deserialize, Serialize};

use crate::model::{RankState, Tier, BASE_ELO};

/// Sensitivity of a progress tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierParams {
    /// Normalized score that leaves the meter unchanged.
    pub expected: f64,
    /// Meter points per unit of normalized score above or below `expected`.
    pub scale: f64,
}

/// Progress tier parameters. Lower tiers are easier to climb.
pub fn tier_params(tier: Tier) -> Option<TierParams> {
    match tier {
        Tier::PokeBall => Some(TierParams {
            expected: 0.15,
            scale: 80.0,
        }),
        Tier::GreatBall => Some(TierParams {
            expected: 0.35,
            scale: 70.0,
        }),
        Tier::UltraBall => Some(TierParams {
            expected: 0.55,
            scale: 60.0,
        }),
        Tier::MasterBall => None,
    }
}

/// Elo sensitivity in the top tier.
pub const ELO_K: f64 = 40.0;

/// Normalized score that holds a top-tier rating steady.
pub const ELO_EXPECTED: f64 = 0.8;

/// Meter value that means "promote".
pub const PROGRESS_MAX: f64 = 100.0;

/// Cap on progress carried into a newly reached tier.
pub const PROMOTION_CARRY_CAP: f64 = 40.0;

/// Meter value a demoted player lands on in the lower tier.
pub const DEMOTION_LANDING: u32 = 80;

/// Elo points granted per point of meter overflow when entering the top tier.
pub const ELO_OVERFLOW_BONUS: f64 = 2.0;

/// Compute the rank after a round that scored `round_score` out of `max_score`.
pub fn update_rank(current: &RankState, round_score: f64, max_score: f64) -> RankState {
    let ratio = round_score / max_score;
    let normalized = if max_score > 0.0 && ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };

    match tier_params(current.tier) {
        None => {
            let delta = ELO_K * (normalized - ELO_EXPECTED);
            RankState {
                tier: current.tier,
                progress: 0,
                elo: ((current.elo as f64 + delta).round() as i64).max(0),
            }
        }
        Some(params) => {
            let delta = (normalized - params.expected) * params.scale;
            apply_progress(current, delta)
        }
    }
}

/// Move a progress-tier rank by `delta` meter points, handling promotion
/// and demotion. Top-tier states are returned unchanged.
pub fn apply_progress(current: &RankState, delta: f64) -> RankState {
    if current.tier.uses_elo() {
        return *current;
    }

    let next = current.progress as f64 + delta;

    if next >= PROGRESS_MAX {
        let overflow = next - PROGRESS_MAX;
        return match current.tier.next() {
            Some(tier) if tier.uses_elo() => RankState {
                tier,
                progress: 0,
                elo: (BASE_ELO as f64 + overflow.max(0.0) * ELO_OVERFLOW_BONUS).round() as i64,
            },
            Some(tier) => RankState {
                tier,
                progress: overflow.min(PROMOTION_CARRY_CAP).round() as u32,
                elo: current.elo,
            },
            None => *current,
        };
    }

    if next <= 0.0 {
        if let Some(tier) = current.tier.previous() {
            return RankState {
                tier,
                progress: DEMOTION_LANDING,
                elo: current.elo,
            };
        }
    }

    RankState {
        tier: current.tier,
        progress: next.clamp(0.0, PROGRESS_MAX).round() as u32,
        elo: current.elo,
    }
}

/// Direction of a rank change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMovement {
    Promoted,
    Demoted,
    Held,
}

/// Summary of how a rank moved between two rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankChange {
    pub movement: RankMovement,
    /// Meter change within the same progress tier.
    pub progress_delta: Option<i64>,
    /// Rating change within the top tier.
    pub elo_delta: Option<i64>,
}

impl RankState {
    /// Describe how this rank moved relative to `previous`.
    pub fn compare(&self, previous: &RankState) -> RankChange {
        let movement = match self.tier.cmp(&previous.tier) {
            std::cmp::Ordering::Greater => RankMovement::Promoted,
            std::cmp::Ordering::Less => RankMovement::Demoted,
            std::cmp::Ordering::Equal => RankMovement::Held,
        };
        let same_tier = movement == RankMovement::Held;
        RankChange {
            movement,
            progress_delta: (same_tier && !self.tier.uses_elo())
                .then(|| self.progress as i64 - previous.progress as i64),
            elo_delta: (same_tier && self.tier.uses_elo()).then(|| self.elo - previous.elo),
        }
    }
}
