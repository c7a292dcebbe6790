//! Level math over cumulative experience points.
//!
//! The first level costs [`FIRST_LEVEL_COST`] points and every following
//! level costs [`LEVEL_COST_STEP`] more than the one before it. Nothing here
//! is cached: callers keep the raw point total and derive a [`Progress`]
//! whenever they need one.

use serde::Serialize;

pub const FIRST_LEVEL_COST: u64 = 1000;
pub const LEVEL_COST_STEP: u64 = 500;

/// Points needed to advance from `level` to `level + 1`. Levels start at 1.
pub fn level_threshold(level: u32) -> u64 {
    FIRST_LEVEL_COST + LEVEL_COST_STEP * u64::from(level.saturating_sub(1))
}

/// Total points needed to reach `level`, saturating at `u64::MAX`.
pub fn total_for_level(level: u32) -> u64 {
    u64::try_from(cumulative(u128::from(level))).unwrap_or(u64::MAX)
}

/// Sum of the thresholds below `level`, which is 250·L² + 250·L − 500 with
/// the default costs.
fn cumulative(level: u128) -> u128 {
    let n = level.max(1) - 1;
    n * u128::from(FIRST_LEVEL_COST) + u128::from(LEVEL_COST_STEP) * n * n.saturating_sub(1) / 2
}

/// Level for a point total.
pub fn level_for(xp: u64) -> u32 {
    Progress::from_xp(xp).level
}

/// Derived view over an experience-point total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub xp: u64,
    pub level: u32,
    /// Points earned inside the current level
    pub level_xp: u64,
    /// Points the current level costs in total
    pub level_max_xp: u64,
    /// `level_xp / level_max_xp`, in `0.0..1.0`
    pub percentage: f64,
}

impl Progress {
    pub fn from_xp(xp: u64) -> Self {
        let target = u128::from(xp);

        // Positive root of cumulative(L) = xp, then nudged onto the exact level
        let a = LEVEL_COST_STEP as f64 / 2.0;
        let b = FIRST_LEVEL_COST as f64 - 1.5 * LEVEL_COST_STEP as f64;
        let c = LEVEL_COST_STEP as f64 - FIRST_LEVEL_COST as f64 - xp as f64;
        let estimate = (-b + (b * b - 4.0 * a * c).sqrt()) / (2.0 * a);

        let mut level = (estimate as u128).max(1);
        while level > 1 && cumulative(level) > target {
            level -= 1;
        }
        while cumulative(level + 1) <= target {
            level += 1;
        }

        let level = u32::try_from(level).unwrap_or(u32::MAX);
        let remaining = (target - cumulative(u128::from(level))) as u64;
        let cost = level_threshold(level);

        Progress {
            xp,
            level,
            level_xp: remaining,
            level_max_xp: cost,
            percentage: remaining as f64 / cost as f64,
        }
    }

    /// Points still missing before the next level.
    pub fn xp_to_next(&self) -> u64 {
        self.level_max_xp - self.level_xp
    }

    /// Role for this level, clamped to the last configured role.
    pub fn role(&self, roles: &[u64]) -> Option<u64> {
        if roles.is_empty() {
            return None;
        }
        let index = (self.level as usize).min(roles.len()) - 1;
        roles.get(index).copied()
    }
}
