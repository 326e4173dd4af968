//! Smart ramp search: pick an (increment, pace) pair that lands on a target
//! within a time budget.
//!
//! The search starts from the desired pace (raised when the budget allows
//! a slower one), then walks the pace up in 10 ms steps for at most 100
//! iterations. A candidate is accepted when all of these hold:
//!
//! 1. the unrounded increment is at least 1 (`diff >= cycles`)
//! 2. `cycles * increment <= diff` (no overshoot)
//! 3. `diff - cycles * increment <= 10` (close to target)
//! 4. `|cycles * pace - duration| <= 100 ms` (close to budget)
//! 5. `cycles * pace <= duration` (no overrun)
//!
//! Candidates meeting 1, 2, 4 and 5 are scored by value gap plus time gap and
//! the lowest score is kept as a fallback when nothing is accepted.

/// Retry budget for the pace walk.
pub const MAX_SEARCH_ITERATIONS: u32 = 100;
/// Pace increase per retry.
pub const PACE_STEP_MS: u64 = 10;
/// Allowed shortfall against the target value.
pub const VALUE_TOLERANCE: u64 = 10;
/// Allowed shortfall against the time budget.
pub const DURATION_TOLERANCE_MS: u64 = 100;

/// How a plan was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    /// A candidate passed every tolerance after `iterations` retries.
    Exact { iterations: u32 },
    /// Retries ran out; the best-scored candidate was used.
    BestEffort { score: u64 },
    /// No candidate was usable (budget shorter than one pace): jump in one cycle.
    SingleJump,
}

/// Output of [`solve`]: settings for one bounded ramp run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartRampPlan {
    pub increment: u64,
    pub pace_ms: u64,
    pub cycles: u64,
    pub source: PlanSource,
}

/// One evaluated (pace, cycles, increment) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCandidate {
    pub pace_ms: u64,
    pub cycles: u64,
    pub increment: u64,
    pub satisfies_tolerance: bool,
    /// Present when conditions 1, 2, 4 and 5 hold.
    pub score: Option<u64>,
}

impl SearchCandidate {
    pub fn evaluate(diff: u64, duration_ms: u64, pace_ms: u64) -> Self {
        let cycles = duration_ms / pace_ms.max(1);
        if cycles == 0 {
            return Self {
                pace_ms,
                cycles,
                increment: diff,
                satisfies_tolerance: false,
                score: None,
            };
        }
        let increment = diff / cycles;
        let reached = u128::from(cycles) * u128::from(increment);
        let spent = u128::from(cycles) * u128::from(pace_ms);
        let diff_w = u128::from(diff);
        let duration_w = u128::from(duration_ms);

        let whole_step = diff >= cycles;
        let no_overshoot = reached <= diff_w;
        let near_target = diff_w.abs_diff(reached) <= u128::from(VALUE_TOLERANCE);
        let near_budget = spent.abs_diff(duration_w) <= u128::from(DURATION_TOLERANCE_MS);
        let no_overrun = spent <= duration_w;

        let score = (whole_step && no_overshoot && near_budget && no_overrun).then(|| {
            let gap = diff_w.abs_diff(reached) + spent.abs_diff(duration_w);
            u64::try_from(gap).unwrap_or(u64::MAX)
        });
        Self {
            pace_ms,
            cycles,
            increment,
            satisfies_tolerance: score.is_some() && near_target,
            score,
        }
    }
}

/// Pace the search starts from.
///
/// When the budget per unit of distance exceeds the desired pace, use that
/// budget rounded to the nearest 10 ms instead.
pub fn starting_pace(diff: u64, duration_ms: u64, desired_pace_ms: u64) -> u64 {
    let per_unit = duration_ms as f64 / diff as f64;
    let pace = if per_unit > desired_pace_ms as f64 {
        ((per_unit / 10.0).round() * 10.0) as u64
    } else {
        desired_pace_ms
    };
    pace.max(1)
}

/// Solve for a ramp covering `diff` in `duration_ms`.
///
/// Returns `None` when `diff` is zero: there is nothing to ramp.
pub fn solve(diff: u64, duration_ms: u64, desired_pace_ms: u64) -> Option<SmartRampPlan> {
    if diff == 0 {
        return None;
    }
    let start = starting_pace(diff, duration_ms, desired_pace_ms);
    let mut pace = start;
    let mut best: Option<(u64, SearchCandidate)> = None;
    let mut iterations = 0_u32;

    let mut candidate = SearchCandidate::evaluate(diff, duration_ms, pace);
    remember(&mut best, candidate);
    while !candidate.satisfies_tolerance && iterations < MAX_SEARCH_ITERATIONS {
        pace = pace.saturating_add(PACE_STEP_MS);
        candidate = SearchCandidate::evaluate(diff, duration_ms, pace);
        remember(&mut best, candidate);
        iterations += 1;
    }

    if candidate.satisfies_tolerance {
        return Some(SmartRampPlan {
            increment: candidate.increment,
            pace_ms: candidate.pace_ms,
            cycles: candidate.cycles,
            source: PlanSource::Exact { iterations },
        });
    }

    let plan = match best {
        Some((score, c)) => SmartRampPlan {
            increment: c.increment,
            pace_ms: c.pace_ms,
            cycles: (duration_ms / c.pace_ms).max(1),
            source: PlanSource::BestEffort { score },
        },
        None => SmartRampPlan {
            increment: diff,
            pace_ms: start,
            cycles: 1,
            source: PlanSource::SingleJump,
        },
    };
    tracing::warn!(
        diff,
        duration_ms,
        desired_pace_ms,
        increment = plan.increment,
        pace_ms = plan.pace_ms,
        "smart ramp search found no exact fit; using fallback"
    );
    Some(plan)
}

fn remember(best: &mut Option<(u64, SearchCandidate)>, candidate: SearchCandidate) {
    let Some(score) = candidate.score else {
        return;
    };
    if best.is_none_or(|(best_score, _)| score <= best_score) {
        *best = Some((score, candidate));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_diff_has_no_plan() {
        assert_eq!(solve(0, 10_000, 1000), None);
    }

    #[test]
    fn first_candidate_accepted() {
        let plan = solve(37, 10_000, 1000).unwrap();
        assert_eq!(
            (plan.increment, plan.pace_ms, plan.cycles),
            (3, 1000, 10)
        );
        assert_eq!(plan.source, PlanSource::Exact { iterations: 0 });
    }

    #[test]
    fn starting_pace_raised_and_rounded() {
        // 10 s over 7 units = 1428.6 ms per unit -> 1430
        assert_eq!(starting_pace(7, 10_000, 100), 1430);
        // budget per unit below desired: keep desired
        assert_eq!(starting_pace(1000, 10_000, 250), 250);
        // never zero
        assert_eq!(starting_pace(1000, 3, 0), 1);
    }

    #[test]
    fn evaluate_flags_conditions() {
        // 12 cycles of 2 leave a gap of 11: scored but not accepted
        let c = SearchCandidate::evaluate(35, 12_000, 1000);
        assert_eq!((c.cycles, c.increment), (12, 2));
        assert_eq!(c.score, Some(11));
        assert!(!c.satisfies_tolerance);

        let none = SearchCandidate::evaluate(1, 100, 500);
        assert_eq!(none.cycles, 0);
        assert_eq!(none.score, None);
    }

    #[test]
    fn remember_prefers_lower_and_later_ties() {
        let mut best = None;
        let a = SearchCandidate {
            pace_ms: 10,
            cycles: 1,
            increment: 1,
            satisfies_tolerance: false,
            score: Some(5),
        };
        let b = SearchCandidate { pace_ms: 20, ..a };
        let worse = SearchCandidate {
            pace_ms: 30,
            score: Some(9),
            ..a
        };
        remember(&mut best, a);
        remember(&mut best, b);
        remember(&mut best, worse);
        assert_eq!(best.map(|(_, c)| c.pace_ms), Some(20));
    }
}
