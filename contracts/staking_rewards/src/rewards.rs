//! Pure accrual arithmetic for the reward-per-token accumulator.
//!
//! All reward math lives here so the contract entry points stay thin and the
//! formulas can be tested without a ledger environment. The accumulator is
//! fixed-point: reward-per-staked-unit values carry a scale of [`PRECISION`].
//!
//! Rounding: every division truncates toward zero, so a single global
//! checkpoint loses at most `1/PRECISION` reward units per staked unit. A
//! participant's cumulative loss is bounded by
//! `staked × checkpoints / PRECISION` reward units.

/// Fixed-point scale for the reward-per-token accumulator (1e12).
///
/// Large enough that truncation is negligible for token amounts at any
/// realistic decimal scale, small enough that
/// `reward_rate × elapsed × PRECISION` stays well inside `i128` for
/// 18-decimal reward supplies.
pub const PRECISION: i128 = 1_000_000_000_000;

/// Advance the global reward-per-token accumulator by `elapsed` seconds.
///
/// With nothing staked the accumulator is returned unchanged: no one is
/// accruing, and dividing by zero stake is meaningless.
pub fn reward_per_token(stored: i128, reward_rate: i128, elapsed: u64, total_staked: i128) -> i128 {
    if total_staked == 0 {
        return stored;
    }
    stored + reward_rate * elapsed as i128 * PRECISION / total_staked
}

/// Reward owed to a participant: the delta between the current accumulator
/// and the participant's last snapshot, applied to their stake, plus
/// whatever was already settled into their accrued balance.
pub fn earned(staked: i128, current_rpt: i128, rpt_paid: i128, accrued: i128) -> i128 {
    staked * (current_rpt - rpt_paid) / PRECISION + accrued
}

/// Per-second emission rate for a freshly funded window.
///
/// `leftover` is the undistributed remainder of a still-running window
/// (`remaining_time × old_rate`); it is folded into the new budget so
/// re-funding mid-window never strands already-promised rewards.
pub fn window_rate(reward: i128, leftover: i128, duration: u64) -> i128 {
    (reward + leftover) / duration as i128
}
