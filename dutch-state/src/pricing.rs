//! Descending unit price.
//!
//! `price(now) = max(reserved, starting - decay * (now - start))`, in integer
//! arithmetic with truncation only. A decay product too large to represent
//! has necessarily crossed the floor, so it saturates instead of failing.

use dutch_core::{Amount, SaleParameters};

/// Unit price at `now` for a sale that opened at `start_time`.
///
/// Timestamps before `start_time` are priced as if no time had elapsed.
pub fn price_at(params: &SaleParameters, start_time: u64, now: u64) -> Amount {
    let elapsed = now.saturating_sub(start_time) as Amount;
    let discount = params.decay_per_second.saturating_mul(elapsed);
    params
        .starting_price
        .saturating_sub(discount)
        .max(params.reserved_price)
}

/// First timestamp at which the price sits on the reserved floor.
///
/// Returns `None` when the price never decays (zero rate with a starting
/// price above the floor).
pub fn floor_reached_at(params: &SaleParameters, start_time: u64) -> Option<u64> {
    let gap = params.starting_price - params.reserved_price;
    if gap == 0 {
        return Some(start_time);
    }
    if params.decay_per_second == 0 {
        return None;
    }

    let seconds = gap.div_ceil(params.decay_per_second);
    let seconds = u64::try_from(seconds).ok()?;
    start_time.checked_add(seconds)
}
