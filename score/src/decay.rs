//! Decayed cumulative score.

use passport_types::Round;

/// Fold the round scores of the window ending at `upto` into a decayed total.
///
/// The window covers rounds `max(1, upto - window + 1) ..= upto`. Each step
/// keeps `100 - decay_rate` percent of the running total, truncating with
/// integer division before the next round's score is added. `upto == 0`
/// yields 0.
pub fn cumulative_with_decay(
    upto: Round,
    window: u64,
    decay_rate: u64,
    mut round_score: impl FnMut(Round) -> u64,
) -> u64 {
    if upto == Round::NONE {
        return 0;
    }
    let first = upto.0.saturating_sub(window.saturating_sub(1)).max(1);
    let retain = 100 - decay_rate.min(100);

    (first..=upto.0).fold(0u64, |carried, r| {
        let kept = (u128::from(carried) * u128::from(retain) / 100) as u64;
        round_score(Round(r)).saturating_add(kept)
    })
}
