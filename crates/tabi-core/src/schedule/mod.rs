//! Pool scheduling: turn a candidate pool of any size into exactly the number
//! of title assignments an itinerary needs.
//!
//! 1. A pool shorter than the requirement is extended with destination-
//!    qualified fallback titles it does not already contain.
//! 2. The pool is shuffled.
//! 3. A pool still shorter than the requirement is tiled (repeated whole,
//!    then truncated); a longer one is truncated.
//!
//! The result is one flat sequence consumed in order across all days.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::search::Pool;

/// Fallback title templates; `{}` is replaced with the destination.
///
/// At least one day's worth of slots, so a single day never repeats a title
/// even when every search came back empty.
const FALLBACK_TEMPLATES: [&str; 6] = [
    "{}中心街散策",
    "{}の寺社エリア",
    "{}の景色スポット",
    "{}の商店街・市場",
    "{}の文化施設",
    "{}の自然スポット",
];

const _: () = assert!(FALLBACK_TEMPLATES.len() >= crate::itinerary::SLOTS_PER_DAY);

/// The destination-qualified fallback titles, in template order.
pub fn fallback_titles(destination: &str) -> Vec<String> {
    FALLBACK_TEMPLATES
        .iter()
        .map(|template| template.replace("{}", destination))
        .collect()
}

/// Produce exactly `required` title assignments from `pool`.
///
/// Never returns an empty sequence for `required > 0`: the fallback set is
/// statically non-empty, so the extended pool always has something to tile.
pub fn schedule<R: Rng + ?Sized>(
    mut pool: Pool,
    destination: &str,
    required: usize,
    rng: &mut R,
) -> Vec<String> {
    if pool.len() < required {
        let before = pool.len();
        pool.extend(fallback_titles(destination));
        debug!(
            destination,
            found = before,
            extended = pool.len(),
            required,
            "pool short of required slots, added fallback titles"
        );
    }

    let mut titles = pool.into_titles();
    titles.shuffle(rng);
    tile(titles, required)
}

/// Repeat `titles` end to end and keep the first `required` entries.
///
/// `titles` longer than `required` is simply truncated. An empty input
/// yields an empty output.
pub fn tile(titles: Vec<String>, required: usize) -> Vec<String> {
    if titles.len() >= required {
        let mut titles = titles;
        titles.truncate(required);
        return titles;
    }
    titles.iter().cycle().take(required).cloned().collect()
}
