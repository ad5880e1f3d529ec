// ── Top-N presentation ──
//
// Ranked lists arrive sorted by the server. Presentation only slices and
// labels them; order is never changed here.

use crate::label::{EntityKind, LabelPolicy};
use crate::model::RankedEntry;

/// Chart contexts request between six and ten entries.
pub const DEFAULT_TOP_N: usize = 6;

/// The first `n` items in their original order (all of them if fewer).
pub fn top_n<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}

/// Anything that can be presented as a [`RankedEntry`].
///
/// Implemented for the raw ranked rows of each analytics payload in
/// [`crate::convert`].
pub trait RankedSource {
    fn to_entry(&self, kind: EntityKind, policy: LabelPolicy) -> RankedEntry;
}

/// Slice the first `n` rows, then derive labels for the survivors.
pub fn rank_entries<S: RankedSource>(
    rows: &[S],
    n: usize,
    kind: EntityKind,
    policy: LabelPolicy,
) -> Vec<RankedEntry> {
    top_n(rows, n)
        .iter()
        .map(|row| row.to_entry(kind, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorter_than_n_returns_everything() {
        let items = [3, 1, 2];
        assert_eq!(top_n(&items, 6), &[3, 1, 2]);
    }

    #[test]
    fn longer_than_n_keeps_prefix_in_order() {
        let items = [9, 4, 7, 1, 8];
        assert_eq!(top_n(&items, 3), &[9, 4, 7]);
        assert_eq!(top_n(&items, 5), &items);
    }

    #[test]
    fn empty_and_zero() {
        let empty: [u8; 0] = [];
        assert!(top_n(&empty, 10).is_empty());
        assert!(top_n(&[1, 2], 0).is_empty());
    }
}
