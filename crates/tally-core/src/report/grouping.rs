//! Grouped summation shared by the by-date and by-entity views.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// Result ordering for [`grouped_sum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Ascending by group key.
    KeyAscending,
    /// Descending by summed value; equal sums keep first-encounter order.
    ValueDescending,
}

/// Sums `value(item)` per `key(item)` and returns one `(key, total)` per
/// distinct key, ordered as requested.
///
/// The fold runs over a fresh ordered map built for this call only. Every
/// item contributes to exactly one group, so the group totals always add up
/// to the total over all items.
///
/// Totals saturate at `Decimal::MAX` rather than overflow. Trade values are
/// capped at [`MAX_TRADE_VALUE`](crate::types::MAX_TRADE_VALUE), which keeps
/// any in-memory batch of trade records well below that bound.
pub fn grouped_sum<T, K, FK, FV>(
    items: &[T],
    key: FK,
    value: FV,
    order: GroupOrder,
) -> Vec<(K, Decimal)>
where
    K: Ord,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> Decimal,
{
    // key -> (index of first item with this key, running total)
    let mut groups: BTreeMap<K, (usize, Decimal)> = BTreeMap::new();
    for (idx, item) in items.iter().enumerate() {
        groups
            .entry(key(item))
            .and_modify(|(_, total)| *total = total.saturating_add(value(item)))
            .or_insert_with(|| (idx, value(item)));
    }

    match order {
        GroupOrder::KeyAscending => groups
            .into_iter()
            .map(|(k, (_, total))| (k, total))
            .collect(),
        GroupOrder::ValueDescending => {
            let mut ranked: Vec<(K, usize, Decimal)> = groups
                .into_iter()
                .map(|(k, (first, total))| (k, first, total))
                .collect();
            ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));
            ranked.into_iter().map(|(k, _, total)| (k, total)).collect()
        }
    }
}
