//! Allow-list complement: the minimal set of ranges to block so that only
//! allowed addresses stay reachable.
//!
//! The effective allow set is `allow - deny` over covered addresses. Starting
//! from `0.0.0.0/0`, every effective-allow range is carved out of the working
//! block that holds it, smallest ranges first. Carving halves the holding
//! block until the allowed range is isolated and keeps every half that is not
//! the allowed range, so the working list stays disjoint and no two returned
//! ranges can be merged back into a shorter prefix.

use crate::range::{covers, full_space, halves, AddressRange};

/// Compute the ranges to block for the given allow/deny lists
///
/// An address present in both lists is blocked. The result is sorted by
/// network address.
#[must_use]
pub fn complement(allow: &[AddressRange], deny: &[AddressRange]) -> Vec<AddressRange> {
    let mut effective = effective_allow(allow, deny);
    // Longest prefix first: a range must sit inside a single working block
    // when it is carved.
    effective.sort_by(|a, b| b.prefix_len().cmp(&a.prefix_len()));

    let mut blocks = vec![full_space()];
    for range in effective {
        let Some(index) = blocks.iter().position(|block| covers(block, &range)) else {
            // Already unreachable.
            continue;
        };
        let block = blocks.swap_remove(index);
        blocks.extend(subtract(block, range));
    }

    blocks.sort();
    blocks
}

/// Reduce the allow list to disjoint ranges with every denied address removed
///
/// Entries nested in a broader allow entry are dropped, then every deny range
/// is cut out of the allow range that contains it.
#[must_use]
pub fn effective_allow(allow: &[AddressRange], deny: &[AddressRange]) -> Vec<AddressRange> {
    let mut broad_first = allow.to_vec();
    broad_first.sort_by_key(AddressRange::prefix_len);

    let mut ranges: Vec<AddressRange> = Vec::with_capacity(broad_first.len());
    for range in broad_first {
        if !ranges.iter().any(|kept| covers(kept, &range)) {
            ranges.push(range);
        }
    }

    for denied in deny {
        ranges = ranges
            .into_iter()
            .flat_map(|range| {
                if covers(denied, &range) {
                    Vec::new()
                } else if covers(&range, denied) {
                    subtract(range, *denied)
                } else {
                    vec![range]
                }
            })
            .collect();
    }

    ranges
}

/// Remove `target` from `block`, which must cover it
///
/// Returns the halves peeled off on the way down to `target`, largest first.
fn subtract(block: AddressRange, target: AddressRange) -> Vec<AddressRange> {
    let mut remainder = Vec::new();
    let mut current = block;
    while current != target {
        let Some((lo, hi)) = halves(&current) else {
            break;
        };
        if covers(&lo, &target) {
            remainder.push(hi);
            current = lo;
        } else {
            remainder.push(lo);
            current = hi;
        }
    }
    remainder
}
