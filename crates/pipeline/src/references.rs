//! Reference consolidation: trim, drop blanks, deduplicate, sort.

use paperforge_core::paper::Reference;
use std::collections::BTreeSet;

/// Consolidate raw reference lines into a sorted set.
///
/// Ordering is plain byte-wise string order. Applying this to its own
/// output returns the same list.
pub fn consolidate<I>(references: I) -> Vec<Reference>
where
    I: IntoIterator<Item = Reference>,
{
    references
        .into_iter()
        .filter_map(|r| {
            let trimmed = r.trimmed();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect::<BTreeSet<String>>()
        .into_iter()
        .map(Reference::from)
        .collect()
}
