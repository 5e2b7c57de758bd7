//! The filter → sort pass over the in-memory collection.

use crate::catalog::filter::FilterState;
use crate::catalog::sort::SortConfig;
use crate::models::Product;

/// Filter and sort `products` for display.
///
/// Pure: the output only depends on the three arguments, and calling it twice
/// with the same snapshot yields the same sequence. Records keep collection
/// order unless a sort key is set; sorting is stable in both directions, so
/// records with equal keys never swap places.
pub fn compute_view<'a>(
    products: &'a [Product],
    filter: &FilterState,
    sort: &SortConfig,
) -> Vec<&'a Product> {
    let term = filter.search_term();

    let mut rows: Vec<&Product> = products
        .iter()
        .filter(|p| filter.matches_with_term(p, term.as_deref()))
        .collect();

    if let Some(compare) = sort.comparator() {
        // slice::sort_by is a stable merge sort
        rows.sort_by(|a, b| compare(a, b));
    }

    rows
}
