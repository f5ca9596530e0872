//! Vote-based candidate ranking.

use std::cmp::Ordering;

use crate::models::Candidate;

/// Order candidates best-first by `(downvotes + 1) / (upvotes + 1)` ascending.
///
/// The sort is stable, so equal scores keep their document order.
pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(compare_score);
    candidates
}

/// Compare two scores exactly: `(da+1)/(ua+1)` vs `(db+1)/(ub+1)`.
pub fn compare_score(a: &Candidate, b: &Candidate) -> Ordering {
    let lhs = cross(a.downvotes, b.upvotes);
    let rhs = cross(b.downvotes, a.upvotes);
    match (lhs, rhs) {
        (Some(l), Some(r)) => l.cmp(&r),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

/// `(x+1)*(y+1)` in `u128`; `None` only for `2^64 * 2^64`, larger than any other product.
fn cross(x: u64, y: u64) -> Option<u128> {
    (u128::from(x) + 1).checked_mul(u128::from(y) + 1)
}
