use std::cmp::Ordering;

/// Ordering for `(row, score)` pairs: score descending, then row ascending.
/// NaN sorts after every real score.
#[inline(always)]
pub fn score_desc_row_asc(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    match (a.1.is_nan(), b.1.is_nan()) {
        (false, false) => b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => a.0.cmp(&b.0),
    }
}

/// Keep the best `top_n` pairs under `score_desc_row_asc`, sorted.
///
/// Complexity: O(n) selection + O(k log k) sort of the survivors.
pub fn top_n_by_score(mut scored: Vec<(usize, f64)>, top_n: usize) -> Vec<(usize, f64)> {
    if top_n == 0 {
        return Vec::new();
    }
    if top_n < scored.len() {
        // partition so that the first top_n elements are the best ones (unordered)
        scored.select_nth_unstable_by(top_n - 1, score_desc_row_asc);
        scored.truncate(top_n);
    }
    scored.sort_unstable_by(score_desc_row_asc);
    scored
}
