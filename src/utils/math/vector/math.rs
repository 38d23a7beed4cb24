use std::cmp::Ordering;

use num::Float;

use super::SparseVec;

/// dot product
/// d(a, b) = Σ(a_i * b_i)
///
/// Both index lists are sorted, so this is a single merge pass.
pub fn dot<N>(a: &SparseVec<N>, b: &SparseVec<N>) -> f64
where
    N: Float,
{
    let mut a_it = a.raw_iter();
    let mut b_it = b.raw_iter();
    let mut a_next = a_it.next();
    let mut b_next = b_it.next();
    let mut dot = 0_f64;
    while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
        match ia.cmp(&ib) {
            Ordering::Equal => {
                dot += va.to_f64().unwrap_or(0.0) * vb.to_f64().unwrap_or(0.0);
                a_next = a_it.next();
                b_next = b_it.next();
            }
            Ordering::Less => a_next = a_it.next(),
            Ordering::Greater => b_next = b_it.next(),
        }
    }
    dot
}

/// ||a|| = sqrt(Σ(a_i^2))
pub fn l2_norm<N>(a: &SparseVec<N>) -> f64
where
    N: Float,
{
    a.raw_iter()
        .map(|(_, v)| {
            let v = v.to_f64().unwrap_or(0.0);
            v * v
        })
        .sum::<f64>()
        .sqrt()
}

/// cosine similarity
/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
///
/// Returns 0.0 when either side is the zero vector.
pub fn cosine_similarity<N>(a: &SparseVec<N>, b: &SparseVec<N>) -> f64
where
    N: Float,
{
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_only_counts_shared_indices() {
        let a: SparseVec<f64> = SparseVec::from_pairs(6, vec![(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b: SparseVec<f64> = SparseVec::from_pairs(6, vec![(1, 4.0), (2, 0.5), (5, 2.0)]);
        assert!((dot(&a, &b) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let a: SparseVec<f32> = SparseVec::from_pairs(3, vec![(0, 1.0), (2, 2.0)]);
        let b: SparseVec<f32> = SparseVec::from_pairs(3, vec![(0, 2.0), (2, 4.0)]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let a: SparseVec<f32> = SparseVec::from_pairs(3, vec![(0, 1.0)]);
        let zero: SparseVec<f32> = SparseVec::new(3);
        assert_eq!(cosine_similarity(&a, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn disjoint_vectors_are_orthogonal() {
        let a: SparseVec<f64> = SparseVec::from_pairs(4, vec![(0, 1.0), (1, 1.0)]);
        let b: SparseVec<f64> = SparseVec::from_pairs(4, vec![(2, 1.0), (3, 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
