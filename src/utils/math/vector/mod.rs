pub mod math;

use std::fmt::Debug;

use num::Float;
use serde::{Deserialize, Serialize};

/// SparseVec keeps only the non-zero elements of a vector.
/// It holds `inds` and `vals`:
/// `inds` stores the position of each element,
/// `vals` stores the value of each element.
///
/// `inds` is guaranteed to be sorted ascending and free of duplicates,
/// and every stored value is non-zero.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVec<N>
where
    N: Float,
{
    /// dimensionality of the dense vector this represents
    len: usize,
    inds: Vec<usize>,
    vals: Vec<N>,
}

impl<N> SparseVec<N>
where
    N: Float,
{
    /// Create an all-zero vector of dimensionality `len`
    #[inline]
    pub fn new(len: usize) -> Self {
        SparseVec {
            len,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(len: usize, cap: usize) -> Self {
        SparseVec {
            len,
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
        }
    }

    /// Build from `(index, value)` pairs in any order.
    /// Duplicate indices are summed; zeros and indices `>= len` are dropped.
    pub fn from_pairs<I>(len: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, N)>,
    {
        let mut pairs: Vec<(usize, N)> = pairs
            .into_iter()
            .filter(|(idx, _)| *idx < len)
            .collect();
        pairs.sort_unstable_by_key(|(idx, _)| *idx);

        let mut vec = SparseVec::with_capacity(len, pairs.len());
        for (idx, val) in pairs {
            match vec.inds.last() {
                Some(&last) if last == idx => {
                    if let Some(acc) = vec.vals.last_mut() {
                        *acc = *acc + val;
                    }
                }
                _ => {
                    vec.inds.push(idx);
                    vec.vals.push(val);
                }
            }
        }
        vec.drop_zeros();
        vec
    }

    fn drop_zeros(&mut self) {
        if self.vals.iter().all(|v| !v.is_zero()) {
            return;
        }
        let (inds, vals): (Vec<usize>, Vec<N>) = self
            .inds
            .iter()
            .copied()
            .zip(self.vals.iter().copied())
            .filter(|(_, v)| !v.is_zero())
            .unzip();
        self.inds = inds;
        self.vals = vals;
    }

    /// dimensionality
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// number of stored (non-zero) elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// true when every element is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    /// Get the value at `index`, zero when it is not stored
    pub fn get(&self, index: usize) -> N {
        match self.inds.binary_search(&index) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    /// Iterate stored `(index, value)` pairs in ascending index order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    /// Check the storage invariants of a vector that did not come from
    /// `from_pairs`, e.g. one read back from disk: one value per index,
    /// indices strictly ascending and below `len`, values finite.
    pub fn is_well_formed(&self) -> bool {
        self.inds.len() == self.vals.len()
            && self.inds.windows(2).all(|w| w[0] < w[1])
            && self.inds.last().map_or(true, |&idx| idx < self.len)
            && self.vals.iter().all(|v| v.is_finite())
    }

    #[inline]
    pub fn max_index(&self) -> Option<usize> {
        self.inds.last().copied()
    }

    /// Scale the vector to unit L2 length.
    /// The zero vector is left untouched.
    pub fn l2_normalize(&mut self) {
        let norm = math::l2_norm(self);
        if norm == 0.0 {
            return;
        }
        let inv = 1.0 / norm;
        for v in self.vals.iter_mut() {
            let scaled = v.to_f64().unwrap_or(0.0) * inv;
            *v = num::cast(scaled).unwrap_or_else(N::zero);
        }
    }

    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }
}

impl<N> Debug for SparseVec<N>
where
    N: Float + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "SparseVec(len: {}, nnz: {}) [", self.len, self.nnz())?;
            for (idx, val) in self.raw_iter() {
                writeln!(f, "    {}: {:?}", idx, val)?;
            }
            write!(f, "]")
        } else {
            f.debug_struct("SparseVec")
                .field("len", &self.len)
                .field("inds", &self.inds)
                .field("vals", &self.vals)
                .finish()
        }
    }
}
