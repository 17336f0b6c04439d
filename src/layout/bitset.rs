use bitvec::prelude::*;
use std::fmt;

/// Fixed-size set of tile indices used for layout candidate filtering
///
/// Indices are 0-based positions in a tile set. Out-of-range inserts are
/// ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateSet {
    bits: BitVec,
}

impl CandidateSet {
    /// Set containing no tiles
    pub fn new(tile_count: usize) -> Self {
        Self {
            bits: bitvec![0; tile_count],
        }
    }

    /// Set containing every tile of a `tile_count` set
    pub fn all(tile_count: usize) -> Self {
        Self {
            bits: bitvec![1; tile_count],
        }
    }

    /// Build a set from explicit indices
    pub fn from_indices(indices: impl IntoIterator<Item = usize>, tile_count: usize) -> Self {
        let mut set = Self::new(tile_count);
        for index in indices {
            set.insert(index);
        }
        set
    }

    /// Add a tile index
    pub fn insert(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, true);
        }
    }

    /// Test tile membership
    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Keep only tiles also present in `other`
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// New set holding the tiles present in both
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Whether no tile is present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Number of tiles present
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Present indices in ascending order
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CandidateSet({} tiles: {:?})", self.count(), self.to_vec())
    }
}
