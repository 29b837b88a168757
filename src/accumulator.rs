use crate::error::Result;
use ndarray::ArrayView1;

/// Per-cluster collection of the observations assigned during one iteration.
///
/// Entries are borrowed rows of the caller's observation matrix. The list is
/// LIFO: `pop_front` hands back the most recently pushed row. An exhausted list
/// reports `None`, which is how "no data" is told apart from a zero vector.
#[derive(Debug)]
pub struct Accumulator<'a> {
    d: usize,
    entries: Vec<ArrayView1<'a, f64>>,
}

impl<'a> Accumulator<'a> {
    /// Create an empty accumulator for vectors of dimension `d`
    pub fn new(d: usize) -> Self {
        Self {
            d,
            entries: Vec::new(),
        }
    }

    /// Prepend an observation.
    ///
    /// Fails with `KMeansError::Allocation` if the list cannot grow.
    pub fn push(&mut self, vector: ArrayView1<'a, f64>) -> Result<()> {
        debug_assert_eq!(vector.len(), self.d);
        self.entries.try_reserve(1)?;
        self.entries.push(vector);
        Ok(())
    }

    /// Remove and return the front entry, `None` once the list is drained
    pub fn pop_front(&mut self) -> Option<ArrayView1<'a, f64>> {
        self.entries.pop()
    }

    /// Drop every entry but keep the allocated capacity for the next iteration
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of observations currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no observations
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimension of the vectors held by this accumulator
    pub fn dim(&self) -> usize {
        self.d
    }
}
