//! Context vectors and the cached sparse dot product
//!
//! A [`ContextVector`] is the dense linearization of one word's counts.
//! The first time it is used as the left operand of [`ContextVector::dot`] it
//! records the positions of its nonzero coordinates; later calls replay only
//! those positions. Context vectors are overwhelmingly sparse, so this turns
//! each inner-loop dot product from O(dimensions) into O(nonzero).

use crate::vocab::{ContextCounts, DimensionOrdering};

/// Linearize `entry`'s counts as `[context words..., context tags...]`
/// following `ordering`.
pub fn build_vector<E, D>(entry: &E, ordering: &D) -> Vec<u32>
where
    E: ContextCounts + ?Sized,
    D: DimensionOrdering + ?Sized,
{
    let words_size = ordering.words_size();
    let tags_size = ordering.tags_size();
    let mut values = Vec::with_capacity(words_size + tags_size);

    values.extend((0..words_size).map(|i| entry.context_word_count(ordering.word_at(i))));
    values.extend((0..tags_size).map(|i| entry.context_tag_count(ordering.tag_at(i))));
    values
}

/// Euclidean norm of `entry`'s full context vector.
///
/// Reads the counts through `ordering` rather than a built vector, so it can
/// run before (or after) the vector exists.
pub fn magnitude<E, D>(entry: &E, ordering: &D) -> f64
where
    E: ContextCounts + ?Sized,
    D: DimensionOrdering + ?Sized,
{
    let mut sum = 0.0;
    for i in 0..ordering.words_size() {
        let c = entry.context_word_count(ordering.word_at(i)) as f64;
        sum += c * c;
    }
    for i in 0..ordering.tags_size() {
        let c = entry.context_tag_count(ordering.tag_at(i)) as f64;
        sum += c * c;
    }
    sum.sqrt()
}

/// Plain full-scan dot product over two equal-length vectors
pub fn dense_dot(a: &[u32], b: &[u32]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0, |acc, (&x, &y)| acc + x as f64 * y as f64)
}

/// A dense context vector with a lazily built index of its nonzero positions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextVector {
    values: Vec<u32>,
    /// Positions where `values` is strictly positive, ascending.
    /// Valid only while `values` is unchanged.
    nonzero: Option<Vec<u32>>,
}

impl ContextVector {
    /// Wrap an already linearized vector
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            nonzero: None,
        }
    }

    /// Build the vector for `entry` under `ordering`
    pub fn build<E, D>(entry: &E, ordering: &D) -> Self
    where
        E: ContextCounts + ?Sized,
        D: DimensionOrdering + ?Sized,
    {
        Self::new(build_vector(entry, ordering))
    }

    /// The dense coordinates
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Vector length
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the vector has no coordinates (never built, or released)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The cached nonzero positions, if this vector has been a left operand
    pub fn nonzero_indices(&self) -> Option<&[u32]> {
        self.nonzero.as_deref()
    }

    /// Sparse dot product with `self` as the cache-owning operand.
    ///
    /// On the first call the full vector is scanned once and the nonzero
    /// positions are recorded; subsequent calls replay them against the
    /// current `other`. Both paths add the same terms in the same order, so
    /// results agree bit-for-bit with [`dense_dot`].
    ///
    /// # Panics
    ///
    /// Panics if the two vectors have different lengths, i.e. were not built
    /// against the same dimension ordering.
    pub fn dot(&mut self, other: &ContextVector) -> f64 {
        assert_eq!(
            self.values.len(),
            other.values.len(),
            "context vectors built against different dimension orderings"
        );

        if let Some(indices) = &self.nonzero {
            return indices.iter().fold(0.0, |acc, &i| {
                let i = i as usize;
                acc + self.values[i] as f64 * other.values[i] as f64
            });
        }

        let mut result = 0.0;
        let mut indices = Vec::new();
        for (i, (&x, &y)) in self.values.iter().zip(&other.values).enumerate() {
            if x > 0 {
                result += x as f64 * y as f64;
                indices.push(i as u32);
            }
        }
        self.nonzero = Some(indices);
        result
    }

    /// Drop the nonzero index cache, keeping the coordinates
    pub fn clear_index(&mut self) {
        self.nonzero = None;
    }

    /// Free both the coordinates and the index cache
    pub fn release(&mut self) {
        self.values = Vec::new();
        self.nonzero = None;
    }
}
