//! Fixed-capacity ordered set holding the K best elements seen so far.
//!
//! Membership is decided by the comparator, not by identity: two elements
//! that compare equal are the same element as far as the set is concerned.
//! Adding an element equal to one already held never grows the set, so one
//! of two equal-scoring candidates is silently dropped. Callers that need to
//! keep every tie must break ties inside the comparator.

use super::{Comparator, FnComparator, NaturalOrder};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// An element paired with the order that ranks it, so the `BTreeSet`
/// can sort by a caller-supplied comparator.
#[derive(Clone)]
struct Ranked<T, C> {
    item: T,
    order: C,
}

impl<T, C: Comparator<T>> PartialEq for Ranked<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.order.compare(&self.item, &other.item).is_eq()
    }
}

impl<T, C: Comparator<T>> Eq for Ranked<T, C> {}

impl<T, C: Comparator<T>> PartialOrd for Ranked<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, C: Comparator<T>> Ord for Ranked<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order.compare(&self.item, &other.item)
    }
}

/// A bounded set retaining the `capacity` largest elements under `C`.
///
/// Each `add` costs O(log K).
///
/// # Example
///
/// ```
/// use rapid_wordsim::BoundedTopKSet;
///
/// let mut top = BoundedTopKSet::new(2);
/// for x in [5, 1, 9, 3] {
///     top.add(x);
/// }
/// assert_eq!(top.snapshot(), vec![5, 9]);
/// ```
pub struct BoundedTopKSet<T, C = NaturalOrder> {
    items: BTreeSet<Ranked<T, C>>,
    capacity: usize,
    order: C,
}

impl<T: Ord> BoundedTopKSet<T, NaturalOrder> {
    /// Create a set ordered by `T`'s natural order
    pub fn new(capacity: usize) -> Self {
        Self::with_order(capacity, NaturalOrder)
    }
}

impl<T, F> BoundedTopKSet<T, FnComparator<F>>
where
    F: Fn(&T, &T) -> Ordering + Clone,
{
    /// Create a set ordered by a comparison closure
    pub fn with_comparator(capacity: usize, compare: F) -> Self {
        Self::with_order(capacity, FnComparator(compare))
    }
}

impl<T, C: Comparator<T> + Clone> BoundedTopKSet<T, C> {
    /// Create a set ordered by an explicit [`Comparator`]
    pub fn with_order(capacity: usize, order: C) -> Self {
        Self {
            items: BTreeSet::new(),
            capacity,
            order,
        }
    }

    /// Offer an element to the set.
    ///
    /// Returns `true` when the element was accepted. A full set accepts an
    /// element only if it ranks strictly above the current minimum, which is
    /// then evicted. An element equal to one already held is rejected when
    /// the set is full and absorbed when it is not.
    pub fn add(&mut self, element: T) -> bool {
        if self.capacity == 0 {
            return false;
        }

        let candidate = Ranked {
            item: element,
            order: self.order.clone(),
        };

        if self.items.len() < self.capacity {
            self.items.insert(candidate);
            return true;
        }

        let beats_min = match self.items.first() {
            Some(min) => candidate.cmp(min).is_gt(),
            None => false,
        };
        if !beats_min || self.items.contains(&candidate) {
            return false;
        }

        self.items.pop_first();
        self.items.insert(candidate);
        true
    }

    /// Ascending copy of the current contents
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Consume the set, returning its contents in ascending order
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.items.into_iter().map(|r| r.item).collect()
    }

    /// Iterate over the contents in ascending order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.items.iter().map(|r| &r.item)
    }

    /// The element that would be evicted next
    pub fn min(&self) -> Option<&T> {
        self.items.first().map(|r| &r.item)
    }

    /// The highest-ranked element
    pub fn max(&self) -> Option<&T> {
        self.items.last().map(|r| &r.item)
    }

    /// Maximum number of elements retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of elements currently held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the set holds no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if further additions must displace an element
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BoundedTopKSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedTopKSet")
            .field("capacity", &self.capacity)
            .field("items", &self.items.iter().map(|r| &r.item).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let mut set = BoundedTopKSet::new(0);
        assert!(!set.add(1));
        assert!(!set.add(100));
        assert!(set.is_empty());
        assert!(set.snapshot().is_empty());
    }

    #[test]
    fn test_fills_unconditionally_below_capacity() {
        let mut set = BoundedTopKSet::new(3);
        assert!(set.add(10));
        assert!(set.add(-4));
        assert!(set.add(2));
        assert_eq!(set.len(), 3);
        assert!(set.is_full());
        assert_eq!(set.snapshot(), vec![-4, 2, 10]);
    }

    #[test]
    fn test_evicts_minimum_for_larger_element() {
        let mut set = BoundedTopKSet::new(2);
        set.add(1);
        set.add(5);
        assert!(set.add(3));
        assert_eq!(set.snapshot(), vec![3, 5]);
        assert_eq!(set.min(), Some(&3));
        assert_eq!(set.max(), Some(&5));
    }

    #[test]
    fn test_rejects_smaller_or_equal_to_minimum() {
        let mut set = BoundedTopKSet::new(2);
        set.add(4);
        set.add(8);
        assert!(!set.add(1));
        assert!(!set.add(4));
        assert_eq!(set.snapshot(), vec![4, 8]);
    }

    #[test]
    fn test_keeps_k_largest_of_stream() {
        let stream = [17, 3, 42, 8, 99, 23, 4, 15, 16, 61];
        let mut set = BoundedTopKSet::new(4);
        for x in stream {
            set.add(x);
        }
        let mut sorted = stream.to_vec();
        sorted.sort();
        assert_eq!(set.snapshot(), sorted[sorted.len() - 4..].to_vec());
    }

    #[test]
    fn test_equal_key_collapse_when_full() {
        // Pairs compared by score only: equal scores are the same element.
        let by_score = |a: &(&str, u32), b: &(&str, u32)| a.1.cmp(&b.1);
        let mut set = BoundedTopKSet::with_comparator(2, by_score);
        set.add(("low", 1));
        set.add(("high", 7));
        assert!(set.is_full());

        // Larger than the minimum but equal to a held element: lost.
        assert!(!set.add(("also-high", 7)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.snapshot(), vec![("low", 1), ("high", 7)]);
    }

    #[test]
    fn test_equal_key_collapse_below_capacity() {
        let by_score = |a: &(&str, u32), b: &(&str, u32)| a.1.cmp(&b.1);
        let mut set = BoundedTopKSet::with_comparator(3, by_score);
        set.add(("first", 5));
        set.add(("second", 5));
        assert_eq!(set.len(), 1);
        assert_eq!(set.snapshot(), vec![("first", 5)]);
    }

    #[test]
    fn test_custom_order_keeps_smallest() {
        let mut set = BoundedTopKSet::with_comparator(2, |a: &i32, b: &i32| b.cmp(a));
        for x in [5, 1, 9, 3] {
            set.add(x);
        }
        // Ascending under the reversed order.
        assert_eq!(set.snapshot(), vec![3, 1]);
    }

    #[test]
    fn test_snapshot_is_non_destructive() {
        let mut set = BoundedTopKSet::new(2);
        set.add(1);
        let first = set.snapshot();
        let second = set.snapshot();
        assert_eq!(first, second);
        set.add(2);
        assert_eq!(set.into_sorted_vec(), vec![1, 2]);
    }

    #[test]
    fn test_debug_lists_items() {
        let mut set = BoundedTopKSet::new(2);
        set.add("x");
        let rendered = format!("{:?}", set);
        assert!(rendered.contains("capacity: 2"));
        assert!(rendered.contains("\"x\""));
    }
}
