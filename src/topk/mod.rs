//! Bounded top-K selection
//!
//! A fixed-capacity ordered container that keeps the K largest elements of a
//! stream under a caller-chosen total order.

pub mod bounded;

use std::cmp::Ordering;

/// A total order over `T`, used in place of `T: Ord` when the caller wants
/// a different ranking than the natural one.
pub trait Comparator<T> {
    /// Compare two elements. Only the sign of the result is meaningful.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The element type's own `Ord` implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Adapter turning a comparison closure into a [`Comparator`].
///
/// Non-capturing closures are zero-sized, so wrapping one costs nothing per
/// stored element.
#[derive(Debug, Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<T, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order() {
        assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
        assert_eq!(NaturalOrder.compare(&"b", &"a"), Ordering::Greater);
        assert_eq!(NaturalOrder.compare(&7u8, &7u8), Ordering::Equal);
    }

    #[test]
    fn test_fn_comparator_reverses() {
        let rev = FnComparator(|a: &i32, b: &i32| b.cmp(a));
        assert_eq!(rev.compare(&1, &2), Ordering::Greater);
        assert_eq!(rev.compare(&2, &1), Ordering::Less);
    }
}
