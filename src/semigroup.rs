//! Semigroup trait for associative combination
//!
//! A Semigroup is a type with an associative binary operation. Folds use it to
//! merge per-element or per-container results without caring how the merge
//! works: anything combinable can be accumulated.
//!
//! # Mathematical Properties
//!
//! The `combine` operation must be associative:
//! ```text
//! a.combine(b).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! # Examples
//!
//! ```
//! use freshet::Semigroup;
//!
//! let v1 = vec![1, 2, 3];
//! let v2 = vec![4, 5, 6];
//! assert_eq!(v1.combine(v2), vec![1, 2, 3, 4, 5, 6]);
//!
//! let s1 = "Hello, ".to_string();
//! let s2 = "World!".to_string();
//! assert_eq!(s1.combine(s2), "Hello, World!");
//! ```
//!
//! # Custom Implementations
//!
//! ```
//! use freshet::Semigroup;
//!
//! #[derive(Debug, PartialEq)]
//! struct PageStats { bytes: u64, links: u64 }
//!
//! impl Semigroup for PageStats {
//!     fn combine(self, other: Self) -> Self {
//!         PageStats {
//!             bytes: self.bytes + other.bytes,
//!             links: self.links + other.links,
//!         }
//!     }
//! }
//! ```

/// A type that supports an associative binary operation
///
/// # Laws
///
/// ```text
/// a.combine(b).combine(c) == a.combine(b.combine(c))
/// ```
///
/// # Note on Ownership
///
/// `combine` takes `self` by value. Clone first if the originals are still
/// needed.
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Semigroup;
    ///
    /// assert_eq!(vec![1, 2].combine(vec![3, 4]), vec![1, 2, 3, 4]);
    /// ```
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

impl Semigroup for String {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

impl Semigroup for () {
    #[inline]
    fn combine(self, _other: Self) -> Self {}
}

// Option lifts an inner semigroup, treating None as an absent value
impl<T: Semigroup> Semigroup for Option<T> {
    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Some(a), Some(b)) => Some(a.combine(b)),
            (Some(a), None) => Some(a),
            (None, b) => b,
        }
    }
}

// Macro for generating tuple implementations, combined component-wise
macro_rules! impl_semigroup_tuple {
    ($($idx:tt $T:ident),+) => {
        impl<$($T: Semigroup),+> Semigroup for ($($T,)+) {
            fn combine(self, other: Self) -> Self {
                ($(self.$idx.combine(other.$idx),)+)
            }
        }
    };
}

impl_semigroup_tuple!(0 T1, 1 T2);
impl_semigroup_tuple!(0 T1, 1 T2, 2 T3);
impl_semigroup_tuple!(0 T1, 1 T2, 2 T3, 3 T4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_combine() {
        assert_eq!(vec![1, 2].combine(vec![3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_string_combine() {
        assert_eq!("ab".to_string().combine("cd".to_string()), "abcd");
    }

    #[test]
    fn test_option_combine() {
        let a: Option<Vec<i32>> = Some(vec![1]);
        let b: Option<Vec<i32>> = Some(vec![2]);
        assert_eq!(a.combine(b), Some(vec![1, 2]));

        let none: Option<Vec<i32>> = None;
        assert_eq!(none.clone().combine(Some(vec![3])), Some(vec![3]));
        assert_eq!(Some(vec![3]).combine(none), Some(vec![3]));
    }

    #[test]
    fn test_tuple_combine_componentwise() {
        let t1 = (vec![1], "a".to_string());
        let t2 = (vec![2], "b".to_string());
        assert_eq!(t1.combine(t2), (vec![1, 2], "ab".to_string()));
    }

    #[test]
    fn test_associativity() {
        let a = vec![1];
        let b = vec![2];
        let c = vec![3];
        assert_eq!(
            a.clone().combine(b.clone()).combine(c.clone()),
            a.combine(b.combine(c))
        );
    }
}
