//! Monoid trait for types with identity elements
//!
//! A `Monoid` extends [`Semigroup`] with an identity element. Monoidal folds
//! ([`from_monoid_map`](crate::fold::from_monoid_map),
//! [`nest`](crate::fold::FoldExt::nest)) start from the identity and combine
//! one result per element or per container.
//!
//! # Mathematical Properties
//!
//! 1. **Associativity** (from Semigroup):
//!    `a.combine(b).combine(c) == a.combine(b.combine(c))`
//! 2. **Right identity**: `a.combine(M::empty()) == a`
//! 3. **Left identity**: `M::empty().combine(a) == a`
//!
//! # Numeric Monoids
//!
//! Numbers have several valid monoids (addition, multiplication), so wrapper
//! types pick one:
//!
//! ```
//! use freshet::monoid::{combine_all, Sum};
//!
//! let total = combine_all(vec![Sum(1), Sum(2), Sum(3), Sum(4)]);
//! assert_eq!(total, Sum(10));
//! ```

use crate::Semigroup;
use std::ops::{Add, Mul};

/// A `Semigroup` with an identity element
///
/// # Laws
///
/// ```text
/// a.combine(M::empty()) == a           (right identity)
/// M::empty().combine(a) == a           (left identity)
/// ```
///
/// # Examples
///
/// ```
/// use freshet::{Monoid, Semigroup};
///
/// let v = vec![1, 2, 3];
/// let empty: Vec<i32> = Monoid::empty();
/// assert_eq!(v.clone().combine(empty.clone()), v);
/// assert_eq!(empty.combine(v.clone()), v);
/// ```
pub trait Monoid: Semigroup {
    /// The identity element for this monoid
    fn empty() -> Self;
}

impl<T> Monoid for Vec<T> {
    fn empty() -> Self {
        Vec::new()
    }
}

impl Monoid for String {
    fn empty() -> Self {
        String::new()
    }
}

impl Monoid for () {
    fn empty() -> Self {}
}

impl<T: Semigroup> Monoid for Option<T> {
    fn empty() -> Self {
        None
    }
}

macro_rules! impl_monoid_tuple {
    ($($idx:tt $T:ident),+) => {
        impl<$($T: Monoid),+> Monoid for ($($T,)+) {
            fn empty() -> Self {
                ($($T::empty(),)+)
            }
        }
    };
}

impl_monoid_tuple!(0 T1, 1 T2);
impl_monoid_tuple!(0 T1, 1 T2, 2 T3);
impl_monoid_tuple!(0 T1, 1 T2, 2 T3, 3 T4);

/// Additive monoid over a numeric type
///
/// # Examples
///
/// ```
/// use freshet::monoid::Sum;
/// use freshet::Semigroup;
///
/// assert_eq!(Sum(2).combine(Sum(3)), Sum(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sum<T>(pub T);

impl<T: Add<Output = T>> Semigroup for Sum<T> {
    #[inline]
    fn combine(self, other: Self) -> Self {
        Sum(self.0 + other.0)
    }
}

impl<T: Add<Output = T> + Default> Monoid for Sum<T> {
    fn empty() -> Self {
        Sum(T::default())
    }
}

/// Multiplicative monoid over a numeric type
///
/// # Examples
///
/// ```
/// use freshet::monoid::Product;
/// use freshet::Semigroup;
///
/// assert_eq!(Product(2).combine(Product(3)), Product(6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Product<T>(pub T);

impl<T: Mul<Output = T>> Semigroup for Product<T> {
    #[inline]
    fn combine(self, other: Self) -> Self {
        Product(self.0 * other.0)
    }
}

/// Identity for `Product` requires a `one`; supplied for common integers
macro_rules! impl_product_monoid {
    ($($t:ty)+) => {
        $(
            impl Monoid for Product<$t> {
                fn empty() -> Self {
                    Product(1)
                }
            }
        )+
    };
}

impl_product_monoid!(i8 i16 i32 i64 i128 isize u8 u16 u32 u64 u128 usize);

/// Combine every element of an iterator, starting from the identity
///
/// # Examples
///
/// ```
/// use freshet::monoid::combine_all;
///
/// let flat = combine_all(vec![vec![1, 2], vec![3], vec![]]);
/// assert_eq!(flat, vec![1, 2, 3]);
/// ```
pub fn combine_all<M, I>(items: I) -> M
where
    M: Monoid,
    I: IntoIterator<Item = M>,
{
    items.into_iter().fold(M::empty(), Semigroup::combine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_identity() {
        let v = vec![1, 2, 3];
        let empty: Vec<i32> = Monoid::empty();
        assert_eq!(v.clone().combine(empty.clone()), v);
        assert_eq!(empty.combine(v.clone()), v);
    }

    #[test]
    fn test_sum() {
        assert_eq!(combine_all(vec![Sum(1), Sum(2), Sum(3)]), Sum(6));
        assert_eq!(Sum::<i32>::empty(), Sum(0));
    }

    #[test]
    fn test_product() {
        assert_eq!(combine_all(vec![Product(2), Product(3), Product(4)]), Product(24));
        assert_eq!(Product::<i32>::empty(), Product(1));
    }

    #[test]
    fn test_combine_all_empty_iter() {
        let total: Sum<i64> = combine_all(Vec::new());
        assert_eq!(total, Sum(0));
    }

    #[test]
    fn test_tuple_identity() {
        let t = (vec![1], "a".to_string());
        let empty: (Vec<i32>, String) = Monoid::empty();
        assert_eq!(t.clone().combine(empty), t);
    }
}
