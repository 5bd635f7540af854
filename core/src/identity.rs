//! Identity and shallow equality.
//!
//! Memoization needs a cheap "is this the same value I saw last time?"
//! check. [`Identical`] answers it: shared handles ([`Arc`]) compare by
//! pointer, plain values (numbers, strings, enums, timestamps) compare by
//! value. [`ShallowEq`] lifts that one level: two aggregates are shallowly
//! equal when every field (or element) is [`Identical`].

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Cheap identity comparison.
pub trait Identical {
    /// Returns `true` when `other` is the same value as `self`.
    fn identical(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Identical for Arc<T> {
    fn identical(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Identical> Identical for Option<T> {
    fn identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.identical(b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Implements [`Identical`] by value equality for plain value types.
///
/// ```
/// use b2b_state_core::{impl_identical_by_value, Identical};
///
/// #[derive(Clone, Copy, PartialEq, Eq)]
/// enum Status {
///     Open,
///     Closed,
/// }
///
/// impl_identical_by_value!(Status);
///
/// assert!(Status::Open.identical(&Status::Open));
/// assert!(!Status::Open.identical(&Status::Closed));
/// ```
#[macro_export]
macro_rules! impl_identical_by_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::identity::Identical for $ty {
                fn identical(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )+
    };
}

impl_identical_by_value!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    usize,
    i8,
    i16,
    i32,
    i64,
    isize,
    f32,
    f64,
    String,
    &'static str,
    DateTime<Utc>,
);

macro_rules! impl_identical_for_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Identical),+> Identical for ($($name,)+) {
            fn identical(&self, other: &Self) -> bool {
                $(self.$idx.identical(&other.$idx))&&+
            }
        }
    };
}

impl_identical_for_tuple!(A 0);
impl_identical_for_tuple!(A 0, B 1);
impl_identical_for_tuple!(A 0, B 1, C 2);
impl_identical_for_tuple!(A 0, B 1, C 2, D 3);
impl_identical_for_tuple!(A 0, B 1, C 2, D 3, E 4);
impl_identical_for_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_identical_for_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_identical_for_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);

/// One-level structural comparison.
///
/// Derive it with `#[derive(ShallowEq)]` from `b2b-state-macros`; every
/// field must implement [`Identical`].
pub trait ShallowEq {
    /// Returns `true` when every own field of `self` is identical to the
    /// corresponding field of `other`.
    fn shallow_eq(&self, other: &Self) -> bool;
}

impl<T: Identical> ShallowEq for [T] {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.identical(b))
    }
}

impl<T: Identical> ShallowEq for Vec<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.as_slice().shallow_eq(other.as_slice())
    }
}

impl<T: ShallowEq + ?Sized> ShallowEq for Arc<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other) || (**self).shallow_eq(&**other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arcs_compare_by_pointer() {
        let a = Arc::new(vec![1, 2, 3]);
        let b = Arc::clone(&a);
        let c = Arc::new(vec![1, 2, 3]);

        assert!(a.identical(&b));
        assert!(!a.identical(&c));
    }

    #[test]
    fn values_compare_by_value() {
        assert!(3_u32.identical(&3));
        assert!("x".to_string().identical(&"x".to_string()));
        assert!(Some(1.5_f64).identical(&Some(1.5)));
        assert!(!Some(1.5_f64).identical(&None));
        assert!(!f64::NAN.identical(&f64::NAN));
    }

    #[test]
    fn tuples_compare_element_wise() {
        let shared = Arc::new(String::from("x"));
        assert!((1_u32, Arc::clone(&shared)).identical(&(1, Arc::clone(&shared))));
        assert!(!(1_u32, Arc::clone(&shared)).identical(&(2, shared)));
    }

    #[test]
    fn vectors_are_shallow_equal_by_element_identity() {
        let item = Arc::new(42);
        let a = vec![Arc::clone(&item)];
        let b = vec![Arc::clone(&item)];
        let c = vec![Arc::new(42)];

        assert!(a.shallow_eq(&b));
        assert!(!a.shallow_eq(&c));
        assert!(Arc::new(a.clone()).shallow_eq(&Arc::new(b)));
    }
}
