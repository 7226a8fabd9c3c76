//! Value-equality policy for overwrite detection.

use std::rc::Rc;
use std::sync::Arc;

/// Decides whether overwriting a stored value would be a no-op.
///
/// `assoc` skips the write entirely when the incoming value is
/// value-equal to the stored one, so re-inserting an equal value hands
/// back a container whose root is pointer-identical to the receiver's.
/// That determinism is what makes "did anything change?" a constant-time
/// question.
///
/// The provided implementations follow the container policy:
///
/// - primitives, `String`, `&str`, and `()` compare structurally;
/// - [`Arc`] and [`Rc`] compare by identity (`ptr_eq`), so a
///   re-inserted shared handle never breaks structural sharing even
///   when its pointee has no useful equality;
/// - [`Option`] lifts the policy pointwise.
///
/// Other types opt in by implementing the trait. Structural equality is
/// the usual choice; returning `false` unconditionally makes every
/// assoc an overwrite.
///
/// Implementations must be pure and total; the policy runs on the assoc
/// fast path.
pub trait ValueEq {
    /// Returns `true` if overwriting `self` with `other` changes nothing.
    fn value_eq(&self, other: &Self) -> bool;
}

macro_rules! structural_value_eq {
    ($($t:ty),* $(,)?) => {$(
        impl ValueEq for $t {
            #[inline]
            fn value_eq(&self, other: &Self) -> bool {
                self == other
            }
        }
    )*};
}

structural_value_eq!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    &str,
);

impl<T> ValueEq for Arc<T> {
    #[inline]
    fn value_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T> ValueEq for Rc<T> {
    #[inline]
    fn value_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ValueEq> ValueEq for Option<T> {
    fn value_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.value_eq(b),
            _ => false,
        }
    }
}
