//! Canonical serialization types.
//!
//! Every arithmetic or boolean type is mapped, at compile time, to exactly
//! one wide type out of `bool`, `i64`, `u64` and `f64`. Concrete formats only
//! ever see these four shapes (plus strings), no matter how many numeric
//! types the data model uses.
//!
//! | Source types                          | Canonical |
//! |---------------------------------------|-----------|
//! | `bool`                                | `bool`    |
//! | `i8`, `i16`, `i32`, `i64`, `isize`    | `i64`     |
//! | `u8`, `u16`, `u32`, `u64`, `usize`    | `u64`     |
//! | `f32`, `f64`                          | `f64`     |

use core::any::type_name;
use core::fmt;

use crate::error::AssembleError;
use crate::value::{AnyValue, Value};

// -----------------------------------------------------------------------------
// CanonicalKind

/// The four canonical shapes spoken at the format boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalKind {
    Bool,
    Int64,
    UInt64,
    Double,
}

impl CanonicalKind {
    /// Short name, used in documentation graphs.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for CanonicalKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// Wide

mod sealed {
    pub trait Sealed {}

    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
    impl Sealed for f64 {}
}

/// One of the four canonical types. Sealed.
pub trait Wide: sealed::Sealed + Value + Copy {
    const KIND: CanonicalKind;
}

impl Wide for bool {
    const KIND: CanonicalKind = CanonicalKind::Bool;
}

impl Wide for i64 {
    const KIND: CanonicalKind = CanonicalKind::Int64;
}

impl Wide for u64 {
    const KIND: CanonicalKind = CanonicalKind::UInt64;
}

impl Wide for f64 {
    const KIND: CanonicalKind = CanonicalKind::Double;
}

// -----------------------------------------------------------------------------
// Canonical

/// Maps a language type to its canonical wide type.
///
/// # Examples
///
/// ```
/// use vc_assembler::rules::{Canonical, CanonicalKind};
/// use vc_assembler::value::AnyValue;
///
/// assert_eq!(<u16 as Canonical>::KIND, CanonicalKind::UInt64);
/// assert_eq!(7_u16.widen(), 7_u64);
///
/// assert_eq!(i8::narrow(&AnyValue::new(127_i64)), Ok(127));
/// assert!(i8::narrow(&AnyValue::new(128_i64)).is_err());
/// ```
pub trait Canonical: Copy + Send + Sync + 'static {
    /// The canonical type this type is written as.
    type Wide: Wide;

    /// Shortcut for `<Self::Wide as Wide>::KIND`.
    const KIND: CanonicalKind = <Self::Wide as Wide>::KIND;

    /// Lossless conversion to the canonical type.
    fn widen(self) -> Self::Wide;

    /// Range-checked conversion from a value produced by a source.
    fn narrow(value: &AnyValue) -> Result<Self, AssembleError>;
}

fn narrow_integer<T>(value: &AnyValue) -> Result<T, AssembleError>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    if let Some(&v) = value.downcast_ref::<i64>() {
        return T::try_from(v).map_err(|_| AssembleError::range(v, type_name::<T>()));
    }
    if let Some(&v) = value.downcast_ref::<u64>() {
        return T::try_from(v).map_err(|_| AssembleError::range(v, type_name::<T>()));
    }
    Err(AssembleError::type_mismatch(
        type_name::<T>(),
        value.type_name(),
    ))
}

// Accepts a double, or an integer coerced to double.
fn narrow_double(value: &AnyValue, target: &'static str) -> Result<f64, AssembleError> {
    if let Some(&v) = value.downcast_ref::<f64>() {
        Ok(v)
    } else if let Some(&v) = value.downcast_ref::<i64>() {
        Ok(v as f64)
    } else if let Some(&v) = value.downcast_ref::<u64>() {
        Ok(v as f64)
    } else {
        Err(AssembleError::type_mismatch(target, value.type_name()))
    }
}

macro_rules! impl_canonical_integer {
    ($wide:ty => $($ty:ty),+ $(,)?) => {
        $(
            impl Canonical for $ty {
                type Wide = $wide;

                #[inline]
                fn widen(self) -> $wide {
                    self as $wide
                }

                #[inline]
                fn narrow(value: &AnyValue) -> Result<Self, AssembleError> {
                    narrow_integer::<$ty>(value)
                }
            }
        )+
    };
}

impl_canonical_integer!(i64 => i8, i16, i32, i64, isize);
impl_canonical_integer!(u64 => u8, u16, u32, u64, usize);

impl Canonical for bool {
    type Wide = bool;

    #[inline]
    fn widen(self) -> bool {
        self
    }

    fn narrow(value: &AnyValue) -> Result<Self, AssembleError> {
        value
            .downcast_ref::<bool>()
            .copied()
            .ok_or_else(|| AssembleError::type_mismatch("bool", value.type_name()))
    }
}

impl Canonical for f64 {
    type Wide = f64;

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(value: &AnyValue) -> Result<Self, AssembleError> {
        narrow_double(value, "f64")
    }
}

impl Canonical for f32 {
    type Wide = f64;

    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }

    fn narrow(value: &AnyValue) -> Result<Self, AssembleError> {
        let v = narrow_double(value, "f32")?;
        if v.is_finite() && v.abs() > f64::from(f32::MAX) {
            return Err(AssembleError::range(v, "f32"));
        }
        Ok(v as f32)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{Canonical, CanonicalKind};
    use crate::error::ErrorKind;
    use crate::value::AnyValue;

    #[test]
    fn kinds_cover_every_family() {
        assert_eq!(<bool as Canonical>::KIND, CanonicalKind::Bool);
        assert_eq!(<i8 as Canonical>::KIND, CanonicalKind::Int64);
        assert_eq!(<isize as Canonical>::KIND, CanonicalKind::Int64);
        assert_eq!(<u32 as Canonical>::KIND, CanonicalKind::UInt64);
        assert_eq!(<usize as Canonical>::KIND, CanonicalKind::UInt64);
        assert_eq!(<f32 as Canonical>::KIND, CanonicalKind::Double);
    }

    #[test]
    fn signed_byte_boundaries() {
        assert_eq!(i8::narrow(&AnyValue::new(127_i64)), Ok(127));
        assert_eq!(i8::narrow(&AnyValue::new(-128_i64)), Ok(-128));

        let over = i8::narrow(&AnyValue::new(128_i64)).unwrap_err();
        assert!(matches!(over.kind(), ErrorKind::Range { target: "i8", .. }));

        let under = i8::narrow(&AnyValue::new(-129_i64)).unwrap_err();
        assert!(matches!(under.kind(), ErrorKind::Range { .. }));
    }

    #[test]
    fn sign_mismatch_is_a_range_error() {
        let err = u32::narrow(&AnyValue::new(-1_i64)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Range { .. }));

        let err = i64::narrow(&AnyValue::new(u64::MAX)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Range { .. }));

        // Unsigned sources are accepted by signed targets when in range.
        assert_eq!(i16::narrow(&AnyValue::new(300_u64)), Ok(300));
    }

    #[test]
    fn floats_fall_back_to_integers() {
        assert_eq!(f64::narrow(&AnyValue::new(1.5_f64)), Ok(1.5));
        assert_eq!(f64::narrow(&AnyValue::new(-3_i64)), Ok(-3.0));
        assert_eq!(f32::narrow(&AnyValue::new(8_u64)), Ok(8.0));
        assert!(f32::narrow(&AnyValue::new(1e300_f64)).is_err());
        assert!(f32::narrow(&AnyValue::new(f64::INFINITY)).is_ok());
    }

    #[test]
    fn strings_are_type_mismatches() {
        let text = AnyValue::new(String::from("notanumber"));
        for err in [
            i32::narrow(&text).unwrap_err(),
            f64::narrow(&text).map(|_| ()).unwrap_err(),
            bool::narrow(&text).map(|_| ()).unwrap_err(),
        ] {
            assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
        }
    }
}
