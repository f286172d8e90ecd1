//! A type-erased single value container.
//!
//! [`AnyValue`] moves data between the assembler and concrete formats
//! (a source hands primitive values over as `AnyValue`), and lets the
//! settings registry store heterogeneous entries behind one map value type.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Value

/// Types that can be stored in an [`AnyValue`].
///
/// Implemented for every `'static` type that can be cloned, compared and
/// printed, so the container never needs to know the stored types in advance.
pub trait Value: Any + Clone + PartialEq + fmt::Debug + Send + Sync {}

impl<T: Any + Clone + PartialEq + fmt::Debug + Send + Sync> Value for T {}

// Object-safe mirror of `Value`.
trait DynValue: Any + Send + Sync {
    fn clone_boxed(&self) -> Box<dyn DynValue>;
    fn eq_dyn(&self, other: &dyn DynValue) -> bool;
    fn debug_dyn(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Value> DynValue for T {
    #[inline]
    fn clone_boxed(&self) -> Box<dyn DynValue> {
        Box::new(self.clone())
    }

    #[inline]
    fn eq_dyn(&self, other: &dyn DynValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    #[inline]
    fn debug_dyn(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// -----------------------------------------------------------------------------
// AnyError

/// Error returned when extracting a value of the wrong type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnyError {
    #[error("expected a `{expected}` but the container is empty")]
    Empty { expected: &'static str },

    #[error("expected a `{expected}` but the container holds a `{found}`")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
}

// -----------------------------------------------------------------------------
// AnyValue

/// Holds exactly one value of a runtime-checked type, or nothing.
///
/// "Nothing" is a distinct state from "holds a default value".
///
/// # Examples
///
/// ```
/// use vc_assembler::value::{AnyError, AnyValue};
///
/// let mut value = AnyValue::new(42_i64);
/// assert!(value.has_value());
/// assert_eq!(value.get::<i64>(), Ok(42));
/// assert!(matches!(value.get::<u64>(), Err(AnyError::Mismatch { .. })));
///
/// value.set(String::from("text"));
/// assert!(value.is::<String>());
///
/// assert!(!AnyValue::none().has_value());
/// ```
#[derive(Default)]
pub struct AnyValue {
    inner: Option<Box<dyn DynValue>>,
}

impl AnyValue {
    /// Creates an empty container.
    #[inline]
    pub const fn none() -> Self {
        Self { inner: None }
    }

    /// Creates a container holding `value`.
    #[inline]
    pub fn new<T: Value>(value: T) -> Self {
        Self {
            inner: Some(Box::new(value)),
        }
    }

    /// Returns `true` if the container holds a value.
    #[inline]
    pub fn has_value(&self) -> bool {
        self.inner.is_some()
    }

    /// Returns the [`TypeId`] of the held value.
    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.inner.as_deref().map(|v| v.as_any().type_id())
    }

    /// Returns the type name of the held value, or `"nothing"`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.inner.as_deref().map_or("nothing", DynValue::type_name)
    }

    /// Returns `true` if the held value is a `T`.
    #[inline]
    pub fn is<T: Value>(&self) -> bool {
        self.type_id() == Some(TypeId::of::<T>())
    }

    /// Returns a reference to the held value if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: Value>(&self) -> Option<&T> {
        self.inner.as_deref()?.as_any().downcast_ref()
    }

    /// Returns a mutable reference to the held value if it is a `T`.
    #[inline]
    pub fn downcast_mut<T: Value>(&mut self) -> Option<&mut T> {
        self.inner.as_deref_mut()?.as_any_mut().downcast_mut()
    }

    /// Returns a reference to the held `T`, or a type error.
    pub fn get_ref<T: Value>(&self) -> Result<&T, AnyError> {
        let found = self.type_name();
        match self.inner.as_deref() {
            None => Err(AnyError::Empty {
                expected: core::any::type_name::<T>(),
            }),
            Some(inner) => inner.as_any().downcast_ref().ok_or(AnyError::Mismatch {
                expected: core::any::type_name::<T>(),
                found,
            }),
        }
    }

    /// Returns a mutable reference to the held `T`, or a type error.
    pub fn get_mut<T: Value>(&mut self) -> Result<&mut T, AnyError> {
        let found = self.type_name();
        match self.inner.as_deref_mut() {
            None => Err(AnyError::Empty {
                expected: core::any::type_name::<T>(),
            }),
            Some(inner) => inner
                .as_any_mut()
                .downcast_mut()
                .ok_or(AnyError::Mismatch {
                    expected: core::any::type_name::<T>(),
                    found,
                }),
        }
    }

    /// Returns a copy of the held `T`, or a type error.
    #[inline]
    pub fn get<T: Value>(&self) -> Result<T, AnyError> {
        self.get_ref::<T>().cloned()
    }

    /// Moves the held `T` out, leaving the container empty.
    ///
    /// On a type error the container is left untouched.
    pub fn take<T: Value>(&mut self) -> Result<T, AnyError> {
        self.get_ref::<T>()?;
        match self.inner.take().map(DynValue::into_any) {
            Some(boxed) => match boxed.downcast::<T>() {
                Ok(value) => Ok(*value),
                // checked by `get_ref` above
                Err(_) => Err(AnyError::Empty {
                    expected: core::any::type_name::<T>(),
                }),
            },
            None => Err(AnyError::Empty {
                expected: core::any::type_name::<T>(),
            }),
        }
    }

    /// Replaces the held value and its type tag.
    #[inline]
    pub fn set<T: Value>(&mut self, value: T) {
        self.inner = Some(Box::new(value));
    }

    /// Drops the held value.
    #[inline]
    pub fn clear(&mut self) {
        self.inner = None;
    }
}

impl Clone for AnyValue {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.as_deref().map(DynValue::clone_boxed),
        }
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self.inner.as_deref(), other.inner.as_deref()) {
            (None, None) => true,
            (Some(a), Some(b)) => a.eq_dyn(b),
            _ => false,
        }
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.as_deref() {
            None => f.write_str("AnyValue(<none>)"),
            Some(inner) => {
                f.write_str("AnyValue(")?;
                inner.debug_dyn(f)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::{AnyError, AnyValue};

    #[test]
    fn empty_is_not_default() {
        let empty = AnyValue::none();
        let zero = AnyValue::new(0_i64);

        assert!(!empty.has_value());
        assert!(zero.has_value());
        assert_ne!(empty, zero);
        assert_eq!(empty.type_id(), None);
        assert_eq!(zero.type_id(), Some(TypeId::of::<i64>()));
        assert!(matches!(empty.get::<i64>(), Err(AnyError::Empty { .. })));
    }

    #[test]
    fn mismatch_reports_both_types() {
        let value = AnyValue::new(String::from("x"));
        let err = value.get::<u64>().unwrap_err();
        assert_eq!(
            err,
            AnyError::Mismatch {
                expected: "u64",
                found: "alloc::string::String",
            }
        );
    }

    #[test]
    fn assignment_replaces_type_tag() {
        let mut value = AnyValue::new(1_u64);
        value.set(vec![1_i32, 2]);
        assert!(value.is::<Vec<i32>>());
        assert!(!value.is::<u64>());

        value.get_mut::<Vec<i32>>().unwrap().push(3);
        assert_eq!(value.get::<Vec<i32>>(), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn clone_and_compare() {
        let value = AnyValue::new(2.5_f64);
        let copy = value.clone();
        assert_eq!(value, copy);
        assert_ne!(value, AnyValue::new(2.5_f32));
        assert_eq!(AnyValue::none(), AnyValue::none());
    }

    #[test]
    fn take_leaves_container_empty() {
        let mut value = AnyValue::new(true);
        assert!(value.take::<u8>().is_err());
        assert!(value.has_value());
        assert_eq!(value.take::<bool>(), Ok(true));
        assert!(!value.has_value());
    }
}
