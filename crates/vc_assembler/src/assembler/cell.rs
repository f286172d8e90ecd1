//! Containers for static storage of declarations.
//!
//! A declaration is a descriptor set ([`Descriptors`]) or an enum table
//! ([`EnumTable`]). It is built on first use, never mutated afterwards and
//! read concurrently from any thread.
//!
//! Building may fail (duplicate names, duplicate fields, empty tables). The
//! failure is stored too, so every later request reports the same error
//! instead of rebuilding.
//!
//! ## DescriptorCell
//!
//! For non generic types. Internally an [`OnceLock`], almost no additional
//! expenses.
//!
//! ## GenericDescriptorCell
//!
//! If the type is generic, the `static CELL` inside the function is shared by
//! every instantiation. Therefore, the inner of this container is a map from
//! [`TypeId`] to leaked declarations, wrapped in a [`RwLock`].
//!
//! [`Descriptors`]: crate::assembler::Descriptors
//! [`EnumTable`]: crate::enumeration::EnumTable

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::error::AssembleError;

type Declared<V> = Result<V, AssembleError>;

// -----------------------------------------------------------------------------
// DescriptorCell

/// Static storage of the declaration of a non-generic type.
///
/// ## Example
///
/// ```
/// use vc_assembler::assembler::{DescriptorCell, Descriptors, Structure};
/// use vc_assembler::{field_id, Assemble, AssembleError};
///
/// #[derive(Default, Assemble)]
/// #[assemble(Structure = false)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Structure for Point {
///     fn descriptors() -> Result<&'static Descriptors<Self>, AssembleError> {
///         static CELL: DescriptorCell<Descriptors<Point>> = DescriptorCell::new();
///         CELL.get_or_build(|| {
///             Descriptors::<Self>::builder()
///                 .field("x", field_id!(Point, x), |p| &p.x, |p| &mut p.x)
///                 .field("y", field_id!(Point, y), |p| &p.y, |p| &mut p.y)
///                 .build()
///         })
///     }
/// }
///
/// assert_eq!(Point::descriptors().unwrap().len(), 2);
/// ```
pub struct DescriptorCell<V: Send + Sync + 'static>(OnceLock<Declared<V>>);

impl<V: Send + Sync + 'static> DescriptorCell<V> {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored declaration, building it with `f` on first use.
    #[inline]
    pub fn get_or_build<F>(&'static self, f: F) -> Result<&'static V, AssembleError>
    where
        F: FnOnce() -> Declared<V>,
    {
        self.0.get_or_init(f).as_ref().map_err(Clone::clone)
    }
}

impl<V: Send + Sync + 'static> Default for DescriptorCell<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// GenericDescriptorCell

/// Static storage of declarations of generic types.
///
/// ## Example
///
/// ```
/// use vc_assembler::assembler::{GenericDescriptorCell, Descriptors, Structure};
/// use vc_assembler::{field_id, Assemble, AssembleError, Assembler};
///
/// #[derive(Default, Assemble)]
/// #[assemble(Structure = false)]
/// struct Wrapper<T> {
///     inner: T,
/// }
///
/// impl<T: Assembler + 'static> Structure for Wrapper<T> {
///     fn descriptors() -> Result<&'static Descriptors<Self>, AssembleError> {
///         static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
///         CELL.get_or_build::<Descriptors<Self>, _>(|| {
///             Descriptors::<Self>::builder()
///                 .field("inner", field_id!(Self, inner), |w| &w.inner, |w| &mut w.inner)
///                 .build()
///         })
///     }
/// }
///
/// assert_eq!(Wrapper::<u8>::descriptors().unwrap().len(), 1);
/// assert_eq!(Wrapper::<String>::descriptors().unwrap().len(), 1);
/// ```
pub struct GenericDescriptorCell(
    RwLock<HashMap<TypeId, &'static (dyn Any + Send + Sync), FixedState>>,
);

impl GenericDescriptorCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(HashMap::with_hasher(FixedState::with_seed(0))))
    }

    /// Returns the declaration stored for `V`, building it with `f` on first
    /// use.
    #[inline(always)]
    pub fn get_or_build<V, F>(&'static self, f: F) -> Result<&'static V, AssembleError>
    where
        V: Send + Sync + 'static,
        F: FnOnce() -> Declared<V>,
    {
        let type_id = TypeId::of::<Declared<V>>();
        let stored = match self.get_by_type_id(type_id) {
            Some(stored) => stored,
            None => self.insert_by_type_id(type_id, Box::new(f())),
        };
        match stored.downcast_ref::<Declared<V>>() {
            Some(declared) => declared.as_ref().map_err(Clone::clone),
            None => Err(AssembleError::declaration(
                "declaration cell holds a value of another type",
            )),
        }
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static (dyn Any + Send + Sync)> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn insert_by_type_id(
        &self,
        type_id: TypeId,
        value: Box<dyn Any + Send + Sync>,
    ) -> &'static (dyn Any + Send + Sync) {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| &*Box::leak(value))
    }
}

impl Default for GenericDescriptorCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
