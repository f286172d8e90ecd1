//! Member descriptors.
//!
//! A [`Member`] describes one declared field of a type `T`: its
//! serialization name, how to reach it inside an instance and how to
//! (de)serialize and document it.
//!
//! - [`FieldMember`] is a plain field, written under its own name.
//! - [`ExtendMember`] embeds another structure whose members are flattened
//!   into the owner, as if `T` extended it.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::assembler::{Assembler, ObjectAssembler, Structure};
use crate::de::StructDeserializer;
use crate::error::AssembleError;
use crate::graph::Graph;
use crate::ser::StructSerializer;

// -----------------------------------------------------------------------------
// Field identity

/// Type-erased field identity: byte offset inside the owner, the field's
/// name and its type.
///
/// Zero-sized fields of one type may share an offset, the name tells them
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberId {
    offset: usize,
    field: &'static str,
    type_id: TypeId,
}

impl MemberId {
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Name of the field in the owner's definition.
    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

/// Identity of one field of `T`.
///
/// Selects members for partial serialization. Usually created with
/// [`field_id!`](crate::field_id).
pub struct FieldId<T> {
    id: MemberId,
    marker: PhantomData<fn(&T)>,
}

impl<T: 'static> FieldId<T> {
    /// Creates the identity of the field `field` at `offset` whose type is
    /// inferred from `access`.
    ///
    /// Prefer [`field_id!`](crate::field_id), which computes the offset.
    #[inline]
    pub fn of<F: 'static>(offset: usize, field: &'static str, access: fn(&T) -> &F) -> Self {
        let _ = access;
        Self {
            id: MemberId {
                offset,
                field,
                type_id: TypeId::of::<F>(),
            },
            marker: PhantomData,
        }
    }

    /// Erases the owner type.
    #[inline]
    pub fn erase(&self) -> MemberId {
        self.id
    }
}

impl<T> Clone for FieldId<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldId<T> {}

impl<T> PartialEq for FieldId<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for FieldId<T> {}

impl<T> Hash for FieldId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for FieldId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldId")
            .field("owner", &core::any::type_name::<T>())
            .field("field", &self.id.field)
            .field("offset", &self.id.offset)
            .finish()
    }
}

/// Identity of a field, for partial serialization and descriptor building.
///
/// ```
/// use vc_assembler::field_id;
///
/// struct Limits {
///     low: u8,
///     high: u8,
/// }
///
/// assert_eq!(field_id!(Limits, low), field_id!(Limits, low));
/// assert_ne!(field_id!(Limits, low), field_id!(Limits, high));
/// ```
#[macro_export]
macro_rules! field_id {
    ($owner:ty, $field:ident) => {
        $crate::member::FieldId::<$owner>::of(
            ::core::mem::offset_of!($owner, $field),
            ::core::stringify!($field),
            |owner: &$owner| &owner.$field,
        )
    };
}

// -----------------------------------------------------------------------------
// Member

/// One declared member of `T`.
pub trait Member<T>: Send + Sync {
    /// Serialization name.
    fn name(&self) -> &str;

    /// Identity of the field this member reads and writes.
    fn field_id(&self) -> MemberId;

    fn serialize(&self, sink: &mut dyn StructSerializer, owner: &T) -> Result<(), AssembleError>;

    fn deserialize(
        &self,
        source: &mut dyn StructDeserializer,
        owner: &mut T,
    ) -> Result<(), AssembleError>;

    /// Adds this member below `owner_node`.
    fn graph(&self, graph: &mut Graph, owner_node: &str) -> Result<(), AssembleError>;

    /// Names this member writes into the owner's struct sink.
    #[inline]
    fn output_names(&self) -> Result<Vec<String>, AssembleError> {
        Ok(vec![self.name().into()])
    }

    /// Same name and same field.
    #[inline]
    fn identity_equals(&self, other: &dyn Member<T>) -> bool {
        self.name() == other.name() && self.field_id() == other.field_id()
    }
}

impl<T> fmt::Debug for dyn Member<T> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name())
            .field("field_id", &self.field_id())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// FieldMember

/// A plain field of type `F`.
pub struct FieldMember<T, F> {
    name: Cow<'static, str>,
    id: FieldId<T>,
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T, F> FieldMember<T, F> {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        id: FieldId<T>,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            get,
            get_mut,
        }
    }
}

impl<T: 'static, F: Assembler + 'static> Member<T> for FieldMember<T, F> {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn field_id(&self) -> MemberId {
        self.id.erase()
    }

    fn serialize(&self, sink: &mut dyn StructSerializer, owner: &T) -> Result<(), AssembleError> {
        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!("serialize `{}` as `{}`", self.name, core::any::type_name::<F>());

        (self.get)(owner)
            .serialize_named(sink, &self.name)
            .map_err(|e| e.in_field(self.name.clone()))
    }

    fn deserialize(
        &self,
        source: &mut dyn StructDeserializer,
        owner: &mut T,
    ) -> Result<(), AssembleError> {
        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!("deserialize `{}` as `{}`", self.name, core::any::type_name::<F>());

        (self.get_mut)(owner)
            .deserialize_named(source, &self.name)
            .map_err(|e| e.in_field(self.name.clone()))
    }

    fn graph(&self, graph: &mut Graph, owner_node: &str) -> Result<(), AssembleError> {
        let node = graph.child(owner_node, &format!(".{}", self.name));
        F::graph(graph, &node).map_err(|e| e.in_field(self.name.clone()))
    }
}

// -----------------------------------------------------------------------------
// ExtendMember

/// An embedded structure `B` whose members are flattened into `T`.
///
/// The name identifies the member for lookups and partial serialization;
/// it never appears in the output.
pub struct ExtendMember<T, B> {
    name: Cow<'static, str>,
    id: FieldId<T>,
    get: fn(&T) -> &B,
    get_mut: fn(&mut T) -> &mut B,
}

impl<T, B> ExtendMember<T, B> {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        id: FieldId<T>,
        get: fn(&T) -> &B,
        get_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            get,
            get_mut,
        }
    }
}

impl<T: 'static, B: Structure> Member<T> for ExtendMember<T, B> {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn field_id(&self) -> MemberId {
        self.id.erase()
    }

    fn serialize(&self, sink: &mut dyn StructSerializer, owner: &T) -> Result<(), AssembleError> {
        ObjectAssembler::<B>::serialize(sink, (self.get)(owner))
    }

    fn deserialize(
        &self,
        source: &mut dyn StructDeserializer,
        owner: &mut T,
    ) -> Result<(), AssembleError> {
        ObjectAssembler::<B>::deserialize(source, (self.get_mut)(owner))
    }

    fn graph(&self, graph: &mut Graph, owner_node: &str) -> Result<(), AssembleError> {
        ObjectAssembler::<B>::graph_members(graph, owner_node)
    }

    fn output_names(&self) -> Result<Vec<String>, AssembleError> {
        let mut names = Vec::new();
        for member in B::descriptors()?.iter() {
            names.extend(member.output_names()?);
        }
        Ok(names)
    }
}
