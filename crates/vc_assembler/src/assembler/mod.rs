//! The object assembler.
//!
//! [`Assembler`] is the per-type customization point: every type that can
//! cross a sink or source implements it, either through the category impls
//! of this crate or through `#[derive(Assemble)]`.
//!
//! Structures additionally implement [`Structure`], which hands out their
//! static [`Descriptors`]. The generic algorithms over a descriptor set live
//! in [`ObjectAssembler`].

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod descriptors;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{DescriptorCell, GenericDescriptorCell};
pub use descriptors::{Descriptors, DescriptorsBuilder};

// -----------------------------------------------------------------------------
// Traits

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::de::{ArrayDeserializer, StructDeserializer};
use crate::error::AssembleError;
use crate::graph::Graph;
use crate::member::FieldId;
use crate::ser::{ArraySerializer, StructSerializer};

/// Serialization, deserialization and documentation of one type.
///
/// A value is either written under a name into a struct-shaped sink, or
/// appended to an array-shaped sink. Reading mirrors both forms.
pub trait Assembler {
    fn serialize_named(
        &self,
        sink: &mut dyn StructSerializer,
        name: &str,
    ) -> Result<(), AssembleError>;

    fn serialize_positional(&self, sink: &mut dyn ArraySerializer) -> Result<(), AssembleError>;

    fn deserialize_named(
        &mut self,
        source: &mut dyn StructDeserializer,
        name: &str,
    ) -> Result<(), AssembleError>;

    fn deserialize_positional(
        &mut self,
        source: &mut dyn ArrayDeserializer,
    ) -> Result<(), AssembleError>;

    /// Describes the shape of this type at `node`.
    fn graph(graph: &mut Graph, node: &str) -> Result<(), AssembleError>
    where
        Self: Sized;
}

/// Types usable as map keys.
///
/// Keys that are already strings can be written as field names, which
/// switches maps to the compact struct form. Every other key type uses an
/// array of `{key, value}` records.
pub trait MapKey: Assembler {
    /// Whether [`MapKey::as_field_name`] always succeeds.
    const FIELD_NAME_KEYS: bool = false;

    fn as_field_name(&self) -> Option<&str> {
        None
    }

    fn from_field_name(name: &str) -> Option<Self>
    where
        Self: Sized,
    {
        let _ = name;
        None
    }
}

/// Types described by a static descriptor set.
///
/// Usually implemented by `#[derive(Assemble)]`.
pub trait Structure: Sized + 'static {
    fn descriptors() -> Result<&'static Descriptors<Self>, AssembleError>;

    /// Label used in documentation graphs.
    fn type_name() -> &'static str {
        core::any::type_name::<Self>()
    }
}

// -----------------------------------------------------------------------------
// ObjectAssembler

/// Algorithms over the descriptor set of `T`.
///
/// # Examples
///
/// ```
/// use vc_assembler::tree::StructNode;
/// use vc_assembler::{field_id, Assemble, ObjectAssembler};
///
/// #[derive(Debug, Default, PartialEq, Assemble)]
/// struct Sample {
///     a: i32,
///     b: String,
///     c: bool,
/// }
///
/// let sample = Sample { a: 1, b: "skipped".into(), c: true };
///
/// let mut sink = StructNode::new();
/// ObjectAssembler::serialize_partial(
///     &mut sink,
///     &sample,
///     &[field_id!(Sample, c), field_id!(Sample, a)],
/// )
/// .unwrap();
///
/// let names: Vec<_> = sink.names().collect();
/// assert_eq!(names, ["a", "c"]);
/// ```
pub struct ObjectAssembler<T>(PhantomData<fn() -> T>);

impl<T: Structure> ObjectAssembler<T> {
    /// Writes every member in declaration order.
    pub fn serialize(sink: &mut dyn StructSerializer, value: &T) -> Result<(), AssembleError> {
        for member in T::descriptors()?.iter() {
            member.serialize(sink, value)?;
        }
        Ok(())
    }

    /// Appends `value` to an array as one struct.
    pub fn serialize_positional(
        sink: &mut dyn ArraySerializer,
        value: &T,
    ) -> Result<(), AssembleError> {
        let child = sink.serialize_struct()?;
        Self::serialize(child, value)
    }

    /// Writes `value` as a nested struct under `name`.
    pub fn serialize_named(
        sink: &mut dyn StructSerializer,
        name: &str,
        value: &T,
    ) -> Result<(), AssembleError> {
        let child = sink.serialize_struct(name)?;
        Self::serialize(child, value)
    }

    /// Reads every member in declaration order.
    pub fn deserialize(
        source: &mut dyn StructDeserializer,
        value: &mut T,
    ) -> Result<(), AssembleError> {
        for member in T::descriptors()?.iter() {
            member.deserialize(source, value)?;
        }
        Ok(())
    }

    /// Reads one struct at the array cursor.
    pub fn deserialize_positional(
        source: &mut dyn ArrayDeserializer,
        value: &mut T,
    ) -> Result<(), AssembleError> {
        let child = source.deserialize_struct()?;
        Self::deserialize(child, value)
    }

    /// Reads the nested struct `name`.
    pub fn deserialize_named(
        source: &mut dyn StructDeserializer,
        name: &str,
        value: &mut T,
    ) -> Result<(), AssembleError> {
        let child = source.deserialize_struct(name)?;
        Self::deserialize(child, value)
    }

    /// Writes only the members declared for `fields`, in declaration order.
    ///
    /// Fails with a lookup error, before anything is written, if a field is
    /// not declared for `T`.
    pub fn serialize_partial(
        sink: &mut dyn StructSerializer,
        value: &T,
        fields: &[FieldId<T>],
    ) -> Result<(), AssembleError> {
        let descriptors = T::descriptors()?;
        for index in Self::select(descriptors, fields)? {
            descriptors.at(index).serialize(sink, value)?;
        }
        Ok(())
    }

    /// Reads only the members declared for `fields`, in declaration order.
    ///
    /// Fails with a lookup error, before anything is read, if a field is not
    /// declared for `T`.
    pub fn deserialize_partial(
        source: &mut dyn StructDeserializer,
        value: &mut T,
        fields: &[FieldId<T>],
    ) -> Result<(), AssembleError> {
        let descriptors = T::descriptors()?;
        for index in Self::select(descriptors, fields)? {
            descriptors.at(index).deserialize(source, value)?;
        }
        Ok(())
    }

    fn select(
        descriptors: &Descriptors<T>,
        fields: &[FieldId<T>],
    ) -> Result<Vec<usize>, AssembleError> {
        let mut selected = fields
            .iter()
            .map(|field| {
                descriptors.position_of(field.erase()).ok_or_else(|| {
                    AssembleError::lookup(format!(
                        "no member of `{}` is declared for the field at offset {}",
                        T::type_name(),
                        field.erase().offset(),
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        selected.sort_unstable();
        selected.dedup();
        Ok(selected)
    }

    /// Renders the documentation graph of `T`, rooted at its type name.
    pub fn graph() -> Result<String, AssembleError> {
        Self::graph_named(T::type_name())
    }

    /// Renders the documentation graph of `T`, rooted at `node`.
    pub fn graph_named(node: &str) -> Result<String, AssembleError> {
        let mut graph = Graph::new();
        Self::graph_into(&mut graph, node)?;
        Ok(graph.render(node))
    }

    /// Labels `node` with the type name of `T` and adds its members below.
    ///
    /// A type already being described further up is labelled but not
    /// expanded again.
    pub fn graph_into(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
        if !graph.enter::<T>() {
            graph.node(node, &format!("{} (recursive)", T::type_name()));
            return Ok(());
        }
        graph.node(node, T::type_name());
        let result = Self::graph_each(graph, node);
        graph.leave();
        result
    }

    /// Adds the members of `T` below `node` without labelling it.
    ///
    /// Used by flattened structures.
    pub fn graph_members(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
        if !graph.enter::<T>() {
            return Ok(());
        }
        let result = Self::graph_each(graph, node);
        graph.leave();
        result
    }

    fn graph_each(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
        for member in T::descriptors()?.iter() {
            member.graph(graph, node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{Descriptors, ObjectAssembler, Structure};
    use crate::error::ErrorKind;
    use crate::tree::{Node, StructNode};
    use crate::{Assemble, field_id};

    #[derive(Debug, Default, Clone, PartialEq, Assemble)]
    struct Inner {
        id: u32,
        label: String,
    }

    #[derive(Debug, Default, Clone, PartialEq, Assemble)]
    struct Outer {
        name: String,
        inner: Inner,
        items: Vec<Inner>,
        ratio: f64,
    }

    fn sample() -> Outer {
        Outer {
            name: "outer".into(),
            inner: Inner {
                id: 1,
                label: "one".into(),
            },
            items: vec![
                Inner {
                    id: 2,
                    label: "two".into(),
                },
                Inner {
                    id: 3,
                    label: "three".into(),
                },
            ],
            ratio: 0.5,
        }
    }

    #[test]
    fn nested_round_trip() {
        let value = sample();
        let mut sink = StructNode::new();
        ObjectAssembler::serialize(&mut sink, &value).unwrap();

        let mut back = Outer::default();
        ObjectAssembler::deserialize(&mut sink, &mut back).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn members_are_written_in_declaration_order() {
        let mut sink = StructNode::new();
        ObjectAssembler::serialize(&mut sink, &sample()).unwrap();
        let names: Vec<_> = sink.names().collect();
        assert_eq!(names, ["name", "inner", "items", "ratio"]);
    }

    #[test]
    fn nested_failure_reports_location() {
        let mut sink = StructNode::new();
        ObjectAssembler::serialize(&mut sink, &sample()).unwrap();

        // items[1].id = "x"
        let Some(Node::Array(items)) = sink.get_mut("items") else {
            panic!("items is not an array");
        };
        let Some(Node::Struct(second)) = items.get_mut(1) else {
            panic!("items[1] is not a struct");
        };
        second.insert("id", Node::Str("x".into()));

        let mut back = Outer::default();
        let err = ObjectAssembler::deserialize(&mut sink, &mut back).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
        assert_eq!(err.path().to_string(), "items[1].id");
    }

    #[test]
    fn missing_required_field_is_structural() {
        let mut source = StructNode::new();
        source.insert("id", Node::UInt(4));

        let mut back = Inner::default();
        let err = ObjectAssembler::deserialize(&mut source, &mut back).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Structural(_)));
        assert_eq!(err.path().to_string(), "label");
    }

    #[test]
    fn positional_struct() {
        let mut sink = crate::tree::ArrayNode::new();
        ObjectAssembler::serialize_positional(&mut sink, &sample().inner).unwrap();
        assert_eq!(sink.len(), 1);

        let mut back = Inner::default();
        ObjectAssembler::deserialize_positional(&mut sink, &mut back).unwrap();
        assert_eq!(back, sample().inner);
    }

    #[derive(Debug, Default, PartialEq, Assemble)]
    struct Abc {
        a: i32,
        b: i32,
        c: i32,
    }

    #[test]
    fn partial_selects_subset_in_declared_order() {
        let value = Abc { a: 1, b: 2, c: 3 };
        let mut sink = StructNode::new();
        ObjectAssembler::serialize_partial(
            &mut sink,
            &value,
            &[field_id!(Abc, c), field_id!(Abc, a)],
        )
        .unwrap();

        let names: Vec<_> = sink.names().collect();
        assert_eq!(names, ["a", "c"]);

        let mut back = Abc::default();
        ObjectAssembler::deserialize_partial(&mut sink, &mut back, &[field_id!(Abc, c)])
            .unwrap();
        assert_eq!(back, Abc { a: 0, b: 0, c: 3 });
    }

    #[test]
    fn partial_rejects_undeclared_fields() {
        // Same type as `a`, but no member lives at this offset.
        let foreign = crate::member::FieldId::<Abc>::of(64, "a", |abc: &Abc| &abc.a);

        let mut sink = StructNode::new();
        let err = ObjectAssembler::serialize_partial(
            &mut sink,
            &Abc::default(),
            &[field_id!(Abc, a), foreign],
        )
        .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Lookup(_)));
        assert!(sink.is_empty());
    }

    struct Twice {
        x: i32,
    }

    impl Structure for Twice {
        fn descriptors() -> Result<&'static Descriptors<Self>, crate::AssembleError> {
            static CELL: super::DescriptorCell<Descriptors<Twice>> = super::DescriptorCell::new();
            CELL.get_or_build(|| {
                Descriptors::<Self>::builder()
                    .field("x", field_id!(Twice, x), |t| &t.x, |t| &mut t.x)
                    .field("x", field_id!(Twice, x), |t| &t.x, |t| &mut t.x)
                    .build()
            })
        }
    }

    struct SameField {
        x: i32,
    }

    impl Structure for SameField {
        fn descriptors() -> Result<&'static Descriptors<Self>, crate::AssembleError> {
            static CELL: super::DescriptorCell<Descriptors<SameField>> =
                super::DescriptorCell::new();
            CELL.get_or_build(|| {
                Descriptors::<Self>::builder()
                    .field("x", field_id!(SameField, x), |t| &t.x, |t| &mut t.x)
                    .field("y", field_id!(SameField, x), |t| &t.x, |t| &mut t.x)
                    .build()
            })
        }
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        let err = Twice::descriptors().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Declaration(_)));
        // The stored failure is reported again.
        assert_eq!(Twice::descriptors().unwrap_err(), err);

        let err = SameField::descriptors().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Declaration(_)));

        let mut sink = StructNode::new();
        assert!(ObjectAssembler::serialize(&mut sink, &Twice { x: 1 }).is_err());
        assert!(ObjectAssembler::serialize(&mut sink, &SameField { x: 1 }).is_err());
    }

    #[test]
    fn lookup_by_name_and_identity() {
        let descriptors = Abc::descriptors().unwrap();
        assert_eq!(descriptors.len(), 3);

        let b = descriptors.get("b").unwrap();
        assert_eq!(b.field_id(), field_id!(Abc, b).erase());
        assert_eq!(descriptors.position(b), Some(1));

        let found = descriptors.find(&field_id!(Abc, c)).unwrap();
        assert_eq!(found.name(), "c");
        assert!(found.identity_equals(descriptors.get("c").unwrap()));
        assert!(!found.identity_equals(b));
    }

    #[test]
    fn graph_lists_members() {
        let dot = ObjectAssembler::<Outer>::graph().unwrap();
        assert!(dot.starts_with("digraph \"Outer\" {"));
        assert!(dot.contains("\"Outer\" [label=\"Outer: Outer\"];"));
        assert!(dot.contains("\"Outer.inner.id\" [label=\"id: uint64\"];"));
        assert!(dot.contains("\"Outer.items[]\" [label=\"items[]: Inner\"];"));
        assert!(dot.contains("\"Outer.items\" -> \"Outer.items[]\";"));
        assert!(dot.contains("\"Outer.ratio\" [label=\"ratio: double\"];"));
    }
}
