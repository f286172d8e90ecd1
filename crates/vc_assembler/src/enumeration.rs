//! Enums as symbolic names.
//!
//! An [`EnumTable`] is a bijection between names and enumerator values.
//! Serialization writes the name of the current value; deserialization reads
//! a name and assigns the mapped value.
//!
//! Tables are usually declared with `#[derive(AssembleEnum)]`, which also
//! implements [`Assembler`](crate::Assembler) through the helpers below.
//!
//! ```
//! use vc_assembler::enumeration::Enumeration;
//! use vc_assembler::AssembleEnum;
//!
//! #[derive(Debug, Default, Clone, PartialEq, AssembleEnum)]
//! enum Level {
//!     #[default]
//!     Low,
//!     #[assemble(rename = "max")]
//!     High,
//! }
//!
//! let table = Level::table().unwrap();
//! assert_eq!(table.name_of(&Level::High), Some("max"));
//! assert_eq!(table.value_of("Low"), Some(&Level::Low));
//! ```

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::de::{ArrayDeserializer, StructDeserializer};
use crate::error::AssembleError;
use crate::graph::Graph;
use crate::ser::{ArraySerializer, StructSerializer};

// -----------------------------------------------------------------------------
// Enumeration

/// Enums with a static name table.
pub trait Enumeration: Clone + PartialEq + Send + Sync + 'static {
    fn table() -> Result<&'static EnumTable<Self>, AssembleError>;

    /// Label used in documentation graphs.
    fn type_name() -> &'static str {
        core::any::type_name::<Self>()
    }
}

// -----------------------------------------------------------------------------
// EnumTable

/// Bijection between enumerator names and values, in declaration order.
pub struct EnumTable<E> {
    entries: Vec<(Cow<'static, str>, E)>,
    by_name: HashMap<Cow<'static, str>, usize, FixedState>,
}

impl<E: PartialEq> EnumTable<E> {
    /// Starts a new declaration.
    #[inline]
    pub fn builder() -> EnumTableBuilder<E> {
        EnumTableBuilder {
            entries: Vec::new(),
            by_name: HashMap::with_hasher(FixedState::with_seed(0)),
            error: None,
        }
    }

    /// Name mapped to `value`.
    pub fn name_of(&self, value: &E) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| v == value)
            .map(|(name, _)| &**name)
    }

    /// Value mapped to `name`.
    pub fn value_of(&self, name: &str) -> Option<&E> {
        self.by_name.get(name).map(|&idx| &self.entries[idx].1)
    }

    /// Names in declaration order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(name, _)| &**name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: fmt::Debug> fmt::Debug for EnumTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, value)| (&**name, value)))
            .finish()
    }
}

/// Builds an [`EnumTable`].
///
/// Duplicate names and duplicate values are declaration errors, reported by
/// [`EnumTableBuilder::build`] together with empty tables.
pub struct EnumTableBuilder<E> {
    entries: Vec<(Cow<'static, str>, E)>,
    by_name: HashMap<Cow<'static, str>, usize, FixedState>,
    error: Option<AssembleError>,
}

impl<E: PartialEq> EnumTableBuilder<E> {
    /// Maps `name` to `value`.
    #[must_use]
    pub fn value(mut self, name: impl Into<Cow<'static, str>>, value: E) -> Self {
        if self.error.is_some() {
            return self;
        }

        let name = name.into();
        let owner = core::any::type_name::<E>();
        if self.by_name.contains_key(&*name) {
            self.error = Some(AssembleError::declaration(format!(
                "enumerator name `{name}` of `{owner}` is declared twice"
            )));
            return self;
        }
        if let Some((other, _)) = self.entries.iter().find(|(_, v)| *v == value) {
            self.error = Some(AssembleError::declaration(format!(
                "enumerator names `{other}` and `{name}` of `{owner}` map the same value"
            )));
            return self;
        }

        self.by_name.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        self
    }

    /// Finishes the declaration.
    pub fn build(self) -> Result<EnumTable<E>, AssembleError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.entries.is_empty() {
            return Err(AssembleError::declaration(format!(
                "enum `{}` declares no enumerators",
                core::any::type_name::<E>()
            )));
        }
        Ok(EnumTable {
            entries: self.entries,
            by_name: self.by_name,
        })
    }
}

// -----------------------------------------------------------------------------
// Assembler helpers

fn name_for<E: Enumeration>(value: &E) -> Result<&'static str, AssembleError> {
    E::table()?.name_of(value).ok_or_else(|| {
        AssembleError::lookup(format!(
            "value of `{}` has no mapped name",
            E::type_name()
        ))
    })
}

fn value_for<E: Enumeration>(name: &str) -> Result<E, AssembleError> {
    E::table()?.value_of(name).cloned().ok_or_else(|| {
        AssembleError::structural(format!(
            "unknown enumerator `{name}` for `{}`",
            E::type_name()
        ))
    })
}

#[inline]
pub fn serialize_named<E: Enumeration>(
    value: &E,
    sink: &mut dyn StructSerializer,
    name: &str,
) -> Result<(), AssembleError> {
    sink.serialize_str(name, name_for(value)?)
}

#[inline]
pub fn serialize_positional<E: Enumeration>(
    value: &E,
    sink: &mut dyn ArraySerializer,
) -> Result<(), AssembleError> {
    sink.serialize_str(name_for(value)?)
}

pub fn deserialize_named<E: Enumeration>(
    value: &mut E,
    source: &mut dyn StructDeserializer,
    name: &str,
) -> Result<(), AssembleError> {
    let text = source.value(name)?.take::<String>()?;
    *value = value_for(&text)?;
    Ok(())
}

pub fn deserialize_positional<E: Enumeration>(
    value: &mut E,
    source: &mut dyn ArrayDeserializer,
) -> Result<(), AssembleError> {
    let text = source.value()?.take::<String>()?;
    *value = value_for(&text)?;
    Ok(())
}

/// Labels `node` with the enum name and its enumerators.
pub fn graph<E: Enumeration>(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
    let names = E::table()?.names().collect::<Vec<_>>();
    graph.node(node, &format!("{} {{{}}}", E::type_name(), names.join(" | ")));
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{EnumTable, Enumeration};
    use crate::assembler::Assembler;
    use crate::error::ErrorKind;
    use crate::graph::Graph;
    use crate::tree::{Node, StructNode};
    use crate::AssembleEnum;

    #[derive(Debug, Default, Clone, PartialEq, AssembleEnum)]
    enum Sample {
        #[default]
        #[assemble(rename = "enumerator1")]
        First = 0,
        #[assemble(rename = "enumerator2")]
        Second = 1,
        #[assemble(rename = "enumerator3")]
        Third = 2,
    }

    #[test]
    fn value_is_written_as_name() {
        assert_eq!(Sample::Second as i32, 1);

        let mut sink = StructNode::new();
        Sample::Second.serialize_named(&mut sink, "e").unwrap();
        assert_eq!(sink.get("e"), Some(&Node::Str("enumerator2".into())));

        let mut back = Sample::First;
        back.deserialize_named(&mut sink, "e").unwrap();
        assert_eq!(back, Sample::Second);
    }

    #[test]
    fn unknown_name_fails() {
        let mut source = StructNode::new();
        source.insert("e", Node::Str("enumerator9".into()));

        let mut value = Sample::Third;
        let err = value.deserialize_named(&mut source, "e").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Structural(_)));
        assert!(err.to_string().contains("enumerator9"));
        assert_eq!(value, Sample::Third);
    }

    #[test]
    fn table_rejects_duplicates_and_empty() {
        let err = EnumTable::builder()
            .value("a", 1)
            .value("a", 2)
            .build()
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Declaration(_)));

        let err = EnumTable::builder()
            .value("a", 1)
            .value("b", 1)
            .build()
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Declaration(_)));

        let err = EnumTable::<i32>::builder().build().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Declaration(_)));
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Partial {
        Mapped,
        Unmapped,
    }

    impl Enumeration for Partial {
        fn table() -> Result<&'static EnumTable<Self>, crate::AssembleError> {
            static CELL: crate::assembler::DescriptorCell<EnumTable<Partial>> =
                crate::assembler::DescriptorCell::new();
            CELL.get_or_build(|| EnumTable::builder().value("mapped", Partial::Mapped).build())
        }
    }

    #[test]
    fn unmapped_value_is_a_lookup_error() {
        let mut sink = StructNode::new();
        super::serialize_named(&Partial::Mapped, &mut sink, "p").unwrap();
        let err = super::serialize_named(&Partial::Unmapped, &mut sink, "q").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Lookup(_)));
    }

    #[test]
    fn graph_lists_enumerators() {
        let mut graph = Graph::new();
        Sample::graph(&mut graph, "Root.level").unwrap();
        assert!(
            graph
                .render("Root")
                .contains("level: Sample {enumerator1 | enumerator2 | enumerator3}")
        );
    }
}
