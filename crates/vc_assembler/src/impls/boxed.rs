use alloc::boxed::Box;

use crate::assembler::{Assembler, MapKey};
use crate::de::{ArrayDeserializer, StructDeserializer};
use crate::error::AssembleError;
use crate::graph::Graph;
use crate::ser::{ArraySerializer, StructSerializer};

/// Transparent: a box is written exactly as its content.
impl<T: Assembler> Assembler for Box<T> {
    #[inline]
    fn serialize_named(
        &self,
        sink: &mut dyn StructSerializer,
        name: &str,
    ) -> Result<(), AssembleError> {
        (**self).serialize_named(sink, name)
    }

    #[inline]
    fn serialize_positional(&self, sink: &mut dyn ArraySerializer) -> Result<(), AssembleError> {
        (**self).serialize_positional(sink)
    }

    #[inline]
    fn deserialize_named(
        &mut self,
        source: &mut dyn StructDeserializer,
        name: &str,
    ) -> Result<(), AssembleError> {
        (**self).deserialize_named(source, name)
    }

    #[inline]
    fn deserialize_positional(
        &mut self,
        source: &mut dyn ArrayDeserializer,
    ) -> Result<(), AssembleError> {
        (**self).deserialize_positional(source)
    }

    #[inline]
    fn graph(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
        T::graph(graph, node)
    }
}

impl<T: MapKey> MapKey for Box<T> {
    const FIELD_NAME_KEYS: bool = T::FIELD_NAME_KEYS;

    #[inline]
    fn as_field_name(&self) -> Option<&str> {
        (**self).as_field_name()
    }

    #[inline]
    fn from_field_name(name: &str) -> Option<Self> {
        T::from_field_name(name).map(Box::new)
    }
}
