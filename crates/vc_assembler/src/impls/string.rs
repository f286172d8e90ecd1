use alloc::string::String;

use crate::assembler::{Assembler, MapKey};
use crate::de::{ArrayDeserializer, StructDeserializer};
use crate::error::AssembleError;
use crate::graph::Graph;
use crate::ser::{ArraySerializer, StructSerializer};

impl Assembler for String {
    #[inline]
    fn serialize_named(
        &self,
        sink: &mut dyn StructSerializer,
        name: &str,
    ) -> Result<(), AssembleError> {
        sink.serialize_str(name, self)
    }

    #[inline]
    fn serialize_positional(&self, sink: &mut dyn ArraySerializer) -> Result<(), AssembleError> {
        sink.serialize_str(self)
    }

    fn deserialize_named(
        &mut self,
        source: &mut dyn StructDeserializer,
        name: &str,
    ) -> Result<(), AssembleError> {
        *self = source.value(name)?.take::<String>()?;
        Ok(())
    }

    fn deserialize_positional(
        &mut self,
        source: &mut dyn ArrayDeserializer,
    ) -> Result<(), AssembleError> {
        *self = source.value()?.take::<String>()?;
        Ok(())
    }

    #[inline]
    fn graph(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
        graph.node(node, "string");
        Ok(())
    }
}

impl MapKey for String {
    const FIELD_NAME_KEYS: bool = true;

    #[inline]
    fn as_field_name(&self) -> Option<&str> {
        Some(self)
    }

    #[inline]
    fn from_field_name(name: &str) -> Option<Self> {
        Some(name.into())
    }
}
