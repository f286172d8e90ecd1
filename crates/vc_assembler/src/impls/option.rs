//! Optional values.
//!
//! Optionals are the one lenient category: a malformed inner value turns
//! into `None` instead of failing the whole document. Declaration errors
//! still propagate, they are not caused by the input.

use crate::assembler::Assembler;
use crate::de::{ArrayDeserializer, StructDeserializer};
use crate::error::AssembleError;
use crate::graph::Graph;
use crate::ser::{ArraySerializer, StructSerializer};

fn absorb<T>(error: AssembleError) -> Result<Option<T>, AssembleError> {
    if error.is_absorbable() {
        log::debug!(
            "optional `{}` reset to none: {error}",
            core::any::type_name::<T>()
        );
        Ok(None)
    } else {
        Err(error)
    }
}

impl<T: Assembler + Default> Assembler for Option<T> {
    /// An absent value is omitted.
    fn serialize_named(
        &self,
        sink: &mut dyn StructSerializer,
        name: &str,
    ) -> Result<(), AssembleError> {
        match self {
            Some(value) => value.serialize_named(sink, name),
            None => Ok(()),
        }
    }

    /// An absent value is written as an explicit empty slot.
    fn serialize_positional(&self, sink: &mut dyn ArraySerializer) -> Result<(), AssembleError> {
        match self {
            Some(value) => value.serialize_positional(sink),
            None => sink.serialize_empty(),
        }
    }

    fn deserialize_named(
        &mut self,
        source: &mut dyn StructDeserializer,
        name: &str,
    ) -> Result<(), AssembleError> {
        if !source.value_exists(name) {
            *self = None;
            return Ok(());
        }

        let mut value = T::default();
        *self = match value.deserialize_named(source, name) {
            Ok(()) => Some(value),
            Err(error) => absorb::<T>(error)?,
        };
        Ok(())
    }

    fn deserialize_positional(
        &mut self,
        source: &mut dyn ArrayDeserializer,
    ) -> Result<(), AssembleError> {
        if source.is_complete() {
            *self = None;
            return Ok(());
        }
        if !source.next_value_exists() {
            *self = None;
            return source.skip();
        }

        let start = source.index();
        let mut value = T::default();
        *self = match value.deserialize_positional(source) {
            Ok(()) => Some(value),
            Err(error) => {
                let absorbed = absorb::<T>(error)?;
                // The failing read may not have consumed its slot.
                if source.index() == start && !source.is_complete() {
                    source.skip()?;
                }
                absorbed
            }
        };
        Ok(())
    }

    fn graph(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
        graph.node(node, "optional");
        let inner = graph.child(node, "?");
        T::graph(graph, &inner)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::assembler::Assembler;
    use crate::de::ArrayDeserializer;
    use crate::tree::{ArrayNode, Node, StructNode};

    #[test]
    fn absent_is_omitted_in_structs() {
        let mut sink = StructNode::new();
        None::<i32>.serialize_named(&mut sink, "oi").unwrap();
        Some(3_i32).serialize_named(&mut sink, "some").unwrap();
        assert!(sink.get("oi").is_none());
        assert_eq!(sink.get("some"), Some(&Node::Int(3)));
    }

    #[test]
    fn malformed_value_becomes_none() {
        let mut source = StructNode::new();
        source.insert("oi", Node::Str("notanumber".into()));

        let mut value = Some(9_i32);
        value.deserialize_named(&mut source, "oi").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn out_of_range_becomes_none() {
        let mut source = StructNode::new();
        source.insert("small", Node::Int(1000));

        let mut value = Some(1_u8);
        value.deserialize_named(&mut source, "small").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn missing_and_null_are_none() {
        let mut source = StructNode::new();
        source.insert("null", Node::Null);

        let mut value = Some(String::from("x"));
        value.deserialize_named(&mut source, "missing").unwrap();
        assert_eq!(value, None);

        value = Some(String::from("x"));
        value.deserialize_named(&mut source, "null").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn array_context_marks_and_skips_empty_slots() {
        let values: Vec<Option<i64>> = vec![Some(1), None, Some(3)];
        let mut array = ArrayNode::new();
        for value in &values {
            value.serialize_positional(&mut array).unwrap();
        }
        assert_eq!(array.get(1), Some(&Node::Null));

        let mut back: Vec<Option<i64>> = Vec::new();
        while !array.is_complete() {
            let mut value = Some(0);
            value.deserialize_positional(&mut array).unwrap();
            back.push(value);
        }
        assert_eq!(back, values);
    }

    #[test]
    fn array_context_skips_malformed_slot() {
        let mut array = ArrayNode::new();
        array.push(Node::Str("bad".into()));
        array.push(Node::Int(5));

        let mut first = Some(1_i32);
        first.deserialize_positional(&mut array).unwrap();
        assert_eq!(first, None);
        assert_eq!(array.index(), 1);

        let mut second = None::<i32>;
        second.deserialize_positional(&mut array).unwrap();
        assert_eq!(second, Some(5));
    }
}
