use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::{ArrayNode, Node, StructNode};
use crate::de::{ArrayDeserializer, StructDeserializer};
use crate::error::AssembleError;
use crate::value::AnyValue;

fn missing(name: &str) -> AssembleError {
    AssembleError::structural(format!("missing field `{name}`"))
}

fn wrong_shape(expected: &str, found: &Node) -> AssembleError {
    AssembleError::structural(format!("expected {expected}, found {}", found.kind_name()))
}

impl StructDeserializer for StructNode {
    #[inline]
    fn value_exists(&self, name: &str) -> bool {
        self.get(name).is_some_and(|node| !node.is_null())
    }

    fn available_names(&self) -> Vec<String> {
        self.names().map(String::from).collect()
    }

    fn value(&mut self, name: &str) -> Result<AnyValue, AssembleError> {
        self.get(name).ok_or_else(|| missing(name))?.to_value()
    }

    fn deserialize_struct(
        &mut self,
        name: &str,
    ) -> Result<&mut dyn StructDeserializer, AssembleError> {
        match self.get_mut(name) {
            Some(Node::Struct(child)) => Ok(child),
            Some(other) => Err(wrong_shape("a struct", other)),
            None => Err(missing(name)),
        }
    }

    fn deserialize_array(&mut self, name: &str) -> Result<&mut dyn ArrayDeserializer, AssembleError> {
        match self.get_mut(name) {
            Some(Node::Array(child)) => {
                child.rewind();
                Ok(child)
            }
            Some(other) => Err(wrong_shape("an array", other)),
            None => Err(missing(name)),
        }
    }

    fn set_raw_input(&mut self, input: &str) -> Result<(), AssembleError> {
        *self = serde_json::from_str(input)
            .map_err(|e| AssembleError::format(format!("{e}")))?;
        Ok(())
    }
}

impl ArrayDeserializer for ArrayNode {
    fn value(&mut self) -> Result<AnyValue, AssembleError> {
        self.next_node()?.to_value()
    }

    #[inline]
    fn index(&self) -> usize {
        self.cursor()
    }

    #[inline]
    fn is_complete(&self) -> bool {
        self.cursor() >= self.len()
    }

    #[inline]
    fn next_value_exists(&self) -> bool {
        self.get(self.cursor()).is_some_and(|node| !node.is_null())
    }

    fn skip(&mut self) -> Result<(), AssembleError> {
        self.next_node().map(|_| ())
    }

    fn deserialize_struct(&mut self) -> Result<&mut dyn StructDeserializer, AssembleError> {
        match self.next_node()? {
            Node::Struct(child) => Ok(child),
            other => Err(wrong_shape("a struct", other)),
        }
    }

    fn deserialize_array(&mut self) -> Result<&mut dyn ArrayDeserializer, AssembleError> {
        match self.next_node()? {
            Node::Array(child) => {
                child.rewind();
                Ok(child)
            }
            other => Err(wrong_shape("an array", other)),
        }
    }
}
