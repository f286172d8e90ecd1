use alloc::string::String;

use super::{ArrayNode, Node, StructNode};
use crate::error::AssembleError;
use crate::ser::{ArraySerializer, StructSerializer};

fn shape_error(expected: &str) -> AssembleError {
    AssembleError::format(alloc::format!("freshly written node is not {expected}"))
}

/// `serde_json` writes non-finite doubles as `null`, which reads back as an
/// empty value.
fn ensure_finite(node: &Node) -> Result<(), AssembleError> {
    match node {
        Node::Double(value) if !value.is_finite() => Err(AssembleError::format(
            alloc::format!("{value} has no JSON representation"),
        )),
        Node::Struct(child) => child.iter().try_for_each(|(name, node)| {
            ensure_finite(node).map_err(|e| e.in_field(String::from(name)))
        }),
        Node::Array(child) => child
            .iter()
            .enumerate()
            .try_for_each(|(index, node)| ensure_finite(node).map_err(|e| e.at_index(index))),
        _ => Ok(()),
    }
}

impl StructSerializer for StructNode {
    fn serialize_bool(&mut self, name: &str, value: bool) -> Result<(), AssembleError> {
        self.put(name, Node::Bool(value));
        Ok(())
    }

    fn serialize_i64(&mut self, name: &str, value: i64) -> Result<(), AssembleError> {
        self.put(name, Node::Int(value));
        Ok(())
    }

    fn serialize_u64(&mut self, name: &str, value: u64) -> Result<(), AssembleError> {
        self.put(name, Node::UInt(value));
        Ok(())
    }

    fn serialize_f64(&mut self, name: &str, value: f64) -> Result<(), AssembleError> {
        self.put(name, Node::Double(value));
        Ok(())
    }

    fn serialize_str(&mut self, name: &str, value: &str) -> Result<(), AssembleError> {
        self.put(name, Node::Str(value.into()));
        Ok(())
    }

    fn serialize_struct(&mut self, name: &str) -> Result<&mut dyn StructSerializer, AssembleError> {
        match self.put(name, Node::Struct(StructNode::new())) {
            Node::Struct(child) => Ok(child),
            _ => Err(shape_error("a struct")),
        }
    }

    fn serialize_array(&mut self, name: &str) -> Result<&mut dyn ArraySerializer, AssembleError> {
        match self.put(name, Node::Array(ArrayNode::new())) {
            Node::Array(child) => Ok(child),
            _ => Err(shape_error("an array")),
        }
    }

    fn dump(&self) -> Result<String, AssembleError> {
        self.iter().try_for_each(|(name, node)| {
            ensure_finite(node).map_err(|e| e.in_field(String::from(name)))
        })?;
        serde_json::to_string_pretty(self).map_err(|e| AssembleError::format(alloc::format!("{e}")))
    }
}

impl ArraySerializer for ArrayNode {
    fn serialize_bool(&mut self, value: bool) -> Result<(), AssembleError> {
        self.push(Node::Bool(value));
        Ok(())
    }

    fn serialize_i64(&mut self, value: i64) -> Result<(), AssembleError> {
        self.push(Node::Int(value));
        Ok(())
    }

    fn serialize_u64(&mut self, value: u64) -> Result<(), AssembleError> {
        self.push(Node::UInt(value));
        Ok(())
    }

    fn serialize_f64(&mut self, value: f64) -> Result<(), AssembleError> {
        self.push(Node::Double(value));
        Ok(())
    }

    fn serialize_str(&mut self, value: &str) -> Result<(), AssembleError> {
        self.push(Node::Str(value.into()));
        Ok(())
    }

    fn serialize_empty(&mut self) -> Result<(), AssembleError> {
        self.push(Node::Null);
        Ok(())
    }

    fn serialize_struct(&mut self) -> Result<&mut dyn StructSerializer, AssembleError> {
        match self.push_node(Node::Struct(StructNode::new())) {
            Node::Struct(child) => Ok(child),
            _ => Err(shape_error("a struct")),
        }
    }

    fn serialize_array(&mut self) -> Result<&mut dyn ArraySerializer, AssembleError> {
        match self.push_node(Node::Array(ArrayNode::new())) {
            Node::Array(child) => Ok(child),
            _ => Err(shape_error("an array")),
        }
    }
}
