use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::AssembleError;
use crate::value::AnyValue;

// -----------------------------------------------------------------------------
// Node

/// One node of a tree document.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    /// An explicit empty value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    Str(String),
    Struct(StructNode),
    Array(ArrayNode),
}

impl Node {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short description of the node shape, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int64",
            Self::UInt(_) => "uint64",
            Self::Double(_) => "double",
            Self::Str(_) => "string",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
        }
    }

    #[inline]
    pub fn as_struct(&self) -> Option<&StructNode> {
        match self {
            Self::Struct(node) => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Self::Array(node) => Some(node),
            _ => None,
        }
    }

    /// Converts a primitive node into the canonical value handed to the
    /// assembler. `Null` becomes an empty value.
    pub(super) fn to_value(&self) -> Result<AnyValue, AssembleError> {
        Ok(match self {
            Self::Null => AnyValue::none(),
            Self::Bool(v) => AnyValue::new(*v),
            Self::Int(v) => AnyValue::new(*v),
            Self::UInt(v) => AnyValue::new(*v),
            Self::Double(v) => AnyValue::new(*v),
            Self::Str(v) => AnyValue::new(v.clone()),
            Self::Struct(_) | Self::Array(_) => {
                return Err(AssembleError::structural(format!(
                    "expected a value, found {}",
                    self.kind_name()
                )));
            }
        })
    }
}

impl From<StructNode> for Node {
    #[inline]
    fn from(value: StructNode) -> Self {
        Self::Struct(value)
    }
}

impl From<ArrayNode> for Node {
    #[inline]
    fn from(value: ArrayNode) -> Self {
        Self::Array(value)
    }
}

// -----------------------------------------------------------------------------
// StructNode

/// Named nodes in insertion order.
///
/// Writing a name that already exists replaces the node in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructNode {
    fields: Vec<(String, Node)>,
}

impl StructNode {
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Node)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    /// Sets `name` to `node`, returning the replaced node.
    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => Some(core::mem::replace(slot, node)),
            None => {
                self.fields.push((name, node));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(index).1)
    }

    /// Sets `name` to `node` and returns the stored node.
    pub(super) fn put(&mut self, name: &str, node: Node) -> &mut Node {
        let index = match self.fields.iter().position(|(n, _)| n == name) {
            Some(index) => {
                self.fields[index].1 = node;
                index
            }
            None => {
                self.fields.push((name.into(), node));
                self.fields.len() - 1
            }
        };
        &mut self.fields[index].1
    }
}

// -----------------------------------------------------------------------------
// ArrayNode

/// Positional nodes plus a read cursor.
///
/// Writing appends; reading consumes from the cursor. The cursor is not part
/// of the document: it is ignored by comparisons and encodings, and reset
/// whenever the array is opened by its parent.
#[derive(Debug, Clone, Default)]
pub struct ArrayNode {
    items: Vec<Node>,
    cursor: usize,
}

impl ArrayNode {
    #[inline]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Node> {
        self.items.iter()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.items.get_mut(index)
    }

    #[inline]
    pub fn push(&mut self, node: Node) {
        self.items.push(node);
    }

    /// Moves the read cursor back to the first element.
    #[inline]
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub(super) fn push_node(&mut self, node: Node) -> &mut Node {
        self.items.push(node);
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub(super) fn cursor(&self) -> usize {
        self.cursor
    }

    // Returns the node at the cursor and advances past it.
    pub(super) fn next_node(&mut self) -> Result<&mut Node, AssembleError> {
        let index = self.cursor;
        if index >= self.items.len() {
            return Err(AssembleError::structural(format!(
                "array has {} elements, no element at index {index}",
                self.items.len()
            )));
        }
        self.cursor += 1;
        Ok(&mut self.items[index])
    }
}

impl PartialEq for ArrayNode {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl From<Vec<Node>> for ArrayNode {
    #[inline]
    fn from(items: Vec<Node>) -> Self {
        Self { items, cursor: 0 }
    }
}

impl FromIterator<Node> for ArrayNode {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
