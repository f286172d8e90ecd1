//! Source interfaces implemented by concrete formats.
//!
//! Primitive reads hand over an [`AnyValue`] holding one of the canonical
//! types (`bool`, `i64`, `u64`, `f64` or `String`); narrowing to the target
//! type is done by the assembler.
//!
//! As with the sinks, nested handles are owned by the parent source.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::AssembleError;
use crate::value::AnyValue;

/// A struct-shaped source.
pub trait StructDeserializer {
    /// Returns `true` if a node named `name` is present.
    fn value_exists(&self, name: &str) -> bool;

    /// Names of all nodes present at this level, in document order.
    ///
    /// Drives string-keyed map reconstruction and lets callers ignore
    /// unknown names or tolerate missing ones.
    fn available_names(&self) -> Vec<String>;

    /// Reads the primitive node `name`.
    fn value(&mut self, name: &str) -> Result<AnyValue, AssembleError>;

    /// Opens the nested struct `name`.
    fn deserialize_struct(&mut self, name: &str)
    -> Result<&mut dyn StructDeserializer, AssembleError>;

    /// Opens the nested array `name`.
    fn deserialize_array(&mut self, name: &str) -> Result<&mut dyn ArrayDeserializer, AssembleError>;

    /// Seeds the source from input text.
    ///
    /// Only meaningful on the root source.
    fn set_raw_input(&mut self, input: &str) -> Result<(), AssembleError>;
}

/// An array-shaped source with a read cursor.
///
/// Every positional read (`value`, `skip`, `deserialize_struct` and
/// `deserialize_array`) consumes one slot.
pub trait ArrayDeserializer {
    /// Reads the primitive at the cursor.
    fn value(&mut self) -> Result<AnyValue, AssembleError>;

    /// Position of the cursor.
    fn index(&self) -> usize;

    /// Returns `true` when every slot has been consumed.
    fn is_complete(&self) -> bool;

    /// Returns `true` if the slot at the cursor exists and is not empty.
    ///
    /// Does not move the cursor.
    fn next_value_exists(&self) -> bool;

    /// Consumes one slot without decoding it.
    fn skip(&mut self) -> Result<(), AssembleError>;

    /// Opens the struct at the cursor.
    fn deserialize_struct(&mut self) -> Result<&mut dyn StructDeserializer, AssembleError>;

    /// Opens the array at the cursor.
    fn deserialize_array(&mut self) -> Result<&mut dyn ArrayDeserializer, AssembleError>;
}
