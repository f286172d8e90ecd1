//! Sink interfaces implemented by concrete formats.
//!
//! A format only has to speak the canonical shapes (see [`rules`]): `bool`,
//! `i64`, `u64`, `f64` and strings, plus nested structs and arrays.
//!
//! Nested handles returned by `serialize_struct` and `serialize_array` are
//! owned by the parent sink; the assembler only borrows them while it fills
//! the child, then returns to the parent.
//!
//! [`rules`]: crate::rules

use alloc::string::String;

use crate::error::AssembleError;

/// A struct-shaped sink: named primitive writes and named nested nodes.
pub trait StructSerializer {
    fn serialize_bool(&mut self, name: &str, value: bool) -> Result<(), AssembleError>;

    fn serialize_i64(&mut self, name: &str, value: i64) -> Result<(), AssembleError>;

    fn serialize_u64(&mut self, name: &str, value: u64) -> Result<(), AssembleError>;

    fn serialize_f64(&mut self, name: &str, value: f64) -> Result<(), AssembleError>;

    fn serialize_str(&mut self, name: &str, value: &str) -> Result<(), AssembleError>;

    /// Opens a nested struct under `name`.
    fn serialize_struct(&mut self, name: &str) -> Result<&mut dyn StructSerializer, AssembleError>;

    /// Opens a nested array under `name`.
    fn serialize_array(&mut self, name: &str) -> Result<&mut dyn ArraySerializer, AssembleError>;

    /// Produces the final serialized text.
    ///
    /// Only meaningful on the root sink.
    fn dump(&self) -> Result<String, AssembleError>;
}

/// An array-shaped sink: positional writes, appended in call order.
pub trait ArraySerializer {
    fn serialize_bool(&mut self, value: bool) -> Result<(), AssembleError>;

    fn serialize_i64(&mut self, value: i64) -> Result<(), AssembleError>;

    fn serialize_u64(&mut self, value: u64) -> Result<(), AssembleError>;

    fn serialize_f64(&mut self, value: f64) -> Result<(), AssembleError>;

    fn serialize_str(&mut self, value: &str) -> Result<(), AssembleError>;

    /// Appends an explicit empty slot, used by absent optionals.
    fn serialize_empty(&mut self) -> Result<(), AssembleError>;

    /// Appends a nested struct.
    fn serialize_struct(&mut self) -> Result<&mut dyn StructSerializer, AssembleError>;

    /// Appends a nested array.
    fn serialize_array(&mut self) -> Result<&mut dyn ArraySerializer, AssembleError>;
}
