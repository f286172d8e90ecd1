//! An in-memory tree document implementing every sink and source role.
//!
//! [`StructNode`] is a struct-shaped sink and source, [`ArrayNode`] an
//! array-shaped one. Nested handles are the child nodes themselves, owned
//! by their parent.
//!
//! The tree is encodable through any serde format; [`StructSerializer::dump`]
//! and [`StructDeserializer::set_raw_input`] use JSON. JSON has no form for
//! NaN or infinite doubles, so `dump` fails on them.
//!
//! ```
//! use vc_assembler::de::StructDeserializer;
//! use vc_assembler::ser::StructSerializer;
//! use vc_assembler::tree::StructNode;
//! use vc_assembler::{Assemble, ObjectAssembler};
//!
//! #[derive(Debug, Default, PartialEq, Assemble)]
//! struct Window {
//!     title: String,
//!     size: (u32, u32),
//!     maximized: Option<bool>,
//! }
//!
//! let window = Window { title: "main".into(), size: (800, 600), maximized: None };
//!
//! let mut sink = StructNode::new();
//! ObjectAssembler::serialize(&mut sink, &window).unwrap();
//! let text = sink.dump().unwrap();
//!
//! let mut source = StructNode::new();
//! source.set_raw_input(&text).unwrap();
//! let mut back = Window::default();
//! ObjectAssembler::deserialize(&mut source, &mut back).unwrap();
//! assert_eq!(back, window);
//! ```
//!
//! [`StructSerializer::dump`]: crate::ser::StructSerializer::dump
//! [`StructDeserializer::set_raw_input`]: crate::de::StructDeserializer::set_raw_input

// -----------------------------------------------------------------------------
// Modules

mod de;
mod node;
mod ser;
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use node::{ArrayNode, Node, StructNode};
