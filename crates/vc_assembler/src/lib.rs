//! Declarative serialization, deserialization and documentation of object
//! graphs.
//!
//! Types describe their shape once, through [`Assemble`] or a manual
//! [`Structure`] impl, and are then written to any [`StructSerializer`],
//! read back from any [`StructDeserializer`] and rendered as a graph.
//!
//! ```
//! use vc_assembler::tree::StructNode;
//! use vc_assembler::{Assemble, AssembleEnum, ObjectAssembler};
//!
//! #[derive(Debug, Default, Clone, PartialEq, AssembleEnum)]
//! enum Mode {
//!     #[default]
//!     Windowed,
//!     Fullscreen,
//! }
//!
//! #[derive(Debug, Default, PartialEq, Assemble)]
//! struct Display {
//!     mode: Mode,
//!     #[assemble(rename = "refresh-rate")]
//!     refresh_rate: u32,
//!     monitors: Vec<String>,
//! }
//!
//! let display = Display {
//!     mode: Mode::Fullscreen,
//!     refresh_rate: 144,
//!     monitors: vec!["left".into(), "right".into()],
//! };
//!
//! let mut sink = StructNode::new();
//! ObjectAssembler::serialize(&mut sink, &display).unwrap();
//!
//! let mut back = Display::default();
//! ObjectAssembler::deserialize(&mut sink, &mut back).unwrap();
//! assert_eq!(back, display);
//!
//! let dot = ObjectAssembler::<Display>::graph().unwrap();
//! assert!(dot.contains("\"Display.mode\" [label=\"mode: Mode {Windowed | Fullscreen}\"];"));
//! ```
//!
//! [`StructSerializer`]: crate::ser::StructSerializer
//! [`StructDeserializer`]: crate::de::StructDeserializer
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `vc_assembler` in doc testing.
// But `macro_utils::Manifest` can only choose one, so we must have an
// `extern self` to ensure `vc_assembler` can be used as an alias for `crate`.
extern crate self as vc_assembler;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod impls;

pub mod assembler;
pub mod de;
pub mod enumeration;
pub mod error;
pub mod graph;
pub mod member;
pub mod rules;
pub mod ser;
pub mod tree;
pub mod value;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use assembler::{Assembler, MapKey, ObjectAssembler, Structure};
pub use error::{AssembleError, ErrorKind};
pub use member::FieldId;
pub use value::AnyValue;

pub use vc_assembler_derive::{Assemble, AssembleEnum};
