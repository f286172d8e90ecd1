//! Object assembly and typed settings.
//!
//! - [`assembler`]: describes how values of a type are written to and read
//!   from documents, with derives for structures and enumerations.
//! - [`settings`]: a registry of named values persisted through assemblers.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use vc_assembler as assembler;
pub use vc_settings as settings;
