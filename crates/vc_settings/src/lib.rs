//! A typed settings registry built on `vc_assembler`.
//!
//! A [`Settings`] maps names to values of any type implementing
//! [`Assembler`](vc_assembler::Assembler). Each entry carries the assembler
//! of its type, so the whole registry can be written to and read from any
//! document format, and rendered as a documentation graph.
//!
//! ## Menu
//!
//! - [`Settings`]: an owned registry.
//! - [`SettingsConfig`]: optional backing file and its [`SettingsFormat`].
//! - [`SettingsMap`]: the entries as one assembled document.
//! - [`Entry`], [`ErasedAssembler`]: a declared value and its capability.
//! - [`global`], [`install_global`]: the process-wide registry.
//! - `global_setting!`: declares a type in the process-wide registry
//!   (feature `auto_register`).
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod config;
mod entry;
mod error;
mod global;
mod map;
mod settings;

// -----------------------------------------------------------------------------
// Exports

pub use config::{SettingsConfig, SettingsFormat};
pub use entry::{Entry, ErasedAssembler, Setting, TypedAssembler};
pub use error::SettingsError;
pub use global::{global, install_global};
pub use map::SettingsMap;
pub use settings::Settings;

#[cfg(feature = "auto_register")]
pub use global::auto_register::GlobalSetting;

#[doc(hidden)]
#[cfg(feature = "auto_register")]
pub mod __macro_exports {
    pub use inventory;
}
