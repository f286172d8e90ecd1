use std::io;
use std::path::PathBuf;

use thiserror::Error;
use vc_assembler::AssembleError;
use vc_assembler::value::AnyError;

/// Failure of a settings registry operation.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The name is already bound to a value of another type.
    #[error("setting `{name}` is already declared with type `{existing}`")]
    NameTaken { name: String, existing: &'static str },

    /// The type is already bound to another name.
    #[error("type `{type_name}` is already declared as setting `{existing}`")]
    TypeAlreadyDeclared {
        type_name: &'static str,
        existing: String,
    },

    /// No entry has this name.
    #[error("no setting named `{0}` is declared")]
    NotDeclared(String),

    /// No entry has this type.
    #[error("type `{0}` is not declared as a setting")]
    TypeNotDeclared(&'static str),

    /// `save` or `load` without a configured backing file.
    #[error("no backing file is configured")]
    NoBackingFile,

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error("cannot access settings file `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Value(#[from] AnyError),
}

impl SettingsError {
    /// Whether the error reports a missing name or type.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::NotDeclared(_) | Self::TypeNotDeclared(_))
    }
}
