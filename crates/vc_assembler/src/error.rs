use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::{error, fmt};

use thiserror::Error;

use crate::value::AnyError;

// -----------------------------------------------------------------------------
// ErrorKind

/// The reason an assembler operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A descriptor set, enum table or registry entry was declared twice
    /// (or declared empty). Raised when the declaration is built.
    #[error("invalid declaration: {0}")]
    Declaration(Cow<'static, str>),

    /// A required node is missing or has the wrong shape.
    #[error("{0}")]
    Structural(Cow<'static, str>),

    /// A value of one type was requested from a value of another type.
    #[error("expected `{expected}` but found `{found}`")]
    TypeMismatch {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
    },

    /// A canonical number does not fit the target type.
    #[error("value `{value}` is out of range for `{target}`")]
    Range { value: String, target: &'static str },

    /// A field, enumerator or entry could not be found.
    #[error("{0}")]
    Lookup(Cow<'static, str>),

    /// The concrete format failed to parse or produce its text.
    #[error("format error: {0}")]
    Format(Cow<'static, str>),
}

// -----------------------------------------------------------------------------
// Location trail

/// One step of the location trail carried by an [`AssembleError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named field of an enclosing struct.
    Field(Cow<'static, str>),
    /// A positional element of an enclosing array.
    Index(usize),
}

/// Location of the failing node, from the document root downwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPath {
    // Innermost segment first, errors grow outwards while unwinding.
    reversed: Vec<PathSegment>,
}

impl ErrorPath {
    /// Returns `true` if the error was raised at the root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reversed.is_empty()
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.reversed.len()
    }

    /// Iterates the segments, outermost first.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &PathSegment> {
        self.reversed.iter().rev()
    }

    #[inline]
    fn push_outer(&mut self, segment: PathSegment) {
        self.reversed.push(segment);
    }
}

impl fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments().enumerate() {
            match segment {
                PathSegment::Field(name) if idx == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// AssembleError

/// Error returned by every serialize, deserialize and declaration operation.
///
/// Errors raised deep inside a document accumulate the names of the fields
/// and the indices of the elements they unwind through, so the final message
/// locates the offending node:
///
/// ```
/// use vc_assembler::error::AssembleError;
///
/// let err = AssembleError::structural("missing field `port`")
///     .at_index(2)
///     .in_field("servers");
///
/// assert_eq!(err.to_string(), "at `servers[2]`: missing field `port`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleError {
    kind: ErrorKind,
    path: ErrorPath,
}

impl AssembleError {
    /// Creates an error without location.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: ErrorPath::default(),
        }
    }

    #[inline]
    pub fn declaration(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Declaration(msg.into()))
    }

    #[inline]
    pub fn structural(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Structural(msg.into()))
    }

    #[inline]
    pub fn type_mismatch(
        expected: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        })
    }

    #[inline]
    pub fn range(value: impl fmt::Display, target: &'static str) -> Self {
        Self::new(ErrorKind::Range {
            value: alloc::format!("{value}"),
            target,
        })
    }

    #[inline]
    pub fn lookup(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Lookup(msg.into()))
    }

    #[inline]
    pub fn format(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Format(msg.into()))
    }

    /// Returns the failure reason.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the location trail.
    #[inline]
    pub fn path(&self) -> &ErrorPath {
        &self.path
    }

    /// Prepends a field name to the location trail.
    #[must_use]
    pub fn in_field(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.path.push_outer(PathSegment::Field(name.into()));
        self
    }

    /// Prepends an element index to the location trail.
    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.push_outer(PathSegment::Index(index));
        self
    }

    /// Whether an optional value may swallow this error and become empty.
    ///
    /// Everything caused by the input document is absorbed; broken
    /// declarations are not.
    #[inline]
    pub fn is_absorbable(&self) -> bool {
        !matches!(self.kind, ErrorKind::Declaration(_))
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            fmt::Display::fmt(&self.kind, f)
        } else {
            write!(f, "at `{}`: {}", self.path, self.kind)
        }
    }
}

impl error::Error for AssembleError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<ErrorKind> for AssembleError {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<AnyError> for AssembleError {
    fn from(value: AnyError) -> Self {
        match value {
            AnyError::Empty { expected } => Self::type_mismatch(expected, "nothing"),
            AnyError::Mismatch { expected, found } => Self::type_mismatch(expected, found),
        }
    }
}
