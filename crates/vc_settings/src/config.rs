use core::fmt;
use std::path::{Path, PathBuf};

use vc_assembler::de::StructDeserializer;
use vc_assembler::ser::StructSerializer;
use vc_assembler::tree::StructNode;

// -----------------------------------------------------------------------------
// SettingsFormat

/// Creates the sinks and sources used for backing files.
#[derive(Clone, Copy)]
pub struct SettingsFormat {
    name: &'static str,
    new_sink: fn() -> Box<dyn StructSerializer>,
    new_source: fn() -> Box<dyn StructDeserializer>,
}

impl SettingsFormat {
    pub const fn new(
        name: &'static str,
        new_sink: fn() -> Box<dyn StructSerializer>,
        new_source: fn() -> Box<dyn StructDeserializer>,
    ) -> Self {
        Self {
            name,
            new_sink,
            new_source,
        }
    }

    /// JSON through the tree document.
    pub const fn tree() -> Self {
        Self::new("tree", tree_sink, tree_source)
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn sink(&self) -> Box<dyn StructSerializer> {
        (self.new_sink)()
    }

    #[inline]
    pub fn source(&self) -> Box<dyn StructDeserializer> {
        (self.new_source)()
    }
}

fn tree_sink() -> Box<dyn StructSerializer> {
    Box::new(StructNode::new())
}

fn tree_source() -> Box<dyn StructDeserializer> {
    Box::new(StructNode::new())
}

impl Default for SettingsFormat {
    #[inline]
    fn default() -> Self {
        Self::tree()
    }
}

impl fmt::Debug for SettingsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SettingsFormat").field(&self.name).finish()
    }
}

// -----------------------------------------------------------------------------
// SettingsConfig

/// Where and how a registry persists its entries.
///
/// # Examples
///
/// ```
/// use vc_settings::{Settings, SettingsConfig, SettingsFormat};
///
/// let config = SettingsConfig::new()
///     .with_path(std::env::temp_dir().join("app-settings.json"))
///     .with_format(SettingsFormat::tree());
/// let settings = Settings::with_config(config);
/// assert!(settings.config().path().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettingsConfig {
    path: Option<PathBuf>,
    format: SettingsFormat,
}

impl SettingsConfig {
    /// No backing file, tree format.
    pub const fn new() -> Self {
        Self {
            path: None,
            format: SettingsFormat::tree(),
        }
    }

    /// Loads declared entries from `path` and saves them there.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: SettingsFormat) -> Self {
        self.format = format;
        self
    }

    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn format(&self) -> &SettingsFormat {
        &self.format
    }
}
