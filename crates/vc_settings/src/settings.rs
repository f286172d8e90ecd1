use core::any::TypeId;
use std::io;
use std::path::Path;

use foldhash::fast::FixedState;
use hashbrown::HashMap;
use vc_assembler::de::StructDeserializer;
use vc_assembler::graph::Graph;
use vc_assembler::ser::StructSerializer;

use crate::config::SettingsConfig;
use crate::entry::{Entry, Setting};
use crate::error::SettingsError;
use crate::map::SettingsMap;

/// A registry of named, typed settings.
///
/// Each name holds one value, and each type is declared under at most one
/// name, so a value can be reached by its type alone.
///
/// # Examples
///
/// ```
/// use vc_assembler::Assemble;
/// use vc_settings::Settings;
///
/// #[derive(Debug, Default, Clone, PartialEq, Assemble)]
/// struct Audio {
///     volume: f32,
///     muted: bool,
/// }
///
/// let mut settings = Settings::new();
/// settings.declare::<Audio>("audio").unwrap();
///
/// settings.access::<Audio>().unwrap().volume = 0.8;
/// assert_eq!(settings.get::<Audio>().unwrap().volume, 0.8);
///
/// settings.undeclare("audio").unwrap();
/// assert!(settings.access::<Audio>().is_err());
/// ```
#[derive(Debug, Default)]
pub struct Settings {
    map: SettingsMap,
    names: HashMap<TypeId, String, FixedState>,
    config: SettingsConfig,
}

impl Settings {
    /// An in-memory registry without backing file.
    pub fn new() -> Self {
        Self::with_config(SettingsConfig::new())
    }

    pub fn with_config(config: SettingsConfig) -> Self {
        Self {
            map: SettingsMap::new(),
            names: HashMap::with_hasher(FixedState::with_seed(0)),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Declaration

    /// Declares `T` under `name` with its default value.
    ///
    /// On first declaration the entry is loaded from the backing file, if
    /// one is configured. Declaring `T` again under the same name keeps the
    /// stored value.
    pub fn declare<T: Setting>(&mut self, name: &str) -> Result<(), SettingsError> {
        self.declare_value(name, T::default(), false)
    }

    /// Declares `T` under `name` holding `value`.
    ///
    /// | `T` declared | under `name` | `replace` | `name` free | result |
    /// |---|---|---|---|---|
    /// | no  | -   | -     | yes | inserted, then loaded from the backing file |
    /// | no  | -   | -     | no  | [`SettingsError::NameTaken`] |
    /// | yes | yes | true  | -   | stored value replaced by `value` |
    /// | yes | yes | false | -   | `value` ignored |
    /// | yes | no  | false | -   | [`SettingsError::TypeAlreadyDeclared`] |
    /// | yes | no  | true  | no  | [`SettingsError::NameTaken`] |
    /// | yes | no  | true  | yes | moved to `name`, holding `value` |
    pub fn declare_value<T: Setting>(
        &mut self,
        name: &str,
        value: T,
        replace: bool,
    ) -> Result<(), SettingsError> {
        let type_id = TypeId::of::<T>();
        let bound = self.names.get(&type_id).cloned();

        let Some(bound) = bound else {
            self.check_name_free(name)?;
            return self.insert_and_load(name, value);
        };

        if bound == name {
            if replace {
                self.entry_mut(name)?.value_mut().set(value);
                log::debug!("setting `{name}` replaced");
            }
            return Ok(());
        }

        if !replace {
            return Err(SettingsError::TypeAlreadyDeclared {
                type_name: core::any::type_name::<T>(),
                existing: bound,
            });
        }
        self.check_name_free(name)?;

        self.map.remove(&bound);
        self.map.insert(name.into(), Entry::new(value));
        self.names.insert(type_id, name.into());
        log::debug!("setting `{bound}` moved to `{name}`");
        Ok(())
    }

    fn check_name_free(&self, name: &str) -> Result<(), SettingsError> {
        match self.map.get(name) {
            Some(entry) => Err(SettingsError::NameTaken {
                name: name.into(),
                existing: entry.type_name(),
            }),
            None => Ok(()),
        }
    }

    fn insert_and_load<T: Setting>(&mut self, name: &str, value: T) -> Result<(), SettingsError> {
        self.map.insert(name.into(), Entry::new(value));
        self.names.insert(TypeId::of::<T>(), name.into());

        if let Err(error) = self.load_entry(name) {
            self.map.remove(name);
            self.names.remove(&TypeId::of::<T>());
            return Err(error);
        }
        log::debug!("setting `{name}` declared as `{}`", core::any::type_name::<T>());
        Ok(())
    }

    // Reads `name` alone from the backing file.
    fn load_entry(&mut self, name: &str) -> Result<(), SettingsError> {
        let Some(path) = self.config.path() else {
            return Ok(());
        };
        let Some(text) = read_backing_file(path)? else {
            return Ok(());
        };

        let mut source = self.config.format().source();
        source.set_raw_input(&text)?;
        if self.map.deserialize_entry(&mut *source, name)? {
            log::debug!("setting `{name}` loaded from `{}`", path.display());
        }
        Ok(())
    }

    /// Removes the entry `name`.
    pub fn undeclare(&mut self, name: &str) -> Result<(), SettingsError> {
        let entry = self
            .map
            .remove(name)
            .ok_or_else(|| SettingsError::NotDeclared(name.into()))?;
        self.names.remove(&entry.type_id());
        log::debug!("setting `{name}` undeclared");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Access

    /// Mutable access to the value declared for `T`.
    pub fn access<T: Setting>(&mut self) -> Result<&mut T, SettingsError> {
        let name = self.name_for::<T>()?.to_owned();
        Ok(self.entry_mut(&name)?.value_mut().get_mut::<T>()?)
    }

    /// Shared access to the value declared for `T`.
    pub fn get<T: Setting>(&self) -> Result<&T, SettingsError> {
        let name = self.name_for::<T>()?;
        let entry = self
            .map
            .get(name)
            .ok_or_else(|| SettingsError::NotDeclared(name.into()))?;
        Ok(entry.value().get_ref::<T>()?)
    }

    fn name_for<T: Setting>(&self) -> Result<&str, SettingsError> {
        self.names
            .get(&TypeId::of::<T>())
            .map(String::as_str)
            .ok_or(SettingsError::TypeNotDeclared(core::any::type_name::<T>()))
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut Entry, SettingsError> {
        self.map
            .get_mut(name)
            .ok_or_else(|| SettingsError::NotDeclared(name.into()))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.map.get(name).is_some()
    }

    /// The name `T` is declared under.
    #[inline]
    pub fn name_of<T: Setting>(&self) -> Option<&str> {
        self.name_for::<T>().ok()
    }

    /// Declared names, in order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.map.iter().map(|(name, _)| name)
    }

    #[inline]
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.map.get(name)
    }

    #[inline]
    pub fn entries(&self) -> &SettingsMap {
        &self.map
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    // -------------------------------------------------------------------------
    // Persistence

    /// Writes every entry into `sink`.
    pub fn serialize_into(&self, sink: &mut dyn StructSerializer) -> Result<(), SettingsError> {
        self.map.serialize_fields(sink)?;
        Ok(())
    }

    /// Reads every declared entry present in `source`.
    ///
    /// Unknown names are ignored, missing names keep their values.
    pub fn deserialize_from(
        &mut self,
        source: &mut dyn StructDeserializer,
    ) -> Result<(), SettingsError> {
        self.map.deserialize_fields(source)?;
        Ok(())
    }

    /// Writes every entry into `sink` and stores its text at `path`.
    pub fn serialize(
        &self,
        path: &Path,
        sink: &mut dyn StructSerializer,
    ) -> Result<(), SettingsError> {
        self.serialize_into(sink)?;
        let text = sink.dump()?;
        std::fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.into(),
            source,
        })?;
        log::debug!("{} settings saved to `{}`", self.len(), path.display());
        Ok(())
    }

    /// Reads the file at `path` through `source` and loads every declared
    /// entry present in it.
    pub fn deserialize(
        &mut self,
        path: &Path,
        source: &mut dyn StructDeserializer,
    ) -> Result<(), SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.into(),
            source,
        })?;
        source.set_raw_input(&text)?;
        self.deserialize_from(source)?;
        log::debug!("settings loaded from `{}`", path.display());
        Ok(())
    }

    /// Saves to the configured backing file.
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = self.config.path().ok_or(SettingsError::NoBackingFile)?;
        let mut sink = self.config.format().sink();
        self.serialize(path, &mut *sink)
    }

    /// Loads from the configured backing file.
    ///
    /// A missing file leaves every value unchanged.
    pub fn load(&mut self) -> Result<(), SettingsError> {
        let path = self
            .config
            .path()
            .ok_or(SettingsError::NoBackingFile)?
            .to_owned();
        if !path.exists() {
            log::debug!("settings file `{}` does not exist", path.display());
            return Ok(());
        }
        let mut source = self.config.format().source();
        self.deserialize(&path, &mut *source)
    }

    // -------------------------------------------------------------------------
    // Documentation

    /// Renders the documentation graph of every declared entry.
    pub fn graph(&self) -> Result<String, SettingsError> {
        const ROOT: &str = "Settings";

        let mut graph = Graph::new();
        graph.node(ROOT, "settings");
        self.map.graph_fields(&mut graph, ROOT)?;
        Ok(graph.render(ROOT))
    }
}

// `None` if the file does not exist.
fn read_backing_file(path: &Path) -> Result<Option<String>, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            log::debug!("settings file `{}` does not exist", path.display());
            Ok(None)
        }
        Err(source) => Err(SettingsError::Io {
            path: path.into(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use vc_assembler::tree::{Node, StructNode};
    use vc_assembler::{Assemble, AssembleEnum, ErrorKind};

    use super::Settings;
    use crate::config::SettingsConfig;
    use crate::error::SettingsError;

    #[derive(Debug, Default, Clone, PartialEq, AssembleEnum)]
    enum Theme {
        #[default]
        Light,
        Dark,
    }

    #[derive(Debug, Default, Clone, PartialEq, Assemble)]
    struct Display {
        width: u32,
        height: u32,
        theme: Theme,
    }

    #[derive(Debug, Default, Clone, PartialEq, Assemble)]
    struct Network {
        host: String,
        port: u16,
        retries: Option<u8>,
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "vc_settings-{tag}-{}.json",
            std::process::id()
        ))
    }

    #[test]
    fn declare_access_undeclare() {
        let mut settings = Settings::new();
        settings.declare::<Display>("X").unwrap();
        assert_eq!(settings.access::<Display>().unwrap(), &Display::default());

        settings.access::<Display>().unwrap().width = 640;
        assert_eq!(settings.access::<Display>().unwrap().width, 640);
        assert_eq!(settings.name_of::<Display>(), Some("X"));

        settings.undeclare("X").unwrap();
        let err = settings.access::<Display>().unwrap_err();
        assert!(matches!(err, SettingsError::TypeNotDeclared(_)));
        assert!(err.is_lookup());

        assert!(matches!(
            settings.undeclare("X"),
            Err(SettingsError::NotDeclared(_))
        ));
    }

    #[test]
    fn decision_table() {
        let mut settings = Settings::new();
        settings.declare::<u32>("count").unwrap();

        // Name held by another type.
        assert!(matches!(
            settings.declare::<String>("count"),
            Err(SettingsError::NameTaken { .. })
        ));

        // Same name, value ignored without `replace`.
        settings.declare_value("count", 5_u32, false).unwrap();
        assert_eq!(settings.get::<u32>().unwrap(), &0);

        // Same name, value replaced.
        settings.declare_value("count", 5_u32, true).unwrap();
        assert_eq!(settings.get::<u32>().unwrap(), &5);

        // Other name without `replace`.
        assert!(matches!(
            settings.declare::<u32>("total"),
            Err(SettingsError::TypeAlreadyDeclared { .. })
        ));

        // Other name with `replace`, but taken.
        settings.declare::<String>("label").unwrap();
        assert!(matches!(
            settings.declare_value("label", 1_u32, true),
            Err(SettingsError::NameTaken { .. })
        ));

        // Other free name with `replace`: the binding moves.
        settings.declare_value("total", 7_u32, true).unwrap();
        assert!(!settings.contains("count"));
        assert_eq!(settings.name_of::<u32>(), Some("total"));
        assert_eq!(settings.get::<u32>().unwrap(), &7);
        assert_eq!(settings.names().collect::<Vec<_>>(), ["label", "total"]);
    }

    #[test]
    fn memory_round_trip() {
        let mut settings = Settings::new();
        settings.declare::<Display>("display").unwrap();
        settings.declare::<Network>("network").unwrap();
        settings.access::<Display>().unwrap().theme = Theme::Dark;
        settings.access::<Network>().unwrap().retries = Some(3);

        let mut sink = StructNode::new();
        settings.serialize_into(&mut sink).unwrap();
        assert_eq!(sink.names().collect::<Vec<_>>(), ["display", "network"]);

        let mut other = Settings::new();
        other.declare::<Display>("display").unwrap();
        other.declare::<Network>("network").unwrap();
        other.deserialize_from(&mut sink).unwrap();
        assert_eq!(other.get::<Display>().unwrap().theme, Theme::Dark);
        assert_eq!(other.get::<Network>().unwrap().retries, Some(3));
    }

    #[test]
    fn type_mismatch_reports_the_entry() {
        let mut settings = Settings::new();
        settings.declare::<Network>("network").unwrap();

        let mut network = StructNode::new();
        network.insert("host", Node::Str("localhost".into()));
        network.insert("port", Node::Str("eighty".into()));
        let mut source = StructNode::new();
        source.insert("network", Node::Struct(network));

        let err = settings.deserialize_from(&mut source).unwrap_err();
        let SettingsError::Assemble(err) = err else {
            panic!("unexpected error: {err}");
        };
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
        assert_eq!(err.path().to_string(), "network.port");
    }

    #[test]
    fn backing_file_round_trip() {
        let path = temp_path("round-trip");
        let config = SettingsConfig::new().with_path(&path);

        let mut settings = Settings::with_config(config.clone());
        settings.declare::<Network>("network").unwrap();
        *settings.access::<Network>().unwrap() = Network {
            host: "example.org".into(),
            port: 8080,
            retries: None,
        };
        settings.save().unwrap();

        // Declaring loads the stored entry.
        let mut reloaded = Settings::with_config(config.clone());
        reloaded.declare::<Network>("network").unwrap();
        assert_eq!(reloaded.get::<Network>().unwrap().port, 8080);

        // Missing key keeps the default.
        reloaded.declare::<Display>("display").unwrap();
        assert_eq!(reloaded.get::<Display>().unwrap(), &Display::default());

        reloaded.access::<Network>().unwrap().port = 1;
        reloaded.load().unwrap();
        assert_eq!(reloaded.get::<Network>().unwrap().host, "example.org");
        assert_eq!(reloaded.get::<Network>().unwrap().port, 8080);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn failed_load_rolls_the_declaration_back() {
        let path = temp_path("rollback");
        std::fs::write(&path, r#"{"network": {"host": 5}}"#).unwrap();

        let mut settings = Settings::with_config(SettingsConfig::new().with_path(&path));
        let err = settings.declare::<Network>("network").unwrap_err();
        assert!(matches!(err, SettingsError::Assemble(_)));
        assert!(!settings.contains("network"));
        assert!(settings.name_of::<Network>().is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_backing_file() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);

        let mut settings = Settings::with_config(SettingsConfig::new().with_path(&path));
        settings.declare::<u8>("level").unwrap();
        settings.load().unwrap();
        assert_eq!(settings.get::<u8>().unwrap(), &0);

        assert!(matches!(
            Settings::new().save(),
            Err(SettingsError::NoBackingFile)
        ));
    }

    #[test]
    fn graph_lists_entries() {
        let mut settings = Settings::new();
        settings.declare::<Display>("display").unwrap();
        settings.declare::<bool>("vsync").unwrap();

        let dot = settings.graph().unwrap();
        assert!(dot.contains("\"Settings.display\" [label=\"display: Display\"];"));
        assert!(dot.contains("\"Settings.display.theme\" [label=\"theme: Theme {Light | Dark}\"];"));
        assert!(dot.contains("\"Settings.vsync\" [label=\"vsync: bool\"];"));
    }
}
