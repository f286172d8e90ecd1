//! The map of entries as one assembled document.
//!
//! Every entry is written as a field of a single struct, in name order,
//! using the assembler stored in the entry itself.

use std::collections::BTreeMap;

use vc_assembler::de::{ArrayDeserializer, StructDeserializer};
use vc_assembler::graph::Graph;
use vc_assembler::ser::{ArraySerializer, StructSerializer};
use vc_assembler::{AssembleError, Assembler};

use crate::entry::Entry;

/// Entries of a [`Settings`](crate::Settings) registry, keyed by name.
#[derive(Debug, Default)]
pub struct SettingsMap {
    entries: BTreeMap<String, Entry>,
}

impl SettingsMap {
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.get_mut(name)
    }

    #[inline]
    pub(crate) fn insert(&mut self, name: String, entry: Entry) -> Option<Entry> {
        self.entries.insert(name, entry)
    }

    #[inline]
    pub(crate) fn remove(&mut self, name: &str) -> Option<Entry> {
        self.entries.remove(name)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Writes every entry as a field of `sink`.
    pub fn serialize_fields(&self, sink: &mut dyn StructSerializer) -> Result<(), AssembleError> {
        for (name, entry) in &self.entries {
            entry
                .assembler()
                .serialize_named(entry.value(), sink, name)
                .map_err(|e| e.in_field(name.clone()))?;
        }
        Ok(())
    }

    /// Reads every declared entry present in `source`.
    ///
    /// Entries missing from `source` keep their values, names of `source`
    /// without an entry are ignored. Nothing is modified unless every
    /// present entry decodes.
    pub fn deserialize_fields(
        &mut self,
        source: &mut dyn StructDeserializer,
    ) -> Result<(), AssembleError> {
        for name in source.available_names() {
            if !self.entries.contains_key(&name) {
                log::warn!("ignoring unknown setting `{name}`");
            }
        }

        let mut decoded = Vec::new();
        for (name, entry) in &self.entries {
            if !source.value_exists(name) {
                continue;
            }
            let mut value = entry.value().clone();
            entry
                .assembler()
                .deserialize_named(&mut value, source, name)
                .map_err(|e| e.in_field(name.clone()))?;
            decoded.push((name.clone(), value));
        }

        for (name, value) in decoded {
            if let Some(entry) = self.entries.get_mut(&name) {
                *entry.value_mut() = value;
            }
        }
        Ok(())
    }

    /// Reads the single entry `name`, if `source` has it.
    ///
    /// Returns whether a value was found.
    pub(crate) fn deserialize_entry(
        &mut self,
        source: &mut dyn StructDeserializer,
        name: &str,
    ) -> Result<bool, AssembleError> {
        let Some(entry) = self.entries.get_mut(name) else {
            return Ok(false);
        };
        if !source.value_exists(name) {
            return Ok(false);
        }
        let mut value = entry.value().clone();
        entry
            .assembler()
            .deserialize_named(&mut value, source, name)
            .map_err(|e| e.in_field(String::from(name)))?;
        *entry.value_mut() = value;
        Ok(true)
    }

    /// Adds every entry below `node`.
    pub fn graph_fields(&self, graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
        for (name, entry) in &self.entries {
            let child = graph.child(node, &format!(".{name}"));
            entry.assembler().graph(graph, &child)?;
        }
        Ok(())
    }
}

/// A whole registry nested inside another document.
impl Assembler for SettingsMap {
    fn serialize_named(
        &self,
        sink: &mut dyn StructSerializer,
        name: &str,
    ) -> Result<(), AssembleError> {
        self.serialize_fields(sink.serialize_struct(name)?)
    }

    fn serialize_positional(&self, sink: &mut dyn ArraySerializer) -> Result<(), AssembleError> {
        self.serialize_fields(sink.serialize_struct()?)
    }

    fn deserialize_named(
        &mut self,
        source: &mut dyn StructDeserializer,
        name: &str,
    ) -> Result<(), AssembleError> {
        self.deserialize_fields(source.deserialize_struct(name)?)
    }

    fn deserialize_positional(
        &mut self,
        source: &mut dyn ArrayDeserializer,
    ) -> Result<(), AssembleError> {
        self.deserialize_fields(source.deserialize_struct()?)
    }

    /// Entries are only known per instance, see [`SettingsMap::graph_fields`].
    fn graph(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
        graph.node(node, "settings");
        Ok(())
    }
}
