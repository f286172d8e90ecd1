//! Associative containers.
//!
//! Keys that are field names ([`MapKey::FIELD_NAME_KEYS`]) are written as a
//! struct keyed by those names. Any other key type is written as an array of
//! `{key, value}` records, since most formats only accept strings as field
//! names.
//!
//! Deserializing replaces the whole content. Duplicate keys in the input
//! keep the last value.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use core::hash::{BuildHasher, Hash};

use crate::assembler::{Assembler, MapKey};
use crate::de::{ArrayDeserializer, StructDeserializer};
use crate::error::AssembleError;
use crate::graph::Graph;
use crate::ser::{ArraySerializer, StructSerializer};

const KEY: &str = "key";
const VALUE: &str = "value";

fn write_fields<'a, K, V>(
    sink: &mut dyn StructSerializer,
    entries: impl Iterator<Item = (&'a K, &'a V)>,
) -> Result<(), AssembleError>
where
    K: MapKey + 'a,
    V: Assembler + 'a,
{
    for (key, value) in entries {
        let Some(name) = key.as_field_name() else {
            return Err(AssembleError::structural(format!(
                "map key of type `{}` cannot be written as a field name",
                core::any::type_name::<K>()
            )));
        };
        value
            .serialize_named(sink, name)
            .map_err(|e| e.in_field(String::from(name)))?;
    }
    Ok(())
}

fn write_records<'a, K, V>(
    sink: &mut dyn ArraySerializer,
    entries: impl Iterator<Item = (&'a K, &'a V)>,
) -> Result<(), AssembleError>
where
    K: MapKey + 'a,
    V: Assembler + 'a,
{
    for (index, (key, value)) in entries.enumerate() {
        let record = sink.serialize_struct().map_err(|e| e.at_index(index))?;
        key.serialize_named(record, KEY)
            .map_err(|e| e.in_field(KEY).at_index(index))?;
        value
            .serialize_named(record, VALUE)
            .map_err(|e| e.in_field(VALUE).at_index(index))?;
    }
    Ok(())
}

fn read_fields<K, V>(
    source: &mut dyn StructDeserializer,
    mut insert: impl FnMut(K, V),
) -> Result<(), AssembleError>
where
    K: MapKey,
    V: Assembler + Default,
{
    for name in source.available_names() {
        let Some(key) = K::from_field_name(&name) else {
            return Err(AssembleError::structural(format!(
                "`{name}` is not a valid `{}` map key",
                core::any::type_name::<K>()
            )));
        };
        let mut value = V::default();
        value
            .deserialize_named(source, &name)
            .map_err(|e| e.in_field(name.clone()))?;
        insert(key, value);
    }
    Ok(())
}

fn read_records<K, V>(
    source: &mut dyn ArrayDeserializer,
    mut insert: impl FnMut(K, V),
) -> Result<(), AssembleError>
where
    K: MapKey + Default,
    V: Assembler + Default,
{
    while !source.is_complete() {
        let index = source.index();
        let record = source.deserialize_struct().map_err(|e| e.at_index(index))?;

        let mut key = K::default();
        key.deserialize_named(record, KEY)
            .map_err(|e| e.in_field(KEY).at_index(index))?;
        let mut value = V::default();
        value
            .deserialize_named(record, VALUE)
            .map_err(|e| e.in_field(VALUE).at_index(index))?;

        insert(key, value);
    }
    Ok(())
}

fn graph_map<K: MapKey + Sized, V: Assembler>(
    graph: &mut Graph,
    node: &str,
) -> Result<(), AssembleError> {
    graph.node(node, "map");
    if K::FIELD_NAME_KEYS {
        let value = graph.child(node, ".*");
        V::graph(graph, &value)
    } else {
        let key = graph.child(node, ".key");
        K::graph(graph, &key)?;
        let value = graph.child(node, ".value");
        V::graph(graph, &value)
    }
}

// Shared by every map container; needs `iter`, `clear` and `insert`.
macro_rules! map_assembler_body {
    () => {
        fn serialize_named(
            &self,
            sink: &mut dyn StructSerializer,
            name: &str,
        ) -> Result<(), AssembleError> {
            if K::FIELD_NAME_KEYS {
                write_fields(sink.serialize_struct(name)?, self.iter())
            } else {
                write_records(sink.serialize_array(name)?, self.iter())
            }
        }

        fn serialize_positional(
            &self,
            sink: &mut dyn ArraySerializer,
        ) -> Result<(), AssembleError> {
            if K::FIELD_NAME_KEYS {
                write_fields(sink.serialize_struct()?, self.iter())
            } else {
                write_records(sink.serialize_array()?, self.iter())
            }
        }

        fn deserialize_named(
            &mut self,
            source: &mut dyn StructDeserializer,
            name: &str,
        ) -> Result<(), AssembleError> {
            if K::FIELD_NAME_KEYS {
                let fields = source.deserialize_struct(name)?;
                self.clear();
                read_fields(fields, |key: K, value: V| {
                    self.insert(key, value);
                })
            } else {
                let records = source.deserialize_array(name)?;
                self.clear();
                read_records(records, |key: K, value: V| {
                    self.insert(key, value);
                })
            }
        }

        fn deserialize_positional(
            &mut self,
            source: &mut dyn ArrayDeserializer,
        ) -> Result<(), AssembleError> {
            if K::FIELD_NAME_KEYS {
                let fields = source.deserialize_struct()?;
                self.clear();
                read_fields(fields, |key: K, value: V| {
                    self.insert(key, value);
                })
            } else {
                let records = source.deserialize_array()?;
                self.clear();
                read_records(records, |key: K, value: V| {
                    self.insert(key, value);
                })
            }
        }

        #[inline]
        fn graph(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
            graph_map::<K, V>(graph, node)
        }
    };
}

impl<K, V> Assembler for BTreeMap<K, V>
where
    K: MapKey + Default + Ord,
    V: Assembler + Default,
{
    map_assembler_body!();
}

impl<K, V, S> Assembler for std::collections::HashMap<K, V, S>
where
    K: MapKey + Default + Eq + Hash,
    V: Assembler + Default,
    S: BuildHasher + Default,
{
    map_assembler_body!();
}

impl<K, V, S> Assembler for hashbrown::HashMap<K, V, S>
where
    K: MapKey + Default + Eq + Hash,
    V: Assembler + Default,
    S: BuildHasher + Default,
{
    map_assembler_body!();
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};

    use foldhash::fast::FixedState;

    use crate::assembler::Assembler;
    use crate::tree::{Node, StructNode};

    #[test]
    fn string_keys_become_field_names() {
        let mut value = BTreeMap::new();
        value.insert(String::from("alpha"), 1_i32);
        value.insert(String::from("beta"), 2);

        let mut sink = StructNode::new();
        value.serialize_named(&mut sink, "map").unwrap();

        let Some(Node::Struct(fields)) = sink.get("map") else {
            panic!("string keyed map is not a struct");
        };
        assert_eq!(fields.get("alpha"), Some(&Node::Int(1)));
        assert_eq!(fields.get("beta"), Some(&Node::Int(2)));

        let mut back = BTreeMap::new();
        back.insert(String::from("stale"), 0);
        back.deserialize_named(&mut sink, "map").unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn other_keys_become_records() {
        let mut value = BTreeMap::new();
        value.insert(7_u32, String::from("seven"));

        let mut sink = StructNode::new();
        value.serialize_named(&mut sink, "map").unwrap();

        let Some(Node::Array(records)) = sink.get("map") else {
            panic!("integer keyed map is not an array");
        };
        let Some(Node::Struct(record)) = records.get(0) else {
            panic!("record is not a struct");
        };
        assert_eq!(record.get("key"), Some(&Node::UInt(7)));
        assert_eq!(record.get("value"), Some(&Node::Str("seven".into())));

        let mut back = BTreeMap::new();
        back.deserialize_named(&mut sink, "map").unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn hash_maps_round_trip() {
        let mut std_map: std::collections::HashMap<i64, bool> = Default::default();
        std_map.insert(-1, true);
        std_map.insert(2, false);

        let mut fast_map: hashbrown::HashMap<String, f64, FixedState> = Default::default();
        fast_map.insert("pi".to_string(), 3.25);

        let mut sink = StructNode::new();
        std_map.serialize_named(&mut sink, "std").unwrap();
        fast_map.serialize_named(&mut sink, "fast").unwrap();

        let mut std_back: std::collections::HashMap<i64, bool> = Default::default();
        let mut fast_back: hashbrown::HashMap<String, f64, FixedState> = Default::default();
        std_back.deserialize_named(&mut sink, "std").unwrap();
        fast_back.deserialize_named(&mut sink, "fast").unwrap();
        assert_eq!(std_back, std_map);
        assert_eq!(fast_back, fast_map);
    }

    #[test]
    fn duplicate_record_keys_keep_last_value() {
        use crate::tree::ArrayNode;

        let mut records = ArrayNode::new();
        for (key, value) in [(1_u64, "first"), (1, "second")] {
            let mut record = StructNode::new();
            record.insert("key", Node::UInt(key));
            record.insert("value", Node::Str(value.into()));
            records.push(Node::Struct(record));
        }
        let mut source = StructNode::new();
        source.insert("map", Node::Array(records));

        let mut back: BTreeMap<u8, String> = BTreeMap::new();
        back.deserialize_named(&mut source, "map").unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[&1], "second");
    }
}
