use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::assembler::{Assembler, MapKey};
use crate::de::{ArrayDeserializer, StructDeserializer};
use crate::error::AssembleError;
use crate::graph::Graph;
use crate::ser::{ArraySerializer, StructSerializer};

fn write_items<'a, T, I>(sink: &mut dyn ArraySerializer, items: I) -> Result<(), AssembleError>
where
    T: Assembler + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for (index, item) in items.into_iter().enumerate() {
        item.serialize_positional(sink)
            .map_err(|e| e.at_index(index))?;
    }
    Ok(())
}

// Decodes every remaining slot, in order.
fn read_items<T: Assembler + Default>(
    source: &mut dyn ArrayDeserializer,
    mut push: impl FnMut(T),
) -> Result<(), AssembleError> {
    while !source.is_complete() {
        let index = source.index();
        let mut item = T::default();
        item.deserialize_positional(source)
            .map_err(|e| e.at_index(index))?;
        push(item);
    }
    Ok(())
}

fn graph_items<T: Assembler>(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
    graph.node(node, "sequence");
    let item = graph.child(node, "[]");
    T::graph(graph, &item)
}

macro_rules! impl_sequence {
    ($ty:ident, $push:ident) => {
        /// Deserializing replaces the whole content.
        impl<T: Assembler + Default> Assembler for $ty<T> {
            fn serialize_named(
                &self,
                sink: &mut dyn StructSerializer,
                name: &str,
            ) -> Result<(), AssembleError> {
                write_items(sink.serialize_array(name)?, self)
            }

            fn serialize_positional(
                &self,
                sink: &mut dyn ArraySerializer,
            ) -> Result<(), AssembleError> {
                write_items(sink.serialize_array()?, self)
            }

            fn deserialize_named(
                &mut self,
                source: &mut dyn StructDeserializer,
                name: &str,
            ) -> Result<(), AssembleError> {
                let array = source.deserialize_array(name)?;
                self.clear();
                read_items(array, |item| self.$push(item))
            }

            fn deserialize_positional(
                &mut self,
                source: &mut dyn ArrayDeserializer,
            ) -> Result<(), AssembleError> {
                let array = source.deserialize_array()?;
                self.clear();
                read_items(array, |item| self.$push(item))
            }

            #[inline]
            fn graph(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
                graph_items::<T>(graph, node)
            }
        }

        impl<T: Assembler + Default> MapKey for $ty<T> {}
    };
}

impl_sequence!(Vec, push);
impl_sequence!(VecDeque, push_back);
