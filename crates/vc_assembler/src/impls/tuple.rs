//! Tuples, written as arrays with one slot per element.
//!
//! The number of slots must match the arity exactly.

use alloc::format;

use crate::assembler::{Assembler, MapKey};
use crate::de::{ArrayDeserializer, StructDeserializer};
use crate::error::AssembleError;
use crate::graph::Graph;
use crate::ser::{ArraySerializer, StructSerializer};

fn missing_slot(arity: usize, found: usize) -> AssembleError {
    AssembleError::structural(format!(
        "expected a tuple of {arity} elements, found {found}"
    ))
}

macro_rules! impl_tuple {
    ($arity:literal; $($index:tt $name:ident),+) => {
        impl<$($name: Assembler),+> Assembler for ($($name,)+) {
            fn serialize_named(
                &self,
                sink: &mut dyn StructSerializer,
                name: &str,
            ) -> Result<(), AssembleError> {
                self.serialize_positional_slots(sink.serialize_array(name)?)
            }

            fn serialize_positional(
                &self,
                sink: &mut dyn ArraySerializer,
            ) -> Result<(), AssembleError> {
                self.serialize_positional_slots(sink.serialize_array()?)
            }

            fn deserialize_named(
                &mut self,
                source: &mut dyn StructDeserializer,
                name: &str,
            ) -> Result<(), AssembleError> {
                self.deserialize_positional_slots(source.deserialize_array(name)?)
            }

            fn deserialize_positional(
                &mut self,
                source: &mut dyn ArrayDeserializer,
            ) -> Result<(), AssembleError> {
                self.deserialize_positional_slots(source.deserialize_array()?)
            }

            fn graph(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
                graph.node(node, "tuple");
                $(
                    let slot = graph.child(node, concat!(".", stringify!($index)));
                    $name::graph(graph, &slot)?;
                )+
                Ok(())
            }
        }

        impl<$($name: Assembler),+> TupleSlots for ($($name,)+) {
            fn serialize_positional_slots(
                &self,
                array: &mut dyn ArraySerializer,
            ) -> Result<(), AssembleError> {
                $(
                    self.$index
                        .serialize_positional(array)
                        .map_err(|e| e.at_index($index))?;
                )+
                Ok(())
            }

            fn deserialize_positional_slots(
                &mut self,
                array: &mut dyn ArrayDeserializer,
            ) -> Result<(), AssembleError> {
                $(
                    if array.is_complete() {
                        return Err(missing_slot($arity, $index));
                    }
                    self.$index
                        .deserialize_positional(array)
                        .map_err(|e| e.at_index($index))?;
                )+
                if !array.is_complete() {
                    return Err(AssembleError::structural(format!(
                        "expected a tuple of {} elements, found more",
                        $arity
                    )));
                }
                Ok(())
            }
        }

        impl<$($name: Assembler),+> MapKey for ($($name,)+) {}
    };
}

trait TupleSlots {
    fn serialize_positional_slots(&self, array: &mut dyn ArraySerializer)
    -> Result<(), AssembleError>;

    fn deserialize_positional_slots(
        &mut self,
        array: &mut dyn ArrayDeserializer,
    ) -> Result<(), AssembleError>;
}

impl_tuple!(1; 0 A);
impl_tuple!(2; 0 A, 1 B);
impl_tuple!(3; 0 A, 1 B, 2 C);
impl_tuple!(4; 0 A, 1 B, 2 C, 3 D);
impl_tuple!(5; 0 A, 1 B, 2 C, 3 D, 4 E);
impl_tuple!(6; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_tuple!(7; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_tuple!(8; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);
impl_tuple!(9; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I);
impl_tuple!(10; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J);
impl_tuple!(11; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K);
impl_tuple!(12; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K, 11 L);

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::assembler::Assembler;
    use crate::error::ErrorKind;
    use crate::tree::{ArrayNode, Node, StructNode};

    #[test]
    fn heterogeneous_round_trip() {
        let value = (1_u8, "two".to_string(), vec![3.0_f64], Some(false));
        let mut sink = StructNode::new();
        value.serialize_named(&mut sink, "tuple").unwrap();

        let mut back = <(u8, String, Vec<f64>, Option<bool>)>::default();
        back.deserialize_named(&mut sink, "tuple").unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn arity_is_strict() {
        let mut short = ArrayNode::new();
        short.push(Node::Int(1));
        let mut long = ArrayNode::new();
        for i in 0..3 {
            long.push(Node::Int(i));
        }

        let mut source = StructNode::new();
        source.insert("short", Node::Array(short));
        source.insert("long", Node::Array(long));

        let mut pair = (0_i32, 0_i32);
        for name in ["short", "long"] {
            let err = pair.deserialize_named(&mut source, name).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::Structural(_)));
        }
    }

    #[test]
    fn slot_failure_is_tagged_with_index() {
        let mut slots = ArrayNode::new();
        slots.push(Node::Int(1));
        slots.push(Node::Str("x".into()));

        let mut source = StructNode::new();
        source.insert("pair", Node::Array(slots));

        let mut pair = (0_i32, 0_i32);
        let err = pair.deserialize_named(&mut source, "pair").unwrap_err();
        assert_eq!(err.path().to_string(), "[1]");
    }
}
