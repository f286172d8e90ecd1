use crate::assembler::{Assembler, MapKey};
use crate::de::{ArrayDeserializer, StructDeserializer};
use crate::error::AssembleError;
use crate::graph::Graph;
use crate::rules::{Canonical, Wide};
use crate::ser::{ArraySerializer, StructSerializer};

// Dispatches a canonical value to the matching sink method.
trait WriteWide: Wide {
    fn write_named(self, sink: &mut dyn StructSerializer, name: &str) -> Result<(), AssembleError>;
    fn write_positional(self, sink: &mut dyn ArraySerializer) -> Result<(), AssembleError>;
}

macro_rules! impl_write_wide {
    ($($ty:ty => $method:ident),+ $(,)?) => {
        $(
            impl WriteWide for $ty {
                #[inline]
                fn write_named(
                    self,
                    sink: &mut dyn StructSerializer,
                    name: &str,
                ) -> Result<(), AssembleError> {
                    sink.$method(name, self)
                }

                #[inline]
                fn write_positional(self, sink: &mut dyn ArraySerializer) -> Result<(), AssembleError> {
                    sink.$method(self)
                }
            }
        )+
    };
}

impl_write_wide!(
    bool => serialize_bool,
    i64 => serialize_i64,
    u64 => serialize_u64,
    f64 => serialize_f64,
);

macro_rules! impl_primitive_assembler {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Assembler for $ty {
                #[inline]
                fn serialize_named(
                    &self,
                    sink: &mut dyn StructSerializer,
                    name: &str,
                ) -> Result<(), AssembleError> {
                    self.widen().write_named(sink, name)
                }

                #[inline]
                fn serialize_positional(
                    &self,
                    sink: &mut dyn ArraySerializer,
                ) -> Result<(), AssembleError> {
                    self.widen().write_positional(sink)
                }

                fn deserialize_named(
                    &mut self,
                    source: &mut dyn StructDeserializer,
                    name: &str,
                ) -> Result<(), AssembleError> {
                    *self = <$ty as Canonical>::narrow(&source.value(name)?)?;
                    Ok(())
                }

                fn deserialize_positional(
                    &mut self,
                    source: &mut dyn ArrayDeserializer,
                ) -> Result<(), AssembleError> {
                    *self = <$ty as Canonical>::narrow(&source.value()?)?;
                    Ok(())
                }

                #[inline]
                fn graph(graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
                    graph.node(node, <$ty as Canonical>::KIND.name());
                    Ok(())
                }
            }

            impl MapKey for $ty {}
        )+
    };
}

impl_primitive_assembler!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);
