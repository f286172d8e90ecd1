//! Registry entries and their type-erased assembler capability.

use core::any::TypeId;
use core::fmt;
use core::marker::PhantomData;

use vc_assembler::de::StructDeserializer;
use vc_assembler::graph::Graph;
use vc_assembler::ser::StructSerializer;
use vc_assembler::value::{AnyValue, Value};
use vc_assembler::{AssembleError, Assembler};

/// Types that can be declared as settings.
pub trait Setting: Assembler + Value + Default {}

impl<T: Assembler + Value + Default> Setting for T {}

// -----------------------------------------------------------------------------
// ErasedAssembler

/// The assembler of one setting type, working on the type-erased value.
pub trait ErasedAssembler: Send + Sync {
    /// `TypeId` of the values this assembler handles.
    fn value_type_id(&self) -> TypeId;

    fn value_type_name(&self) -> &'static str;

    /// A fresh default value.
    fn default_value(&self) -> AnyValue;

    fn serialize_named(
        &self,
        value: &AnyValue,
        sink: &mut dyn StructSerializer,
        name: &str,
    ) -> Result<(), AssembleError>;

    fn deserialize_named(
        &self,
        value: &mut AnyValue,
        source: &mut dyn StructDeserializer,
        name: &str,
    ) -> Result<(), AssembleError>;

    fn graph(&self, graph: &mut Graph, node: &str) -> Result<(), AssembleError>;
}

/// [`ErasedAssembler`] of `T`.
pub struct TypedAssembler<T>(PhantomData<fn() -> T>);

impl<T> TypedAssembler<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TypedAssembler<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Setting> ErasedAssembler for TypedAssembler<T> {
    #[inline]
    fn value_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn value_type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    fn default_value(&self) -> AnyValue {
        AnyValue::new(T::default())
    }

    fn serialize_named(
        &self,
        value: &AnyValue,
        sink: &mut dyn StructSerializer,
        name: &str,
    ) -> Result<(), AssembleError> {
        value.get_ref::<T>()?.serialize_named(sink, name)
    }

    fn deserialize_named(
        &self,
        value: &mut AnyValue,
        source: &mut dyn StructDeserializer,
        name: &str,
    ) -> Result<(), AssembleError> {
        value.get_mut::<T>()?.deserialize_named(source, name)
    }

    #[inline]
    fn graph(&self, graph: &mut Graph, node: &str) -> Result<(), AssembleError> {
        T::graph(graph, node)
    }
}

// -----------------------------------------------------------------------------
// Entry

/// A declared setting: its value and the assembler able to handle it.
pub struct Entry {
    value: AnyValue,
    assembler: Box<dyn ErasedAssembler>,
}

impl Entry {
    pub(crate) fn new<T: Setting>(value: T) -> Self {
        Self {
            value: AnyValue::new(value),
            assembler: Box::new(TypedAssembler::<T>::new()),
        }
    }

    #[inline]
    pub fn value(&self) -> &AnyValue {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut AnyValue {
        &mut self.value
    }

    /// The capability used to (de)serialize and document this entry.
    #[inline]
    pub fn assembler(&self) -> &dyn ErasedAssembler {
        &*self.assembler
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.assembler.value_type_id()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.assembler.value_type_name()
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("type", &self.type_name())
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use vc_assembler::tree::{Node, StructNode};

    use super::Entry;

    #[test]
    fn capability_follows_the_declared_type() {
        let mut entry = Entry::new(7_u16);
        assert_eq!(entry.type_name(), "u16");
        assert_eq!(entry.assembler().default_value().get::<u16>(), Ok(0));

        let mut sink = StructNode::new();
        entry
            .assembler()
            .serialize_named(entry.value(), &mut sink, "port")
            .unwrap();
        assert_eq!(sink.get("port"), Some(&Node::UInt(7)));

        sink.insert("port", Node::UInt(9));
        let Entry { value, assembler } = &mut entry;
        assembler.deserialize_named(value, &mut sink, "port").unwrap();
        assert_eq!(entry.value().get::<u16>(), Ok(9));
    }
}
