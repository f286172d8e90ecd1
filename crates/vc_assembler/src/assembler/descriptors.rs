use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use super::{Assembler, Structure};
use crate::error::AssembleError;
use crate::member::{ExtendMember, FieldId, FieldMember, Member, MemberId};

// -----------------------------------------------------------------------------
// Descriptors

/// The ordered member descriptors of `T`.
///
/// Order is declaration order. It drives output order and graph order;
/// lookups go through the name index or the field identity.
pub struct Descriptors<T> {
    members: Vec<Box<dyn Member<T>>>,
    by_name: HashMap<Cow<'static, str>, usize, FixedState>,
}

impl<T: 'static> Descriptors<T> {
    /// Starts a new declaration.
    #[inline]
    pub fn builder() -> DescriptorsBuilder<T> {
        DescriptorsBuilder::new()
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Member<T>> {
        self.members.iter().map(|m| &**m)
    }

    /// Returns the member declared under `name`.
    pub fn get(&self, name: &str) -> Option<&dyn Member<T>> {
        self.by_name.get(name).map(|&idx| &*self.members[idx])
    }

    /// Returns the member declared for `field`.
    pub fn find(&self, field: &FieldId<T>) -> Option<&dyn Member<T>> {
        self.position_of(field.erase()).map(|idx| &*self.members[idx])
    }

    /// Returns the declaration index of a member identity-equal to `member`.
    pub fn position(&self, member: &dyn Member<T>) -> Option<usize> {
        self.members.iter().position(|m| m.identity_equals(member))
    }

    pub(crate) fn position_of(&self, id: MemberId) -> Option<usize> {
        self.members.iter().position(|m| m.field_id() == id)
    }

    pub(crate) fn at(&self, index: usize) -> &dyn Member<T> {
        &*self.members[index]
    }
}

impl<T: 'static> fmt::Debug for Descriptors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// DescriptorsBuilder

/// Builds a [`Descriptors`] set.
///
/// Declaring a name or a field twice is recorded and reported by
/// [`DescriptorsBuilder::build`]. Only the first error is kept.
pub struct DescriptorsBuilder<T> {
    members: Vec<Box<dyn Member<T>>>,
    by_name: HashMap<Cow<'static, str>, usize, FixedState>,
    error: Option<AssembleError>,
}

impl<T: 'static> DescriptorsBuilder<T> {
    fn new() -> Self {
        Self {
            members: Vec::new(),
            by_name: HashMap::with_hasher(FixedState::with_seed(0)),
            error: None,
        }
    }

    /// Declares a plain field.
    #[must_use]
    pub fn field<F: Assembler + 'static>(
        self,
        name: impl Into<Cow<'static, str>>,
        id: FieldId<T>,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.member(Box::new(FieldMember::new(name, id, get, get_mut)))
    }

    /// Declares an embedded structure whose members are flattened into `T`.
    #[must_use]
    pub fn extend<B: Structure>(
        self,
        name: impl Into<Cow<'static, str>>,
        id: FieldId<T>,
        get: fn(&T) -> &B,
        get_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        self.member(Box::new(ExtendMember::new(name, id, get, get_mut)))
    }

    /// Declares a custom member.
    #[must_use]
    pub fn member(mut self, member: Box<dyn Member<T>>) -> Self {
        if self.error.is_some() {
            return self;
        }

        let owner = core::any::type_name::<T>();
        if self.by_name.contains_key(member.name()) {
            self.error = Some(AssembleError::declaration(format!(
                "member `{}` of `{owner}` is declared twice",
                member.name()
            )));
            return self;
        }
        if let Some(other) = self
            .members
            .iter()
            .find(|m| m.field_id() == member.field_id())
        {
            self.error = Some(AssembleError::declaration(format!(
                "members `{}` and `{}` of `{owner}` refer to the same field",
                other.name(),
                member.name()
            )));
            return self;
        }

        let name: Cow<'static, str> = Cow::Owned(member.name().into());
        self.by_name.insert(name, self.members.len());
        self.members.push(member);
        self
    }

    /// Finishes the declaration.
    ///
    /// Fails if two members write the same name, including names flattened
    /// in from extended structures.
    pub fn build(self) -> Result<Descriptors<T>, AssembleError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut written: HashMap<String, &str, FixedState> =
            HashMap::with_hasher(FixedState::with_seed(0));
        for member in &self.members {
            for name in member.output_names()? {
                if let Some(first) = written.get(name.as_str()) {
                    return Err(AssembleError::declaration(format!(
                        "members `{first}` and `{}` of `{}` both write `{name}`",
                        member.name(),
                        core::any::type_name::<T>(),
                    )));
                }
                written.insert(name, member.name());
            }
        }
        drop(written);

        Ok(Descriptors {
            members: self.members,
            by_name: self.by_name,
        })
    }
}
