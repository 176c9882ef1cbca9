use std::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
};

///
/// TypeToken
///
/// Reified, fully parameterized type: `Page<u32>` and `Page<String>` are
/// different tokens that share the raw name `Page`.
///

#[derive(Clone, Copy, Debug)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Full type name, including module path and generic arguments.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with its generic arguments stripped.
    #[must_use]
    pub fn raw_name(&self) -> &'static str {
        self.name
            .find('<')
            .map_or(self.name, |index| &self.name[..index])
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

///
/// TESTS
///
