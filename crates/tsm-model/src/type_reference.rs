//! Unresolved references to types.
//!
//! A `TypeReference` names a type the way source code spells it; resolving it
//! to a definition is the resolver's job and out of scope here. References
//! are built in one step and never mutated afterwards, but they still follow
//! the freeze and interning protocols so parameters and attributes can share
//! them.

use crate::error::Result;
use crate::freeze::{FreezeState, Freezable};
use crate::intern::{Fingerprint, InterningProvider, SupportsInterning};
use crate::list::EntityList;
use std::fmt;
use std::sync::Arc;
use tsm_common::empty_string;

#[derive(Debug, Clone)]
pub enum TypeReferenceKind {
    /// See `SharedTypes::unknown`.
    Unknown,
    /// See `SharedTypes::null`.
    Null,
    /// See `SharedTypes::dynamic`.
    Dynamic,
    /// A type named by namespace and name, with optional type arguments.
    Named {
        namespace: Arc<str>,
        name: Arc<str>,
        type_arguments: EntityList<TypeReference>,
    },
    /// `T[]`, `T[,]`, ...
    Array {
        element: Arc<TypeReference>,
        dimensions: u32,
    },
    /// `ref T` / `out T` as seen in signatures.
    ByReference { element: Arc<TypeReference> },
}

#[derive(Debug)]
pub struct TypeReference {
    freeze: FreezeState,
    kind: TypeReferenceKind,
}

impl TypeReference {
    pub(crate) const fn sentinel(kind: TypeReferenceKind) -> Self {
        TypeReference {
            freeze: FreezeState::frozen(),
            kind,
        }
    }

    /// A non-generic named type. An empty namespace means the global namespace.
    pub fn named(namespace: &str, name: &str) -> Self {
        Self::generic(namespace, name, Vec::new())
    }

    pub fn generic(
        namespace: &str,
        name: &str,
        type_arguments: impl IntoIterator<Item = Arc<TypeReference>>,
    ) -> Self {
        let namespace = if namespace.is_empty() {
            empty_string()
        } else {
            Arc::from(namespace)
        };
        TypeReference {
            freeze: FreezeState::new(),
            kind: TypeReferenceKind::Named {
                namespace,
                name: Arc::from(name),
                type_arguments: type_arguments.into_iter().collect(),
            },
        }
    }

    /// An array of `element` with `dimensions` dimensions (at least one).
    pub fn array(element: Arc<TypeReference>, dimensions: u32) -> Self {
        TypeReference {
            freeze: FreezeState::new(),
            kind: TypeReferenceKind::Array {
                element,
                dimensions: dimensions.max(1),
            },
        }
    }

    pub fn by_reference(element: Arc<TypeReference>) -> Self {
        TypeReference {
            freeze: FreezeState::new(),
            kind: TypeReferenceKind::ByReference { element },
        }
    }

    pub fn kind(&self) -> &TypeReferenceKind {
        &self.kind
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, TypeReferenceKind::Unknown)
    }

    /// Namespace of a named type; empty for everything else.
    pub fn namespace(&self) -> &str {
        match &self.kind {
            TypeReferenceKind::Named { namespace, .. } => namespace,
            _ => "",
        }
    }

    /// Simple name of a named type; empty for everything else.
    pub fn name(&self) -> &str {
        match &self.kind {
            TypeReferenceKind::Named { name, .. } => name,
            _ => "",
        }
    }

    pub fn type_arguments(&self) -> &[Arc<TypeReference>] {
        match &self.kind {
            TypeReferenceKind::Named { type_arguments, .. } => type_arguments,
            _ => &[],
        }
    }

    /// Element type of arrays and by-reference types.
    pub fn element_type(&self) -> Option<&Arc<TypeReference>> {
        match &self.kind {
            TypeReferenceKind::Array { element, .. }
            | TypeReferenceKind::ByReference { element } => Some(element),
            _ => None,
        }
    }
}

impl Freezable for TypeReference {
    const KIND: &'static str = "type reference";

    fn freeze_state(&self) -> &FreezeState {
        &self.freeze
    }

    fn freeze_internal(&self) {
        match &self.kind {
            TypeReferenceKind::Named { type_arguments, .. } => type_arguments.freeze_all(),
            TypeReferenceKind::Array { element, .. }
            | TypeReferenceKind::ByReference { element } => element.freeze(),
            TypeReferenceKind::Unknown | TypeReferenceKind::Null | TypeReferenceKind::Dynamic => {}
        }
    }
}

impl SupportsInterning for TypeReference {
    fn prepare_for_interning(&mut self, provider: &InterningProvider) -> Result<()> {
        self.freeze.check_preparable(Self::KIND)?;
        match &mut self.kind {
            TypeReferenceKind::Named {
                namespace,
                name,
                type_arguments,
            } => {
                provider.intern_str_handle(namespace);
                provider.intern_str_handle(name);
                provider.intern_object_list(type_arguments)?;
            }
            TypeReferenceKind::Array { element, .. }
            | TypeReferenceKind::ByReference { element } => provider.intern_shared(element)?,
            TypeReferenceKind::Unknown | TypeReferenceKind::Null | TypeReferenceKind::Dynamic => {}
        }
        Ok(())
    }

    fn hash_for_interning(&self) -> u64 {
        let fingerprint =
            Fingerprint::new(Self::KIND).value(&std::mem::discriminant(&self.kind));
        let fingerprint = match &self.kind {
            TypeReferenceKind::Named {
                namespace,
                name,
                type_arguments,
            } => fingerprint
                .identity(namespace)
                .identity(name)
                .list(type_arguments),
            TypeReferenceKind::Array {
                element,
                dimensions,
            } => fingerprint.identity(element).value(dimensions),
            TypeReferenceKind::ByReference { element } => fingerprint.identity(element),
            TypeReferenceKind::Unknown | TypeReferenceKind::Null | TypeReferenceKind::Dynamic => {
                fingerprint
            }
        };
        fingerprint.finish()
    }

    fn equals_for_interning(&self, other: &Self) -> bool {
        use TypeReferenceKind::*;
        match (&self.kind, &other.kind) {
            (Unknown, Unknown) | (Null, Null) | (Dynamic, Dynamic) => true,
            (
                Named {
                    namespace: ns_a,
                    name: name_a,
                    type_arguments: args_a,
                },
                Named {
                    namespace: ns_b,
                    name: name_b,
                    type_arguments: args_b,
                },
            ) => Arc::ptr_eq(ns_a, ns_b) && Arc::ptr_eq(name_a, name_b) && args_a.ptr_eq(args_b),
            (
                Array {
                    element: a,
                    dimensions: dims_a,
                },
                Array {
                    element: b,
                    dimensions: dims_b,
                },
            ) => Arc::ptr_eq(a, b) && dims_a == dims_b,
            (ByReference { element: a }, ByReference { element: b }) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn clone_unfrozen(&self) -> Self {
        TypeReference {
            freeze: FreezeState::new(),
            kind: self.kind.clone(),
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeReferenceKind::Unknown => f.write_str("?"),
            TypeReferenceKind::Null => f.write_str("null"),
            TypeReferenceKind::Dynamic => f.write_str("dynamic"),
            TypeReferenceKind::Named {
                namespace,
                name,
                type_arguments,
            } => {
                if !namespace.is_empty() {
                    write!(f, "{namespace}.")?;
                }
                f.write_str(name)?;
                if !type_arguments.is_empty() {
                    f.write_str("<")?;
                    for (i, argument) in type_arguments.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{argument}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeReferenceKind::Array {
                element,
                dimensions,
            } => {
                write!(f, "{element}[")?;
                for _ in 1..*dimensions {
                    f.write_str(",")?;
                }
                f.write_str("]")
            }
            TypeReferenceKind::ByReference { element } => write!(f, "{element}&"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/type_reference_tests.rs"]
mod tests;
