//! Type definitions: the aggregates that own methods, parameters and the
//! rest of a type's member graph.
//!
//! A definition is unique per declaration, so it is never interned itself.
//! `intern_members` canonicalizes what it owns instead, and `freeze` walks the
//! whole graph: definition → methods → parameters → types, attributes and
//! default values.

use crate::attribute::Attribute;
use crate::error::Result;
use crate::freeze::{FreezeState, Freezable};
use crate::intern::InterningProvider;
use crate::list::EntityList;
use crate::method::Method;
use crate::modifiers::{Accessibility, TypeKind};
use crate::type_reference::TypeReference;
use std::fmt;
use std::sync::Arc;
use tracing::trace;
use tsm_common::{DomRegion, empty_string};

#[derive(Debug)]
pub struct TypeDefinition {
    freeze: FreezeState,
    namespace: Arc<str>,
    name: Arc<str>,
    kind: TypeKind,
    accessibility: Accessibility,
    base_types: EntityList<TypeReference>,
    methods: EntityList<Method>,
    attributes: EntityList<Attribute>,
    region: DomRegion,
}

impl TypeDefinition {
    pub fn new(namespace: &str, name: &str, kind: TypeKind) -> Self {
        let namespace = if namespace.is_empty() {
            empty_string()
        } else {
            Arc::from(namespace)
        };
        TypeDefinition {
            freeze: FreezeState::new(),
            namespace,
            name: Arc::from(name),
            kind,
            accessibility: Accessibility::None,
            base_types: EntityList::new(),
            methods: EntityList::new(),
            attributes: EntityList::new(),
            region: DomRegion::EMPTY,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Namespace.Name`, or just `Name` in the global namespace.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.to_string()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    pub fn base_types(&self) -> &[Arc<TypeReference>] {
        &self.base_types
    }

    pub fn methods(&self) -> &[Arc<Method>] {
        &self.methods
    }

    /// Overloads named `name`, in declaration order.
    pub fn find_methods<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<Method>> {
        self.methods.iter().filter(move |method| method.name() == name)
    }

    pub fn attributes(&self) -> &[Arc<Attribute>] {
        &self.attributes
    }

    pub fn region(&self) -> &DomRegion {
        &self.region
    }

    pub fn set_kind(&mut self, kind: TypeKind) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.kind = kind;
        Ok(())
    }

    pub fn set_accessibility(&mut self, accessibility: Accessibility) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.accessibility = accessibility;
        Ok(())
    }

    pub fn add_base_type(&mut self, base_type: Arc<TypeReference>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.base_types.to_mut().push(base_type);
        Ok(())
    }

    pub fn add_method(&mut self, method: Arc<Method>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.methods.to_mut().push(method);
        Ok(())
    }

    pub fn add_attribute(&mut self, attribute: Arc<Attribute>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.attributes.to_mut().push(attribute);
        Ok(())
    }

    pub fn set_region(&mut self, region: DomRegion) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.region = region;
        Ok(())
    }

    /// Canonicalize everything this definition owns.
    ///
    /// Must run before the definition is frozen; afterwards it fails with
    /// `ContractViolation::PreparedAfterFreeze`.
    pub fn intern_members(&mut self, provider: &InterningProvider) -> Result<()> {
        self.freeze.check_preparable(Self::KIND)?;
        provider.intern_str_handle(&mut self.namespace);
        provider.intern_str_handle(&mut self.name);
        provider.intern_object_list(&mut self.base_types)?;
        provider.intern_object_list(&mut self.methods)?;
        provider.intern_object_list(&mut self.attributes)?;
        self.region.pool_file_name(provider.strings());
        trace!(
            provider_id = provider.id(),
            type_name = %self.full_name(),
            methods = self.methods.len(),
            "intern_members"
        );
        Ok(())
    }
}

impl Freezable for TypeDefinition {
    const KIND: &'static str = "type definition";

    fn freeze_state(&self) -> &FreezeState {
        &self.freeze
    }

    fn freeze_internal(&self) {
        trace!(
            type_name = %self.full_name(),
            methods = self.methods.len(),
            "freezing type definition"
        );
        self.base_types.freeze_all();
        self.methods.freeze_all();
        self.attributes.freeze_all();
    }
}

impl fmt::Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.accessibility.keyword() {
            write!(f, "{keyword} ")?;
        }
        write!(f, "{} {}", self.kind, self.full_name())
    }
}

#[cfg(test)]
#[path = "../tests/type_definition_tests.rs"]
mod tests;
