//! Methods, constructors and operators.

use crate::attribute::Attribute;
use crate::error::Result;
use crate::freeze::{FreezeState, Freezable};
use crate::intern::{Fingerprint, InterningProvider, SupportsInterning};
use crate::list::EntityList;
use crate::modifiers::{Accessibility, MethodModifiers};
use crate::parameter::Parameter;
use crate::shared_types::SharedTypes;
use crate::type_reference::TypeReference;
use std::fmt;
use std::sync::Arc;
use tsm_common::DomRegion;

#[derive(Debug)]
pub struct Method {
    freeze: FreezeState,
    name: Arc<str>,
    return_type: Arc<TypeReference>,
    parameters: EntityList<Parameter>,
    attributes: EntityList<Attribute>,
    /// Names of the method's own type parameters, in declaration order.
    type_parameters: Vec<Arc<str>>,
    accessibility: Accessibility,
    modifiers: MethodModifiers,
    region: DomRegion,
}

impl Method {
    pub fn new(name: &str) -> Self {
        Method {
            freeze: FreezeState::new(),
            name: Arc::from(name),
            return_type: SharedTypes::unknown(),
            parameters: EntityList::new(),
            attributes: EntityList::new(),
            type_parameters: Vec::new(),
            accessibility: Accessibility::None,
            modifiers: MethodModifiers::empty(),
            region: DomRegion::EMPTY,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> &Arc<TypeReference> {
        &self.return_type
    }

    pub fn parameters(&self) -> &EntityList<Parameter> {
        &self.parameters
    }

    pub fn attributes(&self) -> &[Arc<Attribute>] {
        &self.attributes
    }

    pub fn type_parameters(&self) -> &[Arc<str>] {
        &self.type_parameters
    }

    pub fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    pub fn modifiers(&self) -> MethodModifiers {
        self.modifiers
    }

    pub fn region(&self) -> &DomRegion {
        &self.region
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(MethodModifiers::STATIC)
    }

    #[inline]
    pub fn is_extension(&self) -> bool {
        self.modifiers.contains(MethodModifiers::EXTENSION)
    }

    pub fn set_name(&mut self, name: impl Into<Arc<str>>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.name = name.into();
        Ok(())
    }

    pub fn set_return_type(&mut self, return_type: Arc<TypeReference>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.return_type = return_type;
        Ok(())
    }

    pub fn parameters_mut(&mut self) -> Result<&mut Vec<Arc<Parameter>>> {
        self.freeze.check_mutable(Self::KIND)?;
        Ok(self.parameters.to_mut())
    }

    pub fn add_parameter(&mut self, parameter: Arc<Parameter>) -> Result<()> {
        self.parameters_mut()?.push(parameter);
        Ok(())
    }

    pub fn attributes_mut(&mut self) -> Result<&mut Vec<Arc<Attribute>>> {
        self.freeze.check_mutable(Self::KIND)?;
        Ok(self.attributes.to_mut())
    }

    pub fn add_type_parameter(&mut self, name: &str) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.type_parameters.push(Arc::from(name));
        Ok(())
    }

    pub fn set_accessibility(&mut self, accessibility: Accessibility) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.accessibility = accessibility;
        Ok(())
    }

    pub fn set_modifiers(&mut self, modifiers: MethodModifiers) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.modifiers = modifiers;
        Ok(())
    }

    pub fn set_region(&mut self, region: DomRegion) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.region = region;
        Ok(())
    }
}

impl Freezable for Method {
    const KIND: &'static str = "method";

    fn freeze_state(&self) -> &FreezeState {
        &self.freeze
    }

    fn freeze_internal(&self) {
        self.return_type.freeze();
        self.parameters.freeze_all();
        self.attributes.freeze_all();
    }
}

impl SupportsInterning for Method {
    fn prepare_for_interning(&mut self, provider: &InterningProvider) -> Result<()> {
        self.freeze.check_preparable(Self::KIND)?;
        provider.intern_str_handle(&mut self.name);
        provider.intern_shared(&mut self.return_type)?;
        provider.intern_object_list(&mut self.parameters)?;
        provider.intern_object_list(&mut self.attributes)?;
        for name in &mut self.type_parameters {
            provider.intern_str_handle(name);
        }
        self.region.pool_file_name(provider.strings());
        Ok(())
    }

    fn hash_for_interning(&self) -> u64 {
        let mut fingerprint = Fingerprint::new(Self::KIND)
            .identity(&self.name)
            .identity(&self.return_type)
            .list(&self.parameters)
            .list(&self.attributes)
            .value(&self.type_parameters.len());
        for name in &self.type_parameters {
            fingerprint = fingerprint.identity(name);
        }
        fingerprint
            .value(&self.accessibility)
            .value(&self.modifiers.bits())
            .value(&self.region)
            .finish()
    }

    fn equals_for_interning(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.name, &other.name)
            && Arc::ptr_eq(&self.return_type, &other.return_type)
            && self.parameters.ptr_eq(&other.parameters)
            && self.attributes.ptr_eq(&other.attributes)
            && self.type_parameters.len() == other.type_parameters.len()
            && self
                .type_parameters
                .iter()
                .zip(&other.type_parameters)
                .all(|(a, b)| Arc::ptr_eq(a, b))
            && self.accessibility == other.accessibility
            && self.modifiers == other.modifiers
            && self.region == other.region
    }

    fn clone_unfrozen(&self) -> Self {
        Method {
            freeze: FreezeState::new(),
            name: Arc::clone(&self.name),
            return_type: Arc::clone(&self.return_type),
            parameters: self.parameters.clone(),
            attributes: self.attributes.clone(),
            type_parameters: self.type_parameters.clone(),
            accessibility: self.accessibility,
            modifiers: self.modifiers,
            region: self.region.clone(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.type_parameters.is_empty() {
            write!(f, "<{}>", self.type_parameters.join(", "))?;
        }
        f.write_str("(")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(f, "):{}", self.return_type)
    }
}

#[cfg(test)]
#[path = "../tests/method_tests.rs"]
mod tests;
