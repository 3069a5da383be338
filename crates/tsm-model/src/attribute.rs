//! Attribute applications, e.g. `[Obsolete("use Bar", IsError = true)]`.

use crate::constant_value::ConstantValue;
use crate::error::Result;
use crate::freeze::{FreezeState, Freezable};
use crate::intern::{Fingerprint, InterningProvider, SupportsInterning};
use crate::list::EntityList;
use crate::shared_types::SharedTypes;
use crate::type_reference::TypeReference;
use std::fmt;
use std::sync::Arc;
use tsm_common::DomRegion;

/// A `Name = value` argument.
#[derive(Debug, Clone)]
pub struct NamedArgument {
    pub name: Arc<str>,
    pub value: Arc<ConstantValue>,
}

impl NamedArgument {
    pub fn new(name: &str, value: Arc<ConstantValue>) -> Self {
        NamedArgument {
            name: Arc::from(name),
            value,
        }
    }

    fn same(&self, other: &NamedArgument) -> bool {
        Arc::ptr_eq(&self.name, &other.name) && Arc::ptr_eq(&self.value, &other.value)
    }
}

#[derive(Debug)]
pub struct Attribute {
    freeze: FreezeState,
    attribute_type: Arc<TypeReference>,
    positional_arguments: EntityList<ConstantValue>,
    named_arguments: Vec<NamedArgument>,
    region: DomRegion,
}

impl Default for Attribute {
    fn default() -> Self {
        Self::new(SharedTypes::unknown())
    }
}

impl Attribute {
    pub fn new(attribute_type: Arc<TypeReference>) -> Self {
        Attribute {
            freeze: FreezeState::new(),
            attribute_type,
            positional_arguments: EntityList::new(),
            named_arguments: Vec::new(),
            region: DomRegion::EMPTY,
        }
    }

    pub fn attribute_type(&self) -> &Arc<TypeReference> {
        &self.attribute_type
    }

    pub fn positional_arguments(&self) -> &[Arc<ConstantValue>] {
        &self.positional_arguments
    }

    pub fn named_arguments(&self) -> &[NamedArgument] {
        &self.named_arguments
    }

    pub fn region(&self) -> &DomRegion {
        &self.region
    }

    pub fn set_attribute_type(&mut self, attribute_type: Arc<TypeReference>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.attribute_type = attribute_type;
        Ok(())
    }

    pub fn add_positional_argument(&mut self, value: Arc<ConstantValue>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.positional_arguments.to_mut().push(value);
        Ok(())
    }

    pub fn add_named_argument(&mut self, name: &str, value: Arc<ConstantValue>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.named_arguments.push(NamedArgument::new(name, value));
        Ok(())
    }

    pub fn set_region(&mut self, region: DomRegion) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.region = region;
        Ok(())
    }
}

impl Freezable for Attribute {
    const KIND: &'static str = "attribute";

    fn freeze_state(&self) -> &FreezeState {
        &self.freeze
    }

    fn freeze_internal(&self) {
        self.attribute_type.freeze();
        self.positional_arguments.freeze_all();
        for argument in &self.named_arguments {
            argument.value.freeze();
        }
    }
}

impl SupportsInterning for Attribute {
    fn prepare_for_interning(&mut self, provider: &InterningProvider) -> Result<()> {
        self.freeze.check_preparable(Self::KIND)?;
        provider.intern_shared(&mut self.attribute_type)?;
        provider.intern_object_list(&mut self.positional_arguments)?;
        for argument in &mut self.named_arguments {
            provider.intern_str_handle(&mut argument.name);
            provider.intern_shared(&mut argument.value)?;
        }
        self.region.pool_file_name(provider.strings());
        Ok(())
    }

    fn hash_for_interning(&self) -> u64 {
        let mut fingerprint = Fingerprint::new(Self::KIND)
            .identity(&self.attribute_type)
            .list(&self.positional_arguments)
            .value(&self.named_arguments.len());
        for argument in &self.named_arguments {
            fingerprint = fingerprint.identity(&argument.name).identity(&argument.value);
        }
        fingerprint.value(&self.region).finish()
    }

    fn equals_for_interning(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.attribute_type, &other.attribute_type)
            && self.positional_arguments.ptr_eq(&other.positional_arguments)
            && self.named_arguments.len() == other.named_arguments.len()
            && self
                .named_arguments
                .iter()
                .zip(&other.named_arguments)
                .all(|(a, b)| a.same(b))
            && self.region == other.region
    }

    fn clone_unfrozen(&self) -> Self {
        Attribute {
            freeze: FreezeState::new(),
            attribute_type: Arc::clone(&self.attribute_type),
            positional_arguments: self.positional_arguments.clone(),
            named_arguments: self.named_arguments.clone(),
            region: self.region.clone(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.attribute_type)?;
        if self.positional_arguments.is_empty() && self.named_arguments.is_empty() {
            return f.write_str("]");
        }
        f.write_str("(")?;
        let mut first = true;
        for argument in &self.positional_arguments {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{argument}")?;
        }
        for argument in &self.named_arguments {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{} = {}", argument.name, argument.value)?;
        }
        f.write_str(")]")
    }
}

#[cfg(test)]
#[path = "../tests/attribute_tests.rs"]
mod tests;
