//! Method and delegate parameters.
//!
//! `Parameter` is the most numerous entity in a typical code model: every
//! method signature holds a few, and most of them are shaped alike
//! (`string name`, `int count`, `CancellationToken cancellationToken`).
//! They are built mutable by the parser and then interned, so identical
//! parameters share one frozen instance.
//!
//! Every setter is guarded: once the parameter is frozen it fails with
//! `ModelError::FrozenMutation` and leaves the parameter unchanged.

use crate::attribute::Attribute;
use crate::constant_value::ConstantValue;
use crate::error::Result;
use crate::freeze::{FreezeState, Freezable};
use crate::intern::{Fingerprint, InterningProvider, SupportsInterning};
use crate::list::EntityList;
use crate::modifiers::ParameterFlags;
use crate::shared_types::SharedTypes;
use crate::type_reference::TypeReference;
use std::fmt;
use std::sync::Arc;
use tsm_common::{DomRegion, empty_string};

#[derive(Debug)]
pub struct Parameter {
    freeze: FreezeState,
    name: Arc<str>,
    ty: Arc<TypeReference>,
    attributes: EntityList<Attribute>,
    default_value: Option<Arc<ConstantValue>>,
    region: DomRegion,
    flags: ParameterFlags,
}

impl Default for Parameter {
    fn default() -> Self {
        Self::new()
    }
}

impl Parameter {
    /// An unnamed parameter of unknown type, with no attributes, no default
    /// value, no region and no modifiers.
    pub fn new() -> Self {
        Parameter {
            freeze: FreezeState::new(),
            name: empty_string(),
            ty: SharedTypes::unknown(),
            attributes: EntityList::new(),
            default_value: None,
            region: DomRegion::EMPTY,
            flags: ParameterFlags::empty(),
        }
    }

    /// Shorthand for a parameter with a name and type.
    pub fn with_type(name: &str, ty: Arc<TypeReference>) -> Self {
        let mut parameter = Self::new();
        // Never frozen yet, so the setters' guard has nothing to reject.
        parameter.name = Arc::from(name);
        parameter.ty = ty;
        parameter
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<Arc<str>>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.name = name.into();
        Ok(())
    }

    /// The parameter type; `SharedTypes::unknown()` until set.
    pub fn ty(&self) -> &Arc<TypeReference> {
        &self.ty
    }

    pub fn set_type(&mut self, ty: Arc<TypeReference>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.ty = ty;
        Ok(())
    }

    pub fn attributes(&self) -> &[Arc<Attribute>] {
        &self.attributes
    }

    /// Mutable access to the attribute list. Nothing is allocated until the
    /// first push.
    pub fn attributes_mut(&mut self) -> Result<&mut Vec<Arc<Attribute>>> {
        self.freeze.check_mutable(Self::KIND)?;
        Ok(self.attributes.to_mut())
    }

    pub fn add_attribute(&mut self, attribute: Arc<Attribute>) -> Result<()> {
        self.attributes_mut()?.push(attribute);
        Ok(())
    }

    pub fn default_value(&self) -> Option<&Arc<ConstantValue>> {
        self.default_value.as_ref()
    }

    /// Setting `None` makes the parameter required again.
    pub fn set_default_value(&mut self, value: Option<Arc<ConstantValue>>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.default_value = value;
        Ok(())
    }

    pub fn region(&self) -> &DomRegion {
        &self.region
    }

    pub fn set_region(&mut self, region: DomRegion) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.region = region;
        Ok(())
    }

    #[inline]
    pub fn flags(&self) -> ParameterFlags {
        self.flags
    }

    #[inline]
    pub fn is_ref(&self) -> bool {
        self.flags.contains(ParameterFlags::REF)
    }

    #[inline]
    pub fn is_out(&self) -> bool {
        self.flags.contains(ParameterFlags::OUT)
    }

    #[inline]
    pub fn is_params(&self) -> bool {
        self.flags.contains(ParameterFlags::PARAMS)
    }

    pub fn set_ref(&mut self, value: bool) -> Result<()> {
        self.set_flag(ParameterFlags::REF, value)
    }

    pub fn set_out(&mut self, value: bool) -> Result<()> {
        self.set_flag(ParameterFlags::OUT, value)
    }

    pub fn set_params(&mut self, value: bool) -> Result<()> {
        self.set_flag(ParameterFlags::PARAMS, value)
    }

    fn set_flag(&mut self, flag: ParameterFlags, value: bool) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.flags.set(flag, value);
        Ok(())
    }

    /// Derived from the default value; there is no separate flag.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.default_value.is_some()
    }
}

impl Freezable for Parameter {
    const KIND: &'static str = "parameter";

    fn freeze_state(&self) -> &FreezeState {
        &self.freeze
    }

    fn freeze_internal(&self) {
        self.ty.freeze();
        self.attributes.freeze_all();
        if let Some(value) = &self.default_value {
            value.freeze();
        }
    }
}

impl SupportsInterning for Parameter {
    fn prepare_for_interning(&mut self, provider: &InterningProvider) -> Result<()> {
        self.freeze.check_preparable(Self::KIND)?;
        provider.intern_str_handle(&mut self.name);
        provider.intern_shared(&mut self.ty)?;
        provider.intern_object_list(&mut self.attributes)?;
        provider.intern_optional(&mut self.default_value)?;
        self.region.pool_file_name(provider.strings());
        Ok(())
    }

    fn hash_for_interning(&self) -> u64 {
        Fingerprint::new(Self::KIND)
            .identity(&self.name)
            .identity(&self.ty)
            .list(&self.attributes)
            .optional(self.default_value.as_ref())
            .value(&self.region)
            .value(&self.flags.bits())
            .finish()
    }

    fn equals_for_interning(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.name, &other.name)
            && Arc::ptr_eq(&self.ty, &other.ty)
            && self.attributes.ptr_eq(&other.attributes)
            && match (&self.default_value, &other.default_value) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
            && self.region == other.region
            && self.flags == other.flags
    }

    fn clone_unfrozen(&self) -> Self {
        Parameter {
            freeze: FreezeState::new(),
            name: Arc::clone(&self.name),
            ty: Arc::clone(&self.ty),
            attributes: self.attributes.clone(),
            default_value: self.default_value.clone(),
            region: self.region.clone(),
            flags: self.flags,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for keyword in self.flags.keywords() {
            write!(f, "{keyword} ")?;
        }
        write!(f, "{}:{}", self.name, self.ty)?;
        if let Some(value) = &self.default_value {
            write!(f, " = {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/parameter_tests.rs"]
mod tests;
