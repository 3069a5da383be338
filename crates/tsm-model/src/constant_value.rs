//! Compile-time constant values: parameter defaults and attribute arguments.

use crate::error::Result;
use crate::freeze::{FreezeState, Freezable};
use crate::intern::{Fingerprint, InterningProvider, SupportsInterning};
use crate::shared_types::SharedTypes;
use crate::type_reference::TypeReference;
use std::fmt;
use std::sync::Arc;

/// The literal payload of a constant.
#[derive(Debug, Clone)]
pub enum ConstantLiteral {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    String(Arc<str>),
}

impl ConstantLiteral {
    /// Identity-based equality: floats by bit pattern, strings by pointer
    /// (they are pooled before comparison).
    fn same(&self, other: &ConstantLiteral) -> bool {
        use ConstantLiteral::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (UInt(a), UInt(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Char(a), Char(b)) => a == b,
            (String(a), String(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn fingerprint(&self, fingerprint: Fingerprint) -> Fingerprint {
        let fingerprint = fingerprint.value(&std::mem::discriminant(self));
        match self {
            ConstantLiteral::Null => fingerprint,
            ConstantLiteral::Bool(value) => fingerprint.value(value),
            ConstantLiteral::Int(value) => fingerprint.value(value),
            ConstantLiteral::UInt(value) => fingerprint.value(value),
            ConstantLiteral::Float(value) => fingerprint.value(&value.to_bits()),
            ConstantLiteral::Char(value) => fingerprint.value(value),
            ConstantLiteral::String(value) => fingerprint.identity(value),
        }
    }
}

impl fmt::Display for ConstantLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantLiteral::Null => f.write_str("null"),
            ConstantLiteral::Bool(value) => write!(f, "{value}"),
            ConstantLiteral::Int(value) => write!(f, "{value}"),
            ConstantLiteral::UInt(value) => write!(f, "{value}"),
            ConstantLiteral::Float(value) => write!(f, "{value}"),
            ConstantLiteral::Char(value) => write!(f, "'{}'", value.escape_default()),
            ConstantLiteral::String(value) => write!(f, "{:?}", &**value),
        }
    }
}

/// A typed constant, e.g. the `5` in `int count = 5`.
#[derive(Debug)]
pub struct ConstantValue {
    freeze: FreezeState,
    ty: Arc<TypeReference>,
    literal: ConstantLiteral,
}

impl ConstantValue {
    pub fn new(ty: Arc<TypeReference>, literal: ConstantLiteral) -> Self {
        ConstantValue {
            freeze: FreezeState::new(),
            ty,
            literal,
        }
    }

    /// The `null` constant, typed with `SharedTypes::null`.
    pub fn null() -> Self {
        Self::new(SharedTypes::null(), ConstantLiteral::Null)
    }

    pub fn ty(&self) -> &Arc<TypeReference> {
        &self.ty
    }

    pub fn literal(&self) -> &ConstantLiteral {
        &self.literal
    }

    /// Fails with `ModelError::FrozenMutation` once frozen.
    pub fn set_type(&mut self, ty: Arc<TypeReference>) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.ty = ty;
        Ok(())
    }

    /// Fails with `ModelError::FrozenMutation` once frozen.
    pub fn set_literal(&mut self, literal: ConstantLiteral) -> Result<()> {
        self.freeze.check_mutable(Self::KIND)?;
        self.literal = literal;
        Ok(())
    }
}

impl Freezable for ConstantValue {
    const KIND: &'static str = "constant value";

    fn freeze_state(&self) -> &FreezeState {
        &self.freeze
    }

    fn freeze_internal(&self) {
        self.ty.freeze();
    }
}

impl SupportsInterning for ConstantValue {
    fn prepare_for_interning(&mut self, provider: &InterningProvider) -> Result<()> {
        self.freeze.check_preparable(Self::KIND)?;
        provider.intern_shared(&mut self.ty)?;
        if let ConstantLiteral::String(value) = &mut self.literal {
            provider.intern_str_handle(value);
        }
        Ok(())
    }

    fn hash_for_interning(&self) -> u64 {
        let fingerprint = Fingerprint::new(Self::KIND).identity(&self.ty);
        self.literal.fingerprint(fingerprint).finish()
    }

    fn equals_for_interning(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ty, &other.ty) && self.literal.same(&other.literal)
    }

    fn clone_unfrozen(&self) -> Self {
        Self::new(Arc::clone(&self.ty), self.literal.clone())
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.literal, f)
    }
}

#[cfg(test)]
#[path = "../tests/constant_value_tests.rs"]
mod tests;
