//! Freezable, Interned Type-System Entities
//!
//! This crate implements the in-memory entity model a code-analysis tool
//! builds from parsed source: type definitions, methods, parameters,
//! attributes, constant values and type references.
//!
//! Every entity follows two protocols:
//!
//! - **Freeze**: entities start mutable while the parser fills them in.
//!   `Freezable::freeze` makes an entity and everything it owns immutable,
//!   after which it can be read from any number of threads without locks.
//! - **Interning**: `InterningProvider` replaces structurally equal entities
//!   with one canonical `Arc`, so thousands of `(string name, int count)`
//!   parameters share a single instance.
//!
//! Key properties:
//! - Mutators take `&mut self` and fail with `ModelError::FrozenMutation`
//!   once the entity is frozen
//! - Interned sub-entities compare by identity (`Arc::ptr_eq`) in O(1)
//! - The provider is an explicit session object; dropping it (and the
//!   aggregates built with it) discards the whole snapshot
mod error;
pub mod freeze;
pub mod intern;
pub mod list;
pub mod modifiers;

pub mod attribute;
pub mod constant_value;
pub mod method;
pub mod parameter;
pub mod shared_types;
pub mod type_definition;
pub mod type_reference;

pub use attribute::{Attribute, NamedArgument};
pub use constant_value::{ConstantLiteral, ConstantValue};
pub use error::{ContractViolation, ModelError, Result};
pub use freeze::{FreezeState, Freezable};
pub use intern::{
    Fingerprint, InternStats, InterningOptions, InterningProvider, SupportsInterning,
    check_interning_contract,
};
pub use list::EntityList;
pub use method::Method;
pub use modifiers::{Accessibility, MethodModifiers, ParameterFlags, TypeKind};
pub use parameter::Parameter;
pub use shared_types::SharedTypes;
pub use type_definition::TypeDefinition;
pub use type_reference::{TypeReference, TypeReferenceKind};

pub use tsm_common::{DomRegion, TextLocation};
