//! Errors raised while building the entity model.
//!
//! All of these are local and synchronous: the parser treats them as "this
//! construction step was invalid" and abandons the entity. Nothing here is
//! transient or worth retrying.

use thiserror::Error;

pub type Result<T, E = ModelError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A mutator ran on an entity that is already frozen.
    /// The entity is left exactly as it was.
    #[error("frozen {entity} mutated")]
    FrozenMutation { entity: &'static str },

    /// The interning protocol was used incorrectly.
    #[error("interning contract violated: {0}")]
    InternContract(#[from] ContractViolation),
}

/// Internal consistency failures of the interning protocol.
///
/// These indicate programming errors in an entity implementation or in the
/// order the parser calls the provider, not bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// `prepare_for_interning` reached an entity that was already frozen.
    #[error("{entity} was prepared for interning after it was frozen")]
    PreparedAfterFreeze { entity: &'static str },

    /// Two entities compare equal for interning but hash differently.
    #[error("equal {entity} values hash to {left:#018x} and {right:#018x}")]
    HashMismatch {
        entity: &'static str,
        left: u64,
        right: u64,
    },
}
