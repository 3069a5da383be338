//! Freeze lifecycle shared by every entity kind.
//!
//! Entities are built mutable and frozen once complete. Freezing is the only
//! synchronization point of the model: an entity's fields are written by the
//! thread that builds it, the frozen flag is published with `Release`
//! ordering, and readers that observe `is_frozen() == true` (with `Acquire`)
//! see every write made before the freeze.
//!
//! Each entity embeds a `FreezeState` and implements `Freezable`; there is no
//! base type to inherit from.

use crate::error::{ContractViolation, ModelError, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Monotonic mutable → frozen flag embedded in every entity.
#[derive(Default)]
pub struct FreezeState(AtomicBool);

impl FreezeState {
    /// A mutable state.
    pub const fn new() -> Self {
        FreezeState(AtomicBool::new(false))
    }

    /// A state that is frozen from construction on.
    /// Used for the well-known shared sentinels.
    pub const fn frozen() -> Self {
        FreezeState(AtomicBool::new(true))
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Publish the frozen flag. There is no way back.
    #[inline]
    pub fn mark_frozen(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// The mutation guard. Every entity mutator calls this before touching
    /// any field.
    #[inline]
    pub fn check_mutable(&self, entity: &'static str) -> Result<()> {
        if self.is_frozen() {
            return Err(ModelError::FrozenMutation { entity });
        }
        Ok(())
    }

    /// Guard for `prepare_for_interning`: interning rewrites fields, so it
    /// is only allowed before the freeze.
    #[inline]
    pub fn check_preparable(&self, entity: &'static str) -> Result<()> {
        if self.is_frozen() {
            return Err(ContractViolation::PreparedAfterFreeze { entity }.into());
        }
        Ok(())
    }
}

impl fmt::Debug for FreezeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_frozen() { "frozen" } else { "mutable" })
    }
}

/// The freeze protocol.
///
/// Implementors provide `freeze_state` and, when they own sub-entities,
/// `freeze_internal`. The provided `freeze` method keeps the ordering
/// invariant: children first, then the entity's own flag, so a reader that
/// sees a frozen aggregate never reaches a mutable child.
pub trait Freezable {
    /// Human-readable entity kind, used in error messages and traces.
    const KIND: &'static str;

    fn freeze_state(&self) -> &FreezeState;

    /// Freeze every sub-entity this entity holds.
    fn freeze_internal(&self) {}

    #[inline]
    fn is_frozen(&self) -> bool {
        self.freeze_state().is_frozen()
    }

    /// Freeze this entity and, transitively, everything it owns.
    /// Freezing a frozen entity does nothing.
    fn freeze(&self) {
        if self.is_frozen() {
            return;
        }
        self.freeze_internal();
        self.freeze_state().mark_frozen();
    }
}

#[cfg(test)]
#[path = "../tests/freeze_tests.rs"]
mod tests;
