//! Well-known type references shared by every session.
//!
//! These sentinels are frozen at construction and never change, so they are
//! safe to share process-wide. Every `InterningProvider` registers them as
//! canonical, which lets the interning fast path recognise them by identity.

use crate::type_reference::{TypeReference, TypeReferenceKind};
use once_cell::sync::Lazy;
use std::sync::Arc;

static UNKNOWN: Lazy<Arc<TypeReference>> =
    Lazy::new(|| Arc::new(TypeReference::sentinel(TypeReferenceKind::Unknown)));
static NULL: Lazy<Arc<TypeReference>> =
    Lazy::new(|| Arc::new(TypeReference::sentinel(TypeReferenceKind::Null)));
static DYNAMIC: Lazy<Arc<TypeReference>> =
    Lazy::new(|| Arc::new(TypeReference::sentinel(TypeReferenceKind::Dynamic)));

pub struct SharedTypes;

impl SharedTypes {
    /// A type that could not be determined. The default type of every
    /// freshly constructed member.
    #[inline]
    pub fn unknown() -> Arc<TypeReference> {
        Arc::clone(&UNKNOWN)
    }

    /// The type of the `null` literal.
    #[inline]
    pub fn null() -> Arc<TypeReference> {
        Arc::clone(&NULL)
    }

    #[inline]
    pub fn dynamic() -> Arc<TypeReference> {
        Arc::clone(&DYNAMIC)
    }

    pub fn all() -> [Arc<TypeReference>; 3] {
        [Self::unknown(), Self::null(), Self::dynamic()]
    }
}
