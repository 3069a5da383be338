//! Entity interning for structural deduplication.
//!
//! This module implements the interning provider that collapses structurally
//! equal entities into one canonical `Arc`.
//!
//! Benefits:
//! - Memory efficient (each unique parameter, type reference or constant is
//!   stored once per analysis session)
//! - O(1) sub-entity equality: children are canonical, so parents compare
//!   them with `Arc::ptr_eq`
//! - Shared canonical lists: methods with identical parameter sequences point
//!   at the same `Arc<[Arc<Parameter>]>`
//!
//! ## Ordering
//!
//! An entity's fingerprint is built from the identities of its children, so
//! children must be canonical before the parent is hashed. The provider
//! enforces this by calling `SupportsInterning::prepare_for_interning` (which
//! canonicalizes the children) before it hashes the parent.
//!
//! ## Concurrency
//!
//! The lookup-or-insert of a fingerprint happens under the `DashMap` shard
//! lock for that key, so threads racing to intern equal entities agree on a
//! single canonical instance.

use crate::error::{ContractViolation, Result};
use crate::freeze::Freezable;
use crate::list::EntityList;
use crate::shared_types::SharedTypes;
use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHasher};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::{debug, trace};
use tsm_common::StringPool;
use tsm_common::limits::{BUCKET_INLINE, DEFAULT_EXPECTED_ENTITIES};

/// Global counter for assigning unique ids to providers.
/// Only used to tell sessions apart in traces.
static NEXT_PROVIDER_ID: AtomicU64 = AtomicU64::new(1);

type BucketKey = (TypeId, u64);
type CanonicalEntity = Arc<dyn Any + Send + Sync>;
type CanonicalList = Box<dyn Any + Send + Sync>;
type Bucket<V> = SmallVec<[V; BUCKET_INLINE]>;

// =============================================================================
// SupportsInterning - entity side of the protocol
// =============================================================================

/// Entities that can be deduplicated by an `InterningProvider`.
///
/// The three methods must agree: if `a.equals_for_interning(&b)` then
/// `a.hash_for_interning() == b.hash_for_interning()`. Both only look at the
/// entity's own fields and compare children by identity, which is sound
/// because `prepare_for_interning` has already made those children canonical.
pub trait SupportsInterning: Freezable + Any + Send + Sync + Sized {
    /// Replace every string, child entity and child list with its canonical
    /// instance from `provider`.
    ///
    /// Fails with `ContractViolation::PreparedAfterFreeze` on frozen entities.
    fn prepare_for_interning(&mut self, provider: &InterningProvider) -> Result<()>;

    fn hash_for_interning(&self) -> u64;

    fn equals_for_interning(&self, other: &Self) -> bool;

    /// A mutable copy of this entity holding the same child handles.
    ///
    /// The provider prepares the copy when the original is shared by other
    /// holders and therefore cannot be rewritten in place.
    fn clone_unfrozen(&self) -> Self;
}

/// Verify that two entities honour the hash/equality contract.
///
/// Meant for invariant checks in tests; the provider itself never sees a
/// violation because equal entities that hash apart land in different
/// buckets and simply fail to deduplicate.
pub fn check_interning_contract<T: SupportsInterning>(a: &T, b: &T) -> Result<()> {
    if !a.equals_for_interning(b) {
        return Ok(());
    }
    let (left, right) = (a.hash_for_interning(), b.hash_for_interning());
    if left != right {
        return Err(ContractViolation::HashMismatch {
            entity: T::KIND,
            left,
            right,
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Fingerprint - hash builder for hash_for_interning
// =============================================================================

/// Accumulates an interning hash from canonical handles and plain values.
///
/// Handles are hashed by address, matching the identity comparison used by
/// `equals_for_interning`.
pub struct Fingerprint(FxHasher);

impl Fingerprint {
    /// Start a fingerprint for entity kind `kind`.
    pub fn new(kind: &'static str) -> Self {
        let mut hasher = FxHasher::default();
        kind.hash(&mut hasher);
        Fingerprint(hasher)
    }

    #[inline]
    pub fn identity<T: ?Sized>(mut self, handle: &Arc<T>) -> Self {
        (Arc::as_ptr(handle).cast::<()>() as usize).hash(&mut self.0);
        self
    }

    #[inline]
    pub fn optional<T>(mut self, handle: Option<&Arc<T>>) -> Self {
        match handle {
            Some(handle) => self.identity(handle),
            None => {
                0usize.hash(&mut self.0);
                self
            }
        }
    }

    #[inline]
    pub fn list<T>(mut self, list: &EntityList<T>) -> Self {
        list.identity().hash(&mut self.0);
        list.len().hash(&mut self.0);
        self
    }

    #[inline]
    pub fn value<V: Hash + ?Sized>(mut self, value: &V) -> Self {
        value.hash(&mut self.0);
        self
    }

    #[inline]
    pub fn finish(self) -> u64 {
        self.0.finish()
    }
}

/// Pointer identity for any shared handle, thin or fat.
#[inline]
fn same_handle<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

fn list_fingerprint<T>(items: &[Arc<T>]) -> u64 {
    let mut hasher = FxHasher::default();
    items.len().hash(&mut hasher);
    for item in items {
        (Arc::as_ptr(item) as usize).hash(&mut hasher);
    }
    hasher.finish()
}

// =============================================================================
// Options and statistics
// =============================================================================

/// Provider configuration.
///
/// Deserializable so a host can keep it next to its other analysis settings:
///
/// ```json
/// { "preInternCommon": true, "expectedEntities": 4096 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterningOptions {
    /// Pre-pool common namespace, type and member names.
    pub pre_intern_common: bool,
    /// Capacity hint for the canonical entity table.
    pub expected_entities: usize,
}

impl Default for InterningOptions {
    fn default() -> Self {
        InterningOptions {
            pre_intern_common: true,
            expected_entities: DEFAULT_EXPECTED_ENTITIES,
        }
    }
}

/// Snapshot of a provider's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InternStats {
    /// Canonical entities, including the shared sentinels.
    pub entities: usize,
    /// Canonical non-empty lists.
    pub lists: usize,
    /// Pooled strings, including the empty string.
    pub strings: usize,
    /// Lookups answered with an existing canonical entity or list.
    pub hits: u64,
    /// Lookups that registered a new canonical entity or list.
    pub misses: u64,
}

// =============================================================================
// InterningProvider
// =============================================================================

/// Session-scoped interning table.
///
/// Create one per analysis pass and pass it explicitly to everything that
/// interns; drop it together with the snapshot it built. Canonical entities
/// stay alive as long as the provider or any entity references them.
///
/// ## Usage
///
/// ```
/// use std::sync::Arc;
/// use tsm_model::{InterningProvider, Parameter, TypeReference};
///
/// let provider = InterningProvider::new();
/// let make = || {
///     let mut p = Parameter::new();
///     p.set_name("count").unwrap();
///     p.set_type(Arc::new(TypeReference::named("System", "Int32"))).unwrap();
///     p
/// };
/// let a = provider.intern_object(make()).unwrap();
/// let b = provider.intern_object(make()).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct InterningProvider {
    provider_id: u64,
    strings: StringPool,
    entities: DashMap<BucketKey, Bucket<CanonicalEntity>, FxBuildHasher>,
    lists: DashMap<BucketKey, Bucket<CanonicalList>, FxBuildHasher>,
    entity_count: AtomicUsize,
    list_count: AtomicUsize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for InterningProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InterningProvider {
    pub fn new() -> Self {
        Self::with_options(InterningOptions::default())
    }

    pub fn with_options(options: InterningOptions) -> Self {
        let provider_id = NEXT_PROVIDER_ID.fetch_add(1, Ordering::Relaxed);
        let provider = InterningProvider {
            provider_id,
            strings: StringPool::new(),
            entities: DashMap::with_capacity_and_hasher(
                options.expected_entities,
                FxBuildHasher,
            ),
            lists: DashMap::with_hasher(FxBuildHasher),
            entity_count: AtomicUsize::new(0),
            list_count: AtomicUsize::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        };
        if options.pre_intern_common {
            provider.strings.intern_common();
        }
        for sentinel in SharedTypes::all() {
            provider.register(sentinel);
        }
        debug!(
            provider_id,
            pre_intern_common = options.pre_intern_common,
            expected_entities = options.expected_entities,
            "InterningProvider::with_options"
        );
        provider
    }

    /// Session id, for correlating traces.
    pub fn id(&self) -> u64 {
        self.provider_id
    }

    /// The provider's string pool.
    pub fn strings(&self) -> &StringPool {
        &self.strings
    }

    // =========================================================================
    // Strings
    // =========================================================================

    /// Return the canonical instance of an equal string.
    #[inline]
    pub fn intern_string(&self, s: &str) -> Arc<str> {
        self.strings.intern(s)
    }

    /// Canonicalize a string handle in place.
    #[inline]
    pub fn intern_str_handle(&self, s: &mut Arc<str>) {
        *s = self.strings.intern_arc(s);
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Intern an owned entity.
    ///
    /// Prepares it, then either returns the existing canonical instance (and
    /// drops `entity`) or registers `entity` as the canonical instance for its
    /// fingerprint.
    pub fn intern_object<T: SupportsInterning>(&self, entity: T) -> Result<Arc<T>> {
        let mut handle = Arc::new(entity);
        self.intern_shared(&mut handle)?;
        Ok(handle)
    }

    /// Canonicalize an optional handle in place. `None` stays `None`.
    pub fn intern_optional<T: SupportsInterning>(&self, slot: &mut Option<Arc<T>>) -> Result<()> {
        match slot {
            Some(handle) => self.intern_shared(handle),
            None => Ok(()),
        }
    }

    /// Canonicalize a shared handle in place.
    ///
    /// - A handle that already is the canonical instance is left alone.
    /// - A frozen, non-canonical entity can no longer be prepared and is a
    ///   contract violation.
    /// - A uniquely held handle is prepared in place, then looked up or
    ///   registered.
    /// - A handle shared with other holders is left to them: a private copy
    ///   is prepared and looked up instead, and `handle` is pointed at the
    ///   result. On error `handle` is unchanged.
    pub fn intern_shared<T: SupportsInterning>(&self, handle: &mut Arc<T>) -> Result<()> {
        if self.is_canonical(handle) {
            return Ok(());
        }
        if handle.is_frozen() {
            return Err(ContractViolation::PreparedAfterFreeze { entity: T::KIND }.into());
        }

        if let Some(entity) = Arc::get_mut(handle) {
            entity.prepare_for_interning(self)?;
        } else {
            trace!(
                provider_id = self.provider_id,
                kind = T::KIND,
                "intern_shared: handle is shared, preparing a private copy"
            );
            let mut copy = handle.clone_unfrozen();
            copy.prepare_for_interning(self)?;
            *handle = Arc::new(copy);
        }

        let hash = handle.hash_for_interning();
        let key = (TypeId::of::<T>(), hash);

        // Lookup and insert happen under the same shard lock.
        let mut bucket = self.entities.entry(key).or_default();
        let candidate: &T = handle;
        let found = bucket.iter().find_map(|entry| {
            let existing = (**entry).downcast_ref::<T>()?;
            if existing.equals_for_interning(candidate) {
                Arc::clone(entry).downcast::<T>().ok()
            } else {
                None
            }
        });

        match found {
            Some(canonical) => {
                drop(bucket);
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(
                    provider_id = self.provider_id,
                    kind = T::KIND,
                    hash,
                    "intern: reused canonical entity"
                );
                *handle = canonical;
            }
            None => {
                bucket.push(Arc::clone(handle) as CanonicalEntity);
                drop(bucket);
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.entity_count.fetch_add(1, Ordering::Relaxed);
                trace!(
                    provider_id = self.provider_id,
                    kind = T::KIND,
                    hash,
                    "intern: registered canonical entity"
                );
            }
        }
        Ok(())
    }

    /// Canonicalize a list in place: every element first, then the list
    /// itself by the identity sequence of its elements.
    ///
    /// Empty lists are left unallocated. On error `list` is unchanged.
    pub fn intern_object_list<T: SupportsInterning>(&self, list: &mut EntityList<T>) -> Result<()> {
        if list.is_empty() || self.is_canonical_list(list) {
            return Ok(());
        }

        let mut canonical = list.as_slice().to_vec();
        for item in &mut canonical {
            self.intern_shared(item)?;
        }

        let items = canonical.as_slice();
        let hash = list_fingerprint(items);
        let key = (TypeId::of::<T>(), hash);

        let mut bucket = self.lists.entry(key).or_default();
        let found = bucket.iter().find_map(|entry| {
            let existing = (**entry).downcast_ref::<Arc<[Arc<T>]>>()?;
            let same = existing.len() == items.len()
                && existing.iter().zip(items).all(|(a, b)| Arc::ptr_eq(a, b));
            same.then(|| Arc::clone(existing))
        });

        let sealed = match found {
            Some(sealed) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                sealed
            }
            None => {
                let sealed: Arc<[Arc<T>]> = Arc::from(items);
                bucket.push(Box::new(Arc::clone(&sealed)) as CanonicalList);
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.list_count.fetch_add(1, Ordering::Relaxed);
                sealed
            }
        };
        drop(bucket);

        trace!(
            provider_id = self.provider_id,
            kind = T::KIND,
            len = sealed.len(),
            "intern_object_list"
        );
        *list = EntityList::from_sealed(sealed);
        Ok(())
    }

    /// Register a frozen entity as canonical without preparing it.
    fn register<T: SupportsInterning>(&self, handle: Arc<T>) {
        let key = (TypeId::of::<T>(), handle.hash_for_interning());
        let mut bucket = self.entities.entry(key).or_default();
        if bucket.iter().any(|entry| same_handle(entry, &handle)) {
            return;
        }
        bucket.push(handle as CanonicalEntity);
        self.entity_count.fetch_add(1, Ordering::Relaxed);
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Whether `handle` is the canonical instance registered for its fingerprint.
    pub fn is_canonical<T: SupportsInterning>(&self, handle: &Arc<T>) -> bool {
        // The provider keeps its own reference to every canonical entity.
        if Arc::strong_count(handle) < 2 {
            return false;
        }
        let key = (TypeId::of::<T>(), handle.hash_for_interning());
        self.entities
            .get(&key)
            .is_some_and(|bucket| bucket.iter().any(|entry| same_handle(entry, handle)))
    }

    /// Whether `list` is a canonical list registered by this provider.
    pub fn is_canonical_list<T: SupportsInterning>(&self, list: &EntityList<T>) -> bool {
        if !list.is_sealed() {
            return false;
        }
        let items = list.as_slice();
        let key = (TypeId::of::<T>(), list_fingerprint(items));
        self.lists.get(&key).is_some_and(|bucket| {
            bucket.iter().any(|entry| {
                (**entry)
                    .downcast_ref::<Arc<[Arc<T>]>>()
                    .is_some_and(|sealed| std::ptr::eq(sealed.as_ptr(), items.as_ptr()))
            })
        })
    }

    /// Number of canonical entities equal to `entity` (0 or 1).
    ///
    /// `entity` should already be prepared, i.e. hold canonical children;
    /// otherwise identity comparison of its children finds nothing.
    pub fn canonical_count<T: SupportsInterning>(&self, entity: &T) -> usize {
        let key = (TypeId::of::<T>(), entity.hash_for_interning());
        self.entities.get(&key).map_or(0, |bucket| {
            bucket
                .iter()
                .filter_map(|entry| (**entry).downcast_ref::<T>())
                .filter(|existing| existing.equals_for_interning(entity))
                .count()
        })
    }

    /// Number of canonical entities, including the shared sentinels.
    pub fn len(&self) -> usize {
        self.entity_count.load(Ordering::Relaxed)
    }

    /// Check if the provider holds nothing but the shared sentinels.
    pub fn is_empty(&self) -> bool {
        self.len() <= SharedTypes::all().len()
    }

    /// Number of canonical non-empty lists.
    pub fn list_count(&self) -> usize {
        self.list_count.load(Ordering::Relaxed)
    }

    /// Number of pooled strings.
    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    pub fn stats(&self) -> InternStats {
        InternStats {
            entities: self.len(),
            lists: self.list_count(),
            strings: self.string_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for InterningProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterningProvider")
            .field("id", &self.provider_id)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
