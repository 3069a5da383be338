//! String pool for identifier deduplication.
//!
//! PERFORMANCE OPTIMIZATION: Identifiers repeat heavily across a codebase
//! ("value", "args", "System", "Int32", ...). The pool hands out one shared
//! `Arc<str>` per distinct spelling, so every entity holding that name points
//! at the same allocation.
//!
//! Pooled strings can be compared with `Arc::ptr_eq` in O(1), which is what
//! the interning provider relies on when it compares entity fingerprints.

use crate::limits::{STRING_POOL_SHARD_BITS, STRING_POOL_SHARD_COUNT};
use once_cell::sync::Lazy;
use rustc_hash::{FxHashSet, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

static EMPTY: Lazy<Arc<str>> = Lazy::new(|| Arc::from(""));

/// The process-wide empty string.
///
/// Freshly constructed entities default their names to this, so building a
/// parameter never allocates for its name.
#[inline]
pub fn empty_string() -> Arc<str> {
    Arc::clone(&EMPTY)
}

const COMMON_STRINGS: &[&str] = &[
    // Keywords that show up as identifiers in metadata
    "value",
    "this",
    "base",
    "object",
    "string",
    "int",
    "bool",
    "void",
    "dynamic",
    // Namespaces
    "System",
    "System.Collections",
    "System.Collections.Generic",
    "System.Linq",
    "System.Text",
    "System.IO",
    "System.Threading",
    "System.Threading.Tasks",
    "System.Runtime.CompilerServices",
    // Core library types
    "Object",
    "String",
    "Boolean",
    "Char",
    "Byte",
    "SByte",
    "Int16",
    "UInt16",
    "Int32",
    "UInt32",
    "Int64",
    "UInt64",
    "Single",
    "Double",
    "Decimal",
    "Void",
    "Type",
    "Array",
    "Enum",
    "ValueType",
    "Delegate",
    "Exception",
    "Attribute",
    "IDisposable",
    "IEnumerable",
    "IEnumerator",
    "List",
    "Dictionary",
    "Task",
    "Func",
    "Action",
    "EventArgs",
    "EventHandler",
    "ObsoleteAttribute",
    "ParamArrayAttribute",
    "ExtensionAttribute",
    // Common parameter and member names
    "args",
    "sender",
    "e",
    "index",
    "count",
    "item",
    "key",
    "name",
    "obj",
    "other",
    "source",
    "predicate",
    "selector",
    "comparer",
    "action",
    "callback",
    "message",
    "format",
    "provider",
    "culture",
    "cancellationToken",
    "Equals",
    "GetHashCode",
    "ToString",
    "GetType",
    "Dispose",
    "Invoke",
    "Add",
    "Remove",
    "Contains",
    "Clear",
    "Count",
    "Length",
    "Item",
    "Current",
    "MoveNext",
    "Reset",
    "GetEnumerator",
    ".ctor",
    ".cctor",
];

struct PoolShard {
    strings: RwLock<FxHashSet<Arc<str>>>,
}

impl PoolShard {
    fn new() -> Self {
        PoolShard {
            strings: RwLock::new(FxHashSet::default()),
        }
    }
}

/// Sharded string pool for concurrent use.
///
/// Uses fixed buckets to reduce lock contention. Lookups take a read lock;
/// only a miss takes the shard's write lock, and the miss is re-checked under
/// it so two threads pooling the same spelling get the same `Arc`.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use tsm_common::StringPool;
/// let pool = StringPool::new();
/// let a = pool.intern("count");
/// let b = pool.intern(&String::from("count"));
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct StringPool {
    shards: [PoolShard; STRING_POOL_SHARD_COUNT],
}

impl StringPool {
    /// Create an empty pool. The empty string is always pooled.
    pub fn new() -> Self {
        StringPool {
            shards: std::array::from_fn(|_| PoolShard::new()),
        }
    }

    /// Pool a string, returning the canonical `Arc<str>` for its spelling.
    #[inline]
    pub fn intern(&self, s: &str) -> Arc<str> {
        self.intern_with(s, || Arc::from(s))
    }

    /// Pool an owned String, reusing its buffer if the spelling is new.
    #[inline]
    pub fn intern_owned(&self, s: String) -> Arc<str> {
        if let Some(existing) = self.get(&s) {
            return existing;
        }
        let owned: Arc<str> = Arc::from(s.into_boxed_str());
        self.intern_arc(&owned)
    }

    /// Pool an already shared string.
    ///
    /// If the spelling is new, `s` itself becomes the canonical instance and
    /// no allocation happens.
    #[inline]
    pub fn intern_arc(&self, s: &Arc<str>) -> Arc<str> {
        self.intern_with(s, || Arc::clone(s))
    }

    fn intern_with(&self, s: &str, make: impl FnOnce() -> Arc<str>) -> Arc<str> {
        if s.is_empty() {
            return empty_string();
        }

        let shard = &self.shards[Self::shard_for(s)];
        if let Ok(strings) = shard.strings.read() {
            if let Some(existing) = strings.get(s) {
                return Arc::clone(existing);
            }
        }

        let Ok(mut strings) = shard.strings.write() else {
            // Poisoned shard: hand back an unpooled copy. Callers still get an
            // equal string, they only lose pointer equality for it.
            return make();
        };
        if let Some(existing) = strings.get(s) {
            return Arc::clone(existing);
        }
        let owned = make();
        strings.insert(Arc::clone(&owned));
        owned
    }

    /// Look up the pooled instance of a spelling without inserting it.
    pub fn get(&self, s: &str) -> Option<Arc<str>> {
        if s.is_empty() {
            return Some(empty_string());
        }
        let shard = &self.shards[Self::shard_for(s)];
        let strings = shard.strings.read().ok()?;
        strings.get(s).cloned()
    }

    /// Check whether `s` is the pooled instance for its spelling.
    pub fn is_pooled(&self, s: &Arc<str>) -> bool {
        self.get(s).is_some_and(|pooled| Arc::ptr_eq(&pooled, s))
    }

    /// Get the number of pooled strings, counting the empty string.
    #[inline]
    pub fn len(&self) -> usize {
        1 + self
            .shards
            .iter()
            .map(|shard| {
                // Poisoned shards count as empty
                shard
                    .strings
                    .read()
                    .map(|strings| strings.len())
                    .unwrap_or(0)
            })
            .sum::<usize>()
    }

    /// Check if the pool holds nothing but the empty string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Pre-pool common namespace, type and member names.
    /// Call this right after creating the pool for better cache locality.
    pub fn intern_common(&self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) & ((1 << STRING_POOL_SHARD_BITS) - 1)
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StringPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringPool")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/string_pool_tests.rs"]
mod tests;
