//! Centralized capacity limits for the entity model.
//!
//! Pool sizing and pre-allocation hints live here so the string pool and the
//! interning provider agree on them.

// =============================================================================
// String Pool
// =============================================================================

/// Number of bits used to select a string pool shard.
///
/// 64 shards keep write-lock contention low when several resolver threads
/// pool identifiers at the same time.
pub const STRING_POOL_SHARD_BITS: u32 = 6;

/// Number of string pool shards.
pub const STRING_POOL_SHARD_COUNT: usize = 1 << STRING_POOL_SHARD_BITS;

// =============================================================================
// Interning Provider
// =============================================================================

/// Default capacity hint for the provider's canonical entity table.
///
/// A mid-sized project produces a few thousand distinct parameters, types and
/// constant values; the table grows past this without rehash storms.
pub const DEFAULT_EXPECTED_ENTITIES: usize = 1024;

/// Canonical entries expected per fingerprint bucket.
///
/// Buckets hold more than one entry only on hash collisions, so the inline
/// capacity of one avoids a heap allocation for nearly every bucket.
pub const BUCKET_INLINE: usize = 1;
