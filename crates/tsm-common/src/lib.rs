//! Common types and utilities for the tsm type-system model.
//!
//! This crate provides foundational types used by the entity model:
//! - String pooling (`StringPool`) for identifier deduplication
//! - Source regions (`DomRegion`, `TextLocation`)
//! - Capacity limits and pool sizing constants

// String pooling for identifier deduplication
pub mod string_pool;
pub use string_pool::{StringPool, empty_string};

// Line/column source regions
pub mod region;
pub use region::{DomRegion, TextLocation};

// Centralized capacity limits
pub mod limits;
