//! tsm: a freezable, interned type-system entity model.
//!
//! The model is split into two crates, re-exported here:
//!
//! - [`common`] (`tsm-common`): string pooling and source regions
//! - [`model`] (`tsm-model`): the entities, the freeze protocol and the
//!   interning provider
//!
//! A typical analysis pass creates one [`InterningProvider`], builds each
//! [`TypeDefinition`] mutably, calls [`TypeDefinition::intern_members`] and
//! then [`Freezable::freeze`], after which the definitions are shared
//! read-only across threads.
//!
//! ```
//! use std::sync::Arc;
//! use tsm::{Freezable, InterningProvider, Method, Parameter, TypeDefinition, TypeKind, TypeReference};
//!
//! let provider = InterningProvider::new();
//! let mut definition = TypeDefinition::new("Demo", "Counter", TypeKind::Class);
//!
//! let mut method = Method::new("Add");
//! let int32 = Arc::new(TypeReference::named("System", "Int32"));
//! method.add_parameter(Arc::new(Parameter::with_type("count", int32))).unwrap();
//! definition.add_method(Arc::new(method)).unwrap();
//!
//! definition.intern_members(&provider).unwrap();
//! definition.freeze();
//! assert!(definition.methods()[0].parameters()[0].is_frozen());
//! ```

pub use tsm_common as common;
pub use tsm_model as model;
pub use tsm_model::*;

// Tracing configuration (TSM_LOG / TSM_LOG_FORMAT)
pub mod tracing_config;
