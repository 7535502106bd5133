//! # envcast
//!
//! Typed coercion of environment-like key/value sources.
//!
//! Raw text is turned into a typed [`Value`] by name: `string`, `integer`,
//! `boolean`, `json`, `date`, `duration`, `ipv4_address`, `version` and
//! more. Every type has a default for blank input, results can be checked
//! against a set or range of allowed values and against user predicates,
//! and new types can be registered alongside the built-ins.
//!
//! ## Key Components
//!
//! - **[`TypeRegistry`]**: type names and aliases mapped to parsers.
//!   [`TypeRegistry::coerce`] is the whole pipeline.
//! - **[`CoerceOptions`]**: per-call `if_unset` override, [`FromSet`]
//!   membership and validators.
//! - **[`EnvView`]**: a registry paired with a [`ValueSource`] (the
//!   process environment by default), so values are parsed by key.
//! - **[`Binder`]**: binds coerced values to upper-cased constants in a
//!   [`Namespace`], one at a time, in batches, or from a YAML
//!   [`Manifest`].
//!
//! ## Quick Start
//!
//! ```
//! use envcast::prelude::*;
//!
//! let registry = TypeRegistry::with_builtins();
//!
//! let port = registry
//!     .coerce(Some("8080"), "port", &CoerceOptions::new())
//!     .unwrap();
//! assert_eq!(port, Value::Integer(8080));
//!
//! // Blank input falls back to the type's default.
//! let retries = registry.coerce(Some(""), "integer", &CoerceOptions::new()).unwrap();
//! assert_eq!(retries, Value::Integer(0));
//!
//! let level = registry.coerce(
//!     Some("verbose"),
//!     "symbol",
//!     &CoerceOptions::new().from_set(FromSet::list([
//!         Value::Symbol("debug".into()),
//!         Value::Symbol("info".into()),
//!     ])),
//! );
//! assert!(matches!(level, Err(CastError::ValueNotAllowed { .. })));
//! ```

pub mod binding;
pub mod coerce;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod source;
pub mod types;
pub mod value;
pub mod version;

pub use binding::{Binder, Constants, Namespace, Registration};
pub use coerce::{CoerceOptions, FromSet, Validator, is_blank};
pub use error::{CastError, CastResult};
pub use manifest::{DEFAULT_MANIFEST_PATH, Manifest, ManifestEntry};
pub use registry::{Parser, TypeDefinition, TypeRegistry, TypeSpec};
pub use source::{EnvView, ProcessEnv, ValueSource};
pub use types::{HostResolver, SystemResolver};
pub use value::Value;
pub use version::SemVerMatch;

pub mod prelude {
    pub use crate::binding::{Binder, Registration};
    pub use crate::coerce::{CoerceOptions, FromSet};
    pub use crate::error::{CastError, CastResult};
    pub use crate::registry::{TypeRegistry, TypeSpec};
    pub use crate::source::{EnvView, ValueSource};
    pub use crate::value::Value;
}
