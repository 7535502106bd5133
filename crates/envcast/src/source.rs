//! Key/value sources and the [`EnvView`] convenience wrapper.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::binding::{Binder, Registration};
use crate::coerce::CoerceOptions;
use crate::error::CastResult;
use crate::registry::TypeRegistry;
use crate::value::Value;

/// Something raw values can be read from by key.
pub trait ValueSource: Send + Sync + fmt::Debug {
    /// Returns the raw value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
///
/// Values that are not valid UTF-8 are converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ValueSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

impl<S: BuildHasher + Send + Sync> ValueSource for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ValueSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl<S: BuildHasher + Send + Sync> ValueSource for IndexMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        IndexMap::get(self, key).cloned()
    }
}

impl<T: ValueSource + ?Sized> ValueSource for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Whether values under `key` must be kept out of logs.
pub(crate) fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    key_lower.contains("password")
        || key_lower.contains("secret")
        || key_lower.contains("token")
        || key_lower.contains("api_key")
        || key_lower.contains("private")
        || key_lower.contains("credential")
}

/// Renders `value` for a log line about `key`.
pub(crate) fn loggable(key: &str, value: &Value) -> String {
    if is_sensitive_key(key) {
        "[REDACTED]".to_owned()
    } else {
        value.to_string()
    }
}

/// A source paired with a registry, so values can be parsed by key.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// use envcast::{CoerceOptions, EnvView, TypeRegistry, Value};
///
/// let registry = TypeRegistry::with_builtins();
/// let vars = HashMap::from([("WORKERS".to_owned(), "4".to_owned())]);
/// let env = EnvView::new(&registry).with_source(Arc::new(vars));
///
/// let workers = env.parse("WORKERS", "integer", &CoerceOptions::new()).unwrap();
/// assert_eq!(workers, Value::Integer(4));
/// ```
#[derive(Debug, Clone)]
pub struct EnvView<'r> {
    registry: &'r TypeRegistry,
    source: Arc<dyn ValueSource>,
}

impl<'r> EnvView<'r> {
    /// Creates a view over the process environment.
    #[must_use]
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            source: Arc::new(ProcessEnv),
        }
    }

    /// Reads from `source` instead of the process environment.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_source(mut self, source: Arc<dyn ValueSource>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn source(&self) -> &Arc<dyn ValueSource> {
        &self.source
    }

    /// Reads `key` from the source and coerces it to `as_type`.
    pub fn parse(&self, key: &str, as_type: &str, options: &CoerceOptions) -> CastResult<Value> {
        let raw = self.source.get(key);
        let value = self.registry.coerce(raw.as_deref(), as_type, options)?;
        tracing::trace!(key, value = %loggable(key, &value), "Parsed source value");
        Ok(value)
    }

    /// Registers `name` through `binder`, reading from this view's source
    /// unless the registration names its own.
    pub fn register(
        &self,
        binder: &mut Binder<'_>,
        name: &str,
        registration: Registration,
    ) -> CastResult<Value> {
        let registration = if registration.source().is_some() {
            registration
        } else {
            registration.from(Arc::clone(&self.source))
        };
        binder.register(name, registration)
    }
}
