//! Binding coerced values to named constants.
//!
//! A [`Binder`] reads a key from a source, coerces it through the
//! registry and stores the result under the upper-cased key in a
//! [`Namespace`]. Bound values can only be read back.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::coerce::{CoerceOptions, FromSet, Validator};
use crate::error::{CastError, CastResult};
use crate::manifest::{DEFAULT_MANIFEST_PATH, Manifest};
use crate::registry::TypeRegistry;
use crate::source::{ProcessEnv, ValueSource, loggable};
use crate::value::Value;

/// A named set of constants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    path: String,
    slots: IndexMap<String, Value>,
}

impl Namespace {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            slots: IndexMap::new(),
        }
    }

    /// `::`-separated path; empty for the global namespace.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        self.path.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Constants in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Dumps the constants as a JSON object, in binding order.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.slots
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }

    fn bind(&mut self, name: String, value: Value) -> Option<Value> {
        self.slots.insert(name, value)
    }
}

/// Every namespace a [`Binder`] has written to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constants {
    global: Namespace,
    namespaces: IndexMap<String, Namespace>,
}

impl Constants {
    #[must_use]
    pub fn global(&self) -> &Namespace {
        &self.global
    }

    /// Looks up a constant in the global namespace.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.global.get(name)
    }

    /// Looks up a namespace by path; the empty path is the global one.
    #[must_use]
    pub fn namespace(&self, path: &str) -> Option<&Namespace> {
        if path.is_empty() {
            Some(&self.global)
        } else {
            self.namespaces.get(path)
        }
    }

    /// Named namespaces in creation order. The global one is not included.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.values()
    }

    fn namespace_mut(&mut self, path: Option<&str>) -> &mut Namespace {
        match path {
            None | Some("") => &mut self.global,
            Some(path) => self
                .namespaces
                .entry(path.to_owned())
                .or_insert_with(|| Namespace::new(path)),
        }
    }
}

/// What to register and how to coerce it.
#[derive(Clone)]
pub struct Registration {
    as_type: String,
    from: Option<Arc<dyn ValueSource>>,
    within: Option<String>,
    options: CoerceOptions,
}

impl Registration {
    pub fn new(as_type: impl Into<String>) -> Self {
        Self {
            as_type: as_type.into(),
            from: None,
            within: None,
            options: CoerceOptions::new(),
        }
    }

    /// Reads the raw value from `source` instead of the binder's default.
    #[must_use = "builder methods must be chained or built"]
    pub fn from(mut self, source: Arc<dyn ValueSource>) -> Self {
        self.from = Some(source);
        self
    }

    /// Binds into the namespace at `path` (`::`-separated) instead of the
    /// global namespace.
    #[must_use = "builder methods must be chained or built"]
    pub fn within(mut self, path: impl Into<String>) -> Self {
        self.within = Some(path.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn if_unset(mut self, value: impl Into<Value>) -> Self {
        self.options = self.options.if_unset(value);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn from_set(mut self, set: FromSet) -> Self {
        self.options = self.options.from_set(set);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn validated_by<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.options = self.options.validated_by(validator);
        self
    }

    /// Replaces all coercion options at once.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_options(mut self, options: CoerceOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn as_type(&self) -> &str {
        &self.as_type
    }

    #[must_use]
    pub fn source(&self) -> Option<&Arc<dyn ValueSource>> {
        self.from.as_ref()
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.within.as_deref()
    }

    #[must_use]
    pub fn options(&self) -> &CoerceOptions {
        &self.options
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("as_type", &self.as_type)
            .field("from", &self.from)
            .field("within", &self.within)
            .field("options", &self.options)
            .finish()
    }
}

/// Reads, coerces and binds values to constants.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// use envcast::{Binder, Registration, TypeRegistry, Value};
///
/// let registry = TypeRegistry::with_builtins();
/// let vars = HashMap::from([("timeout".to_owned(), "30".to_owned())]);
/// let mut binder = Binder::new(&registry).with_source(Arc::new(vars));
///
/// binder.register("timeout", Registration::new("integer")).unwrap();
/// assert_eq!(binder.constants().get("TIMEOUT"), Some(&Value::Integer(30)));
/// ```
#[derive(Debug)]
pub struct Binder<'r> {
    registry: &'r TypeRegistry,
    source: Arc<dyn ValueSource>,
    constants: Constants,
}

impl<'r> Binder<'r> {
    /// Creates a binder reading from the process environment.
    #[must_use]
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            source: Arc::new(ProcessEnv),
            constants: Constants::default(),
        }
    }

    /// Sets the default source for registrations that name none.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_source(mut self, source: Arc<dyn ValueSource>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    #[must_use]
    pub fn into_constants(self) -> Constants {
        self.constants
    }

    /// Coerces the value under `name` and binds it as `NAME`.
    ///
    /// The name and namespace are checked before the source is read.
    /// Nothing is bound on failure. Re-binding an existing constant
    /// replaces it and logs a warning.
    pub fn register(&mut self, name: &str, registration: Registration) -> CastResult<Value> {
        let constant = constant_name(name)?;
        if let Some(path) = &registration.within {
            check_namespace_path(path)?;
        }

        let source = registration.from.as_ref().unwrap_or(&self.source);
        let raw = source.get(name);
        let value = self
            .registry
            .coerce(raw.as_deref(), &registration.as_type, &registration.options)?;

        let namespace = self.constants.namespace_mut(registration.within.as_deref());
        if namespace
            .bind(constant.clone(), value.clone())
            .is_some()
        {
            tracing::warn!(
                constant = %constant,
                namespace = %namespace.path(),
                "Constant re-bound"
            );
        }
        tracing::debug!(
            constant = %constant,
            namespace = %namespace.path(),
            value = %loggable(name, &value),
            "Bound constant"
        );

        Ok(value)
    }

    /// Registers every entry in order and returns the coerced values.
    ///
    /// A shared validator is rejected with [`CastError::InvalidRequest`]
    /// before anything is read or bound; use per-entry validators
    /// instead. The first failure stops the batch, leaving earlier
    /// entries bound.
    pub fn register_all(
        &mut self,
        entries: IndexMap<String, Registration>,
        validated_by: Option<Validator>,
    ) -> CastResult<IndexMap<String, Value>> {
        if validated_by.is_some() {
            return Err(CastError::invalid_request(
                "cannot register multiple values with one validator",
            ));
        }

        let mut output = IndexMap::with_capacity(entries.len());
        for (name, registration) in entries {
            let value = self.register(&name, registration)?;
            output.insert(name, value);
        }
        Ok(output)
    }

    /// Loads a registration manifest and registers its entries.
    ///
    /// `path` defaults to [`DEFAULT_MANIFEST_PATH`] in the working
    /// directory.
    pub fn autoregister(&mut self, path: Option<&Path>) -> CastResult<IndexMap<String, Value>> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_MANIFEST_PATH));
        let manifest = Manifest::load(path)?;
        self.register_all(manifest.into_registrations(), None)
    }
}

/// Upper-cases `name` and checks it is a valid constant name.
fn constant_name(name: &str) -> CastResult<String> {
    let constant = name.to_uppercase();
    if !is_identifier(&constant) {
        return Err(CastError::invalid_request(format!(
            "invalid constant name: {name:?}"
        )));
    }
    Ok(constant)
}

fn check_namespace_path(path: &str) -> CastResult<()> {
    if path.is_empty() || path.split("::").all(is_identifier) {
        Ok(())
    } else {
        Err(CastError::invalid_request(format!(
            "invalid `within` parameter: {path:?}"
        )))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
