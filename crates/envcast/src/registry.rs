//! Type registry: maps type names and aliases to parsers and blank defaults.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{CastError, CastResult};
use crate::types::{self, HostResolver};
use crate::value::Value;

/// A type parser.
///
/// Receives the raw, non-blank input and returns the typed value or a
/// conversion failure.
pub type Parser = Arc<dyn Fn(&str) -> CastResult<Value> + Send + Sync>;

/// A registered type. Shared by every name (primary and aliases) it was
/// defined under.
pub struct TypeDefinition {
    name: String,
    aliases: Vec<String>,
    parser: Parser,
    unset_default: Value,
}

impl TypeDefinition {
    /// The primary name given at definition time.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Value returned for blank input when the caller gives no override.
    #[must_use]
    pub fn unset_default(&self) -> &Value {
        &self.unset_default
    }

    /// Runs the parser on non-blank input.
    pub fn parse(&self, raw: &str) -> CastResult<Value> {
        (self.parser)(raw)
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("unset_default", &self.unset_default)
            .finish_non_exhaustive()
    }
}

/// Builder describing a type to add with [`TypeRegistry::define_type`].
///
/// # Examples
///
/// ```
/// use envcast::{CoerceOptions, TypeRegistry, TypeSpec, Value};
///
/// let mut registry = TypeRegistry::new();
/// registry
///     .define_type(
///         TypeSpec::new("thirty")
///             .alias("xxx")
///             .parser(|_| Ok(Value::Integer(30))),
///     )
///     .unwrap();
///
/// let value = registry
///     .coerce(Some("dummy value"), "xxx", &CoerceOptions::new())
///     .unwrap();
/// assert_eq!(value, Value::Integer(30));
/// ```
#[derive(Clone)]
pub struct TypeSpec {
    name: String,
    aliases: Vec<String>,
    if_unset: Value,
    parser: Option<Parser>,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            if_unset: Value::Nil,
            parser: None,
        }
    }

    /// Adds one alias.
    #[must_use = "builder methods must be chained or built"]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several aliases.
    #[must_use = "builder methods must be chained or built"]
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Sets the blank default. Defaults to [`Value::Nil`].
    #[must_use = "builder methods must be chained or built"]
    pub fn if_unset(mut self, value: impl Into<Value>) -> Self {
        self.if_unset = value.into();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> CastResult<Value> + Send + Sync + 'static,
    {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Uses an already shared parser.
    #[must_use = "builder methods must be chained or built"]
    pub fn shared_parser(mut self, parser: Parser) -> Self {
        self.parser = Some(parser);
        self
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("if_unset", &self.if_unset)
            .field("has_parser", &self.parser.is_some())
            .finish()
    }
}

/// Registry of known types.
///
/// Types are additive: there is no way to remove or redefine a name once
/// it is registered. Registration needs `&mut self`, coercion only
/// `&self`, so a fully built registry can be shared freely.
#[derive(Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<TypeDefinition>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in type.
    ///
    /// Address types resolve host names with the platform resolver.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::with_resolver(Arc::new(types::SystemResolver))
    }

    /// Creates a registry holding every built-in type, resolving host
    /// names through `resolver`.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn HostResolver>) -> Self {
        let mut registry = Self::new();
        types::register_builtins(&mut registry, resolver);
        registry
    }

    /// Adds a type under its name and all its aliases.
    ///
    /// Fails with [`CastError::InvalidRequest`] if the spec has no parser
    /// or an empty name, and with [`CastError::TypeAlreadyDefined`] if any
    /// of the names is taken. Nothing is registered on failure.
    pub fn define_type(&mut self, spec: TypeSpec) -> CastResult<()> {
        let Some(parser) = spec.parser else {
            return Err(CastError::invalid_request(format!(
                "no parser given for type `{}`",
                spec.name
            )));
        };

        let names: Vec<&String> = std::iter::once(&spec.name)
            .chain(spec.aliases.iter())
            .collect();

        for (index, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(CastError::invalid_request("type names must not be empty"));
            }
            if self.types.contains_key(name.as_str()) || names[..index].contains(name) {
                return Err(CastError::TypeAlreadyDefined {
                    name: (*name).clone(),
                });
            }
        }

        let definition = Arc::new(TypeDefinition {
            name: spec.name.clone(),
            aliases: spec.aliases.clone(),
            parser,
            unset_default: spec.if_unset,
        });

        for name in names {
            self.types.insert(name.clone(), Arc::clone(&definition));
        }

        tracing::debug!(
            type_name = %definition.name,
            aliases = ?definition.aliases,
            "Defined type"
        );
        Ok(())
    }

    /// Looks up a type by name or alias.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<TypeDefinition>> {
        self.types.get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// All registered names (primary and aliases), sorted.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered names, aliases included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
