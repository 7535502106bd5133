//! The coercion pipeline: blank handling, parsing and post-parse checks.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound;
use std::sync::Arc;

use crate::error::{CastError, CastResult};
use crate::registry::TypeRegistry;
use crate::value::Value;

/// A user predicate run against every successfully parsed value.
///
/// The value is passed by shared reference, so a validator cannot change
/// what later validators or the caller see.
pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Set or range of allowed values for scalar results.
#[derive(Debug, Clone, PartialEq)]
pub enum FromSet {
    List(Vec<Value>),
    Range { start: Bound<Value>, end: Bound<Value> },
}

impl FromSet {
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Inclusive range `start..=end`.
    ///
    /// Fails with [`CastError::InvalidRequest`] when the bounds cannot be
    /// ordered against each other.
    pub fn range(start: impl Into<Value>, end: impl Into<Value>) -> CastResult<Self> {
        Self::bounded(Bound::Included(start.into()), Bound::Included(end.into()))
    }

    /// Half-open range `start..end`.
    pub fn range_exclusive(start: impl Into<Value>, end: impl Into<Value>) -> CastResult<Self> {
        Self::bounded(Bound::Included(start.into()), Bound::Excluded(end.into()))
    }

    /// Range with arbitrary bounds; either end may be unbounded.
    pub fn bounded(start: Bound<Value>, end: Bound<Value>) -> CastResult<Self> {
        if let (Some(low), Some(high)) = (bound_value(&start), bound_value(&end))
            && low.compare(high).is_none()
        {
            return Err(CastError::invalid_request(format!(
                "bad value for range: {} and {} cannot be compared",
                low.type_name(),
                high.type_name()
            )));
        }
        Ok(Self::Range { start, end })
    }

    /// Whether `value` is a member of the list or falls inside the range.
    ///
    /// Values that cannot be ordered against the range bounds are outside.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Self::List(values) => values.iter().any(|allowed| allowed.loosely_eq(value)),
            Self::Range { start, end } => {
                let above_start = match start {
                    Bound::Included(low) => matches!(
                        value.compare(low),
                        Some(Ordering::Greater | Ordering::Equal)
                    ),
                    Bound::Excluded(low) => value.compare(low) == Some(Ordering::Greater),
                    Bound::Unbounded => true,
                };
                let below_end = match end {
                    Bound::Included(high) => matches!(
                        value.compare(high),
                        Some(Ordering::Less | Ordering::Equal)
                    ),
                    Bound::Excluded(high) => value.compare(high) == Some(Ordering::Less),
                    Bound::Unbounded => true,
                };
                above_start && below_end
            }
        }
    }
}

fn bound_value(bound: &Bound<Value>) -> Option<&Value> {
    match bound {
        Bound::Included(v) | Bound::Excluded(v) => Some(v),
        Bound::Unbounded => None,
    }
}

/// Options for a single coercion.
///
/// `if_unset: None` means "use the type's default"; `Some(Value::Nil)` is
/// an explicit nil override.
///
/// # Examples
///
/// ```
/// use envcast::{CoerceOptions, FromSet, TypeRegistry, Value};
///
/// let registry = TypeRegistry::with_builtins();
/// let options = CoerceOptions::new()
///     .from_set(FromSet::list([20, 25, 30]))
///     .validated_by(|v| v.as_i64().is_some_and(|n| n % 5 == 0));
///
/// let value = registry.coerce(Some("25"), "integer", &options).unwrap();
/// assert_eq!(value, Value::Integer(25));
/// ```
#[derive(Clone, Default)]
pub struct CoerceOptions {
    pub if_unset: Option<Value>,
    pub from_set: Option<FromSet>,
    pub validators: Vec<Validator>,
}

impl CoerceOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value returned for blank input instead of the type's default.
    ///
    /// The override is returned as-is; it is not checked against
    /// `from_set` or the validators.
    #[must_use = "builder methods must be chained or built"]
    pub fn if_unset(mut self, value: impl Into<Value>) -> Self {
        self.if_unset = Some(value.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn from_set(mut self, set: FromSet) -> Self {
        self.from_set = Some(set);
        self
    }

    /// Appends a validator. All validators must pass, in order.
    #[must_use = "builder methods must be chained or built"]
    pub fn validated_by<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Appends an already shared validator.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }
}

impl fmt::Debug for CoerceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoerceOptions")
            .field("if_unset", &self.if_unset)
            .field("from_set", &self.from_set)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Blank means absent, empty or whitespace only.
#[must_use]
pub fn is_blank(raw: Option<&str>) -> bool {
    raw.is_none_or(|s| s.trim().is_empty())
}

impl TypeRegistry {
    /// Coerces a raw value to `as_type`.
    ///
    /// `raw` is the already resolved source value (`None` when the key
    /// was absent). Blank input yields the `if_unset` override or the
    /// type's default without running the parser or any check.
    ///
    /// # Errors
    ///
    /// - [`CastError::InvalidRequest`] for an empty type name, or a
    ///   `from_set` combined with an array/hash result.
    /// - [`CastError::UnknownType`] if `as_type` is not registered.
    /// - [`CastError::ValueNotConvertible`] (or any other error) raised by
    ///   the type's parser.
    /// - [`CastError::ValueNotAllowed`] when the value is outside
    ///   `from_set` or a validator returns `false`.
    pub fn coerce(
        &self,
        raw: Option<&str>,
        as_type: &str,
        options: &CoerceOptions,
    ) -> CastResult<Value> {
        if as_type.is_empty() {
            return Err(CastError::invalid_request("missing `as` parameter"));
        }
        let definition = self.lookup(as_type).ok_or_else(|| CastError::UnknownType {
            name: as_type.to_owned(),
        })?;

        let raw = match raw {
            Some(raw) if !is_blank(Some(raw)) => raw,
            _ => {
                tracing::trace!(type_name = as_type, "Blank input, using default");
                return Ok(options
                    .if_unset
                    .clone()
                    .unwrap_or_else(|| definition.unset_default().clone()));
            }
        };

        let value = definition.parse(raw)?;
        tracing::trace!(type_name = as_type, value_type = value.type_name(), "Parsed value");

        if let Some(set) = &options.from_set {
            check_set_inclusion(&value, set)?;
        }
        check_user_validations(&value, &options.validators)?;

        Ok(value)
    }
}

fn check_set_inclusion(value: &Value, set: &FromSet) -> CastResult<()> {
    if value.is_collection() {
        return Err(CastError::invalid_request(format!(
            "`from_set` option is not compatible with {} values",
            value.type_name()
        )));
    }
    if !set.contains(value) {
        tracing::debug!(value = %value, "Value outside allowed set");
        return Err(CastError::not_allowed("parsed value not in allowed set"));
    }
    Ok(())
}

fn check_user_validations(value: &Value, validators: &[Validator]) -> CastResult<()> {
    if validators.iter().all(|validator| validator(value)) {
        Ok(())
    } else {
        tracing::debug!(value = %value, "Value rejected by validator");
        Err(CastError::not_allowed("parsed value failed user validation"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    use super::*;
    use crate::registry::TypeSpec;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .define_type(
                TypeSpec::new("integer")
                    .if_unset(0)
                    .parser(|raw| Ok(Value::Integer(raw.trim().parse().unwrap_or(0)))),
            )
            .unwrap();
        registry
            .define_type(
                TypeSpec::new("list")
                    .if_unset(Value::Array(vec![]))
                    .parser(|raw| Ok(Value::from(vec![raw]))),
            )
            .unwrap();
        registry
    }

    #[test]
    fn blank_input_returns_type_default() {
        let registry = registry();
        let options = CoerceOptions::new();
        assert_eq!(registry.coerce(None, "integer", &options).unwrap(), Value::Integer(0));
        assert_eq!(registry.coerce(Some(""), "integer", &options).unwrap(), Value::Integer(0));
        assert_eq!(registry.coerce(Some("  "), "integer", &options).unwrap(), Value::Integer(0));
    }

    #[test]
    fn override_skips_set_and_validators() {
        let registry = registry();
        let options = CoerceOptions::new()
            .if_unset(9)
            .from_set(FromSet::list([1, 2, 3]))
            .validated_by(|_| false);
        assert_eq!(registry.coerce(None, "integer", &options).unwrap(), Value::Integer(9));
    }

    #[test]
    fn explicit_nil_override_differs_from_no_override() {
        let registry = registry();
        let options = CoerceOptions::new().if_unset(Value::Nil);
        assert_eq!(registry.coerce(None, "integer", &options).unwrap(), Value::Nil);
    }

    #[test]
    fn empty_type_name_is_invalid() {
        let err = registry().coerce(Some("1"), "", &CoerceOptions::new()).unwrap_err();
        assert!(matches!(err, CastError::InvalidRequest { .. }));
    }

    #[test]
    fn unknown_type_is_reported_even_for_blank_input() {
        let err = registry().coerce(None, "bogus", &CoerceOptions::new()).unwrap_err();
        assert_eq!(err, CastError::UnknownType { name: "bogus".into() });
    }

    #[test]
    fn set_membership() {
        let registry = registry();
        let allowed = CoerceOptions::new().from_set(FromSet::list([20, 25, 30]));
        assert_eq!(registry.coerce(Some("25"), "integer", &allowed).unwrap(), Value::Integer(25));

        let denied = CoerceOptions::new().from_set(FromSet::list([1, 2, 3]));
        let err = registry.coerce(Some("25"), "integer", &denied).unwrap_err();
        assert!(matches!(err, CastError::ValueNotAllowed { .. }));
    }

    #[test]
    fn range_membership() {
        let registry = registry();
        let options = CoerceOptions::new().from_set(FromSet::range(1, 10).unwrap());
        assert!(registry.coerce(Some("10"), "integer", &options).is_ok());
        assert!(registry.coerce(Some("11"), "integer", &options).is_err());

        let options = CoerceOptions::new().from_set(FromSet::range_exclusive(1, 10).unwrap());
        assert!(registry.coerce(Some("10"), "integer", &options).is_err());
    }

    #[test]
    fn float_bounds_cover_integers() {
        let set = FromSet::range(0.5, 2.5).unwrap();
        assert!(set.contains(&Value::Integer(2)));
        assert!(!set.contains(&Value::Integer(3)));
        assert!(!set.contains(&Value::from("2")));
    }

    #[test]
    fn incomparable_range_bounds_are_rejected() {
        let err = FromSet::range(1, "z").unwrap_err();
        assert!(matches!(err, CastError::InvalidRequest { .. }));
        assert!(FromSet::bounded(Bound::Unbounded, Bound::Included(Value::from("z"))).is_ok());
    }

    #[test]
    fn set_filter_on_collection_is_invalid() {
        let options = CoerceOptions::new().from_set(FromSet::list(["a"]));
        let err = registry().coerce(Some("a"), "list", &options).unwrap_err();
        assert!(matches!(err, CastError::InvalidRequest { .. }));
    }

    #[test]
    fn validators_run_in_order_and_all_must_pass() {
        let registry = registry();
        let calls = Arc::new(AtomicUsize::new(0));
        let first = Arc::clone(&calls);
        let second = Arc::clone(&calls);

        let options = CoerceOptions::new()
            .validated_by(move |_| first.fetch_add(1, AtomicOrdering::SeqCst) == 0)
            .validated_by(move |_| second.fetch_add(1, AtomicOrdering::SeqCst) == 1);
        assert!(registry.coerce(Some("5"), "integer", &options).is_ok());
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 2);

        let options = CoerceOptions::new()
            .validated_by(|_| true)
            .validated_by(|v| v.as_i64() == Some(6));
        let err = registry.coerce(Some("5"), "integer", &options).unwrap_err();
        assert!(matches!(err, CastError::ValueNotAllowed { .. }));
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" \t\n")));
        assert!(!is_blank(Some(" x ")));
    }
}
