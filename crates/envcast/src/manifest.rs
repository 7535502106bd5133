//! Registration manifests.
//!
//! A manifest is a YAML mapping from constant name to its options:
//!
//! ```yaml
//! DATABASE_URL:
//!   as: string
//! WORKERS:
//!   as: :integer
//!   if_unset: 4
//!   from_set: { min: 1, max: 64 }
//! LOG_LEVEL:
//!   as: symbol
//!   from_set: [debug, info, warn]
//!   within: App::Logging
//! ```
//!
//! `from_set` is either a list of allowed values or a range mapping with
//! optional `min`/`max` and an `exclusive` flag for the upper bound.
//! Keys other than `as`, `if_unset`, `from_set` and `within` are ignored.

use std::fs;
use std::io;
use std::ops::Bound;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_yaml::Value as Yaml;

use crate::binding::Registration;
use crate::coerce::FromSet;
use crate::error::{CastError, CastResult};
use crate::value::Value;

/// Manifest file read when no path is given.
pub const DEFAULT_MANIFEST_PATH: &str = ".env_parser.yml";

/// One constant's options.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub as_type: String,
    pub if_unset: Option<Value>,
    pub from_set: Option<FromSet>,
    pub within: Option<String>,
}

impl ManifestEntry {
    /// Converts the entry into a [`Registration`] reading from the
    /// binder's default source.
    #[must_use]
    pub fn to_registration(&self) -> Registration {
        let mut registration = Registration::new(self.as_type.clone());
        if let Some(value) = &self.if_unset {
            registration = registration.if_unset(value.clone());
        }
        if let Some(set) = &self.from_set {
            registration = registration.from_set(set.clone());
        }
        if let Some(path) = &self.within {
            registration = registration.within(path.clone());
        }
        registration
    }
}

/// A parsed registration manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: PathBuf,
    entries: IndexMap<String, ManifestEntry>,
}

impl Manifest {
    /// Reads and parses the manifest at `path`.
    ///
    /// Fails with [`CastError::AutoRegisterFileNotFound`] when the file is
    /// missing, and with [`CastError::UnparseableAutoRegisterSpec`] when it
    /// cannot be read, is not valid YAML or is not a mapping.
    pub fn load(path: impl AsRef<Path>) -> CastResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => CastError::AutoRegisterFileNotFound {
                path: path.to_path_buf(),
            },
            _ => CastError::UnparseableAutoRegisterSpec {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        })?;

        let manifest = Self::parse(&text, path)?;
        tracing::info!(
            path = %path.display(),
            entries = manifest.len(),
            "Loaded registration manifest"
        );
        Ok(manifest)
    }

    /// Parses manifest text that did not come from a file.
    pub fn from_yaml_str(text: &str) -> CastResult<Self> {
        Self::parse(text, Path::new("<string>"))
    }

    fn parse(text: &str, path: &Path) -> CastResult<Self> {
        let unparseable = |reason: String| CastError::UnparseableAutoRegisterSpec {
            path: path.to_path_buf(),
            reason,
        };

        let document: Yaml = serde_yaml::from_str(text).map_err(|err| unparseable(err.to_string()))?;
        let mapping = match document {
            Yaml::Mapping(mapping) => mapping,
            Yaml::Null => serde_yaml::Mapping::new(),
            other => {
                return Err(unparseable(format!(
                    "expected a mapping of names to options, found {}",
                    yaml_kind(&other)
                )));
            }
        };

        let mut entries = IndexMap::with_capacity(mapping.len());
        for (key, options) in mapping {
            let name = scalar_key(&key)
                .ok_or_else(|| unparseable(format!("invalid constant name: {key:?}")))?;
            let entry = parse_entry(&name, options)?;
            entries.insert(name, entry);
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.get(name)
    }

    /// Entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registrations in file order, ready for
    /// [`Binder::register_all`](crate::Binder::register_all).
    #[must_use]
    pub fn into_registrations(self) -> IndexMap<String, Registration> {
        self.entries
            .into_iter()
            .map(|(name, entry)| {
                let registration = entry.to_registration();
                (name, registration)
            })
            .collect()
    }
}

fn parse_entry(name: &str, options: Yaml) -> CastResult<ManifestEntry> {
    let Yaml::Mapping(options) = options else {
        return Err(CastError::invalid_request(format!(
            "options for `{name}` must be a mapping"
        )));
    };

    let as_type = match options.get("as") {
        Some(Yaml::String(type_name)) => {
            let type_name = type_name.strip_prefix(':').unwrap_or(type_name);
            if type_name.is_empty() {
                return Err(CastError::invalid_request(format!(
                    "missing `as` parameter for `{name}`"
                )));
            }
            type_name.to_owned()
        }
        Some(other) => {
            return Err(CastError::invalid_request(format!(
                "`as` for `{name}` must be a type name, found {}",
                yaml_kind(other)
            )));
        }
        None => {
            return Err(CastError::invalid_request(format!(
                "missing `as` parameter for `{name}`"
            )));
        }
    };

    let from_set = options
        .get("from_set")
        .map(|set| parse_from_set(name, set))
        .transpose()?;

    let within = match options.get("within") {
        None | Some(Yaml::Null) => None,
        Some(Yaml::String(path)) => Some(path.clone()),
        Some(other) => {
            return Err(CastError::invalid_request(format!(
                "invalid `within` parameter for `{name}`: {}",
                yaml_kind(other)
            )));
        }
    };

    Ok(ManifestEntry {
        as_type,
        if_unset: options.get("if_unset").map(yaml_to_value),
        from_set,
        within,
    })
}

fn parse_from_set(name: &str, set: &Yaml) -> CastResult<FromSet> {
    match set {
        Yaml::Sequence(items) => Ok(FromSet::List(items.iter().map(yaml_to_value).collect())),
        Yaml::Mapping(range) => {
            let exclusive = match range.get("exclusive") {
                None => false,
                Some(Yaml::Bool(flag)) => *flag,
                Some(_) => {
                    return Err(CastError::invalid_request(format!(
                        "`exclusive` in `from_set` for `{name}` must be a boolean"
                    )));
                }
            };
            let start = range
                .get("min")
                .map_or(Bound::Unbounded, |min| Bound::Included(yaml_to_value(min)));
            let end = match range.get("max").map(yaml_to_value) {
                None => Bound::Unbounded,
                Some(max) if exclusive => Bound::Excluded(max),
                Some(max) => Bound::Included(max),
            };
            FromSet::bounded(start, end)
        }
        other => Err(CastError::invalid_request(format!(
            "invalid `from_set` parameter type for `{name}`: {}",
            yaml_kind(other)
        ))),
    }
}

fn scalar_key(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Converts a YAML node into a [`Value`]. Tags are dropped.
fn yaml_to_value(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Null => Value::Nil,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => Value::Array(items.iter().map(yaml_to_value).collect()),
        Yaml::Mapping(mapping) => Value::Hash(
            mapping
                .iter()
                .filter_map(|(key, value)| Some((scalar_key(key)?, yaml_to_value(value))))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}

fn yaml_kind(yaml: &Yaml) -> &'static str {
    match yaml {
        Yaml::Null => "null",
        Yaml::Bool(_) => "a boolean",
        Yaml::Number(_) => "a number",
        Yaml::String(_) => "a string",
        Yaml::Sequence(_) => "a sequence",
        Yaml::Mapping(_) => "a mapping",
        Yaml::Tagged(_) => "a tagged value",
    }
}
