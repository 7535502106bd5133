//! Built-in types.
//!
//! | type (aliases) | default | result |
//! |---|---|---|
//! | `string` | `""` | [`Value::String`](crate::Value::String) |
//! | `symbol` | empty symbol | [`Value::Symbol`](crate::Value::Symbol) |
//! | `boolean` | `false` | [`Value::Bool`](crate::Value::Bool) |
//! | `integer` (`int`) | `0` | [`Value::Integer`](crate::Value::Integer) |
//! | `float` (`decimal`, `number`) | `0.0` | [`Value::Float`](crate::Value::Float) |
//! | `json` | nil | depends on the document |
//! | `array` | `[]` | [`Value::Array`](crate::Value::Array) |
//! | `hash` | `{}` | [`Value::Hash`](crate::Value::Hash) |
//! | `date` | nil | [`Value::Date`](crate::Value::Date) |
//! | `time` (`datetime`) | nil | [`Value::Time`](crate::Value::Time) |
//! | `duration` | nil | [`Value::Duration`](crate::Value::Duration) |
//! | `ipv4_address` | nil | [`Value::Ip`](crate::Value::Ip) |
//! | `ipv6_address` | nil | [`Value::Ip`](crate::Value::Ip) |
//! | `network_port` (`port`) | nil | [`Value::Integer`](crate::Value::Integer) |
//! | `email_address` | nil | [`Value::String`](crate::Value::String) |
//! | `version` (`semver`) | nil | [`Value::Version`](crate::Value::Version) |

pub mod base;
pub mod chronology;
pub mod internet;

use std::sync::Arc;

pub use internet::{HostResolver, SystemResolver};

use crate::registry::TypeRegistry;

pub(crate) fn register_builtins(registry: &mut TypeRegistry, resolver: Arc<dyn HostResolver>) {
    let specs = base::specs()
        .into_iter()
        .chain(chronology::specs())
        .chain(internet::specs(resolver));

    for spec in specs {
        // Built-in names are distinct and the registry starts empty.
        let defined = registry.define_type(spec);
        debug_assert!(defined.is_ok(), "built-in type collides: {defined:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_name_is_registered() {
        let registry = TypeRegistry::with_builtins();
        for name in [
            "string", "symbol", "boolean", "integer", "int", "float", "decimal", "number", "json",
            "array", "hash", "date", "time", "datetime", "duration", "ipv4_address",
            "ipv6_address", "network_port", "port", "email_address", "version", "semver",
        ] {
            assert!(registry.contains(name), "{name} is missing");
        }
        assert!(Arc::ptr_eq(
            &registry.lookup("port").unwrap(),
            &registry.lookup("network_port").unwrap()
        ));
    }
}
