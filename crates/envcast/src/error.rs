use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type CastResult<T> = Result<T, CastError>;

/// Error type for registry, coercion, binding and manifest operations.
///
/// Every failure surfaces as exactly one of these variants; nothing is
/// retried or swallowed inside the crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CastError {
    /// The caller combined options in an unsupported way, or left out a
    /// required one.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// A type name or alias is already present in the registry.
    #[error("cannot redefine type `{name}`")]
    TypeAlreadyDefined { name: String },

    /// The requested type has never been defined.
    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    /// The raw input cannot be interpreted as the requested type.
    #[error("value not convertible to `{type_name}`: {reason}")]
    ValueNotConvertible { type_name: String, reason: String },

    /// The value converted fine but was rejected by a range, set or
    /// user-supplied check.
    #[error("value not allowed: {reason}")]
    ValueNotAllowed { reason: String },

    /// The registration manifest does not exist.
    #[error("file not found: \"{}\"", path.display())]
    AutoRegisterFileNotFound { path: PathBuf },

    /// The registration manifest exists but is not usable.
    #[error("malformed YAML in spec file \"{}\": {reason}", path.display())]
    UnparseableAutoRegisterSpec { path: PathBuf, reason: String },
}

impl CastError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn not_convertible(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValueNotConvertible {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn not_allowed(reason: impl Into<String>) -> Self {
        Self::ValueNotAllowed {
            reason: reason.into(),
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::InvalidRequest { .. } => "request",
            Self::TypeAlreadyDefined { .. } | Self::UnknownType { .. } => "registry",
            Self::ValueNotConvertible { .. } => "conversion",
            Self::ValueNotAllowed { .. } => "validation",
            Self::AutoRegisterFileNotFound { .. } | Self::UnparseableAutoRegisterSpec { .. } => {
                "manifest"
            }
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidRequest { .. } => "CAST_INVALID_REQUEST",
            Self::TypeAlreadyDefined { .. } => "CAST_TYPE_ALREADY_DEFINED",
            Self::UnknownType { .. } => "CAST_UNKNOWN_TYPE",
            Self::ValueNotConvertible { .. } => "CAST_NOT_CONVERTIBLE",
            Self::ValueNotAllowed { .. } => "CAST_NOT_ALLOWED",
            Self::AutoRegisterFileNotFound { .. } => "CAST_MANIFEST_NOT_FOUND",
            Self::UnparseableAutoRegisterSpec { .. } => "CAST_MANIFEST_UNPARSEABLE",
        }
    }

    /// Whether the operation might succeed if retried with the same input.
    ///
    /// Coercion is deterministic, so this is `false` for every variant.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<CastError> {
        vec![
            CastError::invalid_request(""),
            CastError::TypeAlreadyDefined {
                name: String::new(),
            },
            CastError::UnknownType {
                name: String::new(),
            },
            CastError::not_convertible("", ""),
            CastError::not_allowed(""),
            CastError::AutoRegisterFileNotFound {
                path: PathBuf::new(),
            },
            CastError::UnparseableAutoRegisterSpec {
                path: PathBuf::new(),
                reason: String::new(),
            },
        ]
    }

    #[test]
    fn display_messages() {
        let err = CastError::TypeAlreadyDefined { name: "foo".into() };
        assert_eq!(err.to_string(), "cannot redefine type `foo`");

        let err = CastError::UnknownType {
            name: "bogus".into(),
        };
        assert_eq!(err.to_string(), "unknown type `bogus`");

        let err = CastError::not_convertible("port", "non-numeric value");
        assert_eq!(
            err.to_string(),
            "value not convertible to `port`: non-numeric value"
        );

        let err = CastError::AutoRegisterFileNotFound {
            path: PathBuf::from(".env_parser.yml"),
        };
        assert_eq!(err.to_string(), "file not found: \".env_parser.yml\"");
    }

    #[test]
    fn codes_are_unique_per_variant() {
        let codes: Vec<String> = all_variants().iter().map(|e| e.code().to_owned()).collect();
        for code in &codes {
            assert!(code.starts_with("CAST_"), "unexpected code {code}");
        }

        let mut sorted = codes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len(), "codes should be unique");
    }

    #[test]
    fn none_are_retryable() {
        for err in all_variants() {
            assert!(!err.is_retryable(), "should not be retryable: {err:?}");
        }
    }

    #[test]
    fn manifest_errors_share_a_category() {
        let variants = all_variants();
        assert_eq!(variants[5].category(), "manifest");
        assert_eq!(variants[6].category(), "manifest");
        assert_eq!(variants[1].category(), variants[2].category());
    }
}
