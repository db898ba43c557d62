use thiserror::Error;

/// Catalog construction failures. Raised once at startup, never mid-query.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("pattern '{pattern}': {reason}")]
    Invalid { pattern: String, reason: String },
}

impl CatalogError {
    pub(crate) fn invalid(pattern: &str, reason: impl Into<String>) -> Self {
        CatalogError::Invalid {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}
