//! Error types produced by the document model and assembly engine.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

mod aggregate;

pub use aggregate::AggregatedErrors;

/// Errors that can occur while building, reading, writing or merging
/// documents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OasError {
    /// The static property schema violates a registry invariant. Detected
    /// once, when the registry is first built, never per document.
    #[error("Invalid property schema registry: {message}")]
    Registry {
        /// Description of the violated invariant, naming the model kind.
        message: String,
    },

    /// An ordinary property accessor was used on a model that does not
    /// support it (e.g. a boolean-mode schema).
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A value of the wrong shape was supplied for a declared property.
    #[error("Invalid value for '{kind}.{property}': expected {expected}")]
    Shape {
        /// Name of the model kind owning the property.
        kind: &'static str,
        /// Wire name of the rejected property.
        property: String,
        /// Description of the shape the descriptor requires.
        expected: &'static str,
    },

    /// A source key matched neither a declared property nor the extension
    /// convention. Only raised under [`UnknownKeyPolicy::Error`].
    ///
    /// [`UnknownKeyPolicy::Error`]: crate::io::UnknownKeyPolicy::Error
    #[error("Unknown property '{property}' on {kind}")]
    UnknownProperty {
        /// Name of the model kind being read.
        kind: &'static str,
        /// The unrecognized source key.
        property: String,
    },

    /// An abstract (incomplete) model kind was instantiated directly.
    #[error("Abstract model kind '{0}' cannot be instantiated")]
    IncompleteKind(&'static str),

    /// A source document could not be parsed at all.
    #[error("Failed to parse {format} document: {source}")]
    Parse {
        /// Textual format of the unparseable document.
        format: &'static str,
        /// The underlying parser error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A source document could not be read from the filesystem.
    #[error("Failed to read document '{path}': {source}")]
    Io {
        /// Path of the document that failed to load.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Several independent failures occurred during one assembly run.
    #[error("Multiple errors occurred during assembly:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}

/// Result alias used across the crate: errors are shared so one failure can
/// be both recorded by an [`AssemblyContext`](crate::assembly::AssemblyContext)
/// and returned to the caller.
pub type OasResult<T> = Result<T, Arc<OasError>>;

impl OasError {
    /// Tries to build an [`OasError`] from an iterator of errors.
    ///
    /// Returns `None` when no errors are supplied, the inner error when a
    /// single uniquely-owned [`Arc`] is supplied, and [`Self::Aggregate`]
    /// otherwise.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.is_empty() {
            return None;
        }
        Some(if arcs.len() == 1 {
            let last = arcs.pop()?;
            match Arc::try_unwrap(last) {
                Ok(err) => err,
                Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
            }
        } else {
            Self::Aggregate(Box::new(AggregatedErrors::new(arcs)))
        })
    }

    /// Build an [`OasError`] from at least one error.
    ///
    /// # Panics
    ///
    /// Panics if `errors` is empty. Use [`OasError::try_aggregate`] when the
    /// error list may be empty.
    #[must_use]
    #[track_caller]
    pub fn aggregate<I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        Self::try_aggregate(errors).map_or_else(
            || panic!("aggregate requires at least one error"),
            |err| err,
        )
    }

    /// Construct a registry invariant violation.
    #[must_use]
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Construct an unsupported-operation error.
    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    /// Construct a shape violation for a declared property.
    #[must_use]
    pub fn shape(kind: &'static str, property: impl Into<String>, expected: &'static str) -> Self {
        Self::Shape {
            kind,
            property: property.into(),
            expected,
        }
    }

    /// Construct a parse failure for the named textual format.
    #[must_use]
    pub fn parse<E>(format: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parse {
            format,
            source: Box::new(source),
        }
    }
}

impl From<serde_json::Error> for OasError {
    fn from(source: serde_json::Error) -> Self {
        Self::parse("JSON", source)
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for OasError {
    fn from(source: serde_yaml::Error) -> Self {
        Self::parse("YAML", source)
    }
}
