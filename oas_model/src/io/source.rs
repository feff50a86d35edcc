//! Textual document sources: parsing JSON/YAML into document trees and
//! serializing trees back to text.
//!
//! Lexing is delegated entirely to `serde_json` and `serde_yaml`; both
//! formats parse into the same [`serde_json::Value`] tree, which is what the
//! generic reader consumes. YAML support sits behind the default-on `yaml`
//! feature.

use std::sync::Arc;

use camino::Utf8Path;
use serde_json::Value as Json;

use crate::error::{OasError, OasResult};
use crate::model::ModelNode;
use crate::registry::ModelType;
use crate::result_ext::OasResultExt;
use crate::tree::DocumentTree;

use super::{Reader, SpecVersion, Writer};

/// Textual format of a document source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    /// JSON text.
    Json,
    /// YAML text.
    Yaml,
}

impl Format {
    /// Detect the format from a file extension. Unknown extensions yield
    /// `None`.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Some(Self::Json),
            Some("yaml" | "yml") => Some(Self::Yaml),
            _ => None,
        }
    }

    /// The format's display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Parse document text into a document tree.
///
/// # Errors
///
/// Returns [`OasError::Parse`] when the text is malformed, or when YAML is
/// requested with the `yaml` feature disabled.
pub fn parse_text(contents: &str, format: Format) -> OasResult<Json> {
    match format {
        Format::Json => serde_json::from_str(contents).into_oas(),
        Format::Yaml => parse_yaml(contents),
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(contents: &str) -> OasResult<Json> {
    serde_yaml::from_str(contents).into_oas()
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_contents: &str) -> OasResult<Json> {
    Err(Arc::new(OasError::parse(
        "YAML",
        std::io::Error::other(
            "yaml feature disabled: enable the 'yaml' feature to support this format",
        ),
    )))
}

/// Serialize a document tree to text.
///
/// # Errors
///
/// Returns [`OasError::Parse`] when serialization fails or when YAML is
/// requested with the `yaml` feature disabled.
pub fn serialize_tree(tree: &Json, format: Format) -> OasResult<String> {
    match format {
        Format::Json => serde_json::to_string_pretty(tree).into_oas(),
        Format::Yaml => serialize_yaml(tree),
    }
}

#[cfg(feature = "yaml")]
fn serialize_yaml(tree: &Json) -> OasResult<String> {
    serde_yaml::to_string(tree).into_oas()
}

#[cfg(not(feature = "yaml"))]
fn serialize_yaml(_tree: &Json) -> OasResult<String> {
    Err(Arc::new(OasError::parse(
        "YAML",
        std::io::Error::other(
            "yaml feature disabled: enable the 'yaml' feature to support this format",
        ),
    )))
}

/// Load a document tree from a file, detecting the format from the
/// extension.
///
/// # Errors
///
/// Returns [`OasError::Io`] when the file cannot be read or carries an
/// unrecognized extension, and the errors of [`parse_text`].
pub fn load_tree(path: &Utf8Path) -> OasResult<Json> {
    let format = Format::from_path(path).ok_or_else(|| {
        Arc::new(OasError::Io {
            path: path.to_owned(),
            source: std::io::Error::other("unsupported file extension"),
        })
    })?;
    let contents = std::fs::read_to_string(path).map_err(|source| {
        Arc::new(OasError::Io {
            path: path.to_owned(),
            source,
        })
    })?;
    parse_text(&contents, format)
}

/// Parse document text and read it as a complete document model.
///
/// # Errors
///
/// Propagates the errors of [`parse_text`] and the generic reader.
pub fn load_document_str(contents: &str, format: Format) -> OasResult<ModelNode> {
    let tree = parse_text(contents, format)?;
    Reader::new(&DocumentTree).read(&tree, ModelType::OpenApi)
}

/// Load a file and read it as a complete document model.
///
/// # Errors
///
/// Propagates the errors of [`load_tree`] and the generic reader.
pub fn load_document_path(path: &Utf8Path) -> OasResult<ModelNode> {
    let tree = load_tree(path)?;
    Reader::new(&DocumentTree).read(&tree, ModelType::OpenApi)
}

/// Serialize a document model to text in the given format and version.
///
/// # Errors
///
/// Propagates the errors of [`serialize_tree`].
pub fn write_document_string(
    model: &ModelNode,
    format: Format,
    version: SpecVersion,
) -> OasResult<String> {
    let tree = Writer::with_version(&DocumentTree, version).write(model);
    serialize_tree(&tree, format)
}
