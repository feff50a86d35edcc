//! A schema-driven OpenAPI document model with dual-backend reading,
//! writing and merging.
//!
//! The crate assembles one canonical OpenAPI document from several
//! independently-produced partial sources: a static JSON/YAML file, a set
//! of discovered declarations, and a programmatically supplied reader. It
//! is built from a handful of pieces:
//!
//! - [`registry`]: a static, declarative property schema describing every
//!   model kind, validated once at first use.
//! - [`model`]: the reflection-free property bag backing every document
//!   entity, with reference handling and the schema type/nullability
//!   compatibility layer.
//! - [`tree`]: the backend-neutral tree abstraction; the document tree
//!   (JSON/YAML) and the metadata tree (declarative annotations) both
//!   implement it.
//! - [`io`]: the generic reader and writer, written once against the tree
//!   abstraction.
//! - [`merge`]: the per-property-directive merge engine.
//! - [`assembly`]: the explicit per-build lifecycle folding sources in a
//!   fixed precedence order, plus the filter stage.
//!
//! # Concurrency
//!
//! Assembly is single-threaded by design: [`model::ModelNode`] is a shared
//! single-threaded handle and must not be touched from two threads. Share
//! the *written* document tree (a [`serde_json::Value`]) across threads
//! instead; it is `Send + Sync`.
//!
//! # Example
//!
//! ```rust
//! use oas_model::assembly::{AssemblyContext, DocumentSource};
//! use oas_model::io::source::{Format, load_document_str};
//!
//! # fn main() -> oas_model::OasResult<()> {
//! let static_file = load_document_str(
//!     r#"{"openapi": "3.1.0", "info": {"title": "Pets", "version": "1.0.0"}}"#,
//!     Format::Json,
//! )?;
//!
//! let mut context = AssemblyContext::new();
//! context.supply(DocumentSource::StaticFile, static_file);
//! let document = context.assemble()?;
//! assert_eq!(document.string_property("openapi").as_deref(), Some("3.1.0"));
//! # Ok(())
//! # }
//! ```

pub mod assembly;
mod error;
pub mod io;
pub mod merge;
pub mod model;
pub mod registry;
mod result_ext;
pub mod tree;

pub use error::{AggregatedErrors, OasError, OasResult};
pub use model::{ModelNode, Value};
pub use result_ext::OasResultExt;
