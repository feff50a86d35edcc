//! The document assembly lifecycle.
//!
//! A document is assembled from up to three independently-produced partial
//! documents, folded in a fixed precedence order and then optionally
//! filtered. The whole lifecycle lives in an explicit [`AssemblyContext`]
//! value created per build; there is no ambient global state. The context
//! is a single-writer state machine: `reset` → `supply` per source →
//! `assemble` → `apply_filter` → `finalize`. Concurrent assembly runs
//! against one context are not supported and must be serialized by the
//! caller.

use std::sync::Arc;

use crate::error::{OasError, OasResult};
use crate::merge::merge;
use crate::model::ModelNode;
use crate::registry::ModelType;

mod filter;

pub use filter::{DocumentFilter, FilterOutcome, apply_filter};

/// The origin of one partial document.
///
/// Variant order is the fold order: the static file is folded first and so
/// holds scalar precedence under the default merge directive; declarations
/// and the programmatic reader follow, filling gaps and extending
/// containers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocumentSource {
    /// A parsed static document file.
    StaticFile,
    /// The document derived from discovered declarations.
    Declarations,
    /// The document supplied by a programmatic reader.
    Reader,
}

impl DocumentSource {
    /// All sources, in fold order.
    pub const PRECEDENCE: [Self; 3] = [Self::StaticFile, Self::Declarations, Self::Reader];

    /// A human-readable label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StaticFile => "static file",
            Self::Declarations => "declarations",
            Self::Reader => "programmatic reader",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::StaticFile => 0,
            Self::Declarations => 1,
            Self::Reader => 2,
        }
    }
}

/// Per-build assembly state.
#[derive(Default)]
pub struct AssemblyContext {
    slots: [Option<ModelNode>; 3],
    errors: Vec<Arc<OasError>>,
    document: Option<ModelNode>,
}

impl AssemblyContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all supplied documents, recorded errors and any assembled
    /// document, returning the context to its initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Supply one source's partial document. Supplying the same source
    /// twice replaces the earlier document.
    pub fn supply(&mut self, source: DocumentSource, document: ModelNode) {
        if let Some(slot) = self.slots.get_mut(source.index()) {
            *slot = Some(document);
        }
    }

    /// Record a failure encountered while producing one source's document.
    /// Recorded errors make [`AssemblyContext::assemble`] fail with a single
    /// wrapped error covering every source.
    pub fn record_error(&mut self, error: Arc<OasError>) {
        self.errors.push(error);
    }

    /// Whether any source failures have been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Fold the supplied documents, in fixed precedence order, into the
    /// canonical document. With no sources supplied the canonical document
    /// is empty.
    ///
    /// # Errors
    ///
    /// Returns the recorded source failures, aggregated into one error;
    /// the document build aborts as a whole.
    pub fn assemble(&mut self) -> OasResult<ModelNode> {
        if !self.errors.is_empty() {
            let errors = std::mem::take(&mut self.errors);
            return Err(Arc::new(OasError::aggregate(errors)));
        }

        let mut accumulator: Option<ModelNode> = None;
        for source in DocumentSource::PRECEDENCE {
            let Some(slot) = self.slots.get_mut(source.index()) else {
                continue;
            };
            let Some(document) = slot.take() else {
                continue;
            };
            match &accumulator {
                Some(target) => merge(target, &document),
                None => accumulator = Some(document),
            }
        }

        let document =
            accumulator.unwrap_or_else(|| ModelNode::new_unchecked(ModelType::OpenApi));
        self.document = Some(document.clone());
        Ok(document)
    }

    /// The assembled canonical document, if [`AssemblyContext::assemble`]
    /// has run.
    #[must_use]
    pub fn document(&self) -> Option<&ModelNode> {
        self.document.as_ref()
    }

    /// Apply a filter stage to the assembled document. Removing the root
    /// leaves an empty document.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::UnsupportedOperation`] when called before
    /// [`AssemblyContext::assemble`].
    pub fn apply_filter(&mut self, document_filter: &mut dyn DocumentFilter) -> OasResult<()> {
        let Some(document) = self.document.clone() else {
            return Err(Arc::new(OasError::unsupported(
                "assemble the document before filtering",
            )));
        };
        self.document = Some(
            apply_filter(&document, document_filter)
                .unwrap_or_else(|| ModelNode::new_unchecked(ModelType::OpenApi)),
        );
        Ok(())
    }

    /// Hand the canonical document over, ending the lifecycle. The context
    /// must be [`reset`](AssemblyContext::reset) before reuse.
    ///
    /// # Errors
    ///
    /// Returns [`OasError::UnsupportedOperation`] when nothing has been
    /// assembled.
    pub fn finalize(&mut self) -> OasResult<ModelNode> {
        self.document.take().ok_or_else(|| {
            Arc::new(OasError::unsupported(
                "nothing assembled: supply sources and assemble first",
            ))
        })
    }
}
