//! Extensions for mapping errors to `OasResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(e.into()))`
//! patterns when converting external error types into the crate's
//! `OasResult<T>` alias (`Result<T, Arc<OasError>>`).

use std::sync::Arc;

use crate::{OasError, OasResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<OasError>`
/// into an `OasResult<T>`.
pub trait OasResultExt<T, E> {
    /// Convert `Result<T, E>` into `OasResult<T>` using `Into<OasError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<OasError>`.
    fn into_oas(self) -> OasResult<T>;
}

impl<T, E> OasResultExt<T, E> for Result<T, E>
where
    E: Into<OasError>,
{
    fn into_oas(self) -> OasResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
